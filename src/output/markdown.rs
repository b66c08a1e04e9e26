//! Markdown report generation

use crate::output::{CrawlReport, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes `report` as markdown to `output_path`
pub fn write_markdown_report(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Image-Ripple Crawl Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        report.duration().num_seconds()
    ));
    if let Some(hash) = &report.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push_str(&format!("- **Max Depth**: {}\n", report.max_depth));
    md.push_str(&format!("- **Strategy**: {:?}\n\n", report.strategy));

    md.push_str("## Totals\n\n");
    md.push_str(&format!("- **Pages Claimed**: {}\n", report.pages_claimed));
    md.push_str(&format!(
        "- **Transformed Images**: {}\n\n",
        report.total_transformed()
    ));

    if !report.seeds.is_empty() {
        md.push_str("## Seeds\n\n");
        md.push_str("| Seed | Transformed |\n");
        md.push_str("|------|-------------|\n");
        for outcome in &report.seeds {
            md.push_str(&format!("| {} | {} |\n", outcome.seed, outcome.transformed));
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlStrategy;
    use crate::output::SeedOutcome;
    use crate::url::CrawlUri;
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::TempDir;

    fn create_test_report() -> CrawlReport {
        let started_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        CrawlReport {
            started_at,
            finished_at: started_at + Duration::seconds(42),
            config_hash: Some("abc123".to_string()),
            max_depth: 3,
            strategy: CrawlStrategy::Concurrent,
            seeds: vec![SeedOutcome {
                seed: CrawlUri::parse("https://example.com/").unwrap(),
                transformed: 12,
            }],
            pages_claimed: 5,
        }
    }

    #[test]
    fn test_format_markdown_report() {
        let markdown = format_markdown_report(&create_test_report());

        assert!(markdown.starts_with("# Image-Ripple Crawl Report"));
        assert!(markdown.contains("- **Started**: 2024-01-01T00:00:00+00:00"));
        assert!(markdown.contains("- **Duration**: 42 seconds"));
        assert!(markdown.contains("- **Config Hash**: abc123"));
        assert!(markdown.contains("- **Strategy**: Concurrent"));
        assert!(markdown.contains("- **Pages Claimed**: 5"));
        assert!(markdown.contains("| https://example.com/ | 12 |"));
    }

    #[test]
    fn test_markdown_without_hash_or_seeds() {
        let mut report = create_test_report();
        report.config_hash = None;
        report.seeds.clear();

        let markdown = format_markdown_report(&report);

        assert!(!markdown.contains("Config Hash"));
        assert!(!markdown.contains("## Seeds"));
        assert!(markdown.contains("- **Transformed Images**: 0"));
    }

    #[test]
    fn test_write_markdown_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.md");

        write_markdown_report(&create_test_report(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, format_markdown_report(&create_test_report()));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.md");

        assert!(write_markdown_report(&create_test_report(), &path).is_err());
    }
}
