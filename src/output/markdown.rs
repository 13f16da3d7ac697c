//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl run,
//! including run information, statistics, an error breakdown, and the links
//! found on every recorded page.

use crate::crawler::CrawlReport;
use crate::output::text::sorted_pages;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Writes a markdown summary of a crawl run
///
/// # Arguments
///
/// * `report` - The finished crawl
/// * `config_hash` - Hash of the configuration file, if one was used
/// * `output_path` - Path where the markdown file should be written
pub fn write_markdown_summary(
    report: &CrawlReport,
    config_hash: Option<&str>,
    output_path: &Path,
) -> io::Result<()> {
    let markdown = format_markdown_summary(report, config_hash);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_summary(report: &CrawlReport, config_hash: Option<&str>) -> String {
    let stats = &report.stats;
    let mut md = String::new();

    // Title
    md.push_str("# Site-Walker Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Root**: {}\n", report.root()));
    md.push_str(&format!("- **Termination**: {}\n", report.termination));
    md.push_str(&format!("- **Started**: {}\n", stats.started_at.to_rfc3339()));
    if let Some(finished) = stats.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = stats.duration_seconds() {
        md.push_str(&format!("- **Duration**: {:.2} seconds\n", duration));
    }
    if let Some(hash) = config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Recorded**: {}\n", stats.pages_recorded));
    md.push_str(&format!("- **Pages Failed**: {}\n", stats.pages_failed));
    md.push_str(&format!("- **Links Found**: {}\n", stats.links_discovered));
    md.push_str(&format!("- **Links Enqueued**: {}\n", stats.links_enqueued));
    md.push_str(&format!("- **Links Dropped**: {}\n", stats.links_dropped));
    md.push_str(&format!("- **Success Rate**: {:.2}%\n\n", stats.success_rate()));

    // Error summary
    if !stats.errors_by_kind.is_empty() {
        md.push_str("## Error Summary\n\n");
        md.push_str("| Error Type | Count |\n");
        md.push_str("|------------|-------|\n");

        let mut errors: Vec<_> = stats.errors_by_kind.iter().collect();
        errors.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

        for (kind, count) in errors {
            md.push_str(&format!("| {} | {} |\n", kind, count));
        }
        md.push('\n');
    }

    // Per-page links
    if !report.is_empty() {
        md.push_str("## Pages\n\n");
        for page in sorted_pages(report) {
            md.push_str(&format!("### {}\n\n", page.url()));
            if page.links().is_empty() {
                md.push_str("_No links_\n\n");
                continue;
            }
            for link in page.links() {
                md.push_str(&format!("- {}\n", link));
            }
            md.push('\n');
        }
    }

    md
}
