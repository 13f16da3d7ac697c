//! Plain-text rendering of page records

use crate::crawler::CrawlReport;
use crate::state::PageRecord;
use std::fmt;
use std::io::{self, Write};

impl fmt::Display for PageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = self.error() {
            return writeln!(f, "Error fetching links for {}: {}", self.url(), error);
        }

        writeln!(f, "Links from {}:", self.url())?;
        for link in self.links() {
            writeln!(f, "\t{}", link)?;
        }
        Ok(())
    }
}

/// Recorded pages of a report, sorted by URL
pub fn sorted_pages(report: &CrawlReport) -> Vec<&PageRecord> {
    let mut pages: Vec<_> = report.pages().collect();
    pages.sort_by(|a, b| a.url().as_str().cmp(b.url().as_str()));
    pages
}

/// Writes every record in the order given
pub fn write_pages<'a, W, I>(writer: &mut W, pages: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a PageRecord>,
{
    for page in pages {
        write!(writer, "{}", page)?;
    }
    writer.flush()
}
