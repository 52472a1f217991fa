pub mod client;
pub mod summary;
pub mod toc;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

pub use client::MediaWikiClient;
pub use summary::{build_summary, SummaryOptions, YearSummary};
pub use toc::{normalize_toc, resolve_month_sections, MonthSectionMap, TocEntry};

/// The twelve section titles a year page is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Exact, case-sensitive match against a section title.
    pub fn from_title(title: &str) -> Option<Month> {
        Month::ALL.into_iter().find(|m| m.name() == title)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Remote access to a Wikipedia year page.
#[async_trait]
pub trait WikiSource: Send + Sync {
    /// Raw `tocdata` payload for the year page; `[]` when the page has none.
    async fn table_of_contents(&self, year: i32) -> Result<serde_json::Value>;

    /// Raw wikitext of one section; `""` when the section does not exist.
    async fn section_text(&self, year: i32, index: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_titles_are_case_sensitive() {
        assert_eq!(Month::from_title("March"), Some(Month::March));
        assert_eq!(Month::from_title("march"), None);
        assert_eq!(Month::from_title("Births"), None);
    }

    #[test]
    fn months_serialize_by_name() {
        let json = serde_json::to_string(&Month::October).unwrap();
        assert_eq!(json, "\"October\"");
    }
}
