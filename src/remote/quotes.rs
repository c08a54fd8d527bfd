//! Quote-source collaborator: scrapes quote/author pairs from a fixed
//! external page.
//!
//! The page layout pairs each quotation (an `<h2>` containing quotation
//! marks) with an author credit (a following `<em>` like `- John Muir`).
//! Parsing is a pure function over the HTML so it is testable offline.

use super::RemoteError;
use crate::types::Quote;
use scraper::{Html, Selector};
use tracing::{info, warn};

const QUOTATION_MARKS: [char; 3] = ['"', '\u{201C}', '\u{201D}'];

/// Seam for the quote source.
pub trait QuoteSource {
    fn scrape(&self) -> Result<Vec<Quote>, RemoteError>;
}

/// Blocking client fetching the configured quotes page.
pub struct WebQuoteSource {
    http: reqwest::blocking::Client,
    url: String,
}

impl WebQuoteSource {
    pub fn new(url: &str) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            url: url.to_string(),
        }
    }
}

impl QuoteSource for WebQuoteSource {
    fn scrape(&self) -> Result<Vec<Quote>, RemoteError> {
        info!(url = %self.url, "scraping quotes");
        let response = self.http.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Provider {
                status: status.as_u16(),
                message: format!("quote page fetch failed for {}", self.url),
            });
        }
        Ok(parse_quote_page(&response.text()?))
    }
}

/// Extract quote/author pairs from the page HTML.
///
/// Headings without quotation marks (section titles and the like) are
/// skipped; the marks themselves are stripped from the kept text. Author
/// lines lose their leading dash. Pairs are zipped in document order;
/// unequal counts mean the page layout drifted, so the surplus is
/// dropped with a warning rather than mispaired silently.
pub fn parse_quote_page(html: &str) -> Vec<Quote> {
    let document = Html::parse_document(html);
    let h2 = Selector::parse("h2").unwrap();
    let em = Selector::parse("em").unwrap();

    let quotes: Vec<String> = document
        .select(&h2)
        .map(|el| el.text().collect::<String>())
        .filter(|text| text.chars().any(|c| QUOTATION_MARKS.contains(&c)))
        .map(|text| {
            text.chars()
                .filter(|c| !QUOTATION_MARKS.contains(c))
                .collect::<String>()
                .trim()
                .to_string()
        })
        .collect();

    let authors: Vec<String> = document
        .select(&em)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .map(|text| text.replace("- ", ""))
        .collect();

    if quotes.len() != authors.len() {
        warn!(
            quotes = quotes.len(),
            authors = authors.len(),
            "quote and author counts differ, dropping the surplus"
        );
    }

    quotes
        .into_iter()
        .zip(authors)
        .map(|(text, author)| Quote { text, author })
        .collect()
}
