use crate::domain::model::Listing;
use crate::domain::ports::ListingSource;
use crate::utils::error::{Result, WatchError};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = "Mozilla/5.0";

/// Scrapes the inli.fr offer page. One GET per cycle; a failed request or a
/// non-success status fails the whole fetch, while a single malformed card
/// only drops that card.
pub struct InliSource {
    client: Client,
    source_url: Url,
}

impl InliSource {
    pub fn new(source_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            source_url: Url::parse(source_url)?,
        })
    }
}

#[async_trait]
impl ListingSource for InliSource {
    async fn fetch(&self) -> Result<Vec<Listing>> {
        tracing::debug!("Fetching {}", self.source_url);
        let body = self
            .client
            .get(self.source_url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(parse_listings(&body, &self.source_url))
    }
}

/// Extracts all listing cards from the page HTML. Cards that fail extraction
/// are logged and skipped individually.
pub fn parse_listings(html: &str, base: &Url) -> Vec<Listing> {
    let document = Html::parse_document(html);
    let item_selector = Selector::parse("div.featured-item").expect("static selector");

    let mut listings = Vec::new();
    for item in document.select(&item_selector) {
        match extract_listing(item, base) {
            Ok(listing) => listings.push(listing),
            Err(e) => tracing::warn!("❌ Parsing error: {}", e),
        }
    }
    listings
}

fn extract_listing(item: ElementRef, base: &Url) -> Result<Listing> {
    let details_selector = Selector::parse("div.featured-details").expect("static selector");
    let price_selector = Selector::parse("div.featured-price").expect("static selector");
    let link_selector = Selector::parse("a[href]").expect("static selector");

    let title = item
        .select(&details_selector)
        .next()
        .map(element_text)
        .ok_or_else(|| WatchError::ParseError {
            message: "listing card has no details element".to_string(),
        })?;

    let price_text = item
        .select(&price_selector)
        .next()
        .map(element_text)
        .ok_or_else(|| WatchError::ParseError {
            message: "listing card has no price element".to_string(),
        })?;

    let price = parse_price(&price_text)?;

    let href = item
        .select(&link_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(|| WatchError::ParseError {
            message: "listing card has no link".to_string(),
        })?;

    let url = base.join(href)?.to_string();

    Ok(Listing { title, price, url })
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Normalizes free-text price formatting ("1 200 € cc") to currency units.
/// Strips the euro sign, plain and non-breaking spaces, the "cc"
/// (charges comprises) suffix and thousands commas before the integer parse.
pub fn parse_price(raw: &str) -> Result<u32> {
    let cleaned = raw
        .to_lowercase()
        .replace('€', "")
        .replace([' ', '\u{a0}', '\u{202f}'], "")
        .replace("cc", "")
        .replace(',', "");

    cleaned
        .parse::<u32>()
        .map_err(|_| WatchError::ParseError {
            message: format!("unparseable price text: {:?}", raw),
        })
}
