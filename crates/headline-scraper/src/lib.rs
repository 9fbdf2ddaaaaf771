//! Homepage scraper for Headline.
//!
//! Fetches a news homepage and pulls out `(title, url, tag)` triples for the
//! ingest job. This is a best-effort feed: the CSS class names are whatever
//! the source site currently emits, and a block missing any part is logged and
//! skipped rather than failing the run.

pub mod error;

use headline_core::story::NewStory;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub use error::{Error, Result};

// ─── Selectors ───────────────────────────────────────────────────────────────

/// One story card on the homepage.
pub const BLOCK_SELECTOR: &str = "div.e1f5wbog8";
/// The card's link; its `href` is the story URL.
pub const LINK_SELECTOR: &str = "a.e1f5wbog1[href]";
pub const TITLE_SELECTOR: &str = "p.e1f5wbog5";
/// The section label printed on the card, used as the story's tag.
pub const TAG_SELECTOR: &str = "span.ecn1o5v1";

/// Compiled CSS selectors for one homepage layout.
#[derive(Debug)]
pub struct Selectors {
  block: Selector,
  link:  Selector,
  title: Selector,
  tag:   Selector,
}

impl Selectors {
  pub fn new() -> Result<Self> {
    Ok(Self {
      block: compile(BLOCK_SELECTOR)?,
      link:  compile(LINK_SELECTOR)?,
      title: compile(TITLE_SELECTOR)?,
      tag:   compile(TAG_SELECTOR)?,
    })
  }
}

fn compile(selector: &'static str) -> Result<Selector> {
  Selector::parse(selector).map_err(|e| Error::Selector {
    selector,
    reason: e.to_string(),
  })
}

// ─── Scraped output ──────────────────────────────────────────────────────────

/// A raw triple as printed on the page; the tag is not yet normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedStory {
  pub title: String,
  pub url:   String,
  pub tag:   String,
}

impl ScrapedStory {
  /// Convert to ingestion input, dropping stories whose tag is blank.
  pub fn into_new_story(self) -> Option<NewStory> {
    NewStory::from_scraped(self.title, self.url, &self.tag)
  }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Extract up to `limit` stories from homepage HTML. Only the first `limit`
/// story blocks are considered, so skipped blocks still count against it.
pub fn parse_homepage(
  html: &str,
  base: &Url,
  limit: usize,
  selectors: &Selectors,
) -> Vec<ScrapedStory> {
  let document = Html::parse_document(html);
  let mut stories = Vec::new();

  for (index, block) in document.select(&selectors.block).take(limit).enumerate() {
    match parse_block(block, base, selectors) {
      Some(story) => {
        debug!(index, url = %story.url, "parsed story block");
        stories.push(story);
      }
      None => warn!(index, "story block is missing a link, title or tag"),
    }
  }

  stories
}

fn parse_block(
  block: ElementRef<'_>,
  base: &Url,
  selectors: &Selectors,
) -> Option<ScrapedStory> {
  let href  = block.select(&selectors.link).next()?.value().attr("href")?;
  let url   = base.join(href).ok()?;
  let title = text_of(block, &selectors.title)?;
  let tag   = text_of(block, &selectors.tag)?;

  Some(ScrapedStory { title, url: url.to_string(), tag })
}

/// Trimmed text of the first element matching `selector`; `None` if absent or
/// blank.
fn text_of(block: ElementRef<'_>, selector: &Selector) -> Option<String> {
  let text = block.select(selector).next()?.text().collect::<String>();
  let text = text.trim();
  (!text.is_empty()).then(|| text.to_owned())
}

// ─── Fetching ────────────────────────────────────────────────────────────────

/// Fetches and parses one homepage.
#[derive(Debug)]
pub struct Scraper {
  client:    reqwest::Client,
  base:      Url,
  limit:     usize,
  selectors: Selectors,
}

impl Scraper {
  pub fn new(base_url: &str, limit: usize) -> Result<Self> {
    let client = reqwest::Client::builder()
      .user_agent(concat!("headline/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self {
      client,
      base: Url::parse(base_url)?,
      limit,
      selectors: Selectors::new()?,
    })
  }

  pub fn base_url(&self) -> &Url { &self.base }

  /// Download the homepage and extract its stories.
  #[instrument(level = "info", skip(self), fields(source = %self.base))]
  pub async fn scrape(&self) -> Result<Vec<ScrapedStory>> {
    let html = self
      .client
      .get(self.base.clone())
      .send()
      .await?
      .error_for_status()?
      .text()
      .await?;

    let stories = parse_homepage(&html, &self.base, self.limit, &self.selectors);
    info!(count = stories.len(), bytes = html.len(), "scraped homepage");
    Ok(stories)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn card(href: &str, title: &str, tag: &str) -> String {
    format!(
      r#"<div class="e1f5wbog8">
           <a class="e1f5wbog1" href="{href}"><p class="e1f5wbog5">{title}</p></a>
           <span class="ecn1o5v1">{tag}</span>
         </div>"#
    )
  }

  fn page(cards: &[String]) -> String {
    format!("<html><body><main>{}</main></body></html>", cards.concat())
  }

  fn parse(html: &str, limit: usize) -> Vec<ScrapedStory> {
    let base = Url::parse("http://bbc.co.uk").unwrap();
    parse_homepage(html, &base, limit, &Selectors::new().unwrap())
  }

  #[test]
  fn extracts_title_url_and_tag() {
    let html = page(&[card("/news/uk-1", " Storm warning ", "UK")]);
    let stories = parse(&html, 10);

    assert_eq!(
      stories,
      [ScrapedStory {
        title: "Storm warning".into(),
        url:   "http://bbc.co.uk/news/uk-1".into(),
        tag:   "UK".into(),
      }]
    );
  }

  #[test]
  fn absolute_links_are_kept() {
    let html = page(&[card("https://www.bbc.com/sport/1", "Cup final", "Football")]);
    assert_eq!(parse(&html, 10)[0].url, "https://www.bbc.com/sport/1");
  }

  #[test]
  fn incomplete_blocks_are_skipped() {
    let html = page(&[
      card("/news/1", "Has everything", "World"),
      r#"<div class="e1f5wbog8"><p class="e1f5wbog5">No link</p></div>"#.to_string(),
      card("/news/3", "Blank tag", "   "),
      card("/news/4", "Also complete", "Business"),
    ]);

    let titles: Vec<String> = parse(&html, 10).into_iter().map(|s| s.title).collect();
    assert_eq!(titles, ["Has everything", "Also complete"]);
  }

  #[test]
  fn only_the_first_blocks_up_to_limit_are_read() {
    let cards: Vec<String> = (0..15)
      .map(|i| card(&format!("/news/{i}"), &format!("Story {i}"), "World"))
      .collect();
    let stories = parse(&page(&cards), 10);

    assert_eq!(stories.len(), 10);
    assert_eq!(stories[9].title, "Story 9");
  }

  #[test]
  fn page_without_story_blocks_yields_nothing() {
    assert!(parse("<html><body><p>maintenance</p></body></html>", 10).is_empty());
  }

  #[test]
  fn scraped_tag_is_normalised_for_ingestion() {
    let scraped = ScrapedStory {
      title: "t".into(),
      url:   "http://bbc.co.uk/1".into(),
      tag:   "BUSINESS".into(),
    };
    assert_eq!(scraped.into_new_story().unwrap().tag.as_str(), "Business");
  }

  #[tokio::test]
  async fn unsupported_scheme_is_an_http_error() {
    // reqwest refuses non-HTTP schemes before opening a connection.
    let scraper = Scraper::new("ftp://bbc.co.uk/", 10).unwrap();
    let err = scraper.scrape().await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
  }

  #[test]
  fn malformed_base_url_is_rejected() {
    assert!(matches!(Scraper::new("not a url", 10), Err(Error::Url(_))));
  }
}
