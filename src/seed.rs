//! Sample data ingestion
//!
//! Loads a small hand-written site plus generated pages for a few popular
//! domains. Every link goes through [`LinkGraphWriter::add_link`], so both
//! halves of each edge are written the same way live ingestion writes them.

use crate::links::{LinkGraphWriter, LinkWriteResult};
use crate::page::{PageFieldSet, PageTable};
use crate::WebTableError;
use chrono::{DateTime, Utc};

/// Domains that get generated pages
pub const SAMPLE_SITES: [&str; 5] = [
    "www.google.com",
    "www.youtube.com",
    "www.facebook.com",
    "www.amazon.com",
    "www.wikipedia.org",
];

/// Pages generated per site when no count is given
pub const DEFAULT_PAGES: usize = 5;

/// Counts of what an ingestion run wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub pages: usize,
    pub links: usize,
    /// Links that ended up with only one half stored
    pub half_edges: usize,
}

impl SeedSummary {
    fn record_link(&mut self, result: &LinkWriteResult) {
        self.links += 1;
        if !result.is_complete() {
            self.half_edges += 1;
        }
    }

    fn absorb(&mut self, other: SeedSummary) {
        self.pages += other.pages;
        self.links += other.links;
        self.half_edges += other.half_edges;
    }
}

/// Writes the hand-written example site
///
/// Three pages: the `www.example.com` home and about pages and one external
/// blog post on `tech.blog.net` that links back to the home page.
pub fn ingest_sample_data(
    table: &PageTable,
    writer: &LinkGraphWriter,
) -> Result<SeedSummary, WebTableError> {
    let home = "https://www.example.com/";
    let about = "https://www.example.com/about";
    let blog = "https://tech.blog.net/123";

    let mut summary = SeedSummary::default();

    table.put_url(
        home,
        &PageFieldSet::new()
            .html(r#"<html><h1>Welcome</h1><a href="/about">About Us</a></html>"#)
            .text("Welcome to our site. About Us.")
            .fetch_time(millis(1_717_020_000_000))
            .status(200)
            .content_type("text/html"),
    )?;
    table.put_url(
        about,
        &PageFieldSet::new()
            .html("<html><h2>About</h2><p>Our company info</p></html>")
            .fetch_time(millis(1_717_020_001_000)),
    )?;
    table.put_url(
        blog,
        &PageFieldSet::new().html(
            r#"<html><p>Check out <a href="https://www.example.com">Example Inc</a></p></html>"#,
        ),
    )?;
    summary.pages += 3;

    summary.record_link(&writer.add_link(home, about, "About Us")?);
    summary.record_link(&writer.add_link(blog, home, "Example Inc")?);

    Ok(summary)
}

/// Generates `pages` pages for one domain and chains them together
///
/// Pages are `/`, `/page-1`, ... `/page-{pages-1}`. Each page after the
/// first links back with "Previous Page" and is linked from its predecessor
/// with "Next Page".
///
/// # Arguments
///
/// * `table` - Page table to write to
/// * `writer` - Link writer sharing the same store
/// * `domain` - Host to generate pages for
/// * `pages` - Number of pages, zero writes nothing
pub fn generate_website_data(
    table: &PageTable,
    writer: &LinkGraphWriter,
    domain: &str,
    pages: usize,
) -> Result<SeedSummary, WebTableError> {
    let base_url = format!("https://{}", domain);
    let paths: Vec<String> = (0..pages)
        .map(|i| {
            if i == 0 {
                "/".to_string()
            } else {
                format!("/page-{}", i)
            }
        })
        .collect();

    let mut summary = SeedSummary::default();
    let fetched = Utc::now();

    for (idx, path) in paths.iter().enumerate() {
        let url = format!("{}{}", base_url, path);
        table.put_url(
            &url,
            &PageFieldSet::new()
                .html(format!("<html><h1>{} {}</h1></html>", domain, path))
                .text(format!("Welcome to {} {}", domain, path))
                .fetch_time(fetched)
                .status(200)
                .content_type("text/html"),
        )?;
        summary.pages += 1;

        if idx > 0 {
            let prev_url = format!("{}{}", base_url, paths[idx - 1]);
            summary.record_link(&writer.add_link(&url, &prev_url, "Previous Page")?);
            summary.record_link(&writer.add_link(&prev_url, &url, "Next Page")?);
        }
    }

    tracing::debug!("Generated {} pages for {}", summary.pages, domain);
    Ok(summary)
}

/// Writes the example site and generated pages for every sample domain
pub fn seed_all(
    table: &PageTable,
    writer: &LinkGraphWriter,
    pages: usize,
) -> Result<SeedSummary, WebTableError> {
    let mut summary = ingest_sample_data(table, writer)?;
    for domain in SAMPLE_SITES {
        summary.absorb(generate_website_data(table, writer, domain, pages)?);
    }

    tracing::info!(
        "Seeded {} pages and {} links ({} half-edges)",
        summary.pages,
        summary.links,
        summary.half_edges
    );
    Ok(summary)
}

fn millis(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default()
}
