//! Producer side: pulling locations from scrapers into the catalog.
//!
//! A [`Scraper`] yields [`NewLocation`]s; [`IngestService`] upserts them.
//! Re-running the same scraper is idempotent because upserts key on name.
//! A failing scraper or a malformed record is logged and skipped so one bad
//! source never blocks the rest of the run.

use crate::db::Catalog;
use crate::error::{ErrorKind, Result};
use cragmap_types::location::NewLocation;
use serde::{Deserialize, Serialize};

mod seed;

pub use seed::JsonSeedScraper;

/// A source of climbing locations.
pub trait Scraper: Send {
    fn name(&self) -> &str;

    /// Acquire whatever the scraper needs (connections, files).
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    fn scrape(&mut self) -> Result<Vec<NewLocation>>;

    /// Release resources. Called after every run, including failed ones.
    fn close(&mut self) {}
}

/// Summary of one ingest run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Records produced by scrapers that ran successfully.
    pub scraped: usize,
    pub inserted: usize,
    pub updated: usize,
    /// Records the catalog refused as invalid.
    pub rejected: usize,
    /// Names of scrapers whose initialize or scrape step failed.
    pub failed_scrapers: Vec<String>,
}

impl IngestReport {
    pub fn stored(&self) -> usize {
        self.inserted + self.updated
    }
}

pub struct IngestService {
    catalog: Catalog,
    scrapers: Vec<Box<dyn Scraper>>,
}

impl IngestService {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            scrapers: Vec::new(),
        }
    }

    pub fn with_scraper(mut self, scraper: Box<dyn Scraper>) -> Self {
        self.scrapers.push(scraper);
        self
    }

    pub fn add_scraper(&mut self, scraper: Box<dyn Scraper>) {
        self.scrapers.push(scraper);
    }

    /// Run every registered scraper in order and upsert what they produce.
    ///
    /// Only store-level failures (closed catalog, snapshot I/O) abort the run.
    pub fn run(&mut self) -> Result<IngestReport> {
        let mut report = IngestReport::default();

        for scraper in self.scrapers.iter_mut() {
            let scraped = scraper.initialize().and_then(|_| scraper.scrape());
            scraper.close();

            let locations = match scraped {
                Ok(locations) => locations,
                Err(e) => {
                    log::warn!("Scraper '{}' failed: {}", scraper.name(), e);
                    report.failed_scrapers.push(scraper.name().to_string());
                    continue;
                }
            };

            log::info!(
                "Scraper '{}' produced {} locations",
                scraper.name(),
                locations.len()
            );
            report.scraped += locations.len();

            for location in locations {
                let name = location.name.clone();
                match self.catalog.upsert(location) {
                    Ok(outcome) if outcome.is_insert() => report.inserted += 1,
                    Ok(_) => report.updated += 1,
                    Err(e) if e.kind() == ErrorKind::InvalidArgument => {
                        log::warn!("Skipping location '{}': {}", name, e);
                        report.rejected += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        log::info!(
            "Ingest finished: {} scraped, {} inserted, {} updated, {} rejected, {} scrapers failed",
            report.scraped,
            report.inserted,
            report.updated,
            report.rejected,
            report.failed_scrapers.len()
        );

        Ok(report)
    }
}
