use super::Scraper;
use crate::error::Result;
use cragmap_types::location::NewLocation;
use std::path::PathBuf;

enum SeedSource {
    Inline(String),
    File(PathBuf),
}

/// Reads a JSON array of locations, e.g. a fixture used to seed a fresh
/// catalog.
///
/// Records use the wire field names (`type`, `imageUrl`, ...). A file source
/// is read on every scrape, so edits are picked up by the next run.
///
/// # Examples
///
/// ```
/// use cragmap::ingest::{JsonSeedScraper, Scraper};
///
/// let mut seed = JsonSeedScraper::from_json_str(
///     r#"[{ "name": "Flagstaff", "type": "BOULDER", "latitude": 40.0, "longitude": -105.3 }]"#,
/// );
/// let locations = seed.scrape()?;
/// assert_eq!(locations[0].name, "Flagstaff");
/// # Ok::<(), cragmap::CragmapError>(())
/// ```
pub struct JsonSeedScraper {
    name: String,
    source: SeedSource,
}

impl JsonSeedScraper {
    pub fn from_json_str(json: impl Into<String>) -> Self {
        Self {
            name: "json-seed".to_string(),
            source: SeedSource::Inline(json.into()),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: format!("json-seed:{}", path.display()),
            source: SeedSource::File(path),
        }
    }
}

impl Scraper for JsonSeedScraper {
    fn name(&self) -> &str {
        &self.name
    }

    fn scrape(&mut self) -> Result<Vec<NewLocation>> {
        let locations: Vec<NewLocation> = match &self.source {
            SeedSource::Inline(json) => serde_json::from_str(json)?,
            SeedSource::File(path) => {
                let text = std::fs::read_to_string(path)?;
                serde_json::from_str(&text)?
            }
        };
        Ok(locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cragmap_types::location::ClimbingType;
    use std::io::Write;

    const SEED: &str = r#"[
        { "name": "Movement RiNo", "type": "GYM", "latitude": 39.77, "longitude": -104.98,
          "website": "https://example.com/rino", "imageUrl": "https://example.com/rino.jpg" },
        { "name": "Gross Reservoir", "type": "BOULDER", "difficulty": "V4",
          "latitude": 39.95, "longitude": -105.36 }
    ]"#;

    #[test]
    fn test_inline_seed() {
        let mut seed = JsonSeedScraper::from_json_str(SEED);
        let locations = seed.scrape().unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].kind, ClimbingType::Gym);
        assert_eq!(locations[0].image_url.as_deref(), Some("https://example.com/rino.jpg"));
        assert_eq!(locations[1].difficulty, "V4");
        assert_eq!(locations[0].difficulty, "");
    }

    #[test]
    fn test_file_seed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let mut seed = JsonSeedScraper::from_path(file.path());
        assert!(seed.name().starts_with("json-seed:"));
        assert_eq!(seed.scrape().unwrap().len(), 2);
    }

    #[test]
    fn test_bad_input_is_an_error() {
        assert!(JsonSeedScraper::from_json_str("{ not json").scrape().is_err());
        assert!(
            JsonSeedScraper::from_json_str(r#"[{ "name": "x", "type": "TRAD", "latitude": 0, "longitude": 0 }]"#)
                .scrape()
                .is_err()
        );
        assert!(JsonSeedScraper::from_path("/nonexistent/seed.json").scrape().is_err());
    }
}
