//! Pattern-based place-name extraction

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::domain::geocoding::LocationExtractor;
use crate::domain::DomainError;

/// Tried in order; the first surviving match wins
static LOCATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"in\s+[A-Z][a-zA-Z\s,]+",
        r"at\s+[A-Z][a-zA-Z\s,]+",
        r"near\s+[A-Z][a-zA-Z\s,]+",
        r"[A-Z][a-zA-Z\s]+,\s*[A-Z]{2,}",
        r"[A-Z][a-zA-Z\s]+\s+[A-Z][a-zA-Z\s]+",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static LEADING_PREPOSITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(in|at|near)\s+").unwrap());

/// Stand-in for the AI extraction service
#[derive(Debug, Default, Clone)]
pub struct PatternLocationExtractor;

impl PatternLocationExtractor {
    pub fn new() -> Self {
        Self
    }

    fn first_location(description: &str) -> Option<String> {
        LOCATION_PATTERNS
            .iter()
            .flat_map(|pattern| pattern.find_iter(description))
            .map(|m| {
                LEADING_PREPOSITION
                    .replace(m.as_str(), "")
                    .trim()
                    .to_string()
            })
            .find(|candidate| candidate.len() > 2)
    }
}

#[async_trait]
impl LocationExtractor for PatternLocationExtractor {
    async fn extract(&self, description: &str) -> Result<Option<String>, DomainError> {
        let location = Self::first_location(description);
        debug!(found = location.is_some(), "Location extraction finished");
        Ok(location)
    }
}
