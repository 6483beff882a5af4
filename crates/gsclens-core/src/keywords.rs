use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Keyword lists used to segment queries.
///
/// `brand` drives the branded / non-branded split; `competitors` drives the
/// competitor keyword report. Both default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KeywordSets {
    #[serde(default)]
    pub brand: Vec<String>,
    #[serde(default)]
    pub competitors: Vec<String>,
}

/// Load and validate keyword sets from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_keywords(path: &Path) -> Result<KeywordSets, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::KeywordsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_keywords(&content)
}

/// Parse and validate keyword sets from YAML text.
///
/// Entries are trimmed before validation.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_keywords(content: &str) -> Result<KeywordSets, ConfigError> {
    let raw: KeywordSets = serde_yaml::from_str(content)?;
    let sets = KeywordSets {
        brand: raw.brand.iter().map(|k| k.trim().to_string()).collect(),
        competitors: raw.competitors.iter().map(|k| k.trim().to_string()).collect(),
    };
    validate_list("brand", &sets.brand)?;
    validate_list("competitors", &sets.competitors)?;
    Ok(sets)
}

fn validate_list(list: &str, keywords: &[String]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for keyword in keywords {
        if keyword.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{list} keywords must be non-empty"
            )));
        }
        if !seen.insert(keyword.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate {list} keyword: '{keyword}'"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "keywords_test.rs"]
mod tests;
