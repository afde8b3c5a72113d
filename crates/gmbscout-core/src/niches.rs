use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A niche: a named group of directory categories analyzed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicheConfig {
    pub name: String,
    /// Directory category keywords, e.g. `restaurant`, `hair_care`.
    pub categories: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NicheConfig {
    /// Generate a URL-safe slug from the niche name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c
                } else if c == ' ' || c == '-' || c == '_' || c == '&' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Free-text search query for one category within `location`.
    #[must_use]
    pub fn search_query(category: &str, location: &str) -> String {
        format!("{} in {location}", category.replace('_', " "))
    }
}

#[derive(Debug, Deserialize)]
pub struct NichesFile {
    pub niches: Vec<NicheConfig>,
}

impl NichesFile {
    /// Look up a niche by exact name or slug.
    #[must_use]
    pub fn find(&self, name_or_slug: &str) -> Option<&NicheConfig> {
        self.niches
            .iter()
            .find(|n| n.name == name_or_slug || n.slug() == name_or_slug)
    }
}

/// Load and validate the niche definitions from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_niches(path: &Path) -> Result<NichesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::NichesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let niches_file: NichesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::NichesFileParse)?;

    validate_niches(&niches_file)?;

    Ok(niches_file)
}

fn validate_niches(niches_file: &NichesFile) -> Result<(), ConfigError> {
    if niches_file.niches.is_empty() {
        return Err(ConfigError::Validation(
            "at least one niche must be defined".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for niche in &niches_file.niches {
        if niche.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "niche name must be non-empty".to_string(),
            ));
        }

        if niche.categories.iter().all(|c| c.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "niche '{}' must list at least one category",
                niche.name
            )));
        }

        if !seen_names.insert(niche.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate niche name: '{}'",
                niche.name
            )));
        }

        let slug = niche.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate niche slug: '{}' (from niche '{}')",
                slug, niche.name
            )));
        }
    }

    Ok(())
}
