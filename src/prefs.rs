//! UI state that outlives a session: the current rating filter and whatever
//! was left in the input line. Stored as a small JSON file next to the
//! database rather than in the joke table.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::RatingFilter;

/// State the controller reads and updates on every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(with = "filter_code", default)]
    pub filter: RatingFilter,
    #[serde(rename = "jokeText", default)]
    pub draft: String,
}

impl ViewState {
    /// Load saved state, falling back to defaults when nothing was saved yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no saved view state");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }
        let raw = serde_json::to_string_pretty(self).context("failed to encode view state")?;
        fs::write(path, raw).with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Filters are persisted by their integer code.
mod filter_code {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::models::RatingFilter;

    pub fn serialize<S: Serializer>(filter: &RatingFilter, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(filter.code())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RatingFilter, D::Error> {
        let code = i64::deserialize(deserializer)?;
        RatingFilter::from_code(code)
            .ok_or_else(|| D::Error::custom(format!("unknown rating filter {code}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let state = ViewState::load(&dir.path().join("preferences.json")).unwrap();
        assert_eq!(state.filter, RatingFilter::ShowAll);
        assert!(state.draft.is_empty());
    }

    #[test]
    fn saved_state_is_restored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");
        let state = ViewState {
            filter: RatingFilter::Only(Rating::Disliked),
            draft: "half a joke".to_string(),
        };

        state.save(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"jokeText\""));
        assert!(raw.contains("\"filter\": 2"));
        assert_eq!(ViewState::load(&path).unwrap(), state);
    }

    #[test]
    fn unknown_filter_code_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{"filter": 9, "jokeText": ""}"#).unwrap();
        assert!(ViewState::load(&path).is_err());
    }

    #[test]
    fn absent_keys_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{"jokeText": "draft"}"#).unwrap();
        let state = ViewState::load(&path).unwrap();
        assert_eq!(state.filter, RatingFilter::ShowAll);
        assert_eq!(state.draft, "draft");
    }
}
