//! Editor configuration
//!
//! Supplied by the hosting form as JSON or a plain JS object. Every field
//! has a default, so `{}` is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult};
use crate::normalize::NormalizerMode;
use crate::undo::DEFAULT_HISTORY_CAPACITY;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of history snapshots
    pub history_capacity: usize,
    /// How loaded content is checked for reversed text
    pub normalizer: NormalizerMode,
    /// Upper bound for table rows and columns
    pub max_table_dimension: usize,
    /// Storage key prefix for uploaded images
    pub image_key_prefix: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            normalizer: NormalizerMode::Off,
            max_table_dimension: 20,
            image_key_prefix: "lesson-images".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: EditorConfig =
            serde_json::from_str(json).map_err(|e| EditorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EditorResult<()> {
        if self.history_capacity == 0 {
            return Err(EditorError::Config(
                "historyCapacity must be at least 1".to_string(),
            ));
        }
        if self.max_table_dimension == 0 {
            return Err(EditorError::Config(
                "maxTableDimension must be at least 1".to_string(),
            ));
        }
        if self.image_key_prefix.trim_matches('/').is_empty() {
            return Err(EditorError::Config(
                "imageKeyPrefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.history_capacity, 100);
    }

    #[test]
    fn test_partial_json() {
        let config =
            EditorConfig::from_json(r#"{"historyCapacity": 5, "normalizer": "detect"}"#).unwrap();
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.normalizer, NormalizerMode::Detect);
        assert_eq!(config.max_table_dimension, 20);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let err = EditorConfig::from_json(r#"{"historyCapacity": 0}"#).unwrap_err();
        assert!(matches!(err, EditorError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(EditorConfig::from_json("{not json").is_err());
    }
}
