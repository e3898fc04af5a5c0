//! Cleaning options: which stages of the pipeline are enabled

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CleanError, Result};

/// Flag names accepted in an options payload
pub const OPTION_FLAGS: [&str; 4] = [
    "removeMissingValues",
    "removeDuplicates",
    "handleOutliers",
    "normalizeData",
];

/// Stage toggles. Unspecified flags default to disabled.
///
/// The order in which enabled stages run is fixed by the pipeline, not by
/// these flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CleaningOptions {
    pub remove_missing_values: bool,
    pub remove_duplicates: bool,
    pub handle_outliers: bool,
    pub normalize_data: bool,
}

impl CleaningOptions {
    /// All four stages enabled
    pub fn all() -> Self {
        Self {
            remove_missing_values: true,
            remove_duplicates: true,
            handle_outliers: true,
            normalize_data: true,
        }
    }

    pub fn any_enabled(&self) -> bool {
        self.remove_missing_values
            || self.remove_duplicates
            || self.handle_outliers
            || self.normalize_data
    }

    /// Parse an options payload such as `{"removeDuplicates": true}`.
    ///
    /// `{}` is valid and disables everything. A payload that is not a JSON
    /// object, gives a recognized flag a non-boolean value, or is non-empty
    /// without naming any recognized flag is rejected.
    pub fn from_json(payload: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(payload).map_err(|e| {
            CleanError::InvalidConfiguration(format!("options are not valid JSON: {}", e))
        })?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            CleanError::InvalidConfiguration("options must be a JSON object".to_string())
        })?;

        let mut recognized = 0;
        for (key, flag) in object {
            if OPTION_FLAGS.contains(&key.as_str()) {
                if !flag.is_boolean() {
                    return Err(CleanError::InvalidConfiguration(format!(
                        "option '{}' must be a boolean, got {}",
                        key, flag
                    )));
                }
                recognized += 1;
            } else {
                tracing::warn!(option = %key, "ignoring unknown cleaning option");
            }
        }

        if !object.is_empty() && recognized == 0 {
            return Err(CleanError::InvalidConfiguration(format!(
                "no recognized option in payload; expected one of {}",
                OPTION_FLAGS.join(", ")
            )));
        }

        serde_json::from_value(value.clone())
            .map_err(|e| CleanError::InvalidConfiguration(e.to_string()))
    }

    /// Load options from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let payload = std::fs::read_to_string(path)?;
        Self::from_json(&payload)
    }

    /// Enable every stage that is enabled in `other`
    pub fn merge(self, other: CleaningOptions) -> Self {
        Self {
            remove_missing_values: self.remove_missing_values || other.remove_missing_values,
            remove_duplicates: self.remove_duplicates || other.remove_duplicates,
            handle_outliers: self.handle_outliers || other.handle_outliers,
            normalize_data: self.normalize_data || other.normalize_data,
        }
    }
}
