use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::media_type::default_allowed_media_types;
use crate::size::{DEFAULT_MAX_SIZE_BYTES, DEFAULT_SMALL_FILE_FLOOR_BYTES};

/// What to do with a declared type the signature registry does not know.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnregisteredTypePolicy {
    /// Accept, flagged with a "could not be verified" warning.
    #[default]
    Warn,
    /// Reject as a signature failure.
    Reject,
}

/// Validator defaults. Per-request overrides take precedence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Size ceiling when the request does not carry one.
    pub max_size_bytes: u64,
    /// Below this, accepted files get a "very small" warning.
    pub small_file_floor_bytes: u64,
    /// Allow-list when the request does not carry one.
    pub allowed_media_types: BTreeSet<String>,
    pub unregistered_types: UnregisteredTypePolicy,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            small_file_floor_bytes: DEFAULT_SMALL_FILE_FLOOR_BYTES,
            allowed_media_types: default_allowed_media_types(),
            unregistered_types: UnregisteredTypePolicy::default(),
        }
    }
}
