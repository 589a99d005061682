use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Coarse severity attached to every verdict.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    /// Nothing suspicious found.
    Safe,
    /// Accepted, but with non-blocking notices.
    Warning,
    /// Rejected.
    Danger,
}

/// Pipeline stage that produced a rejection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Denylisted file extension.
    Extension,
    /// Declared size above the ceiling.
    Size,
    /// Declared media type not on the allow-list.
    DeclaredType,
    /// Content sample does not carry the declared type's magic bytes.
    Signature,
    /// Filename too long or containing forbidden characters.
    Filename,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Extension => "extension",
            Stage::Size => "size",
            Stage::DeclaredType => "declared_type",
            Stage::Signature => "signature",
            Stage::Filename => "filename",
        }
    }
}

/// Terminal state of a single validation.
///
/// Every request starts out pending and ends in exactly one of these.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    /// Accepted with the given level (`Safe` or `Warning`).
    Accepted(SecurityLevel),
    /// Rejected by a caller-correctable check.
    Rejected(Stage),
    /// An internal fault was caught at the validator boundary.
    Faulted,
}

/// Content prefix supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSample {
    /// Decoded leading bytes of the file.
    Bytes(Vec<u8>),
    /// The transport encoding could not be decoded; carries the reason.
    Undecodable(String),
}

impl From<Vec<u8>> for ContentSample {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for ContentSample {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

/// One upload about to be stored.
///
/// Everything in here comes from an untrusted caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    pub file_name: String,
    pub file_size_bytes: u64,
    pub declared_media_type: String,
    pub content_sample: ContentSample,

    /// Per-call allow-list override. `None` uses the configured default set.
    pub allowed_media_types: Option<BTreeSet<String>>,

    /// Per-call size ceiling override. `None` uses the configured default.
    pub max_size_bytes: Option<u64>,
}

impl ValidationRequest {
    pub fn new(
        file_name: impl Into<String>,
        file_size_bytes: u64,
        declared_media_type: impl Into<String>,
        content_sample: impl Into<ContentSample>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            file_size_bytes,
            declared_media_type: declared_media_type.into(),
            content_sample: content_sample.into(),
            allowed_media_types: None,
            max_size_bytes: None,
        }
    }

    pub fn with_allowed_media_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_media_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_size_bytes(mut self, max: u64) -> Self {
        self.max_size_bytes = Some(max);
        self
    }
}

/// A check's reason for refusing an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub stage: Stage,
    pub message: String,
}

impl Rejection {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

/// The single result of a validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub error_message: Option<String>,
    pub warnings: Vec<String>,
    pub security_level: SecurityLevel,
    pub outcome: Outcome,
}

impl ValidationVerdict {
    pub fn safe() -> Self {
        Self {
            is_valid: true,
            error_message: None,
            warnings: vec![],
            security_level: SecurityLevel::Safe,
            outcome: Outcome::Accepted(SecurityLevel::Safe),
        }
    }

    /// Add a non-fatal notice, downgrading `Safe` to `Warning`.
    pub fn warn(mut self, msg: impl Into<String>) -> Self {
        if self.is_valid {
            self.security_level = SecurityLevel::Warning;
            self.outcome = Outcome::Accepted(SecurityLevel::Warning);
            self.warnings.push(msg.into());
        }
        self
    }

    /// Rejected verdicts carry no warnings.
    pub fn rejected(rejection: Rejection) -> Self {
        Self {
            is_valid: false,
            error_message: Some(rejection.message),
            warnings: vec![],
            security_level: SecurityLevel::Danger,
            outcome: Outcome::Rejected(rejection.stage),
        }
    }

    pub fn faulted(description: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error_message: Some(description.into()),
            warnings: vec![],
            security_level: SecurityLevel::Danger,
            outcome: Outcome::Faulted,
        }
    }
}
