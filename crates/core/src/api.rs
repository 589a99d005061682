//! JSON bodies exchanged with upload clients.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::model::{ContentSample, SecurityLevel, ValidationRequest, ValidationVerdict};

/// Standard alphabet; padding optional on decode since clients trimming a
/// prefix do not always re-pad.
const CONTENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Validation request as sent over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidateFileRequest {
    pub file_name: String,
    /// Declared size of the whole file, in bytes.
    pub file_size: u64,
    pub mime_type: String,
    /// Base64 of the file's leading bytes, optionally as a `data:` URL.
    pub file_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size_bytes: Option<u64>,
}

/// Validation verdict as returned over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidateFileResponse {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub security_level: SecurityLevel,
}

/// Decode a transport-encoded content sample.
///
/// Never fails: undecodable input is reported as
/// [`ContentSample::Undecodable`] so the validator can downgrade it to a
/// warning.
pub fn decode_content_sample(encoded: &str) -> ContentSample {
    let payload = match encoded.strip_prefix("data:") {
        Some(rest) => match rest.split_once(";base64,") {
            Some((_, data)) => data,
            None => {
                return ContentSample::Undecodable(
                    "content sample is a data URL without base64 encoding".to_string(),
                )
            }
        },
        None => encoded,
    };

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    match CONTENT_ENGINE.decode(compact.as_bytes()) {
        Ok(bytes) => ContentSample::Bytes(bytes),
        Err(e) => ContentSample::Undecodable(format!("content sample is not valid base64 ({e})")),
    }
}

impl From<ValidateFileRequest> for ValidationRequest {
    fn from(req: ValidateFileRequest) -> Self {
        Self {
            content_sample: decode_content_sample(&req.file_content),
            file_name: req.file_name,
            file_size_bytes: req.file_size,
            declared_media_type: req.mime_type,
            allowed_media_types: req.allowed_types.map(|t| t.into_iter().collect()),
            max_size_bytes: req.max_size_bytes,
        }
    }
}

impl From<ValidationVerdict> for ValidateFileResponse {
    fn from(v: ValidationVerdict) -> Self {
        Self {
            is_valid: v.is_valid,
            error: v.error_message,
            warnings: v.warnings,
            security_level: v.security_level,
        }
    }
}

impl ValidateFileResponse {
    /// Danger response for a body that never became a [`ValidationRequest`].
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(reason.into()),
            warnings: vec![],
            security_level: SecurityLevel::Danger,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_and_data_url_base64() {
        assert_eq!(
            decode_content_sample("JVBERi0xLjQ="),
            ContentSample::Bytes(b"%PDF-1.4".to_vec())
        );
        assert_eq!(
            decode_content_sample("data:application/pdf;base64,JVBERi0xLjQ="),
            ContentSample::Bytes(b"%PDF-1.4".to_vec())
        );
    }

    #[test]
    fn tolerates_missing_padding_and_line_breaks() {
        assert_eq!(
            decode_content_sample("JVBE\nRi0xLjQ"),
            ContentSample::Bytes(b"%PDF-1.4".to_vec())
        );
    }

    #[test]
    fn garbage_is_undecodable_not_an_error() {
        assert!(matches!(
            decode_content_sample("!!not base64!!"),
            ContentSample::Undecodable(_)
        ));
        assert!(matches!(
            decode_content_sample("data:text/plain,hello"),
            ContentSample::Undecodable(_)
        ));
    }

    #[test]
    fn empty_content_decodes_to_empty_sample() {
        assert_eq!(decode_content_sample(""), ContentSample::Bytes(vec![]));
    }
}
