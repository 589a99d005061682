use std::collections::BTreeSet;

use crate::model::{Rejection, Stage};

/// Declared types accepted when nothing else is configured.
pub const DEFAULT_ALLOWED_MEDIA_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
];

pub fn default_allowed_media_types() -> BTreeSet<String> {
    DEFAULT_ALLOWED_MEDIA_TYPES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Canonical form of a media type: trimmed, lower-case, parameters dropped.
///
/// `"Image/PNG; charset=binary"` becomes `"image/png"`.
pub fn normalize_media_type(media_type: &str) -> String {
    let essence = media_type.split(';').next().unwrap_or_default();
    essence.trim().to_ascii_lowercase()
}

/// Reject declared types that are not on the allow-list.
pub fn check_declared_type(declared: &str, allowed: &BTreeSet<String>) -> Result<(), Rejection> {
    let declared = normalize_media_type(declared);
    let permitted = allowed.iter().any(|a| normalize_media_type(a) == declared);
    if permitted {
        return Ok(());
    }

    let accepted = allowed
        .iter()
        .map(|a| normalize_media_type(a))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join(", ");
    let shown = if declared.is_empty() { "(none)" } else { declared.as_str() };
    Err(Rejection::new(
        Stage::DeclaredType,
        format!("File type '{shown}' is not allowed. Accepted types: {accepted}"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_whitespace_and_parameters() {
        assert_eq!(normalize_media_type(" Image/PNG "), "image/png");
        assert_eq!(normalize_media_type("text/plain; charset=utf-8"), "text/plain");
        assert_eq!(normalize_media_type(""), "");
    }

    #[test]
    fn default_set_accepts_common_images_and_pdf() {
        let allowed = default_allowed_media_types();
        for t in ["image/jpeg", "image/png", "image/gif", "image/webp", "application/pdf"] {
            assert!(check_declared_type(t, &allowed).is_ok(), "{t}");
        }
        assert!(check_declared_type("IMAGE/PNG", &allowed).is_ok());
    }

    #[test]
    fn rejection_lists_accepted_types() {
        let allowed = default_allowed_media_types();
        let err = check_declared_type("application/x-msdownload", &allowed).unwrap_err();
        assert_eq!(err.stage, Stage::DeclaredType);
        assert!(err.message.contains("application/x-msdownload"));
        assert!(err
            .message
            .ends_with("application/pdf, image/gif, image/jpeg, image/png, image/webp"));
    }

    #[test]
    fn custom_allow_list_replaces_defaults() {
        let allowed: BTreeSet<String> = ["text/csv".to_string()].into_iter().collect();
        assert!(check_declared_type("text/csv", &allowed).is_ok());
        assert!(check_declared_type("image/png", &allowed).is_err());
    }
}
