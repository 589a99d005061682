use proptest::prelude::*;
use upload_guard_core::{
    validate, Outcome, SecurityLevel, SignatureRegistry, Stage, ValidationRequest,
};

const BLOCKED: &[&str] = &["exe", "bat", "sh", "ps1", "jar", "apk", "msi", "vbs", "php", "dmg"];
const REGISTERED_ALLOWED: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp", "application/pdf"];

fn random_case(s: &str, mask: u64) -> String {
    s.chars()
        .enumerate()
        .map(|(i, c)| {
            if (mask >> (i % 64)) & 1 == 1 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

/// A sample that carries the registry signature for `media_type`.
fn genuine_sample(media_type: &str, tail: &[u8]) -> Vec<u8> {
    let entry = SignatureRegistry::builtin().lookup(media_type).unwrap();
    let mut sample = vec![0u8; entry.offset];
    sample.extend_from_slice(entry.magic);
    sample.extend_from_slice(tail);
    sample
}

proptest! {
    #[test]
    fn denylisted_extension_always_rejected(
        stem in "[a-z0-9_-]{1,20}",
        ext_idx in 0..BLOCKED.len(),
        mask in any::<u64>(),
        size in any::<u64>(),
        mime in "[a-z]{1,8}/[a-z]{1,8}",
        sample in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let name = format!("{stem}.{}", random_case(BLOCKED[ext_idx], mask));
        let out = validate(&ValidationRequest::new(name, size, mime, sample));
        prop_assert!(!out.is_valid);
        prop_assert_eq!(out.security_level, SecurityLevel::Danger);
        prop_assert_eq!(out.outcome, Outcome::Rejected(Stage::Extension));
    }

    #[test]
    fn oversized_always_rejected(
        ceiling in 0u64..1_000_000,
        excess in 1u64..1_000_000,
        type_idx in 0..REGISTERED_ALLOWED.len(),
    ) {
        let mime = REGISTERED_ALLOWED[type_idx];
        let req = ValidationRequest::new("file.dat", ceiling + excess, mime, genuine_sample(mime, b""))
            .with_max_size_bytes(ceiling);
        let out = validate(&req);
        prop_assert!(!out.is_valid);
        prop_assert_eq!(out.outcome, Outcome::Rejected(Stage::Size));
    }

    #[test]
    fn wrong_magic_always_rejected(
        type_idx in 0..REGISTERED_ALLOWED.len(),
        sample in proptest::collection::vec(any::<u8>(), 0..64),
        size in 100u64..1_000_000,
    ) {
        let mime = REGISTERED_ALLOWED[type_idx];
        let entry = SignatureRegistry::builtin().lookup(mime).unwrap();
        let end = entry.offset + entry.magic.len();
        prop_assume!(sample.get(entry.offset..end) != Some(entry.magic));

        let out = validate(&ValidationRequest::new("upload.dat", size, mime, sample));
        prop_assert!(!out.is_valid);
        prop_assert_eq!(out.outcome, Outcome::Rejected(Stage::Signature));
        prop_assert!(out.error_message.unwrap().contains("does not match"));
    }

    #[test]
    fn genuine_content_always_accepted(
        type_idx in 0..REGISTERED_ALLOWED.len(),
        stem in "[A-Za-z0-9 _-]{1,40}",
        tail in proptest::collection::vec(any::<u8>(), 0..64),
        size in 0u64..=10 * 1024 * 1024,
    ) {
        let mime = REGISTERED_ALLOWED[type_idx];
        let req = ValidationRequest::new(format!("{stem}.dat"), size, mime, genuine_sample(mime, &tail));
        let out = validate(&req);
        prop_assert!(out.is_valid);
        prop_assert!(out.error_message.is_none());
        prop_assert_ne!(out.security_level, SecurityLevel::Danger);
        prop_assert_eq!(out.warnings.is_empty(), out.security_level == SecurityLevel::Safe);
    }

    #[test]
    fn validation_is_idempotent(
        name in "\\PC{0,40}",
        size in any::<u64>(),
        mime in "(image/png|application/pdf|text/plain)",
        sample in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let req = ValidationRequest::new(name, size, mime, sample);
        prop_assert_eq!(validate(&req), validate(&req));
    }

    #[test]
    fn danger_iff_invalid(
        name in "\\PC{0,300}",
        size in any::<u64>(),
        mime in "(image/png|image/jpeg|application/pdf|text/csv)",
        sample in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let out = validate(&ValidationRequest::new(name, size, mime, sample));
        prop_assert_eq!(out.security_level == SecurityLevel::Danger, !out.is_valid);
        if !out.warnings.is_empty() {
            prop_assert!(out.is_valid);
            prop_assert_eq!(out.security_level, SecurityLevel::Warning);
        }
    }
}
