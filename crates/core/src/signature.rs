use crate::error::ValidationError;
use crate::model::{Rejection, Stage};
use crate::registry::SignatureRegistry;

/// Result of comparing a content sample against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    /// The sample carries the expected magic bytes.
    Match,
    /// No registry entry for the declared type; nothing to compare against.
    Unregistered,
    /// The sample ends before the signature would.
    TooShort,
    /// Bytes at the signature offset differ.
    Mismatch,
}

impl SignatureCheck {
    /// `TooShort` counts as a failure: a file that cannot even hold its own
    /// signature is itself suspicious.
    pub fn is_failure(&self) -> bool {
        matches!(self, SignatureCheck::TooShort | SignatureCheck::Mismatch)
    }
}

/// Compare `sample` against the registry entry for `media_type`
/// (already normalized).
pub fn verify_signature(
    registry: &SignatureRegistry,
    media_type: &str,
    sample: &[u8],
) -> Result<SignatureCheck, ValidationError> {
    let Some(entry) = registry.lookup(media_type) else {
        return Ok(SignatureCheck::Unregistered);
    };
    if entry.magic.is_empty() {
        return Err(ValidationError::InvalidRegistryEntry(entry.media_type.clone()));
    }

    let end = entry
        .offset
        .checked_add(entry.magic.len())
        .ok_or_else(|| ValidationError::SignatureRange {
            media_type: entry.media_type.clone(),
            offset: entry.offset,
            len: entry.magic.len(),
        })?;

    let Some(window) = sample.get(entry.offset..end) else {
        return Ok(SignatureCheck::TooShort);
    };
    if window == entry.magic {
        Ok(SignatureCheck::Match)
    } else {
        Ok(SignatureCheck::Mismatch)
    }
}

pub fn mismatch_rejection(media_type: &str) -> Rejection {
    Rejection::new(
        Stage::Signature,
        format!(
            "File content does not match the declared type ({media_type}); the file may be corrupted or mislabeled"
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SignatureEntry;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn check(media_type: &str, sample: &[u8]) -> SignatureCheck {
        verify_signature(SignatureRegistry::builtin(), media_type, sample).unwrap()
    }

    #[test]
    fn matches_png_prefix() {
        let mut sample = PNG.to_vec();
        sample.extend_from_slice(b"\0\0\0\rIHDR");
        assert_eq!(check("image/png", &sample), SignatureCheck::Match);
    }

    #[test]
    fn jpeg_bytes_declared_as_png_mismatch() {
        assert_eq!(
            check("image/png", &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F']),
            SignatureCheck::Mismatch
        );
    }

    #[test]
    fn short_sample_is_a_failure() {
        let out = check("image/png", &PNG[..4]);
        assert_eq!(out, SignatureCheck::TooShort);
        assert!(out.is_failure());
        assert_eq!(check("application/pdf", b""), SignatureCheck::TooShort);
    }

    #[test]
    fn honours_offsets() {
        let webp = b"RIFF\x24\0\0\0WEBPVP8 ";
        assert_eq!(check("image/webp", webp), SignatureCheck::Match);
        // `WEBP` at offset 0 is not enough.
        assert_eq!(check("image/webp", b"WEBP\0\0\0\0RIFF"), SignatureCheck::Mismatch);
        assert_eq!(check("video/mp4", b"\0\0\0\x18ftypmp42"), SignatureCheck::Match);
    }

    #[test]
    fn unregistered_type_is_inconclusive() {
        let out = check("text/csv", b"a,b,c\n1,2,3\n");
        assert_eq!(out, SignatureCheck::Unregistered);
        assert!(!out.is_failure());
    }

    #[test]
    fn overflowing_entry_is_an_internal_error() {
        let reg = SignatureRegistry::from_entries([SignatureEntry::new("x/huge", b"AB", usize::MAX)]);
        let err = verify_signature(&reg, "x/huge", b"AB").unwrap_err();
        assert!(matches!(err, ValidationError::SignatureRange { .. }));
    }

    #[test]
    fn empty_magic_is_an_internal_error() {
        let reg = SignatureRegistry::from_entries([SignatureEntry::new("x/empty", b"", 0)]);
        assert!(matches!(
            verify_signature(&reg, "x/empty", b"anything"),
            Err(ValidationError::InvalidRegistryEntry(_))
        ));
    }

    #[test]
    fn mismatch_message_names_declared_type() {
        let r = mismatch_rejection("image/png");
        assert_eq!(r.stage, Stage::Signature);
        assert!(r.message.contains("does not match"));
        assert!(r.message.contains("image/png"));
    }
}
