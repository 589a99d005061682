use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Magic bytes a genuine file of `media_type` carries at `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureEntry {
    pub media_type: String,
    pub magic: &'static [u8],
    pub offset: usize,
}

impl SignatureEntry {
    pub fn new(media_type: impl Into<String>, magic: &'static [u8], offset: usize) -> Self {
        Self {
            media_type: media_type.into(),
            magic,
            offset,
        }
    }
}

/// ZIP local file header. OOXML documents are ZIP containers and share it.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

static BUILTIN: &[(&str, &[u8], usize)] = &[
    ("image/jpeg", &[0xFF, 0xD8, 0xFF], 0),
    ("image/png", &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A], 0),
    ("image/gif", b"GIF8", 0),
    // RIFF container; the format tag sits after the 4-byte chunk size.
    ("image/webp", b"WEBP", 8),
    ("image/bmp", b"BM", 0),
    ("application/pdf", b"%PDF", 0),
    ("application/zip", ZIP_MAGIC, 0),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ZIP_MAGIC,
        0,
    ),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ZIP_MAGIC,
        0,
    ),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        ZIP_MAGIC,
        0,
    ),
    // ISO BMFF: box size first, then the `ftyp` box type.
    ("video/mp4", b"ftyp", 4),
    ("audio/mpeg", b"ID3", 0),
];

static BUILTIN_REGISTRY: LazyLock<SignatureRegistry> = LazyLock::new(|| {
    SignatureRegistry::from_entries(
        BUILTIN
            .iter()
            .map(|(media_type, magic, offset)| SignatureEntry::new(*media_type, *magic, *offset)),
    )
});

/// Read-only table of known file signatures, keyed by media type.
///
/// Built once and never mutated, so it can be shared between threads without
/// locking. Types missing from the table are not an error: the verifier treats
/// them as unverifiable.
#[derive(Debug, Clone, Default)]
pub struct SignatureRegistry {
    entries: BTreeMap<String, SignatureEntry>,
}

impl SignatureRegistry {
    /// The compiled-in registry.
    pub fn builtin() -> &'static SignatureRegistry {
        &BUILTIN_REGISTRY
    }

    /// Build a registry from explicit entries. A later entry for the same
    /// media type replaces an earlier one.
    pub fn from_entries(entries: impl IntoIterator<Item = SignatureEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| (e.media_type.to_ascii_lowercase(), e))
            .collect();
        Self { entries }
    }

    /// Look up the entry for an already-normalized media type.
    pub fn lookup(&self, media_type: &str) -> Option<&SignatureEntry> {
        self.entries.get(media_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignatureEntry> {
        self.entries.values()
    }

    /// Longest `offset + magic.len()` across all entries; a content sample
    /// this long covers every registered signature.
    pub fn required_sample_len(&self) -> usize {
        self.entries
            .values()
            .map(|e| e.offset.saturating_add(e.magic.len()))
            .max()
            .unwrap_or(0)
    }
}
