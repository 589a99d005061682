use thiserror::Error;

/// Internal faults raised inside the validation pipeline.
///
/// None of these are the caller's fault; the validator converts them into a
/// danger verdict instead of returning them.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("signature range for {media_type} overflows (offset {offset}, length {len})")]
    SignatureRange {
        media_type: String,
        offset: usize,
        len: usize,
    },
    #[error("signature entry for {0} has an empty magic byte sequence")]
    InvalidRegistryEntry(String),
    #[error("validator panicked: {0}")]
    Panicked(String),
}
