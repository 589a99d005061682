use crate::model::{Rejection, Stage};

/// Longest accepted filename, in characters.
pub const MAX_FILENAME_CHARS: usize = 255;

const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

fn is_forbidden(c: char) -> bool {
    ('\u{00}'..='\u{1F}').contains(&c) || FORBIDDEN_CHARS.contains(&c)
}

/// Structural checks on the filename string alone.
pub fn check_filename(file_name: &str) -> Result<(), Rejection> {
    let len = file_name.chars().count();
    if len > MAX_FILENAME_CHARS {
        return Err(Rejection::new(
            Stage::Filename,
            format!("Filename too long ({len} characters, maximum {MAX_FILENAME_CHARS})"),
        ));
    }

    if file_name.chars().any(is_forbidden) {
        return Err(Rejection::new(
            Stage::Filename,
            "Filename contains forbidden characters (control characters or any of < > : \" | ? *)",
        ));
    }

    Ok(())
}
