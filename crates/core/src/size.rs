use crate::model::{Rejection, Stage};

/// Ceiling applied when neither the request nor the config sets one.
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Files below this size are accepted with a warning.
pub const DEFAULT_SMALL_FILE_FLOOR_BYTES: u64 = 100;

/// Render a byte count for humans (`512 B`, `1.5 KB`, `10.0 MB`).
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

pub fn check_size(actual: u64, ceiling: u64) -> Result<(), Rejection> {
    if actual > ceiling {
        return Err(Rejection::new(
            Stage::Size,
            format!(
                "File size {} exceeds the maximum allowed size of {}",
                format_bytes(actual),
                format_bytes(ceiling)
            ),
        ));
    }
    Ok(())
}

/// Advisory for suspiciously small files; never rejects.
pub fn small_file_warning(actual: u64, floor: u64) -> Option<String> {
    (actual < floor).then(|| {
        format!(
            "File is very small ({}); unusually small files are possibly empty",
            format_bytes(actual)
        )
    })
}
