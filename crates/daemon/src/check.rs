use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use upload_guard_core::{
    api::ValidateFileResponse, Outcome, ValidationRequest, Validator, ValidatorConfig,
};

/// Bytes read from the start of a local file; covers every registered
/// signature with room to spare.
pub const SAMPLE_LEN: u64 = 512;

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Declared media type; guessed from the extension when absent.
    pub mime: Option<String>,
    pub max_size_bytes: Option<u64>,
    pub allowed_types: Vec<String>,
}

/// Build the request an upload of `path` would produce.
pub fn request_for_file(path: &Path, opts: &CheckOptions) -> Result<ValidationRequest> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let size = file
        .metadata()
        .with_context(|| format!("stat {}", path.display()))?
        .len();

    let mut sample = Vec::with_capacity(SAMPLE_LEN as usize);
    file.take(SAMPLE_LEN)
        .read_to_end(&mut sample)
        .with_context(|| format!("read {}", path.display()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = match &opts.mime {
        Some(m) => m.clone(),
        None => mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    };

    let mut req = ValidationRequest::new(file_name, size, mime, sample);
    if !opts.allowed_types.is_empty() {
        req = req.with_allowed_media_types(opts.allowed_types.iter().cloned());
    }
    if let Some(max) = opts.max_size_bytes {
        req = req.with_max_size_bytes(max);
    }
    Ok(req)
}

/// Validate a local file, print the verdict as JSON and map it to an exit code.
pub fn run(path: &Path, opts: &CheckOptions, config: ValidatorConfig) -> Result<ExitCode> {
    let req = request_for_file(path, opts)?;
    let verdict = Validator::new(config).validate(&req);
    let code = ExitCode::from(exit_status(verdict.outcome));

    let resp = ValidateFileResponse::from(verdict);
    println!("{}", serde_json::to_string_pretty(&resp)?);
    Ok(code)
}

fn exit_status(outcome: Outcome) -> u8 {
    match outcome {
        Outcome::Accepted(_) => 0,
        Outcome::Rejected(_) => 1,
        Outcome::Faulted => 2,
    }
}
