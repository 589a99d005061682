use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::config::{UnregisteredTypePolicy, ValidatorConfig};
use crate::error::ValidationError;
use crate::extension::check_extension;
use crate::filename::check_filename;
use crate::media_type::{check_declared_type, normalize_media_type};
use crate::model::{ContentSample, Rejection, Stage, ValidationRequest, ValidationVerdict};
use crate::registry::SignatureRegistry;
use crate::signature::{mismatch_rejection, verify_signature, SignatureCheck};
use crate::size::{check_size, small_file_warning};

/// Why the pipeline stopped early.
enum Halt {
    Reject(Rejection),
    Fault(ValidationError),
}

impl From<Rejection> for Halt {
    fn from(value: Rejection) -> Self {
        Self::Reject(value)
    }
}

impl From<ValidationError> for Halt {
    fn from(value: ValidationError) -> Self {
        Self::Fault(value)
    }
}

/// Runs every upload check in order and folds the results into one verdict.
///
/// Order: extension, size, declared type, signature, filename, then the
/// small-size advisory. The first rejection ends the run. Internal faults,
/// including panics, come back as a danger verdict rather than escaping.
///
/// A validator holds no mutable state; one instance can serve any number of
/// threads.
#[derive(Debug, Clone)]
pub struct Validator<'r> {
    registry: &'r SignatureRegistry,
    config: ValidatorConfig,
}

impl Validator<'static> {
    /// Validator over the built-in signature registry.
    pub fn new(config: ValidatorConfig) -> Self {
        Self::with_registry(SignatureRegistry::builtin(), config)
    }
}

impl Default for Validator<'static> {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

impl<'r> Validator<'r> {
    pub fn with_registry(registry: &'r SignatureRegistry, config: ValidatorConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &'r SignatureRegistry {
        self.registry
    }

    /// Decide whether `req` may be stored.
    pub fn validate(&self, req: &ValidationRequest) -> ValidationVerdict {
        let mut warnings = Vec::new();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.run(req, &mut warnings)))
            .unwrap_or_else(|payload| {
                Err(Halt::Fault(ValidationError::Panicked(panic_message(&*payload))))
            });

        match result {
            Ok(()) => {
                let verdict = warnings
                    .into_iter()
                    .fold(ValidationVerdict::safe(), |v, w| v.warn(w));
                debug!(
                    file_name = %req.file_name,
                    level = ?verdict.security_level,
                    warnings = verdict.warnings.len(),
                    "upload accepted"
                );
                verdict
            }
            Err(Halt::Reject(rejection)) => {
                debug!(
                    file_name = %req.file_name,
                    stage = rejection.stage.as_str(),
                    reason = %rejection.message,
                    dropped_warnings = ?warnings,
                    "upload rejected"
                );
                ValidationVerdict::rejected(rejection)
            }
            Err(Halt::Fault(e)) => {
                warn!(file_name = %req.file_name, error = %e, "validation fault");
                ValidationVerdict::faulted(format!("Validation failed due to an internal error: {e}"))
            }
        }
    }

    fn run(&self, req: &ValidationRequest, warnings: &mut Vec<String>) -> Result<(), Halt> {
        check_extension(&req.file_name)?;

        let ceiling = req.max_size_bytes.unwrap_or(self.config.max_size_bytes);
        check_size(req.file_size_bytes, ceiling)?;

        let allowed = req
            .allowed_media_types
            .as_ref()
            .unwrap_or(&self.config.allowed_media_types);
        check_declared_type(&req.declared_media_type, allowed)?;

        let media_type = normalize_media_type(&req.declared_media_type);
        match &req.content_sample {
            ContentSample::Bytes(sample) => {
                match verify_signature(self.registry, &media_type, sample)? {
                    SignatureCheck::Match => {}
                    SignatureCheck::TooShort | SignatureCheck::Mismatch => {
                        return Err(mismatch_rejection(&media_type).into());
                    }
                    SignatureCheck::Unregistered => match self.config.unregistered_types {
                        UnregisteredTypePolicy::Warn => warnings.push(format!(
                            "File signature could not be verified: no signature is registered for '{media_type}'"
                        )),
                        UnregisteredTypePolicy::Reject => {
                            return Err(Rejection::new(
                                Stage::Signature,
                                format!("File type '{media_type}' cannot be verified by content and is not accepted"),
                            )
                            .into());
                        }
                    },
                }
            }
            // Bad transport encoding is not evidence of a malicious file.
            ContentSample::Undecodable(reason) => {
                warnings.push(format!("File signature could not be verified: {reason}"));
            }
        }

        check_filename(&req.file_name)?;

        if let Some(w) = small_file_warning(req.file_size_bytes, self.config.small_file_floor_bytes) {
            warnings.push(w);
        }
        Ok(())
    }
}

/// Validate with the built-in registry and default configuration.
pub fn validate(req: &ValidationRequest) -> ValidationVerdict {
    Validator::default().validate(req)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
