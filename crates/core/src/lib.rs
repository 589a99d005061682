#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Upload content validation: decides whether an uploaded file may be stored,
//! based on its name, declared size and type, and a sample of its leading
//! bytes.

pub mod api;
pub mod config;
pub mod error;
pub mod extension;
pub mod filename;
pub mod media_type;
pub mod model;
pub mod registry;
pub mod signature;
pub mod size;
pub mod validator;

pub use config::{UnregisteredTypePolicy, ValidatorConfig};
pub use error::ValidationError;
pub use model::{
    ContentSample, Outcome, Rejection, SecurityLevel, Stage, ValidationRequest, ValidationVerdict,
};
pub use registry::{SignatureEntry, SignatureRegistry};
pub use validator::{validate, Validator};
