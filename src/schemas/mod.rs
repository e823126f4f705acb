//! JSON schema generation and validation for caller-supplied payloads

pub mod validation;

pub use validation::{profile_schema, validate_profile_payload};
