use crate::{error::ExtractError, types::profile::UserPreferenceProfile};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::sync::OnceLock;

const MAX_SCHEMA_ERRORS: usize = 3;
const PROFILE_SCHEMA_NAME: &str = "UserPreferenceProfile";

/// JSON schema for [`UserPreferenceProfile`], generated once.
pub fn profile_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let root = schemars::schema_for!(UserPreferenceProfile);
        serde_json::to_value(root).unwrap_or(Value::Bool(true))
    })
}

/// Validate a preference profile payload before it is decoded.
pub fn validate_profile_payload(payload: &Value) -> std::result::Result<(), ExtractError> {
    let validator = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(profile_schema())
        .map_err(|err| {
            ExtractError::Validation(format!(
                "Failed to prepare `{}` schema for validation: {}",
                PROFILE_SCHEMA_NAME, err
            ))
        })?;

    if let Err(errors) = validator.validate(payload) {
        let mut details = Vec::new();
        let mut truncated = false;

        for (idx, error) in errors.enumerate() {
            if idx < MAX_SCHEMA_ERRORS {
                let mut path = error.instance_path.to_string();
                if path.is_empty() {
                    path = "<root>".to_string();
                }
                details.push(format!("{}: {}", path, error));
            } else {
                truncated = true;
                break;
            }
        }

        let mut detail_str = if details.is_empty() {
            "profile failed schema validation".to_string()
        } else {
            details.join("; ")
        };

        if truncated {
            detail_str.push_str("; additional errors truncated");
        }

        return Err(ExtractError::Validation(format!(
            "Payload does not match `{}` schema: {}",
            PROFILE_SCHEMA_NAME, detail_str
        )));
    }

    Ok(())
}
