use crate::error::CoreError;
use crate::types::ParameterSet;

/// Fields every payment request must carry.
pub const REQUIRED_FIELDS: &[&str] = &["orderid", "transtime", "amount", "identityid", "userip", "userua"];

/// Pre-request validation gate.
///
/// Every field in [`REQUIRED_FIELDS`] must be present and truthy (non-empty
/// text, non-zero integer). Fails on the first missing field.
pub fn check_required(params: &ParameterSet) -> Result<(), CoreError> {
    for field in REQUIRED_FIELDS {
        match params.get(field) {
            Some(value) if value.is_truthy() => {}
            _ => return Err(CoreError::MissingField((*field).to_string())),
        }
    }
    Ok(())
}
