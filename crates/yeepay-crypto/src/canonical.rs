use yeepay_core::{ParameterSet, SIGN_FIELD};

/// Build the signing input for a parameter set.
///
/// The `sign` field is skipped, the remaining values are taken in ascending
/// key order and concatenated with no separator. Keys themselves are not
/// part of the output.
pub fn canonicalize(params: &ParameterSet) -> String {
    // ParameterSet iterates in ascending byte order of its keys.
    params
        .iter()
        .filter(|(key, _)| key.as_str() != SIGN_FIELD)
        .map(|(_, value)| value.to_string())
        .collect()
}
