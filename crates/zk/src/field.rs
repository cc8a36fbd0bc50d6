//! Canonical decimal encoding of proving-field elements.
//!
//! Field elements cross every external boundary (JSON, gateway, logs) as
//! decimal strings. Parsing is strict: the string must be the canonical
//! decimal form of an element, so values at or above the modulus are
//! rejected instead of being silently reduced.

use ark_bn254::Fr;
use std::str::FromStr;

use crate::error::GenerationError;

/// Parse the canonical decimal form of a field element.
pub fn parse_field_element(text: &str) -> Result<Fr, GenerationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GenerationError::MalformedInput(format!(
            "not a decimal field element: {text:?}"
        )));
    }

    let value = Fr::from_str(trimmed).map_err(|_| {
        GenerationError::MalformedInput(format!("not a decimal field element: {text:?}"))
    })?;

    // from_str reduces modulo the field order; requiring the round-trip to
    // match catches out-of-field and non-canonical inputs.
    let canonical = trimmed.trim_start_matches('0');
    let canonical = if canonical.is_empty() { "0" } else { canonical };
    if field_to_decimal(&value) != canonical {
        return Err(GenerationError::MalformedInput(format!(
            "value exceeds the proving field modulus: {text:?}"
        )));
    }

    Ok(value)
}

/// Canonical decimal form of a field element.
pub fn field_to_decimal(value: &Fr) -> String {
    value.to_string()
}
