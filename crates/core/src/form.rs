//! Form validation helpers shared by every app.
//!
//! Forms are plain structs deriving [`validator::Validate`]; the functions here
//! are the field rules they reference (`custom(function = "...")`) plus the
//! projection of [`validator::ValidationErrors`] into a template/JSON friendly
//! `field -> [message]` map.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

/// Per-field validation messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Flatten `validator` output into [`FieldErrors`].
///
/// Errors without an explicit message fall back to a generic text derived
/// from the rule code.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, errs) in errors.field_errors() {
        for err in errs.iter() {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| default_message(&err.code).to_string());
            out.push(field.to_string(), message);
        }
    }
    out
}

fn default_message(code: &str) -> &'static str {
    match code {
        "required" => "This field is required.",
        "url" => "Invalid URL.",
        "float" => "Not a valid float value.",
        "choice" => "Not a valid choice.",
        "flag" => "Not a valid yes/no value.",
        _ => "Invalid value.",
    }
}

fn rule_error(code: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(default_message(code)));
    err
}

/// Required: present and not blank after trimming.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule_error("required"));
    }
    Ok(())
}

/// Absolute `http`/`https` URL with a host.
pub fn http_url(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        // Presence is `not_blank`'s job.
        return Ok(());
    }
    match url::Url::parse(trimmed) {
        Ok(u) if matches!(u.scheme(), "http" | "https") && u.host_str().is_some_and(|h| !h.is_empty()) => Ok(()),
        _ => Err(rule_error("url")),
    }
}

/// Required + [`http_url`].
pub fn required_url(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    http_url(value)
}

/// Required + [`float_value`].
pub fn required_float(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    float_value(value)
}

/// Finite floating point number.
pub fn float_value(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    match parse_float(trimmed) {
        Some(_) => Ok(()),
        None => Err(rule_error("float")),
    }
}

/// Parse a finite `f64`, rejecting `NaN` and infinities.
pub fn parse_float(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Membership in a closed set of options.
pub fn one_of(value: &str, choices: &[&str]) -> Result<(), ValidationError> {
    if value.is_empty() || choices.contains(&value) {
        return Ok(());
    }
    Err(rule_error("choice"))
}

/// Checkbox-style boolean.
///
/// Absent or empty means `false`. Anything outside the accepted spellings is
/// rejected rather than silently coerced.
pub fn parse_flag(value: Option<&str>) -> Result<bool, ValidationError> {
    let Some(raw) = value else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" | "y" => Ok(true),
        "false" | "0" | "off" | "no" | "n" | "" => Ok(false),
        _ => Err(rule_error("flag")),
    }
}

/// Validator adapter for optional flag fields.
pub fn flag_value(value: &str) -> Result<(), ValidationError> {
    parse_flag(Some(value)).map(|_| ())
}
