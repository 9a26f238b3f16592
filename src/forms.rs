//! # Filter Forms
//!
//! Each list filter declares a small form: one or two optional inputs whose names are the
//! namespaced query parameters. Binding the form to the request's parameters validates every
//! field and yields typed [`CleanedValue`]s the filter turns into query conditions.

use crate::settings::NumberFormat;
use std::collections::BTreeMap;

/// Validation failure of a single form field
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Enter a whole number.")]
    InvalidInteger,

    #[error("Enter a number.")]
    InvalidNumber,

    #[error("This field is required.")]
    Required,

    #[error("Null characters are not allowed.")]
    NullCharacters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Float,
    Text,
}

/// Validated value of a form field
#[derive(Debug, Clone, PartialEq)]
pub enum CleanedValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CleanedValue {
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub kind: FieldKind,
    pub placeholder: String,
    pub localize: bool,
    pub required: bool,
}

impl FormField {
    /// An optional field, which is what every list filter input is
    pub fn optional(name: impl Into<String>, kind: FieldKind, placeholder: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            placeholder: placeholder.into(),
            localize: true,
            required: false,
        }
    }

    #[must_use]
    pub const fn localized(mut self, localize: bool) -> Self {
        self.localize = localize;
        self
    }

    /// Validate the raw input of this field.
    ///
    /// Blank input is `Ok(None)` for optional fields.
    ///
    /// # Errors
    /// Returns the [`FormError`] describing why `raw` is not acceptable.
    pub fn clean(
        &self,
        raw: Option<&str>,
        format: &NumberFormat,
    ) -> Result<Option<CleanedValue>, FormError> {
        let value = raw.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return if self.required {
                Err(FormError::Required)
            } else {
                Ok(None)
            };
        }
        if value.contains('\0') {
            return Err(FormError::NullCharacters);
        }

        let value = if self.localize && format.localize && self.kind != FieldKind::Text {
            format.sanitize_separators(value)
        } else {
            value.to_string()
        };

        match self.kind {
            FieldKind::Integer => parse_integer(&value).map(|v| Some(CleanedValue::Integer(v))),
            FieldKind::Float => parse_float(&value).map(|v| Some(CleanedValue::Float(v))),
            FieldKind::Text => Ok(Some(CleanedValue::Text(value))),
        }
    }
}

/// Whole numbers, tolerating a zero fraction such as `5.00`
fn parse_integer(value: &str) -> Result<i64, FormError> {
    let digits = match value.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return Err(FormError::InvalidInteger),
        None => value,
    };
    digits.parse::<i64>().map_err(|_| FormError::InvalidInteger)
}

fn parse_float(value: &str) -> Result<f64, FormError> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(FormError::InvalidNumber),
    }
}

/// Unbound form definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    fields: Vec<FormField>,
}

impl FilterForm {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    #[must_use]
    pub fn with_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Bind the form to submitted data and validate every field
    #[must_use]
    pub fn bind(self, data: BTreeMap<String, String>, format: &NumberFormat) -> BoundForm {
        let mut cleaned_data = BTreeMap::new();
        let mut errors = BTreeMap::new();

        for field in &self.fields {
            match field.clean(data.get(&field.name).map(String::as_str), format) {
                Ok(Some(value)) => {
                    cleaned_data.insert(field.name.clone(), value);
                }
                Ok(None) => {}
                Err(error) => {
                    errors.insert(field.name.clone(), error);
                }
            }
        }

        BoundForm {
            form: self,
            data,
            cleaned_data,
            errors,
        }
    }
}

/// A form bound to the request's parameters
#[derive(Debug, Clone, PartialEq)]
pub struct BoundForm {
    form: FilterForm,
    data: BTreeMap<String, String>,
    cleaned_data: BTreeMap<String, CleanedValue>,
    errors: BTreeMap<String, FormError>,
}

impl BoundForm {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        self.form.fields()
    }

    /// Raw submitted value, used to re-populate inputs
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.data.get(name).map(String::as_str)
    }

    /// Values of the fields that validated and were not blank
    #[must_use]
    pub const fn cleaned_data(&self) -> &BTreeMap<String, CleanedValue> {
        &self.cleaned_data
    }

    #[must_use]
    pub fn cleaned(&self, name: &str) -> Option<&CleanedValue> {
        self.cleaned_data.get(name)
    }

    #[must_use]
    pub const fn errors(&self) -> &BTreeMap<String, FormError> {
        &self.errors
    }
}
