//! # Filter Settings
//!
//! Every knob the filters read at request time: the namespace prefix of each filter's query
//! parameters, the placeholders shown in the sidebar, the price scale, how numbers are
//! localized and the change-list page size.
//!
//! All fields have defaults, so an empty TOML document is a valid configuration. Unknown keys
//! and sections are rejected:
//!
//! ```toml
//! list_per_page = 50
//!
//! [price]
//! prefix = "prf__"
//! scale = 100
//!
//! [number_format]
//! use_thousand_separator = true
//! thousand_separator = "."
//! decimal_separator = ","
//! ```

use serde::Deserialize;
use std::path::Path;

/// Errors raised while loading [`FilterSettings`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Settings shared by every list filter of an admin site
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSettings {
    pub integer: RangeFilterSettings,
    pub price: PriceFilterSettings,
    pub string: StringFilterSettings,
    pub number_format: NumberFormat,
    /// Rows shown per change-list page
    pub list_per_page: u64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            integer: RangeFilterSettings::default(),
            price: PriceFilterSettings::default(),
            string: StringFilterSettings::default(),
            number_format: NumberFormat::default(),
            list_per_page: 100,
        }
    }
}

impl FilterSettings {
    /// Parse and validate settings from a TOML document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed TOML and [`ConfigError::Invalid`] when the
    /// values are inconsistent (see [`FilterSettings::validate`]).
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise the same errors as
    /// [`FilterSettings::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded filter settings");
        Ok(settings)
    }

    /// Check the invariants the filters rely on.
    ///
    /// Prefixes must be non-empty and pairwise distinct, otherwise two filters would claim the
    /// same query parameters.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] describing the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefixes = [
            ("integer", self.integer.prefix.as_str()),
            ("price", self.price.prefix.as_str()),
            ("string", self.string.prefix.as_str()),
        ];

        for (name, prefix) in prefixes {
            if prefix.is_empty() {
                return Err(ConfigError::Invalid(format!("{name} prefix must not be empty")));
            }
        }
        for (i, (name, prefix)) in prefixes.iter().enumerate() {
            if let Some((other, _)) = prefixes[i + 1..].iter().find(|(_, p)| p == prefix) {
                return Err(ConfigError::Invalid(format!(
                    "{name} and {other} filters share the prefix '{prefix}'"
                )));
            }
        }
        if self.price.scale <= 0.0 || !self.price.scale.is_finite() {
            return Err(ConfigError::Invalid(
                "price scale must be a positive number".to_string(),
            ));
        }
        if self.string.separator.is_empty() {
            return Err(ConfigError::Invalid(
                "string separator must not be empty".to_string(),
            ));
        }
        if self.list_per_page == 0 {
            return Err(ConfigError::Invalid(
                "list_per_page must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Prefix and placeholders of the integer range filter
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RangeFilterSettings {
    pub prefix: String,
    pub from_placeholder: String,
    pub to_placeholder: String,
}

impl Default for RangeFilterSettings {
    fn default() -> Self {
        Self {
            prefix: "irf__".to_string(),
            from_placeholder: "From".to_string(),
            to_placeholder: "To".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PriceFilterSettings {
    pub prefix: String,
    pub from_placeholder: String,
    pub to_placeholder: String,
    /// Minor units per major unit; prices are stored as `value * scale`
    pub scale: f64,
}

impl Default for PriceFilterSettings {
    fn default() -> Self {
        Self {
            prefix: "prf__".to_string(),
            from_placeholder: "From".to_string(),
            to_placeholder: "To".to_string(),
            scale: 100.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StringFilterSettings {
    pub prefix: String,
    pub placeholder: String,
    /// Splits the submitted value into entries
    pub separator: String,
}

impl Default for StringFilterSettings {
    fn default() -> Self {
        Self {
            prefix: "sf__".to_string(),
            placeholder: "split entries by commas".to_string(),
            separator: ",".to_string(),
        }
    }
}

/// How localized numeric input is read
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NumberFormat {
    pub localize: bool,
    pub decimal_separator: String,
    pub thousand_separator: String,
    pub use_thousand_separator: bool,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            localize: true,
            decimal_separator: ".".to_string(),
            thousand_separator: ",".to_string(),
            use_thousand_separator: false,
        }
    }
}

impl NumberFormat {
    /// Normalize a localized number to the `1234.5` form `str::parse` understands
    #[must_use]
    pub fn sanitize_separators(&self, value: &str) -> String {
        let mut value = value.trim().to_string();
        if self.use_thousand_separator && !self.thousand_separator.is_empty() {
            value = value.replace(&self.thousand_separator, "");
        }
        if self.decimal_separator != "." && !self.decimal_separator.is_empty() {
            value = value.replace(&self.decimal_separator, ".");
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = FilterSettings::from_toml_str("").unwrap();
        assert_eq!(settings, FilterSettings::default());
        assert_eq!(settings.integer.prefix, "irf__");
        assert_eq!(settings.price.prefix, "prf__");
        assert_eq!(settings.string.prefix, "sf__");
        assert_eq!(settings.list_per_page, 100);
    }

    #[test]
    fn test_partial_override() {
        let settings = FilterSettings::from_toml_str(
            r#"
            list_per_page = 25

            [string]
            separator = ";"
            "#,
        )
        .unwrap();
        assert_eq!(settings.list_per_page, 25);
        assert_eq!(settings.string.separator, ";");
        assert_eq!(settings.string.prefix, "sf__");
    }

    #[test]
    fn test_duplicate_prefix_rejected() {
        let err = FilterSettings::from_toml_str(
            r#"
            [price]
            prefix = "irf__"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("integer and price"));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let err = FilterSettings::from_toml_str("[string]\nprefix = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_non_positive_scale_rejected() {
        let err = FilterSettings::from_toml_str("[price]\nscale = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = FilterSettings::from_toml_str("list_per_page = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_sanitize_separators() {
        let format = NumberFormat {
            localize: true,
            decimal_separator: ",".to_string(),
            thousand_separator: ".".to_string(),
            use_thousand_separator: true,
        };
        assert_eq!(format.sanitize_separators(" 1.234,50 "), "1234.50");
        assert_eq!(NumberFormat::default().sanitize_separators("1,234"), "1,234");
    }

    #[test]
    fn test_unknown_section_rejected() {
        let err = FilterSettings::from_toml_str("[strings]\nseparator = \";\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("strings"), "{err}");

        let err = FilterSettings::from_toml_str("[price]\nscal = 1000").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            list_per_page = 3

            [number_format]
            decimal_separator = ","
            thousand_separator = "."
            use_thousand_separator = true
            "#
        )
        .unwrap();

        let settings = FilterSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.list_per_page, 3);
        assert_eq!(settings.number_format.decimal_separator, ",");
        assert!(settings.number_format.use_thousand_separator);
        assert_eq!(settings.number_format.sanitize_separators("1.019,50"), "1019.50");
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FilterSettings::from_file(dir.path().join("filters.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
