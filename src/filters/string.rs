use super::{FilterField, ListFilter};
use crate::forms::{BoundForm, CleanedValue, FieldKind, FilterForm, FormField};
use crate::params::{QueryParams, clean_input_prefix, lookup_param};
use crate::settings::FilterSettings;
use sea_orm::{
    Condition,
    sea_query::{Expr, Func},
};

/// Case-insensitive match against any of several comma separated entries.
///
/// Every entry is bound as a query parameter; `apple, pear` becomes
/// `UPPER(name) = UPPER(?) OR UPPER(name) = UPPER(?)`.
pub struct StringFilter {
    field: FilterField,
    prefix: String,
    separator: String,
    lookup_iexact: String,
    form: BoundForm,
}

impl StringFilter {
    #[must_use]
    pub fn new(field: FilterField, params: &QueryParams, settings: &FilterSettings) -> Self {
        let prefix = settings.string.prefix.clone();
        let lookup_iexact = lookup_param(&prefix, &field.field_path, "iexact");

        let form = FilterForm::new()
            .with_field(FormField::optional(
                &lookup_iexact,
                FieldKind::Text,
                &settings.string.placeholder,
            ))
            .bind(
                params.used_parameters(std::slice::from_ref(&lookup_iexact)),
                &settings.number_format,
            );

        Self {
            field,
            prefix,
            separator: settings.string.separator.clone(),
            lookup_iexact,
            form,
        }
    }

    /// Trimmed, non-empty entries of the submitted value
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        let cleaned = clean_input_prefix(&self.prefix, self.form.cleaned_data().clone());
        let key = format!("{}__iexact", self.field.field_path);
        cleaned
            .get(&key)
            .and_then(CleanedValue::as_text)
            .map(|value| {
                value
                    .split(self.separator.as_str())
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl ListFilter for StringFilter {
    fn title(&self) -> &str {
        &self.field.title
    }

    fn field_path(&self) -> &str {
        &self.field.field_path
    }

    fn expected_parameters(&self) -> Vec<String> {
        vec![self.lookup_iexact.clone()]
    }

    fn form(&self) -> &BoundForm {
        &self.form
    }

    fn condition(&self) -> Option<Condition> {
        if !self.form.is_valid() {
            return None;
        }

        let entries = self.entries();
        if entries.is_empty() {
            return None;
        }
        tracing::debug!(field = %self.field.field_path, ?entries, "Applying string filter");

        let condition = entries.into_iter().fold(Condition::any(), |any, entry| {
            any.add(
                Expr::expr(Func::upper(Expr::col(self.field.column.clone())))
                    .eq(Func::upper(Expr::val(entry))),
            )
        });
        Some(condition)
    }

    fn is_active(&self) -> bool {
        !self.entries().is_empty()
    }
}
