use super::{FilterField, ListFilter};
use crate::forms::{BoundForm, CleanedValue, FieldKind, FilterForm, FormField};
use crate::params::{QueryParams, clean_input_prefix, lookup_param};
use crate::settings::FilterSettings;
use sea_orm::{Condition, sea_query::Expr};

/// Price range over a column holding minor currency units.
///
/// Bounds are typed in major units (`9.99`) and compared as minor units (`999`), both
/// inclusive.
pub struct PriceRangeFilter {
    field: FilterField,
    prefix: String,
    scale: f64,
    lookup_since: String,
    lookup_upto: String,
    form: BoundForm,
}

impl PriceRangeFilter {
    #[must_use]
    pub fn new(field: FilterField, params: &QueryParams, settings: &FilterSettings) -> Self {
        let prefix = settings.price.prefix.clone();
        let lookup_since = lookup_param(&prefix, &field.field_path, "gte");
        let lookup_upto = lookup_param(&prefix, &field.field_path, "lte");

        let form = FilterForm::new()
            .with_field(
                FormField::optional(&lookup_since, FieldKind::Float, &settings.price.from_placeholder)
                    .localized(settings.number_format.localize),
            )
            .with_field(
                FormField::optional(&lookup_upto, FieldKind::Float, &settings.price.to_placeholder)
                    .localized(settings.number_format.localize),
            )
            .bind(
                params.used_parameters(&[lookup_since.clone(), lookup_upto.clone()]),
                &settings.number_format,
            );

        Self {
            field,
            prefix,
            scale: settings.price.scale,
            lookup_since,
            lookup_upto,
            form,
        }
    }

    /// Major units to minor units, rounded to the nearest unit
    #[allow(clippy::cast_possible_truncation)]
    fn to_minor_units(&self, value: f64) -> i64 {
        (value * self.scale).round() as i64
    }
}

impl ListFilter for PriceRangeFilter {
    fn title(&self) -> &str {
        &self.field.title
    }

    fn field_path(&self) -> &str {
        &self.field.field_path
    }

    fn expected_parameters(&self) -> Vec<String> {
        vec![self.lookup_since.clone(), self.lookup_upto.clone()]
    }

    fn form(&self) -> &BoundForm {
        &self.form
    }

    fn condition(&self) -> Option<Condition> {
        if !self.form.is_valid() {
            tracing::debug!(
                field = %self.field.field_path,
                errors = ?self.form.errors(),
                "Price range filter ignored, invalid input"
            );
            return None;
        }

        let cleaned = clean_input_prefix(&self.prefix, self.form.cleaned_data().clone());
        let path = &self.field.field_path;
        let since = cleaned
            .get(&format!("{path}__gte"))
            .and_then(CleanedValue::as_float)
            .map(|v| self.to_minor_units(v));
        let upto = cleaned
            .get(&format!("{path}__lte"))
            .and_then(CleanedValue::as_float)
            .map(|v| self.to_minor_units(v));

        let mut condition = Condition::all();
        if let Some(since) = since {
            condition = condition.add(Expr::col(self.field.column.clone()).gte(since));
        }
        if let Some(upto) = upto {
            condition = condition.add(Expr::col(self.field.column.clone()).lte(upto));
        }

        if condition.is_empty() {
            return None;
        }
        tracing::debug!(field = %path, ?since, ?upto, "Applying price range filter");
        Some(condition)
    }
}
