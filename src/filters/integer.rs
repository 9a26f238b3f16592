use super::{FilterField, ListFilter};
use crate::forms::{BoundForm, CleanedValue, FieldKind, FilterForm, FormField};
use crate::params::{QueryParams, clean_input_prefix, lookup_param};
use crate::settings::FilterSettings;
use sea_orm::{Condition, sea_query::Expr};

/// "From" / "To" filter over an integer column. Both bounds are inclusive.
pub struct IntegerRangeFilter {
    field: FilterField,
    prefix: String,
    lookup_since: String,
    lookup_upto: String,
    form: BoundForm,
}

impl IntegerRangeFilter {
    #[must_use]
    pub fn new(field: FilterField, params: &QueryParams, settings: &FilterSettings) -> Self {
        let prefix = settings.integer.prefix.clone();
        let lookup_since = lookup_param(&prefix, &field.field_path, "gte");
        let lookup_upto = lookup_param(&prefix, &field.field_path, "lte");

        let form = FilterForm::new()
            .with_field(
                FormField::optional(&lookup_since, FieldKind::Integer, &settings.integer.from_placeholder)
                    .localized(settings.number_format.localize),
            )
            .with_field(
                FormField::optional(&lookup_upto, FieldKind::Integer, &settings.integer.to_placeholder)
                    .localized(settings.number_format.localize),
            );
        let used = params.used_parameters(&[lookup_since.clone(), lookup_upto.clone()]);
        let form = form.bind(used, &settings.number_format);

        Self {
            field,
            prefix,
            lookup_since,
            lookup_upto,
            form,
        }
    }
}

impl ListFilter for IntegerRangeFilter {
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
                "Integer range filter ignored, invalid input"
            );
            return None;
        }

        let cleaned = clean_input_prefix(&self.prefix, self.form.cleaned_data().clone());
        let path = &self.field.field_path;
        let since = cleaned.get(&format!("{path}__gte")).and_then(CleanedValue::as_integer);
        let upto = cleaned.get(&format!("{path}__lte")).and_then(CleanedValue::as_integer);

        let mut condition = Condition::all();
        if let Some(since) = since {
            condition = condition.add(Expr::col(self.field.column.clone()).gte(since));
        }
        if let Some(upto) = upto {
            // `< upto + 1` keeps the upper bound inclusive
            let column = Expr::col(self.field.column.clone());
            condition = condition.add(match upto.checked_add(1) {
                Some(limit) => column.lt(limit),
                None => column.lte(upto),
            });
        }

        if condition.is_empty() {
            return None;
        }
        tracing::debug!(field = %path, ?since, ?upto, "Applying integer range filter");
        Some(condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::where_sql;
    use sea_orm::sea_query::Alias;

    fn filter(pairs: &[(&str, &str)]) -> IntegerRangeFilter {
        let params: QueryParams = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        IntegerRangeFilter::new(
            FilterField::new("stock", Alias::new("stock")),
            &params,
            &FilterSettings::default(),
        )
    }

    #[test]
    fn test_expected_parameters() {
        assert_eq!(
            filter(&[]).expected_parameters(),
            vec!["irf__stock__gte".to_string(), "irf__stock__lte".to_string()]
        );
    }

    #[test]
    fn test_both_bounds() {
        let sql = where_sql(
            filter(&[("irf__stock__gte", "10"), ("irf__stock__lte", "20")])
                .condition()
                .unwrap(),
        );
        assert!(sql.contains(r#""stock" >= 10"#), "{sql}");
        assert!(sql.contains(r#""stock" < 21"#), "{sql}");
    }

    #[test]
    fn test_only_upper_bound() {
        let sql = where_sql(filter(&[("irf__stock__lte", "0")]).condition().unwrap());
        assert!(sql.contains(r#""stock" < 1"#), "{sql}");
        assert!(!sql.contains(">="), "{sql}");
    }

    #[test]
    fn test_upper_bound_at_i64_max() {
        let max = i64::MAX.to_string();
        let sql = where_sql(filter(&[("irf__stock__lte", &max)]).condition().unwrap());
        assert!(sql.contains(&format!(r#""stock" <= {max}"#)), "{sql}");
    }

    #[test]
    fn test_no_input_no_condition() {
        assert!(filter(&[]).condition().is_none());
        assert!(filter(&[("irf__stock__gte", "")]).condition().is_none());
    }

    #[test]
    fn test_invalid_input_leaves_list_unchanged() {
        let f = filter(&[("irf__stock__gte", "abc"), ("irf__stock__lte", "5")]);
        assert!(!f.form().is_valid());
        assert!(f.condition().is_none());
        assert!(!f.is_active());
    }

    #[test]
    fn test_other_filters_parameters_ignored() {
        let f = filter(&[("irf__price__gte", "abc"), ("stock__gte", "1")]);
        assert!(f.form().is_valid());
        assert!(f.condition().is_none());
    }

    #[test]
    fn test_render_keeps_submitted_values() {
        let params: QueryParams = vec![
            ("irf__stock__gte".to_string(), "3".to_string()),
            ("p".to_string(), "2".to_string()),
        ]
        .into();
        let f = IntegerRangeFilter::new(
            FilterField::new("stock", Alias::new("stock")),
            &params,
            &FilterSettings::default(),
        );
        let html = f.render(&params);
        assert!(html.contains("<h3>By stock</h3>"));
        assert!(html.contains(r#"name="irf__stock__gte" class="vIntegerField" value="3" placeholder="From""#));
        assert!(html.contains(r#"placeholder="To""#));
        assert!(html.contains(r#"<input type="hidden" name="p" value="2">"#));
    }
}
