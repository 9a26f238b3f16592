//! Maps column types to the list filter that handles them.
//!
//! Registrations are checked in order and the first whose predicate accepts the column type
//! builds the filter. [`FilterRegistry::default`] knows the three built-in filters:
//!
//! | Column type                          | Filter                 |
//! |--------------------------------------|------------------------|
//! | tiny/small/big integers, unsigned    | [`IntegerRangeFilter`] |
//! | `Float`, `Double`, `Decimal`         | [`PriceRangeFilter`]   |
//! | `Char`, `String`, `Text`             | [`StringFilter`]       |

use crate::filters::{FilterField, IntegerRangeFilter, ListFilter, PriceRangeFilter, StringFilter};
use crate::params::QueryParams;
use crate::settings::FilterSettings;
use sea_orm::{ColumnTrait, ColumnType};

type Predicate = Box<dyn Fn(&ColumnType) -> bool + Send + Sync>;
type Factory = Box<dyn Fn(FilterField, &QueryParams, &FilterSettings) -> Box<dyn ListFilter> + Send + Sync>;

pub struct FilterRegistry {
    entries: Vec<(Predicate, Factory)>,
}

impl FilterRegistry {
    /// A registry without any filter
    #[must_use]
    pub const fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Register `factory` for the column types accepted by `predicate`
    pub fn register<P, F>(&mut self, predicate: P, factory: F) -> &mut Self
    where
        P: Fn(&ColumnType) -> bool + Send + Sync + 'static,
        F: Fn(FilterField, &QueryParams, &FilterSettings) -> Box<dyn ListFilter> + Send + Sync + 'static,
    {
        self.entries.push((Box::new(predicate), Box::new(factory)));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the filter for a column of the given type, if one is registered
    #[must_use]
    pub fn build_for_type(
        &self,
        column_type: &ColumnType,
        field: FilterField,
        params: &QueryParams,
        settings: &FilterSettings,
    ) -> Option<Box<dyn ListFilter>> {
        self.entries
            .iter()
            .find(|(predicate, _)| predicate(column_type))
            .map(|(_, factory)| factory(field, params, settings))
    }

    /// Build the filter for an entity column
    #[must_use]
    pub fn build<C: ColumnTrait>(
        &self,
        field_path: &str,
        column: C,
        params: &QueryParams,
        settings: &FilterSettings,
    ) -> Option<Box<dyn ListFilter>> {
        let column_def = column.def();
        let column_type = column_def.get_column_type();
        let filter = self.build_for_type(
            column_type,
            FilterField::for_column(field_path, column),
            params,
            settings,
        );
        if filter.is_none() {
            tracing::debug!(
                field = %field_path,
                column_type = ?column_type,
                "No list filter registered for column type"
            );
        }
        filter
    }
}

#[must_use]
pub const fn is_integer_column(column_type: &ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::TinyInteger
            | ColumnType::SmallInteger
            | ColumnType::Integer
            | ColumnType::BigInteger
            | ColumnType::TinyUnsigned
            | ColumnType::SmallUnsigned
            | ColumnType::Unsigned
            | ColumnType::BigUnsigned
    )
}

#[must_use]
pub const fn is_price_column(column_type: &ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::Float | ColumnType::Double | ColumnType::Decimal(_)
    )
}

#[must_use]
pub const fn is_string_column(column_type: &ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::Char(_) | ColumnType::String(_) | ColumnType::Text
    )
}

impl Default for FilterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(is_integer_column, |field, params, settings| {
                Box::new(IntegerRangeFilter::new(field, params, settings))
            })
            .register(is_price_column, |field, params, settings| {
                Box::new(PriceRangeFilter::new(field, params, settings))
            })
            .register(is_string_column, |field, params, settings| {
                Box::new(StringFilter::new(field, params, settings))
            });
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::{Alias, StringLen};

    fn build(column_type: &ColumnType) -> Option<Box<dyn ListFilter>> {
        FilterRegistry::default().build_for_type(
            column_type,
            FilterField::new("col", Alias::new("col")),
            &QueryParams::new(),
            &FilterSettings::default(),
        )
    }

    #[test]
    fn test_default_registrations() {
        let integer = build(&ColumnType::Integer).unwrap();
        assert_eq!(integer.expected_parameters()[0], "irf__col__gte");

        let price = build(&ColumnType::Double).unwrap();
        assert_eq!(price.expected_parameters()[0], "prf__col__gte");

        let string = build(&ColumnType::String(StringLen::None)).unwrap();
        assert_eq!(string.expected_parameters(), vec!["sf__col__iexact".to_string()]);

        assert!(build(&ColumnType::BigUnsigned).is_some());
        assert!(build(&ColumnType::Text).is_some());
        assert!(build(&ColumnType::Boolean).is_none());
        assert!(build(&ColumnType::Uuid).is_none());
    }

    #[test]
    fn test_first_registration_wins() {
        let mut registry = FilterRegistry::empty();
        registry
            .register(|_| true, |field, params, settings| {
                Box::new(StringFilter::new(field, params, settings))
            })
            .register(is_integer_column, |field, params, settings| {
                Box::new(IntegerRangeFilter::new(field, params, settings))
            });
        assert_eq!(registry.len(), 2);

        let filter = registry
            .build_for_type(
                &ColumnType::Integer,
                FilterField::new("col", Alias::new("col")),
                &QueryParams::new(),
                &FilterSettings::default(),
            )
            .unwrap();
        assert_eq!(filter.expected_parameters(), vec!["sf__col__iexact".to_string()]);
    }

    #[test]
    fn test_empty_registry() {
        let registry = FilterRegistry::empty();
        assert!(registry.is_empty());
        assert!(
            registry
                .build_for_type(
                    &ColumnType::Integer,
                    FilterField::new("col", Alias::new("col")),
                    &QueryParams::new(),
                    &FilterSettings::default(),
                )
                .is_none()
        );
    }
}
