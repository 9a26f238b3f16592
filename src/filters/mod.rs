//! # List Filters
//!
//! A list filter narrows an admin change list by one column. Every filter follows the same
//! three steps:
//!
//! 1. **Form definition**: the filter declares one or two optional inputs named after
//!    namespaced query parameters (`irf__stock__gte`, `prf__price__lte`, `sf__name__iexact`).
//! 2. **Parameter parsing**: the inputs it expects are picked from the request and bound to
//!    the form, which validates them.
//! 3. **Query filtering**: the validated values become a Sea-ORM [`Condition`] that is ANDed
//!    onto the change list's `Select`.
//!
//! An invalid form never filters anything; the change list is shown unfiltered and the form
//! is re-rendered with its errors.
//!
//! ## Query Parameter Examples
//!
//! ```rust,ignore
//! // Stock between 10 and 20, both inclusive
//! GET /admin/products?irf__stock__gte=10&irf__stock__lte=20
//!
//! // Price from 9.99 up, stored in cents
//! GET /admin/products?prf__price__gte=9.99
//!
//! // Name equal to "apple" or "pear", ignoring case
//! GET /admin/products?sf__name__iexact=apple,%20pear
//! ```

pub mod integer;
pub mod price;
pub mod string;

pub use integer::IntegerRangeFilter;
pub use price::PriceRangeFilter;
pub use string::StringFilter;

use crate::forms::BoundForm;
use crate::params::QueryParams;
use crate::widgets::render_filter_block;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, Select,
    sea_query::{ColumnRef, IntoColumnRef, IntoIden},
};

/// The column a filter narrows, and how the sidebar names it
#[derive(Debug, Clone)]
pub struct FilterField {
    pub field_path: String,
    pub title: String,
    pub column: ColumnRef,
}

impl FilterField {
    /// Filter on an arbitrary column reference, e.g. a bare `Alias`
    pub fn new(field_path: impl Into<String>, column: impl IntoColumnRef) -> Self {
        let field_path = field_path.into();
        Self {
            title: title_from_path(&field_path),
            field_path,
            column: column.into_column_ref(),
        }
    }

    /// Filter on an entity column, qualified with its table name
    pub fn for_column<C: ColumnTrait>(field_path: impl Into<String>, column: C) -> Self {
        Self::new(field_path, (column.entity_name(), column.into_iden()))
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

fn title_from_path(field_path: &str) -> String {
    field_path.replace("__", " ").replace('_', " ")
}

/// Contract shared by every list filter
pub trait ListFilter: Send + Sync {
    /// Shown as "By {title}" above the filter's inputs
    fn title(&self) -> &str;

    fn field_path(&self) -> &str;

    /// Query parameters this filter consumes
    fn expected_parameters(&self) -> Vec<String>;

    /// The filter's form, bound to the current request
    fn form(&self) -> &BoundForm;

    /// Condition narrowing the list, `None` when the filter leaves it unchanged
    fn condition(&self) -> Option<Condition>;

    /// The other parameters of the request, to be carried along when this filter's form is
    /// submitted
    fn choices(&self, params: &QueryParams) -> QueryParams {
        params.without(&self.expected_parameters())
    }

    /// Whether the request currently narrows the list through this filter
    fn is_active(&self) -> bool {
        self.form().is_valid() && !self.form().cleaned_data().is_empty()
    }

    fn render(&self, params: &QueryParams) -> String {
        render_filter_block(self.title(), self.form(), &self.choices(params))
    }
}

/// AND of every filter's condition
#[must_use]
pub fn combined_condition(filters: &[Box<dyn ListFilter>]) -> Condition {
    filters
        .iter()
        .filter_map(|filter| filter.condition())
        .fold(Condition::all(), Condition::add)
}

/// Narrow `select` by every filter
#[must_use]
pub fn apply_filters<E: EntityTrait>(filters: &[Box<dyn ListFilter>], select: Select<E>) -> Select<E> {
    let condition = combined_condition(filters);
    if condition.is_empty() {
        select
    } else {
        select.filter(condition)
    }
}
