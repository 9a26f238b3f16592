//! # admin-list-filters
//!
//! List filters for admin change lists built on Axum and Sea-ORM.
//!
//! Three filters are provided, each rendering its inputs in the change-list sidebar, reading
//! namespaced query parameters and narrowing the Sea-ORM query:
//!
//! - [`IntegerRangeFilter`]: "From" / "To" over an integer column (`irf__<field>__gte`,
//!   `irf__<field>__lte`)
//! - [`PriceRangeFilter`]: "From" / "To" in major currency units over a column stored in minor
//!   units (`prf__<field>__gte`, `prf__<field>__lte`)
//! - [`StringFilter`]: comma separated entries, any of which matches case-insensitively
//!   (`sf__<field>__iexact`)
//!
//! [`FilterRegistry`] picks the filter for a column from its type and [`admin_router`] serves
//! the change list of an [`AdminResource`].

pub mod admin;
pub mod errors;
pub mod filters;
pub mod forms;
pub mod pagination;
pub mod params;
pub mod registry;
pub mod settings;
pub mod widgets;

pub use admin::{AdminResource, AdminState, ChangeList, ResultPage, admin_router};
pub use errors::ApiError;
pub use filters::{
    FilterField, IntegerRangeFilter, ListFilter, PriceRangeFilter, StringFilter, apply_filters,
};
pub use forms::{BoundForm, CleanedValue, FieldKind, FilterForm, FormError, FormField};
pub use params::QueryParams;
pub use registry::FilterRegistry;
pub use settings::{ConfigError, FilterSettings};
