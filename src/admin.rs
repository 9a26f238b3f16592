//! # Admin Change List
//!
//! The change list is the admin page listing the rows of one model. Its sidebar holds one list
//! filter per column named in [`AdminResource::list_filter`]; submitting a filter reloads the
//! page with the filter's parameters added to the query string.
//!
//! ```rust,ignore
//! struct ProductAdmin;
//!
//! impl AdminResource for ProductAdmin {
//!     type EntityType = product::Entity;
//!     type ColumnType = product::Column;
//!
//!     const RESOURCE_NAME_SINGULAR: &'static str = "product";
//!     const RESOURCE_NAME_PLURAL: &'static str = "products";
//!     const ORDER_COLUMN: Self::ColumnType = product::Column::Id;
//!
//!     fn list_filter() -> Vec<(&'static str, Self::ColumnType)> {
//!         vec![
//!             ("stock", product::Column::Stock),
//!             ("price", product::Column::Price),
//!             ("name", product::Column::Name),
//!         ]
//!     }
//! }
//!
//! let app = Router::new().nest("/admin/products", admin_router::<ProductAdmin>(state));
//! ```

use crate::errors::ApiError;
use crate::filters::{ListFilter, apply_filters, combined_condition};
use crate::pagination::{PAGE_VAR, calculate_content_range, parse_page};
use crate::params::QueryParams;
use crate::registry::FilterRegistry;
use crate::settings::{ConfigError, FilterSettings};
use crate::widgets::html_escape;
use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::HeaderMap,
    response::Html,
    routing::get,
};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    Select,
};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;

/// Admin configuration of one model
#[async_trait]
pub trait AdminResource: Send + Sync + 'static {
    type EntityType: EntityTrait<Model: Serialize + Sync> + Sync;
    type ColumnType: ColumnTrait + std::fmt::Debug;

    const RESOURCE_NAME_SINGULAR: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;
    const ORDER_COLUMN: Self::ColumnType;

    /// Columns shown in the filter sidebar, keyed by their field path
    fn list_filter() -> Vec<(&'static str, Self::ColumnType)>;

    /// Serialized fields shown as table columns; empty shows every field
    #[must_use]
    fn list_display() -> Vec<&'static str> {
        Vec::new()
    }

    /// One page (1-based) of `select`, and the number of rows it matches in total
    async fn get_page(
        db: &DatabaseConnection,
        select: Select<Self::EntityType>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<<Self::EntityType as EntityTrait>::Model>, u64), DbErr> {
        let paginator = select.order_by_asc(Self::ORDER_COLUMN).paginate(db, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }
}

/// Shared state of the admin routes
#[derive(Clone)]
pub struct AdminState {
    pub db: DatabaseConnection,
    pub settings: Arc<FilterSettings>,
    pub registry: Arc<FilterRegistry>,
}

impl AdminState {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            settings: Arc::new(FilterSettings::default()),
            registry: Arc::new(FilterRegistry::default()),
        }
    }

    /// Replace the default settings.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when `settings` fail [`FilterSettings::validate`].
    pub fn with_settings(mut self, settings: FilterSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        self.settings = Arc::new(settings);
        Ok(self)
    }

    #[must_use]
    pub fn with_registry(mut self, registry: FilterRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }
}

/// Rows of the current page
#[derive(Debug, Clone, Serialize)]
pub struct ResultPage<M> {
    pub rows: Vec<M>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl<M> ResultPage<M> {
    #[must_use]
    pub const fn num_pages(&self) -> u64 {
        if self.total == 0 || self.per_page == 0 {
            1
        } else {
            self.total.div_ceil(self.per_page)
        }
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// One change-list request: its parameters and the filters bound to them
pub struct ChangeList {
    params: QueryParams,
    filters: Vec<Box<dyn ListFilter>>,
    page: u64,
    per_page: u64,
}

impl ChangeList {
    /// Build the filters of `T` for this request.
    ///
    /// # Errors
    /// Returns a bad request when a parameter is claimed by no filter, or the page number is
    /// malformed or lies beyond any addressable offset. Settings with an empty page size are an
    /// internal error.
    pub fn new<T: AdminResource>(
        params: QueryParams,
        registry: &FilterRegistry,
        settings: &FilterSettings,
    ) -> Result<Self, ApiError> {
        let filters: Vec<Box<dyn ListFilter>> = T::list_filter()
            .into_iter()
            .filter_map(|(field_path, column)| registry.build(field_path, column, &params, settings))
            .collect();

        let known: HashSet<String> = filters
            .iter()
            .flat_map(|filter| filter.expected_parameters())
            .collect();
        if let Some(unknown) = params
            .keys()
            .find(|key| *key != PAGE_VAR && !known.contains(*key))
        {
            return Err(ApiError::bad_request(format!(
                "Unknown filter parameter '{unknown}'"
            )));
        }

        let per_page = settings.list_per_page;
        if per_page == 0 {
            return Err(ApiError::internal(
                "The change list is misconfigured",
                Some("list_per_page is 0".to_string()),
            ));
        }

        let page = parse_page(&params)?;
        // Row offsets are bound as signed 64-bit integers
        if (page - 1)
            .checked_mul(per_page)
            .and_then(|offset| offset.checked_add(per_page))
            .is_none_or(|end| i64::try_from(end).is_err())
        {
            return Err(ApiError::bad_request(format!("Invalid page number '{page}'")));
        }

        Ok(Self {
            params,
            filters,
            page,
            per_page,
        })
    }

    #[must_use]
    pub fn filters(&self) -> &[Box<dyn ListFilter>] {
        &self.filters
    }

    #[must_use]
    pub const fn params(&self) -> &QueryParams {
        &self.params
    }

    #[must_use]
    pub fn condition(&self) -> Condition {
        combined_condition(&self.filters)
    }

    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        self.filters.iter().any(|filter| filter.is_active())
    }

    /// Validation messages of every filter form, as `parameter: message`
    #[must_use]
    pub fn form_errors(&self) -> Vec<String> {
        self.filters
            .iter()
            .flat_map(|filter| {
                filter
                    .form()
                    .errors()
                    .iter()
                    .map(|(name, error)| format!("{name}: {error}"))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Fetch the current page of `T`, narrowed by every valid filter
    ///
    /// # Errors
    /// Returns [`ApiError::Database`] when the query fails.
    pub async fn get_results<T: AdminResource>(
        &self,
        db: &DatabaseConnection,
    ) -> Result<ResultPage<<T::EntityType as EntityTrait>::Model>, ApiError> {
        let select = apply_filters(&self.filters, T::EntityType::find());
        let (rows, total) = T::get_page(db, select, self.page, self.per_page)
            .await
            .map_err(ApiError::database)?;
        tracing::debug!(
            resource = T::RESOURCE_NAME_PLURAL,
            page = self.page,
            rows = rows.len(),
            total,
            "Fetched change list page"
        );
        Ok(ResultPage {
            rows,
            total,
            page: self.page,
            per_page: self.per_page,
        })
    }

    /// Filter sidebar. Filtering restarts at the first page, so the page parameter is not
    /// carried into the filter forms.
    #[must_use]
    pub fn render_sidebar(&self) -> String {
        let carried = self.params.without(&[PAGE_VAR.to_string()]);
        let mut html = String::from("<div id=\"changelist-filter\">\n<h2>Filter</h2>\n");
        if self.has_active_filters() {
            html.push_str("<p id=\"changelist-filter-clear\"><a href=\"?\">Clear all filters</a></p>\n");
        }
        for filter in &self.filters {
            html.push_str(&filter.render(&carried));
        }
        html.push_str("</div>\n");
        html
    }

    /// The full change-list page of `T`
    ///
    /// # Errors
    /// Returns [`ApiError::Internal`] when a row cannot be serialized.
    pub fn render<T: AdminResource>(
        &self,
        results: &ResultPage<<T::EntityType as EntityTrait>::Model>,
    ) -> Result<String, ApiError> {
        let rows = results
            .rows
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| {
                ApiError::internal("Failed to render the change list", Some(err.to_string()))
            })?;

        let mut columns: Vec<String> = T::list_display().into_iter().map(str::to_string).collect();
        if columns.is_empty()
            && let Some(serde_json::Value::Object(first)) = rows.first()
        {
            columns = first.keys().cloned().collect();
        }

        let mut html = String::new();
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html>\n<head><title>Select {} to change</title></head>\n<body>\n<div id=\"changelist\">\n",
            html_escape(T::RESOURCE_NAME_SINGULAR)
        );
        html.push_str(&self.render_sidebar());

        html.push_str("<table id=\"result_list\">\n<thead><tr>");
        for column in &columns {
            let _ = write!(html, "<th>{}</th>", html_escape(column));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for row in &rows {
            html.push_str("<tr>");
            for column in &columns {
                let _ = write!(html, "<td>{}</td>", html_escape(&display_value(row.get(column))));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n");

        let _ = writeln!(
            html,
            "<p class=\"paginator\">{} {}",
            results.total,
            html_escape(if results.total == 1 {
                T::RESOURCE_NAME_SINGULAR
            } else {
                T::RESOURCE_NAME_PLURAL
            })
        );
        if results.page > 1 {
            let _ = write!(html, " <a href=\"?{}\">previous</a>", html_escape(&self.page_query(results.page - 1)));
        }
        if results.page < results.num_pages() {
            let _ = write!(html, " <a href=\"?{}\">next</a>", html_escape(&self.page_query(results.page + 1)));
        }
        html.push_str("</p>\n</div>\n</body>\n</html>\n");
        Ok(html)
    }

    fn page_query(&self, page: u64) -> String {
        let mut params = self.params.clone();
        params.insert(PAGE_VAR, page.to_string());
        params.to_query_string()
    }
}

fn display_value(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => "-".to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// HTML change list with the filter sidebar
///
/// # Errors
/// See [`ChangeList::new`] and [`ChangeList::get_results`].
pub async fn changelist_html<T: AdminResource>(
    Query(params): Query<QueryParams>,
    State(state): State<AdminState>,
) -> Result<Html<String>, ApiError> {
    let changelist = ChangeList::new::<T>(params, &state.registry, &state.settings)?;
    let results = changelist.get_results::<T>(&state.db).await?;
    Ok(Html(changelist.render::<T>(&results)?))
}

/// JSON rows of the filtered change list, with a `Content-Range` header.
///
/// Unlike the HTML page, which shows invalid filter input next to the form, this endpoint
/// rejects it with 422 rather than returning unfiltered rows.
///
/// # Errors
/// See [`ChangeList::new`] and [`ChangeList::get_results`].
pub async fn changelist_json<T: AdminResource>(
    Query(params): Query<QueryParams>,
    State(state): State<AdminState>,
) -> Result<(HeaderMap, Json<Vec<<T::EntityType as EntityTrait>::Model>>), ApiError> {
    let changelist = ChangeList::new::<T>(params, &state.registry, &state.settings)?;
    let errors = changelist.form_errors();
    if !errors.is_empty() {
        return Err(ApiError::validation_failed(errors));
    }

    let results = changelist.get_results::<T>(&state.db).await?;
    let headers = calculate_content_range(
        results.offset(),
        results.rows.len() as u64,
        results.total,
        T::RESOURCE_NAME_PLURAL,
    );
    Ok((headers, Json(results.rows)))
}

/// Routes of one model's change list: `/` (HTML) and `/data` (JSON)
pub fn admin_router<T: AdminResource>(state: AdminState) -> Router {
    Router::new()
        .route("/", get(changelist_html::<T>))
        .route("/data", get(changelist_json::<T>))
        .with_state(state)
}
