use crate::errors::ApiError;
use crate::params::QueryParams;
use axum::http::header::HeaderMap;

/// Query parameter holding the 1-based change-list page
pub const PAGE_VAR: &str = "p";

/// Sanitize resource name by removing control characters for HTTP headers
fn sanitize_resource_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii() && !c.is_ascii_control()).collect()
}

/// 1-based page requested through [`PAGE_VAR`], defaulting to the first page.
///
/// # Errors
/// Returns a bad request for anything but a positive integer.
pub fn parse_page(params: &QueryParams) -> Result<u64, ApiError> {
    match params.get(PAGE_VAR).map(str::trim) {
        None | Some("") => Ok(1),
        Some(raw) => match raw.parse::<u64>() {
            Ok(page) if page > 0 => Ok(page),
            _ => Err(ApiError::bad_request(format!("Invalid page number '{raw}'"))),
        },
    }
}

/// `Content-Range: {resource} {first}-{last}/{total}` for the rows of one page
#[must_use]
pub fn calculate_content_range(
    offset: u64,
    count: u64,
    total_count: u64,
    resource_name: &str,
) -> HeaderMap {
    let last = offset.saturating_add(count).saturating_sub(1).min(total_count.saturating_sub(1));
    let safe_name = sanitize_resource_name(resource_name);
    let content_range = if count == 0 {
        format!("{safe_name} */{total_count}")
    } else {
        format!("{safe_name} {offset}-{last}/{total_count}")
    };

    let mut headers = HeaderMap::new();
    if let Ok(value) = content_range.parse() {
        headers.insert("Content-Range", value);
    }
    headers
}
