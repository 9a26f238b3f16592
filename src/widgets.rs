//! HTML rendering of filter inputs and the sidebar block.

use crate::forms::{BoundForm, FieldKind, FormField};
use crate::params::QueryParams;
use std::borrow::Cow;
use std::fmt::Write;

/// Escape `& < > " '` for use in text and attribute values
pub(crate) fn html_escape(s: &str) -> Cow<'_, str> {
    if s.contains(['&', '<', '>', '"', '\'']) {
        let mut escaped = String::with_capacity(s.len() + 8);
        for c in s.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#x27;"),
                _ => escaped.push(c),
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(s)
    }
}

/// Admin input for one form field.
///
/// Numeric fields become `vIntegerField` number inputs. Localized float fields fall back to a
/// text input, since browsers reject a decimal comma in `type="number"`.
#[must_use]
pub fn render_input(field: &FormField, value: Option<&str>) -> String {
    let (input_type, class) = match field.kind {
        FieldKind::Integer => ("number", "vIntegerField"),
        FieldKind::Float if field.localize => ("text", "vIntegerField"),
        FieldKind::Float => ("number", "vIntegerField"),
        FieldKind::Text => ("text", "vTextField"),
    };

    let mut html = format!(
        r#"<input type="{input_type}" name="{}" class="{class}""#,
        html_escape(&field.name)
    );
    if field.kind == FieldKind::Float && !field.localize {
        html.push_str(r#" step="any""#);
    }
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        let _ = write!(html, r#" value="{}""#, html_escape(value));
    }
    if !field.placeholder.is_empty() {
        let _ = write!(html, r#" placeholder="{}""#, html_escape(&field.placeholder));
    }
    if field.required {
        html.push_str(" required");
    }
    html.push('>');
    html
}

#[must_use]
pub fn render_hidden(name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        html_escape(name),
        html_escape(value)
    )
}

/// Sidebar block of one filter: title, carried-over parameters, errors and inputs
#[must_use]
pub fn render_filter_block(title: &str, form: &BoundForm, carried: &QueryParams) -> String {
    let mut html = String::new();
    let _ = write!(html, "<h3>By {}</h3>\n<ul>\n<li>\n", html_escape(title));
    html.push_str("<form method=\"get\" action=\"\">\n");

    for (name, value) in carried.iter() {
        html.push_str(&render_hidden(name, value));
        html.push('\n');
    }

    for field in form.fields() {
        if let Some(error) = form.errors().get(&field.name) {
            let _ = writeln!(
                html,
                r#"<ul class="errorlist"><li>{}</li></ul>"#,
                html_escape(&error.to_string())
            );
        }
        html.push_str(&render_input(field, form.value(&field.name)));
        html.push('\n');
    }

    html.push_str("<input type=\"submit\" value=\"Search\">\n</form>\n</li>\n</ul>\n");
    html
}
