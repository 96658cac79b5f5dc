//! HTML rendering for the entry form and the history table.

use crate::features::{FEATURE_COLUMNS, FEATURE_NAMES};
use crate::service::RecordListing;

/// Banner shown above a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    fn css_class(&self) -> &'static str {
        match self {
            Notice::Success(_) => "success",
            Notice::Warning(_) => "warning",
            Notice::Error(_) => "error",
        }
    }

    fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Warning(m) | Notice::Error(m) => m,
        }
    }
}

/// Escape text for HTML element and attribute content.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, notice: Option<&Notice>, body: &str) -> String {
    let banner = notice
        .map(|n| {
            format!(
                r#"<div class="notice {}">{}</div>"#,
                n.css_class(),
                escape_html(n.message())
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{title}</title>
</head>
<body>
    <nav><a href="/">New prediction</a> | <a href="/records">History</a></nav>
    <h1>{title}</h1>
    {banner}
{body}
</body>
</html>"#,
        title = escape_html(title),
        banner = banner,
        body = body
    )
}

/// Entry form, optionally pre-filled with the previous attempt.
pub fn index_page(notice: Option<&Notice>, username: &str, features: &str) -> String {
    let names: Vec<String> = FEATURE_NAMES
        .iter()
        .map(|name| format!("        <li>{}</li>", escape_html(name)))
        .collect();

    let body = format!(
        r#"    <form method="post" action="/">
        <label for="username">Your name</label>
        <input id="username" name="username" type="text" value="{username}" required>
        <label for="features">Measurements (30 comma-separated values, in the order below)</label>
        <textarea id="features" name="features" rows="4" cols="80" required>{features}</textarea>
        <button type="submit">Predict</button>
    </form>
    <ol class="feature-order">
{names}
    </ol>"#,
        username = escape_html(username),
        features = escape_html(features),
        names = names.join("\n")
    );

    layout("Breast Cancer Prediction", notice, &body)
}

/// History table, newest first.
pub fn records_page(notice: Option<&Notice>, listing: &RecordListing) -> String {
    let read_error = listing
        .error
        .as_ref()
        .map(|e| Notice::Error(format!("Could not load prediction history: {}", e)));
    let notice = notice.or(read_error.as_ref());

    let header: Vec<String> = ["ID", "User", "Timestamp", "Prediction"]
        .iter()
        .map(|h| h.to_string())
        .chain(FEATURE_COLUMNS.iter().map(|c| escape_html(c)))
        .map(|h| format!("<th>{}</th>", h))
        .collect();

    let rows: Vec<String> = listing
        .records
        .iter()
        .map(|record| {
            let values: Vec<String> = record
                .features
                .to_array()
                .iter()
                .map(|v| format!("<td>{}</td>", v))
                .collect();
            format!(
                "        <tr><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td>{}</tr>",
                record.id,
                escape_html(&record.username),
                record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                record.label_name().to_lowercase(),
                record.label_name(),
                values.join("")
            )
        })
        .collect();

    let body = format!(
        r#"    <p>{count} prediction(s)</p>
    <table>
        <thead><tr>{header}</tr></thead>
        <tbody>
{rows}
        </tbody>
    </table>"#,
        count = listing.records.len(),
        header = header.join(""),
        rows = rows.join("\n")
    );

    layout("Prediction History", notice, &body)
}
