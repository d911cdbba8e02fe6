//! Human-readable rendering of NASA/ADS search documents.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Authors shown before collapsing the rest into `et al.`.
const MAX_AUTHORS: usize = 4;

#[derive(Debug, Deserialize)]
struct LinkData {
    #[serde(rename = "type")]
    link_type: String,
    url: String,
    #[serde(default)]
    access: Option<String>,
}

/// Turns `"Last, First"` into `"First Last"`.
fn canonical_name(author: &str) -> String {
    author
        .split(',')
        .rev()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn value_lines(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(value_to_text).collect(),
        other => vec![value_to_text(other)],
    }
}

fn format_link(raw: &Value) -> String {
    let parsed = match raw {
        Value::String(text) => serde_json::from_str::<LinkData>(text).ok(),
        other => serde_json::from_value::<LinkData>(other.clone()).ok(),
    };
    match parsed {
        Some(link) => {
            let access = link
                .access
                .filter(|access| !access.is_empty())
                .map(|access| format!("({access})"))
                .unwrap_or_default();
            format!("{} {} {}", link.link_type, access, link.url)
        }
        None => value_to_text(raw),
    }
}

/// Renders one search document as an aligned `label: value` block.
///
/// Known fields come first in a fixed order (Author, Date, Title, Bibcode,
/// URL, Links); everything else follows in key order.
#[must_use]
pub fn format_document(doc: &Map<String, Value>) -> String {
    let mut rows: Vec<(String, Vec<String>)> = Vec::new();
    let mut done: Vec<&str> = Vec::new();

    if let Some(authors) = doc.get("author") {
        let names = value_lines(authors);
        let mut shown: Vec<String> = names
            .iter()
            .take(MAX_AUTHORS)
            .map(|name| canonical_name(name))
            .collect();
        if names.len() > MAX_AUTHORS {
            shown.push("et al.".to_string());
        }
        rows.push(("Author".to_string(), vec![shown.join("; ")]));
        done.push("author");
    }

    if let Some(date) = doc.get("date") {
        rows.push(("Date".to_string(), vec![value_to_text(date)]));
        done.push("date");
    }

    if let Some(title) = doc.get("title") {
        rows.push(("Title".to_string(), vec![value_lines(title).join("; ")]));
        done.push("title");
    }

    if let Some(bibcode) = doc.get("bibcode") {
        let bibcode = value_to_text(bibcode);
        let url = format!("https://ui.adsabs.harvard.edu/abs/{bibcode}/abstract");
        rows.push(("Bibcode".to_string(), vec![bibcode]));
        rows.push(("URL".to_string(), vec![url]));
        done.push("bibcode");
    }

    if let Some(Value::Array(links)) = doc.get("links_data") {
        rows.push(("Links".to_string(), links.iter().map(format_link).collect()));
        done.push("links_data");
    }

    for (key, value) in doc {
        if !done.contains(&key.as_str()) {
            rows.push((key.clone(), value_lines(value)));
        }
    }

    render_rows(&rows)
}

fn render_rows(rows: &[(String, Vec<String>)]) -> String {
    let padding = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0) + 2;
    let indent = " ".repeat(padding);

    let mut text = String::new();
    for (label, lines) in rows {
        text.push_str(&format!("{label:>padding$}: "));
        match lines.as_slice() {
            [] => text.push('\n'),
            [single] => {
                text.push_str(single);
                text.push('\n');
            }
            [first, rest @ ..] => {
                text.push_str(&format!("- {first}\n"));
                for line in rest {
                    text.push_str(&format!("{indent}  - {line}\n"));
                }
            }
        }
    }
    text
}
