//! HTML views. Templates are embedded at build time; `{{ name }}`
//! placeholders are filled with escaped content.

use crate::features::FeatureName;
use crate::ml::PredictionSet;

const ENTRY_TEMPLATE: &str = include_str!("../../templates/entry.html");
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");
const RESULTS_TEMPLATE: &str = include_str!("../../templates/results.html");

/// Landing page.
pub fn render_entry() -> String {
    ENTRY_TEMPLATE.to_string()
}

/// Feature entry form with one numeric input per measurement.
pub fn render_index() -> String {
    let fields = FeatureName::ALL
        .iter()
        .map(|name| {
            format!(
                "    <label>{key} <input type=\"text\" name=\"{key}\" inputmode=\"decimal\" required></label><br>",
                key = escape_html(name.key())
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    fill(INDEX_TEMPLATE, "fields", &fields)
}

/// Results table, one row per model.
pub fn render_results(predictions: &PredictionSet) -> String {
    let rows = predictions
        .entries()
        .iter()
        .map(|(kind, label)| {
            format!(
                "      <tr><td>{}</td><td>{}</td></tr>",
                escape_html(kind.name()),
                escape_html(label.as_str())
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    fill(RESULTS_TEMPLATE, "rows", &rows)
}

fn fill(template: &str, placeholder: &str, content: &str) -> String {
    template.replace(&format!("{{{{ {placeholder} }}}}"), content)
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_has_an_input_per_feature() {
        let html = render_index();
        for name in FeatureName::ALL {
            assert!(html.contains(&format!("name=\"{}\"", name.key())));
        }
        assert!(!html.contains("{{"));
        assert!(html.contains("action=\"/predict\""));
    }

    #[test]
    fn entry_links_to_form() {
        assert!(render_entry().contains("href=\"/index\""));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<a href='x'>&</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn fill_replaces_placeholder() {
        assert_eq!(fill("<p>{{ rows }}</p>", "rows", "ok"), "<p>ok</p>");
    }
}
