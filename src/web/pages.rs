//! HTML pages

use crate::features::schema::{AGE, FIELDS};
use crate::features::PatientRecord;
use crate::predict::PredictionOutcome;

const TITLE: &str = "Thyroid Cancer Recurrence";

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn layout(heading: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<main>
<h1>{heading}</h1>
{body}
</main>
</body>
</html>
"#,
        title = TITLE,
        heading = escape(heading),
        body = body
    )
}

/// Landing page
pub fn landing() -> String {
    layout(
        TITLE,
        r#"<p>Estimate whether a differentiated thyroid cancer is likely to recur,
based on clinical and pathological findings.</p>
<p><a href="/predict">Start a prediction</a></p>"#,
    )
}

/// Input form pre-filled from `record`
pub fn input_form(record: &PatientRecord) -> String {
    let mut body = String::new();
    body.push_str("<form method=\"post\" action=\"/predict\">\n");

    body.push_str(&format!(
        r#"<label for="{AGE}">{AGE}</label>
<input type="number" id="{AGE}" name="{AGE}" value="{}" required>
"#,
        record.age
    ));

    for spec in FIELDS.iter() {
        let current = record.get(spec.field);
        body.push_str(&format!(
            r#"<label for="{name}">{name}</label>
<select id="{name}" name="{name}">
"#,
            name = escape(spec.name)
        ));

        if !spec.options.contains(&current) {
            body.push_str(&format!(
                "<option value=\"{v}\" selected>{v}</option>\n",
                v = escape(current)
            ));
        }
        for option in spec.options {
            let selected = if *option == current { " selected" } else { "" };
            body.push_str(&format!(
                "<option value=\"{v}\"{selected}>{v}</option>\n",
                v = escape(option)
            ));
        }
        body.push_str("</select>\n");
    }

    body.push_str("<button type=\"submit\">Predict</button>\n</form>");
    layout("Patient details", &body)
}

/// Result page
pub fn result(outcome: &PredictionOutcome) -> String {
    let body = format!(
        r#"<p class="prediction">Recurrence predicted: <strong>{}</strong></p>
<p><a href="/predict">New prediction</a></p>"#,
        escape(&outcome.to_string())
    );
    layout("Prediction", &body)
}
