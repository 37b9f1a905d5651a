//! Embedded HTML pages

use axum::response::Html;

use crate::feature_extractor::{
    FORECASTING_INDUSTRY_FIELD, FORECASTING_NUMERIC_FIELDS, PREDICT_INDUSTRY_FIELD,
    PREDICT_NUMERIC_FIELDS,
};
use crate::types::forecast::Industry;
use crate::types::transaction::FraudReport;

/// What the fraud page shows below the upload form
pub enum FraudView<'a> {
    Report(&'a FraudReport),
    Error(String),
}

/// Home page with the /predict form
pub fn index_page(prediction: Option<&str>) -> Html<String> {
    let mut fields: String = PREDICT_NUMERIC_FIELDS.iter().map(|f| number_input(f)).collect();
    fields.push_str(&industry_select(PREDICT_INDUSTRY_FIELD));

    Html(render(
        "GST Liability Prediction",
        &format!(
            r#"<form action="/predict" method="post">{}<button type="submit">Predict</button></form>{}"#,
            fields,
            prediction_block(prediction)
        ),
    ))
}

/// Forecasting page with the CamelCase form
pub fn forecasting_page(prediction: Option<&str>) -> Html<String> {
    let mut fields: String = FORECASTING_NUMERIC_FIELDS.iter().map(|f| number_input(f)).collect();
    fields.push_str(&industry_select(FORECASTING_INDUSTRY_FIELD));

    Html(render(
        "GST Forecasting",
        &format!(
            r#"<form action="/forecasting" method="post">{}<button type="submit">Forecast</button></form>{}"#,
            fields,
            prediction_block(prediction)
        ),
    ))
}

/// Upload page for the fraud filter
pub fn fraudulent_page(view: Option<FraudView<'_>>) -> Html<String> {
    let result = match view {
        None => String::new(),
        Some(FraudView::Error(message)) => {
            format!(r#"<p class="error">{}</p>"#, escape_html(&message))
        }
        Some(FraudView::Report(report)) => report_table(report),
    };

    Html(render(
        "Fraudulent Invoice Detection",
        &format!(
            r#"<form action="/fraudulent" method="post" enctype="multipart/form-data"><input type="file" name="file" accept=".csv,.xlsx"><button type="submit">Upload</button></form>{}"#,
            result
        ),
    ))
}

fn report_table(report: &FraudReport) -> String {
    let mut html = format!(
        r#"<p class="count">Fraudulent transactions found: {}</p>"#,
        report.count
    );
    if report.invoices.is_empty() {
        return html;
    }

    html.push_str("<table><thead><tr><th>InvoiceID</th><th>InvoiceAmount</th><th>InvoiceText</th></tr></thead><tbody>");
    for invoice in &report.invoices {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&invoice.invoice_id.to_string()),
            escape_html(&invoice.invoice_amount.to_string()),
            escape_html(&invoice.invoice_text.to_string()),
        ));
    }
    html.push_str("</tbody></table>");
    html
}

fn prediction_block(prediction: Option<&str>) -> String {
    prediction
        .map(|p| format!(r#"<h2 class="prediction">{}</h2>"#, escape_html(p)))
        .unwrap_or_default()
}

fn number_input(name: &str) -> String {
    format!(
        r#"<label>{name}<input type="number" step="any" name="{name}" required></label>"#,
        name = name
    )
}

fn industry_select(name: &str) -> String {
    let options: String = Industry::ALL
        .iter()
        .map(|i| format!(r#"<option value="{0}">{0}</option>"#, i.label()))
        .collect();
    format!(r#"<label>{name}<select name="{name}">{options}</select></label>"#)
}

fn render(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body>
    <nav><a href="/">Predict</a> | <a href="/forecasting">Forecasting</a> | <a href="/fraudulent">Fraud detection</a></nav>
    <h1>{title}</h1>
    {body}
</body>
</html>"#
    )
}

/// Escape text for inclusion in HTML element content or attributes
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
