//! HTML rendering for the dashboard pages.
//!
//! Pages are assembled as strings; every value taken from a store goes
//! through [`escape`] before it is written out.

pub mod bookings;
pub mod error_page;
pub mod summaries;

const STYLE: &str = concat!(
    "<style>",
    "body{font-family:system-ui,sans-serif;margin:2rem;color:#1d2a1d}",
    "nav a{margin-right:1rem}",
    "table{border-collapse:collapse;width:100%;margin-top:1rem}",
    "th,td{border:1px solid #c8d6c8;padding:.4rem .6rem;text-align:left;vertical-align:top}",
    "th{background:#e8f0e8}",
    "td.num{text-align:right}",
    "ul{margin:0;padding-left:1rem}",
    "</style>"
);

/// Wrap `body` in the shared page layout.
pub fn page(title: &str, body: &str) -> String {
    let mut html = String::from(r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8">"#);
    html.push_str(&format!("<title>{}</title>", escape(title)));
    html.push_str(STYLE);
    html.push_str("</head><body>");
    html.push_str(r#"<nav><a href="/">Bookings</a><a href="/summaries">Summaries</a></nav>"#);
    html.push_str(&format!("<h1>{}</h1>", escape(title)));
    html.push_str(body);
    html.push_str("</body></html>");
    html
}

pub fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Two decimal places, no currency symbol.
pub fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}
