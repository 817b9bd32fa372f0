use super::{escape, page};
use axum::http::StatusCode;

pub fn render(status: StatusCode, message: &str) -> String {
    let title = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    page(&title, &format!(r#"<p class="error">{}</p>"#, escape(message)))
}
