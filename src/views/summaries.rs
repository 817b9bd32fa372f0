use super::{escape, money, page};
use crate::{config::SummaryQuery, models::summary::SummaryReport};

/// Summary table with the columns that apply to the report's query variant.
pub fn render(report: &SummaryReport) -> String {
    if report.rows.is_empty() {
        return page("Summaries", "<p>No summaries found.</p>");
    }

    let headings: &[&str] = match report.query {
        SummaryQuery::Site => &["Campground", "Date", "Total sales", "Total bookings"],
        SummaryQuery::Daily => &[
            "Date",
            "Total sales",
            "Total bookings",
            "Total campsites",
            "Confirmed",
            "Declined",
        ],
    };

    let mut body = String::from("<table><thead><tr>");
    for heading in headings {
        body.push_str(&format!("<th>{}</th>", escape(heading)));
    }
    body.push_str("</tr></thead><tbody>");

    for row in &report.rows {
        let mut cells = Vec::with_capacity(headings.len());
        if report.query == SummaryQuery::Site {
            cells.push(number_cell(row.campground_id));
        }
        cells.push(format!("<td>{}</td>", row.summary_date.format("%Y-%m-%d")));
        cells.push(format!(r#"<td class="num">{}</td>"#, money(row.total_sales)));
        cells.push(number_cell(Some(row.total_bookings)));
        if report.query == SummaryQuery::Daily {
            cells.push(number_cell(row.total_campsites));
            cells.push(number_cell(row.confirmed_bookings));
            cells.push(number_cell(row.declined_bookings));
        }
        body.push_str("<tr>");
        body.push_str(&cells.concat());
        body.push_str("</tr>");
    }

    body.push_str("</tbody></table>");
    page("Summaries", &body)
}

fn number_cell(value: Option<i64>) -> String {
    match value {
        Some(n) => format!(r#"<td class="num">{}</td>"#, n),
        None => r#"<td class="num"></td>"#.to_string(),
    }
}
