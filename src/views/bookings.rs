use super::{escape, money, page};
use crate::models::booking::Booking;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Booking list, in the order given.
pub fn render(bookings: &[Booking]) -> String {
    if bookings.is_empty() {
        return page("Bookings", "<p>No bookings found.</p>");
    }

    let mut body = String::from(concat!(
        "<table><thead><tr>",
        "<th>Booking</th><th>Customer</th><th>Phone</th><th>Address</th><th>Post code</th>",
        "<th>Campsites</th><th>Booked</th><th>Arrival</th><th>Status</th>",
        "<th>Total price</th><th>Confirmation</th>",
        "</tr></thead><tbody>"
    ));

    for booking in bookings {
        body.push_str("<tr>");
        body.push_str(&format!("<td>{}</td>", booking.booking_id));
        body.push_str(&format!("<td>{}</td>", escape(&booking.customer.full_name())));
        body.push_str(&format!("<td>{}</td>", escape(&booking.customer.phone_no)));
        body.push_str(&format!("<td>{}</td>", escape(&booking.customer.address)));
        body.push_str(&format!("<td>{}</td>", escape(&booking.customer.post_code)));

        body.push_str("<td><ul>");
        for site in &booking.campsites {
            body.push_str(&format!(
                "<li>Site {} ({}) at {} per night</li>",
                escape(&site.site_id),
                escape(&site.site_size),
                money(site.daily_rate)
            ));
        }
        body.push_str("</ul></td>");

        body.push_str(&format!("<td>{}</td>", booking.booking_date.format(DATE_FORMAT)));
        body.push_str(&format!("<td>{}</td>", booking.arrival_date.format(DATE_FORMAT)));
        let status = booking
            .status
            .as_ref()
            .map(|s| escape(&s.to_string()))
            .unwrap_or_default();
        body.push_str(&format!("<td>{}</td>", status));
        body.push_str(&format!(
            r#"<td class="num">{}</td>"#,
            money(booking.total_price())
        ));
        if booking.has_confirmation() {
            body.push_str(&format!(
                r#"<td><a href="/booking-confirmation/booking-id:{id}">booking_{id}.pdf</a></td>"#,
                id = booking.booking_id
            ));
        } else {
            body.push_str("<td></td>");
        }
        body.push_str("</tr>");
    }

    body.push_str("</tbody></table>");
    page("Bookings", &body)
}
