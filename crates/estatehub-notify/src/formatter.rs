//! Rendering of the new-listing announcement email.

use estatehub_core::traits::EmailMessage;

use crate::fanout::NewListingEvent;

/// Render the announcement of `event` for one recipient.
pub fn new_listing_email(recipient_name: &str, recipient_email: &str, event: &NewListingEvent) -> EmailMessage {
    let greeting = if recipient_name.trim().is_empty() {
        "there"
    } else {
        recipient_name.trim()
    };
    let city = event.city.as_deref().unwrap_or("N/A");
    let property_type = event.property_type.as_deref().unwrap_or("N/A");
    let listing_type = event.listing_type.as_deref().unwrap_or("N/A");
    let price = event.price.map(format_price);

    let mut text = format!(
        "New Property Listed!\n\n\
         Hello {greeting},\n\n\
         A new property has been added: {title}\n\
         Location: {city}\n\
         Property Type: {property_type}\n\
         Listing Type: {listing_type}\n",
        title = event.title,
    );
    if let Some(price) = &price {
        text.push_str(&format!("Price: ${price}\n"));
    }
    text.push_str("\nVisit our website to see more details.\n");

    let price_row = price
        .map(|p| format!("<p><strong>Price:</strong> ${p}</p>"))
        .unwrap_or_default();
    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h2>New Property Listed!</h2>\
         <p>Hello {greeting},</p>\
         <p>A new property has been added to our listings that might interest you:</p>\
         <div style=\"background-color: #f5f5f5; padding: 20px; border-radius: 8px;\">\
         <h3>{title}</h3>\
         <p><strong>Location:</strong> {city}</p>\
         <p><strong>Property Type:</strong> {property_type}</p>\
         <p><strong>Listing Type:</strong> {listing_type}</p>\
         {price_row}\
         </div>\
         <p>Visit our website to see more details and photos of this property.</p>\
         <p style=\"color: #666; font-size: 12px;\">You're receiving this email because you're registered on our platform.</p>\
         </div>",
        greeting = escape_html(greeting),
        title = escape_html(&event.title),
        city = escape_html(city),
        property_type = escape_html(property_type),
        listing_type = escape_html(listing_type),
    );

    EmailMessage {
        to: recipient_email.to_string(),
        subject: format!("New Property Available: {}", event.title),
        text,
        html,
    }
}

/// Group thousands with commas; keep at most two decimals.
pub fn format_price(price: f64) -> String {
    let cents = (price.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if price < 0.0 && cents > 0 { "-" } else { "" };
    match fraction {
        0 => format!("{sign}{grouped}"),
        f if f % 10 == 0 => format!("{sign}{grouped}.{}", f / 10),
        f => format!("{sign}{grouped}.{f:02}"),
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn event(price: Option<f64>) -> NewListingEvent {
        NewListingEvent {
            listing_id: Uuid::nil(),
            title: "Villa <Sol>".into(),
            city: Some("Miami".into()),
            property_type: None,
            listing_type: Some("Sale".into()),
            price,
        }
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "0");
        assert_eq!(format_price(950.0), "950");
        assert_eq!(format_price(1_250_000.0), "1,250,000");
        assert_eq!(format_price(1234.5), "1,234.5");
        assert_eq!(format_price(99.99), "99.99");
    }

    #[test]
    fn test_email_contents() {
        let msg = new_listing_email("Ana", "ana@example.com", &event(Some(350_000.0)));
        assert_eq!(msg.to, "ana@example.com");
        assert_eq!(msg.subject, "New Property Available: Villa <Sol>");
        assert!(msg.text.contains("Hello Ana,"));
        assert!(msg.text.contains("Location: Miami"));
        assert!(msg.text.contains("Property Type: N/A"));
        assert!(msg.text.contains("Listing Type: Sale"));
        assert!(msg.text.contains("Price: $350,000"));
        assert!(msg.html.contains("Villa &lt;Sol&gt;"));
    }

    #[test]
    fn test_anonymous_recipient_and_no_price() {
        let msg = new_listing_email("  ", "x@example.com", &event(None));
        assert!(msg.text.contains("Hello there,"));
        assert!(!msg.text.contains("Price:"));
        assert!(!msg.html.contains("Price:"));
    }
}
