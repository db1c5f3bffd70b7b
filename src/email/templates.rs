use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::order::OrderStatus;
use crate::models::wallet::Direction;

/// Title and plain-text body shared by the in-app row and the email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn render_html(title: &str, message: &str) -> String {
    let paragraphs: String = message
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("<p style=\"margin:0 0 12px\">{}</p>", escape_html(line)))
        .collect();

    format!(
        "<!DOCTYPE html><html><body style=\"font-family:Arial,sans-serif;color:#222\">\
         <div style=\"max-width:600px;margin:0 auto;padding:24px\">\
         <h2 style=\"color:#1a73e8\">{}</h2>{}\
         <p style=\"font-size:12px;color:#888\">You are receiving this because you have an account on our marketplace.</p>\
         </div></body></html>",
        escape_html(title),
        paragraphs
    )
}

pub fn order_status(order_id: Uuid, status: OrderStatus) -> Notice {
    let short_id: String = order_id.to_string().chars().take(8).collect();
    let message = match status {
        OrderStatus::Pending => format!("Your order #{short_id} has been received."),
        OrderStatus::Processing => format!("Your order #{short_id} is being prepared."),
        OrderStatus::Shipped => format!("Your order #{short_id} is on its way."),
        OrderStatus::Delivered => format!("Your order #{short_id} has been delivered. Enjoy!"),
        OrderStatus::Cancelled => format!("Your order #{short_id} has been cancelled."),
    };

    Notice {
        title: format!("Order #{short_id} is now {}", status.as_str()),
        message,
    }
}

pub fn vendor_approved(business_name: &str) -> Notice {
    Notice {
        title: "Your vendor application was approved".to_string(),
        message: format!(
            "Congratulations! {business_name} can now list products on the marketplace.\nSign in to your vendor dashboard to get started."
        ),
    }
}

pub fn vendor_rejected(business_name: &str, reason: &str) -> Notice {
    Notice {
        title: "Your vendor application was not approved".to_string(),
        message: format!(
            "We could not approve the application for {business_name}.\nReason: {reason}"
        ),
    }
}

pub fn payout_approved(amount: Decimal) -> Notice {
    Notice {
        title: "Payout approved".to_string(),
        message: format!("Your payout request of {amount} has been approved."),
    }
}

pub fn payout_rejected(amount: Decimal, reason: &str) -> Notice {
    Notice {
        title: "Payout rejected".to_string(),
        message: format!("Your payout request of {amount} was rejected.\nReason: {reason}"),
    }
}

pub fn wallet_adjusted(direction: Direction, amount: Decimal, balance: Decimal) -> Notice {
    let verb = match direction {
        Direction::Credit => "credited to",
        Direction::Debit => "debited from",
    };

    Notice {
        title: "Wallet updated".to_string(),
        message: format!("{amount} was {verb} your wallet.\nNew balance: {balance}"),
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{escape_html, order_status, render_html};
    use crate::models::order::OrderStatus;

    #[test]
    fn user_text_is_escaped() {
        let html = render_html("<b>Hi</b>", "Tom & \"Jerry\"");
        assert!(html.contains("&lt;b&gt;Hi&lt;/b&gt;"));
        assert!(html.contains("Tom &amp; &quot;Jerry&quot;"));
        assert!(!html.contains("<b>Hi"));
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(escape_html("order 42"), "order 42");
    }

    #[test]
    fn order_notice_names_status_and_short_id() {
        let id = Uuid::parse_str("1234abcd-0000-0000-0000-000000000000").unwrap();
        let notice = order_status(id, OrderStatus::Shipped);
        assert_eq!(notice.title, "Order #1234abcd is now shipped");
        assert!(notice.message.contains("on its way"));
    }
}
