//! # Email Templates
//!
//! Askama HTML and plain-text bodies for the two transactional emails.
//! HTML output is escaped by the template engine.

use askama::Template;
use shop_core::notify::{DeliveryStatus, NotifyError, OrderConfirmation, StatusBanner};
use shop_core::shipping::tracking_link;

const DATE_FORMAT: &str = "%B %d, %Y";

/// A rendered message, ready for any transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Sender-side details the templates need
#[derive(Debug, Clone, Copy)]
pub struct Branding<'a> {
    pub store_name: &'a str,
    pub support_email: &'a str,
    pub tracking_url: Option<&'a str>,
}

/// Values shared by both confirmation bodies
struct ConfirmationEmail<'a> {
    order: &'a OrderConfirmation,
    store_name: &'a str,
    support_email: &'a str,
    recipient: &'a str,
    ordered_on: String,
    delivery_on: String,
    track_link: Option<String>,
}

#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    email: &'a ConfirmationEmail<'a>,
}

#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    email: &'a ConfirmationEmail<'a>,
}

#[derive(Template)]
#[template(path = "email/status_update.html")]
struct StatusUpdateHtml<'a> {
    order_id: &'a str,
    banner: &'a StatusBanner,
    tracking_url: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "email/status_update.txt")]
struct StatusUpdateText<'a> {
    order_id: &'a str,
    banner: &'a StatusBanner,
    tracking_url: Option<&'a str>,
}

fn render_error(e: askama::Error) -> NotifyError {
    NotifyError::Render(e.to_string())
}

pub fn order_confirmation(
    confirmation: &OrderConfirmation,
    recipient: &str,
    branding: Branding<'_>,
) -> Result<RenderedEmail, NotifyError> {
    let email = ConfirmationEmail {
        order: confirmation,
        store_name: branding.store_name,
        support_email: branding.support_email,
        recipient,
        ordered_on: confirmation.ordered_at.format(DATE_FORMAT).to_string(),
        delivery_on: confirmation.estimated_delivery.format(DATE_FORMAT).to_string(),
        track_link: branding
            .tracking_url
            .map(|base| tracking_link(base, &confirmation.order_id)),
    };

    Ok(RenderedEmail {
        subject: format!("✓ Order Confirmation #{}", confirmation.order_id),
        html: OrderConfirmationHtml { email: &email }.render().map_err(render_error)?,
        text: OrderConfirmationText { email: &email }.render().map_err(render_error)?,
    })
}

pub fn status_update(
    order_id: &str,
    status: &DeliveryStatus,
    tracking_url: Option<&str>,
) -> Result<RenderedEmail, NotifyError> {
    let banner = status.banner();

    Ok(RenderedEmail {
        subject: format!("{} {} - Order #{}", banner.icon, banner.title, order_id),
        html: StatusUpdateHtml {
            order_id,
            banner: &banner,
            tracking_url,
        }
        .render()
        .map_err(render_error)?,
        text: StatusUpdateText {
            order_id,
            banner: &banner,
            tracking_url,
        }
        .render()
        .map_err(render_error)?,
    })
}
