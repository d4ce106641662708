//! HTML email templates for demo requests.
//!
//! Every submitted value is passed through [`escape_html`] exactly once before
//! it is embedded. Subjects are plain text and are left unescaped.

use std::fmt::Write as _;

use crate::model::DemoRequest;

/// Product name used in subjects and copy.
pub const BRAND: &str = "Haulwise";

/// Subject and body of a rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

/// Escape the five HTML metacharacters.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

fn row(html: &mut String, label: &str, value_html: &str) {
    let _ = write!(
        html,
        "<tr><td style=\"padding:6px 12px;color:#6b7280;white-space:nowrap\">{label}</td>\
         <td style=\"padding:6px 12px;color:#111827\">{value_html}</td></tr>"
    );
}

/// Internal notification sent to the sales/operations inbox.
#[must_use]
pub fn render_team_notification(req: &DemoRequest) -> RenderedEmail {
    let email = escape_html(&req.email);
    let submitted = req.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();

    let mut rows = String::new();
    row(&mut rows, "Name", &escape_html(&req.name));
    row(&mut rows, "Company", &escape_html(&req.company));
    row(&mut rows, "Role", &escape_html(&req.role));
    row(
        &mut rows,
        "Email",
        &format!("<a href=\"mailto:{email}\">{email}</a>"),
    );
    row(&mut rows, "Submitted", &submitted);
    for (label, value) in req.attribution.present() {
        row(&mut rows, label, &escape_html(value));
    }
    if let Some(ip) = &req.ip {
        row(&mut rows, "IP", &escape_html(ip));
    }

    let html = format!(
        "<!doctype html><html><body style=\"font-family:Inter,Arial,sans-serif;background:#f9fafb;padding:24px\">\
         <h2 style=\"margin:0 0 16px;color:#111827\">New {BRAND} demo request</h2>\
         <table style=\"border-collapse:collapse;background:#ffffff;border:1px solid #e5e7eb\">{rows}</table>\
         <p style=\"color:#6b7280;font-size:13px\">Reply to this email to reach the requester directly.</p>\
         </body></html>"
    );

    RenderedEmail {
        subject: format!("New demo request: {} ({})", req.company, req.name),
        html,
    }
}

/// Auto-reply sent to the person who asked for a demo.
#[must_use]
pub fn render_lead_confirmation(req: &DemoRequest) -> RenderedEmail {
    let name = escape_html(&req.name);
    let company = escape_html(&req.company);

    let html = format!(
        "<!doctype html><html><body style=\"font-family:Inter,Arial,sans-serif;background:#f9fafb;padding:24px\">\
         <h2 style=\"margin:0 0 16px;color:#111827\">Thanks, {name}!</h2>\
         <p style=\"color:#374151\">We received your request for a {BRAND} demo for {company}. \
         Someone from our team will get back to you within one business day to find a time \
         that works.</p>\
         <p style=\"color:#374151\">In the meantime, just reply to this email if there is \
         anything you would like us to prepare: lanes, carriers, volumes, or the tools you use today.</p>\
         <p style=\"color:#374151\">The {BRAND} team</p>\
         </body></html>"
    );

    RenderedEmail {
        subject: format!("Thanks for requesting a {BRAND} demo"),
        html,
    }
}
