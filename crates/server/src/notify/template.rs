use std::fmt::{self, Write};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::html::{escape_html, escape_multiline};
use crate::models::ContactMessage;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;
const FALLBACK_SUBJECT: &str = "New Inquiry";

#[derive(Debug, Clone)]
pub struct EmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// e.g. `15 March 2024, 09:05:07 PM IST`
pub fn format_submitted_at(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz)
        .format("%-d %B %Y, %I:%M:%S %p %Z")
        .to_string()
}

pub fn render(
    message: &ContactMessage,
    admin_url: Option<&str>,
    tz: Tz,
) -> Result<EmailContent, fmt::Error> {
    let submitted_at = format_submitted_at(message.created_at, tz);
    let subject_line = if message.subject.trim().is_empty() {
        FALLBACK_SUBJECT
    } else {
        message.subject.as_str()
    };
    let admin_url = admin_url.map(str::trim).filter(|u| !u.is_empty());

    let subject = format!("Portfolio Inquiry: {} — {}", message.name, subject_line);

    let mut text = format!(
        "{} ({})\nSubject: {}\n\n{}\n\nSubmitted at: {}",
        message.name, message.email, message.subject, message.message, submitted_at
    );
    if let Some(url) = admin_url {
        text.push_str("\nAdmin: ");
        text.push_str(url);
    }

    Ok(EmailContent {
        subject,
        text,
        html: render_html(message, subject_line, &submitted_at, admin_url)?,
    })
}

fn render_html(
    message: &ContactMessage,
    subject_line: &str,
    submitted_at: &str,
    admin_url: Option<&str>,
) -> Result<String, fmt::Error> {
    let name = escape_html(&message.name);
    let email = escape_html(&message.email);
    let subject = escape_html(subject_line);
    let body = escape_multiline(&message.message);

    let mut html = String::with_capacity(4096);
    write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{subject}</title>
</head>
<body style="margin:0;padding:0;background-color:#0f172a;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Helvetica,Arial,sans-serif;color:#e2e8f0;">
<div style="display:none;max-height:0;overflow:hidden;">New inquiry from {name} — {subject}</div>
<table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="background-color:#0f172a;padding:24px 0;">
<tr><td align="center">
<table width="600" cellpadding="0" cellspacing="0" style="width:600px;max-width:600px;border-radius:16px;overflow:hidden;border:1px solid rgba(255,255,255,0.08);">
<tr><td style="padding:28px 32px;background:linear-gradient(135deg,#3b82f6 0%,#8b5cf6 60%,#ec4899 100%);color:#fff;">
<h1 style="margin:0;font-size:24px;font-weight:700;">New Portfolio Inquiry</h1>
<p style="margin:8px 0 0;font-size:13px;">Submitted at <strong>{submitted_at}</strong></p>
</td></tr>
<tr><td style="padding:24px 32px;">
<h2 style="margin:0 0 14px;font-size:20px;color:#3b82f6;">Contact Details</h2>
<table cellpadding="0" cellspacing="0" width="100%" style="margin:0 0 20px;">
<tr><td style="padding:6px 0;width:120px;color:#94a3b8;">Name:</td><td style="padding:6px 0;font-weight:600;">{name}</td></tr>
<tr><td style="padding:6px 0;width:120px;color:#94a3b8;">Email:</td><td style="padding:6px 0;font-weight:600;">{email}</td></tr>
<tr><td style="padding:6px 0;width:120px;color:#94a3b8;">Subject:</td><td style="padding:6px 0;font-weight:600;">{subject}</td></tr>
</table>
<h2 style="margin:0 0 10px;font-size:20px;color:#8b5cf6;">Message</h2>
<div style="background-color:#101a34;padding:16px 18px;border-radius:12px;font-size:15px;line-height:1.6;color:#f8fafc;">{body}</div>
"#,
        submitted_at = escape_html(submitted_at),
    )?;

    if let Some(url) = admin_url {
        let url = escape_html(url);
        write!(
            html,
            r#"<div style="margin-top:24px;text-align:center;">
<a href="{url}" style="display:inline-block;padding:12px 24px;font-weight:600;color:#fff;text-decoration:none;border-radius:999px;background:linear-gradient(135deg,#3b82f6 0%,#8b5cf6 50%,#ec4899 100%);">Open Admin Dashboard</a>
<div style="font-size:12px;color:#94a3b8;margin-top:8px;">Or paste this link in your browser: {url}</div>
</div>
"#
        )?;
    }

    write!(
        html,
        r#"</td></tr>
<tr><td style="padding:20px 32px;background-color:#0b1220;">
<p style="margin:0 0 6px;font-size:12px;color:#94a3b8;">You received this email because someone submitted the contact form on your portfolio.</p>
<p style="margin:0;font-size:12px;color:#94a3b8;">Reply directly to <strong>{email}</strong> to continue the conversation.</p>
</td></tr>
</table>
</td></tr>
</table>
</body>
</html>
"#
    )?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContactStatus;
    use chrono::TimeZone;

    fn message() -> ContactMessage {
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 15, 35, 7).unwrap();
        ContactMessage {
            id: "m1".into(),
            name: "Ada <Lovelace>".into(),
            email: "ada@example.com".into(),
            subject: "Collab".into(),
            message: "Line one\nLine <two>".into(),
            status: ContactStatus::New,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn submitted_at_uses_zone() {
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 15, 35, 7).unwrap();
        assert_eq!(format_submitted_at(at, DEFAULT_TIMEZONE), "15 March 2024, 09:05:07 PM IST");
        assert_eq!(format_submitted_at(at, chrono_tz::UTC), "15 March 2024, 03:35:07 PM UTC");
    }

    #[test]
    fn subject_and_text() {
        let email = render(&message(), Some("https://example.com/admin"), DEFAULT_TIMEZONE).expect("render");
        assert_eq!(email.subject, "Portfolio Inquiry: Ada <Lovelace> — Collab");
        assert_eq!(
            email.text,
            "Ada <Lovelace> (ada@example.com)\nSubject: Collab\n\nLine one\nLine <two>\n\n\
             Submitted at: 15 March 2024, 09:05:07 PM IST\nAdmin: https://example.com/admin"
        );
    }

    #[test]
    fn html_is_escaped() {
        let email = render(&message(), None, DEFAULT_TIMEZONE).expect("render");
        assert!(email.html.contains("Ada &lt;Lovelace&gt;"));
        assert!(email.html.contains("Line one<br>Line &lt;two&gt;"));
        assert!(!email.html.contains("Open Admin Dashboard"));
        assert!(!email.html.contains("<Lovelace>"));
    }

    #[test]
    fn blank_subject_falls_back() {
        let mut msg = message();
        msg.subject = String::new();
        let email = render(&msg, None, DEFAULT_TIMEZONE).expect("render");
        assert!(email.subject.ends_with("— New Inquiry"));
        assert!(!email.text.contains("Admin:"));
    }
}
