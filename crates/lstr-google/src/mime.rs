//! Minimal RFC 5322 message rendering for the Gmail `messages/send` call.

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;

use crate::collab::EmailMessage;

/// Renders a single-part `text/html` message from `from`.
#[must_use]
pub fn render_message(message: &EmailMessage, from: &str) -> String {
    let mut out = String::new();
    out.push_str("Content-Type: text/html; charset=\"utf-8\"\r\n");
    out.push_str("MIME-Version: 1.0\r\n");
    out.push_str("Content-Transfer-Encoding: base64\r\n");
    push_header(&mut out, "To", &message.to);
    push_header(&mut out, "Cc", &message.cc);
    push_header(&mut out, "Reply-To", &message.reply_to);
    push_header(&mut out, "From", from);
    push_header(&mut out, "Subject", &encode_word(&message.subject));
    out.push_str("\r\n");

    let body = STANDARD.encode(message.html_body.as_bytes());
    for line in body.as_bytes().chunks(76) {
        // base64 output is ASCII
        out.push_str(&String::from_utf8_lossy(line));
        out.push_str("\r\n");
    }
    out
}

/// URL-safe base64 of the rendered message, as the `raw` field expects.
#[must_use]
pub fn encode_raw(message: &EmailMessage, from: &str) -> String {
    URL_SAFE.encode(render_message(message, from).as_bytes())
}

fn push_header(out: &mut String, name: &str, value: &str) {
    let value = value.replace(['\r', '\n'], " ");
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    out.push_str(name);
    out.push_str(": ");
    out.push_str(value);
    out.push_str("\r\n");
}

/// RFC 2047 encoded-word for non-ASCII header text.
fn encode_word(text: &str) -> String {
    if text.is_ascii() {
        text.to_string()
    } else {
        format!("=?utf-8?B?{}?=", STANDARD.encode(text.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            to: "a@example.edu, b@example.edu".to_string(),
            reply_to: "help@example.edu".to_string(),
            cc: String::new(),
            subject: "Weekly usage 10/19/2026".to_string(),
            html_body: "<p>Hours: 29</p>".to_string(),
        }
    }

    #[test]
    fn headers_skip_empty_fields() {
        let rendered = render_message(&message(), "reports@example.edu");
        assert!(rendered.contains("To: a@example.edu, b@example.edu\r\n"));
        assert!(rendered.contains("Reply-To: help@example.edu\r\n"));
        assert!(rendered.contains("From: reports@example.edu\r\n"));
        assert!(rendered.contains("Subject: Weekly usage 10/19/2026\r\n"));
        assert!(!rendered.contains("Cc:"));
        assert!(rendered.contains("Content-Type: text/html"));
    }

    #[test]
    fn body_is_base64_after_blank_line() {
        let rendered = render_message(&message(), "me");
        let (_, body) = rendered.split_once("\r\n\r\n").unwrap();
        let decoded = STANDARD.decode(body.replace("\r\n", "")).unwrap();
        assert_eq!(decoded, b"<p>Hours: 29</p>");
    }

    #[test]
    fn header_line_breaks_are_flattened() {
        let mut msg = message();
        msg.subject = "Report\r\nBcc: evil@example.com".to_string();
        let rendered = render_message(&msg, "me");
        assert!(!rendered.contains("\r\nBcc:"));
    }

    #[test]
    fn non_ascii_subject_is_encoded() {
        let mut msg = message();
        msg.subject = "Résumé".to_string();
        let rendered = render_message(&msg, "me");
        assert!(rendered.contains("Subject: =?utf-8?B?UsOpc3Vtw6k=?=\r\n"));
    }

    #[test]
    fn raw_is_url_safe_base64_of_the_message() {
        let raw = encode_raw(&message(), "me");
        assert!(!raw.contains('+') && !raw.contains('/'));
        let decoded = URL_SAFE.decode(&raw).unwrap();
        assert_eq!(decoded, render_message(&message(), "me").into_bytes());
    }
}
