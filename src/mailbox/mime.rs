use super::traits::AlertEmail;
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use mailparse::{DispositionType, MailHeaderMap, ParsedMail};
use tracing::warn;

/// Parse a raw RFC822 message into its HTML body and receive time
pub fn parse_alert(raw: &[u8]) -> Result<AlertEmail> {
    let mail = mailparse::parse_mail(raw).context("malformed MIME message")?;
    let received = received_time(&mail);
    let html = html_part(&mail).context("email has no HTML body")?;
    Ok(AlertEmail { received, html })
}

fn received_time(mail: &ParsedMail<'_>) -> DateTime<Utc> {
    let parsed = mail
        .headers
        .get_first_value("Date")
        .and_then(|date| mailparse::dateparse(&date).ok())
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single());
    match parsed {
        Some(received) => received,
        None => {
            warn!("email has no usable Date header, falling back to now");
            Utc::now()
        }
    }
}

/// Depth-first search for a text/html part that is not an attachment
fn html_part(mail: &ParsedMail<'_>) -> Option<String> {
    if mail.subparts.is_empty() {
        let is_html = mail.ctype.mimetype.eq_ignore_ascii_case("text/html");
        let is_attachment =
            mail.get_content_disposition().disposition == DispositionType::Attachment;
        if is_html && !is_attachment {
            return mail.get_body().ok();
        }
        return None;
    }
    mail.subparts.iter().find_map(html_part)
}
