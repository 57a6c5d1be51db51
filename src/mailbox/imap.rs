use super::mime;
use super::traits::{AlertEmail, MailSource};
use crate::config::MailboxConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// IMAPS source for portal alert emails.
///
/// The imap client is synchronous, so the whole session runs inside
/// `spawn_blocking`: connect, login, search the inbox for the configured
/// alert senders, fetch each message, and mark the processed ones `\Seen`.
#[derive(Clone)]
pub struct ImapSource {
    config: MailboxConfig,
    query: String,
}

impl ImapSource {
    pub fn new(config: MailboxConfig, senders: &[String]) -> Self {
        Self {
            query: search_query(senders),
            config,
        }
    }

    fn fetch_blocking(&self) -> Result<Vec<AlertEmail>> {
        let tls = native_tls::TlsConnector::builder()
            .build()
            .context("failed to build TLS connector")?;
        let client = imap::connect(
            (self.config.server.as_str(), 993),
            &self.config.server,
            &tls,
        )
        .context("IMAP connection failed")?;
        let mut session = client
            .login(&self.config.account, &self.config.password)
            .map_err(|(e, _)| e)
            .context("IMAP login failed")?;
        info!("✅ connected to {} as {}", self.config.server, self.config.account);

        session.select("INBOX").context("INBOX select failed")?;
        debug!(query = %self.query, "searching mailbox");
        let mut ids: Vec<u32> = session
            .search(&self.query)
            .context("mailbox search failed")?
            .into_iter()
            .collect();
        ids.sort_unstable();
        info!("🔍 {} emails match the alert senders", ids.len());

        let mut emails = Vec::new();
        for id in ids {
            let seq = id.to_string();
            let fetched = match session.fetch(&seq, "RFC822") {
                Ok(fetched) => fetched,
                Err(e) => {
                    warn!(seq = id, error = %e, "fetch failed, skipping message");
                    continue;
                }
            };
            let Some(message) = fetched.iter().next() else {
                warn!(seq = id, "fetch returned no message, skipping");
                continue;
            };
            let Some(body) = message.body() else {
                warn!(seq = id, "message has no body, skipping");
                continue;
            };

            match mime::parse_alert(body) {
                Ok(email) => {
                    debug!(seq = id, received = %email.received, "alert email staged");
                    emails.push(email);
                    // processed messages are not scanned again next run
                    if let Err(e) = session.store(&seq, "+FLAGS (\\Seen)") {
                        warn!(seq = id, error = %e, "failed to mark message seen");
                    }
                }
                Err(e) => warn!(seq = id, error = %e, "unparseable email left unseen"),
            }
        }

        if let Err(e) = session.logout() {
            warn!(error = %e, "IMAP logout failed");
        }
        Ok(emails)
    }
}

#[async_trait]
impl MailSource for ImapSource {
    async fn fetch(&self) -> Result<Vec<AlertEmail>> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.fetch_blocking())
            .await
            .context("mailbox task failed")?
    }

    fn source_name(&self) -> &'static str {
        "imap"
    }
}

/// Nested binary `OR FROM` terms over the alert sender addresses
fn search_query(senders: &[String]) -> String {
    match senders {
        [] => "ALL".to_string(),
        [only] => format!("FROM \"{only}\""),
        [first, rest @ ..] => format!("OR FROM \"{first}\" {}", search_query(rest)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn senders(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_search_query_nests_binary_ors() {
        assert_eq!(search_query(&senders(&["a@x.it"])), r#"FROM "a@x.it""#);
        assert_eq!(
            search_query(&senders(&["a@x.it", "b@y.it", "c@z.it"])),
            r#"OR FROM "a@x.it" OR FROM "b@y.it" FROM "c@z.it""#
        );
    }

    #[test]
    fn test_search_query_without_senders_matches_all() {
        assert_eq!(search_query(&[]), "ALL");
    }
}
