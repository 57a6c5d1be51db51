//! Pipeline configuration. Credentials come from the environment (or a
//! `.env` file loaded at startup); everything else ships with defaults and
//! is plain data so tests can build their own.

use crate::dedup::SIMILARITY_WORD_SEQUENCE;
use crate::filters::FilterCriteria;
use crate::scoring::{ScoreBands, ScoreWeights};
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_IMAP_SERVER: &str = "imapmail.libero.it";
pub const DEFAULT_SNAPSHOT_PATH: &str = "listings.json";
pub const DEFAULT_REPORT_PATH: &str = "docs/index.html";

/// Portal alert senders the mailbox search matches on
pub const ALERT_SENDERS: [&str; 3] = [
    "noreply@notifiche.immobiliare.it",
    "noreply_at_casa.it_4j78rss9@duck.com",
    "alerts@idealista.com",
];

#[derive(Clone)]
pub struct MailboxConfig {
    pub server: String,
    pub account: String,
    pub password: String,
}

#[derive(Clone)]
pub struct Config {
    pub mailbox: MailboxConfig,
    pub senders: Vec<String>,
    pub snapshot_path: PathBuf,
    pub report_path: PathBuf,
    pub criteria: FilterCriteria,
    pub weights: ScoreWeights,
    pub bands: ScoreBands,
    pub similarity_word_sequence: usize,
}

impl Config {
    /// Build the full pipeline config from the environment.
    /// `EMAIL_ACCOUNT` and `EMAIL_PASSWORD` are required; everything else
    /// has a default.
    pub fn from_env() -> Result<Self> {
        let account = env::var("EMAIL_ACCOUNT").context("EMAIL_ACCOUNT is not set")?;
        let password = env::var("EMAIL_PASSWORD").context("EMAIL_PASSWORD is not set")?;
        let server =
            env::var("IMAP_SERVER").unwrap_or_else(|_| DEFAULT_IMAP_SERVER.to_string());

        Ok(Self {
            mailbox: MailboxConfig {
                server,
                account,
                password,
            },
            senders: ALERT_SENDERS.iter().map(|s| s.to_string()).collect(),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            criteria: FilterCriteria::default(),
            weights: ScoreWeights::default(),
            bands: ScoreBands::default(),
            similarity_word_sequence: SIMILARITY_WORD_SEQUENCE,
        })
    }
}
