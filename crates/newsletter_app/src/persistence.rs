use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use newsletter_core::{DeliveryResult, Recipient};
use newsletter_engine::{ensure_output_dir, AtomicFileWriter};
use newsletter_logging::{pipeline_info, pipeline_warn};
use serde::{Deserialize, Serialize};

const HISTORY_FILENAME: &str = ".newsletter_history.ron";

/// What one `send` run leaves behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SendRecord {
    pub subject: String,
    pub sent_utc: String,
    pub recipients: usize,
    pub sent: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl SendRecord {
    pub(crate) fn new(subject: &str, recipients: usize, result: &DeliveryResult) -> Self {
        Self {
            subject: subject.to_string(),
            sent_utc: chrono::Utc::now().to_rfc3339(),
            recipients,
            sent: result.sent,
            failed: result.failed,
            errors: result.errors.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SendHistory {
    records: Vec<SendRecord>,
}

pub(crate) fn load_history(dir: &Path) -> Vec<SendRecord> {
    let path = dir.join(HISTORY_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            pipeline_warn!("Failed to read send history from {:?}: {}", path, err);
            return Vec::new();
        }
    };

    match ron::from_str::<SendHistory>(&content) {
        Ok(history) => history.records,
        Err(err) => {
            pipeline_warn!("Failed to parse send history from {:?}: {}", path, err);
            Vec::new()
        }
    }
}

/// Appends `record` to the history kept in `dir` and returns the file path.
pub(crate) fn append_send_record(dir: &Path, record: SendRecord) -> anyhow::Result<PathBuf> {
    ensure_output_dir(dir)?;

    let mut records = load_history(dir);
    records.push(record);
    let history = SendHistory { records };

    let content = ron::ser::to_string_pretty(&history, ron::ser::PrettyConfig::new())
        .context("failed to serialize send history")?;
    let path = AtomicFileWriter::new(dir.to_path_buf())
        .write(HISTORY_FILENAME, &content)
        .context("failed to write send history")?;
    pipeline_info!("Recorded send in {:?}", path);
    Ok(path)
}

/// One entry of the subscriber export.
#[derive(Debug, Clone, Deserialize)]
struct SubscriberEntry {
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    confirmed: bool,
    #[serde(default)]
    unsubscribed: bool,
}

/// Reads the subscriber export and keeps confirmed, still-subscribed entries
/// in file order.
pub(crate) fn load_recipients(path: &Path) -> anyhow::Result<Vec<Recipient>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read subscribers from {}", path.display()))?;
    let entries: Vec<SubscriberEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("malformed subscriber list {}", path.display()))?;
    let total = entries.len();

    let recipients: Vec<Recipient> = entries
        .into_iter()
        .filter(|entry| entry.confirmed && !entry.unsubscribed)
        .filter(|entry| !entry.email.trim().is_empty())
        .map(|entry| Recipient {
            email: entry.email.trim().to_string(),
            name: entry.name.filter(|name| !name.trim().is_empty()),
        })
        .collect();

    pipeline_info!(
        "Loaded {} active subscriber(s) out of {} from {}",
        recipients.len(),
        total,
        path.display()
    );
    Ok(recipients)
}
