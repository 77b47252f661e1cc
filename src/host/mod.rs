//! Message protocol between the editor core and its host.
//!
//! The core asks the host to persist content; the host answers with the
//! outcome and can itself ask for a save. Messages are JSON objects tagged by
//! `command`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message from the core to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Outbound {
    /// Persist the full plain-text document.
    Save { content: String },
}

/// Message from the host to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Inbound {
    /// Result of the last `save`.
    SaveComplete { success: bool },
    /// Same as the local save shortcut.
    RequestSave,
}

/// Severity of a host notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Human-readable notification raised by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

pub const SAVE_SUCCESS_NOTICE: &str = "縦書きエディタの内容が保存されました";
pub const SAVE_FAILURE_PREFIX: &str = "保存に失敗しました";

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid host message: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Receiver of core messages.
///
/// Replies are delivered back to the core in order, each as its own event.
pub trait Host {
    fn handle(&mut self, msg: &Outbound) -> Vec<Inbound>;

    /// Drain notifications raised while handling messages.
    fn take_notices(&mut self) -> Vec<Notice> {
        Vec::new()
    }
}

/// Host that saves the document to a file on disk.
#[derive(Debug)]
pub struct FileHost {
    path: PathBuf,
    notices: Vec<Notice>,
}

impl FileHost {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            notices: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, content: &str) -> Result<(), HostError> {
        std::fs::write(&self.path, content).map_err(|source| HostError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl Host for FileHost {
    fn handle(&mut self, msg: &Outbound) -> Vec<Inbound> {
        match msg {
            Outbound::Save { content } => {
                let _scope = crate::perf::scope("host.save");
                match self.write(content) {
                    Ok(()) => {
                        tracing::info!(path = %self.path.display(), bytes = content.len(), "saved");
                        self.notices.push(Notice {
                            level: NoticeLevel::Info,
                            text: SAVE_SUCCESS_NOTICE.to_string(),
                        });
                        vec![Inbound::SaveComplete { success: true }]
                    }
                    Err(err) => {
                        tracing::warn!(%err, "save failed");
                        let reason = match &err {
                            HostError::Write { source, .. } => source.to_string(),
                            other => other.to_string(),
                        };
                        self.notices.push(Notice {
                            level: NoticeLevel::Error,
                            text: format!("{SAVE_FAILURE_PREFIX}: {reason}"),
                        });
                        vec![Inbound::SaveComplete { success: false }]
                    }
                }
            }
        }
    }

    fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

/// Encode a core message as a JSON line.
pub fn encode(msg: &Outbound) -> Result<String, HostError> {
    Ok(serde_json::to_string(msg)?)
}

/// Decode a host message from JSON.
pub fn decode(json: &str) -> Result<Inbound, HostError> {
    Ok(serde_json::from_str(json)?)
}
