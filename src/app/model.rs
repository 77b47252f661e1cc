use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::document::{DisplayOptions, prepare_content};
use crate::editor::Surface;
use crate::host::Outbound;
use crate::ui::layout::{VerticalLayout, scroll_to_show, visible_columns};

/// How long the "saved" indicator stays before returning to neutral.
pub const SAVED_RESET_DELAY: Duration = Duration::from_secs(2);
const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Persistence state shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Unsaved,
    Saving,
    Saved,
    Error,
}

impl SaveStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle | Self::Saved => "保存済み",
            Self::Unsaved => "未保存",
            Self::Saving => "保存中...",
            Self::Error => "保存失敗",
        }
    }
}

/// The complete application state.
pub struct Model {
    pub surface: Surface,
    pub file_path: PathBuf,
    pub save_status: SaveStatus,
    /// When the last successful save completed.
    pub(super) saved_at: Option<Instant>,
    /// Bumped on every content change.
    pub(super) revision: u64,
    /// Revision that matches the file on disk.
    pub(super) clean_revision: u64,
    /// Revision handed to the host by the save in flight.
    pub(super) saving_revision: Option<u64>,
    /// Messages for the host, drained by the event loop.
    pub(super) outbox: Vec<Outbound>,
    pub watch_enabled: bool,
    /// First visible column, counted from the right edge.
    pub scroll: usize,
    /// Document area size in cells (width, height).
    pub view_size: (u16, u16),
    toast: Option<Toast>,
    pub should_quit: bool,
    /// Set after a first quit attempt with unsaved changes.
    pub quit_confirmed: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_path", &self.file_path)
            .field("save_status", &self.save_status)
            .field("revision", &self.revision)
            .field("watch_enabled", &self.watch_enabled)
            .finish_non_exhaustive()
    }
}

impl Model {
    pub fn new(
        file_path: PathBuf,
        text: &str,
        options: DisplayOptions,
        view_size: (u16, u16),
    ) -> Self {
        Self {
            surface: Surface::from_text(text, options),
            file_path,
            view_size,
            ..Self::default()
        }
    }

    /// Whether the buffer holds changes not yet saved.
    pub const fn is_dirty(&self) -> bool {
        self.revision != self.clean_revision
    }

    /// Record a content change reported by the surface.
    pub(super) fn mark_changed(&mut self) {
        self.revision += 1;
        self.save_status = SaveStatus::Unsaved;
        self.saved_at = None;
    }

    /// Queue a save of the current text.
    pub(super) fn begin_save(&mut self) {
        self.save_status = SaveStatus::Saving;
        self.saving_revision = Some(self.revision);
        self.outbox.push(Outbound::Save {
            content: self.surface.plain_text(),
        });
    }

    pub(super) fn finish_save(&mut self, success: bool, now: Instant) {
        let saved = self.saving_revision.take();
        if success {
            if let Some(revision) = saved {
                self.clean_revision = revision;
            }
            // An edit made while saving keeps the buffer unsaved.
            if self.is_dirty() {
                self.save_status = SaveStatus::Unsaved;
            } else {
                self.save_status = SaveStatus::Saved;
                self.saved_at = Some(now);
            }
        } else {
            self.save_status = SaveStatus::Error;
        }
    }

    /// Take the host messages queued by `update`.
    pub fn take_outbox(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outbox)
    }

    /// Time-based transitions. Returns true when something visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = self.expire_toast(now);
        if self.save_status == SaveStatus::Saved
            && self
                .saved_at
                .is_some_and(|at| now.saturating_duration_since(at) >= SAVED_RESET_DELAY)
        {
            self.save_status = SaveStatus::Idle;
            self.saved_at = None;
            changed = true;
        }
        changed
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Layout of the document for the current view height.
    pub fn layout(&self) -> VerticalLayout {
        VerticalLayout::build(
            self.surface.document(),
            usize::from(self.view_size.1),
            Some(self.surface.caret_line()),
        )
    }

    /// Scroll horizontally so the caret column is on screen.
    pub(super) fn ensure_caret_visible(&mut self) {
        let layout = self.layout();
        let visible = visible_columns(self.view_size.0);
        if let Some(caret) = layout.caret() {
            self.scroll = scroll_to_show(self.scroll, caret.column, visible);
        }
        let max_scroll = layout.column_count().saturating_sub(visible);
        self.scroll = self.scroll.min(max_scroll);
    }

    /// Replace the buffer with the file's current content.
    pub(super) fn reload_from_disk(&mut self) -> Result<()> {
        let raw = std::fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        self.surface.reload(&prepare_content(raw));
        self.clean_revision = self.revision;
        self.saving_revision = None;
        self.save_status = SaveStatus::Idle;
        self.saved_at = None;
        self.ensure_caret_visible();
        Ok(())
    }
}

impl Default for Model {
    fn default() -> Self {
        Self {
            surface: Surface::from_text("", DisplayOptions::default()),
            file_path: PathBuf::new(),
            save_status: SaveStatus::Idle,
            saved_at: None,
            revision: 0,
            clean_revision: 0,
            saving_revision: None,
            outbox: Vec::new(),
            watch_enabled: false,
            scroll: 0,
            view_size: (80, 22),
            toast: None,
            should_quit: false,
            quit_confirmed: false,
        }
    }
}
