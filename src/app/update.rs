use std::time::Instant;

use crate::app::Model;
use crate::app::ToastLevel;
use crate::editor::Motion;
use crate::host::Inbound;

/// All possible events and actions in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a character at the caret
    InsertChar(char),
    /// Insert pasted text; newlines split lines
    Paste(String),
    /// Split the line at the caret (Enter)
    SplitLine,
    /// Backspace; merges into the previous line at a line start
    DeleteBack,
    /// Delete the character at the caret
    DeleteForward,

    // Caret
    MoveCaret(Motion),
    /// Move the caret to (line, char offset), e.g. from a mouse click
    MoveTo(usize, usize),
    /// Scroll the page by n columns toward the end of the document
    ScrollForward(usize),
    /// Scroll the page by n columns toward the start
    ScrollBack(usize),

    // Persistence
    /// Explicit save gesture (Ctrl+S)
    Save,
    /// Message delivered by the host
    Host(Inbound),

    // File watching
    ToggleWatch,
    /// File changed externally
    FileChanged,
    /// Reload from disk, discarding the buffer (Ctrl+R)
    ForceReload,

    // Window
    Resize(u16, u16),

    // Application
    Quit,
}

impl Message {
    /// Whether the message can change document content.
    const fn is_edit(&self) -> bool {
        matches!(
            self,
            Self::InsertChar(_)
                | Self::Paste(_)
                | Self::SplitLine
                | Self::DeleteBack
                | Self::DeleteForward
        )
    }
}

/// Pure function that updates the model based on a message.
///
/// Disk and host I/O happen afterwards in the effect handlers; `update` only
/// queues what they should do.
pub fn update(mut model: Model, msg: Message) -> Model {
    // A save keeps a pending quit confirmation so Ctrl+S then Ctrl+Q works.
    if !matches!(
        msg,
        Message::Quit | Message::Save | Message::Host(Inbound::SaveComplete { .. })
    ) {
        model.quit_confirmed = false;
    }
    let is_edit = msg.is_edit();

    match msg {
        Message::InsertChar(ch) => model.surface.insert_char(ch),
        Message::Paste(text) => model.surface.insert_str(&text),
        Message::SplitLine => model.surface.split_paragraph(),
        Message::DeleteBack => {
            model.surface.delete_back();
        }
        Message::DeleteForward => {
            model.surface.delete_forward();
        }
        Message::MoveCaret(motion) => {
            model.surface.move_caret(motion);
            model.ensure_caret_visible();
        }
        Message::MoveTo(line, offset) => {
            model.surface.move_to(line, offset);
            model.ensure_caret_visible();
        }
        Message::ScrollForward(n) => {
            let max = model
                .layout()
                .column_count()
                .saturating_sub(crate::ui::layout::visible_columns(model.view_size.0));
            model.scroll = (model.scroll + n).min(max);
        }
        Message::ScrollBack(n) => {
            model.scroll = model.scroll.saturating_sub(n);
        }

        Message::Save | Message::Host(Inbound::RequestSave) => model.begin_save(),
        Message::Host(Inbound::SaveComplete { success }) => {
            model.finish_save(success, Instant::now());
        }

        Message::ToggleWatch => {
            model.watch_enabled = !model.watch_enabled;
        }
        Message::FileChanged => {
            if model.is_dirty() {
                model.show_toast(
                    ToastLevel::Warning,
                    "ファイルが外部で変更されました (未保存の変更があるため再読み込みしません)",
                );
            }
        }
        Message::ForceReload => {}

        Message::Resize(width, height) => {
            model.view_size = (width, height.saturating_sub(crate::ui::FOOTER_ROWS));
            model.ensure_caret_visible();
        }

        Message::Quit => {
            if model.is_dirty() && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "未保存の変更があります。もう一度 Ctrl+Q で終了、Ctrl+S で保存",
                );
                model.quit_confirmed = true;
            } else {
                model.should_quit = true;
            }
        }
    }

    if is_edit {
        if let Some(text) = model.surface.take_change() {
            model.mark_changed();
            crate::perf::log_event(
                "surface.change",
                format!("revision={} chars={}", model.revision, text.chars().count()),
            );
        }
        model.ensure_caret_visible();
    }
    model
}
