use std::path::Path;
use std::time::Duration;

use crate::app::{App, Message, Model, ToastLevel};
use crate::host::{Host, NoticeLevel};
use crate::watcher::FileWatcher;

const WATCH_DEBOUNCE: Duration = Duration::from_millis(200);

impl App {
    pub(super) fn make_file_watcher(path: &Path) -> notify::Result<FileWatcher> {
        FileWatcher::new(path, WATCH_DEBOUNCE)
    }

    /// Perform the I/O a message asked for.
    ///
    /// Returns follow-up messages (host replies) which the caller must feed
    /// back through `update` in order, one at a time.
    pub(super) fn handle_message_side_effects(
        model: &mut Model,
        file_watcher: &mut Option<FileWatcher>,
        host: &mut dyn Host,
        msg: &Message,
    ) -> Vec<Message> {
        match msg {
            Message::ToggleWatch => {
                if model.watch_enabled {
                    match Self::make_file_watcher(&model.file_path) {
                        Ok(watcher) => {
                            *file_watcher = Some(watcher);
                            model.show_toast(ToastLevel::Info, "ファイル監視を開始しました");
                        }
                        Err(err) => {
                            model.watch_enabled = false;
                            *file_watcher = None;
                            model.show_toast(
                                ToastLevel::Warning,
                                format!("ファイル監視を開始できません: {err}"),
                            );
                            crate::perf::log_event(
                                "watcher.error",
                                format!("failed path={} err={err}", model.file_path.display()),
                            );
                        }
                    }
                } else {
                    *file_watcher = None;
                    model.show_toast(ToastLevel::Info, "ファイル監視を停止しました");
                }
            }
            Message::ForceReload => Self::reload(model, true),
            Message::FileChanged if !model.is_dirty() => Self::reload(model, false),
            _ => {}
        }
        Self::deliver_outbox(model, file_watcher, host)
    }

    fn reload(model: &mut Model, announce: bool) {
        match model.reload_from_disk() {
            Ok(()) => {
                tracing::debug!(path = %model.file_path.display(), "reloaded");
                if announce {
                    model.show_toast(ToastLevel::Info, "再読み込みしました");
                }
            }
            Err(err) => {
                tracing::warn!(%err, "reload failed");
                model.show_toast(ToastLevel::Error, format!("再読み込みに失敗しました: {err:#}"));
                crate::perf::log_event(
                    "reload.error",
                    format!("failed path={} err={err}", model.file_path.display()),
                );
            }
        }
    }

    /// Hand queued messages to the host and collect its replies.
    fn deliver_outbox(
        model: &mut Model,
        file_watcher: &mut Option<FileWatcher>,
        host: &mut dyn Host,
    ) -> Vec<Message> {
        let mut replies = Vec::new();
        for outbound in model.take_outbox() {
            if let Some(watcher) = file_watcher.as_mut() {
                watcher.note_own_write();
            }
            let summary: String = format!("{outbound:?}").chars().take(120).collect();
            crate::perf::log_event("host.send", summary);
            replies.extend(host.handle(&outbound).into_iter().map(Message::Host));
        }
        for notice in host.take_notices() {
            let level = match notice.level {
                NoticeLevel::Info => ToastLevel::Info,
                NoticeLevel::Error => ToastLevel::Error,
            };
            model.show_toast(level, notice.text);
        }
        replies
    }
}
