use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, SaveStatus, ToastLevel};

/// Colors of the save indicator.
pub fn save_status_style(status: SaveStatus) -> Style {
    let bg = match status {
        SaveStatus::Idle => Color::DarkGray,
        SaveStatus::Unsaved | SaveStatus::Error => Color::Red,
        SaveStatus::Saving => Color::Blue,
        SaveStatus::Saved => Color::Green,
    };
    Style::default().bg(bg).fg(Color::White)
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let filename = model.file_path.file_name().map_or_else(
        || "untitled".to_string(),
        |s| s.to_string_lossy().to_string(),
    );
    let (line, offset) = model.surface.caret_line();
    let watch_indicator = if model.watch_enabled { " [監視中]" } else { "" };

    let indicator = Span::styled(
        format!(" {} ", model.save_status.label()),
        save_status_style(model.save_status),
    );
    let info = Span::raw(format!(
        " {filename}  {}行 {}字{watch_indicator}  Ctrl+S:保存  Ctrl+Q:終了",
        line + 1,
        offset + 1
    ));

    let bar = Paragraph::new(Line::from(vec![indicator, info]))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
