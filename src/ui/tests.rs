use super::*;
use crate::app::{Message, Model, SaveStatus, update};
use crate::document::DisplayOptions;
use crate::host::Inbound;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::style::Color;
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

const WIDTH: u16 = 30;
const HEIGHT: u16 = 8;

fn create_test_terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap()
}

fn model(text: &str) -> Model {
    Model::new(
        PathBuf::from("原稿.txt"),
        text,
        DisplayOptions::default(),
        (WIDTH, HEIGHT - FOOTER_ROWS),
    )
}

fn draw(model: &Model) -> Buffer {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    terminal.backend().buffer().clone()
}

/// Row contents with the filler cells behind wide chars skipped.
fn row_text(buf: &Buffer, y: u16) -> String {
    let mut out = String::new();
    let mut x = 0;
    while x < buf.area.width {
        let symbol = buf[(x, y)].symbol();
        out.push_str(symbol);
        x += u16::try_from(symbol.width().max(1)).unwrap_or(1);
    }
    out
}

#[test]
fn test_status_bar_shows_file_and_caret() {
    let buf = draw(&model("本文"));
    let status = row_text(&buf, HEIGHT - 1);
    assert!(status.contains("保存済み"), "status: {status}");
    assert!(status.contains("原稿.txt"), "status: {status}");
    assert!(status.contains("1行"), "status: {status}");
}

#[test]
fn test_status_bar_shows_unsaved_after_edit() {
    let model = update(model("本文"), Message::InsertChar('新'));
    assert_eq!(model.save_status, SaveStatus::Unsaved);
    let buf = draw(&model);
    assert!(row_text(&buf, HEIGHT - 1).contains("未保存"));
}

#[test]
fn test_save_failure_shows_error_indicator() {
    let model = update(model("本文"), Message::InsertChar('新'));
    let model = update(model, Message::Save);
    let model = update(model, Message::Host(Inbound::SaveComplete { success: false }));
    let buf = draw(&model);
    let status = row_text(&buf, HEIGHT - 1);
    assert!(status.contains("保存失敗"), "status: {status}");
    let indicator_x = (0..WIDTH)
        .find(|&x| buf[(x, HEIGHT - 1)].symbol() == "保")
        .unwrap();
    assert_eq!(buf[(indicator_x, HEIGHT - 1)].bg, Color::Red);
}

#[test]
fn test_save_status_colors() {
    assert_eq!(save_status_style(SaveStatus::Saving).bg, Some(Color::Blue));
    assert_eq!(save_status_style(SaveStatus::Saved).bg, Some(Color::Green));
    assert_eq!(save_status_style(SaveStatus::Unsaved).bg, Some(Color::Red));
    assert_eq!(save_status_style(SaveStatus::Idle).bg, Some(Color::DarkGray));
}

#[test]
fn test_toast_bar_shows_quit_warning() {
    let model = update(model("本文"), Message::InsertChar('新'));
    let model = update(model, Message::Quit);
    let buf = draw(&model);
    let toast = row_text(&buf, HEIGHT - 2);
    assert!(toast.starts_with("[warn]"), "toast: {toast}");
}

#[test]
fn test_document_starts_at_right_edge() {
    let buf = draw(&model("縦書き"));
    let x = WIDTH - layout::COLUMN_CELLS;
    assert_eq!(buf[(x, 0)].symbol(), "縦");
    assert_eq!(buf[(x, 1)].symbol(), "書");
    assert_eq!(buf[(x, 2)].symbol(), "き");
}

#[test]
fn test_scrolled_document_shows_caret_column() {
    // Twelve lines on a page that fits ten columns.
    let text = (1..=12).map(|i| format!("行{i}")).collect::<Vec<_>>().join("\n");
    let mut model = model(&text);
    for _ in 0..11 {
        model = update(model, Message::MoveCaret(crate::editor::Motion::NextLine));
    }
    assert!(model.scroll > 0);
    let buf = draw(&model);
    let caret_cells = (0..WIDTH)
        .flat_map(|x| (0..HEIGHT - FOOTER_ROWS).map(move |y| (x, y)))
        .filter(|&pos| buf[pos].bg == Color::White)
        .count();
    assert!(caret_cells > 0);
}
