use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;

use crate::app::{App, Message, Model};
use crate::editor::Motion;
use crate::ui::layout::COLUMN_PITCH;

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => Self::handle_key(*key),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            Event::Paste(text) if !text.is_empty() => Some(Message::Paste(text.clone())),
            _ => None,
        }
    }

    /// Map a key press to a message.
    ///
    /// Columns run right to left, so Down/Up walk along the column and
    /// Left/Right step to the next/previous line.
    pub(super) fn handle_key(key: KeyEvent) -> Option<Message> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => Some(Message::Save),
            KeyCode::Char('r') if ctrl => Some(Message::ForceReload),
            KeyCode::Char('w') if ctrl => Some(Message::ToggleWatch),
            KeyCode::Char('q' | 'c') if ctrl => Some(Message::Quit),
            KeyCode::Home if ctrl => Some(Message::MoveCaret(Motion::DocumentStart)),
            KeyCode::End if ctrl => Some(Message::MoveCaret(Motion::DocumentEnd)),
            KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => None,
            KeyCode::Char(c) => Some(Message::InsertChar(c)),
            KeyCode::Enter => Some(Message::SplitLine),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Down => Some(Message::MoveCaret(Motion::NextChar)),
            KeyCode::Up => Some(Message::MoveCaret(Motion::PrevChar)),
            KeyCode::Left => Some(Message::MoveCaret(Motion::NextLine)),
            KeyCode::Right => Some(Message::MoveCaret(Motion::PrevLine)),
            KeyCode::Home => Some(Message::MoveCaret(Motion::LineStart)),
            KeyCode::End => Some(Message::MoveCaret(Motion::LineEnd)),
            KeyCode::PageDown => Some(Message::ScrollForward(4)),
            KeyCode::PageUp => Some(Message::ScrollBack(4)),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let (width, height) = model.view_size;
                if mouse.row >= height || mouse.column >= width {
                    return None;
                }
                let from_right = usize::from((width - 1 - mouse.column) / COLUMN_PITCH);
                let layout = model.layout();
                let (line, offset) =
                    layout.position_at(model.scroll + from_right, usize::from(mouse.row))?;
                Some(Message::MoveTo(line, offset))
            }
            // Wheel down reads on, which in vertical text means moving left.
            MouseEventKind::ScrollDown => Some(Message::ScrollForward(1)),
            MouseEventKind::ScrollUp => Some(Message::ScrollBack(1)),
            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}
