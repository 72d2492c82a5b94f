use std::time::Duration;
use tracing::trace;

use crate::domain::{CTVConfig, CTVError, Message};
use crate::model::Model;
use crate::sort::SortKey;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &CTVConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    /// Waits up to the poll time for a key press. `None` on timeout, which
    /// still lets the model poll the loader and advance the spinner.
    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, CTVError> {
        if event::poll(Duration::from_millis(self.event_poll_time))?
            && let Event::Key(key) = event::read()?
            && key.kind == event::KeyEventKind::Press
        {
            return Ok(self.map_key(key, model.raw_keyevents()));
        }
        Ok(None)
    }

    pub fn map_key(&self, key: KeyEvent, raw: bool) -> Option<Message> {
        if raw {
            return Some(Message::RawKey(key));
        }
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('?') => Some(Message::Help),
            KeyCode::Esc => Some(Message::Exit),
            KeyCode::Enter => Some(Message::Enter),
            KeyCode::Char('f') => Some(Message::ToggleFilter),
            KeyCode::Char('c') => Some(Message::ClearFilter),
            KeyCode::Char('/') => Some(Message::EnterCommand),
            KeyCode::Up | KeyCode::Char('k') => Some(Message::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::MoveDown),
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h') => Some(Message::MoveLeft),
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char('l') => Some(Message::MoveRight),
            KeyCode::Home | KeyCode::Char('g') => Some(Message::MoveBeginning),
            KeyCode::End | KeyCode::Char('G') => Some(Message::MoveEnd),
            KeyCode::Char('+') => Some(Message::GrowPageSize),
            KeyCode::Char('-') => Some(Message::ShrinkPageSize),
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                Some(Message::SortBy(SortKey::COLUMNS[idx]))
            }
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn maps_navigation_and_commands() {
        let controller = Controller::new(&CTVConfig::default());
        assert_eq!(controller.map_key(key(KeyCode::Char('q')), false), Some(Message::Quit));
        assert_eq!(controller.map_key(key(KeyCode::Right), false), Some(Message::MoveRight));
        assert_eq!(controller.map_key(key(KeyCode::PageUp), false), Some(Message::MoveLeft));
        assert_eq!(controller.map_key(key(KeyCode::Char('f')), false), Some(Message::ToggleFilter));
        assert_eq!(controller.map_key(key(KeyCode::Char('x')), false), None);
    }

    #[test]
    fn digits_select_sort_columns() {
        let controller = Controller::new(&CTVConfig::default());
        assert_eq!(
            controller.map_key(key(KeyCode::Char('1')), false),
            Some(Message::SortBy(SortKey::Name))
        );
        assert_eq!(
            controller.map_key(key(KeyCode::Char('3')), false),
            Some(Message::SortBy(SortKey::NameUn))
        );
        assert_eq!(
            controller.map_key(key(KeyCode::Char('5')), false),
            Some(Message::SortBy(SortKey::HasStates))
        );
        assert_eq!(controller.map_key(key(KeyCode::Char('6')), false), None);
    }

    #[test]
    fn raw_mode_forwards_every_key() {
        let controller = Controller::new(&CTVConfig::default());
        let q = key(KeyCode::Char('q'));
        assert_eq!(controller.map_key(q, true), Some(Message::RawKey(q)));
    }
}
