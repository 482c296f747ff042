//! Cursor over a vertical list: the conversation list, search results and
//! the settings toggles all share it.

use ratatui::widgets::ListState;

use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

/// Persistent selection state. `len` is refreshed by the owning view on
/// every render so key handling can clamp without seeing the items.
#[derive(Default)]
pub struct ListSelection {
    pub list_state: ListState,
    pub len: usize,
}

pub enum ListEvent {
    Activate(usize),
}

impl ListSelection {
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected().filter(|i| *i < self.len)
    }

    /// Updates the item count, keeping the cursor in range.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            None => self.list_state.select(Some(0)),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            Some(_) => {}
        }
    }
}

impl EventHandler for ListSelection {
    type Event = ListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.len == 0 {
            return None;
        }
        let current = self.selected().unwrap_or(0);
        match event {
            TuiEvent::CursorUp => {
                self.list_state.select(Some(current.saturating_sub(1)));
                None
            }
            TuiEvent::CursorDown => {
                self.list_state.select(Some((current + 1).min(self.len - 1)));
                None
            }
            TuiEvent::Submit => Some(ListEvent::Activate(current)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_clamps_at_both_ends() {
        let mut sel = ListSelection::default();
        sel.set_len(2);
        assert_eq!(sel.selected(), Some(0));
        sel.handle_event(&TuiEvent::CursorUp);
        assert_eq!(sel.selected(), Some(0));
        sel.handle_event(&TuiEvent::CursorDown);
        sel.handle_event(&TuiEvent::CursorDown);
        assert_eq!(sel.selected(), Some(1));
        assert!(matches!(
            sel.handle_event(&TuiEvent::Submit),
            Some(ListEvent::Activate(1))
        ));
    }

    #[test]
    fn test_shrinking_list_pulls_cursor_back() {
        let mut sel = ListSelection::default();
        sel.set_len(5);
        sel.list_state.select(Some(4));
        sel.set_len(2);
        assert_eq!(sel.selected(), Some(1));
        sel.set_len(0);
        assert_eq!(sel.selected(), None);
        assert!(sel.handle_event(&TuiEvent::Submit).is_none());
    }
}
