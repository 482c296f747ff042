//! # Thread Component
//!
//! Scrollable message history of the open chat.
//!
//! `Thread` is a transient component (created each frame) that wraps
//! `&'a mut ThreadState` (persistent state) and the message slice (props).
//! Heights are measured with `Bubble::calculate_height` before rendering so
//! the `ScrollView` canvas can be sized up front.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::api::Message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Bubble;
use crate::tui::event::TuiEvent;

/// Bubbles take this share of the thread width.
const BUBBLE_WIDTH_PERCENT: u16 = 75;

/// Scroll and selection state for the thread. Lives in `TuiState` and is
/// reset whenever a different chat is opened.
pub struct ThreadState {
    pub scroll_state: ScrollViewState,
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Message picked with the arrow keys (target of delete)
    pub selected_index: Option<usize>,
    pub viewport_height: u16,
    /// Number of messages at the last render, for clamping the selection.
    pub len: usize,
}

impl Default for ThreadState {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            stick_to_bottom: true,
            selected_index: None,
            viewport_height: 0,
            len: 0,
        }
    }

    fn total_height(&self) -> u16 {
        self.heights.iter().sum()
    }

    fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights.clear();
        let mut acc = 0u16;
        for h in &self.heights {
            acc = acc.saturating_add(*h);
            self.prefix_heights.push(acc);
        }
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.total_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user scrolls back to the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.total_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Scroll the viewport so the selected message is fully visible.
    pub fn scroll_to_selected(&mut self) {
        let Some(idx) = self.selected_index else {
            return;
        };
        if idx >= self.prefix_heights.len() {
            return;
        }
        let item_top = if idx == 0 {
            0
        } else {
            self.prefix_heights[idx - 1]
        };
        let item_bottom = self.prefix_heights[idx];
        let offset_y = self.scroll_state.offset().y;

        if item_top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: item_top });
            self.stick_to_bottom = false;
        } else if item_bottom > offset_y + self.viewport_height {
            let new_y = item_bottom.saturating_sub(self.viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
            let max_y = self.total_height().saturating_sub(self.viewport_height);
            self.stick_to_bottom = new_y >= max_y;
        }
    }

    fn select_previous(&mut self) {
        if self.len == 0 {
            return;
        }
        self.selected_index = Some(match self.selected_index {
            Some(i) => i.saturating_sub(1),
            None => self.len - 1,
        });
        self.scroll_to_selected();
    }

    fn select_next(&mut self) {
        match self.selected_index {
            Some(i) if i + 1 < self.len => {
                self.selected_index = Some(i + 1);
                self.scroll_to_selected();
            }
            // Moving past the newest message leaves selection mode
            Some(_) => {
                self.selected_index = None;
                self.stick_to_bottom = true;
            }
            None => {}
        }
    }
}

/// Arrow keys move the selection, page keys and the wheel scroll.
impl EventHandler for ThreadState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorUp => self.select_previous(),
            TuiEvent::CursorDown => self.select_next(),
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

pub struct Thread<'a> {
    pub state: &'a mut ThreadState,
    pub messages: &'a [Message],
    /// The signed-in user; their messages are right-aligned.
    pub me: i64,
}

/// Widest a bubble may be for a thread `content_width` columns wide.
fn bubble_width(content_width: u16) -> u16 {
    (u32::from(content_width) * u32::from(BUBBLE_WIDTH_PERCENT) / 100).max(1) as u16
}

impl<'a> Thread<'a> {
    pub fn new(state: &'a mut ThreadState, messages: &'a [Message], me: i64) -> Self {
        Self {
            state,
            messages,
            me,
        }
    }
}

impl<'a> Component for Thread<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        let bubble_width = bubble_width(content_width);

        self.state.len = self.messages.len();
        if self
            .state
            .selected_index
            .is_some_and(|i| i >= self.messages.len())
        {
            self.state.selected_index = None;
        }

        self.state.heights = self
            .messages
            .iter()
            .map(|m| Bubble::calculate_height(m, bubble_width))
            .collect();
        self.state.rebuild_prefix_heights();
        let total_height = self.state.total_height();

        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        for (i, message) in self.messages.iter().enumerate() {
            let height = self.state.heights[i];
            let mine = message.sender_id == self.me;
            let x = if mine {
                content_width.saturating_sub(bubble_width)
            } else {
                0
            };
            let rect = Rect::new(x, y_offset, bubble_width, height);
            let is_selected = self.state.selected_index == Some(i);
            scroll_view.render_widget(Bubble::new(message, mine, is_selected), rect);
            y_offset = y_offset.saturating_add(height);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{buffer_text, message};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(state: &mut ThreadState, messages: &[Message]) -> String {
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal
            .draw(|f| Thread::new(state, messages, 1).render(f, f.area()))
            .unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn test_bubble_width_on_very_wide_terminals() {
        assert_eq!(bubble_width(40), 30);
        assert_eq!(bubble_width(1000), 750);
        assert_eq!(bubble_width(u16::MAX), 49151);
        assert_eq!(bubble_width(0), 1);
    }

    #[test]
    fn test_renders_both_sides_of_conversation() {
        let mut state = ThreadState::new();
        let messages = vec![message(1, 2, 1, "ping"), message(2, 1, 2, "pong")];
        let text = render(&mut state, &messages);
        assert!(text.contains("ping"));
        assert!(text.contains("pong"));
        assert_eq!(state.len, 2);
        assert_eq!(state.heights, vec![3, 3]);
    }

    #[test]
    fn test_selection_walks_from_newest() {
        let mut state = ThreadState::new();
        let messages = vec![message(1, 2, 1, "a"), message(2, 1, 2, "b")];
        render(&mut state, &messages);

        state.handle_event(&TuiEvent::CursorUp);
        assert_eq!(state.selected_index, Some(1));
        state.handle_event(&TuiEvent::CursorUp);
        state.handle_event(&TuiEvent::CursorUp);
        assert_eq!(state.selected_index, Some(0));
        state.handle_event(&TuiEvent::CursorDown);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.selected_index, None);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_selection_dropped_when_list_shrinks() {
        let mut state = ThreadState::new();
        state.selected_index = Some(3);
        render(&mut state, &[message(1, 1, 2, "only")]);
        assert_eq!(state.selected_index, None);
    }

    #[test]
    fn test_scroll_up_unpins() {
        let mut state = ThreadState::new();
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
    }
}
