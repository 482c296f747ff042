//! # Path Prompt
//!
//! Centered overlay asking for a local image path. Opened with Ctrl+A from
//! the chat (message image) or the profile (avatar image).
//!
//! Follows the persistent state + event pattern: `PathPrompt` lives in
//! `TuiState` while open and emits a `PromptEvent` when done.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};

use crate::core::action::AttachTarget;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::centered_rect;
use crate::tui::event::TuiEvent;

pub struct PathPrompt {
    pub input: String,
    pub target: AttachTarget,
}

pub enum PromptEvent {
    Submit { path: String, target: AttachTarget },
    Cancel,
}

impl PathPrompt {
    pub fn new(target: AttachTarget) -> Self {
        Self {
            input: String::new(),
            target,
        }
    }
}

impl EventHandler for PathPrompt {
    type Event = PromptEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Escape => Some(PromptEvent::Cancel),
            TuiEvent::Submit => Some(PromptEvent::Submit {
                path: self.input.trim().to_string(),
                target: self.target,
            }),
            TuiEvent::InputChar(c) => {
                self.input.push(*c);
                None
            }
            TuiEvent::Paste(text) => {
                self.input.push_str(text.trim_end_matches(['\n', '\r']));
                None
            }
            TuiEvent::Backspace => {
                self.input.pop();
                None
            }
            _ => None,
        }
    }
}

impl Component for PathPrompt {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 30, area);
        frame.render_widget(Clear, overlay);

        let title = match self.target {
            AttachTarget::Composer => " Attach image ",
            AttachTarget::Avatar => " Avatar image ",
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title)
            .title_bottom(Line::from(" Enter load · Esc cancel · max 5 MiB ").centered());

        frame.render_widget(
            Paragraph::new(format!("Path: {}▏", self.input))
                .block(block)
                .wrap(Wrap { trim: false }),
            overlay,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_then_submit_emits_trimmed_path() {
        let mut prompt = PathPrompt::new(AttachTarget::Avatar);
        prompt.handle_event(&TuiEvent::Paste("/tmp/cat.png\n".to_string()));
        prompt.handle_event(&TuiEvent::InputChar(' '));
        match prompt.handle_event(&TuiEvent::Submit) {
            Some(PromptEvent::Submit { path, target }) => {
                assert_eq!(path, "/tmp/cat.png");
                assert_eq!(target, AttachTarget::Avatar);
            }
            _ => panic!("Expected Submit"),
        }
    }

    #[test]
    fn test_escape_cancels() {
        let mut prompt = PathPrompt::new(AttachTarget::Composer);
        prompt.handle_event(&TuiEvent::InputChar('x'));
        prompt.handle_event(&TuiEvent::Backspace);
        assert!(prompt.input.is_empty());
        assert!(matches!(
            prompt.handle_event(&TuiEvent::Escape),
            Some(PromptEvent::Cancel)
        ));
    }
}
