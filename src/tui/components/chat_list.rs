//! Conversation list: one row per peer with avatar, name, last message,
//! time and unread badge. Replaced wholesale on every poll.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::api::{ChatSummary, is_image_data};
use crate::tui::component::Component;
use crate::tui::components::message::format_clock;
use crate::tui::components::selection::ListSelection;
use crate::tui::components::{avatar_glyph, truncate_str};

pub struct ChatList<'a> {
    pub state: &'a mut ListSelection,
    pub chats: &'a [ChatSummary],
}

impl<'a> ChatList<'a> {
    pub fn new(state: &'a mut ListSelection, chats: &'a [ChatSummary]) -> Self {
        Self { state, chats }
    }
}

/// Preview text for the last message. Images get a label instead of base64.
pub fn preview(chat: &ChatSummary) -> String {
    match chat.last_message.as_deref() {
        Some(text) if is_image_data(text) => "🖼 Photo".to_string(),
        Some(text) => text.lines().next().unwrap_or_default().to_string(),
        None => String::new(),
    }
}

impl<'a> Component for ChatList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.set_len(self.chats.len());

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Chats ")
            .title_bottom(Line::from(" ↑↓ select  Enter open  F2 find people ").centered())
            .padding(Padding::horizontal(1));

        if self.chats.is_empty() {
            let empty = Paragraph::new("No conversations yet. Press F2 to find someone.")
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let inner_width = area.width.saturating_sub(4) as usize;
        let selected = self.state.selected();
        let items: Vec<ListItem> = self
            .chats
            .iter()
            .enumerate()
            .map(|(i, chat)| {
                let is_selected = selected == Some(i);
                let base = if is_selected {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };

                let time = chat.time.as_deref().map(format_clock).unwrap_or_default();
                let badge = if chat.unread > 0 {
                    format!(" {} ", chat.unread)
                } else {
                    String::new()
                };
                let avatar = avatar_glyph(chat.avatar.as_deref());
                let head = format!("{} {}", avatar, chat.name);
                let gap = inner_width
                    .saturating_sub(head.width() + time.width())
                    .max(1);

                let top = Line::from(vec![
                    Span::styled(head, base.add_modifier(Modifier::BOLD)),
                    Span::styled(" ".repeat(gap), base),
                    Span::styled(time, base.fg(Color::DarkGray)),
                ]);

                let preview_width = inner_width.saturating_sub(badge.width() + 4);
                let bottom = Line::from(vec![
                    Span::styled("   ", base),
                    Span::styled(truncate_str(&preview(chat), preview_width), base.fg(Color::Gray)),
                    Span::raw(" "),
                    Span::styled(
                        badge,
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]);
                ListItem::new(vec![top, bottom])
            })
            .collect();

        frame.render_stateful_widget(List::new(items).block(block), area, &mut self.state.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{buffer_text, chat_summary};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_preview_labels_images() {
        let mut chat = chat_summary(2, "Max", 0);
        chat.last_message = Some("data:image/jpeg;base64,/9j/".to_string());
        assert_eq!(preview(&chat), "🖼 Photo");
        chat.last_message = Some("first\nsecond".to_string());
        assert_eq!(preview(&chat), "first");
        chat.last_message = None;
        assert_eq!(preview(&chat), "");
    }

    #[test]
    fn test_renders_rows_with_unread_badge() {
        let mut state = ListSelection::default();
        let chats = vec![chat_summary(2, "Max", 3), chat_summary(3, "Olga", 0)];
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal
            .draw(|f| ChatList::new(&mut state, &chats).render(f, f.area()))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Max"));
        assert!(text.contains("Olga"));
        assert!(text.contains("see you"));
        assert!(text.contains(" 3 "));
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn test_empty_list_shows_hint() {
        let mut state = ListSelection::default();
        let mut terminal = Terminal::new(TestBackend::new(60, 6)).unwrap();
        terminal
            .draw(|f| ChatList::new(&mut state, &[]).render(f, f.area()))
            .unwrap();
        assert!(buffer_text(&terminal).contains("No conversations yet"));
    }
}
