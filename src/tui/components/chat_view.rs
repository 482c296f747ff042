//! Open conversation: peer header, thread and composer.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use crate::api::Message;
use crate::core::state::{Composer, Peer};
use crate::tui::component::Component;
use crate::tui::components::avatar_glyph;
use crate::tui::components::thread::{Thread, ThreadState};

/// Composer rows including its border.
const COMPOSER_HEIGHT: u16 = 3;

pub struct ChatView<'a> {
    pub thread: &'a mut ThreadState,
    pub peer: &'a Peer,
    pub messages: &'a [Message],
    pub me: i64,
    pub composer: &'a Composer,
}

impl<'a> ChatView<'a> {
    fn header(&self) -> Line<'static> {
        Line::from(vec![
            Span::raw(format!("{} ", avatar_glyph(self.peer.avatar.as_deref()))),
            Span::styled(
                self.peer.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "   Esc back · ↑↓ select · Ctrl+D delete · Ctrl+A attach image",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    }

    fn composer_widget(&self) -> Paragraph<'static> {
        let (title, border) = if self.composer.sending {
            (" Sending… ", Style::default().fg(Color::DarkGray))
        } else {
            (" Message ", Style::default().fg(Color::Cyan))
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(title);

        let line = match &self.composer.attachment {
            Some(_) => Line::from(vec![
                Span::styled(
                    "🖼 image attached",
                    Style::default().fg(Color::Green).add_modifier(Modifier::ITALIC),
                ),
                Span::styled(
                    "  Enter send · Ctrl+X remove",
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            None if self.composer.text.is_empty() => Line::from(Span::styled(
                "Type a message…",
                Style::default().fg(Color::DarkGray),
            )),
            None => Line::from(format!("{}▏", self.composer.text)),
        };
        Paragraph::new(line).block(block).wrap(Wrap { trim: false })
    }
}

impl<'a> Component for ChatView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [header_area, thread_area, composer_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(COMPOSER_HEIGHT),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(self.header()).block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(Color::DarkGray)),
            ),
            header_area,
        );

        if self.messages.is_empty() {
            frame.render_widget(
                Paragraph::new("No messages yet. Say hello!")
                    .style(Style::default().fg(Color::DarkGray))
                    .centered(),
                thread_area,
            );
        } else {
            Thread::new(self.thread, self.messages, self.me).render(frame, thread_area);
        }

        frame.render_widget(self.composer_widget(), composer_area);
    }
}
