//! Profile editor: display name and avatar. Username and phone are shown
//! read-only.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::api::{User, is_image_data};
use crate::core::state::{ProfileField, ProfileForm};
use crate::tui::component::Component;
use crate::tui::components::{avatar_glyph, centered_rect};

pub struct ProfileView<'a> {
    pub user: &'a User,
    pub form: &'a ProfileForm,
}

impl<'a> ProfileView<'a> {
    pub fn new(user: &'a User, form: &'a ProfileForm) -> Self {
        Self { user, form }
    }

    fn editable(&self, field: ProfileField, label: &str, value: &str) -> Line<'static> {
        let focused = self.form.focus == field;
        let style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if focused { "› " } else { "  " };
        let cursor = if focused { "▏" } else { "" };
        Line::from(vec![
            Span::styled(marker, style),
            Span::styled(format!("{:<14}", label), style),
            Span::raw(value.to_string()),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ])
    }

    fn read_only(label: &str, value: &str) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("  {:<14}", label), Style::default().fg(Color::DarkGray)),
            Span::styled(value.to_string(), Style::default().fg(Color::DarkGray)),
        ])
    }
}

impl<'a> Component for ProfileView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let footer = if self.form.saving {
            " Saving… ".to_string()
        } else {
            " Enter save · Tab switch · Ctrl+A avatar image · Ctrl+L log out ".to_string()
        };

        let panel = centered_rect(70, 60, area);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(
                " {} {} ",
                avatar_glyph(self.user.avatar.as_deref()),
                self.user.display_name
            ))
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(footer).centered())
            .padding(Padding::uniform(1));

        let avatar_value = if is_image_data(&self.form.avatar) {
            "🖼 image".to_string()
        } else {
            self.form.avatar.clone()
        };

        let lines = vec![
            Self::read_only("Username", &self.user.username),
            Self::read_only("Phone", self.user.phone.as_deref().unwrap_or("-")),
            Line::default(),
            self.editable(
                ProfileField::DisplayName,
                "Display name",
                &self.form.display_name,
            ),
            Line::default(),
            self.editable(ProfileField::Avatar, "Avatar", &avatar_value),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), panel);
    }
}
