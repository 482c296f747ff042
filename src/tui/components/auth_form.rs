//! Login / register form. Stateless: focus and values live in `AuthForm`.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::api::AuthAction;
use crate::core::state::{AuthField, AuthForm};
use crate::tui::component::Component;
use crate::tui::components::centered_rect;

pub struct AuthFormView<'a> {
    pub form: &'a AuthForm,
}

impl<'a> AuthFormView<'a> {
    pub fn new(form: &'a AuthForm) -> Self {
        Self { form }
    }

    fn field_line(&self, field: AuthField) -> Line<'static> {
        let value = self.form.value(field);
        let shown = if field == AuthField::Password {
            "•".repeat(value.chars().count())
        } else {
            value.to_string()
        };
        let focused = self.form.focus == field;
        let (marker, style) = if focused {
            ("› ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        } else {
            ("  ", Style::default().fg(Color::Gray))
        };
        let cursor = if focused { "▏" } else { "" };
        Line::from(vec![
            Span::styled(marker, style),
            Span::styled(format!("{:<15}", field.label()), style),
            Span::raw(shown),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ])
    }
}

impl<'a> Component for AuthFormView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (title, toggle_hint) = match self.form.mode {
            AuthAction::Login => (" Sign in ", "Ctrl+R register"),
            AuthAction::Register => (" Create account ", "Ctrl+R sign in"),
        };
        let footer = if self.form.submitting {
            " Please wait… ".to_string()
        } else {
            format!(" Enter submit · Tab next · {} · Esc quit ", toggle_hint)
        };

        let panel = centered_rect(60, 60, area);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(footer).centered())
            .padding(Padding::uniform(1));
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let fields = self.form.fields();
        let [fields_area, _, error_area] = Layout::vertical([
            Constraint::Length(fields.len() as u16 * 2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        let mut lines = Vec::new();
        for field in fields {
            lines.push(self.field_line(*field));
            lines.push(Line::default());
        }
        frame.render_widget(Paragraph::new(lines), fields_area);

        if let Some(error) = &self.form.error {
            frame.render_widget(
                Paragraph::new(error.as_str())
                    .style(Style::default().fg(Color::Red))
                    .alignment(Alignment::Center),
                error_area,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(form: &AuthForm) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| AuthFormView::new(form).render(f, f.area()))
            .unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn test_password_is_masked() {
        let form = AuthForm {
            username: "anna".to_string(),
            password: "hunter2".to_string(),
            ..Default::default()
        };
        let text = render(&form);
        assert!(text.contains("Sign in"));
        assert!(text.contains("anna"));
        assert!(!text.contains("hunter2"));
        assert!(!text.contains("Phone"));
    }

    #[test]
    fn test_register_shows_extra_fields_and_error() {
        let mut form = AuthForm::default();
        form.toggle_mode();
        form.error = Some("Phone number required".to_string());
        let text = render(&form);
        assert!(text.contains("Create account"));
        assert!(text.contains("Phone"));
        assert!(text.contains("Display name"));
        assert!(text.contains("Phone number required"));
    }
}
