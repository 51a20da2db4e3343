use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
};

use crate::ui::{
    components::spinner::Spinner,
    context::AppContext,
    state::AppState,
    traits::{Action, View},
};
use crate::util::colors;

/// Signed-out entry view.
#[derive(Default)]
pub struct SignIn;

#[async_trait]
impl View for SignIn {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, _ctx: &AppContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Min(1),
            ])
            .split(area);

        let heading = Paragraph::new(Line::from("Export Your Subscriptions"))
            .style(
                Style::default()
                    .fg(colors::TEXT)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center);
        f.render_widget(heading, chunks[1]);

        if state.ui.is_authorizing {
            let spinner = Spinner::new()
                .with_style(Style::default().fg(colors::PRIMARY))
                .with_label("Waiting for the browser sign-in to finish...");
            f.render_widget(spinner, chunks[3]);
        } else {
            let prompt = Paragraph::new(Line::from("Press Enter to sign in with Google"))
                .style(Style::default().fg(colors::MUTED))
                .alignment(Alignment::Center);
            f.render_widget(prompt, chunks[3]);
        }

        if let Some(error) = &state.ui.error {
            let error = Paragraph::new(Line::from(error.as_str()))
                .style(Style::default().fg(colors::ERROR))
                .alignment(Alignment::Center);
            f.render_widget(error, chunks[4]);
        }
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        match key.code {
            KeyCode::Enter if !state.ui.is_authorizing => Some(Action::SignIn),
            _ => None,
        }
    }
}
