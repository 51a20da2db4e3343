use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::Style,
    symbols::border,
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::app::App;
use crate::ui::state::{AppState, FetchState};
use crate::util::colors;

pub struct AppLayout<'a> {
    pub app: &'a mut App,
}

impl<'a> AppLayout<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    pub fn render(self, f: &mut Frame) {
        let area = f.area();
        f.buffer_mut()
            .set_style(area, Style::new().bg(colors::BACKGROUND));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        let content_block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(colors::MUTED))
            .title("subsnap")
            .title_alignment(Alignment::Center);

        let content_inner = content_block.inner(chunks[0]);
        f.render_widget(content_block, chunks[0]);

        self.app
            .router
            .render(f, content_inner, &self.app.state, &self.app.ctx);

        let status = Paragraph::new(Line::from(status_line(&self.app.state)))
            .style(Style::default().fg(colors::MUTED));
        f.render_widget(status, chunks[1]);
    }
}

fn status_line(state: &AppState) -> String {
    if !state.session.is_signed_in() {
        return "signed out".to_owned();
    }
    match &state.session.fetch {
        FetchState::Idle => "signed in".to_owned(),
        FetchState::InProgress => "signed in · fetching...".to_owned(),
        FetchState::Error(_) => "signed in · fetch failed".to_owned(),
        FetchState::Ready(subscriptions) => {
            format!("signed in · {} subscriptions", subscriptions.len())
        }
    }
}
