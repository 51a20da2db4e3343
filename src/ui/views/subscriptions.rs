use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{List, ListItem, ListState, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::api::Subscription;
use crate::event::events::Event;
use crate::ui::{
    components::spinner::Spinner,
    context::AppContext,
    state::{AppState, FetchState},
    traits::{Action, View},
};
use crate::util::colors;

/// Signed-in view: fetch progress, the fetched list, and the download and
/// sign-out affordances.
#[derive(Default)]
pub struct Subscriptions {
    list_state: ListState,
}

#[async_trait]
impl View for Subscriptions {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, _ctx: &AppContext) {
        match &state.session.fetch {
            FetchState::Idle | FetchState::InProgress => render_loading(f, area),
            FetchState::Error(message) => render_error(f, area, message),
            FetchState::Ready(subscriptions) => {
                self.render_ready(f, area, state, subscriptions);
            }
        }
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        let len = state.session.subscription_count();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 {
                    let i = self
                        .list_state
                        .selected()
                        .map_or(0, |i| if i >= len - 1 { i } else { i + 1 });
                    self.list_state.select(Some(i));
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if len > 0 {
                    let i = self
                        .list_state
                        .selected()
                        .map_or(0, |i| i.saturating_sub(1));
                    self.list_state.select(Some(i));
                }
                None
            }
            KeyCode::Char('g') => {
                if len > 0 {
                    self.list_state.select(Some(0));
                }
                None
            }
            KeyCode::Char('G') => {
                if len > 0 {
                    self.list_state.select(Some(len - 1));
                }
                None
            }
            KeyCode::Char('d') if matches!(state.session.fetch, FetchState::Ready(_)) => {
                Some(Action::Download)
            }
            KeyCode::Char('s') => Some(Action::SignOut),
            _ => None,
        }
    }

    async fn on_event(&mut self, event: &Event, _ctx: &AppContext) {
        if let Event::SubscriptionsFetched(_) = event {
            self.list_state.select(Some(0));
        }
    }
}

impl Subscriptions {
    fn render_ready(
        &mut self,
        f: &mut Frame,
        area: Rect,
        state: &AppState,
        subscriptions: &[Subscription],
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(2),
            ])
            .split(area);

        let header = Paragraph::new(Line::from(format!(
            "Your subscriptions list is ready! ({} channels)",
            subscriptions.len()
        )))
        .style(Style::default().fg(colors::SUCCESS))
        .alignment(Alignment::Center);
        f.render_widget(header, chunks[0]);

        let width = chunks[1].width.saturating_sub(2);
        let items: Vec<ListItem> = subscriptions
            .iter()
            .map(|subscription| ListItem::new(truncated(&subscription.title, width)))
            .collect();

        let list = List::new(items)
            .style(Style::default().fg(colors::TEXT))
            .highlight_style(
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        if !subscriptions.is_empty() && self.list_state.selected().is_none() {
            self.list_state.select(Some(0));
        }

        f.render_stateful_widget(list, chunks[1], &mut self.list_state);

        let mut footer = Vec::new();
        if let Some(error) = &state.ui.error {
            footer.push(
                Line::from(error.as_str()).style(Style::default().fg(colors::ERROR)),
            );
        } else if let Some(downloaded) = &state.ui.downloaded {
            footer.push(
                Line::from(format!("Downloaded! Saved to {}", downloaded.path.display()))
                    .style(Style::default().fg(colors::SUCCESS)),
            );
        }
        footer.push(
            Line::from("[d] download  [s] sign out  [q] quit")
                .style(Style::default().fg(colors::MUTED)),
        );

        let footer = Paragraph::new(footer).alignment(Alignment::Center);
        f.render_widget(footer, chunks[2]);
    }
}

fn render_loading(f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(area);

    let spinner = Spinner::new()
        .with_style(Style::default().fg(colors::PRIMARY))
        .with_label("Fetching your subscriptions...");
    f.render_widget(spinner, chunks[1]);

    let subtext = Paragraph::new(Line::from(
        "This might take a moment if you have many subscriptions",
    ))
    .style(Style::default().fg(colors::MUTED))
    .alignment(Alignment::Center);
    f.render_widget(subtext, chunks[2]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(area);

    let error = Paragraph::new(Line::from(message))
        .style(Style::default().fg(colors::ERROR))
        .alignment(Alignment::Center);
    f.render_widget(error, chunks[1]);

    let hint = Paragraph::new(Line::from("[s] sign out and try again"))
        .style(Style::default().fg(colors::MUTED))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[2]);
}

fn truncated(title: &str, max_width: u16) -> String {
    let max_width = max_width as usize;
    if title.width() <= max_width {
        return title.to_owned();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in title.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_titles_pass_through_untouched() {
        assert_eq!(truncated("Alpha", 20), "Alpha");
    }

    #[test]
    fn long_titles_are_cut_with_an_ellipsis() {
        let cut = truncated("A channel with a very long name", 10);
        assert!(cut.ends_with('…'));
        assert!(cut.width() <= 10);
    }
}
