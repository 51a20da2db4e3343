use ratatui::Frame;
use ratatui::crossterm::event::KeyEvent;
use ratatui::layout::Rect;

use crate::event::events::Event;
use crate::ui::context::AppContext;
use crate::ui::state::AppState;
use crate::ui::traits::{Action, View};

/// The active view. Sign-in and sign-out swap it wholesale; there is no
/// deeper navigation.
pub struct Router {
    current: Box<dyn View>,
}

impl Router {
    pub fn new(initial_view: Box<dyn View>) -> Self {
        Self {
            current: initial_view,
        }
    }

    pub fn replace(&mut self, view: Box<dyn View>) {
        self.current = view;
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext) {
        self.current.render(f, area, state, ctx);
    }

    pub async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        self.current.handle_input(key, state, ctx).await
    }

    pub async fn on_event(&mut self, event: &Event, ctx: &AppContext) {
        self.current.on_event(event, ctx).await;
    }
}
