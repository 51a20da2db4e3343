use std::sync::Arc;

use flume::Receiver;
use ratatui::Frame;

use crate::api::ApiService;
use crate::api::auth::AuthGateway;
use crate::event::events::Event;
use crate::ui::context::AppContext;
use crate::ui::layout::AppLayout;
use crate::ui::router::Router;
use crate::ui::state::AppState;
use crate::ui::views::SignIn;
use crate::util::task::SessionTask;

use super::tui;
use super::util::handler::EventHandler;

pub struct App {
    pub event_rx: Receiver<Event>,
    pub ctx: AppContext,
    pub state: AppState,
    pub router: Router,
    pub session_task: SessionTask,
    pub has_focus: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        let (event_tx, event_rx) = flume::unbounded();
        let ctx = AppContext {
            api: Arc::new(ApiService::new()),
            gateway: Arc::new(AuthGateway::new()),
            event_tx,
        };

        Self {
            event_rx,
            ctx,
            state: AppState::default(),
            router: Router::new(Box::new(SignIn)),
            session_task: SessionTask::new(),
            has_focus: true,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = tui::Tui::new()?;
        tui.enter()?;

        while !self.should_quit {
            tui.draw(|f| {
                self.ui(f);
            })?;

            EventHandler::handle_events(self, &mut tui).await?;
        }

        self.session_task.abort();
        tui.exit()?;
        Ok(())
    }

    fn ui(&mut self, frame: &mut Frame) {
        if self.has_focus {
            AppLayout::new(self).render(frame);
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
