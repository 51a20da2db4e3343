use std::time::Instant;

use ratatui::crossterm::event::{KeyEvent, KeyEventKind};
use tracing::{error, info};

use crate::event::events::Event;
use crate::export;
use crate::ui::{
    app::App,
    input::InputHandler,
    state::FetchState,
    traits::Action,
    tui::{TerminalEvent, Tui},
    views::{SignIn, Subscriptions},
};

pub struct EventHandler;

impl EventHandler {
    pub async fn handle_events(app: &mut App, tui: &mut Tui) -> color_eyre::Result<()> {
        if let Some(evt) = tui.next().await {
            Self::handle_event(app, evt, tui).await?;
        }

        while let Ok(evt) = app.event_rx.try_recv() {
            Self::handle_action(app, evt).await;
        }

        Ok(())
    }

    pub async fn handle_event(
        app: &mut App,
        evt: TerminalEvent,
        tui: &mut Tui,
    ) -> color_eyre::Result<()> {
        match evt {
            TerminalEvent::Tick => app.state.ui.tick(Instant::now()),
            TerminalEvent::FocusGained => {
                app.has_focus = true;
                tui.clear()?;
            }
            TerminalEvent::FocusLost => app.has_focus = false,
            TerminalEvent::Key(key) => Self::handle_key_event(app, key).await,
            TerminalEvent::Resize(..) => {}
        }

        Ok(())
    }

    pub async fn handle_action(app: &mut App, evt: Event) {
        app.router.on_event(&evt, &app.ctx).await;

        match evt {
            Event::Authenticated(token) => {
                info!("authenticated; fetch under way");
                app.state.ui.is_authorizing = false;
                app.state.ui.error = None;
                app.state.session.authenticated(token);
                app.router.replace(Box::new(Subscriptions::default()));
            }
            Event::SubscriptionsFetched(subscriptions) => {
                app.state.session.subscriptions_fetched(subscriptions);
            }
            Event::SessionFailed(err) => {
                error!("session failed: {err}");
                app.state.session_failed(&err);
            }
        }
    }

    async fn handle_key_event(app: &mut App, evt: KeyEvent) {
        if evt.kind != KeyEventKind::Press {
            return;
        }

        let action = app.router.handle_input(evt, &app.state, &app.ctx).await;
        let action = action.or_else(|| InputHandler::handle_key(evt));

        if let Some(action) = action {
            Self::dispatch_action(app, action).await;
        }
    }

    async fn dispatch_action(app: &mut App, action: Action) {
        match action {
            Action::Quit => app.should_quit = true,
            Action::SignIn => Self::start_session(app),
            Action::SignOut => {
                info!("signing out");
                app.session_task.abort();
                app.state.sign_out();
                app.router.replace(Box::new(SignIn));
            }
            Action::Download => Self::download_snapshot(app),
        }
    }

    /// Spawns the one background flow: authorize, then fetch every page with
    /// the fresh token. Ignored while a previous flow is still running.
    fn start_session(app: &mut App) {
        if app.session_task.is_running() || app.state.session.is_signed_in() {
            return;
        }

        app.state.ui.is_authorizing = true;
        app.state.ui.error = None;

        let gateway = app.ctx.gateway.clone();
        let api = app.ctx.api.clone();
        let tx = app.ctx.event_tx.clone();

        app.session_task.replace(tokio::spawn(async move {
            let token = match gateway.authenticate().await {
                Ok(token) => token,
                Err(e) => {
                    let _ = tx.send(Event::SessionFailed(e));
                    return;
                }
            };
            let _ = tx.send(Event::Authenticated(token.clone()));

            match api.fetch_all_subscriptions(&token).await {
                Ok(subscriptions) => {
                    let _ = tx.send(Event::SubscriptionsFetched(subscriptions));
                }
                Err(e) => {
                    let _ = tx.send(Event::SessionFailed(e));
                }
            }
        }));
    }

    fn download_snapshot(app: &mut App) {
        let FetchState::Ready(subscriptions) = &app.state.session.fetch else {
            return;
        };

        match export::save_snapshot(subscriptions, &export::default_output_dir()) {
            Ok(path) => app.state.ui.flash_downloaded(path),
            Err(e) => {
                error!("snapshot failed: {e}");
                app.state.ui.error = Some(e.to_string());
            }
        }
    }
}
