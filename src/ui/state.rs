use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::api::{AccessToken, SessionError, Subscription};

/// How long the "Saved" flash stays up before the footer reverts.
pub const DOWNLOADED_FLASH: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: SessionState,
    pub ui: UiState,
}

impl AppState {
    /// Discards the token and every fetched result; afterwards the UI is
    /// back at the signed-out entry state.
    pub fn sign_out(&mut self) {
        self.session = SessionState::default();
        self.ui = UiState::default();
    }

    /// Routes a failed session flow to where the active view surfaces it:
    /// auth failures land on the entry view, fetch failures on the session
    /// view. Auth state itself is left untouched.
    pub fn session_failed(&mut self, error: &SessionError) {
        self.ui.is_authorizing = false;
        match self.session.auth {
            AuthState::SignedOut => self.ui.error = Some(error.to_string()),
            AuthState::SignedIn(_) => {
                self.session.fetch = FetchState::Error(error.to_string());
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub auth: AuthState,
    pub fetch: FetchState,
}

impl SessionState {
    /// Token acquired; the chained fetch is already underway.
    pub fn authenticated(&mut self, token: AccessToken) {
        self.auth = AuthState::SignedIn(token);
        self.fetch = FetchState::InProgress;
    }

    pub fn subscriptions_fetched(&mut self, subscriptions: Vec<Subscription>) {
        self.fetch = FetchState::Ready(subscriptions);
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self.auth, AuthState::SignedIn(_))
    }

    pub fn subscription_count(&self) -> usize {
        match &self.fetch {
            FetchState::Ready(subscriptions) => subscriptions.len(),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum AuthState {
    #[default]
    SignedOut,
    SignedIn(AccessToken),
}

/// Exactly one of these holds at a time; every new attempt supersedes the
/// previous value.
#[derive(Debug, Clone, Default)]
pub enum FetchState {
    #[default]
    Idle,
    InProgress,
    Error(String),
    Ready(Vec<Subscription>),
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub is_authorizing: bool,
    pub error: Option<String>,
    pub downloaded: Option<Downloaded>,
}

#[derive(Debug, Clone)]
pub struct Downloaded {
    pub path: PathBuf,
    pub at: Instant,
}

impl UiState {
    pub fn flash_downloaded(&mut self, path: PathBuf) {
        self.error = None;
        self.downloaded = Some(Downloaded {
            path,
            at: Instant::now(),
        });
    }

    /// Reverts the downloaded flash once it has been up long enough.
    pub fn tick(&mut self, now: Instant) {
        if let Some(downloaded) = &self.downloaded {
            if now.duration_since(downloaded.at) >= DOWNLOADED_FLASH {
                self.downloaded = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscriptions() -> Vec<Subscription> {
        vec![
            Subscription {
                id: "UC-a".into(),
                title: "Alpha".into(),
            },
            Subscription {
                id: "UC-b".into(),
                title: "Beta".into(),
            },
        ]
    }

    #[test]
    fn authentication_chains_straight_into_fetching() {
        let mut state = AppState::default();
        state.ui.is_authorizing = true;

        state.session.authenticated(AccessToken::new("T1"));

        assert!(state.session.is_signed_in());
        assert!(matches!(state.session.fetch, FetchState::InProgress));
    }

    #[test]
    fn a_finished_fetch_supersedes_the_in_progress_state() {
        let mut state = AppState::default();
        state.session.authenticated(AccessToken::new("T1"));

        state.session.subscriptions_fetched(subscriptions());

        assert_eq!(state.session.subscription_count(), 2);
        assert!(matches!(state.session.fetch, FetchState::Ready(_)));
    }

    #[test]
    fn auth_failures_surface_on_the_entry_view_without_signing_in() {
        let mut state = AppState::default();
        state.ui.is_authorizing = true;

        state.session_failed(&SessionError::Auth("user cancelled".into()));

        assert!(!state.session.is_signed_in());
        assert!(!state.ui.is_authorizing);
        assert!(state.ui.error.as_deref().unwrap().contains("user cancelled"));
        assert!(matches!(state.session.fetch, FetchState::Idle));
    }

    #[test]
    fn fetch_failures_surface_on_the_session_view() {
        let mut state = AppState::default();
        state.session.authenticated(AccessToken::new("T1"));

        state.session_failed(&SessionError::Api("quotaExceeded".into()));

        assert!(state.session.is_signed_in());
        match &state.session.fetch {
            FetchState::Error(message) => assert!(message.contains("quotaExceeded")),
            other => panic!("expected an error state, got {other:?}"),
        }
        assert_eq!(state.session.subscription_count(), 0);
    }

    #[test]
    fn sign_out_resets_everything() {
        let mut state = AppState::default();
        state.session.authenticated(AccessToken::new("T1"));
        state.session.subscriptions_fetched(subscriptions());
        state.ui.error = Some("stale".into());
        state.ui.flash_downloaded(PathBuf::from("/tmp/x.html"));

        state.sign_out();

        assert!(!state.session.is_signed_in());
        assert!(matches!(state.session.fetch, FetchState::Idle));
        assert_eq!(state.session.subscription_count(), 0);
        assert!(state.ui.error.is_none());
        assert!(state.ui.downloaded.is_none());
        assert!(!state.ui.is_authorizing);
    }

    #[test]
    fn downloaded_flash_reverts_after_two_seconds() {
        let mut ui = UiState::default();
        ui.flash_downloaded(PathBuf::from("/tmp/x.html"));
        let at = ui.downloaded.as_ref().unwrap().at;

        ui.tick(at + Duration::from_millis(1999));
        assert!(ui.downloaded.is_some());

        ui.tick(at + DOWNLOADED_FLASH);
        assert!(ui.downloaded.is_none());
    }
}
