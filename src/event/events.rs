use crate::api::{AccessToken, SessionError, Subscription};

/// Results flowing back from the session task to the controller.
#[derive(Debug, Clone)]
pub enum Event {
    Authenticated(AccessToken),
    SubscriptionsFetched(Vec<Subscription>),
    SessionFailed(SessionError),
}
