use std::sync::Arc;

use flume::Sender;

use crate::api::ApiService;
use crate::api::auth::AuthGateway;
use crate::event::events::Event;

pub struct AppContext {
    pub api: Arc<ApiService>,
    pub gateway: Arc<AuthGateway>,
    pub event_tx: Sender<Event>,
}
