use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use url::Url;

use super::broker::LoopbackBroker;
use super::{AccessToken, Result, SessionError};

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/youtube.readonly";
const DEFAULT_REDIRECT_PORT: u16 = 8756;

/// OAuth client settings, read from the environment (`.env` supported).
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub client_id: String,
    pub scopes: Vec<String>,
    pub redirect_port: u16,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self> {
        let client_id = std::env::var("SUBSNAP_CLIENT_ID")
            .ok()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                SessionError::Environment(
                    "SUBSNAP_CLIENT_ID is not set; add it to the environment or a .env file"
                        .into(),
                )
            })?;

        let scopes = match std::env::var("SUBSNAP_SCOPES") {
            Ok(raw) if !raw.trim().is_empty() => {
                raw.split_whitespace().map(str::to_owned).collect()
            }
            _ => vec![DEFAULT_SCOPE.to_owned()],
        };

        let redirect_port = match std::env::var("SUBSNAP_REDIRECT_PORT") {
            Ok(raw) => raw.parse().map_err(|_| {
                SessionError::Environment(format!(
                    "SUBSNAP_REDIRECT_PORT is not a port number: {raw}"
                ))
            })?,
            Err(_) => DEFAULT_REDIRECT_PORT,
        };

        Ok(Self {
            client_id,
            scopes,
            redirect_port,
        })
    }
}

/// The host side of the interactive authorization round trip: where the
/// authorization server should redirect to, and how the consent UI is driven.
/// Production uses [`LoopbackBroker`]; tests substitute canned ones.
#[async_trait]
pub trait IdentityBroker: Send + Sync {
    fn redirect_url(&self) -> String;

    /// Opens the consent UI for `authorization_url` and resolves with the
    /// full redirect URL, fragment included, once the user completes the
    /// flow. A denied or failed flow resolves with an error.
    async fn launch_web_auth_flow(&self, authorization_url: &str) -> Result<String>;
}

pub struct AuthGateway {
    broker: Option<Arc<dyn IdentityBroker>>,
}

impl AuthGateway {
    pub fn new() -> Self {
        Self { broker: None }
    }

    pub fn with_broker(broker: Arc<dyn IdentityBroker>) -> Self {
        Self {
            broker: Some(broker),
        }
    }

    /// Single authorization attempt, no retries: build the implicit-grant
    /// URL, hand it to the broker, pull `access_token` out of the redirect
    /// fragment. Configuration problems fail before any network activity.
    pub async fn authenticate(&self) -> Result<AccessToken> {
        let config = AuthConfig::from_env()?;

        match &self.broker {
            Some(broker) => run_flow(&config, broker.as_ref()).await,
            None => {
                let broker = LoopbackBroker::new(config.redirect_port);
                run_flow(&config, &broker).await
            }
        }
    }
}

impl Default for AuthGateway {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_flow(config: &AuthConfig, broker: &dyn IdentityBroker) -> Result<AccessToken> {
    let authorization_url = authorization_url(config, &broker.redirect_url());

    info!("launching web auth flow");
    let redirect = broker
        .launch_web_auth_flow(authorization_url.as_str())
        .await?;

    token_from_redirect(&redirect)
}

fn authorization_url(config: &AuthConfig, redirect_url: &str) -> Url {
    let mut url = Url::parse(AUTHORIZATION_ENDPOINT).expect("authorization endpoint is a valid URL");
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("response_type", "token")
        .append_pair("redirect_uri", redirect_url)
        .append_pair("scope", &config.scopes.join(" "));
    url
}

/// The implicit grant returns credentials in the fragment, encoded as query
/// pairs. A denial shows up as an `error` key; a redirect carrying neither
/// key is reported instead of silently ignored.
fn token_from_redirect(redirect: &str) -> Result<AccessToken> {
    let url = Url::parse(redirect)
        .map_err(|e| SessionError::Auth(format!("unparseable redirect URL: {e}")))?;
    let fragment = url.fragment().unwrap_or_default();

    let mut denial = None;
    for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
        match key.as_ref() {
            "access_token" if !value.is_empty() => {
                return Ok(AccessToken::new(value.into_owned()));
            }
            "error" => denial = Some(value.into_owned()),
            _ => {}
        }
    }

    Err(SessionError::Auth(denial.unwrap_or_else(|| {
        "authorization response did not include an access token".into()
    })))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serial_test::serial;

    use super::*;

    struct CannedBroker {
        response: Result<String>,
        seen_url: Mutex<Option<String>>,
    }

    impl CannedBroker {
        fn new(response: Result<String>) -> Self {
            Self {
                response,
                seen_url: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl IdentityBroker for CannedBroker {
        fn redirect_url(&self) -> String {
            "http://127.0.0.1:8756/callback".to_owned()
        }

        async fn launch_web_auth_flow(&self, authorization_url: &str) -> Result<String> {
            *self.seen_url.lock().unwrap() = Some(authorization_url.to_owned());
            self.response.clone()
        }
    }

    fn set_client_id() {
        unsafe { std::env::set_var("SUBSNAP_CLIENT_ID", "cid-123") };
    }

    #[tokio::test]
    #[serial]
    async fn successful_flow_yields_the_token() {
        set_client_id();
        let broker = Arc::new(CannedBroker::new(Ok(
            "http://127.0.0.1:8756/callback#access_token=tok-1&token_type=Bearer&expires_in=3600"
                .to_owned(),
        )));
        let gateway = AuthGateway::with_broker(broker.clone());

        let token = gateway.authenticate().await.unwrap();
        assert_eq!(token.as_str(), "tok-1");

        let seen = broker.seen_url.lock().unwrap().clone().unwrap();
        assert!(seen.starts_with(AUTHORIZATION_ENDPOINT));
        assert!(seen.contains("client_id=cid-123"));
        assert!(seen.contains("response_type=token"));
        assert!(seen.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8756%2Fcallback"));
        assert!(seen.contains("scope="));
    }

    #[tokio::test]
    #[serial]
    async fn missing_client_id_fails_before_the_broker_is_consulted() {
        unsafe { std::env::remove_var("SUBSNAP_CLIENT_ID") };
        let broker = Arc::new(CannedBroker::new(Ok("unused".to_owned())));
        let gateway = AuthGateway::with_broker(broker.clone());

        let err = gateway.authenticate().await.unwrap_err();
        assert!(matches!(err, SessionError::Environment(_)));
        assert!(broker.seen_url.lock().unwrap().is_none());
    }

    #[tokio::test]
    #[serial]
    async fn broker_failure_propagates_as_auth_error() {
        set_client_id();
        let broker = Arc::new(CannedBroker::new(Err(SessionError::Auth(
            "The user did not approve access.".into(),
        ))));
        let gateway = AuthGateway::with_broker(broker);

        let err = gateway.authenticate().await.unwrap_err();
        assert_eq!(
            err,
            SessionError::Auth("The user did not approve access.".into())
        );
    }

    #[tokio::test]
    #[serial]
    async fn redirect_without_a_token_is_an_auth_error() {
        set_client_id();
        let broker = Arc::new(CannedBroker::new(Ok(
            "http://127.0.0.1:8756/callback#state=abc".to_owned(),
        )));
        let gateway = AuthGateway::with_broker(broker);

        let err = gateway.authenticate().await.unwrap_err();
        assert!(matches!(err, SessionError::Auth(_)));
    }

    #[tokio::test]
    #[serial]
    async fn scopes_default_to_readonly_and_join_with_spaces() {
        set_client_id();
        unsafe { std::env::remove_var("SUBSNAP_SCOPES") };

        let config = AuthConfig::from_env().unwrap();
        assert_eq!(config.scopes, vec![DEFAULT_SCOPE.to_owned()]);

        unsafe { std::env::set_var("SUBSNAP_SCOPES", "scope-a scope-b") };
        let config = AuthConfig::from_env().unwrap();
        let url = authorization_url(&config, "http://127.0.0.1:8756/callback");
        assert!(url.as_str().contains("scope=scope-a+scope-b"));
        unsafe { std::env::remove_var("SUBSNAP_SCOPES") };
    }

    #[test]
    fn denial_in_the_fragment_surfaces_its_message() {
        let err =
            token_from_redirect("http://127.0.0.1:8756/callback#error=access_denied").unwrap_err();
        assert_eq!(err, SessionError::Auth("access_denied".into()));
    }
}
