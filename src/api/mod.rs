pub mod auth;
pub mod broker;
mod error;
mod types;

pub use error::{Result, SessionError};
pub use types::{AccessToken, Subscription};

use tracing::{debug, info};

use types::SubscriptionPage;

const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const PAGE_SIZE: &str = "50";

pub struct ApiService {
    http: reqwest::Client,
    base_url: String,
}

impl ApiService {
    pub fn new() -> Self {
        Self::with_base_url(YOUTUBE_API_BASE)
    }

    /// Point the service at a different API root. Tests aim this at a local
    /// mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Pages through the subscriptions collection until the continuation
    /// token runs out, accumulating entries in response order.
    ///
    /// Any `error` payload or transport failure fails the whole operation;
    /// partial pages are never surfaced.
    pub async fn fetch_all_subscriptions(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<Subscription>> {
        let url = format!("{}/subscriptions", self.base_url);
        let mut subscriptions = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("part", "snippet"),
                ("mine", "true"),
                ("maxResults", PAGE_SIZE),
            ];
            if let Some(page_token) = page_token.as_deref() {
                query.push(("pageToken", page_token));
            }

            let response = self
                .http
                .get(&url)
                .bearer_auth(token.as_str())
                .query(&query)
                .send()
                .await
                .map_err(|e| SessionError::Fetch(e.to_string()))?;

            let page: SubscriptionPage = response
                .json()
                .await
                .map_err(|e| SessionError::Fetch(e.to_string()))?;

            if let Some(error) = page.error {
                return Err(SessionError::Api(error.message));
            }

            subscriptions.extend(page.items.into_iter().map(Subscription::from));
            debug!("page consumed, {} subscriptions so far", subscriptions.len());

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        info!("fetched {} subscriptions", subscriptions.len());
        Ok(subscriptions)
    }
}

impl Default for ApiService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn token() -> AccessToken {
        AccessToken::new("T1")
    }

    fn page(items: &[(&str, &str)], next: Option<&str>) -> serde_json::Value {
        let items: Vec<_> = items
            .iter()
            .map(|(id, title)| {
                json!({
                    "snippet": {
                        "title": title,
                        "resourceId": { "channelId": id },
                    }
                })
            })
            .collect();
        match next {
            Some(next) => json!({ "items": items, "nextPageToken": next }),
            None => json!({ "items": items }),
        }
    }

    #[tokio::test]
    async fn accumulates_pages_in_order_and_stops_after_the_final_one() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/subscriptions"))
            .and(query_param("part", "snippet"))
            .and(query_param("mine", "true"))
            .and(query_param("maxResults", "50"))
            .and(query_param_is_missing("pageToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(
                &[("UC-a", "Alpha"), ("UC-b", "Beta")],
                Some("P2"),
            )))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/subscriptions"))
            .and(query_param("pageToken", "P2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(
                &[("UC-c", "Gamma"), ("UC-d", "Delta")],
                Some("P3"),
            )))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/subscriptions"))
            .and(query_param("pageToken", "P3"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(page(&[("UC-e", "Epsilon")], None)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiService::with_base_url(server.uri());
        let subscriptions = api.fetch_all_subscriptions(&token()).await.unwrap();

        let ids: Vec<_> = subscriptions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["UC-a", "UC-b", "UC-c", "UC-d", "UC-e"]);
        assert_eq!(subscriptions[0].title, "Alpha");
        assert_eq!(subscriptions[4].title, "Epsilon");
    }

    #[tokio::test]
    async fn sends_the_bearer_token_on_every_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/subscriptions"))
            .and(header("authorization", "Bearer T1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&[("UC-a", "A")], None)))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiService::with_base_url(server.uri());
        api.fetch_all_subscriptions(&token()).await.unwrap();
    }

    #[tokio::test]
    async fn error_payload_fails_the_operation_and_discards_partial_results() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/subscriptions"))
            .and(query_param_is_missing("pageToken"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(page(&[("UC-a", "A")], Some("P2"))),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/subscriptions"))
            .and(query_param("pageToken", "P2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": { "code": 403, "message": "quotaExceeded" }
            })))
            .mount(&server)
            .await;

        let api = ApiService::with_base_url(server.uri());
        let err = api.fetch_all_subscriptions(&token()).await.unwrap_err();

        assert_eq!(err, SessionError::Api("quotaExceeded".into()));
        assert!(err.to_string().contains("quotaExceeded"));
    }

    #[tokio::test]
    async fn empty_continuation_token_terminates_the_loop() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/subscriptions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [],
                "nextPageToken": "",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiService::with_base_url(server.uri());
        let subscriptions = api.fetch_all_subscriptions(&token()).await.unwrap();
        assert!(subscriptions.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_a_fetch_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/subscriptions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let api = ApiService::with_base_url(server.uri());
        let err = api.fetch_all_subscriptions(&token()).await.unwrap_err();
        assert!(matches!(err, SessionError::Fetch(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_fetch_error() {
        // Nothing listens on port 1.
        let api = ApiService::with_base_url("http://127.0.0.1:1");
        let err = api.fetch_all_subscriptions(&token()).await.unwrap_err();
        assert!(matches!(err, SessionError::Fetch(_)));
    }
}
