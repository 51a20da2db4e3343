use std::process::Command;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, warn};

use super::auth::IdentityBroker;
use super::{Result, SessionError};

const CALLBACK_PATH: &str = "/callback";
const CAPTURE_PATH: &str = "/capture";

/// The access token rides in the redirect fragment, which browsers never
/// transmit; this page relays it back to the listener as a query string.
const RELAY_PAGE: &str = "<!DOCTYPE html>\n<html><body><script>location.replace('/capture?' + location.hash.slice(1));</script></body></html>";

const DONE_PAGE: &str = "<!DOCTYPE html>\n<html><body><p>Signed in. You can close this tab and return to the terminal.</p></body></html>";

/// Terminal-side stand-in for a browser identity service: the consent UI is
/// the system browser, and the redirect comes back over a loopback listener.
pub struct LoopbackBroker {
    port: u16,
}

impl LoopbackBroker {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

#[async_trait]
impl IdentityBroker for LoopbackBroker {
    fn redirect_url(&self) -> String {
        format!("http://127.0.0.1:{}{}", self.port, CALLBACK_PATH)
    }

    async fn launch_web_auth_flow(&self, authorization_url: &str) -> Result<String> {
        let listener = TcpListener::bind(("127.0.0.1", self.port))
            .await
            .map_err(|e| {
                SessionError::Environment(format!(
                    "cannot listen on 127.0.0.1:{} for the OAuth redirect: {e}",
                    self.port
                ))
            })?;

        open_in_browser(authorization_url);

        // One redirect, then one fragment relay. This waits until the user
        // finishes or abandons the consent flow; sign-out aborts the task.
        loop {
            let (stream, _) = listener
                .accept()
                .await
                .map_err(|e| SessionError::Auth(format!("redirect listener failed: {e}")))?;

            if let Some(fragment) = serve_connection(stream).await? {
                return Ok(format!("{}#{}", self.redirect_url(), fragment));
            }
        }
    }
}

/// Answers a single request. Returns the relayed fragment once the capture
/// request arrives; anything else gets the relay page and `None`.
async fn serve_connection<S>(stream: S) -> Result<Option<String>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .await
        .map_err(|e| SessionError::Auth(format!("redirect listener failed: {e}")))?;

    let target = request_line.split_whitespace().nth(1).unwrap_or("/");
    // The capture query carries the token; log the path only.
    debug!(
        "redirect listener got {}",
        target.split('?').next().unwrap_or("/")
    );

    let (captured, body) = match target.strip_prefix(CAPTURE_PATH) {
        Some(rest) => (Some(rest.trim_start_matches('?').to_owned()), DONE_PAGE),
        None => (None, RELAY_PAGE),
    };

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );

    let mut stream = reader.into_inner();
    stream
        .write_all(response.as_bytes())
        .await
        .map_err(|e| SessionError::Auth(format!("redirect listener failed: {e}")))?;
    let _ = stream.shutdown().await;

    Ok(captured)
}

fn open_in_browser(url: &str) {
    #[cfg(target_os = "macos")]
    let launched = Command::new("open").arg(url).spawn();
    #[cfg(target_os = "windows")]
    let launched = Command::new("cmd").args(["/C", "start", "", url]).spawn();
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let launched = Command::new("xdg-open").arg(url).spawn();

    if let Err(e) = launched {
        warn!("could not open a browser ({e}); visit this URL to sign in: {url}");
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncReadExt;

    use super::*;

    async fn roundtrip(request: &str) -> (Option<String>, String) {
        let (mut client, server) = tokio::io::duplex(4096);
        client.write_all(request.as_bytes()).await.unwrap();

        let captured = serve_connection(server).await.unwrap();

        let mut response = String::new();
        client.read_to_string(&mut response).await.unwrap();
        (captured, response)
    }

    #[tokio::test]
    async fn callback_request_is_answered_with_the_relay_page() {
        let (captured, response) = roundtrip("GET /callback HTTP/1.1\r\n\r\n").await;
        assert!(captured.is_none());
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.contains("location.replace('/capture?'"));
    }

    #[tokio::test]
    async fn capture_request_yields_the_fragment() {
        let (captured, response) =
            roundtrip("GET /capture?access_token=tok-1&token_type=Bearer HTTP/1.1\r\n\r\n").await;
        assert_eq!(
            captured.as_deref(),
            Some("access_token=tok-1&token_type=Bearer")
        );
        assert!(response.contains("close this tab"));
    }

    #[test]
    fn redirect_url_points_at_the_configured_port() {
        let broker = LoopbackBroker::new(9123);
        assert_eq!(broker.redirect_url(), "http://127.0.0.1:9123/callback");
    }
}
