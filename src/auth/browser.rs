//! Interactive authorization-code flow.
//!
//! 1. Starts a local web server to receive the OAuth callback
//! 2. Opens a browser for the user to log in and authorize the app
//! 3. Reddit redirects back to localhost with an authorization code
//! 4. Exchanges this code for a token

use super::{OAuthSession, Token};
use crate::client::{RedditClientError, Result};
use log::{debug, info, warn};
use rand::{distributions::Alphanumeric, Rng};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tiny_http::{Response, Server, StatusCode};
use url::Url;

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

fn auth_error(message: impl Into<String>) -> RedditClientError {
    RedditClientError::Auth(message.into())
}

/// Random token guarding the callback against CSRF.
pub fn random_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Run the browser flow and return the token stored in `session`.
pub async fn authorize(session: &OAuthSession, scopes: &str) -> Result<Token> {
    let redirect = Url::parse(&session.credentials().redirect_url)
        .map_err(|e| RedditClientError::Config(format!("invalid redirect URL: {}", e)))?;
    let port = redirect.port_or_known_default().unwrap_or(8080);
    let callback_path = redirect.path().to_string();

    let state = random_state();
    let auth_url = session.auth_code_url(&state, scopes)?;

    let server = Server::http(("127.0.0.1", port))
        .map_err(|e| auth_error(format!("Failed to start local server: {}", e)))?;
    info!(
        "Waiting for authorization callback on http://localhost:{}{}",
        port, callback_path
    );
    let waiter = tokio::task::spawn_blocking(move || {
        wait_for_code(&server, &callback_path, &state, CALLBACK_TIMEOUT)
    });

    info!("Opening browser for Reddit OAuth authorization...");
    if let Err(e) = webbrowser::open(auth_url.as_str()) {
        warn!("Failed to open browser: {}", e);
    }
    // Print the URL in case the browser doesn't open
    info!("If your browser doesn't open automatically, please visit this URL:");
    info!("{}", auth_url);

    let code = waiter
        .await
        .map_err(|e| auth_error(format!("callback server failed: {}", e)))??;

    info!("Exchanging authorization code for access token...");
    session.exchange_code(&code).await
}

fn page(title: &str, body: &str, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(format!(
        "<html><body><h1>{}</h1><p>{}</p></body></html>",
        title, body
    ))
    .with_status_code(StatusCode(status))
}

fn wait_for_code(
    server: &Server,
    callback_path: &str,
    state: &str,
    timeout: Duration,
) -> Result<String> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline
            .checked_duration_since(Instant::now())
            .ok_or_else(|| auth_error("Timed out waiting for authorization"))?;
        let request = match server.recv_timeout(remaining)? {
            Some(request) => request,
            None => return Err(auth_error("Timed out waiting for authorization")),
        };

        let path = request.url().to_string();
        if !path.starts_with(callback_path) {
            let _ = request.respond(page("404 Not Found", "", 404));
            continue;
        }
        debug!("Received callback: {}", path);

        let outcome = parse_callback(&path, state);
        let response = match &outcome {
            Ok(_) => page(
                "Authentication Successful",
                "You can now close this window and return to the application.",
                200,
            ),
            Err(e) => page("Authentication Error", &e.to_string(), 400),
        };
        let _ = request.respond(response);
        return outcome;
    }
}

/// Extract the authorization code from a callback path, checking `state`.
pub(crate) fn parse_callback(path: &str, expected_state: &str) -> Result<String> {
    let url = Url::parse(&format!("http://localhost{}", path))
        .map_err(|_| auth_error("Invalid callback URL"))?;
    let query: HashMap<String, String> = url
        .query_pairs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    if let Some(error) = query.get("error") {
        return Err(auth_error(format!("Authorization error: {}", error)));
    }
    match query.get("state") {
        Some(received) if received == expected_state => query
            .get("code")
            .cloned()
            .ok_or_else(|| auth_error("No authorization code received")),
        Some(_) => Err(auth_error("State mismatch - possible CSRF attack")),
        None => Err(auth_error("No state parameter received")),
    }
}
