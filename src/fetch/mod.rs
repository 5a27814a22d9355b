mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Result, anyhow};
use serde::Serialize;
use tracing::debug;

/// Sends a request with an optional JSON body and decodes the JSON reply.
///
/// # Errors
///
/// Returns an error if the request fails, the server answers with a non-2xx
/// status (the body is included in the message), or the reply is not JSON.
pub async fn send_json<C: HttpClient + ?Sized>(
    client: &C,
    method: reqwest::Method,
    url: &str,
    body: Option<&impl Serialize>,
) -> Result<serde_json::Value> {
    let mut req = reqwest::Request::new(method, url.parse()?);

    if let Some(body) = body {
        let bytes = serde_json::to_vec(body)?;
        req.headers_mut().insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        *req.body_mut() = Some(bytes.into());
    }

    let resp = client
        .execute(req)
        .await
        .map_err(|e| anyhow!("Failed to send request: {}", e))?;

    let status = resp.status();
    debug!(%status, "Response received");

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow!("Store returned status {}: {}", status, body));
    }

    resp.json()
        .await
        .map_err(|e| anyhow!("Failed to parse response: {}", e))
}
