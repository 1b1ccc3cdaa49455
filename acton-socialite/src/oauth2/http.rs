//! HTTP transport shared by OAuth2 providers
//!
//! Providers never build their own `reqwest::Client`; the composition root
//! creates one at build time and every resolved provider receives a clone.
//! Token exchange requests from the `oauth2` crate are routed through it here.

use std::time::Duration;

/// Errors raised while executing an OAuth2 HTTP request
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    /// The request could not be sent or the body could not be read
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response could not be converted back into an `http::Response`
    #[error("Invalid HTTP response: {0}")]
    Response(#[from] http::Error),
}

/// Build the HTTP client shared by all providers
///
/// Redirects are disabled as required for OAuth2 token endpoints. Without a
/// `timeout` requests wait indefinitely.
///
/// # Errors
///
/// Returns `reqwest::Error` if the TLS backend cannot be initialised
pub fn build_client(
    timeout: Option<Duration>,
    user_agent: &str,
) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(user_agent);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build()
}

/// Execute an `oauth2` request with the given client
///
/// Request headers are forwarded as-is and the response body is fully
/// buffered before returning.
///
/// # Errors
///
/// Returns [`HttpClientError`] if the request fails or the response cannot be
/// rebuilt
pub async fn execute(
    client: reqwest::Client,
    request: oauth2::HttpRequest,
) -> Result<oauth2::HttpResponse, HttpClientError> {
    let method = request.method().clone();
    let url = request.uri().to_string();
    let headers = request.headers().clone();
    let body = request.into_body();

    let mut request_builder = client.request(method, &url).body(body);

    for (name, value) in &headers {
        request_builder = request_builder.header(name.as_str(), value.as_bytes());
    }

    let response = request_builder.send().await?;

    let status_code = response.status();
    let headers = response.headers().to_owned();
    let body = response.bytes().await?.to_vec();

    let mut builder = http::Response::builder().status(status_code);
    for (name, value) in &headers {
        builder = builder.header(name, value);
    }

    Ok(builder.body(body)?)
}
