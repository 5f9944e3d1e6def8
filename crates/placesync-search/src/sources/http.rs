//! HTTP plumbing shared by the external provider clients.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;

const USER_AGENT: &str = "placesync/0.1 (place-search)";

pub(crate) fn build_client(timeout_secs: u64) -> Result<Client, ProviderError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(USER_AGENT)
        .build()?)
}

/// Resolve `path` against `base_url`, normalising the base so it ends with
/// exactly one slash.
pub(crate) fn endpoint_url(base_url: &str, path: &str) -> Result<Url, ProviderError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised)
        .and_then(|base| base.join(path))
        .map_err(|e| ProviderError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })
}

/// Read the body, surface non-2xx statuses as [`ProviderError::Status`]
/// (with the provider's own message when it sent one), and deserialize.
pub(crate) async fn decode_response<T: DeserializeOwned>(
    provider: &'static str,
    context: &str,
    response: Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

/// Pull a human-readable message out of a provider error body.
///
/// Google nests it under `error.message`; Kakao puts it at `message`.
fn error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("message"))
                .and_then(serde_json::Value::as_str)
        })
        .map_or_else(
            || body.chars().take(200).collect::<String>(),
            str::to_string,
        )
}
