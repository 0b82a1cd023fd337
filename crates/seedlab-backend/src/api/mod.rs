//! Typed client for the laboratory REST API.
//!
//! Every service function lives in a submodule named after the resource it
//! talks to. They all share [`ApiClient`], which owns the pooled HTTP client,
//! the base URL and the bearer token, and turns non-success responses into
//! [`ApiError`]s carrying the message the server put in the body.

pub mod analysis;
pub mod catalogs;
pub mod lotes;
pub mod notifications;
pub mod pagination;
pub mod users;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};
use seedlab_bridge::config::ApiConfig;

use crate::error::ApiError;

/// Query parameters as sent on the wire.
pub type Query = [(&'static str, String)];

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Builds a client with its own connection pool and the configured
    /// timeout.
    pub fn new(config: &ApiConfig, token: Option<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Self::with_client(http, &config.base_url, token)
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        token: Option<String>,
    ) -> Result<Self, ApiError> {
        Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}{path}", self.base_url);
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let builder = self.http.request(method, self.url(path)?);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
    ) -> Result<T, ApiError> {
        let response = send(self.request(Method::GET, path)?.query(query)).await?;
        decode(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = send(self.request(Method::POST, path)?.json(body)).await?;
        decode(response).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = send(self.request(Method::PUT, path)?.json(body)).await?;
        decode(response).await
    }

    /// `PUT` without a body, decoding the returned entity.
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = send(self.request(Method::PUT, path)?).await?;
        decode(response).await
    }

    /// `PUT` without a body whose answer is ignored.
    pub async fn put_no_content(&self, path: &str) -> Result<(), ApiError> {
        send(self.request(Method::PUT, path)?).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }
}

async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
    let response = builder.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_message(&body);
    log::debug!("API answered {status}: {body}");

    Err(match status {
        StatusCode::NOT_FOUND => ApiError::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized { message },
        _ => ApiError::Status {
            status: status.as_u16(),
            message,
        },
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Pulls a human-readable explanation out of an error body. The backend
/// answers either with a JSON object carrying `message`/`mensaje`/`error`, or
/// with a short plain-text line.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => ["message", "mensaje", "error"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(|value| value.as_str()))
            .map(str::trim)
            .find(|message| !message.is_empty())
            .map(str::to_owned),
        Ok(serde_json::Value::String(message)) => Some(message),
        Ok(_) => None,
        Err(_) if body.len() <= 300 && !body.starts_with('<') => Some(body.to_owned()),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn message_is_taken_from_known_fields() {
        assert_eq!(
            extract_message(r#"{"timestamp":"x","message":"Ficha duplicada"}"#),
            Some("Ficha duplicada".to_owned())
        );
        assert_eq!(
            extract_message(r#"{"mensaje":"  Lote inactivo "}"#),
            Some("Lote inactivo".to_owned())
        );
        assert_eq!(
            extract_message(r#"{"message":"","error":"Bad Request"}"#),
            Some("Bad Request".to_owned())
        );
    }

    #[test]
    fn html_and_empty_bodies_have_no_message() {
        assert_eq!(extract_message(""), None);
        assert_eq!(extract_message("<html><body>502</body></html>"), None);
        assert_eq!(extract_message(r#"{"status":500}"#), None);
        assert_eq!(
            extract_message("Usuario no encontrado"),
            Some("Usuario no encontrado".to_owned())
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ApiClient::with_client(reqwest::Client::new(), "not a url", None);
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }
}
