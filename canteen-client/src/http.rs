//! HTTP transport for the backing services
//!
//! Every service call goes through the [`HttpApi`] capability trait;
//! [`NetworkHttpApi`] is the reqwest-backed implementation with the
//! configured per-request timeout. The bearer credential is an
//! argument on every call, not connection state: it always comes from
//! the session the caller was handed, so the identity that passed the
//! local guards is the identity on the wire.

use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::error::{ApiResponse, AppError, ErrorCode};
use tracing::warn;

/// HTTP transport trait
#[async_trait]
pub trait HttpApi: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str, bearer: Option<&str>)
        -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: &B,
    ) -> ClientResult<T>;
    async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> ClientResult<T>;
}

/// Network HTTP transport
#[derive(Debug, Clone)]
pub struct NetworkHttpApi {
    client: Client,
    base_url: String,
}

impl NetworkHttpApi {
    /// Create a transport from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.map_err(ClientError::transport)?;
            // Structured error bodies take precedence over raw status
            if let Ok(body) = serde_json::from_str::<ApiResponse<()>>(&text) {
                if let Some(code) = body.code.and_then(|c| ErrorCode::try_from(c).ok()) {
                    warn!(
                        code = %code,
                        category = code.category().name(),
                        status = %status,
                        "service returned a structured error"
                    );
                    return Err(map_api_error(AppError {
                        code,
                        message: body.message,
                        details: body.details,
                    }));
                }
            }
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::AuthExpired),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
                _ => Err(ClientError::Internal(text)),
            };
        }
        response.json().await.map_err(ClientError::transport)
    }
}

/// Map a structured service error to the client taxonomy.
///
/// Auth codes collapse to `AuthExpired` because the session cannot
/// recover without re-authentication; everything else stays a typed
/// `Api` error, detail payload included, so coordinators can branch
/// on the code.
fn map_api_error(err: AppError) -> ClientError {
    match err.code {
        ErrorCode::NotAuthenticated
        | ErrorCode::InvalidCredentials
        | ErrorCode::TokenExpired
        | ErrorCode::TokenInvalid => ClientError::AuthExpired,
        ErrorCode::PermissionDenied | ErrorCode::AdminRequired => {
            ClientError::Forbidden(err.message)
        }
        _ => ClientError::Api(err),
    }
}

#[async_trait]
impl HttpApi for NetworkHttpApi {
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> ClientResult<T> {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        let response = req.send().await.map_err(ClientError::transport)?;
        self.handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: &B,
    ) -> ClientResult<T> {
        let mut req = self.client.post(self.url(path)).json(body);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        let response = req.send().await.map_err(ClientError::transport)?;
        self.handle_response(response).await
    }

    async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> ClientResult<T> {
        let mut req = self.client.delete(self.url(path));
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        let response = req.send().await.map_err(ClientError::transport)?;
        self.handle_response(response).await
    }
}
