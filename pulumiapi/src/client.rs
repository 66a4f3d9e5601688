use std::sync::Arc;

use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{ApiError, ErrorResponse};

const DEFAULT_API_URL: &str = "https://api.pulumi.com/api/";

/// Pulumi Cloud API client.
///
/// Cheap to clone; all clones share the underlying HTTP connection pool.
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl Client {
    /// Create a client authenticated with `token`. `url` overrides the
    /// production endpoint; its path is always forced to `/api/`.
    pub fn new(token: &str, url: Option<&str>) -> Result<Self, ApiError> {
        let base_url = match url {
            Some(raw) if !raw.is_empty() => {
                let mut parsed = Url::parse(raw)
                    .map_err(|e| ApiError::InvalidUrl(format!("failed to parse {raw:?}: {e}")))?;
                parsed.set_path("/api/");
                parsed
            }
            _ => Url::parse(DEFAULT_API_URL)
                .map_err(|e| ApiError::InvalidUrl(format!("failed to parse default URL: {e}")))?,
        };

        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                token: token.to_string(),
            }),
        })
    }

    pub(crate) async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let body = self.send(Method::GET, path, &[], None::<&()>).await?;
        Self::decode_body(&body)
    }

    pub(crate) async fn get_json_query<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<R, ApiError> {
        let body = self.send(Method::GET, path, query, None::<&()>).await?;
        Self::decode_body(&body)
    }

    pub(crate) async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        req: &B,
    ) -> Result<R, ApiError> {
        let body = self.send(Method::POST, path, &[], Some(req)).await?;
        Self::decode_body(&body)
    }

    pub(crate) async fn post_no_content<B: Serialize>(
        &self,
        path: &str,
        req: &B,
    ) -> Result<(), ApiError> {
        self.send(Method::POST, path, &[], Some(req)).await?;
        Ok(())
    }

    pub(crate) async fn patch_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        req: &B,
    ) -> Result<R, ApiError> {
        let body = self.send(Method::PATCH, path, &[], Some(req)).await?;
        Self::decode_body(&body)
    }

    pub(crate) async fn patch_no_content<B: Serialize>(
        &self,
        path: &str,
        req: &B,
    ) -> Result<(), ApiError> {
        self.send(Method::PATCH, path, &[], Some(req)).await?;
        Ok(())
    }

    pub(crate) async fn delete_no_content(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, &[], None::<&()>).await?;
        Ok(())
    }

    pub(crate) async fn delete_no_content_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, query, None::<&()>).await?;
        Ok(())
    }

    /// Issue one request with the standard headers applied and the error
    /// body decoded on a non-2xx status. Returns the raw response body.
    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        req_body: Option<&B>,
    ) -> Result<Vec<u8>, ApiError> {
        let mut url = self
            .inner
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("failed to resolve {path:?}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        tracing::debug!("{} request to: {}", method, url);

        let mut request = self
            .inner
            .http
            .request(method, url)
            .header("X-Pulumi-Source", "provider")
            .header(header::ACCEPT, "application/vnd.pulumi+8")
            .header(header::CONTENT_TYPE, "application/json")
            .header(
                header::AUTHORIZATION,
                format!("token {}", self.inner.token),
            );
        if let Some(body) = req_body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(Self::decode_error(status, &bytes));
        }
        Ok(bytes.to_vec())
    }

    fn decode_error(status: StatusCode, body: &[u8]) -> ApiError {
        match serde_json::from_slice::<ErrorResponse>(body) {
            Ok(err) => {
                // Some endpoints omit the code field from the error body.
                let status_code = if err.code == 0 {
                    status.as_u16()
                } else {
                    err.code
                };
                ApiError::ErrorResponse {
                    status_code,
                    message: err.message,
                }
            }
            Err(_) => ApiError::ErrorResponse {
                status_code: status.as_u16(),
                message: String::from_utf8_lossy(body).into_owned(),
            },
        }
    }

    fn decode_body<R: DeserializeOwned>(body: &[u8]) -> Result<R, ApiError> {
        serde_json::from_slice(body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Guard against empty path parameters before building a request.
pub(crate) fn require(value: &str, name: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::Validation(format!("empty {name}")));
    }
    Ok(())
}
