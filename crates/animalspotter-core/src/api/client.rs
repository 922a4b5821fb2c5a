//! API client for the Animal Spotter REST service.
//!
//! `ApiClient` owns the HTTP connection pool and the login session. Account
//! calls post JSON credentials; animal calls are bearer-authenticated GETs;
//! image downloads go to whatever URL the animal record points at.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{Credentials, Session, SessionToken};
use crate::config::Config;
use crate::models::{Animal, AnimalImage};

use super::ApiError;

// ============================================================================
// Endpoints (relative to the configured base URL)
// ============================================================================

const SIGNUP_PATH: &[&str] = &["users", "signup"];
const LOGIN_PATH: &[&str] = &["users", "login"];
const ALL_ANIMALS_PATH: &[&str] = &["animals", "all"];
const ANIMALS_PATH: &str = "animals";

/// API client for the Animal Spotter service.
/// Clone is cheap - clones share the connection pool and the same session.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: Arc<Session>,
}

impl ApiClient {
    /// Create a client for the configured base URL with no session.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Self::with_client(client, &config.base_url)
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::BadUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::BadUrl(format!("{} cannot be a base URL", base_url)));
        }

        Ok(Self {
            client,
            base_url,
            session: Arc::new(Session::new()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub async fn has_session(&self) -> bool {
        self.session.is_authenticated().await
    }

    /// Forget the current token. Authenticated calls fail with `NoToken`
    /// until the next successful `authenticate`.
    pub async fn clear_session(&self) {
        self.session.clear().await;
        debug!("Session cleared");
    }

    /// Append path segments to the base URL. Each segment is percent-encoded,
    /// so an animal name containing `/` or `?` stays a single segment.
    ///
    /// Empty, `.` and `..` segments are rejected: URL normalisation would drop
    /// them (even as `%2E`) and the request would hit a different route.
    fn endpoint<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url, ApiError> {
        for segment in segments {
            let segment: &str = segment.as_ref();
            if matches!(segment, "" | "." | "..") {
                return Err(ApiError::BadUrl(format!(
                    "{:?} is not a valid path segment",
                    segment
                )));
            }
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::BadUrl(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ===== Account =====

    /// Create an account. The response body is ignored.
    pub async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        self.post_credentials(SIGNUP_PATH, credentials).await?;
        debug!(username = %credentials.username, "Account created");
        Ok(())
    }

    /// Exchange credentials for a bearer token and store it.
    ///
    /// The stored token is only replaced once the login body has decoded;
    /// a bad body leaves any previous session in place.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let response = self.post_credentials(LOGIN_PATH, credentials).await?;

        let token: SessionToken = Self::decode_json(response).await.inspect_err(|e| {
            warn!(error = %e, "Failed to decode login response");
        })?;

        self.session.update(token).await;
        debug!(username = %credentials.username, "Login successful");
        Ok(())
    }

    async fn post_credentials(
        &self,
        segments: &[&str],
        credentials: &Credentials,
    ) -> Result<Response, ApiError> {
        let body = serde_json::to_vec(credentials).map_err(ApiError::Encoding)?;
        let url = self.endpoint(segments)?;
        debug!(%url, "Sending POST request");

        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = Self::error_body(response).await;
            warn!(%status, "Account request rejected");
            return Err(ApiError::unexpected_status(status, &body));
        }
        Ok(response)
    }

    // ===== Animals =====

    /// Fetch every animal name the service knows, in the order it sends them.
    pub async fn list_animal_names(&self) -> Result<Vec<String>, ApiError> {
        let names: Vec<String> = self.get_authorized(ALL_ANIMALS_PATH).await?;
        debug!(count = names.len(), "Animal names fetched");
        Ok(names)
    }

    /// Fetch the sighting record for one animal.
    pub async fn fetch_animal(&self, name: &str) -> Result<Animal, ApiError> {
        let animal: Animal = self.get_authorized(&[ANIMALS_PATH, name]).await?;
        debug!(id = animal.id, name = %animal.name, "Animal fetched");
        Ok(animal)
    }

    async fn get_authorized<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let token = self.session.token().await.ok_or(ApiError::NoToken)?;
        let url = self.endpoint(segments)?;
        debug!(%url, "Sending GET request");

        let response = self
            .client
            .get(url.clone())
            .header(header::AUTHORIZATION, token.bearer())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            if status == StatusCode::UNAUTHORIZED {
                warn!(%url, "Bearer token rejected");
            } else {
                warn!(%url, %status, "Request failed");
            }
            return Err(ApiError::from_status(status, &body));
        }

        Self::decode_json(response).await
    }

    // ===== Images =====

    /// Download and decode the image at `url`. No session required.
    pub async fn fetch_image(&self, url: &str) -> Result<AnimalImage, ApiError> {
        let parsed = Url::parse(url).map_err(|e| ApiError::BadUrl(format!("{}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::BadUrl(format!("{}: unsupported scheme", url)));
        }
        debug!(url = %parsed, "Fetching image");

        let response = self.client.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::error_body(response).await;
            warn!(%status, "Image request failed");
            return Err(ApiError::unexpected_status(status, &body));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ApiError::EmptyBody);
        }

        let image = AnimalImage::decode(&bytes)?;
        debug!(format = ?image.format, dimensions = ?image.dimensions(), "Image decoded");
        Ok(image)
    }

    /// Body of a failed response, for the error message only
    async fn error_body(response: Response) -> String {
        match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(error = %e, "Failed to read error response body");
                String::new()
            }
        }
    }

    /// Read the whole body and decode it as JSON, keeping "no body" distinct
    /// from "wrong body".
    async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ApiError::EmptyBody);
        }
        serde_json::from_slice(&bytes).map_err(ApiError::Decoding)
    }
}
