//! # FaceGate Client
//!
//! Client for the FaceGate partner HTTP API: places, devices, persons
//! (employees/visitors), and profile data. Every call is a POST carrying the
//! OAuth2 access token as a `token` form field; responses arrive in the
//! provider's JSON envelope and are unwrapped before decoding.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use facegate_client::{Client, StaticTokenSource};
//!
//! let client = Client::new(Arc::new(StaticTokenSource::new(access_token)))?;
//! let places = client.places().list().await?;
//! ```

mod devices;
mod error;
mod oauth;
mod persons;
mod places;
mod profile;

pub use devices::{ConnectionStatus, DeviceInfo, DeviceService};
pub use error::{
    ApiError, ApiResult, ERR_DUPLICATED_IMAGE, ERR_EMPLOYEE_EXISTS, ERR_INVALID_IMAGE,
    ERR_PERSON_IMAGE_INVALID, ERR_UNSUPPORTED, is_retriable,
};
pub use oauth::{AccessTokenSource, OAuthConfig, StaticTokenSource, TokenSet};
pub use persons::{
    AvatarSize, Person, PersonListItem, PersonListItemWithPlace, PersonListQuery, PersonService,
    PersonUpdate, RegisterPersonByUrlRequest, RegisterPersonRequest, RegisterPersonResponse,
};
pub use places::{Place, PlaceService};
pub use profile::{Profile, ProfileService};

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::oauth::AccessTokenSource as TokenSource;

/// Default base URL for partner API requests.
pub const DEFAULT_BASE_URL: &str = "https://partner.facegate.ai/";

const USER_AGENT: &str = "facegate-sdk";

// The provider asks for a 10-30s timeout on person/register and
// person/updateByFaceImage; 30s covers every endpoint.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the FaceGate partner API.
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    token_source: Arc<dyn TokenSource>,
    user_agent: String,
}

impl Client {
    /// Creates a client with the default base URL and timeout.
    pub fn new(token_source: Arc<dyn TokenSource>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Self::with_http(http, DEFAULT_BASE_URL, token_source)
    }

    /// Creates a client over a caller-supplied HTTP client and base URL.
    ///
    /// The base URL must end with a trailing slash so endpoint paths resolve
    /// under it.
    pub fn with_http(
        http: reqwest::Client,
        base_url: &str,
        token_source: Arc<dyn TokenSource>,
    ) -> ApiResult<Self> {
        if !base_url.ends_with('/') {
            return Err(ApiError::Config(format!(
                "base URL must end with a trailing slash: {base_url}"
            )));
        }
        let base_url =
            Url::parse(base_url).map_err(|err| ApiError::Config(err.to_string()))?;
        Ok(Self {
            http,
            base_url,
            token_source,
            user_agent: USER_AGENT.to_string(),
        })
    }

    /// Service for place management.
    pub fn places(&self) -> PlaceService<'_> {
        PlaceService { client: self }
    }

    /// Service for device management.
    pub fn devices(&self) -> DeviceService<'_> {
        DeviceService { client: self }
    }

    /// Service for person management.
    pub fn persons(&self) -> PersonService<'_> {
        PersonService { client: self }
    }

    /// Service for the account profile.
    pub fn profile(&self) -> ProfileService<'_> {
        ProfileService { client: self }
    }

    /// POSTs a form-urlencoded request and unwraps the envelope into `T`.
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        mut form: Vec<(&'static str, String)>,
    ) -> ApiResult<T> {
        let token = self.token_source.access_token().await?;
        form.push(("token", token));

        let body = self.send(endpoint, |request| request.form(&form)).await?;
        unwrap_envelope(&body)
    }

    /// POSTs a form-urlencoded request, discarding any envelope payload.
    pub(crate) async fn post_form_discard(
        &self,
        endpoint: &str,
        mut form: Vec<(&'static str, String)>,
    ) -> ApiResult<()> {
        let token = self.token_source.access_token().await?;
        form.push(("token", token));

        let body = self.send(endpoint, |request| request.form(&form)).await?;
        check_envelope(&body).map(|_| ())
    }

    /// POSTs a multipart request and unwraps the envelope into `T`.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: reqwest::multipart::Form,
    ) -> ApiResult<T> {
        let token = self.token_source.access_token().await?;
        let form = form.text("token", token);

        let body = self
            .send(endpoint, move |request| request.multipart(form))
            .await?;
        unwrap_envelope(&body)
    }

    /// POSTs a multipart request, discarding any envelope payload.
    pub(crate) async fn post_multipart_discard(
        &self,
        endpoint: &str,
        form: reqwest::multipart::Form,
    ) -> ApiResult<()> {
        let token = self.token_source.access_token().await?;
        let form = form.text("token", token);

        let body = self
            .send(endpoint, move |request| request.multipart(form))
            .await?;
        check_envelope(&body).map(|_| ())
    }

    async fn send(
        &self,
        endpoint: &str,
        attach: impl FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder,
    ) -> ApiResult<Vec<u8>> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|err| ApiError::Config(err.to_string()))?;

        tracing::debug!(endpoint, "calling partner API");

        let request = self
            .http
            .post(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent);
        let response = attach(request).send().await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Response wrapper used by every partner endpoint.
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "returnCode")]
    return_code: i32,
    #[serde(rename = "returnMessage", default)]
    return_message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// Parses the envelope and maps non-1 return codes to [`ApiError::Server`].
fn check_envelope(body: &[u8]) -> ApiResult<Envelope> {
    let envelope: Envelope = serde_json::from_slice(body)?;
    if envelope.return_code != 1 {
        // A duplicated-image rejection carries the already-registered person.
        let person = if envelope.return_code == error::ERR_DUPLICATED_IMAGE {
            envelope
                .data
                .clone()
                .and_then(|data| serde_json::from_value(data).ok())
        } else {
            None
        };
        return Err(ApiError::Server {
            code: envelope.return_code,
            message: envelope.return_message,
            person,
        });
    }
    Ok(envelope)
}

fn unwrap_envelope<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    let envelope = check_envelope(body)?;
    let data = envelope.data.unwrap_or(serde_json::Value::Null);
    Ok(serde_json::from_value(data)?)
}
