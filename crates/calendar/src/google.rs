//! Google Calendar v3 provider authenticated as a service account.
//!
//! Access tokens come from the OAuth2 JWT-bearer grant: an RS256 assertion
//! signed with the service account's private key is exchanged for a bearer
//! token, which is cached until shortly before it expires.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::CalendarError;
use crate::payload::CalendarEvent;
use crate::provider::CalendarProvider;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const EVENTS_BASE_URL: &str = "https://www.googleapis.com/calendar/v3/calendars";
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each signed assertion.
const ASSERTION_TTL_SECS: i64 = 3600;

/// Cached tokens are refreshed this long before their stated expiry.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// HTTP request timeout for a single provider call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_TIME_ZONE: &str = "UTC";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Service-account credentials and target calendar.
#[derive(Debug, Clone)]
pub struct GoogleCalendarConfig {
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    pub calendar_id: String,
    /// IANA zone name sent with every event time.
    pub time_zone: String,
}

impl GoogleCalendarConfig {
    /// Build a config from raw environment values.
    ///
    /// Returns `None` unless both the client email and the private key are
    /// present and non-empty. Literal `\n` sequences in the key become
    /// newlines.
    pub fn from_parts(
        client_email: Option<String>,
        private_key: Option<String>,
        calendar_id: Option<String>,
        time_zone: Option<String>,
    ) -> Option<Self> {
        let client_email = client_email.filter(|v| !v.trim().is_empty())?;
        let private_key = private_key.filter(|v| !v.trim().is_empty())?;
        Some(Self {
            client_email,
            private_key: private_key.replace("\\n", "\n"),
            calendar_id: calendar_id
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string()),
            time_zone: time_zone
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Token exchange
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_TTL_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    /// Unix seconds after which the token must not be reused.
    refresh_after: i64,
}

#[derive(Debug, Deserialize)]
struct InsertedEvent {
    id: String,
}

// ---------------------------------------------------------------------------
// GoogleCalendar
// ---------------------------------------------------------------------------

/// Mirrors events into a single Google calendar.
pub struct GoogleCalendar {
    client: reqwest::Client,
    client_email: String,
    key: EncodingKey,
    calendar_id: String,
    time_zone: String,
    token: Mutex<Option<CachedToken>>,
}

// Test assertions format `Result<GoogleCalendar, _>`; the signing key is omitted.
#[cfg(test)]
impl std::fmt::Debug for GoogleCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCalendar")
            .field("client_email", &self.client_email)
            .field("calendar_id", &self.calendar_id)
            .finish_non_exhaustive()
    }
}

impl GoogleCalendar {
    /// Create a provider. Fails if the private key is not valid RSA PEM.
    pub fn new(config: GoogleCalendarConfig) -> Result<Self, CalendarError> {
        let key = EncodingKey::from_rsa_pem(config.private_key.as_bytes())
            .map_err(|e| CalendarError::Credentials(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            client_email: config.client_email,
            key,
            calendar_id: config.calendar_id,
            time_zone: config.time_zone,
            token: Mutex::new(None),
        })
    }

    /// Zone name that event bodies should carry.
    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    fn sign_assertion(&self, now: i64) -> Result<String, CalendarError> {
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: CALENDAR_SCOPE.to_string(),
            aud: TOKEN_URL.to_string(),
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        };
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &self.key)?)
    }

    async fn access_token(&self) -> Result<String, CalendarError> {
        let mut cached = self.token.lock().await;
        let now = Utc::now().timestamp();
        if let Some(token) = cached.as_ref().filter(|t| t.refresh_after > now) {
            return Ok(token.value.clone());
        }

        let assertion = self.sign_assertion(now)?;
        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| CalendarError::InvalidResponse(e.to_string()))?;

        tracing::debug!(expires_in = body.expires_in, "Obtained calendar access token");
        let value = body.access_token.clone();
        *cached = Some(CachedToken {
            value: body.access_token,
            refresh_after: now + body.expires_in - TOKEN_REFRESH_MARGIN_SECS,
        });
        Ok(value)
    }

    fn events_url(&self, event_id: Option<&str>) -> Result<Url, CalendarError> {
        events_url(&self.calendar_id, event_id)
    }
}

/// `.../calendars/{calendar_id}/events[/{event_id}]`, with each segment
/// percent-encoded.
fn events_url(calendar_id: &str, event_id: Option<&str>) -> Result<Url, CalendarError> {
    let mut url = Url::parse(EVENTS_BASE_URL)
        .map_err(|e| CalendarError::InvalidResponse(e.to_string()))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| CalendarError::InvalidResponse("base URL cannot have a path".into()))?;
        segments.push(calendar_id).push("events");
        if let Some(id) = event_id {
            segments.push(id);
        }
    }
    Ok(url)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CalendarError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(CalendarError::HttpStatus {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl CalendarProvider for GoogleCalendar {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn create_event(&self, event: &CalendarEvent) -> Result<String, CalendarError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .post(self.events_url(None)?)
            .bearer_auth(token)
            .json(event)
            .send()
            .await?;
        let inserted: InsertedEvent = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| CalendarError::InvalidResponse(e.to_string()))?;
        Ok(inserted.id)
    }

    async fn update_event(
        &self,
        external_id: &str,
        event: &CalendarEvent,
    ) -> Result<(), CalendarError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .put(self.events_url(Some(external_id))?)
            .bearer_auth(token)
            .json(event)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn delete_event(&self, external_id: &str) -> Result<(), CalendarError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .delete(self.events_url(Some(external_id))?)
            .bearer_auth(token)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
