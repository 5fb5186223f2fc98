use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::FcmError;
use crate::models::*;

const OAUTH_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Firebase Cloud Messaging Client
///
/// Speaks the FCM HTTP v1 API. Manages OAuth2 token generation, caching,
/// and message delivery; holds no other state, so one instance is shared
/// for the process lifetime.
#[derive(Debug)]
pub struct FcmClient {
    project_id: String,
    credentials: Arc<ServiceAccountKey>,
    token_cache: Mutex<Option<TokenCache>>,
    http_client: reqwest::Client,
}

impl FcmClient {
    /// Create a client from an already-parsed service account key.
    pub fn new(credentials: ServiceAccountKey) -> Self {
        Self {
            project_id: credentials.project_id.clone(),
            credentials: Arc::new(credentials),
            token_cache: Mutex::new(None),
            http_client: reqwest::Client::new(),
        }
    }

    /// Create a client from the JSON-encoded service account blob
    /// (the content of the key file, as carried in configuration).
    pub fn from_json(blob: &str) -> Result<Self, FcmError> {
        let credentials: ServiceAccountKey = serde_json::from_str(blob)
            .map_err(|e| FcmError::Credentials(format!("invalid service account JSON: {e}")))?;
        Ok(Self::new(credentials))
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Send a notification to a single device.
    ///
    /// Dispatches exactly once; no retry on failure. Returns the
    /// provider-assigned message id.
    pub async fn send(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
        data: Option<HashMap<String, String>>,
    ) -> Result<String, FcmError> {
        let access_token = self.access_token().await?;
        let message = FcmMessage {
            message: FcmMessageContent::for_device(device_token, title, body, data),
        };
        let message_id = self.post_message(&access_token, &message).await?;
        debug!(%message_id, "FCM delivery successful");
        Ok(message_id)
    }

    /// Send a notification to each device of `device_tokens`.
    ///
    /// One dispatch per token with the reduced platform hint set.
    /// Individual failures do not abort the batch; the returned outcomes
    /// are index-aligned with the input tokens. An error is returned only
    /// when the whole request fails before any per-token dispatch
    /// (credential or token-exchange failure).
    pub async fn send_each(
        &self,
        device_tokens: &[String],
        title: &str,
        body: &str,
        data: Option<HashMap<String, String>>,
    ) -> Result<Vec<SendOutcome>, FcmError> {
        let access_token = self.access_token().await?;

        let mut outcomes = Vec::with_capacity(device_tokens.len());
        for device_token in device_tokens {
            let message = FcmMessage {
                message: FcmMessageContent::for_bulk_device(
                    device_token,
                    title,
                    body,
                    data.clone(),
                ),
            };
            match self.post_message(&access_token, &message).await {
                Ok(message_id) => outcomes.push(SendOutcome {
                    message_id: Some(message_id),
                    error: None,
                }),
                Err(e) => {
                    warn!(error = %e, "FCM delivery failed for one token of batch");
                    outcomes.push(SendOutcome {
                        message_id: None,
                        error: Some(e),
                    });
                }
            }
        }

        // Callers correlate outcomes to tokens positionally.
        debug_assert_eq!(outcomes.len(), device_tokens.len());
        Ok(outcomes)
    }

    async fn post_message(
        &self,
        access_token: &str,
        message: &FcmMessage,
    ) -> Result<String, FcmError> {
        let url = format!(
            "https://fcm.googleapis.com/v1/projects/{}/messages:send",
            self.project_id
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .json(message)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::OK {
            let fcm_response: FcmApiResponse = response.json().await?;
            Ok(fcm_response
                .name
                .unwrap_or_else(|| Uuid::new_v4().to_string()))
        } else {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            Err(FcmError::classify(status, &error_text))
        }
    }

    /// Get an access token from the service account (with caching).
    async fn access_token(&self) -> Result<String, FcmError> {
        {
            let cache = self.token_cache.lock().expect("token cache lock poisoned");
            if let Some(cached) = cache.as_ref() {
                let now = Utc::now().timestamp();
                // Reuse while at least 60 seconds of validity remain
                if cached.expires_at > now + 60 {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        let now = Utc::now();
        let claims = JwtClaims {
            iss: self.credentials.client_email.clone(),
            sub: self.credentials.client_email.clone(),
            scope: OAUTH_SCOPE.to_string(),
            aud: self.credentials.token_uri.clone(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())
            .map_err(|e| FcmError::Credentials(format!("failed to parse private key: {e}")))?;

        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| FcmError::Credentials(format!("failed to sign JWT: {e}")))?;

        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.credentials.token_uri)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FcmError::Unauthenticated(format!(
                "token request failed with status {}",
                response.status()
            )));
        }

        let token_response: GoogleTokenResponse = response
            .json()
            .await
            .map_err(|e| FcmError::Unauthenticated(format!("invalid token response: {e}")))?;

        let expires_at = Utc::now().timestamp() + token_response.expires_in;
        {
            let mut cache = self.token_cache.lock().expect("token cache lock poisoned");
            *cache = Some(TokenCache {
                access_token: token_response.access_token.clone(),
                expires_at,
            });
        }

        Ok(token_response.access_token)
    }
}
