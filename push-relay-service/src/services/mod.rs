use std::collections::HashMap;

use async_trait::async_trait;

use fcm_shared::{FcmClient, FcmError, SendOutcome};

/// Outbound push dispatch seam.
///
/// Handlers talk to the provider through this trait so they can be
/// exercised against a mock sender in tests.
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Dispatch to a single device; returns the provider message id.
    async fn send_single(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: Option<HashMap<String, String>>,
    ) -> Result<String, FcmError>;

    /// Dispatch to each device, returning outcomes index-aligned with
    /// `tokens`. Errs only when the whole request fails before any
    /// per-token result exists.
    async fn send_bulk(
        &self,
        tokens: &[String],
        title: &str,
        body: &str,
        data: Option<HashMap<String, String>>,
    ) -> Result<Vec<SendOutcome>, FcmError>;
}

#[async_trait]
impl PushSender for FcmClient {
    async fn send_single(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: Option<HashMap<String, String>>,
    ) -> Result<String, FcmError> {
        self.send(token, title, body, data).await
    }

    async fn send_bulk(
        &self,
        tokens: &[String],
        title: &str,
        body: &str,
        data: Option<HashMap<String, String>>,
    ) -> Result<Vec<SendOutcome>, FcmError> {
        self.send_each(tokens, title, body, data).await
    }
}
