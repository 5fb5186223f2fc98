use std::sync::Arc;

use crate::error::RelayError;
use crate::services::PushSender;

/// Process-scoped state, built once in main and read-only afterwards.
///
/// `sender` is `None` when credential parsing failed at startup; the
/// relay then runs degraded with only the status endpoints functional.
pub struct AppState {
    pub sender: Option<Arc<dyn PushSender>>,
    pub port: u16,
}

impl AppState {
    pub fn ready(&self) -> bool {
        self.sender.is_some()
    }

    /// Sender handle, or the not-initialized error every send endpoint
    /// reports in degraded mode.
    pub fn sender(&self) -> Result<&Arc<dyn PushSender>, RelayError> {
        self.sender.as_ref().ok_or(RelayError::NotReady)
    }
}
