//! Notification dispatch
//!
//! Notifications are best-effort side effects; a delivery failure never
//! changes a booking outcome. The default implementation emits
//! structured log events, which is where an external delivery channel
//! would hook in.

use nido_core::traits::{Notifier, NotifyEvent};
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

/// Notifier that records events in the application log
#[derive(Debug, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, user_id: i32, event: NotifyEvent, payload: Value) {
        info!(
            target: "nido::notify",
            user_id,
            event = event.as_str(),
            %payload,
            "notification dispatched"
        );
    }
}
