//! Background health poll against `GET /api/status`.
//!
//! Level-triggered: every tick probes once and reports the result as ground
//! truth. There is no retry, backoff, or failure counting; recovery is simply
//! the next successful tick.

use crate::api::ApiClient;
use crate::model::SessionEvent;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Poll until the event channel closes. The first probe fires immediately,
/// then on the fixed interval.
pub async fn run_status_monitor(
    client: ApiClient,
    interval: Duration,
    event_tx: UnboundedSender<SessionEvent>,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        let health = client.status().await;
        if event_tx.send(SessionEvent::Health(health)).is_err() {
            break;
        }
    }
}
