//! # Domain Events
//!
//! Post-commit notifications from the invoice transaction engine.
//!
//! ## Decoupling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  InvoiceEngine ── commit ──► SQLite                                 │
//! │       │                                                             │
//! │       │  after (and only after) a successful commit                 │
//! │       ▼                                                             │
//! │  mpsc channel ──► ActivityRecorder ──► activity_logs                │
//! │              └──► (other subscribers: dashboards, sync, ...)        │
//! │                                                                     │
//! │  The audit write happens OUTSIDE the sale transaction: a slow or    │
//! │  failing sink can never roll back a committed sale.                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::error::DbResult;
use crate::pool::Database;
use crate::repository::activity::ActivityLogRepository;
use kirana_core::Money;

/// An event describing a committed state change.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A sale committed: stock moved, ledger appended, loyalty accrued.
    InvoiceCreated {
        invoice_id: String,
        invoice_number: String,
        total_cents: i64,
        created_by: String,
    },
}

/// Creates an event channel: give the sender to the engine, the receiver
/// to a subscriber such as [`ActivityRecorder`].
pub fn channel() -> (UnboundedSender<DomainEvent>, UnboundedReceiver<DomainEvent>) {
    mpsc::unbounded_channel()
}

/// Consumes domain events and appends audit rows.
///
/// Runs until every sender is dropped, then drains and returns; spawn it
/// on the runtime next to the engine:
///
/// ```rust,ignore
/// let (tx, rx) = events::channel();
/// let engine = InvoiceEngine::new(&db, tax_rate).with_events(tx);
/// tokio::spawn(ActivityRecorder::new(&db, rx).run());
/// ```
pub struct ActivityRecorder {
    repo: ActivityLogRepository,
    events: UnboundedReceiver<DomainEvent>,
}

impl ActivityRecorder {
    /// Creates a recorder writing to the given database.
    pub fn new(db: &Database, events: UnboundedReceiver<DomainEvent>) -> Self {
        ActivityRecorder {
            repo: db.activity(),
            events,
        }
    }

    /// Processes events until the channel closes.
    ///
    /// A failed audit write is logged and skipped; the sale it describes
    /// has already committed.
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            debug!(
                payload = %serde_json::to_string(&event).unwrap_or_default(),
                "Recording domain event"
            );
            if let Err(err) = self.record(&event).await {
                warn!(error = %err, "Failed to record activity for event");
            }
        }
    }

    async fn record(&self, event: &DomainEvent) -> DbResult<()> {
        match event {
            DomainEvent::InvoiceCreated {
                invoice_number,
                total_cents,
                created_by,
                ..
            } => {
                let details = format!(
                    "Created invoice {}, total {}",
                    invoice_number,
                    Money::from_cents(*total_cents)
                );
                self.repo
                    .log(created_by, "INVOICE_CREATE", Some(details), None)
                    .await?;
            }
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_payload_is_stable_json() {
        // Downstream subscribers consume events as tagged JSON; keep the
        // shape stable.
        let event = DomainEvent::InvoiceCreated {
            invoice_id: "inv-1".to_string(),
            invoice_number: "INV-20260806-123456".to_string(),
            total_cents: 40680,
            created_by: "cashier-1".to_string(),
        };

        let payload = serde_json::to_string(&event).unwrap();
        assert!(payload.contains("\"type\":\"invoice_created\""));
        assert!(payload.contains("\"invoice_number\":\"INV-20260806-123456\""));
        assert!(payload.contains("\"total_cents\":40680"));
    }
}
