//! Notification delivery.
//!
//! Shapes a comparator result into an event for the presentation layer and
//! hands it to a sink. The improvement percentage is passed through
//! unrounded; the headline is the only pre-formatted field.

use async_trait::async_trait;
use ironlog_core::{PrKind, PrNotification, Time};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::tracker::Evaluation;

/// A PR ready for delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrEvent {
    /// Record type
    pub kind: PrKind,
    /// Exercise display name
    pub exercise_name: String,
    /// New best
    pub new_value: f64,
    /// Previous best
    pub old_value: f64,
    /// Unit of the two values
    pub unit: &'static str,
    /// Unrounded improvement
    pub improvement_percent: f64,
    /// Short human-readable summary
    pub headline: String,
    /// When the set was logged
    pub timestamp: Time,
    /// Whether the record reached durable storage
    pub durable: bool,
}

impl PrEvent {
    /// Shape a notification for delivery.
    pub fn from_notification(notification: &PrNotification, durable: bool) -> Self {
        let unit = notification.kind.unit();
        let headline = if notification.first_record {
            format!(
                "First record for {}: {} {}",
                notification.exercise_name, notification.new_value, unit
            )
        } else {
            format!(
                "New {} PR on {}: {} {} (was {} {})",
                notification.kind,
                notification.exercise_name,
                notification.new_value,
                unit,
                notification.old_value,
                unit
            )
        };

        Self {
            kind: notification.kind,
            exercise_name: notification.exercise_name.clone(),
            new_value: notification.new_value,
            old_value: notification.old_value,
            unit,
            improvement_percent: notification.improvement_percent,
            headline,
            timestamp: notification.timestamp,
            durable,
        }
    }

    /// Shape an evaluation; `None` when no record fell.
    pub fn from_evaluation(evaluation: &Evaluation) -> Option<Self> {
        evaluation
            .notification
            .as_ref()
            .map(|n| Self::from_notification(n, evaluation.is_durable()))
    }
}

/// Destination for PR events.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one event. Delivery problems are the sink's to handle.
    async fn deliver(&self, event: PrEvent);
}

/// Deliver the PR carried by `evaluation`, if any. Returns the delivered event.
pub async fn emit(sink: &dyn NotificationSink, evaluation: &Evaluation) -> Option<PrEvent> {
    let event = PrEvent::from_evaluation(evaluation)?;
    sink.deliver(event.clone()).await;
    Some(event)
}

/// Fan-out sink for any number of presentation subscribers.
#[derive(Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<PrEvent>,
}

impl BroadcastSink {
    /// Create a sink buffering up to `capacity` undelivered events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<PrEvent> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl NotificationSink for BroadcastSink {
    async fn deliver(&self, event: PrEvent) {
        // No subscribers is fine
        if self.tx.send(event).is_err() {
            debug!("PR event dropped: no subscribers");
        }
    }
}

/// Sink that writes events to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, event: PrEvent) {
        info!(
            kind = %event.kind,
            improvement = event.improvement_percent,
            durable = event.durable,
            "{}",
            event.headline
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{BasicPrTracker, PrTracker};
    use chrono::Utc;
    use ironlog_storage::{MemoryStorage, StorageError};

    fn evaluation(old: f64, new: f64, persist_error: Option<StorageError>) -> Evaluation {
        Evaluation {
            notification: Some(PrNotification::new(PrKind::Weight, "Deadlift", new, old, Utc::now())),
            persist_error,
        }
    }

    fn first_evaluation(weight: f64, persist_error: Option<StorageError>) -> Evaluation {
        Evaluation {
            notification: Some(PrNotification::first("Deadlift", weight, Utc::now())),
            persist_error,
        }
    }

    #[test]
    fn test_event_keeps_unrounded_improvement() {
        let event = PrEvent::from_evaluation(&evaluation(150.0, 152.5, None)).unwrap();
        assert_eq!(event.improvement_percent, (152.5 - 150.0) / 150.0 * 100.0);
        assert_eq!(event.unit, "kg");
        assert_eq!(event.headline, "New weight PR on Deadlift: 152.5 kg (was 150 kg)");
        assert!(event.durable);
    }

    #[test]
    fn test_first_record_headline_and_durability() {
        let event = PrEvent::from_evaluation(&first_evaluation(
            120.0,
            Some(StorageError::Other("full".to_string())),
        ))
        .unwrap();
        assert_eq!(event.headline, "First record for Deadlift: 120 kg");
        assert!(!event.durable);
    }

    #[tokio::test]
    async fn test_volume_over_zero_baseline_headline() {
        let tracker = BasicPrTracker::new(MemoryStorage::new());
        tracker.evaluate("bench".into(), "Bench Press", 50.0, 0, None).await.unwrap();
        let evaluation = tracker.evaluate("bench".into(), "Bench Press", 40.0, 5, None).await.unwrap();

        let event = PrEvent::from_evaluation(&evaluation).unwrap();
        assert_eq!(event.kind, PrKind::Volume);
        assert_eq!(event.headline, "New volume PR on Bench Press: 200 kg (was 0 kg)");
    }

    #[test]
    fn test_event_json_shape() {
        let event = PrEvent::from_evaluation(&evaluation(100.0, 105.0, None)).unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "weight");
        assert_eq!(json["unit"], "kg");
        assert_eq!(json["durable"], true);
        let improvement = json["improvement_percent"].as_f64().unwrap();
        assert!((improvement - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_pr_no_event() {
        let eval = Evaluation { notification: None, persist_error: None };
        assert!(PrEvent::from_evaluation(&eval).is_none());
    }

    #[tokio::test]
    async fn test_broadcast_delivery() {
        let sink = BroadcastSink::new(8);
        let mut rx = sink.subscribe();

        let delivered = emit(&sink, &evaluation(100.0, 105.0, None)).await.unwrap();
        let received = rx.recv().await.unwrap();
        assert_eq!(received, delivered);

        // No PR, nothing sent
        let nothing = Evaluation { notification: None, persist_error: None };
        assert!(emit(&sink, &nothing).await.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers() {
        let sink = BroadcastSink::new(1);
        assert!(emit(&sink, &evaluation(100.0, 105.0, None)).await.is_some());
        assert!(emit(&LogSink, &evaluation(100.0, 105.0, None)).await.is_some());
    }
}
