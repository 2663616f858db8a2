//! Operator notification seam
//!
//! The controller decides what the operator must hear; delivery (email,
//! SMS, dashboard) belongs to whatever sits behind [`OperatorNotifier`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uavguard_core::AlertSeverity;

use crate::error::NotifyError;

/// Alert raised for the operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorAlert {
    /// Vehicle the alert concerns
    pub vehicle_id: String,
    /// Severity
    pub severity: AlertSeverity,
    /// Operator-facing text
    pub message: String,
    /// Raise time in milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

impl OperatorAlert {
    /// Alert stamped now
    pub fn new(
        vehicle_id: impl Into<String>,
        severity: AlertSeverity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            severity,
            message: message.into(),
            timestamp_ms: uavguard_core::current_timestamp_ms(),
        }
    }
}

/// Delivers operator alerts
#[async_trait]
pub trait OperatorNotifier: Send + Sync {
    /// Deliver one alert; `Err` means the operator did not get it
    async fn notify_operator(&self, alert: OperatorAlert) -> Result<(), NotifyError>;
}

/// Notifier that only writes the alert to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl OperatorNotifier for TracingNotifier {
    async fn notify_operator(&self, alert: OperatorAlert) -> Result<(), NotifyError> {
        match alert.severity {
            AlertSeverity::Low => info!(
                vehicle_id = %alert.vehicle_id,
                severity = alert.severity.as_str(),
                "{}",
                alert.message
            ),
            AlertSeverity::High => warn!(
                vehicle_id = %alert.vehicle_id,
                severity = alert.severity.as_str(),
                "{}",
                alert.message
            ),
            AlertSeverity::Critical => error!(
                vehicle_id = %alert.vehicle_id,
                severity = alert.severity.as_str(),
                "{}",
                alert.message
            ),
        }
        Ok(())
    }
}

/// Notifier that hands alerts to an external delivery task.
///
/// Uses a bounded queue and never waits: a full queue or a dropped
/// receiver is reported as a failed notification.
#[derive(Debug, Clone)]
pub struct QueueNotifier {
    tx: mpsc::Sender<OperatorAlert>,
}

impl QueueNotifier {
    /// Create a notifier and the receiver its delivery task drains
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<OperatorAlert>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx }, rx)
    }
}

#[async_trait]
impl OperatorNotifier for QueueNotifier {
    async fn notify_operator(&self, alert: OperatorAlert) -> Result<(), NotifyError> {
        self.tx.try_send(alert).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                NotifyError::Delivery("notification queue full".to_string())
            }
            mpsc::error::TrySendError::Closed(_) => NotifyError::QueueClosed,
        })
    }
}
