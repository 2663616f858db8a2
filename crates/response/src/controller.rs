//! Autonomous response controller
//!
//! Executes the countermeasure policy of a threat level against one
//! vehicle's flight command channel and records the outcome.
//!
//! # Policy
//!
//! | Level | Steps, in order |
//! |---|---|
//! | 0 | routine logging |
//! | 1 | raise monitoring, log detailed telemetry, alert operator (low), cap speed at 70% |
//! | 2 | IMU + barometer navigation, RTL, raise logging verbosity, alert operator (high) |
//! | 3 | RTL, or ALT_HOLD when GNSS is spoofed; emergency comms; isolate implicated sensors; alert operator (critical) |
//! | 4 | LAND, IMU + barometer navigation only, cut external links, forensic log, alert operator (critical) |
//!
//! At level 3 the navigation decision depends on the attack labels: while
//! GNSS is spoofed, RTL would fly toward an attacker-chosen position, so
//! the vehicle holds on inertial data instead.
//!
//! # Concurrency
//!
//! One controller serves one vehicle. Responses for the same vehicle are
//! serialized by an async mutex, and each runs on its own task: once
//! started it completes its whole step list even if the caller stops
//! waiting. If the task panics, the record keeps the steps completed so far
//! and ends with `response_aborted`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uavguard_core::{
    current_timestamp_ms, AlertSeverity, AttackContext, ResponseConfig, ThreatLevel,
};
use uavguard_flight::{
    CommsProfile, DroneState, FlightCommand, FlightCommandChannel, FlightError, FlightMode,
    NavigationSource,
};

use crate::action::{ActionFailure, ResponseAction};
use crate::incident::{ChainFault, IncidentDraft, IncidentEntry, IncidentLog};
use crate::notify::{OperatorAlert, OperatorNotifier, TracingNotifier};
use crate::record::{summarize, ResponseRecord};

/// Speed ceiling applied at level 1 (a 30% reduction)
pub const REDUCED_SPEED_CEILING_PCT: u8 = 70;

/// Default number of retained incident entries
pub const DEFAULT_INCIDENT_CAPACITY: usize = 1024;

/// Controller-side telemetry setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryProfile {
    /// Routine cadence and verbosity
    #[default]
    Routine,
    /// Raised monitoring cadence
    Elevated,
    /// Raised logging verbosity
    Verbose,
    /// Full forensic capture
    Forensic,
}

struct Slot<C> {
    channel: C,
    incidents: IncidentLog,
    telemetry: TelemetryProfile,
    /// Progress of the running response; survives a panic in the task
    run: Execution,
}

struct Inner<C, N> {
    vehicle_id: String,
    notifier: N,
    slot: Mutex<Slot<C>>,
}

/// Steps taken so far in one response
#[derive(Default)]
struct Execution {
    actions: Vec<ResponseAction>,
    failures: Vec<ActionFailure>,
    operator_notified: bool,
}

impl Execution {
    fn done(&mut self, action: ResponseAction) {
        self.actions.push(action);
    }

    fn failed(&mut self, action: ResponseAction, reason: String) {
        self.actions.push(action);
        self.failures.push(ActionFailure { action, reason });
    }
}

/// Response controller for one vehicle.
///
/// Cloning yields another handle to the same vehicle; all handles share one
/// response lock.
pub struct ResponseController<C, N = TracingNotifier> {
    inner: Arc<Inner<C, N>>,
}

impl<C, N> Clone for ResponseController<C, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> ResponseController<C, TracingNotifier>
where
    C: FlightCommandChannel + 'static,
{
    /// Controller that logs operator alerts instead of delivering them
    pub fn new(vehicle_id: impl Into<String>, channel: C) -> Self {
        Self::with_notifier(vehicle_id, channel, TracingNotifier)
    }
}

impl<C, N> ResponseController<C, N>
where
    C: FlightCommandChannel + 'static,
    N: OperatorNotifier + 'static,
{
    /// Controller with an explicit notifier
    pub fn with_notifier(vehicle_id: impl Into<String>, channel: C, notifier: N) -> Self {
        Self::build(vehicle_id.into(), channel, notifier, DEFAULT_INCIDENT_CAPACITY)
    }

    /// Controller tuned from the response section
    pub fn from_config(
        vehicle_id: impl Into<String>,
        channel: C,
        notifier: N,
        config: &ResponseConfig,
    ) -> Self {
        Self::build(vehicle_id.into(), channel, notifier, config.incident_log_capacity)
    }

    fn build(vehicle_id: String, channel: C, notifier: N, incident_capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                vehicle_id,
                notifier,
                slot: Mutex::new(Slot {
                    channel,
                    incidents: IncidentLog::new(incident_capacity),
                    telemetry: TelemetryProfile::default(),
                    run: Execution::default(),
                }),
            }),
        }
    }

    /// Vehicle this controller serves
    pub fn vehicle_id(&self) -> &str {
        &self.inner.vehicle_id
    }

    /// Execute the policy for `threat_level` and return the audit record.
    ///
    /// Never fails: rejected commands and undelivered notifications appear
    /// as failure markers in the action list and clear `success`. An
    /// incident entry is appended for every call.
    pub async fn respond(
        &self,
        threat_level: ThreatLevel,
        attack_context: AttackContext,
    ) -> ResponseRecord {
        let inner = Arc::clone(&self.inner);
        let context = attack_context.clone();
        let task = tokio::spawn(async move { inner.execute(threat_level, context).await });

        match task.await {
            Ok(record) => record,
            Err(e) => {
                error!(
                    vehicle_id = %self.inner.vehicle_id,
                    threat_level = threat_level.value(),
                    error = %e,
                    "Response task aborted"
                );
                self.inner
                    .record_aborted(threat_level, attack_context, e.to_string())
                    .await
            }
        }
    }

    /// Respond to a raw level; anything at or above 4 is treated as 4
    pub async fn respond_raw(
        &self,
        threat_level: i64,
        attack_context: AttackContext,
    ) -> ResponseRecord {
        self.respond(ThreatLevel::from_raw(threat_level), attack_context)
            .await
    }

    /// Snapshot of the vehicle state
    pub async fn drone_state(&self) -> DroneState {
        self.inner.slot.lock().await.channel.read_state()
    }

    /// Current telemetry setting
    pub async fn telemetry_profile(&self) -> TelemetryProfile {
        self.inner.slot.lock().await.telemetry
    }

    /// Retained incident entries, oldest first
    pub async fn incidents(&self) -> Vec<IncidentEntry> {
        self.inner.slot.lock().await.incidents.entries().cloned().collect()
    }

    /// Verify the incident hash chain
    pub async fn verify_incidents(&self) -> Result<(), ChainFault> {
        self.inner.slot.lock().await.incidents.verify_chain()
    }

    /// Inspect the channel while no response is running
    pub async fn with_channel<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        let slot = self.inner.slot.lock().await;
        f(&slot.channel)
    }
}

impl<C, N> Inner<C, N>
where
    C: FlightCommandChannel,
    N: OperatorNotifier,
{
    async fn execute(&self, level: ThreatLevel, context: AttackContext) -> ResponseRecord {
        let mut slot = self.slot.lock().await;
        slot.run = Execution::default();

        warn!(
            vehicle_id = %self.vehicle_id,
            threat_level = level.value(),
            attack_types = %context.labels_display(),
            "Executing threat response"
        );

        match level {
            ThreatLevel::Normal => self.normal(&mut slot),
            ThreatLevel::Suspicious => self.suspicious(&mut slot, &context).await,
            ThreatLevel::ConfirmedLow => self.confirmed_low(&mut slot, &context).await,
            ThreatLevel::ConfirmedHigh => self.confirmed_high(&mut slot, &context).await,
            ThreatLevel::Critical => self.critical(&mut slot, &context).await,
        }

        let run = std::mem::take(&mut slot.run);
        let success = run.failures.is_empty();
        let timestamp_ms = current_timestamp_ms();
        let drone_state = slot.channel.read_state();
        let sequence = slot
            .incidents
            .append(IncidentDraft {
                vehicle_id: self.vehicle_id.clone(),
                threat_level: level,
                actions: run.actions.clone(),
                attack_context: context,
                drone_state,
                success,
                timestamp_ms,
            })
            .sequence;

        if success {
            info!(
                vehicle_id = %self.vehicle_id,
                threat_level = level.value(),
                "Threat response complete"
            );
        } else {
            error!(
                vehicle_id = %self.vehicle_id,
                threat_level = level.value(),
                failed = run.failures.len(),
                "Threat response degraded, manual intervention may be required"
            );
        }

        ResponseRecord {
            vehicle_id: self.vehicle_id.clone(),
            threat_level: level,
            summary: summarize(level, run.failures.len()),
            actions_taken: run.actions,
            success,
            operator_notified: run.operator_notified,
            timestamp_ms,
            failures: run.failures,
            incident_sequence: Some(sequence),
        }
    }

    /// Record a response whose task died, keeping the steps it completed
    async fn record_aborted(
        &self,
        level: ThreatLevel,
        context: AttackContext,
        reason: String,
    ) -> ResponseRecord {
        let mut slot = self.slot.lock().await;
        let mut run = std::mem::take(&mut slot.run);
        run.failed(ResponseAction::ResponseAborted, reason.clone());

        let timestamp_ms = current_timestamp_ms();
        let drone_state = slot.channel.read_state();
        let sequence = slot
            .incidents
            .append(IncidentDraft {
                vehicle_id: self.vehicle_id.clone(),
                threat_level: level,
                actions: run.actions.clone(),
                attack_context: context,
                drone_state,
                success: false,
                timestamp_ms,
            })
            .sequence;

        ResponseRecord {
            vehicle_id: self.vehicle_id.clone(),
            threat_level: level,
            actions_taken: run.actions,
            summary: format!("Response aborted: {}", reason),
            success: false,
            operator_notified: run.operator_notified,
            timestamp_ms,
            failures: run.failures,
            incident_sequence: Some(sequence),
        }
    }

    fn normal(&self, slot: &mut Slot<C>) {
        slot.telemetry = TelemetryProfile::Routine;
        debug!(vehicle_id = %self.vehicle_id, "Routine telemetry logged");
        slot.run.done(ResponseAction::NormalLogging);
    }

    async fn suspicious(&self, slot: &mut Slot<C>, context: &AttackContext) {
        slot.telemetry = TelemetryProfile::Elevated;
        slot.run.done(ResponseAction::IncreasedMonitoring);

        info!(
            vehicle_id = %self.vehicle_id,
            state = ?slot.channel.read_state(),
            "Detailed telemetry snapshot"
        );
        slot.run.done(ResponseAction::DetailedTelemetryLogged);

        self.notify(
            slot,
            AlertSeverity::Low,
            format!("Suspicious activity detected: {}", context.labels_display()),
            ResponseAction::OperatorAlerted,
        )
        .await;

        self.command(
            slot,
            FlightCommand::LimitSpeed {
                ceiling_pct: REDUCED_SPEED_CEILING_PCT,
            },
            ResponseAction::SpeedReduced30Pct,
            ResponseAction::SpeedLimitRejected,
        )
        .await;
    }

    async fn confirmed_low(&self, slot: &mut Slot<C>, context: &AttackContext) {
        self.command(
            slot,
            FlightCommand::SetNavigationSource {
                source: NavigationSource::InertialBarometric,
            },
            ResponseAction::BackupNavigationActivated,
            ResponseAction::NavigationSourceRejected,
        )
        .await;

        self.command(
            slot,
            FlightCommand::set_mode(FlightMode::Rtl),
            ResponseAction::ReturnToHomeInitiated,
            ResponseAction::FlightModeChangeRejected,
        )
        .await;

        slot.telemetry = TelemetryProfile::Verbose;
        slot.run.done(ResponseAction::LoggingVerbosityIncreased);

        self.notify(
            slot,
            AlertSeverity::High,
            format!("Confirmed attack detected: {}", context.labels_display()),
            ResponseAction::EmergencyAlertSent,
        )
        .await;
    }

    async fn confirmed_high(&self, slot: &mut Slot<C>, context: &AttackContext) {
        if context.is_gnss_spoofing() {
            warn!(vehicle_id = %self.vehicle_id, "GNSS untrusted, holding on inertial navigation");
            self.command(
                slot,
                FlightCommand::set_mode(FlightMode::AltHold),
                ResponseAction::ImuHoverActivated,
                ResponseAction::FlightModeChangeRejected,
            )
            .await;
        } else {
            self.command(
                slot,
                FlightCommand::set_mode(FlightMode::Rtl),
                ResponseAction::EmergencyRthInitiated,
                ResponseAction::FlightModeChangeRejected,
            )
            .await;
        }

        self.command(
            slot,
            FlightCommand::SetCommsProfile {
                profile: CommsProfile::Emergency,
            },
            ResponseAction::EmergencyCommsActivated,
            ResponseAction::CommsProfileRejected,
        )
        .await;

        let mut all_isolated = true;
        for sensor in context.implicated_sensors() {
            if let Err(e) = self.dispatch(slot, FlightCommand::IsolateSensor { sensor }).await {
                slot.run.failed(ResponseAction::SensorIsolationRejected, e.to_string());
                all_isolated = false;
            }
        }
        if all_isolated {
            slot.run.done(ResponseAction::VulnerableSensorsDisabled);
        }

        self.notify(
            slot,
            AlertSeverity::Critical,
            format!("High-severity attack: {}", context.labels_display()),
            ResponseAction::CriticalAlertSent,
        )
        .await;
    }

    async fn critical(&self, slot: &mut Slot<C>, context: &AttackContext) {
        self.command(
            slot,
            FlightCommand::set_mode(FlightMode::Land),
            ResponseAction::EmergencyLandingInitiated,
            ResponseAction::FlightModeChangeRejected,
        )
        .await;

        self.command(
            slot,
            FlightCommand::SetNavigationSource {
                source: NavigationSource::InertialBarometric,
            },
            ResponseAction::ImuBarometerOnly,
            ResponseAction::NavigationSourceRejected,
        )
        .await;

        self.command(
            slot,
            FlightCommand::SetExternalLinks { enabled: false },
            ResponseAction::ExternalLinksDisabled,
            ResponseAction::ExternalLinkCutRejected,
        )
        .await;

        slot.telemetry = TelemetryProfile::Forensic;
        error!(
            vehicle_id = %self.vehicle_id,
            attack_context = %serde_json::to_string(context).unwrap_or_default(),
            state = ?slot.channel.read_state(),
            actions = ?slot.run.actions,
            "Forensic capture"
        );
        slot.run.done(ResponseAction::ForensicDataLogged);

        self.notify(
            slot,
            AlertSeverity::Critical,
            format!("CRITICAL multi-vector attack: {}", context.labels_display()),
            ResponseAction::CriticalAlertSent,
        )
        .await;
    }

    /// Send one command, recording `ok` or `rejected`
    async fn command(
        &self,
        slot: &mut Slot<C>,
        command: FlightCommand,
        ok: ResponseAction,
        rejected: ResponseAction,
    ) {
        match self.dispatch(slot, command).await {
            Ok(()) => slot.run.done(ok),
            Err(e) => slot.run.failed(rejected, e.to_string()),
        }
    }

    async fn dispatch(
        &self,
        slot: &mut Slot<C>,
        command: FlightCommand,
    ) -> Result<(), FlightError> {
        let kind = command.kind();
        slot.channel.send(command).await.map(|_| ()).map_err(|e| {
            warn!(
                vehicle_id = %self.vehicle_id,
                command = kind,
                error = %e,
                "Countermeasure command failed"
            );
            e
        })
    }

    async fn notify(
        &self,
        slot: &mut Slot<C>,
        severity: AlertSeverity,
        message: String,
        ok: ResponseAction,
    ) {
        let alert = OperatorAlert::new(self.vehicle_id.clone(), severity, message);
        match self.notifier.notify_operator(alert).await {
            Ok(()) => {
                slot.run.operator_notified = true;
                slot.run.done(ok);
            }
            Err(e) => {
                warn!(vehicle_id = %self.vehicle_id, error = %e, "Operator notification failed");
                slot.run
                    .failed(ResponseAction::OperatorNotificationFailed, e.to_string());
            }
        }
    }
}
