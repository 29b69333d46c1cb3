//! Session runner — one pass of the game from response log to delivered
//! consequences.
//!
//! Stores and the notifier are injected per run. Everything that can fail
//! for the session as a whole (store reads, the quota check, rendering)
//! happens in [`SessionRunner::plan`] before the first message is sent.
//! Delivery failures are per recipient: they are logged, recorded in the
//! report, and the batch moves on.

use std::sync::Arc;

use consequences_config::GameConfig;
use consequences_core::{
    Assignment, Notifier, Participant, ResponseRow, ResponseStore, Result, RosterStore,
};
use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::assign::cross_assign;
use crate::padding::DeficitPadder;
use crate::quota::{Quota, QuotaReconciler};
use crate::render::ConsequenceRenderer;
use crate::window::{ResponseWindowExtractor, SessionWindow};

/// One participant's consequence, rendered and ready to send.
#[derive(Debug, Clone, Serialize)]
pub struct Delivery {
    pub participant: Participant,
    pub assignment: Assignment,
    pub body: String,

    /// Whether the assignment is filler rather than cross-wired answers
    pub filler: bool,
}

/// Everything computed for a session before any message is sent.
#[derive(Debug, Clone, Serialize)]
pub struct SessionPlan {
    pub run_id: Uuid,
    pub session_key: String,
    pub window: SessionWindow,
    pub quota: Quota,
    pub categories: usize,
    pub padded: usize,
    pub deliveries: Vec<Delivery>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDelivery {
    pub name: String,
    pub address: String,
    pub reason: String,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub run_id: Uuid,
    pub session_key: String,
    pub window_size: usize,
    pub consumed: usize,
    pub clamped: bool,
    pub padded: usize,
    pub delivered: Vec<String>,
    pub failed: Vec<FailedDelivery>,
}

impl SessionReport {
    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs the game pipeline against injected collaborators.
pub struct SessionRunner {
    responses: Arc<dyn ResponseStore>,
    roster: Arc<dyn RosterStore>,
    notifier: Arc<dyn Notifier>,
    extractor: ResponseWindowExtractor,
    reconciler: QuotaReconciler,
    padder: DeficitPadder,
    renderer: ConsequenceRenderer,
    subject: String,
}

impl SessionRunner {
    pub fn new(
        config: &GameConfig,
        responses: Arc<dyn ResponseStore>,
        roster: Arc<dyn RosterStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            responses,
            roster,
            notifier,
            extractor: ResponseWindowExtractor::from_config(&config.window),
            reconciler: QuotaReconciler::from_config(&config.window),
            padder: DeficitPadder::from_config(&config.render),
            renderer: ConsequenceRenderer::from_config(&config.render),
            subject: config.render.subject.clone(),
        }
    }

    /// Compute every participant's consequence without sending anything.
    pub async fn plan(&self) -> Result<SessionPlan> {
        let run_id = Uuid::new_v4();
        self.plan_with_id(run_id)
            .instrument(info_span!("session", run_id = %run_id))
            .await
    }

    async fn plan_with_id(&self, run_id: Uuid) -> Result<SessionPlan> {
        let session_key = self.roster.session_key().await?;
        let participants = self.roster.participants(&session_key).await?;
        info!(
            session = %session_key,
            participants = participants.len(),
            roster = self.roster.name(),
            "Loaded roster"
        );

        // One read of the log: the window and the consumed rows come from the
        // same snapshot.
        let rows = self.responses.rows().await?;
        let timestamps: Vec<&str> = rows.iter().map(ResponseRow::timestamp).collect();
        let window = self.extractor.extract(&timestamps);
        info!(
            window = window.size,
            latest = ?window.latest,
            stop = ?window.stop,
            "Detected session window"
        );

        let quota = self.reconciler.reconcile(window.size, participants.len())?;

        let consumed_rows = most_recent(&rows, quota.consumed);
        let categories = category_count(&rows, consumed_rows);

        let mut assignments = cross_assign(consumed_rows, categories);
        let generated = assignments.len();
        let padded = self.padder.pad(&mut assignments, participants.len());
        if padded > 0 {
            warn!(padded, "Not enough responses; padding with filler consequences");
        }

        // Render everything up front so a layout error aborts before delivery.
        let deliveries = participants
            .into_iter()
            .zip(assignments)
            .enumerate()
            .map(|(index, (participant, assignment))| -> Result<Delivery> {
                let body = self.renderer.render(&assignment)?;
                Ok(Delivery {
                    participant,
                    assignment,
                    body,
                    filler: index >= generated,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            consumed = quota.consumed,
            categories,
            deliveries = deliveries.len(),
            "Planned consequences"
        );

        Ok(SessionPlan {
            run_id,
            session_key,
            window,
            quota,
            categories,
            padded,
            deliveries,
        })
    }

    /// Send every planned consequence, one at a time.
    pub async fn deliver(&self, plan: SessionPlan) -> SessionReport {
        let span = info_span!("deliver", run_id = %plan.run_id);
        async {
            let mut delivered = Vec::new();
            let mut failed = Vec::new();

            for delivery in plan.deliveries {
                let Participant { name, address } = delivery.participant;
                match self
                    .notifier
                    .send(&address, &self.subject, &delivery.body)
                    .await
                {
                    Ok(()) => {
                        info!(participant = %name, notifier = self.notifier.name(), "Consequence delivered");
                        delivered.push(name);
                    }
                    Err(e) => {
                        warn!(participant = %name, error = %e, "Consequence delivery failed");
                        failed.push(FailedDelivery {
                            name,
                            address,
                            reason: e.to_string(),
                        });
                    }
                }
            }

            info!(
                delivered = delivered.len(),
                failed = failed.len(),
                "Session complete"
            );

            SessionReport {
                run_id: plan.run_id,
                session_key: plan.session_key,
                window_size: plan.window.size,
                consumed: plan.quota.consumed,
                clamped: plan.quota.clamped,
                padded: plan.padded,
                delivered,
                failed,
            }
        }
        .instrument(span)
        .await
    }

    /// Plan and deliver.
    pub async fn run(&self) -> Result<SessionReport> {
        let plan = self.plan().await?;
        Ok(self.deliver(plan).await)
    }
}

/// The last `count` rows, in log order.
fn most_recent(rows: &[ResponseRow], count: usize) -> &[ResponseRow] {
    &rows[rows.len().saturating_sub(count)..]
}

/// Answers per assignment: the widest consumed row, never narrower than the
/// header. Rows outside the window do not count.
fn category_count(rows: &[ResponseRow], consumed: &[ResponseRow]) -> usize {
    let header = rows.first().map_or(0, ResponseRow::category_count);
    consumed
        .iter()
        .map(ResponseRow::category_count)
        .fold(header, usize::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use consequences_core::{DeliveryError, Error, GameError, StoreError};
    use std::sync::Mutex;

    struct FixedLog(Vec<ResponseRow>);

    #[async_trait]
    impl ResponseStore for FixedLog {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn column(&self, index: usize) -> std::result::Result<Vec<String>, StoreError> {
            Ok(self
                .0
                .iter()
                .map(|row| row.cell(index).unwrap_or("").to_string())
                .collect())
        }

        async fn rows(&self) -> std::result::Result<Vec<ResponseRow>, StoreError> {
            Ok(self.0.clone())
        }
    }

    struct FixedRoster(Vec<Participant>);

    #[async_trait]
    impl RosterStore for FixedRoster {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn session_key(&self) -> std::result::Result<String, StoreError> {
            Ok("2026-10-17".into())
        }

        async fn participants(
            &self,
            _session_key: &str,
        ) -> std::result::Result<Vec<Participant>, StoreError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct Outbox {
        sent: Mutex<Vec<(String, String)>>,
        reject: Option<String>,
    }

    #[async_trait]
    impl Notifier for Outbox {
        fn name(&self) -> &str {
            "outbox"
        }

        async fn send(
            &self,
            address: &str,
            _subject: &str,
            body: &str,
        ) -> std::result::Result<(), DeliveryError> {
            if self.reject.as_deref() == Some(address) {
                return Err(DeliveryError::Failed {
                    recipient: address.into(),
                    reason: "bounced".into(),
                });
            }
            self.sent
                .lock()
                .unwrap()
                .push((address.to_string(), body.to_string()));
            Ok(())
        }
    }

    fn log(times: &[&str]) -> Vec<ResponseRow> {
        let header: ResponseRow = [
            "Timestamp",
            "Subject",
            "Object",
            "Location",
            "Subject said",
            "Object said",
            "Consequence",
        ]
        .into_iter()
        .collect();
        std::iter::once(header)
            .chain(times.iter().enumerate().map(|(i, t)| {
                std::iter::once(t.to_string())
                    .chain((0..6).map(|c| format!("r{i}c{c}")))
                    .collect()
            }))
            .collect()
    }

    fn players(n: usize) -> Vec<Participant> {
        (0..n)
            .map(|i| Participant::new(format!("p{i}"), format!("p{i}@example.com")))
            .collect()
    }

    fn runner(rows: Vec<ResponseRow>, roster: Vec<Participant>, outbox: Arc<Outbox>) -> SessionRunner {
        SessionRunner::new(
            &GameConfig::default(),
            Arc::new(FixedLog(rows)),
            Arc::new(FixedRoster(roster)),
            outbox,
        )
    }

    #[tokio::test]
    async fn delivers_one_consequence_per_participant() {
        let outbox = Arc::new(Outbox::default());
        let rows = log(&["2026-10-17 19:00:00", "2026-10-17 19:01:00", "2026-10-17 19:02:00"]);
        let report = runner(rows, players(3), outbox.clone()).run().await.unwrap();

        assert_eq!(report.window_size, 3);
        assert_eq!(report.consumed, 3);
        assert_eq!(report.padded, 0);
        assert_eq!(report.delivered, vec!["p0", "p1", "p2"]);
        assert!(report.all_delivered());

        let sent = outbox.sent.lock().unwrap();
        assert_eq!(sent.len(), 3);
        assert!(sent[0].1.starts_with("'r0c0' met 'r2c1'"));
    }

    #[tokio::test]
    async fn insufficient_responses_sends_nothing() {
        let outbox = Arc::new(Outbox::default());
        let rows = log(&["2026-10-17 19:00:00"]);
        let err = runner(rows, players(5), outbox.clone()).run().await.unwrap_err();

        assert!(matches!(
            err,
            Error::Game(GameError::InsufficientResponses { usable: 1, participants: 5, .. })
        ));
        assert!(outbox.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn shortfall_within_tolerance_is_padded() {
        let outbox = Arc::new(Outbox::default());
        let rows = log(&["2026-10-17 19:00:00", "2026-10-17 19:01:00"]);
        let plan = runner(rows, players(4), outbox).plan().await.unwrap();

        assert_eq!(plan.quota.consumed, 2);
        assert_eq!(plan.padded, 2);
        assert_eq!(plan.deliveries.len(), 4);
        assert!(!plan.deliveries[1].filler);
        assert!(plan.deliveries[2].filler);
        assert!(plan.deliveries[3].body.contains("The Invisible Man"));
    }

    #[tokio::test]
    async fn surplus_keeps_most_recent_rows() {
        let outbox = Arc::new(Outbox::default());
        let rows = log(&[
            "2026-10-17 19:00:00",
            "2026-10-17 19:01:00",
            "2026-10-17 19:02:00",
        ]);
        let plan = runner(rows, players(2), outbox).plan().await.unwrap();

        assert!(plan.quota.clamped);
        assert_eq!(plan.quota.consumed, 2);
        // Rows r1 and r2 are used; the oldest row r0 is dropped.
        assert_eq!(plan.deliveries[0].assignment.get(0), Some("r1c0"));
        assert_eq!(plan.deliveries[1].assignment.get(0), Some("r2c0"));
    }

    #[tokio::test]
    async fn empty_roster_delivers_nothing() {
        let outbox = Arc::new(Outbox::default());
        let rows = log(&["2026-10-17 19:00:00", "2026-10-17 19:01:00"]);
        let report = runner(rows, vec![], outbox.clone()).run().await.unwrap();

        assert_eq!(report.consumed, 0);
        assert_eq!(report.padded, 0);
        assert!(report.delivered.is_empty());
        assert!(outbox.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_delivery_does_not_stop_the_batch() {
        let outbox = Arc::new(Outbox {
            reject: Some("p1@example.com".into()),
            ..Outbox::default()
        });
        let rows = log(&["2026-10-17 19:00:00", "2026-10-17 19:01:00", "2026-10-17 19:02:00"]);
        let report = runner(rows, players(3), outbox.clone()).run().await.unwrap();

        assert_eq!(report.delivered, vec!["p0", "p2"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "p1");
        assert!(report.failed[0].reason.contains("bounced"));
        assert_eq!(outbox.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn wrong_layout_aborts_before_delivery() {
        let outbox = Arc::new(Outbox::default());
        let rows: Vec<ResponseRow> = vec![
            ["Timestamp", "Subject", "Object"].into_iter().collect(),
            ["2026-10-17 19:00:00", "a", "b"].into_iter().collect(),
            ["2026-10-17 19:01:00", "c", "d"].into_iter().collect(),
        ];
        let err = runner(rows, players(2), outbox.clone()).run().await.unwrap_err();

        assert!(matches!(
            err,
            Error::Game(GameError::CategoryLayoutMismatch { expected: 6, found: 2 })
        ));
        assert!(outbox.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn wider_stale_row_outside_window_is_ignored() {
        let outbox = Arc::new(Outbox::default());
        let mut rows = log(&["2026-10-17 19:00:00", "2026-10-17 19:01:00"]);
        let stale: ResponseRow = std::iter::once("2026-10-01 19:00:00".to_string())
            .chain((0..7).map(|c| format!("old{c}")))
            .collect();
        rows.insert(1, stale);

        let plan = runner(rows, players(2), outbox).plan().await.unwrap();

        assert_eq!(plan.window.size, 2);
        assert_eq!(plan.categories, 6);
        assert_eq!(plan.deliveries.len(), 2);
        assert!(plan.deliveries.iter().all(|d| d.assignment.len() == 6));
        assert!(plan.deliveries.iter().all(|d| !d.body.contains("old")));
    }

    #[tokio::test]
    async fn window_and_rows_come_from_one_read() {
        struct GrowingLog {
            reads: Mutex<usize>,
            rows: Vec<ResponseRow>,
        }

        #[async_trait]
        impl ResponseStore for GrowingLog {
            fn name(&self) -> &str {
                "growing"
            }

            async fn column(&self, index: usize) -> std::result::Result<Vec<String>, StoreError> {
                let rows = self.rows().await?;
                Ok(rows
                    .iter()
                    .map(|row| row.cell(index).unwrap_or("").to_string())
                    .collect())
            }

            // Every read sees one more late submission than the last.
            async fn rows(&self) -> std::result::Result<Vec<ResponseRow>, StoreError> {
                let mut reads = self.reads.lock().unwrap();
                let mut rows = self.rows.clone();
                for late in 0..*reads {
                    rows.push(
                        std::iter::once(format!("2026-10-17 19:0{}:00", 5 + late))
                            .chain((0..6).map(|c| format!("late{late}c{c}")))
                            .collect(),
                    );
                }
                *reads += 1;
                Ok(rows)
            }
        }

        let store = Arc::new(GrowingLog {
            reads: Mutex::new(0),
            rows: log(&["2026-10-17 19:00:00", "2026-10-17 19:01:00"]),
        });
        let runner = SessionRunner::new(
            &GameConfig::default(),
            store.clone(),
            Arc::new(FixedRoster(players(3))),
            Arc::new(Outbox::default()),
        );
        let plan = runner.plan().await.unwrap();

        assert_eq!(*store.reads.lock().unwrap(), 1);
        assert_eq!(plan.window.size, 2);
        assert_eq!(plan.quota.consumed, 2);
        assert!(plan.deliveries.iter().all(|d| !d.body.contains("late")));
    }

    #[test]
    fn category_count_uses_header_and_consumed_rows_only() {
        let mut rows = log(&["2026-10-17 19:00:00"]);
        let wide: ResponseRow = std::iter::once("2026-10-01 19:00:00".to_string())
            .chain((0..9).map(|c| format!("w{c}")))
            .collect();
        rows.insert(1, wide);

        assert_eq!(category_count(&rows, most_recent(&rows, 1)), 6);
        assert_eq!(category_count(&rows, most_recent(&rows, 2)), 9);
        assert_eq!(category_count(&[], &[]), 0);
    }

    #[test]
    fn most_recent_takes_the_tail() {
        let rows = log(&["t0", "t1", "t2"]);
        let tail = most_recent(&rows, 2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].timestamp(), "t1");
        assert_eq!(most_recent(&rows, 10).len(), rows.len());
        assert!(most_recent(&rows, 0).is_empty());
    }
}
