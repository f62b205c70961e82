//! Dashboard composition: wires the controller, tracker, selection store and
//! scrape builder around one gateway, and hosts the per-item AI operations.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::NaiveDate;
use vca_core::{AnalysisResult, AppConfig, ContentBrief};
use vca_gateway::{ContentGateway, GatewayError};

use crate::controller::QueryController;
use crate::notice::{Notice, NoticeReceiver, Notifier};
use crate::scrape::ScrapeBuilder;
use crate::selection::{ExportDocument, SelectionStore};
use crate::storage::KeyValueStore;
use crate::tracker::{OperationKind, OperationTracker};

/// Tunables for the orchestration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSettings {
    /// Wait between a successful scrape and the follow-up reload.
    pub refresh_delay: Duration,
    /// Deadline for analysis/brief requests. `None` waits indefinitely.
    pub operation_timeout: Option<Duration>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_delay: Duration::from_secs(1),
            operation_timeout: None,
        }
    }
}

impl DashboardSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            refresh_delay: config.refresh_delay(),
            operation_timeout: config.operation_timeout(),
        }
    }
}

/// How a per-item AI operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    Completed,
    Failed,
    TimedOut,
}

enum Failure {
    Gateway(GatewayError),
    TimedOut(Duration),
}

#[derive(Default)]
struct CurrentResults {
    analysis: Option<(String, AnalysisResult)>,
    brief: Option<(String, ContentBrief)>,
}

pub struct Dashboard {
    gateway: Arc<dyn ContentGateway>,
    controller: Arc<QueryController>,
    tracker: OperationTracker,
    selection: SelectionStore,
    scraper: ScrapeBuilder,
    notifier: Notifier,
    operation_timeout: Option<Duration>,
    current: Mutex<CurrentResults>,
}

impl Dashboard {
    /// Assembles a dashboard without touching storage or the network.
    pub fn new(
        gateway: Arc<dyn ContentGateway>,
        storage: Arc<dyn KeyValueStore>,
        settings: DashboardSettings,
    ) -> (Self, NoticeReceiver) {
        let (notifier, notices) = Notifier::channel();
        let controller = Arc::new(QueryController::new(Arc::clone(&gateway), notifier.clone()));
        let scraper = ScrapeBuilder::new(
            Arc::clone(&gateway),
            Arc::clone(&controller),
            notifier.clone(),
            settings.refresh_delay,
        );

        let dashboard = Self {
            gateway,
            controller,
            tracker: OperationTracker::new(),
            selection: SelectionStore::new(storage),
            scraper,
            notifier,
            operation_timeout: settings.operation_timeout,
            current: Mutex::new(CurrentResults::default()),
        };
        (dashboard, notices)
    }

    /// Assembles a dashboard, restores the saved selection, then performs
    /// the initial content load and stats refresh. The selection is restored
    /// first so nothing reads it before it is populated.
    pub async fn start(
        gateway: Arc<dyn ContentGateway>,
        storage: Arc<dyn KeyValueStore>,
        settings: DashboardSettings,
    ) -> (Self, NoticeReceiver) {
        let (dashboard, notices) = Self::new(gateway, storage, settings);
        let restored = dashboard.restore_selection();
        tracing::info!(saved = restored, "dashboard starting");
        dashboard.controller.reload().await;
        (dashboard, notices)
    }

    /// Restores the saved selection from storage without loading content.
    /// Returns the number of restored ids.
    pub fn restore_selection(&self) -> usize {
        self.selection.load()
    }

    #[must_use]
    pub fn controller(&self) -> &QueryController {
        &self.controller
    }

    #[must_use]
    pub fn tracker(&self) -> &OperationTracker {
        &self.tracker
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    #[must_use]
    pub fn scraper(&self) -> &ScrapeBuilder {
        &self.scraper
    }

    /// Requests a pattern analysis for `id`. On success the result becomes
    /// the current analysis and the session counter is bumped. `id` is busy
    /// for analysis until this request ends, whatever the outcome.
    pub async fn request_analysis(&self, id: &str) -> OperationOutcome {
        let kind = OperationKind::Analysis;
        let result = self.run_tracked(kind, id, self.gateway.analyze(id)).await;
        match result {
            Ok(analysis) => {
                self.lock_current().analysis = Some((id.to_owned(), analysis));
                self.controller.record_analysis();
                self.notifier
                    .notify(Notice::AnalysisReady { id: id.to_owned() });
                OperationOutcome::Completed
            }
            Err(failure) => self.report_failure(kind, id, failure),
        }
    }

    /// Requests a content brief for `id`; the brief counterpart of
    /// [`Dashboard::request_analysis`].
    pub async fn request_brief(&self, id: &str) -> OperationOutcome {
        let kind = OperationKind::Brief;
        let result = self
            .run_tracked(kind, id, self.gateway.generate_brief(id))
            .await;
        match result {
            Ok(brief) => {
                self.lock_current().brief = Some((id.to_owned(), brief));
                self.controller.record_brief();
                self.notifier
                    .notify(Notice::BriefReady { id: id.to_owned() });
                OperationOutcome::Completed
            }
            Err(failure) => self.report_failure(kind, id, failure),
        }
    }

    /// Most recent successful analysis and the id it belongs to.
    #[must_use]
    pub fn current_analysis(&self) -> Option<(String, AnalysisResult)> {
        self.lock_current().analysis.clone()
    }

    /// Most recent successful brief and the id it belongs to.
    #[must_use]
    pub fn current_brief(&self) -> Option<(String, ContentBrief)> {
        self.lock_current().brief.clone()
    }

    /// Flips the saved state of `id`; returns `true` when now saved.
    pub fn toggle_saved(&self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    /// Exports the saved items among the currently loaded list.
    #[must_use]
    pub fn export_saved(&self, date: NaiveDate) -> ExportDocument {
        self.selection
            .export_selection(&self.controller.items(), date)
    }

    /// Runs `call` with `id` marked busy for `kind`, applying the optional
    /// deadline. The busy mark is released when this returns.
    async fn run_tracked<T, F>(&self, kind: OperationKind, id: &str, call: F) -> Result<T, Failure>
    where
        F: Future<Output = Result<T, GatewayError>>,
    {
        let _in_flight = self.tracker.track(kind, id);
        tracing::debug!(%kind, id, "operation requested");
        match self.operation_timeout {
            Some(deadline) => match tokio::time::timeout(deadline, call).await {
                Ok(result) => result.map_err(Failure::Gateway),
                Err(_) => Err(Failure::TimedOut(deadline)),
            },
            None => call.await.map_err(Failure::Gateway),
        }
    }

    fn report_failure(&self, kind: OperationKind, id: &str, failure: Failure) -> OperationOutcome {
        match failure {
            Failure::Gateway(e) => {
                tracing::warn!(%kind, id, error = %e, "operation failed");
                self.notifier.notify(Notice::OperationFailed {
                    kind,
                    id: id.to_owned(),
                });
                OperationOutcome::Failed
            }
            Failure::TimedOut(deadline) => {
                tracing::warn!(%kind, id, timeout = ?deadline, "operation timed out");
                self.notifier.notify(Notice::OperationTimedOut {
                    kind,
                    id: id.to_owned(),
                });
                OperationOutcome::TimedOut
            }
        }
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, CurrentResults> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
