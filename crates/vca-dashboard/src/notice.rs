use tokio::sync::mpsc;

use crate::tracker::OperationKind;

/// User-visible outcome reported to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A list or search request failed; the list was cleared.
    ContentUnavailable { reason: String },
    ScrapeCompleted { content_count: u64 },
    /// `detail` is the server's message verbatim; `None` when the failure
    /// carried no message.
    ScrapeFailed { detail: Option<String> },
    AnalysisReady { id: String },
    BriefReady { id: String },
    OperationFailed { kind: OperationKind, id: String },
    OperationTimedOut { kind: OperationKind, id: String },
}

impl Notice {
    /// Text shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Notice::ContentUnavailable { .. } => {
                "No content found. Try adjusting your filters or refresh the content.".to_owned()
            }
            Notice::ScrapeCompleted { content_count } => {
                format!("Successfully scraped {content_count} contents!")
            }
            Notice::ScrapeFailed {
                detail: Some(detail),
            } => format!("Scraping failed: {detail}"),
            Notice::ScrapeFailed { detail: None } => {
                "Failed to trigger scrape. Please try again.".to_owned()
            }
            Notice::AnalysisReady { id } => format!("AI analysis ready for {id}"),
            Notice::BriefReady { id } => format!("Content brief ready for {id}"),
            Notice::OperationFailed { kind, .. } => {
                format!("Failed to generate {}. Please try again.", kind.label())
            }
            Notice::OperationTimedOut { kind, id } => format!(
                "Generating {} for {id} timed out. Please try again.",
                kind.label()
            ),
        }
    }
}

pub type NoticeReceiver = mpsc::UnboundedReceiver<Notice>;

/// Sending half of the notice channel. Cloned into every component that
/// reports to the user.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl Notifier {
    #[must_use]
    pub fn channel() -> (Self, NoticeReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Delivers `notice`. A dropped receiver is not an error: the dashboard
    /// keeps working headless.
    pub fn notify(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            tracing::trace!("notice receiver dropped");
        }
    }
}
