//! Client-side orchestration for the content dashboard.
//!
//! Owns the in-memory item list and derived stats, the per-item busy state
//! of AI operations, the persisted saved-item selection, and scrape request
//! assembly. Everything user-visible is reported as a [`Notice`].

pub mod controller;
pub mod dashboard;
pub mod notice;
pub mod scrape;
pub mod selection;
pub mod storage;
pub mod tracker;

pub use controller::{LoadingFlag, QueryController};
pub use dashboard::{Dashboard, DashboardSettings, OperationOutcome};
pub use notice::{Notice, NoticeReceiver, Notifier};
pub use scrape::{
    parse_keywords, resolve_subreddit, ScrapeBuilder, ScrapeError, ScrapeForm, ScrapeReceipt,
};
pub use selection::{ExportDocument, SelectionStore, SELECTION_KEY};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use tracker::{InFlight, OperationKind, OperationTracker};
