//! Application services for board synchronisation.

mod dependents;
mod error;
mod fetcher;
mod locator;
mod outcome;
mod poller;
mod reconciler;

pub use error::{SyncError, SyncResult, SyncWarning};
pub use fetcher::{
    ATTACHMENTS_DIR, ATTACHMENTS_FIELD, FETCH_BASE_DIR, FetchRequest, FetchedTask, TASK_JSON_FILE_NAME, TaskFetcher,
    variables,
};
pub use locator::Locator;
pub use outcome::{ReconcileOutcome, TASK_URL_VARIABLE};
pub use poller::{PollQuery, QueryPoller};
pub use reconciler::TaskReconciler;
