//! Watermarked polling for newly changed tasks.

use std::sync::Arc;
use tracing::{info, warn};

use super::error::SyncResult;
use super::locator::Locator;
use crate::board::client::BoardClient;
use crate::board::client::methods::SearchTasks;
use crate::board::domain::{
    ProjectSnapshot, ReferenceFilter, RemoteTaskSnapshot, TriggerEvent, Watermark, select_changed,
};
use crate::board::ports::{RpcTransport, WatermarkStore};
use crate::config::KanboardConfig;

/// What to search for on every poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollQuery {
    project_identifier: String,
    query: String,
    reference_pattern: Option<String>,
}

impl PollQuery {
    /// Searches project `project_identifier` with the query expression
    /// `query`.
    #[must_use]
    pub fn new(project_identifier: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            project_identifier: project_identifier.into(),
            query: query.into(),
            reference_pattern: None,
        }
    }

    /// Only reports tasks whose reference fully matches `pattern`.
    #[must_use]
    pub fn with_reference_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.reference_pattern = Some(pattern.into());
        self
    }

    /// Returns the project identifier.
    #[must_use]
    pub fn project_identifier(&self) -> &str {
        &self.project_identifier
    }

    /// Returns the query expression.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Emits one [`TriggerEvent`] per matching task changed since the last
/// cycle.
///
/// Delivery is at-least-once: the watermark is saved after the events are
/// selected, and a failed save only widens the next cycle's window.
pub struct QueryPoller<T, S>
where
    T: RpcTransport,
    S: WatermarkStore,
{
    locator: Locator<T>,
    store: Arc<S>,
    query: PollQuery,
    filter: ReferenceFilter,
}

impl<T, S> QueryPoller<T, S>
where
    T: RpcTransport,
    S: WatermarkStore,
{
    /// Creates a poller.
    ///
    /// # Errors
    ///
    /// Returns [`super::SyncError::Validation`] when the reference pattern
    /// does not compile.
    pub fn new(
        transport: Arc<T>,
        config: &KanboardConfig,
        store: Arc<S>,
        query: PollQuery,
    ) -> SyncResult<Self> {
        let filter = ReferenceFilter::new(query.reference_pattern.as_deref())?;
        Ok(Self {
            locator: Locator::new(BoardClient::new(transport, config.debug_mode())),
            store,
            query,
            filter,
        })
    }

    /// Runs one poll cycle and persists the advanced watermark.
    ///
    /// # Errors
    ///
    /// Returns [`super::SyncError::ProjectNotFound`] for an unknown project
    /// or [`super::SyncError::Client`] when a remote call fails. Watermark
    /// load and save failures are logged and do not fail the cycle.
    pub async fn poll(&self) -> SyncResult<Vec<TriggerEvent>> {
        let project = self
            .locator
            .find_project(&self.query.project_identifier)
            .await?;
        let candidates = self.search(&project).await?;
        let watermark = self.load_watermark().await;

        let selection = select_changed(&candidates, &self.filter, watermark);
        if let Err(err) = self.store.save(selection.next_watermark).await {
            warn!(
                watermark = %selection.next_watermark,
                error = %err,
                "failed to persist poll watermark"
            );
        }
        info!(
            project = %self.query.project_identifier,
            candidates = candidates.len(),
            triggered = selection.events.len(),
            previous = %watermark,
            next = %selection.next_watermark,
            "poll cycle complete"
        );
        Ok(selection.events)
    }

    /// Runs the query from watermark `0` without reading or saving the
    /// stored watermark.
    ///
    /// # Errors
    ///
    /// Same as [`Self::poll`].
    pub async fn preview(&self) -> SyncResult<Vec<TriggerEvent>> {
        let project = self
            .locator
            .find_project(&self.query.project_identifier)
            .await?;
        let candidates = self.search(&project).await?;
        Ok(select_changed(&candidates, &self.filter, Watermark::default()).events)
    }

    async fn search(&self, project: &ProjectSnapshot) -> SyncResult<Vec<RemoteTaskSnapshot>> {
        let raw = self
            .locator
            .client()
            .send(&SearchTasks {
                project_id: project.id(),
                query: self.query.query.clone(),
            })
            .await?
            .into_vec();
        Ok(raw
            .into_iter()
            .filter_map(|candidate| {
                serde_json::from_value::<RemoteTaskSnapshot>(candidate)
                    .inspect_err(|err| warn!(error = %err, "skipping undecodable search result"))
                    .ok()
            })
            .collect())
    }

    async fn load_watermark(&self) -> Watermark {
        match self.store.load().await {
            Ok(Some(watermark)) => watermark,
            Ok(None) => {
                info!("no poll watermark stored, starting from 0");
                Watermark::default()
            }
            Err(err) => {
                info!(error = %err, "poll watermark unreadable, starting from 0");
                Watermark::default()
            }
        }
    }
}
