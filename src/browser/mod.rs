//! The file browser: one user's paginated, filterable, selectable file list.
//!
//! [`FileBrowser`] owns the collection and drives it through a [`FileApi`].
//! All state lives here and is mutated from a single task. Callers that want
//! to overlap a list fetch with other requests can use
//! [`FileBrowser::begin_fetch`] and [`FileBrowser::complete_fetch`] directly.

pub mod debounce;
pub mod pagination;
pub mod preview;
pub mod selection;

use crate::api::FileApi;
use crate::error::{
    ApiError, BrowserError, Result, BULK_DELETE_FAILURE_MESSAGE, DELETE_FAILURE_MESSAGE,
};
use crate::files::{CategoryFilter, FileCollection, FileId, FileRecord};
use crate::identity::{UserId, UserIdentity};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub use debounce::SearchDebouncer;
pub use pagination::{
    FetchOutcome, FetchTicket, ListFilters, LoadState, Pagination, ScrollViewport,
    DEFAULT_PAGE_SIZE, DEFAULT_SCROLL_THRESHOLD_PX,
};
pub use preview::{Preview, PreviewContent, PreviewState, PreviewTicket};
pub use selection::Selection;

/// Tunables for a browser session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrowserSettings {
    pub page_size: u64,
    pub scroll_threshold_px: f64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            scroll_threshold_px: DEFAULT_SCROLL_THRESHOLD_PX,
        }
    }
}

/// Result of activating a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenAction {
    /// Shown in the in-app preview. Text previews carry a ticket for the body.
    Preview(Option<PreviewTicket>),
    /// Handed to an external handler.
    Download(String),
}

pub struct FileBrowser<A: FileApi> {
    api: A,
    settings: BrowserSettings,
    user: Option<UserIdentity>,
    filters: ListFilters,
    files: FileCollection,
    pagination: Pagination,
    selection: Selection,
    preview: PreviewState,
    alert: Option<String>,
}

impl<A: FileApi> FileBrowser<A> {
    pub fn new(api: A, settings: BrowserSettings) -> Self {
        Self {
            api,
            settings,
            user: None,
            filters: ListFilters::default(),
            files: FileCollection::new(),
            pagination: Pagination::new(settings.page_size),
            selection: Selection::default(),
            preview: PreviewState::default(),
            alert: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().and_then(|user| user.id.as_ref())
    }

    pub fn files(&self) -> &FileCollection {
        &self.files
    }

    pub fn filters(&self) -> &ListFilters {
        &self.filters
    }

    pub fn state(&self) -> &LoadState {
        self.pagination.state()
    }

    pub fn page(&self) -> u64 {
        self.pagination.page()
    }

    pub fn has_more(&self) -> bool {
        self.pagination.has_more()
    }

    pub fn total(&self) -> Option<u64> {
        self.pagination.total()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.current()
    }

    /// Last mutation failure, for a blocking alert.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Drop the collection and go back to page 1.
    fn reset_collection(&mut self) {
        self.pagination.reset();
        self.files.clear();
        self.selection.exit();
    }

    /// Switch the signed-in user. A different id rebuilds everything.
    pub async fn set_user(&mut self, user: Option<UserIdentity>) -> Option<FetchOutcome> {
        let changed = user.as_ref().and_then(|u| u.id.as_ref()) != self.user_id();
        self.user = user;
        if !changed {
            return None;
        }
        info!(user = ?self.user_id(), "signed-in user changed");
        self.reset_collection();
        self.preview.close();
        if self.user_id().is_some() {
            self.fetch_current().await
        } else {
            None
        }
    }

    /// Apply a settled (debounced) search term.
    pub async fn apply_search(&mut self, term: &str) -> Option<FetchOutcome> {
        let term = term.trim();
        if self.filters.search.trim() == term {
            return None;
        }
        self.filters.search = term.to_string();
        self.reset_collection();
        self.fetch_current().await
    }

    pub async fn set_category(&mut self, category: CategoryFilter) -> Option<FetchOutcome> {
        if self.filters.category == category {
            return None;
        }
        self.filters.category = category;
        self.reset_collection();
        self.fetch_current().await
    }

    /// Manual refresh: page 1 again, replacing the collection.
    pub async fn refresh(&mut self) -> Option<FetchOutcome> {
        self.pagination.reset();
        self.fetch_current().await
    }

    /// Scroll event on the list; loads the next page near the bottom.
    pub async fn on_scroll(&mut self, viewport: ScrollViewport) -> Option<FetchOutcome> {
        if !self
            .pagination
            .should_advance(viewport, self.settings.scroll_threshold_px)
        {
            return None;
        }
        self.load_more().await
    }

    /// Advance one page and merge it in.
    pub async fn load_more(&mut self) -> Option<FetchOutcome> {
        if !self.pagination.advance() {
            return None;
        }
        self.fetch_current().await
    }

    /// Ticket for the current page, or `None` without a user or while the
    /// same page is already loading.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let user_id = self.user.as_ref()?.id.clone()?;
        self.pagination.begin(&user_id, &self.filters)
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: std::result::Result<Value, ApiError>,
    ) -> FetchOutcome {
        let outcome = self.pagination.complete(ticket, result, &mut self.files);
        if let FetchOutcome::Replaced { .. } = outcome {
            self.selection.reseed(&self.files);
        }
        outcome
    }

    pub async fn fetch_current(&mut self) -> Option<FetchOutcome> {
        let ticket = self.begin_fetch()?;
        let result = self.api.list(&ticket.query).await;
        Some(self.complete_fetch(ticket, result))
    }

    /// Load pages until `done` is satisfied, the server runs out, or a page
    /// brings nothing new.
    pub async fn load_until<F>(&mut self, mut done: F) -> Result<()>
    where
        F: FnMut(&FileCollection) -> bool,
    {
        if self.user_id().is_none() {
            return Err(BrowserError::NoActiveUser);
        }
        if self.pagination.state() == &LoadState::Idle {
            self.fetch_current().await;
        }
        while !done(&self.files) && self.pagination.can_advance() {
            match self.load_more().await {
                Some(FetchOutcome::Merged { added }) if added > 0 => {}
                outcome => {
                    debug!(?outcome, page = self.page(), "stopping page walk");
                    break;
                }
            }
        }
        Ok(())
    }

    pub fn enter_selection_mode(&mut self) {
        self.selection.enter(&self.files);
    }

    /// Enter selection mode with exactly `ids` selected. Fails without
    /// touching the selection when any of them is not loaded.
    pub fn select_only(&mut self, ids: &[FileId]) -> Result<()> {
        let missing: Vec<FileId> = ids
            .iter()
            .filter(|id| !self.files.contains(id))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(BrowserError::NotLoaded(missing));
        }
        self.selection.enter(&self.files);
        let keep: HashSet<&FileId> = ids.iter().collect();
        for id in self.files.ids() {
            if !keep.contains(&id) {
                self.selection.toggle(&id);
            }
        }
        Ok(())
    }

    pub fn exit_selection_mode(&mut self) {
        self.selection.exit();
    }

    pub fn toggle_selected(&mut self, id: &FileId) -> bool {
        self.selection.toggle(id)
    }

    /// Delete one file. The collection changes only after the server agrees.
    pub async fn delete(&mut self, id: &FileId) -> Result<()> {
        let user_id = self.user_id().cloned().ok_or(BrowserError::NoActiveUser)?;
        match self.api.delete(&user_id, id).await {
            Ok(()) => {
                let removed = self.files.remove(id);
                self.selection.remove(id);
                info!(%id, removed, "file deleted");
                Ok(())
            }
            Err(source) => {
                warn!(%id, error = %source, "delete failed");
                self.alert = Some(DELETE_FAILURE_MESSAGE.to_string());
                Err(BrowserError::Mutation {
                    message: DELETE_FAILURE_MESSAGE,
                    source,
                })
            }
        }
    }

    /// Delete every selected file in one request, then leave selection mode.
    /// Returns how many records left the collection.
    pub async fn bulk_delete(&mut self) -> Result<usize> {
        let user_id = self.user_id().cloned().ok_or(BrowserError::NoActiveUser)?;
        if self.selection.is_empty() {
            return Ok(0);
        }
        let ids = self.selection.ordered_ids(&self.files);
        match self.api.bulk_delete(&user_id, &ids).await {
            Ok(()) => {
                let doomed: HashSet<FileId> = ids.into_iter().collect();
                let removed = self.files.remove_many(&doomed);
                self.selection.exit();
                info!(removed, "bulk delete applied");
                Ok(removed)
            }
            Err(source) => {
                warn!(count = ids.len(), error = %source, "bulk delete failed");
                self.alert = Some(BULK_DELETE_FAILURE_MESSAGE.to_string());
                Err(BrowserError::Mutation {
                    message: BULK_DELETE_FAILURE_MESSAGE,
                    source,
                })
            }
        }
    }

    /// Preview previewable kinds, hand everything else to a download.
    pub fn open(&mut self, record: &FileRecord) -> Result<OpenAction> {
        let user_id = self.user_id().cloned().ok_or(BrowserError::NoActiveUser)?;
        let file_id = record.id().ok_or(BrowserError::MissingId)?;
        let kind = record.media_kind();
        let endpoints = self.api.endpoints();
        if !kind.is_previewable() {
            return Ok(OpenAction::Download(endpoints.download_url(&user_id, &file_id)));
        }
        let url = endpoints.stream_url(&user_id, &file_id);
        let name = record.name().unwrap_or_else(|| "File".to_string());
        Ok(OpenAction::Preview(self.preview.open(file_id, name, kind, url)))
    }

    pub fn close_preview(&mut self) {
        self.preview.close();
    }

    pub fn complete_preview(
        &mut self,
        ticket: PreviewTicket,
        result: std::result::Result<String, ApiError>,
    ) -> bool {
        self.preview.complete(ticket, result)
    }

    pub fn preview_media_failed(&mut self) {
        self.preview.media_failed();
    }

    /// Load the body of a text preview and apply it unless the preview moved on.
    pub async fn load_preview_text(&mut self, ticket: PreviewTicket) -> Result<bool> {
        let user_id = self.user_id().cloned().ok_or(BrowserError::NoActiveUser)?;
        let result = self.api.stream_text(&user_id, &ticket.file_id).await;
        Ok(self.complete_preview(ticket, result))
    }
}
