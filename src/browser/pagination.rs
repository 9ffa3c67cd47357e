//! Page cursor state machine for the file list.
//!
//! Fetches are split into [`Pagination::begin`], which hands out a ticket,
//! and [`Pagination::complete`], which applies the response. Every reset
//! bumps a generation counter; results for an older generation are dropped
//! so a slow response cannot overwrite a fresher one.

use crate::api::ListQuery;
use crate::error::ApiError;
use crate::files::{normalize_page, FileCollection};
use crate::identity::UserId;
use serde_json::Value;
use tracing::{debug, info, warn};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const DEFAULT_SCROLL_THRESHOLD_PX: f64 = 140.0;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Carries the inline message shown to the user.
    Errored(String),
}

/// Geometry of the scrollable list at the time of a scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollViewport {
    pub scroll_height: f64,
    pub scroll_top: f64,
    pub client_height: f64,
}

impl ScrollViewport {
    pub fn remaining(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }
}

/// Active search and category filters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListFilters {
    pub search: String,
    pub category: crate::files::CategoryFilter,
}

/// Authorization to run one list request and apply its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub query: ListQuery,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn page(&self) -> u64 {
        self.query.page
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Page 1 replaced the collection.
    Replaced { count: usize },
    /// A later page was merged in.
    Merged { added: usize },
    /// The request failed; the collection was left as it was.
    Failed,
    /// A reset happened while the request was in flight.
    Stale,
}

#[derive(Debug, Clone)]
pub struct Pagination {
    state: LoadState,
    page: u64,
    page_size: u64,
    has_more: bool,
    total: Option<u64>,
    generation: u64,
    in_flight: Option<(u64, u64)>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(page_size: u64) -> Self {
        Self {
            state: LoadState::Idle,
            page: 1,
            page_size: page_size.max(1),
            has_more: false,
            total: None,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Back to page 1 under a new generation. Outstanding tickets go stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.page = 1;
        self.has_more = false;
        self.total = None;
        self.in_flight = None;
        self.state = LoadState::Idle;
        debug!(generation = self.generation, "pagination reset");
    }

    /// Issue a ticket for the current page, unless one is already out for it.
    pub fn begin(&mut self, user_id: &UserId, filters: &ListFilters) -> Option<FetchTicket> {
        let cursor = (self.generation, self.page);
        if self.is_loading() && self.in_flight == Some(cursor) {
            debug!(page = self.page, "fetch already in flight");
            return None;
        }
        self.in_flight = Some(cursor);
        self.state = LoadState::Loading;

        let search = filters.search.trim();
        Some(FetchTicket {
            generation: self.generation,
            query: ListQuery {
                user_id: user_id.clone(),
                page: self.page,
                page_size: self.page_size,
                search: (!search.is_empty()).then(|| search.to_string()),
                category: filters.category.as_query().map(str::to_string),
            },
        })
    }

    /// Apply a finished request to `files`.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Value, ApiError>,
        files: &mut FileCollection,
    ) -> FetchOutcome {
        let cursor = (ticket.generation, ticket.page());
        if ticket.generation != self.generation || self.in_flight != Some(cursor) {
            warn!(
                page = ticket.page(),
                ticket_generation = ticket.generation,
                generation = self.generation,
                "discarding stale list response"
            );
            return FetchOutcome::Stale;
        }
        self.in_flight = None;

        let payload = match result {
            Ok(payload) => payload,
            Err(err) => {
                warn!(page = ticket.page(), error = %err, "list fetch failed");
                self.state = LoadState::Errored(err.list_message());
                return FetchOutcome::Failed;
            }
        };

        let (items, info) = normalize_page(&payload, ticket.page(), self.page_size);
        self.has_more = info.has_more;
        self.total = info.total;
        self.state = LoadState::Loaded;

        let outcome = if ticket.page() == 1 {
            let count = items.len();
            files.replace(items);
            FetchOutcome::Replaced { count }
        } else {
            FetchOutcome::Merged {
                added: files.merge_page(items),
            }
        };
        info!(
            page = ticket.page(),
            total = ?self.total,
            has_more = self.has_more,
            len = files.len(),
            "page applied"
        );
        outcome
    }

    /// Whether the list may advance: loaded, not loading, more pages exist.
    pub fn can_advance(&self) -> bool {
        self.state == LoadState::Loaded && self.has_more
    }

    /// Scroll check: near enough to the bottom to load the next page.
    pub fn should_advance(&self, viewport: ScrollViewport, threshold: f64) -> bool {
        self.can_advance() && viewport.remaining() < threshold
    }

    /// Move to the next page. Returns false when not allowed.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.page += 1;
        true
    }
}
