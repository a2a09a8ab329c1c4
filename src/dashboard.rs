//! Dashboard controller.
//!
//! The controller never performs I/O on its own behalf for lookups: [`Dashboard::search`]
//! and [`Dashboard::refresh`] hand back a [`FetchRequest`] for the caller to run, and the
//! outcome is fed back through [`Dashboard::resolve`]. Every request carries an id and
//! only the most recently issued one is applied, so a slow response can never overwrite
//! the result of a newer query.

use tracing::{debug, info, warn};

use crate::history::HistoryEntry;
use crate::owm::WeatherError;
use crate::store::Store;
use crate::theme::{self, GradientId};
use crate::weather::{ForecastEntry, Report, WeatherSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq)]
enum Status {
    Idle,
    Success { query: String, report: Report },
    Failure { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: u64,
    pub city: String,
}

#[derive(Debug)]
pub struct Dashboard {
    store: Store,
    status: Status,
    pending: Option<FetchRequest>,
    last_issued: u64,
}

impl Dashboard {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            status: Status::Idle,
            pending: None,
            last_issued: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            return Phase::Loading;
        }
        match self.status {
            Status::Idle => Phase::Idle,
            Status::Success { .. } => Phase::Success,
            Status::Failure { .. } => Phase::Failure,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match &self.status {
            Status::Success { report, .. } => Some(&report.snapshot),
            _ => None,
        }
    }

    pub fn forecast(&self) -> &[ForecastEntry] {
        match &self.status {
            Status::Success { report, .. } => &report.forecast,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            Status::Failure { message } => Some(message),
            _ => None,
        }
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.store.history()
    }

    pub fn dark_mode(&self) -> bool {
        self.store.dark_mode()
    }

    pub fn background(&self) -> GradientId {
        theme::select_background(self.snapshot().map(|s| s.icon.as_str()), self.dark_mode())
    }

    /// Starts a new lookup. Blank input issues nothing.
    pub fn search(&mut self, city: &str) -> Option<FetchRequest> {
        let city = city.trim();
        if city.is_empty() {
            return None;
        }
        self.last_issued += 1;
        let request = FetchRequest {
            id: self.last_issued,
            city: city.to_string(),
        };
        if let Some(superseded) = self.pending.replace(request.clone()) {
            debug!(id = superseded.id, city = %superseded.city, "request superseded");
        }
        info!(id = request.id, city = %request.city, "lookup issued");
        Some(request)
    }

    /// Re-issues the last successful query. Only meaningful while showing
    /// results; otherwise nothing is issued.
    pub fn refresh(&mut self) -> Option<FetchRequest> {
        if self.phase() != Phase::Success {
            debug!(phase = ?self.phase(), "refresh ignored");
            return None;
        }
        let query = match &self.status {
            Status::Success { query, .. } => query.clone(),
            _ => return None,
        };
        self.search(&query)
    }

    /// Applies the outcome of request `id`. Returns `false` when the result
    /// belongs to a superseded request and was discarded.
    pub fn resolve(&mut self, id: u64, result: Result<Report, WeatherError>) -> bool {
        let request = match self.pending.take_if(|pending| pending.id == id) {
            Some(request) => request,
            None => {
                debug!(id, latest = self.last_issued, "discarding stale result");
                return false;
            }
        };

        match result {
            Ok(report) => {
                info!(id, city = %report.snapshot.city, days = report.forecast.len(), "lookup succeeded");
                self.store.record_search(&request.city);
                self.persist();
                self.status = Status::Success {
                    query: request.city,
                    report,
                };
            }
            Err(err) => {
                warn!(id, city = %request.city, %err, "lookup failed");
                self.status = Status::Failure {
                    message: err.user_message().to_string(),
                };
            }
        }
        true
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        let dark = !self.store.dark_mode();
        self.set_dark_mode(dark);
        debug!(background = %self.background().name(), "theme switched");
        dark
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        self.store.set_dark_mode(dark);
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = self.store.persist() {
            warn!(path = %self.store.path().display(), %err, "failed to save state");
        }
    }
}
