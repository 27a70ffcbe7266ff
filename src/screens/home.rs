//! Scan-driven entry/exit workflow.
//!
//! ```text
//! AwaitingPermission --granted--> Scanning <--scan again-- Scanned
//!         |                          |                        ^
//!         +--denied--> PermissionDenied +--------payload------+
//! ```
//!
//! While `Scanned`, Entry and Exit post the identity to the backend. Only one
//! request may be in flight at a time.

use super::Notification;
use crate::api::{ApiError, AttendanceEvent, AttendanceRequest};
use crate::identity::{IdentityError, Role, ScannedIdentity};
use crate::scanner::PermissionState;
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const INVALID_DETAILS: &str = "Invalid Details";
pub const INVALID_BARCODE: &str = "Invalid Barcode";

const HISTORY_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeState {
    AwaitingPermission,
    PermissionDenied,
    Scanning,
    Scanned(ScannedIdentity),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HomeError {
    #[error("No card has been scanned")]
    NoIdentity,

    #[error("Another attendance request is still in progress")]
    RequestPending,
}

/// A timestamp the backend accepted during this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub event: AttendanceEvent,
    pub name: String,
    pub role: Role,
    pub identifier: String,
    pub recorded_at: DateTime<Local>,
}

impl AttendanceRecord {
    pub fn summary(&self) -> String {
        format!(
            "{} {} {} ({})",
            self.recorded_at.format("%H:%M:%S"),
            self.event,
            self.name,
            self.identifier
        )
    }
}

/// Everything the Home screen draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub status: String,
    pub identity_lines: Vec<String>,
    pub show_scan_again: bool,
    pub actions_enabled: bool,
    pub history: Vec<String>,
}

#[derive(Debug)]
struct PendingRequest {
    event: AttendanceEvent,
    identity: ScannedIdentity,
}

#[derive(Debug)]
pub struct HomeScreen {
    state: HomeState,
    pending: Option<PendingRequest>,
    history: VecDeque<AttendanceRecord>,
}

impl Default for HomeScreen {
    fn default() -> Self {
        HomeScreen {
            state: HomeState::AwaitingPermission,
            pending: None,
            history: VecDeque::with_capacity(HISTORY_LEN),
        }
    }
}

impl HomeScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &HomeState {
        &self.state
    }

    pub fn identity(&self) -> Option<&ScannedIdentity> {
        match &self.state {
            HomeState::Scanned(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Most recent first.
    pub fn history(&self) -> impl Iterator<Item = &AttendanceRecord> {
        self.history.iter()
    }

    /// Applies the answer to the one permission request made on mount.
    pub fn permission_resolved(&mut self, permission: PermissionState) {
        if self.state != HomeState::AwaitingPermission {
            debug!(?permission, "permission already resolved, ignoring");
            return;
        }

        match permission {
            PermissionState::Granted => {
                info!("scanner access granted");
                self.state = HomeState::Scanning;
            }
            PermissionState::Denied => {
                warn!("scanner access denied");
                self.state = HomeState::PermissionDenied;
            }
            PermissionState::Unknown => {}
        }
    }

    /// Handles one scanned payload. Returns a notification when the payload
    /// could not be decoded; payloads arriving outside `Scanning` are dropped.
    pub fn scan(&mut self, payload: &str) -> Option<Notification> {
        if self.state != HomeState::Scanning {
            debug!(state = ?self.state, "not scanning, payload dropped");
            return None;
        }

        match ScannedIdentity::from_payload(payload) {
            Ok(identity) => {
                info!(role = %identity.role(), "card scanned");
                self.state = HomeState::Scanned(identity);
                None
            }
            Err(e) => {
                warn!("ignoring unreadable barcode: {}", e);
                Some(Notification::error(match e {
                    IdentityError::UnknownRole(_) => format!("{}: {}", INVALID_BARCODE, e),
                    _ => INVALID_BARCODE.to_owned(),
                }))
            }
        }
    }

    /// Forgets the current card and goes back to scanning.
    pub fn scan_again(&mut self) {
        if let HomeState::Scanned(_) = self.state {
            self.state = HomeState::Scanning;
        }
    }

    /// Builds the request for an Entry or Exit tap and marks it in flight.
    pub fn begin(&mut self, event: AttendanceEvent) -> Result<AttendanceRequest, HomeError> {
        if self.pending.is_some() {
            return Err(HomeError::RequestPending);
        }
        let identity = self.identity().cloned().ok_or(HomeError::NoIdentity)?;

        let request = AttendanceRequest::new(event, &identity);
        info!(%event, role = %request.role, path = request.path(), "recording attendance");
        self.pending = Some(PendingRequest { event, identity });
        Ok(request)
    }

    /// Settles the in-flight request. Returns `None` if nothing was pending.
    pub fn complete(&mut self, result: Result<(), ApiError>) -> Option<Notification> {
        let pending = self.pending.take()?;

        match result {
            Ok(()) => {
                if self.history.len() == HISTORY_LEN {
                    self.history.pop_back();
                }
                self.history.push_front(AttendanceRecord {
                    event: pending.event,
                    name: pending.identity.name.clone(),
                    role: pending.identity.role(),
                    identifier: pending.identity.id.value().to_string(),
                    recorded_at: Local::now(),
                });
                Some(Notification::info(pending.event.saved_message()))
            }
            Err(e) => {
                error!(event = %pending.event, "attendance request failed: {}", e);
                Some(Notification::error(INVALID_DETAILS))
            }
        }
    }

    pub fn view(&self) -> HomeView {
        let status = match &self.state {
            HomeState::AwaitingPermission => "Requesting scanner permission...".to_owned(),
            HomeState::PermissionDenied => {
                "Scanner permission denied. Please grant permission to scan barcodes.".to_owned()
            }
            HomeState::Scanning => "Point scanner at barcode".to_owned(),
            HomeState::Scanned(_) => match &self.pending {
                Some(pending) => format!("Saving {} time...", pending.event),
                None => "Card scanned".to_owned(),
            },
        };

        HomeView {
            status,
            identity_lines: self
                .identity()
                .map(ScannedIdentity::display_lines)
                .unwrap_or_default(),
            show_scan_again: self.identity().is_some(),
            actions_enabled: self.identity().is_some() && self.pending.is_none(),
            history: self.history.iter().map(AttendanceRecord::summary).collect(),
        }
    }
}
