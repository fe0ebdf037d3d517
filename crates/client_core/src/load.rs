//! Last-call-wins bookkeeping for catalog loads.
//!
//! The controller never awaits anything itself: [`LoadController::load`] hands out a ticket
//! for whoever runs the fetch, and [`LoadController::settle`] is fed the outcome later. Only
//! the newest generation may write into the store.

use shared::{domain::Product, error::CatalogError};
use tracing::{debug, info, warn};

use crate::{
    cancel::{cancel_pair, CancelHandle, CancelSignal},
    state::{AppState, AppStatePatch, LoadPhase},
    store::Store,
};

#[derive(Debug, Clone)]
pub struct LoadTicket {
    pub generation: u64,
    pub signal: CancelSignal,
}

#[derive(Debug, Default)]
pub struct LoadController {
    generation: u64,
    in_flight: Option<CancelHandle>,
}

impl LoadController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any pending request, marks the store as loading and issues a fresh ticket.
    pub fn load(&mut self, store: &Store<AppState>) -> LoadTicket {
        if let Some(previous) = self.in_flight.take() {
            debug!(generation = self.generation, "cancelling superseded catalog load");
            previous.cancel();
        }

        self.generation += 1;
        let (handle, signal) = cancel_pair();
        self.in_flight = Some(handle);

        store.set(
            AppStatePatch::default()
                .phase(LoadPhase::Loading)
                .error(None),
        );
        info!(generation = self.generation, "catalog load started");

        LoadTicket {
            generation: self.generation,
            signal,
        }
    }

    /// Applies a finished request. Returns `false` when the outcome was dropped.
    pub fn settle(
        &mut self,
        generation: u64,
        result: Result<Vec<Product>, CatalogError>,
        store: &Store<AppState>,
    ) -> bool {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "dropping outcome of superseded catalog load"
            );
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(items) => {
                info!(generation, count = items.len(), "catalog loaded");
                store.set(
                    AppStatePatch::default()
                        .items(items)
                        .phase(LoadPhase::Ready),
                );
                true
            }
            Err(err) if err.is_cancelled() => {
                debug!(generation, "catalog load cancelled");
                false
            }
            Err(err) => {
                warn!(generation, error = %err, "catalog load failed");
                store.set(
                    AppStatePatch::default()
                        .error(Some(err.to_string()))
                        .phase(LoadPhase::Failed),
                );
                true
            }
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[cfg(test)]
#[path = "tests/load_tests.rs"]
mod tests;
