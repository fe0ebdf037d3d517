//! Command orchestration from UI actions to the backend queue, and the store-driven rebuild of
//! the status, catalog and details views.

use std::{
    cell::{Ref, RefCell},
    rc::Rc,
};

use client_core::{AppState, LoadPhase, Store, Subscription};
use crossbeam_channel::{Sender, TrySendError};
use shared::domain::{IbuTheme, Product};

use crate::backend_bridge::commands::BackendCommand;
use crate::ui::modal::ModalController;

pub const STATUS_HEADLINE: &str = "Could not load products";

/// Queues `cmd` for the backend worker. On failure `status` explains why and `false` is
/// returned.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure)"
                    .to_string();
            false
        }
    }
}

/// Inline status above the catalog. Only failures produce content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusView {
    pub error: Option<String>,
}

impl StatusView {
    fn from_snapshot(snapshot: &AppState) -> Self {
        let error = match (snapshot.phase, &snapshot.error) {
            (LoadPhase::Failed, Some(message)) => Some(message.clone()),
            _ => None,
        };
        Self { error }
    }

    pub fn is_empty(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub product: Product,
    pub theme: IbuTheme,
    pub abv: String,
}

impl CardView {
    fn new(product: &Product) -> Self {
        Self {
            product: product.clone(),
            theme: product.theme(),
            abv: product.abv_label(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedViews {
    pub status: StatusView,
    pub cards: Vec<CardView>,
    pub overlay_visible: bool,
    /// Number of snapshots rendered so far.
    pub renders: u64,
}

impl RenderedViews {
    /// Full rebuild from `snapshot`; nothing is carried over from the previous render.
    pub fn rebuild(&mut self, snapshot: &AppState) {
        self.status = StatusView::from_snapshot(snapshot);
        self.cards = snapshot.items.iter().map(CardView::new).collect();
        self.overlay_visible = snapshot.is_loading();
        self.renders += 1;
    }
}

/// Keeps the views and the details dialog in step with the store for as long as it is
/// attached.
pub struct RenderOrchestrator {
    views: Rc<RefCell<RenderedViews>>,
    subscription: Subscription<AppState>,
}

impl RenderOrchestrator {
    /// Subscribes to `store`; the current snapshot is rendered before this returns.
    pub fn attach(store: &Store<AppState>, modal: Rc<RefCell<ModalController>>) -> Self {
        let views = Rc::new(RefCell::new(RenderedViews::default()));
        let target = Rc::clone(&views);
        let subscription = store.subscribe(move |snapshot| {
            target.borrow_mut().rebuild(snapshot);
            modal.borrow_mut().render(snapshot.selected.as_ref());
        });

        Self {
            views,
            subscription,
        }
    }

    pub fn views(&self) -> Ref<'_, RenderedViews> {
        self.views.borrow()
    }

    pub fn detach(self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
#[path = "tests/orchestration_tests.rs"]
mod tests;
