use std::rc::Rc;

use shared::domain::Product;

use crate::store::Merge;

/// Lifecycle of the catalog request, shared by the inline status view and the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub items: Rc<[Product]>,
    pub phase: LoadPhase,
    pub error: Option<String>,
    pub selected: Option<Product>,
}

impl AppState {
    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }
}

/// Partial update for [`AppState`]. `None` leaves a field untouched; `error` and `selected`
/// take `Some(None)` to clear.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppStatePatch {
    pub items: Option<Rc<[Product]>>,
    pub phase: Option<LoadPhase>,
    pub error: Option<Option<String>>,
    pub selected: Option<Option<Product>>,
}

impl AppStatePatch {
    pub fn items(mut self, items: impl Into<Rc<[Product]>>) -> Self {
        self.items = Some(items.into());
        self
    }

    pub fn phase(mut self, phase: LoadPhase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn error(mut self, error: Option<String>) -> Self {
        self.error = Some(error);
        self
    }

    pub fn selected(mut self, selected: Option<Product>) -> Self {
        self.selected = Some(selected);
        self
    }
}

impl Merge for AppState {
    type Patch = AppStatePatch;

    fn merge(&self, patch: AppStatePatch) -> Self {
        Self {
            items: patch.items.unwrap_or_else(|| Rc::clone(&self.items)),
            phase: patch.phase.unwrap_or(self.phase),
            error: patch.error.unwrap_or_else(|| self.error.clone()),
            selected: patch.selected.unwrap_or_else(|| self.selected.clone()),
        }
    }
}
