//! Process-wide routing of Escape and outside-pointer dismissal.
//!
//! Surfaces (popovers, dialogs) hold a [`DismissRegistration`] while they are open. Only the
//! most recently registered surface receives dismissal; a pointer press inside its bounds is
//! swallowed. Dropping the registration unregisters, so every exit path releases it exactly
//! once.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use egui::{Pos2, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DismissEvent {
    Escape,
    Pointer(Pos2),
}

#[derive(Debug)]
struct Surface {
    id: SurfaceId,
    bounds: Option<Rect>,
}

#[derive(Debug, Default)]
struct BrokerInner {
    next_id: u64,
    surfaces: Vec<Surface>,
}

#[derive(Debug, Clone, Default)]
pub struct DismissBroker {
    inner: Rc<RefCell<BrokerInner>>,
}

impl DismissBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) -> DismissRegistration {
        let mut inner = self.inner.borrow_mut();
        let id = SurfaceId(inner.next_id);
        inner.next_id += 1;
        inner.surfaces.push(Surface { id, bounds: None });
        tracing::trace!(surface = id.0, depth = inner.surfaces.len(), "dismissible surface registered");

        DismissRegistration {
            id,
            broker: Rc::downgrade(&self.inner),
        }
    }

    pub fn topmost(&self) -> Option<SurfaceId> {
        self.inner.borrow().surfaces.last().map(|surface| surface.id)
    }

    pub fn active_count(&self) -> usize {
        self.inner.borrow().surfaces.len()
    }

    /// Picks the surface `event` dismisses, if any.
    ///
    /// Surfaces without recorded bounds treat every pointer press as outside.
    pub fn route(&self, event: DismissEvent) -> Option<SurfaceId> {
        let inner = self.inner.borrow();
        let top = inner.surfaces.last()?;
        match event {
            DismissEvent::Escape => Some(top.id),
            DismissEvent::Pointer(pos) => match top.bounds {
                Some(bounds) if bounds.contains(pos) => None,
                _ => Some(top.id),
            },
        }
    }
}

#[derive(Debug)]
pub struct DismissRegistration {
    id: SurfaceId,
    broker: Weak<RefCell<BrokerInner>>,
}

impl DismissRegistration {
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn set_bounds(&self, bounds: Rect) {
        let Some(broker) = self.broker.upgrade() else {
            return;
        };
        let mut inner = broker.borrow_mut();
        if let Some(surface) = inner.surfaces.iter_mut().find(|surface| surface.id == self.id) {
            surface.bounds = Some(bounds);
        }
    }
}

impl Drop for DismissRegistration {
    fn drop(&mut self) {
        if let Some(broker) = self.broker.upgrade() {
            let mut inner = broker.borrow_mut();
            inner.surfaces.retain(|surface| surface.id != self.id);
            tracing::trace!(surface = self.id.0, depth = inner.surfaces.len(), "dismissible surface released");
        }
    }
}
