//! Snapshot store with synchronous subscriber broadcast.
//!
//! Every `set`/`update` installs a brand-new snapshot (shallow merge of the previous one and
//! the patch) before listeners run. Updates issued from inside a listener are queued and
//! applied once the current notification round has finished, so each update still gets its
//! own round, in call order, without nesting.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::{Rc, Weak},
};

/// A state type that can absorb a partial update.
pub trait Merge {
    type Patch;

    /// Returns a new value with the patch's fields overwriting `self`'s.
    fn merge(&self, patch: Self::Patch) -> Self;
}

type Listener<S> = Rc<dyn Fn(&Rc<S>)>;
type Deferred<S> = Box<dyn FnOnce(&S) -> <S as Merge>::Patch>;

struct StoreInner<S: Merge> {
    state: RefCell<Rc<S>>,
    listeners: RefCell<Vec<(u64, Listener<S>)>>,
    next_listener_id: Cell<u64>,
    pending: RefCell<VecDeque<Deferred<S>>>,
    notifying: Cell<bool>,
}

pub struct Store<S: Merge> {
    inner: Rc<StoreInner<S>>,
}

impl<S: Merge> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S> Store<S>
where
    S: Merge + 'static,
    S::Patch: 'static,
{
    pub fn new(initial: S) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(Rc::new(initial)),
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(0),
                pending: RefCell::new(VecDeque::new()),
                notifying: Cell::new(false),
            }),
        }
    }

    pub fn get(&self) -> Rc<S> {
        Rc::clone(&self.inner.state.borrow())
    }

    pub fn set(&self, patch: S::Patch) {
        self.update(move |_| patch);
    }

    /// Like [`Store::set`], with the patch computed from the snapshot it will be merged over.
    pub fn update(&self, patch: impl FnOnce(&S) -> S::Patch + 'static) {
        self.inner.pending.borrow_mut().push_back(Box::new(patch));
        if self.inner.notifying.get() {
            // drained by the outermost call
            return;
        }

        let _round = NotifyingGuard::enter(&self.inner.notifying);
        loop {
            let next = self.inner.pending.borrow_mut().pop_front();
            let Some(patch) = next else {
                break;
            };

            let current = self.get();
            let snapshot = Rc::new(current.merge(patch(current.as_ref())));
            *self.inner.state.borrow_mut() = Rc::clone(&snapshot);
            self.notify(&snapshot);
        }
    }

    /// Registers `listener`, calls it once with the current snapshot, and returns its disposer.
    pub fn subscribe(&self, listener: impl Fn(&Rc<S>) + 'static) -> Subscription<S> {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);

        let listener: Listener<S> = Rc::new(listener);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::clone(&listener)));

        listener(&self.get());

        Subscription {
            id,
            store: Rc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn notify(&self, snapshot: &Rc<S>) {
        let round: Vec<(u64, Listener<S>)> = self.inner.listeners.borrow().clone();
        for (id, listener) in round {
            if self.is_registered(id) {
                listener(snapshot);
            }
        }
    }

    fn is_registered(&self, id: u64) -> bool {
        self.inner
            .listeners
            .borrow()
            .iter()
            .any(|(registered, _)| *registered == id)
    }
}

struct NotifyingGuard<'a>(&'a Cell<bool>);

impl<'a> NotifyingGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for NotifyingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Disposer returned by [`Store::subscribe`].
pub struct Subscription<S: Merge> {
    id: u64,
    store: Weak<StoreInner<S>>,
}

impl<S: Merge> Subscription<S> {
    /// Removes the listener this subscription was returned for. Later calls do nothing.
    pub fn unsubscribe(&self) {
        if let Some(store) = self.store.upgrade() {
            store
                .listeners
                .borrow_mut()
                .retain(|(registered, _)| *registered != self.id);
        }
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
