//! Counted lock that freezes the catalog scroll area while a dialog is up.

use std::{cell::Cell, rc::Rc};

#[derive(Debug, Clone, Default)]
pub struct ScrollLock {
    holders: Rc<Cell<usize>>,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> ScrollLockGuard {
        self.holders.set(self.holders.get() + 1);
        ScrollLockGuard {
            holders: Rc::clone(&self.holders),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.holders.get() > 0
    }

    pub fn holders(&self) -> usize {
        self.holders.get()
    }
}

#[derive(Debug)]
pub struct ScrollLockGuard {
    holders: Rc<Cell<usize>>,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.holders.set(self.holders.get().saturating_sub(1));
    }
}
