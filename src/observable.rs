//! Single-writer broadcast cells with last-value replay
//!
//! An [`Observable`] is owned by exactly one writer. Readers get [`Watch`]
//! handles that can read the current value or subscribe; a new subscriber is
//! called immediately with the current value, then once per publish.
//!
//! Writes are two-phase: [`Observable::stage`] replaces the value without
//! notifying, [`Observable::flush`] notifies if anything was staged. A writer
//! that stages several cells before flushing any of them guarantees that
//! every subscriber, whichever cell it listens on, reads a consistent set of
//! values.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Cell<T> {
    value: T,
    dirty: bool,
    next_id: u64,
    subscribers: Vec<(u64, Callback<T>)>,
}

/// Writable end of a broadcast cell
pub struct Observable<T> {
    cell: Rc<RefCell<Cell<T>>>,
}

/// Read-only handle onto an [`Observable`]
pub struct Watch<T> {
    cell: Rc<RefCell<Cell<T>>>,
}

impl<T> Clone for Watch<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observable")
            .field(&self.cell.borrow().value)
            .finish()
    }
}

impl<T: fmt::Debug> fmt::Debug for Watch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Watch").field(&self.cell.borrow().value).finish()
    }
}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(RefCell::new(Cell {
                value,
                dirty: false,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.cell.borrow().value.clone()
    }

    /// Borrow the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.borrow().value)
    }

    /// Read-only handle for other components
    pub fn watch(&self) -> Watch<T> {
        Watch {
            cell: Rc::clone(&self.cell),
        }
    }

    pub fn subscribe(&self, f: impl FnMut(&T) + 'static) -> Subscription {
        subscribe_cell(&self.cell, f)
    }

    /// Replace the value unconditionally and mark it for the next flush
    pub fn stage_always(&self, value: T) {
        let mut cell = self.cell.borrow_mut();
        cell.value = value;
        cell.dirty = true;
    }

    /// Replace the value and publish immediately, even if it is unchanged
    pub fn publish(&self, value: T) {
        self.stage_always(value);
        self.flush();
    }

    /// Deliver the staged value to every subscriber. No-op if nothing is staged.
    pub fn flush(&self) {
        let (value, subscribers) = {
            let mut cell = self.cell.borrow_mut();
            if !cell.dirty {
                return;
            }
            cell.dirty = false;
            let subscribers: Vec<Callback<T>> =
                cell.subscribers.iter().map(|(_, cb)| Rc::clone(cb)).collect();
            (cell.value.clone(), subscribers)
        };
        // The cell borrow is released so callbacks may read any cell, this one included
        for callback in subscribers {
            (&mut *callback.borrow_mut())(&value);
        }
    }

    /// Whether a staged value is waiting for [`flush`](Self::flush)
    #[cfg(test)]
    pub fn is_dirty(&self) -> bool {
        self.cell.borrow().dirty
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.cell.borrow().subscribers.len()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Replace the value if it differs; returns whether it changed.
    /// An unchanged value is never republished.
    pub fn stage(&self, value: T) -> bool {
        let mut cell = self.cell.borrow_mut();
        if cell.value == value {
            return false;
        }
        cell.value = value;
        cell.dirty = true;
        true
    }

    /// [`stage`](Self::stage) followed by [`flush`](Self::flush)
    pub fn set(&self, value: T) -> bool {
        let changed = self.stage(value);
        self.flush();
        changed
    }
}

impl<T: Clone + 'static> Watch<T> {
    pub fn get(&self) -> T {
        self.cell.borrow().value.clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.borrow().value)
    }

    /// Subscribe; `f` runs at once with the current value
    pub fn subscribe(&self, f: impl FnMut(&T) + 'static) -> Subscription {
        subscribe_cell(&self.cell, f)
    }
}

fn subscribe_cell<T: Clone + 'static>(
    cell: &Rc<RefCell<Cell<T>>>,
    f: impl FnMut(&T) + 'static,
) -> Subscription {
    let callback: Callback<T> = Rc::new(RefCell::new(f));
    let (id, current) = {
        let mut inner = cell.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, Rc::clone(&callback)));
        (id, inner.value.clone())
    };
    (&mut *callback.borrow_mut())(&current);

    let weak = Rc::downgrade(cell);
    Subscription {
        cancel: Some(Box::new(move || {
            if let Some(cell) = weak.upgrade() {
                cell.borrow_mut().subscribers.retain(|(sid, _)| *sid != id);
            }
        })),
    }
}

/// Subscription guard. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keep the subscription alive for as long as the source lives
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
