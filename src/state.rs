use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};

use crate::error::Result;

/// Small reactive holder: subscribers run on every change of value.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

struct ObservableInner<T> {
    value: T,
    subscribers: Vec<Rc<dyn Fn(&T)>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Registers `f` and immediately applies it to the current value.
    pub fn subscribe<F: Fn(&T) + 'static>(&self, f: F) {
        let f: Rc<dyn Fn(&T)> = Rc::new(f);
        let value = self.get();
        self.inner.borrow_mut().subscribers.push(f.clone());
        f(&value);
    }

    pub fn set(&self, value: T) {
        let subscribers = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value.clone();
            inner.subscribers.clone()
        };
        for subscriber in subscribers {
            subscriber(&value);
        }
    }

    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.inner.borrow().value);
        self.set(next);
    }
}

/// One-shot initialization slot for a feature.
pub enum Slot<T> {
    Pending,
    /// Ran, but found nothing to enhance or failed to set up.
    Inactive,
    Active(T),
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Pending
    }
}

impl<T> Slot<T> {
    pub fn is_initialized(&self) -> bool {
        !matches!(self, Slot::Pending)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Slot::Active(_))
    }

    /// Runs `setup` the first time only; later calls are no-ops.
    pub fn init_with(&mut self, name: &str, setup: impl FnOnce() -> Result<Option<T>>) {
        if self.is_initialized() {
            return;
        }
        *self = match setup() {
            Ok(Some(handle)) => {
                debug!("{} enabled", name);
                Slot::Active(handle)
            }
            Ok(None) => {
                debug!("{}: nothing to enhance on this page", name);
                Slot::Inactive
            }
            Err(e) => {
                warn!("{} disabled: {}", name, e);
                Slot::Inactive
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnhanceError;
    use std::cell::Cell;

    #[test]
    fn slot_runs_setup_once() {
        let calls = Cell::new(0);
        let mut slot: Slot<u8> = Slot::default();
        for _ in 0..2 {
            slot.init_with("test", || {
                calls.set(calls.get() + 1);
                Ok(Some(7))
            });
        }
        assert_eq!(calls.get(), 1);
        assert!(slot.is_active());
    }

    #[test]
    fn missing_elements_and_errors_still_count_as_initialized() {
        let mut empty: Slot<u8> = Slot::default();
        empty.init_with("empty", || Ok(None));
        assert!(empty.is_initialized());
        assert!(!empty.is_active());

        let mut failed: Slot<u8> = Slot::default();
        failed.init_with("failed", || Err(EnhanceError::NoBody));
        assert!(failed.is_initialized());

        let ran_again = Cell::new(false);
        failed.init_with("failed", || {
            ran_again.set(true);
            Ok(Some(1))
        });
        assert!(!ran_again.get());
    }

    #[test]
    fn observable_notifies_only_on_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let open = Observable::new(false);
        {
            let seen = seen.clone();
            open.subscribe(move |v| seen.borrow_mut().push(*v));
        }
        open.set(false);
        open.update(|v| !v);
        open.set(true);
        open.set(false);
        assert_eq!(*seen.borrow(), vec![false, true, false]);
    }
}
