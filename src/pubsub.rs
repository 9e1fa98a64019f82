//! Subscriber registry with explicit unsubscribe.
//!
//! Callbacks are invoked in subscription order.  A surface that goes away
//! (a settings panel, a status item) must hand its [`SubscriptionId`] back
//! via [`Subscribers::unsubscribe`], otherwise the callback lives as long as
//! the publisher.

use std::collections::BTreeMap;

/// Handle returned by [`Subscribers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

/// Ordered map from subscription handle to callback.
pub struct Subscribers<T> {
    next_id: u64,
    callbacks: BTreeMap<SubscriptionId, Callback<T>>,
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Subscribers<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            callbacks: BTreeMap::new(),
        }
    }

    /// Register a callback.  Ids are never reused.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.insert(id, Box::new(callback));
        id
    }

    /// Remove a callback.  Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.callbacks.remove(&id).is_some()
    }

    /// Invoke every callback, oldest subscription first.
    pub fn notify(&mut self, value: &T) {
        for callback in self.callbacks.values_mut() {
            callback(value);
        }
    }

    /// Invoke a single callback (used to replay current state to a new
    /// subscriber).
    pub fn notify_one(&mut self, id: SubscriptionId, value: &T) -> bool {
        match self.callbacks.get_mut(&id) {
            Some(callback) => {
                callback(value);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn notifies_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut subs = Subscribers::new();
        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            subs.subscribe(move |v: &u32| log.borrow_mut().push(format!("{tag}{v}")));
        }
        subs.notify(&7);
        assert_eq!(*log.borrow(), vec!["a7", "b7", "c7"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let hits = Rc::new(RefCell::new(0));
        let mut subs = Subscribers::new();
        let h = Rc::clone(&hits);
        let id = subs.subscribe(move |_: &()| *h.borrow_mut() += 1);
        subs.notify(&());
        assert!(subs.unsubscribe(id));
        subs.notify(&());
        assert_eq!(*hits.borrow(), 1);
        assert!(!subs.unsubscribe(id));
        assert!(subs.is_empty());
    }

    #[test]
    fn notify_one_targets_single_subscriber() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut subs = Subscribers::new();
        let l1 = Rc::clone(&log);
        subs.subscribe(move |v: &u8| l1.borrow_mut().push(("first", *v)));
        let l2 = Rc::clone(&log);
        let second = subs.subscribe(move |v: &u8| l2.borrow_mut().push(("second", *v)));
        assert!(subs.notify_one(second, &3));
        assert_eq!(*log.borrow(), vec![("second", 3)]);
    }
}
