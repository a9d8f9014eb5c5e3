//! Callback props and call-recording mocks.

use std::cell::RefCell;
use std::rc::Rc;

/// A callback prop, as passed from parent to child component.
pub type Callback<T> = Rc<dyn Fn(T)>;

/// A callback that ignores its argument.
pub fn noop<T: 'static>() -> Callback<T> {
    Rc::new(|_| {})
}

/// Records every invocation of the callbacks it hands out.
#[derive(Debug)]
pub struct MockFn<T> {
    calls: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for MockFn<T> {
    fn clone(&self) -> Self {
        MockFn {
            calls: Rc::clone(&self.calls),
        }
    }
}

impl<T> Default for MockFn<T> {
    fn default() -> Self {
        MockFn {
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T: Clone + 'static> MockFn<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callback(&self) -> Callback<T> {
        let calls = Rc::clone(&self.calls);
        Rc::new(move |value| calls.borrow_mut().push(value))
    }

    pub fn calls(&self) -> Vec<T> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn was_called(&self) -> bool {
        !self.calls.borrow().is_empty()
    }

    pub fn last_call(&self) -> Option<T> {
        self.calls.borrow().last().cloned()
    }
}

impl<T: Clone + PartialEq + 'static> MockFn<T> {
    pub fn was_called_with(&self, expected: &T) -> bool {
        self.calls.borrow().iter().any(|call| call == expected)
    }
}
