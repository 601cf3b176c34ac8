//! Shared value cells that setters write into.
//!
//! The program keeps one handle and gives a clone to the setter it
//! registers; after resolution the program reads the final value through its
//! own handle. Resolution is single-threaded so `Rc<RefCell<_>>` suffices.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A shared, mutable value bound to a parameter.
///
/// # Examples
///
/// ```
/// use paramset::Binding;
///
/// let count = Binding::new(3);
/// let handle = count.clone();
/// handle.set(7);
/// assert_eq!(count.get(), 7);
/// ```
pub struct Binding<T>(Rc<RefCell<T>>);

impl<T> Binding<T> {
    /// Creates a binding holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self(Rc::new(RefCell::new(initial)))
    }

    /// Replaces the value.
    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    /// Replaces the value and returns the previous one.
    pub fn replace(&self, value: T) -> T {
        self.0.replace(value)
    }

    /// Calls `f` with a reference to the value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }

    /// Calls `f` with a mutable reference to the value.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }
}

impl<T: Clone> Binding<T> {
    /// Returns a copy of the value.
    #[must_use]
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T: Default> Binding<T> {
    /// Takes the value, leaving the default in its place.
    #[must_use]
    pub fn take(&self) -> T {
        self.0.take()
    }
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Default> Default for Binding<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Binding").field(&self.0.borrow()).finish()
    }
}
