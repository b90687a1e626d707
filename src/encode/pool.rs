use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

/// State that can be returned to a pristine condition without reallocating.
pub trait Reset {
    fn reset(&mut self);
}

/// A thread-safe pool of reusable objects.
///
/// [`Pool::take`] hands out an idle object (reset first) or creates a new one;
/// the returned guard puts it back when dropped, including on early returns and
/// unwinding.
pub struct Pool<T> {
    idle: Mutex<Vec<T>>,
    create: Box<dyn Fn() -> T + Send + Sync>,
}

impl<T: Reset> Pool<T> {
    pub fn new(create: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            create: Box::new(create),
        }
    }

    pub fn take(&self) -> Pooled<'_, T> {
        let idle = self.lock().pop();
        let item = match idle {
            Some(mut item) => {
                item.reset();
                item
            }
            None => (self.create)(),
        };
        Pooled {
            pool: self,
            item: Some(item),
        }
    }

    /// Number of objects waiting to be reused.
    pub fn idle(&self) -> usize {
        self.lock().len()
    }

    fn give_back(&self, item: T) {
        self.lock().push(item);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<T>> {
        // The vector stays consistent even if a holder panicked.
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> std::fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool").finish_non_exhaustive()
    }
}

/// An object borrowed from a [`Pool`].
pub struct Pooled<'a, T: Reset> {
    pool: &'a Pool<T>,
    item: Option<T>,
}

impl<T: Reset> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.item.as_ref().expect("pooled item is present until drop")
    }
}

impl<T: Reset> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.item.as_mut().expect("pooled item is present until drop")
    }
}

impl<T: Reset> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.give_back(item);
        }
    }
}
