//! Process-wide object pools.
//!
//! Encoders borrow their output buffer from a pool and decoders borrow their cursor state from
//! another one. An object is handed out by [`Pool::acquire`] wrapped in a [`Pooled`] guard, which
//! gives it back when it is dropped (or when `release` is called). Ownership guarantees that an
//! object is released at most once and that nobody holds a reference to it afterwards.

use core::fmt;
use core::ops::{Deref, DerefMut};

use parking_lot::{const_mutex, Mutex};
use tracing::{debug, trace};

/// Maximum number of idle objects kept by each pool. Objects released while the pool is full
/// are dropped.
pub const MAX_IDLE: usize = 64;

/// Buffers whose capacity grew beyond this many bytes are dropped on release instead of being
/// kept for reuse.
pub const MAX_RETAINED_CAPACITY: usize = 64 * 1024;

/// A pooled buffer, as returned by [`Encoder::into_buffer`](crate::Encoder::into_buffer).
pub type PooledBuffer = Pooled<Vec<u8>>;

pub(crate) static BUFFERS: Pool<Vec<u8>> = Pool::new("buffer");

/// Objects that can live in a [`Pool`].
pub trait Recycle: Default + Send + 'static {
    /// Returns the object to its empty state.
    fn reset(&mut self);

    /// Whether the object is worth keeping once released.
    fn retainable(&self) -> bool {
        true
    }
}

impl Recycle for Vec<u8> {
    fn reset(&mut self) {
        self.clear();
    }

    fn retainable(&self) -> bool {
        self.capacity() <= MAX_RETAINED_CAPACITY
    }
}

/// A free list of reusable objects, guarded by a mutex.
pub struct Pool<T> {
    name: &'static str,
    idle: Mutex<Vec<T>>,
}

impl<T> Pool<T> {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self {
            name,
            idle: const_mutex(Vec::new()),
        }
    }
}

impl<T: Recycle> Pool<T> {
    /// Takes an idle object, or creates a new one if there is none. The object is always reset
    /// before it is returned.
    pub(crate) fn acquire(&'static self) -> Pooled<T> {
        // The lock must not be held while allocating.
        let popped = self.idle.lock().pop();
        let mut value = match popped {
            Some(value) => value,
            None => {
                trace!(pool = self.name, "pool empty, allocating a new object");
                T::default()
            }
        };
        value.reset();
        Pooled {
            value: Some(value),
            pool: self,
        }
    }

    fn release(&self, mut value: T) {
        if !value.retainable() {
            debug!(pool = self.name, "discarding oversized object");
            return;
        }
        value.reset();

        let mut idle = self.idle.lock();
        if idle.len() < MAX_IDLE {
            idle.push(value);
        } else {
            drop(idle);
            debug!(pool = self.name, limit = MAX_IDLE, "pool full, dropping released object");
        }
    }

    #[cfg(test)]
    pub(crate) fn idle_len(&self) -> usize {
        self.idle.lock().len()
    }
}

/// An object on loan from a pool.
///
/// Dereferences to the pooled object. The object goes back to its pool when the guard is
/// dropped or [`release`](Pooled::release)d; use [`into_inner`](Pooled::into_inner) to keep it
/// instead.
pub struct Pooled<T: Recycle> {
    value: Option<T>,
    pool: &'static Pool<T>,
}

impl<T: Recycle> Pooled<T> {
    /// Returns the object to its pool.
    ///
    /// This is the same as dropping the guard; it exists to make the end of a loan visible at the
    /// call site.
    pub fn release(self) {
        drop(self);
    }

    /// Detaches the object from its pool. The pool will not get it back.
    pub fn into_inner(mut self) -> T {
        self.value.take().expect("pooled value is present until drop")
    }
}

impl Pooled<Vec<u8>> {
    /// The bytes currently held by the buffer.
    pub fn as_bytes(&self) -> &[u8] {
        self.as_slice()
    }

    /// Detaches the buffer from the pool and returns it as a plain `Vec<u8>`.
    pub fn into_vec(self) -> Vec<u8> {
        self.into_inner()
    }
}

impl<T: Recycle> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value.as_ref().expect("pooled value is present until drop")
    }
}

impl<T: Recycle> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value.as_mut().expect("pooled value is present until drop")
    }
}

impl<T: Recycle> Drop for Pooled<T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.release(value);
        }
    }
}

impl<T: Recycle + fmt::Debug> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pooled").field(&**self).finish()
    }
}
