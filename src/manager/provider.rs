//! Late-bound accessors handed to the adapter.
//!
//! The adapter never captures a cache manager or default TTL at
//! construction; it calls an accessor each time it needs one. These two
//! holders produce such accessors.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;

/// Write-once slot for a shared dependency.
///
/// Accessors created before [`bind`](Self::bind) return `None` until the
/// value is bound.
pub struct Binding<T> {
    cell: Arc<OnceCell<Arc<T>>>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Send + Sync + 'static> Binding<T> {
    pub fn new() -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// Bind the value. Returns `false` if a value was already bound.
    pub fn bind(&self, value: Arc<T>) -> bool {
        self.cell.set(value).is_ok()
    }

    pub fn get(&self) -> Option<Arc<T>> {
        self.cell.get().cloned()
    }

    /// Accessor resolving the bound value at call time.
    pub fn provider(&self) -> impl Fn() -> Option<Arc<T>> + Send + Sync + use<T> {
        let cell = Arc::clone(&self.cell);
        move || cell.get().cloned()
    }
}

impl<T: Send + Sync + 'static> Default for Binding<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared value that may change while the process runs.
pub struct Setting<T> {
    value: Arc<RwLock<T>>,
}

impl<T> Clone for Setting<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Setting<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Arc::new(RwLock::new(value)),
        }
    }

    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    pub fn set(&self, value: T) {
        *self.value.write() = value;
    }

    /// Accessor reading the current value at call time.
    pub fn provider(&self) -> impl Fn() -> T + Send + Sync + use<T> {
        let value = Arc::clone(&self.value);
        move || value.read().clone()
    }
}
