use std::sync::Arc;

use parking_lot::RwLock;

pub type Atomic<T> = Arc<RwLock<T>>;

#[inline]
pub fn atomic<T>(t: T) -> Atomic<T> {
    Arc::new(RwLock::new(t))
}

pub trait ReadExecutor<T: ?Sized> {
    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R;
}

impl<T> ReadExecutor<T> for Atomic<T> {
    #[inline]
    fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let read_guard = self.read();
        f(&*read_guard)
    }
}

pub trait WriteExecutor<T: ?Sized> {
    fn write_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;
}

impl<T> WriteExecutor<T> for Atomic<T> {
    #[inline]
    fn write_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut write_guard = self.write();
        f(&mut *write_guard)
    }
}

/// Reads a lazily initialized slot, filling it with `init` on first use.
///
/// `init` runs with no lock held, so it may read the slot's owner again.
/// When two callers race on an empty slot, the first stored value wins and
/// the other one is dropped.
pub fn get_or_init<T: Clone>(slot: &Atomic<Option<T>>, init: impl FnOnce() -> T) -> T {
    if let Some(value) = slot.read_with(|it| it.clone()) {
        return value;
    }
    let value = init();
    slot.write_with(|it| it.get_or_insert(value).clone())
}
