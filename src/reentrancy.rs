//! Debug-only guard against nested entry into a table operation.
//!
//! A `ChainedHashTable` scan calls user `Hash`/`Eq` code while a bucket is
//! being walked. If that code reaches back into the same table, the nested
//! call panics in debug builds. Release builds carry no state at all, so the
//! guard has no effect on the timing of table operations.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-table busy flag. Public operations open a section with
/// `let _g = self.reentrancy.enter();`.
#[derive(Debug)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    busy: Cell<bool>,
    // Tables are single-threaded; keep the owner !Send + !Sync.
    _single_thread: PhantomData<*mut ()>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            busy: Cell::new(false),
            _single_thread: PhantomData,
        }
    }

    /// Open a guarded section. Panics in debug builds if one is already open.
    #[inline]
    pub(crate) fn enter(&self) -> Section<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.busy.replace(true),
                "reentrancy detected: table operation started inside another"
            );
            Section { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            Section { _owner: PhantomData }
        }
    }

    /// Whether a section is currently open. Always false in release builds.
    #[cfg(test)]
    pub(crate) fn is_busy(&self) -> bool {
        #[cfg(debug_assertions)]
        {
            self.busy.get()
        }
        #[cfg(not(debug_assertions))]
        {
            false
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII section handle; closing it clears the busy flag.
pub(crate) struct Section<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _owner: PhantomData<&'a ()>,
}

impl Drop for Section<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let was_busy = self.owner.busy.replace(false);
            debug_assert!(was_busy);
        }
    }
}
