//! Process-wide slot for the termination notification callback.
//!
//! The slot is a single `AtomicPtr`: `set` is one release store and the
//! terminator reads it with one acquire load, so a reader always observes
//! either the previous or the new callback, never a mix of both. Nothing is
//! allocated on either path.

use std::ffi::CStr;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

/// Hook invoked with the formatted diagnostic line right before the process
/// halts.
///
/// The callback may run on several threads at once when more than one thread
/// terminates concurrently, so it must be reentrant. It must not panic; if it
/// does anyway the panic is swallowed and the halt proceeds.
pub type TerminationCallback = fn(message: &CStr);

static PROCESS: CallbackRegistry = CallbackRegistry::new();

/// Holder of at most one active [`TerminationCallback`].
///
/// Last writer wins. There is no chaining: replacing the callback drops the
/// previous reference.
#[derive(Debug)]
pub struct CallbackRegistry {
    slot: AtomicPtr<()>,
}

impl CallbackRegistry {
    /// Empty registry (notification disabled).
    pub const fn new() -> Self {
        Self {
            slot: AtomicPtr::new(ptr::null_mut()),
        }
    }

    /// The registry consulted by [`crate::terminate`] and the `terminate!`
    /// macros. Starts empty at process start.
    pub fn process() -> &'static CallbackRegistry {
        &PROCESS
    }

    /// Replace the active callback. `None` disables notification.
    ///
    /// A single atomic store: no allocation, no logging, no failure mode.
    pub fn set(&self, callback: Option<TerminationCallback>) {
        let raw = match callback {
            Some(cb) => cb as *mut (),
            None => ptr::null_mut(),
        };
        self.slot.store(raw, Ordering::Release);
    }

    /// Equivalent to `set(None)`.
    pub fn clear(&self) {
        self.set(None);
    }

    /// Whether a callback is currently installed.
    pub fn is_set(&self) -> bool {
        !self.slot.load(Ordering::Acquire).is_null()
    }

    /// Snapshot of the active callback for one termination sequence.
    pub(crate) fn get(&self) -> Option<TerminationCallback> {
        let raw = self.slot.load(Ordering::Acquire);
        if raw.is_null() {
            return None;
        }
        // SAFETY: `set` is the only writer and it only stores pointers cast
        // from a `TerminationCallback`, which has the same size as `*mut ()`.
        Some(unsafe { std::mem::transmute::<*mut (), TerminationCallback>(raw) })
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Install `callback` in the process registry. `None` clears it.
pub fn set_termination_notification_callback(callback: Option<TerminationCallback>) {
    CallbackRegistry::process().set(callback);
}
