//! # terminus-core
//!
//! Last-resort failure handling. Once a caller has decided the process
//! cannot continue, this crate formats one diagnostic line describing the
//! failure site, hands it to the registered notification callback and
//! aborts the process.
//!
//! Nothing here returns to the caller. There is no unwinding, no cleanup and
//! no retry.
//!
//! # Usage
//!
//! ```ignore
//! use std::ffi::CStr;
//!
//! fn on_crash(message: &CStr) {
//!     // forward to a crash reporter
//! }
//!
//! terminus_core::set_termination_notification_callback(Some(on_crash));
//! terminus_core::terminate!("assertion failed", "expected" => 5, "actual" => 7);
//! ```

pub mod context;
pub mod format;
#[macro_use]
pub mod macros;
pub mod registry;
pub mod terminate;
pub mod value;
pub mod version;

pub use context::{ContextError, Details, DiagnosticContext, Pair, PairArray, Site};
pub use format::{format_diagnostic, write_diagnostic, FormattedMessage};
pub use registry::{set_termination_notification_callback, CallbackRegistry, TerminationCallback};
pub use terminate::{
    hard_stop, install_process_options, terminate, terminate_context, terminate_with_info,
    terminate_with_pairs, HaltFn, Terminator, TerminatorOptions,
};
#[doc(hidden)]
pub use terminate::__values;
pub use value::{IntoValue, Value};
pub use version::VERSION_TAG;
