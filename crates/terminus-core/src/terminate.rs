//! The termination sequence: format, notify, halt.
//!
//! Every entry point here diverges. Concurrent calls from several threads
//! are not serialized against each other; each one formats its own line,
//! notifies the callback it snapshotted and halts. Whichever thread reaches
//! the halt first ends the process for all of them.

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use once_cell::sync::OnceCell;
use tracing::error;

use crate::context::{DiagnosticContext, PairArray, Site};
use crate::format::{format_diagnostic, FormattedMessage};
use crate::registry::CallbackRegistry;
use crate::value::{IntoValue, Value};

/// Primitive that stops the process. Must not return.
pub type HaltFn = fn() -> !;

/// Options installed once at startup. Defaults apply until then.
static PROCESS_OPTIONS: OnceCell<TerminatorOptions> = OnceCell::new();

/// Abort the process: no unwinding, no destructors, no atexit handlers.
pub fn hard_stop() -> ! {
    // SAFETY: abort has no preconditions.
    unsafe { libc::abort() }
}

#[derive(Clone, Copy)]
pub struct TerminatorOptions {
    /// Write the formatted line to stderr after notifying.
    pub echo_stderr: bool,
    /// Emit a structured `tracing` error event.
    pub log_event: bool,
    /// Attach a captured backtrace to the log event (never to the callback text).
    pub capture_backtrace: bool,
    pub halt: HaltFn,
}

impl Default for TerminatorOptions {
    fn default() -> Self {
        Self {
            echo_stderr: cfg!(debug_assertions),
            log_event: true,
            capture_backtrace: false,
            halt: hard_stop,
        }
    }
}

impl fmt::Debug for TerminatorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminatorOptions")
            .field("echo_stderr", &self.echo_stderr)
            .field("log_event", &self.log_event)
            .field("capture_backtrace", &self.capture_backtrace)
            .finish_non_exhaustive()
    }
}

/// Install the options used by the process terminator.
///
/// Only the first call takes effect; later calls return the rejected value.
pub fn install_process_options(options: TerminatorOptions) -> Result<(), TerminatorOptions> {
    PROCESS_OPTIONS.set(options)
}

/// Runs termination sequences against one registry.
#[derive(Debug, Clone, Copy)]
pub struct Terminator<'r> {
    registry: &'r CallbackRegistry,
    options: TerminatorOptions,
}

impl Terminator<'static> {
    /// Terminator bound to the process registry and the installed options.
    pub fn process() -> Self {
        Self {
            registry: CallbackRegistry::process(),
            options: PROCESS_OPTIONS.get().copied().unwrap_or_default(),
        }
    }
}

impl<'r> Terminator<'r> {
    pub fn new(registry: &'r CallbackRegistry, options: TerminatorOptions) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &TerminatorOptions {
        &self.options
    }

    /// Format `ctx`, notify the registered callback and halt.
    ///
    /// Nothing raised on the way (callback, log sink, stderr) reaches the
    /// caller; the halt always runs.
    pub fn terminate(&self, ctx: &DiagnosticContext<'_>) -> ! {
        contain(|| self.notify(ctx));
        (self.options.halt)()
    }

    fn notify(&self, ctx: &DiagnosticContext<'_>) {
        let message = format_diagnostic(ctx);
        let callback = self.registry.get();

        if let Some(callback) = callback {
            // A panicking callback counts as no callback.
            contain(|| callback(message.as_c_str()));
        }
        if self.options.echo_stderr {
            write_stderr(message.as_bytes());
        }
        if self.options.log_event {
            let capture_backtrace = self.options.capture_backtrace;
            contain(|| log_event(ctx, &message, callback.is_some(), capture_backtrace));
        }
    }
}

/// Run `f`, swallowing any panic. The payload is leaked rather than dropped
/// so a panicking `Drop` on it cannot escape either.
fn contain(f: impl FnOnce()) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(f)) {
        std::mem::forget(payload);
    }
}

fn write_stderr(mut bytes: &[u8]) {
    while !bytes.is_empty() {
        // SAFETY: `bytes` is a live slice for the duration of the call.
        let n = unsafe { libc::write(2, bytes.as_ptr().cast(), bytes.len()) };
        if n <= 0 {
            return;
        }
        bytes = &bytes[n as usize..];
    }
}

fn log_event(
    ctx: &DiagnosticContext<'_>,
    message: &FormattedMessage,
    has_callback: bool,
    capture_backtrace: bool,
) {
    let current = std::thread::current();
    let thread = current.name().unwrap_or("<unnamed>");
    let text = message.as_str().trim_end();

    if capture_backtrace {
        let backtrace = Backtrace::force_capture();
        error!(
            component = "FATAL",
            file = ctx.site.file,
            line = ctx.site.line,
            version = ctx.version,
            thread,
            callback = has_callback,
            backtrace = %backtrace,
            "{text}"
        );
    } else {
        error!(
            component = "FATAL",
            file = ctx.site.file,
            line = ctx.site.line,
            version = ctx.version,
            thread,
            callback = has_callback,
            "{text}"
        );
    }
}

/// Basic form: `<file>:<line>: <version> <message>\n`.
pub fn terminate(message: &str, file: &str, line: u32) -> ! {
    Terminator::process().terminate(&DiagnosticContext::new(message, Site::new(file, line)))
}

/// Bracketed form with 1 to 3 `name: value` pairs.
pub fn terminate_with_pairs<'a, P: PairArray<'a>>(
    message: &'a str,
    file: &'a str,
    line: u32,
    pairs: P,
) -> ! {
    let ctx = DiagnosticContext::new(message, Site::new(file, line)).with_pairs(pairs);
    Terminator::process().terminate(&ctx)
}

/// Named form: ` with <names> = (<values>). `.
pub fn terminate_with_info<'a, I>(
    message: &'a str,
    file: &'a str,
    line: u32,
    names: &'a str,
    values: I,
) -> !
where
    I: IntoIterator,
    I::Item: IntoValue<'a>,
{
    let ctx = DiagnosticContext::new(message, Site::new(file, line)).with_named(names, values);
    Terminator::process().terminate(&ctx)
}

/// Run the sequence for an already built context.
pub fn terminate_context(ctx: &DiagnosticContext<'_>) -> ! {
    Terminator::process().terminate(ctx)
}

#[doc(hidden)]
pub fn __values<'a, const N: usize>(values: [Value<'a>; N]) -> Vec<Value<'a>> {
    values.into()
}
