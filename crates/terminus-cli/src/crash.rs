//! `terminus crash`: deliberately run the termination sequence.
//!
//! Used to check crash-log harvesting end to end. Argument errors are
//! reported normally; once the context is built the process aborts.

use std::ffi::CStr;
use std::io::Write;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use terminus_config::{log_cli_debug, log_fatal_error};
use terminus_core::{
    set_termination_notification_callback, terminate_context, Details, DiagnosticContext, Site,
    Value,
};

#[derive(Args, Debug)]
pub struct CrashArgs {
    /// Failure message
    #[arg(short, long, default_value = "crash drill")]
    pub message: String,

    /// Source file reported in the diagnostic
    #[arg(long, default_value = "terminus-cli")]
    pub file: String,

    /// Source line reported in the diagnostic
    #[arg(long, default_value_t = 0)]
    pub line: u32,

    /// Context pair as NAME=VALUE (repeat up to three times)
    #[arg(short, long, value_name = "NAME=VALUE")]
    pub detail: Vec<String>,

    /// Pre-joined label string for the named form
    #[arg(long, conflicts_with = "detail")]
    pub named: Option<String>,

    /// Value for the named form (repeatable)
    #[arg(long = "value", requires = "named")]
    pub values: Vec<String>,

    /// Register a callback that prints the diagnostic to stdout
    #[arg(long)]
    pub callback: bool,

    /// Register a callback that panics
    #[arg(long, conflicts_with = "callback")]
    pub panicking_callback: bool,

    /// Number of threads racing to terminate
    #[arg(long, default_value_t = 1)]
    pub threads: usize,
}

fn print_callback(message: &CStr) {
    let mut out = std::io::stdout().lock();
    let _ = out.write_all(b"callback: ");
    let _ = out.write_all(message.to_bytes());
    let _ = out.flush();
}

fn panicking_callback(_: &CStr) {
    panic!("termination callback failed");
}

/// Parse a CLI token into the narrowest matching value kind.
pub fn parse_value(raw: &str) -> Value<'static> {
    if let Ok(v) = raw.parse::<i64>() {
        return Value::Int(v);
    }
    if let Ok(v) = raw.parse::<u64>() {
        return Value::UInt(v);
    }
    if let Some(hex) = raw.strip_prefix("0x") {
        if let Ok(addr) = usize::from_str_radix(hex, 16) {
            return Value::Address(addr);
        }
    }
    if let Ok(v) = raw.parse::<bool>() {
        return Value::Bool(v);
    }
    if let Ok(v) = raw.parse::<f64>() {
        return Value::Float(v);
    }
    Value::Str(raw.to_owned().into())
}

fn build_details(args: &CrashArgs) -> Result<Details<'static>> {
    if let Some(names) = &args.named {
        let values: Vec<Value<'static>> = args.values.iter().map(|v| parse_value(v)).collect();
        return Ok(Details::named(names.clone(), values));
    }
    if args.detail.is_empty() {
        return Ok(Details::None);
    }

    let mut tokens = Vec::with_capacity(args.detail.len() * 2);
    for detail in &args.detail {
        let (name, value) = detail
            .split_once('=')
            .ok_or_else(|| anyhow!("detail must be NAME=VALUE, got {detail:?}"))?;
        tokens.push(Value::Str(name.to_owned().into()));
        tokens.push(parse_value(value));
    }
    Details::from_tokens(tokens).context("too many --detail pairs")
}

pub fn run(args: CrashArgs) -> Result<()> {
    let details = build_details(&args)?;

    if args.callback {
        set_termination_notification_callback(Some(print_callback));
        log_cli_debug!("Termination callback installed", kind = "print");
    } else if args.panicking_callback {
        set_termination_notification_callback(Some(panicking_callback));
        log_cli_debug!("Termination callback installed", kind = "panicking");
    }

    let line = args.line;
    log_fatal_error!("Crash drill starting", threads = args.threads, line = line);

    // Leaked so racing threads can share the context; the process is about to end.
    let args: &'static CrashArgs = Box::leak(Box::new(args));
    let ctx: &'static DiagnosticContext<'static> = Box::leak(Box::new(
        DiagnosticContext::new(&args.message, Site::new(&args.file, args.line))
            .with_details(details),
    ));

    for _ in 1..args.threads.max(1) {
        std::thread::spawn(move || terminate_context(ctx));
    }
    terminate_context(ctx)
}
