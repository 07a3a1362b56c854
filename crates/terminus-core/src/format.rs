//! Text layout of a diagnostic line.
//!
//! Three layouts, kept byte-exact because crash-log scrapers match on them:
//!
//! ```text
//! <file>:<line>: <version> <message>\n
//! <file>:<line>: <version> <message> [<name1>: <value1>, <name2>: <value2>]\n
//! <file>:<line>: <version> <message> with <names> = (<value1>, <value2>). \n
//! ```

use std::ffi::{CStr, CString};
use std::fmt::{self, Write};

use crate::context::{Details, DiagnosticContext};

/// Immutable, newline-terminated diagnostic text.
///
/// Also NUL-terminated so it can be handed to the callback as a `&CStr`.
/// Interior NUL bytes in the inputs are written as the two characters `\0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedMessage {
    text: CString,
}

impl FormattedMessage {
    pub fn as_str(&self) -> &str {
        // SAFETY: built from a `String` in `format_diagnostic`.
        unsafe { std::str::from_utf8_unchecked(self.text.as_bytes()) }
    }

    pub fn as_c_str(&self) -> &CStr {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

impl fmt::Display for FormattedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for FormattedMessage {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Render `ctx` into its diagnostic line.
pub fn format_diagnostic(ctx: &DiagnosticContext<'_>) -> FormattedMessage {
    let mut text = String::with_capacity(128);
    // Writing into a String cannot fail.
    let _ = write_diagnostic(&mut text, ctx);

    if text.contains('\0') {
        text = text.replace('\0', "\\0");
    }
    // SAFETY: interior NUL bytes were escaped above.
    let text = unsafe { CString::from_vec_unchecked(text.into_bytes()) };
    FormattedMessage { text }
}

/// Write the diagnostic line for `ctx`, including the trailing newline.
pub fn write_diagnostic(out: &mut impl Write, ctx: &DiagnosticContext<'_>) -> fmt::Result {
    write!(
        out,
        "{}:{}: {} {}",
        ctx.site.file, ctx.site.line, ctx.version, ctx.message
    )?;

    match &ctx.details {
        Details::None => out.write_char('\n'),
        Details::Pairs(list) => {
            out.write_str(" [")?;
            for (i, pair) in list.as_slice().iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                pair.name.write_label(out)?;
                write!(out, ": {}", pair.value)?;
            }
            out.write_str("]\n")
        }
        Details::Named { names, values } => {
            write!(out, " with {names} = (")?;
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                write!(out, "{value}")?;
            }
            out.write_str("). \n")
        }
    }
}
