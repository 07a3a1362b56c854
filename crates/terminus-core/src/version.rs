//! Build tag interpolated into every diagnostic line.

/// Opaque version chunk, e.g. `[terminus-core-0.1.0]`.
///
/// Set `TERMINUS_VERSION_TAG` at build time to override it; the value is
/// used verbatim.
pub const VERSION_TAG: &str = match option_env!("TERMINUS_VERSION_TAG") {
    Some(tag) => tag,
    None => concat!("[terminus-core-", env!("CARGO_PKG_VERSION"), "]"),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_tag_not_empty() {
        assert!(!VERSION_TAG.is_empty());
        assert!(!VERSION_TAG.contains('\n'));
    }
}
