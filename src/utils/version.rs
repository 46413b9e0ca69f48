//! Version information helpers

/// Crate version as baked in at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the current version string
pub fn get_version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches_manifest() {
        assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
        assert!(!VERSION.is_empty());
    }
}
