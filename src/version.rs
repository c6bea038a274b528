//! Version information.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent style identifier: `munin/{version}`.
pub fn version_string() -> String {
    format!("{}/{PKG_VERSION}", env!("CARGO_PKG_NAME"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_contains_pkg_version() {
        let version = version_string();
        assert!(version.starts_with("munin/"));
        assert!(
            version.ends_with(PKG_VERSION),
            "version should end with pkg version"
        );
    }
}
