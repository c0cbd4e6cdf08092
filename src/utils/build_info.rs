//! Compile-time build information, generated by build.rs.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Version string shown by `--version`.
pub fn version_string() -> String {
    format!("{} ({} {})", env!("CARGO_PKG_VERSION"), BUILD_DATE, BUILD_COMMIT)
}
