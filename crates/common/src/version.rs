use std::fmt;

use serde::Serialize;

/// Compile-time information about this build, populated by `build.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub crate_version: &'static str,
    pub build_profile: &'static str,
    pub build_timestamp: &'static str,
    pub rust_version: &'static str,
    pub target: &'static str,
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("TREEFS_REPO_VERSION"),
        crate_version: env!("CARGO_PKG_VERSION"),
        build_profile: env!("TREEFS_BUILD_PROFILE"),
        build_timestamp: env!("TREEFS_BUILD_TIMESTAMP"),
        rust_version: env!("TREEFS_RUST_VERSION"),
        target: env!("TREEFS_BUILD_TARGET"),
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "treefs {} ({}, {} build for {}, built {} with {})",
            self.crate_version,
            self.version,
            self.build_profile,
            self.target,
            self.build_timestamp,
            self.rust_version
        )
    }
}
