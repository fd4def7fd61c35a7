//! Command: print version information.

/// Version baked in by `build.rs`, or the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("PLATFORM_CONFIG_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the platform-config version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("platform-config {}", version());
}
