//! Build script: embeds the release version string.
use std::process::Command;

fn main() {
    // PLATFORM_CONFIG_VERSION from the environment wins (release builds);
    // local builds fall back to git describe.
    if let Ok(version) = std::env::var("PLATFORM_CONFIG_VERSION") {
        println!("cargo:rustc-env=PLATFORM_CONFIG_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=PLATFORM_CONFIG_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=PLATFORM_CONFIG_VERSION");
}
