//! Sets `WPSAN_VERSION` for `wpsan --version`.
//!
//! Release builds are tagged `vX.Y.Z`; anything else reports the nearest tag
//! plus commit, or the package version outside a git checkout.

use std::path::Path;
use std::process::Command;

fn git_version(workspace: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["describe", "--tags", "--always", "--dirty=-dev"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let described = String::from_utf8(out.stdout).ok()?;
    let described = described.trim().trim_start_matches('v');
    (!described.is_empty()).then(|| described.to_string())
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
    let workspace = Path::new(&manifest_dir).join("../..");

    println!(
        "cargo:rerun-if-changed={}",
        workspace.join(".git/HEAD").display()
    );

    let version =
        git_version(&workspace).unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    println!("cargo:rustc-env=WPSAN_VERSION={version}");
}
