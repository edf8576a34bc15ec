use std::process::Command;

/// Embeds the short git SHA as PASSBOOK_BUILD_SHA for `passbook --version`.
fn main() {
    let workspace = concat!(env!("CARGO_MANIFEST_DIR"), "/..");
    println!("cargo:rerun-if-changed={workspace}/.git/HEAD");

    let sha = Command::new("git")
        .args(["-C", workspace, "rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=PASSBOOK_BUILD_SHA={sha}");
}
