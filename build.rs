use std::{
    env,
    process::Command,
    time::{SystemTime, UNIX_EPOCH},
};

/// Packagers building from a tarball can pin the version with this variable.
const OVERRIDE_VAR: &str = "SUMOAPI_BUILD_VERSION";

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-env-changed={}", OVERRIDE_VAR);

    let version = env::var(OVERRIDE_VAR)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(git_version)
        .unwrap_or_else(fallback_version);

    println!("cargo:rustc-env=SUMOAPI_VERSION={}", version);
}

/// `git describe` output with the tag's `v` prefix removed. A dirty tree
/// gets a build timestamp so two local builds never share a version.
fn git_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;

    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();
    let version = described.strip_prefix('v').unwrap_or(described);

    match version {
        "" => None,
        v if v.ends_with("-dirty") => Some(format!("{}-{}", v, timestamp())),
        v => Some(v.to_string()),
    }
}

/// Outside a git checkout: the manifest version tagged as unknown.
fn fallback_version() -> String {
    let manifest = env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let base = manifest.strip_suffix("-dev").unwrap_or(&manifest);
    format!("{}-unknown-{}", base, timestamp())
}

fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
