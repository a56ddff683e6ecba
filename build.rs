use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let hash = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_default();
    let commit_date = git(&["log", "-1", "--format=%cd", "--date=format:%Y-%m-%d"])
        .unwrap_or_default();

    // A release build sits exactly on a `v<version>` tag with a clean tree.
    let version = env!("CARGO_PKG_VERSION");
    let tagged = git(&["tag", "--points-at", "HEAD"])
        .map(|tags| tags.lines().any(|t| t == version || t == format!("v{}", version)))
        .unwrap_or(false);
    let dirty = git(&["status", "--porcelain"]).is_some_and(|s| !s.is_empty());

    println!("cargo:rustc-env=DKAPI_GIT_HASH={}", hash);
    println!("cargo:rustc-env=DKAPI_COMMIT_DATE={}", commit_date);
    println!("cargo:rustc-env=DKAPI_IS_RELEASE={}", tagged && !dirty);
}
