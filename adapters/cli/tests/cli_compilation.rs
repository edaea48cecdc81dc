use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "seedfinder"])
        .status()
        .expect("failed to invoke cargo check for seedfinder CLI binary");

    assert!(status.success(), "cargo check --bin seedfinder should succeed");
}

#[test]
fn jump_prints_skip_constants() {
    let output = Command::new(env!("CARGO_BIN_EXE_seedfinder"))
        .args(["jump", "--steps", "2"])
        .output()
        .expect("failed to run seedfinder");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "steps 2: multiplier 1117952617 increment 1406932606"
    );
}

#[test]
fn missing_level_file_exits_with_failure() {
    let output = Command::new(env!("CARGO_BIN_EXE_seedfinder"))
        .args([
            "verify",
            "--level",
            "does-not-exist.dat",
            "--route",
            "does-not-exist.txt",
        ])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run seedfinder");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read level"));
}
