use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

use h5refs_testkit::{fixture_path as shared_fixture_path, target_dir as workspace_target_dir};

static H5REFS_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn fixture_path(name: &str) -> PathBuf {
	shared_fixture_path(name)
}

pub(crate) fn fixture_arg(name: &str) -> String {
	fixture_path(name).display().to_string()
}

pub(crate) fn run_h5refs(args: &[&str]) -> Output {
	Command::new(h5refs_bin())
		.args(args)
		.env_remove("RUST_LOG")
		.output()
		.expect("h5refs command executes")
}

pub(crate) fn run_h5refs_json(args: &[&str]) -> serde_json::Value {
	let output = run_h5refs(args);
	assert!(
		output.status.success(),
		"h5refs command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn h5refs_bin() -> &'static PathBuf {
	H5REFS_BIN.get_or_init(resolve_h5refs_bin)
}

fn resolve_h5refs_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_h5refs") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let mut bin = workspace_target_dir().join("debug");
	bin.push(if cfg!(windows) { "h5refs.exe" } else { "h5refs" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "h5refs"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build h5refs binary at {}", bin.display());

	bin
}
