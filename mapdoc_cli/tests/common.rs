#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin;

pub fn mapdoc_cmd(dir: &Path) -> Command {
	let mut cmd = Command::new(cargo_bin("mapdoc"));
	cmd.env("NO_COLOR", "1")
		.env_remove("RUST_LOG")
		.current_dir(dir);
	cmd
}

pub fn write(dir: &Path, path: &str, content: &str) -> std::io::Result<()> {
	let path = dir.join(path);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}

pub fn read(dir: &Path, path: &str) -> std::io::Result<String> {
	std::fs::read_to_string(dir.join(path))
}
