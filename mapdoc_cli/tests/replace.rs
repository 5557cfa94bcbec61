mod common;

use mapdoc_core::AnyEmptyResult;
use similar_asserts::assert_eq;

#[test]
fn replace_rewrites_stale_documents() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "readme.md", "# Readme\nmapfile:a.txt\nold\nmapfile.end\n")?;
	common::write(tmp.path(), "a.txt", "new\n")?;

	common::mapdoc_cmd(tmp.path())
		.args(["--replace", "readme.md"])
		.assert()
		.success()
		.stdout(predicates::str::contains("Updated 1 file(s)."));

	assert_eq!(
		common::read(tmp.path(), "readme.md")?,
		"# Readme\nmapfile:a.txt\nnew\nmapfile.end\n"
	);

	Ok(())
}

#[test]
fn replace_leaves_no_temporary_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "readme.md", "mapfile:a.txt\nmapfile.end\n")?;
	common::write(tmp.path(), "a.txt", "a\n")?;

	common::mapdoc_cmd(tmp.path())
		.args(["-r", "readme.md"])
		.assert()
		.success();

	let mut names: Vec<String> = std::fs::read_dir(tmp.path())?
		.map(|entry| entry.map(|entry| entry.file_name().to_string_lossy().into_owned()))
		.collect::<Result<_, _>>()?;
	names.sort();
	assert_eq!(names, vec!["a.txt".to_string(), "readme.md".to_string()]);

	Ok(())
}

#[test]
fn replace_reports_up_to_date_documents() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "readme.md", "mapfile:a.txt\na\nmapfile.end\n")?;
	common::write(tmp.path(), "a.txt", "a\n")?;

	common::mapdoc_cmd(tmp.path())
		.args(["--replace", "readme.md"])
		.assert()
		.success()
		.stdout(predicates::str::contains("already up to date"));

	Ok(())
}

#[test]
fn replace_resolves_embeds_relative_to_each_document() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "docs/guide.md", "mapfile:snippets/run.sh\nmapfile.end\n")?;
	common::write(tmp.path(), "docs/snippets/run.sh", "cargo run\n")?;
	common::write(tmp.path(), "readme.md", "mapfile:docs/snippets/run.sh\nmapfile.end\n")?;

	common::mapdoc_cmd(tmp.path())
		.args(["--replace", "--glob", "**/*.md"])
		.assert()
		.success()
		.stdout(predicates::str::contains("Updated 2 file(s)."));

	assert_eq!(
		common::read(tmp.path(), "docs/guide.md")?,
		"mapfile:snippets/run.sh\ncargo run\nmapfile.end\n"
	);
	assert_eq!(
		common::read(tmp.path(), "readme.md")?,
		"mapfile:docs/snippets/run.sh\ncargo run\nmapfile.end\n"
	);

	Ok(())
}

#[test]
fn replace_writes_nothing_when_any_document_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "good.md", "mapfile:a.txt\nmapfile.end\n")?;
	common::write(tmp.path(), "bad.md", "mapfile:missing.txt\nmapfile.end\n")?;
	common::write(tmp.path(), "a.txt", "a\n")?;

	common::mapdoc_cmd(tmp.path())
		.args(["--replace", "good.md", "bad.md"])
		.assert()
		.code(2)
		.stderr(predicates::str::contains("missing.txt"));

	assert_eq!(
		common::read(tmp.path(), "good.md")?,
		"mapfile:a.txt\nmapfile.end\n"
	);

	Ok(())
}

#[cfg(unix)]
#[test]
fn replace_keeps_file_permissions() -> AnyEmptyResult {
	use std::os::unix::fs::PermissionsExt;

	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "run.sh", "#!/bin/sh\n# mapfile:cmd.txt\n# mapfile.end\n")?;
	common::write(tmp.path(), "cmd.txt", "echo hi\n")?;
	let script = tmp.path().join("run.sh");
	std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;

	common::mapdoc_cmd(tmp.path())
		.args(["--replace", "run.sh"])
		.assert()
		.success()
		.stdout(predicates::str::contains("Updated 1 file(s)."));

	assert_eq!(
		common::read(tmp.path(), "run.sh")?,
		"#!/bin/sh\n# mapfile:cmd.txt\necho hi\n# mapfile.end\n"
	);
	assert_eq!(std::fs::metadata(&script)?.permissions().mode() & 0o777, 0o755);

	Ok(())
}

#[cfg(unix)]
#[test]
fn replace_writes_through_symlinks() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "real.md", "mapfile:a.txt\nmapfile.end\n")?;
	common::write(tmp.path(), "a.txt", "a\n")?;
	std::os::unix::fs::symlink("real.md", tmp.path().join("link.md"))?;

	common::mapdoc_cmd(tmp.path())
		.args(["--replace", "link.md"])
		.assert()
		.success();

	assert!(std::fs::symlink_metadata(tmp.path().join("link.md"))?.file_type().is_symlink());
	assert_eq!(
		common::read(tmp.path(), "real.md")?,
		"mapfile:a.txt\na\nmapfile.end\n"
	);

	Ok(())
}
