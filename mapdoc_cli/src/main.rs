use std::collections::HashSet;
use std::fmt::Display;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use clap::Parser;
use globset::GlobBuilder;
use ignore::WalkBuilder;
use mapdoc_cli::MapdocCli;
use mapdoc_core::AnyEmptyResult;
use mapdoc_core::AnyError;
use mapdoc_core::AnyResult;
use mapdoc_core::MapdocConfig;
use mapdoc_core::MapdocError;
use mapdoc_core::MapdocResult;
use mapdoc_core::Processor;
use owo_colors::OwoColorize;
use owo_colors::Style;
use rayon::prelude::*;
use similar::ChangeTag;
use similar::TextDiff;
use tempfile::NamedTempFile;
use tracing::debug;
use tracing::info;
use tracing_subscriber::EnvFilter;

static USE_COLOR: AtomicBool = AtomicBool::new(true);

/// Render `text` with `style`, or as plain text when color is off.
fn paint(text: impl Display, style: Style) -> String {
	if USE_COLOR.load(Ordering::Relaxed) {
		text.style(style).to_string()
	} else {
		text.to_string()
	}
}

fn main() {
	let args = MapdocCli::parse();

	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	USE_COLOR.store(use_color, Ordering::Relaxed);
	init_tracing(&args, use_color);
	install_report_hook(use_color);

	if let Err(error) = run(&args) {
		report(error);
		process::exit(2);
	}
}

/// Diagnostics from the core crate are rendered by miette with colors and
/// unicode box drawing following `use_color`.
fn install_report_hook(use_color: bool) {
	let hook = miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}));

	if hook.is_err() {
		debug!("miette hook already installed");
	}
}

fn report(error: AnyError) {
	let error = match error.downcast::<MapdocError>() {
		Ok(diagnostic) => {
			eprintln!("{:?}", miette::Report::new(*diagnostic));
			return;
		}
		Err(error) => error,
	};

	eprintln!("{} {error}", paint("error:", Style::new().red().bold()));
}

/// Log to stderr. `--log-level` wins over `RUST_LOG`, which wins over the
/// `warn` default.
fn init_tracing(args: &MapdocCli, use_color: bool) {
	let filter = match args.log_level {
		Some(level) => EnvFilter::new(level.as_filter()),
		None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.init();
}

fn run(args: &MapdocCli) -> AnyEmptyResult {
	let root = std::env::current_dir()?;
	let config = load_config(args, &root)?;

	if args.print_config {
		print!("{}", toml::to_string(&config.unwrap_or_default())?);
		return Ok(());
	}

	let processor = match &config {
		Some(config) => Processor::new(config.to_processor_config()?),
		None => Processor::default(),
	};

	let targets = collect_targets(args)?;
	if targets.is_empty() {
		return Err("no files specified. Pass file paths or `--glob <PATTERN>`.".into());
	}

	let documents = render_all(&processor, &targets)?;

	if args.check {
		run_check(&documents, args.diff);
	} else if args.replace {
		run_replace(&documents)?;
	} else {
		for document in &documents {
			print!("{}", document.output);
		}
	}

	Ok(())
}

/// An explicit `--config` must exist. Otherwise the config is discovered in
/// `root`, and running without one is fine.
fn load_config(args: &MapdocCli, root: &Path) -> MapdocResult<Option<MapdocConfig>> {
	let config = match &args.config {
		Some(path) => Some(MapdocConfig::load_file(path)?),
		None => MapdocConfig::load(root)?,
	};
	debug!(found = config.is_some(), "resolved config");

	Ok(config)
}

/// Positional files first, then glob matches, without duplicates.
fn collect_targets(args: &MapdocCli) -> AnyResult<Vec<PathBuf>> {
	let mut targets = args.files.clone();
	if let Some(pattern) = &args.glob {
		targets.extend(glob_files(pattern)?);
	}

	let mut seen = HashSet::new();
	targets.retain(|path| seen.insert(path.clone()));

	Ok(targets)
}

/// Split `pattern` at its first component holding a glob metacharacter. The
/// leading literal components name the directory to walk, which may be
/// absolute or climb out of the working directory with `..`.
fn split_glob(pattern: &str) -> (PathBuf, String) {
	let mut base = PathBuf::new();
	let mut rest = Vec::new();

	for component in Path::new(pattern).components() {
		if matches!(component, Component::CurDir) {
			continue;
		}

		let text = component.as_os_str().to_string_lossy();
		if rest.is_empty() && !text.contains(['*', '?', '[', '{']) {
			base.push(component);
		} else {
			rest.push(text.into_owned());
		}
	}

	(base, rest.join("/"))
}

/// Files matching `pattern`, sorted. `*` does not cross directory
/// separators; `**` does. Hidden and ignored files are matched like any
/// other, since the pattern names them explicitly.
fn glob_files(pattern: &str) -> AnyResult<Vec<PathBuf>> {
	let (base, rest) = split_glob(pattern);

	if rest.is_empty() {
		return Ok(if base.is_file() { vec![base] } else { Vec::new() });
	}

	let matcher = GlobBuilder::new(&rest)
		.literal_separator(true)
		.build()?
		.compile_matcher();
	let walk_root = if base.as_os_str().is_empty() {
		Path::new(".")
	} else {
		base.as_path()
	};

	let mut files = Vec::new();
	for entry in WalkBuilder::new(walk_root).standard_filters(false).build() {
		let entry = entry?;
		if !entry.file_type().is_some_and(|file_type| file_type.is_file()) {
			continue;
		}

		let Ok(relative) = entry.path().strip_prefix(walk_root) else {
			continue;
		};

		if matcher.is_match(relative) {
			files.push(base.join(relative));
		}
	}

	files.sort();
	debug!(pattern, base = %base.display(), count = files.len(), "expanded glob");

	Ok(files)
}

/// A processed document alongside the content it was read with.
struct Document {
	path: PathBuf,
	original: String,
	output: String,
}

impl Document {
	fn is_stale(&self) -> bool {
		self.original != self.output
	}
}

/// Process every target in parallel. Either every document renders or the
/// first failure, in target order, is returned.
fn render_all(processor: &Processor, targets: &[PathBuf]) -> MapdocResult<Vec<Document>> {
	let results: Vec<MapdocResult<Document>> = targets
		.par_iter()
		.map(|path| {
			let original =
				std::fs::read_to_string(path).map_err(|source| MapdocError::from_io(path, source))?;
			let output = processor.process_str(path, &original)?;

			Ok(Document {
				path: path.clone(),
				original,
				output,
			})
		})
		.collect();

	results.into_iter().collect()
}

fn run_check(documents: &[Document], show_diff: bool) {
	let stale: Vec<&Document> = documents.iter().filter(|doc| doc.is_stale()).collect();

	if stale.is_empty() {
		println!(
			"{}",
			paint(
				format_args!("All {} file(s) are up to date.", documents.len()),
				Style::new().green()
			)
		);
		return;
	}

	for document in &stale {
		println!("{} {}", paint("stale:", Style::new().yellow()), document.path.display());
		if show_diff {
			print_diff(&document.path, &document.original, &document.output);
		}
	}

	println!(
		"\n{} file(s) out of date. Run with `--replace` to update them.",
		stale.len()
	);
	process::exit(1);
}

fn run_replace(documents: &[Document]) -> AnyEmptyResult {
	let mut updated = 0;

	for document in documents.iter().filter(|doc| doc.is_stale()) {
		write_atomic(&document.path, &document.output)?;
		info!(path = %document.path.display(), "replaced file");
		updated += 1;
	}

	if updated == 0 {
		println!("All files are already up to date.");
	} else {
		println!("{} {updated} file(s).", paint("Updated", Style::new().bold()));
	}

	Ok(())
}

/// Replace the content of `path` without a reader ever seeing a partially
/// written document. The new content goes to a temporary file next to the
/// real target, takes over its permissions, then is renamed over it. A
/// symlinked document stays a symlink and its target is rewritten.
fn write_atomic(path: &Path, content: &str) -> MapdocResult<()> {
	let target = std::fs::canonicalize(path).map_err(|source| MapdocError::from_io(path, source))?;
	let permissions = std::fs::metadata(&target)
		.map_err(|source| MapdocError::from_io(&target, source))?
		.permissions();
	let dir = target.parent().unwrap_or_else(|| Path::new("."));

	let mut temp =
		NamedTempFile::new_in(dir).map_err(|source| MapdocError::from_io(dir, source))?;
	temp.write_all(content.as_bytes())
		.and_then(|()| temp.as_file().set_permissions(permissions))
		.map_err(|source| MapdocError::from_io(temp.path(), source))?;
	temp.persist(&target)
		.map_err(|error| MapdocError::from_io(&target, error.error))?;

	Ok(())
}

/// Line diff from the document on disk to the rendered output, on stderr.
fn print_diff(path: &Path, current: &str, expected: &str) {
	eprintln!("{}", paint(format_args!("--- {}", path.display()), Style::new().dimmed()));
	eprintln!("{}", paint("+++ rendered", Style::new().dimmed()));

	for change in TextDiff::from_lines(current, expected).iter_all_changes() {
		let (sign, style) = match change.tag() {
			ChangeTag::Delete => ('-', Style::new().red()),
			ChangeTag::Insert => ('+', Style::new().green()),
			ChangeTag::Equal => (' ', Style::new()),
		};
		let line = format!("  {sign}{change}");
		eprint!("{}", paint(line.as_str(), style));
		if change.missing_newline() {
			eprintln!();
		}
	}
}
