use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Embed files and named regions into documents, and keep them in sync.",
	long_about = "mapdoc replaces the text between directive markers with the content of another \
	              file, or of a named region of another file.\n\nDirectives:\n  \
	              mapfile:<path> ... mapfile.end          embed a whole file\n  \
	              maprange:<path>,<name> ... maprange.end embed the `range:<name>` region of a \
	              file\n\nBy default the processed documents are printed to stdout. Use \
	              `--replace` to rewrite them in place, or `--check` to verify they are up to \
	              date."
)]
#[allow(clippy::struct_excessive_bools)]
pub struct MapdocCli {
	/// Documents to process.
	pub files: Vec<PathBuf>,

	/// Also process every file matching this glob, e.g. `docs/**/*.md`,
	/// `../shared/*.md` or an absolute pattern. Hidden and `.gitignore`d files
	/// are included when the pattern reaches them.
	#[arg(long, short)]
	pub glob: Option<String>,

	/// Path to the config file. Without it, `mapdoc.toml`, `.mapdoc.toml` and
	/// `.config/mapdoc.toml` are tried in the current directory.
	#[arg(long, short)]
	pub config: Option<PathBuf>,

	/// Rewrite each document in place instead of printing it.
	#[arg(long, short, default_value_t = false, conflicts_with = "check")]
	pub replace: bool,

	/// Write nothing and exit with status 1 if any document is out of date.
	#[arg(long, default_value_t = false)]
	pub check: bool,

	/// With `--check`, show a unified diff for each out-of-date document.
	#[arg(long, default_value_t = false, requires = "check")]
	pub diff: bool,

	/// Print the resolved configuration as TOML and exit.
	#[arg(long, default_value_t = false)]
	pub print_config: bool,

	/// Log level for diagnostics written to stderr. Falls back to `RUST_LOG`,
	/// then `warn`.
	#[arg(long, value_enum)]
	pub log_level: Option<LogLevel>,

	/// Disable colored output.
	#[arg(long, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
	Trace,
	Debug,
	Info,
	Warn,
	Error,
}

impl LogLevel {
	/// The directive for a `tracing_subscriber` env filter.
	pub fn as_filter(self) -> &'static str {
		match self {
			Self::Trace => "trace",
			Self::Debug => "debug",
			Self::Info => "info",
			Self::Warn => "warn",
			Self::Error => "error",
		}
	}
}
