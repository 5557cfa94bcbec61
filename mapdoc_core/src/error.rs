use std::path::Path;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum MapdocError {
	#[error(transparent)]
	#[diagnostic(code(mapdoc::io_error))]
	Io(#[from] std::io::Error),

	#[error("file not found: `{path}`")]
	#[diagnostic(
		code(mapdoc::not_found),
		help("embed paths are resolved relative to the directory of the file that references them")
	)]
	NotFound { path: String },

	#[error("failed to read `{path}`: {source}")]
	#[diagnostic(code(mapdoc::read_error))]
	Read {
		path: String,
		source: std::io::Error,
	},

	#[error("`{directive}` directive opened at {path}:{line} has no end marker")]
	#[diagnostic(
		code(mapdoc::unterminated_directive),
		help("add the matching end marker line before the end of the file")
	)]
	UnterminatedDirective {
		directive: String,
		path: String,
		line: usize,
	},

	#[error("malformed `{directive}` parameter `{value}`: {reason}")]
	#[diagnostic(
		code(mapdoc::malformed_parameter),
		help(
			"use a plain path, `path,name` for maprange, or a record such as `{{file:\"a.md\",skip:1}}`"
		)
	)]
	MalformedParameter {
		directive: String,
		value: String,
		reason: String,
	},

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(mapdoc::config_parse),
		help("check that mapdoc.toml is valid TOML with [mapfile] and/or [maprange] sections")
	)]
	ConfigParse(String),

	#[error("invalid pattern for `{field}`: {reason}")]
	#[diagnostic(
		code(mapdoc::invalid_pattern),
		help("start patterns must be valid regular expressions with exactly one capture group")
	)]
	InvalidPattern { field: String, reason: String },
}

impl MapdocError {
	/// Classify an I/O failure for `path`. A missing file becomes
	/// [`MapdocError::NotFound`], anything else a [`MapdocError::Read`].
	pub fn from_io(path: &Path, source: std::io::Error) -> Self {
		let path = path.display().to_string();
		if source.kind() == std::io::ErrorKind::NotFound {
			Self::NotFound { path }
		} else {
			Self::Read { path, source }
		}
	}
}

pub type MapdocResult<T> = Result<T, MapdocError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
