use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use tracing::instrument;

use super::embed::Embed;
use super::embed::apply_embed;
use super::embed::ensure_trailing_newline;
use crate::MapdocResult;
use crate::MapfileParams;
use crate::Node;
use crate::Rule;
use crate::RuleOptions;
use crate::SharedRule;

/// Default start marker: `mapfile:<param>`.
pub static DEFAULT_MAPFILE_START: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"mapfile:(\S+)").expect("valid mapfile start pattern"));

/// Default end marker: `mapfile.end`.
pub static DEFAULT_MAPFILE_END: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"mapfile.end").expect("valid mapfile end pattern"));

#[derive(Debug, Clone, Default)]
pub struct MapfileRuleConfig {
	/// Start marker; the first capture group holds the parameter.
	pub start_pattern: Option<Regex>,
	pub end_pattern: Option<Regex>,
	/// Skip budget for directives that don't set `skip` themselves.
	pub default_skip: usize,
	/// Rules run over the embedded file before it is injected.
	pub embed_rules: Vec<SharedRule>,
}

/// Embeds the full content of another file between a `mapfile:` start
/// marker and the next `mapfile.end`.
#[derive(Debug, Clone)]
pub struct MapfileRule {
	start_pattern: Regex,
	end_pattern: Regex,
	default_skip: usize,
	embed_rules: Vec<SharedRule>,
}

impl MapfileRule {
	pub fn new(config: MapfileRuleConfig) -> Self {
		Self {
			start_pattern: config
				.start_pattern
				.unwrap_or_else(|| DEFAULT_MAPFILE_START.clone()),
			end_pattern: config
				.end_pattern
				.unwrap_or_else(|| DEFAULT_MAPFILE_END.clone()),
			default_skip: config.default_skip,
			embed_rules: config.embed_rules,
		}
	}
}

impl Default for MapfileRule {
	fn default() -> Self {
		Self::new(MapfileRuleConfig::default())
	}
}

impl Rule for MapfileRule {
	fn name(&self) -> &'static str {
		"mapfile"
	}

	#[instrument(
		name = "mapfile",
		level = "debug",
		skip_all,
		fields(path = %options.file_path().display())
	)]
	fn apply(&self, options: &RuleOptions<'_>, nodes: Vec<Node>) -> MapdocResult<Vec<Node>> {
		apply_embed(self, options, nodes)
	}
}

impl Embed for MapfileRule {
	type Target = PathBuf;

	fn directive(&self) -> &'static str {
		"mapfile"
	}

	fn start_pattern(&self) -> &Regex {
		&self.start_pattern
	}

	fn end_pattern(&self) -> &Regex {
		&self.end_pattern
	}

	fn default_skip(&self) -> usize {
		self.default_skip
	}

	fn open(
		&self,
		options: &RuleOptions<'_>,
		parameter: &str,
	) -> MapdocResult<(PathBuf, Option<usize>)> {
		let params = MapfileParams::decode(parameter)?;
		let target = options.resolve(&params.file);
		debug!(
			file = %params.file,
			target = %target.display(),
			skip = ?params.skip,
			"found mapfile directive"
		);

		Ok((target, params.skip))
	}

	fn load(&self, options: &RuleOptions<'_>, target: &PathBuf) -> MapdocResult<String> {
		let content = if self.embed_rules.is_empty() {
			options.read_to_string(target)?
		} else {
			options
				.spawn(self.embed_rules.clone())
				.process_file(target)?
		};

		Ok(ensure_trailing_newline(content))
	}
}
