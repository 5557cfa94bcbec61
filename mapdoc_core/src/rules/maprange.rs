use std::iter;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use tracing::instrument;

use super::embed::Embed;
use super::embed::apply_embed;
use super::embed::ensure_trailing_newline;
use crate::MapdocResult;
use crate::MaprangeParams;
use crate::Node;
use crate::RangeImportRule;
use crate::Rule;
use crate::RuleOptions;
use crate::SharedRule;

/// Default start marker: `maprange:<param>`.
pub static DEFAULT_MAPRANGE_START: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"maprange:(\S+)").expect("valid maprange start pattern"));

/// Default end marker: `maprange.end`.
pub static DEFAULT_MAPRANGE_END: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"maprange.end").expect("valid maprange end pattern"));

#[derive(Debug, Clone, Default)]
pub struct MaprangeRuleConfig {
	pub start_pattern: Option<Regex>,
	pub end_pattern: Option<Regex>,
	pub default_skip: usize,
	/// Rules run over the extracted region, after the region filter.
	pub embed_rules: Vec<SharedRule>,
}

/// Embeds one named `range:` region of another file between a `maprange:`
/// start marker and the next `maprange.end`.
#[derive(Debug, Clone)]
pub struct MaprangeRule {
	start_pattern: Regex,
	end_pattern: Regex,
	default_skip: usize,
	embed_rules: Vec<SharedRule>,
}

/// A resolved `maprange` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTarget {
	pub path: PathBuf,
	pub name: String,
}

impl MaprangeRule {
	pub fn new(config: MaprangeRuleConfig) -> Self {
		Self {
			start_pattern: config
				.start_pattern
				.unwrap_or_else(|| DEFAULT_MAPRANGE_START.clone()),
			end_pattern: config
				.end_pattern
				.unwrap_or_else(|| DEFAULT_MAPRANGE_END.clone()),
			default_skip: config.default_skip,
			embed_rules: config.embed_rules,
		}
	}
}

impl Default for MaprangeRule {
	fn default() -> Self {
		Self::new(MaprangeRuleConfig::default())
	}
}

impl Rule for MaprangeRule {
	fn name(&self) -> &'static str {
		"maprange"
	}

	#[instrument(
		name = "maprange",
		level = "debug",
		skip_all,
		fields(path = %options.file_path().display())
	)]
	fn apply(&self, options: &RuleOptions<'_>, nodes: Vec<Node>) -> MapdocResult<Vec<Node>> {
		apply_embed(self, options, nodes)
	}
}

impl Embed for MaprangeRule {
	type Target = RegionTarget;

	fn directive(&self) -> &'static str {
		"maprange"
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
	) -> MapdocResult<(RegionTarget, Option<usize>)> {
		let params = MaprangeParams::decode(parameter)?;
		let path = options.resolve(&params.file);
		debug!(
			file = %params.file,
			target = %path.display(),
			name = %params.name,
			skip = ?params.skip,
			"found maprange directive"
		);

		Ok((
			RegionTarget {
				path,
				name: params.name,
			},
			params.skip,
		))
	}

	fn load(&self, options: &RuleOptions<'_>, target: &RegionTarget) -> MapdocResult<String> {
		// The region filter has to run first so the remaining rules only see
		// the extracted lines.
		let region: SharedRule = Arc::new(RangeImportRule::named(target.name.clone()));
		let rules = iter::once(region)
			.chain(self.embed_rules.iter().cloned())
			.collect();

		let content = options.spawn(rules).process_file(&target.path)?;

		Ok(ensure_trailing_newline(content))
	}
}
