use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use tracing::instrument;

use super::capture_parameter;
use crate::MapdocError;
use crate::MapdocResult;
use crate::Node;
use crate::RangeParams;
use crate::Rule;
use crate::RuleOptions;

/// Default region start marker: `range:<name>`.
pub static DEFAULT_RANGE_START: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"range:(\S+)").expect("valid range start pattern"));

/// Default region end marker: `range.end`.
pub static DEFAULT_RANGE_END: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"range.end").expect("valid range end pattern"));

#[derive(Debug, Clone, Default)]
pub struct RangeImportRuleConfig {
	/// Name of the region to keep.
	pub name: String,
	pub start_pattern: Option<Regex>,
	pub end_pattern: Option<Regex>,
}

/// Keeps the lines of a single named region and drops everything else,
/// including the region's own markers and every other region.
///
/// This is a filter for nested pipelines (see
/// [`MaprangeRule`](crate::MaprangeRule)); applied to a whole document it
/// discards all text outside the region.
#[derive(Debug, Clone)]
pub struct RangeImportRule {
	target_name: String,
	start_pattern: Regex,
	end_pattern: Regex,
}

impl RangeImportRule {
	pub fn new(config: RangeImportRuleConfig) -> Self {
		Self {
			target_name: config.name,
			start_pattern: config
				.start_pattern
				.unwrap_or_else(|| DEFAULT_RANGE_START.clone()),
			end_pattern: config
				.end_pattern
				.unwrap_or_else(|| DEFAULT_RANGE_END.clone()),
		}
	}

	/// A rule for region `name` with the default markers.
	pub fn named(name: impl Into<String>) -> Self {
		Self::new(RangeImportRuleConfig {
			name: name.into(),
			..RangeImportRuleConfig::default()
		})
	}

	pub fn target_name(&self) -> &str {
		&self.target_name
	}
}

impl Rule for RangeImportRule {
	fn name(&self) -> &'static str {
		"range"
	}

	#[instrument(
		name = "range",
		level = "debug",
		skip_all,
		fields(path = %options.file_path().display(), target = %self.target_name)
	)]
	fn apply(&self, options: &RuleOptions<'_>, nodes: Vec<Node>) -> MapdocResult<Vec<Node>> {
		let mut result = Vec::new();
		// 1-indexed line of the start marker of the region being copied.
		let mut open_line: Option<usize> = None;

		for (index, node) in nodes.into_iter().enumerate() {
			if open_line.is_some() {
				if self.end_pattern.is_match(node.text()) {
					open_line = None;
				} else {
					result.push(node);
				}
				continue;
			}

			let Some(parameter) = capture_parameter(&self.start_pattern, node.text()) else {
				continue;
			};

			let params = RangeParams::decode(parameter)?;
			debug!(name = %params.name, "found range directive");
			if params.name == self.target_name {
				open_line = Some(index + 1);
			}
		}

		if let Some(line) = open_line {
			return Err(MapdocError::UnterminatedDirective {
				directive: "range".to_string(),
				path: options.file_path().display().to_string(),
				line,
			});
		}

		Ok(result)
	}
}
