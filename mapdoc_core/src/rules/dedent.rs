use std::sync::LazyLock;

use regex::Regex;
use tracing::instrument;

use crate::MapdocResult;
use crate::Node;
use crate::Rule;
use crate::RuleOptions;

/// Default leading-whitespace pattern: spaces and tabs at the start of the
/// line.
pub static DEFAULT_DEDENT_PATTERN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^([ \t]+)").expect("valid dedent pattern"));

/// Removes the indentation of the first line from every line.
///
/// The prefix is taken literally from the first node. Lines that don't
/// start with exactly that prefix are left as they are.
#[derive(Debug, Clone)]
pub struct DedentRule {
	pattern: Regex,
}

impl DedentRule {
	/// `pattern` selects the indentation of the first line; its first capture
	/// group (or the whole match, without groups) is the prefix to strip.
	pub fn new(pattern: Option<Regex>) -> Self {
		Self {
			pattern: pattern.unwrap_or_else(|| DEFAULT_DEDENT_PATTERN.clone()),
		}
	}

	fn prefix_of<'t>(&self, text: &'t str) -> Option<&'t str> {
		let captures = self.pattern.captures(text)?;
		captures
			.get(1)
			.or_else(|| captures.get(0))
			.map(|prefix| prefix.as_str())
			.filter(|prefix| !prefix.is_empty())
	}
}

impl Default for DedentRule {
	fn default() -> Self {
		Self::new(None)
	}
}

impl Rule for DedentRule {
	fn name(&self) -> &'static str {
		"dedent"
	}

	#[instrument(name = "dedent", level = "debug", skip_all, fields(path = %options.file_path().display()))]
	fn apply(&self, options: &RuleOptions<'_>, nodes: Vec<Node>) -> MapdocResult<Vec<Node>> {
		let Some(prefix) = nodes
			.first()
			.and_then(|first| self.prefix_of(first.text()))
			.map(str::to_string)
		else {
			return Ok(nodes);
		};

		let result = nodes
			.into_iter()
			.map(|node| {
				match node.text().strip_prefix(prefix.as_str()) {
					Some(rest) => Node::new(rest),
					None => node,
				}
			})
			.collect();

		Ok(result)
	}
}
