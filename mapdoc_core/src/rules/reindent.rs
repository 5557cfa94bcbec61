use tracing::debug;
use tracing::instrument;

use crate::MapdocResult;
use crate::Node;
use crate::Rule;
use crate::RuleOptions;

/// Indent width used when none is configured.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Rescales indentation so the smallest indentation step becomes exactly
/// one level of `width` spaces.
///
/// Leading tabs count as `width` spaces each. The greatest common divisor of
/// every line's leading indent is taken as the source step, and each line is
/// re-indented to `(indent / step) * width` spaces. Input without any
/// indentation is returned unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReindentRule {
	width: usize,
}

impl ReindentRule {
	/// A `width` of `0` falls back to [`DEFAULT_INDENT_WIDTH`].
	pub fn new(width: usize) -> Self {
		let width = if width == 0 { DEFAULT_INDENT_WIDTH } else { width };
		Self { width }
	}

	pub fn width(&self) -> usize {
		self.width
	}

	/// Leading indent of `text`, with tabs weighted as `width` spaces.
	fn indent_of(&self, text: &str) -> usize {
		text.chars()
			.map_while(|character| {
				match character {
					' ' => Some(1),
					'\t' => Some(self.width),
					_ => None,
				}
			})
			.sum()
	}
}

impl Default for ReindentRule {
	fn default() -> Self {
		Self::new(DEFAULT_INDENT_WIDTH)
	}
}

impl Rule for ReindentRule {
	fn name(&self) -> &'static str {
		"reindent"
	}

	#[instrument(
		name = "reindent",
		level = "debug",
		skip_all,
		fields(path = %options.file_path().display(), width = self.width)
	)]
	fn apply(&self, options: &RuleOptions<'_>, nodes: Vec<Node>) -> MapdocResult<Vec<Node>> {
		let indents: Vec<usize> = nodes.iter().map(|node| self.indent_of(node.text())).collect();
		let step = indents.iter().copied().fold(0, gcd);

		if step == 0 {
			return Ok(nodes);
		}

		debug!(step, "detected indentation step");
		let tab = " ".repeat(self.width);

		let result = nodes
			.iter()
			.zip(indents)
			.map(|(node, indent)| {
				let expanded = node.text().replace('\t', &tab);
				let body = &expanded[indent..];
				let mut text = " ".repeat(indent / step * self.width);
				text.push_str(body);
				Node::new(text)
			})
			.collect();

		Ok(result)
	}
}

fn gcd(a: usize, b: usize) -> usize {
	if b == 0 { a } else { gcd(b, a % b) }
}
