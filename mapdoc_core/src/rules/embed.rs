use regex::Regex;

use super::capture_parameter;
use crate::MapdocError;
use crate::MapdocResult;
use crate::Node;
use crate::RuleOptions;

/// The parts that differ between the embedding rules. The scan itself is
/// shared by [`apply_embed`].
pub(super) trait Embed {
	/// What a start marker resolves to, e.g. the path of the file to embed.
	type Target;

	fn directive(&self) -> &'static str;
	fn start_pattern(&self) -> &Regex;
	fn end_pattern(&self) -> &Regex;
	fn default_skip(&self) -> usize;

	/// Decode the captured parameter into a target and an optional skip
	/// count overriding the default.
	fn open(
		&self,
		options: &RuleOptions<'_>,
		parameter: &str,
	) -> MapdocResult<(Self::Target, Option<usize>)>;

	/// Produce the text to inject for `target`.
	fn load(&self, options: &RuleOptions<'_>, target: &Self::Target) -> MapdocResult<String>;
}

/// A start marker waiting for its end marker.
struct OpenDirective<T> {
	target: T,
	/// 1-indexed line of the start marker.
	line: usize,
	skip: usize,
	passed: usize,
	stale: Vec<Node>,
}

enum State<T> {
	Idle,
	Embedding(OpenDirective<T>),
}

/// Replace the content between every start/end marker pair with the loaded
/// embed.
///
/// After a start marker the first `skip` lines are kept as they are. Every
/// later line up to the end marker is held back as stale content from a
/// previous run. When the end marker arrives the embed is emitted, followed
/// by the last `skip` held-back lines and the end marker itself; the rest of
/// the held-back lines are dropped.
pub(super) fn apply_embed<E: Embed>(
	rule: &E,
	options: &RuleOptions<'_>,
	nodes: Vec<Node>,
) -> MapdocResult<Vec<Node>> {
	let mut result = Vec::with_capacity(nodes.len());
	let mut state = State::Idle;

	for (index, node) in nodes.into_iter().enumerate() {
		state = match state {
			State::Idle => {
				match capture_parameter(rule.start_pattern(), node.text()) {
					None => {
						result.push(node);
						State::Idle
					}
					Some(parameter) => {
						let (target, skip) = rule.open(options, parameter)?;
						result.push(node);

						State::Embedding(OpenDirective {
							target,
							line: index + 1,
							skip: skip.unwrap_or_else(|| rule.default_skip()),
							passed: 0,
							stale: Vec::new(),
						})
					}
				}
			}
			State::Embedding(open) if rule.end_pattern().is_match(node.text()) => {
				let content = rule.load(options, &open.target)?;
				result.push(Node::new(content));

				let dropped = open.stale.len().saturating_sub(open.skip);
				result.extend(open.stale.into_iter().skip(dropped));
				result.push(node);

				State::Idle
			}
			State::Embedding(mut open) => {
				if open.passed < open.skip {
					open.passed += 1;
					result.push(node);
				} else {
					open.stale.push(node);
				}

				State::Embedding(open)
			}
		};
	}

	if let State::Embedding(open) = state {
		return Err(MapdocError::UnterminatedDirective {
			directive: rule.directive().to_string(),
			path: options.file_path().display().to_string(),
			line: open.line,
		});
	}

	Ok(result)
}

/// Append a `\n` unless `content` already ends with one.
pub(super) fn ensure_trailing_newline(mut content: String) -> String {
	if !content.ends_with('\n') {
		content.push('\n');
	}
	content
}
