use std::fmt;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use crate::MapdocResult;
use crate::Node;
use crate::Processor;
use crate::opener::normalize_path;

/// A transformation stage of the pipeline.
///
/// A rule receives the whole node sequence of a document and returns the
/// new sequence. Its configuration is fixed at construction, so one rule
/// value can be applied to any number of documents, from any thread.
pub trait Rule: Send + Sync + fmt::Debug {
	/// Short identifier used in logs and error messages.
	fn name(&self) -> &'static str;

	fn apply(&self, options: &RuleOptions<'_>, nodes: Vec<Node>) -> MapdocResult<Vec<Node>>;
}

/// Rules are shared between the processor that owns them and any nested
/// processors spawned for embedded content.
pub type SharedRule = Arc<dyn Rule>;

/// Per-invocation context handed to [`Rule::apply`].
#[derive(Debug, Clone, Copy)]
pub struct RuleOptions<'a> {
	processor: &'a Processor,
	file_path: &'a Path,
}

impl<'a> RuleOptions<'a> {
	pub fn new(processor: &'a Processor, file_path: &'a Path) -> Self {
		Self {
			processor,
			file_path,
		}
	}

	/// The processor applying the rule.
	pub fn processor(&self) -> &'a Processor {
		self.processor
	}

	/// Path of the document currently being processed.
	pub fn file_path(&self) -> &'a Path {
		self.file_path
	}

	/// Resolve an embed target against the directory containing the current
	/// document. Absolute targets are returned as-is (after normalization).
	pub fn resolve(&self, target: impl AsRef<Path>) -> PathBuf {
		let dir = self.file_path.parent().unwrap_or_else(|| Path::new(""));
		normalize_path(&dir.join(target))
	}

	pub fn open(&self, path: &Path) -> MapdocResult<Box<dyn Read + Send>> {
		self.processor.open(path)
	}

	pub fn read_to_string(&self, path: &Path) -> MapdocResult<String> {
		self.processor.read_to_string(path)
	}

	/// Build a nested processor that shares this processor's opener but runs
	/// `rules` instead of the current rule list.
	pub fn spawn(&self, rules: Vec<SharedRule>) -> Processor {
		self.processor.with_rules(rules)
	}
}
