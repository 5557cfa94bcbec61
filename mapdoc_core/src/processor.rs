use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use tracing::instrument;

use crate::FileOpener;
use crate::FsOpener;
use crate::MapdocError;
use crate::MapdocResult;
use crate::MapfileRule;
use crate::MaprangeRule;
use crate::Node;
use crate::RuleOptions;
use crate::SharedRule;
use crate::parser::parse_lines;
use crate::render_nodes;

/// Construction options for a [`Processor`].
///
/// Both fields are optional: without an opener the processor reads from the
/// filesystem, and an empty rule list is replaced by
/// [`Processor::default_rules`].
#[derive(Default)]
pub struct ProcessorConfig {
	pub opener: Option<Arc<dyn FileOpener>>,
	pub rules: Vec<SharedRule>,
}

/// Runs an ordered list of rules over documents.
///
/// A processor is immutable once built. Cloning is cheap and clones share
/// the opener and the rule list, so one processor can be used from many
/// threads at once.
#[derive(Clone)]
pub struct Processor {
	opener: Arc<dyn FileOpener>,
	rules: Arc<[SharedRule]>,
}

impl Processor {
	pub fn new(config: ProcessorConfig) -> Self {
		let ProcessorConfig { opener, rules } = config;
		let rules = if rules.is_empty() {
			Self::default_rules()
		} else {
			rules
		};

		Self {
			opener: opener.unwrap_or_else(|| Arc::new(FsOpener)),
			rules: rules.into(),
		}
	}

	/// The rules used when none are configured: `mapfile` followed by
	/// `maprange`, both with their default markers and no embed rules.
	pub fn default_rules() -> Vec<SharedRule> {
		vec![
			Arc::new(MapfileRule::default()),
			Arc::new(MaprangeRule::default()),
		]
	}

	pub fn rules(&self) -> &[SharedRule] {
		&self.rules
	}

	/// Return an independent processor with the same opener and `rules` in
	/// place of the current rule list. `self` is left untouched.
	pub fn with_rules(&self, rules: Vec<SharedRule>) -> Self {
		Self {
			opener: Arc::clone(&self.opener),
			rules: rules.into(),
		}
	}

	pub fn open(&self, path: &Path) -> MapdocResult<Box<dyn Read + Send>> {
		self.opener
			.open(path)
			.map_err(|source| MapdocError::from_io(path, source))
	}

	pub fn read_to_string(&self, path: &Path) -> MapdocResult<String> {
		let mut content = String::new();
		self.open(path)?
			.read_to_string(&mut content)
			.map_err(|source| MapdocError::from_io(path, source))?;

		Ok(content)
	}

	/// Read `path`, run every configured rule over it in order and return the
	/// resulting text.
	#[instrument(level = "debug", skip(self), fields(path = %path.display()))]
	pub fn process_file(&self, path: &Path) -> MapdocResult<String> {
		debug!("process file");

		let nodes = self.parse(path, self.open(path)?)?;
		let nodes = self.apply_rules(path, nodes)?;

		Ok(render_nodes(&nodes))
	}

	/// Like [`Processor::process_file`] for a document whose `content` has
	/// already been read. `path` still anchors relative embed targets.
	#[instrument(level = "debug", skip(self, content), fields(path = %path.display()))]
	pub fn process_str(&self, path: &Path, content: &str) -> MapdocResult<String> {
		let nodes = self.parse(path, content.as_bytes())?;
		let nodes = self.apply_rules(path, nodes)?;

		Ok(render_nodes(&nodes))
	}

	/// Split the content of `reader` into line nodes.
	#[instrument(level = "debug", skip(self, reader), fields(path = %path.display()))]
	pub fn parse(&self, path: &Path, reader: impl Read) -> MapdocResult<Vec<Node>> {
		parse_lines(path, reader)
	}

	/// Apply the configured rules to `nodes`, which were read from `path`.
	#[instrument(
		level = "debug",
		skip(self, nodes),
		fields(path = %path.display(), node_count = nodes.len())
	)]
	pub fn apply_rules(&self, path: &Path, nodes: Vec<Node>) -> MapdocResult<Vec<Node>> {
		let options = RuleOptions::new(self, path);
		let mut nodes = nodes;

		for rule in self.rules.iter() {
			nodes = rule.apply(&options, nodes)?;
		}

		Ok(nodes)
	}
}

impl Default for Processor {
	fn default() -> Self {
		Self::new(ProcessorConfig::default())
	}
}

impl fmt::Debug for Processor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Processor")
			.field("rules", &self.rules)
			.finish_non_exhaustive()
	}
}
