use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::DEFAULT_INDENT_WIDTH;
use crate::DedentRule;
use crate::MapdocError;
use crate::MapdocResult;
use crate::MapfileRule;
use crate::MapfileRuleConfig;
use crate::MaprangeRule;
use crate::MaprangeRuleConfig;
use crate::ProcessorConfig;
use crate::ReindentRule;
use crate::SharedRule;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["mapdoc.toml", ".mapdoc.toml", ".config/mapdoc.toml"];

/// Configuration loaded from a `mapdoc.toml` file.
///
/// Every field is optional; missing values fall back to the defaults shown
/// here.
///
/// ```toml
/// [mapfile]
/// start_pattern = 'mapfile:(\S+)'
/// end_pattern = 'mapfile.end'
/// disable_reindent = false
/// indent_width = 2
/// default_skip = 0
///
/// [maprange]
/// start_pattern = 'maprange:(\S+)'
/// end_pattern = 'maprange.end'
/// disable_dedent = false
/// disable_reindent = false
/// indent_width = 2
/// default_skip = 0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MapdocConfig {
	#[serde(default)]
	pub mapfile: MapfileSection,
	#[serde(default)]
	pub maprange: MaprangeSection,
}

/// The `[mapfile]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapfileSection {
	/// Start marker. Must contain exactly one capture group, which holds the
	/// directive parameter.
	pub start_pattern: String,
	pub end_pattern: String,
	/// When true, embedded files are inserted with their indentation as-is.
	pub disable_reindent: bool,
	/// Target indent width for reindenting. `0` means the default of 2.
	pub indent_width: usize,
	pub default_skip: usize,
}

impl Default for MapfileSection {
	fn default() -> Self {
		Self {
			start_pattern: r"mapfile:(\S+)".to_string(),
			end_pattern: "mapfile.end".to_string(),
			disable_reindent: false,
			indent_width: DEFAULT_INDENT_WIDTH,
			default_skip: 0,
		}
	}
}

/// The `[maprange]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaprangeSection {
	pub start_pattern: String,
	pub end_pattern: String,
	/// When true, the first line's indentation is not stripped from the
	/// extracted region.
	pub disable_dedent: bool,
	pub disable_reindent: bool,
	pub indent_width: usize,
	pub default_skip: usize,
}

impl Default for MaprangeSection {
	fn default() -> Self {
		Self {
			start_pattern: r"maprange:(\S+)".to_string(),
			end_pattern: "maprange.end".to_string(),
			disable_dedent: false,
			disable_reindent: false,
			indent_width: DEFAULT_INDENT_WIDTH,
			default_skip: 0,
		}
	}
}

impl MapdocConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is no config file.
	pub fn load(root: &Path) -> MapdocResult<Option<MapdocConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_file(&config_path).map(Some)
	}

	/// Load and validate the config at `path`, which must exist.
	pub fn load_file(path: &Path) -> MapdocResult<MapdocConfig> {
		debug!(path = %path.display(), "loading config");
		let content =
			std::fs::read_to_string(path).map_err(|source| MapdocError::from_io(path, source))?;

		Self::from_toml_str(&content)
	}

	/// Parse and validate a config from TOML text.
	pub fn from_toml_str(content: &str) -> MapdocResult<MapdocConfig> {
		let config: MapdocConfig =
			toml::from_str(content).map_err(|e| MapdocError::ConfigParse(e.to_string()))?;
		config.validate()?;

		Ok(config)
	}

	/// Check that every pattern compiles and that start patterns capture
	/// exactly one parameter.
	pub fn validate(&self) -> MapdocResult<()> {
		start_pattern("mapfile.start_pattern", &self.mapfile.start_pattern)?;
		end_pattern("mapfile.end_pattern", &self.mapfile.end_pattern)?;
		start_pattern("maprange.start_pattern", &self.maprange.start_pattern)?;
		end_pattern("maprange.end_pattern", &self.maprange.end_pattern)?;

		Ok(())
	}

	/// Build the rule list described by this config: `mapfile` followed by
	/// `maprange`, each with its embed rules.
	pub fn to_rules(&self) -> MapdocResult<Vec<SharedRule>> {
		let mapfile = &self.mapfile;
		let mut mapfile_embed: Vec<SharedRule> = Vec::new();
		if !mapfile.disable_reindent {
			mapfile_embed.push(Arc::new(ReindentRule::new(mapfile.indent_width)));
		}

		let maprange = &self.maprange;
		let mut maprange_embed: Vec<SharedRule> = Vec::new();
		if !maprange.disable_dedent {
			maprange_embed.push(Arc::new(DedentRule::default()));
		}
		if !maprange.disable_reindent {
			maprange_embed.push(Arc::new(ReindentRule::new(maprange.indent_width)));
		}

		Ok(vec![
			Arc::new(MapfileRule::new(MapfileRuleConfig {
				start_pattern: Some(start_pattern(
					"mapfile.start_pattern",
					&mapfile.start_pattern,
				)?),
				end_pattern: Some(end_pattern("mapfile.end_pattern", &mapfile.end_pattern)?),
				default_skip: mapfile.default_skip,
				embed_rules: mapfile_embed,
			})),
			Arc::new(MaprangeRule::new(MaprangeRuleConfig {
				start_pattern: Some(start_pattern(
					"maprange.start_pattern",
					&maprange.start_pattern,
				)?),
				end_pattern: Some(end_pattern("maprange.end_pattern", &maprange.end_pattern)?),
				default_skip: maprange.default_skip,
				embed_rules: maprange_embed,
			})),
		])
	}

	/// Processor configuration reading from the filesystem with the rules of
	/// [`MapdocConfig::to_rules`].
	pub fn to_processor_config(&self) -> MapdocResult<ProcessorConfig> {
		Ok(ProcessorConfig {
			opener: None,
			rules: self.to_rules()?,
		})
	}
}

fn compile(field: &str, pattern: &str) -> MapdocResult<Regex> {
	Regex::new(pattern).map_err(|e| {
		MapdocError::InvalidPattern {
			field: field.to_string(),
			reason: e.to_string(),
		}
	})
}

fn start_pattern(field: &str, pattern: &str) -> MapdocResult<Regex> {
	let regex = compile(field, pattern)?;
	// `captures_len` includes the implicit group for the whole match.
	let groups = regex.captures_len() - 1;
	if groups != 1 {
		return Err(MapdocError::InvalidPattern {
			field: field.to_string(),
			reason: format!("expected exactly one capture group, found {groups}"),
		});
	}

	Ok(regex)
}

fn end_pattern(field: &str, pattern: &str) -> MapdocResult<Regex> {
	compile(field, pattern)
}
