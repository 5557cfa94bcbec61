use std::io;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::FileOpener;
use crate::MapdocResult;
use crate::MemoryOpener;
use crate::Processor;
use crate::ProcessorConfig;
use crate::Rule;
use crate::RuleOptions;
use crate::SharedRule;
use crate::parser::parse_lines;
use crate::render_nodes;

/// A processor with the default rules reading from `files`.
pub(crate) fn memory_processor(files: &[(&str, &str)]) -> Processor {
	memory_processor_with_rules(files, Vec::new())
}

/// A processor with `rules` (the defaults when empty) reading from `files`.
pub(crate) fn memory_processor_with_rules(
	files: &[(&str, &str)],
	rules: Vec<SharedRule>,
) -> Processor {
	let mut opener = MemoryOpener::new();
	for (path, content) in files {
		opener.insert(path, *content);
	}

	Processor::new(ProcessorConfig {
		opener: Some(Arc::new(opener)),
		rules,
	})
}

/// Opens every path, but each read fails with [`io::ErrorKind::Other`].
pub(crate) struct BrokenOpener;

struct BrokenReader;

impl Read for BrokenReader {
	fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
		Err(io::Error::other("disk on fire"))
	}
}

impl FileOpener for BrokenOpener {
	fn open(&self, _path: &Path) -> io::Result<Box<dyn Read + Send>> {
		Ok(Box::new(BrokenReader))
	}
}

/// Run a single rule over `input` as if it were the content of `input.txt`.
pub(crate) fn apply_rule(rule: &dyn Rule, input: &str) -> MapdocResult<String> {
	let processor = memory_processor(&[]);
	let path = Path::new("input.txt");
	let nodes = parse_lines(path, input.as_bytes())?;
	let options = RuleOptions::new(&processor, path);

	Ok(render_nodes(&rule.apply(&options, nodes)?))
}

pub(crate) const RUST_SOURCE: &str = r#"fn main() {
    // range:usage
    let x = 1;
    if x > 0 {
        println!("{x}");
    }
    // range.end
    // range:unused
    let y = 2;
    // range.end
}
"#;

pub(crate) const RUST_USAGE_REINDENTED: &str = r#"let x = 1;
if x > 0 {
  println!("{x}");
}
"#;
