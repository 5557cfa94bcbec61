use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use crate::MapdocError;
use crate::MapdocResult;
use crate::Node;

/// Split `reader` into one [`Node`] per line.
///
/// Each node keeps its `\n` terminator. A final fragment without a
/// terminator still becomes its own node, and empty input produces no nodes.
/// `path` is only used to label read failures.
pub fn parse_lines(path: &Path, reader: impl Read) -> MapdocResult<Vec<Node>> {
	let mut reader = BufReader::new(reader);
	let mut nodes = Vec::new();

	loop {
		let mut line = String::new();
		let read = reader
			.read_line(&mut line)
			.map_err(|source| MapdocError::from_io(path, source))?;
		if read == 0 {
			break;
		}

		nodes.push(Node::from(line));
	}

	Ok(nodes)
}
