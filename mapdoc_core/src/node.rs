use derive_more::Deref;

/// A single physical line of a document, including its trailing line
/// terminator when it has one.
///
/// Nodes are never edited in place. Rules that change a line emit a new
/// `Node` in its stead, and a rule that injects content may emit a node
/// spanning several lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref)]
pub struct Node {
	text: String,
}

impl Node {
	pub fn new(text: impl Into<String>) -> Self {
		Self { text: text.into() }
	}

	/// The raw text of this node.
	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn into_text(self) -> String {
		self.text
	}
}

impl From<String> for Node {
	fn from(text: String) -> Self {
		Self { text }
	}
}

impl From<&str> for Node {
	fn from(text: &str) -> Self {
		Self::new(text)
	}
}

/// Concatenate the text of every node in document order.
pub fn render_nodes(nodes: &[Node]) -> String {
	let mut result = String::with_capacity(nodes.iter().map(|node| node.text.len()).sum());
	for node in nodes {
		result.push_str(&node.text);
	}
	result
}
