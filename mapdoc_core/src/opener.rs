//! File-opening capability consumed by the [`Processor`](crate::Processor).
//!
//! The processor never touches the filesystem directly. Every read, whether
//! of the document being processed or of an embed target, goes through a
//! [`FileOpener`]. Hosts normally use [`FsOpener`]; [`MemoryOpener`] serves
//! files from an in-memory map.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::io::Cursor;
use std::io::Read;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Opens a path for reading.
///
/// Implementations must be safe to call from several threads at once since a
/// single processor may be shared across a parallel batch. A missing file
/// must be reported with [`io::ErrorKind::NotFound`].
pub trait FileOpener: Send + Sync {
	fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>>;
}

/// Reads from the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsOpener;

impl FileOpener for FsOpener {
	fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
		Ok(Box::new(File::open(path)?))
	}
}

/// Serves file contents from memory.
///
/// Paths are normalized lexically on insertion and lookup, so `docs/../a.md`
/// and `a.md` refer to the same entry.
///
/// ```
/// use mapdoc_core::MemoryOpener;
/// use mapdoc_core::Processor;
/// use mapdoc_core::ProcessorConfig;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// let opener = MemoryOpener::new()
/// 	.with_file("readme.md", "mapfile:snippet.txt\nmapfile.end\n")
/// 	.with_file("snippet.txt", "hello");
/// let processor = Processor::new(ProcessorConfig {
/// 	opener: Some(Arc::new(opener)),
/// 	..ProcessorConfig::default()
/// });
///
/// let output = processor.process_file(Path::new("readme.md")).unwrap();
/// assert_eq!(output, "mapfile:snippet.txt\nhello\nmapfile.end\n");
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryOpener {
	files: HashMap<PathBuf, String>,
}

impl MemoryOpener {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with_file(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
		self.insert(path, content);
		self
	}

	pub fn insert(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
		self.files
			.insert(normalize_path(path.as_ref()), content.into());
	}
}

impl FileOpener for MemoryOpener {
	fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
		let Some(content) = self.files.get(&normalize_path(path)) else {
			return Err(io::Error::new(
				io::ErrorKind::NotFound,
				format!("no in-memory file at `{}`", path.display()),
			));
		};

		Ok(Box::new(Cursor::new(content.clone().into_bytes())))
	}
}

/// Lexically clean a path: drop `.` components and fold `..` into the
/// preceding normal component. Leading `..` components that cannot be folded
/// are kept.
pub fn normalize_path(path: &Path) -> PathBuf {
	let mut parts: Vec<Component<'_>> = Vec::new();

	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				match parts.last() {
					Some(Component::Normal(_)) => {
						parts.pop();
					}
					Some(Component::RootDir | Component::Prefix(_)) => {}
					_ => parts.push(component),
				}
			}
			other => parts.push(other),
		}
	}

	parts.iter().collect()
}
