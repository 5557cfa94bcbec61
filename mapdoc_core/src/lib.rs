//! `mapdoc_core` is the engine behind [mapdoc](https://github.com/mapdoc/mapdoc), a preprocessor that keeps fragments of text files in sync with a single source of truth. Directive lines mark where content from another file, or a named region of another file, belongs. Running the processor replaces whatever sits between the markers with the current embed, optionally normalizing its indentation.
//!
//! ## Processing Pipeline
//!
//! ```text
//! File
//!   -> Line parser (one Node per physical line, terminator included)
//!   -> Rules, in order (mapfile, maprange, ...)
//!        embedding rules re-run a nested processor over the embedded file
//!   -> Concatenated node text
//! ```
//!
//! ## Directives
//!
//! ```text
//! <!-- mapfile:snippets/intro.md -->
//! replaced on every run
//! <!-- mapfile.end -->
//!
//! <!-- maprange:src/lib.rs,usage -->
//! replaced by the `range:usage` region of src/lib.rs
//! <!-- maprange.end -->
//! ```
//!
//! Parameters can also be records: `mapfile:{file:"intro.md",skip:1}` keeps
//! the first line after the marker in place.
//!
//! ## Key Types
//!
//! - [`Processor`] - Runs an ordered rule list over a file.
//! - [`Rule`] - A transformation stage. Built-in rules are [`MapfileRule`], [`MaprangeRule`], [`RangeImportRule`], [`DedentRule`] and [`ReindentRule`].
//! - [`FileOpener`] - Where files are read from: [`FsOpener`] or [`MemoryOpener`].
//! - [`MapdocConfig`] - Configuration loaded from `mapdoc.toml`.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use mapdoc_core::MemoryOpener;
//! use mapdoc_core::Processor;
//! use mapdoc_core::ProcessorConfig;
//!
//! let opener = MemoryOpener::new()
//! 	.with_file("docs/readme.md", "mapfile:hello.txt\nstale\nmapfile.end\n")
//! 	.with_file("docs/hello.txt", "hello");
//! let processor = Processor::new(ProcessorConfig {
//! 	opener: Some(Arc::new(opener)),
//! 	..ProcessorConfig::default()
//! });
//!
//! let output = processor.process_file(Path::new("docs/readme.md"))?;
//! assert_eq!(output, "mapfile:hello.txt\nhello\nmapfile.end\n");
//! # Ok::<(), mapdoc_core::MapdocError>(())
//! ```

pub use config::*;
pub use directive::*;
pub use error::*;
pub use node::*;
pub use opener::*;
pub use processor::*;
pub use rule::*;
pub use rules::*;

mod config;
mod directive;
#[allow(unused_assignments)]
mod error;
mod node;
mod opener;
mod parser;
mod processor;
mod rule;
mod rules;

#[cfg(test)]
mod __fixtures;
