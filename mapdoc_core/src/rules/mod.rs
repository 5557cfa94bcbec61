//! Built-in rules.
//!
//! - [`MapfileRule`] embeds a whole file between `mapfile:` and
//!   `mapfile.end`.
//! - [`MaprangeRule`] embeds one named region of a file between `maprange:`
//!   and `maprange.end`.
//! - [`RangeImportRule`] keeps only the lines of one `range:` region.
//! - [`DedentRule`] strips the indentation of the first line from every line.
//! - [`ReindentRule`] rescales indentation to multiples of a fixed width.

use regex::Regex;

pub use dedent::*;
pub use mapfile::*;
pub use maprange::*;
pub use range_import::*;
pub use reindent::*;

mod dedent;
mod embed;
mod mapfile;
mod maprange;
mod range_import;
mod reindent;

/// Return the parameter captured by a start-marker pattern, if `text`
/// contains a start marker.
fn capture_parameter<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
	pattern
		.captures(text)
		.and_then(|captures| captures.get(1))
		.map(|parameter| parameter.as_str())
}
