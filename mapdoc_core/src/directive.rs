//! Decoding of the parameter text captured from a start marker.
//!
//! The text after `mapfile:`, `maprange:` or `range:` is evaluated as a tiny
//! expression language:
//!
//! - a scalar: `"quoted"`, `'quoted'`, an integer or a bare identifier,
//! - a record: `{file:"a.md",name:"intro",skip:1}` with bare or quoted keys.
//!
//! Text that is not a valid expression, such as the common
//! `path/to/file.md`, is used verbatim as a scalar. A scalar fills the
//! directive's primary field (`file`, or `name` for `range`), while a record
//! is decoded field by field with unknown fields ignored.

use logos::Logos;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;
use snailquote::unescape;
use tracing::debug;

use crate::MapdocError;
use crate::MapdocResult;

/// Parameters of a `mapfile` directive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MapfileParams {
	/// Path of the file to embed, relative to the including file.
	pub file: String,
	/// Lines after the start marker to keep instead of replacing.
	#[serde(default)]
	pub skip: Option<usize>,
}

/// Parameters of a `maprange` directive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MaprangeParams {
	pub file: String,
	/// Name of the `range:` region to extract from `file`.
	pub name: String,
	#[serde(default)]
	pub skip: Option<usize>,
}

/// Parameters of a `range` region marker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RangeParams {
	pub name: String,
}

impl MapfileParams {
	pub fn decode(raw: &str) -> MapdocResult<Self> {
		match evaluate_or_raw(raw) {
			Expression::Record(record) => decode_record("mapfile", raw, record),
			Expression::Scalar(file) => Ok(Self { file, skip: None }),
		}
	}
}

impl MaprangeParams {
	pub fn decode(raw: &str) -> MapdocResult<Self> {
		match evaluate_or_raw(raw) {
			Expression::Record(record) => decode_record("maprange", raw, record),
			Expression::Scalar(scalar) => {
				let Some((file, name)) = scalar.split_once(',') else {
					return Err(MapdocError::MalformedParameter {
						directive: "maprange".to_string(),
						value: raw.to_string(),
						reason: "expected `path,name` or a record with `file` and `name`"
							.to_string(),
					});
				};

				Ok(Self {
					file: file.to_string(),
					name: name.to_string(),
					skip: None,
				})
			}
		}
	}
}

impl RangeParams {
	pub fn decode(raw: &str) -> MapdocResult<Self> {
		match evaluate_or_raw(raw) {
			Expression::Record(record) => decode_record("range", raw, record),
			Expression::Scalar(name) => Ok(Self { name }),
		}
	}
}

fn decode_record<T: DeserializeOwned>(
	directive: &str,
	raw: &str,
	record: Map<String, Value>,
) -> MapdocResult<T> {
	serde_json::from_value(Value::Object(record)).map_err(|e| {
		MapdocError::MalformedParameter {
			directive: directive.to_string(),
			value: raw.to_string(),
			reason: e.to_string(),
		}
	})
}

/// The evaluated form of a parameter.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expression {
	Scalar(String),
	Record(Map<String, Value>),
}

fn evaluate_or_raw(raw: &str) -> Expression {
	if let Some(expression) = evaluate(raw) {
		return expression;
	}

	debug!(value = raw, "parameter is not an expression, using the raw text");
	Expression::Scalar(raw.to_string())
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum ParamToken {
	#[token("{")]
	BraceOpen,
	#[token("}")]
	BraceClose,
	#[token(":")]
	Colon,
	#[token(",")]
	Comma,
	#[regex(r"[ \t\r\n]+")]
	Whitespace,
	#[regex(r#""([^"\\]|\\.)*""#)]
	DoubleQuotedString,
	#[regex(r"'([^'\\]|\\.)*'")]
	SingleQuotedString,
	#[regex(r"-?[0-9]+")]
	Integer,
	#[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
	Ident,
}

/// Evaluate `source` as an expression. Returns `None` when the text is not
/// a complete, well-formed expression.
pub(crate) fn evaluate(source: &str) -> Option<Expression> {
	let mut tokens = Vec::new();
	for (token, span) in ParamToken::lexer(source).spanned() {
		match token {
			Ok(ParamToken::Whitespace) => {}
			Ok(token) => tokens.push((token, &source[span])),
			Err(()) => return None,
		}
	}

	let mut walker = ExpressionWalker { tokens, cursor: 0 };
	let expression = walker.expression()?;
	walker.is_done().then_some(expression)
}

/// Recursive-descent walk over the significant tokens of a parameter.
struct ExpressionWalker<'a> {
	tokens: Vec<(ParamToken, &'a str)>,
	cursor: usize,
}

impl<'a> ExpressionWalker<'a> {
	fn next(&mut self) -> Option<(ParamToken, &'a str)> {
		let token = self.tokens.get(self.cursor).copied()?;
		self.cursor += 1;
		Some(token)
	}

	fn peek(&self) -> Option<ParamToken> {
		self.tokens.get(self.cursor).map(|(token, _)| *token)
	}

	fn is_done(&self) -> bool {
		self.cursor == self.tokens.len()
	}

	fn expression(&mut self) -> Option<Expression> {
		if self.peek() == Some(ParamToken::BraceOpen) {
			self.next();
			return self.record().map(Expression::Record);
		}

		let (token, text) = self.next()?;
		let scalar = match token {
			ParamToken::DoubleQuotedString | ParamToken::SingleQuotedString => unescape(text).ok()?,
			ParamToken::Integer | ParamToken::Ident => text.to_string(),
			_ => return None,
		};

		Some(Expression::Scalar(scalar))
	}

	/// Parse the fields of a record whose `{` has been consumed.
	fn record(&mut self) -> Option<Map<String, Value>> {
		let mut fields = Map::new();

		loop {
			let (token, text) = self.next()?;
			let key = match token {
				ParamToken::BraceClose => return Some(fields),
				ParamToken::Ident => text.to_string(),
				ParamToken::DoubleQuotedString | ParamToken::SingleQuotedString => {
					unescape(text).ok()?
				}
				_ => return None,
			};

			if self.next()?.0 != ParamToken::Colon {
				return None;
			}

			let value = self.value()?;
			fields.insert(key, value);

			match self.next()? {
				(ParamToken::Comma, _) => {}
				(ParamToken::BraceClose, _) => return Some(fields),
				_ => return None,
			}
		}
	}

	fn value(&mut self) -> Option<Value> {
		let (token, text) = self.next()?;
		match token {
			ParamToken::DoubleQuotedString | ParamToken::SingleQuotedString => {
				unescape(text).ok().map(Value::String)
			}
			ParamToken::Integer => text.parse::<i64>().ok().map(Value::from),
			ParamToken::Ident => Some(Value::String(text.to_string())),
			_ => None,
		}
	}
}
