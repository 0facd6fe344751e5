//! Stylesheet parser on top of the `cssparser` tokenizer.
//!
//! Accepts the permissive subset of CSS the engine needs: rules, nested
//! rules, at-rules with or without blocks, declarations and comments.
//! Selectors and values are kept as source text with whitespace collapsed;
//! comments inside them are dropped.

use cssparser::{ParseError, ParseErrorKind, Parser, ParserInput, SourceLocation, SourcePosition, Token};

use crate::ast::{AtRule, Comment, Declaration, Node, Position, Rule, Stylesheet};
use crate::error::{CssSyntaxError, Result};

type Failure<'i> = ParseError<'i, CssSyntaxError>;

/// Parses `source` into a [`Stylesheet`].
///
/// # Errors
///
/// Returns [`CssSyntaxError`] located at the offending construct for
/// unclosed blocks, comments, strings and brackets, stray `}` and text that
/// is neither a rule nor a declaration.
pub fn parse(source: &str) -> Result<Stylesheet> {
	let mut input = ParserInput::new(source);
	let mut parser = Parser::new(&mut input);
	let bounds = Bounds {
		origin: parser.position(),
		len: source.len(),
	};
	block_nodes(&mut parser, bounds, false)
		.map(Stylesheet::new)
		.map_err(into_syntax_error)
}

/// Start and length of the input. The tokenizer closes blocks silently at
/// end of input, so a block whose contents run to the end was never closed.
#[derive(Clone, Copy)]
struct Bounds {
	origin: SourcePosition,
	len: usize,
}

impl Bounds {
	fn at_end(self, parser: &Parser<'_, '_>) -> bool {
		parser.slice_from(self.origin).len() >= self.len
	}
}

enum PreludeEnd {
	Semicolon,
	Block,
	Stop,
}

fn position(location: SourceLocation) -> Position {
	Position::new(location.line + 1, location.column)
}

fn fail<'i>(reason: &str, at: Position) -> Failure<'i> {
	ParseError {
		kind: ParseErrorKind::Custom(CssSyntaxError::new(reason, at.line, at.column)),
		location: SourceLocation {
			line: at.line.saturating_sub(1),
			column: at.column,
		},
	}
}

fn into_syntax_error(err: Failure<'_>) -> CssSyntaxError {
	match err.kind {
		ParseErrorKind::Custom(err) => err,
		ParseErrorKind::Basic(_) => CssSyntaxError::new("Unknown word", err.location.line + 1, err.location.column),
	}
}

/// Nodes up to end of input or, inside a block, its closing brace.
fn block_nodes<'i>(parser: &mut Parser<'i, '_>, bounds: Bounds, in_block: bool) -> std::result::Result<Vec<Node>, Failure<'i>> {
	let mut nodes = Vec::new();
	loop {
		let state = parser.state();
		let start = position(parser.current_source_location());
		let before = parser.position();
		let token = match parser.next_including_whitespace_and_comments() {
			Ok(token) => token.clone(),
			Err(_) => return Ok(nodes),
		};
		match token {
			Token::WhiteSpace(_) | Token::Semicolon => {}
			Token::Comment(text) => {
				finish_component(parser, bounds, &Token::Comment(text), before, start)?;
				nodes.push(Node::Comment(Comment {
					text: text.trim().to_string(),
					source: Some(start),
				}));
			}
			Token::CloseCurlyBracket => return Err(fail("Unexpected }", start)),
			Token::AtKeyword(name) => nodes.push(at_rule(parser, bounds, name.to_string(), start)?),
			_ => {
				parser.reset(&state);
				nodes.push(rule_or_declaration(parser, bounds, in_block, start)?);
			}
		}
	}
}

/// Parses the block just opened, reporting `opened_at` when it never closes.
fn nested_nodes<'i>(parser: &mut Parser<'i, '_>, bounds: Bounds, opened_at: Position) -> std::result::Result<Vec<Node>, Failure<'i>> {
	let (nodes, closed) = parser.parse_nested_block(|nested| {
		let nodes = block_nodes(nested, bounds, true)?;
		Ok::<_, Failure<'i>>((nodes, !bounds.at_end(nested)))
	})?;
	if closed { Ok(nodes) } else { Err(fail("Unclosed block", opened_at)) }
}

fn at_rule<'i>(parser: &mut Parser<'i, '_>, bounds: Bounds, name: String, start: Position) -> std::result::Result<Node, Failure<'i>> {
	let (params, end) = prelude(parser, bounds)?;
	let nodes = match end {
		PreludeEnd::Block => Some(nested_nodes(parser, bounds, start)?),
		PreludeEnd::Semicolon | PreludeEnd::Stop => None,
	};
	Ok(Node::AtRule(AtRule {
		name,
		params: collapse_whitespace(&params),
		nodes,
		source: Some(start),
		origin: Default::default(),
	}))
}

fn rule_or_declaration<'i>(
	parser: &mut Parser<'i, '_>,
	bounds: Bounds,
	in_block: bool,
	start: Position,
) -> std::result::Result<Node, Failure<'i>> {
	let (text, end) = prelude(parser, bounds)?;
	if let PreludeEnd::Block = end {
		let nodes = nested_nodes(parser, bounds, start)?;
		return Ok(Node::Rule(Rule {
			selector: collapse_whitespace(&text),
			nodes,
			source: Some(start),
			origin: Default::default(),
		}));
	}

	if !in_block {
		return Err(fail("Unknown word", start));
	}
	let Some(colon) = top_level_colon(&text) else {
		return Err(fail("Unknown word", start));
	};
	let prop = text[..colon].trim();
	if prop.is_empty() {
		return Err(fail("Unknown word", start));
	}
	let (value, important) = split_important(text[colon + 1..].trim());
	Ok(Node::Decl(Declaration {
		prop: prop.to_string(),
		value: collapse_whitespace(value),
		important,
		source: Some(start),
	}))
}

/// Source text up to the next top-level `;` or `{`, or the end of the
/// enclosing block. `;` and `{` are consumed; a top-level `}` is not.
fn prelude<'i>(parser: &mut Parser<'i, '_>, bounds: Bounds) -> std::result::Result<(String, PreludeEnd), Failure<'i>> {
	let mut text = String::new();
	loop {
		let state = parser.state();
		let at = position(parser.current_source_location());
		let before = parser.position();
		let token = match parser.next_including_whitespace_and_comments() {
			Ok(token) => token.clone(),
			Err(_) => return Ok((text, PreludeEnd::Stop)),
		};
		match token {
			Token::Semicolon => return Ok((text, PreludeEnd::Semicolon)),
			Token::CurlyBracketBlock => return Ok((text, PreludeEnd::Block)),
			Token::CloseCurlyBracket => {
				parser.reset(&state);
				return Ok((text, PreludeEnd::Stop));
			}
			Token::Comment(_) => {
				finish_component(parser, bounds, &token, before, at)?;
				text.push(' ');
			}
			_ => {
				finish_component(parser, bounds, &token, before, at)?;
				text.push_str(parser.slice_from(before));
			}
		}
	}
}

/// Checks the component just read for an unterminated comment, string or
/// bracket, consuming any block it opens.
fn finish_component<'i>(
	parser: &mut Parser<'i, '_>,
	bounds: Bounds,
	token: &Token<'i>,
	before: SourcePosition,
	at: Position,
) -> std::result::Result<(), Failure<'i>> {
	match token {
		Token::Comment(_) => {
			let raw = parser.slice_from(before);
			if raw.len() < 4 || !raw.ends_with("*/") {
				return Err(fail("Unclosed comment", at));
			}
		}
		Token::QuotedString(_) => {
			let raw = parser.slice_from(before);
			if raw.len() < 2 || raw.chars().last() != raw.chars().next() {
				return Err(fail("Unclosed string", at));
			}
		}
		Token::BadString(_) => return Err(fail("Unclosed string", at)),
		Token::UnquotedUrl(_) | Token::BadUrl(_) => {
			if !parser.slice_from(before).ends_with(')') {
				return Err(fail("Unclosed bracket", at));
			}
		}
		Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock | Token::CurlyBracketBlock => {
			let closed = parser.parse_nested_block(|nested| {
				skip_contents(nested, bounds)?;
				Ok::<_, Failure<'i>>(!bounds.at_end(nested))
			})?;
			if !closed {
				return Err(fail("Unclosed bracket", at));
			}
		}
		_ => {}
	}
	Ok(())
}

fn skip_contents<'i>(parser: &mut Parser<'i, '_>, bounds: Bounds) -> std::result::Result<(), Failure<'i>> {
	loop {
		let at = position(parser.current_source_location());
		let before = parser.position();
		let token = match parser.next_including_whitespace_and_comments() {
			Ok(token) => token.clone(),
			Err(_) => return Ok(()),
		};
		finish_component(parser, bounds, &token, before, at)?;
	}
}

fn top_level_colon(text: &str) -> Option<usize> {
	let mut depth = 0usize;
	for (idx, ch) in text.char_indices() {
		match ch {
			'(' | '[' => depth += 1,
			')' | ']' => depth = depth.saturating_sub(1),
			':' if depth == 0 => return Some(idx),
			_ => {}
		}
	}
	None
}

fn split_important(value: &str) -> (&str, bool) {
	let Some(bang) = value.rfind('!') else {
		return (value, false);
	};
	if value[bang + 1..].trim().eq_ignore_ascii_case("important") {
		(value[..bang].trim_end(), true)
	} else {
		(value, false)
	}
}

fn collapse_whitespace(text: &str) -> String {
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests;
