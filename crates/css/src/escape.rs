//! Class-name escaping for selectors.

use cssparser::{ParseError, Parser, ParserInput, Token, serialize_identifier};

/// Escapes `name` for use as a class selector identifier.
///
/// A leading digit takes the hex form without a trailing space when none is
/// needed, so `2xl` becomes `\32xl`.
pub fn escape_class(name: &str) -> String {
	let mut escaped = String::with_capacity(name.len() + 4);
	// Writing into a String cannot fail.
	let _ = serialize_identifier(name, &mut escaped);
	drop_needless_terminators(&escaped)
}

/// A hex escape only needs its terminating space when a hex digit or
/// whitespace follows.
fn drop_needless_terminators(escaped: &str) -> String {
	let mut out = String::with_capacity(escaped.len());
	let mut chars = escaped.chars().peekable();
	while let Some(ch) = chars.next() {
		out.push(ch);
		if ch != '\\' {
			continue;
		}
		let Some(&next) = chars.peek() else { break };
		if !next.is_ascii_hexdigit() {
			out.push(next);
			chars.next();
			continue;
		}
		while let Some(&digit) = chars.peek().filter(|c| c.is_ascii_hexdigit()) {
			out.push(digit);
			chars.next();
		}
		if chars.peek() == Some(&' ') {
			chars.next();
			if chars.peek().is_some_and(|c| c.is_ascii_hexdigit() || c.is_whitespace()) {
				out.push(' ');
			}
		}
	}
	out
}

/// Resolves CSS escapes in an identifier. Input that does not read as a
/// single identifier comes back unchanged.
pub fn unescape(ident: &str) -> String {
	let mut input = ParserInput::new(ident);
	let mut parser = Parser::new(&mut input);
	let name = match parser.next_including_whitespace_and_comments() {
		Ok(Token::Ident(name)) => name.clone(),
		_ => return ident.to_string(),
	};
	if parser.is_exhausted() { name.to_string() } else { ident.to_string() }
}

/// Class names referenced by `selector`, unescaped, in order of appearance.
///
/// Attribute selectors and quoted strings are skipped; classes inside
/// functional pseudo-classes such as `:not(.x)` are included.
pub fn selector_classes(selector: &str) -> Vec<String> {
	let mut input = ParserInput::new(selector);
	let mut parser = Parser::new(&mut input);
	let mut classes = Vec::new();
	collect_classes(&mut parser, &mut classes);
	classes
}

fn collect_classes<'i>(parser: &mut Parser<'i, '_>, classes: &mut Vec<String>) {
	let mut after_dot = false;
	while let Ok(token) = parser.next_including_whitespace_and_comments() {
		let token = token.clone();
		match &token {
			Token::Ident(name) if after_dot => classes.push(name.to_string()),
			Token::Function(_) | Token::ParenthesisBlock => {
				let _ = parser.parse_nested_block(|nested| {
					collect_classes(nested, classes);
					Ok::<_, ParseError<'i, ()>>(())
				});
			}
			_ => {}
		}
		after_dot = matches!(token, Token::Delim('.'));
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn plain_names_pass_through() {
		assert_eq!(escape_class("text-red-500"), "text-red-500");
		assert_eq!(escape_class("bg_x"), "bg_x");
		assert_eq!(escape_class("-mt-4"), "-mt-4");
	}

	#[test]
	fn special_characters_are_backslash_escaped() {
		assert_eq!(escape_class("hover:text-blue-500"), "hover\\:text-blue-500");
		assert_eq!(escape_class("w-1/2"), "w-1\\/2");
		assert_eq!(escape_class("p-0.5"), "p-0\\.5");
		assert_eq!(escape_class("w-[37px]"), "w-\\[37px\\]");
		assert_eq!(escape_class("-"), "\\-");
	}

	#[test]
	fn leading_digit_uses_hex_escape() {
		assert_eq!(escape_class("2xl:p-4"), "\\32xl\\:p-4");
		assert_eq!(unescape("\\32xl\\:p-4"), "2xl:p-4");
		assert_eq!(escape_class("2"), "\\32");
		assert_eq!(escape_class("2a"), "\\32 a");
		assert_eq!(unescape("\\32 a"), "2a");
	}

	#[test]
	fn unescape_leaves_non_identifiers_alone() {
		assert_eq!(unescape("a b"), "a b");
		assert_eq!(unescape("\"quoted\""), "\"quoted\"");
	}

	#[test]
	fn classes_are_read_back_from_selectors() {
		assert_eq!(selector_classes(".hover\\:text-blue-500:hover"), vec!["hover:text-blue-500"]);
		assert_eq!(selector_classes(".group:hover .group-hover\\:bg-red-500"), vec!["group", "group-hover:bg-red-500"]);
		assert_eq!(selector_classes("\\32xl\\:p-4"), Vec::<String>::new());
		assert_eq!(selector_classes(".\\32xl\\:p-4"), vec!["2xl:p-4"]);
		assert_eq!(selector_classes("a[href='.x'] .y"), vec!["y"]);
		assert_eq!(selector_classes(".w-1\\/2"), vec!["w-1/2"]);
		assert_eq!(selector_classes(".a:not(.b) > .c::before"), vec!["a", "b", "c"]);
	}
}
