use pretty_assertions::assert_eq;

use super::*;

#[test]
fn parses_rules_at_rules_and_declarations() {
	let sheet = parse("@tailwind base;\n.btn {\n  color: red;\n  padding: 1rem !important\n}\n@media (min-width: 640px) { .a { margin: 0 } }").unwrap();
	assert_eq!(sheet.nodes.len(), 3);

	let tailwind = sheet.nodes[0].as_at_rule().unwrap();
	assert_eq!(tailwind.name, "tailwind");
	assert_eq!(tailwind.params, "base");
	assert!(tailwind.nodes.is_none());

	let btn = sheet.nodes[1].as_rule().unwrap();
	assert_eq!(btn.selector, ".btn");
	assert_eq!(btn.source, Some(Position::new(2, 1)));
	let decls: Vec<_> = btn.declarations().collect();
	assert_eq!(decls.len(), 2);
	assert_eq!(decls[0].prop, "color");
	assert_eq!(decls[0].value, "red");
	assert_eq!(decls[0].source, Some(Position::new(3, 3)));
	assert_eq!(decls[1].value, "1rem");
	assert!(decls[1].important);

	let media = sheet.nodes[2].as_at_rule().unwrap();
	assert_eq!(media.params, "(min-width: 640px)");
	let inner = media.nodes.as_ref().unwrap()[0].as_rule().unwrap();
	assert_eq!(inner.selector, ".a");
}

#[test]
fn keeps_strings_and_brackets_intact() {
	let sheet = parse(".a[data-x=\"}\"] { content: \"a;b\"; background: url(x;y.png) }").unwrap();
	let rule = sheet.nodes[0].as_rule().unwrap();
	assert_eq!(rule.selector, ".a[data-x=\"}\"]");
	let decls: Vec<_> = rule.declarations().collect();
	assert_eq!(decls[0].value, "\"a;b\"");
	assert_eq!(decls[1].value, "url(x;y.png)");
}

#[test]
fn comments_become_nodes_at_block_level() {
	let sheet = parse("/* hello */\na { /* inner */ color: red }").unwrap();
	assert_eq!(sheet.nodes[0], Node::Comment(Comment { text: "hello".into(), source: Some(Position::new(1, 1)) }));
	let rule = sheet.nodes[1].as_rule().unwrap();
	assert_eq!(rule.nodes.len(), 2);
}

#[test]
fn unclosed_block_reports_rule_start() {
	let err = parse("a{").unwrap_err();
	assert_eq!(err.to_string(), "<css input>:1:1: Unclosed block");

	let err = parse("\n\n  .x {\n color: red;").unwrap_err();
	assert_eq!((err.line, err.column, err.reason.as_str()), (3, 3, "Unclosed block"));
}

#[test]
fn malformed_input_is_rejected() {
	assert_eq!(parse("}").unwrap_err().reason, "Unexpected }");
	assert_eq!(parse("a { color: red } }").unwrap_err().reason, "Unexpected }");
	assert_eq!(parse("/* open").unwrap_err().reason, "Unclosed comment");
	assert_eq!(parse("a { content: \"x }").unwrap_err().reason, "Unclosed string");
	assert_eq!(parse("a { b }").unwrap_err().reason, "Unknown word");
	assert_eq!(parse("just words").unwrap_err().reason, "Unknown word");
	assert_eq!(parse("a { background: url(x }").unwrap_err().reason, "Unclosed bracket");
}

#[test]
fn empty_input_is_an_empty_sheet() {
	assert_eq!(parse("").unwrap(), Stylesheet::default());
	assert_eq!(parse("  \n ").unwrap(), Stylesheet::default());
}

#[test]
fn comments_inside_preludes_are_dropped() {
	let sheet = parse(".a /* note */ .b { color: /* why */ red }\n@media /* x */ print { .c { margin: 0 } }").unwrap();
	let rule = sheet.nodes[0].as_rule().unwrap();
	assert_eq!(rule.selector, ".a .b");
	assert_eq!(rule.declarations().next().unwrap().value, "red");
	assert_eq!(sheet.nodes[1].as_at_rule().unwrap().params, "print");
}

#[test]
fn errors_inside_nested_blocks_keep_their_position() {
	let err = parse("@media print {\n  .a {\n    content: \"x\n  }\n}").unwrap_err();
	assert_eq!((err.line, err.column, err.reason.as_str()), (3, 14, "Unclosed string"));

	let err = parse(".a:not(.b {}").unwrap_err();
	assert_eq!(err.reason, "Unclosed bracket");
}
