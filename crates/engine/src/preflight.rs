//! Base styles and the `container` component.

use windtunnel_css::{AtRule, Declaration, Layer, Node, Origin, Rule};

use crate::{EngineVersion, ResolvedConfig};

fn rule(selector: &str, declarations: &[(&str, &str)], layer: Layer) -> Node {
	Node::Rule(
		Rule::new(selector)
			.with_declarations(declarations.iter().map(|(p, v)| Declaration::new(*p, *v)))
			.with_origin(Origin::Generated(layer)),
	)
}

/// Short preflight for the `base` layer; empty when the `preflight` core
/// plugin is disabled.
pub(crate) fn preflight(config: &ResolvedConfig) -> Vec<Node> {
	if !config.core_plugins.enabled("preflight") {
		return Vec::new();
	}
	let border_color = match config.version {
		EngineVersion::V1 => "#e2e8f0",
		EngineVersion::V2 => "currentColor",
		EngineVersion::V3 => "#e5e7eb",
	};
	let line_height = if config.version == EngineVersion::V1 { "1.15" } else { "1.5" };
	vec![
		rule(
			"*, ::before, ::after",
			&[
				("box-sizing", "border-box"),
				("border-width", "0"),
				("border-style", "solid"),
				("border-color", border_color),
			],
			Layer::Base,
		),
		rule(
			"html",
			&[("line-height", line_height), ("-webkit-text-size-adjust", "100%")],
			Layer::Base,
		),
		rule("body", &[("margin", "0"), ("line-height", "inherit")], Layer::Base),
		rule(
			"h1, h2, h3, h4, h5, h6",
			&[("font-size", "inherit"), ("font-weight", "inherit")],
			Layer::Base,
		),
		rule("a", &[("color", "inherit"), ("text-decoration", "inherit")], Layer::Base),
		rule("img, svg, video", &[("display", "block"), ("vertical-align", "middle")], Layer::Base),
	]
}

/// Responsive `.container` for the `components` layer; empty when the
/// `container` core plugin is disabled.
pub(crate) fn container(config: &ResolvedConfig) -> Vec<Node> {
	if !config.core_plugins.enabled("container") {
		return Vec::new();
	}
	let selector = format!(".{}container", config.prefix);
	let mut nodes = vec![rule(&selector, &[("width", "100%")], Layer::Components)];
	for (_, width) in config.theme.screens() {
		nodes.push(Node::AtRule(
			AtRule::block("media", format!("(min-width: {width})"))
				.with_nodes(vec![rule(&selector, &[("max-width", width.as_str())], Layer::Components)])
				.with_origin(Origin::Generated(Layer::Components)),
		));
	}
	nodes
}
