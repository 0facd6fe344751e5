//! Utility plugins.
//!
//! Every plugin maps theme values (or a fixed table) to class names and
//! declarations. [`UtilitySet`] materializes the enabled plugins for one
//! resolved configuration; both generation strategies and the apply
//! expanders look utilities up through it.

use indexmap::IndexMap;
use serde_json::Value;
use windtunnel_css::Declaration;

use crate::color::{ColorFormat, Rgba};
use crate::{EngineVersion, ResolvedConfig};

type DeclTable = &'static [(&'static str, &'static [(&'static str, &'static str)])];

enum Kind {
	/// Fixed class to declarations table.
	Static(DeclTable),
	/// `{class}-{key}` for each flattened theme entry, one declaration per
	/// property.
	Scale {
		theme: &'static str,
		classes: &'static [(&'static str, &'static [&'static str])],
		negative: bool,
	},
	/// Color scale written in the generation's [`ColorFormat`].
	Color {
		theme: &'static str,
		class: &'static str,
		prop: &'static str,
		opacity_var: &'static str,
	},
	FontSize,
	BoxShadow,
}

struct Plugin {
	name: &'static str,
	kind: Kind,
}

const SIDES_MARGIN: &[(&str, &[&str])] = &[
	("m", &["margin"]),
	("mx", &["margin-left", "margin-right"]),
	("my", &["margin-top", "margin-bottom"]),
	("mt", &["margin-top"]),
	("mr", &["margin-right"]),
	("mb", &["margin-bottom"]),
	("ml", &["margin-left"]),
];

const SIDES_PADDING: &[(&str, &[&str])] = &[
	("p", &["padding"]),
	("px", &["padding-left", "padding-right"]),
	("py", &["padding-top", "padding-bottom"]),
	("pt", &["padding-top"]),
	("pr", &["padding-right"]),
	("pb", &["padding-bottom"]),
	("pl", &["padding-left"]),
];

const PLUGINS: &[Plugin] = &[
	Plugin {
		name: "appearance",
		kind: Kind::Static(&[("appearance-none", &[("appearance", "none")])]),
	},
	Plugin {
		name: "display",
		kind: Kind::Static(&[
			("block", &[("display", "block")]),
			("inline-block", &[("display", "inline-block")]),
			("inline", &[("display", "inline")]),
			("flex", &[("display", "flex")]),
			("inline-flex", &[("display", "inline-flex")]),
			("table", &[("display", "table")]),
			("grid", &[("display", "grid")]),
			("inline-grid", &[("display", "inline-grid")]),
			("contents", &[("display", "contents")]),
			("hidden", &[("display", "none")]),
		]),
	},
	Plugin {
		name: "position",
		kind: Kind::Static(&[
			("static", &[("position", "static")]),
			("fixed", &[("position", "fixed")]),
			("absolute", &[("position", "absolute")]),
			("relative", &[("position", "relative")]),
			("sticky", &[("position", "sticky")]),
		]),
	},
	Plugin {
		name: "inset",
		kind: Kind::Scale {
			theme: "inset",
			classes: &[
				("inset", &["top", "right", "bottom", "left"]),
				("inset-x", &["left", "right"]),
				("inset-y", &["top", "bottom"]),
				("top", &["top"]),
				("right", &["right"]),
				("bottom", &["bottom"]),
				("left", &["left"]),
			],
			negative: true,
		},
	},
	Plugin {
		name: "zIndex",
		kind: Kind::Scale {
			theme: "zIndex",
			classes: &[("z", &["z-index"])],
			negative: false,
		},
	},
	Plugin {
		name: "margin",
		kind: Kind::Scale {
			theme: "margin",
			classes: SIDES_MARGIN,
			negative: true,
		},
	},
	Plugin {
		name: "width",
		kind: Kind::Scale {
			theme: "width",
			classes: &[("w", &["width"])],
			negative: false,
		},
	},
	Plugin {
		name: "height",
		kind: Kind::Scale {
			theme: "height",
			classes: &[("h", &["height"])],
			negative: false,
		},
	},
	Plugin {
		name: "flex",
		kind: Kind::Static(&[
			("flex-1", &[("flex", "1 1 0%")]),
			("flex-auto", &[("flex", "1 1 auto")]),
			("flex-initial", &[("flex", "0 1 auto")]),
			("flex-none", &[("flex", "none")]),
		]),
	},
	Plugin {
		name: "flexDirection",
		kind: Kind::Static(&[
			("flex-row", &[("flex-direction", "row")]),
			("flex-row-reverse", &[("flex-direction", "row-reverse")]),
			("flex-col", &[("flex-direction", "column")]),
			("flex-col-reverse", &[("flex-direction", "column-reverse")]),
		]),
	},
	Plugin {
		name: "flexWrap",
		kind: Kind::Static(&[
			("flex-wrap", &[("flex-wrap", "wrap")]),
			("flex-wrap-reverse", &[("flex-wrap", "wrap-reverse")]),
			("flex-nowrap", &[("flex-wrap", "nowrap")]),
		]),
	},
	Plugin {
		name: "alignItems",
		kind: Kind::Static(&[
			("items-start", &[("align-items", "flex-start")]),
			("items-end", &[("align-items", "flex-end")]),
			("items-center", &[("align-items", "center")]),
			("items-baseline", &[("align-items", "baseline")]),
			("items-stretch", &[("align-items", "stretch")]),
		]),
	},
	Plugin {
		name: "justifyContent",
		kind: Kind::Static(&[
			("justify-start", &[("justify-content", "flex-start")]),
			("justify-end", &[("justify-content", "flex-end")]),
			("justify-center", &[("justify-content", "center")]),
			("justify-between", &[("justify-content", "space-between")]),
			("justify-around", &[("justify-content", "space-around")]),
			("justify-evenly", &[("justify-content", "space-evenly")]),
		]),
	},
	Plugin {
		name: "gap",
		kind: Kind::Scale {
			theme: "gap",
			classes: &[("gap", &["gap"]), ("gap-x", &["column-gap"]), ("gap-y", &["row-gap"])],
			negative: false,
		},
	},
	Plugin {
		name: "overflow",
		kind: Kind::Static(&[
			("overflow-auto", &[("overflow", "auto")]),
			("overflow-hidden", &[("overflow", "hidden")]),
			("overflow-visible", &[("overflow", "visible")]),
			("overflow-scroll", &[("overflow", "scroll")]),
		]),
	},
	Plugin {
		name: "borderRadius",
		kind: Kind::Scale {
			theme: "borderRadius",
			classes: &[
				("rounded", &["border-radius"]),
				("rounded-t", &["border-top-left-radius", "border-top-right-radius"]),
				("rounded-r", &["border-top-right-radius", "border-bottom-right-radius"]),
				("rounded-b", &["border-bottom-right-radius", "border-bottom-left-radius"]),
				("rounded-l", &["border-top-left-radius", "border-bottom-left-radius"]),
			],
			negative: false,
		},
	},
	Plugin {
		name: "borderWidth",
		kind: Kind::Scale {
			theme: "borderWidth",
			classes: &[
				("border", &["border-width"]),
				("border-t", &["border-top-width"]),
				("border-r", &["border-right-width"]),
				("border-b", &["border-bottom-width"]),
				("border-l", &["border-left-width"]),
			],
			negative: false,
		},
	},
	Plugin {
		name: "borderColor",
		kind: Kind::Color {
			theme: "borderColor",
			class: "border",
			prop: "border-color",
			opacity_var: "--tw-border-opacity",
		},
	},
	Plugin {
		name: "backgroundColor",
		kind: Kind::Color {
			theme: "backgroundColor",
			class: "bg",
			prop: "background-color",
			opacity_var: "--tw-bg-opacity",
		},
	},
	Plugin {
		name: "padding",
		kind: Kind::Scale {
			theme: "padding",
			classes: SIDES_PADDING,
			negative: false,
		},
	},
	Plugin {
		name: "textAlign",
		kind: Kind::Static(&[
			("text-left", &[("text-align", "left")]),
			("text-center", &[("text-align", "center")]),
			("text-right", &[("text-align", "right")]),
			("text-justify", &[("text-align", "justify")]),
		]),
	},
	Plugin {
		name: "fontSize",
		kind: Kind::FontSize,
	},
	Plugin {
		name: "fontWeight",
		kind: Kind::Scale {
			theme: "fontWeight",
			classes: &[("font", &["font-weight"])],
			negative: false,
		},
	},
	Plugin {
		name: "fontStyle",
		kind: Kind::Static(&[("italic", &[("font-style", "italic")]), ("not-italic", &[("font-style", "normal")])]),
	},
	Plugin {
		name: "lineHeight",
		kind: Kind::Scale {
			theme: "lineHeight",
			classes: &[("leading", &["line-height"])],
			negative: false,
		},
	},
	Plugin {
		name: "letterSpacing",
		kind: Kind::Scale {
			theme: "letterSpacing",
			classes: &[("tracking", &["letter-spacing"])],
			negative: false,
		},
	},
	Plugin {
		name: "textColor",
		kind: Kind::Color {
			theme: "textColor",
			class: "text",
			prop: "color",
			opacity_var: "--tw-text-opacity",
		},
	},
	Plugin {
		name: "textTransform",
		kind: Kind::Static(&[
			("uppercase", &[("text-transform", "uppercase")]),
			("lowercase", &[("text-transform", "lowercase")]),
			("capitalize", &[("text-transform", "capitalize")]),
			("normal-case", &[("text-transform", "none")]),
		]),
	},
	Plugin {
		name: "textDecoration",
		kind: Kind::Static(&[
			("underline", &[("text-decoration", "underline")]),
			("line-through", &[("text-decoration", "line-through")]),
			("no-underline", &[("text-decoration", "none")]),
		]),
	},
	Plugin {
		name: "opacity",
		kind: Kind::Scale {
			theme: "opacity",
			classes: &[("opacity", &["opacity"])],
			negative: false,
		},
	},
	Plugin {
		name: "boxShadow",
		kind: Kind::BoxShadow,
	},
	Plugin {
		name: "cursor",
		kind: Kind::Static(&[
			("cursor-auto", &[("cursor", "auto")]),
			("cursor-default", &[("cursor", "default")]),
			("cursor-pointer", &[("cursor", "pointer")]),
			("cursor-wait", &[("cursor", "wait")]),
			("cursor-text", &[("cursor", "text")]),
			("cursor-move", &[("cursor", "move")]),
			("cursor-not-allowed", &[("cursor", "not-allowed")]),
		]),
	},
	Plugin {
		name: "userSelect",
		kind: Kind::Static(&[
			("select-none", &[("user-select", "none")]),
			("select-text", &[("user-select", "text")]),
			("select-all", &[("user-select", "all")]),
			("select-auto", &[("user-select", "auto")]),
		]),
	},
];

/// Built-in classic variant list for `plugin`.
pub fn default_variants(version: EngineVersion, plugin: &str) -> &'static [&'static str] {
	match (version, plugin) {
		(EngineVersion::V1, "textColor" | "backgroundColor" | "borderColor" | "opacity" | "boxShadow" | "textDecoration" | "fontWeight") => {
			&["responsive", "hover", "focus"]
		}
		(_, "textColor" | "backgroundColor" | "borderColor" | "opacity") => {
			&["responsive", "dark", "group-hover", "focus-within", "hover", "focus"]
		}
		(_, "boxShadow" | "textDecoration") => &["responsive", "group-hover", "focus-within", "hover", "focus"],
		_ => &["responsive"],
	}
}

/// One generated utility class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utility {
	/// Class name including prefix and negative sign.
	pub class: String,
	pub plugin: &'static str,
	pub plugin_index: usize,
	pub value_index: usize,
	pub declarations: Vec<Declaration>,
}

/// Enabled utilities of one resolved configuration, in generation order.
#[derive(Debug, Clone)]
pub struct UtilitySet {
	utilities: IndexMap<String, Utility>,
	prefix: String,
	important: bool,
	format: ColorFormat,
	enabled: Vec<bool>,
}

impl UtilitySet {
	pub fn new(config: &ResolvedConfig) -> Self {
		let mut set = Self {
			utilities: IndexMap::new(),
			prefix: config.prefix.clone(),
			important: config.important,
			format: ColorFormat::for_version(config.version),
			enabled: PLUGINS.iter().map(|p| config.core_plugins.enabled(p.name)).collect(),
		};
		for (plugin_index, plugin) in PLUGINS.iter().enumerate() {
			if set.enabled[plugin_index] {
				set.materialize(config, plugin_index, plugin);
			}
		}
		set
	}

	fn materialize(&mut self, config: &ResolvedConfig, plugin_index: usize, plugin: &Plugin) {
		let mut entries: Vec<(String, Vec<Declaration>)> = Vec::new();
		match &plugin.kind {
			Kind::Static(table) => {
				for (class, decls) in table.iter() {
					entries.push((class.to_string(), decls.iter().map(|(p, v)| Declaration::new(*p, *v)).collect()));
				}
			}
			Kind::Scale { theme, classes, negative } => {
				let scale = config.theme.scale(theme);
				for (class, props) in classes.iter() {
					for (key, value) in &scale {
						let Some(value) = crate::theme::css_value(value) else {
							continue;
						};
						entries.push((suffixed(class, key), props.iter().map(|p| Declaration::new(*p, value.clone())).collect()));
					}
					if *negative {
						for (key, value) in &scale {
							let Some(negated) = crate::theme::css_value(value).and_then(|v| negate(&v)) else {
								continue;
							};
							entries.push((
								format!("-{}", suffixed(class, key)),
								props.iter().map(|p| Declaration::new(*p, negated.clone())).collect(),
							));
						}
					}
				}
			}
			Kind::Color {
				theme,
				class,
				prop,
				opacity_var,
			} => {
				for (key, value) in config.theme.scale(theme) {
					if let Value::String(value) = value {
						entries.push((suffixed(class, &key), self.format.declarations(prop, opacity_var, &value)));
					}
				}
			}
			Kind::FontSize => {
				for (key, value) in config.theme.scale("fontSize") {
					if let Some(decls) = font_size_declarations(&value) {
						entries.push((suffixed("text", &key), decls));
					}
				}
			}
			Kind::BoxShadow => {
				for (key, value) in config.theme.scale("boxShadow") {
					if let Some(value) = crate::theme::css_value(&value) {
						entries.push((suffixed("shadow", &key), self.shadow_declarations(&value)));
					}
				}
			}
		}

		for (value_index, (name, declarations)) in entries.into_iter().enumerate() {
			let class = self.prefixed(&name);
			let declarations = self.finish(declarations);
			self.utilities.entry(class.clone()).or_insert(Utility {
				class,
				plugin: plugin.name,
				plugin_index,
				value_index,
				declarations,
			});
		}
	}

	fn prefixed(&self, name: &str) -> String {
		match name.strip_prefix('-') {
			Some(rest) => format!("-{}{rest}", self.prefix),
			None => format!("{}{name}", self.prefix),
		}
	}

	fn finish(&self, declarations: Vec<Declaration>) -> Vec<Declaration> {
		declarations.into_iter().map(|d| d.with_important(self.important)).collect()
	}

	fn shadow_declarations(&self, value: &str) -> Vec<Declaration> {
		if self.format == ColorFormat::Plain {
			return vec![Declaration::new("box-shadow", value)];
		}
		vec![
			Declaration::new("--tw-shadow", value),
			Declaration::new(
				"box-shadow",
				"var(--tw-ring-offset-shadow, 0 0 #0000), var(--tw-ring-shadow, 0 0 #0000), var(--tw-shadow)",
			),
		]
	}

	pub fn get(&self, class: &str) -> Option<&Utility> {
		self.utilities.get(class)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Utility> {
		self.utilities.values()
	}

	pub fn len(&self) -> usize {
		self.utilities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.utilities.is_empty()
	}

	/// Every class name, in generation order.
	pub fn class_names(&self) -> Vec<String> {
		self.utilities.keys().cloned().collect()
	}

	/// Resolves an arbitrary-value class such as `w-[37px]` or
	/// `text-[#bada55]`.
	pub fn arbitrary(&self, class: &str) -> Option<Utility> {
		let (negative, unsigned) = match class.strip_prefix('-') {
			Some(rest) => (true, rest),
			None => (false, class),
		};
		let body = unsigned.strip_prefix(self.prefix.as_str())?;
		let (key, rest) = body.split_once("-[")?;
		let raw = rest.strip_suffix(']')?;
		if raw.is_empty() {
			return None;
		}
		let value = raw.replace('_', " ");
		let is_color = value.starts_with('#') || value.starts_with("rgb") || value.starts_with("hsl") || Rgba::parse(&value).is_some();

		for (plugin_index, plugin) in PLUGINS.iter().enumerate() {
			if !self.enabled[plugin_index] {
				continue;
			}
			let declarations = match &plugin.kind {
				Kind::Color {
					class: prefix,
					prop,
					opacity_var,
					..
				} if *prefix == key && is_color && !negative => self.format.declarations(prop, opacity_var, &value),
				Kind::Scale {
					classes, negative: allows, ..
				} if !is_color => {
					let Some((_, props)) = classes.iter().find(|(c, _)| *c == key) else {
						continue;
					};
					let value = if negative {
						if !allows {
							continue;
						}
						negate(&value)?
					} else {
						value.clone()
					};
					props.iter().map(|p| Declaration::new(*p, value.clone())).collect()
				}
				Kind::FontSize if key == "text" && !is_color && !negative => vec![Declaration::new("font-size", value.clone())],
				_ => continue,
			};
			return Some(Utility {
				class: class.to_string(),
				plugin: plugin.name,
				plugin_index,
				value_index: usize::MAX,
				declarations: self.finish(declarations),
			});
		}
		None
	}
}

fn suffixed(class: &str, key: &str) -> String {
	if key.is_empty() { class.to_string() } else { format!("{class}-{key}") }
}

fn negate(value: &str) -> Option<String> {
	let value = value.trim();
	let numeric: String = value.chars().take_while(|c| c.is_ascii_digit() || *c == '.').collect();
	match numeric.parse::<f64>() {
		Ok(n) if n != 0.0 => Some(format!("-{value}")),
		_ => None,
	}
}

fn font_size_declarations(value: &Value) -> Option<Vec<Declaration>> {
	match value {
		Value::String(size) => Some(vec![Declaration::new("font-size", size.clone())]),
		Value::Array(items) => {
			let size = items.first()?.as_str()?;
			let mut decls = vec![Declaration::new("font-size", size)];
			let line_height = match items.get(1) {
				Some(Value::String(lh)) => Some(lh.clone()),
				Some(Value::Object(opts)) => opts.get("lineHeight").and_then(crate::theme::css_value),
				_ => None,
			};
			if let Some(lh) = line_height {
				decls.push(Declaration::new("line-height", lh));
			}
			Some(decls)
		}
		_ => None,
	}
}
