//! Built-in theme values per engine generation.

use serde_json::{Map, Value, json};

use crate::EngineVersion;

const SHADES: [&str; 10] = ["50", "100", "200", "300", "400", "500", "600", "700", "800", "900"];

fn palette(hexes: [&str; 10]) -> Value {
	Value::Object(SHADES.iter().zip(hexes).map(|(shade, hex)| (shade.to_string(), json!(hex))).collect())
}

fn palette_v1(hexes: [&str; 9]) -> Value {
	Value::Object(SHADES[1..].iter().zip(hexes).map(|(shade, hex)| (shade.to_string(), json!(hex))).collect())
}

const GRAY: [&str; 10] = ["#f9fafb", "#f3f4f6", "#e5e7eb", "#d1d5db", "#9ca3af", "#6b7280", "#4b5563", "#374151", "#1f2937", "#111827"];
const RED: [&str; 10] = ["#fef2f2", "#fee2e2", "#fecaca", "#fca5a5", "#f87171", "#ef4444", "#dc2626", "#b91c1c", "#991b1b", "#7f1d1d"];
const AMBER: [&str; 10] = ["#fffbeb", "#fef3c7", "#fde68a", "#fcd34d", "#fbbf24", "#f59e0b", "#d97706", "#b45309", "#92400e", "#78350f"];
const YELLOW: [&str; 10] = ["#fefce8", "#fef9c3", "#fef08a", "#fde047", "#facc15", "#eab308", "#ca8a04", "#a16207", "#854d0e", "#713f12"];
const EMERALD: [&str; 10] = ["#ecfdf5", "#d1fae5", "#a7f3d0", "#6ee7b7", "#34d399", "#10b981", "#059669", "#047857", "#065f46", "#064e3b"];
const GREEN: [&str; 10] = ["#f0fdf4", "#dcfce7", "#bbf7d0", "#86efac", "#4ade80", "#22c55e", "#16a34a", "#15803d", "#166534", "#14532d"];
const BLUE: [&str; 10] = ["#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb", "#1d4ed8", "#1e40af", "#1e3a8a"];
const INDIGO: [&str; 10] = ["#eef2ff", "#e0e7ff", "#c7d2fe", "#a5b4fc", "#818cf8", "#6366f1", "#4f46e5", "#4338ca", "#3730a3", "#312e81"];
const VIOLET: [&str; 10] = ["#f5f3ff", "#ede9fe", "#ddd6fe", "#c4b5fd", "#a78bfa", "#8b5cf6", "#7c3aed", "#6d28d9", "#5b21b6", "#4c1d95"];
const PURPLE: [&str; 10] = ["#faf5ff", "#f3e8ff", "#e9d5ff", "#d8b4fe", "#c084fc", "#a855f7", "#9333ea", "#7e22ce", "#6b21a8", "#581c87"];
const PINK: [&str; 10] = ["#fdf2f8", "#fce7f3", "#fbcfe8", "#f9a8d4", "#f472b6", "#ec4899", "#db2777", "#be185d", "#9d174d", "#831843"];

fn colors(version: EngineVersion) -> Value {
	let mut colors = Map::new();
	colors.insert("transparent".into(), json!("transparent"));
	if version != EngineVersion::V1 {
		colors.insert("current".into(), json!("currentColor"));
	}
	colors.insert("black".into(), json!("#000"));
	colors.insert("white".into(), json!("#fff"));
	match version {
		EngineVersion::V1 => {
			colors.insert(
				"gray".into(),
				palette_v1(["#f7fafc", "#edf2f7", "#e2e8f0", "#cbd5e0", "#a0aec0", "#718096", "#4a5568", "#2d3748", "#1a202c"]),
			);
			colors.insert(
				"red".into(),
				palette_v1(["#fff5f5", "#fed7d7", "#feb2b2", "#fc8181", "#f56565", "#e53e3e", "#c53030", "#9b2c2c", "#742a2a"]),
			);
			colors.insert(
				"green".into(),
				palette_v1(["#f0fff4", "#c6f6d5", "#9ae6b4", "#68d391", "#48bb78", "#38a169", "#2f855a", "#276749", "#22543d"]),
			);
			colors.insert(
				"blue".into(),
				palette_v1(["#ebf8ff", "#bee3f8", "#90cdf4", "#63b3ed", "#4299e1", "#3182ce", "#2b6cb0", "#2c5282", "#2a4365"]),
			);
		}
		EngineVersion::V2 => {
			colors.insert("gray".into(), palette(GRAY));
			colors.insert("red".into(), palette(RED));
			colors.insert("yellow".into(), palette(AMBER));
			colors.insert("green".into(), palette(EMERALD));
			colors.insert("blue".into(), palette(BLUE));
			colors.insert("indigo".into(), palette(INDIGO));
			colors.insert("purple".into(), palette(VIOLET));
			colors.insert("pink".into(), palette(PINK));
		}
		EngineVersion::V3 => {
			colors.insert("gray".into(), palette(GRAY));
			colors.insert("red".into(), palette(RED));
			colors.insert("yellow".into(), palette(YELLOW));
			colors.insert("green".into(), palette(GREEN));
			colors.insert("blue".into(), palette(BLUE));
			colors.insert("indigo".into(), palette(INDIGO));
			colors.insert("purple".into(), palette(PURPLE));
			colors.insert("pink".into(), palette(PINK));
		}
	}
	Value::Object(colors)
}

fn spacing(version: EngineVersion) -> Value {
	if version == EngineVersion::V1 {
		return json!({
			"px": "1px", "0": "0", "1": "0.25rem", "2": "0.5rem", "3": "0.75rem", "4": "1rem",
			"5": "1.25rem", "6": "1.5rem", "8": "2rem", "10": "2.5rem", "12": "3rem", "16": "4rem",
			"20": "5rem", "24": "6rem", "32": "8rem", "40": "10rem", "48": "12rem", "56": "14rem", "64": "16rem"
		});
	}
	json!({
		"px": "1px", "0": "0px", "0.5": "0.125rem", "1": "0.25rem", "1.5": "0.375rem", "2": "0.5rem",
		"2.5": "0.625rem", "3": "0.75rem", "3.5": "0.875rem", "4": "1rem", "5": "1.25rem", "6": "1.5rem",
		"8": "2rem", "10": "2.5rem", "12": "3rem", "16": "4rem", "20": "5rem", "24": "6rem",
		"32": "8rem", "40": "10rem", "48": "12rem", "56": "14rem", "64": "16rem"
	})
}

fn screens(version: EngineVersion) -> Value {
	let mut screens = Map::new();
	for (name, width) in [("sm", "640px"), ("md", "768px"), ("lg", "1024px"), ("xl", "1280px")] {
		screens.insert(name.into(), json!(width));
	}
	if version != EngineVersion::V1 {
		screens.insert("2xl".into(), json!("1536px"));
	}
	Value::Object(screens)
}

fn font_size(version: EngineVersion) -> Value {
	if version == EngineVersion::V1 {
		return json!({
			"xs": "0.75rem", "sm": "0.875rem", "base": "1rem", "lg": "1.125rem", "xl": "1.25rem",
			"2xl": "1.5rem", "3xl": "1.875rem", "4xl": "2.25rem", "5xl": "3rem", "6xl": "4rem"
		});
	}
	json!({
		"xs": ["0.75rem", { "lineHeight": "1rem" }],
		"sm": ["0.875rem", { "lineHeight": "1.25rem" }],
		"base": ["1rem", { "lineHeight": "1.5rem" }],
		"lg": ["1.125rem", { "lineHeight": "1.75rem" }],
		"xl": ["1.25rem", { "lineHeight": "1.75rem" }],
		"2xl": ["1.5rem", { "lineHeight": "2rem" }],
		"3xl": ["1.875rem", { "lineHeight": "2.25rem" }],
		"4xl": ["2.25rem", { "lineHeight": "2.5rem" }],
		"5xl": ["3rem", { "lineHeight": "1" }],
		"6xl": ["3.75rem", { "lineHeight": "1" }]
	})
}

fn box_shadow(version: EngineVersion) -> Value {
	if version == EngineVersion::V1 {
		return json!({
			"default": "0 1px 3px 0 rgba(0, 0, 0, 0.1), 0 1px 2px 0 rgba(0, 0, 0, 0.06)",
			"md": "0 4px 6px -1px rgba(0, 0, 0, 0.1), 0 2px 4px -1px rgba(0, 0, 0, 0.06)",
			"lg": "0 10px 15px -3px rgba(0, 0, 0, 0.1), 0 4px 6px -2px rgba(0, 0, 0, 0.05)",
			"none": "none"
		});
	}
	json!({
		"sm": "0 1px 2px 0 rgba(0, 0, 0, 0.05)",
		"DEFAULT": "0 1px 3px 0 rgba(0, 0, 0, 0.1), 0 1px 2px 0 rgba(0, 0, 0, 0.06)",
		"md": "0 4px 6px -1px rgba(0, 0, 0, 0.1), 0 2px 4px -1px rgba(0, 0, 0, 0.06)",
		"lg": "0 10px 15px -3px rgba(0, 0, 0, 0.1), 0 4px 6px -2px rgba(0, 0, 0, 0.05)",
		"none": "0 0 #0000"
	})
}

/// Default theme for `version`, without the keys derived from `spacing`
/// and `colors`.
pub(crate) fn theme(version: EngineVersion) -> Map<String, Value> {
	let v1 = version == EngineVersion::V1;
	let default_key = if v1 { "default" } else { "DEFAULT" };
	let mut theme = Map::new();
	theme.insert("screens".into(), screens(version));
	theme.insert("colors".into(), colors(version));
	theme.insert("spacing".into(), spacing(version));
	theme.insert("fontSize".into(), font_size(version));
	theme.insert(
		"fontWeight".into(),
		json!({
			"thin": "100", "extralight": "200", "light": "300", "normal": "400", "medium": "500",
			"semibold": "600", "bold": "700", "extrabold": "800", "black": "900"
		}),
	);
	theme.insert(
		"lineHeight".into(),
		if v1 {
			json!({ "none": "1", "tight": "1.25", "snug": "1.375", "normal": "1.5", "relaxed": "1.625", "loose": "2" })
		} else {
			json!({
				"none": "1", "tight": "1.25", "snug": "1.375", "normal": "1.5", "relaxed": "1.625", "loose": "2",
				"3": ".75rem", "4": "1rem", "5": "1.25rem", "6": "1.5rem", "7": "1.75rem", "8": "2rem",
				"9": "2.25rem", "10": "2.5rem"
			})
		},
	);
	theme.insert(
		"letterSpacing".into(),
		json!({
			"tighter": "-0.05em", "tight": "-0.025em", "normal": if v1 { "0" } else { "0em" },
			"wide": "0.025em", "wider": "0.05em", "widest": "0.1em"
		}),
	);
	let mut radius = Map::new();
	radius.insert("none".into(), json!(if v1 { "0" } else { "0px" }));
	radius.insert("sm".into(), json!("0.125rem"));
	radius.insert(default_key.into(), json!("0.25rem"));
	radius.insert("md".into(), json!("0.375rem"));
	radius.insert("lg".into(), json!("0.5rem"));
	if !v1 {
		radius.insert("xl".into(), json!("0.75rem"));
		radius.insert("2xl".into(), json!("1rem"));
		radius.insert("3xl".into(), json!("1.5rem"));
	}
	radius.insert("full".into(), json!("9999px"));
	theme.insert("borderRadius".into(), Value::Object(radius));

	let mut border = Map::new();
	border.insert(default_key.into(), json!("1px"));
	border.insert("0".into(), json!(if v1 { "0" } else { "0px" }));
	border.insert("2".into(), json!("2px"));
	border.insert("4".into(), json!("4px"));
	border.insert("8".into(), json!("8px"));
	theme.insert("borderWidth".into(), Value::Object(border));

	theme.insert(
		"opacity".into(),
		if v1 {
			json!({ "0": "0", "25": "0.25", "50": "0.5", "75": "0.75", "100": "1" })
		} else {
			json!({
				"0": "0", "5": "0.05", "10": "0.1", "20": "0.2", "25": "0.25", "30": "0.3", "40": "0.4",
				"50": "0.5", "60": "0.6", "70": "0.7", "75": "0.75", "80": "0.8", "90": "0.9", "95": "0.95", "100": "1"
			})
		},
	);
	theme.insert(
		"zIndex".into(),
		json!({ "auto": "auto", "0": "0", "10": "10", "20": "20", "30": "30", "40": "40", "50": "50" }),
	);
	theme.insert("boxShadow".into(), box_shadow(version));
	theme
}

/// Keys whose default value is computed from other theme keys.
pub(crate) const DERIVED_KEYS: [&str; 9] = [
	"margin",
	"padding",
	"gap",
	"inset",
	"width",
	"height",
	"textColor",
	"backgroundColor",
	"borderColor",
];

/// Computes the default for a derived key from the merged base theme.
pub(crate) fn derive(key: &str, theme: &Map<String, Value>) -> Value {
	let spacing = theme.get("spacing").and_then(Value::as_object).cloned().unwrap_or_default();
	let colors = theme.get("colors").cloned().unwrap_or_else(|| Value::Object(Map::new()));
	let with = |head: &[(&str, &str)], tail: &[(&str, &str)]| {
		let mut map = Map::new();
		for (k, v) in head {
			map.insert((*k).to_string(), json!(v));
		}
		map.extend(spacing.clone());
		for (k, v) in tail {
			map.insert((*k).to_string(), json!(v));
		}
		Value::Object(map)
	};
	match key {
		"margin" => with(&[("auto", "auto")], &[]),
		"padding" | "gap" => with(&[], &[]),
		"inset" => with(&[("auto", "auto")], &[("1/2", "50%"), ("full", "100%")]),
		"width" => with(
			&[("auto", "auto")],
			&[
				("1/2", "50%"),
				("1/3", "33.333333%"),
				("2/3", "66.666667%"),
				("1/4", "25%"),
				("3/4", "75%"),
				("full", "100%"),
				("screen", "100vw"),
			],
		),
		"height" => with(&[("auto", "auto")], &[("full", "100%"), ("screen", "100vh")]),
		_ => colors,
	}
}
