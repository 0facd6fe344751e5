//! Color parsing, per-generation color output and class color resolution.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use windtunnel_css::Declaration;

use crate::EngineVersion;

/// 8-bit RGB color with a 0..=1 alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f32,
}

impl Rgba {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Parses `#rgb`, `#rrggbb`, `rgb()`/`rgba()` in comma or space syntax,
	/// and `transparent`. An alpha written as `var(...)` counts as opaque.
	pub fn parse(value: &str) -> Option<Self> {
		let value = value.trim();
		if value.eq_ignore_ascii_case("transparent") {
			return Some(Self { r: 0, g: 0, b: 0, a: 0.0 });
		}
		if let Some(hex) = value.strip_prefix('#') {
			return parse_hex(hex);
		}
		let lower = value.to_ascii_lowercase();
		let body = lower
			.strip_prefix("rgba(")
			.or_else(|| lower.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let (channels, alpha) = match body.split_once('/') {
			Some((channels, alpha)) => (channels, Some(alpha.trim())),
			None => (body, None),
		};
		let parts: Vec<&str> = channels
			.split(|c: char| c == ',' || c.is_whitespace())
			.filter(|s| !s.is_empty())
			.collect();
		let (rgb, alpha) = match (parts.as_slice(), alpha) {
			([r, g, b], alpha) => ([*r, *g, *b], alpha),
			([r, g, b, a], None) => ([*r, *g, *b], Some(*a)),
			_ => return None,
		};
		let channel = |s: &str| s.parse::<u8>().ok();
		Some(Self {
			r: channel(rgb[0])?,
			g: channel(rgb[1])?,
			b: channel(rgb[2])?,
			a: match alpha {
				None => 1.0,
				Some(a) if a.starts_with("var(") => 1.0,
				Some(a) => a.parse().ok()?,
			},
		})
	}
}

fn parse_hex(hex: &str) -> Option<Rgba> {
	let digit = |s: &str| u8::from_str_radix(s, 16).ok();
	match hex.len() {
		3 => {
			let mut it = hex.chars().map(|c| digit(&format!("{c}{c}")));
			Some(Rgba::rgb(it.next()??, it.next()??, it.next()??))
		}
		6 => Some(Rgba::rgb(digit(hex.get(0..2)?)?, digit(hex.get(2..4)?)?, digit(hex.get(4..6)?)?)),
		_ => None,
	}
}

impl fmt::Display for Rgba {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.a >= 1.0 {
			write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// How a generation writes color utilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFormat {
	/// The theme value verbatim.
	Plain,
	/// `--tw-*-opacity` plus `rgba(r, g, b, var(...))`.
	RgbaVar,
	/// `--tw-*-opacity` plus `rgb(r g b / var(...))`.
	RgbSpaceVar,
}

impl ColorFormat {
	pub const fn for_version(version: EngineVersion) -> Self {
		match version {
			EngineVersion::V1 => Self::Plain,
			EngineVersion::V2 => Self::RgbaVar,
			EngineVersion::V3 => Self::RgbSpaceVar,
		}
	}

	/// Declarations setting `prop` to `value`, using `opacity_var` when the
	/// value is an opaque parsable color.
	pub fn declarations(self, prop: &str, opacity_var: &str, value: &str) -> Vec<Declaration> {
		let rgba = Rgba::parse(value).filter(|c| c.a >= 1.0);
		match (self, rgba) {
			(Self::RgbaVar, Some(c)) => vec![
				Declaration::new(opacity_var, "1"),
				Declaration::new(prop, format!("rgba({}, {}, {}, var({opacity_var}))", c.r, c.g, c.b)),
			],
			(Self::RgbSpaceVar, Some(c)) => vec![
				Declaration::new(opacity_var, "1"),
				Declaration::new(prop, format!("rgb({} {} {} / var({opacity_var}))", c.r, c.g, c.b)),
			],
			_ => vec![Declaration::new(prop, value)],
		}
	}
}

/// Resolves the preview color of a class from its declarations.
#[async_trait]
pub trait ColorResolver: Send + Sync {
	async fn resolve(&self, class: &str, declarations: &[Declaration]) -> Option<Rgba>;
}

/// Resolves a class color when every color-carrying declaration agrees on
/// one parsable color.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarationColorResolver;

const COLOR_PROPS: [&str; 6] = ["color", "background-color", "border-color", "fill", "stroke", "outline-color"];

#[async_trait]
impl ColorResolver for DeclarationColorResolver {
	async fn resolve(&self, _class: &str, declarations: &[Declaration]) -> Option<Rgba> {
		let mut found: Option<Rgba> = None;
		for decl in declarations.iter().filter(|d| COLOR_PROPS.contains(&d.prop.as_str())) {
			let color = Rgba::parse(&decl.value)?;
			match found {
				Some(prev) if prev != color => return None,
				_ => found = Some(color),
			}
		}
		found
	}
}
