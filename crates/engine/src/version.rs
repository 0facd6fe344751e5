//! Engine generations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::EngineFault;

/// One of the three supported engine generations.
///
/// The wire tag is the major version as a string: `'1' | '2' | '3'`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EngineVersion {
	/// Classic generation only, hex colors.
	V1,
	/// Classic by default, opt-in JIT.
	#[default]
	V2,
	/// JIT only.
	V3,
}

impl EngineVersion {
	pub const ALL: [Self; 3] = [Self::V1, Self::V2, Self::V3];

	/// Normalizes and validates a version tag.
	pub fn parse(tag: &str) -> Result<Self, EngineFault> {
		match tag.trim() {
			"1" => Ok(Self::V1),
			"2" => Ok(Self::V2),
			"3" => Ok(Self::V3),
			other => Err(EngineFault::UnknownVersion(other.to_string())),
		}
	}

	pub const fn tag(self) -> &'static str {
		match self {
			Self::V1 => "1",
			Self::V2 => "2",
			Self::V3 => "3",
		}
	}

	pub(crate) const fn index(self) -> usize {
		match self {
			Self::V1 => 0,
			Self::V2 => 1,
			Self::V3 => 2,
		}
	}

	/// Full release string reported in IntelliSense state.
	pub const fn release(self) -> &'static str {
		match self {
			Self::V1 => "1.9.6",
			Self::V2 => "2.2.19",
			Self::V3 => "3.0.24",
		}
	}

	pub fn feature_flags(self) -> FeatureFlags {
		let (future, experimental): (&[&str], &[&str]) = match self {
			Self::V1 => (
				&["removeDeprecatedGapUtilities", "purgeLayersByDefault", "defaultLineHeights", "standardFontWeights"],
				&["uniformColorPalette", "extendedSpacingScale", "extendedFontSizeScale", "applyComplexClasses", "darkModeVariant"],
			),
			Self::V2 => (&[], &["optimizeUniversalDefaults"]),
			Self::V3 => (&[], &["optimizeUniversalDefaults", "matchVariant"]),
		};
		FeatureFlags {
			future: future.iter().map(ToString::to_string).collect(),
			experimental: experimental.iter().map(ToString::to_string).collect(),
		}
	}
}

impl fmt::Display for EngineVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.tag())
	}
}

impl FromStr for EngineVersion {
	type Err = EngineFault;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl Serialize for EngineVersion {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.tag())
	}
}

impl<'de> Deserialize<'de> for EngineVersion {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let tag = String::deserialize(deserializer)?;
		Self::parse(&tag).map_err(serde::de::Error::custom)
	}
}

/// Flag lists a generation exposes to editor integrations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
	pub future: Vec<String>,
	pub experimental: Vec<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tags_are_normalized() {
		assert_eq!(EngineVersion::parse(" 3 ").unwrap(), EngineVersion::V3);
		assert_eq!("1".parse::<EngineVersion>().unwrap(), EngineVersion::V1);
		assert_eq!(EngineVersion::parse("4"), Err(EngineFault::UnknownVersion("4".into())));
		assert_eq!(EngineVersion::parse("v2"), Err(EngineFault::UnknownVersion("v2".into())));
	}

	#[test]
	fn serde_uses_the_wire_tag() {
		assert_eq!(serde_json::to_string(&EngineVersion::V2).unwrap(), "\"2\"");
		let parsed: EngineVersion = serde_json::from_str("\"3\"").unwrap();
		assert_eq!(parsed, EngineVersion::V3);
		assert!(serde_json::from_str::<EngineVersion>("\"9\"").is_err());
	}
}
