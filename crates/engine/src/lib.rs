//! Utility-CSS compilation engine.
//!
//! Turns a resolved framework configuration, a markup buffer and a
//! stylesheet into compiled CSS. Three engine generations coexist; each is
//! described by an [`EngineBundle`] resolved once through the
//! [`VersionRegistry`].
//!
//! Two generation strategies exist. The classic (ahead-of-time) path
//! enumerates every utility and variant the configuration allows and
//! optionally purges against the markup. The just-in-time path scans the
//! markup for candidates and generates only those.

pub mod apply;
pub mod candidate;
pub mod classic;
pub mod color;
pub mod compile;
pub mod config;
mod defaults;
pub mod directives;
mod error;
pub mod extract;
pub mod generate;
pub mod jit;
pub mod merge;
pub mod prefixer;
mod preflight;
pub mod purge;
pub mod registry;
pub mod separator;
pub mod state;
pub mod theme;
pub mod utilities;
pub mod variants;
mod version;

pub use compile::{CompileInput, CompileOutput, VIRTUAL_HTML_FILENAME, compile};
pub use config::{ConfigResolver, ConfigSource, JsonConfigResolver, UserConfig};
pub use error::{ConfigError, EngineError, EngineFault, Result};
pub use merge::{ConfigMerger, DarkMode, Mode, ResolvedConfig};
pub use registry::{EngineBundle, VersionRegistry};
pub use state::{ClassListEntry, ClassNameEntry, IntelliSenseState, StateSeed};
pub use version::{EngineVersion, FeatureFlags};
