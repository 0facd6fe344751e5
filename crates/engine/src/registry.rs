//! Per-version engine module bundles.
//!
//! Each generation binds its own implementations of the engine seams. A
//! bundle is built on first request and cached for the registry's
//! lifetime; later resolutions return the same `Arc`.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use crate::apply::{ApplyExpander, ClassicApply, JitApply};
use crate::classic::{ClassicGenerator, EnumeratingGenerator};
use crate::jit::{CandidateRuleGenerator, ContextBuilder, RuleGenerator, StandardContextBuilder};
use crate::merge::VersionedMerger;
use crate::prefixer::{Autoprefixer, StandardPrefixer};
use crate::{ConfigMerger, EngineFault, EngineVersion, FeatureFlags};

/// Module handles for one engine generation. Optional seams are absent in
/// generations that do not support the matching strategy.
pub struct EngineBundle {
	pub version: EngineVersion,
	pub release: &'static str,
	pub feature_flags: FeatureFlags,
	pub config_merger: Arc<dyn ConfigMerger>,
	pub classic: Option<Arc<dyn ClassicGenerator>>,
	pub context_builder: Option<Arc<dyn ContextBuilder>>,
	pub rule_generator: Option<Arc<dyn RuleGenerator>>,
	pub jit_apply: Option<Arc<dyn ApplyExpander>>,
	pub classic_apply: Option<Arc<dyn ApplyExpander>>,
	pub autoprefixer: Arc<dyn Autoprefixer>,
}

impl fmt::Debug for EngineBundle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EngineBundle")
			.field("version", &self.version)
			.field("release", &self.release)
			.field("classic", &self.classic.is_some())
			.field("jit", &self.rule_generator.is_some())
			.finish_non_exhaustive()
	}
}

impl EngineBundle {
	fn build(version: EngineVersion) -> Self {
		let merger: Arc<dyn ConfigMerger> = Arc::new(VersionedMerger::new(version));
		let classic: Option<Arc<dyn ClassicGenerator>> = Some(Arc::new(EnumeratingGenerator));
		let classic_apply: Option<Arc<dyn ApplyExpander>> = Some(Arc::new(ClassicApply));
		let jit_apply: Option<Arc<dyn ApplyExpander>> = Some(Arc::new(JitApply));
		let generator: Option<Arc<dyn RuleGenerator>> = Some(Arc::new(CandidateRuleGenerator));
		let (classic, classic_apply, context_builder, rule_generator, jit_apply) = match version {
			EngineVersion::V1 => (classic, classic_apply, None, None, None),
			EngineVersion::V2 => (
				classic,
				classic_apply,
				Some(Arc::new(StandardContextBuilder { enumerable: false }) as Arc<dyn ContextBuilder>),
				generator,
				jit_apply,
			),
			EngineVersion::V3 => (
				None,
				None,
				Some(Arc::new(StandardContextBuilder { enumerable: true }) as Arc<dyn ContextBuilder>),
				generator,
				jit_apply,
			),
		};
		Self {
			version,
			release: version.release(),
			feature_flags: version.feature_flags(),
			config_merger: merger,
			classic,
			context_builder,
			rule_generator,
			jit_apply,
			classic_apply,
			autoprefixer: Arc::new(StandardPrefixer),
		}
	}
}

/// Lazily built, cached [`EngineBundle`]s keyed by version.
#[derive(Default)]
pub struct VersionRegistry {
	bundles: [OnceLock<Arc<EngineBundle>>; 3],
	initializations: AtomicUsize,
}

impl VersionRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Bundle for `version`, building it on first use.
	pub fn resolve(&self, version: EngineVersion) -> Arc<EngineBundle> {
		self.bundles[version.index()]
			.get_or_init(|| {
				self.initializations.fetch_add(1, Ordering::Relaxed);
				tracing::debug!(version = %version, release = version.release(), "engine bundle initialized");
				Arc::new(EngineBundle::build(version))
			})
			.clone()
	}

	/// Normalizes `tag` and resolves its bundle.
	pub fn resolve_tag(&self, tag: &str) -> Result<Arc<EngineBundle>, EngineFault> {
		Ok(self.resolve(EngineVersion::parse(tag)?))
	}

	/// How many bundles have been built so far.
	pub fn initializations(&self) -> usize {
		self.initializations.load(Ordering::Relaxed)
	}
}

impl fmt::Debug for VersionRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("VersionRegistry")
			.field("initializations", &self.initializations())
			.finish_non_exhaustive()
	}
}
