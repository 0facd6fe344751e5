//! The compile entry point.
//!
//! One call turns a markup buffer and a stylesheet into CSS for a resolved
//! configuration. The pass runs parse, directive resolution, layer
//! assembly, `@apply`, purge and prefixing, in that order. The JIT path
//! generates rules for the candidates found in the markup; the classic
//! path enumerates the full utility layer with a sentinel-wrapped
//! separator that is swapped for the escaped real separator at the end.

use std::sync::Arc;
use std::time::Instant;

use windtunnel_css::{Node, Stylesheet, parse};

use crate::apply::ApplyExpander;
use crate::candidate;
use crate::classic::ClassicGenerator;
use crate::directives::{self, AuthoredLayers, Directives, LayerContent};
use crate::extract::extract_class_names;
use crate::generate::{GeneratedRule, into_nodes, sort_and_dedup};
use crate::jit::{JitContext, RuleGenerator};
use crate::merge::{Purge, VariantConfig};
use crate::preflight::{container, preflight};
use crate::purge::{PurgeSet, purge};
use crate::separator::{SelectorRewrite, replace_sentinels, sentinel};
use crate::state::{ClassNameEntry, StateSeed};
use crate::variants::VariantRegistry;
use crate::{EngineBundle, EngineError, EngineFault, EngineVersion, Mode, ResolvedConfig, Result};

/// Name of the in-memory markup file content sources are rebound to.
pub const VIRTUAL_HTML_FILENAME: &str = "/htmlInput";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileInput {
	pub markup: String,
	pub stylesheet: String,
	pub skip_intellisense: bool,
}

/// Result of a successful compile.
pub struct CompileOutput {
	pub css: String,
	/// The input markup, on the JIT path only.
	pub html: Option<String>,
	pub jit: bool,
	/// Present unless IntelliSense was skipped.
	pub state: Option<StateSeed>,
	/// Configuration the compile ran against, with content rebound.
	pub config: Arc<ResolvedConfig>,
	/// Evaluation context of the JIT path.
	pub context: Option<Arc<dyn JitContext>>,
}

impl std::fmt::Debug for CompileOutput {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CompileOutput")
			.field("css", &self.css)
			.field("html", &self.html)
			.field("jit", &self.jit)
			.field("state", &self.state)
			.finish_non_exhaustive()
	}
}

/// Compiles `input` against `config` with the modules of `bundle`.
pub fn compile(bundle: &EngineBundle, config: &ResolvedConfig, input: &CompileInput) -> Result<CompileOutput> {
	let started = Instant::now();
	let jit = config.jit();
	let output = if jit { compile_jit(bundle, config, input)? } else { compile_classic(bundle, config, input)? };
	tracing::debug!(
		version = %bundle.version,
		jit,
		bytes = output.css.len(),
		elapsed_ms = started.elapsed().as_millis() as u64,
		"compile finished"
	);
	Ok(output)
}

fn compile_jit(bundle: &EngineBundle, config: &ResolvedConfig, input: &CompileInput) -> Result<CompileOutput> {
	let builder = module(&bundle.context_builder, "context builder", bundle.version)?;
	let generator = module(&bundle.rule_generator, "rule generator", bundle.version)?;
	let apply = module(&bundle.jit_apply, "jit apply", bundle.version)?;

	let mut config = config.clone();
	config.content = vec![VIRTUAL_HTML_FILENAME.to_string()];
	config.purge.content = vec![VIRTUAL_HTML_FILENAME.to_string()];
	let config = Arc::new(config);
	let context = builder.build(config.clone())?;

	let generation = Generation::Jit {
		context: context.as_ref(),
		generator,
		apply,
		markup: &input.markup,
	};
	let sheet = run_pass(bundle, &config, &generation, &input.stylesheet, &config.separator)?;
	let css = sheet.to_string();

	let state = (!input.skip_intellisense).then(|| {
		let class_names = match bundle.version {
			EngineVersion::V3 => None,
			_ => unpurged_class_names(bundle, &config, &input.stylesheet),
		};
		seed(bundle, &config, true, class_names)
	});

	Ok(CompileOutput {
		css,
		html: Some(input.markup.clone()),
		jit: true,
		state,
		config,
		context: Some(context),
	})
}

fn compile_classic(bundle: &EngineBundle, config: &ResolvedConfig, input: &CompileInput) -> Result<CompileOutput> {
	let generator = module(&bundle.classic, "classic generator", bundle.version)?;
	let apply = module(&bundle.classic_apply, "classic apply", bundle.version)?;

	let mut config = config.clone();
	if config.purge.enabled {
		config.purge.content = vec![VIRTUAL_HTML_FILENAME.to_string()];
	}
	let config = Arc::new(config);
	let mut engine_config = (*config).clone();
	engine_config.separator = sentinel(&config.separator);

	let generation = Generation::Classic {
		generator,
		apply,
		purge: config.purge.enabled.then(|| PurgeSet::from_contents(&[input.markup.as_str()])),
	};
	let sheet = run_pass(bundle, &engine_config, &generation, &input.stylesheet, &config.separator)?;
	let css = replace_sentinels(&sheet.to_string(), &config.separator);

	let state = (!input.skip_intellisense).then(|| {
		let class_names = if config.purge.enabled {
			unpurged_class_names(bundle, &config, &input.stylesheet)
		} else {
			Some(extract_class_names(&sheet, &config.separator))
		};
		seed(bundle, &config, false, class_names)
	});

	Ok(CompileOutput {
		css,
		html: None,
		jit: false,
		state,
		config,
		context: None,
	})
}

fn seed(bundle: &EngineBundle, config: &ResolvedConfig, jit: bool, class_names: Option<Vec<ClassNameEntry>>) -> StateSeed {
	StateSeed {
		jit,
		class_names,
		separator: config.separator.clone(),
		version: bundle.release.to_string(),
		feature_flags: bundle.feature_flags.clone(),
	}
}

/// Class names from a classic pass with purge off and no variants, so
/// every base utility is present. A failing pass leaves them absent.
fn unpurged_class_names(bundle: &EngineBundle, config: &ResolvedConfig, stylesheet: &str) -> Option<Vec<ClassNameEntry>> {
	let pass = || -> Result<Vec<ClassNameEntry>> {
		let generator = module(&bundle.classic, "classic generator", bundle.version)?;
		let apply = module(&bundle.classic_apply, "classic apply", bundle.version)?;
		let mut lsp_config = config.clone();
		lsp_config.mode = Mode::Aot;
		lsp_config.purge = Purge::default();
		lsp_config.variants = VariantConfig::Global(Vec::new());
		lsp_config.separator = sentinel(&config.separator);
		let generation = Generation::Classic {
			generator,
			apply,
			purge: None,
		};
		let sheet = run_pass(bundle, &lsp_config, &generation, stylesheet, &config.separator)?;
		Ok(extract_class_names(&sheet, &config.separator))
	};
	match pass() {
		Ok(names) => Some(names),
		Err(error) => {
			tracing::warn!(%error, "class name pass failed");
			None
		}
	}
}

fn module<'a, T: ?Sized>(handle: &'a Option<Arc<T>>, module: &'static str, version: EngineVersion) -> Result<&'a T> {
	handle
		.as_deref()
		.ok_or(EngineError::Fault(EngineFault::ModuleUnavailable { module, version }))
}

enum Generation<'a> {
	Classic {
		generator: &'a dyn ClassicGenerator,
		apply: &'a dyn ApplyExpander,
		purge: Option<PurgeSet>,
	},
	Jit {
		context: &'a dyn JitContext,
		generator: &'a dyn RuleGenerator,
		apply: &'a dyn ApplyExpander,
		markup: &'a str,
	},
}

/// One full pass over `stylesheet`. `separator` is the real separator,
/// used to match purge content.
fn run_pass(
	bundle: &EngineBundle,
	config: &ResolvedConfig,
	generation: &Generation<'_>,
	stylesheet: &str,
	separator: &str,
) -> Result<Stylesheet> {
	let mut sheet = parse(stylesheet)?;
	directives::resolve_theme_functions(&mut sheet, config)?;
	directives::resolve_screen_rules(&mut sheet, config)?;
	let found = Directives::scan(&sheet)?;

	let registry = match generation {
		Generation::Classic { .. } => Some(VariantRegistry::new(config)),
		Generation::Jit { .. } => None,
	};
	let layers = directives::collect_layers(&mut sheet, config, &found, registry.as_ref())?;

	let (rules, with_container) = match generation {
		Generation::Classic { generator, .. } => (generator.generate(config), true),
		Generation::Jit {
			context,
			generator,
			markup,
			..
		} => {
			let used = candidate::extract(markup).contains(&format!("{}container", config.prefix));
			(generator.generate(*context, &[*markup]), used)
		}
	};
	let content = layer_content(config, rules, layers, with_container);
	directives::assemble(&mut sheet, &found, content);

	match generation {
		Generation::Classic { apply, purge: used, .. } => {
			let rewrite = SelectorRewrite::strip(&mut sheet);
			let applied = apply.expand(&mut sheet, None);
			rewrite.restore(&mut sheet);
			applied?;
			if let Some(used) = used {
				purge(&mut sheet, used, separator);
			}
		}
		Generation::Jit { context, apply, .. } => apply.expand(&mut sheet, Some(*context))?,
	}

	bundle.autoprefixer.process(&mut sheet);
	Ok(sheet)
}

fn layer_content(config: &ResolvedConfig, rules: Vec<GeneratedRule>, layers: AuthoredLayers, with_container: bool) -> LayerContent {
	let (responsive, utilities): (Vec<GeneratedRule>, Vec<GeneratedRule>) = rules.into_iter().partition(|rule| rule.responsive);
	let mut responsive = responsive;
	responsive.extend(layers.responsive);

	let mut base = preflight(config);
	base.extend(layers.base);
	let mut components: Vec<Node> = if with_container { container(config) } else { Vec::new() };
	components.extend(layers.components);
	let mut utility_nodes = into_nodes(utilities);
	utility_nodes.extend(layers.utilities);

	LayerContent {
		base,
		components,
		utilities: utility_nodes,
		responsive: into_nodes(sort_and_dedup(responsive)),
	}
}
