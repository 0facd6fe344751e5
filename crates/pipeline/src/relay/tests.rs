use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::sync::Notify;
use windtunnel_engine::{ConfigError, UserConfig};

use super::*;

fn relay() -> Relay {
	Relay::new(PipelineOptions {
		default_version: "3".into(),
		..PipelineOptions::default()
	})
}

fn request(id: &str) -> CompileRequest {
	CompileRequest::new(id)
}

#[tokio::test]
async fn build_id_moves_only_with_content() {
	let relay = relay();
	let first = relay.submit(request("a").with_html("p-4")).await.unwrap();
	assert_eq!(first.build_id, 1);

	let config_only = relay.submit(request("b").with_config(r#"{ "prefix": "tw-" }"#)).await.unwrap();
	assert_eq!(config_only.build_id, 1);
	assert!(config_only.css.unwrap().is_empty());

	let flags_only = relay.submit(CompileRequest {
		skip_intellisense: Some(true),
		..request("c")
	})
	.await
	.unwrap();
	assert_eq!(flags_only.build_id, 1);

	let changed = relay.submit(request("d").with_css(".a { margin: 0 }")).await.unwrap();
	assert_eq!(changed.build_id, 2);
	assert_eq!(relay.committed_build().await, 2);
}

#[tokio::test]
async fn recompile_reuses_last_seen_inputs() {
	let relay = relay();
	relay.submit(request("a").with_html("text-red-500").with_version("2")).await.unwrap();
	let recompiled = relay
		.submit(CompileRequest {
			recompile: true,
			html: Some("ignored".into()),
			..request("b").with_version("3")
		})
		.await
		.unwrap();
	assert!(recompiled.jit);
	assert_eq!(recompiled.html.as_deref(), Some("text-red-500"));
	assert_eq!(recompiled.build_id, 1);
}

#[tokio::test]
async fn unknown_version_leaves_state_and_version_alone() {
	let relay = relay();
	relay.submit(request("a").with_html("p-4")).await.unwrap();
	let before = relay.intellisense().await;
	assert!(before.is_some());

	let bad = relay.submit(request("b").with_html("m-4").with_version("4")).await.unwrap();
	let error = bad.error.unwrap();
	assert_eq!(error.message, "unknown engine version `4`");
	assert_eq!(error.file, None);
	assert_eq!(relay.intellisense().await, before);

	let next = relay.submit(request("c")).await.unwrap();
	assert!(next.jit, "the last valid version stays in effect");
	assert!(next.css.unwrap().contains(".m-4 {"));
}

#[tokio::test]
async fn only_the_newest_request_commits() {
	let relay = relay();
	let older = relay.submit(request("a").with_html("p-4"));
	let newer = relay.submit(request("b").with_html("m-4"));
	let (older, newer) = tokio::join!(older, newer);
	let (older, newer) = (older.unwrap(), newer.unwrap());

	assert!(older.canceled);
	assert_eq!(older.css, None);
	assert!(!newer.canceled);
	assert!(newer.css.unwrap().contains(".m-4 {"));
	assert_eq!(relay.committed_build().await, newer.build_id);
}

#[tokio::test]
async fn skipped_intellisense_keeps_the_previous_state() {
	let relay = relay();
	relay.submit(request("a").with_html("p-4")).await.unwrap();
	let state = relay.intellisense().await.unwrap();
	assert!(state.class_list.is_some());
	assert_eq!(state.version, "3.0.24");

	relay
		.submit(CompileRequest {
			skip_intellisense: Some(true),
			..request("b").with_config(r#"{ "separator": "_" }"#)
		})
		.await
		.unwrap();
	assert_eq!(relay.intellisense().await.unwrap().separator, ":");
}

#[tokio::test]
async fn config_errors_are_tagged_config() {
	let relay = relay();
	let response = relay.submit(request("a").with_html("p-4").with_config("{\n  oops\n}")).await.unwrap();
	let error = response.error.unwrap();
	assert_eq!(error.file.as_deref(), Some("Config"));
	assert_eq!(error.line, Some(2));
	assert_eq!(response.css, None);
	assert_eq!(response.build_id, 0);
	assert_eq!(relay.build_id(), 0);
}

#[tokio::test]
async fn restarted_compute_keeps_numbering() {
	let relay = relay();
	relay.submit(request("a").with_html("p-4")).await.unwrap();
	relay.restart_compute();
	assert!(relay.is_compute_alive());
	let response = relay.submit(request("b").with_html("m-4")).await.unwrap();
	assert_eq!(response.build_id, 2);
	assert_eq!(relay.lint(), &LintSettings::default());
}

#[tokio::test]
async fn overlapping_requests_commit_only_the_last() {
	let relay = relay();
	let first = relay.submit(request("a").with_html("p-1").with_config(r#"{ "separator": "_" }"#));
	let second = relay.submit(request("b").with_html("p-2").with_config(r#"{ "separator": "$" }"#));
	let third = relay.submit(request("c").with_html("p-3").with_config(r#"{ "separator": "@" }"#));
	let (first, second, third) = tokio::join!(first, second, third);
	let (first, second, third) = (first.unwrap(), second.unwrap(), third.unwrap());

	for stale in [&first, &second] {
		assert!(stale.canceled, "{} should be canceled", stale.request_id);
		assert_eq!(stale.css, None);
	}
	assert!(!third.canceled);
	assert!(third.css.unwrap().contains(".p-3 {"));
	assert_eq!(third.build_id, 3);
	assert_eq!(relay.committed_build().await, 3);
	assert_eq!(relay.intellisense().await.unwrap().separator, "@");
}

/// Holds resolution of the `"gate"` config until released.
struct GatedResolver {
	entered: Arc<Notify>,
	gate: Arc<Notify>,
}

#[async_trait]
impl ConfigResolver for GatedResolver {
	async fn resolve(&self, source: &ConfigSource, version: EngineVersion) -> Result<UserConfig, ConfigError> {
		if matches!(source, ConfigSource::Text(text) if text == "gate") {
			self.entered.notify_one();
			self.gate.notified().await;
			return Ok(UserConfig::default());
		}
		JsonConfigResolver.resolve(source, version).await
	}
}

#[tokio::test]
async fn restart_fails_the_request_in_flight() {
	let entered = Arc::new(Notify::new());
	let gate = Arc::new(Notify::new());
	let resolver = GatedResolver {
		entered: entered.clone(),
		gate: gate.clone(),
	};
	let options = PipelineOptions {
		default_version: "3".into(),
		..PipelineOptions::default()
	};
	let relay = Arc::new(Relay::with_resolvers(options, Arc::new(resolver), Arc::new(DeclarationColorResolver)));

	let held = tokio::spawn({
		let relay = relay.clone();
		async move { relay.submit(request("a").with_html("p-4").with_config("gate")).await }
	});
	entered.notified().await;

	relay.restart_compute();
	let newer = relay.submit(request("b").with_html("m-4").with_config("{}")).await.unwrap();
	assert!(!newer.canceled);
	assert_eq!(newer.build_id, 1);

	gate.notify_waiters();
	assert_eq!(held.await.unwrap(), Err(TransportError::Dropped));
	assert_eq!(relay.committed_build().await, 1);
	assert_eq!(relay.intellisense().await.unwrap().separator, ":");
}
