use pretty_assertions::assert_eq;

use super::*;

/// Echoes the markup back as CSS. `slow` takes longer, `stale` comes back
/// canceled and `down` fails the transport.
#[derive(Default)]
struct EchoService {
	calls: Mutex<Vec<CompileRequest>>,
}

impl CompileService for EchoService {
	fn compile(&self, request: CompileRequest) -> CompileFuture<'_> {
		self.calls.lock().push(request.clone());
		Box::pin(async move {
			let html = request.html.clone().unwrap_or_default();
			let delay = if html == "slow" { 100 } else { 1 };
			tokio::time::sleep(Duration::from_millis(delay)).await;
			if html == "down" {
				return Err(TransportError::Dropped);
			}
			Ok(CompileResponse {
				request_id: request.request_id,
				css: Some(format!("/* {html} */")),
				canceled: html == "stale",
				build_id: 1,
				..CompileResponse::default()
			})
		})
	}
}

fn edit(html: &str) -> Edit {
	Edit {
		html: Some(html.to_string()),
		..Edit::default()
	}
}

fn drain(rx: &mut mpsc::UnboundedReceiver<DisplayUpdate>) -> Vec<DisplayUpdate> {
	let mut out = Vec::new();
	while let Ok(update) = rx.try_recv() {
		out.push(update);
	}
	out
}

fn compiled(css: &str) -> DisplayUpdate {
	DisplayUpdate::Compiled {
		css: css.to_string(),
		html: None,
		jit: false,
		build_id: 1,
	}
}

#[tokio::test(start_paused = true)]
async fn rapid_edits_collapse_into_one_request() {
	let service = Arc::new(EchoService::default());
	let (dispatcher, mut rx) = Dispatcher::new(service.clone(), Duration::from_millis(200));
	let handles = vec![dispatcher.edit(edit("a")), dispatcher.edit(edit("ab")), dispatcher.edit(edit("abc"))];
	for handle in handles {
		handle.await.unwrap();
	}

	let calls = service.calls.lock();
	assert_eq!(calls.len(), 1);
	assert_eq!(calls[0].html.as_deref(), Some("abc"));
	assert!(!calls[0].request_id.is_empty());
	assert_eq!(
		drain(&mut rx),
		vec![DisplayUpdate::Loading(true), compiled("/* abc */"), DisplayUpdate::Loading(false)]
	);
}

#[tokio::test(start_paused = true)]
async fn canceled_responses_are_dropped() {
	let service = Arc::new(EchoService::default());
	let (dispatcher, mut rx) = Dispatcher::new(service, Duration::ZERO);
	dispatcher.edit(edit("stale")).await.unwrap();
	assert_eq!(drain(&mut rx), vec![DisplayUpdate::Loading(true)]);
}

#[tokio::test(start_paused = true)]
async fn older_responses_never_replace_newer_ones() {
	let service = Arc::new(EchoService::default());
	let (dispatcher, mut rx) = Dispatcher::new(service, Duration::ZERO);
	let slow = dispatcher.edit(edit("slow"));
	tokio::time::sleep(Duration::from_millis(10)).await;
	let fast = dispatcher.edit(edit("fast"));
	fast.await.unwrap();
	slow.await.unwrap();

	let updates = drain(&mut rx);
	let shown: Vec<&DisplayUpdate> = updates.iter().filter(|u| !matches!(u, DisplayUpdate::Loading(_))).collect();
	assert_eq!(shown, vec![&compiled("/* fast */")]);
	assert_eq!(updates.last(), Some(&DisplayUpdate::Loading(false)));
}

#[tokio::test(start_paused = true)]
async fn transport_failures_are_shown() {
	let service = Arc::new(EchoService::default());
	let (dispatcher, mut rx) = Dispatcher::new(service, Duration::ZERO);
	dispatcher.edit(edit("down")).await.unwrap();
	assert_eq!(
		drain(&mut rx),
		vec![
			DisplayUpdate::Loading(true),
			DisplayUpdate::Error(ResponseError::message("worker dropped the request before responding")),
			DisplayUpdate::Loading(false),
		]
	);
}

#[tokio::test(start_paused = true)]
async fn debounced_edits_merge_their_fields() {
	let service = Arc::new(EchoService::default());
	let (dispatcher, _rx) = Dispatcher::new(service.clone(), Duration::from_millis(50));
	let markup = dispatcher.edit(edit("p-4"));
	let stylesheet = dispatcher.edit(Edit {
		css: Some(".x { color: red }".into()),
		tailwind_version: Some("3".into()),
		..Edit::default()
	});
	markup.await.unwrap();
	stylesheet.await.unwrap();

	let calls = service.calls.lock();
	assert_eq!(calls.len(), 1);
	assert_eq!(calls[0].html.as_deref(), Some("p-4"));
	assert_eq!(calls[0].css.as_deref(), Some(".x { color: red }"));
	assert_eq!(calls[0].tailwind_version.as_deref(), Some("3"));
}

#[tokio::test(start_paused = true)]
async fn edits_reach_the_service_in_order() {
	let service = Arc::new(EchoService::default());
	let (dispatcher, _rx) = Dispatcher::new(service.clone(), Duration::ZERO);
	let handles: Vec<_> = ["a", "b", "c"].into_iter().map(|html| dispatcher.edit(edit(html))).collect();
	for handle in handles {
		handle.await.unwrap();
	}

	let calls = service.calls.lock();
	assert_eq!(calls.last().and_then(|call| call.html.as_deref()), Some("c"));
	let ids: std::collections::HashSet<_> = calls.iter().map(|call| call.request_id.as_str()).collect();
	assert_eq!(ids.len(), calls.len());
}

#[test]
fn merged_recompile_needs_every_edit_to_recompile() {
	let mut merged = Edit {
		recompile: true,
		tailwind_version: Some("1".into()),
		..Edit::default()
	};
	merged.merge(edit("p-4"));
	assert!(!merged.recompile);
	assert_eq!(merged.tailwind_version.as_deref(), Some("1"));
	assert_eq!(merged.html.as_deref(), Some("p-4"));
}
