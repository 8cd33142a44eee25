use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dashboard_engine::{
    EngineEvent, EngineHandle, EventSink, FailureKind, FetchError, OverviewFetcher, PollOutcome, PollSettings,
    Poller,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

enum Script {
    Body(&'static str),
    Error(FetchError),
    Hang,
}

struct ScriptedFetcher {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl OverviewFetcher for ScriptedFetcher {
    async fn fetch_overview(&self, _url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Body(body) => Ok(body.to_string()),
            Script::Error(err) => Err(err.clone()),
            Script::Hang => std::future::pending().await,
        }
    }
}

#[derive(Default)]
struct CollectingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl CollectingSink {
    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn settings() -> PollSettings {
    PollSettings {
        endpoint: "http://localhost:8080/overview".to_string(),
        interval: Duration::from_millis(15_000),
        clock: Arc::new(|| "now".to_string()),
    }
}

fn spawn_poller(
    poller: Arc<Poller>,
    sink: Arc<CollectingSink>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move { poller.run(sink.as_ref(), cancel).await })
}

async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

async fn advance_ms(ms: u64) {
    tokio::time::advance(Duration::from_millis(ms)).await;
    settle().await;
}

fn cycles(events: &[EngineEvent]) -> Vec<u64> {
    events
        .iter()
        .map(|event| match event {
            EngineEvent::Polled { cycle, .. } => *cycle,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn polls_immediately_then_once_per_interval() {
    let fetcher = ScriptedFetcher::new(Script::Body("{}"));
    let sink = Arc::new(CollectingSink::default());
    let cancel = CancellationToken::new();
    let poller = Arc::new(Poller::new(fetcher.clone(), settings()));
    let task = spawn_poller(poller, sink.clone(), cancel.clone());

    settle().await;
    assert_eq!(fetcher.calls(), 1);

    advance_ms(14_999).await;
    assert_eq!(fetcher.calls(), 1);

    advance_ms(1).await;
    assert_eq!(fetcher.calls(), 2);

    advance_ms(14_999).await;
    assert_eq!(fetcher.calls(), 2);

    cancel.cancel();
    task.await.unwrap();
    assert_eq!(cycles(&sink.take()), vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn refresh_polls_now_and_restarts_interval() {
    let fetcher = ScriptedFetcher::new(Script::Body("[]"));
    let sink = Arc::new(CollectingSink::default());
    let cancel = CancellationToken::new();
    let poller = Arc::new(Poller::new(fetcher.clone(), settings()));
    let refresh = poller.refresh_handle();
    let task = spawn_poller(poller, sink.clone(), cancel.clone());

    settle().await;
    advance_ms(5_000).await;
    refresh.notify_one();
    settle().await;
    assert_eq!(fetcher.calls(), 2);

    // The regular tick that was due at 15s moved to 20s.
    advance_ms(14_999).await;
    assert_eq!(fetcher.calls(), 2);
    advance_ms(1).await;
    assert_eq!(fetcher.calls(), 3);

    cancel.cancel();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn cancel_aborts_in_flight_fetch_without_event() {
    let fetcher = ScriptedFetcher::new(Script::Hang);
    let sink = Arc::new(CollectingSink::default());
    let cancel = CancellationToken::new();
    let poller = Arc::new(Poller::new(fetcher.clone(), settings()));
    let task = spawn_poller(poller, sink.clone(), cancel.clone());

    settle().await;
    assert_eq!(fetcher.calls(), 1);

    cancel.cancel();
    task.await.unwrap();
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn poll_once_classifies_outcomes() {
    let ok = Poller::new(
        ScriptedFetcher::new(Script::Body(r#"{"a":{"runId":1}}"#)),
        settings(),
    );
    let EngineEvent::Polled {
        cycle,
        completed_at,
        outcome,
    } = ok.poll_once(1).await;
    assert_eq!(cycle, 1);
    assert_eq!(completed_at, "now");
    assert!(matches!(outcome, PollOutcome::Loaded(ref c) if c.len() == 1));

    let garbage = Poller::new(ScriptedFetcher::new(Script::Body("<html>")), settings());
    let EngineEvent::Polled { outcome, .. } = garbage.poll_once(2).await;
    assert!(matches!(outcome, PollOutcome::ParseFailed(_)));

    let missing = Poller::new(
        ScriptedFetcher::new(Script::Error(FetchError {
            kind: FailureKind::HttpStatus(404),
            message: "404 Not Found".to_string(),
        })),
        settings(),
    );
    let EngineEvent::Polled { outcome, .. } = missing.poll_once(3).await;
    assert!(matches!(
        outcome,
        PollOutcome::FetchFailed(FetchError {
            kind: FailureKind::HttpStatus(404),
            ..
        })
    ));
}

#[test]
fn engine_handle_refresh_now_polls_without_waiting_for_the_interval() {
    dashboard_logging::initialize_for_tests();
    let fetcher = ScriptedFetcher::new(Script::Body("{}"));
    let poll = PollSettings {
        interval: Duration::from_secs(3_600),
        ..settings()
    };
    let engine = EngineHandle::with_fetcher(fetcher.clone(), poll).unwrap();

    let first = engine
        .recv_timeout(Duration::from_secs(5))
        .expect("initial poll");
    assert!(engine.recv_timeout(Duration::from_millis(100)).is_none());

    engine.refresh_now();
    let second = engine
        .recv_timeout(Duration::from_secs(5))
        .expect("refresh poll");

    assert_eq!(cycles(&[first, second]), vec![1, 2]);
    assert_eq!(fetcher.calls(), 2);
    engine.shutdown();
}
