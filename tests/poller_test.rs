//! Integration tests for the job poller.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use untextract::error::{JobError, ProviderError};
use untextract::job::{JobPoller, OcrProvider, PollOptions};
use untextract::model::{Block, FeatureFlags, JobId, JobStatus, StatusResponse};

type Reply = Result<StatusResponse, ProviderError>;

/// Mock provider answering status calls from a script.
///
/// Once the script runs out it keeps answering `IN_PROGRESS`.
struct ScriptedProvider {
    script: Mutex<VecDeque<Reply>>,
    tokens: Mutex<Vec<Option<String>>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(script: Vec<Reply>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            tokens: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tokens(&self) -> Vec<Option<String>> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl OcrProvider for ScriptedProvider {
    async fn upload(&self, _data: &[u8], destination: &str) -> Result<String, ProviderError> {
        Ok(destination.to_string())
    }

    async fn start_analysis(
        &self,
        _location: &str,
        _features: FeatureFlags,
    ) -> Result<JobId, ProviderError> {
        Ok(JobId::new("scripted"))
    }

    async fn get_status(
        &self,
        _job_id: &JobId,
        token: Option<&str>,
    ) -> Result<StatusResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(token.map(str::to_string));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(StatusResponse::in_progress()))
    }
}

fn job() -> JobId {
    JobId::new("job-1")
}

fn page(ids: &[&str]) -> StatusResponse {
    StatusResponse::succeeded(ids.iter().map(|id| Block::word(*id, *id)).collect())
}

#[tokio::test(start_paused = true)]
async fn test_failed_job_stops_polling() {
    let provider = ScriptedProvider::new(vec![
        Ok(StatusResponse::in_progress()),
        Ok(StatusResponse::failed("unsupported document")),
    ]);

    let result = JobPoller::default().poll(&provider, &job()).await;

    assert_eq!(
        result,
        Err(JobError::Failed("unsupported document".to_string()))
    );
    assert_eq!(provider.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failed_on_first_poll() {
    let provider = ScriptedProvider::new(vec![Ok(StatusResponse::failed("bad input"))]);

    let result = JobPoller::default().poll(&provider, &job()).await;

    assert!(matches!(result, Err(JobError::Failed(_))));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_backoff_schedule() {
    // Six IN_PROGRESS answers: waits 5 + 10 + 20 + 40 + 60 + 60
    let mut script: Vec<Reply> = (0..6).map(|_| Ok(StatusResponse::in_progress())).collect();
    script.push(Ok(page(&["w1"])));
    let provider = ScriptedProvider::new(script);

    let started = Instant::now();
    let pages = JobPoller::default().poll(&provider, &job()).await.unwrap();

    assert_eq!(started.elapsed(), Duration::from_secs(195));
    assert_eq!(provider.calls(), 7);
    assert_eq!(pages.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_returns_no_blocks() {
    let provider = ScriptedProvider::new(Vec::new());
    let options = PollOptions::new().with_max_wait(Duration::from_secs(30));

    let started = Instant::now();
    let result = JobPoller::new(options).poll(&provider, &job()).await;

    assert!(matches!(result, Err(JobError::Timeout(_))));
    assert!(started.elapsed() <= Duration::from_secs(30));
    // polls at 0, 5 and 15 seconds, then the clamped wait to 30
    assert_eq!(provider.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_during_pagination_discards_pages() {
    let provider = ScriptedProvider::new(vec![
        Ok(page(&["w1"]).with_next_token("t2")),
        Err(ProviderError::poll("throttled")),
        Err(ProviderError::poll("throttled")),
        Err(ProviderError::poll("throttled")),
    ]);
    let options = PollOptions::new().with_max_wait(Duration::from_secs(20));

    let result = JobPoller::new(options).poll(&provider, &job()).await;

    assert!(matches!(result, Err(JobError::Timeout(_))));
}

#[tokio::test(start_paused = true)]
async fn test_pagination_in_token_order() {
    let provider = ScriptedProvider::new(vec![
        Ok(StatusResponse::in_progress()),
        Ok(page(&["a", "b"]).with_next_token("t2")),
        Ok(page(&["c"]).with_next_token("t3")),
        Ok(page(&["d", "e", "f"])),
    ]);

    let (status, pages) = JobPoller::default()
        .poll_with_status(&provider, &job())
        .await
        .unwrap();

    assert_eq!(status, JobStatus::Succeeded);
    let counts: Vec<usize> = pages.iter().map(|p| p.block_count()).collect();
    assert_eq!(counts, [2, 1, 3]);

    let blocks = untextract::model::concat_pages(pages);
    let ids: Vec<&str> = blocks.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c", "d", "e", "f"]);

    assert_eq!(
        provider.tokens(),
        [
            None,
            None,
            Some("t2".to_string()),
            Some("t3".to_string())
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_pagination_fetches_without_delay() {
    let provider = ScriptedProvider::new(vec![
        Ok(page(&["a"]).with_next_token("t2")),
        Ok(page(&["b"]).with_next_token("t3")),
        Ok(page(&["c"])),
    ]);

    let started = Instant::now();
    let pages = JobPoller::default().poll(&provider, &job()).await.unwrap();

    assert_eq!(pages.len(), 3);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_transient_poll_error_is_retried() {
    let provider = ScriptedProvider::new(vec![
        Err(ProviderError::poll("connection reset")),
        Ok(page(&["w1"])),
    ]);

    let started = Instant::now();
    let pages = JobPoller::default().poll(&provider, &job()).await.unwrap();

    assert_eq!(pages.len(), 1);
    assert_eq!(provider.calls(), 2);
    assert_eq!(started.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_partial_success_returns_pages() {
    let mut partial = StatusResponse::with_status(JobStatus::PartialSuccess);
    partial.blocks = vec![Block::line("l1", "kept")];
    let provider = ScriptedProvider::new(vec![Ok(partial)]);

    let (status, pages) = JobPoller::default()
        .poll_with_status(&provider, &job())
        .await
        .unwrap();

    assert_eq!(status, JobStatus::PartialSuccess);
    assert_eq!(pages[0].block_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_while_waiting() {
    let provider = ScriptedProvider::new(Vec::new());
    let poller = JobPoller::default();
    let handle = poller.cancel_handle();

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(12)).await;
        handle.cancel();
    });

    let started = Instant::now();
    let result = poller.poll(&provider, &job()).await;
    canceller.await.unwrap();

    assert_eq!(result, Err(JobError::Cancelled));
    assert_eq!(started.elapsed(), Duration::from_secs(12));
    // polls at 0 and 5 seconds; cancelled during the 10 second wait
    assert_eq!(provider.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_custom_backoff_options() {
    let mut script: Vec<Reply> = (0..3).map(|_| Ok(StatusResponse::in_progress())).collect();
    script.push(Ok(page(&["w1"])));
    let provider = ScriptedProvider::new(script);

    let options = PollOptions::new()
        .with_initial_delay(Duration::from_secs(1))
        .with_max_delay(Duration::from_secs(3))
        .with_multiplier(3);

    let started = Instant::now();
    JobPoller::new(options).poll(&provider, &job()).await.unwrap();

    // 1 + 3 + 3
    assert_eq!(started.elapsed(), Duration::from_secs(7));
}

/// Provider that answers `IN_PROGRESS` a few times, then never answers again.
struct StalledProvider {
    answers: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl OcrProvider for StalledProvider {
    async fn upload(&self, _data: &[u8], destination: &str) -> Result<String, ProviderError> {
        Ok(destination.to_string())
    }

    async fn start_analysis(
        &self,
        _location: &str,
        _features: FeatureFlags,
    ) -> Result<JobId, ProviderError> {
        Ok(JobId::new("stalled"))
    }

    async fn get_status(
        &self,
        _job_id: &JobId,
        _token: Option<&str>,
    ) -> Result<StatusResponse, ProviderError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.answers {
            return Ok(StatusResponse::in_progress());
        }
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn test_stalled_status_call_times_out() {
    let provider = StalledProvider {
        answers: 0,
        calls: AtomicUsize::new(0),
    };
    let options = PollOptions::new().with_max_wait(Duration::from_secs(30));

    let started = Instant::now();
    let result = tokio::time::timeout(
        Duration::from_secs(7200),
        JobPoller::new(options).poll(&provider, &job()),
    )
    .await
    .expect("poll should stop at max_wait");

    assert_eq!(result, Err(JobError::Timeout(Duration::from_secs(30))));
    assert_eq!(started.elapsed(), Duration::from_secs(30));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stall_after_progress_times_out_from_job_start() {
    let provider = StalledProvider {
        answers: 2,
        calls: AtomicUsize::new(0),
    };
    let options = PollOptions::new().with_max_wait(Duration::from_secs(60));

    let started = Instant::now();
    let result = JobPoller::new(options).poll(&provider, &job()).await;

    assert!(matches!(result, Err(JobError::Timeout(_))));
    // answered at 0 and 5 seconds, stalled on the call at 15
    assert_eq!(started.elapsed(), Duration::from_secs(60));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
}
