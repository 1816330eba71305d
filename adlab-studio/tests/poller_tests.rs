//! Job lifecycle tests with scripted provider operations.

use adlab_studio::{
    AspectRatio, JobStatus, KeyChooser, OperationHandle, PollPolicy, StudioError, VideoBrief,
    VideoLab, VideoOps,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

fn pending(name: &str) -> OperationHandle {
    OperationHandle { name: name.to_string(), done: false, result_uri: None, error: None }
}

fn finished(name: &str, uri: &str) -> OperationHandle {
    OperationHandle {
        name: name.to_string(),
        done: true,
        result_uri: Some(uri.to_string()),
        error: None,
    }
}

/// Provider fake driven by a script of outcomes. Tests hold an `Arc` so
/// they can inspect call counts after the lab consumes its clone.
#[derive(Default)]
struct ScriptedOps {
    submit_result: Mutex<Option<Result<OperationHandle, StudioError>>>,
    poll_script: Mutex<VecDeque<Result<OperationHandle, StudioError>>>,
    fetch_result: Mutex<Option<Result<Vec<u8>, StudioError>>>,
    submits: AtomicUsize,
    polls: AtomicUsize,
    fetches: AtomicUsize,
}

impl ScriptedOps {
    fn happy(ticks_until_done: usize) -> Arc<Self> {
        let ops = Arc::new(Self::default());
        *ops.submit_result.lock().unwrap() = Some(Ok(pending("operations/op1")));
        {
            let mut script = ops.poll_script.lock().unwrap();
            for _ in 0..ticks_until_done {
                script.push_back(Ok(pending("operations/op1")));
            }
            script.push_back(Ok(finished("operations/op1", "https://example.com/v?alt=media")));
        }
        *ops.fetch_result.lock().unwrap() = Some(Ok(vec![0xDE, 0xAD]));
        ops
    }
}

#[async_trait]
impl VideoOps for ScriptedOps {
    async fn submit(&self, _brief: &VideoBrief) -> Result<OperationHandle, StudioError> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        self.submit_result.lock().unwrap().take().expect("unexpected submit")
    }

    async fn poll(&self, _handle: &OperationHandle) -> Result<OperationHandle, StudioError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        self.poll_script.lock().unwrap().pop_front().expect("unexpected poll")
    }

    async fn fetch_result(&self, _locator: &str) -> Result<Vec<u8>, StudioError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.fetch_result.lock().unwrap().take().expect("unexpected fetch")
    }
}

/// Chooser fake counting prompts.
struct FakeChooser {
    selected: AtomicBool,
    select_on_prompt: bool,
    prompts: AtomicUsize,
}

impl FakeChooser {
    fn selected() -> Arc<Self> {
        Arc::new(Self {
            selected: AtomicBool::new(true),
            select_on_prompt: false,
            prompts: AtomicUsize::new(0),
        })
    }

    fn unselected(select_on_prompt: bool) -> Arc<Self> {
        Arc::new(Self {
            selected: AtomicBool::new(false),
            select_on_prompt,
            prompts: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl KeyChooser for FakeChooser {
    async fn has_selected_key(&self) -> bool {
        self.selected.load(Ordering::SeqCst)
    }

    async fn open_select_key(&self) {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        if self.select_on_prompt {
            self.selected.store(true, Ordering::SeqCst);
        }
    }
}

fn brief() -> VideoBrief {
    VideoBrief::new("studio lighting product shot").with_aspect_ratio(AspectRatio::Wide)
}

fn no_abandon() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

#[tokio::test(start_paused = true)]
async fn happy_path_completes_with_blob_uri() {
    let ops = ScriptedOps::happy(2);
    let lab = VideoLab::new(ops.clone(), FakeChooser::selected());
    let (_tx, abandon) = no_abandon();

    let mut statuses = Vec::new();
    let job = lab
        .generate(brief(), abandon, |job| statuses.push(job.status_message.clone()))
        .await;

    assert_eq!(job.status, JobStatus::Completed);
    let uri = job.result_uri.as_deref().unwrap();
    assert!(uri.starts_with("blob:"), "result must be a local locator, got {uri}");
    assert!(job.error.is_none());

    assert_eq!(lab.blobs().get(uri).unwrap().bytes, vec![0xDE, 0xAD]);
    assert_eq!(ops.submits.load(Ordering::SeqCst), 1);
    assert_eq!(ops.polls.load(Ordering::SeqCst), 3);

    assert_eq!(
        statuses,
        vec![
            "Starting video generation engine...",
            "AI is crafting scenes (usually takes 1-2 mins)...",
            "Rendering textures and motion...",
            "Rendering textures and motion...",
            "Finalizing video file...",
            "Video ready.",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn result_bytes_are_fetched_exactly_once() {
    let ops = ScriptedOps::happy(0);
    let lab = VideoLab::new(ops.clone(), FakeChooser::selected());
    let (_tx, abandon) = no_abandon();

    let job = lab.generate(brief(), abandon, |_| {}).await;
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(ops.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn entity_not_found_prompts_once_and_fails() {
    let ops = Arc::new(ScriptedOps::default());
    *ops.submit_result.lock().unwrap() = Some(Ok(pending("operations/op1")));
    ops.poll_script.lock().unwrap().push_back(Err(StudioError::EntityNotFound));

    let chooser = FakeChooser::selected();
    let lab = VideoLab::new(ops.clone(), chooser.clone());
    let (_tx, abandon) = no_abandon();

    let job = lab.generate(brief(), abandon, |_| {}).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.result_uri.is_none());
    assert_eq!(job.error.as_deref(), Some("Requested entity was not found"));
    assert_eq!(job.status_message, "Video generation failed.");
    assert_eq!(chooser.prompts.load(Ordering::SeqCst), 1);
    assert_eq!(ops.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn operation_error_mentioning_missing_entity_reopens_chooser() {
    let ops = Arc::new(ScriptedOps::default());
    *ops.submit_result.lock().unwrap() = Some(Ok(OperationHandle {
        name: "operations/op1".to_string(),
        done: true,
        result_uri: None,
        error: Some("Requested entity was not found.".to_string()),
    }));

    let chooser = FakeChooser::selected();
    let lab = VideoLab::new(ops, chooser.clone());
    let (_tx, abandon) = no_abandon();
    let job = lab.generate(brief(), abandon, |_| {}).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.is_some());
    assert_eq!(chooser.prompts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn abandon_cancels_the_pending_tick() {
    let ops = Arc::new(ScriptedOps::default());
    *ops.submit_result.lock().unwrap() = Some(Ok(pending("operations/op1")));
    let policy = PollPolicy { interval: Duration::from_secs(8) };
    let lab = VideoLab::new(ops.clone(), FakeChooser::selected()).with_policy(policy);

    let (tx, abandon) = no_abandon();
    let abandoner = async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        tx.send(true).unwrap();
    };

    let (job, ()) = tokio::join!(lab.generate(brief(), abandon, |_| {}), abandoner);

    assert_eq!(job.status, JobStatus::Polling);
    assert!(job.result_uri.is_none());
    assert_eq!(ops.polls.load(Ordering::SeqCst), 0, "no tick may fire after abandonment");
}

#[tokio::test(start_paused = true)]
async fn missing_key_prompts_then_proceeds_when_selected() {
    let chooser = FakeChooser::unselected(true);
    let lab = VideoLab::new(ScriptedOps::happy(0), chooser.clone());
    let (_tx, abandon) = no_abandon();

    let mut statuses = Vec::new();
    let job = lab
        .generate(brief(), abandon, |job| statuses.push(job.status_message.clone()))
        .await;

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(chooser.prompts.load(Ordering::SeqCst), 1);
    assert!(statuses.contains(&"Waiting for API Key selection...".to_string()));
}

#[tokio::test(start_paused = true)]
async fn missing_key_with_dismissed_prompt_fails_without_submitting() {
    let ops = Arc::new(ScriptedOps::default());
    let lab = VideoLab::new(ops.clone(), FakeChooser::unselected(false));
    let (_tx, abandon) = no_abandon();

    let job = lab.generate(brief(), abandon, |_| {}).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error.as_deref(), Some("no API key selected"));
    assert_eq!(ops.submits.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn done_without_locator_fails_before_any_fetch() {
    let ops = Arc::new(ScriptedOps::default());
    *ops.submit_result.lock().unwrap() = Some(Ok(OperationHandle {
        name: "operations/op1".to_string(),
        done: true,
        result_uri: None,
        error: None,
    }));

    let lab = VideoLab::new(ops.clone(), FakeChooser::selected());
    let (_tx, abandon) = no_abandon();
    let job = lab.generate(brief(), abandon, |_| {}).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.as_deref().unwrap().contains("result locator"));
    assert_eq!(ops.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn fetch_failure_is_terminal() {
    let ops = Arc::new(ScriptedOps::default());
    *ops.submit_result.lock().unwrap() =
        Some(Ok(finished("operations/op1", "https://example.com/v")));
    *ops.fetch_result.lock().unwrap() = Some(Err(StudioError::network("connection reset")));

    let lab = VideoLab::new(ops, FakeChooser::selected());
    let (_tx, abandon) = no_abandon();
    let job = lab.generate(brief(), abandon, |_| {}).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.as_deref().unwrap().contains("connection reset"));
    assert!(job.result_uri.is_none());
}
