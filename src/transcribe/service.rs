//! Per-track transcription jobs
//!
//! Wraps a [`TranscriptionBackend`] in a job table keyed by track name.
//! At most one job runs per track; a second `begin` fails with
//! `AlreadyInProgress`. A finished job parks its outcome in the table
//! until the caller collects it with [`TranscribeService::take_outcome`]
//! and applies it to a store.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::backend::{TranscribeRequest, TranscriptionBackend};
use super::TranscribeMode;
use crate::error::{Result, SubtitleError, TranscribeError};
use crate::store::CueStore;
use crate::types::{Cue, NewCue};

/// Observable state of a track's transcription job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// No job and no uncollected outcome.
    Idle,
    /// The backend call is running.
    InFlight,
    /// Finished, outcome waiting to be collected.
    Completed,
    /// Failed, error waiting to be collected.
    Failed,
}

/// A completed job's payload.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub job_id: Uuid,
    pub mode: TranscribeMode,
    pub cues: Vec<NewCue>,
}

enum JobState {
    InFlight,
    Completed(Vec<NewCue>),
    Failed(TranscribeError),
}

struct Job {
    id: Uuid,
    mode: TranscribeMode,
    state: JobState,
    handle: Option<JoinHandle<()>>,
    done_tx: watch::Sender<bool>,
}

/// Job table over a shared backend.
///
/// Cheap to clone; clones share the backend and the table.
#[derive(Clone)]
pub struct TranscribeService {
    backend: Arc<dyn TranscriptionBackend>,
    jobs: Arc<DashMap<String, Job>>,
}

impl TranscribeService {
    pub fn new(backend: Arc<dyn TranscriptionBackend>) -> TranscribeService {
        TranscribeService {
            backend,
            jobs: Arc::new(DashMap::new()),
        }
    }

    /// Start a job for a track.
    ///
    /// Fails with `AlreadyInProgress` while a job for the same track is
    /// running. An uncollected outcome from an earlier job is discarded.
    pub fn begin(&self, track: &str, request: TranscribeRequest) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let mode = request.mode.clone();
        let (done_tx, _) = watch::channel(false);
        let job = Job {
            id,
            mode: mode.clone(),
            state: JobState::InFlight,
            handle: None,
            done_tx,
        };
        // Check and claim the slot in one entry lookup; a concurrent
        // begin must not also pass the in-flight check.
        let mut slot = match self.jobs.entry(track.to_string()) {
            Entry::Occupied(entry) if matches!(entry.get().state, JobState::InFlight) => {
                return Err(SubtitleError::AlreadyInProgress(track.to_string()));
            }
            Entry::Occupied(mut entry) => {
                entry.insert(job);
                entry.into_ref()
            }
            Entry::Vacant(entry) => entry.insert(job),
        };

        let backend = self.backend.clone();
        let jobs = self.jobs.clone();
        let task_track = track.to_string();
        let handle = tokio::spawn(async move {
            let result = backend.generate(request).await;
            // Write back only if this job still owns the slot; a cancel
            // plus a fresh begin may have raced us here.
            if let Some(mut entry) = jobs.get_mut(&task_track) {
                if entry.id == id {
                    entry.state = match result {
                        Ok(cues) => {
                            debug!("job {} produced {} cues", id, cues.len());
                            JobState::Completed(cues)
                        }
                        Err(e) => {
                            warn!("job {} failed: {}", id, e);
                            JobState::Failed(e)
                        }
                    };
                    let _ = entry.done_tx.send(true);
                }
            }
        });
        // The handle goes in while the entry is still held, so a cancel
        // can never observe this job without a handle to abort.
        slot.handle = Some(handle);
        drop(slot);

        info!("started {} job {} for track {}", mode, id, track);
        Ok(id)
    }

    /// Abort and forget a track's job, running or finished.
    pub fn cancel(&self, track: &str) -> Result<()> {
        let (_, job) = self
            .jobs
            .remove(track)
            .ok_or_else(|| SubtitleError::JobNotFound(track.to_string()))?;
        if let Some(handle) = job.handle {
            handle.abort();
        }
        // Dropping the job drops the watch sender, waking any waiters.
        info!("cancelled job {} for track {}", job.id, track);
        Ok(())
    }

    pub fn status(&self, track: &str) -> JobStatus {
        match self.jobs.get(track) {
            None => JobStatus::Idle,
            Some(job) => match job.state {
                JobState::InFlight => JobStatus::InFlight,
                JobState::Completed(_) => JobStatus::Completed,
                JobState::Failed(_) => JobStatus::Failed,
            },
        }
    }

    /// Collect a finished job's outcome, clearing the slot.
    ///
    /// `None` while the track is idle or the job is still running.
    pub fn take_outcome(
        &self,
        track: &str,
    ) -> Option<std::result::Result<JobOutcome, TranscribeError>> {
        let (_, job) = self
            .jobs
            .remove_if(track, |_, job| !matches!(job.state, JobState::InFlight))?;
        match job.state {
            JobState::Completed(cues) => Some(Ok(JobOutcome {
                job_id: job.id,
                mode: job.mode,
                cues,
            })),
            JobState::Failed(e) => Some(Err(e)),
            JobState::InFlight => None,
        }
    }

    /// Hooks-and-summary copy for the given cues.
    ///
    /// Runs inline rather than as a job: insights do not mutate any
    /// track, so the per-track serialization does not apply.
    pub async fn insights(
        &self,
        cues: &[Cue],
    ) -> std::result::Result<String, TranscribeError> {
        self.backend.generate_insights(cues).await
    }

    /// Wait until the track's job leaves the in-flight state. Returns
    /// immediately when there is no running job.
    pub async fn wait_finished(&self, track: &str) {
        let mut rx = match self.jobs.get(track) {
            Some(job) if matches!(job.state, JobState::InFlight) => job.done_tx.subscribe(),
            _ => return,
        };
        // The map guard is dropped here; never hold it across an await.
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                // Sender gone means the job was cancelled.
                return;
            }
        }
    }
}

/// Commit a collected outcome to a store.
///
/// Translation results go to a track named after the target language,
/// which gets tagged with it; every other mode overwrites the source
/// track. Returns the name of the track that was written.
pub fn apply_outcome(
    store: &mut CueStore,
    source_track: &str,
    outcome: JobOutcome,
) -> Result<String> {
    let JobOutcome { job_id, mode, cues } = outcome;
    let target = match &mode {
        TranscribeMode::Translate(lang) => {
            let target = format!("{} Track", lang);
            store.replace_track(&target, cues)?;
            store.set_track_language(&target, Some(lang.clone()))?;
            target
        }
        _ => {
            store.replace_track(source_track, cues)?;
            source_track.to_string()
        }
    };
    info!("applied {} job {} to track {}", mode, job_id, target);
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    struct MockBackend {
        cues: Vec<NewCue>,
        fail: Option<&'static str>,
        delay_ms: u64,
    }

    impl MockBackend {
        fn with_cues(cues: Vec<NewCue>) -> MockBackend {
            MockBackend {
                cues,
                fail: None,
                delay_ms: 0,
            }
        }

        fn failing(message: &'static str) -> MockBackend {
            MockBackend {
                cues: Vec::new(),
                fail: Some(message),
                delay_ms: 0,
            }
        }

        fn delayed(mut self, ms: u64) -> MockBackend {
            self.delay_ms = ms;
            self
        }
    }

    #[async_trait]
    impl TranscriptionBackend for MockBackend {
        async fn generate(
            &self,
            _request: TranscribeRequest,
        ) -> std::result::Result<Vec<NewCue>, TranscribeError> {
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            match self.fail {
                Some(message) => Err(TranscribeError::RequestFailed(message.to_string())),
                None => Ok(self.cues.clone()),
            }
        }

        async fn generate_insights(
            &self,
            _cues: &[Cue],
        ) -> std::result::Result<String, TranscribeError> {
            Ok("mock insights".to_string())
        }
    }

    fn service(backend: MockBackend) -> TranscribeService {
        TranscribeService::new(Arc::new(backend))
    }

    fn sample_cues() -> Vec<NewCue> {
        vec![
            NewCue::new(0.0, 3.5, "Welcome"),
            NewCue::new(3.8, 7.2, "Today"),
        ]
    }

    fn rewrite_request(mode: TranscribeMode) -> TranscribeRequest {
        TranscribeRequest::rewrite(mode, Vec::new())
    }

    #[tokio::test]
    async fn test_job_completes_and_outcome_collected() {
        let service = service(MockBackend::with_cues(sample_cues()));
        let id = service
            .begin("master", rewrite_request(TranscribeMode::Refine))
            .unwrap();
        service.wait_finished("master").await;
        assert_eq!(service.status("master"), JobStatus::Completed);

        let outcome = service.take_outcome("master").unwrap().unwrap();
        assert_eq!(outcome.job_id, id);
        assert_eq!(outcome.mode, TranscribeMode::Refine);
        assert_eq!(outcome.cues.len(), 2);
        // Slot is cleared once collected.
        assert_eq!(service.status("master"), JobStatus::Idle);
        assert!(service.take_outcome("master").is_none());
    }

    #[tokio::test]
    async fn test_second_begin_rejected_while_in_flight() {
        let service = service(MockBackend::with_cues(sample_cues()).delayed(200));
        service
            .begin("master", rewrite_request(TranscribeMode::Refine))
            .unwrap();
        assert_eq!(service.status("master"), JobStatus::InFlight);

        let err = service
            .begin("master", rewrite_request(TranscribeMode::Refine))
            .unwrap_err();
        assert!(matches!(err, SubtitleError::AlreadyInProgress(_)));

        // A different track is unaffected.
        service
            .begin("other", rewrite_request(TranscribeMode::Refine))
            .unwrap();

        service.wait_finished("master").await;
        assert!(service.take_outcome("master").unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_cancel_aborts_job() {
        let service = service(MockBackend::with_cues(sample_cues()).delayed(30_000));
        service
            .begin("master", rewrite_request(TranscribeMode::Refine))
            .unwrap();
        service.cancel("master").unwrap();
        assert_eq!(service.status("master"), JobStatus::Idle);
        assert!(service.take_outcome("master").is_none());

        // Nothing left to cancel.
        assert!(matches!(
            service.cancel("master"),
            Err(SubtitleError::JobNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_wait_returns_after_cancel() {
        let service = service(MockBackend::with_cues(sample_cues()).delayed(30_000));
        service
            .begin("master", rewrite_request(TranscribeMode::Refine))
            .unwrap();
        let waiter = {
            let service = service.clone();
            tokio::spawn(async move { service.wait_finished("master").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        service.cancel("master").unwrap();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_failed_job_yields_error_outcome() {
        let service = service(MockBackend::failing("boom"));
        service
            .begin("master", rewrite_request(TranscribeMode::Refine))
            .unwrap();
        service.wait_finished("master").await;
        assert_eq!(service.status("master"), JobStatus::Failed);

        let err = service.take_outcome("master").unwrap().unwrap_err();
        assert!(matches!(err, TranscribeError::RequestFailed(_)));
        assert_eq!(service.status("master"), JobStatus::Idle);
    }

    #[tokio::test]
    async fn test_wait_finished_with_no_job_returns() {
        let service = service(MockBackend::with_cues(Vec::new()));
        service.wait_finished("master").await;
    }

    #[test]
    fn test_apply_outcome_replaces_source_track() {
        let mut store = CueStore::new();
        store
            .add_cue("master", NewCue::new(0.0, 1.0, "old"))
            .unwrap();
        let outcome = JobOutcome {
            job_id: Uuid::new_v4(),
            mode: TranscribeMode::Refine,
            cues: sample_cues(),
        };
        let target = apply_outcome(&mut store, "master", outcome).unwrap();
        assert_eq!(target, "master");
        let texts: Vec<&str> = store
            .track("master")
            .unwrap()
            .cues()
            .iter()
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(texts, vec!["Welcome", "Today"]);
    }

    #[test]
    fn test_apply_outcome_translate_creates_language_track() {
        let mut store = CueStore::new();
        store
            .add_cue("master", NewCue::new(0.0, 1.0, "hello"))
            .unwrap();
        let outcome = JobOutcome {
            job_id: Uuid::new_v4(),
            mode: TranscribeMode::Translate("Spanish".to_string()),
            cues: vec![NewCue::new(0.0, 1.0, "hola")],
        };
        let target = apply_outcome(&mut store, "master", outcome).unwrap();
        assert_eq!(target, "Spanish Track");
        // Source track untouched, new track tagged with the language.
        assert_eq!(store.track("master").unwrap().cues()[0].text, "hello");
        let track = store.track("Spanish Track").unwrap();
        assert_eq!(track.language(), Some("Spanish"));
        assert_eq!(track.cues()[0].text, "hola");
    }

    #[test]
    fn test_apply_outcome_rejects_bad_batch() {
        let mut store = CueStore::new();
        store
            .add_cue("master", NewCue::new(0.0, 1.0, "old"))
            .unwrap();
        let outcome = JobOutcome {
            job_id: Uuid::new_v4(),
            mode: TranscribeMode::Refine,
            cues: vec![NewCue::new(2.0, 1.0, "bad")],
        };
        assert!(apply_outcome(&mut store, "master", outcome).is_err());
        // Old contents retained.
        assert_eq!(store.track("master").unwrap().cues()[0].text, "old");
    }
}
