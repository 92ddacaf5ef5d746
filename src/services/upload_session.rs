use crate::config::Settings;
use crate::error::{AppError, ErrorKind};
use crate::models::classify_types::RankedResults;
use crate::models::upload_types::{ImageFile, PreviewHandle, SessionSnapshot, SessionStatus};
use crate::services::classifier::{ranking, ClassificationService};
use crate::services::preview_service;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

struct SessionState {
    raw_file: Option<ImageFile>,
    preview: Option<PreviewHandle>,
    status: SessionStatus,
    results: Option<RankedResults>,
    error: Option<AppError>,
    notice: Option<AppError>,
    /// Bumped whenever the selection changes; completions tagged with an
    /// older value are dropped.
    generation: u64,
}

impl SessionState {
    fn new() -> Self {
        Self {
            raw_file: None,
            preview: None,
            status: SessionStatus::Idle,
            results: None,
            error: None,
            notice: None,
            generation: 0,
        }
    }

    fn clear(&mut self) {
        self.release_preview();
        self.raw_file = None;
        self.results = None;
        self.error = None;
        self.notice = None;
        self.status = SessionStatus::Idle;
        self.generation += 1;
    }

    fn release_preview(&mut self) {
        if let Some(preview) = self.preview.take() {
            debug!("Released preview ({} bytes)", preview.data_url.len());
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            file_name: self.raw_file.as_ref().map(|f| f.name.clone()),
            preview: self.preview.clone(),
            results: self.results.clone(),
            error: self.error.clone(),
            notice: self.notice.clone(),
            generation: self.generation,
        }
    }
}

/// Lifecycle of one image submission: select, preview, submit, outcome.
///
/// Cloning yields another handle to the same session. The state lock is never
/// held across the preview decode or the classification round trip.
#[derive(Clone)]
pub struct UploadSession {
    state: Arc<Mutex<SessionState>>,
    classifier: Arc<dyn ClassificationService>,
    updates: Arc<watch::Sender<SessionSnapshot>>,
    request_timeout: Duration,
    preview_max_edge: u32,
    preview_quality: u8,
}

impl UploadSession {
    pub fn new(classifier: Arc<dyn ClassificationService>, settings: &Settings) -> Self {
        let state = SessionState::new();
        let (updates, _) = watch::channel(state.snapshot());
        Self {
            state: Arc::new(Mutex::new(state)),
            classifier,
            updates: Arc::new(updates),
            request_timeout: settings.request_timeout(),
            preview_max_edge: settings.preview_max_edge,
            preview_quality: settings.preview_quality,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Receives a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    fn publish(&self, state: &SessionState) {
        self.updates.send_replace(state.snapshot());
    }

    /// Select a new image. Non-images and empty payloads are rejected without
    /// touching the current selection; the rejection is kept as the notice.
    pub async fn select_file(&self, file: ImageFile) -> Result<(), AppError> {
        let rejection = if !file.is_image() {
            Some(AppError::new(
                ErrorKind::InvalidMediaType,
                format!(
                    "{} is not an image ({}). Please upload an image file.",
                    file.name,
                    if file.media_type.is_empty() { "unknown type" } else { file.media_type.as_str() }
                ),
            ))
        } else if file.is_empty() {
            Some(AppError::new(
                ErrorKind::EmptyFile,
                format!("{} is empty. Please upload an image file.", file.name),
            ))
        } else {
            None
        };

        if let Some(err) = rejection {
            warn!("Rejected selection: {}", err);
            let mut state = self.state.lock().await;
            state.notice = Some(err.clone());
            self.publish(&state);
            return Err(err);
        }

        let generation = {
            let mut state = self.state.lock().await;
            state.clear();
            self.publish(&state);
            state.generation
        };

        let bytes = file.bytes.clone();
        let media_type = file.media_type.clone();
        let (max_edge, quality) = (self.preview_max_edge, self.preview_quality);
        let preview = tokio::task::spawn_blocking(move || {
            preview_service::generate_preview(&bytes, &media_type, max_edge, quality)
        })
        .await
        .map_err(|e| AppError::new(ErrorKind::Preview, format!("Preview task failed: {}", e)))?;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            debug!("Discarding stale preview for {} (generation {})", file.name, generation);
            return Ok(());
        }

        info!("Selected {} ({}, {} bytes)", file.name, file.media_type, file.len());
        state.raw_file = Some(file);
        state.preview = Some(preview);
        state.status = SessionStatus::Previewing;
        self.publish(&state);
        Ok(())
    }

    /// Submit the selected image and wait for the outcome.
    ///
    /// Returns `Ok(false)` when a request is already in flight. The outcome
    /// itself lands in the session state (`Completed` or `Failed`).
    pub async fn analyze(&self) -> Result<bool, AppError> {
        let Some((generation, file)) = self.begin_submission().await? else {
            return Ok(false);
        };
        let outcome = self.submit(&file).await;
        self.finish_submission(generation, outcome).await;
        Ok(true)
    }

    /// Like [`analyze`](Self::analyze) but runs the round trip on a spawned
    /// task and returns once the session is `Submitting`.
    pub async fn request_analysis(&self) -> Result<bool, AppError> {
        let Some((generation, file)) = self.begin_submission().await? else {
            return Ok(false);
        };
        let session = self.clone();
        tokio::spawn(async move {
            let outcome = session.submit(&file).await;
            session.finish_submission(generation, outcome).await;
        });
        Ok(true)
    }

    /// Wait until no request is in flight and return the resulting state.
    pub async fn settled(&self) -> SessionSnapshot {
        let mut rx = self.updates.subscribe();
        let settled = rx
            .wait_for(|s| !s.is_busy())
            .await
            .map(|s| s.clone());
        match settled {
            Ok(snapshot) => snapshot,
            Err(_) => self.snapshot().await,
        }
    }

    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.clear();
        debug!("Session reset (generation {})", state.generation);
        self.publish(&state);
    }

    async fn begin_submission(&self) -> Result<Option<(u64, ImageFile)>, AppError> {
        let mut state = self.state.lock().await;

        let file = match (state.status, state.raw_file.as_ref()) {
            (SessionStatus::Submitting, _) => {
                debug!("Analysis already in flight, ignoring request");
                return Ok(None);
            }
            (SessionStatus::Previewing | SessionStatus::Failed, Some(file)) => file.clone(),
            (status, _) => {
                return Err(AppError::new(
                    ErrorKind::NotReady,
                    format!("Cannot request analysis while {:?}; select an image first", status),
                ));
            }
        };

        state.status = SessionStatus::Submitting;
        state.results = None;
        state.error = None;
        state.notice = None;
        self.publish(&state);
        Ok(Some((state.generation, file)))
    }

    async fn submit(&self, file: &ImageFile) -> Result<RankedResults, AppError> {
        match tokio::time::timeout(self.request_timeout, self.classifier.classify(file)).await {
            Ok(Ok(results)) => ranking::rank(results),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(AppError::new(
                ErrorKind::Timeout,
                format!(
                    "No response from the classification service within {:.1}s",
                    self.request_timeout.as_secs_f64()
                ),
            )),
        }
    }

    async fn finish_submission(&self, generation: u64, outcome: Result<RankedResults, AppError>) {
        let mut state = self.state.lock().await;
        if state.generation != generation || state.status != SessionStatus::Submitting {
            debug!(
                "Discarding stale analysis result (generation {}, current {})",
                generation, state.generation
            );
            return;
        }

        match outcome {
            Ok(results) => {
                info!(
                    "Analysis complete: {} at {}%",
                    results.primary.label,
                    results.primary.percent()
                );
                state.results = Some(results);
                state.status = SessionStatus::Completed;
            }
            Err(e) => {
                if e.kind.is_terminal() {
                    warn!("Analysis failed ({}): {}", e.kind, e);
                } else {
                    error!("Analysis failed with unexpected {}: {}", e.kind, e);
                }
                state.results = None;
                state.error = Some(e);
                state.status = SessionStatus::Failed;
            }
        }
        self.publish(&state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classify_types::ClassificationResult;
    use crate::services::preview_service::tests::{sample_jpeg, sample_png};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{Notify, Semaphore};

    fn late_blight_results() -> Vec<ClassificationResult> {
        vec![
            ClassificationResult::new("Tomato Healthy", 0.02),
            ClassificationResult::new("Tomato Late Blight", 0.92)
                .with_description("Caused by Phytophthora infestans.")
                .with_treatment("Remove and destroy infected plants."),
        ]
    }

    /// Answers every call with the same outcome, optionally after a gate opens.
    struct ScriptedClassifier {
        outcome: Result<Vec<ClassificationResult>, AppError>,
        calls: AtomicUsize,
        gate: Option<Semaphore>,
        entered: Notify,
    }

    impl ScriptedClassifier {
        fn ok(results: Vec<ClassificationResult>) -> Self {
            Self {
                outcome: Ok(results),
                calls: AtomicUsize::new(0),
                gate: None,
                entered: Notify::new(),
            }
        }

        fn err(kind: ErrorKind, message: &str) -> Self {
            Self {
                outcome: Err(AppError::new(kind, message)),
                ..Self::ok(Vec::new())
            }
        }

        fn gated(mut self) -> Self {
            self.gate = Some(Semaphore::new(0));
            self
        }

        fn open(&self) {
            if let Some(gate) = &self.gate {
                gate.add_permits(16);
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ClassificationService for ScriptedClassifier {
        async fn classify(&self, file: &ImageFile) -> Result<Vec<ClassificationResult>, AppError> {
            assert!(!file.is_empty(), "submitted an empty payload");
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            if let Some(gate) = &self.gate {
                let _permit = gate.acquire().await.map_err(|_| AppError::from("gate closed"))?;
            }
            self.outcome.clone()
        }
    }

    struct SlowClassifier;

    #[async_trait]
    impl ClassificationService for SlowClassifier {
        async fn classify(&self, _file: &ImageFile) -> Result<Vec<ClassificationResult>, AppError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(late_blight_results())
        }
    }

    /// Labels each result with the submitted file name. Call `n` waits on gate `n`.
    struct EchoClassifier {
        gates: Vec<Semaphore>,
        calls: AtomicUsize,
        entered: Notify,
    }

    impl EchoClassifier {
        fn new(calls: usize) -> Self {
            Self {
                gates: (0..calls).map(|_| Semaphore::new(0)).collect(),
                calls: AtomicUsize::new(0),
                entered: Notify::new(),
            }
        }

        fn release(&self, call: usize) {
            self.gates[call].add_permits(1);
        }
    }

    #[async_trait]
    impl ClassificationService for EchoClassifier {
        async fn classify(&self, file: &ImageFile) -> Result<Vec<ClassificationResult>, AppError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            let gate = self.gates.get(call).ok_or("unexpected extra call")?;
            let _permit = gate.acquire().await.map_err(|_| AppError::from("gate closed"))?;
            Ok(vec![ClassificationResult::new(file.name.clone(), 0.9)])
        }
    }

    fn session_with(classifier: Arc<dyn ClassificationService>) -> UploadSession {
        UploadSession::new(classifier, &Settings::default())
    }

    fn leaf_jpeg() -> ImageFile {
        ImageFile::new("leaf.jpg", "image/jpeg", sample_jpeg(64, 48))
    }

    #[tokio::test]
    async fn jpeg_scenario_reaches_completed() {
        let classifier = Arc::new(ScriptedClassifier::ok(late_blight_results()).gated());
        let session = session_with(classifier.clone());

        session.select_file(leaf_jpeg()).await.unwrap();
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.status, SessionStatus::Previewing);
        assert!(snapshot.preview.is_some());
        assert_eq!(snapshot.file_name.as_deref(), Some("leaf.jpg"));

        assert!(session.request_analysis().await.unwrap());
        assert_eq!(session.snapshot().await.status, SessionStatus::Submitting);

        classifier.open();
        let snapshot = session.settled().await;
        assert_eq!(snapshot.status, SessionStatus::Completed);
        let results = snapshot.results.unwrap();
        assert_eq!(results.primary.label, "Tomato Late Blight");
        assert_eq!(results.primary.percent(), 92);
        assert_eq!(results.secondary[0].label, "Tomato Healthy");
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn text_file_is_rejected_without_transition() {
        let session = session_with(Arc::new(ScriptedClassifier::ok(late_blight_results())));

        let err = session
            .select_file(ImageFile::new("notes.txt", "text/plain", b"hello".to_vec()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidMediaType);

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.status, SessionStatus::Idle);
        assert!(snapshot.preview.is_none());
        assert_eq!(snapshot.notice.unwrap().kind, ErrorKind::InvalidMediaType);
    }

    #[tokio::test]
    async fn rejection_keeps_existing_preview() {
        let session = session_with(Arc::new(ScriptedClassifier::ok(late_blight_results())));
        session.select_file(leaf_jpeg()).await.unwrap();
        let before = session.snapshot().await;

        let err = session
            .select_file(ImageFile::new("leaf.png", "image/png", Vec::<u8>::new()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::EmptyFile);

        let after = session.snapshot().await;
        assert_eq!(after.status, SessionStatus::Previewing);
        assert_eq!(after.preview, before.preview);
        assert_eq!(after.file_name, before.file_name);
    }

    #[tokio::test]
    async fn non_image_after_completion_keeps_results() {
        let session = session_with(Arc::new(ScriptedClassifier::ok(late_blight_results())));
        session.select_file(leaf_jpeg()).await.unwrap();
        session.analyze().await.unwrap();
        let before = session.snapshot().await;
        assert_eq!(before.status, SessionStatus::Completed);

        let err = session
            .select_file(ImageFile::new("notes.txt", "text/plain", b"hello".to_vec()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidMediaType);

        let after = session.snapshot().await;
        assert_eq!(after.status, SessionStatus::Completed);
        assert_eq!(after.file_name, before.file_name);
        assert_eq!(after.preview, before.preview);
        assert_eq!(after.results, before.results);
        assert_eq!(after.generation, before.generation);
        assert_eq!(after.notice.unwrap().kind, ErrorKind::InvalidMediaType);
    }

    #[tokio::test]
    async fn unexpected_service_error_still_fails() {
        let classifier = Arc::new(ScriptedClassifier::err(ErrorKind::Internal, "worker panicked"));
        let session = session_with(classifier);
        session.select_file(leaf_jpeg()).await.unwrap();
        session.request_analysis().await.unwrap();

        let snapshot = session.settled().await;
        assert!(!snapshot.is_busy());
        assert_eq!(snapshot.status, SessionStatus::Failed);
        assert_eq!(snapshot.error.unwrap().kind, ErrorKind::Internal);
        assert!(snapshot.results.is_none());
    }

    #[tokio::test]
    async fn server_error_fails_without_results() {
        let classifier = Arc::new(ScriptedClassifier::err(
            ErrorKind::ServerError,
            "Classification service returned HTTP 500 Internal Server Error",
        ));
        let session = session_with(classifier.clone());
        session.select_file(leaf_jpeg()).await.unwrap();

        assert!(session.analyze().await.unwrap());
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.status, SessionStatus::Failed);
        assert!(snapshot.results.is_none());
        let error = snapshot.error.unwrap();
        assert_eq!(error.kind, ErrorKind::ServerError);
        assert!(error.message.contains("500"));
        assert_eq!(classifier.calls(), 1);
    }

    #[tokio::test]
    async fn malformed_results_fail_the_attempt() {
        let classifier = Arc::new(ScriptedClassifier::ok(vec![ClassificationResult::new(
            "Too sure", 1.5,
        )]));
        let session = session_with(classifier);
        session.select_file(leaf_jpeg()).await.unwrap();
        session.analyze().await.unwrap();

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.status, SessionStatus::Failed);
        assert!(snapshot.error.unwrap().kind.is_server_error());
        assert!(snapshot.results.is_none());
    }

    #[tokio::test]
    async fn second_request_while_submitting_is_a_noop() {
        let classifier = Arc::new(ScriptedClassifier::ok(late_blight_results()).gated());
        let session = session_with(classifier.clone());
        session.select_file(leaf_jpeg()).await.unwrap();

        assert!(session.request_analysis().await.unwrap());
        assert!(!session.request_analysis().await.unwrap());

        classifier.open();
        assert_eq!(session.settled().await.status, SessionStatus::Completed);
        assert_eq!(classifier.calls(), 1);
    }

    #[tokio::test]
    async fn concurrent_analyze_issues_one_request() {
        let classifier = Arc::new(ScriptedClassifier::ok(late_blight_results()).gated());
        let session = session_with(classifier.clone());
        session.select_file(leaf_jpeg()).await.unwrap();

        let release = async {
            tokio::task::yield_now().await;
            classifier.open();
        };
        let (a, b, _) =
            futures::future::join3(session.analyze(), session.analyze(), release).await;
        let started = [a.unwrap(), b.unwrap()];
        assert_eq!(started.iter().filter(|s| **s).count(), 1);
        assert_eq!(classifier.calls(), 1);
    }

    #[tokio::test]
    async fn stale_completion_is_discarded_after_new_selection() {
        let classifier = Arc::new(ScriptedClassifier::ok(late_blight_results()).gated());
        let session = session_with(classifier.clone());
        session.select_file(leaf_jpeg()).await.unwrap();

        let in_flight = tokio::spawn({
            let session = session.clone();
            async move { session.analyze().await }
        });
        classifier.entered.notified().await;

        session
            .select_file(ImageFile::new("other.png", "image/png", sample_png(8, 8)))
            .await
            .unwrap();
        classifier.open();
        assert!(in_flight.await.unwrap().unwrap());

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.status, SessionStatus::Previewing);
        assert_eq!(snapshot.file_name.as_deref(), Some("other.png"));
        assert!(snapshot.results.is_none());
    }

    #[tokio::test]
    async fn stale_completion_is_discarded_after_reset() {
        let classifier = Arc::new(ScriptedClassifier::ok(late_blight_results()).gated());
        let session = session_with(classifier.clone());
        session.select_file(leaf_jpeg()).await.unwrap();

        let in_flight = tokio::spawn({
            let session = session.clone();
            async move { session.analyze().await }
        });
        classifier.entered.notified().await;

        session.reset().await;
        classifier.open();
        assert!(in_flight.await.unwrap().unwrap());

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.status, SessionStatus::Idle);
        assert!(snapshot.results.is_none());
        assert!(snapshot.error.is_none());
        assert!(snapshot.file_name.is_none());
        assert!(snapshot.preview.is_none());
    }

    #[tokio::test]
    async fn older_completion_does_not_overwrite_newer_submission() {
        let classifier = Arc::new(EchoClassifier::new(2));
        let session = session_with(classifier.clone());

        session
            .select_file(ImageFile::new("a.png", "image/png", sample_png(8, 8)))
            .await
            .unwrap();
        let first = tokio::spawn({
            let session = session.clone();
            async move { session.analyze().await }
        });
        classifier.entered.notified().await;

        session
            .select_file(ImageFile::new("b.png", "image/png", sample_png(8, 8)))
            .await
            .unwrap();
        let second = tokio::spawn({
            let session = session.clone();
            async move { session.analyze().await }
        });
        classifier.entered.notified().await;
        assert_eq!(session.snapshot().await.status, SessionStatus::Submitting);

        classifier.release(0);
        assert!(first.await.unwrap().unwrap());
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.status, SessionStatus::Submitting);
        assert_eq!(snapshot.file_name.as_deref(), Some("b.png"));
        assert!(snapshot.results.is_none());

        classifier.release(1);
        assert!(second.await.unwrap().unwrap());
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.status, SessionStatus::Completed);
        assert_eq!(snapshot.results.unwrap().primary.label, "b.png");
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let session = session_with(Arc::new(SlowClassifier))
            .with_request_timeout(Duration::from_millis(50));
        session.select_file(leaf_jpeg()).await.unwrap();
        session.analyze().await.unwrap();

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.status, SessionStatus::Failed);
        assert_eq!(snapshot.error.unwrap().kind, ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn failed_attempt_can_be_retried() {
        let session = session_with(Arc::new(SlowClassifier))
            .with_request_timeout(Duration::from_millis(20));
        session.select_file(leaf_jpeg()).await.unwrap();
        session.analyze().await.unwrap();
        assert_eq!(session.snapshot().await.status, SessionStatus::Failed);

        // A new attempt is accepted and resolves again
        assert!(session.analyze().await.unwrap());
        assert_eq!(session.snapshot().await.status, SessionStatus::Failed);
    }

    #[tokio::test]
    async fn analysis_requires_a_selection() {
        let classifier = Arc::new(ScriptedClassifier::ok(late_blight_results()));
        let session = session_with(classifier.clone());

        let err = session.analyze().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotReady);
        assert_eq!(session.snapshot().await.status, SessionStatus::Idle);

        session.select_file(leaf_jpeg()).await.unwrap();
        session.analyze().await.unwrap();
        // Completed results must be replaced by a new selection first
        assert_eq!(session.analyze().await.unwrap_err().kind, ErrorKind::NotReady);
        assert_eq!(classifier.calls(), 1);
    }

    #[tokio::test]
    async fn reset_clears_every_state() {
        let classifier = Arc::new(ScriptedClassifier::ok(late_blight_results()));
        let session = session_with(classifier);

        session.reset().await;
        assert_eq!(session.snapshot().await.status, SessionStatus::Idle);

        session.select_file(leaf_jpeg()).await.unwrap();
        session.reset().await;
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.status, SessionStatus::Idle);
        assert!(snapshot.preview.is_none());

        session.select_file(leaf_jpeg()).await.unwrap();
        session.analyze().await.unwrap();
        assert_eq!(session.snapshot().await.status, SessionStatus::Completed);
        session.reset().await;

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.status, SessionStatus::Idle);
        assert!(snapshot.file_name.is_none());
        assert!(snapshot.preview.is_none());
        assert!(snapshot.results.is_none());
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn subscribers_see_each_transition() {
        let classifier = Arc::new(ScriptedClassifier::ok(late_blight_results()).gated());
        let session = session_with(classifier.clone());
        let mut rx = session.subscribe();

        session.select_file(leaf_jpeg()).await.unwrap();
        assert_eq!(rx.borrow_and_update().status, SessionStatus::Previewing);

        session.request_analysis().await.unwrap();
        assert_eq!(rx.borrow_and_update().status, SessionStatus::Submitting);

        classifier.open();
        let done = rx
            .wait_for(|s| s.status == SessionStatus::Completed)
            .await
            .unwrap()
            .clone();
        assert_eq!(done.results.unwrap().primary.label, "Tomato Late Blight");
    }
}
