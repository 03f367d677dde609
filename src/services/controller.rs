//! Auto-submit controller

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::state::SessionState;

use super::submit::SubmitClient;

/// UI surface the controller drives while a submission is in flight.
///
/// These are pure affordances for the person taking the test, never a
/// security boundary; the scoring server is the only authority on
/// whether a submission counts.
pub trait ExamPage: Send + Sync {
    /// Disable interactive inputs so no edits land mid-submission
    fn lock_inputs(&self);
    /// Show the blocking "submitting..." overlay
    fn show_overlay(&self);
    /// Remove the overlay after a failed attempt
    fn hide_overlay(&self);
    /// Surface a submission error to the user
    fn show_error(&self, message: &str);
    /// Route the user to the post-submission destination
    fn navigate(&self, url: &str);
}

/// Exam page rendered as console output
#[derive(Debug, Default)]
pub struct ConsolePage;

impl ConsolePage {
    pub fn new() -> Self {
        Self
    }
}

impl ExamPage for ConsolePage {
    fn lock_inputs(&self) {
        info!("Inputs locked for submission");
    }

    fn show_overlay(&self) {
        println!();
        println!("Submitting your test...");
    }

    fn hide_overlay(&self) {
        info!("Submission overlay removed");
    }

    fn show_error(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn navigate(&self, url: &str) {
        println!("Your results: {}", url);
    }
}

/// Performs exactly one submission attempt per session and routes the
/// user to the right next page.
pub struct AutoSubmitController {
    client: SubmitClient,
    session: Arc<SessionState>,
    page: Arc<dyn ExamPage>,
}

impl AutoSubmitController {
    pub fn new(client: SubmitClient, session: Arc<SessionState>, page: Arc<dyn ExamPage>) -> Self {
        Self {
            client,
            session,
            page,
        }
    }

    /// Expiration hook: lock the page down, then submit.
    pub async fn on_expire(&self) {
        info!(
            "Time is up! Test {} will be submitted automatically",
            self.session.test_id
        );
        self.page.lock_inputs();
        self.page.show_overlay();

        if let Err(e) = self.submit().await {
            error!("Auto-submit for test {} failed: {}", self.session.test_id, e);
        }
    }

    /// Guarded submission attempt.
    ///
    /// Returns the navigation destination on success, `Ok(None)` when an
    /// attempt is already in progress (the call is a no-op), and an error
    /// when the attempt failed. Failure releases the guard so the user
    /// can retry manually; success leaves it held, since the session
    /// routes away and never submits again.
    pub async fn submit(&self) -> Result<Option<String>, String> {
        if !self.session.submission.begin() {
            info!("Submit already in progress");
            return Ok(None);
        }

        match self.client.submit().await {
            Ok(outcome) => {
                let destination = outcome.into_destination();
                // Successful submission ends the session: timer stopped,
                // persisted snapshot gone
                if let Err(e) = self.session.stop() {
                    warn!("Failed to stop timer after submission: {}", e);
                }
                self.page.navigate(&destination);
                self.session.mark_submitted();
                Ok(Some(destination))
            }
            Err(e) => {
                self.page.hide_overlay();
                self.page
                    .show_error("Error submitting test. Please try again.");
                self.session.submission.release();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemorySnapshotStore, SnapshotStore};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct RecordingPage {
        inputs_locked: AtomicBool,
        overlay_shown: AtomicBool,
        overlay_hidden: AtomicBool,
        errors: Mutex<Vec<String>>,
        navigated_to: Mutex<Option<String>>,
    }

    impl ExamPage for RecordingPage {
        fn lock_inputs(&self) {
            self.inputs_locked.store(true, Ordering::SeqCst);
        }

        fn show_overlay(&self) {
            self.overlay_shown.store(true, Ordering::SeqCst);
        }

        fn hide_overlay(&self) {
            self.overlay_hidden.store(true, Ordering::SeqCst);
        }

        fn show_error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }

        fn navigate(&self, url: &str) {
            *self.navigated_to.lock().unwrap() = Some(url.to_string());
        }
    }

    fn controller_with(
        server_uri: &str,
        test_id: u64,
    ) -> (AutoSubmitController, Arc<SessionState>, Arc<RecordingPage>) {
        let store = Arc::new(MemorySnapshotStore::new()) as Arc<dyn SnapshotStore>;
        let session = Arc::new(SessionState::initialize(test_id, 600, store));
        let page = Arc::new(RecordingPage::default());
        let client = SubmitClient::new(server_uri, test_id).unwrap();
        let controller = AutoSubmitController::new(
            client,
            Arc::clone(&session),
            Arc::clone(&page) as Arc<dyn ExamPage>,
        );
        (controller, session, page)
    }

    #[tokio::test]
    async fn on_expire_locks_page_and_navigates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tests/42/submit"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", "/tests/42/result?late=true"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (controller, session, page) = controller_with(&server.uri(), 42);
        controller.on_expire().await;

        assert!(page.inputs_locked.load(Ordering::SeqCst));
        assert!(page.overlay_shown.load(Ordering::SeqCst));
        assert_eq!(
            page.navigated_to.lock().unwrap().as_deref(),
            Some(format!("{}/tests/42/result?late=true", server.uri()).as_str())
        );
        // Successful submission ends the session
        assert!(!session.timer_snapshot().unwrap().running);
    }

    #[tokio::test]
    async fn second_submit_is_a_no_op() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tests/7/submit"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (controller, _session, _page) = controller_with(&server.uri(), 7);

        let first = controller.submit().await.unwrap();
        assert_eq!(first, Some(format!("{}/tests/7/result", server.uri())));

        // Guard stays held after success, so this issues no request
        let second = controller.submit().await.unwrap();
        assert_eq!(second, None);
    }

    #[tokio::test]
    async fn failure_releases_guard_for_manual_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tests/7/submit"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/tests/7/submit"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (controller, session, page) = controller_with(&server.uri(), 7);

        let err = controller.submit().await.unwrap_err();
        assert!(err.contains("500"));
        assert!(page.overlay_hidden.load(Ordering::SeqCst));
        assert_eq!(page.errors.lock().unwrap().len(), 1);
        assert!(!session.submission.is_in_progress());

        // Manual retry issues a fresh request and succeeds
        let retry = controller.submit().await.unwrap();
        assert_eq!(retry, Some(format!("{}/tests/7/result", server.uri())));
    }
}
