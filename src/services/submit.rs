//! Test submission HTTP client

use reqwest::header::{CONTENT_TYPE, LOCATION};
use tracing::{debug, info};
use url::Url;

/// Where the client should navigate after a submission attempt succeeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server answered with a redirect; follow it exactly. This is
    /// how it signals "already submitted" or "go to results".
    Redirected(String),
    /// Plain success; fall back to the conventional results page
    Completed(String),
}

impl SubmitOutcome {
    pub fn destination(&self) -> &str {
        match self {
            SubmitOutcome::Redirected(url) => url,
            SubmitOutcome::Completed(url) => url,
        }
    }

    pub fn into_destination(self) -> String {
        match self {
            SubmitOutcome::Redirected(url) => url,
            SubmitOutcome::Completed(url) => url,
        }
    }
}

/// Client for the test-scoring server's submission endpoint.
///
/// Redirect following is disabled on the underlying client: the caller
/// must observe 3xx responses itself to honor the server-chosen target.
/// No request timeout is configured; transport defaults apply.
#[derive(Debug, Clone)]
pub struct SubmitClient {
    http_client: reqwest::Client,
    base_url: Url,
    test_id: u64,
}

impl SubmitClient {
    pub fn new(base_url: &str, test_id: u64) -> Result<Self, String> {
        let base_url = Url::parse(base_url)
            .map_err(|e| format!("Invalid scoring server URL {:?}: {}", base_url, e))?;
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http_client,
            base_url,
            test_id,
        })
    }

    /// Submission endpoint for this test
    pub fn submit_url(&self) -> String {
        format!(
            "{}/tests/{}/submit",
            self.base_url.as_str().trim_end_matches('/'),
            self.test_id
        )
    }

    /// Conventional results page, used when the server gives no redirect
    pub fn result_url(&self) -> String {
        format!(
            "{}/tests/{}/result",
            self.base_url.as_str().trim_end_matches('/'),
            self.test_id
        )
    }

    /// Issue one submission POST and classify the response.
    ///
    /// The request carries a JSON content-type header and no body; the
    /// answer sheet already lives server-side.
    pub async fn submit(&self) -> Result<SubmitOutcome, String> {
        let url = self.submit_url();
        debug!("Submitting test {} via {}", self.test_id, url);

        let response = self
            .http_client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| format!("Submission request failed: {}", e))?;

        let status = response.status();
        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| format!("Redirect ({}) without a Location header", status))?;
            let target = response
                .url()
                .join(location)
                .map_err(|e| format!("Invalid redirect target {:?}: {}", location, e))?;
            info!("Submission redirected to {}", target);
            Ok(SubmitOutcome::Redirected(target.to_string()))
        } else if status.is_success() {
            info!("Submission accepted ({})", status);
            Ok(SubmitOutcome::Completed(self.result_url()))
        } else {
            Err(format!("Submission failed with status {}", status))
        }
    }
}
