use std::time::Duration;

use chrono::NaiveDate;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{Result, StepStatsError};

use super::aggregator::WorkflowSource;
use super::types::{WorkflowJobsResponse, WorkflowRunsResponse};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const JOBS_PER_PAGE: usize = 100;

/// Fixed scope of the workflow-run listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFilter {
    /// Only runs on this branch
    pub branch: String,
    /// Only runs with this status (e.g. "success")
    pub status: String,
    /// Only runs created strictly after this date
    pub created_after: NaiveDate,
}

/// GitHub API client for fetching workflow data.
///
/// Every request is sent once, authenticated with the bearer token and bound
/// by the configured timeout.
pub struct GitHubClient {
    client: Client,
    runs_url: Url,
    filter: RunFilter,
    token: Token,
}

impl GitHubClient {
    /// Create a new GitHub API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitHub API base URL (e.g., <https://api.github.com>)
    /// * `repo_path` - Repository in `owner/repo` form
    /// * `filter` - Scope applied to every run listing
    /// * `token` - GitHub personal access token
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the base URL is invalid.
    pub fn new(
        base_url: &str,
        repo_path: &str,
        filter: RunFilter,
        token: Token,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        let client = Client::builder()
            .user_agent(concat!("stepstats/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| StepStatsError::Config(format!("Failed to create HTTP client: {e}")))?;

        let runs_url = Self::build_runs_url(base_url, repo_path)?;

        Ok(Self {
            client,
            runs_url,
            filter,
            token,
        })
    }

    fn build_runs_url(base_url: &str, repo_path: &str) -> Result<Url> {
        // Without a trailing slash `join` would replace the last path segment
        // of enterprise bases such as https://ghe.example.com/api/v3
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        Url::parse(&base)
            .map_err(|e| StepStatsError::Config(format!("Invalid base URL: {e}")))?
            .join(&format!("repos/{repo_path}/actions/runs"))
            .map_err(|e| StepStatsError::Config(format!("Invalid workflow runs URL: {e}")))
    }

    /// URL of one page of the filtered run listing.
    pub fn workflow_runs_page_url(&self, per_page: usize, page: usize) -> Url {
        let mut url = self.runs_url.clone();
        url.query_pairs_mut()
            .append_pair("branch", &self.filter.branch)
            .append_pair("status", &self.filter.status)
            .append_pair(
                "created",
                &format!(">{}", self.filter.created_after.format("%Y-%m-%d")),
            )
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());
        url
    }

    /// Fetch one page of workflow runs.
    pub async fn fetch_workflow_runs(
        &self,
        per_page: usize,
        page: usize,
    ) -> Result<WorkflowRunsResponse> {
        let url = self.workflow_runs_page_url(per_page, page);
        self.get_json(url.as_str()).await
    }

    /// URL of one page of a run's job listing.
    pub fn jobs_page_url(jobs_url: &str, page: usize) -> Result<Url> {
        let mut url = Url::parse(jobs_url)
            .map_err(|e| StepStatsError::Config(format!("Invalid jobs URL '{jobs_url}': {e}")))?;
        url.query_pairs_mut()
            .append_pair("per_page", &JOBS_PER_PAGE.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    /// Fetch every job behind a run's `jobs_url`.
    ///
    /// Pages are requested until the collected jobs reach the reported
    /// `total_count` or a page comes back empty.
    pub async fn fetch_jobs(&self, jobs_url: &str) -> Result<WorkflowJobsResponse> {
        let mut jobs = Vec::new();
        let mut total_count = 0;

        for page in 1.. {
            let url = Self::jobs_page_url(jobs_url, page)?;
            let response: WorkflowJobsResponse = self.get_json(url.as_str()).await?;
            total_count = response.total_count;

            let received = response.jobs.len();
            jobs.extend(response.jobs);
            if received == 0 || jobs.len() as u64 >= total_count {
                break;
            }
            debug!("Run jobs page {page}: {} of {total_count} jobs so far", jobs.len());
        }

        Ok(WorkflowJobsResponse { total_count, jobs })
    }

    async fn get_json<T>(&self, url: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .bearer_auth(self.token.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(StepStatsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl WorkflowSource for GitHubClient {
    async fn workflow_runs(&self, per_page: usize, page: usize) -> Result<WorkflowRunsResponse> {
        self.fetch_workflow_runs(per_page, page).await
    }

    async fn jobs(&self, jobs_url: &str) -> Result<WorkflowJobsResponse> {
        self.fetch_jobs(jobs_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn filter() -> RunFilter {
        RunFilter {
            branch: "hourly".to_string(),
            status: "success".to_string(),
            created_after: NaiveDate::from_ymd_opt(2023, 4, 12).unwrap(),
        }
    }

    fn client(base_url: &str) -> GitHubClient {
        GitHubClient::new(
            base_url,
            "owner/repo",
            filter(),
            Token::from("test-token"),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_runs_page_url_carries_filter_and_paging() {
        let client = client("https://api.github.com");

        let url = client.workflow_runs_page_url(100, 3);

        assert_eq!(url.path(), "/repos/owner/repo/actions/runs");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("branch".to_string(), "hourly".to_string())));
        assert!(pairs.contains(&("status".to_string(), "success".to_string())));
        assert!(pairs.contains(&("created".to_string(), ">2023-04-12".to_string())));
        assert!(pairs.contains(&("per_page".to_string(), "100".to_string())));
        assert!(pairs.contains(&("page".to_string(), "3".to_string())));
    }

    #[test]
    fn test_enterprise_base_path_is_kept() {
        let client = client("https://ghe.example.com/api/v3");

        let url = client.workflow_runs_page_url(10, 1);

        assert_eq!(url.path(), "/api/v3/repos/owner/repo/actions/runs");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = GitHubClient::new(
            "not a url",
            "owner/repo",
            filter(),
            Token::from("t"),
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(StepStatsError::Config(_))));
    }

    #[tokio::test]
    async fn test_fetch_runs_sends_auth_and_accept_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/owner/repo/actions/runs")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .match_header("authorization", "Bearer test-token")
            .match_header("accept", GITHUB_ACCEPT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"total_count": 1, "workflow_runs": [{"id": 7, "jobs_url": "http://x/jobs"}]}"#)
            .create_async()
            .await;

        let response = client(&server.url())
            .fetch_workflow_runs(100, 1)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.total_count, 1);
        assert_eq!(response.workflow_runs[0].id, 7);
        assert_eq!(response.workflow_runs[0].jobs_url, "http://x/jobs");
    }

    #[tokio::test]
    async fn test_non_success_status_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/owner/repo/actions/runs")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message": "Bad credentials"}"#)
            .create_async()
            .await;

        let result = client(&server.url()).fetch_workflow_runs(100, 1).await;

        match result {
            Err(StepStatsError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert!(message.contains("Bad credentials"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/jobs")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{not json")
            .create_async()
            .await;

        let result = client(&server.url())
            .fetch_jobs(&format!("{}/jobs", server.url()))
            .await;

        assert!(matches!(result, Err(StepStatsError::Json(_))));
    }

    fn jobs_body(total_count: usize, ids: std::ops::Range<u64>) -> String {
        let jobs: Vec<serde_json::Value> = ids
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "name": "build (ubuntu-22.04)",
                    "status": "completed",
                    "conclusion": "success",
                    "started_at": null,
                    "completed_at": null,
                })
            })
            .collect();
        serde_json::json!({ "total_count": total_count, "jobs": jobs }).to_string()
    }

    #[test]
    fn test_jobs_page_url_keeps_path() {
        let url = GitHubClient::jobs_page_url("https://api.github.com/repos/o/r/actions/runs/5/jobs", 2)
            .unwrap();

        assert_eq!(url.path(), "/repos/o/r/actions/runs/5/jobs");
        assert_eq!(url.query(), Some("per_page=100&page=2"));
    }

    #[tokio::test]
    async fn test_fetch_jobs_follows_pages_until_total_count() {
        // Arrange: 45 jobs split over two pages
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/runs/5/jobs")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("per_page".into(), "100".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(jobs_body(45, 0..30))
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/runs/5/jobs")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(jobs_body(45, 30..45))
            .expect(1)
            .create_async()
            .await;

        // Act
        let response = client(&server.url())
            .fetch_jobs(&format!("{}/runs/5/jobs", server.url()))
            .await
            .unwrap();

        // Assert
        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(response.total_count, 45);
        assert_eq!(response.jobs.len(), 45);
        assert_eq!(response.jobs[44].id, 44);
    }

    #[tokio::test]
    async fn test_fetch_jobs_stops_on_empty_page() {
        let mut server = mockito::Server::new_async().await;
        let _first = server
            .mock("GET", "/runs/6/jobs")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(jobs_body(45, 0..30))
            .create_async()
            .await;
        let second = server
            .mock("GET", "/runs/6/jobs")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(jobs_body(45, 0..0))
            .expect(1)
            .create_async()
            .await;

        let response = client(&server.url())
            .fetch_jobs(&format!("{}/runs/6/jobs", server.url()))
            .await
            .unwrap();

        second.assert_async().await;
        assert_eq!(response.total_count, 45);
        assert_eq!(response.jobs.len(), 30);
    }

    #[tokio::test]
    async fn test_unresponsive_server_is_a_network_error() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _accept = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = GitHubClient::new(
            &format!("http://{addr}"),
            "owner/repo",
            filter(),
            Token::from("test-token"),
            Duration::from_millis(300),
        )
        .unwrap();

        let result = client.fetch_workflow_runs(100, 1).await;

        assert!(matches!(result, Err(StepStatsError::Network(_))));
    }
}
