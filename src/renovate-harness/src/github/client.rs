//! [`RemoteRepository`] backed by the GitHub REST API via octocrab.

use super::status::{reduce_check_state, CheckRunList, CombinedStatus};
use super::{
    BranchDeletion, CheckState, RemoteBranch, RemoteCommit, RemoteError, RemotePullRequest,
    RemoteRepository, RepositoryId,
};
use crate::credentials::Token;
use crate::rate_limit::ensure_core_rate_limit;
use async_trait::async_trait;
use octocrab::params::repos::Reference;
use octocrab::{Octocrab, Page};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, Instrument};

/// Results per page for list endpoints.
const RESULTS_PER_PAGE: u8 = 100;

/// Authenticated GitHub API client.
///
/// Cheap to clone; holds no state beyond the HTTP client.
#[derive(Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
}

impl GitHubClient {
    /// Builds a client authenticated with a personal access token.
    pub fn new(token: &Token) -> Result<Self, RemoteError> {
        let octocrab = Octocrab::builder()
            .personal_token(token.expose().to_string())
            .build()?;
        Ok(Self { octocrab })
    }

    /// Fetches one page of a list endpoint and follows `Link` headers for the rest.
    async fn get_all<T>(&self, route: &str, query: &ListQuery<'_>) -> Result<Vec<T>, RemoteError>
    where
        T: serde::de::DeserializeOwned,
    {
        ensure_core_rate_limit(&self.octocrab).await?;
        let first: Page<T> = self.octocrab.get(route, Some(query)).await?;
        Ok(self.octocrab.all_pages(first).await?)
    }
}

#[derive(Debug, Serialize)]
struct ListQuery<'a> {
    per_page: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    base: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

impl Default for ListQuery<'_> {
    fn default() -> Self {
        Self {
            per_page: RESULTS_PER_PAGE,
            state: None,
            base: None,
            sha: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PullWire {
    number: u64,
    title: String,
    body: Option<String>,
    #[serde(default)]
    labels: Vec<LabelWire>,
    head: HeadWire,
    #[serde(default)]
    auto_merge: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct LabelWire {
    name: String,
}

#[derive(Debug, Deserialize)]
struct HeadWire {
    #[serde(rename = "ref")]
    branch: String,
}

#[derive(Debug, Deserialize)]
struct BranchWire {
    name: String,
    commit: ShaWire,
}

#[derive(Debug, Deserialize)]
struct ShaWire {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CommitWire {
    sha: String,
    commit: CommitDetailWire,
}

#[derive(Debug, Deserialize)]
struct CommitDetailWire {
    message: String,
}

impl From<PullWire> for RemotePullRequest {
    fn from(pull: PullWire) -> Self {
        Self {
            number: pull.number,
            title: pull.title,
            body: pull.body,
            labels: pull.labels.into_iter().map(|label| label.name).collect(),
            head_branch: pull.head.branch,
            auto_merge_enabled: pull.auto_merge.is_some_and(|value| !value.is_null()),
        }
    }
}

#[async_trait]
impl RemoteRepository for GitHubClient {
    async fn list_pull_requests(
        &self,
        repo: &RepositoryId,
        base: &str,
    ) -> Result<Vec<RemotePullRequest>, RemoteError> {
        let route = format!("/repos/{}/{}/pulls", repo.owner, repo.name);
        let query = ListQuery {
            state: Some("open"),
            base: Some(base),
            ..Default::default()
        };

        let pulls: Vec<PullWire> = self
            .get_all(&route, &query)
            .instrument(info_span!("list_pull_requests", repo = %repo, base))
            .await?;

        debug!(count = pulls.len(), "Listed pull requests");
        Ok(pulls.into_iter().map(RemotePullRequest::from).collect())
    }

    async fn list_branches(&self, repo: &RepositoryId) -> Result<Vec<RemoteBranch>, RemoteError> {
        let route = format!("/repos/{}/{}/branches", repo.owner, repo.name);

        let branches: Vec<BranchWire> = self
            .get_all(&route, &ListQuery::default())
            .instrument(info_span!("list_branches", repo = %repo))
            .await?;

        Ok(branches
            .into_iter()
            .map(|branch| RemoteBranch {
                name: branch.name,
                sha: branch.commit.sha,
            })
            .collect())
    }

    async fn delete_branch(
        &self,
        repo: &RepositoryId,
        branch: &str,
    ) -> Result<BranchDeletion, RemoteError> {
        let span = info_span!("delete_branch", repo = %repo, branch);

        async {
            ensure_core_rate_limit(&self.octocrab).await?;

            match self
                .octocrab
                .repos(&repo.owner, &repo.name)
                .delete_ref(&Reference::Branch(branch.to_string()))
                .await
            {
                Ok(()) => Ok(BranchDeletion::Deleted),
                Err(e) if is_missing_reference(&e) => {
                    info!("Branch was already gone");
                    Ok(BranchDeletion::AlreadyGone)
                }
                Err(e) => Err(e.into()),
            }
        }
        .instrument(span)
        .await
    }

    async fn check_state(
        &self,
        repo: &RepositoryId,
        reference: &str,
    ) -> Result<CheckState, RemoteError> {
        let span = info_span!("check_state", repo = %repo, reference);

        async {
            ensure_core_rate_limit(&self.octocrab).await?;

            let runs_route = format!(
                "/repos/{}/{}/commits/{}/check-runs",
                repo.owner, repo.name, reference
            );
            let runs: CheckRunList = self
                .octocrab
                .get(&runs_route, Some(&ListQuery::default()))
                .await?;

            let status_route = format!(
                "/repos/{}/{}/commits/{}/status",
                repo.owner, repo.name, reference
            );
            let combined: CombinedStatus = self.octocrab.get(&status_route, None::<&()>).await?;

            for run in &runs.check_runs {
                debug!(check = %run.name, status = %run.status, conclusion = ?run.conclusion, "Check run");
            }
            for status in &combined.statuses {
                debug!(context = %status.context, state = %status.state, "Commit status");
            }

            Ok(reduce_check_state(&runs.check_runs, &combined.statuses))
        }
        .instrument(span)
        .await
    }

    async fn list_commits(
        &self,
        repo: &RepositoryId,
        branch: &str,
    ) -> Result<Vec<RemoteCommit>, RemoteError> {
        let route = format!("/repos/{}/{}/commits", repo.owner, repo.name);
        let query = ListQuery {
            sha: Some(branch),
            ..Default::default()
        };

        let commits: Vec<CommitWire> = self
            .get_all(&route, &query)
            .instrument(info_span!("list_commits", repo = %repo, branch))
            .await?;

        Ok(commits
            .into_iter()
            .map(|commit| RemoteCommit {
                sha: commit.sha,
                message: commit.commit.message,
            })
            .collect())
    }
}

/// GitHub answers 404, or 422 "Reference does not exist", for refs that are gone.
fn is_missing_reference(error: &octocrab::Error) -> bool {
    match error {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code.as_u16();
            status == 404
                || (status == 422
                    && source
                        .message
                        .to_lowercase()
                        .contains("reference does not exist"))
        }
        _ => false,
    }
}
