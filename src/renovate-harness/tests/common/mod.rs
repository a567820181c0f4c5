//! In-memory remote shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use renovate_harness::{
    BranchDeletion, CheckState, RemoteBranch, RemoteCommit, RemoteError, RemotePullRequest,
    RemoteRepository, RepositoryId,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Remote whose state is set up by the test and mutated by deletions.
#[derive(Default)]
pub struct InMemoryRemote {
    branches: Mutex<Vec<RemoteBranch>>,
    pulls: Vec<RemotePullRequest>,
    commits: Vec<RemoteCommit>,
    check_states: Mutex<VecDeque<CheckState>>,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_branch(self, name: &str, sha: &str) -> Self {
        self.branches
            .lock()
            .unwrap()
            .push(RemoteBranch {
                name: name.to_string(),
                sha: sha.to_string(),
            });
        self
    }

    pub fn with_pull_request(mut self, title: &str, body: &str, labels: &[&str]) -> Self {
        self.pulls.push(RemotePullRequest {
            number: self.pulls.len() as u64 + 1,
            title: title.to_string(),
            body: Some(body.to_string()),
            labels: labels.iter().map(|l| (*l).to_string()).collect(),
            head_branch: format!("renovate/{}", self.pulls.len()),
            auto_merge_enabled: false,
        });
        self
    }

    pub fn with_commit(mut self, message: &str) -> Self {
        self.commits.push(RemoteCommit {
            sha: format!("{:040}", self.commits.len()),
            message: message.to_string(),
        });
        self
    }

    /// States returned by successive check reads; the last one repeats.
    pub fn with_check_states(self, states: &[CheckState]) -> Self {
        self.check_states.lock().unwrap().extend(states);
        self
    }

    pub fn branch_names(&self) -> Vec<String> {
        self.branches
            .lock()
            .unwrap()
            .iter()
            .map(|b| b.name.clone())
            .collect()
    }
}

#[async_trait]
impl RemoteRepository for InMemoryRemote {
    async fn list_pull_requests(
        &self,
        _repo: &RepositoryId,
        _base: &str,
    ) -> Result<Vec<RemotePullRequest>, RemoteError> {
        Ok(self.pulls.clone())
    }

    async fn list_branches(&self, _repo: &RepositoryId) -> Result<Vec<RemoteBranch>, RemoteError> {
        Ok(self.branches.lock().unwrap().clone())
    }

    async fn delete_branch(
        &self,
        _repo: &RepositoryId,
        branch: &str,
    ) -> Result<BranchDeletion, RemoteError> {
        let mut branches = self.branches.lock().unwrap();
        let before = branches.len();
        branches.retain(|b| b.name != branch);

        if branches.len() < before {
            Ok(BranchDeletion::Deleted)
        } else {
            Ok(BranchDeletion::AlreadyGone)
        }
    }

    async fn check_state(
        &self,
        _repo: &RepositoryId,
        _reference: &str,
    ) -> Result<CheckState, RemoteError> {
        let mut states = self.check_states.lock().unwrap();
        let state = if states.len() > 1 {
            states.pop_front()
        } else {
            states.front().copied()
        };
        Ok(state.unwrap_or(CheckState::Pending))
    }

    async fn list_commits(
        &self,
        _repo: &RepositoryId,
        _branch: &str,
    ) -> Result<Vec<RemoteCommit>, RemoteError> {
        Ok(self.commits.clone())
    }
}
