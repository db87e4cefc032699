#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use readmebot_core::{
    BranchHead, CommitMessage, ConfigInputs, FileChange, FileUpdate, NewPullRequest,
    PullRequestHandle, PullRequestInfo, ReadmeBotError, ReadmeSnapshot, RepositoryClient,
    RunConfig,
};
use readmebot_pipeline::llm::LanguageModel;
use readmebot_pipeline::prompt::ResponseSchema;

/// One call made against [`InMemoryRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetFileContent { path: String, branch: String },
    GetPullRequest(u64),
    ListChangedFiles(u64),
    ListCommits(u64),
    GetBranch(String),
    CreateBranchRef { name: String, from_commit: String },
    UpdateFile(FileUpdate),
    CreatePullRequest(NewPullRequest),
}

#[derive(Debug, Clone, Default)]
struct Branch {
    head: String,
    files: HashMap<String, (String, String)>,
}

#[derive(Debug, Clone)]
struct Pull {
    files: Vec<FileChange>,
    commits: Vec<CommitMessage>,
}

#[derive(Debug, Default)]
struct State {
    branches: HashMap<String, Branch>,
    pulls: HashMap<u64, Pull>,
    opened: Vec<NewPullRequest>,
    calls: Vec<Call>,
    counter: u64,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}-{}", self.counter)
    }
}

/// A repository host kept in memory.
///
/// Clones share state, so a test can keep a handle while the orchestrator
/// owns another.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<State>>,
}

impl InMemoryRepository {
    /// An empty `main` branch.
    pub fn new() -> Self {
        let repo = Self::default();
        {
            let mut state = repo.state.lock().unwrap();
            let head = state.next_id("commit");
            state.branches.insert(
                "main".into(),
                Branch {
                    head,
                    files: HashMap::new(),
                },
            );
        }
        repo
    }

    pub fn with_file(self, branch: &str, path: &str, content: &str) -> Self {
        self.overwrite_file(branch, path, content);
        self
    }

    pub fn with_branch(self, name: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let head = state.next_id("commit");
            state.branches.insert(
                name.into(),
                Branch {
                    head,
                    files: HashMap::new(),
                },
            );
        }
        self
    }

    pub fn with_pull_request(
        self,
        number: u64,
        files: Vec<FileChange>,
        commits: Vec<CommitMessage>,
    ) -> Self {
        self.state
            .lock()
            .unwrap()
            .pulls
            .insert(number, Pull { files, commits });
        self
    }

    /// Commit `content` to `branch` as another actor would.
    pub fn overwrite_file(&self, branch: &str, path: &str, content: &str) {
        let mut state = self.state.lock().unwrap();
        let sha = state.next_id("blob");
        let head = state.next_id("commit");
        let entry = state.branches.entry(branch.into()).or_default();
        entry.files.insert(path.into(), (content.into(), sha));
        entry.head = head;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn write_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::CreateBranchRef { .. } | Call::UpdateFile(_) | Call::CreatePullRequest(_)
                )
            })
            .collect()
    }

    pub fn head_of(&self, branch: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .branches
            .get(branch)
            .map(|b| b.head.clone())
    }

    pub fn has_branch(&self, branch: &str) -> bool {
        self.state.lock().unwrap().branches.contains_key(branch)
    }

    /// `(content, revision)` of a file on a branch.
    pub fn file(&self, branch: &str, path: &str) -> Option<(String, String)> {
        self.state
            .lock()
            .unwrap()
            .branches
            .get(branch)
            .and_then(|b| b.files.get(path).cloned())
    }

    pub fn opened_pull_requests(&self) -> Vec<NewPullRequest> {
        self.state.lock().unwrap().opened.clone()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl RepositoryClient for InMemoryRepository {
    async fn get_file_content(
        &self,
        path: &str,
        branch: &str,
    ) -> Result<ReadmeSnapshot, ReadmeBotError> {
        self.record(Call::GetFileContent {
            path: path.into(),
            branch: branch.into(),
        });
        let (content, revision) = self
            .file(branch, path)
            .ok_or_else(|| ReadmeBotError::RepositoryRead(format!("{path}@{branch} not found")))?;
        Ok(ReadmeSnapshot {
            path: path.into(),
            content,
            revision,
        })
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequestInfo, ReadmeBotError> {
        self.record(Call::GetPullRequest(number));
        if !self.state.lock().unwrap().pulls.contains_key(&number) {
            return Err(ReadmeBotError::RepositoryRead(format!(
                "pull request #{number} not found"
            )));
        }
        Ok(PullRequestInfo {
            number,
            title: format!("PR {number}"),
            head_sha: format!("head-of-{number}"),
        })
    }

    async fn list_changed_files(&self, number: u64) -> Result<Vec<FileChange>, ReadmeBotError> {
        self.record(Call::ListChangedFiles(number));
        self.state
            .lock()
            .unwrap()
            .pulls
            .get(&number)
            .map(|p| p.files.clone())
            .ok_or_else(|| ReadmeBotError::RepositoryRead(format!("pull request #{number}")))
    }

    async fn list_commits(&self, number: u64) -> Result<Vec<CommitMessage>, ReadmeBotError> {
        self.record(Call::ListCommits(number));
        self.state
            .lock()
            .unwrap()
            .pulls
            .get(&number)
            .map(|p| p.commits.clone())
            .ok_or_else(|| ReadmeBotError::RepositoryRead(format!("pull request #{number}")))
    }

    async fn get_branch(&self, name: &str) -> Result<BranchHead, ReadmeBotError> {
        self.record(Call::GetBranch(name.into()));
        self.head_of(name)
            .map(|commit_sha| BranchHead {
                name: name.into(),
                commit_sha,
            })
            .ok_or_else(|| ReadmeBotError::RepositoryRead(format!("branch '{name}' not found")))
    }

    async fn create_branch_ref(
        &self,
        name: &str,
        from_commit: &str,
    ) -> Result<BranchHead, ReadmeBotError> {
        self.record(Call::CreateBranchRef {
            name: name.into(),
            from_commit: from_commit.into(),
        });
        let mut state = self.state.lock().unwrap();
        if state.branches.contains_key(name) {
            return Err(ReadmeBotError::BranchExists(name.into()));
        }
        let files = state
            .branches
            .values()
            .find(|b| b.head == from_commit)
            .map(|b| b.files.clone())
            .ok_or_else(|| {
                ReadmeBotError::RepositoryWrite(format!("unknown commit {from_commit}"))
            })?;
        state.branches.insert(
            name.into(),
            Branch {
                head: from_commit.into(),
                files,
            },
        );
        Ok(BranchHead {
            name: name.into(),
            commit_sha: from_commit.into(),
        })
    }

    async fn update_file(&self, update: &FileUpdate) -> Result<String, ReadmeBotError> {
        self.record(Call::UpdateFile(update.clone()));
        let mut state = self.state.lock().unwrap();
        let current = state
            .branches
            .get(&update.branch)
            .ok_or_else(|| {
                ReadmeBotError::RepositoryWrite(format!("branch '{}' not found", update.branch))
            })?
            .files
            .get(&update.path)
            .map(|(_, sha)| sha.clone());
        if current.as_deref() != Some(update.revision.as_str()) {
            return Err(ReadmeBotError::StaleReadme {
                path: update.path.clone(),
                revision: update.revision.clone(),
            });
        }
        let sha = state.next_id("blob");
        let head = state.next_id("commit");
        if let Some(branch) = state.branches.get_mut(&update.branch) {
            branch
                .files
                .insert(update.path.clone(), (update.content.clone(), sha.clone()));
            branch.head = head;
        }
        Ok(sha)
    }

    async fn create_pull_request(
        &self,
        request: &NewPullRequest,
    ) -> Result<PullRequestHandle, ReadmeBotError> {
        self.record(Call::CreatePullRequest(request.clone()));
        let mut state = self.state.lock().unwrap();
        if !state.branches.contains_key(&request.head) {
            return Err(ReadmeBotError::RepositoryWrite(format!(
                "head branch '{}' not found",
                request.head
            )));
        }
        state.opened.push(request.clone());
        let number = 100 + state.opened.len() as u64;
        Ok(PullRequestHandle {
            number,
            url: Some(format!("https://github.com/octocat/hello-world/pull/{number}")),
        })
    }
}

type Hook = Box<dyn Fn() + Send + Sync>;

/// A model that always gives the same answer.
pub struct StubModel {
    answer: Result<String, String>,
    invocations: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
    on_invoke: Option<Hook>,
}

impl StubModel {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Ok(answer.into()),
            invocations: Arc::default(),
            prompts: Arc::default(),
            on_invoke: None,
        }
    }

    pub fn suggesting(updated_readme: &str, reason: &str) -> Self {
        let json = serde_json::json!({
            "updated_readme": updated_readme,
            "reason": reason,
        });
        Self::answering(&json.to_string())
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.into()),
            ..Self::answering("")
        }
    }

    /// Run `hook` each time the model is invoked, before it answers.
    pub fn on_invoke(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_invoke = Some(Box::new(hook));
        self
    }

    pub fn invocation_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.invocations)
    }

    pub fn prompt_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

#[async_trait]
impl LanguageModel for StubModel {
    async fn invoke(
        &self,
        _system: &str,
        human: &str,
        _schema: &ResponseSchema,
    ) -> Result<String, ReadmeBotError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(human.to_string());
        if let Some(hook) = &self.on_invoke {
            hook();
        }
        self.answer.clone().map_err(ReadmeBotError::Upstream)
    }
}

pub const RUN_ID: &str = "4f2a9c1e7b3d5f6a";
pub const BRANCH: &str = "update-readme-4f2a9c1";

pub fn run_config(pr_number: u64) -> RunConfig {
    RunConfig::from_inputs(ConfigInputs {
        github_token: Some("ghp_test".into()),
        repository: Some("octocat/hello-world".into()),
        pr_number: Some(pr_number.to_string()),
        openai_api_key: Some("sk-test".into()),
        run_id: Some(RUN_ID.into()),
        ..ConfigInputs::default()
    })
    .expect("test configuration is valid")
}

pub fn dry_run_config(pr_number: u64) -> RunConfig {
    RunConfig::from_inputs(ConfigInputs {
        github_token: Some("ghp_test".into()),
        repository: Some("octocat/hello-world".into()),
        pr_number: Some(pr_number.to_string()),
        openai_api_key: Some("sk-test".into()),
        dry_run: true,
        ..ConfigInputs::default()
    })
    .expect("test configuration is valid")
}

pub fn app_py_change() -> FileChange {
    FileChange {
        filename: "app.py".into(),
        patch: "@@ -0,0 +1,2 @@\n+def main():\n+    print(\"hello\")".into(),
    }
}
