//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use git2::{Repository, Signature};
use hookscribe::ApiConfig;
use serde_json::{Value, json};
use wiremock::MockServer;

/// Path the mock server serves the Messages API on.
pub const MESSAGES_PATH: &str = "/v1/messages";

pub const TEST_API_KEY: &str = "sk-test-api-key-12345";

/// Config pointing at a mock server, with a key and a short timeout.
pub fn mock_config(server: &MockServer) -> ApiConfig {
    ApiConfig::default()
        .with_api_key(TEST_API_KEY)
        .with_api_url(format!("{}{}", server.uri(), MESSAGES_PATH))
        .with_model("claude-test")
        .with_timeout(Duration::from_secs(5))
}

/// A successful Messages API body with a single text block.
pub fn message_body(text: &str) -> Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-test",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 10, "output_tokens": 20}
    })
}

/// An error body as the Messages API returns it.
pub fn error_body(kind: &str, message: &str) -> Value {
    json!({"type": "error", "error": {"type": kind, "message": message}})
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository on `branch` in a temp directory.
    pub fn on_branch(branch: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        repo.set_head(&format!("refs/heads/{}", branch))
            .expect("Failed to point HEAD at branch");
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file and add it to the index.
    pub fn stage(&self, name: &str, content: &str) {
        let file_path = self.dir.path().join(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(name)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Commit the current index.
    pub fn commit(&self, message: &str) {
        let sig =
            Signature::now("Test User", "test@example.com").expect("Failed to create signature");
        let tree_id = self
            .repo
            .index()
            .expect("Failed to get index")
            .write_tree()
            .expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit");
    }

    /// Move the staged changes into a separate index file and reset the
    /// default index to HEAD, the way `git commit -a` stages through a
    /// temporary index. Returns the path of the separate index.
    pub fn move_staged_to_separate_index(&self) -> PathBuf {
        let index_path = self.repo.path().join("next-index-test.lock");
        std::fs::copy(self.repo.path().join("index"), &index_path)
            .expect("Failed to copy index");

        let head_tree = self
            .repo
            .head()
            .expect("Failed to get HEAD")
            .peel_to_tree()
            .expect("Failed to peel HEAD to tree");
        let mut index = self.repo.index().expect("Failed to get index");
        index.read_tree(&head_tree).expect("Failed to reset index");
        index.write().expect("Failed to write index");

        index_path
    }

    /// Path of a commit message file inside the git dir, pre-filled like git does.
    pub fn message_file(&self) -> PathBuf {
        let path = self.repo.path().join("COMMIT_EDITMSG");
        std::fs::write(&path, "\n# Please enter the commit message for your changes.\n")
            .expect("Failed to write message file");
        path
    }
}
