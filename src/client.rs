//! Syncing view client: a reqwest transport plus the view model it keeps
//! reconciled against the server.
//!
//! The view is never authoritative. Stale is acceptable, wrong is not, so
//! every mutation here either reconciles against the server's response or
//! rolls back to the pre-request state. Two strategies cover the four
//! operations: full refresh (load, and the reload after a confirmed
//! create) and optimistic-local (delete applies after confirmation, the
//! toggle checkbox flips before it and reverts on failure).

use crate::api::ErrorBody;
use crate::todo::Todo;
use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Per-request timeout; expiry surfaces as an ordinary network error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

// ── View model ─────────────────────────────────────────────────

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: Uuid,
    pub text: String,
    pub checked: bool,
}

impl From<&Todo> for Entry {
    fn from(todo: &Todo) -> Entry {
        Entry {
            id: todo.id,
            text: todo.text.clone(),
            checked: todo.completed,
        }
    }
}

/// Completed-share summary over the current entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    /// Whole-number percentage, rounded half up; 0 for an empty list.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.done * 100 + self.total / 2) / self.total) as u32
    }
}

/// What the page shows: the list (or its error placeholder), the text box,
/// and a non-blocking notice describing the last operation's outcome.
///
/// Invariant: `load_failed` implies `entries` is empty — the placeholder
/// replaces the list, stale rows never sit next to an unreported error.
#[derive(Debug, Default, Clone)]
pub struct ListView {
    entries: Vec<Entry>,
    load_failed: bool,
    input: String,
    notice: Option<String>,
}

impl ListView {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Computed on demand, so optimistic flips and rollbacks show up
    /// immediately.
    pub fn progress(&self) -> Progress {
        Progress {
            done: self.entries.iter().filter(|e| e.checked).count(),
            total: self.entries.len(),
        }
    }

    fn fail_load(&mut self, err: &ClientError) {
        self.entries.clear();
        self.load_failed = true;
        self.notice = Some(err.to_string());
    }
}

// ── Errors ─────────────────────────────────────────────────────

/// Client-side failure taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Local validation: the trimmed input was empty. Never reaches the wire.
    EmptyText,
    /// Transport failure, including request timeout.
    Network(String),
    /// The server answered but the body was not the expected shape.
    Parse(String),
    /// The server answered with an error status.
    Rejected { status: StatusCode, message: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::EmptyText => write!(f, "todo text must not be empty"),
            ClientError::Network(e) => write!(f, "network error: {e}"),
            ClientError::Parse(e) => write!(f, "malformed server response: {e}"),
            ClientError::Rejected { status, message } => {
                write!(f, "server said {status}: {message}")
            }
        }
    }
}

// ── Client ─────────────────────────────────────────────────────

pub struct SyncClient {
    http: reqwest::Client,
    base_url: String,
    view: ListView,
}

impl SyncClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> SyncClient {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client builds with static options");
        SyncClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            view: ListView::default(),
        }
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    /// Models typing into the text box.
    pub fn set_input(&mut self, text: &str) {
        self.view.input = text.to_string();
    }

    // ── Operations ─────────────────────────────────────────────

    /// Full refresh: replace the rendered entries with the server list.
    /// On any failure the entries are cleared and the error placeholder
    /// shows instead.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        match self.fetch_all().await {
            Ok(todos) => {
                self.view.entries = todos.iter().map(Entry::from).collect();
                self.view.load_failed = false;
                self.view.notice = None;
                Ok(())
            }
            Err(err) => {
                self.view.fail_load(&err);
                Err(err)
            }
        }
    }

    /// Submit the text box as a new todo.
    ///
    /// Blank input is caught locally, before any request. A confirmed
    /// create clears the input and re-fetches the list (whose outcome is
    /// this method's outcome); on failure the input stays put so the user
    /// can retry without retyping.
    pub async fn submit_new(&mut self) -> Result<(), ClientError> {
        let text = self.view.input.trim().to_string();
        if text.is_empty() {
            return Err(self.report(ClientError::EmptyText));
        }

        let sent = self
            .http
            .post(self.todos_url())
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await;

        let resp = match sent {
            Ok(resp) => resp,
            Err(e) => return Err(self.report(ClientError::Network(e.to_string()))),
        };
        if !resp.status().is_success() {
            let err = rejection(resp).await;
            return Err(self.report(err));
        }

        self.view.input.clear();
        self.load().await
    }

    /// Delete over the wire; the local entry goes away only once the
    /// server confirms.
    pub async fn request_delete(&mut self, id: Uuid) -> Result<(), ClientError> {
        let sent = self.http.delete(self.todo_url(id)).send().await;

        let resp = match sent {
            Ok(resp) => resp,
            Err(e) => return Err(self.report(ClientError::Network(e.to_string()))),
        };
        if !resp.status().is_success() {
            let err = rejection(resp).await;
            return Err(self.report(err));
        }

        self.view.entries.retain(|e| e.id != id);
        self.view.notice = None;
        Ok(())
    }

    /// Toggle with checkbox semantics: flip locally first, then ask the
    /// server. A 200 reconciles the row to what the server stored; any
    /// failure — transport, error status, or an unparseable 200 body —
    /// reverts the flip.
    pub async fn request_toggle(&mut self, id: Uuid) -> Result<(), ClientError> {
        let prior = self.flip(id);

        match self.patch_todo(id).await {
            Ok(todo) => {
                if let Some(entry) = self.view.entries.iter_mut().find(|e| e.id == id) {
                    entry.text = todo.text;
                    entry.checked = todo.completed;
                }
                self.view.notice = None;
                Ok(())
            }
            Err(err) => {
                if let Some(prior) = prior {
                    if let Some(entry) = self.view.entries.iter_mut().find(|e| e.id == id) {
                        entry.checked = prior;
                    }
                }
                Err(self.report(err))
            }
        }
    }

    // ── Wire helpers ───────────────────────────────────────────

    async fn fetch_all(&self) -> Result<Vec<Todo>, ClientError> {
        let resp = self
            .http
            .get(self.todos_url())
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        resp.json::<Vec<Todo>>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn patch_todo(&self, id: Uuid) -> Result<Todo, ClientError> {
        let resp = self
            .http
            .patch(self.todo_url(id))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        resp.json::<Todo>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Flip the rendered checkbox, returning its pre-click value.
    fn flip(&mut self, id: Uuid) -> Option<bool> {
        let entry = self.view.entries.iter_mut().find(|e| e.id == id)?;
        let prior = entry.checked;
        entry.checked = !entry.checked;
        Some(prior)
    }

    fn report(&mut self, err: ClientError) -> ClientError {
        self.view.notice = Some(err.to_string());
        err
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn todo_url(&self, id: Uuid) -> String {
        format!("{}/todos/{id}", self.base_url)
    }
}

/// Turn an error-status response into `Rejected`, salvaging the body's
/// `error` message when it parses.
async fn rejection(resp: reqwest::Response) -> ClientError {
    let status = resp.status();
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => "unreadable error body".to_string(),
    };
    ClientError::Rejected { status, message }
}

// ── Tests ──────────────────────────────────────────────────────
