//! Durable set of video ids that were already notified (or recorded at bootstrap).
//!
//! Storage layout: a single pretty-printed JSON array of id strings. The whole
//! file is rewritten (temp file + rename, on the blocking pool) after every
//! mutation. Persistence failures are logged and swallowed; the in-memory set
//! stays authoritative for the rest of the process.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use tokio::sync::Mutex;

use crate::{errors::Error, Result};

#[derive(Debug, Default)]
struct SeenState {
    ids: HashSet<String>,
    /// Insertion order, for enumeration and stable file output.
    order: Vec<String>,
}

impl SeenState {
    fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.to_string());
        self.order.push(id.to_string());
        true
    }
}

pub struct SeenStore {
    path: PathBuf,
    state: Mutex<SeenState>,
}

impl SeenStore {
    /// Load the store from `path`.
    ///
    /// A missing file is created empty. A corrupt file is moved aside to
    /// `<file>.corrupt` and the store starts empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut state = SeenState::default();

        match read_ids(&path) {
            Ok(Some(ids)) => {
                for id in &ids {
                    state.insert(id);
                }
                tracing::info!(
                    count = state.order.len(),
                    path = %path.display(),
                    "loaded seen videos"
                );
            }
            Ok(None) => {
                if let Err(e) = write_ids(&path, &state.order) {
                    tracing::error!(path = %path.display(), "failed to create seen store: {e}");
                } else {
                    tracing::info!(path = %path.display(), "created empty seen store");
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "seen store unreadable, starting empty: {e}"
                );
                quarantine(&path);
                if let Err(e) = write_ids(&path, &state.order) {
                    tracing::error!(path = %path.display(), "failed to reset seen store: {e}");
                }
            }
        }

        Self {
            path,
            state: Mutex::new(state),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn is_seen(&self, id: &str) -> bool {
        self.state.lock().await.ids.contains(id)
    }

    /// Record `id` and persist. Returns `true` when the id was new.
    ///
    /// Already-seen ids are a no-op (no rewrite).
    pub async fn mark_seen(&self, id: &str) -> bool {
        let mut st = self.state.lock().await;
        if !st.insert(id) {
            return false;
        }
        self.persist_locked(&st).await;
        true
    }

    /// Record a batch of ids with a single persist. Returns how many were new.
    pub async fn mark_all_seen<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> usize {
        let mut st = self.state.lock().await;
        let added = ids.into_iter().filter(|id| st.insert(id)).count();
        if added > 0 {
            self.persist_locked(&st).await;
        }
        added
    }

    /// All recorded ids, in insertion order.
    pub async fn all_seen(&self) -> Vec<String> {
        self.state.lock().await.order.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.order.is_empty()
    }

    /// Rewrite the file on the blocking pool. The caller keeps the state lock
    /// held so writes land in mutation order.
    async fn persist_locked(&self, st: &SeenState) {
        let path = self.path.clone();
        let ids = st.order.clone();
        let res = tokio::task::spawn_blocking(move || write_ids(&path, &ids))
            .await
            .map_err(|e| Error::Storage(format!("write task: {e}")))
            .and_then(|r| r);

        match res {
            Ok(()) => tracing::debug!(count = st.order.len(), "persisted seen videos"),
            Err(e) => tracing::error!(
                path = %self.path.display(),
                "failed to persist seen videos: {e}"
            ),
        }
    }
}

/// `Ok(None)` when the file does not exist.
fn read_ids(path: &Path) -> Result<Option<Vec<String>>> {
    if !path.exists() {
        return Ok(None);
    }
    let txt = fs::read_to_string(path).map_err(|e| Error::Storage(format!("read: {e}")))?;
    if txt.trim().is_empty() {
        return Ok(Some(Vec::new()));
    }
    let ids: Vec<String> =
        serde_json::from_str(&txt).map_err(|e| Error::Storage(format!("parse: {e}")))?;
    Ok(Some(ids))
}

fn write_ids(path: &Path, ids: &[String]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| Error::Storage(format!("create dir: {e}")))?;
    }

    let data = serde_json::to_string_pretty(ids)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, data).map_err(|e| Error::Storage(format!("write: {e}")))?;
    fs::rename(&tmp, path).map_err(|e| Error::Storage(format!("rename: {e}")))?;
    Ok(())
}

fn quarantine(path: &Path) {
    let mut aside = path.as_os_str().to_owned();
    aside.push(".corrupt");
    if let Err(e) = fs::rename(path, &aside) {
        tracing::warn!(path = %path.display(), "could not move corrupt seen store aside: {e}");
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
