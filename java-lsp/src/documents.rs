//! In-memory text of open documents

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::lsp_types::Url;

/// Current full text per open document. Absent documents read as `None`.
#[derive(Debug, Default)]
pub struct DocumentStore {
    entries: RwLock<HashMap<Url, Arc<String>>>,
}

impl DocumentStore {
    /// Insert or replace the text for `uri` and hand back the stored copy
    pub async fn put(&self, uri: Url, text: String) -> Arc<String> {
        let text = Arc::new(text);
        self.entries.write().await.insert(uri, text.clone());
        text
    }

    pub async fn get(&self, uri: &Url) -> Option<Arc<String>> {
        self.entries.read().await.get(uri).cloned()
    }

    pub async fn remove(&self, uri: &Url) -> Option<Arc<String>> {
        self.entries.write().await.remove(uri)
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
