//! 테스트용 메모리 저장소.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use vardhman_core::{DocumentStore, MarketError, Result, SortOrder};

#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<Vec<(String, Value)>>,
    pub fail_writes: AtomicBool,
    pub fail_reads: AtomicBool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        let store = Self::default();
        store.fail_writes.store(true, Ordering::SeqCst);
        store.fail_reads.store(true, Ordering::SeqCst);
        store
    }

    pub fn documents(&self, index: &str) -> Vec<Value> {
        self.docs
            .lock()
            .unwrap()
            .iter()
            .filter(|(i, _)| i == index)
            .map(|(_, d)| d.clone())
            .collect()
    }

    pub fn insert(&self, index: &str, document: Value) {
        self.docs
            .lock()
            .unwrap()
            .push((index.to_string(), document));
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn index_document(&self, index: &str, document: &Value) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(MarketError::Store("write rejected".into()));
        }
        self.insert(index, document.clone());
        Ok(())
    }

    async fn search_by_timestamp(
        &self,
        index: &str,
        size: usize,
        order: SortOrder,
    ) -> Result<Vec<Value>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(MarketError::Store("search timed out".into()));
        }
        let mut docs = self.documents(index);
        docs.sort_by(|a, b| {
            let a = a.get("timestamp").and_then(Value::as_str).unwrap_or_default();
            let b = b.get("timestamp").and_then(Value::as_str).unwrap_or_default();
            a.cmp(b)
        });
        if order == SortOrder::Desc {
            docs.reverse();
        }
        docs.truncate(size);
        Ok(docs)
    }
}
