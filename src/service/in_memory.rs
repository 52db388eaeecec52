use super::{FullListService, PagingService, RecordService};
use crate::config::ManagerConfig;
use crate::core::{Criteria, ListError, Result, SearchResult, TagData, loose_eq};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct InMemoryState {
    records: Vec<Value>,
    next_id: u64,
}

#[derive(Default)]
struct CallCounters {
    save: AtomicUsize,
    remove: AtomicUsize,
    search: AtomicUsize,
    get_list: AtomicUsize,
}

/// An in-memory record service for tests and demos.
///
/// Records are JSON objects keyed by `key_field`. New records without a key get a
/// sequential integer id. Search filters by loose equality on every criteria key
/// except the paging keys. Clones share the same storage.
#[derive(Clone)]
pub struct InMemoryRecordService {
    key_field: Arc<str>,
    page_no_key: Arc<str>,
    rows_key: Arc<str>,
    state: Arc<Mutex<InMemoryState>>,
    pending_failures: Arc<AtomicUsize>,
    counters: Arc<CallCounters>,
    latency: Option<Duration>,
}

impl InMemoryRecordService {
    /// Creates an empty service keyed by `key_field`, using the default paging keys.
    pub fn new(key_field: &str) -> Self {
        let defaults = ManagerConfig::default();
        Self {
            key_field: Arc::from(key_field),
            page_no_key: Arc::from(defaults.page_no_key.as_str()),
            rows_key: Arc::from(defaults.rows_key.as_str()),
            state: Arc::new(Mutex::new(InMemoryState {
                records: Vec::new(),
                next_id: 1,
            })),
            pending_failures: Arc::new(AtomicUsize::new(0)),
            counters: Arc::new(CallCounters::default()),
            latency: None,
        }
    }

    /// Reads page number and size from the keys of `config`.
    pub fn with_paging_keys(mut self, config: &ManagerConfig) -> Self {
        self.page_no_key = Arc::from(config.page_no_key.as_str());
        self.rows_key = Arc::from(config.rows_key.as_str());
        self
    }

    /// Delays every call, letting tests overlap requests.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Seeds the store. Records keep their order; keys are assigned where missing.
    pub async fn seed(&self, records: Vec<Value>) {
        let mut state = self.state.lock().await;
        for record in records {
            let record = Self::assign_key(&self.key_field, &mut state, record);
            state.records.push(record);
        }
    }

    /// Makes the next `count` calls fail with a remote error.
    pub fn fail_next(&self, count: usize) {
        self.pending_failures.store(count, Ordering::SeqCst);
    }

    pub async fn records(&self) -> Vec<Value> {
        self.state.lock().await.records.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    pub fn save_calls(&self) -> usize {
        self.counters.save.load(Ordering::SeqCst)
    }

    pub fn remove_calls(&self) -> usize {
        self.counters.remove.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.counters.search.load(Ordering::SeqCst)
    }

    pub fn get_list_calls(&self) -> usize {
        self.counters.get_list.load(Ordering::SeqCst)
    }

    async fn enter(&self, operation: &str, counter: &AtomicUsize) -> Result<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let injected = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            debug!(operation, "injected remote failure");
            return Err(ListError::Remote(format!(
                "injected failure in '{}'",
                operation
            )));
        }
        Ok(())
    }

    fn assign_key(key_field: &str, state: &mut InMemoryState, record: Value) -> Value {
        let mut fields = match record {
            Value::Object(fields) => fields,
            other => {
                let mut fields = Map::new();
                fields.insert("value".to_string(), other);
                fields
            }
        };
        let has_key = fields.get(key_field).is_some_and(|key| !key.is_null());
        if has_key {
            if let Some(n) = fields.get(key_field).and_then(Value::as_u64) {
                state.next_id = state.next_id.max(n + 1);
            }
        } else {
            fields.insert(key_field.to_string(), Value::from(state.next_id));
            state.next_id += 1;
        }
        Value::Object(fields)
    }

    fn position(&self, records: &[Value], item: &Value) -> Option<usize> {
        let key = item.get(&*self.key_field)?;
        records
            .iter()
            .position(|record| record.get(&*self.key_field).is_some_and(|k| loose_eq(k, key)))
    }

    fn matches(record: &Value, filters: &Map<String, Value>) -> bool {
        filters.iter().all(|(field, expected)| {
            let actual = record.get(field).unwrap_or(&Value::Null);
            loose_eq(actual, expected)
        })
    }

    fn read_positive(criteria: &Criteria, key: &str) -> Option<usize> {
        criteria
            .get(key)
            .and_then(Value::as_u64)
            .filter(|n| *n > 0)
            .map(|n| n as usize)
    }
}

#[async_trait]
impl RecordService<Value> for InMemoryRecordService {
    async fn save(&self, data: Value, is_new: bool) -> Result<Value> {
        self.enter("save", &self.counters.save).await?;
        let mut state = self.state.lock().await;

        if is_new {
            let record = Self::assign_key(&self.key_field, &mut state, data);
            state.records.push(record.clone());
            return Ok(record);
        }

        let index = self.position(&state.records, &data).ok_or_else(|| {
            ListError::Remote(format!(
                "record with {} = {} not found",
                self.key_field,
                data.get(&*self.key_field).unwrap_or(&Value::Null)
            ))
        })?;
        state.records[index] = data.clone();
        Ok(data)
    }

    async fn remove(&self, item: &Value) -> Result<()> {
        self.enter("remove", &self.counters.remove).await?;
        let mut state = self.state.lock().await;
        let index = self.position(&state.records, item).ok_or_else(|| {
            ListError::Remote(format!(
                "record with {} = {} not found",
                self.key_field,
                item.get(&*self.key_field).unwrap_or(&Value::Null)
            ))
        })?;
        state.records.remove(index);
        Ok(())
    }
}

#[async_trait]
impl PagingService<Value> for InMemoryRecordService {
    async fn search(&self, criteria: &Criteria) -> Result<SearchResult<Value>> {
        self.enter("search", &self.counters.search).await?;

        let filters: Map<String, Value> = criteria
            .iter()
            .filter(|(key, _)| {
                key.as_str() != &*self.page_no_key && key.as_str() != &*self.rows_key
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let state = self.state.lock().await;
        let matched: Vec<&Value> = state
            .records
            .iter()
            .filter(|record| Self::matches(record, &filters))
            .collect();
        let count = matched.len();

        let page = Self::read_positive(criteria, &self.page_no_key).unwrap_or(1);
        let rows = Self::read_positive(criteria, &self.rows_key).unwrap_or(count.max(1));
        let list = matched
            .into_iter()
            .skip((page - 1).saturating_mul(rows))
            .take(rows)
            .cloned()
            .collect();

        Ok(SearchResult { list, count })
    }

    async fn build_new_entry(&self, tag_data: Option<&TagData>) -> Result<Value> {
        let mut fields = match tag_data {
            Some(Value::Object(fields)) => fields.clone(),
            _ => Map::new(),
        };
        fields.insert(self.key_field.to_string(), Value::Null);
        Ok(Value::Object(fields))
    }
}

#[async_trait]
impl FullListService<Value> for InMemoryRecordService {
    async fn get_list(&self, params: Option<&TagData>) -> Result<Vec<Value>> {
        self.enter("get_list", &self.counters.get_list).await?;
        let filters = match params {
            Some(Value::Object(fields)) => fields.clone(),
            _ => Map::new(),
        };
        let state = self.state.lock().await;
        Ok(state
            .records
            .iter()
            .filter(|record| Self::matches(record, &filters))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn criteria(value: Value) -> Criteria {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_save_assigns_ids() {
        let service = InMemoryRecordService::new("id");
        let first = service.save(json!({"title": "a"}), true).await.unwrap();
        let second = service.save(json!({"title": "b"}), true).await.unwrap();
        assert_eq!(first["id"], json!(1));
        assert_eq!(second["id"], json!(2));
        assert_eq!(service.len().await, 2);
        assert_eq!(service.save_calls(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_record_fails() {
        let service = InMemoryRecordService::new("id");
        let err = service.save(json!({"id": 4}), false).await.unwrap_err();
        assert!(err.is_remote());
    }

    #[tokio::test]
    async fn test_search_pages_and_filters() {
        let service = InMemoryRecordService::new("id");
        service
            .seed((0..7).map(|i| json!({"group": i % 2})).collect())
            .await;

        let result = service
            .search(&criteria(json!({"group": 0, "page": 2, "rows": 3})))
            .await
            .unwrap();
        assert_eq!(result.count, 4);
        assert_eq!(result.list.len(), 1);
        assert_eq!(result.list[0]["id"], json!(7));
    }

    #[tokio::test]
    async fn test_custom_paging_keys() {
        let config = ManagerConfig::new().page_no_key("p").rows_key("n");
        let service = InMemoryRecordService::new("id").with_paging_keys(&config);
        service.seed((0..5).map(|_| json!({})).collect()).await;
        let result = service
            .search(&criteria(json!({"p": 2, "n": 2})))
            .await
            .unwrap();
        assert_eq!(result.count, 5);
        assert_eq!(result.list.len(), 2);
        assert_eq!(result.list[0]["id"], json!(3));
    }

    #[tokio::test]
    async fn test_fail_next() {
        let service = InMemoryRecordService::new("id");
        service.fail_next(1);
        assert!(service.get_list(None).await.is_err());
        assert!(service.get_list(None).await.is_ok());
        assert_eq!(service.get_list_calls(), 2);
    }

    #[tokio::test]
    async fn test_build_new_entry_uses_tag_data() {
        let service = InMemoryRecordService::new("id");
        let entry = service
            .build_new_entry(Some(&json!({"parent": 3})))
            .await
            .unwrap();
        assert_eq!(entry, json!({"parent": 3, "id": null}));
    }
}
