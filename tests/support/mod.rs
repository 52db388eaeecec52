#![allow(dead_code)]

use async_trait::async_trait;
use listsync::{Criteria, ListError, PagingService, RecordService, Result, SearchResult};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: u64,
    pub name: String,
}

pub fn contact(id: u64, name: &str) -> Contact {
    Contact {
        id,
        name: name.to_string(),
    }
}

pub fn contacts(ids: std::ops::RangeInclusive<u64>) -> Vec<Contact> {
    ids.map(|id| contact(id, &format!("contact {id}"))).collect()
}

/// Typed service over a fixed dataset that records every request it receives.
pub struct ScriptedService {
    pub records: Mutex<Vec<Contact>>,
    pub requests: Mutex<Vec<Criteria>>,
    pub fail_search: Mutex<bool>,
    pub fail_save: Mutex<bool>,
    pub fail_remove: Mutex<bool>,
    pub saved_suffix: &'static str,
}

impl ScriptedService {
    pub fn new(records: Vec<Contact>) -> Self {
        Self {
            records: Mutex::new(records),
            requests: Mutex::new(Vec::new()),
            fail_search: Mutex::new(false),
            fail_save: Mutex::new(false),
            fail_remove: Mutex::new(false),
            saved_suffix: "",
        }
    }

    pub fn last_request(&self) -> Criteria {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn set_fail_search(&self, fail: bool) {
        *self.fail_search.lock().unwrap() = fail;
    }

    pub fn set_fail_save(&self, fail: bool) {
        *self.fail_save.lock().unwrap() = fail;
    }

    pub fn set_fail_remove(&self, fail: bool) {
        *self.fail_remove.lock().unwrap() = fail;
    }
}

#[async_trait]
impl RecordService<Contact> for ScriptedService {
    async fn save(&self, data: Contact, is_new: bool) -> Result<Contact> {
        if *self.fail_save.lock().unwrap() {
            return Err(ListError::remote("save rejected"));
        }
        let mut records = self.records.lock().unwrap();
        let mut saved = data;
        saved.name.push_str(self.saved_suffix);
        if is_new {
            saved.id = records.iter().map(|c| c.id).max().unwrap_or(0) + 1;
            records.push(saved.clone());
        } else if let Some(existing) = records.iter_mut().find(|c| c.id == saved.id) {
            *existing = saved.clone();
        }
        Ok(saved)
    }

    async fn remove(&self, item: &Contact) -> Result<()> {
        if *self.fail_remove.lock().unwrap() {
            return Err(ListError::remote("remove rejected"));
        }
        self.records.lock().unwrap().retain(|c| c.id != item.id);
        Ok(())
    }
}

#[async_trait]
impl PagingService<Contact> for ScriptedService {
    async fn search(&self, criteria: &Criteria) -> Result<SearchResult<Contact>> {
        self.requests.lock().unwrap().push(criteria.clone());
        if *self.fail_search.lock().unwrap() {
            return Err(ListError::remote("search rejected"));
        }
        let page = criteria.get("page").and_then(|v| v.as_u64()).unwrap_or(1) as usize;
        let rows = criteria.get("rows").and_then(|v| v.as_u64()).unwrap_or(25) as usize;
        let records = self.records.lock().unwrap();
        let list = records
            .iter()
            .skip((page - 1) * rows)
            .take(rows)
            .cloned()
            .collect();
        Ok(SearchResult::new(list, records.len()))
    }
}
