/// Persistence of the tab group list over a key-value backend

use crate::error::{StorageError, TabGroupError};
use crate::tab_data::{GroupId, Locator, TabGroup, TabId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// Ordered list of saved groups, oldest first.
///
/// This is the only unit the store reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct TabGroupList {
    pub groups: Vec<TabGroup>,
}

impl TabGroupList {
    pub fn new() -> Self {
        TabGroupList { groups: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_tabs(&self) -> usize {
        self.groups.iter().map(|g| g.tabs.len()).sum()
    }

    pub fn add_group(&mut self, group: TabGroup) {
        self.groups.push(group);
    }

    pub fn get_group(&self, group_id: &GroupId) -> Option<&TabGroup> {
        self.groups.iter().find(|g| &g.id == group_id)
    }

    /// Resolve a group locator to its current position
    pub fn group_position(&self, locator: &Locator<GroupId>) -> Result<usize, TabGroupError> {
        match locator {
            Locator::At(index) if *index < self.groups.len() => Ok(*index),
            Locator::At(index) => Err(TabGroupError::IndexOutOfRange {
                kind: "group",
                index: *index,
                len: self.groups.len(),
            }),
            Locator::Id(id) => self
                .groups
                .iter()
                .position(|g| &g.id == id)
                .ok_or_else(|| TabGroupError::NotFound {
                    kind: "group",
                    id: id.to_string(),
                }),
        }
    }

    /// Resolve a tab locator within the group at `group_pos`
    pub(crate) fn tab_position(
        &self,
        group_pos: usize,
        locator: &Locator<TabId>,
    ) -> Result<usize, TabGroupError> {
        let tabs = &self.groups[group_pos].tabs;
        match locator {
            Locator::At(index) if *index < tabs.len() => Ok(*index),
            Locator::At(index) => Err(TabGroupError::IndexOutOfRange {
                kind: "tab",
                index: *index,
                len: tabs.len(),
            }),
            Locator::Id(id) => tabs
                .iter()
                .position(|t| &t.id == id)
                .ok_or_else(|| TabGroupError::NotFound {
                    kind: "tab",
                    id: id.to_string(),
                }),
        }
    }

    pub(crate) fn remove_group_at(&mut self, group_pos: usize) -> TabGroup {
        self.groups.remove(group_pos)
    }

    /// Remove one tab; the group goes with it once it has no tabs left.
    ///
    /// Returns true when the group was removed too.
    pub(crate) fn remove_tab_at(&mut self, group_pos: usize, tab_pos: usize) -> bool {
        let group = &mut self.groups[group_pos];
        group.tabs.remove(tab_pos);

        if group.tabs.is_empty() {
            self.groups.remove(group_pos);
            true
        } else {
            false
        }
    }
}

/// Key-value persistence backend (e.g. `browser.storage.local`)
#[allow(async_fn_in_trait)]
pub trait StorageBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

/// In-memory backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: RefCell<HashMap<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value, bypassing the typed store
    pub fn raw(&self, key: &str) -> Option<Value> {
        self.slots.borrow().get(key).cloned()
    }

    pub fn insert_raw(&self, key: &str, value: Value) {
        self.slots.borrow_mut().insert(key.to_string(), value);
    }
}

impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.insert_raw(key, value);
        Ok(())
    }
}

impl<B: StorageBackend> StorageBackend for &B {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        (**self).set(key, value).await
    }
}

/// Typed accessor over the single slot holding the group list
pub struct TabGroupStore<B> {
    backend: B,
    key: String,
}

impl<B: StorageBackend> TabGroupStore<B> {
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        TabGroupStore {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the persisted list; nothing stored yet is an empty list
    pub async fn load(&self) -> Result<TabGroupList, TabGroupError> {
        match self.backend.get(&self.key).await? {
            None | Some(Value::Null) => Ok(TabGroupList::new()),
            Some(value) => serde_json::from_value(value).map_err(TabGroupError::CorruptState),
        }
    }

    /// Replace the whole persisted list
    pub async fn save(&self, list: &TabGroupList) -> Result<(), TabGroupError> {
        let value = serde_json::to_value(list).map_err(TabGroupError::EncodeState)?;
        self.backend.set(&self.key, value).await?;
        log::debug!("saved {} tab groups under {}", list.len(), self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab_data::{CapturedAt, HostTab, TabGroup};
    use serde_json::json;

    const KEY: &str = "test.tabGroups";

    fn create_test_group(urls: &[&str]) -> TabGroup {
        let tabs: Vec<HostTab> = urls
            .iter()
            .enumerate()
            .map(|(i, url)| HostTab::new(i as i32, url, &format!("Tab {}", i), i as i32))
            .collect();
        TabGroup::capture(&tabs, CapturedAt::Iso("2024-10-28T10:30:00.000Z".to_string()))
    }

    struct UnavailableBackend;

    impl StorageBackend for UnavailableBackend {
        async fn get(&self, _key: &str) -> Result<Option<Value>, StorageError> {
            Err(StorageError("offline".to_string()))
        }

        async fn set(&self, _key: &str, _value: Value) -> Result<(), StorageError> {
            Err(StorageError("offline".to_string()))
        }
    }

    #[test]
    fn test_list_new() {
        let list = TabGroupList::new();
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_add_and_get_group() {
        let mut list = TabGroupList::new();
        let group = create_test_group(&["https://a.com"]);
        let id = group.id.clone();

        list.add_group(group);

        assert_eq!(list.len(), 1);
        assert!(list.get_group(&id).is_some());
        assert!(list.get_group(&GroupId("nope".into())).is_none());
    }

    #[test]
    fn test_group_position_by_index_and_id() {
        let mut list = TabGroupList::new();
        list.add_group(create_test_group(&["https://a.com"]));
        list.add_group(create_test_group(&["https://b.com"]));
        let second = list.groups[1].id.clone();

        assert_eq!(list.group_position(&Locator::At(0)).unwrap(), 0);
        assert_eq!(list.group_position(&Locator::Id(second)).unwrap(), 1);
        assert!(matches!(
            list.group_position(&Locator::At(2)),
            Err(TabGroupError::IndexOutOfRange { kind: "group", index: 2, len: 2 })
        ));
        assert!(matches!(
            list.group_position(&Locator::Id(GroupId("gone".into()))),
            Err(TabGroupError::NotFound { kind: "group", .. })
        ));
    }

    #[test]
    fn test_remove_tab_keeps_nonempty_group() {
        let mut list = TabGroupList::new();
        list.add_group(create_test_group(&["https://a.com", "https://b.com"]));

        let group_removed = list.remove_tab_at(0, 0);

        assert!(!group_removed);
        assert_eq!(list.groups[0].tabs.len(), 1);
        assert_eq!(list.groups[0].tabs[0].url.as_deref(), Some("https://b.com"));
    }

    #[test]
    fn test_remove_last_tab_removes_group() {
        let mut list = TabGroupList::new();
        list.add_group(create_test_group(&["https://a.com"]));
        list.add_group(create_test_group(&["https://b.com"]));

        let group_removed = list.remove_tab_at(0, 0);

        assert!(group_removed);
        assert_eq!(list.len(), 1);
        assert_eq!(list.groups[0].tabs[0].url.as_deref(), Some("https://b.com"));
    }

    #[test]
    fn test_total_tabs() {
        let mut list = TabGroupList::new();
        list.add_group(create_test_group(&["a", "b"]));
        list.add_group(create_test_group(&["c"]));

        assert_eq!(list.total_tabs(), 3);
    }

    #[tokio::test]
    async fn test_load_empty_store() {
        let store = TabGroupStore::new(MemoryBackend::new(), KEY);

        let list = store.load().await.unwrap();

        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_load_null_is_empty() {
        let backend = MemoryBackend::new();
        backend.insert_raw(KEY, Value::Null);
        let store = TabGroupStore::new(&backend, KEY);

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let store = TabGroupStore::new(MemoryBackend::new(), KEY);
        let mut list = TabGroupList::new();
        list.add_group(create_test_group(&["https://a.com", "https://b.com"]));
        list.add_group(create_test_group(&["https://c.com"]));

        store.save(&list).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, list);
    }

    #[tokio::test]
    async fn test_round_trip_empty_list() {
        let store = TabGroupStore::new(MemoryBackend::new(), KEY);

        store.save(&TabGroupList::new()).await.unwrap();

        assert_eq!(store.load().await.unwrap(), TabGroupList::new());
    }

    #[tokio::test]
    async fn test_save_replaces_whole_list() {
        let backend = MemoryBackend::new();
        let store = TabGroupStore::new(&backend, KEY);
        let mut first = TabGroupList::new();
        first.add_group(create_test_group(&["https://a.com"]));
        first.add_group(create_test_group(&["https://b.com"]));
        store.save(&first).await.unwrap();

        let mut second = TabGroupList::new();
        second.add_group(create_test_group(&["https://c.com"]));
        store.save(&second).await.unwrap();

        let raw = backend.raw(KEY).unwrap();
        assert_eq!(raw.as_array().unwrap().len(), 1);
        assert_eq!(raw[0]["tabs"][0]["url"], "https://c.com");
    }

    #[tokio::test]
    async fn test_load_legacy_shape_without_ids() {
        let backend = MemoryBackend::new();
        backend.insert_raw(
            KEY,
            json!([{ "capturedAt": "2024-10-28T10:30:00.000Z", "tabs": [{ "title": "X", "url": "x" }] }]),
        );
        let store = TabGroupStore::new(&backend, KEY);

        let list = store.load().await.unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list.groups[0].tabs[0].url.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_load_corrupt_state() {
        let backend = MemoryBackend::new();
        backend.insert_raw(KEY, json!({ "sessions": 3 }));
        let store = TabGroupStore::new(&backend, KEY);

        let result = store.load().await;

        assert!(matches!(result, Err(TabGroupError::CorruptState(_))));
    }

    #[tokio::test]
    async fn test_backend_unavailable_is_propagated() {
        let store = TabGroupStore::new(UnavailableBackend, KEY);

        assert!(matches!(
            store.load().await,
            Err(TabGroupError::BackendUnavailable(_))
        ));
        assert!(matches!(
            store.save(&TabGroupList::new()).await,
            Err(TabGroupError::BackendUnavailable(_))
        ));
    }
}
