/// Browser-side implementations of the storage and tab capabilities

use crate::error::{HostError, StorageError};
use crate::host::{Clock, TabHost};
use crate::storage::StorageBackend;
use crate::tab_data::HostTab;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getCurrentWindowTabs() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getInvokingTab() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn closeTab(tab_id: i32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn openTab(url: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;
}

/// `browser.storage.local`
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeStorage;

impl StorageBackend for ChromeStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let value_js = getStorage(key)
            .await
            .map_err(|e| StorageError(format!("Failed to get storage: {:?}", e)))?;

        if value_js.is_null() || value_js.is_undefined() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(value_js)
            .map(Some)
            .map_err(|e| StorageError(format!("Failed to parse storage: {:?}", e)))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        // Plain objects, not ES Maps, so the storage API can persist them
        let value_js = value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| StorageError(format!("Failed to serialize storage: {:?}", e)))?;

        setStorage(key, value_js)
            .await
            .map_err(|e| StorageError(format!("Failed to save storage: {:?}", e)))
    }
}

/// `browser.tabs`
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeTabs;

impl TabHost for ChromeTabs {
    async fn current_window_tabs(&self) -> Result<Vec<HostTab>, HostError> {
        let tabs_js = getCurrentWindowTabs()
            .await
            .map_err(|e| HostError::new("list tabs", format!("{:?}", e)))?;

        serde_wasm_bindgen::from_value(tabs_js)
            .map_err(|e| HostError::new("list tabs", format!("Failed to parse tabs: {:?}", e)))
    }

    async fn invoking_tab(&self) -> Result<Option<HostTab>, HostError> {
        let tab_js = getInvokingTab()
            .await
            .map_err(|e| HostError::new("get invoking tab", format!("{:?}", e)))?;

        if tab_js.is_null() || tab_js.is_undefined() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(tab_js)
            .map(Some)
            .map_err(|e| HostError::new("get invoking tab", format!("Failed to parse tab: {:?}", e)))
    }

    async fn close_tab(&self, tab_id: i32) -> Result<(), HostError> {
        closeTab(tab_id)
            .await
            .map_err(|e| HostError::new("close tab", format!("{:?}", e)))
    }

    async fn open_tab(&self, url: &str) -> Result<(), HostError> {
        openTab(url)
            .await
            .map_err(|e| HostError::new("open tab", format!("{:?}", e)))
    }
}

/// `Date.now()`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsClock;

impl Clock for JsClock {
    fn now_millis(&self) -> f64 {
        js_sys::Date::now()
    }
}
