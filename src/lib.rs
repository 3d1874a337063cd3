/// Oasis - browser extension that saves a window's tabs as groups
/// Built with Rust + WASM + Yew

pub mod bridge;
pub mod config;
pub mod error;
pub mod host;
pub mod operations;
pub mod render;
pub mod storage;
pub mod tab_data;
pub mod ui;

use config::Config;
use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    run_popup(Config::default());
}

// Start the popup with settings passed from JavaScript as JSON
#[wasm_bindgen]
pub fn start_popup_with_config(config_json: &str) -> Result<(), JsValue> {
    let config = Config::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    run_popup(config);
    Ok(())
}

fn run_popup(config: Config) {
    wasm_logger::init(wasm_logger::Config::new(config.level()));
    log::info!("starting popup, storage key {}", config.storage_key);
    yew::Renderer::<ui::popup::App>::with_props(ui::popup::AppProps { config }).render();
}
