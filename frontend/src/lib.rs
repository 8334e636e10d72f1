use wasm_bindgen::prelude::*;

pub mod state;
pub mod storage;

pub use state::AppState;
pub use storage::{BrowserStorage, browser_storage, load};

/// Sets up the panic hook and logging when the module is instantiated.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    // A second init (e.g. under the test harness) leaves the first logger in place
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Chat state module initialized");
}
