//! Chat conversation state and the page-load of persisted chat history.

pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod page;
pub mod state;
pub mod store;

pub use config::Config;
pub use errors::StoreError;
pub use models::{Conversation, ConversationRequest, FileRef, Message, MessageRole, PageData};
pub use page::{load_page, STORAGE_CHAT_KEY};
pub use state::ConversationState;
pub use store::{ChatStorage, FileStorage, HistoryRepository, MemoryStorage};
