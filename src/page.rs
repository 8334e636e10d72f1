use crate::models::PageData;
use crate::store::{ChatStorage, HistoryRepository};

/// Key the chat history is persisted under unless configured otherwise.
pub const STORAGE_CHAT_KEY: &str = "chatMessages";

/// Produces the initial page data from local storage.
///
/// `storage` is `None` outside a browser execution context, in which case no
/// data is produced. Absent or unreadable history yields an empty `chatMsg`.
pub fn load_page<S: ChatStorage + ?Sized>(storage: Option<&S>, key: &str) -> Option<PageData> {
    let storage = storage?;
    let chat_msg = HistoryRepository::new(storage, key).load();
    Some(PageData { chat_msg })
}
