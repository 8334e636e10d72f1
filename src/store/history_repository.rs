use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::StoreError;
use crate::models::Message;
use crate::store::ChatStorage;

/// Reads and writes the chat history blob stored under a single key.
#[derive(Debug, Clone)]
pub struct HistoryRepository<S> {
    storage: S,
    key: String,
}

impl<S: ChatStorage> HistoryRepository<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self { storage, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Loads the stored history, reporting anything that prevented a read.
    ///
    /// An absent (or empty) value reads as `[]`. A JSON value that is not a
    /// list also reads as `[]`, and list entries that are not messages are
    /// skipped. Only storage failures and text that is not JSON at all are
    /// returned as errors.
    pub fn try_load(&self) -> Result<Vec<Message>, StoreError> {
        let raw = self.storage.get_item(&self.key)?;
        let raw = match raw.as_deref() {
            Some(r) if !r.trim().is_empty() => r,
            _ => "[]",
        };

        let value: Value = serde_json::from_str(raw)
            .map_err(|e| StoreError::MalformedHistory { key: self.key.clone(), source: e })?;

        let Value::Array(entries) = value else {
            warn!("Stored chat history under '{}' is not a list, treating as empty", self.key);
            return Ok(Vec::new());
        };

        let total = entries.len();
        let messages: Vec<Message> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| match serde_json::from_value::<Message>(entry) {
                Ok(m) => Some(m),
                Err(e) => {
                    warn!("Skipping stored message #{i} under '{}': {e}", self.key);
                    None
                }
            })
            .collect();

        debug!("Loaded {}/{total} stored messages from '{}'", messages.len(), self.key);
        Ok(messages)
    }

    /// Loads the stored history; any failure degrades to an empty list.
    pub fn load(&self) -> Vec<Message> {
        self.try_load().unwrap_or_else(|e| {
            warn!("Falling back to empty chat history: {e}");
            Vec::new()
        })
    }

    pub fn save(&self, messages: &[Message]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(messages).map_err(StoreError::Serialization)?;
        self.storage.set_item(&self.key, &raw)
    }

    /// Appends to whatever [`load`](Self::load) returns, so an unreadable blob
    /// is replaced rather than extended.
    pub fn append(&self, message: Message) -> Result<Vec<Message>, StoreError> {
        let mut messages = self.load();
        messages.push(message);
        self.save(&messages)?;
        Ok(messages)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove_item(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageRole;
    use crate::store::MemoryStorage;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    const KEY: &str = "chatMessages";

    fn repo_with(raw: &str) -> HistoryRepository<MemoryStorage> {
        HistoryRepository::new(MemoryStorage::with_item(KEY, raw), KEY)
    }

    #[test]
    fn absent_value_loads_empty() {
        let repo = HistoryRepository::new(MemoryStorage::new(), KEY);
        assert_eq!(repo.try_load().unwrap(), Vec::<Message>::new());
    }

    #[test]
    fn empty_string_loads_empty() {
        assert_eq!(repo_with("").try_load().unwrap(), Vec::<Message>::new());
    }

    #[test]
    fn stored_list_is_parsed() {
        let repo = repo_with(r#"[{"role":"user","content":"hi"}]"#);
        let messages = repo.try_load().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "hi");
        assert_eq!(messages[0].time, None);
    }

    #[test]
    fn malformed_json_is_reported_by_try_load_only() {
        let repo = repo_with("[{not json");
        let err = repo.try_load().unwrap_err();
        assert!(matches!(err, StoreError::MalformedHistory { ref key, .. } if key == KEY));
        assert_eq!(repo.load(), Vec::<Message>::new());
    }

    /// Records the level of every event it sees.
    #[derive(Clone, Default)]
    struct Levels(Arc<Mutex<Vec<Level>>>);

    impl<S: Subscriber> Layer<S> for Levels {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            self.0.lock().unwrap().push(*event.metadata().level());
        }
    }

    #[test]
    fn degraded_load_logs_a_single_warning() {
        let levels = Levels::default();
        let subscriber = tracing_subscriber::registry().with(levels.clone());
        let repo = repo_with("[{not json");

        tracing::subscriber::with_default(subscriber, || {
            assert!(repo.load().is_empty());
        });
        assert_eq!(*levels.0.lock().unwrap(), vec![Level::WARN]);

        let levels = Levels::default();
        let subscriber = tracing_subscriber::registry().with(levels.clone());
        tracing::subscriber::with_default(subscriber, || {
            assert!(repo.try_load().is_err());
        });
        assert!(levels.0.lock().unwrap().is_empty());
    }

    #[test]
    fn non_list_json_loads_empty() {
        assert_eq!(
            repo_with(r#"{"role":"user","content":"hi"}"#).try_load().unwrap(),
            Vec::<Message>::new()
        );
        assert_eq!(repo_with("42").try_load().unwrap(), Vec::<Message>::new());
        assert_eq!(repo_with("null").try_load().unwrap(), Vec::<Message>::new());
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let repo = repo_with(
            r#"[{"role":"user","content":"a"},{"role":"robot","content":"b"},7,{"role":"assistant","content":"c"}]"#,
        );
        assert_eq!(repo.load(), vec![Message::user("a"), Message::assistant("c")]);
    }

    #[test]
    fn save_then_load_keeps_order() {
        let repo = HistoryRepository::new(MemoryStorage::new(), KEY);
        let history = vec![
            Message::system("be brief"),
            Message::user("hi").with_time("09:00"),
            Message::assistant("hello"),
        ];
        repo.save(&history).unwrap();
        assert_eq!(repo.load(), history);
    }

    #[test]
    fn append_replaces_unreadable_blob() {
        let repo = repo_with("garbage");
        let messages = repo.append(Message::user("fresh")).unwrap();
        assert_eq!(messages, vec![Message::user("fresh")]);
        assert_eq!(repo.try_load().unwrap(), vec![Message::user("fresh")]);
    }

    #[test]
    fn clear_removes_the_blob() {
        let repo = repo_with(r#"[{"role":"user","content":"hi"}]"#);
        repo.clear().unwrap();
        assert_eq!(repo.storage().get_item(KEY).unwrap(), None);
    }
}
