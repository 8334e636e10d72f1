use chat_state::{
    Conversation, ConversationRequest, ConversationState, FileRef, HistoryRepository, Message,
    STORAGE_CHAT_KEY, StoreError,
};
use leptos::prelude::*;

use crate::storage::{self, browser_storage};

/// Shared application state, provided via Leptos context.
#[derive(Clone, Copy)]
pub struct AppState {
    // --- Read signals (for components to subscribe to) ---
    pub conversation: ReadSignal<ConversationState>,
    pub is_streaming: ReadSignal<bool>,
    pub error: ReadSignal<Option<String>>,

    // --- Write signals (for mutating state) ---
    pub set_conversation: WriteSignal<ConversationState>,
    pub set_is_streaming: WriteSignal<bool>,
    pub set_error: WriteSignal<Option<String>>,
}

impl AppState {
    /// Create an `AppState` hydrated from the page load and provide it in the
    /// current Leptos context.
    pub fn provide() -> Self {
        let history = match storage::load() {
            Some(page) => page.chat_msg,
            None => {
                log::warn!("No local storage available, starting with empty history");
                Vec::new()
            }
        };
        log::debug!("Hydrating chat state with {} stored messages", history.len());

        let (conversation, set_conversation) = signal(ConversationState::hydrated(history));
        let (is_streaming, set_is_streaming) = signal(false);
        let (error, set_error) = signal(None::<String>);

        let state = Self {
            conversation,
            is_streaming,
            error,
            set_conversation,
            set_is_streaming,
            set_error,
        };

        provide_context(state);
        state
    }

    // --- Tracked views ---

    pub fn conversations(&self) -> Vec<Conversation> {
        self.conversation.with(|s| s.conversations.clone())
    }

    pub fn selected_conversation_id(&self) -> Option<String> {
        self.conversation.with(|s| {
            (!s.selected_conversation_id.is_empty()).then(|| s.selected_conversation_id.clone())
        })
    }

    pub fn history(&self) -> Vec<Message> {
        self.conversation.with(|s| s.selected_conversation_history.clone())
    }

    pub fn ongoing_result(&self) -> String {
        self.conversation.with(|s| s.ongoing_result.clone())
    }

    pub fn files(&self) -> Vec<FileRef> {
        self.conversation.with(|s| s.files_in_data_source.clone())
    }

    // --- Conversations ---

    pub fn set_conversations(&self, conversations: Vec<Conversation>) {
        self.set_conversation.update(|s| s.set_conversations(conversations));
    }

    /// Select a conversation. Its history is loaded by whoever owns the transport.
    pub fn select_conversation(&self, id: String) {
        let mut result = Ok(());
        self.set_conversation.update(|s| result = s.select_conversation(&id));
        self.set_is_streaming.set(false);
        if result.is_ok() {
            self.persist();
        }
        self.report(result);
    }

    pub fn new_conversation(&self) {
        self.set_conversation.update(ConversationState::new_conversation);
        self.set_is_streaming.set(false);
        self.set_error.set(None);
        self.persist();
    }

    pub fn remove_conversation(&self, id: String) {
        let mut result = Ok(());
        self.set_conversation.update(|s| result = s.remove_conversation(&id).map(|_| ()));
        if result.is_ok() {
            self.persist();
        }
        self.report(result);
    }

    // --- Chat turn ---

    /// Record the user's prompt and return the request to send.
    ///
    /// Starts a new conversation when none is selected. Returns `None` while a
    /// reply is still streaming, or with the error set when the prompt is rejected.
    pub fn send_message(&self, text: String, model: &str) -> Option<ConversationRequest> {
        if self.is_streaming.get_untracked() {
            return None;
        }

        let mut result = Err(StoreError::EmptyField { field_name: "prompt".to_string() });
        self.set_conversation.update(|s| {
            result = s.build_request(&text, model);
            if let Ok(request) = &mut result {
                if s.selected_conversation_id.is_empty() {
                    request.conversation_id = s.start_conversation(&text).id;
                }
                s.push_message(request.user_prompt.clone());
            }
        });

        match result {
            Ok(request) => {
                self.set_error.set(None);
                self.set_is_streaming.set(true);
                self.persist();
                Some(request)
            }
            Err(e) => {
                self.report(Err(e));
                None
            }
        }
    }

    pub fn append_chunk(&self, chunk: String) {
        self.set_conversation.update(|s| s.append_ongoing(&chunk));
    }

    /// Convert the streamed text into an assistant message and persist.
    pub fn finish_stream(&self) {
        let mut finished = None;
        self.set_conversation.update(|s| finished = s.finish_ongoing());
        self.set_is_streaming.set(false);
        if finished.is_some() {
            self.persist();
        }
    }

    pub fn fail_stream(&self, err: String) {
        log::error!("Streaming failed: {err}");
        self.set_conversation.update(|s| s.ongoing_result.clear());
        self.set_is_streaming.set(false);
        self.set_error.set(Some(err));
    }

    // --- Files ---

    pub fn set_files(&self, files: Vec<FileRef>) {
        self.set_conversation.update(|s| s.set_files(files));
    }

    pub fn add_file(&self, name: String) {
        self.set_conversation.update(|s| {
            s.add_file(&name);
        });
    }

    pub fn remove_file(&self, name: String) {
        self.set_conversation.update(|s| {
            s.remove_file(&name);
        });
    }

    // --- Persistence ---

    /// Drop the stored history and the in-memory one.
    pub fn clear_history(&self) {
        self.set_conversation.update(|s| s.selected_conversation_history.clear());
        if let Some(storage) = browser_storage() {
            self.report(HistoryRepository::new(storage, STORAGE_CHAT_KEY).clear());
        }
    }

    fn persist(&self) {
        let Some(storage) = browser_storage() else {
            return;
        };
        let result = self.conversation.with_untracked(|s| {
            HistoryRepository::new(storage, STORAGE_CHAT_KEY).save(&s.selected_conversation_history)
        });
        self.report(result);
    }

    fn report(&self, result: Result<(), StoreError>) {
        if let Err(e) = result {
            log::error!("{e}");
            self.set_error.set(Some(e.to_string()));
        }
    }
}
