use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{Conversation, ConversationRequest, FileRef, Message, MessageRole};

const MAX_PROMPT_LENGTH: usize = 8000;
const FIRST_QUERY_MAX_CHARS: usize = 60;

/// Client-side conversation state: the conversation list, the selected
/// conversation's history, the assistant reply being streamed and the files
/// in the data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    pub selected_conversation_id: String,
    pub conversations: Vec<Conversation>,
    pub selected_conversation_history: Vec<Message>,
    #[serde(rename = "onGoingResult")]
    pub ongoing_result: String,
    pub files_in_data_source: Vec<FileRef>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds state whose history is the page-load result.
    pub fn hydrated(messages: Vec<Message>) -> Self {
        let mut state = Self::new();
        state.hydrate(messages);
        state
    }

    pub fn selected(&self) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == self.selected_conversation_id)
    }

    pub fn hydrate(&mut self, messages: Vec<Message>) {
        self.selected_conversation_history = messages;
    }

    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
        if !self.selected_conversation_id.is_empty() && self.selected().is_none() {
            self.selected_conversation_id.clear();
        }
    }

    /// Selects a known conversation. The caller loads its history afterwards.
    pub fn select_conversation(&mut self, id: &str) -> Result<(), StoreError> {
        if !self.conversations.iter().any(|c| c.id == id) {
            return Err(StoreError::ConversationNotFound { id: id.to_string() });
        }
        self.selected_conversation_id = id.to_string();
        self.selected_conversation_history.clear();
        self.ongoing_result.clear();
        Ok(())
    }

    pub fn new_conversation(&mut self) {
        self.selected_conversation_id.clear();
        self.selected_conversation_history.clear();
        self.ongoing_result.clear();
    }

    /// Creates a conversation titled by its first query and selects it.
    /// The current history becomes the new conversation's history.
    pub fn start_conversation(&mut self, first_query: &str) -> Conversation {
        let conversation = Conversation {
            id: Uuid::new_v4().to_string(),
            first_query: Some(summarize(first_query)),
        };
        self.conversations.insert(0, conversation.clone());
        self.selected_conversation_id = conversation.id.clone();
        conversation
    }

    pub fn remove_conversation(&mut self, id: &str) -> Result<Conversation, StoreError> {
        let pos = self
            .conversations
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::ConversationNotFound { id: id.to_string() })?;
        if self.selected_conversation_id == id {
            self.new_conversation();
        }
        Ok(self.conversations.remove(pos))
    }

    pub fn push_message(&mut self, message: Message) {
        self.selected_conversation_history.push(message);
    }

    pub fn append_ongoing(&mut self, chunk: &str) {
        self.ongoing_result.push_str(chunk);
    }

    /// Moves the streamed reply into the history as an assistant message.
    pub fn finish_ongoing(&mut self) -> Option<Message> {
        if self.ongoing_result.is_empty() {
            return None;
        }
        let content = std::mem::take(&mut self.ongoing_result);
        let message = Message::now(MessageRole::Assistant, content);
        self.selected_conversation_history.push(message.clone());
        Some(message)
    }

    pub fn set_files(&mut self, files: Vec<FileRef>) {
        self.files_in_data_source = files;
    }

    /// Returns `false` when a file with that name is already listed.
    pub fn add_file(&mut self, name: &str) -> bool {
        if self.files_in_data_source.iter().any(|f| f.name == name) {
            return false;
        }
        self.files_in_data_source.push(FileRef::new(name));
        true
    }

    pub fn remove_file(&mut self, name: &str) -> bool {
        let before = self.files_in_data_source.len();
        self.files_in_data_source.retain(|f| f.name != name);
        self.files_in_data_source.len() != before
    }

    /// Builds the request for the next turn without changing the state.
    pub fn build_request(
        &self,
        prompt: &str,
        model: &str,
    ) -> Result<ConversationRequest, StoreError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(StoreError::EmptyField { field_name: "prompt".to_string() });
        }
        if prompt.len() > MAX_PROMPT_LENGTH {
            return Err(StoreError::FieldTooLong {
                field_name: "prompt".to_string(),
                max_length: MAX_PROMPT_LENGTH,
                actual_length: prompt.len(),
            });
        }
        Ok(ConversationRequest {
            conversation_id: self.selected_conversation_id.clone(),
            user_prompt: Message::now(MessageRole::User, prompt),
            messages: self.selected_conversation_history.clone(),
            model: model.to_string(),
        })
    }
}

fn summarize(query: &str) -> String {
    let t = query.trim();
    if t.chars().count() > FIRST_QUERY_MAX_CHARS {
        format!("{}…", t.chars().take(FIRST_QUERY_MAX_CHARS).collect::<String>())
    } else {
        t.to_string()
    }
}
