//! JSON-file conversation store.
//!
//! One JSON document per conversation under the configured data
//! directory. Implements the [`ResultSink`] port: a completed council
//! result is appended to its conversation as an assistant message, with
//! the full structured result embedded for later display.

use async_trait::async_trait;
use council_application::{ResultSink, StoreError};
use council_domain::CouncilResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One stored message turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub role: String,
    pub content: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub council_response: Option<CouncilResult>,
}

/// One stored conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub created_at: String,
    pub title: String,
    pub messages: Vec<StoredMessage>,
}

/// Listing entry for a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub created_at: String,
    pub title: String,
    pub message_count: usize,
}

/// Conversation store writing one JSON file per conversation
pub struct JsonConversationStore {
    data_dir: PathBuf,
}

impl JsonConversationStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn conversation_path(&self, id: &str) -> PathBuf {
        self.data_dir.join(format!("{id}.json"))
    }

    fn ensure_data_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Create and persist a fresh conversation.
    pub fn create_conversation(&self, id: &str) -> Result<Conversation, StoreError> {
        let conversation = Conversation {
            id: id.to_string(),
            created_at: now(),
            title: "New Session".to_string(),
            messages: Vec::new(),
        };
        self.save_conversation(&conversation)?;
        Ok(conversation)
    }

    /// Load a conversation, `None` when it does not exist.
    pub fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, StoreError> {
        let path = self.conversation_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    pub fn save_conversation(&self, conversation: &Conversation) -> Result<(), StoreError> {
        self.ensure_data_dir()?;
        let path = self.conversation_path(&conversation.id);
        let json = serde_json::to_string_pretty(conversation)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// List all conversations, newest first. Unreadable files are
    /// skipped with a warning rather than failing the listing.
    pub fn list_conversations(&self) -> Result<Vec<ConversationSummary>, StoreError> {
        self.ensure_data_dir()?;
        let mut summaries = Vec::new();

        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_summary(&path) {
                Ok(summary) => summaries.push(summary),
                Err(e) => warn!("Skipping unreadable conversation {}: {}", path.display(), e),
            }
        }

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    pub fn update_conversation_title(&self, id: &str, title: &str) -> Result<(), StoreError> {
        let mut conversation = self
            .get_conversation(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        conversation.title = title.to_string();
        self.save_conversation(&conversation)
    }

    /// Append the user's task message.
    pub fn add_user_message(
        &self,
        id: &str,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut conversation = self
            .get_conversation(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        // First message titles the conversation.
        if conversation.messages.is_empty() {
            conversation.title = short_title(content);
        }

        conversation.messages.push(StoredMessage {
            role: "user".to_string(),
            content: content.to_string(),
            timestamp: now(),
            image_url: image_url.map(str::to_string),
            task_type: None,
            council_response: None,
        });
        self.save_conversation(&conversation)
    }

    /// Append a completed council result as an assistant message.
    pub fn add_assistant_result(
        &self,
        id: &str,
        result: &CouncilResult,
    ) -> Result<(), StoreError> {
        let mut conversation = self
            .get_conversation(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let task_type = result
            .stage1_results
            .first()
            .map(|r| r.task.clone())
            .unwrap_or_else(|| "council".to_string());

        let content = if result.final_result.is_some() {
            "Council task completed.".to_string()
        } else {
            result
                .error
                .clone()
                .unwrap_or_else(|| "Council run produced no result.".to_string())
        };

        conversation.messages.push(StoredMessage {
            role: "assistant".to_string(),
            content,
            timestamp: now(),
            image_url: None,
            task_type: Some(task_type),
            council_response: Some(result.clone()),
        });
        self.save_conversation(&conversation)
    }
}

#[async_trait]
impl ResultSink for JsonConversationStore {
    async fn persist(
        &self,
        conversation_id: &str,
        result: &CouncilResult,
    ) -> Result<(), StoreError> {
        self.add_assistant_result(conversation_id, result)
    }
}

fn read_summary(path: &Path) -> Result<ConversationSummary, StoreError> {
    let contents = fs::read_to_string(path)?;
    let conversation: Conversation = serde_json::from_str(&contents)?;
    Ok(ConversationSummary {
        id: conversation.id,
        created_at: conversation.created_at,
        title: conversation.title,
        message_count: conversation.messages.len(),
    })
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn short_title(content: &str) -> String {
    if content.chars().count() > 30 {
        let truncated: String = content.chars().take(30).collect();
        format!("{truncated}...")
    } else {
        content.to_string()
    }
}
