//! 消息日志服务，只追加

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::model::Message;
use crate::core::error::CoreError;
use crate::infrastructure::store::{Collection, Filter};

#[derive(Clone)]
pub struct MessageService {
    messages: Arc<dyn Collection<Message>>,
}

impl MessageService {
    pub fn new(messages: Arc<dyn Collection<Message>>) -> Self {
        Self { messages }
    }

    pub async fn append(&self, author: String, text: String) -> Result<Message, CoreError> {
        let message = Message {
            id: Uuid::new_v4(),
            author,
            text,
            timestamp: chrono::Utc::now(),
        };
        let message = self.messages.insert(message).await?;
        info!(id = %message.id, author = %message.author, "message appended");
        Ok(message)
    }

    pub async fn list_all(&self) -> Result<Vec<Message>, CoreError> {
        Ok(self.messages.find_all(&Filter::new()).await?)
    }
}
