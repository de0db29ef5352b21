//! 聊天消息模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::infrastructure::store::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub author: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Document for Message {
    const COLLECTION: &'static str = "messages";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMessageRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub author: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub text: String,
}
