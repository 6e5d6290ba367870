use serde::{ Serialize, Deserialize };

/// One prior exchange as the widget sends it. Roles are normally `user` or
/// `assistant`, but any string is accepted here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub content: String,
}

/// Body of `POST /chat`. Both fields are required.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ConversationTurn>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Success {
        response: String,
    },
    Failure {
        error: String,
    },
}
