use serde::{Deserialize, Serialize};

/// Request body for content generation. Optional fields let absence surface
/// as a 400 with a named message instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub email: Option<String>,
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct GetPromptsRequest {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PromptsResponse {
    pub prompts: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeletePromptRequest {
    pub email: Option<String>,
    pub index: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DeletePromptResponse {
    pub message: String,
    pub prompts: Vec<String>,
}
