use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    User,
    Model,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) text: Option<String>,
}

impl Part {
    pub(crate) fn new_text(text: impl Into<String>) -> Self {
        Part {
            text: Some(text.into()),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) role: Option<Role>,
    pub(crate) parts: Vec<Part>,
}

impl Content {
    /// The concatenated text of all parts; non-text parts contribute nothing.
    pub(crate) fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct GenerateContentRequest {
    pub(crate) contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub(crate) fn single_turn(prompt: &str) -> Self {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some(Role::User),
                parts: vec![Part::new_text(prompt)],
            }],
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Candidate {
    pub(crate) content: Content,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub(crate) candidates: Vec<Candidate>,
}
