use axum::{
    routing::{delete, post},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(handlers::generate))
        .route("/get-prompts", post(handlers::get_prompts))
        .route("/delete-prompt", delete(handlers::delete_prompt))
}
