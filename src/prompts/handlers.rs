use axum::{extract::State, Json};
use tracing::{debug, instrument, warn};

use crate::{
    error::{ApiError, ApiResult},
    format::format_text,
    prompts::dto::{
        DeletePromptRequest, DeletePromptResponse, GenerateRequest, GenerateResponse,
        GetPromptsRequest, PromptsResponse,
    },
    state::AppState,
    users::User,
};

/// Credentials stored on records created implicitly by `generate` for an
/// unknown email. The placeholder hash never parses, so such records cannot
/// log in until they register properly.
const GUEST_USERNAME: &str = "DefaultUsername";
const GUEST_PASSWORD_HASH: &str = "hashedpassword";

#[instrument(skip(state, payload))]
pub async fn generate(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    let prompt = match payload.prompt {
        Some(p) if !p.is_empty() => p,
        _ => return Err(ApiError::bad_request("Prompt is required")),
    };
    let email = match payload.email {
        Some(e) if !e.is_empty() => e,
        _ => return Err(ApiError::bad_request("Email is required")),
    };

    let raw = state
        .generator
        .generate(&prompt)
        .await
        .map_err(|e| ApiError::upstream("Error generating content", e))?;
    let text = format_text(&raw);

    // The submitted prompt goes into the history, not the formatted output.
    let existing = User::find_by_email(&state.db, &email)
        .await
        .map_err(|e| ApiError::upstream("Error generating content", e))?;
    let user = match existing {
        Some(_) => User::append_prompt(&state.db, &email, &prompt)
            .await
            .map_err(|e| ApiError::upstream("Error generating content", e))?
            .ok_or_else(|| {
                ApiError::upstream(
                    "Error generating content",
                    anyhow::anyhow!("record vanished between lookup and append"),
                )
            })?,
        None => User::create_with_prompt(
            &state.db,
            GUEST_USERNAME,
            &email,
            GUEST_PASSWORD_HASH,
            &prompt,
        )
        .await
        .map_err(|e| ApiError::upstream("Error generating content", e))?,
    };

    debug!(user_id = %user.id, prompts = user.prompts.len(), "prompt saved");
    Ok(Json(GenerateResponse { text }))
}

#[instrument(skip(state, payload))]
pub async fn get_prompts(
    State(state): State<AppState>,
    Json(payload): Json<GetPromptsRequest>,
) -> ApiResult<Json<PromptsResponse>> {
    let email = payload.email.unwrap_or_default();

    let user = User::find_by_email(&state.db, &email)
        .await
        .map_err(|e| ApiError::upstream("Error fetching prompts", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(PromptsResponse {
        prompts: user.prompts,
    }))
}

#[instrument(skip(state, payload))]
pub async fn delete_prompt(
    State(state): State<AppState>,
    Json(payload): Json<DeletePromptRequest>,
) -> ApiResult<Json<DeletePromptResponse>> {
    let (email, index) = match (payload.email, payload.index) {
        (Some(e), Some(i)) if !e.is_empty() => (e, i),
        _ => return Err(ApiError::bad_request("Email and index are required")),
    };

    let user = User::find_by_email(&state.db, &email)
        .await
        .map_err(|e| ApiError::upstream("Error deleting prompt", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if index < 0 || index as usize >= user.prompts.len() {
        warn!(index, len = user.prompts.len(), "delete index out of bounds");
        return Err(ApiError::bad_request("Invalid index"));
    }

    let mut prompts = user.prompts;
    prompts.remove(index as usize);

    let user = User::replace_prompts(&state.db, &email, &prompts)
        .await
        .map_err(|e| ApiError::upstream("Error deleting prompt", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(DeletePromptResponse {
        message: "Prompt deleted successfully".into(),
        prompts: user.prompts,
    }))
}
