use axum::{extract::State, Json};

use crate::{
    auth::CurrentIdentity,
    error::AppError,
    models::note::{CreateNote, Note, NoteCreated},
    AppState,
};

pub async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, AppError> {
    let notes = state.notes.list_recent().await?;
    Ok(Json(notes))
}

pub async fn create_note(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(payload): Json<CreateNote>,
) -> Result<Json<NoteCreated>, AppError> {
    let owner = state
        .notes
        .create(&payload.content, &payload.email, identity.as_ref())
        .await?;

    Ok(Json(NoteCreated {
        status: "ok",
        owner,
    }))
}
