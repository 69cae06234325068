use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub id: i64,
    pub content: String,
    pub owner_email: String,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateNote {
    pub content: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct NoteCreated {
    pub status: &'static str,
    pub owner: String,
}
