use sqlx::FromRow;
use time::OffsetDateTime;

pub type UserId = i64;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub password_hash: String, // Argon2 PHC string, never the plaintext
    pub created_at: OffsetDateTime,
}

/// Fields supplied at signup; id and timestamp come from the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub surname: String,
    pub password_hash: String,
}
