use crate::{entities::logins, store::hash_token};
use chrono::Utc;
use log::info;
use sea_orm::{ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait};
use uuid::Uuid;

pub struct LoginService;

impl LoginService {
    /// Issues a new login cookie value for `username`.
    ///
    /// Only the token's hash is stored, so the returned value cannot be
    /// recovered later.
    pub async fn grant(db: &DatabaseConnection, username: &str) -> Result<String, DbErr> {
        let token = new_token();

        logins::Entity::insert(logins::ActiveModel {
            token_hash: Set(hash_token(&token)),
            username: Set(username.to_string()),
            created_at: Set(Utc::now().naive_utc()),
        })
        .exec(db)
        .await?;

        info!("Granted a login token to {username}");
        Ok(token)
    }
}

/// Two v4 UUIDs, hex encoded
fn new_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::new_token;

    #[test]
    fn test_tokens_are_long_and_distinct() {
        let a = new_token();
        let b = new_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
