use std::sync::Arc;

use room_persistence::RepositoryError;
use room_persistence::repositories::UserRepository;
use room_types::SafeUser;

/// Resolves bearer tokens to users. Tokens are opaque: the only check is
/// whether the directory knows them.
pub struct AuthService {
    user_repository: Arc<UserRepository>,
}

impl AuthService {
    pub fn new(user_repository: Arc<UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Extracts the token from an `Authorization` header value.
    pub fn bearer_token(auth_header: Option<&str>) -> Result<&str, AuthError> {
        let header = auth_header.ok_or(AuthError::MissingToken)?;
        let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();

        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        Ok(token)
    }

    pub async fn validate_token(&self, token: &str) -> Result<SafeUser, AuthError> {
        match self.user_repository.find_by_token(token).await? {
            Some(user) => Ok(user),
            None => {
                tracing::warn!("Rejected unknown token");
                Err(AuthError::InvalidToken)
            }
        }
    }

    pub async fn authenticate(&self, auth_header: Option<&str>) -> Result<SafeUser, AuthError> {
        let token = Self::bearer_token(auth_header)?;
        self.validate_token(token).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token lookup failed: {0}")]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use room_persistence::connection::connect_to_memory_database;

    async fn setup_auth_service() -> (AuthService, Arc<UserRepository>) {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let user_repository = Arc::new(UserRepository::new(db));
        (AuthService::new(user_repository.clone()), user_repository)
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(AuthService::bearer_token(Some("Bearer abc")).unwrap(), "abc");
        assert_eq!(AuthService::bearer_token(Some("abc")).unwrap(), "abc");
        assert!(matches!(
            AuthService::bearer_token(None),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            AuthService::bearer_token(Some("Bearer ")),
            Err(AuthError::MissingToken)
        ));
    }

    #[tokio::test]
    async fn test_valid_token() {
        let (auth_service, users) = setup_auth_service().await;
        let token = users.create_user("Alice", 42).await.unwrap();

        let user = auth_service
            .authenticate(Some(&format!("Bearer {}", token)))
            .await
            .unwrap();
        assert_eq!(user.name, "Alice");
        assert_eq!(user.leader_card_id, 42);
    }

    #[tokio::test]
    async fn test_invalid_token_validation() {
        let (auth_service, _) = setup_auth_service().await;

        let result = auth_service.validate_token("invalid-token").await;
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), AuthError::InvalidToken));
    }
}
