use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::CreateUserRequest;
use super::store::{StoreError, User, UserStore};
use super::validate::validate_new_user;
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::error::ApiError;

/// Validate, hash and persist a new user. The store's create is the
/// authority on email uniqueness, so a concurrent duplicate still lands
/// on `EmailTaken` even after the pre-check passes.
pub async fn create_user(
    store: &dyn UserStore,
    mut req: CreateUserRequest,
) -> Result<User, ApiError> {
    req.email = req.email.trim().to_lowercase();
    validate_new_user(&req)?;

    if store.find_by_email(&req.email).await?.is_some() {
        warn!(email = %req.email, "email already registered");
        return Err(ApiError::EmailTaken);
    }

    let password_hash = hash_password(&req.password)?;
    let user = User {
        id: Uuid::new_v4(),
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        email: req.email,
        password_hash,
        created_at: OffsetDateTime::now_utc(),
    };

    match store.create(user).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "user created");
            Ok(user)
        }
        Err(StoreError::EmailTaken) => Err(ApiError::EmailTaken),
        Err(StoreError::Other(e)) => Err(ApiError::Internal(e)),
    }
}

/// Check credentials and issue a token bound to the user's id. Unknown
/// email and wrong password are indistinguishable to the caller.
pub async fn login(
    store: &dyn UserStore,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> Result<(String, Uuid), ApiError> {
    let email = email.trim().to_lowercase();

    let user = match store.find_by_email(&email).await? {
        Some(user) => user,
        None => {
            warn!(email = %email, "login for unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = keys.sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok((token, user.id))
}

/// All stored users in insertion order. Digests are stripped at the DTO
/// boundary.
pub async fn list_users(store: &dyn UserStore) -> Result<Vec<User>, ApiError> {
    Ok(store.list_all().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::users::store::InMemoryUserStore;

    fn make_keys() -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
        })
    }

    fn request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            first_name: "Tony".into(),
            last_name: "Stevens".into(),
            email: email.into(),
            password: "12345678".into(),
            repeat_password: "12345678".into(),
        }
    }

    #[tokio::test]
    async fn create_then_login_resolves_token_to_creator() {
        let store = InMemoryUserStore::new();
        let keys = make_keys();

        let user = create_user(&store, request("test3@test.com"))
            .await
            .expect("create user");
        assert_eq!(user.first_name, "Tony");
        assert_eq!(user.email, "test3@test.com");

        let (token, user_id) = login(&store, &keys, "test3@test.com", "12345678")
            .await
            .expect("login");
        assert_eq!(user_id, user.id);

        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.sub, user.id);
    }

    #[tokio::test]
    async fn distinct_emails_get_distinct_ids() {
        let store = InMemoryUserStore::new();
        let first = create_user(&store, request("a@test.com"))
            .await
            .expect("create first");
        let second = create_user(&store, request("b@test.com"))
            .await
            .expect("create second");
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = InMemoryUserStore::new();
        create_user(&store, request("a@test.com"))
            .await
            .expect("first create");
        let err = create_user(&store, request("a@test.com")).await.unwrap_err();
        assert!(matches!(err, ApiError::EmailTaken));
    }

    #[tokio::test]
    async fn email_is_normalized_before_storage_and_lookup() {
        let store = InMemoryUserStore::new();
        let keys = make_keys();
        create_user(&store, request("  Mixed@Test.Com "))
            .await
            .expect("create user");
        login(&store, &keys, "mixed@test.com", "12345678")
            .await
            .expect("login with normalized email");
    }

    #[tokio::test]
    async fn short_first_name_names_the_field() {
        let store = InMemoryUserStore::new();
        let mut req = request("a@test.com");
        req.first_name = "T".into();
        let err = create_user(&store, req).await.unwrap_err();
        assert!(
            matches!(err, ApiError::Validation { field: "firstName", .. }),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let store = InMemoryUserStore::new();
        let keys = make_keys();
        create_user(&store, request("a@test.com"))
            .await
            .expect("create user");

        let wrong_password = login(&store, &keys, "a@test.com", "bad-password")
            .await
            .unwrap_err();
        let unknown_email = login(&store, &keys, "nobody@test.com", "12345678")
            .await
            .unwrap_err();
        assert!(matches!(wrong_password, ApiError::InvalidCredentials));
        assert!(matches!(unknown_email, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn list_returns_users_in_creation_order() {
        let store = InMemoryUserStore::new();
        for email in ["a@test.com", "b@test.com"] {
            create_user(&store, request(email)).await.expect("create");
        }
        let emails: Vec<String> = list_users(&store)
            .await
            .expect("list users")
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, ["a@test.com", "b@test.com"]);
    }
}
