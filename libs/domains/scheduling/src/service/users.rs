use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use super::{deleted, found};
use crate::error::{SchedulingError, SchedulingResult};
use crate::models::{NewUser, RegisterUser, User};
use crate::pagination::{Page, PageParams};
use crate::policy::{self, Principal};
use crate::repository::UserRepository;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    #[instrument(skip(self, params), fields(principal_id = principal.id))]
    pub async fn list_users(
        &self,
        principal: &Principal,
        params: PageParams,
    ) -> SchedulingResult<Page<User>> {
        policy::require_superuser(principal)?;

        let window = params.window();
        let users = self.users.list(window).await?;
        let count = self.users.count().await?;

        Ok(window.paginate(users, count))
    }

    #[instrument(skip(self), fields(principal_id = principal.id))]
    pub async fn get_user(&self, principal: &Principal, id: i32) -> SchedulingResult<User> {
        let user = found(self.users.get_by_id(id).await?, "User", id)?;
        policy::self_or_superuser(principal, user.id)?;

        Ok(user)
    }

    /// Also removes the user's schedules and subscriptions through cascades.
    #[instrument(skip(self), fields(principal_id = principal.id))]
    pub async fn delete_user(&self, principal: &Principal, id: i32) -> SchedulingResult<()> {
        let user = found(self.users.get_by_id(id).await?, "User", id)?;
        policy::self_or_superuser(principal, user.id)?;

        deleted(self.users.delete(id).await?, "User", id)
    }

    /// The caller behind a verified token, or `None` once the account is gone.
    #[instrument(skip(self))]
    pub async fn principal(&self, id: i32) -> SchedulingResult<Option<Principal>> {
        Ok(self.users.get_by_id(id).await?.map(|user| Principal {
            id: user.id,
            is_superuser: user.is_superuser,
        }))
    }

    /// Registration never grants superuser rights.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterUser) -> SchedulingResult<User> {
        input.validate()?;

        let email = input.email;
        let hashed_password = hash_password(&input.password).await?;

        self.users
            .create(NewUser {
                email: email.clone(),
                hashed_password,
                is_active: true,
                is_superuser: false,
                is_verified: false,
            })
            .await
            .map_err(|e| match e {
                SchedulingError::Conflict(_) => {
                    SchedulingError::Conflict(format!("User with email {} already exists", email))
                }
                other => other,
            })
    }

    /// Unknown email, wrong password and inactive accounts all fail the same way.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> SchedulingResult<User> {
        let credentials = self
            .users
            .find_credentials(email)
            .await?
            .ok_or(SchedulingError::InvalidCredentials)?;

        if !verify_password(password, &credentials.hashed_password).await?
            || !credentials.user.is_active
        {
            return Err(SchedulingError::InvalidCredentials);
        }

        Ok(credentials.user)
    }

    /// Creates the account as a superuser, or promotes it when it already exists.
    #[instrument(skip(self, password))]
    pub async fn ensure_superuser(&self, email: &str, password: &str) -> SchedulingResult<User> {
        if let Some(credentials) = self.users.find_credentials(email).await? {
            if credentials.user.is_superuser {
                return Ok(credentials.user);
            }
            return self.users.promote_to_superuser(credentials.user.id).await;
        }

        let user = self
            .users
            .create(NewUser {
                email: email.to_string(),
                hashed_password: hash_password(password).await?,
                is_active: true,
                is_superuser: true,
                is_verified: true,
            })
            .await?;

        tracing::info!(user_id = user.id, "Bootstrapped superuser");
        Ok(user)
    }
}

/// Argon2 is CPU-bound; hashing and verification run on the blocking pool.
async fn hash_password(password: &str) -> SchedulingResult<String> {
    let password = password.to_owned();

    blocking(move || {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| SchedulingError::Internal(format!("Password hashing failed: {}", e)))
    })
    .await
}

async fn verify_password(password: &str, hash: &str) -> SchedulingResult<bool> {
    let password = password.to_owned();
    let hash = hash.to_owned();

    blocking(move || {
        let parsed_hash = PasswordHash::new(&hash).map_err(|e| {
            SchedulingError::Internal(format!("Stored password hash is invalid: {}", e))
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    })
    .await
}

async fn blocking<T, F>(f: F) -> SchedulingResult<T>
where
    F: FnOnce() -> SchedulingResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SchedulingError::Internal(format!("Password task failed: {}", e)))?
}
