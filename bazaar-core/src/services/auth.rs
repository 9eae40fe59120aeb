//! Registration and credential checks
//!
//! Passwords are stored as argon2 PHC strings. Token encoding is not done
//! here: callers pass a [`TokenIssuer`] that turns a [`Viewer`] into
//! whatever their transport carries.

use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;
use tokio::task;

use crate::db::{Role, UserRepository};
use crate::error::{Result, ServiceError};
use crate::models::{NewUser, RegisterForm, User, Viewer};

/// Encodes a resolved identity into a bearer token
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, viewer: &Viewer) -> String;
}

pub struct AuthService {
    repo: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Validate, hash and store a new user.
    ///
    /// A taken email is `Conflict`; nothing is written in that case.
    pub async fn register(&self, form: RegisterForm) -> Result<User> {
        let form = form.validate()?;
        let password_hash = hash_password(form.password).await?;

        let new_user = NewUser {
            nickname: form.nickname,
            fio: form.fio,
            email: form.email,
            phone_number: form.phone_number,
            password_hash,
            rating: 0,
        };

        match self.repo.create(&new_user).await? {
            Some(user) => {
                tracing::info!(user_id = user.id, "user registered");
                Ok(user)
            }
            None => Err(ServiceError::Conflict(format!(
                "email {} is already registered",
                new_user.email
            ))),
        }
    }

    /// Check credentials and resolve the viewer identity.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Viewer> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.repo.find_by_email(&email).await? else {
            tracing::debug!("login for unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        if !verify_password(password.to_owned(), user.password.clone()).await? {
            tracing::debug!(user_id = user.id, "login with wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(Viewer::new(user.id, user.email, Role::AuthorizedUser.as_str()))
    }

    /// Authenticate, then encode the viewer with `issuer`.
    pub async fn login(&self, email: &str, password: &str, issuer: &dyn TokenIssuer) -> Result<String> {
        let viewer = self.authenticate(email, password).await?;
        tracing::info!(user_id = viewer.id, "user logged in");
        Ok(issuer.issue(&viewer))
    }

    /// Look up a user profile by id.
    pub async fn get_user(&self, profile_id: i64) -> Result<User> {
        self.repo
            .find_by_id(profile_id)
            .await?
            .ok_or(ServiceError::NotFound {
                resource: "user",
                id: profile_id,
            })
    }

    /// Remove the user with every capability row. `false` if unknown.
    pub async fn delete_account(&self, profile_id: i64) -> Result<bool> {
        Ok(self.repo.delete(profile_id).await?)
    }
}

async fn hash_password(password: String) -> Result<String> {
    task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| ServiceError::PasswordHash(err.to_string()))
    })
    .await
    .map_err(|err| ServiceError::PasswordHash(err.to_string()))?
}

async fn verify_password(password: String, encoded: String) -> Result<bool> {
    task::spawn_blocking(move || -> Result<bool> {
        let parsed =
            PasswordHash::new(&encoded).map_err(|err| ServiceError::PasswordHash(err.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|err| ServiceError::PasswordHash(err.to_string()))?
}
