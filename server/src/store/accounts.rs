//! Credentials, registration and presence.
//!
//! Passwords are compared in plain text: this store only ever holds seeded
//! dev accounts and ones created against a local server.

#[cfg(test)]
#[path = "accounts_test.rs"]
mod accounts_test;

use tracing::info;
use uuid::Uuid;
use wire::model::{LoginResponse, RegisterRequest, User};

use super::{Credential, Store, StoreError};

pub const STATUS_OFFLINE: &str = "offline";
const MIN_PASSWORD_LEN: usize = 6;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Store {
    /// # Errors
    ///
    /// `Unauthorized` for unknown emails, wrong passwords, or accounts whose
    /// email was never verified.
    pub fn login(&self, email: &str, password: &str) -> Result<LoginResponse, StoreError> {
        let email = normalize_email(email);
        let credential = self.credentials.get(&email).ok_or(StoreError::Unauthorized)?;
        if credential.password != password || !credential.verified {
            return Err(StoreError::Unauthorized);
        }
        Ok(LoginResponse { local_id: credential.uid.clone(), email })
    }

    /// Register an unverified account and its user record.
    ///
    /// # Errors
    ///
    /// `Invalid` for malformed input; `Conflict` when the email is taken.
    pub fn create_user(&mut self, request: &RegisterRequest) -> Result<String, StoreError> {
        let email = normalize_email(&request.email);
        let username = request.username.trim();
        if !email.contains('@') {
            return Err(StoreError::Invalid("email address is malformed".to_owned()));
        }
        if username.is_empty() {
            return Err(StoreError::Invalid("username is empty".to_owned()));
        }
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(StoreError::Invalid(format!(
                "password needs at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.credentials.contains_key(&email) {
            return Err(StoreError::Conflict(format!("{email} is already registered")));
        }

        let uid = Uuid::new_v4().to_string();
        self.users.insert(
            uid.clone(),
            User {
                id: uid.clone(),
                username: username.to_owned(),
                email: email.clone(),
                status: STATUS_OFFLINE.to_owned(),
                ..User::default()
            },
        );
        self.credentials.insert(
            email,
            Credential { uid: uid.clone(), password: request.password.clone(), verified: false },
        );
        info!(%uid, "store: user created");
        Ok(uid)
    }

    /// # Errors
    ///
    /// `NotFound` for unknown emails.
    pub fn verify_user(&mut self, email: &str) -> Result<(), StoreError> {
        let email = normalize_email(email);
        let credential = self
            .credentials
            .get_mut(&email)
            .ok_or_else(|| StoreError::NotFound(format!("account {email}")))?;
        credential.verified = true;
        Ok(())
    }

    /// Mark the account's user offline.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown emails.
    pub fn logout(&mut self, email: &str) -> Result<(), StoreError> {
        let email = normalize_email(email);
        let uid = self
            .credentials
            .get(&email)
            .map(|c| c.uid.clone())
            .ok_or_else(|| StoreError::NotFound(format!("account {email}")))?;
        self.set_status(&uid, STATUS_OFFLINE)
    }

    /// # Errors
    ///
    /// `NotFound` for unknown users; `Invalid` for a blank status.
    pub fn set_status(&mut self, user_id: &str, status: &str) -> Result<(), StoreError> {
        let status = status.trim();
        if status.is_empty() {
            return Err(StoreError::Invalid("status is empty".to_owned()));
        }
        status.clone_into(&mut self.user_mut(user_id)?.status);
        Ok(())
    }
}
