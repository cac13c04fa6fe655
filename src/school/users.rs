use hourglass_rs::SafeTimeProvider;

use super::School;
use crate::errors::{Result, SchoolError};
use crate::events::Event;
use crate::records::UserAccount;
use crate::store::Storage;
use crate::types::{UserId, UserRole};
use crate::validation;

impl<S: Storage> School<S> {
    pub fn register_user(
        &mut self,
        username: &str,
        password: &str,
        role: UserRole,
        time_provider: &SafeTimeProvider,
    ) -> Result<UserAccount> {
        let username = validation::require_text("username", username)?;
        self.check_password_policy(password)?;
        self.ensure_unique_username(&username, None)?;

        let account = UserAccount {
            id: UserId::default(),
            username,
            password_hash: self.hasher.hash(password)?,
            role,
            active: true,
        };
        let account = self.repo_mut::<UserAccount>().insert(account)?;

        tracing::info!(user_id = %account.id, username = %account.username, role = ?account.role, "registered user");

        self.events.emit(Event::UserRegistered {
            user_id: account.id,
            username: account.username.clone(),
            role: account.role,
            timestamp: time_provider.now(),
        });

        Ok(account)
    }

    /// check a login; unknown users and wrong passwords look the same
    pub fn authenticate(
        &mut self,
        username: &str,
        password: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<UserAccount> {
        let username = validation::require_text("username", username)?;
        if password.is_empty() {
            return Err(SchoolError::validation("password", "is required"));
        }

        let Some(account) = self.find_user(&username) else {
            return Err(self.login_failed(&username, time_provider));
        };

        if !account.active {
            tracing::warn!(username = %username, "login attempt on inactive account");
            return Err(SchoolError::InactiveAccount { username });
        }

        if !self.hasher.verify(password, &account.password_hash)? {
            return Err(self.login_failed(&username, time_provider));
        }

        tracing::info!(user_id = %account.id, "login succeeded");
        self.events.emit(Event::LoginSucceeded {
            user_id: account.id,
            timestamp: time_provider.now(),
        });

        Ok(account)
    }

    fn login_failed(&mut self, username: &str, time_provider: &SafeTimeProvider) -> SchoolError {
        tracing::warn!(username = %username, "login failed");
        self.events.emit(Event::LoginFailed {
            username: username.to_string(),
            timestamp: time_provider.now(),
        });
        SchoolError::InvalidCredentials
    }

    pub fn change_password(&mut self, id: UserId, current: &str, new_password: &str) -> Result<()> {
        let mut account = self.user(id)?;
        if !self.hasher.verify(current, &account.password_hash)? {
            return Err(SchoolError::InvalidCredentials);
        }
        self.check_password_policy(new_password)?;

        account.password_hash = self.hasher.hash(new_password)?;
        self.repo_mut::<UserAccount>().update(account)
    }

    /// update username, role and status; the stored hash is kept unless a new
    /// password is given
    pub fn update_user(&mut self, account: UserAccount, new_password: Option<&str>) -> Result<()> {
        let existing = self.user(account.id)?;
        let username = validation::require_text("username", &account.username)?;
        self.ensure_unique_username(&username, Some(account.id))?;

        let password_hash = match new_password {
            Some(password) => {
                self.check_password_policy(password)?;
                self.hasher.hash(password)?
            }
            None => existing.password_hash,
        };

        self.repo_mut::<UserAccount>().update(UserAccount {
            username,
            password_hash,
            ..account
        })
    }

    pub fn deactivate_user(&mut self, id: UserId, time_provider: &SafeTimeProvider) -> Result<()> {
        self.set_user_active(id, false, time_provider)
    }

    pub fn activate_user(&mut self, id: UserId, time_provider: &SafeTimeProvider) -> Result<()> {
        self.set_user_active(id, true, time_provider)
    }

    fn set_user_active(&mut self, id: UserId, active: bool, time_provider: &SafeTimeProvider) -> Result<()> {
        let mut account = self.user(id)?;
        if account.active == active {
            return Ok(());
        }

        account.active = active;
        self.repo_mut::<UserAccount>().update(account)?;

        tracing::info!(user_id = %id, active, "user status changed");
        self.events.emit(Event::UserStatusChanged {
            user_id: id,
            active,
            timestamp: time_provider.now(),
        });

        Ok(())
    }

    pub fn user(&self, id: UserId) -> Result<UserAccount> {
        self.repo::<UserAccount>().fetch(id)
    }

    pub fn users(&self) -> Vec<UserAccount> {
        self.repo::<UserAccount>().list()
    }

    pub fn find_user(&self, username: &str) -> Option<UserAccount> {
        self.users().into_iter().find(|u| u.username == username)
    }

    fn check_password_policy(&self, password: &str) -> Result<()> {
        validation::require_min_length("password", password, self.config.security.min_password_length)
    }

    fn ensure_unique_username(&self, username: &str, except: Option<UserId>) -> Result<()> {
        match self.find_user(username) {
            Some(other) if Some(other.id) != except => Err(SchoolError::Duplicate {
                entity: "user",
                key: username.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
