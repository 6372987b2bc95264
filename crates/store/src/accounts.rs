//! Account storage and API key lookups.

use cinegrok_core::auth::{generate_api_key, ApiKeyEnv};
use cinegrok_core::error::AuthErrorCode;
use cinegrok_core::plan::{Account, SubscriptionStatus, SubscriptionTier};
use cinegrok_core::{Error, Result};
use redb::ReadableTable;
use uuid::Uuid;

use crate::db::{store_err, Store, TABLE_ACCOUNTS, TABLE_ACCOUNT_EMAILS, TABLE_ACCOUNT_KEYS};

impl Store {
    /// Create an account with a freshly issued API key.
    ///
    /// Emails are unique (case-insensitive); a duplicate signup is a
    /// validation error, not a silent second account.
    pub fn create_account(&self, email: &str, env: ApiKeyEnv) -> Result<Account> {
        let email_key = email.trim().to_lowercase();
        if email_key.is_empty() {
            return Err(Error::missing_field("email"));
        }

        let account = Account::new(email.trim(), generate_api_key(env));
        let id_key = account.id.to_string();
        let json = serde_json::to_string(&account).map_err(|e| store_err("serialize account", e))?;

        let write_txn = self
            .db()
            .begin_write()
            .map_err(|e| store_err("begin write", e))?;
        {
            let mut emails = write_txn
                .open_table(TABLE_ACCOUNT_EMAILS)
                .map_err(|e| store_err("open emails table", e))?;
            if emails
                .get(email_key.as_str())
                .map_err(|e| store_err("get email", e))?
                .is_some()
            {
                return Err(Error::validation(format!(
                    "an account already exists for {}",
                    email_key
                )));
            }
            emails
                .insert(email_key.as_str(), id_key.as_str())
                .map_err(|e| store_err("insert email", e))?;

            let mut keys = write_txn
                .open_table(TABLE_ACCOUNT_KEYS)
                .map_err(|e| store_err("open keys table", e))?;
            keys.insert(account.api_key.as_str(), id_key.as_str())
                .map_err(|e| store_err("insert key", e))?;

            let mut accounts = write_txn
                .open_table(TABLE_ACCOUNTS)
                .map_err(|e| store_err("open accounts table", e))?;
            accounts
                .insert(id_key.as_str(), json.as_str())
                .map_err(|e| store_err("insert account", e))?;
        }
        write_txn.commit().map_err(|e| store_err("commit", e))?;

        Ok(account)
    }

    /// Fetch an account by ID.
    pub fn get_account(&self, id: Uuid) -> Result<Option<Account>> {
        self.get_json(TABLE_ACCOUNTS, &id.to_string())
    }

    /// Resolve an API key to its account.
    ///
    /// Unknown keys are AUTH_003; revoked accounts are AUTH_004.
    pub fn account_by_key(&self, api_key: &str) -> Result<Account> {
        let Some(id) = self.get_string(TABLE_ACCOUNT_KEYS, api_key)? else {
            return Err(Error::auth(AuthErrorCode::InvalidKey, "Invalid API key"));
        };
        let id = Uuid::parse_str(&id).map_err(|e| store_err("parse account id", e))?;

        let account = self
            .get_account(id)?
            .ok_or_else(|| Error::auth(AuthErrorCode::InvalidKey, "Invalid API key"))?;

        if !account.active {
            return Err(Error::auth(
                AuthErrorCode::Revoked,
                "API key has been revoked",
            ));
        }

        Ok(account)
    }

    /// Update an account's subscription tier and status.
    pub fn update_subscription(
        &self,
        id: Uuid,
        tier: SubscriptionTier,
        status: SubscriptionStatus,
    ) -> Result<Account> {
        let mut account = self
            .get_account(id)?
            .ok_or_else(|| Error::not_found(format!("account {}", id)))?;
        account.tier = tier;
        account.status = status;
        self.put_json(TABLE_ACCOUNTS, &id.to_string(), &account)?;
        Ok(account)
    }

    /// Deactivate an account, revoking its API key.
    pub fn revoke_account(&self, id: Uuid) -> Result<()> {
        let mut account = self
            .get_account(id)?
            .ok_or_else(|| Error::not_found(format!("account {}", id)))?;
        account.active = false;
        self.put_json(TABLE_ACCOUNTS, &id.to_string(), &account)
    }
}
