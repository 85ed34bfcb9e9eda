use anyhow::{Context, Result};
use keyring::Entry;

/// Keychain service name for remembered logins.
const SERVICE_NAME: &str = "wastetrace";

/// Optional remember-me storage for login passwords, keyed by email.
///
/// Lives in the OS keychain and is independent of the session store: a
/// remembered password survives logout and session invalidation.
pub struct CredentialStore;

impl CredentialStore {
    /// Remember the password for an email in the OS keychain.
    pub fn remember(email: &str, password: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, email).context("Failed to create keyring entry")?;
        entry
            .set_password(password)
            .context("Failed to store password in keychain")?;
        Ok(())
    }

    /// Look up the remembered password for an email.
    pub fn lookup(email: &str) -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, email).context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("No remembered password for this email")
    }

    /// Forget the remembered password for an email.
    pub fn forget(email: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, email).context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete credential from keychain")?;
        Ok(())
    }

    /// Whether a password is remembered for an email.
    pub fn is_remembered(email: &str) -> bool {
        Entry::new(SERVICE_NAME, email)
            .map(|entry| entry.get_password().is_ok())
            .unwrap_or(false)
    }
}
