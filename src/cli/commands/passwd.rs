//! `passvault passwd` — change the master password.
//!
//! Every credential is re-encrypted under a key derived from the new
//! password and a fresh salt.  The change is all-or-nothing: if it fails,
//! the old password still unlocks the vault.

use crate::cli::output;
use crate::cli::{open_initialized, prompt_new_password, prompt_password, Cli, NEW_PASSWORD_ENV};
use crate::errors::Result;

/// Execute the `passwd` command.
pub fn execute(cli: &Cli) -> Result<()> {
    output::info("Enter your current master password.");
    let mut vault = open_initialized(cli)?;
    let current = prompt_password()?;
    vault.login(&current)?;

    output::info("Choose your new master password.");
    let new_password = prompt_new_password(NEW_PASSWORD_ENV)?;

    vault.change_master_password(&current, &new_password)?;
    let count = vault.credential_count()?;
    vault.logout()?;

    crate::audit::log_audit(
        cli,
        "passwd",
        None,
        Some(&format!("{count} credentials re-encrypted")),
    );

    output::success(&format!(
        "Master password changed ({count} credentials re-encrypted)"
    ));

    Ok(())
}
