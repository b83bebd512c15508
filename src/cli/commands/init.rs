//! `passvault init` — set up a new vault with a master password.

use crate::cli::output;
use crate::cli::{open_vault, prompt_new_password, vault_dir, Cli, PASSWORD_ENV};
use crate::errors::{PassVaultError, Result};
use crate::vault::VaultState;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let dir = vault_dir(cli)?;
    let mut vault = open_vault(cli)?;

    if vault.state()? != VaultState::Uninitialized {
        output::tip("Use `passvault add` to store credentials in the existing vault.");
        return Err(PassVaultError::AlreadyInitialized);
    }

    let password = prompt_new_password(PASSWORD_ENV)?;
    vault.setup(&password)?;
    vault.logout()?;

    crate::audit::log_audit(cli, "init", None, Some("vault created"));

    output::success(&format!("Vault created at {}", dir.display()));
    output::tip("Run `passvault add <TITLE>` to store a credential.");
    output::tip("Run `passvault generate` to create a strong password.");

    Ok(())
}
