//! `passvault delete` — remove a credential from the vault.

use crate::cli::output;
use crate::cli::{confirm, resolve_credential, unlock_vault, Cli};
use crate::errors::Result;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, query: &str, force: bool) -> Result<()> {
    let mut vault = unlock_vault(cli)?;
    let credential = resolve_credential(&vault, query)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Delete credential '{}'?", credential.title))? {
        output::info("Cancelled.");
        return Ok(());
    }

    vault.delete_credential(credential.id)?;
    vault.logout()?;

    crate::audit::log_audit(cli, "delete", Some(credential.title.as_str()), None);
    output::success(&format!("Deleted credential '{}'", credential.title));

    Ok(())
}
