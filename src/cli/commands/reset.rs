//! `passvault reset` — erase the vault.

use crate::cli::output;
use crate::cli::{confirm, open_vault, Cli};
use crate::errors::Result;

/// Execute the `reset` command.
///
/// Needs no password: anyone who can delete the vault files can do the
/// same by hand, and a forgotten password is the usual reason to reset.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    if !force
        && !confirm("Erase the vault and ALL stored credentials? This cannot be undone")?
    {
        output::info("Cancelled.");
        return Ok(());
    }

    let mut vault = open_vault(cli)?;
    vault.reset()?;

    // The old history names credentials; the new one starts with the reset.
    crate::audit::erase_audit(cli)?;
    crate::audit::log_audit(cli, "reset", None, Some("vault erased"));
    output::success("Vault erased.");
    output::tip("Run `passvault init` to start over.");

    Ok(())
}
