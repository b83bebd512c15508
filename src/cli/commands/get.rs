//! `passvault get` — show one credential.

use crate::cli::output;
use crate::cli::{copy_to_clipboard, resolve_credential, unlock_vault, Cli, CopyField};
use crate::errors::{PassVaultError, Result};

/// Execute the `get` command.
///
/// Prints just the chosen field on stdout so it can be piped.  With
/// `copy` the details are shown instead and the field goes to the
/// clipboard.
pub fn execute(cli: &Cli, query: &str, field: CopyField, copy: bool) -> Result<()> {
    let mut vault = unlock_vault(cli)?;
    let credential = resolve_credential(&vault, query)?;
    vault.logout()?;

    let value = field.value_of(&credential).ok_or_else(|| {
        PassVaultError::CommandFailed(format!(
            "'{}' has no {} set",
            credential.title,
            field.name()
        ))
    })?;

    if copy {
        output::print_credential_details(&credential);
        copy_to_clipboard(value)?;
        output::success(&format!("Copied {} to clipboard.", field.name()));
    } else {
        println!("{value}");
    }

    let details = copy.then(|| format!("copied {}", field.name()));
    crate::audit::log_audit(
        cli,
        "get",
        Some(credential.title.as_str()),
        details.as_deref(),
    );

    Ok(())
}
