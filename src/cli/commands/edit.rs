//! `passvault edit` — change fields of an existing credential.

use crate::cli::output;
use crate::cli::{prompt_secret, resolve_credential, unlock_vault, Cli};
use crate::errors::{PassVaultError, Result};
use crate::security::{generate_password, GeneratorOptions};
use crate::vault::CredentialPatch;

/// Field changes as given on the command line.
pub struct EditArgs<'a> {
    pub query: &'a str,
    pub title: Option<&'a str>,
    pub url: Option<&'a str>,
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub password: bool,
    pub generate: bool,
}

/// Execute the `edit` command.
pub fn execute(cli: &Cli, args: &EditArgs<'_>) -> Result<()> {
    let mut patch = CredentialPatch {
        title: args.title.map(str::to_string),
        url: args.url.map(str::to_string),
        username: args.username.map(str::to_string),
        email: args.email.map(str::to_string),
        password: None,
        notes: args.notes.map(str::to_string),
    };

    if patch.is_empty() && !args.password && !args.generate {
        return Err(PassVaultError::CommandFailed(
            "nothing to change — pass at least one field (see `passvault edit --help`)".into(),
        ));
    }

    let mut vault = unlock_vault(cli)?;
    let existing = resolve_credential(&vault, args.query)?;

    if args.generate {
        patch.password = Some(generate_password(&GeneratorOptions::default())?);
    } else if args.password {
        let secret = prompt_secret(&format!("New password for {}", existing.title))?;
        patch.password = Some(secret.as_str().to_string());
    }

    let updated = vault.update_credential(existing.id, &patch)?;
    vault.logout()?;

    let detail = if patch.password.is_some() {
        "password changed"
    } else {
        "fields changed"
    };
    crate::audit::log_audit(cli, "edit", Some(updated.title.as_str()), Some(detail));

    output::success(&format!("Updated '{}'", updated.title));

    Ok(())
}
