//! `passvault add` — store a new credential.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{prompt_secret, unlock_vault, Cli};
use crate::errors::Result;
use crate::security::{generate_password, GeneratorOptions};
use crate::vault::CredentialDraft;

/// Fields for a new credential as given on the command line.
pub struct AddArgs<'a> {
    pub title: &'a str,
    pub url: Option<&'a str>,
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub generate: bool,
}

/// Execute the `add` command.
pub fn execute(cli: &Cli, args: &AddArgs<'_>) -> Result<()> {
    let mut vault = unlock_vault(cli)?;

    let password = if args.generate {
        Zeroizing::new(generate_password(&GeneratorOptions::default())?)
    } else {
        prompt_secret(&format!("Password for {}", args.title))?
    };

    let mut draft = CredentialDraft::new(args.title, password.as_str());
    draft.url = args.url.map(str::to_string);
    draft.username = args.username.map(str::to_string);
    draft.email = args.email.map(str::to_string);
    draft.notes = args.notes.map(str::to_string);

    let added = vault.add_credential(&draft)?;
    let total = vault.credential_count()?;
    vault.logout()?;

    crate::audit::log_audit(cli, "add", Some(added.title.as_str()), None);

    output::success(&format!("Added '{}' ({total} total)", added.title));
    output::info(&format!("Id: {}", added.id));
    if args.generate {
        output::tip("Password was generated — run `passvault get <TITLE> --copy` to use it.");
    }

    Ok(())
}
