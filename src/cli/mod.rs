//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{PassVaultError, Result};
use crate::security::validate_master_password;
use crate::storage::FileBlobStore;
use crate::vault::{Credential, SortKey, VaultState, VaultStore};

/// Environment variable that supplies the master password non-interactively.
pub const PASSWORD_ENV: &str = "PASSVAULT_PASSWORD";

/// Environment variable that supplies the new password for `passwd`.
pub const NEW_PASSWORD_ENV: &str = "PASSVAULT_NEW_PASSWORD";

/// PassVault CLI: local encrypted password manager.
#[derive(Parser)]
#[command(name = "passvault", about = "Local encrypted password manager", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: `vault_dir` from .passvault.toml, else .passvault)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Set up a new vault with a master password
    Init,

    /// Add a credential (password is prompted, piped, or generated)
    Add {
        /// Title, e.g. "GitHub"
        title: String,
        /// Website URL (scheme://host)
        #[arg(long)]
        url: Option<String>,
        /// Login username
        #[arg(short, long)]
        username: Option<String>,
        /// Login email
        #[arg(short, long)]
        email: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Generate a random password instead of prompting
        #[arg(short, long)]
        generate: bool,
    },

    /// Show a credential by id or title
    Get {
        /// Credential id, or its exact title
        query: String,
        /// Field to print or copy
        #[arg(short, long, value_enum, default_value = "password")]
        field: CopyField,
        /// Copy the field to the clipboard instead of printing it
        #[arg(short, long)]
        copy: bool,
    },

    /// List credentials
    List {
        /// Only show credentials matching this text
        #[arg(short, long)]
        search: Option<String>,
        /// Sort field (default: most recently updated first)
        #[arg(long, value_enum)]
        sort: Option<SortField>,
        /// Sort in ascending order
        #[arg(long, conflicts_with = "desc")]
        asc: bool,
        /// Sort in descending order
        #[arg(long)]
        desc: bool,
    },

    /// Edit fields of a credential (an empty value clears an optional field)
    Edit {
        /// Credential id, or its exact title
        query: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New URL
        #[arg(long)]
        url: Option<String>,
        /// New username
        #[arg(long)]
        username: Option<String>,
        /// New email
        #[arg(long)]
        email: Option<String>,
        /// New notes
        #[arg(long)]
        notes: Option<String>,
        /// Prompt for a new password
        #[arg(long, conflicts_with = "generate")]
        password: bool,
        /// Replace the password with a generated one
        #[arg(long)]
        generate: bool,
    },

    /// Delete a credential
    Delete {
        /// Credential id, or its exact title
        query: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Change the master password
    Passwd,

    /// Erase the vault and every stored credential
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a random password
    Generate {
        /// Password length (default: `generator_length` from config, else 16)
        #[arg(short, long)]
        length: Option<usize>,
        /// Leave out uppercase letters
        #[arg(long)]
        no_uppercase: bool,
        /// Leave out lowercase letters
        #[arg(long)]
        no_lowercase: bool,
        /// Leave out digits
        #[arg(long)]
        no_digits: bool,
        /// Leave out symbols
        #[arg(long)]
        no_symbols: bool,
        /// Copy to the clipboard instead of printing
        #[arg(short, long)]
        copy: bool,
    },

    /// Report weak and reused passwords
    Health,

    /// Export all credentials in plaintext
    Export {
        /// Output format: json, csv, or txt
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Show version
    Version,
}

/// Credential fields accepted by `get --field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CopyField {
    Password,
    Username,
    Email,
}

impl CopyField {
    /// The field's value, if the credential has one.
    pub fn value_of(self, credential: &Credential) -> Option<&str> {
        match self {
            Self::Password => Some(credential.password.as_str()),
            Self::Username => credential.username.as_deref(),
            Self::Email => credential.email.as_deref(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Username => "username",
            Self::Email => "email",
        }
    }
}

/// Sort fields accepted by `list --sort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortField {
    Title,
    Created,
    Updated,
}

impl From<SortField> for SortKey {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Title => SortKey::Title,
            SortField::Created => SortKey::Created,
            SortField::Updated => SortKey::Updated,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the vault directory: `--vault-dir`, else the config file's
/// `vault_dir`, relative to the working directory.
pub fn vault_dir(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    match &cli.vault_dir {
        Some(dir) => Ok(cwd.join(dir)),
        None => Ok(Settings::load(&cwd)?.vault_path(&cwd)),
    }
}

/// Open the vault at the configured directory without logging in.
///
/// Creates the vault directory if it does not exist yet.
pub fn open_vault(cli: &Cli) -> Result<VaultStore<FileBlobStore>> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let store = FileBlobStore::open(&vault_dir(cli)?)?;
    Ok(VaultStore::new(store, settings.argon2_params()))
}

/// Open an existing vault without logging in.
///
/// Fails with `NotInitialized` (and creates nothing) when there is no vault.
pub fn open_initialized(cli: &Cli) -> Result<VaultStore<FileBlobStore>> {
    if vault_dir(cli)?.is_dir() {
        let vault = open_vault(cli)?;
        if vault.state()? != VaultState::Uninitialized {
            return Ok(vault);
        }
    }
    output::tip("Run `passvault init` to create a vault.");
    Err(PassVaultError::NotInitialized)
}

/// Open the vault and log in with the master password.
pub fn unlock_vault(cli: &Cli) -> Result<VaultStore<FileBlobStore>> {
    let mut vault = open_initialized(cli)?;
    let password = prompt_password()?;
    vault.login(&password)?;
    Ok(vault)
}

/// Find a credential by id, or by exact (case-insensitive) title.
pub fn resolve_credential(vault: &VaultStore<FileBlobStore>, query: &str) -> Result<Credential> {
    if let Ok(id) = Uuid::parse_str(query.trim()) {
        return vault.get_by_id(id);
    }

    let wanted = query.trim().to_lowercase();
    let mut matches: Vec<Credential> = vault
        .search(&wanted)?
        .into_iter()
        .filter(|c| c.title.to_lowercase() == wanted)
        .collect();

    match matches.len() {
        0 => Err(PassVaultError::NotFound(query.to_string())),
        1 => Ok(matches.remove(0)),
        n => Err(PassVaultError::CommandFailed(format!(
            "{n} credentials are titled '{query}' — use the id instead"
        ))),
    }
}

/// Get the master password, trying in order:
/// 1. `PASSVAULT_PASSWORD` env var (CI/scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Master password")
        .interact()
        .map_err(|e| PassVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation.
///
/// `env_var` names an environment variable checked first (used by
/// `init` and `passwd` for scripted runs).  The password must satisfy
/// the master password policy; interactive entry re-prompts until it does.
pub fn prompt_new_password(env_var: &str) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(env_var) {
        if !pw.is_empty() {
            validate_master_password(&pw)?;
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose master password")
                .with_confirmation(
                    "Confirm master password",
                    "Passwords do not match, try again",
                )
                .interact()
                .map_err(|e| PassVaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if let Err(e) = validate_master_password(&password) {
            output::warning(&format!("{e}. Try again."));
            continue;
        }

        return Ok(password);
    }
}

/// Read a credential password: piped stdin, or a hidden prompt.
pub fn prompt_secret(label: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        return Ok(Zeroizing::new(buf.trim_end().to_string()));
    }

    let pw = dialoguer::Password::new()
        .with_prompt(label)
        .interact()
        .map_err(|e| PassVaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Ask a yes/no question, defaulting to "no".
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| PassVaultError::CommandFailed(format!("confirm prompt: {e}")))
}

/// Put `text` on the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| PassVaultError::CommandFailed(format!("clipboard unavailable: {e}")))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| PassVaultError::CommandFailed(format!("clipboard write: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_has_no_sort_by_default() {
        let cli = Cli::try_parse_from(["passvault", "list"]).unwrap();
        match cli.command {
            Commands::List {
                sort,
                asc,
                desc,
                search,
            } => {
                assert!(sort.is_none());
                assert!(!asc && !desc);
                assert!(search.is_none());
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn list_asc_and_desc_conflict() {
        assert!(Cli::try_parse_from(["passvault", "list", "--asc", "--desc"]).is_err());
    }

    #[test]
    fn get_field_defaults_to_password() {
        let cli = Cli::try_parse_from(["passvault", "get", "Gmail"]).unwrap();
        match cli.command {
            Commands::Get { field, copy, .. } => {
                assert_eq!(field, CopyField::Password);
                assert!(!copy);
            }
            _ => panic!("expected get"),
        }

        let cli = Cli::try_parse_from(["passvault", "get", "Gmail", "--field", "email"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Get {
                field: CopyField::Email,
                ..
            }
        ));
    }

    #[test]
    fn export_format_defaults_to_json() {
        let cli = Cli::try_parse_from(["passvault", "export"]).unwrap();
        match cli.command {
            Commands::Export { format, output } => {
                assert_eq!(format, "json");
                assert!(output.is_none());
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn vault_dir_flag_is_global() {
        let cli = Cli::try_parse_from(["passvault", "list", "--vault-dir", "elsewhere"]).unwrap();
        assert_eq!(cli.vault_dir.as_deref(), Some("elsewhere"));
    }

    #[test]
    fn edit_password_and_generate_conflict() {
        assert!(Cli::try_parse_from(["passvault", "edit", "x", "--password", "--generate"]).is_err());
    }
}
