//! `passvault export` — write every credential in plaintext.
//!
//! Supported formats:
//! - `json` (default): array of credential objects
//! - `csv`: header row plus one line per credential
//! - `txt`: one labelled block per credential

use std::fs;
use std::path::Path;

use crate::cli::output;
use crate::cli::{unlock_vault, Cli};
use crate::errors::{PassVaultError, Result};

/// Execute the `export` command.
pub fn execute(cli: &Cli, format: &str, output_path: Option<&str>) -> Result<()> {
    if !matches!(format, "json" | "csv" | "txt") {
        return Err(PassVaultError::CommandFailed(format!(
            "unknown export format '{format}' — use 'json', 'csv' or 'txt'"
        )));
    }
    if let Some(dest) = output_path {
        if Path::new(dest).exists() {
            return Err(PassVaultError::CommandFailed(format!(
                "refusing to overwrite existing file {dest}"
            )));
        }
    }

    let mut vault = unlock_vault(cli)?;
    let content = match format {
        "csv" => vault.export_csv()?,
        "txt" => vault.export_txt()?,
        _ => vault.export_json()?,
    };
    let count = vault.credential_count()?;
    vault.logout()?;

    match output_path {
        Some(dest) => {
            write_private(Path::new(dest), content.as_bytes()).map_err(|e| {
                PassVaultError::CommandFailed(format!("failed to write export file: {e}"))
            })?;

            output::warning("The export file contains every password in plaintext.");
            output::success(&format!(
                "Exported {count} credentials to {dest} (format: {format})"
            ));
        }
        None => {
            // Raw output only, so it can be redirected.
            print!("{}", content.as_str());
            if !content.ends_with('\n') {
                println!();
            }
        }
    }

    crate::audit::log_audit(
        cli,
        "export",
        None,
        Some(&format!("{count} credentials, format: {format}")),
    );

    Ok(())
}

/// Write `bytes` to a new file readable only by the owner.
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
