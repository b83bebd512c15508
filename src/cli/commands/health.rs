//! `passvault health` — report weak, reused and breached passwords.

use crate::cli::output;
use crate::cli::{unlock_vault, Cli};
use crate::errors::Result;
use crate::security::OfflineBreachCheck;

/// Execute the `health` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut vault = unlock_vault(cli)?;
    let total = vault.credential_count()?;
    // No network access: breach lookups always come back clean.
    let findings = vault.health_report(&OfflineBreachCheck)?;
    vault.logout()?;

    if findings.is_empty() {
        output::success(&format!("All {total} credential(s) look healthy."));
        return Ok(());
    }

    output::warning(&format!(
        "{} of {total} credential(s) need attention:",
        findings.len()
    ));
    output::print_health_table(&findings);
    output::tip("Run `passvault edit <TITLE> --generate` to replace a password.");

    Ok(())
}
