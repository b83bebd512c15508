//! `passvault audit` — display the audit log.
//!
//! Usage:
//!   passvault audit               # show last 50 entries
//!   passvault audit --last 20     # show last 20
//!   passvault audit --since 7d    # entries from last 7 days

use chrono::{DateTime, Utc};

use crate::cli::Cli;
use crate::errors::{PassVaultError, Result};

/// Execute the `audit` command.
#[cfg(feature = "audit-log")]
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    use crate::audit::AuditLog;
    use crate::cli::{output, vault_dir};

    let since_dt = since.map(parse_duration).transpose()?;

    let dir = vault_dir(cli)?;
    if !AuditLog::db_path(&dir).exists() {
        output::info("No audit entries found.");
        return Ok(());
    }

    let audit = AuditLog::open(&dir)
        .ok_or_else(|| PassVaultError::AuditError("failed to open audit database".into()))?;

    let entries = audit.query(last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

#[cfg(not(feature = "audit-log"))]
pub fn execute(_cli: &Cli, _last: usize, since: Option<&str>) -> Result<()> {
    since.map(parse_duration).transpose()?;
    Err(PassVaultError::AuditError(
        "this build has no audit log (rebuild with the `audit-log` feature)".into(),
    ))
}

/// Parse a human-friendly duration string like "7d", "24h", "30m" into
/// the point in time that long ago.
fn parse_duration(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    let invalid = || {
        PassVaultError::CommandFailed(format!(
            "invalid duration '{input}' — use format like 7d, 24h, or 30m"
        ))
    };

    let unit = input.chars().last().ok_or_else(invalid)?;
    let num_str = &input[..input.len() - unit.len_utf8()];
    let num: i64 = num_str.parse().map_err(|_| invalid())?;

    let duration = match unit {
        'd' => chrono::Duration::days(num),
        'h' => chrono::Duration::hours(num),
        'm' => chrono::Duration::minutes(num),
        _ => return Err(invalid()),
    };

    Ok(Utc::now() - duration)
}

/// Print audit entries in a formatted table.
#[cfg(feature = "audit-log")]
fn print_audit_table(entries: &[crate::audit::AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Credential", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry.title.as_deref().unwrap_or("-").to_string(),
            entry.details.as_deref().unwrap_or("-").to_string(),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
#[cfg(feature = "audit-log")]
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "init" | "add" => style(op).green().to_string(),
        "edit" | "get" => style(op).blue().to_string(),
        "delete" | "reset" => style(op).red().to_string(),
        "passwd" => style(op).yellow().to_string(),
        "export" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}
