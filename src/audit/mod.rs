//! Audit log — SQLite-based operation history.
//!
//! Stores a record of every vault operation (init, add, delete, passwd,
//! etc.) in a local SQLite database at `<vault_dir>/audit.db`.  Only
//! credential titles and short details are recorded, never secrets.
//!
//! Logging degrades gracefully: if the database can't be opened or
//! written to, operations continue without logging.  Without the
//! `audit-log` feature, `log_audit` is a no-op.

#[cfg(feature = "audit-log")]
mod sqlite;

#[cfg(feature = "audit-log")]
pub use sqlite::{AuditEntry, AuditLog};

use crate::cli::Cli;

/// Log an audit event for the vault selected on the command line.
///
/// Opens the audit database, logs the event, and ignores any errors, so
/// it never fails the parent operation.
#[cfg(feature = "audit-log")]
pub fn log_audit(cli: &Cli, op: &str, title: Option<&str>, details: Option<&str>) {
    let Ok(vault_dir) = crate::cli::vault_dir(cli) else {
        return;
    };

    if let Some(audit) = AuditLog::open(&vault_dir) {
        audit.log(op, title, details);
    }
}

/// Delete the audit history of the vault selected on the command line.
#[cfg(feature = "audit-log")]
pub fn erase_audit(cli: &Cli) -> crate::errors::Result<()> {
    AuditLog::erase(&crate::cli::vault_dir(cli)?)
}

#[cfg(not(feature = "audit-log"))]
pub fn erase_audit(_cli: &Cli) -> crate::errors::Result<()> {
    Ok(())
}

#[cfg(not(feature = "audit-log"))]
pub fn log_audit(_cli: &Cli, _op: &str, _title: Option<&str>, _details: Option<&str>) {}
