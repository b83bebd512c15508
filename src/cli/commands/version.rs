//! `passvault version` — display version and build information.

use console::style;

use crate::errors::Result;
use crate::vault::format::CURRENT_VERSION;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    println!("passvault {}", env!("CARGO_PKG_VERSION"));
    println!(
        "{} vault format v{CURRENT_VERSION}, AES-256-GCM, Argon2id",
        style("storage:").dim()
    );
    let audit = if cfg!(feature = "audit-log") {
        style("enabled").green()
    } else {
        style("disabled").yellow()
    };
    println!("{} {audit}", style("audit log:").dim());
    Ok(())
}
