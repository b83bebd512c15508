//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.  Nothing here prints a
//! credential password.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::security::{HealthFinding, HealthIssue};
use crate::vault::Credential;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// Print a table of credentials (Title, Username, URL, Updated, Id).
pub fn print_credentials_table(credentials: &[Credential]) {
    if credentials.is_empty() {
        info("No credentials found.");
        tip("Run `passvault add <TITLE>` to add one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Title", "Username", "URL", "Updated", "Id"]);

    for c in credentials {
        let login = c.username.as_deref().or(c.email.as_deref());
        table.add_row(vec![
            c.title.clone(),
            or_dash(login),
            or_dash(c.url.as_deref()),
            c.updated_at.format(TIME_FORMAT).to_string(),
            c.id.to_string(),
        ]);
    }

    println!("{table}");
}

/// Print every non-secret field of one credential.
pub fn print_credential_details(c: &Credential) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["Title".to_string(), c.title.clone()]);
    table.add_row(vec!["Id".to_string(), c.id.to_string()]);
    table.add_row(vec!["URL".to_string(), or_dash(c.url.as_deref())]);
    table.add_row(vec!["Username".to_string(), or_dash(c.username.as_deref())]);
    table.add_row(vec!["Email".to_string(), or_dash(c.email.as_deref())]);
    table.add_row(vec!["Notes".to_string(), or_dash(c.notes.as_deref())]);
    table.add_row(vec![
        "Created".to_string(),
        c.created_at.format(TIME_FORMAT).to_string(),
    ]);
    table.add_row(vec![
        "Updated".to_string(),
        c.updated_at.format(TIME_FORMAT).to_string(),
    ]);

    println!("{table}");
}

/// Print health findings, one row per affected credential.
pub fn print_health_table(findings: &[HealthFinding]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Title", "Issues", "Id"]);

    for finding in findings {
        let issues: Vec<String> = finding.issues.iter().map(describe_issue).collect();
        table.add_row(vec![
            finding.title.clone(),
            issues.join(", "),
            finding.id.to_string(),
        ]);
    }

    println!("{table}");
}

fn describe_issue(issue: &HealthIssue) -> String {
    match issue {
        HealthIssue::Weak { score } => style(format!("weak ({score}/100)")).yellow().to_string(),
        HealthIssue::Reused { times } => style(format!("reused {times}x")).magenta().to_string(),
        HealthIssue::Breached => style("breached").red().to_string(),
    }
}
