//! `passvault list` — display credentials in a table.

use crate::cli::output;
use crate::cli::{unlock_vault, Cli, SortField};
use crate::errors::Result;
use crate::vault::{SortKey, SortOrder};

/// Execute the `list` command.
///
/// Without `--sort` the newest update comes first; an explicit field
/// sorts ascending unless `--desc` is given.
pub fn execute(
    cli: &Cli,
    search: Option<&str>,
    sort: Option<SortField>,
    asc: bool,
    desc: bool,
) -> Result<()> {
    let key = sort.map(SortKey::from).unwrap_or_default();
    let order = match (asc, desc) {
        (true, _) => SortOrder::Asc,
        (_, true) => SortOrder::Desc,
        _ if sort.is_some() => SortOrder::Asc,
        _ => SortOrder::default(),
    };

    let mut vault = unlock_vault(cli)?;
    let mut credentials = vault.list_sorted(key, order)?;
    let total = credentials.len();

    if let Some(query) = search {
        let hits: Vec<_> = vault.search(query)?.into_iter().map(|c| c.id).collect();
        credentials.retain(|c| hits.contains(&c.id));
    }
    vault.logout()?;

    match search {
        Some(query) => output::info(&format!(
            "{} of {total} credential(s) match '{query}'",
            credentials.len()
        )),
        None => output::info(&format!("{total} credential(s)")),
    }

    output::print_credentials_table(&credentials);

    Ok(())
}
