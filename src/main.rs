use clap::Parser;
use passvault::cli::commands::{add::AddArgs, edit::EditArgs, generate::GenerateArgs};
use passvault::cli::commands::{
    add, audit_cmd, completions, delete, edit, export, generate, get, health, init, list,
    passwd, reset, version,
};
use passvault::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => init::execute(&cli),
        Commands::Add {
            ref title,
            ref url,
            ref username,
            ref email,
            ref notes,
            generate,
        } => add::execute(
            &cli,
            &AddArgs {
                title,
                url: url.as_deref(),
                username: username.as_deref(),
                email: email.as_deref(),
                notes: notes.as_deref(),
                generate,
            },
        ),
        Commands::Get {
            ref query,
            field,
            copy,
        } => get::execute(&cli, query, field, copy),
        Commands::List {
            ref search,
            sort,
            asc,
            desc,
        } => list::execute(&cli, search.as_deref(), sort, asc, desc),
        Commands::Edit {
            ref query,
            ref title,
            ref url,
            ref username,
            ref email,
            ref notes,
            password,
            generate,
        } => edit::execute(
            &cli,
            &EditArgs {
                query,
                title: title.as_deref(),
                url: url.as_deref(),
                username: username.as_deref(),
                email: email.as_deref(),
                notes: notes.as_deref(),
                password,
                generate,
            },
        ),
        Commands::Delete { ref query, force } => delete::execute(&cli, query, force),
        Commands::Passwd => passwd::execute(&cli),
        Commands::Reset { force } => reset::execute(&cli, force),
        Commands::Generate {
            length,
            no_uppercase,
            no_lowercase,
            no_digits,
            no_symbols,
            copy,
        } => generate::execute(&GenerateArgs {
            length,
            uppercase: !no_uppercase,
            lowercase: !no_lowercase,
            digits: !no_digits,
            symbols: !no_symbols,
            copy,
        }),
        Commands::Health => health::execute(&cli),
        Commands::Export {
            ref format,
            ref output,
        } => export::execute(&cli, format, output.as_deref()),
        Commands::Audit { last, ref since } => audit_cmd::execute(&cli, last, since.as_deref()),
        Commands::Completions { shell } => completions::execute(shell),
        Commands::Version => version::execute(),
    };

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
