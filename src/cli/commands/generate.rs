//! `passvault generate` — print a random password.

use console::style;

use crate::cli::output;
use crate::cli::copy_to_clipboard;
use crate::config::Settings;
use crate::errors::Result;
use crate::security::{generate_password, strength_score, GeneratorOptions, StrengthLabel};

/// Options as given on the command line.
pub struct GenerateArgs {
    /// `None` falls back to `generator_length` from the config file.
    pub length: Option<usize>,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub copy: bool,
}

/// Execute the `generate` command.
///
/// The password goes to stdout on its own; the strength line goes to
/// stderr so piping stays clean.
pub fn execute(args: &GenerateArgs) -> Result<()> {
    let length = match args.length {
        Some(length) => length,
        None => Settings::load(&std::env::current_dir()?)?.generator_length,
    };

    let options = GeneratorOptions {
        length,
        uppercase: args.uppercase,
        lowercase: args.lowercase,
        digits: args.digits,
        symbols: args.symbols,
    };
    let password = zeroize::Zeroizing::new(generate_password(&options)?);

    let score = strength_score(&password);
    let label = StrengthLabel::from_score(score);

    if args.copy {
        copy_to_clipboard(&password)?;
        output::success("Password copied to clipboard.");
    } else {
        println!("{}", password.as_str());
    }
    eprintln!("{} {label} ({score}/100)", style("Strength:").dim());

    Ok(())
}
