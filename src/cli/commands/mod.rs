//! One module per `passvault` subcommand.

pub mod add;
pub mod audit_cmd;
pub mod completions;
pub mod delete;
pub mod edit;
pub mod export;
pub mod generate;
pub mod get;
pub mod health;
pub mod init;
pub mod list;
pub mod passwd;
pub mod reset;
pub mod version;
