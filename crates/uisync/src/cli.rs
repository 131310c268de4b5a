//! Clap derive structures for the `uisync` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// uisync -- mirror UISP service status onto MikroTik address lists
#[derive(Debug, Parser)]
#[command(
    name = "uisync",
    version,
    about = "Sync UISP client status to MikroTik firewall address lists",
    long_about = "Reads clients, services, and devices from UISP and keeps the\n\
        clients_active, clients_suspended, and clients_all address lists on a\n\
        MikroTik router (RouterOS v7 REST API) in step with them.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, env = "UISYNC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Accept self-signed TLS certificates on both UISP and the router
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sync now, then again every `sync.interval_minutes` until Ctrl-C
    Run,

    /// Run exactly one sync cycle
    Sync,

    /// Show what a sync would change without touching the router
    #[command(alias = "diff")]
    Plan,

    /// Show the router's current address-list entries
    Lists(ListsArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ListsArgs {
    /// Only show this list (e.g. clients_active)
    #[arg(long, short = 'l')]
    pub list: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,
    /// Print the effective configuration with secrets redacted
    Show,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["uisync", "plan", "-o", "json", "-vv", "-k"])
            .expect("valid arguments");
        assert_eq!(cli.global.output, OutputFormat::Json);
        assert_eq!(cli.global.verbose, 2);
        assert!(cli.global.insecure);
        assert!(matches!(cli.command, Command::Plan));
    }

    #[test]
    fn lists_accepts_filter() {
        let cli = Cli::try_parse_from(["uisync", "lists", "--list", "clients_active"])
            .expect("valid arguments");
        match cli.command {
            Command::Lists(args) => assert_eq!(args.list.as_deref(), Some("clients_active")),
            other => panic!("expected lists, got {other:?}"),
        }
    }
}
