use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "storefront",
    about = "Storefront — product and order document API",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Insert the starter products if the catalog is empty
    Seed(ConfigArgs),
    /// Report store availability and configuration presence
    Check(ConfigArgs),
}

#[derive(Args)]
pub struct ConfigArgs {
    /// TOML configuration file; environment variables override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    /// Address to bind, overriding configuration
    #[arg(long)]
    pub bind: Option<String>,
    /// Seed the starter products on startup
    #[arg(long)]
    pub seed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_serve_with_overrides() {
        let cli = Cli::parse_from([
            "storefront", "serve", "--bind", "127.0.0.1:9000", "--seed", "-c", "shop.toml",
        ]);
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.bind.as_deref(), Some("127.0.0.1:9000"));
                assert!(args.seed);
                assert_eq!(args.config.config, Some(PathBuf::from("shop.toml")));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["storefront", "check", "--format", "json", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Command::Check(_)));
    }
}
