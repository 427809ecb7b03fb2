use crate::demo::{run_demo, run_recommend, DemoArgs, RecommendArgs};
use crate::server;
use card_match::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Tuition Card Matcher",
    about = "Rank credit cards and split strategies for a tuition payment",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Match a criteria JSON file against the configured or given catalog
    Recommend(RecommendArgs),
    /// Run the matcher against the built-in sample catalog
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Recommend(args) => run_recommend(args),
        Command::Demo(args) => run_demo(args),
    }
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
    fn demo_defaults_apply() {
        let cli = Cli::try_parse_from(["card-match-api", "demo"]).expect("parses");
        match cli.command {
            Some(Command::Demo(args)) => {
                assert_eq!(args.tuition, 25_000.0);
                assert_eq!(args.preference, "flexible");
                assert!(!args.business);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn recommend_requires_criteria_file() {
        assert!(Cli::try_parse_from(["card-match-api", "recommend"]).is_err());
        let cli = Cli::try_parse_from([
            "card-match-api",
            "recommend",
            "--criteria",
            "criteria.json",
            "--catalog",
            "cards.csv",
        ])
        .expect("parses");
        assert!(matches!(cli.command, Some(Command::Recommend(_))));
    }
}
