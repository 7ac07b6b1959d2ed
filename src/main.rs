use clap::Parser;
use pingmon::cli::{handle_completions, handle_config_init, Cli, Commands, ConfigCommands};
use pingmon::oplog::OperationKind;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Watch(args) => pingmon::cli::watch::run_watch(args).await,
        Commands::Query(args) => pingmon::cli::ping::run_ping(&args, OperationKind::Query)
            .await
            .map(|output| println!("{}", output)),
        Commands::Trigger(args) => pingmon::cli::ping::run_ping(&args, OperationKind::Mutation)
            .await
            .map(|output| println!("{}", output)),
        Commands::Next(args) => pingmon::cli::ping::run_ping(&args, OperationKind::Subscription)
            .await
            .map(|output| println!("{}", output)),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
