use clap::Parser;
use planner::cli::commands::Cli;
use planner::cli::handlers;
use planner::io::config_io;

fn main() {
    let cli = Cli::parse();

    let config = match config_io::read_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level
    let env = env_logger::Env::default().default_filter_or(config.log.level.as_str());
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();

    if let Err(e) = handlers::dispatch(cli, &config) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
