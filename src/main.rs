use anyhow::Result;
use clap::Parser;
use profile_manager::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    // Initialize logging before loading config; the config level is applied
    // later unless --log-level or RUST_LOG already chose one.
    profile_manager::debug::init_log_bridge(cli.log_level.map(|l| l.to_level_filter()));

    log::info!("Starting profile-manager {}", profile_manager::VERSION);

    match cli::run(cli) {
        Ok(code) => {
            log::logger().flush();
            if code == cli::exit::SUCCESS {
                return Ok(());
            }
            std::process::exit(code);
        }
        Err(e) => {
            log::error!("{e:#}");
            log::logger().flush();
            eprintln!("profile-manager: error: {e:#}");
            std::process::exit(cli::exit::FAILURE);
        }
    }
}
