mod cli;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, Account, Daemon, File, Health, Init, Picture, Version};

command_enum! {
    (Account, Account),
    (Daemon, Daemon),
    (File, File),
    (Health, Health),
    (Init, Init),
    (Picture, Picture),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // explicit flag > config api_port > default port
    let remote = cli::op::resolve_remote(args.remote, args.config_path.clone());

    let ctx = match cli::op::OpContext::new(remote, args.config_path) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: Failed to create API client: {}", e);
            std::process::exit(1);
        }
    };

    match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
