//! breathlight CLI — drive the shared indicator LED from the command line.

use clap::Parser;

mod cli;

#[derive(Parser)]
#[command(
    name = "breathlight",
    version,
    about = "Control the shared breathing/notification LED"
)]
struct Args {
    /// Output as JSON (for status, config)
    #[arg(long, global = true)]
    json: bool,

    /// Override the sysfs root for this invocation
    #[arg(long, global = true, value_name = "PATH")]
    root: Option<String>,

    #[command(subcommand)]
    command: cli::Command,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let args = Args::parse();

    if let Err(e) = cli::run(args.command, args.json, args.root) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
