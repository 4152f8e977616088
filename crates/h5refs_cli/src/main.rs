#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "h5refs", about = "HDF5 reference token inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Resolve every token in a dump and print one row per record.
	Describe(cmd::describe::Args),
	/// Resolve a dump and print the joined, truncated descriptions.
	Render(cmd::render::Args),
	/// Resolve a dump and describe a single token.
	Lookup(cmd::lookup::Args),
}

fn main() {
	init_tracing();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> cmd::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Describe(args) => cmd::describe::run(args),
		Commands::Render(args) => cmd::render::run(args),
		Commands::Lookup(args) => cmd::lookup::run(args),
	}
}

fn init_tracing() {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
		.with_writer(std::io::stderr)
		.init();
}
