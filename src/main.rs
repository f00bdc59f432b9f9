use anyhow::Context;
use clap::{CommandFactory, Parser};
use eva2rinex::cli::{
    args::{Args, Commands},
    commands,
};
use std::process;

fn main() {
    let args = Args::parse();

    // Without a subcommand there is nothing to do; show the usage overview
    let Some(command) = args.get_command() else {
        let mut cmd = Args::command();
        let _ = cmd.print_help();
        process::exit(0);
    };

    match run(command) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    let label = match &command {
        Commands::Convert(convert_args) => format!("converting day {}", convert_args.date),
        Commands::Filename(filename_args) => {
            format!("deriving the file name for {}", filename_args.date)
        }
    };
    commands::run(command).with_context(|| label)?;
    Ok(())
}
