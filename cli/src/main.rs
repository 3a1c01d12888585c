use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use fuse_wire_compiler::{
    compile_document, generate, read_fuses, write_fuses, CodegenOptions, FuseDocument, FuseError,
    FuseState,
};
use log::debug;

/// Definition file compiled into the binary, used when `--config` is absent.
const DEFAULT_CONFIG: &str = include_str!("../fuses.json5");

#[derive(Parser)]
#[command(name = "fuses")]
#[command(about = "Generate fuse wire sources, or read and flip fuses in a compiled binary", long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
#[command(after_help = "An output path spelled `read` or `write` is taken as a subcommand; pass it as `./read` or `./write`.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output path for the declarations header (e.g. `fuses.h`)
    #[arg(required = true)]
    header: Option<PathBuf>,

    /// Output path for the definitions source (e.g. `fuses.cc`)
    #[arg(required = true)]
    source: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArg,
}

#[derive(Args)]
struct ConfigArg {
    /// Fuse definition file (defaults to the bundled `fuses.json5`)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ConfigArg {
    fn load(&self) -> Result<String, FuseError> {
        match &self.config {
            Some(path) => {
                debug!("reading fuse definitions from {}", path.display());
                Ok(fs::read_to_string(path)?)
            }
            None => Ok(DEFAULT_CONFIG.to_string()),
        }
    }

    fn document(&self) -> Result<FuseDocument, FuseError> {
        let (document, _wire) = compile_document(&self.load()?)?;
        Ok(document)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the fuse states stored in a compiled binary
    Read {
        /// Compiled binary containing a fuse wire
        binary: PathBuf,

        #[command(flatten)]
        config: ConfigArg,
    },

    /// Flip fuses in a compiled binary in place
    Write {
        /// Compiled binary containing a fuse wire
        binary: PathBuf,

        /// Changes as `name=on` or `name=off`
        #[arg(required = true, value_parser = parse_change)]
        fuses: Vec<(String, FuseState)>,

        #[command(flatten)]
        config: ConfigArg,
    },
}

fn parse_change(arg: &str) -> Result<(String, FuseState), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=on|off, got \"{}\"", arg))?;
    let state = match value {
        "on" | "1" | "enabled" => FuseState::Enabled,
        "off" | "0" | "disabled" => FuseState::Disabled,
        other => return Err(format!("invalid fuse state \"{}\", use on or off", other)),
    };
    Ok((name.to_string(), state))
}

fn run(cli: Cli) -> Result<(), FuseError> {
    match cli.command {
        None => {
            let (Some(header), Some(source)) = (cli.header, cli.source) else {
                Cli::command()
                    .error(ErrorKind::MissingRequiredArgument, "<HEADER> and <SOURCE> are required")
                    .exit()
            };
            let config = cli.config.load()?;
            let generated = generate(&config, &header, &source, &CodegenOptions::default())?;
            println!(
                "Generated {} fuses → {}, {}",
                generated.document.fuses.len(),
                header.display(),
                source.display()
            );
            Ok(())
        }

        Some(Commands::Read { binary, config }) => {
            let document = config.document()?;
            let image = fs::read(&binary)?;
            println!("version: {}", document.version);
            for (name, state) in read_fuses(&document, &image)? {
                println!("{}: {}", name, state);
            }
            Ok(())
        }

        Some(Commands::Write { binary, fuses, config }) => {
            let document = config.document()?;
            let mut image = fs::read(&binary)?;
            write_fuses(&document, &mut image, &fuses)?;
            fs::write(&binary, &image)?;
            println!("Updated {} fuses in {}", fuses.len(), binary.display());
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
