use clap::{Args, Parser, Subcommand};
use enigma::catalog::Catalog;
use enigma::cli::{
    decrypt_file, encrypt_file, export_setting, generate_key, read_input, show_catalog,
    write_output, CryptOptions, KeyFormat, KeySource,
};
use enigma::enigma::sanitize;
use enigma::error::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Version info from build.rs
const VERSION: &str = env!("ENIGMA_VERSION");
const PROFILE: &str = env!("ENIGMA_PROFILE");
const GIT_HASH: &str = env!("ENIGMA_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} ({})", PROFILE, VERSION, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "enigma")]
#[command(author, about = "Rotor cipher machine emulator", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Directory overriding rotors.yaml, reflectors.yaml and settings.yaml
    #[arg(long, global = true, env = "ENIGMA_CATALOG")]
    catalog: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct CryptArgs {
    /// Key file
    #[arg(long, conflicts_with = "setting", required_unless_present = "setting")]
    key: Option<PathBuf>,

    /// ID group of a catalog setting
    #[arg(long)]
    setting: Option<String>,

    /// Plug board replacing the one of the key, e.g. "AB CD EF"
    #[arg(long, default_value = "")]
    plug_board: String,

    /// Copy non-letters through unchanged instead of grouping the output
    #[arg(long)]
    copy_extra: bool,

    /// Keep lowercase letters lowercase
    #[arg(long)]
    preserve_case: bool,

    /// Rewrite punctuation and drop non-letters before enciphering
    #[arg(long)]
    sanitize: bool,

    /// Input file (stdin if omitted)
    input: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a message
    #[command(alias = "e")]
    Encrypt(CryptArgs),

    /// Decrypt a message
    #[command(alias = "d")]
    Decrypt(CryptArgs),

    /// Print a random key, or the key of a catalog setting
    #[command(alias = "k")]
    Key {
        /// Output format
        #[arg(long, default_value = "yaml", value_parser = parse_format)]
        format: KeyFormat,

        /// ID group of a catalog setting
        #[arg(long)]
        setting: Option<String>,
    },

    /// Rewrite punctuation the historical way and drop everything else
    #[command(alias = "s")]
    Sanitize {
        /// Input file (stdin if omitted)
        input: Option<PathBuf>,
    },

    /// List rotors, reflectors and settings
    #[command(alias = "c")]
    Catalog,
}

fn parse_format(s: &str) -> std::result::Result<KeyFormat, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalog(dir: Option<&PathBuf>) -> Result<Catalog> {
    match dir {
        Some(dir) => Catalog::load_dir(dir),
        None => Catalog::builtin(),
    }
}

fn crypt_options(args: &CryptArgs) -> Result<CryptOptions> {
    let key = match (&args.key, &args.setting) {
        (Some(path), _) => Some(KeySource::Text(std::fs::read_to_string(path)?)),
        (None, Some(id_group)) => Some(KeySource::Setting(id_group.clone())),
        (None, None) => None,
    };

    Ok(CryptOptions {
        key,
        plug_board: args.plug_board.clone(),
        copy_extra: args.copy_extra,
        preserve_case: args.preserve_case,
        sanitize: args.sanitize,
    })
}

fn run(command: Commands, catalog: &Catalog) -> Result<()> {
    match command {
        Commands::Encrypt(args) => {
            let options = crypt_options(&args)?;
            encrypt_file(catalog, args.input.as_deref(), args.output.as_deref(), &options)?;
            Ok(())
        }

        Commands::Decrypt(args) => {
            let options = crypt_options(&args)?;
            decrypt_file(catalog, args.input.as_deref(), args.output.as_deref(), &options)?;
            Ok(())
        }

        Commands::Key { format, setting } => {
            let key = match setting {
                Some(id_group) => export_setting(catalog, &id_group, format)?,
                None => generate_key(catalog, format)?,
            };
            write_output(None, &key)
        }

        Commands::Sanitize { input } => {
            let text = read_input(input.as_deref())?;
            write_output(None, &sanitize(&text))
        }

        Commands::Catalog => {
            print!("{}", show_catalog(catalog)?);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("enigma {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            let _ = Cli::command().print_help();
            println!();
            return ExitCode::SUCCESS;
        }
    };

    init_logging(cli.verbose);

    let result = load_catalog(cli.catalog.as_ref()).and_then(|catalog| run(command, &catalog));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
