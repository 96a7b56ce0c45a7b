use clap::Parser;
use md5crypt::{AttackConfig, Dictionary, DictionaryAttack, InvalidRecordPolicy, ShadowFile};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Dictionary attack against MD5-crypt ($1$) shadow entries.
#[derive(Parser)]
#[command(name = "crack")]
#[command(about = "Dictionary attack against MD5-crypt ($1$) shadow entries")]
struct Cli {
    /// Candidate passwords, one per line
    dictionary: PathBuf,

    /// Credential records, `username:$1$salt$hash` per line
    shadow: PathBuf,

    /// Worker threads (defaults to one per core)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Hash on the current thread only
    #[arg(long)]
    sequential: bool,

    /// Warn about malformed shadow lines instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    /// More log output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> md5crypt::Result<()> {
    let dictionary = Dictionary::load(&cli.dictionary)?;

    let policy = if cli.skip_invalid {
        InvalidRecordPolicy::Skip
    } else {
        InvalidRecordPolicy::Abort
    };
    let shadow = ShadowFile::load(&cli.shadow, policy)?;

    let mut config = AttackConfig::new().parallel(!cli.sequential);
    if let Some(jobs) = cli.jobs {
        config = config.jobs(jobs);
    }

    let attack = DictionaryAttack::new(&dictionary, config)?;
    for record in &shadow.records {
        for found in attack.crack_record(record)? {
            println!("{found}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
