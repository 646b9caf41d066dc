//! # anonvote CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::builder::BoolishValueParser;
use clap::Parser;
use serde::Serialize;

use anonvote_cli::app::{load_index, App, AppOptions};
use anonvote_cli::{eligibility, exit, identity, logging, submit};

/// Anonymous, eligibility-gated voting client.
///
/// Proves membership of a revealed pincode in a region's eligibility list
/// and submits votes and comments through a wallet-bound contract.
#[derive(Parser, Debug)]
#[command(name = "anonvote", version, about)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Eligibility list file (YAML or JSON). Defaults to the built-in list.
    #[arg(long = "eligibility", env = "ANONVOTE_ELIGIBILITY_PATH", global = true)]
    eligibility_path: Option<PathBuf>,

    /// Use the fixture identity-proof provider. The variable accepts
    /// `1`/`0`, `true`/`false`, `yes`/`no` and `on`/`off`.
    #[arg(
        long,
        env = "ANONVOTE_TEST_MODE",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    test_mode: bool,

    /// Nullifier seed requested from the identity-proof provider.
    #[arg(long, env = "ANONVOTE_NULLIFIER_SEED", default_value_t = anonvote_zkp::DEFAULT_NULLIFIER_SEED, global = true)]
    nullifier_seed: u64,

    /// Identity proof produced by an external login.
    #[arg(long, default_value = "anonvote-proof.json", global = true)]
    proof_file: PathBuf,

    /// Submit to an in-memory contract instead of the configured chain.
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print eligibility Merkle roots.
    Root(eligibility::RootArgs),
    /// Print the inclusion proof for a pincode.
    Prove(eligibility::ProveArgs),
    /// Log in and print the revealed profile.
    Login,
    /// Identity proof inspection.
    Proof(identity::ProofArgs),
    /// Cast a vote.
    Vote(submit::VoteArgs),
    /// Post a comment.
    Comment(submit::CommentArgs),
}

impl Cli {
    fn options(&self) -> AppOptions {
        AppOptions {
            eligibility_path: self.eligibility_path.clone(),
            test_mode: self.test_mode,
            nullifier_seed: self.nullifier_seed,
            proof_file: self.proof_file.clone(),
            dry_run: self.dry_run,
        }
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let options = cli.options();
    match &cli.command {
        Commands::Root(args) => {
            let index = load_index(options.eligibility_path.as_deref())?;
            print_json(&eligibility::roots(&index, args)?)
        }
        Commands::Prove(args) => {
            let index = load_index(options.eligibility_path.as_deref())?;
            print_json(&eligibility::prove(&index, args)?)
        }
        Commands::Login => print_json(&identity::login(&options).await?),
        Commands::Proof(args) => match args.command {
            identity::ProofCommand::Show => {
                println!("{}", identity::show(&options).await?);
                Ok(())
            }
        },
        Commands::Vote(args) => {
            let app = App::new(&options)?;
            print_json(&submit::vote(&app, args).await?)
        }
        Commands::Comment(args) => {
            let app = App::new(&options)?;
            print_json(&submit::comment(&app, args).await?)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let category = exit::category_of(&err);
            tracing::error!(
                category = category.map(|c| c.as_str()).unwrap_or("unclassified"),
                "{err:#}"
            );
            let code = u8::try_from(exit::exit_code(&err)).unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
