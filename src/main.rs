//! Vault Engine CLI Application
//!
//! A command-line interface for driving the vault custody engine. Every
//! mutating command takes a `--caller` identity; authenticating that
//! identity is the embedding environment's job, not the engine's.

use bitvault::cli::{self, AppState};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vault")]
#[command(version = "0.1.0")]
#[command(about = "A share-weighted multi-signature Bitcoin vault custody engine", long_about = None)]
struct Cli {
    /// Data directory for vault state storage
    #[arg(short, long, default_value = ".vault_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new vault
    Init {
        /// Caller identity (becomes the vault initiator)
        #[arg(long)]
        caller: String,

        /// Vault name
        #[arg(short, long)]
        name: String,

        /// Base threshold in basis points (0-10000)
        #[arg(short, long)]
        threshold: u16,

        /// Signatory share pairs, e.g. alice:3000 (repeatable)
        #[arg(short, long = "signatory")]
        signatories: Vec<String>,

        /// Authorized withdrawal initiators (repeatable)
        #[arg(short, long = "authorize")]
        authorized: Vec<String>,

        /// Timelock stages as unix-timestamp:threshold pairs (max 3)
        #[arg(long = "timelock")]
        timelocks: Vec<String>,
    },

    /// Re-weight existing signatories of a draft vault
    Edit {
        /// Caller identity (must be the initiator)
        #[arg(long)]
        caller: String,

        /// Vault id
        #[arg(short, long)]
        vault: u64,

        /// Signatory share pairs, e.g. alice:5000 (repeatable)
        #[arg(short, long = "signatory")]
        signatories: Vec<String>,
    },

    /// Register the caller's Bitcoin public key on a draft vault
    Approve {
        /// Caller identity (must be a signatory)
        #[arg(long)]
        caller: String,

        /// Vault id
        #[arg(short, long)]
        vault: u64,

        /// Hex-encoded 32-byte public key
        #[arg(short, long)]
        pubkey: String,
    },

    /// Finalize a draft vault, freezing signatories and pubkeys
    Finalize {
        /// Caller identity (must be the initiator)
        #[arg(long)]
        caller: String,

        /// Vault id
        #[arg(short, long)]
        vault: u64,
    },

    /// Add authorized withdrawal initiators
    Authorize {
        /// Caller identity (must be the initiator)
        #[arg(long)]
        caller: String,

        /// Vault id
        #[arg(short, long)]
        vault: u64,

        /// Addresses to authorize (repeatable)
        #[arg(short, long = "address")]
        addresses: Vec<String>,
    },

    /// Initiate a withdrawal proposal
    Withdraw {
        /// Caller identity (signatory or authorized address)
        #[arg(long)]
        caller: String,

        /// Vault id
        #[arg(short, long)]
        vault: u64,

        /// Hex-encoded 35-byte destination script
        #[arg(short, long)]
        script: String,

        /// Amount in satoshis
        #[arg(short, long)]
        amount: u64,

        /// Fee in satoshis
        #[arg(short, long)]
        fee: u64,
    },

    /// Submit the caller's signature list for a proposal
    Sign {
        /// Caller identity (must be a signatory)
        #[arg(long)]
        caller: String,

        /// Vault id
        #[arg(short, long)]
        vault: u64,

        /// Proposal id
        #[arg(short, long)]
        proposal: u64,

        /// Hex-encoded 65-byte signatures (repeatable)
        #[arg(long = "sig")]
        sigs: Vec<String>,
    },

    /// Display one vault
    Show {
        /// Vault id
        #[arg(short, long)]
        vault: u64,
    },

    /// Display one withdrawal proposal
    Proposal {
        /// Vault id
        #[arg(short, long)]
        vault: u64,

        /// Proposal id
        #[arg(short, long)]
        proposal: u64,
    },

    /// List all vaults
    List,

    /// Display the pending event journal
    Events,

    /// Export engine state to a file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import engine state from a file
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut state = AppState::new(cli.data_dir.clone())?;

    match cli.command {
        Commands::Init {
            caller,
            name,
            threshold,
            signatories,
            authorized,
            timelocks,
        } => {
            cli::cmd_init(
                &mut state,
                &caller,
                &name,
                threshold,
                &signatories,
                &authorized,
                &timelocks,
            )?;
        }

        Commands::Edit {
            caller,
            vault,
            signatories,
        } => {
            cli::cmd_edit(&mut state, &caller, vault, &signatories)?;
        }

        Commands::Approve {
            caller,
            vault,
            pubkey,
        } => {
            cli::cmd_approve(&mut state, &caller, vault, &pubkey)?;
        }

        Commands::Finalize { caller, vault } => {
            cli::cmd_finalize(&mut state, &caller, vault)?;
        }

        Commands::Authorize {
            caller,
            vault,
            addresses,
        } => {
            cli::cmd_authorize(&mut state, &caller, vault, &addresses)?;
        }

        Commands::Withdraw {
            caller,
            vault,
            script,
            amount,
            fee,
        } => {
            cli::cmd_withdraw(&mut state, &caller, vault, &script, amount, fee)?;
        }

        Commands::Sign {
            caller,
            vault,
            proposal,
            sigs,
        } => {
            cli::cmd_sign(&mut state, &caller, vault, proposal, &sigs)?;
        }

        Commands::Show { vault } => {
            cli::cmd_show(&state, vault)?;
        }

        Commands::Proposal { vault, proposal } => {
            cli::cmd_proposal(&state, vault, proposal)?;
        }

        Commands::List => {
            cli::cmd_list(&state)?;
        }

        Commands::Events => {
            cli::cmd_events(&state)?;
        }

        Commands::Export { output } => {
            cli::cmd_export(&state, &output)?;
        }

        Commands::Import { input } => {
            cli::cmd_import(&mut state, &input)?;
        }
    }

    Ok(())
}
