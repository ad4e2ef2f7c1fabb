//! CLI commands for the vault engine
//!
//! Implements all command handlers for the CLI interface. The caller
//! identity on mutating commands stands in for the authenticated identity
//! an embedding service would supply.

use crate::storage::{Storage, StorageConfig};
use crate::vault::{Pubkey, TimelockThreshold, VaultManager, PUBKEY_LEN};
use crate::withdrawal::WithdrawalRequest;
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub manager: VaultManager,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize application state
    pub fn new(data_dir: PathBuf) -> CliResult<Self> {
        let storage_config = StorageConfig {
            data_dir: data_dir.clone(),
            ..Default::default()
        };

        let storage = Storage::new(storage_config)?;

        let manager = if storage.exists() {
            storage.load()?
        } else {
            let manager = VaultManager::new();
            storage.save(&manager)?;
            manager
        };

        Ok(Self {
            manager,
            storage,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.manager)?;
        Ok(())
    }
}

/// Parse an "identity:share" pair
pub fn parse_share_pair(pair: &str) -> CliResult<(String, u16)> {
    let (identity, share) = pair
        .rsplit_once(':')
        .ok_or_else(|| format!("expected identity:share, got '{}'", pair))?;
    if identity.is_empty() {
        return Err(format!("empty identity in '{}'", pair).into());
    }
    let share: u16 = share
        .parse()
        .map_err(|_| format!("invalid share in '{}'", pair))?;
    Ok((identity.to_string(), share))
}

/// Parse a "timestamp:threshold" timelock stage
pub fn parse_timelock(stage: &str) -> CliResult<TimelockThreshold> {
    let (activation, threshold) = stage
        .split_once(':')
        .ok_or_else(|| format!("expected timestamp:threshold, got '{}'", stage))?;
    Ok(TimelockThreshold {
        activation_at: activation
            .parse()
            .map_err(|_| format!("invalid timestamp in '{}'", stage))?,
        reduced_threshold: threshold
            .parse()
            .map_err(|_| format!("invalid threshold in '{}'", stage))?,
    })
}

/// Parse a hex-encoded 32-byte public key
pub fn parse_pubkey(hex_key: &str) -> CliResult<Pubkey> {
    let bytes = hex::decode(hex_key)?;
    let key: Pubkey = bytes
        .try_into()
        .map_err(|_| format!("public key must be {} bytes", PUBKEY_LEN))?;
    Ok(key)
}

/// Create a new vault
pub fn cmd_init(
    state: &mut AppState,
    caller: &str,
    name: &str,
    threshold: u16,
    signatory_pairs: &[String],
    authorized: &[String],
    timelock_stages: &[String],
) -> CliResult<()> {
    let mut signatories = Vec::new();
    let mut shares = Vec::new();
    for pair in signatory_pairs {
        let (identity, share) = parse_share_pair(pair)?;
        signatories.push(identity);
        shares.push(share);
    }

    let timelocks = timelock_stages
        .iter()
        .map(|stage| parse_timelock(stage))
        .collect::<CliResult<Vec<_>>>()?;

    let vault_id = state.manager.initialize_vault(
        caller,
        name,
        threshold,
        &signatories,
        &shares,
        authorized,
        &timelocks,
    )?;
    state.save()?;

    let vault = state.manager.vault(vault_id)?;
    println!("🏦 Vault {} created", vault_id);
    println!("   ├─ Name: {}", vault.name);
    println!("   ├─ Initiator: {}", vault.initiator);
    println!("   ├─ Threshold: {} bps", vault.threshold);
    println!("   ├─ Signatories: {}", signatories.len());
    println!("   └─ Total share: {} bps", vault.total_share);

    Ok(())
}

/// Re-weight existing signatories
pub fn cmd_edit(
    state: &mut AppState,
    caller: &str,
    vault_id: u64,
    signatory_pairs: &[String],
) -> CliResult<()> {
    let mut signatories = Vec::new();
    let mut shares = Vec::new();
    for pair in signatory_pairs {
        let (identity, share) = parse_share_pair(pair)?;
        signatories.push(identity);
        shares.push(share);
    }

    state
        .manager
        .edit_signatories(caller, vault_id, &signatories, &shares)?;
    state.save()?;

    let vault = state.manager.vault(vault_id)?;
    println!("✏️  Vault {} shares updated", vault_id);
    println!("   └─ Total share: {} bps", vault.total_share);

    Ok(())
}

/// Register the caller's public key
pub fn cmd_approve(
    state: &mut AppState,
    caller: &str,
    vault_id: u64,
    hex_key: &str,
) -> CliResult<()> {
    let pubkey = parse_pubkey(hex_key)?;

    state.manager.approve_signatory(caller, vault_id, pubkey)?;
    state.save()?;

    println!("🔑 Pubkey accepted for {} on vault {}", caller, vault_id);

    Ok(())
}

/// Finalize a draft vault
pub fn cmd_finalize(state: &mut AppState, caller: &str, vault_id: u64) -> CliResult<()> {
    state.manager.finalize_vault(caller, vault_id)?;
    state.save()?;

    println!("🔒 Vault {} finalized", vault_id);
    println!("   Signatory set and pubkeys are now frozen.");

    Ok(())
}

/// Add authorized withdrawal initiators
pub fn cmd_authorize(
    state: &mut AppState,
    caller: &str,
    vault_id: u64,
    addresses: &[String],
) -> CliResult<()> {
    state
        .manager
        .add_authorized_addresses(caller, vault_id, addresses)?;
    state.save()?;

    let all = state.manager.authorized_addresses(vault_id)?;
    println!("✅ Vault {} authorized set updated", vault_id);
    println!("   └─ {} address(es) authorized", all.len());

    Ok(())
}

/// Initiate a withdrawal proposal
pub fn cmd_withdraw(
    state: &mut AppState,
    caller: &str,
    vault_id: u64,
    hex_script: &str,
    amount: u64,
    fee: u64,
) -> CliResult<()> {
    let request = WithdrawalRequest {
        script: hex::decode(hex_script)?,
        amount,
        fee,
    };

    let proposal_id = state
        .manager
        .initiate_withdrawal(caller, vault_id, request)?;
    state.save()?;

    println!(
        "📤 Withdrawal proposal {} created on vault {}",
        proposal_id, vault_id
    );
    println!("   ├─ Amount: {} sat", amount);
    println!("   └─ Fee: {} sat", fee);
    println!(
        "\n   Signatories can now sign with: vault sign --vault {} --proposal {}",
        vault_id, proposal_id
    );

    Ok(())
}

/// Submit the caller's signature list for a proposal
pub fn cmd_sign(
    state: &mut AppState,
    caller: &str,
    vault_id: u64,
    proposal_id: u64,
    hex_sigs: &[String],
) -> CliResult<()> {
    let sigs = hex_sigs
        .iter()
        .map(|sig| hex::decode(sig).map_err(Into::into))
        .collect::<CliResult<Vec<_>>>()?;

    state
        .manager
        .approve_withdrawal(caller, vault_id, proposal_id, sigs)?;
    state.save()?;

    let proposal = state.manager.withdrawal(vault_id, proposal_id)?;
    println!(
        "✍️  Signatures recorded for {} on proposal {}",
        caller, proposal_id
    );
    println!(
        "   └─ {} signatory approval(s) collected",
        proposal.approval_count()
    );

    Ok(())
}

/// Display one vault
pub fn cmd_show(state: &AppState, vault_id: u64) -> CliResult<()> {
    let vault = state.manager.vault(vault_id)?;
    let members = state.manager.vault_members(vault_id)?;
    let authorized = state.manager.authorized_addresses(vault_id)?;
    let timelocks = state.manager.timelocks(vault_id)?;

    println!("🏦 Vault {} ({})", vault_id, vault.name);
    println!("   ├─ Status: {}", vault.status);
    println!("   ├─ Initiator: {}", vault.initiator);
    println!("   ├─ Threshold: {} bps", vault.threshold);
    println!("   └─ Total share: {} bps", vault.total_share);

    println!("\n   Signatories:");
    for member in &members {
        let key = match &member.pubkey {
            Some(key) => hex::encode(key),
            None => "(pending)".to_string(),
        };
        println!(
            "   ├─ {} | {} bps | {}",
            member.signatory, member.share, key
        );
    }

    if !authorized.is_empty() {
        println!("\n   Authorized addresses:");
        for address in &authorized {
            println!("   ├─ {}", address);
        }
    }

    if !timelocks.is_empty() {
        println!("\n   Timelock stages:");
        for stage in timelocks {
            println!(
                "   ├─ at {} -> {} bps",
                stage.activation_at, stage.reduced_threshold
            );
        }
    }

    Ok(())
}

/// Display one withdrawal proposal
pub fn cmd_proposal(state: &AppState, vault_id: u64, proposal_id: u64) -> CliResult<()> {
    let proposal = state.manager.withdrawal(vault_id, proposal_id)?;

    println!("📤 Proposal {} on vault {}", proposal_id, vault_id);
    println!("   ├─ Script: {}", hex::encode(&proposal.script));
    println!("   ├─ Amount: {} sat", proposal.amount);
    println!("   ├─ Fee: {} sat", proposal.fee);
    println!("   ├─ Initiated by: {}", proposal.initiated_by);
    println!("   └─ Approvals: {}", proposal.approval_count());

    Ok(())
}

/// List all vaults
pub fn cmd_list(state: &AppState) -> CliResult<()> {
    let count = state.manager.vault_count();

    if count == 0 {
        println!("📭 No vaults yet. Create one with: vault init");
        return Ok(());
    }

    println!("📋 Vaults:");
    for vault_id in 0..count {
        let vault = state.manager.vault(vault_id)?;
        let members = state.manager.vault_members(vault_id)?;
        println!(
            "   #{} | {} | {} | {} signatories | {} bps",
            vault_id,
            vault.name,
            vault.status,
            members.len(),
            vault.total_share
        );
    }

    Ok(())
}

/// Display the pending event journal
pub fn cmd_events(state: &AppState) -> CliResult<()> {
    let events = state.manager.events();

    if events.is_empty() {
        println!("📭 Event journal is empty");
        return Ok(());
    }

    println!("📜 Pending events:");
    for event in events {
        println!("   ├─ vault {} | {}", event.vault_id(), event.kind());
    }

    Ok(())
}

/// Export engine state to a file
pub fn cmd_export(state: &AppState, output: &Path) -> CliResult<()> {
    crate::storage::save_to_file(&state.manager, output)?;
    println!("📦 State exported to {:?}", output);
    Ok(())
}

/// Import engine state from a file
pub fn cmd_import(state: &mut AppState, input: &Path) -> CliResult<()> {
    state.manager = crate::storage::load_from_file(input)?;
    state.save()?;
    println!("📥 State imported from {:?}", input);
    println!("   └─ {} vault(s)", state.manager.vault_count());
    Ok(())
}
