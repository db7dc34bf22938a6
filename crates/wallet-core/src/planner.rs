//! SPL token transfer planning.
//!
//! Turns "move `amount` of `mint` from wallet A to wallet B" into the
//! ordered instructions a transaction must carry: a create for each
//! associated token account the ledger does not have yet, then the
//! transfer itself.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use chain_sol::{
    build_create_associated_account, build_transfer, derive_associated_token_address, Address,
    Instruction, LedgerAmount,
};

use crate::error::WalletError;
use crate::reader::LedgerAccountReader;

/// A token transfer between two wallets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from_owner: Address,
    pub to_owner: Address,
    pub mint: Address,
    /// Funds any account creation.
    pub payer: Address,
    pub amount: LedgerAmount,
}

/// Ordered instructions for one transfer. Built fresh per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    source: Address,
    destination: Address,
    instructions: Vec<Instruction>,
}

impl TransferPlan {
    /// Sender's associated token account.
    pub fn source_account(&self) -> &Address {
        &self.source
    }

    /// Recipient's associated token account.
    pub fn destination_account(&self) -> &Address {
        &self.destination
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    /// Number of associated token accounts the plan creates.
    pub fn creates(&self) -> usize {
        self.instructions.len() - 1
    }
}

/// Assemble a plan from derived accounts and their observed existence.
///
/// Creates come first, source before destination; the transfer is always
/// last. When sender and recipient share one associated account it is
/// created at most once.
pub fn assemble_plan(
    request: &TransferRequest,
    source: Address,
    destination: Address,
    source_exists: bool,
    destination_exists: bool,
) -> Result<TransferPlan, WalletError> {
    let mut instructions = Vec::with_capacity(3);

    if !source_exists {
        warn!(account = %source, owner = %request.from_owner, "source token account missing, planning create");
        instructions.push(build_create_associated_account(
            &request.payer,
            &request.from_owner,
            &request.mint,
        )?);
    }
    if !destination_exists && !(destination == source && !source_exists) {
        instructions.push(build_create_associated_account(
            &request.payer,
            &request.to_owner,
            &request.mint,
        )?);
    }
    instructions.push(build_transfer(
        &source,
        &destination,
        &request.from_owner,
        request.amount,
    ));

    Ok(TransferPlan {
        source,
        destination,
        instructions,
    })
}

#[derive(Clone)]
pub struct TransferPlanner {
    reader: LedgerAccountReader,
}

impl TransferPlanner {
    pub fn new(reader: LedgerAccountReader) -> Self {
        Self { reader }
    }

    pub fn reader(&self) -> &LedgerAccountReader {
        &self.reader
    }

    /// Plan a transfer.
    ///
    /// Both existence checks are issued concurrently and joined before any
    /// instruction is built. Either check failing fails the plan; dropping
    /// the returned future cancels both outstanding reads.
    pub async fn plan(&self, request: &TransferRequest) -> Result<TransferPlan, WalletError> {
        let source = derive_associated_token_address(&request.from_owner, &request.mint)?;
        let destination = derive_associated_token_address(&request.to_owner, &request.mint)?;

        let (source_exists, destination_exists) = tokio::try_join!(
            self.reader.exists(&source),
            self.reader.exists(&destination)
        )?;

        let plan = assemble_plan(request, source, destination, source_exists, destination_exists)?;
        debug!(
            source = %source,
            destination = %destination,
            source_exists,
            destination_exists,
            instructions = plan.instructions.len(),
            "transfer planned"
        );
        Ok(plan)
    }

    /// Plan a transfer unless `shutdown` flips to `true` first, in which
    /// case outstanding reads are dropped and `Cancelled` is returned.
    pub async fn plan_with_shutdown(
        &self,
        request: &TransferRequest,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<TransferPlan, WalletError> {
        if *shutdown.borrow() {
            return Err(WalletError::Cancelled);
        }

        tokio::select! {
            plan = self.plan(request) => plan,
            _ = shutdown_requested(&mut shutdown) => {
                debug!(from = %request.from_owner, to = %request.to_owner, "transfer planning cancelled");
                Err(WalletError::Cancelled)
            }
        }
    }
}

/// Resolves once `true` is observed. A dropped sender never cancels.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}
