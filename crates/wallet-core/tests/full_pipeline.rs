//! Cross-crate integration tests exercising the full pipeline:
//! derive accounts -> query ledger -> plan transfer -> decode instructions.
//!
//! These tests use only the public API of wallet_core and chain_sol, with an
//! in-memory ledger standing in for the JSON-RPC node.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::watch;

use chain_sol::{
    derive_associated_token_address, to_display, to_raw, AccountState, Address, DecimalAmount,
    LedgerAmount, ProgramId, TokenAccount, TokenInstruction, ASSOCIATED_TOKEN_PROGRAM_ID,
    SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
use wallet_core::*;

const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC6G4wEGGkZwyTDt1v";
const USDC_DECIMALS: u8 = 6;

/// Ledger state keyed by base58 address. Replies use the node's
/// `{context, value}` wrapper and the legacy bare-base58 `data` form for every
/// account, including 165-byte token records a live node would refuse to
/// encode as base58.
#[derive(Default)]
struct InMemoryLedger {
    accounts: Mutex<HashMap<String, Value>>,
    requests: Mutex<u64>,
}

impl InMemoryLedger {
    fn insert_lamports(&self, address: &Address, lamports: u64) {
        self.insert(address, &SYSTEM_PROGRAM_ID, &[], lamports);
    }

    fn insert_token_account(&self, address: &Address, owner: &Address, mint: &Address, amount: u64) {
        let record = TokenAccount {
            mint: *mint,
            owner: *owner,
            amount: LedgerAmount::new(amount),
            delegate: None,
            state: AccountState::Initialized,
            is_native: None,
            delegated_amount: LedgerAmount::ZERO,
            close_authority: None,
        };
        self.insert(address, &TOKEN_PROGRAM_ID, &record.pack(), 2_039_280);
    }

    fn insert(&self, address: &Address, program: &Address, data: &[u8], lamports: u64) {
        self.accounts.lock().unwrap().insert(
            address.to_string(),
            json!({
                "lamports": lamports,
                "owner": program.to_string(),
                "data": bs58::encode(data).into_string(),
                "executable": false,
                "rentEpoch": 0
            }),
        );
    }

    fn request_count(&self) -> u64 {
        *self.requests.lock().unwrap()
    }
}

#[async_trait]
impl RpcTransport for InMemoryLedger {
    async fn send(&self, body: String) -> Result<String, WalletError> {
        *self.requests.lock().unwrap() += 1;
        let request: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(request["method"], "getAccountInfo");
        let address = request["params"][0].as_str().unwrap();
        let value = self
            .accounts
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .unwrap_or(Value::Null);
        Ok(json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "result": {"context": {"slot": 250_000_000u64}, "value": value}
        })
        .to_string())
    }
}

fn setup() -> (Arc<InMemoryLedger>, LedgerAccountReader) {
    let ledger = Arc::new(InMemoryLedger::default());
    let config = LedgerConfig::localnet().with_request_id(42);
    let reader = LedgerAccountReader::new(ledger.clone(), &config);
    (ledger, reader)
}

fn wallet(byte: u8) -> Address {
    Address::new([byte; 32])
}

// ─── Transfer to a fresh recipient ─────────────────────────────────

#[tokio::test]
async fn transfer_to_new_recipient_creates_then_transfers() {
    let (ledger, reader) = setup();
    let mint: Address = USDC_MINT.parse().unwrap();
    let alice = wallet(0xA1);
    let bob = wallet(0xB0);

    let alice_ata = derive_associated_token_address(&alice, &mint).unwrap();
    let bob_ata = derive_associated_token_address(&bob, &mint).unwrap();
    ledger.insert_token_account(&alice_ata, &alice, &mint, 10_000_000);

    // 1. The user types "2.5"; normalize to base units
    let typed: DecimalAmount = "2.5".parse().unwrap();
    let amount = to_raw(typed, USDC_DECIMALS).unwrap();
    assert_eq!(amount, LedgerAmount::new(2_500_000));

    // 2. Plan
    let planner = TransferPlanner::new(reader);
    let plan = planner
        .plan(&TransferRequest {
            from_owner: alice,
            to_owner: bob,
            mint,
            payer: alice,
            amount,
        })
        .await
        .unwrap();
    assert_eq!(ledger.request_count(), 2);

    // 3. Inspect instructions
    assert_eq!(plan.source_account(), &alice_ata);
    assert_eq!(plan.destination_account(), &bob_ata);
    let ixs = plan.into_instructions();
    assert_eq!(ixs.len(), 2);

    let create = &ixs[0];
    assert_eq!(create.program_id, ASSOCIATED_TOKEN_PROGRAM_ID);
    assert!(create.data.is_empty());
    let addrs: Vec<Address> = create.accounts.iter().map(|m| m.address).collect();
    assert_eq!(
        addrs,
        vec![alice, bob_ata, bob, mint, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID]
    );
    assert_eq!(create.signers().collect::<Vec<_>>(), vec![&alice]);

    let transfer = &ixs[1];
    assert!(transfer.is_for(ProgramId::Token));
    assert_eq!(
        TokenInstruction::decode(transfer).unwrap(),
        TokenInstruction::Transfer { amount }
    );
    assert_eq!(transfer.accounts[0].address, alice_ata);
    assert_eq!(transfer.accounts[1].address, bob_ata);
    assert_eq!(transfer.accounts[2].address, alice);

    // 4. Display
    assert_eq!(to_display(amount, USDC_DECIMALS).unwrap().to_string(), "2.500000");
}

#[tokio::test]
async fn transfer_between_funded_wallets_is_single_instruction() {
    let (ledger, reader) = setup();
    let mint: Address = USDC_MINT.parse().unwrap();
    let alice = wallet(0xA1);
    let bob = wallet(0xB0);
    for owner in [alice, bob] {
        let ata = derive_associated_token_address(&owner, &mint).unwrap();
        ledger.insert_token_account(&ata, &owner, &mint, 1);
    }

    let plan = TransferPlanner::new(reader)
        .plan(&TransferRequest {
            from_owner: alice,
            to_owner: bob,
            mint,
            payer: alice,
            amount: LedgerAmount::new(1),
        })
        .await
        .unwrap();
    assert_eq!(plan.instructions().len(), 1);
    assert_eq!(plan.instructions()[0].data.len(), 9);
}

#[tokio::test]
async fn cancelled_before_start_never_touches_ledger() {
    let (ledger, reader) = setup();
    let (_tx, rx) = watch::channel(true);

    let result = TransferPlanner::new(reader)
        .plan_with_shutdown(
            &TransferRequest {
                from_owner: wallet(1),
                to_owner: wallet(2),
                mint: USDC_MINT.parse().unwrap(),
                payer: wallet(1),
                amount: LedgerAmount::new(5),
            },
            rx,
        )
        .await;
    assert!(matches!(result, Err(WalletError::Cancelled)));
    assert_eq!(ledger.request_count(), 0);
}

// ─── Balances ──────────────────────────────────────────────────────

#[tokio::test]
async fn balances_report_display_amounts() {
    let (ledger, reader) = setup();
    let mint: Address = USDC_MINT.parse().unwrap();
    let alice = wallet(0xA1);
    let alice_ata = derive_associated_token_address(&alice, &mint).unwrap();
    ledger.insert_token_account(&alice_ata, &alice, &mint, 10_000_000);
    ledger.insert_lamports(&alice, 2_000_000_000);

    let usdc = token_balance(&reader, &alice, &mint, USDC_DECIMALS).await.unwrap();
    assert_eq!(usdc.display.to_string(), "10.000000");

    let (lamports, sol) = native_balance(&reader, &alice).await.unwrap();
    assert_eq!(lamports, LedgerAmount::new(2_000_000_000));
    assert_eq!(sol.to_string(), "2.000000000");

    let record = reader.read_token_account(&alice_ata).await.unwrap();
    assert_eq!(record.owner, alice);
    assert_eq!(record.mint, mint);
}

#[tokio::test]
async fn missing_accounts_read_as_zero_or_not_found() {
    let (_ledger, reader) = setup();
    let mint: Address = USDC_MINT.parse().unwrap();
    let nobody = wallet(0xEE);
    let ata = derive_associated_token_address(&nobody, &mint).unwrap();

    assert!(!reader.exists(&ata).await.unwrap());
    assert!(matches!(
        reader.read_token_balance(&ata).await,
        Err(WalletError::AccountNotFound(_))
    ));
    let balance = token_balance(&reader, &nobody, &mint, USDC_DECIMALS).await.unwrap();
    assert!(balance.raw.is_zero());
}

// ─── Config ────────────────────────────────────────────────────────

#[test]
fn http_reader_rejects_invalid_config() {
    let config = LedgerConfig::custom("ftp://example.com");
    assert!(matches!(
        LedgerAccountReader::connect(&config),
        Err(WalletError::Config(_))
    ));
}
