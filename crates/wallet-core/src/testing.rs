//! Scripted `RpcTransport` for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use serde_json::{json, Value};
use tokio::sync::Barrier;

use chain_sol::Address;

use crate::error::WalletError;
use crate::rpc::RpcTransport;

enum Script {
    Absent,
    Account(Value),
    Raw(String),
    Unreachable,
    Pending,
}

/// Replies to `getAccountInfo` per address, echoing the request id.
pub(crate) struct ScriptedTransport {
    scripts: HashMap<String, Script>,
    sent: Arc<Mutex<Vec<String>>>,
    barrier: Option<Arc<Barrier>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            sent: Arc::new(Mutex::new(Vec::new())),
            barrier: None,
        }
    }

    pub(crate) fn absent(mut self, address: &Address) -> Self {
        self.scripts.insert(address.to_string(), Script::Absent);
        self
    }

    pub(crate) fn account(
        mut self,
        address: &Address,
        owner: &Address,
        data: &[u8],
        lamports: u64,
    ) -> Self {
        let value = json!({
            "lamports": lamports,
            "owner": owner.to_string(),
            "data": [BASE64_STANDARD.encode(data), "base64"],
            "executable": false,
            "rentEpoch": 0
        });
        self.scripts.insert(address.to_string(), Script::Account(value));
        self
    }

    /// Reply with `body` verbatim.
    pub(crate) fn reply(mut self, address: &Address, body: String) -> Self {
        self.scripts.insert(address.to_string(), Script::Raw(body));
        self
    }

    pub(crate) fn unreachable(mut self, address: &Address) -> Self {
        self.scripts.insert(address.to_string(), Script::Unreachable);
        self
    }

    /// Never answer requests for `address`.
    pub(crate) fn pending(mut self, address: &Address) -> Self {
        self.scripts.insert(address.to_string(), Script::Pending);
        self
    }

    /// Hold every request until `parties` requests are in flight at once.
    pub(crate) fn rendezvous(mut self, parties: usize) -> Self {
        self.barrier = Some(Arc::new(Barrier::new(parties)));
        self
    }

    pub(crate) fn sent_bodies(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.sent)
    }
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn send(&self, body: String) -> Result<String, WalletError> {
        let request: Value = serde_json::from_str(&body).expect("request is JSON");
        let id = request["id"].as_u64().expect("request id");
        let address = request["params"][0].as_str().expect("address param").to_string();
        self.sent.lock().expect("sent lock").push(body);

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }

        let envelope = |value: Value| {
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {"context": {"slot": 1}, "value": value}
            })
            .to_string()
        };

        match self.scripts.get(&address) {
            Some(Script::Absent) => Ok(envelope(Value::Null)),
            Some(Script::Account(value)) => Ok(envelope(value.clone())),
            Some(Script::Raw(body)) => Ok(body.clone()),
            Some(Script::Unreachable) => Err(WalletError::LedgerUnreachable(
                "connection refused".into(),
            )),
            Some(Script::Pending) => std::future::pending().await,
            None => panic!("no script for {address}"),
        }
    }
}
