//! JSON-RPC boundary to a Solana ledger node.
//!
//! The wallet issues exactly one request shape:
//!
//! ```text
//! {"jsonrpc":"2.0","id":<id>,"method":"getAccountInfo","params":["<base58 address>"]}
//! ```
//!
//! The reply's `result` is `null` for an absent account, the account object
//! itself, or the node's `{"context":{..},"value":<null|account>}` wrapper.
//! Anything that is not a well-formed reply is a transport failure.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use chain_sol::{Address, SolError};

use crate::config::LedgerConfig;
use crate::error::WalletError;

pub const GET_ACCOUNT_INFO: &str = "getAccountInfo";

const JSONRPC_VERSION: &str = "2.0";

/// A JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: Vec<String>,
}

impl RpcRequest {
    pub fn get_account_info(address: &Address, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: GET_ACCOUNT_INFO,
            params: vec![address.to_string()],
        }
    }

    pub fn to_body(&self) -> Result<String, WalletError> {
        serde_json::to_string(self)
            .map_err(|e| WalletError::Internal(format!("request encoding failed: {e}")))
    }
}

/// Carries one serialized JSON-RPC request to a ledger node and returns the
/// raw reply body. Timeouts and connection failures surface as
/// `LedgerUnreachable`; implementations must not retry on their own.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn send(&self, body: String) -> Result<String, WalletError>;
}

/// `reqwest`-backed transport posting to the configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(config: &LedgerConfig) -> Result<Self, WalletError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| WalletError::Config(format!("http client: {e}")))?;
        Ok(Self {
            client,
            url: config.rpc_url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn send(&self, body: String) -> Result<String, WalletError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(WalletError::LedgerUnreachable(format!(
                "HTTP {status} from {}",
                self.url
            )));
        }
        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Reply interpretation
// ---------------------------------------------------------------------------

/// Extract the account object from a `getAccountInfo` reply, or `None` when
/// the ledger reports the account as absent.
pub fn parse_account_reply(body: &str, expected_id: u64) -> Result<Option<Value>, WalletError> {
    let reply: Value = serde_json::from_str(body)
        .map_err(|e| WalletError::LedgerUnreachable(format!("reply is not JSON: {e}")))?;

    let object = reply
        .as_object()
        .ok_or_else(|| WalletError::LedgerUnreachable("reply is not a JSON object".into()))?;

    if let Some(error) = object.get("error") {
        return Err(WalletError::LedgerUnreachable(format!("rpc error: {error}")));
    }

    match object.get("id").and_then(Value::as_u64) {
        Some(id) if id == expected_id => {}
        other => {
            return Err(WalletError::LedgerUnreachable(format!(
                "reply id {other:?} does not match request id {expected_id}"
            )))
        }
    }

    let result = object
        .get("result")
        .ok_or_else(|| WalletError::LedgerUnreachable("reply has no result".into()))?;

    match result {
        Value::Null => Ok(None),
        Value::Object(fields) => match fields.get("value") {
            Some(Value::Null) => Ok(None),
            Some(account @ Value::Object(_)) => Ok(Some(account.clone())),
            Some(other) => Err(WalletError::LedgerUnreachable(format!(
                "unexpected result value: {other}"
            ))),
            None => Ok(Some(result.clone())),
        },
        other => Err(WalletError::LedgerUnreachable(format!(
            "unexpected result: {other}"
        ))),
    }
}

/// A decoded `getAccountInfo` account object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub lamports: u64,
    /// Program that owns the account.
    pub owner: Address,
    pub data: Vec<u8>,
    pub executable: bool,
}

#[derive(Deserialize)]
struct RawAccountInfo {
    lamports: u64,
    owner: String,
    data: RawAccountData,
    #[serde(default)]
    executable: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAccountData {
    /// `["<payload>", "base64"]`
    Encoded(String, String),
    /// Legacy binary form: a bare base58 string.
    Base58(String),
}

impl AccountInfo {
    pub fn from_json(value: &Value) -> Result<Self, SolError> {
        let raw = RawAccountInfo::deserialize(value)
            .map_err(|e| SolError::MalformedAccountData(format!("account object: {e}")))?;

        let data = match raw.data {
            RawAccountData::Encoded(payload, encoding) => decode_payload(&payload, &encoding)?,
            RawAccountData::Base58(payload) => decode_payload(&payload, "base58")?,
        };

        Ok(Self {
            lamports: raw.lamports,
            owner: raw
                .owner
                .parse()
                .map_err(|e| SolError::MalformedAccountData(format!("owner: {e}")))?,
            data,
            executable: raw.executable,
        })
    }
}

fn decode_payload(payload: &str, encoding: &str) -> Result<Vec<u8>, SolError> {
    match encoding {
        "base64" => BASE64_STANDARD
            .decode(payload)
            .map_err(|e| SolError::MalformedAccountData(format!("base64 data: {e}"))),
        "base58" => bs58::decode(payload)
            .into_vec()
            .map_err(|e| SolError::MalformedAccountData(format!("base58 data: {e}"))),
        other => Err(SolError::MalformedAccountData(format!(
            "unsupported data encoding {other}"
        ))),
    }
}
