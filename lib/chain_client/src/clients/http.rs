//! JSON-RPC 2.0 over HTTP chain client.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use feecap_types::TransactionRequest;

use crate::{
    types::{BlockHeader, FeeData, RpcError},
    ChainClient,
};

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcErrorObject>,
}

/// Thin JSON-RPC client speaking to a single HTTP endpoint.
///
/// Issues exactly one request per method call; no batching, retries or
/// response caching.
#[derive(Debug)]
pub struct HttpChainClient {
    url: Url,
    client: reqwest::Client,
    request_id: AtomicU64,
}

impl HttpChainClient {
    pub fn new(url: Url, client: reqwest::Client) -> Self {
        Self {
            url,
            client,
            request_id: AtomicU64::new(0),
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        tracing::trace!(method, id, "sending chain RPC request");
        let response = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<JsonRpcResponse>()
            .await?;
        if let Some(error) = response.error {
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        response
            .result
            .ok_or_else(|| RpcError::Malformed(format!("{method}: response carries no result")))
    }
}

/// Parses a JSON-RPC `QUANTITY`: a hex string with a `0x` prefix.
fn parse_quantity(value: &Value, context: &str) -> Result<u128, RpcError> {
    let text = value.as_str().ok_or_else(|| {
        RpcError::Malformed(format!("{context}: expected a hex string, got {value}"))
    })?;
    let digits = text.strip_prefix("0x").ok_or_else(|| {
        RpcError::Malformed(format!("{context}: quantity without 0x prefix: {text:?}"))
    })?;
    u128::from_str_radix(digits, 16)
        .map_err(|err| RpcError::Malformed(format!("{context}: bad quantity {text:?}: {err}")))
}

fn tx_params(tx: &TransactionRequest) -> Value {
    let mut params = serde_json::Map::new();
    if let Some(from) = &tx.from {
        params.insert("from".into(), Value::from(from.clone()));
    }
    if let Some(to) = &tx.to {
        params.insert("to".into(), Value::from(to.clone()));
    }
    if let Some(value) = tx.value {
        params.insert("value".into(), Value::from(format!("{value:#x}")));
    }
    if let Some(input) = &tx.input {
        params.insert("input".into(), Value::from(input.clone()));
    }
    Value::Object(params)
}

#[async_trait]
impl ChainClient for HttpChainClient {
    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, RpcError> {
        let result = self.call("eth_estimateGas", json!([tx_params(tx)])).await?;
        let gas = parse_quantity(&result, "eth_estimateGas")?;
        u64::try_from(gas).map_err(|_| {
            RpcError::Malformed(format!("eth_estimateGas: gas estimate {gas} exceeds u64"))
        })
    }

    async fn latest_block(&self) -> Result<BlockHeader, RpcError> {
        let result = self
            .call("eth_getBlockByNumber", json!(["latest", false]))
            .await?;
        let number = parse_quantity(&result["number"], "eth_getBlockByNumber.number")?;
        let number = u64::try_from(number).map_err(|_| {
            RpcError::Malformed(format!("eth_getBlockByNumber: block number {number} exceeds u64"))
        })?;
        // Chains that predate the base-fee mechanism omit the field.
        let base_fee_per_gas = match result.get("baseFeePerGas") {
            None | Some(Value::Null) => 0,
            Some(raw) => parse_quantity(raw, "eth_getBlockByNumber.baseFeePerGas")?,
        };
        Ok(BlockHeader {
            number,
            base_fee_per_gas,
        })
    }

    async fn fee_data(&self) -> Result<FeeData, RpcError> {
        let result = self.call("eth_gasPrice", json!([])).await?;
        Ok(FeeData {
            gas_price: parse_quantity(&result, "eth_gasPrice")?,
        })
    }
}
