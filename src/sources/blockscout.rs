use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::{MAX_TRANSACTIONS, MAX_TRANSFERS_PER_TRANSACTION, RawTransferSource, SourceError};
use crate::http::{HttpClient, HttpError};
use crate::log::mask_address;
use crate::models::{RawTransactionRecord, Transfer};

const TOKEN_TRANSFER_TXS_QUERY: &str = r#"
query TokenTransferTxs($address: AddressHash!, $first: Int!, $transfers: Int!) {
  tokenTransferTxs(addressHash: $address, first: $first) {
    edges {
      node {
        transactionHash
        blockNumber
        timestamp
        gasPrice
        gasUsed
        feeToken
        gatewayFee
        gatewayFeeRecipient
        input
        toAddressHash
        tokenTransfer(first: $transfers) {
          edges {
            node {
              fromAddressHash
              toAddressHash
              fromAccountHash
              toAccountHash
              value
              token
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenTransferTxs {
    token_transfer_txs: Connection<TransferTxNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferTxNode {
    transaction_hash: String,
    block_number: u64,
    timestamp: DateTime<Utc>,
    gas_price: String,
    gas_used: String,
    fee_token: Option<String>,
    gateway_fee: Option<String>,
    gateway_fee_recipient: Option<String>,
    input: Option<String>,
    to_address_hash: Option<String>,
    token_transfer: Connection<Transfer>,
}

impl From<TransferTxNode> for RawTransactionRecord {
    fn from(node: TransferTxNode) -> Self {
        Self {
            transaction_hash: node.transaction_hash,
            block_number: node.block_number,
            timestamp: node.timestamp,
            gas_price: node.gas_price,
            gas_used: node.gas_used,
            fee_token: node.fee_token,
            gateway_fee: node.gateway_fee,
            gateway_fee_recipient: node.gateway_fee_recipient,
            input: node.input.unwrap_or_default(),
            to_address_hash: node.to_address_hash,
            transfers: node
                .token_transfer
                .edges
                .into_iter()
                .take(MAX_TRANSFERS_PER_TRANSACTION)
                .map(|edge| edge.node)
                .collect(),
        }
    }
}

/// Raw-transfer source backed by a Blockscout GraphQL endpoint.
pub struct BlockscoutClient {
    client: HttpClient,
}

impl BlockscoutClient {
    pub fn new(base_url: Url, max_retries: u32, timeout: Duration) -> Result<Self, HttpError> {
        Ok(Self {
            client: HttpClient::with_config(base_url, max_retries, timeout)?,
        })
    }
}

#[async_trait]
impl RawTransferSource for BlockscoutClient {
    async fn fetch(&self, address: &str) -> Result<Vec<RawTransactionRecord>, SourceError> {
        let body = json!({
            "query": TOKEN_TRANSFER_TXS_QUERY,
            "variables": {
                "address": address,
                "first": MAX_TRANSACTIONS,
                "transfers": MAX_TRANSFERS_PER_TRANSACTION,
            },
        });

        let response: GraphQlResponse<TokenTransferTxs> =
            self.client.send_request(Method::POST, "graphql", &[], Some(body)).await?;

        if !response.errors.is_empty() {
            let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
            return Err(SourceError::InvalidPayload(messages.join("; ")));
        }

        let data = response
            .data
            .ok_or_else(|| SourceError::InvalidPayload("response has no data".to_string()))?;

        let records: Vec<RawTransactionRecord> = data
            .token_transfer_txs
            .edges
            .into_iter()
            .take(MAX_TRANSACTIONS)
            .map(|edge| edge.node.into())
            .collect();

        debug!(
            address:% = mask_address(address),
            count = records.len();
            "Fetched token transfer transactions"
        );

        Ok(records)
    }
}
