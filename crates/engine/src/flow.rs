//! Transaction flow graph built from provider transfer records.
//!
//! Nodes are the distinct addresses seen in the transfers touching the
//! token; links aggregate transfers per (from, to) pair.

use std::collections::HashMap;

use async_trait::async_trait;

use rugscope_common::error::AppError;
use rugscope_common::types::{Link, Node, TransactionFlowData};
use rugscope_upstream::{UpstreamClient, UpstreamTransaction};

use crate::producer::Producer;

const TOKEN_COLOR: &str = "#FF6B6B";
const SENDER_COLOR: &str = "#f5cba7";
const RECEIVER_COLOR: &str = "#82e0aa";

/// Smallest rendered node; grows by one per transfer touching the address.
const BASE_NODE_SIZE: i64 = 10;
const MAX_NODE_SIZE: i64 = 30;

/// Live transaction flow producer backed by the upstream client.
#[derive(Clone)]
pub struct UpstreamFlowProducer {
    client: UpstreamClient,
}

impl UpstreamFlowProducer {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Producer<TransactionFlowData> for UpstreamFlowProducer {
    async fn produce(&self, token: &str) -> Result<TransactionFlowData, AppError> {
        let transactions = self.client.transactions(token).await?;

        tracing::debug!(
            token,
            transfers = transactions.len(),
            "Building transaction flow graph"
        );

        Ok(build_flow(token, &transactions))
    }
}

#[derive(Default)]
struct AddressStats {
    sent: i64,
    received: i64,
}

/// Aggregate transfers into a flow graph, keeping first-seen address order.
pub fn build_flow(token: &str, transactions: &[UpstreamTransaction]) -> TransactionFlowData {
    let mut order: Vec<&str> = Vec::new();
    let mut stats: HashMap<&str, AddressStats> = HashMap::new();
    let mut link_order: Vec<(&str, &str)> = Vec::new();
    let mut link_counts: HashMap<(&str, &str), i64> = HashMap::new();

    for tx in transactions {
        let (from, to) = (tx.from.as_str(), tx.to.as_str());
        if from.is_empty() || to.is_empty() {
            continue;
        }

        for address in [from, to] {
            if !stats.contains_key(address) {
                order.push(address);
            }
            stats.entry(address).or_default();
        }
        if let Some(s) = stats.get_mut(from) {
            s.sent += 1;
        }
        if let Some(s) = stats.get_mut(to) {
            s.received += 1;
        }

        let count = link_counts.entry((from, to)).or_insert_with(|| {
            link_order.push((from, to));
            0
        });
        *count += 1;
    }

    let nodes = order
        .iter()
        .map(|address| {
            let s = &stats[address];
            let color = if *address == token {
                TOKEN_COLOR
            } else if s.sent >= s.received {
                SENDER_COLOR
            } else {
                RECEIVER_COLOR
            };
            let size = (BASE_NODE_SIZE + s.sent + s.received).min(MAX_NODE_SIZE);
            Node::new(address, &short_label(address), size, color)
        })
        .collect();

    let links = link_order
        .iter()
        .map(|key| Link::new(key.0, key.1, link_counts[key]))
        .collect();

    TransactionFlowData { nodes, links }
}

/// `AbCdEf…xYz9` style label for long addresses.
fn short_label(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}
