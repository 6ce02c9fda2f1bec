use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout used by wallet clustering timeline events.
pub const TIMELINE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The nine analyses served by the dashboard API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyticsKind {
    TransactionFlow,
    Anomaly,
    Ownership,
    SellOff,
    VolumeBracket,
    BotVolume,
    PostRug,
    WalletClustering,
    DashboardSummary,
}

impl AnalyticsKind {
    pub const ALL: [AnalyticsKind; 9] = [
        AnalyticsKind::TransactionFlow,
        AnalyticsKind::Anomaly,
        AnalyticsKind::Ownership,
        AnalyticsKind::SellOff,
        AnalyticsKind::VolumeBracket,
        AnalyticsKind::BotVolume,
        AnalyticsKind::PostRug,
        AnalyticsKind::WalletClustering,
        AnalyticsKind::DashboardSummary,
    ];

    /// Route path serving this analysis.
    pub fn path(&self) -> &'static str {
        match self {
            AnalyticsKind::TransactionFlow => "/api/transaction-flow",
            AnalyticsKind::Anomaly => "/api/anomaly-data",
            AnalyticsKind::Ownership => "/api/ownership-data",
            AnalyticsKind::SellOff => "/api/sell-off-data",
            AnalyticsKind::VolumeBracket => "/api/volume-bracket-data",
            AnalyticsKind::BotVolume => "/api/bot-volume-data",
            AnalyticsKind::PostRug => "/api/post-rug-data",
            AnalyticsKind::WalletClustering => "/api/wallet-clustering-data",
            AnalyticsKind::DashboardSummary => "/api/dashboard-summary",
        }
    }
}

impl std::fmt::Display for AnalyticsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyticsKind::TransactionFlow => write!(f, "transaction_flow"),
            AnalyticsKind::Anomaly => write!(f, "anomaly"),
            AnalyticsKind::Ownership => write!(f, "ownership"),
            AnalyticsKind::SellOff => write!(f, "sell_off"),
            AnalyticsKind::VolumeBracket => write!(f, "volume_bracket"),
            AnalyticsKind::BotVolume => write!(f, "bot_volume"),
            AnalyticsKind::PostRug => write!(f, "post_rug"),
            AnalyticsKind::WalletClustering => write!(f, "wallet_clustering"),
            AnalyticsKind::DashboardSummary => write!(f, "dashboard_summary"),
        }
    }
}

// ============================================================
// Graph payloads
// ============================================================

/// Role of a node in the clustering view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Cluster,
    Wallet,
}

/// Graph vertex: a wallet, an exchange or a cluster of wallets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub size: i64,
    /// Hex color, e.g. `#82e0aa`
    pub color: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    /// Id of the cluster node this wallet belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
}

impl Node {
    pub fn new(id: &str, label: &str, size: i64, color: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            size,
            color: color.to_string(),
            kind: None,
            cluster: None,
        }
    }

    pub fn cluster(id: &str, label: &str, size: i64, color: &str) -> Self {
        Self {
            kind: Some(NodeKind::Cluster),
            ..Self::new(id, label, size, color)
        }
    }

    pub fn member(id: &str, label: &str, size: i64, color: &str, cluster: &str) -> Self {
        Self {
            kind: Some(NodeKind::Wallet),
            cluster: Some(cluster.to_string()),
            ..Self::new(id, label, size, color)
        }
    }
}

/// Directed weighted edge between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    /// Aggregate transferred amount or transfer count
    pub value: i64,
}

impl Link {
    pub fn new(source: &str, target: &str, value: i64) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            value,
        }
    }
}

/// Links whose source or target is not the id of any node.
fn dangling<'a>(nodes: &[Node], links: &'a [Link]) -> Vec<&'a Link> {
    let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    links
        .iter()
        .filter(|l| !ids.contains(l.source.as_str()) || !ids.contains(l.target.as_str()))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFlowData {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl TransactionFlowData {
    pub fn dangling_links(&self) -> Vec<&Link> {
        dangling(&self.nodes, &self.links)
    }
}

// ============================================================
// Time series payloads
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Spike,
    Drop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub date: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    /// Deviation from the preceding baseline, in percent
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyData {
    pub dates: Vec<String>,
    pub values: Vec<f64>,
    pub anomalies: Vec<Anomaly>,
}

impl AnomalyData {
    /// One value per date, and every anomaly points at a known date.
    pub fn is_consistent(&self) -> bool {
        self.dates.len() == self.values.len()
            && self
                .anomalies
                .iter()
                .all(|a| self.dates.iter().any(|d| *d == a.date))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub id: String,
    pub label: String,
    pub balances: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SellOffData {
    pub dates: Vec<String>,
    pub wallets: Vec<WalletBalance>,
}

impl SellOffData {
    pub fn is_consistent(&self) -> bool {
        self.wallets
            .iter()
            .all(|w| w.balances.len() == self.dates.len())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceData {
    pub dates: Vec<String>,
    pub prices: Vec<f64>,
    pub rug_event: String,
}

impl PriceData {
    pub fn is_consistent(&self) -> bool {
        self.dates.len() == self.prices.len() && self.dates.contains(&self.rug_event)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityData {
    pub dates: Vec<String>,
    pub transactions: Vec<i64>,
    pub rug_event: String,
}

impl ActivityData {
    pub fn is_consistent(&self) -> bool {
        self.dates.len() == self.transactions.len() && self.dates.contains(&self.rug_event)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRugData {
    /// Share of liquidity pulled from the pool, in percent
    pub lp_pull: f64,
    pub price_data: PriceData,
    pub activity_data: ActivityData,
}

impl PostRugData {
    pub fn is_consistent(&self) -> bool {
        self.price_data.is_consistent() && self.activity_data.is_consistent()
    }
}

// ============================================================
// Distribution payloads
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipEntry {
    pub id: String,
    pub label: String,
    /// Share of supply, in percent
    pub value: f64,
}

/// Top holders, serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnershipData(pub Vec<OwnershipEntry>);

impl OwnershipData {
    pub fn total(&self) -> f64 {
        self.0.iter().map(|e| e.value).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeBracket {
    pub bracket: String,
    pub count: i64,
}

/// Volume buckets, smallest bracket first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeBracketData(pub Vec<VolumeBracket>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotVolumeEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BotVolumeData(pub Vec<BotVolumeEntry>);

impl BotVolumeData {
    pub fn total(&self) -> f64 {
        self.0.iter().map(|e| e.value).sum()
    }
}

// ============================================================
// Wallet clustering
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletAction {
    Buy,
    Sell,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEvent {
    pub time: String,
    pub wallet: String,
    pub action: WalletAction,
    /// Receiving wallet; only set for transfers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletClusteringData {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub timeline: Vec<TimeEvent>,
}

impl WalletClusteringData {
    pub fn dangling_links(&self) -> Vec<&Link> {
        dangling(&self.nodes, &self.links)
    }

    /// True when every timestamp parses and the timeline is ascending.
    pub fn timeline_is_ordered(&self) -> bool {
        let parsed: Option<Vec<NaiveDateTime>> = self
            .timeline
            .iter()
            .map(|e| NaiveDateTime::parse_from_str(&e.time, TIMELINE_TIME_FORMAT).ok())
            .collect();

        match parsed {
            Some(times) => times.windows(2).all(|w| w[0] <= w[1]),
            None => false,
        }
    }
}

/// Aggregate snapshot shown on the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_transactions: i64,
    pub transactions_change: f64,
    pub active_wallets: i64,
    pub wallets_change: f64,
    pub suspicious_activity: i64,
    pub suspicious_change: f64,
    pub bot_percentage: f64,
    pub whale_concentration: f64,
    pub anomaly_count: i64,
}
