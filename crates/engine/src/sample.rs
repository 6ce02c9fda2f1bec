//! Fixed sample data set served until real analyses are wired in.
//!
//! Output is deterministic and ignores the token address, so repeated
//! requests return byte-identical bodies.

use async_trait::async_trait;

use rugscope_common::error::AppError;
use rugscope_common::types::{
    ActivityData, Anomaly, AnomalyData, AnomalyKind, BotVolumeData, BotVolumeEntry,
    DashboardSummary, Link, Node, OwnershipData, OwnershipEntry, PostRugData, PriceData,
    SellOffData, TimeEvent, TransactionFlowData, VolumeBracket, VolumeBracketData, WalletAction,
    WalletBalance, WalletClusteringData,
};

use crate::producer::Producer;

const RED: &str = "#FF6B6B";
const GREEN: &str = "#82e0aa";
const BLUE: &str = "#aed6f1";
const ORANGE: &str = "#f5cba7";

const WEEK: [&str; 7] = [
    "2023-04-01",
    "2023-04-02",
    "2023-04-03",
    "2023-04-04",
    "2023-04-05",
    "2023-04-06",
    "2023-04-07",
];

const RUG_DATE: &str = "2023-04-05";

fn dates(days: &[&str]) -> Vec<String> {
    days.iter().map(|d| d.to_string()).collect()
}

/// Sample producer for every analysis kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleAnalytics;

pub fn transaction_flow() -> TransactionFlowData {
    TransactionFlowData {
        nodes: vec![
            Node::new("wallet1", "Deployer", 25, RED),
            Node::new("wallet2", "Insider 1", 20, RED),
            Node::new("wallet3", "Early Buyer", 15, GREEN),
            Node::new("wallet4", "Whale", 22, BLUE),
            Node::new("exchange1", "Exchange 1", 30, ORANGE),
        ],
        links: vec![
            Link::new("wallet1", "wallet2", 8),
            Link::new("wallet2", "wallet3", 5),
            Link::new("wallet3", "wallet4", 3),
            Link::new("wallet4", "exchange1", 10),
        ],
    }
}

pub fn anomaly() -> AnomalyData {
    let spike = |date: &str, value: f64, percentage: f64| Anomaly {
        date: date.to_string(),
        value,
        kind: AnomalyKind::Spike,
        percentage,
    };

    AnomalyData {
        dates: dates(&[
            "2023-04-01",
            "2023-04-02",
            "2023-04-03",
            "2023-04-04",
            "2023-04-05",
            "2023-04-06",
            "2023-04-07",
            "2023-04-08",
            "2023-04-09",
            "2023-04-10",
            "2023-04-11",
            "2023-04-12",
        ]),
        values: vec![
            120.0, 125.0, 130.0, 220.0, 190.0, 185.0, 250.0, 280.0, 275.0, 190.0, 350.0, 320.0,
        ],
        anomalies: vec![
            spike("2023-04-04", 220.0, 69.2),
            spike("2023-04-11", 350.0, 84.2),
        ],
    }
}

pub fn ownership() -> OwnershipData {
    let holders = [
        ("wallet1", "Deployer", 25.3),
        ("wallet2", "Insider 1", 18.7),
        ("wallet3", "Whale 1", 12.4),
        ("wallet4", "Whale 2", 8.9),
        ("wallet5", "Whale 3", 6.2),
        ("wallet6", "Whale 4", 4.8),
        ("wallet7", "Whale 5", 3.5),
        ("wallet8", "Whale 6", 2.9),
        ("wallet9", "Whale 7", 2.1),
        ("wallet10", "Whale 8", 1.8),
        ("others", "Others", 13.4),
    ];

    OwnershipData(
        holders
            .iter()
            .map(|(id, label, value)| OwnershipEntry {
                id: id.to_string(),
                label: label.to_string(),
                value: *value,
            })
            .collect(),
    )
}

pub fn sell_off() -> SellOffData {
    let wallet = |id: &str, label: &str, balances: [f64; 7]| WalletBalance {
        id: id.to_string(),
        label: label.to_string(),
        balances: balances.to_vec(),
    };

    SellOffData {
        dates: dates(&WEEK),
        wallets: vec![
            wallet(
                "wallet1",
                "Deployer",
                [1000000.0, 1000000.0, 950000.0, 800000.0, 500000.0, 200000.0, 0.0],
            ),
            wallet(
                "wallet2",
                "Insider 1",
                [800000.0, 800000.0, 800000.0, 750000.0, 600000.0, 300000.0, 100000.0],
            ),
            wallet(
                "wallet3",
                "Whale 1",
                [600000.0, 600000.0, 600000.0, 600000.0, 550000.0, 400000.0, 200000.0],
            ),
            wallet(
                "wallet4",
                "Whale 2",
                [400000.0, 400000.0, 400000.0, 400000.0, 400000.0, 350000.0, 300000.0],
            ),
        ],
    }
}

pub fn volume_bracket() -> VolumeBracketData {
    let brackets = [
        ("$0-$100", 1245),
        ("$100-$500", 842),
        ("$500-$1K", 433),
        ("$1K-$5K", 287),
        ("$5K-$10K", 126),
        ("$10K-$50K", 64),
        ("$50K-$100K", 28),
        ("$100K+", 12),
    ];

    VolumeBracketData(
        brackets
            .iter()
            .map(|(bracket, count)| VolumeBracket {
                bracket: bracket.to_string(),
                count: *count,
            })
            .collect(),
    )
}

pub fn bot_volume() -> BotVolumeData {
    BotVolumeData(vec![
        BotVolumeEntry {
            kind: "Bot Transactions".to_string(),
            value: 42.7,
        },
        BotVolumeEntry {
            kind: "Organic Transactions".to_string(),
            value: 57.3,
        },
    ])
}

pub fn post_rug() -> PostRugData {
    PostRugData {
        lp_pull: 87.5,
        price_data: PriceData {
            dates: dates(&WEEK),
            prices: vec![0.00012, 0.00011, 0.00010, 0.000095, 0.000025, 0.0000032, 0.0000008],
            rug_event: RUG_DATE.to_string(),
        },
        activity_data: ActivityData {
            dates: dates(&WEEK),
            transactions: vec![1245, 1322, 1187, 1402, 1523, 245, 32],
            rug_event: RUG_DATE.to_string(),
        },
    }
}

pub fn wallet_clustering() -> WalletClusteringData {
    let event = |time: &str, wallet: &str, action: WalletAction, target: Option<&str>, amount| {
        TimeEvent {
            time: time.to_string(),
            wallet: wallet.to_string(),
            action,
            target: target.map(str::to_string),
            amount,
        }
    };

    WalletClusteringData {
        nodes: vec![
            Node::cluster("cluster1", "Deployer Group", 25, RED),
            Node::cluster("cluster2", "Market Makers", 20, ORANGE),
            Node::cluster("cluster3", "Regular Traders", 15, BLUE),
            Node::member("wallet1", "Deployer", 10, RED, "cluster1"),
            Node::member("wallet2", "Insider 1", 10, RED, "cluster1"),
            Node::member("wallet3", "Insider 2", 10, RED, "cluster1"),
            Node::member("wallet4", "MM Bot 1", 10, ORANGE, "cluster2"),
            Node::member("wallet5", "MM Bot 2", 10, ORANGE, "cluster2"),
            Node::member("wallet6", "Trader 1", 10, BLUE, "cluster3"),
            Node::member("wallet7", "Trader 2", 10, BLUE, "cluster3"),
        ],
        links: vec![
            Link::new("wallet1", "cluster1", 1),
            Link::new("wallet2", "cluster1", 1),
            Link::new("wallet3", "cluster1", 1),
            Link::new("wallet4", "cluster2", 1),
            Link::new("wallet5", "cluster2", 1),
            Link::new("wallet6", "cluster3", 1),
            Link::new("wallet7", "cluster3", 1),
            Link::new("wallet1", "wallet2", 3),
            Link::new("wallet2", "wallet3", 2),
            Link::new("wallet4", "wallet5", 4),
            Link::new("wallet6", "wallet7", 1),
            Link::new("cluster1", "cluster2", 5),
            Link::new("cluster2", "cluster3", 3),
        ],
        timeline: vec![
            event("2023-04-01 08:23", "wallet1", WalletAction::Buy, None, 50000.0),
            event("2023-04-01 09:45", "wallet2", WalletAction::Buy, None, 75000.0),
            event("2023-04-01 12:12", "wallet4", WalletAction::Buy, None, 120000.0),
            event(
                "2023-04-02 14:30",
                "wallet1",
                WalletAction::Transfer,
                Some("wallet3"),
                25000.0,
            ),
            event(
                "2023-04-02 15:22",
                "wallet4",
                WalletAction::Transfer,
                Some("wallet5"),
                60000.0,
            ),
            event("2023-04-03 10:15", "wallet6", WalletAction::Buy, None, 90000.0),
            event("2023-04-03 11:45", "wallet7", WalletAction::Buy, None, 45000.0),
            event("2023-04-04 09:30", "wallet3", WalletAction::Sell, None, 15000.0),
            event("2023-04-04 16:20", "wallet5", WalletAction::Sell, None, 30000.0),
        ],
    }
}

pub fn dashboard_summary() -> DashboardSummary {
    DashboardSummary {
        total_transactions: 1234,
        transactions_change: 12.5,
        active_wallets: 567,
        wallets_change: 8.3,
        suspicious_activity: 89,
        suspicious_change: -5.2,
        bot_percentage: 42.7,
        whale_concentration: 84.7,
        anomaly_count: 5,
    }
}

macro_rules! sample_producer {
    ($payload:ty, $build:ident) => {
        #[async_trait]
        impl Producer<$payload> for SampleAnalytics {
            async fn produce(&self, _token: &str) -> Result<$payload, AppError> {
                Ok($build())
            }
        }
    };
}

sample_producer!(TransactionFlowData, transaction_flow);
sample_producer!(AnomalyData, anomaly);
sample_producer!(OwnershipData, ownership);
sample_producer!(SellOffData, sell_off);
sample_producer!(VolumeBracketData, volume_bracket);
sample_producer!(BotVolumeData, bot_volume);
sample_producer!(PostRugData, post_rug);
sample_producer!(WalletClusteringData, wallet_clustering);
sample_producer!(DashboardSummary, dashboard_summary);
