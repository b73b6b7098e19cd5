//! Sample catalog shared by the in-memory store and the seed migration
//! (`migrations/0002_seed.sql` must stay in step with this file).

use crate::models::{CardRecord, Category};

pub const SAMPLE_CATEGORIES: [&str; 5] =
    ["Dining", "Travel", "Groceries", "Gas", "Online Shopping"];

pub fn sample_categories() -> Vec<Category> {
    SAMPLE_CATEGORIES
        .iter()
        .zip(1..)
        .map(|(name, id)| Category {
            id,
            name: name.to_string(),
        })
        .collect()
}

pub fn sample_cards() -> Vec<CardRecord> {
    vec![
        card(
            1,
            "Everyday Cash Back",
            "Northwind Bank",
            0.0,
            r#"{"All": 0.015}"#,
            "No annual fee, 1.5% back everywhere",
        ),
        card(
            2,
            "Dining Plus",
            "Harbor Financial",
            0.0,
            r#"{"Dining": 0.03, "All": 0.01}"#,
            "3% at restaurants, no foreign transaction fees",
        ),
        card(
            3,
            "Voyager Preferred",
            "Summit Card Services",
            95.0,
            r#"{"Travel": 0.05, "Dining": 0.03, "All other purchases": 0.01}"#,
            "Travel insurance, airport lounge passes",
        ),
        card(
            4,
            "Grocery Rewards",
            "Northwind Bank",
            95.0,
            r#"{"Groceries": 0.06, "Gas": 0.03, "All": 0.01}"#,
            "6% at supermarkets up to $6,000 per year",
        ),
        card(
            5,
            "Road Trip Card",
            "Harbor Financial",
            0.0,
            r#"{"Gas": 0.04, "Online Shopping": 0.02}"#,
            "Roadside assistance",
        ),
    ]
}

fn card(
    id: i64,
    name: &str,
    issuer: &str,
    annual_fee: f64,
    reward_rules: &str,
    benefits: &str,
) -> CardRecord {
    CardRecord {
        id,
        name: name.to_string(),
        issuer: Some(issuer.to_string()),
        annual_fee,
        reward_rules: Some(reward_rules.to_string()),
        benefits: Some(benefits.to_string()),
        image_url: Some(format!("/static/cards/{}.png", id)),
    }
}
