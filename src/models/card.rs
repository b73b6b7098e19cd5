use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use sqlx::FromRow;
use std::fmt;

/// Database identifier of a card
pub type CardId = i64;

/// Rule keys that apply to any category without a specific entry, in lookup order
pub const FALLBACK_KEYS: [&str; 2] = ["All", "All other purchases"];

/// A card row as it comes out of the catalog store
///
/// `reward_rules` is kept as raw JSON text; it is only interpreted when the
/// card is converted into a [`Card`], so one bad row cannot break a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CardRecord {
    pub id: CardId,
    pub name: String,
    pub issuer: Option<String>,
    pub annual_fee: f64,
    pub reward_rules: Option<String>,
    pub benefits: Option<String>,
    pub image_url: Option<String>,
}

/// A card whose reward rules and fee have been validated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub issuer: Option<String>,
    pub annual_fee: f64,
    pub reward_rules: RewardRules,
    pub benefits: Option<String>,
    pub image_url: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum RewardRulesError {
    #[error("reward rules are not a JSON object of rates: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("reward rate for '{category}' must be a finite non-negative number, got {rate}")]
    InvalidRate { category: String, rate: f64 },
}

#[derive(thiserror::Error, Debug)]
pub enum CardError {
    #[error("malformed reward rules: {0}")]
    MalformedRewardRules(#[from] RewardRulesError),

    #[error("annual fee must be a finite non-negative number, got {0}")]
    InvalidAnnualFee(f64),
}

impl TryFrom<CardRecord> for Card {
    type Error = CardError;

    fn try_from(record: CardRecord) -> Result<Self, Self::Error> {
        if !record.annual_fee.is_finite() || record.annual_fee < 0.0 {
            return Err(CardError::InvalidAnnualFee(record.annual_fee));
        }

        let reward_rules = RewardRules::parse(record.reward_rules.as_deref())?;

        Ok(Card {
            id: record.id,
            name: record.name,
            issuer: record.issuer,
            annual_fee: record.annual_fee,
            reward_rules,
            benefits: record.benefits,
            image_url: record.image_url,
        })
    }
}

/// Where a card's rate for a category came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// A rule keyed by the category itself
    Specific,
    /// One of the [`FALLBACK_KEYS`]
    Fallback,
}

/// Ordered mapping of category name to reward rate
///
/// Keys are compared case-insensitively. When two keys differ only by case the
/// first one in document order wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardRules {
    entries: Vec<(String, f64)>,
}

impl RewardRules {
    /// Builds a rule set, rejecting negative or non-finite rates
    pub fn from_entries<I, K>(entries: I) -> Result<Self, RewardRulesError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, rate)| {
                let category = key.into();
                if rate.is_finite() && rate >= 0.0 {
                    Ok((category, rate))
                } else {
                    Err(RewardRulesError::InvalidRate { category, rate })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    /// Parses the stored JSON text; a missing, blank or `null` value is an empty rule set
    pub fn parse(raw: Option<&str>) -> Result<Self, RewardRulesError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(text) => Ok(serde_json::from_str::<Option<Self>>(text)?.unwrap_or_default()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, rate)| (key.as_str(), *rate))
    }

    /// Rate of the rule keyed by `category`, ignoring case
    pub fn specific_rate(&self, category: &str) -> Option<f64> {
        self.lookup(category)
    }

    /// Rate of the first fallback key present, ignoring case
    pub fn fallback_rate(&self) -> Option<f64> {
        FALLBACK_KEYS.iter().find_map(|key| self.lookup(key))
    }

    fn lookup(&self, key: &str) -> Option<f64> {
        let wanted = key.trim().to_lowercase();
        self.entries
            .iter()
            .find(|(candidate, _)| candidate.trim().to_lowercase() == wanted)
            .map(|(_, rate)| *rate)
    }
}

impl Serialize for RewardRules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, rate) in &self.entries {
            map.serialize_entry(key, rate)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RewardRules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RulesVisitor;

        impl<'de> Visitor<'de> for RulesVisitor {
            type Value = Vec<(String, f64)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category names to reward rates")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, f64>()? {
                    entries.push(entry);
                }
                Ok(entries)
            }
        }

        let entries = deserializer.deserialize_map(RulesVisitor)?;
        RewardRules::from_entries(entries).map_err(serde::de::Error::custom)
    }
}
