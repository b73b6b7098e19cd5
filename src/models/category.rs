use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A purchase category such as "Dining" or "Gas"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Category {
    /// Case-insensitive comparison against a requested category name
    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_ignores_case_and_padding() {
        let category = Category {
            id: 1,
            name: "Online Shopping".to_string(),
        };
        assert!(category.matches("online shopping"));
        assert!(category.matches("  ONLINE SHOPPING "));
        assert!(!category.matches("shopping"));
    }
}
