use serde::{Deserialize, Serialize};

/// Catalog entry for a hatchable animal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    pub id: i64,
    pub name: String,
    /// Scientific name, e.g. "Ailuropoda melanoleuca".
    pub species: String,
    pub rarity: Rarity,
    pub conservation_status: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "common" => Some(Self::Common),
            "rare" => Some(Self::Rare),
            "epic" => Some(Self::Epic),
            "legendary" => Some(Self::Legendary),
            _ => None,
        }
    }
}

/// An animal a user has hatched. Append-only; the same catalog animal can
/// be collected more than once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAnimal {
    pub id: i64,
    pub user_id: i64,
    pub animal_id: i64,
    pub nickname: Option<String>,
    /// Timestamp (ms since epoch).
    pub hatched_at: i64,
}

/// The single egg a user is incubating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Egg {
    pub id: i64,
    pub user_id: i64,
    pub coins_deposited: i64,
    pub coins_required: i64,
    pub animal_id: Option<i64>,
    pub created_at: i64,
}

/// Read-model for the egg screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EggStatus {
    pub coins_deposited: i64,
    pub coins_required: i64,
    /// 0-100, capped.
    pub progress_percent: f64,
    /// Rarity tease, e.g. "A legendary animal awaits..."
    pub animal_hint: Option<String>,
}

/// Result of a threshold hatch attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HatchOutcome {
    pub success: bool,
    pub animal: Option<Animal>,
    pub message: String,
}
