/// Core types and enums used throughout the domain layer
///
/// This module defines the fundamental types like Metric, LifeCategory and the
/// entry ID type that are used by DiaryEntry, Analysis and Settings.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};
use chrono::Utc;
use crate::domain::DomainError;

/// Last identifier handed out by `EntryId::new` in this process
static LAST_ENTRY_ID: AtomicI64 = AtomicI64::new(0);

/// Unique identifier for a diary entry
///
/// IDs are derived from the creation time (microseconds since the Unix epoch)
/// so they sort in creation order. Within one process a new ID is always
/// strictly greater than the previous one, even when two entries are created
/// in the same microsecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl EntryId {
    /// Generate a new creation-time-derived entry ID
    pub fn new() -> Self {
        let now = Utc::now().timestamp_micros();
        let mut last = LAST_ENTRY_ID.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match LAST_ENTRY_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => return Self(next),
                Err(current) => last = current,
            }
        }
    }

    /// Parse an entry ID from its decimal string form
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| DomainError::InvalidValue {
                message: format!("Invalid entry id '{}'", s),
            })
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The seven life domains every entry is rated on (1-5)
///
/// Declaration order is significant: it is the display order and the
/// tie-break order used by period insights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Health,
    #[serde(alias = "finance")]
    Money,
    Relationship,
    Growth,
    Rest,
    Hobby,
    Work,
}

impl Metric {
    /// All metrics in declaration order
    pub const ALL: [Metric; 7] = [
        Metric::Health,
        Metric::Money,
        Metric::Relationship,
        Metric::Growth,
        Metric::Rest,
        Metric::Hobby,
        Metric::Work,
    ];

    /// Stable key used in JSON documents and settings
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Health => "health",
            Metric::Money => "money",
            Metric::Relationship => "relationship",
            Metric::Growth => "growth",
            Metric::Rest => "rest",
            Metric::Hobby => "hobby",
            Metric::Work => "work",
        }
    }

    /// Get the display name for this metric
    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::Health => "Health",
            Metric::Money => "Finance",
            Metric::Relationship => "Relationships",
            Metric::Growth => "Growth",
            Metric::Rest => "Rest",
            Metric::Hobby => "Hobby",
            Metric::Work => "Work",
        }
    }

    /// Icon shown next to the metric in exports and tool output
    pub fn icon(&self) -> &'static str {
        match self {
            Metric::Health => "💪",
            Metric::Money => "💰",
            Metric::Relationship => "❤️",
            Metric::Growth => "📈",
            Metric::Rest => "😴",
            Metric::Hobby => "🎨",
            Metric::Work => "💼",
        }
    }
}

impl FromStr for Metric {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "health" => Ok(Metric::Health),
            "money" | "finance" => Ok(Metric::Money),
            "relationship" => Ok(Metric::Relationship),
            "growth" => Ok(Metric::Growth),
            "rest" => Ok(Metric::Rest),
            "hobby" => Ok(Metric::Hobby),
            "work" => Ok(Metric::Work),
            other => Err(DomainError::UnknownTag {
                kind: "metric",
                value: other.to_string(),
            }),
        }
    }
}

/// Life categories detected from entry text by keyword matching
///
/// Declaration order is the tie-break priority when two categories have the
/// same number of keyword hits: the earlier category wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeCategory {
    Finance,
    Health,
    Relationship,
    Work,
    Hobby,
}

impl LifeCategory {
    /// All categories in tie-break priority order
    pub const PRIORITY: [LifeCategory; 5] = [
        LifeCategory::Finance,
        LifeCategory::Health,
        LifeCategory::Relationship,
        LifeCategory::Work,
        LifeCategory::Hobby,
    ];
}

/// Feedback tone selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    /// Friendly and empathetic, like a close friend
    #[default]
    WarmCompanion,
    /// Concrete advice and goals for tomorrow
    GrowthCoach,
    /// Detached, data-oriented observations
    NeutralObserver,
}

impl Personality {
    pub fn key(&self) -> &'static str {
        match self {
            Personality::WarmCompanion => "warm_companion",
            Personality::GrowthCoach => "growth_coach",
            Personality::NeutralObserver => "neutral_observer",
        }
    }
}

impl FromStr for Personality {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warm_companion" => Ok(Personality::WarmCompanion),
            "growth_coach" => Ok(Personality::GrowthCoach),
            "neutral_observer" => Ok(Personality::NeutralObserver),
            other => Err(DomainError::UnknownTag {
                kind: "personality",
                value: other.to_string(),
            }),
        }
    }
}

/// Subscription plan, which gates the remote analysis usage limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Free,
    Pro,
}

impl FromStr for Plan {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Plan::Free),
            "pro" => Ok(Plan::Pro),
            other => Err(DomainError::UnknownTag {
                kind: "plan",
                value: other.to_string(),
            }),
        }
    }
}

/// Weather recorded alongside an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Clear,
    Cloudy,
    Rain,
    Snow,
}

impl Weather {
    pub fn key(&self) -> &'static str {
        match self {
            Weather::Clear => "clear",
            Weather::Cloudy => "cloudy",
            Weather::Rain => "rain",
            Weather::Snow => "snow",
        }
    }
}

impl FromStr for Weather {
    type Err = DomainError;

    /// Accepts English words and the Korean labels used by the mobile client
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clear" | "sunny" | "맑음" => Ok(Weather::Clear),
            "cloudy" | "clouds" | "흐림" => Ok(Weather::Cloudy),
            "rain" | "rainy" | "비" => Ok(Weather::Rain),
            "snow" | "snowy" | "눈" => Ok(Weather::Snow),
            other => Err(DomainError::UnknownTag {
                kind: "weather",
                value: other.to_string(),
            }),
        }
    }
}
