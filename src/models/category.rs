use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::errors::AuthorizationError;

/// Spending bucket holding its own balance inside an account record.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Food,
    Meal,
    Cash
}

/// First match wins, anything not listed falls back to [`Category::Cash`].
static MCC_TABLE: &[(&[&str], Category)] = &[
    (&["5411", "5412"], Category::Food),
    (&["5811", "5812"], Category::Meal)
];

impl Category {
    pub const ALL: [Category; 3] = [Category::Food, Category::Meal, Category::Cash];

    /// Field name of this category inside an account record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "FOOD",
            Category::Meal => "MEAL",
            Category::Cash => "CASH"
        }
    }

    /// Looks the code up in the MCC table, `None` when it is not listed.
    pub fn lookup(mcc: &str) -> Option<Category> {
        MCC_TABLE.iter()
            .find(|(codes, _)| codes.iter().any(|code| *code == mcc))
            .map(|(_, category)| *category)
    }

    /// Total mapping from MCC to category. Never fails.
    pub fn resolve(mcc: &str) -> Category {
        Self::lookup(mcc).unwrap_or(Category::Cash)
    }
}

impl Display for Category {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("Unknown category [{0}]")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Category::ALL.into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownCategory(value.to_string()))
    }
}

/// How codes missing from the MCC table are treated.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum MccPolicy {
    /// Unknown codes resolve to [`Category::Cash`].
    #[default]
    Fallback,
    /// Unknown codes are rejected with [`AuthorizationError::InvalidCategory`].
    Strict
}

impl MccPolicy {
    pub fn resolve(&self, mcc: &str) -> Result<Category, AuthorizationError> {
        match self {
            MccPolicy::Fallback => Ok(Category::resolve(mcc)),
            MccPolicy::Strict => Category::lookup(mcc)
                .ok_or_else(|| AuthorizationError::InvalidCategory { mcc: mcc.to_string() })
        }
    }
}

impl FromStr for MccPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "fallback" => Ok(MccPolicy::Fallback),
            "strict" => Ok(MccPolicy::Strict),
            other => Err(format!("Invalid MCC policy '{other}', expected 'fallback' or 'strict'"))
        }
    }
}
