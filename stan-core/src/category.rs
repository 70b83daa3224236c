//! User-defined booking categories.
//!
//! A rule matches when its regex matches the item's whole joined info text
//! and the amount lies in `[min_amount, max_amount)`. First match wins.

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

use crate::statement::BookingItem;

static INFO_HYPHENATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z]{2,})-([a-z]{2,})").expect("valid hyphenation regex"));

/// A category rule as written in the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Decimal>,
}

#[derive(Debug, Error)]
#[error("invalid pattern for category '{name}': {source}")]
pub struct CategoryError {
    pub name: String,
    #[source]
    pub source: regex::Error,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    name: String,
    regex: Regex,
    min_amount: Option<Decimal>,
    max_amount: Option<Decimal>,
}

impl CompiledRule {
    fn matches(&self, info: &str, amount: Decimal) -> bool {
        self.regex.is_match(info)
            && self.min_amount.is_none_or(|min| min <= amount)
            && self.max_amount.is_none_or(|max| amount < max)
    }
}

/// Compiled set of category rules
#[derive(Debug, Clone, Default)]
pub struct CategoryMatcher {
    rules: Vec<CompiledRule>,
}

impl CategoryMatcher {
    pub fn new(rules: &[CategoryRule]) -> Result<Self, CategoryError> {
        let rules = rules
            .iter()
            .map(|rule| {
                // Anchor so the pattern has to match the whole info text.
                let regex = Regex::new(&format!("^(?:{})$", rule.pattern)).map_err(|source| {
                    CategoryError {
                        name: rule.name.clone(),
                        source,
                    }
                })?;
                Ok(CompiledRule {
                    name: rule.name.clone(),
                    regex,
                    min_amount: rule.min_amount,
                    max_amount: rule.max_amount,
                })
            })
            .collect::<Result<Vec<_>, CategoryError>>()?;

        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Name of the first category matching `item`, if any
    pub fn find(&self, item: &BookingItem) -> Option<&str> {
        let joined = item.info.concat();
        let info = INFO_HYPHENATION.replace_all(&joined, "$1$2");

        self.rules
            .iter()
            .find(|rule| rule.matches(&info, item.amount))
            .map(|rule| rule.name.as_str())
    }
}
