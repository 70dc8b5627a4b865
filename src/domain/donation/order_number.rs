//! System-generated order numbers.
//!
//! An order number identifies one financial transaction at the gateway. It is
//! built from the creation time plus 48 random bits of a v4 UUID, so concurrent
//! creates never share a value without coordinating through a counter.

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::domain::foundation::Timestamp;

/// Gateway limit on order number length.
pub const MAX_ORDER_NUMBER_LEN: usize = 50;

const RANDOM_HEX_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Generates `{prefix}-{yyyymmddHHMMSS}-{12 hex}`.
    ///
    /// The prefix is truncated so the result stays within the gateway limit.
    pub fn generate(prefix: &str, at: Timestamp) -> Self {
        let random = Uuid::new_v4().simple().to_string();
        let stamp = at.compact();
        let budget = MAX_ORDER_NUMBER_LEN - stamp.len() - RANDOM_HEX_LEN - 2;
        let prefix: String = prefix.chars().take(budget).collect();
        Self(format!("{}-{}-{}", prefix, stamp, &random[..RANDOM_HEX_LEN]))
    }

    /// Wraps an order number read back from storage.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_numbers_carry_prefix() {
        let n = OrderNumber::generate("donation", Timestamp::now());
        assert!(n.as_str().starts_with("donation-"));
    }

    #[test]
    fn generated_numbers_fit_gateway_limit() {
        let long_prefix = "x".repeat(80);
        let n = OrderNumber::generate(&long_prefix, Timestamp::now());
        assert!(n.as_str().len() <= MAX_ORDER_NUMBER_LEN);
    }

    #[test]
    fn same_instant_still_yields_distinct_numbers() {
        let at = Timestamp::now();
        let numbers: HashSet<_> = (0..1_000)
            .map(|_| OrderNumber::generate("donation", at))
            .collect();
        assert_eq!(numbers.len(), 1_000);
    }

    #[tokio::test]
    async fn concurrent_generation_is_collision_free() {
        let at = Timestamp::now();
        let handles: Vec<_> = (0..64)
            .map(|_| {
                tokio::spawn(async move {
                    (0..50)
                        .map(|_| OrderNumber::generate("donation", at))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for n in handle.await.unwrap() {
                assert!(all.insert(n));
            }
        }
        assert_eq!(all.len(), 64 * 50);
    }
}
