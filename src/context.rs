//! The per-request user context and its value types.
//!
//! A [`UserContext`] is built once per request from identity the reverse
//! proxy has already authenticated, then handed to the
//! [`ContextHolder`](crate::ContextHolder). It is never mutated afterwards:
//! fields are private and there are no setters, so every snapshot a caller
//! receives stays exactly as it was when the request began.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::ContextError;

// ── UserId ────────────────────────────────────────────────────────────────────

/// Opaque, non-empty user identifier.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self, ContextError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ContextError::EmptyUserId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── VipLevel ──────────────────────────────────────────────────────────────────

/// Loyalty tier of the shopper.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VipLevel {
    Regular,
    Silver,
    Gold,
    Platinum,
}

impl VipLevel {
    /// Lowercase wire name, as sent in the `x-vip-level` header.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular  => "regular",
            Self::Silver   => "silver",
            Self::Gold     => "gold",
            Self::Platinum => "platinum",
        }
    }
}

/// Case-insensitive; surrounding whitespace is ignored.
impl FromStr for VipLevel {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regular"  => Ok(Self::Regular),
            "silver"   => Ok(Self::Silver),
            "gold"     => Ok(Self::Gold),
            "platinum" => Ok(Self::Platinum),
            _          => Err(ContextError::UnknownVipLevel(s.to_owned())),
        }
    }
}

impl fmt::Display for VipLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Balance ───────────────────────────────────────────────────────────────────

/// Wallet balance: non-negative, at most two decimal places.
///
/// Always stored with exactly two decimal places, so `10.250` and `10.25`
/// are the same balance and both serialize as the string `"10.25"`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Balance(Decimal);

impl Balance {
    pub fn new(amount: Decimal) -> Result<Self, ContextError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ContextError::NegativeBalance(amount));
        }
        let mut amount = amount.normalize();
        if amount.scale() > 2 {
            return Err(ContextError::BalancePrecision(amount));
        }
        amount.rescale(2);
        Ok(Self(amount))
    }

    pub fn amount(&self) -> Decimal { self.0 }
}

impl FromStr for Balance {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim())
            .map_err(|_| ContextError::InvalidBalance(s.to_owned()))?;
        Self::new(amount)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── UserContext ───────────────────────────────────────────────────────────────

/// Immutable snapshot of the user behind the current request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct UserContext {
    user_id: UserId,
    vip_level: VipLevel,
    wallet_balance: Balance,
}

impl UserContext {
    pub fn new(user_id: UserId, vip_level: VipLevel, wallet_balance: Balance) -> Self {
        Self { user_id, vip_level, wallet_balance }
    }

    /// Builds a context from the raw strings a proxy forwards, validating
    /// each field.
    pub fn parse(user_id: &str, vip_level: &str, wallet_balance: &str) -> Result<Self, ContextError> {
        Ok(Self::new(
            UserId::new(user_id)?,
            vip_level.parse()?,
            wallet_balance.parse()?,
        ))
    }

    pub fn user_id(&self) -> &UserId { &self.user_id }
    pub fn vip_level(&self) -> VipLevel { self.vip_level }
    pub fn wallet_balance(&self) -> Balance { self.wallet_balance }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_valid_context() {
        let ctx = UserContext::parse(" u-42 ", "Gold", "12.50").unwrap();

        assert_eq!(ctx.user_id().as_str(), "u-42");
        assert_eq!(ctx.vip_level(), VipLevel::Gold);
        assert_eq!(ctx.wallet_balance().amount(), dec!(12.50));
    }

    #[test]
    fn rejects_blank_user_id() {
        assert_eq!(UserId::new("   "), Err(ContextError::EmptyUserId));
    }

    #[test]
    fn rejects_unknown_vip_level() {
        assert_eq!(
            "diamond".parse::<VipLevel>(),
            Err(ContextError::UnknownVipLevel("diamond".to_owned())),
        );
    }

    #[test]
    fn balance_must_be_non_negative() {
        assert_eq!(
            Balance::new(dec!(-0.01)),
            Err(ContextError::NegativeBalance(dec!(-0.01))),
        );
        assert!(Balance::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn balance_allows_two_decimal_places() {
        assert!("10.25".parse::<Balance>().is_ok());
        assert!("10.250".parse::<Balance>().is_ok());
        assert_eq!(
            "10.255".parse::<Balance>(),
            Err(ContextError::BalancePrecision(dec!(10.255))),
        );
    }

    #[test]
    fn balance_is_stored_with_two_places() {
        let ctx = UserContext::parse("u", "gold", "10.250").unwrap();
        assert_eq!(serde_json::to_value(&ctx).unwrap()["wallet_balance"], "10.25");

        assert_eq!("1".parse::<Balance>().unwrap().to_string(), "1.00");
        assert_eq!("-0.00".parse::<Balance>().unwrap().to_string(), "0.00");
    }

    #[test]
    fn balance_rejects_garbage() {
        assert_eq!(
            "lots".parse::<Balance>(),
            Err(ContextError::InvalidBalance("lots".to_owned())),
        );
    }

    #[test]
    fn serializes_with_lowercase_tier_and_string_balance() {
        let ctx = UserContext::parse("u-1", "platinum", "99.90").unwrap();
        let json = serde_json::to_value(&ctx).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "user_id": "u-1",
                "vip_level": "platinum",
                "wallet_balance": "99.90",
            }),
        );
    }
}
