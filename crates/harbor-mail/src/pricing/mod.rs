//! Campaign cost quoting.
//!
//! Quotes are pure: a quantity and a design option map to a [`CampaignCost`]
//! with no side effects. Negative quantities are clamped to zero instead of
//! being rejected.

mod currency;
mod router;

pub use currency::{format_count, format_usd, CurrencyPrecision};
pub use router::quote_router;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Price per mailed piece, in dollars.
pub const BASE_RATE: f64 = 1.5;

/// Smallest order the wizard lets a customer submit. Not enforced by the quote itself.
pub const MINIMUM_PIECES: u64 = 2_000;

/// Orders at or above this volume get design work for free.
pub const FREE_DESIGN_THRESHOLD: u64 = 5_000;

/// Creative sourcing mode for a mail piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignOption {
    /// Customer uploads finished artwork.
    #[default]
    Own,
    Template,
    Custom,
}

impl DesignOption {
    /// One-time design fee before any volume waiver.
    pub const fn fee(self) -> f64 {
        match self {
            Self::Own => 0.0,
            Self::Template => 250.0,
            Self::Custom => 750.0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Own => "own",
            Self::Template => "template",
            Self::Custom => "custom",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Own => "Upload Your Own",
            Self::Template => "Customize a Template",
            Self::Custom => "Custom Design",
        }
    }
}

impl fmt::Display for DesignOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown design option '{0}' (expected own, template, or custom)")]
pub struct UnknownDesignOption(pub String);

impl FromStr for DesignOption {
    type Err = UnknownDesignOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "own" => Ok(Self::Own),
            "template" => Ok(Self::Template),
            "custom" => Ok(Self::Custom),
            other => Err(UnknownDesignOption(other.to_string())),
        }
    }
}

/// Cost breakdown for a quoted campaign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignCost {
    pub subtotal: f64,
    pub design_fee: f64,
    pub total: f64,
    pub per_piece: f64,
    pub free_design: bool,
}

impl CampaignCost {
    /// Formatted amounts for receipts and summary tables.
    pub fn display(&self) -> CostDisplay {
        CostDisplay {
            subtotal: format_usd(self.subtotal, CurrencyPrecision::Cents),
            design_fee: format_usd(self.design_fee, CurrencyPrecision::Cents),
            total: format_usd(self.total, CurrencyPrecision::Cents),
            per_piece: format_usd(self.per_piece, CurrencyPrecision::Cents),
            total_rounded: format_usd(self.total, CurrencyPrecision::Whole),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostDisplay {
    pub subtotal: String,
    pub design_fee: String,
    pub total: String,
    pub per_piece: String,
    pub total_rounded: String,
}

/// Quote a campaign of `quantity` pieces using the given design option.
pub fn calculate_campaign_cost(quantity: i64, design_option: DesignOption) -> CampaignCost {
    let effective_qty = quantity.max(0) as u64;
    let subtotal = effective_qty as f64 * BASE_RATE;
    let free_design = effective_qty >= FREE_DESIGN_THRESHOLD;
    let design_fee = if free_design { 0.0 } else { design_option.fee() };
    let total = subtotal + design_fee;
    let per_piece = if effective_qty > 0 {
        total / effective_qty as f64
    } else {
        0.0
    };

    tracing::debug!(quantity, %design_option, total, free_design, "quoted campaign");

    CampaignCost {
        subtotal,
        design_fee,
        total,
        per_piece,
        free_design,
    }
}

/// Whether an audience is large enough to be ordered.
pub fn meets_minimum(audience_count: u64) -> bool {
    audience_count >= MINIMUM_PIECES
}
