use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::status::CampaignStatus;
use crate::audience::WaterwayType;
use crate::context::{Role, UserId};
use crate::pricing::DesignOption;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusivityId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MailPieceType {
    #[serde(rename = "postcard_4x6")]
    Postcard4x6,
    #[serde(rename = "postcard_6x9")]
    Postcard6x9,
    #[serde(rename = "letter_8.5x11")]
    Letter,
    #[serde(rename = "brochure")]
    Brochure,
}

impl MailPieceType {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Postcard4x6,
            Self::Postcard6x9,
            Self::Letter,
            Self::Brochure,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Postcard4x6 => "postcard_4x6",
            Self::Postcard6x9 => "postcard_6x9",
            Self::Letter => "letter_8.5x11",
            Self::Brochure => "brochure",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Postcard4x6 => "4x6 Postcard",
            Self::Postcard6x9 => "6x9 Postcard",
            Self::Letter => "8.5x11 Letter",
            Self::Brochure => "Brochure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mail piece type '{0}'")]
pub struct UnknownMailPieceType(pub String);

impl FromStr for MailPieceType {
    type Err = UnknownMailPieceType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownMailPieceType(value.to_string()))
    }
}

/// A customer's mail campaign as stored by the backing data service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub user_id: UserId,
    pub name: String,
    pub mail_piece_type: MailPieceType,
    pub quantity: u64,
    pub status: CampaignStatus,
    pub county: String,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub zips: Vec<String>,
    #[serde(default)]
    pub waterway: WaterwayType,
    pub design_option: DesignOption,
    #[serde(default)]
    pub mail_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Refunded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub campaign_id: CampaignId,
    pub amount: f64,
    pub status: OrderStatus,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl Profile {
    /// Company name first, then the person's name.
    pub fn display_name(&self) -> &str {
        self.company_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                self.full_name
                    .as_deref()
                    .filter(|name| !name.trim().is_empty())
            })
            .unwrap_or("Unknown")
    }
}

/// Territory a customer holds exclusive rights to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "territory_type",
    content = "territory_value",
    rename_all = "snake_case"
)]
pub enum Territory {
    ZipCodes(Vec<String>),
    City(String),
    County(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementType {
    AnnualCommitment,
    OneTimePremium,
}

impl FromStr for AgreementType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "annual_commitment" => Ok(Self::AnnualCommitment),
            "one_time_premium" => Ok(Self::OneTimePremium),
            other => Err(format!("unknown agreement type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusivityStatus {
    Active,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusivityRecord {
    pub id: ExclusivityId,
    pub user_id: UserId,
    pub industry_category: String,
    pub territory: Territory,
    pub agreement_type: AgreementType,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub premium_paid: Option<f64>,
    pub status: ExclusivityStatus,
}

/// Validated exclusivity agreement awaiting an id from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ExclusivityGrant {
    pub user_id: UserId,
    pub industry_category: String,
    pub territory: Territory,
    pub agreement_type: AgreementType,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub premium_paid: Option<f64>,
}

impl ExclusivityGrant {
    /// New grants always start active.
    pub fn into_record(self, id: ExclusivityId) -> ExclusivityRecord {
        ExclusivityRecord {
            id,
            user_id: self.user_id,
            industry_category: self.industry_category,
            territory: self.territory,
            agreement_type: self.agreement_type,
            start_date: self.start_date,
            end_date: self.end_date,
            premium_paid: self.premium_paid,
            status: ExclusivityStatus::Active,
        }
    }
}
