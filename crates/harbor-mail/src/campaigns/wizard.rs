//! Customer-facing campaign builder.
//!
//! A [`CampaignDraft`] accumulates answers across five steps. Each step has a
//! gate the customer must clear before moving on; a fully cleared draft turns
//! into a [`Campaign`] awaiting admin review.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Campaign, CampaignId, MailPieceType};
use super::status::CampaignStatus;
use crate::audience::{AudienceSelection, SelectionMode, WaterwayType};
use crate::context::UserId;
use crate::pricing::{
    calculate_campaign_cost, meets_minimum, CampaignCost, DesignOption, MINIMUM_PIECES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Basics,
    Audience,
    Design,
    Schedule,
    Checkout,
}

impl WizardStep {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Basics,
            Self::Audience,
            Self::Design,
            Self::Schedule,
            Self::Checkout,
        ]
    }
}

/// Reason a step cannot be left yet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftIncomplete {
    #[error("Campaign name is required")]
    MissingName,
    #[error("Select a mail piece type")]
    MissingMailPieceType,
    #[error("Select a campaign goal")]
    MissingGoal,
    #[error("audience of {count} is below the {minimum} piece minimum")]
    BelowMinimum { count: u64, minimum: u64 },
    #[error("choose a mail date or ASAP")]
    MissingSchedule,
    #[error("terms must be accepted before checkout")]
    TermsNotAccepted,
}

/// Wizard answers as posted by the campaign builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDraft {
    pub name: String,
    #[serde(default)]
    pub mail_piece_type: Option<MailPieceType>,
    #[serde(default)]
    pub campaign_goal: String,
    #[serde(default)]
    pub county: String,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub zips: Vec<String>,
    #[serde(default)]
    pub waterway: WaterwayType,
    #[serde(default)]
    pub audience_count: u64,
    #[serde(default)]
    pub design_option: DesignOption,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub mail_date: Option<NaiveDate>,
    #[serde(default)]
    pub asap: bool,
    #[serde(default)]
    pub terms_accepted: bool,
}

impl CampaignDraft {
    /// Copy the audience picks and the aggregated total into the draft.
    pub fn apply_audience(&mut self, selection: &AudienceSelection, total: u64) {
        self.county = selection.county.clone();
        self.waterway = selection.waterway;
        match selection.mode {
            SelectionMode::City => {
                self.cities = selection.selected_cities.iter().cloned().collect();
                self.zips.clear();
            }
            SelectionMode::Zip => {
                self.zips = selection.selected_zips.iter().cloned().collect();
                self.cities.clear();
            }
        }
        self.audience_count = total;
    }

    pub fn check(&self, step: WizardStep) -> Result<(), DraftIncomplete> {
        match step {
            WizardStep::Basics => {
                if self.name.trim().is_empty() {
                    return Err(DraftIncomplete::MissingName);
                }
                if self.mail_piece_type.is_none() {
                    return Err(DraftIncomplete::MissingMailPieceType);
                }
                if self.campaign_goal.trim().is_empty() {
                    return Err(DraftIncomplete::MissingGoal);
                }
                Ok(())
            }
            WizardStep::Audience if !meets_minimum(self.audience_count) => {
                Err(DraftIncomplete::BelowMinimum {
                    count: self.audience_count,
                    minimum: MINIMUM_PIECES,
                })
            }
            WizardStep::Audience | WizardStep::Design => Ok(()),
            WizardStep::Schedule if !self.asap && self.mail_date.is_none() => {
                Err(DraftIncomplete::MissingSchedule)
            }
            WizardStep::Schedule => Ok(()),
            WizardStep::Checkout if !self.terms_accepted => Err(DraftIncomplete::TermsNotAccepted),
            WizardStep::Checkout => Ok(()),
        }
    }

    /// First step whose gate is still closed, if any.
    pub fn first_incomplete(&self) -> Option<WizardStep> {
        WizardStep::ordered()
            .into_iter()
            .find(|step| self.check(*step).is_err())
    }

    pub fn quote(&self) -> CampaignCost {
        let quantity = i64::try_from(self.audience_count).unwrap_or(i64::MAX);
        calculate_campaign_cost(quantity, self.design_option)
    }

    /// Submit the draft. Campaigns enter the lifecycle awaiting admin review.
    pub fn into_campaign(
        self,
        id: CampaignId,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Campaign, DraftIncomplete> {
        for step in WizardStep::ordered() {
            self.check(step)?;
        }
        let mail_piece_type = self
            .mail_piece_type
            .ok_or(DraftIncomplete::MissingMailPieceType)?;

        Ok(Campaign {
            id,
            user_id,
            name: self.name.trim().to_string(),
            mail_piece_type,
            quantity: self.audience_count,
            status: CampaignStatus::PendingReview,
            county: self.county,
            cities: self.cities,
            zips: self.zips,
            waterway: self.waterway,
            design_option: self.design_option,
            mail_date: if self.asap { None } else { self.mail_date },
            notes: None,
            created_at: now,
            updated_at: now,
        })
    }
}
