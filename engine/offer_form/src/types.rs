//! # Types
//!
//! The form aggregate and its field groups.
//!
//! ## Layout
//!
//! [`FormState`] is the single source of truth for one offer. It is grouped
//! the way the offer document reads (agent, property, buyers, solicitor,
//! price, conditions) and serializes in camelCase, which is also the draft
//! layout on disk.
//!
//! Free-text values are plain `String`s. Emptiness is judged after trimming,
//! see [`is_filled`]; money fields additionally need a non-zero amount, see
//! [`crate::money::is_filled_amount`].
//!
//! ## Field addressing
//!
//! Scalar fields are addressed through [`TextField`] and [`FlagField`] so
//! commands, error keys and progress rules all name fields the same way.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::buyers::BuyerCollection;

/// `true` when `value` has visible content.
pub fn is_filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// The selling agent as shown on the offer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Agent {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub title: String,
    /// Reference to the agent's photo (URL or data URI), resolved externally.
    pub photo_ref: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Solicitor {
    pub company: String,
    pub contact: String,
    pub email: String,
    pub phone: String,
    /// Buyer will nominate a solicitor later; contact details not required.
    pub to_be_advised: bool,
}

/// Balance deposit as a percentage of the purchase price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepositPercent {
    #[serde(rename = "5")]
    Five,
    #[default]
    #[serde(rename = "10")]
    Ten,
}

impl DepositPercent {
    pub fn value(self) -> u32 {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Price {
    pub purchase_price: String,
    pub initial_deposit: String,
    pub balance_deposit: String,
    pub balance_deposit_percent: DepositPercent,
    pub balance_deposit_terms: String,
}

/// Statutory cooling-off period in business days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoolingOffPeriod {
    #[default]
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "10")]
    Ten,
}

impl CoolingOffPeriod {
    pub fn days(self) -> u32 {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Conditions {
    pub finance_date: String,
    pub finance_pre_approved: bool,
    pub cooling_off_period: CoolingOffPeriod,
    pub waiver_cooling_off: bool,
    pub inspection_date: String,
    pub settlement_date: String,
    pub special_conditions: String,
}

/// Admin-controlled switches for the optional form sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormFeatures {
    pub show_deposits: bool,
    pub show_finance: bool,
    pub show_building_pest: bool,
}

/// Root aggregate for one offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    #[serde(default)]
    pub agent: Agent,
    #[serde(default)]
    pub property_address: String,
    pub buyers: BuyerCollection,
    #[serde(default)]
    pub solicitor: Solicitor,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub conditions: Conditions,
}

impl FormState {
    /// A blank offer with one empty buyer signed-dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            agent: Agent::default(),
            property_address: String::new(),
            buyers: BuyerCollection::new(today),
            solicitor: Solicitor::default(),
            price: Price::default(),
            conditions: Conditions::default(),
        }
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::AgentName => &self.agent.name,
            TextField::AgentEmail => &self.agent.email,
            TextField::AgentMobile => &self.agent.mobile,
            TextField::AgentTitle => &self.agent.title,
            TextField::AgentPhotoRef => &self.agent.photo_ref,
            TextField::PropertyAddress => &self.property_address,
            TextField::SolicitorCompany => &self.solicitor.company,
            TextField::SolicitorContact => &self.solicitor.contact,
            TextField::SolicitorEmail => &self.solicitor.email,
            TextField::SolicitorPhone => &self.solicitor.phone,
            TextField::PurchasePrice => &self.price.purchase_price,
            TextField::InitialDeposit => &self.price.initial_deposit,
            TextField::BalanceDeposit => &self.price.balance_deposit,
            TextField::BalanceDepositTerms => &self.price.balance_deposit_terms,
            TextField::FinanceDate => &self.conditions.finance_date,
            TextField::InspectionDate => &self.conditions.inspection_date,
            TextField::SettlementDate => &self.conditions.settlement_date,
            TextField::SpecialConditions => &self.conditions.special_conditions,
        }
    }

    pub(crate) fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::AgentName => &mut self.agent.name,
            TextField::AgentEmail => &mut self.agent.email,
            TextField::AgentMobile => &mut self.agent.mobile,
            TextField::AgentTitle => &mut self.agent.title,
            TextField::AgentPhotoRef => &mut self.agent.photo_ref,
            TextField::PropertyAddress => &mut self.property_address,
            TextField::SolicitorCompany => &mut self.solicitor.company,
            TextField::SolicitorContact => &mut self.solicitor.contact,
            TextField::SolicitorEmail => &mut self.solicitor.email,
            TextField::SolicitorPhone => &mut self.solicitor.phone,
            TextField::PurchasePrice => &mut self.price.purchase_price,
            TextField::InitialDeposit => &mut self.price.initial_deposit,
            TextField::BalanceDeposit => &mut self.price.balance_deposit,
            TextField::BalanceDepositTerms => &mut self.price.balance_deposit_terms,
            TextField::FinanceDate => &mut self.conditions.finance_date,
            TextField::InspectionDate => &mut self.conditions.inspection_date,
            TextField::SettlementDate => &mut self.conditions.settlement_date,
            TextField::SpecialConditions => &mut self.conditions.special_conditions,
        }
    }

    pub fn flag(&self, field: FlagField) -> bool {
        match field {
            FlagField::SolicitorToBeAdvised => self.solicitor.to_be_advised,
            FlagField::FinancePreApproved => self.conditions.finance_pre_approved,
            FlagField::WaiverCoolingOff => self.conditions.waiver_cooling_off,
        }
    }

    pub(crate) fn flag_mut(&mut self, field: FlagField) -> &mut bool {
        match field {
            FlagField::SolicitorToBeAdvised => &mut self.solicitor.to_be_advised,
            FlagField::FinancePreApproved => &mut self.conditions.finance_pre_approved,
            FlagField::WaiverCoolingOff => &mut self.conditions.waiver_cooling_off,
        }
    }

    pub fn is_filled(&self, field: TextField) -> bool {
        if field.is_money() {
            crate::money::is_filled_amount(self.text(field))
        } else {
            is_filled(self.text(field))
        }
    }
}

/// Scalar text fields of [`FormState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextField {
    AgentName,
    AgentEmail,
    AgentMobile,
    AgentTitle,
    AgentPhotoRef,
    PropertyAddress,
    SolicitorCompany,
    SolicitorContact,
    SolicitorEmail,
    SolicitorPhone,
    PurchasePrice,
    InitialDeposit,
    BalanceDeposit,
    BalanceDepositTerms,
    FinanceDate,
    InspectionDate,
    SettlementDate,
    SpecialConditions,
}

impl TextField {
    /// Flat key used in error maps.
    pub fn key(&self) -> &'static str {
        match self {
            Self::AgentName => "agentName",
            Self::AgentEmail => "agentEmail",
            Self::AgentMobile => "agentMobile",
            Self::AgentTitle => "agentTitle",
            Self::AgentPhotoRef => "agentPhotoRef",
            Self::PropertyAddress => "propertyAddress",
            Self::SolicitorCompany => "solicitorCompany",
            Self::SolicitorContact => "solicitorContact",
            Self::SolicitorEmail => "solicitorEmail",
            Self::SolicitorPhone => "solicitorPhone",
            Self::PurchasePrice => "purchasePrice",
            Self::InitialDeposit => "initialDeposit",
            Self::BalanceDeposit => "balanceDeposit",
            Self::BalanceDepositTerms => "balanceDepositTerms",
            Self::FinanceDate => "financeDate",
            Self::InspectionDate => "inspectionDate",
            Self::SettlementDate => "settlementDate",
            Self::SpecialConditions => "specialConditions",
        }
    }

    pub fn is_money(&self) -> bool {
        matches!(
            self,
            Self::PurchasePrice | Self::InitialDeposit | Self::BalanceDeposit
        )
    }
}

/// Boolean fields of [`FormState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlagField {
    SolicitorToBeAdvised,
    FinancePreApproved,
    WaiverCoolingOff,
}

impl FlagField {
    pub fn key(&self) -> &'static str {
        match self {
            Self::SolicitorToBeAdvised => "solicitorToBeAdvised",
            Self::FinancePreApproved => "financePreApproved",
            Self::WaiverCoolingOff => "waiverCoolingOff",
        }
    }
}
