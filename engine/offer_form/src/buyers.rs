//! # Buyers
//!
//! The ordered buyer list and the operations over it.
//!
//! Buyers have no stable identity: they are addressed by position, and
//! removing one shifts every later index down. Callers that remember an
//! "active" buyer must take the index returned by [`BuyerCollection::remove`].
//!
//! The collection is never empty. The rule is enforced on every path that can
//! produce a collection: construction, removal, and deserialization (an empty
//! `buyers` array in a draft is rejected).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FormError, Result};
use crate::stroke::Signature;
use crate::types::is_filled;

/// One purchasing party: an individual or a legal entity.
///
/// Both variants' fields are always present; `is_entity` selects which set is
/// required. Toggling never clears the inactive set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    #[serde(default)]
    pub is_entity: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub entity_name: String,
    #[serde(default)]
    pub abn: String,
    #[serde(default)]
    pub acn: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub signature: Signature,
    pub signature_date: NaiveDate,
}

/// Editable text fields of a [`Buyer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuyerField {
    FirstName,
    MiddleName,
    Surname,
    EntityName,
    Abn,
    Acn,
    Email,
    Phone,
    Address,
}

impl BuyerField {
    /// Wire name, also used inside buyer-scoped error keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::MiddleName => "middleName",
            Self::Surname => "surname",
            Self::EntityName => "entityName",
            Self::Abn => "abn",
            Self::Acn => "acn",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
        }
    }

    /// Human label used in validation messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::MiddleName => "Middle Name",
            Self::Surname => "Surname",
            Self::EntityName => "Entity Name",
            Self::Abn => "ABN",
            Self::Acn => "ACN",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Address => "Address",
        }
    }
}

/// Error-map key for a buyer-scoped field, e.g. `buyer1_email`.
pub fn buyer_error_key(index: usize, field: &str) -> String {
    format!("buyer{index}_{field}")
}

impl Buyer {
    /// An empty individual buyer whose signature date is `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            is_entity: false,
            first_name: String::new(),
            middle_name: String::new(),
            surname: String::new(),
            entity_name: String::new(),
            abn: String::new(),
            acn: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            signature: Signature::default(),
            signature_date: today,
        }
    }

    pub fn field(&self, field: BuyerField) -> &str {
        match field {
            BuyerField::FirstName => &self.first_name,
            BuyerField::MiddleName => &self.middle_name,
            BuyerField::Surname => &self.surname,
            BuyerField::EntityName => &self.entity_name,
            BuyerField::Abn => &self.abn,
            BuyerField::Acn => &self.acn,
            BuyerField::Email => &self.email,
            BuyerField::Phone => &self.phone,
            BuyerField::Address => &self.address,
        }
    }

    fn field_mut(&mut self, field: BuyerField) -> &mut String {
        match field {
            BuyerField::FirstName => &mut self.first_name,
            BuyerField::MiddleName => &mut self.middle_name,
            BuyerField::Surname => &mut self.surname,
            BuyerField::EntityName => &mut self.entity_name,
            BuyerField::Abn => &mut self.abn,
            BuyerField::Acn => &mut self.acn,
            BuyerField::Email => &mut self.email,
            BuyerField::Phone => &mut self.phone,
            BuyerField::Address => &mut self.address,
        }
    }

    /// Name fields required by the active variant.
    pub fn name_fields(&self) -> &'static [BuyerField] {
        if self.is_entity {
            &[BuyerField::EntityName, BuyerField::Abn, BuyerField::Acn]
        } else {
            &[BuyerField::FirstName, BuyerField::Surname]
        }
    }

    /// Contact fields required regardless of variant.
    pub fn contact_fields() -> &'static [BuyerField] {
        &[BuyerField::Email, BuyerField::Phone, BuyerField::Address]
    }

    pub fn is_filled(&self, field: BuyerField) -> bool {
        is_filled(self.field(field))
    }

    /// Whether the buyer is identifiable for the stepper: an entity name, or
    /// both first name and surname.
    pub fn has_name(&self) -> bool {
        if self.is_entity {
            self.is_filled(BuyerField::EntityName)
        } else {
            self.is_filled(BuyerField::FirstName) && self.is_filled(BuyerField::Surname)
        }
    }

    pub fn has_contact(&self) -> bool {
        Self::contact_fields().iter().all(|f| self.is_filled(*f))
    }

    pub fn has_signature(&self) -> bool {
        self.signature.is_captured()
    }
}

/// Ordered, never-empty list of buyers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Buyer>", into = "Vec<Buyer>")]
pub struct BuyerCollection(Vec<Buyer>);

impl TryFrom<Vec<Buyer>> for BuyerCollection {
    type Error = FormError;

    fn try_from(buyers: Vec<Buyer>) -> Result<Self> {
        if buyers.is_empty() {
            return Err(FormError::InvariantViolation(
                "an offer must have at least one buyer".to_string(),
            ));
        }
        Ok(Self(buyers))
    }
}

impl From<BuyerCollection> for Vec<Buyer> {
    fn from(collection: BuyerCollection) -> Self {
        collection.0
    }
}

impl BuyerCollection {
    /// A collection holding one empty buyer.
    pub fn new(today: NaiveDate) -> Self {
        Self(vec![Buyer::new(today)])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Buyer> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Buyer] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Result<&Buyer> {
        let len = self.0.len();
        self.0
            .get(index)
            .ok_or(FormError::BuyerOutOfRange { index, len })
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Result<&mut Buyer> {
        let len = self.0.len();
        self.0
            .get_mut(index)
            .ok_or(FormError::BuyerOutOfRange { index, len })
    }

    /// Append an empty buyer and return its index.
    pub fn add(&mut self, today: NaiveDate) -> usize {
        self.0.push(Buyer::new(today));
        self.0.len() - 1
    }

    /// Remove the buyer at `index`.
    ///
    /// Returns the index an "active buyer" cursor should move to,
    /// `max(0, index - 1)`. Removing the last remaining buyer is refused.
    pub fn remove(&mut self, index: usize) -> Result<usize> {
        if self.0.len() == 1 {
            return Err(FormError::InvariantViolation(
                "You must have at least one buyer.".to_string(),
            ));
        }
        let len = self.0.len();
        if index >= len {
            return Err(FormError::BuyerOutOfRange { index, len });
        }
        self.0.remove(index);
        Ok(index.saturating_sub(1))
    }

    /// Replace one text field of one buyer. Returns whether the value changed.
    pub fn update_field(&mut self, index: usize, field: BuyerField, value: String) -> Result<bool> {
        let slot = self.get_mut(index)?.field_mut(field);
        if *slot == value {
            return Ok(false);
        }
        *slot = value;
        Ok(true)
    }

    /// Flip between individual and entity. Inactive fields are kept.
    pub fn toggle_entity(&mut self, index: usize) -> Result<bool> {
        let buyer = self.get_mut(index)?;
        buyer.is_entity = !buyer.is_entity;
        Ok(buyer.is_entity)
    }

    pub fn set_signature_date(&mut self, index: usize, date: NaiveDate) -> Result<bool> {
        let buyer = self.get_mut(index)?;
        if buyer.signature_date == date {
            return Ok(false);
        }
        buyer.signature_date = date;
        Ok(true)
    }
}

impl<'a> IntoIterator for &'a BuyerCollection {
    type Item = &'a Buyer;
    type IntoIter = std::slice::Iter<'a, Buyer>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
