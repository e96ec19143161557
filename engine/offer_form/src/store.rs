//! # Form store
//!
//! [`FormStore`] owns one offer's [`FormState`] and is the only way to change
//! it. Every change is a [`FormCommand`] passed to [`FormStore::apply`], so
//! transitions can be replayed and tested without a rendering layer.
//!
//! ## What the store keeps besides the state
//!
//! | Field          | Purpose                                                      |
//! |----------------|--------------------------------------------------------------|
//! | `pads`         | one [`SignaturePad`] per buyer, same index as `state.buyers` |
//! | `active_buyer` | UI focus; recomputed on add/remove                           |
//! | `shown_errors` | errors from the last failed submit, pruned as fields change  |
//! | `revision`     | bumped on every effective mutation; drives autosave          |
//!
//! Progress and validation are never stored; read them through
//! [`crate::progress`] and [`crate::validation`] each time.
//!
//! ## Atomicity
//!
//! Index checks run before anything is touched, so a rejected command leaves
//! the store exactly as it was.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::buyers::{buyer_error_key, BuyerField};
use crate::capture::{Bounds, PadEvent, SignaturePad, SignatureUpdate};
use crate::error::Result;
use crate::money::{deposit_split, format_currency, group_thousands, parse_amount};
use crate::raster::CanvasSize;
use crate::types::{Agent, CoolingOffPeriod, DepositPercent, FlagField, FormState, TextField};
use crate::validation::ValidationErrors;

/// A requested change to the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FormCommand {
    SetText {
        field: TextField,
        value: String,
    },
    SetFlag {
        field: FlagField,
        value: bool,
    },
    SetBalanceDepositPercent {
        percent: DepositPercent,
    },
    SetCoolingOffPeriod {
        period: CoolingOffPeriod,
    },
    /// Choose the selling agent; the entry comes from the agent roster.
    SelectAgent {
        agent: Agent,
    },
    AddBuyer,
    RemoveBuyer {
        index: usize,
    },
    UpdateBuyer {
        index: usize,
        field: BuyerField,
        value: String,
    },
    ToggleEntity {
        index: usize,
    },
    SetSignatureDate {
        index: usize,
        date: NaiveDate,
    },
    SetActiveBuyer {
        index: usize,
    },
    /// Pointer input on a buyer's signature pad.
    Pen {
        buyer: usize,
        event: PadEvent,
        #[serde(default)]
        bounds: Bounds,
    },
    UndoSignature {
        buyer: usize,
    },
    ClearSignature {
        buyer: usize,
    },
    ClearForm,
}

/// Result of a command that was accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Applied {
    /// Whether the form state changed (and the revision advanced).
    pub changed: bool,
    /// Set when the command committed, undid or cleared signature strokes.
    pub signature: Option<SignatureUpdate>,
}

impl Applied {
    fn changed(changed: bool) -> Self {
        Self {
            changed,
            signature: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormStore {
    state: FormState,
    pads: Vec<SignaturePad>,
    canvas_size: CanvasSize,
    active_buyer: usize,
    shown_errors: ValidationErrors,
    revision: u64,
}

impl FormStore {
    /// A blank offer.
    pub fn new(today: NaiveDate, canvas_size: CanvasSize) -> Self {
        Self::from_state(FormState::new(today), canvas_size)
    }

    /// Wrap an existing state (restored draft or prefilled defaults). Pads are
    /// rebuilt from the persisted strokes.
    pub fn from_state(state: FormState, canvas_size: CanvasSize) -> Self {
        let pads = state
            .buyers
            .iter()
            .map(|b| SignaturePad::restore(&b.signature, canvas_size))
            .collect();
        Self {
            state,
            pads,
            canvas_size,
            active_buyer: 0,
            shown_errors: ValidationErrors::new(),
            revision: 0,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn active_buyer(&self) -> usize {
        self.active_buyer
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn shown_errors(&self) -> &ValidationErrors {
        &self.shown_errors
    }

    pub fn pad(&self, buyer: usize) -> Option<&SignaturePad> {
        self.pads.get(buyer)
    }

    pub fn pad_count(&self) -> usize {
        self.pads.len()
    }

    /// Remember the errors of a failed submit so the UI can flag fields.
    pub fn record_errors(&mut self, errors: ValidationErrors) {
        self.shown_errors = errors;
    }

    pub fn apply(&mut self, command: FormCommand, today: NaiveDate) -> Result<Applied> {
        let applied = match command {
            FormCommand::SetText { field, value } => Applied::changed(self.set_text(field, value)),
            FormCommand::SetFlag { field, value } => Applied::changed(self.set_flag(field, value)),
            FormCommand::SetBalanceDepositPercent { percent } => {
                Applied::changed(self.set_balance_deposit_percent(percent))
            }
            FormCommand::SetCoolingOffPeriod { period } => {
                let slot = &mut self.state.conditions.cooling_off_period;
                let changed = *slot != period;
                *slot = period;
                Applied::changed(changed)
            }
            FormCommand::SelectAgent { agent } => Applied::changed(self.select_agent(agent)),
            FormCommand::AddBuyer => {
                self.add_buyer(today);
                Applied::changed(true)
            }
            FormCommand::RemoveBuyer { index } => {
                self.remove_buyer(index)?;
                Applied::changed(true)
            }
            FormCommand::UpdateBuyer {
                index,
                field,
                value,
            } => Applied::changed(self.update_buyer(index, field, value)?),
            FormCommand::ToggleEntity { index } => {
                self.state.buyers.toggle_entity(index)?;
                Applied::changed(true)
            }
            FormCommand::SetSignatureDate { index, date } => {
                Applied::changed(self.state.buyers.set_signature_date(index, date)?)
            }
            FormCommand::SetActiveBuyer { index } => {
                self.state.buyers.get(index)?;
                self.active_buyer = index;
                Applied::changed(false)
            }
            FormCommand::Pen {
                buyer,
                event,
                bounds,
            } => self.pen(buyer, &event, bounds)?,
            FormCommand::UndoSignature { buyer } => self.undo_signature(buyer)?,
            FormCommand::ClearSignature { buyer } => self.clear_signature(buyer)?,
            FormCommand::ClearForm => {
                self.clear_form(today);
                Applied::changed(true)
            }
        };
        if applied.changed {
            self.revision += 1;
        }
        Ok(applied)
    }

    // ─────────────────────────────────────────────────────────
    // Scalar fields
    // ─────────────────────────────────────────────────────────

    fn set_text(&mut self, field: TextField, value: String) -> bool {
        self.shown_errors.remove(field.key());
        if field == TextField::PurchasePrice {
            return self.set_purchase_price(&value);
        }
        let slot = self.state.text_mut(field);
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Format the price and derive both deposits from it.
    fn set_purchase_price(&mut self, input: &str) -> bool {
        let formatted = format_currency(input);
        let percent = self.state.price.balance_deposit_percent.value();
        let (initial, balance) = match parse_amount(&formatted).filter(|p| *p > 0) {
            Some(price) => {
                let split = deposit_split(price, percent);
                (group_thousands(split.initial), group_thousands(split.balance))
            }
            None => (String::new(), String::new()),
        };
        let price = &mut self.state.price;
        let changed = price.purchase_price != formatted
            || price.initial_deposit != initial
            || price.balance_deposit != balance;
        price.purchase_price = formatted;
        price.initial_deposit = initial;
        price.balance_deposit = balance;
        changed
    }

    fn set_balance_deposit_percent(&mut self, percent: DepositPercent) -> bool {
        let price = &mut self.state.price;
        let balance = match parse_amount(&price.purchase_price).filter(|p| *p > 0) {
            Some(amount) => group_thousands(deposit_split(amount, percent.value()).balance),
            None => String::new(),
        };
        let changed = price.balance_deposit_percent != percent || price.balance_deposit != balance;
        price.balance_deposit_percent = percent;
        price.balance_deposit = balance;
        changed
    }

    fn set_flag(&mut self, field: FlagField, value: bool) -> bool {
        let slot = self.state.flag_mut(field);
        let mut changed = *slot != value;
        *slot = value;
        if field == FlagField::SolicitorToBeAdvised && value {
            let solicitor = &mut self.state.solicitor;
            for contact in [
                &mut solicitor.company,
                &mut solicitor.contact,
                &mut solicitor.email,
                &mut solicitor.phone,
            ] {
                changed |= !contact.is_empty();
                contact.clear();
            }
            self.shown_errors.remove(TextField::SolicitorEmail.key());
            self.shown_errors.remove(TextField::SolicitorPhone.key());
        }
        changed
    }

    fn select_agent(&mut self, agent: Agent) -> bool {
        self.shown_errors.remove(TextField::AgentName.key());
        if self.state.agent == agent {
            return false;
        }
        self.state.agent = agent;
        true
    }

    // ─────────────────────────────────────────────────────────
    // Buyers
    // ─────────────────────────────────────────────────────────

    /// Append a buyer and focus it. Returns the new index.
    pub fn add_buyer(&mut self, today: NaiveDate) -> usize {
        let index = self.state.buyers.add(today);
        self.pads.push(SignaturePad::new(self.canvas_size));
        self.active_buyer = index;
        debug!("added buyer {index}");
        index
    }

    /// Remove a buyer and its pad. Returns the new active index.
    pub fn remove_buyer(&mut self, index: usize) -> Result<usize> {
        let active = self.state.buyers.remove(index)?;
        self.pads.remove(index);
        self.active_buyer = active;
        // Buyer-scoped keys no longer line up with positions.
        self.shown_errors.retain(|key, _| !key.starts_with("buyer"));
        debug!("removed buyer {index}, active buyer now {active}");
        Ok(active)
    }

    fn update_buyer(&mut self, index: usize, field: BuyerField, value: String) -> Result<bool> {
        let changed = self.state.buyers.update_field(index, field, value)?;
        self.shown_errors
            .remove(&buyer_error_key(index, field.as_str()));
        Ok(changed)
    }

    // ─────────────────────────────────────────────────────────
    // Signatures
    // ─────────────────────────────────────────────────────────

    fn pen(&mut self, buyer: usize, event: &PadEvent, bounds: Bounds) -> Result<Applied> {
        let signature = &mut self.state.buyers.get_mut(buyer)?.signature;
        let update = self.pads[buyer].handle(event, bounds, signature);
        Ok(self.signature_applied(buyer, update))
    }

    fn undo_signature(&mut self, buyer: usize) -> Result<Applied> {
        let signature = &mut self.state.buyers.get_mut(buyer)?.signature;
        let update = self.pads[buyer].undo(signature);
        Ok(self.signature_applied(buyer, update))
    }

    fn clear_signature(&mut self, buyer: usize) -> Result<Applied> {
        let signature = &mut self.state.buyers.get_mut(buyer)?.signature;
        let changed = !signature.strokes.is_empty() || signature.export.is_some();
        let update = self.pads[buyer].clear(signature);
        Ok(Applied {
            changed,
            signature: Some(update),
        })
    }

    fn signature_applied(&mut self, buyer: usize, update: Option<SignatureUpdate>) -> Applied {
        if matches!(update, Some(SignatureUpdate::Exported(_))) {
            self.shown_errors.remove(&buyer_error_key(buyer, "signature"));
        }
        Applied {
            changed: update.is_some(),
            signature: update,
        }
    }

    // ─────────────────────────────────────────────────────────
    // Reset
    // ─────────────────────────────────────────────────────────

    fn clear_form(&mut self, today: NaiveDate) {
        self.state = FormState::new(today);
        self.pads = vec![SignaturePad::new(self.canvas_size)];
        self.active_buyer = 0;
        self.shown_errors.clear();
        info!("form cleared");
    }
}
