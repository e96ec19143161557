//! Seeding a new form from an agent link or a property short-link.
//!
//! The lookup itself happens elsewhere; this module only knows the shape of
//! the answer and how it lands in [`FormState`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{is_filled, Agent, FormState};

/// What a slug or short-link lookup resolved to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prefill {
    #[serde(default)]
    pub agent_name: String,
    #[serde(default)]
    pub property_address: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Placeholder text per field key, shown by the UI in empty inputs.
    #[serde(default)]
    pub placeholders: Option<BTreeMap<String, String>>,
}

/// Presentation details that travel with a prefill but are not form data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub logo_url: Option<String>,
    pub placeholders: BTreeMap<String, String>,
}

impl Prefill {
    /// A prefill is active when it names an agent or a property. Draft
    /// restore is skipped for active prefills.
    pub fn is_active(&self) -> bool {
        is_filled(&self.agent_name)
            || self.property_address.as_deref().is_some_and(is_filled)
    }

    pub fn branding(&self) -> Branding {
        Branding {
            logo_url: self.logo_url.clone(),
            placeholders: self.placeholders.clone().unwrap_or_default(),
        }
    }
}

impl FormState {
    /// Seed agent and property from `prefill`.
    ///
    /// Agent details come from `roster_entry` when the roster knows the agent;
    /// otherwise only the name is set. The property address is replaced only
    /// when the prefill carries one.
    pub fn apply_prefill(&mut self, prefill: &Prefill, roster_entry: Option<&Agent>) {
        if is_filled(&prefill.agent_name) {
            self.agent = match roster_entry {
                Some(entry) => Agent {
                    name: prefill.agent_name.clone(),
                    ..entry.clone()
                },
                None => Agent {
                    name: prefill.agent_name.clone(),
                    ..Agent::default()
                },
            };
        }
        if let Some(address) = prefill.property_address.as_deref().filter(|a| is_filled(a)) {
            self.property_address = address.to_string();
        }
    }
}
