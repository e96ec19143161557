//! Application configuration loaded from environment variables.

use std::time::Duration;

use offer_form::raster::MAX_CANVAS_SIDE;
use offer_form::{CanvasSize, FormFeatures, Prefill};

use crate::errors::{Result, ServerError};

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// Key the draft is stored under
    pub draft_key: String,
    /// Quiet period after the last edit before the draft is written
    pub autosave_debounce: Duration,
    /// How long the "draft saved" indicator stays on
    pub saved_indicator: Duration,
    /// Drafts at least this old are ignored at startup
    pub draft_max_age: Duration,
    /// Admin switches for the optional sections
    pub features: FormFeatures,
    /// Signature pad size in pixels
    pub canvas: CanvasSize,
    /// Agent/property to seed a new form with, if any
    pub prefill: Option<Prefill>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./offer_drafts.db".to_string()),
            api_port: parse_var("API_PORT", "3001")?,
            draft_key: env_var("DRAFT_KEY").unwrap_or_else(|_| "offer-form-draft".to_string()),
            autosave_debounce: Duration::from_millis(parse_var("AUTOSAVE_DEBOUNCE_MS", "3000")?),
            saved_indicator: Duration::from_millis(parse_var("SAVED_INDICATOR_MS", "2000")?),
            draft_max_age: Duration::from_secs(
                parse_var::<u64>("DRAFT_MAX_AGE_HOURS", "24")?.saturating_mul(60 * 60),
            ),
            features: FormFeatures {
                show_deposits: parse_flag("SHOW_DEPOSITS")?,
                show_finance: parse_flag("SHOW_FINANCE")?,
                show_building_pest: parse_flag("SHOW_BUILDING_PEST")?,
            },
            canvas: canvas_size(
                parse_var("CANVAS_WIDTH", "500")?,
                parse_var("CANVAS_HEIGHT", "160")?,
            )?,
            prefill: prefill(env_var("PREFILL_AGENT").ok(), env_var("PREFILL_ADDRESS").ok()),
        })
    }

    /// Max draft age in the epoch-millisecond unit drafts are stamped with.
    pub fn draft_max_age_ms(&self) -> i64 {
        i64::try_from(self.draft_max_age.as_millis()).unwrap_or(i64::MAX)
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ServerError::Config(format!("Missing env var: {key}")))
}

fn parse_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T> {
    env_var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| ServerError::Config(format!("Invalid {key}")))
}

fn parse_flag(key: &str) -> Result<bool> {
    match env_var(key) {
        Ok(raw) => parse_bool(&raw).ok_or_else(|| ServerError::Config(format!("Invalid {key}"))),
        Err(_) => Ok(false),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn canvas_size(width: u32, height: u32) -> Result<CanvasSize> {
    let size = CanvasSize { width, height };
    if !size.is_supported() {
        return Err(ServerError::Config(format!(
            "Canvas {width}x{height} exceeds {MAX_CANVAS_SIDE} pixels per side"
        )));
    }
    Ok(size)
}

fn prefill(agent: Option<String>, address: Option<String>) -> Option<Prefill> {
    let prefill = Prefill {
        agent_name: agent.unwrap_or_default(),
        property_address: address,
        ..Prefill::default()
    };
    prefill.is_active().then_some(prefill)
}
