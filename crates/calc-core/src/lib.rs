#![deny(warnings)]

//! Core model for the partnership program calculator.
//!
//! This crate defines the serializable [`Configuration`] consumed by the
//! evaluator, its defaults, and the normalization step that turns raw,
//! possibly malformed numbers into the clamped form the formulas expect.
//! It also owns scenario file loading and the text parsers used by front ends.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

pub mod input;
pub mod money;

/// Which quantity the evaluator solves for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SolveMode {
    /// Given budget and horizon, solve the maximum participant count.
    #[serde(alias = "A", alias = "scale")]
    SolveForScale,
    /// Given budget and participant count, solve how many months it lasts.
    #[default]
    #[serde(alias = "B", alias = "runway")]
    SolveForRunway,
}

impl fmt::Display for SolveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveMode::SolveForScale => f.write_str("scale"),
            SolveMode::SolveForRunway => f.write_str("runway"),
        }
    }
}

impl FromStr for SolveMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scale" | "a" | "solveforscale" => Ok(SolveMode::SolveForScale),
            "runway" | "b" | "solveforrunway" => Ok(SolveMode::SolveForRunway),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

/// Errors produced while loading or editing a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid yaml scenario: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid json scenario: {0}")]
    Json(#[from] serde_json::Error),
    /// Key does not name a configuration field.
    #[error("unknown field: {0}")]
    UnknownField(String),
    /// Mode text is neither scale nor runway.
    #[error("unknown solve mode: {0}")]
    UnknownMode(String),
}

/// Business-model parameters for one evaluation.
///
/// Values are kept as entered; nothing here is trusted until
/// [`Configuration::normalized`] clamps it. Percent fields are on a 0..=100
/// scale. Missing keys in a scenario file fall back to [`Default`]; unknown
/// keys are rejected. Exports from the older bodega calculator are read
/// through the field aliases.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Configuration {
    pub mode: SolveMode,
    /// Total funds available.
    pub budget: f64,
    /// Horizon in months, read only when solving for scale.
    pub target_months: f64,
    /// Partner locations, read only when solving for runway.
    #[serde(alias = "numBodegas")]
    pub participant_count: f64,
    /// One-time payment per participant to the broker.
    #[serde(alias = "brokerFee")]
    pub broker_fee_per_activation: f64,
    #[serde(alias = "actPct")]
    pub activation_commission_pct: f64,
    #[serde(alias = "reloadPct")]
    pub reload_commission_pct: f64,
    #[serde(alias = "flatFee")]
    pub flat_fee_per_transaction: f64,
    /// Promotional add-on paid per activation.
    pub activation_bonus: f64,
    #[serde(alias = "newVisitors")]
    pub new_visitors_per_month: f64,
    #[serde(alias = "recurringVisitors")]
    pub recurring_visitors_per_month: f64,
    #[serde(alias = "transitPct")]
    pub transit_usage_pct: f64,
    #[serde(alias = "activationConv")]
    pub activation_conversion_pct: f64,
    #[serde(alias = "reloadConv")]
    pub reload_conversion_pct: f64,
    #[serde(alias = "avgInitial")]
    pub avg_initial_load_amount: f64,
    #[serde(alias = "avgReload")]
    pub avg_reload_amount: f64,
    /// Upper bound on the solved participant count; `None` is uncapped.
    #[serde(alias = "maxBodegas")]
    pub max_participants_cap: Option<f64>,
    pub interchange_rate_pct: f64,
    pub avg_transactions_per_rider: f64,
    pub cost_per_transaction: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            mode: SolveMode::SolveForRunway,
            budget: 10_000.0,
            target_months: 2.0,
            participant_count: 10.0,
            broker_fee_per_activation: 200.0,
            activation_commission_pct: 1.0,
            reload_commission_pct: 3.25,
            flat_fee_per_transaction: 0.25,
            activation_bonus: 0.5,
            new_visitors_per_month: 50.0,
            recurring_visitors_per_month: 120.0,
            transit_usage_pct: 90.0,
            activation_conversion_pct: 10.0,
            reload_conversion_pct: 50.0,
            avg_initial_load_amount: 20.0,
            avg_reload_amount: 25.0,
            max_participants_cap: None,
            interchange_rate_pct: 2.0,
            avg_transactions_per_rider: 8.0,
            cost_per_transaction: 2.90,
        }
    }
}

/// Clamped view of a [`Configuration`]: every amount is finite and
/// non-negative, every rate is a fraction in [0,1], and counts are whole.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedConfig {
    pub mode: SolveMode,
    pub budget: f64,
    /// Always >= 1.
    pub target_months: u64,
    pub participant_count: u64,
    pub broker_fee_per_activation: f64,
    pub activation_commission: f64,
    pub reload_commission: f64,
    pub flat_fee_per_transaction: f64,
    pub activation_bonus: f64,
    pub new_visitors_per_month: f64,
    pub recurring_visitors_per_month: f64,
    pub transit_usage: f64,
    pub activation_conversion: f64,
    pub reload_conversion: f64,
    pub avg_initial_load_amount: f64,
    pub avg_reload_amount: f64,
    pub max_participants_cap: Option<u64>,
    pub interchange_rate: f64,
    pub avg_transactions_per_rider: f64,
    pub cost_per_transaction: f64,
}

/// Coerce NaN, infinities and negatives to zero.
pub fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Map a 0..=100 percentage onto a fraction in [0,1].
pub fn percent_to_fraction(pct: f64) -> f64 {
    clamp_non_negative(pct).min(100.0) / 100.0
}

// `as` saturates at u64::MAX, and the input is already finite and >= 0.
fn whole(value: f64) -> u64 {
    clamp_non_negative(value).floor() as u64
}

impl Configuration {
    /// Produce the clamped form read by the evaluator.
    pub fn normalized(&self) -> NormalizedConfig {
        NormalizedConfig {
            mode: self.mode,
            budget: clamp_non_negative(self.budget),
            target_months: whole(self.target_months).max(1),
            participant_count: whole(self.participant_count),
            broker_fee_per_activation: clamp_non_negative(self.broker_fee_per_activation),
            activation_commission: percent_to_fraction(self.activation_commission_pct),
            reload_commission: percent_to_fraction(self.reload_commission_pct),
            flat_fee_per_transaction: clamp_non_negative(self.flat_fee_per_transaction),
            activation_bonus: clamp_non_negative(self.activation_bonus),
            new_visitors_per_month: clamp_non_negative(self.new_visitors_per_month).floor(),
            recurring_visitors_per_month: clamp_non_negative(self.recurring_visitors_per_month)
                .floor(),
            transit_usage: percent_to_fraction(self.transit_usage_pct),
            activation_conversion: percent_to_fraction(self.activation_conversion_pct),
            reload_conversion: percent_to_fraction(self.reload_conversion_pct),
            avg_initial_load_amount: clamp_non_negative(self.avg_initial_load_amount),
            avg_reload_amount: clamp_non_negative(self.avg_reload_amount),
            max_participants_cap: self.max_participants_cap.map(whole),
            interchange_rate: percent_to_fraction(self.interchange_rate_pct),
            avg_transactions_per_rider: clamp_non_negative(self.avg_transactions_per_rider),
            cost_per_transaction: clamp_non_negative(self.cost_per_transaction),
        }
    }

    /// Set one field from form text, keyed by its camelCase scenario name
    /// or the matching bodega-calculator alias.
    ///
    /// Numeric text never fails; it is absorbed by the [`input`] parsers.
    pub fn set_field(&mut self, key: &str, text: &str) -> Result<(), ConfigError> {
        use input::{parse_amount, parse_cap, parse_count, parse_months, parse_percent};
        match key {
            "mode" => self.mode = text.parse()?,
            "budget" => self.budget = parse_amount(text),
            "targetMonths" => self.target_months = parse_months(text),
            "participantCount" | "numBodegas" => self.participant_count = parse_count(text),
            "brokerFeePerActivation" | "brokerFee" => {
                self.broker_fee_per_activation = parse_amount(text);
            }
            "activationCommissionPct" | "actPct" => {
                self.activation_commission_pct = parse_percent(text);
            }
            "reloadCommissionPct" | "reloadPct" => self.reload_commission_pct = parse_percent(text),
            "flatFeePerTransaction" | "flatFee" => {
                self.flat_fee_per_transaction = parse_amount(text);
            }
            "activationBonus" => self.activation_bonus = parse_amount(text),
            "newVisitorsPerMonth" | "newVisitors" => {
                self.new_visitors_per_month = parse_count(text);
            }
            "recurringVisitorsPerMonth" | "recurringVisitors" => {
                self.recurring_visitors_per_month = parse_count(text);
            }
            "transitUsagePct" | "transitPct" => self.transit_usage_pct = parse_percent(text),
            "activationConversionPct" | "activationConv" => {
                self.activation_conversion_pct = parse_percent(text);
            }
            "reloadConversionPct" | "reloadConv" => {
                self.reload_conversion_pct = parse_percent(text);
            }
            "avgInitialLoadAmount" | "avgInitial" => {
                self.avg_initial_load_amount = parse_amount(text);
            }
            "avgReloadAmount" | "avgReload" => self.avg_reload_amount = parse_amount(text),
            "maxParticipantsCap" | "maxBodegas" => self.max_participants_cap = parse_cap(text),
            "interchangeRatePct" => self.interchange_rate_pct = parse_percent(text),
            "avgTransactionsPerRider" => self.avg_transactions_per_rider = parse_amount(text),
            "costPerTransaction" => self.cost_per_transaction = parse_amount(text),
            _ => return Err(ConfigError::UnknownField(key.to_string())),
        }
        Ok(())
    }

    /// Parse a YAML scenario, filling missing keys from the defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parse a JSON scenario, filling missing keys from the defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a scenario file. `.json` is read as JSON, anything else as YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        debug!(path = %path.display(), is_json, "loading scenario");
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// Pretty JSON export of the inputs; reads back through [`Self::from_json_str`].
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
