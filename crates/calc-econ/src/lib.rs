#![deny(warnings)]

//! Financial model evaluator for the partnership program.
//!
//! [`evaluate`] turns a [`Configuration`] into every derived metric of the
//! program: per-participant activity and payouts, monthly burn, the one-time
//! broker cost, revenue and profit, and the quantity solved by the selected
//! [`SolveMode`]. The evaluator is a pure function and never fails; degenerate
//! inputs resolve to zero counts or zero/unbounded runway.

use calc_core::{Configuration, NormalizedConfig, SolveMode};
use serde::Serialize;
use tracing::debug;

/// Monthly activity generated by a single participant.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityVolumes {
    /// New customers signing up.
    pub activations: f64,
    /// Top-ups by existing customers.
    pub reloads: f64,
    pub total_visitors: f64,
    /// Visitors who use transit at all.
    pub riders: f64,
    pub transit_transactions: f64,
}

/// Monthly payout owed to a single participant.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutBreakdown {
    pub activation: f64,
    pub reload: f64,
    pub flat: f64,
    pub bonus: f64,
    /// Commission plus flat fees, before the promotional bonus.
    pub base: f64,
    pub total: f64,
}

/// How long the budget sustains the program.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Runway {
    Finite { months: f64, whole_months: u64 },
    /// No ongoing burn and money left after broker fees.
    Unbounded,
}

impl Runway {
    fn from_months(months: f64) -> Self {
        // NaN.max(0.0) is 0.0
        let months = months.max(0.0);
        if months.is_infinite() {
            return Runway::Unbounded;
        }
        Runway::Finite {
            months,
            whole_months: months.floor() as u64,
        }
    }

    /// Exact months, `f64::INFINITY` when unbounded.
    pub fn months(&self) -> f64 {
        match self {
            Runway::Finite { months, .. } => *months,
            Runway::Unbounded => f64::INFINITY,
        }
    }

    /// Completed months, `None` when unbounded.
    pub fn whole_months(&self) -> Option<u64> {
        match self {
            Runway::Finite { whole_months, .. } => Some(*whole_months),
            Runway::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Runway::Unbounded)
    }
}

/// Mode-specific part of an [`Evaluation`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ModeOutcome {
    Scale {
        /// Horizon actually used, at least one month.
        target_months: u64,
        solved_count: u64,
        /// Full horizon payout plus the broker fee, for one participant.
        cost_per_participant: f64,
        total_cost: f64,
        /// Budget minus total cost; negative when exceeded.
        remaining: f64,
        exceed: bool,
        /// The participant cap lowered the solved count.
        capped: bool,
    },
    Runway {
        participant_count: u64,
        budget_after_broker: f64,
        runway: Runway,
    },
}

/// Program-wide revenue from transit spend at participant locations.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    pub transit_visitors: f64,
    pub transit_spend: f64,
    pub monthly_revenue: f64,
    pub monthly_profit: f64,
}

/// Every metric derived from one configuration.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub mode: SolveMode,
    pub activity: ActivityVolumes,
    pub payout: PayoutBreakdown,
    /// Solved count for scale, the given count for runway.
    pub participants: u64,
    /// Recurring payouts across all participants; excludes broker fees.
    pub monthly_burn: f64,
    /// One-time broker fees across all participants.
    pub broker_payout_total: f64,
    pub outcome: ModeOutcome,
    pub revenue: RevenueSummary,
}

impl Evaluation {
    /// Solved participant count, only when solving for scale.
    pub fn solved_count(&self) -> Option<u64> {
        match &self.outcome {
            ModeOutcome::Scale { solved_count, .. } => Some(*solved_count),
            ModeOutcome::Runway { .. } => None,
        }
    }

    /// Solved runway, only when solving for runway.
    pub fn runway(&self) -> Option<Runway> {
        match &self.outcome {
            ModeOutcome::Scale { .. } => None,
            ModeOutcome::Runway { runway, .. } => Some(*runway),
        }
    }

    /// Whether the program cost exceeds the budget. Always false for runway.
    pub fn exceed(&self) -> bool {
        matches!(self.outcome, ModeOutcome::Scale { exceed: true, .. })
    }
}

// Zero times anything is zero, so an overflowed factor never turns a zero
// count or rate into NaN.
fn mul(a: f64, b: f64) -> f64 {
    if a == 0.0 || b == 0.0 {
        0.0
    } else {
        a * b
    }
}

// Both sides overflowed: report no difference rather than NaN.
fn sub(a: f64, b: f64) -> f64 {
    if a == b {
        0.0
    } else {
        a - b
    }
}

/// Per-participant monthly activity.
pub fn activity_volumes(cfg: &NormalizedConfig) -> ActivityVolumes {
    let activations = mul(
        mul(cfg.new_visitors_per_month, cfg.transit_usage),
        cfg.activation_conversion,
    );
    let reloads = mul(
        mul(cfg.recurring_visitors_per_month, cfg.transit_usage),
        cfg.reload_conversion,
    );
    let total_visitors = cfg.new_visitors_per_month + cfg.recurring_visitors_per_month;
    let riders = mul(total_visitors, cfg.transit_usage);
    ActivityVolumes {
        activations,
        reloads,
        total_visitors,
        riders,
        transit_transactions: mul(riders, cfg.avg_transactions_per_rider),
    }
}

/// Per-participant monthly payout for the given activity.
pub fn payout_breakdown(cfg: &NormalizedConfig, activity: &ActivityVolumes) -> PayoutBreakdown {
    let activation = mul(
        mul(activity.activations, cfg.avg_initial_load_amount),
        cfg.activation_commission,
    );
    let reload = mul(
        mul(activity.reloads, cfg.avg_reload_amount),
        cfg.reload_commission,
    );
    let flat = mul(
        activity.activations + activity.reloads,
        cfg.flat_fee_per_transaction,
    );
    let bonus = mul(activity.activations, cfg.activation_bonus);
    let base = activation + reload + flat;
    PayoutBreakdown {
        activation,
        reload,
        flat,
        bonus,
        base,
        total: base + bonus,
    }
}

struct Solved {
    participants: u64,
    monthly_burn: f64,
    broker_payout_total: f64,
    outcome: ModeOutcome,
}

fn solve_for_scale(cfg: &NormalizedConfig, payout: &PayoutBreakdown) -> Solved {
    let months = cfg.target_months as f64;
    let cost_per_participant = mul(months, payout.total) + cfg.broker_fee_per_activation;
    let unconstrained = if cost_per_participant > 0.0 {
        (cfg.budget / cost_per_participant).floor() as u64
    } else {
        0
    };
    let solved_count = match cfg.max_participants_cap {
        Some(cap) => unconstrained.min(cap),
        None => unconstrained,
    };
    let n = solved_count as f64;
    let monthly_burn = mul(n, payout.total);
    let broker_payout_total = mul(n, cfg.broker_fee_per_activation);
    let total_cost = mul(monthly_burn, months) + broker_payout_total;
    Solved {
        participants: solved_count,
        monthly_burn,
        broker_payout_total,
        outcome: ModeOutcome::Scale {
            target_months: cfg.target_months,
            solved_count,
            cost_per_participant,
            total_cost,
            remaining: sub(cfg.budget, total_cost),
            exceed: total_cost > cfg.budget,
            capped: solved_count < unconstrained,
        },
    }
}

fn solve_for_runway(cfg: &NormalizedConfig, payout: &PayoutBreakdown) -> Solved {
    let n = cfg.participant_count as f64;
    let monthly_burn = mul(n, payout.total);
    let broker_payout_total = mul(n, cfg.broker_fee_per_activation);
    let budget_after_broker = sub(cfg.budget, broker_payout_total);
    let runway = if monthly_burn > 0.0 {
        Runway::from_months(budget_after_broker / monthly_burn)
    } else if budget_after_broker > 0.0 {
        Runway::Unbounded
    } else {
        Runway::from_months(0.0)
    };
    Solved {
        participants: cfg.participant_count,
        monthly_burn,
        broker_payout_total,
        outcome: ModeOutcome::Runway {
            participant_count: cfg.participant_count,
            budget_after_broker,
            runway,
        },
    }
}

/// Monthly revenue and profit across `participants` locations.
pub fn revenue_summary(
    cfg: &NormalizedConfig,
    activity: &ActivityVolumes,
    participants: u64,
    monthly_burn: f64,
) -> RevenueSummary {
    let transit_visitors = mul(
        mul(participants as f64, activity.total_visitors),
        cfg.transit_usage,
    );
    let transit_spend = mul(
        mul(transit_visitors, cfg.avg_transactions_per_rider),
        cfg.cost_per_transaction,
    );
    let monthly_revenue = mul(transit_spend, cfg.interchange_rate);
    RevenueSummary {
        transit_visitors,
        transit_spend,
        monthly_revenue,
        monthly_profit: sub(monthly_revenue, monthly_burn),
    }
}

/// Evaluate an already normalized configuration.
pub fn evaluate_normalized(cfg: &NormalizedConfig) -> Evaluation {
    let activity = activity_volumes(cfg);
    let payout = payout_breakdown(cfg, &activity);
    let solved = match cfg.mode {
        SolveMode::SolveForScale => solve_for_scale(cfg, &payout),
        SolveMode::SolveForRunway => solve_for_runway(cfg, &payout),
    };
    let revenue = revenue_summary(cfg, &activity, solved.participants, solved.monthly_burn);
    debug!(
        mode = %cfg.mode,
        participants = solved.participants,
        monthly_burn = solved.monthly_burn,
        "evaluated program"
    );
    Evaluation {
        mode: cfg.mode,
        activity,
        payout,
        participants: solved.participants,
        monthly_burn: solved.monthly_burn,
        broker_payout_total: solved.broker_payout_total,
        outcome: solved.outcome,
        revenue,
    }
}

/// Evaluate a configuration: normalize, then run the fixed pipeline.
///
/// Example:
/// let eval = evaluate(&Configuration::default());
/// assert_eq!(eval.participants, 10);
pub fn evaluate(config: &Configuration) -> Evaluation {
    evaluate_normalized(&config.normalized())
}
