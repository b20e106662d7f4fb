//! Plain-text KPI report.

use calc_core::money::{format_count, format_usd};
use calc_econ::{Evaluation, ModeOutcome};
use std::fmt::Write;

/// Render the KPI block plus a one-line summary for the solved mode.
pub fn render(eval: &Evaluation) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    write_report(&mut out, eval)?;
    Ok(out)
}

fn write_report(out: &mut String, eval: &Evaluation) -> std::fmt::Result {
    let a = &eval.activity;
    let p = &eval.payout;
    writeln!(out, "Per participant / month")?;
    writeln!(out, "  activations: {}", format_count(a.activations))?;
    writeln!(out, "  reloads:     {}", format_count(a.reloads))?;
    writeln!(
        out,
        "  payout: activation {} | reload {} | flat {} | bonus {} | total {}",
        format_usd(p.activation),
        format_usd(p.reload),
        format_usd(p.flat),
        format_usd(p.bonus),
        format_usd(p.total)
    )?;
    writeln!(out, "Program")?;
    writeln!(out, "  monthly burn:        {}", format_usd(eval.monthly_burn))?;
    writeln!(out, "  broker payout (1x):  {}", format_usd(eval.broker_payout_total))?;

    match &eval.outcome {
        ModeOutcome::Scale {
            target_months,
            solved_count,
            total_cost,
            remaining,
            exceed,
            capped,
            ..
        } => {
            let cap_note = if *capped { " (capped)" } else { "" };
            writeln!(
                out,
                "  max participants:    {}{cap_note}",
                format_count(*solved_count as f64)
            )?;
            writeln!(out, "  total cost:          {}", format_usd(*total_cost))?;
            writeln!(out, "  remaining:           {}", format_usd(*remaining))?;
            let exceed_text = if *exceed { "Yes" } else { "No" };
            writeln!(out, "  exceeds budget:      {exceed_text}")?;
            write_revenue(out, eval)?;
            writeln!(
                out,
                "With {} participants for {} months, total cost is {} (monthly burn {}).",
                format_count(*solved_count as f64),
                target_months,
                format_usd(*total_cost),
                format_usd(eval.monthly_burn)
            )?;
        }
        ModeOutcome::Runway {
            participant_count,
            runway,
            ..
        } => {
            let runway_text = match runway.whole_months() {
                Some(whole) => format!("{:.2} months (floor {whole})", runway.months()),
                None => "Never".to_string(),
            };
            writeln!(out, "  runway:              {runway_text}")?;
            write_revenue(out, eval)?;
            let approx = if runway.is_unbounded() {
                "unbounded".to_string()
            } else {
                format!("~{:.2} months", runway.months())
            };
            writeln!(
                out,
                "With {} participants, monthly burn is {} and runway is {approx}.",
                format_count(*participant_count as f64),
                format_usd(eval.monthly_burn)
            )?;
        }
    }
    Ok(())
}

fn write_revenue(out: &mut String, eval: &Evaluation) -> std::fmt::Result {
    let r = &eval.revenue;
    writeln!(out, "  transit spend:       {}", format_usd(r.transit_spend))?;
    writeln!(out, "  monthly revenue:     {}", format_usd(r.monthly_revenue))?;
    writeln!(out, "  monthly profit:      {}", format_usd(r.monthly_profit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::{Configuration, SolveMode};

    #[test]
    fn runway_report() {
        let text = render(&calc_econ::evaluate(&Configuration::default())).unwrap();
        assert!(text.contains("monthly burn:        $616.50"));
        assert!(text.contains("broker payout (1x):  $2,000.00"));
        assert!(text.contains("12.98 months (floor 12)"));
        assert!(text.contains("monthly revenue:     $709.92"));
        assert!(text.ends_with("runway is ~12.98 months.\n"));
    }

    #[test]
    fn unbounded_runway_reads_never() {
        let cfg = Configuration {
            new_visitors_per_month: 0.0,
            recurring_visitors_per_month: 0.0,
            ..Configuration::default()
        };
        let text = render(&calc_econ::evaluate(&cfg)).unwrap();
        assert!(text.contains("runway:              Never"));
        assert!(text.contains("runway is unbounded."));
    }

    #[test]
    fn scale_report() {
        let cfg = Configuration {
            mode: SolveMode::SolveForScale,
            max_participants_cap: Some(20.0),
            ..Configuration::default()
        };
        let text = render(&calc_econ::evaluate(&cfg)).unwrap();
        assert!(text.contains("max participants:    20 (capped)"));
        assert!(text.contains("exceeds budget:      No"));
        assert!(text.contains("With 20 participants for 2 months"));
    }
}
