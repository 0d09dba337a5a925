//! Row formats of the exported files.
//!
//! Every file starts with one header row; fields are separated by `;`. An
//! undefined ratio is written as an empty field.

use std::io::{self, Write};

use wst_metrics::{ActivityReport, FundingMetric, RoundMetric};

pub const ROUNDS_HEADER: &str = "mix_round;anonset;spread";
pub const TX0S_HEADER: &str =
    "txid_prefix;nb_mixed_outputs;nb_created_outputs;nb_counterparties;heterogeneity";
pub const ACTIVITY_HEADER: &str = "date;nb_mixes;inflow;nb_new_tx0s;nb_active_tx0s";

fn ratio(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(String::new, |v| format!("{v:.decimals$}"))
}

pub fn write_rounds<W: Write>(mut out: W, rounds: &[RoundMetric]) -> io::Result<()> {
    writeln!(out, "{ROUNDS_HEADER}")?;
    for r in rounds {
        writeln!(out, "{};{};{}", r.round, r.anonset, ratio(r.spread, 2))?;
    }
    Ok(())
}

pub fn write_tx0s<W: Write>(mut out: W, metrics: &[FundingMetric]) -> io::Result<()> {
    writeln!(out, "{TX0S_HEADER}")?;
    for m in metrics {
        writeln!(
            out,
            "{};{};{};{};{}",
            m.prefix,
            m.mixed_outputs,
            m.created_outputs,
            m.counterparties,
            ratio(m.heterogeneity_ratio(), 4)
        )?;
    }
    Ok(())
}

pub fn write_activity<W: Write>(mut out: W, activity: &ActivityReport) -> io::Result<()> {
    writeln!(out, "{ACTIVITY_HEADER}")?;
    for (date, day) in activity.iter() {
        writeln!(
            out,
            "{};{};{};{};{}",
            date.format("%d/%m/%Y"),
            day.nb_mixes,
            day.inflow,
            day.nb_new_tx0s,
            day.nb_active_tx0s
        )?;
    }
    Ok(())
}
