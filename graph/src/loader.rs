//! Builds a snapshot from the three semicolon-delimited record streams.

use std::io::BufRead;

use tracing::info;
use wst_types::Denomination;

use crate::records::{EdgeRecord, FundingRecord, MixRecord, Stream};
use crate::{GraphError, GraphSnapshot, SnapshotBuilder};

/// Load a snapshot from its mix, Tx0 and link streams, in that order.
///
/// Each stream starts with one header row, which is skipped; blank lines are
/// ignored. Row numbers in errors count data rows from 1.
pub fn load_snapshot<M, F, L>(
    denomination: Option<Denomination>,
    participants: u32,
    mixes: M,
    funding: F,
    links: L,
) -> Result<GraphSnapshot, GraphError>
where
    M: BufRead,
    F: BufRead,
    L: BufRead,
{
    let mut builder = SnapshotBuilder::new(participants);
    if let Some(denom) = denomination {
        builder = builder.denomination(denom);
    }

    // Both node streams are parsed before any node is stored, so the arena can be
    // bounded by the total transaction count.
    let mut mix_records = Vec::new();
    for_each_row(mixes, Stream::MixTxs, |line, row| {
        mix_records.push(MixRecord::parse(line, row)?);
        Ok(())
    })?;
    let mut funding_records = Vec::new();
    for_each_row(funding, Stream::Tx0s, |line, row| {
        funding_records.push(FundingRecord::parse(line, row)?);
        Ok(())
    })?;
    let (nb_mixes, nb_tx0s) = (mix_records.len(), funding_records.len());

    builder.expect_nodes(nb_mixes + nb_tx0s);
    for record in mix_records {
        builder.push_mix(record)?;
    }
    for record in funding_records {
        builder.push_funding(record)?;
    }
    let nb_links = for_each_row(links, Stream::Links, |line, row| {
        builder.push_edge(EdgeRecord::parse(line, row)?)
    })?;

    info!(
        denom = denomination.map(|d| d.code()).unwrap_or("-"),
        mixes = nb_mixes,
        tx0s = nb_tx0s,
        links = nb_links,
        "snapshot loaded"
    );
    Ok(builder.build())
}

fn for_each_row<R, P>(reader: R, stream: Stream, mut push: P) -> Result<usize, GraphError>
where
    R: BufRead,
    P: FnMut(&str, usize) -> Result<(), GraphError>,
{
    let mut row = 0;
    for line in reader.lines().skip(1) {
        let line = line.map_err(|source| GraphError::Read { stream, source })?;
        if line.trim().is_empty() {
            continue;
        }
        row += 1;
        push(&line, row)?;
    }
    Ok(row)
}
