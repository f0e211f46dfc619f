use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, ShotMapError};
use crate::shots::{PitchPoint, RawShotRecord, ShotEvent, ShotTable};

/// What to do with a row that fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidRowPolicy {
    /// Fail the whole load on the first invalid row.
    #[default]
    Abort,
    /// Keep going; invalid rows are listed in [`NormalizeReport::rejected`].
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub exclude_penalties: bool,
    pub invalid_rows: InvalidRowPolicy,
}

#[derive(Debug)]
pub struct RejectedRow {
    pub row: usize,
    pub error: ShotMapError,
}

#[derive(Debug)]
pub struct NormalizeReport {
    pub table: ShotTable,
    pub rejected: Vec<RejectedRow>,
    pub penalties_excluded: usize,
}

/// Validate raw rows into a [`ShotTable`], preserving row order.
///
/// Every row is validated before penalty exclusion, so a malformed penalty
/// still fails an `Abort` load.
pub fn normalize<I>(raw: I, options: NormalizeOptions) -> Result<NormalizeReport>
where
    I: IntoIterator<Item = RawShotRecord>,
{
    normalize_rows(raw.into_iter().map(Ok), options)
}

// Rows that failed to decode arrive as `Err` and go through the same policy
// as rows that fail validation. Row indices count every data record.
fn normalize_rows<I>(rows: I, options: NormalizeOptions) -> Result<NormalizeReport>
where
    I: IntoIterator<Item = Result<RawShotRecord>>,
{
    let mut shots = Vec::new();
    let mut rejected = Vec::new();

    for (row, record) in rows.into_iter().enumerate() {
        match record.and_then(|record| validate_record(row, record)) {
            Ok(shot) => shots.push(shot),
            Err(err) => match options.invalid_rows {
                InvalidRowPolicy::Abort => return Err(err),
                InvalidRowPolicy::Reject => {
                    warn!(row, error = %err, "rejecting shot row");
                    rejected.push(RejectedRow { row, error: err });
                }
            },
        }
    }

    let before = shots.len();
    if options.exclude_penalties {
        shots.retain(|s| !s.is_penalty());
    }
    let penalties_excluded = before - shots.len();

    debug!(
        rows = shots.len(),
        rejected = rejected.len(),
        penalties_excluded,
        "normalized shot table"
    );

    Ok(NormalizeReport {
        table: ShotTable::from_validated(shots),
        rejected,
        penalties_excluded,
    })
}

/// Copy of `table` without penalty shots.
pub fn exclude_penalties(table: &ShotTable) -> ShotTable {
    ShotTable::from_validated(
        table
            .shots()
            .iter()
            .filter(|s| !s.is_penalty())
            .cloned()
            .collect(),
    )
}

/// Decode a location field such as `"[108.2, 37.5]"`.
pub fn parse_location(row: usize, raw: &str) -> Result<PitchPoint> {
    decode_location(raw).map_err(|reason| ShotMapError::MalformedLocation {
        row,
        raw: raw.to_string(),
        reason,
    })
}

fn decode_location(raw: &str) -> std::result::Result<PitchPoint, String> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|e| e.to_string())?;
    let Value::Array(items) = value else {
        return Err("expected a JSON array".to_string());
    };
    if items.len() != 2 {
        return Err(format!("expected 2 components, found {}", items.len()));
    }
    let mut coords = [0.0_f64; 2];
    for (slot, item) in coords.iter_mut().zip(&items) {
        let Some(v) = item.as_f64() else {
            return Err(format!("non-numeric component {item}"));
        };
        if !v.is_finite() {
            return Err(format!("non-finite component {v}"));
        }
        *slot = v;
    }
    Ok(PitchPoint::new(coords[0], coords[1]))
}

fn validate_record(row: usize, record: RawShotRecord) -> Result<ShotEvent> {
    let location = parse_location(row, &record.location)?;
    if record.team.trim().is_empty() {
        return Err(ShotMapError::InvalidRecord {
            row,
            reason: "team is empty".to_string(),
        });
    }
    if record.player.trim().is_empty() {
        return Err(ShotMapError::InvalidRecord {
            row,
            reason: "player is empty".to_string(),
        });
    }
    let xg = record.expected_goals;
    if !xg.is_finite() || !(0.0..=1.0).contains(&xg) {
        return Err(ShotMapError::InvalidRecord {
            row,
            reason: format!("expected goals {xg} outside [0, 1]"),
        });
    }
    Ok(ShotEvent {
        team: record.team,
        player: record.player,
        location,
        shot_type: record.shot_type,
        shot_outcome: record.shot_outcome,
        expected_goals: xg,
    })
}

fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr)
}

/// Decode CSV rows into raw records; no shot validation happens here.
///
/// Any undecodable record fails the whole read. [`load_csv`] applies the
/// invalid-row policy to such records instead.
pub fn read_raw_csv<R: Read>(rdr: R) -> Result<Vec<RawShotRecord>> {
    let mut out = Vec::new();
    for (row, record) in csv_reader(rdr).deserialize::<RawShotRecord>().enumerate() {
        out.push(record.map_err(|source| ShotMapError::UnreadableRow { row, source })?);
    }
    Ok(out)
}

/// Read and normalize CSV rows in one pass. A record the CSV layer cannot
/// decode (empty xG cell, wrong field count) counts as an invalid row.
pub fn normalize_csv<R: Read>(rdr: R, options: NormalizeOptions) -> Result<NormalizeReport> {
    let mut reader = csv_reader(rdr);
    let rows = reader
        .deserialize::<RawShotRecord>()
        .enumerate()
        .map(|(row, record)| {
            record.map_err(|source| ShotMapError::UnreadableRow { row, source })
        });
    normalize_rows(rows, options)
}

pub fn load_csv(path: &Path, options: NormalizeOptions) -> Result<NormalizeReport> {
    let file = File::open(path).map_err(|source| ShotMapError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let report = normalize_csv(file, options)?;
    debug!(
        path = %path.display(),
        rows = report.table.len() + report.rejected.len() + report.penalties_excluded,
        "read shot csv"
    );
    Ok(report)
}
