//! Exposure match table
//!
//! Tabulates, for every aperture and shutter speed combination seen in a
//! sequence, the exposure edit the photographer applied to frames shot with
//! it. Used to build a manual compensation table for a camera.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::keys::Parameter;
use crate::record::PhotoRecord;

/// What was observed for one aperture/shutter combination
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MatchCell {
    /// No frame was shot with these settings
    Unseen,
    /// Frames exist but none carries a nonzero exposure edit
    Uncorrected,
    /// Every edited frame agrees on one exposure value
    Correction(f64),
    /// Number of distinct nonzero edits found
    Conflicting(usize),
}

impl MatchCell {
    fn from_edits(seen: bool, edits: &[f64]) -> Self {
        match (seen, edits) {
            (false, _) => MatchCell::Unseen,
            (true, []) => MatchCell::Uncorrected,
            (true, [single]) => MatchCell::Correction(*single),
            (true, many) => MatchCell::Conflicting(many.len()),
        }
    }

    fn short(&self) -> String {
        match self {
            MatchCell::Unseen => "-".to_string(),
            MatchCell::Uncorrected => "0".to_string(),
            MatchCell::Correction(v) => format!("{:+.2}", v),
            MatchCell::Conflicting(n) => format!("?{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRow {
    pub aperture: f64,
    /// One cell per entry of [`ExposureMatchTable::shutter_speeds`]
    pub cells: Vec<MatchCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExposureMatchTable {
    /// Column headings, ascending
    pub shutter_speeds: Vec<f64>,
    /// One row per distinct aperture, ascending
    pub rows: Vec<MatchRow>,
}

impl ExposureMatchTable {
    /// Build the table. Every record must carry both camera facts.
    pub fn build(records: &[PhotoRecord]) -> Result<Self> {
        let mut shots = Vec::with_capacity(records.len());
        for record in records {
            let exposure = record.get(Parameter::Exposure).filter(|e| *e != 0.0);
            shots.push((record.aperture()?, record.shutter_speed()?, exposure));
        }

        let shutter_speeds = distinct(shots.iter().map(|s| s.1));
        let apertures = distinct(shots.iter().map(|s| s.0));
        debug!(
            shutters = shutter_speeds.len(),
            apertures = apertures.len(),
            "building exposure match table"
        );

        let rows = apertures
            .into_iter()
            .map(|aperture| {
                let cells = shutter_speeds
                    .iter()
                    .map(|&shutter| {
                        let matching = shots.iter().filter(|s| s.0 == aperture && s.1 == shutter);
                        let seen = matching.clone().next().is_some();
                        let edits = distinct(matching.filter_map(|s| s.2));
                        MatchCell::from_edits(seen, &edits)
                    })
                    .collect();
                MatchRow { aperture, cells }
            })
            .collect();

        Ok(Self { shutter_speeds, rows })
    }

    pub fn cell(&self, aperture: f64, shutter_speed: f64) -> Option<&MatchCell> {
        let column = self.shutter_speeds.iter().position(|s| *s == shutter_speed)?;
        let row = self.rows.iter().find(|r| r.aperture == aperture)?;
        row.cells.get(column)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Plain-text grid: apertures down, shutter speeds across.
    pub fn render_text(&self) -> String {
        let mut out = format!("{:>8}", "f/");
        for s in &self.shutter_speeds {
            out.push_str(&format!(" {:>8}", format_shutter(*s)));
        }
        out.push('\n');

        for row in &self.rows {
            out.push_str(&format!("{:>8}", format!("f/{}", row.aperture)));
            for cell in &row.cells {
                out.push_str(&format!(" {:>8}", cell.short()));
            }
            out.push('\n');
        }
        out
    }
}

/// Shutter speed the way cameras display it: `1/250` below a second, `2s` above.
pub fn format_shutter(seconds: f64) -> String {
    if seconds > 0.0 && seconds < 1.0 {
        format!("1/{}", (1.0 / seconds).round())
    } else {
        format!("{}s", seconds)
    }
}

fn distinct(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.collect();
    v.sort_by(f64::total_cmp);
    v.dedup();
    v
}
