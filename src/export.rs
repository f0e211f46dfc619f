use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::engine::ShotView;
use crate::error::{Result, ShotMapError};
use crate::render::{ColorClass, MapVariant};
use crate::state::stat_rows;

pub struct ExportReport {
    pub path: PathBuf,
    pub shots: usize,
}

enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// `shotmap_<heading>_<timestamp>.xlsx` inside `dir`.
pub fn default_export_path(dir: &Path, heading: &str) -> PathBuf {
    let slug: String = heading
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("shotmap_{slug}_{stamp}.xlsx"))
}

/// Write the view as a two-sheet workbook: stat block and per-shot rows.
pub fn export_view(path: &Path, view: &ShotView<'_>, variant: MapVariant) -> Result<ExportReport> {
    let wrap = |source: XlsxError| ShotMapError::Export {
        path: path.display().to_string(),
        source,
    };

    let mut summary_rows: Vec<Vec<Cell>> = vec![
        vec!["Heading".into(), view.heading.clone().into()],
        vec!["Variant".into(), variant.label().into()],
    ];
    summary_rows.extend(
        stat_rows(&view.stats, variant)
            .into_iter()
            .map(|(label, value)| vec![label.into(), value.into()]),
    );

    let mut shot_rows: Vec<Vec<Cell>> = vec![
        [
            "Team", "Player", "X", "Y", "Shot Type", "Outcome", "xG", "Marker Size", "Class",
            "Emphasis", "Draw Order",
        ]
        .into_iter()
        .map(Cell::from)
        .collect(),
    ];
    for (shot, desc) in view.rows.iter().zip(&view.descriptors) {
        let class = match desc.color_class {
            ColorClass::Goal => "Goal",
            ColorClass::NoGoal => "No Goal",
        };
        shot_rows.push(vec![
            shot.team.as_str().into(),
            shot.player.as_str().into(),
            desc.x.into(),
            desc.y.into(),
            shot.shot_type.as_str().into(),
            shot.shot_outcome.as_str().into(),
            shot.expected_goals.into(),
            desc.marker_size.into(),
            class.into(),
            desc.emphasis.into(),
            f64::from(desc.draw_order).into(),
        ]);
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary").map_err(wrap)?;
        write_rows(sheet, &summary_rows).map_err(wrap)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Shots").map_err(wrap)?;
        write_rows(sheet, &shot_rows).map_err(wrap)?;
    }
    workbook.save(path).map_err(wrap)?;

    Ok(ExportReport {
        path: path.to_path_buf(),
        shots: view.rows.len(),
    })
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> std::result::Result<(), XlsxError> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            match cell {
                Cell::Text(value) => worksheet.write_string(r, c, value)?,
                Cell::Number(value) => worksheet.write_number(r, c, *value)?,
            };
        }
    }
    Ok(())
}
