use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::catalog::CriteriaCatalog;
use super::domain::{Evaluation, SourcingEventId, Vendor};
use super::scoring::{rank_of, VendorSummary};

/// Export failures. Criterion and vendor names are assumed comma-free;
/// `QuoteStyle::Never` writes them raw either way.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("failed to flush export buffer: {0}")]
    Buffer(String),
    #[error("export payload was not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render the scoring matrix and rankings as a flat CSV table.
///
/// Layout: a `Criteria,Weight,<vendors...>` header, one row per criterion with
/// the weight as a percentage and each vendor's effective score to one decimal
/// place (`-` when the cell has no score at all), then `Weighted Score` and
/// `Rank` trailer rows. Output is byte-stable for identical input.
pub fn export_matrix(
    catalog: &CriteriaCatalog,
    vendors: &[Vendor],
    evaluations: &[Evaluation],
    summaries: &[VendorSummary],
) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = vec!["Criteria".to_string(), "Weight".to_string()];
    header.extend(vendors.iter().map(|vendor| vendor.name.clone()));
    writer.write_record(&header)?;

    for criterion in catalog.criteria() {
        let mut row = vec![criterion.name.clone(), weight_percent(criterion.weight)];
        for vendor in vendors {
            row.push(score_cell(evaluations, vendor, &criterion.name));
        }
        writer.write_record(&row)?;
    }

    let mut weighted_row = vec!["Weighted Score".to_string(), String::new()];
    for vendor in vendors {
        let cell = summaries
            .iter()
            .find(|summary| summary.vendor_id == vendor.id)
            .map(|summary| format!("{:.2}", summary.weighted_score))
            .unwrap_or_else(|| "-".to_string());
        weighted_row.push(cell);
    }
    writer.write_record(&weighted_row)?;

    let mut rank_row = vec!["Rank".to_string(), String::new()];
    for vendor in vendors {
        let cell = rank_of(summaries, &vendor.id)
            .map(|rank| rank.to_string())
            .unwrap_or_else(|| "-".to_string());
        rank_row.push(cell);
    }
    writer.write_record(&rank_row)?;

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Buffer(err.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// File name pattern consumed by download surfaces:
/// `tender-evaluation-<eventId>-<epochMillis>.csv`.
pub fn export_filename(event: &SourcingEventId, epoch_millis: i64) -> String {
    format!("tender-evaluation-{}-{}.csv", event.0, epoch_millis)
}

fn score_cell(evaluations: &[Evaluation], vendor: &Vendor, criterion_name: &str) -> String {
    let row = evaluations
        .iter()
        .find(|evaluation| evaluation.vendor_id == vendor.id && evaluation.criteria_name == criterion_name);
    match row {
        Some(evaluation) if evaluation.has_any_score() => {
            format!("{:.1}", evaluation.effective_score().value)
        }
        _ => "-".to_string(),
    }
}

// 0.6 renders as "60%", 0.125 as "12.5%".
fn weight_percent(weight: f64) -> String {
    let percent = weight * 100.0;
    if (percent - percent.round()).abs() < 1e-9 {
        format!("{}%", percent.round() as i64)
    } else {
        format!("{percent:.1}%")
    }
}
