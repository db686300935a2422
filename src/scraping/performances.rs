use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::base;
use super::flags;
use crate::error::ScrapeError;
use crate::models::{Flag, PerformanceRecord};

pub const TIMEZONE: Tz = chrono_tz::America::Toronto;

/// Rows with fewer cells are cancellation placeholders.
pub const MIN_CELLS: usize = 5;

const LEADING_CELL: usize = 0;
const DATE_CELL: usize = 1;
const TIME_CELL: usize = 2;
const ACCESSIBILITY_CELL: usize = 3;

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".performances table tbody tr").expect("performance rows"));
static ACCESSIBILITY_ICON_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[class*="warning-icon"]"#).expect("accessibility icons"));
static LEADING_ICON_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"[class^="icon"], [class*=" icon"]"#).expect("leading icons")
});

pub fn extract_performances(
    html: &str,
    runtime_minutes: Option<i64>,
) -> Result<Vec<PerformanceRecord>, ScrapeError> {
    let document = Html::parse_document(html);
    let rows = document.select(&ROW_SELECTOR).collect::<Vec<_>>();
    if rows.is_empty() {
        return Err(ScrapeError::structural("performance table has no rows"));
    }

    let mut performances = Vec::with_capacity(rows.len());
    for (row_index, row) in rows.into_iter().enumerate() {
        let cells = row_cells(row);
        if cells.len() < MIN_CELLS {
            debug!(row = row_index, cells = cells.len(), "skipping placeholder row");
            continue;
        }
        let performance = parse_row(&cells, performances.len() + 1, runtime_minutes)?;
        performances.push(performance);
    }

    if performances.is_empty() {
        return Err(ScrapeError::structural(
            "performance table has no parseable rows",
        ));
    }
    Ok(performances)
}

fn row_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| cell.value().name() == "td")
        .collect()
}

fn parse_row(
    cells: &[ElementRef<'_>],
    id: usize,
    runtime_minutes: Option<i64>,
) -> Result<PerformanceRecord, ScrapeError> {
    let date_text = base::inner_text(cells[DATE_CELL]);
    let time_cell = base::inner_text(cells[TIME_CELL]);
    let time_text = base::find_first_time(&time_cell)
        .ok_or_else(|| ScrapeError::parse(format!("no time found in `{time_cell}`")))?;

    let start = base::parse_local_datetime(&date_text, &time_text, TIMEZONE)?;
    let end = runtime_minutes
        .map(|minutes| end_time(&start, minutes))
        .transpose()?;

    Ok(PerformanceRecord {
        id,
        flags: row_flags(cells)?,
        start: start.to_rfc3339(),
        end,
    })
}

fn end_time(start: &DateTime<Tz>, minutes: i64) -> Result<String, ScrapeError> {
    Duration::try_minutes(minutes)
        .and_then(|runtime| start.checked_add_signed(runtime))
        .map(|end| end.to_rfc3339())
        .ok_or_else(|| ScrapeError::parse(format!("runtime of {minutes} minutes is out of range")))
}

/// Accessibility-cell flags first, then leading-cell flags, each in document order.
fn row_flags(cells: &[ElementRef<'_>]) -> Result<Vec<Flag>, ScrapeError> {
    let mut collected = cells[ACCESSIBILITY_CELL]
        .select(&ACCESSIBILITY_ICON_SELECTOR)
        .map(flags::accessibility_icon_flag)
        .collect::<Result<Vec<_>, _>>()?;

    for icon in cells[LEADING_CELL].select(&LEADING_ICON_SELECTOR) {
        if let Some(flag) = flags::leading_icon_flag(icon)? {
            collected.push(flag);
        }
    }
    Ok(collected)
}
