use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::error::ScrapeError;

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,2}:\d{2})\s*([ap]m)").expect("valid time regex"));

const DATE_FORMATS: [&str; 6] = [
    "%B %d, %Y",
    "%b %d, %Y",
    "%A, %B %d, %Y",
    "%a, %b %d, %Y",
    "%A %B %d, %Y",
    "%a %b %d, %Y",
];

pub fn clean_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub fn inner_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

/// Text content exactly as the page has it, only trimmed at the ends.
pub fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().and_then(|node| {
        let cleaned = inner_text(node);
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    })
}

/// Returns the single match for `selector`, or `None` when there is none.
pub fn at_most_one<'a>(
    scope: &ElementRef<'a>,
    selector: &Selector,
    what: &str,
) -> Result<Option<ElementRef<'a>>, ScrapeError> {
    let mut matches = scope.select(selector);
    let first = matches.next();
    let extra = matches.count();
    if extra > 0 {
        return Err(ScrapeError::structural(format!(
            "expected at most one {what}, found {}",
            extra + 1
        )));
    }
    Ok(first)
}

pub fn exactly_one<'a>(
    scope: &ElementRef<'a>,
    selector: &Selector,
    what: &str,
) -> Result<ElementRef<'a>, ScrapeError> {
    at_most_one(scope, selector, what)?
        .ok_or_else(|| ScrapeError::structural(format!("expected exactly one {what}, found 0")))
}

/// Pulls the `H:MMam` part out of a cell such as `"Doors 7:30pm"`.
pub fn find_first_time(text: &str) -> Option<String> {
    TIME_RE
        .captures(text)
        .map(|caps| format!("{}{}", &caps[1], caps[2].to_ascii_lowercase()))
}

pub fn parse_local_datetime(
    date_text: &str,
    time_text: &str,
    tz: Tz,
) -> Result<DateTime<Tz>, ScrapeError> {
    let cleaned_date = clean_text(date_text);
    let date = parse_naive_date(&cleaned_date)
        .ok_or_else(|| ScrapeError::parse(format!("unrecognised date `{cleaned_date}`")))?;
    let time = parse_naive_time(time_text)
        .ok_or_else(|| ScrapeError::parse(format!("unrecognised time `{time_text}`")))?;
    to_timezone_datetime(date, time, tz).ok_or_else(|| {
        ScrapeError::parse(format!("{date} {time} does not exist in {}", tz.name()))
    })
}

fn parse_naive_time(text: &str) -> Option<NaiveTime> {
    let normalized = text.trim().to_ascii_uppercase();
    NaiveTime::parse_from_str(&normalized, "%I:%M%p").ok()
}

fn parse_naive_date(input: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
}

fn to_timezone_datetime(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Tz>> {
    let naive = NaiveDateTime::new(date, time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(dt, _) => Some(dt),
        LocalResult::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    const TORONTO: Tz = chrono_tz::America::Toronto;

    #[test]
    fn extracts_time_from_decorated_cell() {
        assert_eq!(find_first_time("Doors 7:30pm"), Some("7:30pm".to_string()));
        assert_eq!(find_first_time("★ 10:00 AM ★"), Some("10:00am".to_string()));
        assert_eq!(find_first_time("TBA"), None);
    }

    #[test]
    fn parses_dates_in_toronto() {
        let start = parse_local_datetime("August 1, 2024", "7:30pm", TORONTO).expect("parse");
        assert_eq!(start.to_rfc3339(), "2024-08-01T19:30:00-04:00");

        let winter = parse_local_datetime("Thursday, January 9, 2025", "12:05pm", TORONTO)
            .expect("parse winter");
        assert_eq!(winter.to_rfc3339(), "2025-01-09T12:05:00-05:00");

        let short = parse_local_datetime("  Aug  2,   2024 ", "9:00am", TORONTO).expect("short");
        assert_eq!(short.to_rfc3339(), "2024-08-02T09:00:00-04:00");
    }

    #[test]
    fn rejects_malformed_dates_and_times() {
        assert!(matches!(
            parse_local_datetime("Someday", "7:30pm", TORONTO),
            Err(ScrapeError::Parse(_))
        ));
        assert!(matches!(
            parse_local_datetime("August 1, 2024", "19:30", TORONTO),
            Err(ScrapeError::Parse(_))
        ));
    }

    #[test]
    fn rejects_times_skipped_by_dst() {
        let result = parse_local_datetime("March 10, 2024", "2:30am", TORONTO);
        assert!(matches!(result, Err(ScrapeError::Parse(_))));
    }

    #[test]
    fn enforces_cardinality() {
        let document = Html::parse_document("<div><p>a</p><p>b</p><span>c</span></div>");
        let root = document.root_element();
        let p = Selector::parse("p").expect("p");
        let span = Selector::parse("span").expect("span");
        let em = Selector::parse("em").expect("em");

        assert!(matches!(
            at_most_one(&root, &p, "paragraph"),
            Err(ScrapeError::Structural(_))
        ));
        assert_eq!(
            exactly_one(&root, &span, "span").map(inner_text),
            Ok("c".to_string())
        );
        assert!(at_most_one(&root, &em, "em").expect("none is fine").is_none());
        assert!(matches!(
            exactly_one(&root, &em, "em"),
            Err(ScrapeError::Structural(_))
        ));
    }
}
