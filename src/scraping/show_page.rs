use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use super::base;
use crate::error::ScrapeError;
use crate::models::ShowFields;

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".page-title").expect("title selector"));
static SHOW_INFO_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".show-info").expect("show info selector"));
static RUNTIME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".column.right dd").expect("runtime selector"));
static VENUE_NAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".venue-info h3").expect("venue name selector"));
static VENUE_ADDRESS_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".venue-info address.venue-address").expect("venue address selector")
});
static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("paragraph selector"));

static VENUE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\s*:\s*").expect("venue prefix regex"));
static LEADING_DIGITS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)").expect("runtime digits regex"));

pub fn extract_show_fields(html: &str) -> Result<ShowFields, ScrapeError> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let title = root
        .select(&TITLE_SELECTOR)
        .next()
        .map(base::trimmed_text)
        .ok_or_else(|| ScrapeError::structural("page title not found"))?;

    Ok(ShowFields {
        title,
        runtime_minutes: runtime_minutes(&root),
        venue: venue_name(&root)?,
        address: venue_address(&root)?,
    })
}

/// Missing runtime is normal: late-night shows publish no duration.
fn runtime_minutes(root: &ElementRef<'_>) -> Option<i64> {
    let show_info = root.select(&SHOW_INFO_SELECTOR).next()?;
    let text = base::first_text(&show_info, &RUNTIME_SELECTOR)?;
    let minutes = parse_runtime(&text);
    if minutes.is_none() {
        debug!(runtime = %text, "runtime has no leading minutes");
    }
    minutes
}

pub fn parse_runtime(text: &str) -> Option<i64> {
    LEADING_DIGITS_RE
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

fn venue_name(root: &ElementRef<'_>) -> Result<Option<String>, ScrapeError> {
    let header = base::exactly_one(root, &VENUE_NAME_SELECTOR, "venue name")?;
    let name = strip_venue_prefix(&base::inner_text(header));
    Ok(if name.is_empty() { None } else { Some(name) })
}

pub fn strip_venue_prefix(name: &str) -> String {
    VENUE_PREFIX_RE.replace(name, "").trim().to_string()
}

fn venue_address(root: &ElementRef<'_>) -> Result<Option<String>, ScrapeError> {
    let Some(address) = base::at_most_one(root, &VENUE_ADDRESS_SELECTOR, "venue address")? else {
        return Ok(None);
    };
    let Some(paragraph) = address.select(&PARAGRAPH_SELECTOR).next() else {
        return Ok(None);
    };
    let flattened = flatten_lines(paragraph);
    Ok(if flattened.is_empty() { None } else { Some(flattened) })
}

/// Text of `element` on one line, with each `<br>` turned into `", "`.
fn flatten_lines(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => {
                // "ON <br>" reads "ON, " rather than "ON , "
                out.truncate(out.trim_end().len());
                out.push_str(", ");
            }
            _ => {}
        }
    }
    base::clean_text(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
    <html><body>
        <h1 class="page-title">
            Hamlet (Abridged)
        </h1>
        <section class="show-info">
            <div class="column left"><dl><dt>Genre</dt><dd>Comedy</dd></dl></div>
            <div class="column right"><dl><dt>Runtime</dt><dd>75 minutes (no intermission)</dd></dl></div>
        </section>
        <aside class="venue-info">
            <h3>3: Tarragon Theatre Mainspace</h3>
            <address class="venue-address">
                <p>30 Bridgman Ave<br>Toronto, ON <br />M5R 1X3</p>
                <p>Wheelchair accessible</p>
            </address>
        </aside>
    </body></html>
    "#;

    #[test]
    fn parses_show_fields() {
        let fields = extract_show_fields(SAMPLE_HTML).expect("parse show page");
        assert_eq!(fields.title, "Hamlet (Abridged)");
        assert_eq!(fields.runtime_minutes, Some(75));
        assert_eq!(fields.venue.as_deref(), Some("Tarragon Theatre Mainspace"));
        assert_eq!(
            fields.address.as_deref(),
            Some("30 Bridgman Ave, Toronto, ON, M5R 1X3")
        );
    }

    #[test]
    fn runtime_and_address_are_optional() {
        let html = r#"
            <h1 class="page-title">Late Night Cabaret</h1>
            <section class="show-info"><div class="column right"><dl></dl></div></section>
            <div class="venue-info"><h3>The Bar</h3></div>
        "#;
        let fields = extract_show_fields(html).expect("parse");
        assert_eq!(fields.title, "Late Night Cabaret");
        assert_eq!(fields.runtime_minutes, None);
        assert_eq!(fields.venue.as_deref(), Some("The Bar"));
        assert_eq!(fields.address, None);
    }

    #[test]
    fn non_numeric_runtime_is_absent() {
        assert_eq!(parse_runtime("Until late"), None);
        assert_eq!(parse_runtime(" 120min"), Some(120));
    }

    #[test]
    fn strips_numeric_venue_prefix_only() {
        assert_eq!(strip_venue_prefix("12 : Factory Theatre"), "Factory Theatre");
        assert_eq!(strip_venue_prefix("  Factory Theatre "), "Factory Theatre");
        assert_eq!(strip_venue_prefix("Studio 2: Upstairs"), "Studio 2: Upstairs");
    }

    #[test]
    fn missing_title_is_structural() {
        let html = r#"<div class="venue-info"><h3>Venue</h3></div>"#;
        assert!(matches!(
            extract_show_fields(html),
            Err(ScrapeError::Structural(_))
        ));
    }

    #[test]
    fn venue_header_must_be_unique() {
        let none = r#"<h1 class="page-title">T</h1><div class="venue-info"></div>"#;
        assert!(matches!(
            extract_show_fields(none),
            Err(ScrapeError::Structural(_))
        ));

        let two = r#"
            <h1 class="page-title">T</h1>
            <div class="venue-info"><h3>1: A</h3><h3>2: B</h3></div>
        "#;
        assert!(matches!(
            extract_show_fields(two),
            Err(ScrapeError::Structural(_))
        ));
    }

    #[test]
    fn duplicate_address_is_structural() {
        let html = r#"
            <h1 class="page-title">T</h1>
            <div class="venue-info">
                <h3>Venue</h3>
                <address class="venue-address"><p>1 King St</p></address>
                <address class="venue-address"><p>2 King St</p></address>
            </div>
        "#;
        assert!(matches!(
            extract_show_fields(html),
            Err(ScrapeError::Structural(_))
        ));
    }
}
