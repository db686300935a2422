use scraper::ElementRef;

use crate::error::ScrapeError;
use crate::models::Flag;

/// Class shared by every icon in the leading cell.
pub const GENERIC_ICON_CLASS: &str = "icon";
/// Prefix shared by every icon in the accessibility cell.
pub const WARNING_ICON_PREFIX: &str = "warning-icon-";

const ACCESSIBILITY_FLAGS: [(&str, Flag); 7] = [
    ("warning-icon-assisted-hearing-devices", Flag::AssistedHearing),
    ("warning-icon-audio-description", Flag::AudioDescription),
    ("warning-icon-relaxed-performance", Flag::Relaxed),
    ("warning-icon-sign-language", Flag::Asl),
    ("warning-icon-tad-seating", Flag::Tad),
    ("warning-icon-touch-book", Flag::TouchBook),
    ("warning-icon-touch-tour", Flag::TouchTour),
];

const LEADING_FLAGS: [(&str, Flag); 3] = [
    ("icon-preview", Flag::Preview),
    ("icon-pwyc", Flag::Pwyc),
    ("icon-daily-discount", Flag::DailyDiscount),
];

fn lookup(table: &[(&str, Flag)], class: &str) -> Option<Flag> {
    table
        .iter()
        .find(|(name, _)| *name == class)
        .map(|(_, flag)| *flag)
}

pub fn accessibility_flag(class: &str) -> Result<Flag, ScrapeError> {
    lookup(&ACCESSIBILITY_FLAGS, class).ok_or_else(|| ScrapeError::Vocabulary {
        cell: "accessibility",
        class: class.to_string(),
    })
}

pub fn leading_flag(class: &str) -> Result<Flag, ScrapeError> {
    lookup(&LEADING_FLAGS, class).ok_or_else(|| ScrapeError::Vocabulary {
        cell: "leading",
        class: class.to_string(),
    })
}

/// Flag for an accessibility-cell icon, keyed on its `warning-icon-*` class.
pub fn accessibility_icon_flag(icon: ElementRef<'_>) -> Result<Flag, ScrapeError> {
    let class = icon
        .value()
        .classes()
        .find(|class| class.starts_with(WARNING_ICON_PREFIX))
        .unwrap_or_else(|| icon.value().attr("class").unwrap_or_default().trim());
    accessibility_flag(class)
}

/// Flag for a leading-cell icon: the first class other than the generic marker.
/// Icons carrying only the generic marker have no flag.
pub fn leading_icon_flag(icon: ElementRef<'_>) -> Result<Option<Flag>, ScrapeError> {
    icon.value()
        .classes()
        .find(|class| *class != GENERIC_ICON_CLASS)
        .map(leading_flag)
        .transpose()
}
