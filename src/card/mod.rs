//! Card records and the detail-page structure parser

mod normalize;
mod overlay;
mod parser;

pub use normalize::{normalize_name, zenkaku_to_hankaku};
pub use overlay::apply_overlay;
pub use parser::{parse_card_html, ParseOutcome};

use serde::{Deserialize, Serialize};

/// One card as extracted from a detail page
///
/// The shape stays flat and JSON-mergeable so the publishing layer can apply
/// per-card overlay patches on top of it. The crawl pipeline itself never
/// mutates a stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Unique identity, the card number as printed (e.g. "WXDi-P01-001")
    pub slug: String,

    /// Display name, normalized to half-width with a `<br />` marker before
    /// the first opening parenthesis
    pub name: String,

    /// Reading of the name, when the page carries one
    pub pronounce: String,

    /// Card kind as shown on the page (e.g. "シグニ")
    pub card_type: String,

    pub color: String,
    pub level: String,
    pub power: String,
    pub cost: String,
    pub limit: String,
    pub rarity: String,

    /// Newest format the card is legal in: 1 = all, 2 = key, 3 = diva
    pub format: i64,

    /// Life-burst text verbatim; "-" when the card has none
    pub lb_text: String,

    /// Collapsed from `lb_text` for filtering
    pub has_lb: bool,

    /// Product the card belongs to, derived from the slug prefix
    pub product_no: String,

    pub skill_text: String,
    pub story: String,

    /// Ordering hint derived from the numeric tail of the slug
    pub sort: i64,
}
