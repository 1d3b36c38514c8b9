//! Detail-page structure parser
//!
//! Pure function from an HTML document to a [`CardRecord`]. Non-card product
//! pages simply lack the detail container or one of the required fields and
//! come back as [`ParseOutcome::NotCard`]; that is an expected condition, not
//! an error. Field-extraction rules live here so a source markup change only
//! touches this module.

use crate::card::normalize::{normalize_name, zenkaku_to_hankaku};
use crate::card::CardRecord;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Result of parsing one detail page
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// The page described a card
    Card(CardRecord),

    /// The page exists but is not a card detail page
    NotCard,
}

impl ParseOutcome {
    pub fn into_card(self) -> Option<CardRecord> {
        match self {
            ParseOutcome::Card(card) => Some(card),
            ParseOutcome::NotCard => None,
        }
    }
}

// Labels of the dt/dd data table on the detail page.
const LABEL_CARD_TYPE: &str = "種類";
const LABEL_COLOR: &str = "色";
const LABEL_LEVEL: &str = "レベル";
const LABEL_POWER: &str = "パワー";
const LABEL_COST: &str = "コスト";
const LABEL_LIMIT: &str = "リミット";
const LABEL_FORMAT: &str = "フォーマット";
const LABEL_LIFE_BURST: &str = "ライフバースト";
const LABEL_STORY: &str = "ストーリー";

/// Parses a detail page into a card record
///
/// Required: the `.cardDetail` container, a card number, a name, the card
/// type and the color. Anything missing means the page is not a card and the
/// outcome is `NotCard`.
pub fn parse_card_html(html: &str) -> ParseOutcome {
    let document = Html::parse_document(html);

    let Some(container) = select_first(&document.root_element(), "div.cardDetail") else {
        return ParseOutcome::NotCard;
    };

    let Some(slug) = select_first(&container, ".cardNum")
        .map(element_text)
        .filter(|s| !s.is_empty())
    else {
        return ParseOutcome::NotCard;
    };

    let Some(name_el) = select_first(&container, ".cardName") else {
        return ParseOutcome::NotCard;
    };
    let name_raw = own_text(&name_el);
    if name_raw.is_empty() {
        return ParseOutcome::NotCard;
    }
    let pronounce = select_first(&name_el, "span")
        .map(element_text)
        .unwrap_or_default();

    let fields = data_fields(&container);

    let Some(card_type) = fields.get(LABEL_CARD_TYPE).cloned() else {
        return ParseOutcome::NotCard;
    };
    let Some(color) = fields.get(LABEL_COLOR).cloned() else {
        return ParseOutcome::NotCard;
    };

    let field = |label: &str| fields.get(label).cloned().unwrap_or_else(|| "-".to_string());

    let rarity = select_first(&container, ".cardRarity")
        .map(element_text)
        .unwrap_or_default();
    let skill_text = select_first(&container, ".cardSkill")
        .map(element_text)
        .unwrap_or_default();

    let lb_text = field(LABEL_LIFE_BURST);
    let has_lb = lb_text != "-" && !lb_text.is_empty();

    let (product_no, sort) = split_slug(&slug);

    // Normalization happens here, when the fields are composed into the
    // final record, not piecemeal during extraction.
    ParseOutcome::Card(CardRecord {
        name: normalize_name(&name_raw),
        pronounce,
        card_type: zenkaku_to_hankaku(&card_type),
        color,
        level: zenkaku_to_hankaku(&field(LABEL_LEVEL)),
        power: zenkaku_to_hankaku(&field(LABEL_POWER)),
        cost: zenkaku_to_hankaku(&field(LABEL_COST)),
        limit: zenkaku_to_hankaku(&field(LABEL_LIMIT)),
        rarity,
        format: parse_format(&field(LABEL_FORMAT)),
        lb_text,
        has_lb,
        product_no,
        skill_text,
        story: fields.get(LABEL_STORY).cloned().unwrap_or_default(),
        sort,
        slug,
    })
}

/// Maps the format label to its numeric tier: 3 = diva, 2 = key, 1 = all
fn parse_format(label: &str) -> i64 {
    if label.contains("ディーヴァ") {
        3
    } else if label.contains("キー") {
        2
    } else {
        1
    }
}

/// Derives the product number and a sort hint from the card number
///
/// "WXDi-P01-001" → ("WXDi-P01", 1). A slug without a numeric tail sorts
/// as 0.
fn split_slug(slug: &str) -> (String, i64) {
    match slug.rsplit_once('-') {
        Some((product, tail)) => {
            let digits: String = tail.chars().filter(|c| c.is_ascii_digit()).collect();
            (product.to_string(), digits.parse().unwrap_or(0))
        }
        None => (slug.to_string(), 0),
    }
}

/// Collects the dt/dd pairs of the card data table into a label → value map
fn data_fields(container: &ElementRef) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    let Ok(dt_sel) = Selector::parse("dl.cardData dt") else {
        return fields;
    };
    let Ok(dd_sel) = Selector::parse("dl.cardData dd") else {
        return fields;
    };

    for (dt, dd) in container.select(&dt_sel).zip(container.select(&dd_sel)) {
        fields.insert(element_text(dt), element_text(dd));
    }

    fields
}

fn select_first<'a>(scope: &ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(selector).ok()?;
    scope.select(&sel).next()
}

/// All descendant text, trimmed
fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Only the element's own text nodes, skipping child elements such as the
/// pronounce span inside the name
fn own_text(element: &ElementRef) -> String {
    element
        .children()
        .filter_map(|node| node.value().as_text().map(|t| t.to_string()))
        .collect::<String>()
        .trim()
        .to_string()
}
