//! Minimal HTML projection of card view-models.
//!
//! # Responsibility
//! - Own the escaping contract: every user-supplied field is untrusted
//!   display text and is neutralized before it touches markup.
//! - Emit a small self-contained fragment per door that hosts can style
//!   and wire however they like.
//!
//! # Invariants
//! - Markup-significant characters in content render as literal text.
//! - Line breaks inside `text` stay visually significant (`<br>`).

use crate::model::card::CardViewModel;

/// Escapes markup-significant characters in display text.
///
/// Line breaks survive escaping; converting them into visual breaks is the
/// fragment builder's job.
pub fn escape_display_text(value: &str) -> String {
    html_escape::encode_text(value).into_owned()
}

/// Renders one door as a self-contained HTML fragment.
///
/// The fragment carries the door state as classes (`locked`, `revealed`)
/// and the day key as `data-day`, which is all a host needs to attach the
/// activation interaction.
pub fn card_fragment(card: &CardViewModel) -> String {
    let mut classes = String::from("door");
    if card.locked {
        classes.push_str(" locked");
    }
    if card.revealed {
        classes.push_str(" revealed");
    }

    let image_style = if card.image_url.is_empty() {
        String::new()
    } else {
        format!(
            " style=\"background-image: url('{}');\"",
            html_escape::encode_double_quoted_attribute(&card.image_url)
        )
    };

    let person_block = if card.person.is_empty() {
        String::new()
    } else {
        format!(
            "<div class=\"door-person\">&ndash; {}</div>",
            escape_display_text(&card.person)
        )
    };

    format!(
        "<div class=\"{classes}\" data-day=\"{day}\">\
<div class=\"door-front\"><span class=\"day-number\">{day}</span>\
<div class=\"door-image\"{image_style}></div></div>\
<div class=\"door-back\"><div class=\"door-title\">{title}</div>\
<div class=\"door-text\">{text}</div>{person_block}</div>\
</div>",
        day = card.day,
        title = escape_display_text(&card.title),
        text = escape_display_text(&card.text).replace('\n', "<br>"),
    )
}

/// Renders the whole calendar as one grid fragment, day ascending.
pub fn calendar_fragment(cards: &[CardViewModel]) -> String {
    let mut html = String::from("<div class=\"calendar-grid\">");
    for card in cards {
        html.push_str(&card_fragment(card));
    }
    html.push_str("</div>");
    html
}
