//! Tag normalization and prefix-based classification.

use crate::model::ComponentType;
use regex::Regex;
use std::sync::OnceLock;

/// Ordered classification table. First match wins, so longer prefixes
/// that share leading letters with shorter ones are listed first.
const TAG_RULES: &[(ComponentType, &str)] = &[
    // 3-letter control valves
    (ComponentType::ControlFlow, r"^FCV-?\d+"),
    (ComponentType::ControlLevel, r"^LCV-?\d+"),
    (ComponentType::ControlTemp, r"^TCV-?\d+"),
    (ComponentType::ControlPressure, r"^PCV-?\d+"),
    // Safety / relief
    (ComponentType::Safety, r"^(?:PSV|PRV)-?\d+"),
    // 2-letter valves
    (ComponentType::Gate, r"^VG-?\d+"),
    (ComponentType::Check, r"^VC-?\d+"),
    (ComponentType::Ball, r"^VB-?\d+"),
    (ComponentType::Line, r"^VL-?\d+"),
    (ComponentType::Hand, r"^HV-?\d+"),
    (ComponentType::Shutoff, r"^XV-?\d+"),
    // Instruments: 4-letter, then 3-letter, then 2-letter functions
    (
        ComponentType::Instrument,
        concat!(
            r"^(?:PSHH|PSLL|TSHH|TSLL|LSHH|LSLL|PDIC|PDIT",
            r"|PIT|TIT|FIT|LIT|PIC|TIC|FIC|LIC|AIT|PDI|PDT",
            r"|PSH|PSL|TSH|TSL|FSH|FSL|LSH|LSL|FQI|ZSO|ZSC",
            r"|PI|TI|FI|LI|PT|TT|FT|LT|PS|TS|FS|LS|PG|TE|TW|FE|FO|LG",
            r"|AI|AT|ZI|ZT|VT|SI|ST|HS|II|IT|JI|JT|WI|WT)-?\d+"
        ),
    ),
    // Equipment: 2-letter before 1-letter
    (ComponentType::Equipment, r"^(?:PP|TK|HE|FN|M|B|C|E)-?\d+"),
];

fn compiled_rules() -> &'static [(ComponentType, Regex)] {
    static RULES: OnceLock<Vec<(ComponentType, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        TAG_RULES
            .iter()
            .map(|(t, pattern)| {
                let re = Regex::new(&format!("(?i){}", pattern)).expect("static tag pattern");
                (*t, re)
            })
            .collect()
    })
}

fn mtext_codes() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\[A-Za-z][^;\\{}]*;|\\P|[{}]").expect("static mtext pattern"))
}

/// Canonicalize raw drawing text into a tag.
///
/// Removes MTEXT formatting codes and braces, drops all whitespace and
/// upper-cases the rest.
pub fn normalize_tag(raw: &str) -> String {
    let stripped = mtext_codes().replace_all(raw, "");
    stripped
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Classify a normalized tag. Returns `Unknown` when no rule matches.
pub fn classify_tag(tag: &str) -> ComponentType {
    compiled_rules()
        .iter()
        .find(|(_, re)| re.is_match(tag))
        .map(|(t, _)| *t)
        .unwrap_or(ComponentType::Unknown)
}

/// Leading alphabetic prefix of a tag (`"FCV-101"` -> `"FCV"`).
pub fn tag_prefix(tag: &str) -> &str {
    let end = tag
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(tag.len());
    &tag[..end]
}

/// Lookup key that ignores case, whitespace and hyphens.
pub fn tag_key(tag: &str) -> String {
    normalize_tag(tag).replace('-', "")
}

/// Line valves double as drain/vent points.
pub fn is_drain_tag(tag: &str) -> bool {
    tag.starts_with("VL")
}
