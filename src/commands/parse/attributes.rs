use super::*;

/// Names that introduce a new attribute even though their paragraph uses the
/// "Attribute follower" style.
const FOLLOWER_ATTRIBUTE_NAMES: &[&str] = &[
    "aal5 profile pointer",
    "deprecated 3",
    "grandmaster id:",
    "steps removed:",
    "time source:",
];

/// Document typo repairs applied, in order, to title-cased attribute names.
const NAME_FIXUPS: &[(&str, &str)] = &[
    ("N Umber", "Number"),
    ("C Ounter", "Counter"),
    ("C Ontrol", "Control"),
    ("P Ointer", "Pointer"),
    ("T Ime", "Time"),
    ("B Lock", "Block"),
    ("R Evision", "Revision"),
    ("A Dditional", "Additional"),
    ("D Ate", "Date"),
    ("N Ame", "Name"),
    ("P Art", "Part"),
    ("1 St", "1st"),
    ("2 Nd", "2nd"),
    ("3 Rd", "3rd"),
    ("4 Th", "4th"),
    ("1St", "1st"),
    ("2Nd", "2nd"),
    ("3Rd", "3rd"),
    ("4Th", "4th"),
    ("1 /2", "1/2"),
    ("1/ 2", "1/2"),
    ("1 _2", "1_2"),
    ("1_ 2", "1_2"),
    ("C=0+1", "C01"),
    ("C-= 0", "C0"),
    ("/", "_"),
    ("-", "_"),
    ("C_= 0", "C0"),
    ("+", "_"),
    ("Packets, Usable", "Packets Usable"),
    (",", " "),
    ("T Cont", "TCont"),
    ("R Eporting", "Reporting"),
    ("I Ndication", "Indication"),
    ("H Ook", "Hook"),
    ("R Eset", "Reset"),
    ("R'S'", "R S"),
    ("I Nterval", "Interval"),
    ("M Essage", "Message"),
    ("M Ulticast", "Multicast"),
    ("T Ype", "Type"),
    ("F Ail", "Fail"),
    ("P Ayload", "Payload"),
    ("M Anagement", "Management"),
    ("Battery B Ackup", "Battery Backup"),
    ("O Ption", "Option"),
    ("U Nit", "Unit"),
    ("B It", "Bit"),
    ("FailThreshold", "Fail Threshold"),
    ("Failthreshold", "Fail Threshold"),
    ("DegradeThreshold", "Degrade Threshold"),
    ("LineClass", "Line Class"),
    ("Lineclass", "Line Class"),
    ("\"leftr\"", "leftr"),
    ("\"Leftr\"", "Leftr"),
    (" Sd ", " "),
    ("\"", ""),
];

/// Access lists spelled in ways the keyword split cannot read.
const ACCESS_SYNONYMS: &[(&str, &str)] = &[
    ("rwsc", "r, w, setbycreate"),
    ("r, w setbycreate", "r, w, setbycreate"),
    (
        "r,w if applicable, setbycreate if applicable",
        "r, w, setbycreate",
    ),
];

/// Whether `paragraph` opens a new attribute rather than continuing the
/// description of the previous one.
pub(crate) fn starts_attribute(paragraph: &Paragraph) -> bool {
    if !paragraph.is_bold() {
        return false;
    }

    match paragraph.style_name.to_lowercase().as_str() {
        "attribute list" => false,
        "attribute follower" => {
            let lead = paragraph
                .text
                .chars()
                .take(80)
                .collect::<String>()
                .to_lowercase();
            FOLLOWER_ATTRIBUTE_NAMES
                .iter()
                .any(|name| lead.contains(name))
        }
        _ => true,
    }
}

pub(crate) fn create_attribute(paragraph: &Paragraph, lexicon: &Lexicon) -> Option<Attribute> {
    if !starts_attribute(paragraph) {
        return None;
    }

    let mut attribute = Attribute::named(attribute_name(&paragraph.bold_text(), lexicon));
    attribute.description.push(paragraph.index);
    attribute.deprecated = attribute.name.to_lowercase().starts_with("deprecated");
    Some(attribute)
}

/// Builds an attribute name from the bold lead-in of its paragraph: text up
/// to the first ':', without parenthesized qualifiers, title-cased.
pub(crate) fn attribute_name(bold_text: &str, lexicon: &Lexicon) -> String {
    let text = ascii_only(bold_text);
    let head = text.split(':').next().unwrap_or_default();
    let scrubbed = lexicon.paren_group.replace_all(head, " ");

    let mut name = title_case(&collapse_whitespace(&scrubbed));
    for (from, to) in NAME_FIXUPS {
        name = name.replace(from, to);
    }
    collapse_whitespace(&name.replace(['(', ')', ':'], " "))
}

/// Reads the mandatory/optional flag, access set and size from the
/// parenthesized groups of an attribute paragraph.
pub(crate) fn apply_attribute_settings(
    attribute: &mut Attribute,
    paragraph: &Paragraph,
    lexicon: &Lexicon,
) {
    let text = paragraph.ascii_text();
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !attribute.description.contains(&paragraph.index) {
        attribute.description.push(paragraph.index);
        attribute.description.sort_unstable();
    }

    let items = lexicon.paren_items(text);
    if items.len() < 3 {
        return;
    }

    for item in items {
        let lower = item.trim().to_lowercase();
        match lower.as_str() {
            "all zero bytes" => return,
            "mandatory" => {
                set_optional(attribute, false);
                continue;
            }
            "optional" => {
                set_optional(attribute, true);
                continue;
            }
            _ => {}
        }

        if let Some(access) = decode_access(item, &attribute.name) {
            set_access(attribute, access);
            continue;
        }

        if let Some(size) = decode_size(item) {
            if let Some(previous) = &attribute.size {
                debug!(
                    attribute = %attribute.name,
                    previous = ?previous.octets,
                    current = ?size.octets,
                    "attribute size restated"
                );
            }
            attribute.size = Some(size);
        }
    }
}

fn set_optional(attribute: &mut Attribute, optional: bool) {
    match attribute.optional {
        Some(existing) if existing != optional => {
            warn!(
                attribute = %attribute.name,
                existing,
                ignored = optional,
                "conflicting mandatory/optional flag"
            );
        }
        _ => attribute.optional = Some(optional),
    }
}

fn set_access(attribute: &mut Attribute, access: BTreeSet<AttributeAccess>) {
    if attribute.access.is_empty() {
        attribute.access = access;
    } else if attribute.access != access {
        warn!(
            attribute = %attribute.name,
            existing = ?attribute.access,
            ignored = ?access,
            "conflicting access list"
        );
    }
}

/// Decodes an access list such as `R, W, Set-by-create`. Returns `None` when
/// no token is an access keyword; unknown tokens alongside known ones are
/// reported and skipped.
pub(crate) fn decode_access(item: &str, attribute_name: &str) -> Option<BTreeSet<AttributeAccess>> {
    let mut text = item.replace('-', "").trim().to_lowercase();
    if let Some((_, replacement)) = ACCESS_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == text)
    {
        text = (*replacement).to_string();
    }

    let tokens = text
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect::<Vec<&str>>();
    if !tokens
        .iter()
        .any(|token| matches!(*token, "r" | "w" | "setbycreate"))
    {
        return None;
    }

    let mut access = BTreeSet::new();
    for token in tokens {
        match token {
            "r" => {
                access.insert(AttributeAccess::Read);
            }
            "w" => {
                access.insert(AttributeAccess::Write);
            }
            token if token.starts_with("setbycreate") => {
                access.insert(AttributeAccess::SetByCreate);
            }
            other => warn!(attribute = %attribute_name, token = %other, "unknown access keyword"),
        }
    }
    Some(access)
}
