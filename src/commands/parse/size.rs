use super::*;

/// Longest text still treated as a size when it does not spell out "bytes".
const SHORT_SIZE_LIMIT: usize = 14;

/// Row-multiplier size forms whose length is only known at run time.
const UNBOUNDED_BYTE_FORMS: &[&str] = &[
    "m bytes", "m-bytes", "n bytes", "n-bytes", "x bytes", "x-bytes", "y bytes", "y-bytes",
    "z bytes", "z-bytes", "mxn-bytes", "mxn bytes", "m*n bytes",
];

/// Decodes one parenthesized size expression such as `2 bytes`, `4 bits`,
/// `N bytes` or `N * 20 bytes`. Returns `None` for text that is not a size.
pub(crate) fn decode_size(text: &str) -> Option<AttributeSize> {
    let text = text.trim();
    let lower = text.to_ascii_lowercase();

    if lower.contains("note")
        || !(lower.contains("byte") || lower.contains("bit"))
        || (text.len() >= SHORT_SIZE_LIMIT && !lower.contains("bytes"))
    {
        return None;
    }

    if lower.contains("byte") {
        if let Some(octets) = leading_number(text) {
            return Some(AttributeSize::from_octets(octets));
        }
        return decode_symbolic_bytes(text, &lower);
    }

    leading_number(text)
        .and_then(|bits| u32::try_from(bits).ok())
        .map(AttributeSize::from_bits)
}

fn leading_number(text: &str) -> Option<i32> {
    text.replace('-', " ")
        .split(' ')
        .next()
        .and_then(|token| token.parse::<i32>().ok())
}

fn decode_symbolic_bytes(text: &str, lower: &str) -> Option<AttributeSize> {
    if lower.starts_with("n * ") {
        return text
            .split(' ')
            .nth(2)
            .and_then(|token| token.parse::<i32>().ok())
            .map(AttributeSize::from_octets);
    }

    if lower == "n bytes" {
        return Some(AttributeSize::incremental(0));
    }

    // "18N bytes": a fixed multiplier of a row count.
    if let Some(position) = lower.find("n bytes") {
        if let Ok(octets) = text[..position].trim().parse::<i32>() {
            return Some(AttributeSize::from_octets(octets));
        }
    }

    if let Some(position) = lower.find("each row part:") {
        let rest = &text[position + "each row part:".len()..];
        return rest
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<i32>().ok())
            .map(AttributeSize::from_octets);
    }

    if UNBOUNDED_BYTE_FORMS.iter().any(|form| lower.contains(form)) || lower.contains("n rows") {
        return Some(AttributeSize::incremental(0));
    }

    debug!(text = %text, "size expression not decoded");
    None
}
