use super::*;

/// Decodes an attribute value change table. Attribute numbers run from 1 to
/// 16; ranges of reserved numbers are recorded without the AVC flag.
pub(crate) fn decode_avc_table(table: &Table) -> Option<AvcTable> {
    if table.rows.is_empty() {
        return None;
    }

    let mut avcs = AvcTable::default();
    for (row_number, row) in table.rows.iter().enumerate() {
        if row.values().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let (Some(number), Some(name)) = (
            Table::cell(row, "Number"),
            Table::cell(row, "Attribute value change"),
        ) else {
            return reject(table, row_number, "avc row is missing a column");
        };
        let description = Table::cell(row, "Description")
            .unwrap_or_default()
            .trim()
            .to_string();
        let name = name.trim().to_string();
        let placeholder = matches!(name.to_lowercase().as_str(), "n/a" | "reserved");
        let number = number.trim();

        if let Ok(value) = number.parse::<i64>() {
            let lowest = if placeholder { 0 } else { MIN_AVC_NUMBER };
            let Some(value) = avc_number(value, lowest) else {
                return reject(table, row_number, "attribute number outside 1..=16");
            };
            avcs.attributes.insert(
                value,
                AvcEntry {
                    avc: !placeholder,
                    name,
                    description,
                },
            );
            continue;
        }

        if number.to_ascii_lowercase().starts_with("note") {
            continue;
        }

        let Some((low, high)) = number.split_once("..") else {
            return reject(table, row_number, "unreadable attribute number");
        };
        let (Some(low), Some(high)) = (
            low.trim().parse::<i64>().ok().and_then(|v| avc_number(v, 0)),
            high.trim().parse::<i64>().ok().and_then(|v| avc_number(v, 0)),
        ) else {
            return reject(table, row_number, "attribute range outside 0..=16");
        };
        for value in low..=high {
            avcs.attributes.insert(
                value,
                AvcEntry {
                    avc: false,
                    name: name.clone(),
                    description: description.clone(),
                },
            );
        }
    }
    Some(avcs)
}

/// Flags the attributes an AVC table names.
pub(crate) fn apply_avc_flags(attributes: &mut AttributeList, avcs: &AvcTable) {
    for attribute in attributes.iter_mut() {
        if u8::try_from(attribute.index).is_ok_and(|number| avcs.has_avc(number)) {
            attribute.avc = true;
        }
    }
}

fn avc_number(value: i64, lowest: u8) -> Option<u8> {
    u8::try_from(value)
        .ok()
        .filter(|number| (lowest..=MAX_AVC_NUMBER).contains(number))
}

fn reject<T>(table: &Table, row: usize, reason: &str) -> Option<T> {
    warn!(
        table = table.doc_table_number,
        title = %table.title(),
        row,
        reason,
        "avc table rejected"
    );
    None
}
