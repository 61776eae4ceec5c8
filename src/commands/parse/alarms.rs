use super::*;

/// Alarm names that only reserve a number.
const PLACEHOLDER_NAMES: &[&str] = &["n/a", "reserved", "vendor-specific"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NotificationTable {
    Alarms(AlarmTable),
    ThresholdAlerts(ThresholdAlertTable),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlarmKey {
    Number(u8),
    /// Footnotes and range statements such as `208..223`.
    Skip,
}

/// Decodes an alarm table, or a threshold crossing alert table when its
/// third column names the threshold attribute. Returns `None` when any row
/// cannot be interpreted.
pub(crate) fn decode_alarm_table(table: &Table) -> Option<NotificationTable> {
    if table.rows.is_empty() {
        return None;
    }

    // Four physical columns under a three-cell heading: the merged last
    // column repeats its neighbour.
    let normalized;
    let table = if table.num_columns == 4 {
        normalized = match try_normalize_table(table, 3, MergePolicy::CollapseRepeats) {
            Ok(normalized) => normalized,
            Err((_, err)) => {
                warn!(
                    table = table.doc_table_number,
                    title = %table.title(),
                    error = %err,
                    "alarm table cannot be normalized"
                );
                return None;
            }
        };
        if normalized.rows.is_empty() {
            return None;
        }
        &normalized
    } else {
        table
    };

    let mut alarms = AlarmTable::default();
    for (row_number, row) in table.rows.iter().enumerate() {
        if row.values().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let number = first_filled(row, &["Alarm number", "Number", "Alarm"]);
        let name = Table::cell(row, "Alarm");
        let description = Table::cell(row, "Description");
        let threshold = Table::cell(row, "Threshold crossing alert");

        let Some(number) = number else {
            return reject(table, row_number, "no alarm number column");
        };
        if name.is_none() && threshold.is_none() {
            return reject(table, row_number, "no alarm name column");
        }

        if row_number == 0 && description.is_none() && has_threshold_column(table) {
            return decode_threshold_alert_table(table).map(NotificationTable::ThresholdAlerts);
        }
        let Some(name) = name else {
            return reject(table, row_number, "no alarm name column");
        };

        match alarm_key(number) {
            None => return reject(table, row_number, "alarm number outside 0..=223"),
            Some(AlarmKey::Skip) => continue,
            Some(AlarmKey::Number(value)) => {
                if is_placeholder(name) {
                    continue;
                }
                if alarms.alarms.contains_key(&value) {
                    return reject(table, row_number, "alarm number defined twice");
                }
                alarms.alarms.insert(
                    value,
                    AlarmEntry {
                        name: name.trim().to_string(),
                        description: description.unwrap_or_default().trim().to_string(),
                    },
                );
            }
        }
    }
    Some(NotificationTable::Alarms(alarms))
}

pub(crate) fn decode_threshold_alert_table(table: &Table) -> Option<ThresholdAlertTable> {
    if table.rows.is_empty() || table.heading.len() < 3 {
        return None;
    }

    let mut alerts = ThresholdAlertTable::default();
    for (row_number, row) in table.rows.iter().enumerate() {
        if row.values().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let (Some(number), Some(name), Some(threshold)) = (
            Table::cell(row, &table.heading[0]),
            Table::cell(row, &table.heading[1]),
            Table::cell(row, &table.heading[2]),
        ) else {
            return reject(table, row_number, "threshold alert row is missing a column");
        };

        match alarm_key(number) {
            None => return reject(table, row_number, "alarm number outside 0..=223"),
            Some(AlarmKey::Skip) => continue,
            Some(AlarmKey::Number(value)) => {
                if is_placeholder(name) {
                    continue;
                }
                if alerts.alerts.contains_key(&value) {
                    return reject(table, row_number, "alarm number defined twice");
                }
                alerts.alerts.insert(
                    value,
                    ThresholdAlert {
                        name: name.trim().to_string(),
                        threshold: threshold.trim().to_string(),
                    },
                );
            }
        }
    }
    Some(alerts)
}

fn has_threshold_column(table: &Table) -> bool {
    if table.num_columns <= 2 {
        return false;
    }
    table.heading.get(2).is_some_and(|heading| {
        let heading = heading.to_lowercase();
        heading.contains("threshold value attribute") || heading.contains("threshold data counter")
    })
}

fn first_filled<'a>(row: &'a TableRow, columns: &[&str]) -> Option<&'a str> {
    let mut last = None;
    for column in columns {
        if let Some(cell) = Table::cell(row, column) {
            if !cell.trim().is_empty() {
                return Some(cell);
            }
            last = Some(cell);
        }
    }
    last
}

fn is_placeholder(name: &str) -> bool {
    let name = name.trim().to_lowercase();
    PLACEHOLDER_NAMES.contains(&name.as_str())
}

fn alarm_key(number: &str) -> Option<AlarmKey> {
    let number = number.trim();
    if let Ok(value) = number.parse::<i64>() {
        return alarm_number(value).map(AlarmKey::Number);
    }

    let lower = number.to_ascii_lowercase();
    if lower.starts_with("note") {
        return Some(AlarmKey::Skip);
    }
    if lower.ends_with("(note)") {
        let prefix = number[..number.len() - "(note)".len()].trim();
        if let Ok(value) = prefix.parse::<i64>() {
            return alarm_number(value).map(AlarmKey::Number);
        }
    }

    let bounds = number
        .split_once("..")
        .or_else(|| number.split_once('.'))?;
    let low = bounds.0.trim().parse::<i64>().ok().and_then(alarm_number)?;
    let high = bounds.1.trim().parse::<i64>().ok().and_then(alarm_number)?;
    debug!(low, high, "alarm range statement skipped");
    Some(AlarmKey::Skip)
}

fn alarm_number(value: i64) -> Option<u8> {
    u8::try_from(value)
        .ok()
        .filter(|number| *number <= MAX_ALARM_NUMBER)
}

fn reject<T>(table: &Table, row: usize, reason: &str) -> Option<T> {
    warn!(
        table = table.doc_table_number,
        title = %table.title(),
        row,
        reason,
        "notification table rejected"
    );
    None
}
