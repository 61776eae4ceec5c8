use super::*;

/// How repeated cells are treated while re-chunking a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MergePolicy {
    Keep,
    /// Adjacent identical cells come from one cell merged across physical
    /// rows; only the first is kept.
    CollapseRepeats,
}

/// Rebuilds `table` so each logical row maps onto the first `width`
/// heading cells. On failure the rows recovered so far are returned with the
/// error.
pub(crate) fn try_normalize_table(
    table: &Table,
    width: usize,
    merge: MergePolicy,
) -> Result<Table, (Table, TableError)> {
    let mut normalized = Table {
        doc_table_number: table.doc_table_number,
        table_number: table.table_number.clone(),
        full_title: table.full_title.clone(),
        short_title: table.short_title.clone(),
        num_columns: width,
        heading: table.heading.iter().take(width).cloned().collect(),
        rows: Vec::new(),
    };

    if width == 0 {
        return Err((normalized, TableError::ZeroWidth));
    }
    if normalized.heading.len() < width {
        let found = normalized.heading.len();
        return Err((normalized, TableError::HeadingTooShort { found, width }));
    }

    let mut cells = Vec::new();
    let flattened = flatten_cells(table, width, &mut cells);

    if merge == MergePolicy::CollapseRepeats {
        cells.dedup();
    }
    normalized.rows = chunk_rows(&normalized.heading, cells);

    match flattened {
        Ok(()) => Ok(normalized),
        Err(err) => Err((normalized, err)),
    }
}

/// Appends every data cell in reading order. Heading cells past the target
/// width are data that spilled into the heading row.
fn flatten_cells(table: &Table, width: usize, cells: &mut Vec<String>) -> Result<(), TableError> {
    cells.extend(table.heading.iter().skip(width).cloned());

    for (row_number, row) in table.rows.iter().enumerate() {
        if row.is_empty() {
            continue;
        }
        let columns = if row.len() >= table.num_columns {
            table.num_columns.min(table.heading.len())
        } else {
            row.len()
        };
        if columns > table.heading.len() {
            return Err(TableError::RowWiderThanHeading {
                row: row_number,
                cells: row.len(),
                heading: table.heading.len(),
            });
        }

        for column in &table.heading[..columns] {
            let cell = row.get(column).ok_or_else(|| TableError::MissingCell {
                row: row_number,
                column: column.clone(),
            })?;
            cells.push(cell.clone());
        }
    }
    Ok(())
}

fn chunk_rows(heading: &[String], cells: Vec<String>) -> Vec<TableRow> {
    let width = heading.len();
    if width == 0 {
        return Vec::new();
    }

    cells
        .chunks(width)
        .map(|chunk| {
            heading
                .iter()
                .enumerate()
                .map(|(position, column)| {
                    let text = chunk.get(position).cloned().unwrap_or_default();
                    (column.clone(), text)
                })
                .collect::<TableRow>()
        })
        .collect()
}
