//! Tabular view over experiment data rows.
//!
//! [`DataTable`] reshapes a batch of [`DataRow`]s into a column-ordered
//! grid, the shape analysis tooling expects. Standard columns lead,
//! custom columns follow in the order they first appear across the
//! batch, and rows missing a custom column hold JSON null in that cell.

use serde_json::Value as JsonValue;

use crate::models::DataRow;

/// Fixed columns every experiment table carries, in render order.
pub(crate) const STANDARD_COLUMNS: [&str; 5] = [
    "id",
    "experiment_uuid",
    "participant_id",
    "created_at",
    "updated_at",
];

/// Column-ordered grid built from data rows.
#[derive(Clone, Debug, PartialEq)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<JsonValue>>,
}

impl DataTable {
    /// Builds a table from a batch of rows.
    ///
    /// An empty batch yields a table with the standard header and no rows.
    pub fn from_rows(rows: &[DataRow]) -> Self {
        let mut columns: Vec<String> = STANDARD_COLUMNS.iter().map(|name| name.to_string()).collect();
        for row in rows {
            for name in row.values.keys() {
                if !columns.iter().any(|col| col == name) {
                    columns.push(name.clone());
                }
            }
        }

        let grid = rows
            .iter()
            .map(|row| columns.iter().map(|column| cell(row, column)).collect())
            .collect();

        Self {
            columns,
            rows: grid,
        }
    }

    /// Column names in render order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a row view by index.
    pub fn row(&self, index: usize) -> Option<TableRow<'_>> {
        let values = self.rows.get(index)?;
        Some(TableRow {
            columns: &self.columns,
            values,
        })
    }

    /// Iterates over row views in order.
    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows.iter().map(|values| TableRow {
            columns: &self.columns,
            values,
        })
    }
}

fn cell(row: &DataRow, column: &str) -> JsonValue {
    match column {
        "id" => JsonValue::from(row.id),
        "experiment_uuid" => JsonValue::from(row.experiment_uuid.clone()),
        "participant_id" => JsonValue::from(row.participant_id.clone()),
        "created_at" => JsonValue::from(row.created_at.to_rfc3339()),
        "updated_at" => JsonValue::from(row.updated_at.to_rfc3339()),
        custom => row.values.get(custom).cloned().unwrap_or(JsonValue::Null),
    }
}

/// Lightweight row view for name-based access helpers.
#[derive(Debug)]
pub struct TableRow<'a> {
    /// Table columns aligned with `values`.
    pub columns: &'a [String],
    /// Row cells aligned with `columns`.
    pub values: &'a [JsonValue],
}

impl<'a> TableRow<'a> {
    /// Returns a cell by case-insensitive column name.
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        let idx = self
            .columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))?;
        self.values.get(idx)
    }

    /// Returns an integer cell by column name.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name)?.as_i64()
    }

    /// Returns a float cell by column name.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_f64()
    }

    /// Returns a text cell by column name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    /// Returns a boolean cell by column name.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::models::DataRow;

    use super::{DataTable, STANDARD_COLUMNS};

    fn row(id: i64, extra: serde_json::Value) -> DataRow {
        let mut body = json!({
            "id": id,
            "experiment_uuid": "4f6c0b5e-0000-0000-0000-000000000000",
            "participant_id": "p-001",
            "created_at": "2026-02-11T14:00:00Z",
            "updated_at": "2026-02-11T14:00:00Z",
        });
        if let (Some(target), Some(source)) = (body.as_object_mut(), extra.as_object()) {
            for (key, value) in source {
                target.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value(body).expect("must deserialize row")
    }

    #[test]
    fn standard_columns_lead_and_customs_follow() {
        let table = DataTable::from_rows(&[
            row(1, json!({"reaction_ms": 412, "stimulus": "red"})),
            row(2, json!({"correct": true, "reaction_ms": 388})),
        ]);
        let expected: Vec<&str> = STANDARD_COLUMNS
            .iter()
            .copied()
            .chain(["reaction_ms", "stimulus", "correct"])
            .collect();
        assert_eq!(table.columns(), expected.as_slice());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn missing_cells_hold_null() {
        let table = DataTable::from_rows(&[
            row(1, json!({"stimulus": "red"})),
            row(2, json!({})),
        ]);
        let second = table.row(1).expect("must have second row");
        assert_eq!(second.get("stimulus"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn typed_access_is_case_insensitive() {
        let table = DataTable::from_rows(&[row(
            7,
            json!({"reaction_ms": 412, "correct": false, "stimulus": "blue"}),
        )]);
        let first = table.row(0).expect("must have first row");
        assert_eq!(first.get_i64("id"), Some(7));
        assert_eq!(first.get_i64("Reaction_MS"), Some(412));
        assert_eq!(first.get_bool("correct"), Some(false));
        assert_eq!(first.get_str("stimulus"), Some("blue"));
        assert_eq!(first.get_str("Participant_ID"), Some("p-001"));
        assert!(first.get("no_such_column").is_none());
    }

    #[test]
    fn empty_batch_keeps_the_standard_header() {
        let table = DataTable::from_rows(&[]);
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), STANDARD_COLUMNS.len());
        assert!(table.row(0).is_none());
    }
}
