//! Schema-driven decoding of the warehouse REST row format.
//!
//! Query responses carry a `schema.fields` list and rows shaped as
//! `{"f": [{"v": ...}, ...]}`, positionally aligned with the schema. This
//! module flattens that into ordinary JSON objects keyed by column name so
//! records can be deserialized with serde.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One column of the response schema.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// The response schema: an ordered field list.
#[derive(Debug, Clone, Deserialize)]
pub struct TableSchema {
    pub fields: Vec<SchemaField>,
}

/// One row: positional cells, each wrapping its value in `"v"`.
#[derive(Debug, Clone, Deserialize)]
pub struct TableRow {
    pub f: Vec<TableCell>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableCell {
    pub v: Value,
}

/// Errors produced while decoding rows against a schema.
#[derive(Debug, thiserror::Error)]
pub enum RowDecodeError {
    #[error("Row has {got} cells but schema has {expected} fields")]
    CellCountMismatch { expected: usize, got: usize },

    #[error("Column {column} of type {field_type} has unparsable value {value}")]
    BadScalar {
        column: String,
        field_type: String,
        value: String,
    },
}

/// Convert positional rows into JSON objects keyed by column name.
///
/// Scalars arrive as strings regardless of declared type; INTEGER, FLOAT,
/// and BOOLEAN columns are converted to native JSON numbers/booleans, and
/// everything else (STRING, DATE, TIMESTAMP, ...) stays a string. NULL cells
/// become JSON null.
pub fn rows_to_objects(
    schema: &TableSchema,
    rows: &[TableRow],
) -> Result<Vec<Value>, RowDecodeError> {
    rows.iter()
        .map(|row| row_to_object(schema, row))
        .collect()
}

fn row_to_object(schema: &TableSchema, row: &TableRow) -> Result<Value, RowDecodeError> {
    if row.f.len() != schema.fields.len() {
        return Err(RowDecodeError::CellCountMismatch {
            expected: schema.fields.len(),
            got: row.f.len(),
        });
    }

    let mut object = Map::with_capacity(schema.fields.len());
    for (field, cell) in schema.fields.iter().zip(&row.f) {
        object.insert(field.name.clone(), decode_cell(field, &cell.v)?);
    }
    Ok(Value::Object(object))
}

fn decode_cell(field: &SchemaField, raw: &Value) -> Result<Value, RowDecodeError> {
    let Value::String(text) = raw else {
        // NULL cells and nested values pass through unchanged.
        return Ok(raw.clone());
    };

    let bad = || RowDecodeError::BadScalar {
        column: field.name.clone(),
        field_type: field.field_type.clone(),
        value: text.clone(),
    };

    match field.field_type.as_str() {
        "INTEGER" | "INT64" => {
            let n: i64 = text.parse().map_err(|_| bad())?;
            Ok(Value::from(n))
        }
        "FLOAT" | "FLOAT64" => {
            let n: f64 = text.parse().map_err(|_| bad())?;
            Ok(Value::from(n))
        }
        "BOOLEAN" | "BOOL" => match text.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(bad()),
        },
        _ => Ok(Value::String(text.clone())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(fields: &[(&str, &str)]) -> TableSchema {
        TableSchema {
            fields: fields
                .iter()
                .map(|(name, field_type)| SchemaField {
                    name: name.to_string(),
                    field_type: field_type.to_string(),
                })
                .collect(),
        }
    }

    fn row(values: Vec<Value>) -> TableRow {
        TableRow {
            f: values.into_iter().map(|v| TableCell { v }).collect(),
        }
    }

    #[test]
    fn decodes_typed_scalars() {
        let schema = schema(&[
            ("id_proposicao", "INTEGER"),
            ("sigla", "STRING"),
            ("relevancia", "FLOAT"),
            ("ativa", "BOOLEAN"),
        ]);
        let rows = vec![row(vec![
            Value::String("42".into()),
            Value::String("PL".into()),
            Value::String("0.5".into()),
            Value::String("true".into()),
        ])];

        let objects = rows_to_objects(&schema, &rows).unwrap();
        assert_eq!(objects[0]["id_proposicao"], 42);
        assert_eq!(objects[0]["sigla"], "PL");
        assert_eq!(objects[0]["relevancia"], 0.5);
        assert_eq!(objects[0]["ativa"], true);
    }

    #[test]
    fn null_cells_become_json_null() {
        let schema = schema(&[("ementa", "STRING")]);
        let rows = vec![row(vec![Value::Null])];

        let objects = rows_to_objects(&schema, &rows).unwrap();
        assert!(objects[0]["ementa"].is_null());
    }

    #[test]
    fn dates_and_timestamps_stay_strings() {
        let schema = schema(&[("dataApresentacao", "TIMESTAMP")]);
        let rows = vec![row(vec![Value::String("2025-03-14T12:00:00Z".into())])];

        let objects = rows_to_objects(&schema, &rows).unwrap();
        assert_eq!(objects[0]["dataApresentacao"], "2025-03-14T12:00:00Z");
    }

    #[test]
    fn cell_count_mismatch_is_an_error() {
        let schema = schema(&[("a", "STRING"), ("b", "STRING")]);
        let rows = vec![row(vec![Value::String("only one".into())])];

        assert!(matches!(
            rows_to_objects(&schema, &rows),
            Err(RowDecodeError::CellCountMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn unparsable_integer_is_an_error() {
        let schema = schema(&[("numero", "INTEGER")]);
        let rows = vec![row(vec![Value::String("abc".into())])];

        assert!(matches!(
            rows_to_objects(&schema, &rows),
            Err(RowDecodeError::BadScalar { .. })
        ));
    }
}
