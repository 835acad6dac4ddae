//! Text rendering for materialized query results.
//!
//! The flattened form is the toolkit's only result surface: comma-joined
//! column names on the first line, then one line per row with values
//! comma-joined in column order.

use arrow_array::{
    Array, BinaryArray, BooleanArray, Date32Array, Date64Array, Decimal128Array, Float32Array,
    Float64Array, Int16Array, Int32Array, Int64Array, Int8Array, LargeBinaryArray,
    LargeStringArray, RecordBatch, StringArray, TimestampMicrosecondArray,
    TimestampMillisecondArray, TimestampNanosecondArray, TimestampSecondArray, UInt16Array,
    UInt32Array, UInt64Array, UInt8Array,
};
use arrow_schema::{DataType, SchemaRef, TimeUnit};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

/// Flatten a result to text.
///
/// Rows of arity one render as their sole value; wider rows comma-join
/// their values. An empty result is just the header line.
pub fn flatten(schema: &SchemaRef, batches: &[RecordBatch]) -> String {
    let header = schema
        .fields()
        .iter()
        .map(|field| field.name().as_str())
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = Vec::new();
    for batch in batches {
        for row in 0..batch.num_rows() {
            let mut values = Vec::with_capacity(batch.num_columns());
            for col in 0..batch.num_columns() {
                values.push(array_value_to_string(batch.column(col).as_ref(), row));
            }
            let line = if values.len() == 1 {
                values.pop().unwrap_or_default()
            } else {
                values.join(",")
            };
            lines.push(line);
        }
    }

    format!("{}\n{}", header, lines.join("\n"))
}

macro_rules! render_value {
    ($column:expr, $row:expr, $array:ty) => {{
        let arr = $column.as_any().downcast_ref::<$array>().unwrap();
        arr.value($row).to_string()
    }};
}

/// Convert one Arrow value to its printable form. Nulls render as "NULL".
pub fn array_value_to_string(column: &dyn Array, row_idx: usize) -> String {
    if column.is_null(row_idx) {
        return "NULL".to_string();
    }

    match column.data_type() {
        DataType::Boolean => render_value!(column, row_idx, BooleanArray),
        DataType::Int8 => render_value!(column, row_idx, Int8Array),
        DataType::Int16 => render_value!(column, row_idx, Int16Array),
        DataType::Int32 => render_value!(column, row_idx, Int32Array),
        DataType::Int64 => render_value!(column, row_idx, Int64Array),
        DataType::UInt8 => render_value!(column, row_idx, UInt8Array),
        DataType::UInt16 => render_value!(column, row_idx, UInt16Array),
        DataType::UInt32 => render_value!(column, row_idx, UInt32Array),
        DataType::UInt64 => render_value!(column, row_idx, UInt64Array),
        DataType::Float32 => render_value!(column, row_idx, Float32Array),
        DataType::Float64 => render_value!(column, row_idx, Float64Array),
        DataType::Utf8 => render_value!(column, row_idx, StringArray),
        DataType::LargeUtf8 => render_value!(column, row_idx, LargeStringArray),
        DataType::Binary => {
            let arr = column.as_any().downcast_ref::<BinaryArray>().unwrap();
            binary_bytes_to_string(arr.value(row_idx))
        }
        DataType::LargeBinary => {
            let arr = column.as_any().downcast_ref::<LargeBinaryArray>().unwrap();
            binary_bytes_to_string(arr.value(row_idx))
        }
        DataType::Date32 => {
            let arr = column.as_any().downcast_ref::<Date32Array>().unwrap();
            let days = arr.value(row_idx) as i64;
            let date = NaiveDate::from_ymd_opt(1970, 1, 1)
                .unwrap()
                .checked_add_signed(TimeDelta::days(days))
                .unwrap();
            date.format("%Y-%m-%d").to_string()
        }
        DataType::Date64 => {
            let arr = column.as_any().downcast_ref::<Date64Array>().unwrap();
            let secs = arr.value(row_idx) / 1000;
            let date = DateTime::<Utc>::from_timestamp(secs, 0)
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
                .date_naive();
            date.format("%Y-%m-%d").to_string()
        }
        DataType::Decimal128(_, scale) => {
            let arr = column.as_any().downcast_ref::<Decimal128Array>().unwrap();
            format_decimal(arr.value(row_idx), *scale)
        }
        DataType::Timestamp(unit, _) => {
            let micros = match unit {
                TimeUnit::Second => {
                    let arr = column
                        .as_any()
                        .downcast_ref::<TimestampSecondArray>()
                        .unwrap();
                    arr.value(row_idx) * 1_000_000
                }
                TimeUnit::Millisecond => {
                    let arr = column
                        .as_any()
                        .downcast_ref::<TimestampMillisecondArray>()
                        .unwrap();
                    arr.value(row_idx) * 1_000
                }
                TimeUnit::Microsecond => {
                    let arr = column
                        .as_any()
                        .downcast_ref::<TimestampMicrosecondArray>()
                        .unwrap();
                    arr.value(row_idx)
                }
                TimeUnit::Nanosecond => {
                    let arr = column
                        .as_any()
                        .downcast_ref::<TimestampNanosecondArray>()
                        .unwrap();
                    arr.value(row_idx) / 1_000
                }
            };
            format_timestamp(micros)
        }
        _ => format!("{:?}", column),
    }
}

fn binary_bytes_to_string(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => format!("{:?}", bytes),
    }
}

fn format_decimal(value: i128, scale: i8) -> String {
    if scale <= 0 {
        return value.to_string();
    }
    let divisor = 10i128.pow(scale as u32);
    let integer = value / divisor;
    let fraction = (value % divisor).abs();
    format!("{}.{:0width$}", integer, fraction, width = scale as usize)
}

fn format_timestamp(micros: i64) -> String {
    let dt = DateTime::from_timestamp_micros(micros).unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    dt.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow_schema::{Field, Schema};

    use super::*;

    fn batch_of(fields: Vec<Field>, columns: Vec<Arc<dyn Array>>) -> (SchemaRef, RecordBatch) {
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), columns).expect("should build batch");
        (schema, batch)
    }

    #[test]
    fn test_single_column_rows_render_bare() {
        let (schema, batch) = batch_of(
            vec![Field::new("id", DataType::Int64, false)],
            vec![Arc::new(Int64Array::from(vec![1, 2, 3]))],
        );
        assert_eq!(flatten(&schema, &[batch]), "id\n1\n2\n3");
    }

    #[test]
    fn test_multi_column_rows_comma_join_in_column_order() {
        let (schema, batch) = batch_of(
            vec![
                Field::new("id", DataType::Int64, false),
                Field::new("name", DataType::Utf8, false),
            ],
            vec![
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(StringArray::from(vec!["alice", "bob"])),
            ],
        );
        assert_eq!(flatten(&schema, &[batch]), "id,name\n1,alice\n2,bob");
    }

    #[test]
    fn test_empty_result_is_header_line_only() {
        let schema: SchemaRef = Arc::new(Schema::new(vec![Field::new(
            "name",
            DataType::Utf8,
            false,
        )]));
        assert_eq!(flatten(&schema, &[]), "name\n");
    }

    #[test]
    fn test_null_renders_as_null_marker() {
        let arr = Int64Array::from(vec![Some(7), None]);
        assert_eq!(array_value_to_string(&arr, 0), "7");
        assert_eq!(array_value_to_string(&arr, 1), "NULL");
    }

    #[test]
    fn test_decimal_rendering_applies_scale() {
        assert_eq!(format_decimal(12345, 2), "123.45");
        assert_eq!(format_decimal(-12345, 2), "-123.45");
        assert_eq!(format_decimal(42, 0), "42");
    }

    #[test]
    fn test_date32_renders_iso_date() {
        let arr = Date32Array::from(vec![0, 19723]);
        assert_eq!(array_value_to_string(&arr, 0), "1970-01-01");
        assert_eq!(array_value_to_string(&arr, 1), "2024-01-01");
    }
}
