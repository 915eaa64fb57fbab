use arrow::array::{Array, ArrayRef, AsArray, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use rusqlite::types::Value;

use crate::core::IngestError;

/// SQLite storage class a column is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Real,
    Text,
}

impl SqlType {
    pub fn from_arrow(dtype: &DataType) -> SqlType {
        match dtype {
            DataType::Boolean
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => SqlType::Integer,
            DataType::Float16 | DataType::Float32 | DataType::Float64 => SqlType::Real,
            _ => SqlType::Text,
        }
    }

    pub fn declared(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Text => "TEXT",
        }
    }

    fn arrow_type(&self) -> DataType {
        match self {
            SqlType::Integer => DataType::Int64,
            SqlType::Real => DataType::Float64,
            SqlType::Text => DataType::Utf8,
        }
    }
}

/// An arrow column normalised to one of the three SQLite storage classes.
///
/// Booleans bind as 0/1 and temporal columns bind as their text form.
pub enum SqlColumn {
    Integer(Int64Array),
    Real(Float64Array),
    Text(StringArray),
}

impl SqlColumn {
    pub fn from_array(array: &ArrayRef) -> Result<SqlColumn, IngestError> {
        let sql_type = SqlType::from_arrow(array.data_type());
        let normalised = cast(array.as_ref(), &sql_type.arrow_type())?;
        Ok(match sql_type {
            SqlType::Integer => SqlColumn::Integer(normalised.as_primitive::<Int64Type>().clone()),
            SqlType::Real => SqlColumn::Real(normalised.as_primitive::<Float64Type>().clone()),
            SqlType::Text => SqlColumn::Text(normalised.as_string::<i32>().clone()),
        })
    }

    pub fn value(&self, row: usize) -> Value {
        match self {
            SqlColumn::Integer(a) if a.is_valid(row) => Value::Integer(a.value(row)),
            SqlColumn::Real(a) if a.is_valid(row) => Value::Real(a.value(row)),
            SqlColumn::Text(a) if a.is_valid(row) => Value::Text(a.value(row).to_string()),
            _ => Value::Null,
        }
    }
}

/// Double-quotes an identifier for use in SQL text.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
