// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.
use arrow::datatypes::{DataType, TimeUnit};

use crate::expr::LiteralValue;

/// Canonical DECIMAL type used by built-in declarations. Coercion treats any
/// `Decimal128` as the same SQL type regardless of precision/scale.
pub const DECIMAL: DataType = DataType::Decimal128(38, 9);

/// Canonical DATETIME type used by built-in declarations.
pub const TIMESTAMP: DataType = DataType::Timestamp(TimeUnit::Microsecond, None);

pub(crate) fn is_integer_type(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
    )
}

pub(crate) fn is_string_like_type(data_type: &DataType) -> bool {
    matches!(data_type, DataType::Utf8 | DataType::LargeUtf8)
}

fn integer_width(data_type: &DataType) -> Option<u8> {
    match data_type {
        DataType::Int8 => Some(1),
        DataType::Int16 => Some(2),
        DataType::Int32 => Some(4),
        DataType::Int64 => Some(8),
        _ => None,
    }
}

fn integer_value(value: &LiteralValue) -> Option<i64> {
    match value {
        LiteralValue::Int32(v) => Some(*v as i64),
        LiteralValue::Int64(v) => Some(*v),
        _ => None,
    }
}

fn fits_integer(value: i64, target: &DataType) -> bool {
    match target {
        DataType::Int8 => i8::try_from(value).is_ok(),
        DataType::Int16 => i16::try_from(value).is_ok(),
        DataType::Int32 => i32::try_from(value).is_ok(),
        DataType::Int64 => true,
        _ => false,
    }
}

/// Whether a value of `from` can safely be used where `to` is expected.
pub fn is_coercible(from: &DataType, to: &DataType) -> bool {
    is_coercible_with_value(from, to, None)
}

/// Value-sensitive coercibility: a known literal value widens the rules, e.g.
/// a BIGINT literal that fits INT coerces where a BIGINT column would not.
pub fn is_coercible_with_value(
    from: &DataType,
    to: &DataType,
    value: Option<&LiteralValue>,
) -> bool {
    if from == to {
        return true;
    }
    if matches!(from, DataType::Null) {
        return true;
    }
    match (from, to) {
        (f, t) if is_integer_type(f) && is_integer_type(t) => {
            if integer_width(f) <= integer_width(t) {
                return true;
            }
            match value.and_then(integer_value) {
                Some(v) => fits_integer(v, t),
                None => false,
            }
        }
        (f, DataType::Float32 | DataType::Float64 | DataType::Decimal128(_, _))
            if is_integer_type(f) =>
        {
            true
        }
        (DataType::Float32, DataType::Float64) => true,
        (DataType::Float64, DataType::Decimal128(_, _)) => true,
        (DataType::Decimal128(_, _), DataType::Decimal128(_, _)) => true,
        (DataType::Decimal128(_, _), DataType::Float64) => true,
        (DataType::Date32, DataType::Timestamp(_, _)) => true,
        (f, t) if is_string_like_type(f) && is_string_like_type(t) => true,
        _ => false,
    }
}

/// User-facing SQL name for a type, used in diagnostics.
pub fn sql_type_name(data_type: &DataType) -> &'static str {
    match data_type {
        DataType::Null => "NULL",
        DataType::Boolean => "BOOLEAN",
        DataType::Int8 => "TINYINT",
        DataType::Int16 => "SMALLINT",
        DataType::Int32 => "INTEGER",
        DataType::Int64 => "BIGINT",
        DataType::Float32 => "FLOAT",
        DataType::Float64 => "DOUBLE",
        DataType::Decimal128(_, _) => "DECIMAL",
        DataType::Utf8 | DataType::LargeUtf8 => "VARCHAR",
        DataType::Date32 => "DATE",
        DataType::Timestamp(_, _) => "TIMESTAMP",
        _ => "UNSUPPORTED",
    }
}

/// Render a type list the way argument mismatches report it: `[DECIMAL, DOUBLE]`.
pub fn format_types(types: &[DataType]) -> String {
    let names: Vec<&str> = types.iter().map(sql_type_name).collect();
    format!("[{}]", names.join(", "))
}
