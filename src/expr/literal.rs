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
use arrow::datatypes::DataType;
use chrono::NaiveDate;

use super::LiteralValue;

/// A literal together with the SQL type it resolved to, e.g. a declared
/// default value after coercion to one of its argument's allowed types.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedLiteral {
    pub value: LiteralValue,
    pub data_type: DataType,
}

const UNIX_EPOCH_DAY_OFFSET: i32 = 719163;

fn format_date32(days: i32) -> String {
    match NaiveDate::from_num_days_from_ce_opt(UNIX_EPOCH_DAY_OFFSET + days) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => format!("<date {}>", days),
    }
}

fn format_decimal(value: i128, scale: i8) -> String {
    if scale <= 0 {
        return value.to_string();
    }
    let scale = scale as u32;
    let divisor = 10i128.pow(scale);
    let int_part = value / divisor;
    let frac_part = (value % divisor).abs();
    let sign = if value < 0 && int_part == 0 { "-" } else { "" };
    format!(
        "{}{}.{:0width$}",
        sign,
        int_part,
        frac_part,
        width = scale as usize
    )
}

/// String form of a literal's underlying value, as used by enumeration
/// membership checks and diagnostics.
pub fn value_string(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Null => "NULL".to_string(),
        LiteralValue::Bool(v) => v.to_string(),
        LiteralValue::Int32(v) => v.to_string(),
        LiteralValue::Int64(v) => v.to_string(),
        LiteralValue::Float64(v) => v.to_string(),
        LiteralValue::Decimal128 { value, scale, .. } => format_decimal(*value, *scale),
        LiteralValue::Utf8(v) => v.clone(),
        LiteralValue::Date32(days) => format_date32(*days),
    }
}
