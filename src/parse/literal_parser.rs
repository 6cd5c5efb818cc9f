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
use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::expr::literal::TypedLiteral;
use crate::expr::LiteralValue;

const UNIX_EPOCH_DAY_OFFSET: i32 = 719163;

/// Parse a date literal string to days since epoch.
pub(crate) fn parse_date_literal(value: &str) -> Result<i32, String> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.num_days_from_ce() - UNIX_EPOCH_DAY_OFFSET);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date().num_days_from_ce() - UNIX_EPOCH_DAY_OFFSET);
    }
    Err(format!("invalid date literal '{}'", value))
}

/// Parse a decimal literal, inferring precision and scale from the digits.
fn parse_decimal_inferred(value: &str) -> Result<(i128, u8, i8), String> {
    let mut s = value.trim();
    let mut sign: i128 = 1;
    if let Some(rest) = s.strip_prefix('-') {
        sign = -1;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }
    if s.is_empty() {
        return Err("empty decimal literal".to_string());
    }
    let mut iter = s.split('.');
    let int_part_raw = iter.next().unwrap_or("");
    let frac_part = iter.next().unwrap_or("");
    if iter.next().is_some() || (int_part_raw.is_empty() && frac_part.is_empty()) {
        return Err(format!("invalid decimal literal '{}'", value));
    }
    let int_part = if int_part_raw.is_empty() {
        "0"
    } else {
        int_part_raw
    };
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(format!("invalid decimal literal '{}'", value));
    }
    let scale = i8::try_from(frac_part.len())
        .ok()
        .filter(|s| *s <= 38)
        .ok_or_else(|| format!("decimal literal '{}' exceeds scale 38", value))?;
    let mut digits = String::with_capacity(int_part.len() + frac_part.len());
    digits.push_str(int_part);
    digits.push_str(frac_part);
    let digits_trim = digits.trim_start_matches('0');
    let digits_final = if digits_trim.is_empty() {
        "0"
    } else {
        digits_trim
    };
    let precision = u8::try_from(digits_final.len())
        .ok()
        .filter(|p| *p <= 38)
        .ok_or_else(|| format!("decimal literal '{}' exceeds precision 38", value))?;
    let unsigned = digits_final
        .parse::<i128>()
        .map_err(|_| format!("failed to parse decimal literal '{}'", value))?;
    Ok((unsigned.saturating_mul(sign), precision, scale))
}

fn parse_quoted(input: &str) -> Result<String, String> {
    let body = input
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .ok_or_else(|| format!("unterminated string literal {}", input))?;
    // '' inside a quoted literal escapes a single quote.
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            match chars.peek() {
                Some('\'') => {
                    chars.next();
                }
                _ => return Err(format!("unterminated string literal {}", input)),
            }
        }
        out.push(c);
    }
    Ok(out)
}

fn looks_numeric(input: &str) -> bool {
    let s = input
        .strip_prefix('-')
        .or_else(|| input.strip_prefix('+'))
        .unwrap_or(input);
    s.starts_with(|c: char| c.is_ascii_digit()) || s.starts_with('.')
}

/// Parse a SQL literal from its source text and derive its natural type.
/// Used at registry-build time to resolve declared argument defaults.
pub fn parse_literal(input: &str) -> Result<TypedLiteral, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty literal".to_string());
    }
    if trimmed.eq_ignore_ascii_case("null") {
        return Ok(TypedLiteral {
            value: LiteralValue::Null,
            data_type: DataType::Null,
        });
    }
    if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
        return Ok(TypedLiteral {
            value: LiteralValue::Bool(trimmed.eq_ignore_ascii_case("true")),
            data_type: DataType::Boolean,
        });
    }
    if let Some(rest) = trimmed
        .strip_prefix("date ")
        .or_else(|| trimmed.strip_prefix("DATE "))
    {
        let body = parse_quoted(rest.trim())?;
        let days = parse_date_literal(&body)?;
        return Ok(TypedLiteral {
            value: LiteralValue::Date32(days),
            data_type: DataType::Date32,
        });
    }
    if trimmed.starts_with('\'') {
        let body = parse_quoted(trimmed)?;
        return Ok(TypedLiteral {
            value: LiteralValue::Utf8(body),
            data_type: DataType::Utf8,
        });
    }
    if looks_numeric(trimmed) {
        if trimmed.contains(['e', 'E']) {
            let v = trimmed
                .parse::<f64>()
                .map_err(|_| format!("invalid numeric literal '{}'", trimmed))?;
            return Ok(TypedLiteral {
                value: LiteralValue::Float64(v),
                data_type: DataType::Float64,
            });
        }
        if trimmed.contains('.') {
            let (value, precision, scale) = parse_decimal_inferred(trimmed)?;
            return Ok(TypedLiteral {
                value: LiteralValue::Decimal128 {
                    value,
                    precision,
                    scale,
                },
                data_type: DataType::Decimal128(precision, scale),
            });
        }
        let v = trimmed
            .parse::<i64>()
            .map_err(|_| format!("invalid integer literal '{}'", trimmed))?;
        return match i32::try_from(v) {
            Ok(small) => Ok(TypedLiteral {
                value: LiteralValue::Int32(small),
                data_type: DataType::Int32,
            }),
            Err(_) => Ok(TypedLiteral {
                value: LiteralValue::Int64(v),
                data_type: DataType::Int64,
            }),
        };
    }
    Err(format!("unrecognized literal '{}'", trimmed))
}
