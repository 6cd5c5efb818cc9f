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

use super::{ArgDef, FunctionBuilder, FunctionDef, FunctionKind, ReturnRule, SignatureMap};
use crate::types;

const VARCHAR: &[DataType] = &[DataType::Utf8];
const BIGINT: &[DataType] = &[DataType::Int64];

/// Argument shapes mirror the classic built-ins: regexp patterns and
/// to_char/to_number formats must be constants so they can be compiled once
/// per statement rather than per row.
static DEFS: &[FunctionDef] = &[
    FunctionDef {
        name: "upper",
        aliases: &["ucase"],
        args: &[ArgDef::of(VARCHAR)],
        builder: FunctionBuilder::Expression(FunctionKind::String("upper")),
        return_rule: ReturnRule::SameAsArg(0),
    },
    FunctionDef {
        name: "lower",
        aliases: &["lcase"],
        args: &[ArgDef::of(VARCHAR)],
        builder: FunctionBuilder::Expression(FunctionKind::String("lower")),
        return_rule: ReturnRule::SameAsArg(0),
    },
    FunctionDef {
        name: "length",
        aliases: &[],
        args: &[ArgDef::of(VARCHAR)],
        builder: FunctionBuilder::Expression(FunctionKind::String("length")),
        return_rule: ReturnRule::Fixed(DataType::Int32),
    },
    FunctionDef {
        name: "trim",
        aliases: &[],
        args: &[ArgDef::of(VARCHAR)],
        builder: FunctionBuilder::Expression(FunctionKind::String("trim")),
        return_rule: ReturnRule::SameAsArg(0),
    },
    FunctionDef {
        name: "substr",
        aliases: &["substring"],
        args: &[
            ArgDef::of(VARCHAR),
            ArgDef::of(BIGINT),
            ArgDef::of(BIGINT),
        ],
        builder: FunctionBuilder::Expression(FunctionKind::String("substr")),
        return_rule: ReturnRule::SameAsArg(0),
    },
    FunctionDef {
        name: "lpad",
        aliases: &[],
        args: &[
            ArgDef::of(VARCHAR),
            ArgDef::of(&[DataType::Int32]),
            ArgDef::with_default(VARCHAR, "' '"),
        ],
        builder: FunctionBuilder::Expression(FunctionKind::String("lpad")),
        return_rule: ReturnRule::SameAsArg(0),
    },
    FunctionDef {
        name: "regexp_substr",
        aliases: &[],
        args: &[
            ArgDef::of(VARCHAR),
            ArgDef::constant(VARCHAR),
            ArgDef::with_default(BIGINT, "1"),
        ],
        builder: FunctionBuilder::Expression(FunctionKind::String("regexp_substr")),
        return_rule: ReturnRule::SameAsArg(0),
    },
    FunctionDef {
        name: "regexp_replace",
        aliases: &[],
        args: &[
            ArgDef::of(VARCHAR),
            ArgDef::constant(VARCHAR),
            ArgDef::with_default(VARCHAR, "''"),
        ],
        builder: FunctionBuilder::Expression(FunctionKind::String("regexp_replace")),
        return_rule: ReturnRule::SameAsArg(0),
    },
    FunctionDef {
        name: "to_char",
        aliases: &[],
        args: &[
            ArgDef::of(&[
                types::TIMESTAMP,
                DataType::Date32,
                types::DECIMAL,
                DataType::Float64,
            ]),
            ArgDef::constant(VARCHAR),
        ],
        builder: FunctionBuilder::Expression(FunctionKind::String("to_char")),
        return_rule: ReturnRule::Fixed(DataType::Utf8),
    },
    FunctionDef {
        name: "to_number",
        aliases: &[],
        args: &[
            ArgDef::of(VARCHAR),
            ArgDef::constant_with_default(VARCHAR, "''"),
        ],
        builder: FunctionBuilder::Expression(FunctionKind::String("to_number")),
        return_rule: ReturnRule::Fixed(types::DECIMAL),
    },
];

pub(super) fn register(map: &mut SignatureMap) {
    super::insert_defs(map, DEFS);
}
