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

const NUMERIC: &[DataType] = &[types::DECIMAL, DataType::Float64];

static DEFS: &[FunctionDef] = &[
    FunctionDef {
        name: "count",
        aliases: &[],
        args: &[ArgDef::any()],
        builder: FunctionBuilder::Expression(FunctionKind::Agg("count")),
        return_rule: ReturnRule::Fixed(DataType::Int64),
    },
    FunctionDef {
        name: "sum",
        aliases: &[],
        args: &[ArgDef::of(NUMERIC)],
        builder: FunctionBuilder::Expression(FunctionKind::Agg("sum")),
        return_rule: ReturnRule::SameAsArg(0),
    },
    FunctionDef {
        name: "avg",
        aliases: &[],
        args: &[ArgDef::of(NUMERIC)],
        builder: FunctionBuilder::Expression(FunctionKind::Agg("avg")),
        return_rule: ReturnRule::Fixed(DataType::Float64),
    },
    FunctionDef {
        name: "min",
        aliases: &[],
        args: &[ArgDef::any()],
        builder: FunctionBuilder::Expression(FunctionKind::Agg("min")),
        return_rule: ReturnRule::SameAsArg(0),
    },
    FunctionDef {
        name: "max",
        aliases: &[],
        args: &[ArgDef::any()],
        builder: FunctionBuilder::Expression(FunctionKind::Agg("max")),
        return_rule: ReturnRule::SameAsArg(0),
    },
    // PERCENTILE_CONT(col, 'ASC', 0.9): the direction is an enumeration and
    // the fraction must be a constant so the plan can be built up front.
    FunctionDef {
        name: "percentile_cont",
        aliases: &[],
        args: &[
            ArgDef::of(NUMERIC),
            ArgDef::enumeration("SortOrder"),
            ArgDef::constant(NUMERIC),
        ],
        builder: FunctionBuilder::Expression(FunctionKind::Agg("percentile_cont")),
        return_rule: ReturnRule::Fixed(types::DECIMAL),
    },
];

pub(super) fn register(map: &mut SignatureMap) {
    super::insert_defs(map, DEFS);
}
