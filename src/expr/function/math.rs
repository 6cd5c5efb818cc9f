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
const INT: &[DataType] = &[DataType::Int32];

static DEFS: &[FunctionDef] = &[
    FunctionDef {
        name: "round",
        aliases: &[],
        args: &[ArgDef::of(NUMERIC), ArgDef::with_default(INT, "0")],
        builder: FunctionBuilder::Expression(FunctionKind::Math("round")),
        return_rule: ReturnRule::SameAsArg(0),
    },
    FunctionDef {
        name: "truncate",
        aliases: &["trunc"],
        args: &[ArgDef::of(NUMERIC), ArgDef::with_default(INT, "0")],
        builder: FunctionBuilder::Expression(FunctionKind::Math("truncate")),
        return_rule: ReturnRule::SameAsArg(0),
    },
    FunctionDef {
        name: "abs",
        aliases: &[],
        args: &[ArgDef::of(NUMERIC)],
        builder: FunctionBuilder::Expression(FunctionKind::Math("abs")),
        return_rule: ReturnRule::SameAsArg(0),
    },
    FunctionDef {
        name: "ceil",
        aliases: &["ceiling", "dceil"],
        args: &[ArgDef::of(NUMERIC)],
        builder: FunctionBuilder::Expression(FunctionKind::Math("ceil")),
        return_rule: ReturnRule::SameAsArg(0),
    },
    FunctionDef {
        name: "floor",
        aliases: &["dfloor"],
        args: &[ArgDef::of(NUMERIC)],
        builder: FunctionBuilder::Expression(FunctionKind::Math("floor")),
        return_rule: ReturnRule::SameAsArg(0),
    },
    FunctionDef {
        name: "sqrt",
        aliases: &["dsqrt"],
        args: &[ArgDef::of(NUMERIC)],
        builder: FunctionBuilder::Expression(FunctionKind::Math("sqrt")),
        return_rule: ReturnRule::Fixed(DataType::Float64),
    },
    FunctionDef {
        name: "power",
        aliases: &["pow", "dpow"],
        args: &[ArgDef::of(NUMERIC), ArgDef::of(NUMERIC)],
        builder: FunctionBuilder::Expression(FunctionKind::Math("power")),
        return_rule: ReturnRule::Fixed(DataType::Float64),
    },
    FunctionDef {
        name: "ln",
        aliases: &[],
        args: &[ArgDef::of(NUMERIC)],
        builder: FunctionBuilder::Expression(FunctionKind::Math("ln")),
        return_rule: ReturnRule::Fixed(DataType::Float64),
    },
];

pub(super) fn register(map: &mut SignatureMap) {
    super::insert_defs(map, DEFS);
}
