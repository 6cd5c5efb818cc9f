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
use anyhow::anyhow;
use arrow::datatypes::DataType;

use super::{
    ArgDef, CallNodeBuilder, FunctionBuilder, FunctionDef, FunctionKind, ReturnRule, SignatureMap,
};
use crate::compile::context::CompileContext;
use crate::expr::{ExprArena, ExprId, ExprNode, LiteralValue};
use crate::parse::FunctionCallNode;
use crate::types;

const DATETIME: &[DataType] = &[types::TIMESTAMP, DataType::Date32];

const MICROS_PER_DAY: i64 = 86_400_000_000;

static DEFS: &[FunctionDef] = &[
    FunctionDef {
        name: "date_trunc",
        aliases: &[],
        args: &[ArgDef::enumeration("TimeUnit"), ArgDef::of(DATETIME)],
        builder: FunctionBuilder::Expression(FunctionKind::Date("date_trunc")),
        return_rule: ReturnRule::SameAsArg(1),
    },
    FunctionDef {
        name: "year",
        aliases: &[],
        args: &[ArgDef::of(DATETIME)],
        builder: FunctionBuilder::Expression(FunctionKind::Date("year")),
        return_rule: ReturnRule::Fixed(DataType::Int32),
    },
    FunctionDef {
        name: "current_date",
        aliases: &["curdate"],
        args: &[],
        builder: FunctionBuilder::CallNode(CallNodeBuilder {
            kind: FunctionKind::Date("current_date"),
            build: build_current_date,
        }),
        return_rule: ReturnRule::Fixed(DataType::Date32),
    },
];

/// current_date folds to a date literal at compile time so every occurrence
/// in a statement sees the same day. The statement time comes from the
/// compilation context, never from a clock read here.
fn build_current_date(
    _node: &FunctionCallNode,
    _children: Vec<ExprId>,
    arena: &mut ExprArena,
    ctx: &mut CompileContext,
) -> Result<ExprId, anyhow::Error> {
    let micros = ctx.statement_time_micros().ok_or_else(|| {
        anyhow!("current_date requires a statement time on the compilation context")
    })?;
    let days = micros.div_euclid(MICROS_PER_DAY) as i32;
    Ok(arena.push_typed(
        ExprNode::Literal(LiteralValue::Date32(days)),
        DataType::Date32,
    ))
}

pub(super) fn register(map: &mut SignatureMap) {
    super::insert_defs(map, DEFS);
}
