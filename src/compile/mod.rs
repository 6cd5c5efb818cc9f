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
pub mod context;
pub mod error;
pub mod function_call;

pub use function_call::{create_function, validate_args};

use crate::compile::context::CompileContext;
use crate::compile::error::CompileError;
use crate::expr::function::lookup_function;
use crate::expr::{ExprArena, ExprId, ExprNode};
use crate::parse::{FunctionCallNode, ParseNode};

/// Compile a parse node into the arena. Bind parameters come out untyped;
/// their types are inferred during function-call validation or reported by
/// a later stage.
pub fn compile_expr(
    node: &ParseNode,
    arena: &mut ExprArena,
    ctx: &mut CompileContext,
) -> Result<ExprId, CompileError> {
    match node {
        ParseNode::Literal(literal) => Ok(arena.push_typed(
            ExprNode::Literal(literal.value.clone()),
            literal.data_type.clone(),
        )),
        ParseNode::ColumnRef { name, data_type } => Ok(arena.push_typed(
            ExprNode::ColumnRef { name: name.clone() },
            data_type.clone(),
        )),
        ParseNode::BindParameter { index } => {
            Ok(arena.push(ExprNode::BindParameter { index: *index }))
        }
        ParseNode::FunctionCall(call) => compile_function_call(call, arena, ctx),
    }
}

/// Compile a function call: registry lookup, arity gate, child compilation,
/// argument resolution, then instantiation.
pub fn compile_function_call(
    call: &FunctionCallNode,
    arena: &mut ExprArena,
    ctx: &mut CompileContext,
) -> Result<ExprId, CompileError> {
    let sig = lookup_function(call.name())
        .ok_or_else(|| CompileError::UnknownFunction(call.name().to_string()))?;

    let supplied = call.children().len();
    if supplied < sig.required_arg_count() || supplied > sig.args().len() {
        return Err(CompileError::ArityMismatch {
            function: sig.name().to_string(),
            min: sig.required_arg_count(),
            max: sig.args().len(),
            actual: supplied,
        });
    }
    tracing::trace!(function = call.name(), args = supplied, "compiling function call");

    let mut children = Vec::with_capacity(supplied);
    for child in call.children() {
        children.push(compile_expr(child, arena, ctx)?);
    }
    let resolved = validate_args(call, children, &sig, arena, ctx)?;
    create_function(&sig, call, resolved, arena, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::LiteralValue;
    use arrow::datatypes::DataType;

    #[test]
    fn unknown_function_is_rejected() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let call = FunctionCallNode::new("frobnicate", vec![]);
        let err = compile_function_call(&call, &mut arena, &mut ctx).unwrap_err();
        assert!(matches!(err, CompileError::UnknownFunction(name) if name == "frobnicate"));
    }

    #[test]
    fn too_few_arguments_fail_the_arity_gate() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let call = FunctionCallNode::new("round", vec![]);
        let err = compile_function_call(&call, &mut arena, &mut ctx).unwrap_err();
        match err {
            CompileError::ArityMismatch {
                function,
                min,
                max,
                actual,
            } => {
                assert_eq!(function, "round");
                assert_eq!(min, 1);
                assert_eq!(max, 2);
                assert_eq!(actual, 0);
            }
            other => panic!("expected ArityMismatch, got {:?}", other),
        }
    }

    #[test]
    fn too_many_arguments_fail_the_arity_gate() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let call = FunctionCallNode::new(
            "abs",
            vec![
                ParseNode::literal(LiteralValue::Int32(1), DataType::Int32),
                ParseNode::literal(LiteralValue::Int32(2), DataType::Int32),
            ],
        );
        let err = compile_function_call(&call, &mut arena, &mut ctx).unwrap_err();
        assert!(matches!(err, CompileError::ArityMismatch { .. }));
    }

    #[test]
    fn literals_compile_with_their_declared_type() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let node = ParseNode::literal(LiteralValue::Int32(42), DataType::Int32);
        let id = compile_expr(&node, &mut arena, &mut ctx).unwrap();
        assert!(matches!(
            arena.node(id),
            Some(ExprNode::Literal(LiteralValue::Int32(42)))
        ));
        assert_eq!(arena.data_type(id), Some(&DataType::Int32));
    }

    #[test]
    fn bind_parameters_compile_untyped() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let node = ParseNode::BindParameter { index: 0 };
        let id = compile_expr(&node, &mut arena, &mut ctx).unwrap();
        assert_eq!(arena.data_type(id), Some(&DataType::Null));
    }
}
