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
use anyhow::bail;
use arrow::datatypes::DataType;

use crate::compile::context::{BindMetadata, CompileContext};
use crate::compile::error::CompileError;
use crate::expr::function::{FunctionBuilder, FunctionKind, FunctionSignature, ReturnRule};
use crate::expr::{literal, ExprArena, ExprId, ExprNode, LiteralValue};
use crate::parse::{FunctionCallNode, ParseNode};
use crate::types;

fn argument_location(sig: &FunctionSignature, index: usize) -> String {
    format!("{} argument {}", sig.name(), index + 1)
}

fn describe_child(arena: &ExprArena, id: ExprId) -> String {
    match arena.node(id) {
        Some(ExprNode::Literal(value)) => literal::value_string(value),
        Some(ExprNode::ColumnRef { name }) => name.clone(),
        Some(ExprNode::BindParameter { index }) => format!("?{}", index + 1),
        Some(ExprNode::FunctionCall { kind, .. }) => format!("{}(...)", kind.name()),
        None => "<invalid expr>".to_string(),
    }
}

fn format_allowed_values(sig: &FunctionSignature, index: usize) -> String {
    let values: Vec<&str> = sig.args()[index]
        .allowed_values
        .iter()
        .map(String::as_str)
        .collect();
    format!("[{}]", values.join(", "))
}

/// Validate a call's compiled children against the signature, padding
/// omitted trailing arguments, substituting declared defaults, and
/// recording inferred bind-parameter metadata on the context.
///
/// Returns the resolved argument list, same order, never longer than the
/// signature's declared arity. Extra children beyond the declared arity are
/// a grammar-level concern and pass through untouched.
pub fn validate_args(
    call: &FunctionCallNode,
    mut children: Vec<ExprId>,
    sig: &FunctionSignature,
    arena: &mut ExprArena,
    ctx: &mut CompileContext,
) -> Result<Vec<ExprId>, CompileError> {
    // Pad omitted trailing positions with nulls typed to the argument's
    // first allowed type, before any per-index handling.
    if children.len() < sig.args().len() {
        for arg in &sig.args()[children.len()..] {
            let data_type = arg
                .allowed_types
                .first()
                .cloned()
                .unwrap_or(DataType::Null);
            children.push(arena.push_typed(ExprNode::Literal(LiteralValue::Null), data_type));
        }
    }
    let supplied = call.children().len();
    for (i, arg) in sig.args().iter().enumerate() {
        let child = children[i];
        let bind_index = match call.children().get(i) {
            Some(ParseNode::BindParameter { index }) => Some(*index),
            _ => None,
        };
        let child_type = arena.data_type(child).cloned().unwrap_or(DataType::Null);

        // An unresolved child is an explicit null, an unbound parameter, or
        // a position the caller left off entirely.
        if matches!(child_type, DataType::Null) || i >= supplied {
            if let Some(default) = &arg.default {
                children[i] = arena.push_typed(
                    ExprNode::Literal(default.value.clone()),
                    default.data_type.clone(),
                );
                if let Some(index) = bind_index {
                    ctx.binds_mut().record(
                        index,
                        BindMetadata {
                            data_type: Some(default.data_type.clone()),
                            value: Some(default.value.clone()),
                        },
                    );
                }
            } else if let Some(index) = bind_index {
                // No default to borrow a value from; hint the first declared
                // type. With no declared types the parameter stays
                // unresolved for a later stage to report.
                if let Some(first) = arg.allowed_types.first() {
                    ctx.binds_mut()
                        .record(index, BindMetadata::type_hint(first.clone()));
                }
            }
            continue;
        }

        if !arg.allowed_types.is_empty() {
            let coercible = arg
                .allowed_types
                .iter()
                .any(|t| types::is_coercible(&child_type, t));
            if !coercible {
                return Err(CompileError::ArgumentTypeMismatch {
                    expected: types::format_types(&arg.allowed_types),
                    actual: types::sql_type_name(&child_type).to_string(),
                    location: argument_location(sig, i),
                });
            }
        }
        if arg.is_constant && !matches!(arena.node(child), Some(ExprNode::Literal(_))) {
            return Err(CompileError::ArgumentTypeMismatch {
                expected: "constant".to_string(),
                actual: describe_child(arena, child),
                location: argument_location(sig, i),
            });
        }
        if !arg.allowed_values.is_empty() {
            let value = match arena.node(child) {
                Some(ExprNode::Literal(value)) => literal::value_string(value),
                _ => describe_child(arena, child),
            };
            if !arg.allowed_values.contains(&value.to_uppercase()) {
                return Err(CompileError::ArgumentTypeMismatch {
                    expected: format_allowed_values(sig, i),
                    actual: value,
                    location: argument_location(sig, i),
                });
            }
        }
    }
    Ok(children)
}

fn resolve_return_type(rule: &ReturnRule, args: &[ExprId], arena: &ExprArena) -> DataType {
    match rule {
        ReturnRule::Fixed(data_type) => data_type.clone(),
        ReturnRule::SameAsArg(i) => args
            .get(*i)
            .and_then(|id| arena.data_type(*id))
            .cloned()
            .unwrap_or(DataType::Null),
        ReturnRule::CommonChild => args
            .iter()
            .filter_map(|id| arena.data_type(*id))
            .find(|t| !matches!(t, DataType::Null))
            .cloned()
            .unwrap_or(DataType::Null),
    }
}

fn build_function_expr(
    kind: FunctionKind,
    sig: &FunctionSignature,
    args: Vec<ExprId>,
    arena: &mut ExprArena,
) -> Result<ExprId, anyhow::Error> {
    if args.len() != sig.args().len() {
        bail!(
            "{} expected {} resolved arguments, got {}",
            sig.name(),
            sig.args().len(),
            args.len()
        );
    }
    let data_type = resolve_return_type(sig.return_rule(), &args, arena);
    Ok(arena.push_typed(ExprNode::FunctionCall { kind, args }, data_type))
}

/// Instantiate the compiled function expression through the signature's
/// bound builder. Compiler-level errors raised inside a builder propagate
/// unchanged; anything else is wrapped into a single compilation error so
/// callers see one error surface for every function family.
pub fn create_function(
    sig: &FunctionSignature,
    call: &FunctionCallNode,
    resolved: Vec<ExprId>,
    arena: &mut ExprArena,
    ctx: &mut CompileContext,
) -> Result<ExprId, CompileError> {
    let result = match sig.builder() {
        FunctionBuilder::Expression(kind) => build_function_expr(*kind, sig, resolved, arena),
        FunctionBuilder::CallNode(builder) => (builder.build)(call, resolved, arena, ctx),
    };
    result.map_err(|err| match err.downcast::<CompileError>() {
        Ok(compile_error) => compile_error,
        Err(other) => CompileError::Compilation {
            function: sig.name().to_string(),
            source: other,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::function::{ArgSpec, CallNodeBuilder};
    use crate::expr::literal::TypedLiteral;
    use std::collections::BTreeSet;

    fn any_arg() -> ArgSpec {
        ArgSpec {
            allowed_types: Vec::new(),
            is_constant: false,
            allowed_values: BTreeSet::new(),
            default: None,
        }
    }

    fn typed_arg(types: Vec<DataType>) -> ArgSpec {
        ArgSpec {
            allowed_types: types,
            ..any_arg()
        }
    }

    fn defaulted_arg(types: Vec<DataType>, value: LiteralValue, data_type: DataType) -> ArgSpec {
        ArgSpec {
            allowed_types: types,
            default: Some(TypedLiteral { value, data_type }),
            ..any_arg()
        }
    }

    fn enum_arg(values: &[&str]) -> ArgSpec {
        ArgSpec {
            allowed_types: vec![DataType::Utf8],
            is_constant: true,
            allowed_values: values.iter().map(|v| v.to_string()).collect(),
            default: None,
        }
    }

    fn signature(name: &str, args: Vec<ArgSpec>) -> FunctionSignature {
        FunctionSignature {
            name: name.to_string(),
            args,
            is_aggregate: false,
            required_arg_count: 0,
            builder: FunctionBuilder::Expression(FunctionKind::Math("test")),
            return_rule: ReturnRule::SameAsArg(0),
        }
    }

    fn literal_child(arena: &mut ExprArena, value: LiteralValue, data_type: DataType) -> ExprId {
        arena.push_typed(ExprNode::Literal(value), data_type)
    }

    fn assert_mismatch(err: CompileError, expected_part: &str, location_part: &str) {
        match err {
            CompileError::ArgumentTypeMismatch {
                expected, location, ..
            } => {
                assert!(
                    expected.contains(expected_part),
                    "expected {:?} to contain {:?}",
                    expected,
                    expected_part
                );
                assert!(
                    location.contains(location_part),
                    "expected {:?} to contain {:?}",
                    location,
                    location_part
                );
            }
            other => panic!("expected ArgumentTypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn omitted_argument_takes_declared_default() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let sig = signature(
            "round",
            vec![
                typed_arg(vec![DataType::Float64]),
                defaulted_arg(
                    vec![DataType::Int32],
                    LiteralValue::Int32(0),
                    DataType::Int32,
                ),
            ],
        );
        let call = FunctionCallNode::new(
            "round",
            vec![ParseNode::literal(
                LiteralValue::Float64(3.5),
                DataType::Float64,
            )],
        );
        let child = literal_child(&mut arena, LiteralValue::Float64(3.5), DataType::Float64);

        let resolved = validate_args(&call, vec![child], &sig, &mut arena, &mut ctx).unwrap();
        assert_eq!(resolved.len(), 2);
        assert!(matches!(
            arena.node(resolved[1]),
            Some(ExprNode::Literal(LiteralValue::Int32(0)))
        ));
        assert_eq!(arena.data_type(resolved[1]), Some(&DataType::Int32));
    }

    #[test]
    fn padding_fills_every_trailing_default() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let sig = signature(
            "f",
            vec![
                typed_arg(vec![DataType::Utf8]),
                defaulted_arg(
                    vec![DataType::Int64],
                    LiteralValue::Int64(1),
                    DataType::Int64,
                ),
                defaulted_arg(
                    vec![DataType::Utf8],
                    LiteralValue::Utf8(" ".to_string()),
                    DataType::Utf8,
                ),
            ],
        );
        let call = FunctionCallNode::new(
            "f",
            vec![ParseNode::literal(
                LiteralValue::Utf8("x".to_string()),
                DataType::Utf8,
            )],
        );
        let child = literal_child(
            &mut arena,
            LiteralValue::Utf8("x".to_string()),
            DataType::Utf8,
        );

        let resolved = validate_args(&call, vec![child], &sig, &mut arena, &mut ctx).unwrap();
        assert_eq!(resolved.len(), 3);
        assert!(matches!(
            arena.node(resolved[1]),
            Some(ExprNode::Literal(LiteralValue::Int64(1)))
        ));
        assert!(matches!(
            arena.node(resolved[2]),
            Some(ExprNode::Literal(LiteralValue::Utf8(s))) if s == " "
        ));
    }

    #[test]
    fn uncoercible_literal_reports_one_based_position() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let sig = signature(
            "round",
            vec![typed_arg(vec![types::DECIMAL, DataType::Float64])],
        );
        let call = FunctionCallNode::new(
            "round",
            vec![ParseNode::literal(
                LiteralValue::Utf8("x".to_string()),
                DataType::Utf8,
            )],
        );
        let child = literal_child(
            &mut arena,
            LiteralValue::Utf8("x".to_string()),
            DataType::Utf8,
        );

        let err = validate_args(&call, vec![child], &sig, &mut arena, &mut ctx).unwrap_err();
        assert_mismatch(err, "DECIMAL", "round argument 1");
    }

    #[test]
    fn second_argument_mismatch_names_position_two() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let sig = signature(
            "substr",
            vec![
                typed_arg(vec![DataType::Utf8]),
                typed_arg(vec![DataType::Int64]),
            ],
        );
        let call = FunctionCallNode::new(
            "substr",
            vec![
                ParseNode::literal(LiteralValue::Utf8("abc".to_string()), DataType::Utf8),
                ParseNode::literal(LiteralValue::Utf8("no".to_string()), DataType::Utf8),
            ],
        );
        let c0 = literal_child(
            &mut arena,
            LiteralValue::Utf8("abc".to_string()),
            DataType::Utf8,
        );
        let c1 = literal_child(
            &mut arena,
            LiteralValue::Utf8("no".to_string()),
            DataType::Utf8,
        );

        let err = validate_args(&call, vec![c0, c1], &sig, &mut arena, &mut ctx).unwrap_err();
        assert_mismatch(err, "BIGINT", "substr argument 2");
    }

    #[test]
    fn enumeration_membership_is_case_insensitive_on_the_value() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let sig = signature("f", vec![any_arg(), enum_arg(&["A", "B"])]);

        let ok_call = FunctionCallNode::new(
            "f",
            vec![
                ParseNode::literal(LiteralValue::Int32(1), DataType::Int32),
                ParseNode::literal(LiteralValue::Utf8("a".to_string()), DataType::Utf8),
            ],
        );
        let c0 = literal_child(&mut arena, LiteralValue::Int32(1), DataType::Int32);
        let c1 = literal_child(
            &mut arena,
            LiteralValue::Utf8("a".to_string()),
            DataType::Utf8,
        );
        assert!(validate_args(&ok_call, vec![c0, c1], &sig, &mut arena, &mut ctx).is_ok());

        let bad_call = FunctionCallNode::new(
            "f",
            vec![
                ParseNode::literal(LiteralValue::Int32(1), DataType::Int32),
                ParseNode::literal(LiteralValue::Utf8("c".to_string()), DataType::Utf8),
            ],
        );
        let c0 = literal_child(&mut arena, LiteralValue::Int32(1), DataType::Int32);
        let c1 = literal_child(
            &mut arena,
            LiteralValue::Utf8("c".to_string()),
            DataType::Utf8,
        );
        let err = validate_args(&bad_call, vec![c0, c1], &sig, &mut arena, &mut ctx).unwrap_err();
        assert_mismatch(err, "[A, B]", "f argument 2");
    }

    #[test]
    fn constant_argument_rejects_column_references() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let constant_arg = ArgSpec {
            is_constant: true,
            ..typed_arg(vec![DataType::Int32])
        };
        let sig = signature("f", vec![constant_arg]);

        let bad_call = FunctionCallNode::new(
            "f",
            vec![ParseNode::ColumnRef {
                name: "c".to_string(),
                data_type: DataType::Int32,
            }],
        );
        let col = arena.push_typed(
            ExprNode::ColumnRef {
                name: "c".to_string(),
            },
            DataType::Int32,
        );
        let err = validate_args(&bad_call, vec![col], &sig, &mut arena, &mut ctx).unwrap_err();
        assert_mismatch(err, "constant", "f argument 1");

        let ok_call = FunctionCallNode::new(
            "f",
            vec![ParseNode::literal(LiteralValue::Int32(5), DataType::Int32)],
        );
        let lit = literal_child(&mut arena, LiteralValue::Int32(5), DataType::Int32);
        assert!(validate_args(&ok_call, vec![lit], &sig, &mut arena, &mut ctx).is_ok());
    }

    #[test]
    fn bind_parameter_with_default_records_value_and_type() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let sig = signature(
            "f",
            vec![defaulted_arg(
                vec![DataType::Int32],
                LiteralValue::Int32(0),
                DataType::Int32,
            )],
        );
        let call = FunctionCallNode::new("f", vec![ParseNode::BindParameter { index: 3 }]);
        let bind = arena.push(ExprNode::BindParameter { index: 3 });

        let resolved = validate_args(&call, vec![bind], &sig, &mut arena, &mut ctx).unwrap();
        assert!(matches!(
            arena.node(resolved[0]),
            Some(ExprNode::Literal(LiteralValue::Int32(0)))
        ));
        assert_eq!(
            ctx.binds().metadata(3),
            Some(&BindMetadata {
                data_type: Some(DataType::Int32),
                value: Some(LiteralValue::Int32(0)),
            })
        );
    }

    #[test]
    fn bind_parameter_without_default_gets_first_type_hint() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let sig = signature(
            "f",
            vec![typed_arg(vec![DataType::Float64, DataType::Int64])],
        );
        let call = FunctionCallNode::new("f", vec![ParseNode::BindParameter { index: 0 }]);
        let bind = arena.push(ExprNode::BindParameter { index: 0 });

        let resolved = validate_args(&call, vec![bind], &sig, &mut arena, &mut ctx).unwrap();
        // Child stays in place; only metadata is recorded.
        assert_eq!(resolved[0], bind);
        assert_eq!(
            ctx.binds().metadata(0),
            Some(&BindMetadata::type_hint(DataType::Float64))
        );
    }

    #[test]
    fn bind_parameter_with_no_declared_types_stays_unresolved() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let sig = signature("f", vec![any_arg()]);
        let call = FunctionCallNode::new("f", vec![ParseNode::BindParameter { index: 0 }]);
        let bind = arena.push(ExprNode::BindParameter { index: 0 });

        let resolved = validate_args(&call, vec![bind], &sig, &mut arena, &mut ctx).unwrap();
        assert_eq!(resolved[0], bind);
        assert!(ctx.binds().is_empty());
    }

    #[test]
    fn explicit_null_without_default_is_left_alone() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let sig = signature("f", vec![typed_arg(vec![DataType::Utf8])]);
        let call = FunctionCallNode::new(
            "f",
            vec![ParseNode::literal(LiteralValue::Null, DataType::Null)],
        );
        let null = literal_child(&mut arena, LiteralValue::Null, DataType::Null);

        let resolved = validate_args(&call, vec![null], &sig, &mut arena, &mut ctx).unwrap();
        assert_eq!(resolved[0], null);
        assert!(ctx.binds().is_empty());
    }

    #[test]
    fn validate_is_idempotent_over_its_own_output() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let sig = signature(
            "round",
            vec![
                typed_arg(vec![DataType::Float64]),
                defaulted_arg(
                    vec![DataType::Int32],
                    LiteralValue::Int32(0),
                    DataType::Int32,
                ),
            ],
        );
        let call = FunctionCallNode::new(
            "round",
            vec![ParseNode::BindParameter { index: 1 }],
        );
        let bind = arena.push(ExprNode::BindParameter { index: 1 });

        let first = validate_args(&call, vec![bind], &sig, &mut arena, &mut ctx).unwrap();
        let binds_after_first = ctx.binds().clone();
        let second = validate_args(&call, first.clone(), &sig, &mut arena, &mut ctx).unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(arena.data_type(*a), arena.data_type(*b));
            match (arena.node(*a), arena.node(*b)) {
                (Some(ExprNode::Literal(va)), Some(ExprNode::Literal(vb))) => assert_eq!(va, vb),
                (Some(ExprNode::BindParameter { index: ia }), Some(ExprNode::BindParameter { index: ib })) => {
                    assert_eq!(ia, ib)
                }
                (a, b) => panic!("resolved lists diverged: {:?} vs {:?}", a, b),
            }
        }
        assert_eq!(ctx.binds().metadata(1), binds_after_first.metadata(1));
        assert_eq!(ctx.binds().len(), binds_after_first.len());
    }

    #[test]
    fn create_builds_generic_expression_with_return_type() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let sig = signature("abs", vec![typed_arg(vec![DataType::Float64])]);
        let call = FunctionCallNode::new(
            "abs",
            vec![ParseNode::literal(
                LiteralValue::Float64(-2.0),
                DataType::Float64,
            )],
        );
        let child = literal_child(&mut arena, LiteralValue::Float64(-2.0), DataType::Float64);

        let id = create_function(&sig, &call, vec![child], &mut arena, &mut ctx).unwrap();
        assert!(matches!(
            arena.node(id),
            Some(ExprNode::FunctionCall { args, .. }) if args.len() == 1
        ));
        assert_eq!(arena.data_type(id), Some(&DataType::Float64));
    }

    #[test]
    fn create_wraps_argument_shape_mismatch() {
        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let sig = signature("abs", vec![typed_arg(vec![DataType::Float64])]);
        let call = FunctionCallNode::new("abs", vec![]);

        let err = create_function(&sig, &call, vec![], &mut arena, &mut ctx).unwrap_err();
        assert!(matches!(err, CompileError::Compilation { .. }));
    }

    #[test]
    fn create_propagates_compiler_errors_from_builders_unchanged() {
        fn failing_builder(
            _node: &FunctionCallNode,
            _children: Vec<ExprId>,
            _arena: &mut ExprArena,
            _ctx: &mut CompileContext,
        ) -> Result<ExprId, anyhow::Error> {
            Err(anyhow::Error::new(CompileError::ArgumentTypeMismatch {
                expected: "constant".to_string(),
                actual: "c".to_string(),
                location: "f argument 1".to_string(),
            }))
        }

        let mut arena = ExprArena::default();
        let mut ctx = CompileContext::new();
        let sig = FunctionSignature {
            name: "f".to_string(),
            args: vec![],
            is_aggregate: false,
            required_arg_count: 0,
            builder: FunctionBuilder::CallNode(CallNodeBuilder {
                kind: FunctionKind::Math("f"),
                build: failing_builder,
            }),
            return_rule: ReturnRule::Fixed(DataType::Null),
        };
        let call = FunctionCallNode::new("f", vec![]);

        let err = create_function(&sig, &call, vec![], &mut arena, &mut ctx).unwrap_err();
        assert!(matches!(err, CompileError::ArgumentTypeMismatch { .. }));
    }
}
