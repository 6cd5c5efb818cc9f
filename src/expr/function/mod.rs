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
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use arrow::datatypes::DataType;
use once_cell::sync::Lazy;

// Built-in function definition tables
mod agg;
mod conditional;
mod date;
mod math;
mod string;

use crate::compile::context::CompileContext;
use crate::compile::error::CompileError;
use crate::expr::literal::TypedLiteral;
use crate::expr::{ExprArena, ExprId, LiteralValue};
use crate::parse::literal_parser;
use crate::parse::FunctionCallNode;
use crate::types;

/// Compiled function-expression family tag. The string names the concrete
/// function within its family dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Math(&'static str),
    String(&'static str),
    Date(&'static str),
    Conditional(&'static str),
    Agg(&'static str),
}

impl FunctionKind {
    pub fn name(self) -> &'static str {
        match self {
            FunctionKind::Math(name)
            | FunctionKind::String(name)
            | FunctionKind::Date(name)
            | FunctionKind::Conditional(name)
            | FunctionKind::Agg(name) => name,
        }
    }

    /// Whether the compiled expression belongs to the aggregate family.
    pub fn is_aggregate(self) -> bool {
        matches!(self, FunctionKind::Agg(_))
    }
}

/// How the generic construction path types the compiled expression.
#[derive(Clone, Debug)]
pub enum ReturnRule {
    Fixed(DataType),
    SameAsArg(usize),
    /// First child with a resolved type (coalesce-style inference).
    CommonChild,
}

pub type CallNodeBuildFn = fn(
    &FunctionCallNode,
    Vec<ExprId>,
    &mut ExprArena,
    &mut CompileContext,
) -> Result<ExprId, anyhow::Error>;

/// Call-site-specialized lowering bound to a compiled-expression family.
#[derive(Clone, Copy, Debug)]
pub struct CallNodeBuilder {
    pub kind: FunctionKind,
    pub build: CallNodeBuildFn,
}

/// Construction path for a signature: either the generic function-call
/// expression is built directly from the resolved children, or a
/// specialized call-node builder takes over (e.g. to fold to a literal).
/// Exactly one of the two is bound per signature.
#[derive(Clone, Copy, Debug)]
pub enum FunctionBuilder {
    Expression(FunctionKind),
    CallNode(CallNodeBuilder),
}

impl FunctionBuilder {
    pub fn kind(&self) -> FunctionKind {
        match self {
            FunctionBuilder::Expression(kind) => *kind,
            FunctionBuilder::CallNode(builder) => builder.kind,
        }
    }
}

/// Raw per-argument declaration inside a built-in function table.
#[derive(Clone, Copy, Debug)]
pub struct ArgDef {
    pub allowed_types: &'static [DataType],
    pub is_constant: bool,
    /// Literal SQL text, resolved at registry-build time. Empty = no default.
    pub default_value: &'static str,
    /// Name of a closed enumeration; forces VARCHAR, constant, no default.
    pub enumeration: &'static str,
}

impl ArgDef {
    pub const fn of(allowed_types: &'static [DataType]) -> ArgDef {
        ArgDef {
            allowed_types,
            is_constant: false,
            default_value: "",
            enumeration: "",
        }
    }

    pub const fn any() -> ArgDef {
        ArgDef::of(&[])
    }

    pub const fn with_default(
        allowed_types: &'static [DataType],
        default_value: &'static str,
    ) -> ArgDef {
        ArgDef {
            allowed_types,
            is_constant: false,
            default_value,
            enumeration: "",
        }
    }

    pub const fn constant(allowed_types: &'static [DataType]) -> ArgDef {
        ArgDef {
            allowed_types,
            is_constant: true,
            default_value: "",
            enumeration: "",
        }
    }

    pub const fn constant_with_default(
        allowed_types: &'static [DataType],
        default_value: &'static str,
    ) -> ArgDef {
        ArgDef {
            allowed_types,
            is_constant: true,
            default_value,
            enumeration: "",
        }
    }

    pub const fn enumeration(name: &'static str) -> ArgDef {
        ArgDef {
            allowed_types: &[],
            is_constant: false,
            default_value: "",
            enumeration: name,
        }
    }
}

/// Declarative built-in function record, registered once at startup.
#[derive(Clone, Debug)]
pub struct FunctionDef {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub args: &'static [ArgDef],
    pub builder: FunctionBuilder,
    pub return_rule: ReturnRule,
}

/// Immutable per-argument constraint record.
#[derive(Clone, Debug)]
pub struct ArgSpec {
    pub allowed_types: Vec<DataType>,
    pub is_constant: bool,
    /// Non-empty restricts a literal's upper-cased string form to this set.
    pub allowed_values: BTreeSet<String>,
    pub default: Option<TypedLiteral>,
}

impl ArgSpec {
    pub(crate) fn build(def: &ArgDef) -> Result<ArgSpec, String> {
        if !def.enumeration.is_empty() {
            let values = enumeration_values(def.enumeration).ok_or_else(|| {
                format!(
                    "enumeration '{}' does not resolve to a known enumeration",
                    def.enumeration
                )
            })?;
            return Ok(ArgSpec {
                allowed_types: vec![DataType::Utf8],
                is_constant: true,
                allowed_values: values.iter().map(|v| v.to_string()).collect(),
                default: None,
            });
        }
        let default = match def.default_value {
            "" => None,
            text => {
                let literal = literal_parser::parse_literal(text)
                    .map_err(|e| format!("invalid default value '{}': {}", text, e))?;
                let resolved = resolve_default(literal, def.allowed_types).ok_or_else(|| {
                    format!(
                        "default value '{}' is not coercible to any of {}",
                        text,
                        types::format_types(def.allowed_types)
                    )
                })?;
                Some(resolved)
            }
        };
        Ok(ArgSpec {
            allowed_types: def.allowed_types.to_vec(),
            is_constant: def.is_constant,
            allowed_values: BTreeSet::new(),
            default,
        })
    }
}

/// First `(type, literal)` pair accepting the parsed default, scanning the
/// declared types in order. No declared types keeps the natural type.
fn resolve_default(literal: TypedLiteral, allowed: &[DataType]) -> Option<TypedLiteral> {
    if allowed.is_empty() {
        return Some(literal);
    }
    allowed
        .iter()
        .find(|t| types::is_coercible_with_value(&literal.data_type, t, Some(&literal.value)))
        .map(|t| TypedLiteral {
            value: retype_literal(literal.value, t),
            data_type: t.clone(),
        })
}

/// Rewrite a literal's representation to match the type it resolved to.
fn retype_literal(value: LiteralValue, target: &DataType) -> LiteralValue {
    match (&value, target) {
        (LiteralValue::Int32(v), DataType::Int64) => LiteralValue::Int64(*v as i64),
        (LiteralValue::Int32(v), DataType::Float64) => LiteralValue::Float64(*v as f64),
        (LiteralValue::Int64(v), DataType::Float64) => LiteralValue::Float64(*v as f64),
        _ => value,
    }
}

/// Immutable per-function record, built once at registry-build time and
/// shared read-only by every call site.
#[derive(Clone, Debug)]
pub struct FunctionSignature {
    pub(crate) name: String,
    pub(crate) args: Vec<ArgSpec>,
    pub(crate) is_aggregate: bool,
    pub(crate) required_arg_count: usize,
    pub(crate) builder: FunctionBuilder,
    pub(crate) return_rule: ReturnRule,
}

impl FunctionSignature {
    pub(crate) fn build(def: &FunctionDef) -> Result<FunctionSignature, CompileError> {
        let mut args = Vec::with_capacity(def.args.len());
        for (i, arg) in def.args.iter().enumerate() {
            let spec = ArgSpec::build(arg).map_err(|reason| CompileError::Configuration {
                function: def.name.to_string(),
                reason: format!("argument {}: {}", i + 1, reason),
            })?;
            args.push(spec);
        }
        Ok(FunctionSignature {
            name: def.name.to_lowercase(),
            is_aggregate: def.builder.kind().is_aggregate(),
            required_arg_count: required_arg_count(&args),
            args,
            builder: def.builder,
            return_rule: def.return_rule.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[ArgSpec] {
        &self.args
    }

    pub fn is_aggregate(&self) -> bool {
        self.is_aggregate
    }

    /// Callers must supply at least this many arguments; the rest carry
    /// defaults.
    pub fn required_arg_count(&self) -> usize {
        self.required_arg_count
    }

    pub fn builder(&self) -> &FunctionBuilder {
        &self.builder
    }

    pub fn return_rule(&self) -> &ReturnRule {
        &self.return_rule
    }
}

/// Defaults are only honored for a trailing run of arguments: the count is
/// the smallest index from which every later argument declares a default.
fn required_arg_count(args: &[ArgSpec]) -> usize {
    let mut required = args.len();
    while required > 0 && args[required - 1].default.is_some() {
        required -= 1;
    }
    required
}

/// Closed table of enumeration types usable by built-in declarations.
/// Variant names are case-sensitive; membership checks upper-case the
/// candidate value first.
pub(crate) fn enumeration_values(name: &str) -> Option<&'static [&'static str]> {
    match name {
        "TimeUnit" => Some(&[
            "MILLISECOND",
            "SECOND",
            "MINUTE",
            "HOUR",
            "DAY",
            "WEEK",
            "MONTH",
            "YEAR",
        ]),
        "SortOrder" => Some(&["ASC", "DESC"]),
        _ => None,
    }
}

pub(crate) type SignatureMap = HashMap<&'static str, Arc<FunctionSignature>>;

/// Static registry mapping lowercased function names (and aliases) to their
/// signatures. Built once at process start; a malformed declaration is fatal.
static FUNCTION_REGISTRY: Lazy<SignatureMap> = Lazy::new(|| {
    let mut m = SignatureMap::new();

    math::register(&mut m);
    string::register(&mut m);
    date::register(&mut m);
    conditional::register(&mut m);
    agg::register(&mut m);

    tracing::debug!(functions = m.len(), "built function registry");
    m
});

pub(crate) fn insert_defs(map: &mut SignatureMap, defs: &[FunctionDef]) {
    for def in defs {
        let sig = Arc::new(FunctionSignature::build(def).unwrap_or_else(|e| {
            panic!("invalid built-in function declaration: {e}");
        }));
        map.insert(def.name, Arc::clone(&sig));
        for alias in def.aliases {
            map.insert(alias, Arc::clone(&sig));
        }
    }
}

/// Look up a function signature by name (case-insensitive).
pub fn lookup_function(name: &str) -> Option<Arc<FunctionSignature>> {
    FUNCTION_REGISTRY.get(name.to_lowercase().as_str()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::LiteralValue;

    fn spec_with_default(default: Option<TypedLiteral>) -> ArgSpec {
        ArgSpec {
            allowed_types: vec![DataType::Int32],
            is_constant: false,
            allowed_values: BTreeSet::new(),
            default,
        }
    }

    fn int_default(v: i32) -> Option<TypedLiteral> {
        Some(TypedLiteral {
            value: LiteralValue::Int32(v),
            data_type: DataType::Int32,
        })
    }

    #[test]
    fn required_arg_count_honors_trailing_defaults_only() {
        // [no default] -> all required
        assert_eq!(required_arg_count(&[spec_with_default(None)]), 1);
        // [_, default, default] -> 1 required
        assert_eq!(
            required_arg_count(&[
                spec_with_default(None),
                spec_with_default(int_default(0)),
                spec_with_default(int_default(1)),
            ]),
            1
        );
        // a later argument without a default makes earlier defaults required
        assert_eq!(
            required_arg_count(&[
                spec_with_default(int_default(0)),
                spec_with_default(None),
                spec_with_default(int_default(1)),
            ]),
            2
        );
        assert_eq!(required_arg_count(&[]), 0);
    }

    #[test]
    fn enumeration_forces_constant_varchar() {
        let def = ArgDef::enumeration("SortOrder");
        let spec = ArgSpec::build(&def).unwrap();
        assert_eq!(spec.allowed_types, vec![DataType::Utf8]);
        assert!(spec.is_constant);
        assert!(spec.default.is_none());
        assert!(spec.allowed_values.contains("ASC"));
        assert!(spec.allowed_values.contains("DESC"));
        assert_eq!(spec.allowed_values.len(), 2);
    }

    #[test]
    fn unknown_enumeration_fails_configuration() {
        let def = ArgDef::enumeration("NoSuchEnum");
        assert!(ArgSpec::build(&def).is_err());
    }

    #[test]
    fn default_resolves_to_first_coercible_type() {
        static TYPES: &[DataType] = &[DataType::Int64, DataType::Float64];
        let def = ArgDef::with_default(TYPES, "1");
        let spec = ArgSpec::build(&def).unwrap();
        let default = spec.default.unwrap();
        assert_eq!(default.data_type, DataType::Int64);
        assert_eq!(default.value, LiteralValue::Int64(1));
    }

    #[test]
    fn default_keeps_natural_type_without_declared_types() {
        let def = ArgDef::with_default(&[], "'x'");
        let spec = ArgSpec::build(&def).unwrap();
        assert_eq!(spec.default.unwrap().data_type, DataType::Utf8);
    }

    #[test]
    fn uncoercible_default_fails_configuration() {
        static TYPES: &[DataType] = &[DataType::Int32];
        let def = ArgDef::with_default(TYPES, "'text'");
        let err = ArgSpec::build(&def).unwrap_err();
        assert!(err.contains("not coercible"));
    }

    #[test]
    fn unparsable_default_fails_configuration() {
        static TYPES: &[DataType] = &[DataType::Int32];
        let def = ArgDef::with_default(TYPES, "zero");
        let err = ArgSpec::build(&def).unwrap_err();
        assert!(err.contains("invalid default value"));
    }

    #[test]
    fn lookup_is_case_insensitive_and_knows_aliases() {
        assert!(lookup_function("ROUND").is_some());
        assert!(lookup_function("round").is_some());
        assert!(lookup_function("substring").is_some());
        assert!(lookup_function("substr").is_some());
        assert!(lookup_function("no_such_function").is_none());
    }

    #[test]
    fn aggregate_flag_follows_expression_family() {
        assert!(lookup_function("sum").unwrap().is_aggregate());
        assert!(lookup_function("percentile_cont").unwrap().is_aggregate());
        assert!(!lookup_function("round").unwrap().is_aggregate());
    }

    #[test]
    fn round_requires_one_argument() {
        let sig = lookup_function("round").unwrap();
        assert_eq!(sig.args().len(), 2);
        assert_eq!(sig.required_arg_count(), 1);
        let default = sig.args()[1].default.as_ref().unwrap();
        assert_eq!(default.value, LiteralValue::Int32(0));
    }
}
