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
pub mod literal_parser;

use std::fmt;

use arrow::datatypes::DataType;

use crate::expr::literal::TypedLiteral;
use crate::expr::LiteralValue;

/// Parsed expression node as produced by the grammar, before type
/// resolution. Only the shapes the function-call compiler consumes are
/// modeled here; operators are handled elsewhere.
#[derive(Clone, Debug)]
pub enum ParseNode {
    Literal(TypedLiteral),
    ColumnRef { name: String, data_type: DataType },
    BindParameter { index: usize },
    FunctionCall(FunctionCallNode),
}

impl ParseNode {
    pub fn literal(value: LiteralValue, data_type: DataType) -> Self {
        ParseNode::Literal(TypedLiteral { value, data_type })
    }

    pub fn is_constant(&self) -> bool {
        match self {
            ParseNode::Literal(_) => true,
            ParseNode::FunctionCall(call) => call.is_constant(),
            _ => false,
        }
    }
}

impl fmt::Display for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseNode::Literal(literal) => {
                write!(f, "{}", crate::expr::literal::value_string(&literal.value))
            }
            ParseNode::ColumnRef { name, .. } => write!(f, "{}", name),
            ParseNode::BindParameter { index } => write!(f, "?{}", index + 1),
            ParseNode::FunctionCall(call) => write!(f, "{}", call),
        }
    }
}

/// Function invocation as parsed: a normalized name plus raw child nodes.
/// The call is constant iff every child is constant.
#[derive(Clone, Debug)]
pub struct FunctionCallNode {
    name: String,
    children: Vec<ParseNode>,
    is_constant: bool,
}

impl FunctionCallNode {
    pub fn new(name: &str, children: Vec<ParseNode>) -> Self {
        let is_constant = children.iter().all(ParseNode::is_constant);
        FunctionCallNode {
            name: name.to_lowercase(),
            children,
            is_constant,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[ParseNode] {
        &self.children
    }

    pub fn is_constant(&self) -> bool {
        self.is_constant
    }
}

impl fmt::Display for FunctionCallNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", child)?;
        }
        write!(f, ")")
    }
}
