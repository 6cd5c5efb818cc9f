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
use thiserror::Error;

/// Errors surfaced while resolving and compiling function calls. Every
/// failure terminates the current statement's compilation; nothing is
/// retried or swallowed.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Malformed built-in declaration. Raised while the registry is built,
    /// so it is fatal at startup and never seen per query.
    #[error("invalid declaration for {function}: {reason}")]
    Configuration { function: String, reason: String },

    /// An argument failed its type, constancy, or enumeration constraint.
    /// `location` names the function and the 1-based argument position.
    #[error("type mismatch: expected {expected} but got {actual} at {location}")]
    ArgumentTypeMismatch {
        expected: String,
        actual: String,
        location: String,
    },

    #[error("{function} expects {min} to {max} arguments, got {actual}")]
    ArityMismatch {
        function: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Unexpected failure while instantiating a function expression. The
    /// underlying cause is preserved; compiler-level errors raised inside a
    /// builder are propagated as-is instead of being wrapped here.
    #[error("failed to construct function expression {function}")]
    Compilation {
        function: String,
        #[source]
        source: anyhow::Error,
    },
}
