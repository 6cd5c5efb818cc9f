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
use std::collections::HashMap;

use arrow::datatypes::DataType;

use crate::expr::LiteralValue;

/// Metadata inferred for one bind parameter: a type hint and, when the
/// parameter resolved to a declared default, the default's value.
#[derive(Clone, Debug, PartialEq)]
pub struct BindMetadata {
    pub data_type: Option<DataType>,
    pub value: Option<LiteralValue>,
}

impl BindMetadata {
    pub fn type_hint(data_type: DataType) -> Self {
        BindMetadata {
            data_type: Some(data_type),
            value: None,
        }
    }
}

/// Per-statement sink for bind-parameter metadata. Recording is keyed by
/// parameter index, so repeating a validation records the same entry.
#[derive(Clone, Debug, Default)]
pub struct BindVariableStore {
    params: HashMap<usize, BindMetadata>,
}

impl BindVariableStore {
    pub fn record(&mut self, index: usize, metadata: BindMetadata) {
        self.params.insert(index, metadata);
    }

    pub fn metadata(&self, index: usize) -> Option<&BindMetadata> {
        self.params.get(&index)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Mutable state owned by a single in-flight statement compilation. Never
/// shared across concurrent compilations; each statement gets its own.
#[derive(Clone, Debug, Default)]
pub struct CompileContext {
    binds: BindVariableStore,
    statement_time_micros: Option<i64>,
}

impl CompileContext {
    pub fn new() -> Self {
        CompileContext::default()
    }

    /// Statement time is supplied by the session layer so compile-time
    /// folded values (e.g. current_date) are stable within a statement.
    pub fn with_statement_time(micros: i64) -> Self {
        CompileContext {
            binds: BindVariableStore::default(),
            statement_time_micros: Some(micros),
        }
    }

    pub fn binds(&self) -> &BindVariableStore {
        &self.binds
    }

    pub fn binds_mut(&mut self) -> &mut BindVariableStore {
        &mut self.binds
    }

    pub fn statement_time_micros(&self) -> Option<i64> {
        self.statement_time_micros
    }
}
