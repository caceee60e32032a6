// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the error types for handle operations.

use std::fmt;

/// A convenience `Result` alias for fallible handle operations.
pub type HandleResult<T> = Result<T, HandleError>;

/// An error returned by a handle operation that requires an owned value.
///
/// Most misuses of a handle are rejected at compile time (copying,
/// touching a moved-from binding, aliasing during a transfer), so the
/// runtime error surface is deliberately small.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleError {
    /// The operation needs an owned value, but the handle is empty.
    ///
    /// A handle becomes empty when it is constructed that way, after its
    /// value is moved out with `take`, or after an explicit `reset`.
    Empty,
}

impl fmt::Display for HandleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleError::Empty => write!(f, "Handle owns no value"),
        }
    }
}

impl std::error::Error for HandleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(format!("{}", HandleError::Empty), "Handle owns no value");
    }
}
