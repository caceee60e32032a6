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

//! Provides the exclusive-ownership handle primitive and its error type.
//!
//! This module defines the "common language" for single-owner resource
//! management in Monos. A [`UniqueHandle`] is the sole owner of one
//! heap-allocated value: release happens exactly once when the handle is
//! destroyed, ownership moves but never duplicates, and duplication is a
//! compile-time error rather than a runtime check.
//!
//! The key components are:
//! - The [`UniqueHandle`] type: the owning handle itself.
//! - [`HandleError`] and [`HandleResult`]: the error contract for the few
//!   operations that can fail at runtime.
//!
//! Every ownership event flows into the counters declared in
//! [`crate::memory`], so tests and telemetry can observe that each owned
//! value is released exactly once.

mod error;
mod unique;

pub use error::*;
pub use unique::*;
