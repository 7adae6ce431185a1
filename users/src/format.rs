// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Formatting rules applied to display names.

/// Converts `name` to its upper case representation.
///
/// Follows the Unicode default case mapping with no locale tailoring, so the output can be longer
/// than the input (`ß` becomes `SS`).  The conversion is idempotent.
pub fn format_name(name: &str) -> String {
    name.to_uppercase()
}

/// Capability to format display names.
pub trait NameFormatter {
    /// Returns the formatted version of `name`.
    fn format(&self, name: &str) -> String;
}

/// Formatter that applies `format_name`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UppercaseFormatter;

impl NameFormatter for UppercaseFormatter {
    fn format(&self, name: &str) -> String {
        format_name(name)
    }
}
