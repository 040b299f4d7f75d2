// SPDX-License-Identifier: Apache-2.0
// Copyright 2024, 2026 Joe Pearson
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

use geo::Point;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A navigable point.
pub trait Fix {
    fn ident(&self) -> String;
    fn coordinate(&self) -> Point<f64>;
}

/// The kind of a fix used to narrow down a lookup.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FixType {
    Airport,
    Vor,
    Ndb,
    Waypoint,
    RunwayEnd,
}
