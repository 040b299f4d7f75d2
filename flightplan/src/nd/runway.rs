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

use crate::measurements::{Altitude, Angle};

/// A runway end.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Runway {
    /// The designator without `RW` prefix, e.g. `04L`.
    pub designator: String,
    /// The threshold of the runway.
    pub coordinate: Point<f64>,
    /// The true bearing of the runway.
    pub bearing: Angle,
    /// The threshold elevation.
    pub elevation: Altitude,
}

impl Runway {
    /// The ident of the runway end as used in procedures, e.g. `RW04L`.
    pub fn ident(&self) -> String {
        format!("RW{}", self.designator)
    }
}
