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

use super::{Fix, FixType};
use crate::MagneticVariation;

/// An enroute or terminal waypoint, VOR or NDB.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Waypoint {
    pub(crate) fix_ident: String,
    pub(crate) region: Option<String>,
    pub(crate) kind: FixType,
    pub(crate) coordinate: Point<f64>,
    pub(crate) mag_var: Option<MagneticVariation>,
}

impl Waypoint {
    pub fn new(fix_ident: &str, kind: FixType, coordinate: Point<f64>) -> Self {
        Self {
            fix_ident: fix_ident.to_string(),
            region: None,
            kind,
            coordinate,
            mag_var: None,
        }
    }

    pub fn in_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    /// Sets the published variation, which is the station declination for
    /// VORs.
    pub fn with_mag_var(mut self, mag_var: MagneticVariation) -> Self {
        self.mag_var = Some(mag_var);
        self
    }

    pub fn kind(&self) -> FixType {
        self.kind
    }
}

impl Fix for Waypoint {
    fn ident(&self) -> String {
        self.fix_ident.clone()
    }

    fn coordinate(&self) -> Point<f64> {
        self.coordinate
    }
}
