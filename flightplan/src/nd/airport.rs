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

use super::{Fix, Runway};
use crate::measurements::Altitude;
use crate::MagneticVariation;

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Airport {
    pub(crate) icao_ident: String,
    pub(crate) region: Option<String>,
    pub(crate) coordinate: Point<f64>,
    pub(crate) elevation: Altitude,
    pub(crate) mag_var: Option<MagneticVariation>,
    pub(crate) runways: Vec<Runway>,
}

impl Airport {
    pub fn new(icao_ident: &str, coordinate: Point<f64>, elevation: Altitude) -> Self {
        Self {
            icao_ident: icao_ident.to_string(),
            region: None,
            coordinate,
            elevation,
            mag_var: None,
            runways: Vec::new(),
        }
    }

    /// Sets the two-letter ICAO region of the airport.
    pub fn in_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    pub fn with_mag_var(mut self, mag_var: MagneticVariation) -> Self {
        self.mag_var = Some(mag_var);
        self
    }

    pub fn with_runway(mut self, runway: Runway) -> Self {
        self.runways.push(runway);
        self
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// The elevation of the airport reference point.
    pub fn elevation(&self) -> Altitude {
        self.elevation
    }

    pub fn mag_var(&self) -> Option<MagneticVariation> {
        self.mag_var
    }

    pub fn runways(&self) -> &[Runway] {
        &self.runways
    }

    /// Returns the runway with the `designator`.
    ///
    /// The designator may be prefixed with `RW` as it is used in procedures.
    pub fn runway(&self, designator: &str) -> Option<&Runway> {
        let designator = designator.strip_prefix("RW").unwrap_or(designator);
        self.runways.iter().find(|rwy| rwy.designator == designator)
    }
}

impl Fix for Airport {
    fn ident(&self) -> String {
        self.icao_ident.clone()
    }

    fn coordinate(&self) -> Point<f64> {
        self.coordinate
    }
}
