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

use std::rc::Rc;

use geo::Point;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Airport, Fix, FixType, Runway, Waypoint};
use crate::measurements::Altitude;
use crate::MagneticVariation;

/// A fix found in the navigation data.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NavAid {
    Airport(Rc<Airport>),
    Waypoint(Rc<Waypoint>),
    RunwayEnd {
        airport: Rc<Airport>,
        runway: Runway,
    },
}

impl NavAid {
    pub fn fix_type(&self) -> FixType {
        match self {
            Self::Airport(_) => FixType::Airport,
            Self::Waypoint(wp) => wp.kind,
            Self::RunwayEnd { .. } => FixType::RunwayEnd,
        }
    }

    /// The ICAO region of the fix.
    ///
    /// Runway ends are in the region of their airport's ident, as they are
    /// referenced in procedures.
    pub fn region(&self) -> Option<&str> {
        match self {
            Self::Airport(arpt) => arpt.region(),
            Self::Waypoint(wp) => wp.region.as_deref(),
            Self::RunwayEnd { airport, .. } => Some(&airport.icao_ident),
        }
    }

    pub fn mag_var(&self) -> Option<MagneticVariation> {
        match self {
            Self::Airport(arpt) => arpt.mag_var,
            Self::Waypoint(wp) => wp.mag_var,
            Self::RunwayEnd { airport, .. } => airport.mag_var,
        }
    }

    pub fn elevation(&self) -> Option<Altitude> {
        match self {
            Self::Airport(arpt) => Some(arpt.elevation),
            Self::Waypoint(_) => None,
            Self::RunwayEnd { runway, .. } => Some(runway.elevation),
        }
    }

    /// Returns `true` if both are the same point with the same ident.
    pub fn is_same(&self, other: &NavAid) -> bool {
        self.ident() == other.ident() && self.coordinate() == other.coordinate()
    }
}

impl Fix for NavAid {
    fn ident(&self) -> String {
        match self {
            Self::Airport(arpt) => arpt.ident(),
            Self::Waypoint(wp) => wp.ident(),
            Self::RunwayEnd { runway, .. } => runway.ident(),
        }
    }

    fn coordinate(&self) -> Point<f64> {
        match self {
            Self::Airport(arpt) => arpt.coordinate(),
            Self::Waypoint(wp) => wp.coordinate(),
            Self::RunwayEnd { runway, .. } => runway.coordinate,
        }
    }
}
