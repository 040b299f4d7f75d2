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
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{constants, Length, Measurement, PhysicalQuantity, UnitOfMeasure};

/// Altitude unit with _m_ as SI unit.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub enum AltitudeUnit {
    Feet,
    Meters,
}

impl UnitOfMeasure<f32> for AltitudeUnit {
    fn quantity() -> PhysicalQuantity {
        PhysicalQuantity::Length
    }

    fn si() -> Self {
        Self::Meters
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::Feet => "ft",
            Self::Meters => "m",
        }
    }

    fn from_si(value: f32, to: &Self) -> f32 {
        match to {
            Self::Meters => value,
            Self::Feet => value / constants::FEET_IN_METER,
        }
    }

    fn to_si(&self, value: &f32) -> f32 {
        match self {
            Self::Meters => *value,
            Self::Feet => value * constants::FEET_IN_METER,
        }
    }
}

/// Altitude above mean sea level (MSL) at standard pressure.
///
/// Flight levels and altitudes of the route are resolved to this common
/// reference by [`VerticalDistance::to_altitude`] so the vertical profile can
/// interpolate between them.
///
/// [`VerticalDistance::to_altitude`]: crate::VerticalDistance::to_altitude
pub type Altitude = Measurement<f32, AltitudeUnit>;

impl Altitude {
    /// Creates an altitude in feet above MSL.
    pub fn ft(value: f32) -> Self {
        Self {
            value,
            unit: AltitudeUnit::Feet,
        }
    }

    /// Creates an altitude in meters above MSL.
    pub fn m(value: f32) -> Self {
        Self {
            value,
            unit: AltitudeUnit::Meters,
        }
    }

    /// Returns the altitude in feet as plain number.
    pub fn to_ft(&self) -> f32 {
        *self.convert_to(AltitudeUnit::Feet).value()
    }

    /// The altitude gained with a `gradient` in feet per nautical mile over
    /// the horizontal `dist`.
    pub fn gained(gradient: f32, dist: Length) -> Self {
        Self::ft(gradient * dist.to_nm())
    }
}
