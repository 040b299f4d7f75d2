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

use std::fmt;
use std::ops::{Add, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The reference of an angle.
///
/// Courses and bearings are referenced to true or magnetic north and are
/// always wrapped into `[0°, 360°)`. Plain radians are used for arc sweeps
/// which may be negative or exceed a full circle.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub enum AngleUnit {
    TrueNorth,
    MagneticNorth,
    Radians,
}

/// An angle, e.g. a course, heading, bearing or arc sweep.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Angle {
    value: f32,
    unit: AngleUnit,
}

fn wrap(degree: f32) -> f32 {
    let wrapped = degree.rem_euclid(360.0);
    // rem_euclid may round up to exactly 360 for tiny negative values
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

impl Angle {
    /// Angle in degree referenced to true north.
    pub fn t(degree: f32) -> Self {
        Self {
            value: wrap(degree),
            unit: AngleUnit::TrueNorth,
        }
    }

    /// Angle in degree referenced to magnetic north.
    pub fn m(degree: f32) -> Self {
        Self {
            value: wrap(degree),
            unit: AngleUnit::MagneticNorth,
        }
    }

    pub fn rad(value: f32) -> Self {
        Self {
            value,
            unit: AngleUnit::Radians,
        }
    }

    pub fn from_si(value: f32, unit: AngleUnit) -> Self {
        match unit {
            AngleUnit::TrueNorth => Self::t(value.to_degrees()),
            AngleUnit::MagneticNorth => Self::m(value.to_degrees()),
            AngleUnit::Radians => Self::rad(value),
        }
    }

    /// The angle in degree or radians depending on the unit.
    pub fn value(&self) -> &f32 {
        &self.value
    }

    pub fn unit(&self) -> &AngleUnit {
        &self.unit
    }

    /// The angle in radians.
    pub fn to_si(&self) -> f32 {
        match self.unit {
            AngleUnit::Radians => self.value,
            _ => self.value.to_radians(),
        }
    }

    /// The opposite direction.
    pub fn reciprocal(&self) -> Self {
        *self + Self::from_si(std::f32::consts::PI, self.unit)
    }

    /// Signed difference in degree from this angle to the `other` in the
    /// range `(-180°, 180°]`. Positive values are turns to the right.
    pub fn delta(&self, other: &Angle) -> f32 {
        let diff = wrap(other.to_si().to_degrees() - self.to_si().to_degrees());
        if diff > 180.0 {
            diff - 360.0
        } else {
            diff
        }
    }
}

impl Add for Angle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::from_si(self.to_si() + rhs.to_si(), self.unit)
    }
}

impl Sub for Angle {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_si(self.to_si() - rhs.to_si(), self.unit)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            AngleUnit::TrueNorth => write!(f, "{:03.0}°T", self.value),
            AngleUnit::MagneticNorth => write!(f, "{:03.0}°M", self.value),
            AngleUnit::Radians => write!(f, "{} rad", self.value),
        }
    }
}
