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

use geo::Point;
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use world_magnetic_model::uom::si::angle::degree;
use world_magnetic_model::uom::si::f32::{Angle as ModelAngle, Length as ModelLength};
use world_magnetic_model::uom::si::length::meter;
use world_magnetic_model::GeomagneticField;

use crate::measurements::{Angle, AngleUnit};

/// The magnetic variation (declination) at a position.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MagneticVariation {
    /// Easterly variation in degree.
    East(f32),
    /// Westerly variation in degree.
    West(f32),
    /// Used in high latitudes where courses are published as true courses.
    OrientedToTrueNorth,
}

impl MagneticVariation {
    /// Estimates the variation at the `point` on the `date` from the World
    /// Magnetic Model.
    ///
    /// Returns `None` if the date is outside the model's validity.
    pub fn from_model(point: Point<f64>, date: time::Date) -> Option<Self> {
        let field = GeomagneticField::new(
            ModelLength::new::<meter>(0.0),
            ModelAngle::new::<degree>(point.y() as f32),
            ModelAngle::new::<degree>(point.x() as f32),
            date,
        );

        match field {
            Ok(field) => Some(Self::from(field.declination().get::<degree>())),
            Err(e) => {
                debug!("no magnetic model for {date}: {e:?}");
                None
            }
        }
    }

    /// Estimates the variation at the `point` for today.
    pub fn today(point: Point<f64>) -> Option<Self> {
        Self::from_model(point, time::OffsetDateTime::now_utc().date())
    }

    /// The variation in degree with easterly variation being positive.
    pub fn degree(&self) -> f32 {
        match self {
            Self::East(d) => *d,
            Self::West(d) => -*d,
            Self::OrientedToTrueNorth => 0.0,
        }
    }

    /// Converts a course to magnetic north.
    ///
    /// Magnetic courses are returned unchanged.
    pub fn to_magnetic(&self, course: Angle) -> Angle {
        match course.unit() {
            AngleUnit::TrueNorth if *self != Self::OrientedToTrueNorth => {
                Angle::m(course.value() - self.degree())
            }
            AngleUnit::TrueNorth => Angle::m(*course.value()),
            _ => course,
        }
    }

    /// Converts a course to true north.
    ///
    /// True courses are returned unchanged.
    pub fn to_true(&self, course: Angle) -> Angle {
        match course.unit() {
            AngleUnit::MagneticNorth => Angle::t(course.value() + self.degree()),
            _ => course,
        }
    }
}

impl From<f32> for MagneticVariation {
    /// Creates the variation from degree with easterly variation being
    /// positive.
    fn from(degrees: f32) -> Self {
        if degrees < 0.0 {
            Self::West(-degrees)
        } else {
            Self::East(degrees)
        }
    }
}

impl Default for MagneticVariation {
    fn default() -> Self {
        Self::East(0.0)
    }
}

impl fmt::Display for MagneticVariation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::East(d) => write!(f, "{d:.1}°E"),
            Self::West(d) => write!(f, "{d:.1}°W"),
            Self::OrientedToTrueNorth => write!(f, "T"),
        }
    }
}
