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
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{constants, Measurement, PhysicalQuantity, UnitOfMeasure};
use crate::error::Error;

/// Speed unit with _m/s_ as SI unit.
///
/// Feet per minute is used for vertical speeds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub enum SpeedUnit {
    MetersPerSecond,
    Knots,
    KilometersPerHour,
    FeetPerMinute,
}

impl UnitOfMeasure<f32> for SpeedUnit {
    fn quantity() -> PhysicalQuantity {
        PhysicalQuantity::Velocity
    }

    fn si() -> Self {
        Self::MetersPerSecond
    }

    fn symbol(&self) -> &'static str {
        match self {
            Self::MetersPerSecond => "m/s",
            Self::Knots => "kt",
            Self::KilometersPerHour => "km/h",
            Self::FeetPerMinute => "ft/min",
        }
    }

    fn from_si(value: f32, to: &Self) -> f32 {
        match to {
            Self::MetersPerSecond => value,
            Self::Knots => value * constants::METER_PER_SECONDS_IN_KNOTS,
            Self::KilometersPerHour => {
                value * constants::KILOMETERS_PER_HOUR_IN_METER_PER_SECONDS
            }
            Self::FeetPerMinute => {
                value / constants::FEET_IN_METER * constants::SECONDS_IN_MINUTE
            }
        }
    }

    fn to_si(&self, value: &f32) -> f32 {
        match self {
            Self::MetersPerSecond => *value,
            Self::Knots => value / constants::METER_PER_SECONDS_IN_KNOTS,
            Self::KilometersPerHour => {
                value / constants::KILOMETERS_PER_HOUR_IN_METER_PER_SECONDS
            }
            Self::FeetPerMinute => {
                value * constants::FEET_IN_METER / constants::SECONDS_IN_MINUTE
            }
        }
    }
}

pub type Speed = Measurement<f32, SpeedUnit>;

impl Speed {
    pub fn kt(value: f32) -> Self {
        Self {
            value,
            unit: SpeedUnit::Knots,
        }
    }

    pub fn kmh(value: f32) -> Self {
        Self {
            value,
            unit: SpeedUnit::KilometersPerHour,
        }
    }

    /// Vertical speed in feet per minute.
    pub fn fpm(value: f32) -> Self {
        Self {
            value,
            unit: SpeedUnit::FeetPerMinute,
        }
    }
}

impl FromStr for Speed {
    type Err = Error;

    /// Parses an ICAO speed group.
    ///
    /// Knots are given as `N` followed by 4 figures e.g. `N0450` and
    /// kilometers per hour as `K` followed by 4 figures e.g. `K0830`. Pilots
    /// tend to drop the leading zero, so `N450` is accepted as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .get(1..)
            .filter(|digits| {
                (3..=4).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
            })
            .and_then(|digits| digits.parse::<f32>().ok())
            .ok_or(Error::UnexpectedString)?;

        match s.get(0..1) {
            Some("N") => Ok(Self::kt(value)),
            Some("K") => Ok(Self::kmh(value)),
            _ => Err(Error::UnexpectedString),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_from_str() {
        assert_eq!("N0450".parse::<Speed>(), Ok(Speed::kt(450.0)));
        assert_eq!("N450".parse::<Speed>(), Ok(Speed::kt(450.0)));
        assert_eq!("K0830".parse::<Speed>(), Ok(Speed::kmh(830.0)));
        assert_eq!("N45".parse::<Speed>(), Err(Error::UnexpectedString));
        assert_eq!("NOVEM".parse::<Speed>(), Err(Error::UnexpectedString));
    }

    #[test]
    fn converts_vertical_speed() {
        let fpm = Speed::fpm(1000.0);
        assert!((fpm.to_si() - 5.08).abs() < 0.001);
    }
}
