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

use std::cmp::{Ord, Ordering, PartialOrd};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::measurements::Altitude;

mod constants {
    pub const METER_IN_FEET: f32 = 3.28084;
}

/// A vertical distance as published or entered by the pilot.
///
/// Levels keep their original reference so a route string can be written
/// back as it was entered. To compare or interpolate them, they are resolved
/// to an [`Altitude`] at standard pressure.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub enum VerticalDistance {
    /// Altitude in feet with reference to the local air pressure.
    Altitude(u16),

    /// Flight level in hundreds of feet at standard air pressure.
    Fl(u16),

    /// Ground level.
    Gnd,

    /// An unlimited vertical distance.
    Unlimited,
}

impl VerticalDistance {
    /// Resolves this vertical distance to an altitude above mean sea level.
    ///
    /// Flight levels are taken at standard pressure and ground level is the
    /// `elevation`. Returns `None` for [`VerticalDistance::Unlimited`].
    pub fn to_altitude(&self, elevation: Altitude) -> Option<Altitude> {
        match self {
            Self::Gnd => Some(elevation),
            Self::Altitude(ft) => Some(Altitude::ft(*ft as f32)),
            Self::Fl(fl) => Some(Altitude::ft(*fl as f32 * 100.0)),
            Self::Unlimited => None,
        }
    }

    /// Feet above mean sea level with ground at zero.
    fn ft(&self) -> u32 {
        match self {
            Self::Gnd => 0,
            Self::Altitude(ft) => *ft as u32,
            Self::Fl(fl) => *fl as u32 * 100,
            Self::Unlimited => u32::MAX,
        }
    }

    /// Encodes the level as ICAO level group, e.g. `F350` or `A045`.
    ///
    /// Altitudes are rounded to hundreds of feet. Ground and unlimited levels
    /// have no ICAO representation.
    pub fn to_icao(&self) -> Option<String> {
        match self {
            Self::Fl(fl) => Some(format!("F{fl:03}")),
            Self::Altitude(ft) => Some(format!("A{:03}", (*ft as f32 / 100.0).round() as u16)),
            Self::Gnd | Self::Unlimited => None,
        }
    }
}

impl FromStr for VerticalDistance {
    type Err = Error;

    /// Parses a string `s` to return a VerticalDistance.
    ///
    /// The string should be according to ICAO Doc. 4444 Annex 2:
    /// - Flight level, expressed as F followed by 3 figures e.g. `F085`
    /// - Standard metric level in tens of metres, expressed by S followed by 4
    ///   figures e.g. `S1130`
    /// - Altitude in hundreds of feet, expressed as A followed by 3 figures
    ///   e.g. `A045`
    /// - Altitude in tens of metres, expressed as M followed by 4 figures e.g.
    ///   `M0840`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        macro_rules! value {
            ($s:expr, $len:expr) => {
                $s.get(1..)
                    .filter(|digits| digits.len() == $len)
                    .and_then(|digits| digits.parse::<u16>().ok())
                    .ok_or(Error::UnexpectedString)
            };
        }

        match s.get(0..1).unwrap_or_default() {
            "F" => Ok(Self::Fl(value!(s, 3)?)),
            "S" => Ok(Self::Fl(
                // tens of meter to hundreds of feet
                (value!(s, 4)? as f32 * constants::METER_IN_FEET / 10.0).round() as u16,
            )),
            "A" => Ok(Self::Altitude(value!(s, 3)? * 100)),
            "M" => Ok(Self::Altitude(
                (value!(s, 4)? as f32 * 10.0 * constants::METER_IN_FEET).round() as u16,
            )),
            _ => Err(Error::UnexpectedString),
        }
    }
}

impl fmt::Display for VerticalDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerticalDistance::Gnd => write!(f, "GND"),
            VerticalDistance::Fl(value) => write!(f, "FL{value}"),
            VerticalDistance::Altitude(value) => write!(f, "{value} ft"),
            VerticalDistance::Unlimited => write!(f, "unlimited"),
        }
    }
}

impl Ord for VerticalDistance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ft().cmp(&other.ft())
    }
}

impl PartialOrd for VerticalDistance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_distance_from_str() {
        assert_eq!(
            "F350".parse::<VerticalDistance>(),
            Ok(VerticalDistance::Fl(350))
        );
        assert_eq!(
            "S1130".parse::<VerticalDistance>(),
            Ok(VerticalDistance::Fl(371))
        );
        assert_eq!(
            "A045".parse::<VerticalDistance>(),
            Ok(VerticalDistance::Altitude(4500))
        );
        assert_eq!(
            "M0762".parse::<VerticalDistance>(),
            Ok(VerticalDistance::Altitude(25000))
        );
        assert_eq!(
            "F08".parse::<VerticalDistance>(),
            Err(Error::UnexpectedString)
        );
    }

    #[test]
    fn encodes_icao_level_group() {
        assert_eq!(VerticalDistance::Fl(85).to_icao().as_deref(), Some("F085"));
        assert_eq!(
            VerticalDistance::Altitude(4500).to_icao().as_deref(),
            Some("A045")
        );
        assert_eq!(VerticalDistance::Gnd.to_icao(), None);
    }

    #[test]
    fn gnd_is_least_and_unlimited_greatest() {
        assert!(VerticalDistance::Gnd < VerticalDistance::Altitude(1000));
        assert!(VerticalDistance::Gnd < VerticalDistance::Fl(10));
        assert!(VerticalDistance::Unlimited > VerticalDistance::Fl(600));
    }

    #[test]
    fn compares_altitudes_with_flight_levels() {
        assert!(VerticalDistance::Altitude(9000) < VerticalDistance::Fl(100));
        assert_eq!(
            VerticalDistance::Altitude(10000).cmp(&VerticalDistance::Fl(100)),
            Ordering::Equal
        );
    }

    #[test]
    fn resolves_to_altitude() {
        let elevation = Altitude::ft(13.0);
        let fl = VerticalDistance::Fl(350).to_altitude(elevation).unwrap();
        assert_eq!(fl.to_ft().round(), 35000.0);

        let gnd = VerticalDistance::Gnd.to_altitude(elevation).unwrap();
        assert_eq!(gnd.to_ft().round(), 13.0);

        assert!(VerticalDistance::Unlimited.to_altitude(elevation).is_none());
    }
}
