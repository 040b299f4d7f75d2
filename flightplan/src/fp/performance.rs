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

use crate::error::{Error, Result};
use crate::measurements::{Speed, SpeedUnit};
use crate::VerticalDistance;

/// The aircraft performance used to compute the vertical profile.
///
/// Rates are vertical speeds and speeds are ground speeds during climb and
/// descent. The gradient of a climb or descent follows from both, e.g. a climb
/// with 1000 ft/min at 120 kt climbs 500 ft per nautical mile.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Performance {
    pub climb_rate: Speed,
    pub climb_speed: Speed,
    pub descent_rate: Speed,
    pub descent_speed: Speed,
    pub cruise_speed: Speed,
    pub cruise_level: VerticalDistance,
}

impl Performance {
    /// Checks that the performance describes a climb and descent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPerformance`] if a rate or speed is zero or
    /// negative.
    pub fn validate(&self) -> Result<()> {
        let positive = |speed: &Speed| speed.to_si() > 0.0 && speed.to_si().is_finite();

        if !positive(&self.climb_rate) {
            return Err(Error::InvalidPerformance("climb rate must be positive"));
        }
        if !positive(&self.climb_speed) {
            return Err(Error::InvalidPerformance("climb speed must be positive"));
        }
        if !positive(&self.descent_rate) {
            return Err(Error::InvalidPerformance("descent rate must be positive"));
        }
        if !positive(&self.descent_speed) {
            return Err(Error::InvalidPerformance("descent speed must be positive"));
        }
        if !positive(&self.cruise_speed) {
            return Err(Error::InvalidPerformance("cruise speed must be positive"));
        }

        Ok(())
    }

    /// Feet climbed per nautical mile.
    pub fn climb_gradient(&self) -> f32 {
        gradient(self.climb_rate, self.climb_speed)
    }

    /// Feet descended per nautical mile.
    pub fn descent_gradient(&self) -> f32 {
        gradient(self.descent_rate, self.descent_speed)
    }
}

fn gradient(rate: Speed, speed: Speed) -> f32 {
    let fpm = *rate.convert_to(SpeedUnit::FeetPerMinute).value();
    let kt = *speed.convert_to(SpeedUnit::Knots).value();
    fpm / (kt / 60.0)
}
