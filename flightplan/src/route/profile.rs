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
use log::{debug, info, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Route, Warning};
use crate::error::{Error, Result};
use crate::fp::Performance;
use crate::measurements::{Altitude, Length};
use crate::nd::Fix;
use crate::VerticalDistance;

/// Altitudes within this tolerance meet a restriction.
const RESTRICTION_TOLERANCE_FT: f32 = 100.0;

/// The phase of flight at a point of the route.
///
/// The phases follow each other in this order. A profile never returns to an
/// earlier phase.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FlightPhase {
    Climb,
    Cruise,
    Descent,
}

/// The profile's altitude at the end of a leg.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProfilePoint {
    /// Index of the leg in the route.
    pub leg: usize,
    /// Distance from the departure.
    pub dist: Length,
    pub altitude: Altitude,
    pub phase: FlightPhase,
}

/// The vertical profile of a route.
///
/// The aircraft climbs from the departure elevation with the climb gradient
/// of the [`Performance`] until reaching the cruise level at the top of climb
/// (TOC). It stays at the cruise level until the top of descent (TOD) from
/// which it descends with the descent gradient to the destination elevation.
///
/// If the route is too short to reach the cruise level, climb and descent
/// meet at the apex which is reported as
/// [`Warning::CruiseAltitudeUnreachable`]. Altitude restrictions of the legs
/// that the profile doesn't meet are reported as
/// [`Warning::AltitudeRestrictionViolation`].
///
/// The profile is never stored with the route and computed again whenever the
/// route or performance changes.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VerticalProfile {
    departure_elevation: Altitude,
    destination_elevation: Altitude,
    cruise: VerticalDistance,
    top: Altitude,
    climb_gradient: f32,
    descent_gradient: f32,
    total: Length,
    toc: Length,
    tod: Length,
    toc_position: Option<Point<f64>>,
    tod_position: Option<Point<f64>>,
    points: Vec<ProfilePoint>,
    warnings: Vec<Warning>,
}

impl VerticalProfile {
    /// Computes the profile of the `route` flown with the `perf`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPerformance`] if the performance has no
    /// positive climb or descent and [`Error::InvalidCruiseAltitude`] if the
    /// cruise level is below the departure elevation.
    pub fn compute(route: &Route, perf: &Performance) -> Result<Self> {
        perf.validate()?;

        let e0 = route.departure().elevation();
        let e1 = route.destination().elevation();
        let cruise = perf
            .cruise_level
            .to_altitude(e0)
            .filter(|cruise| *cruise >= e0)
            .ok_or(Error::InvalidCruiseAltitude {
                cruise: perf.cruise_level,
                elevation: e0.to_ft().round() as i32,
            })?;

        let gc = perf.climb_gradient();
        let gd = perf.descent_gradient();
        let total = route.total_distance().to_nm();

        let climb = (cruise - e0).to_ft() / gc;
        let descent = ((cruise - e1).to_ft() / gd).max(0.0);

        let mut warnings = Vec::new();

        let (toc, tod, top) = if climb + descent > total {
            // climb and descent meet where both lines cross
            let x = ((e1.to_ft() + gd * total - e0.to_ft()) / (gc + gd)).clamp(0.0, total);
            let apex = Altitude::ft(e0.to_ft() + gc * x);

            let warning = Warning::CruiseAltitudeUnreachable {
                cruise: perf.cruise_level,
                apex,
            };
            warn!("{warning}");
            warnings.push(warning);

            (x, x, apex)
        } else {
            (climb, total - descent, cruise)
        };

        debug!("TOC at {toc:.1} NM and TOD at {tod:.1} NM with top at {top}");

        let mut profile = Self {
            departure_elevation: e0,
            destination_elevation: e1,
            cruise: perf.cruise_level,
            top,
            climb_gradient: gc,
            descent_gradient: gd,
            total: Length::nm(total),
            toc: Length::nm(toc),
            tod: Length::nm(tod),
            toc_position: route.position_at(Length::nm(toc)),
            tod_position: route.position_at(Length::nm(tod)),
            points: Vec::new(),
            warnings,
        };

        for (i, leg) in route.legs().iter().enumerate() {
            if leg.is_missed_approach() {
                continue;
            }

            let dist = *leg.cum_dist();
            let altitude = profile.altitude_at(dist);
            let phase = profile.phase_at(dist);

            profile.points.push(ProfilePoint {
                leg: i,
                dist,
                altitude,
                phase,
            });

            if leg.altitude().is_none() {
                continue;
            }

            // restrictions above ground refer to the nearer airport
            let elevation = if dist.to_nm() <= total / 2.0 { e0 } else { e1 };
            let tolerance = Altitude::ft(RESTRICTION_TOLERANCE_FT);

            if !leg.altitude().is_met(altitude, elevation, tolerance) {
                let warning = Warning::AltitudeRestrictionViolation {
                    leg: i,
                    ident: leg.ident(),
                    required: *leg.altitude(),
                    computed: altitude,
                };
                warn!("{warning}");
                profile.warnings.push(warning);
            }
        }

        info!(
            "vertical profile of {} to {} computed",
            route.departure().ident(),
            route.destination().ident()
        );

        Ok(profile)
    }

    /// The distance from the departure to the top of climb.
    pub fn toc(&self) -> &Length {
        &self.toc
    }

    /// The distance from the departure to the top of descent.
    pub fn tod(&self) -> &Length {
        &self.tod
    }

    pub fn toc_position(&self) -> Option<Point<f64>> {
        self.toc_position
    }

    pub fn tod_position(&self) -> Option<Point<f64>> {
        self.tod_position
    }

    /// The highest altitude of the profile.
    ///
    /// This is the cruise altitude or the apex if the cruise level can't be
    /// reached.
    pub fn top_altitude(&self) -> &Altitude {
        &self.top
    }

    /// The apex if the cruise level can't be reached.
    pub fn apex(&self) -> Option<&Altitude> {
        self.warnings
            .iter()
            .any(|w| matches!(w, Warning::CruiseAltitudeUnreachable { .. }))
            .then_some(&self.top)
    }

    pub fn cruise_level(&self) -> &VerticalDistance {
        &self.cruise
    }

    /// The altitude at the end of each leg without the missed approach.
    pub fn points(&self) -> &[ProfilePoint] {
        &self.points
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// The altitude after flying `dist` from the departure.
    ///
    /// The altitude is interpolated linearly between the departure, TOC, TOD
    /// and destination.
    pub fn altitude_at(&self, dist: Length) -> Altitude {
        let d = dist.to_nm().clamp(0.0, self.total.to_nm());
        let top = self.top.to_ft();

        let ft = if d <= self.toc.to_nm() {
            (self.departure_elevation.to_ft() + self.climb_gradient * d).min(top)
        } else if d < self.tod.to_nm() {
            top
        } else {
            let to_go = self.total.to_nm() - d;
            (self.destination_elevation.to_ft() + self.descent_gradient * to_go).min(top)
        };

        Altitude::ft(ft)
    }

    /// The phase of flight after flying `dist` from the departure.
    pub fn phase_at(&self, dist: Length) -> FlightPhase {
        let d = dist.to_nm();
        if d < self.toc.to_nm() {
            FlightPhase::Climb
        } else if d < self.tod.to_nm() {
            FlightPhase::Cruise
        } else {
            FlightPhase::Descent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurements::Speed;
    use crate::nd::fixtures::{equator_nd, nd};
    use crate::nd::AltitudeRestriction;
    use crate::route::RouteBuilder;

    fn perf(fpm: f32, level: VerticalDistance) -> Performance {
        Performance {
            climb_rate: Speed::fpm(fpm),
            climb_speed: Speed::kt(180.0),
            descent_rate: Speed::fpm(fpm),
            descent_speed: Speed::kt(180.0),
            cruise_speed: Speed::kt(450.0),
            cruise_level: level,
        }
    }

    fn date() -> time::Date {
        time::Date::from_calendar_date(2026, time::Month::January, 1).unwrap()
    }

    fn equator_route() -> Route {
        RouteBuilder::new()
            .departure("KAAA")
            .destination("KBBB")
            .on_date(date())
            .build(&equator_nd())
            .expect("route should build")
    }

    #[test]
    fn cruise_between_toc_and_tod() {
        let route = equator_route();
        // 600 ft/NM reaches 6000 ft after 10 NM
        let perf = perf(1800.0, VerticalDistance::Altitude(6000));
        let profile = VerticalProfile::compute(&route, &perf).expect("profile should compute");

        assert!((profile.toc().to_nm() - 10.0).abs() < 0.01);
        assert!((profile.tod().to_nm() - (route.total_distance().to_nm() - 10.0)).abs() < 0.01);
        assert!(profile.apex().is_none());
        assert_eq!(profile.phase_at(Length::nm(5.0)), FlightPhase::Climb);
        assert_eq!(profile.phase_at(Length::nm(25.0)), FlightPhase::Cruise);
        assert_eq!(profile.phase_at(Length::nm(45.0)), FlightPhase::Descent);
        assert!((profile.altitude_at(Length::nm(5.0)).to_ft() - 3000.0).abs() < 1.0);

        let last = profile.points().last().expect("should have points");
        assert!(last.altitude.to_ft().abs() < 1.0);
        assert_eq!(last.phase, FlightPhase::Descent);
    }

    #[test]
    fn apex_when_cruise_is_unreachable() {
        let route = equator_route();
        let profile = VerticalProfile::compute(&route, &perf(1750.0, VerticalDistance::Fl(350)))
            .expect("short route is no error");

        let apex = profile.apex().expect("should have apex").to_ft();
        assert!(apex < 35000.0);
        assert!((apex - 14583.0).abs() < 50.0);
        assert_eq!(profile.toc(), profile.tod());
        assert!(matches!(
            profile.warnings(),
            [Warning::CruiseAltitudeUnreachable { .. }]
        ));
    }

    #[test]
    fn zero_length_route() {
        let route = RouteBuilder::new()
            .departure("KAAA")
            .destination("KAAA")
            .on_date(date())
            .build(&equator_nd())
            .expect("route should build");

        let profile = VerticalProfile::compute(&route, &perf(1000.0, VerticalDistance::Fl(100)))
            .expect("profile should compute");
        assert_eq!(profile.toc().to_nm(), 0.0);
        assert_eq!(profile.tod().to_nm(), 0.0);
    }

    #[test]
    fn invalid_inputs() {
        let route = equator_route();

        assert_eq!(
            VerticalProfile::compute(&route, &perf(0.0, VerticalDistance::Fl(100))),
            Err(Error::InvalidPerformance("climb rate must be positive"))
        );
        assert_eq!(
            VerticalProfile::compute(&route, &perf(1000.0, VerticalDistance::Unlimited)),
            Err(Error::InvalidCruiseAltitude {
                cruise: VerticalDistance::Unlimited,
                elevation: 0
            })
        );
    }

    #[test]
    fn reports_restriction_violations() {
        let nd = nd();
        let route = RouteBuilder::new()
            .departure("KJFK")
            .waypoint("HOWID")
            .star("STAR", None)
            .destination("KBOS")
            .on_date(date())
            .build(&nd)
            .expect("route should build");

        // a steep descent of 1500 ft/NM starts late and passes MILTT, which
        // is at or below 8000 ft, at about 17700 ft
        let steep = Performance {
            climb_rate: Speed::fpm(3000.0),
            climb_speed: Speed::kt(120.0),
            descent_rate: Speed::fpm(3000.0),
            descent_speed: Speed::kt(120.0),
            ..perf(1000.0, VerticalDistance::Fl(350))
        };
        let profile = VerticalProfile::compute(&route, &steep).expect("profile should compute");

        let violation = profile.warnings().iter().find_map(|w| match w {
            Warning::AltitudeRestrictionViolation {
                ident, required, ..
            } => Some((ident.clone(), *required)),
            _ => None,
        });
        assert_eq!(
            violation,
            Some((
                "MILTT".to_string(),
                AltitudeRestriction::AtOrBelow(VerticalDistance::Altitude(8000))
            ))
        );
    }

    #[test]
    fn idempotent() {
        let route = equator_route();
        let perf = perf(1750.0, VerticalDistance::Fl(350));
        assert_eq!(
            VerticalProfile::compute(&route, &perf),
            VerticalProfile::compute(&route, &perf)
        );
    }
}
