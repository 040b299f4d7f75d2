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

//! Navigation data around New York and Boston used by the tests.
//!
//! Procedures are simplified and some coordinates are made up, but the
//! geography is close enough for plausible courses and distances.

use super::*;
use crate::measurements::{Altitude, Angle};
use crate::{MagneticVariation, VerticalDistance};

fn vor(ident: &str, lat: f64, lon: f64) -> Waypoint {
    Waypoint::new(ident, FixType::Vor, coord!(lat, lon))
        .in_region("K6")
        .with_mag_var(MagneticVariation::West(13.0))
}

fn wpt(ident: &str, lat: f64, lon: f64) -> Waypoint {
    Waypoint::new(ident, FixType::Waypoint, coord!(lat, lon)).in_region("K6")
}

fn rwy(designator: &str, lat: f64, lon: f64, bearing: f32, elevation: f32) -> Runway {
    Runway {
        designator: designator.to_string(),
        coordinate: coord!(lat, lon),
        bearing: Angle::t(bearing),
        elevation: Altitude::ft(elevation),
    }
}

pub(crate) fn leg(path: LegPath) -> ProcedureLegRecord {
    ProcedureLegRecord::new(path)
}

pub(crate) fn tf(ident: &str) -> ProcedureLegRecord {
    leg(LegPath::TrackToFix {
        fix: FixRef::in_region(ident, "K6"),
    })
}

pub(crate) fn initial(ident: &str) -> ProcedureLegRecord {
    leg(LegPath::InitialFix {
        fix: FixRef::in_region(ident, "K6"),
    })
}

fn ft(altitude: u16) -> VerticalDistance {
    VerticalDistance::Altitude(altitude)
}

fn lendy6() -> Procedure {
    Procedure::new("KJFK", ProcedureKind::Sid, "LENDY6")
        .for_runway("04L")
        .with_legs(vec![
            leg(LegPath::CourseToAltitude {
                course: Angle::m(44.0),
                altitude: ft(1000),
            })
            .with_altitude(AltitudeRestriction::AtOrAbove(ft(1000))),
            leg(LegPath::DirectToFix {
                fix: FixRef::in_region("LENDY", "K6"),
            })
            .with_turn(TurnDirection::Left),
        ])
        .with_transition("CCC", vec![tf("DPK"), tf("CCC")])
}

fn star() -> Procedure {
    Procedure::new("KBOS", ProcedureKind::Star, "STAR")
        .with_legs(vec![
            tf("MILTT").with_altitude(AltitudeRestriction::AtOrBelow(ft(8000)))
        ])
        .with_transition("ILS22", vec![initial("HOWID")])
        .with_transition("PVD", vec![initial("PVD"), tf("HOWID")])
}

fn ooshn5() -> Procedure {
    Procedure::new("KBOS", ProcedureKind::Star, "OOSHN5")
        .for_runway("22L")
        .with_legs(vec![initial("HOWID"), tf("MILTT")])
}

fn i04r() -> Procedure {
    Procedure::new("KBOS", ProcedureKind::Approach, "I04R")
        .for_runway("04R")
        .with_transition("MILTT", vec![initial("MILTT")])
        .with_legs(vec![
            leg(LegPath::CourseToFix {
                course: Angle::m(50.0),
                fix: FixRef::in_region("ROSLY", "K6"),
                recommended: None,
            })
            .with_altitude(AltitudeRestriction::At(ft(2000))),
            leg(LegPath::CourseToFix {
                course: Angle::m(50.0),
                fix: FixRef::in_region("RW04R", "KBOS"),
                recommended: None,
            }),
        ])
        .with_missed_approach(vec![
            leg(LegPath::CourseToAltitude {
                course: Angle::m(50.0),
                altitude: ft(1500),
            }),
            leg(LegPath::DirectToFix {
                fix: FixRef::in_region("MILTT", "K6"),
            }),
            leg(LegPath::HoldToManual {
                fix: FixRef::in_region("MILTT", "K6"),
                course: Angle::m(50.0),
                length: HoldLength::Time(crate::measurements::Duration::minutes(1.0)),
            })
            .with_turn(TurnDirection::Right),
        ])
}

/// Navigation data with KJFK, KBOS and the airways V1 and V16 between them.
pub(crate) fn nd() -> NavigationData {
    let mut builder = NavigationDataBuilder::new();

    builder.add_airport(
        Airport::new("KJFK", coord!(40.6398, -73.7789), Altitude::ft(13.0))
            .in_region("K6")
            .with_mag_var(MagneticVariation::West(13.0))
            .with_runway(rwy("04L", 40.6223, -73.7858, 31.0, 12.0))
            .with_runway(rwy("22R", 40.6450, -73.7630, 211.0, 13.0)),
    );
    builder.add_airport(
        Airport::new("KBOS", coord!(42.3643, -71.0052), Altitude::ft(20.0))
            .in_region("K6")
            .with_mag_var(MagneticVariation::West(14.0))
            .with_runway(rwy("04R", 42.3535, -71.0124, 35.0, 15.0))
            .with_runway(rwy("22L", 42.3781, -70.9891, 215.0, 17.0)),
    );
    builder.add_airport(
        Airport::new("KPVD", coord!(41.7240, -71.4282), Altitude::ft(55.0))
            .in_region("K6")
            .with_mag_var(MagneticVariation::West(14.0)),
    );

    builder.add_waypoint(vor("JFK", 40.6328, -73.7713));
    builder.add_waypoint(vor("DPK", 40.7919, -73.3035));
    builder.add_waypoint(vor("CCC", 40.9297, -72.7986));
    builder.add_waypoint(vor("HTO", 40.9192, -72.3168));
    builder.add_waypoint(vor("PVD", 41.7244, -71.4296));
    builder.add_waypoint(wpt("LENDY", 40.9153, -74.1358));
    builder.add_waypoint(wpt("HOWID", 42.0350, -71.2000));
    builder.add_waypoint(wpt("MILTT", 42.2000, -71.1500));
    builder.add_waypoint(wpt("ROSLY", 42.2900, -71.0700));
    // an unrelated navaid in Germany with the same ident
    builder.add_waypoint(
        Waypoint::new("DPK", FixType::Ndb, coord!(50.0300, 8.5700)).in_region("ED"),
    );

    builder.add_airway(
        "V1",
        ["JFK", "DPK", "CCC", "HTO"]
            .into_iter()
            .map(|ident| FixRef::in_region(ident, "K6"))
            .collect(),
    );
    builder.add_airway(
        "V16",
        ["HTO", "PVD", "HOWID"]
            .into_iter()
            .map(|ident| FixRef::in_region(ident, "K6"))
            .collect(),
    );

    builder.add_procedure(lendy6());
    builder.add_procedure(star());
    builder.add_procedure(ooshn5());
    builder.add_procedure(i04r());

    builder.build()
}

/// Two airports on the equator that are 50 NM apart.
pub(crate) fn equator_nd() -> NavigationData {
    let mut builder = NavigationDataBuilder::new();
    builder.add_airport(Airport::new("KAAA", coord!(0.0, 0.0), Altitude::ft(0.0)));
    builder.add_airport(Airport::new("KBBB", coord!(0.0, 0.832), Altitude::ft(0.0)));
    builder.build()
}
