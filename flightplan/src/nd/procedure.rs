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

//! Published procedures as ordered leg records.
//!
//! A leg record describes how a leg is flown by its ARINC 424 path
//! terminator. Each [`LegPath`] variant carries only the fields the path
//! terminator needs. The records are turned into geometric legs by the
//! [`LegBuilder`](crate::route::LegBuilder).

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::measurements::{Altitude, Angle, Duration, Length, Speed};
use crate::VerticalDistance;

/// Reference to a fix by ident and optional ICAO region.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixRef {
    pub ident: String,
    pub region: Option<String>,
}

impl FixRef {
    pub fn new(ident: &str) -> Self {
        Self {
            ident: ident.to_string(),
            region: None,
        }
    }

    pub fn in_region(ident: &str, region: &str) -> Self {
        Self {
            ident: ident.to_string(),
            region: Some(region.to_string()),
        }
    }
}

impl From<&str> for FixRef {
    fn from(ident: &str) -> Self {
        Self::new(ident)
    }
}

impl fmt::Display for FixRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{} ({region})", self.ident),
            None => write!(f, "{}", self.ident),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TurnDirection {
    Left,
    Right,
    #[default]
    Either,
}

/// The length of the outbound leg of a holding.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HoldLength {
    Distance(Length),
    Time(Duration),
}

impl HoldLength {
    /// The outbound distance flown with the `speed`.
    pub fn dist_at(&self, speed: Speed) -> Length {
        match self {
            Self::Distance(dist) => *dist,
            Self::Time(time) => Length::m(speed.to_si() * time.to_si()),
        }
    }
}

/// The altitude restriction at the end of a leg.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AltitudeRestriction {
    #[default]
    None,
    At(VerticalDistance),
    AtOrAbove(VerticalDistance),
    AtOrBelow(VerticalDistance),
    Between {
        above: VerticalDistance,
        below: VerticalDistance,
    },
}

impl AltitudeRestriction {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The lowest altitude allowed by the restriction.
    pub fn lower(&self, elevation: Altitude) -> Option<Altitude> {
        match self {
            Self::At(vd) | Self::AtOrAbove(vd) => vd.to_altitude(elevation),
            Self::Between { above, .. } => above.to_altitude(elevation),
            Self::None | Self::AtOrBelow(_) => None,
        }
    }

    /// The highest altitude allowed by the restriction.
    pub fn upper(&self, elevation: Altitude) -> Option<Altitude> {
        match self {
            Self::At(vd) | Self::AtOrBelow(vd) => vd.to_altitude(elevation),
            Self::Between { below, .. } => below.to_altitude(elevation),
            Self::None | Self::AtOrAbove(_) => None,
        }
    }

    /// Returns `true` if the `altitude` is within the restriction with some
    /// `tolerance`.
    pub fn is_met(&self, altitude: Altitude, elevation: Altitude, tolerance: Altitude) -> bool {
        let above_lower = self
            .lower(elevation)
            .map_or(true, |lower| altitude + tolerance >= lower);
        let below_upper = self
            .upper(elevation)
            .map_or(true, |upper| altitude - tolerance <= upper);
        above_lower && below_upper
    }
}

impl fmt::Display for AltitudeRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::At(vd) => write!(f, "at {vd}"),
            Self::AtOrAbove(vd) => write!(f, "at or above {vd}"),
            Self::AtOrBelow(vd) => write!(f, "at or below {vd}"),
            Self::Between { above, below } => write!(f, "between {above} and {below}"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpeedRestriction {
    At(Speed),
    AtOrAbove(Speed),
    AtOrBelow(Speed),
}

/// How a leg is flown and where it terminates.
///
/// Courses, headings and radials are published magnetic unless created with
/// [`Angle::t`].
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LegPath {
    /// IF
    InitialFix { fix: FixRef },
    /// TF
    TrackToFix { fix: FixRef },
    /// CF
    CourseToFix {
        course: Angle,
        fix: FixRef,
        recommended: Option<FixRef>,
    },
    /// DF
    DirectToFix { fix: FixRef },
    /// FA
    FixToAltitude {
        fix: FixRef,
        course: Angle,
        altitude: VerticalDistance,
    },
    /// FC
    TrackFromFixForDistance {
        fix: FixRef,
        course: Angle,
        dist: Length,
    },
    /// FD
    TrackFromFixToDme {
        fix: FixRef,
        course: Angle,
        recommended: FixRef,
        dme: Length,
    },
    /// FM
    FixToManual { fix: FixRef, course: Angle },
    /// CA
    CourseToAltitude {
        course: Angle,
        altitude: VerticalDistance,
    },
    /// CD
    CourseToDme {
        course: Angle,
        recommended: FixRef,
        dme: Length,
    },
    /// CI
    CourseToIntercept { course: Angle },
    /// CR
    CourseToRadial {
        course: Angle,
        recommended: FixRef,
        radial: Angle,
    },
    /// AF, a DME arc around the recommended navaid.
    ArcToFix {
        fix: FixRef,
        recommended: FixRef,
        radius: Length,
    },
    /// RF, a constant radius arc around the center fix.
    RadiusToFix { fix: FixRef, center: FixRef },
    /// VA
    HeadingToAltitude {
        heading: Angle,
        altitude: VerticalDistance,
    },
    /// VD
    HeadingToDme {
        heading: Angle,
        recommended: FixRef,
        dme: Length,
    },
    /// VI
    HeadingToIntercept { heading: Angle },
    /// VM
    HeadingToManual { heading: Angle },
    /// VR
    HeadingToRadial {
        heading: Angle,
        recommended: FixRef,
        radial: Angle,
    },
    /// PI, a procedure turn with the outbound `course` from the fix.
    ProcedureTurn {
        fix: FixRef,
        course: Angle,
        dist: Length,
    },
    /// HA, with the inbound `course` to the holding fix.
    HoldToAltitude {
        fix: FixRef,
        course: Angle,
        length: HoldLength,
        altitude: VerticalDistance,
    },
    /// HF
    HoldToFix {
        fix: FixRef,
        course: Angle,
        length: HoldLength,
    },
    /// HM
    HoldToManual {
        fix: FixRef,
        course: Angle,
        length: HoldLength,
    },
}

impl LegPath {
    /// The two letter ARINC 424 path terminator.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InitialFix { .. } => "IF",
            Self::TrackToFix { .. } => "TF",
            Self::CourseToFix { .. } => "CF",
            Self::DirectToFix { .. } => "DF",
            Self::FixToAltitude { .. } => "FA",
            Self::TrackFromFixForDistance { .. } => "FC",
            Self::TrackFromFixToDme { .. } => "FD",
            Self::FixToManual { .. } => "FM",
            Self::CourseToAltitude { .. } => "CA",
            Self::CourseToDme { .. } => "CD",
            Self::CourseToIntercept { .. } => "CI",
            Self::CourseToRadial { .. } => "CR",
            Self::ArcToFix { .. } => "AF",
            Self::RadiusToFix { .. } => "RF",
            Self::HeadingToAltitude { .. } => "VA",
            Self::HeadingToDme { .. } => "VD",
            Self::HeadingToIntercept { .. } => "VI",
            Self::HeadingToManual { .. } => "VM",
            Self::HeadingToRadial { .. } => "VR",
            Self::ProcedureTurn { .. } => "PI",
            Self::HoldToAltitude { .. } => "HA",
            Self::HoldToFix { .. } => "HF",
            Self::HoldToManual { .. } => "HM",
        }
    }

    /// The fix at which the leg starts or terminates.
    pub fn fix(&self) -> Option<&FixRef> {
        match self {
            Self::InitialFix { fix }
            | Self::TrackToFix { fix }
            | Self::CourseToFix { fix, .. }
            | Self::DirectToFix { fix }
            | Self::FixToAltitude { fix, .. }
            | Self::TrackFromFixForDistance { fix, .. }
            | Self::TrackFromFixToDme { fix, .. }
            | Self::FixToManual { fix, .. }
            | Self::ArcToFix { fix, .. }
            | Self::RadiusToFix { fix, .. }
            | Self::ProcedureTurn { fix, .. }
            | Self::HoldToAltitude { fix, .. }
            | Self::HoldToFix { fix, .. }
            | Self::HoldToManual { fix, .. } => Some(fix),
            _ => None,
        }
    }

    /// The fix at which the leg terminates.
    ///
    /// Legs that only start at their fix, like FA or FM, have none.
    pub fn end_fix(&self) -> Option<&FixRef> {
        match self {
            Self::InitialFix { fix }
            | Self::TrackToFix { fix }
            | Self::CourseToFix { fix, .. }
            | Self::DirectToFix { fix }
            | Self::ArcToFix { fix, .. }
            | Self::RadiusToFix { fix, .. } => Some(fix),
            hold if hold.is_hold() => hold.fix(),
            _ => None,
        }
    }

    pub fn is_hold(&self) -> bool {
        matches!(
            self,
            Self::HoldToAltitude { .. } | Self::HoldToFix { .. } | Self::HoldToManual { .. }
        )
    }

    /// Returns `true` for legs that end by intercepting the next leg.
    pub fn is_intercept(&self) -> bool {
        matches!(
            self,
            Self::CourseToIntercept { .. } | Self::HeadingToIntercept { .. }
        )
    }
}

/// One row of a published procedure.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcedureLegRecord {
    pub path: LegPath,
    pub altitude: AltitudeRestriction,
    pub speed: Option<SpeedRestriction>,
    pub turn: TurnDirection,
    pub fly_over: bool,
}

impl ProcedureLegRecord {
    pub fn new(path: LegPath) -> Self {
        Self {
            path,
            altitude: AltitudeRestriction::None,
            speed: None,
            turn: TurnDirection::Either,
            fly_over: false,
        }
    }

    pub fn with_altitude(mut self, altitude: AltitudeRestriction) -> Self {
        self.altitude = altitude;
        self
    }

    pub fn with_speed(mut self, speed: SpeedRestriction) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_turn(mut self, turn: TurnDirection) -> Self {
        self.turn = turn;
        self
    }

    pub fn fly_over(mut self) -> Self {
        self.fly_over = true;
        self
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProcedureKind {
    Sid,
    Star,
    Approach,
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sid => write!(f, "SID"),
            Self::Star => write!(f, "STAR"),
            Self::Approach => write!(f, "approach"),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transition {
    pub name: String,
    pub legs: Vec<ProcedureLegRecord>,
}

/// A published SID, STAR or approach of an airport.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Procedure {
    pub(crate) airport: String,
    pub(crate) kind: ProcedureKind,
    pub(crate) name: String,
    pub(crate) runway: Option<String>,
    pub(crate) legs: Vec<ProcedureLegRecord>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) missed_approach: Vec<ProcedureLegRecord>,
}

impl Procedure {
    pub fn new(airport: &str, kind: ProcedureKind, name: &str) -> Self {
        Self {
            airport: airport.to_string(),
            kind,
            name: name.to_string(),
            runway: None,
            legs: Vec::new(),
            transitions: Vec::new(),
            missed_approach: Vec::new(),
        }
    }

    /// Sets the runway the procedure is published for, e.g. `22L`.
    pub fn for_runway(mut self, designator: &str) -> Self {
        self.runway = Some(designator.to_string());
        self
    }

    /// Sets the common legs flown regardless of the transition.
    pub fn with_legs(mut self, legs: Vec<ProcedureLegRecord>) -> Self {
        self.legs = legs;
        self
    }

    pub fn with_transition(mut self, name: &str, legs: Vec<ProcedureLegRecord>) -> Self {
        self.transitions.push(Transition {
            name: name.to_string(),
            legs,
        });
        self
    }

    pub fn with_missed_approach(mut self, legs: Vec<ProcedureLegRecord>) -> Self {
        self.missed_approach = legs;
        self
    }

    pub fn airport(&self) -> &str {
        &self.airport
    }

    pub fn kind(&self) -> ProcedureKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn runway(&self) -> Option<&str> {
        self.runway.as_deref()
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn transition(&self, name: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.name == name)
    }

    pub fn missed_approach(&self) -> &[ProcedureLegRecord] {
        &self.missed_approach
    }

    /// Returns the legs flown with the `transition` in order.
    ///
    /// SID transitions continue after the common legs. STAR and approach
    /// transitions lead to the common legs.
    pub fn legs(&self, transition: Option<&str>) -> Result<Vec<ProcedureLegRecord>, Error> {
        let transition = match transition {
            Some(name) => Some(self.transition(name).ok_or_else(|| Error::UnknownTransition {
                procedure: self.name.clone(),
                transition: name.to_string(),
            })?),
            None => None,
        };

        let transition_legs = transition.map(|t| t.legs.as_slice()).unwrap_or_default();

        Ok(match self.kind {
            ProcedureKind::Sid => [self.legs.as_slice(), transition_legs].concat(),
            ProcedureKind::Star | ProcedureKind::Approach => {
                [transition_legs, self.legs.as_slice()].concat()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tf(ident: &str) -> ProcedureLegRecord {
        ProcedureLegRecord::new(LegPath::TrackToFix {
            fix: FixRef::new(ident),
        })
    }

    fn idents(legs: &[ProcedureLegRecord]) -> Vec<&str> {
        legs.iter()
            .filter_map(|leg| leg.path.fix())
            .map(|fix| fix.ident.as_str())
            .collect()
    }

    #[test]
    fn sid_transition_follows_common_legs() {
        let sid = Procedure::new("KJFK", ProcedureKind::Sid, "TEST1")
            .with_legs(vec![tf("A"), tf("B")])
            .with_transition("C", vec![tf("C")]);

        assert_eq!(idents(&sid.legs(Some("C")).unwrap()), ["A", "B", "C"]);
        assert_eq!(idents(&sid.legs(None).unwrap()), ["A", "B"]);
    }

    #[test]
    fn star_transition_leads_to_common_legs() {
        let star = Procedure::new("KBOS", ProcedureKind::Star, "TEST1")
            .with_legs(vec![tf("B"), tf("C")])
            .with_transition("A", vec![tf("A")]);

        assert_eq!(idents(&star.legs(Some("A")).unwrap()), ["A", "B", "C"]);
    }

    #[test]
    fn unknown_transition() {
        let star = Procedure::new("KBOS", ProcedureKind::Star, "TEST1");
        assert_eq!(
            star.legs(Some("X")),
            Err(Error::UnknownTransition {
                procedure: "TEST1".to_string(),
                transition: "X".to_string()
            })
        );
    }

    #[test]
    fn legs_ending_at_their_fix() {
        let fa = LegPath::FixToAltitude {
            fix: FixRef::new("DPK"),
            course: Angle::m(90.0),
            altitude: VerticalDistance::Altitude(3000),
        };
        assert_eq!(fa.fix().map(|fix| fix.ident.as_str()), Some("DPK"));
        assert_eq!(fa.end_fix(), None);

        let hold = LegPath::HoldToFix {
            fix: FixRef::new("MILTT"),
            course: Angle::m(50.0),
            length: HoldLength::Time(Duration::minutes(1.0)),
        };
        assert_eq!(hold.end_fix().map(|fix| fix.ident.as_str()), Some("MILTT"));
        assert_eq!(tf("CCC").path.end_fix(), Some(&FixRef::new("CCC")));
    }

    #[test]
    fn restriction_with_tolerance() {
        let elevation = Altitude::ft(0.0);
        let tolerance = Altitude::ft(100.0);
        let at_or_above = AltitudeRestriction::AtOrAbove(VerticalDistance::Altitude(3000));

        assert!(at_or_above.is_met(Altitude::ft(2950.0), elevation, tolerance));
        assert!(at_or_above.is_met(Altitude::ft(9000.0), elevation, tolerance));
        assert!(!at_or_above.is_met(Altitude::ft(2000.0), elevation, tolerance));

        let between = AltitudeRestriction::Between {
            above: VerticalDistance::Altitude(3000),
            below: VerticalDistance::Fl(50),
        };
        assert!(between.is_met(Altitude::ft(4000.0), elevation, tolerance));
        assert!(!between.is_met(Altitude::ft(6000.0), elevation, tolerance));
    }

    #[test]
    fn hold_length_by_time() {
        let length = HoldLength::Time(Duration::minutes(1.0));
        let dist = length.dist_at(Speed::kt(180.0));
        assert!((dist.to_nm() - 3.0).abs() < 0.01);
    }
}
