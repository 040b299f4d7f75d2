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
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geom;
use crate::measurements::{Angle, Length};
use crate::nd::*;
use crate::MagneticVariation;

/// Where a leg ends.
///
/// Legs that end at an altitude, a DME distance or by intercepting the next
/// leg have no fix but a computed position with a label like `(1000)`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LegEnd {
    Fix(NavAid),
    Position {
        label: String,
        coordinate: Point<f64>,
    },
}

impl LegEnd {
    pub fn ident(&self) -> String {
        match self {
            Self::Fix(fix) => fix.ident(),
            Self::Position { label, .. } => label.clone(),
        }
    }

    pub fn coordinate(&self) -> Point<f64> {
        match self {
            Self::Fix(fix) => fix.coordinate(),
            Self::Position { coordinate, .. } => *coordinate,
        }
    }

    pub fn fix(&self) -> Option<&NavAid> {
        match self {
            Self::Fix(fix) => Some(fix),
            Self::Position { .. } => None,
        }
    }
}

/// The origin of a leg within the route.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LegKind {
    /// The departure or destination airport.
    Airport,
    Runway,
    Procedure,
    /// A leg along the named airway.
    Airway(String),
    Direct,
}

/// The procedure and transition a leg belongs to.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcedureMembership {
    pub kind: ProcedureKind,
    pub name: String,
    pub transition: Option<String>,
}

/// A holding at the end of a leg.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hold {
    /// The true inbound course to the holding fix.
    pub inbound: Angle,
    pub turn: TurnDirection,
    pub length: HoldLength,
}

/// A concrete leg of an assembled route.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteLeg {
    pub(crate) from: Point<f64>,
    pub(crate) to: LegEnd,
    pub(crate) kind: LegKind,
    pub(crate) path: Vec<Point<f64>>,
    pub(crate) leg_path: Option<LegPath>,
    pub(crate) bearing: Option<Angle>,
    pub(crate) mc: Option<Angle>,
    pub(crate) mag_var: Option<MagneticVariation>,
    pub(crate) turn: TurnDirection,
    pub(crate) dist: Length,
    pub(crate) cum_dist: Length,
    pub(crate) altitude: AltitudeRestriction,
    pub(crate) speed: Option<SpeedRestriction>,
    pub(crate) procedure: Option<ProcedureMembership>,
    pub(crate) hold: Option<Hold>,
    pub(crate) missed_approach: bool,
    pub(crate) fly_over: bool,
}

impl RouteLeg {
    pub(crate) fn new(
        from: Point<f64>,
        to: LegEnd,
        kind: LegKind,
        path: Vec<Point<f64>>,
        dist: Length,
    ) -> Self {
        Self {
            from,
            to,
            kind,
            path,
            leg_path: None,
            bearing: None,
            mc: None,
            mag_var: None,
            turn: TurnDirection::Either,
            dist,
            cum_dist: Length::nm(0.0),
            altitude: AltitudeRestriction::None,
            speed: None,
            procedure: None,
            hold: None,
            missed_approach: false,
            fly_over: false,
        }
    }

    /// The leg at the airport itself, which starts and ends the route.
    pub(crate) fn airport(arpt: &Rc<Airport>) -> Self {
        let coordinate = arpt.coordinate();
        let mut leg = Self::new(
            coordinate,
            LegEnd::Fix(NavAid::Airport(Rc::clone(arpt))),
            LegKind::Airport,
            vec![coordinate],
            Length::nm(0.0),
        );
        leg.mag_var = arpt.mag_var();
        leg
    }

    /// A great circle leg `from` a point direct `to` the fix.
    pub(crate) fn direct(
        from: Point<f64>,
        to: NavAid,
        kind: LegKind,
        mag_var: Option<MagneticVariation>,
    ) -> Self {
        let coordinate = to.coordinate();
        let dist = geom::dist(from, coordinate)
            .convert_to(crate::measurements::LengthUnit::NauticalMiles);

        let mut leg = Self::new(from, LegEnd::Fix(to), kind, vec![from, coordinate], dist);
        if dist.to_nm() > 0.0 {
            leg.set_course(geom::bearing(from, coordinate), mag_var);
        } else {
            leg.mag_var = mag_var;
        }
        leg
    }

    /// Sets the true course and the magnetic course derived from the
    /// variation.
    pub(crate) fn set_course(&mut self, bearing: Angle, mag_var: Option<MagneticVariation>) {
        self.bearing = Some(bearing);
        self.mc = Some(mag_var.unwrap_or_default().to_magnetic(bearing));
        self.mag_var = mag_var;
    }

    pub fn from(&self) -> Point<f64> {
        self.from
    }

    /// Where the leg ends.
    pub fn to(&self) -> &LegEnd {
        &self.to
    }

    /// The ident of the fix or label of the position the leg ends at.
    pub fn ident(&self) -> String {
        self.to.ident()
    }

    pub fn fix(&self) -> Option<&NavAid> {
        self.to.fix()
    }

    pub fn kind(&self) -> &LegKind {
        &self.kind
    }

    /// The points to render the leg, from its start to its end.
    ///
    /// Holdings are appended after the end point.
    pub fn path(&self) -> &[Point<f64>] {
        &self.path
    }

    /// The leg record's path terminator if it's a procedure leg.
    pub fn leg_path(&self) -> Option<&LegPath> {
        self.leg_path.as_ref()
    }

    /// The true course of the leg.
    pub fn bearing(&self) -> Option<&Angle> {
        self.bearing.as_ref()
    }

    /// The magnetic course of the leg.
    pub fn mc(&self) -> Option<&Angle> {
        self.mc.as_ref()
    }

    /// Returns `true` if no variation was known and the magnetic course
    /// equals the true course.
    pub fn is_mag_var_estimated(&self) -> bool {
        self.bearing.is_some() && self.mag_var.is_none()
    }

    pub fn turn(&self) -> TurnDirection {
        self.turn
    }

    /// The distance the leg adds to the route.
    ///
    /// Holdings and legs that end manually add no distance.
    pub fn dist(&self) -> &Length {
        &self.dist
    }

    /// The distance from the start of the route to the end of this leg.
    pub fn cum_dist(&self) -> &Length {
        &self.cum_dist
    }

    pub fn altitude(&self) -> &AltitudeRestriction {
        &self.altitude
    }

    pub fn speed(&self) -> Option<&SpeedRestriction> {
        self.speed.as_ref()
    }

    pub fn procedure(&self) -> Option<&ProcedureMembership> {
        self.procedure.as_ref()
    }

    pub fn hold(&self) -> Option<&Hold> {
        self.hold.as_ref()
    }

    pub fn is_missed_approach(&self) -> bool {
        self.missed_approach
    }

    pub fn is_fly_over(&self) -> bool {
        self.fly_over
    }

    /// Returns `true` if the leg ends at the same fix as the `other` without
    /// flying anywhere.
    pub(crate) fn repeats(&self, other: &RouteLeg) -> bool {
        match (self.fix(), other.fix()) {
            (Some(a), Some(b)) => a.is_same(b) && self.dist.to_nm() < 0.01 && self.hold.is_none(),
            _ => false,
        }
    }
}

/// Resolves the magnetic variation at the `point`.
///
/// The published variation of the fix is used first, then the airport's and
/// last the world magnetic model. Returns `None` if nothing is known.
pub(crate) fn resolve_variation(
    fix: Option<&NavAid>,
    airport: Option<&Airport>,
    point: Point<f64>,
    date: time::Date,
) -> Option<MagneticVariation> {
    fix.and_then(NavAid::mag_var)
        .or_else(|| airport.and_then(Airport::mag_var))
        .or_else(|| {
            let var = MagneticVariation::from_model(point, date);
            debug!("magnetic variation from model at {point:?}: {var:?}");
            var
        })
}
