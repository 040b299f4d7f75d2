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

//! Builds geometric legs from procedure leg records.

use std::rc::Rc;

use geo::Point;
use log::{debug, trace};

use super::leg::{resolve_variation, Hold, LegEnd, LegKind, ProcedureMembership, RouteLeg};
use crate::error::{Error, Result};
use crate::geom;
use crate::measurements::{Altitude, Angle, Length, LengthUnit, Speed};
use crate::nd::*;
use crate::{MagneticVariation, VerticalDistance};

/// Climb gradient in feet per nautical mile used for altitude terminated
/// legs if no other is set.
pub const DEFAULT_CLIMB_GRADIENT: f32 = 200.0;

/// Length drawn for legs that end manually or don't find their termination.
const STUB_NM: f32 = 2.0;

/// How far to search along a course for its termination.
const SEARCH_LIMIT_NM: f32 = 100.0;

const INTERCEPT_TOLERANCE_DEG: f64 = 1.0;

const DME_TOLERANCE_NM: f64 = 0.05;

/// Speed to convert timed holdings into a distance.
const HOLD_SPEED_KT: f32 = 180.0;

const HOLD_WIDTH_NM: f32 = 2.0;

const PROCEDURE_TURN_OFFSET_NM: f32 = 1.0;

/// Where a leg starts.
#[derive(Clone, PartialEq, Debug)]
pub struct LegStart {
    pub coordinate: Point<f64>,
    pub fix: Option<NavAid>,
    /// The estimated altitude at the start, used by altitude terminated legs.
    pub altitude: Altitude,
}

impl LegStart {
    pub fn at_fix(fix: NavAid, altitude: Altitude) -> Self {
        Self {
            coordinate: fix.coordinate(),
            fix: Some(fix),
            altitude,
        }
    }

    pub fn at(coordinate: Point<f64>, altitude: Altitude) -> Self {
        Self {
            coordinate,
            fix: None,
            altitude,
        }
    }
}

/// The geometry of a leg before it becomes a [`RouteLeg`].
struct Geometry {
    to: LegEnd,
    path: Vec<Point<f64>>,
    dist: Length,
    bearing: Option<Angle>,
    mag_var: Option<MagneticVariation>,
    hold: Option<Hold>,
}

/// Converts [procedure leg records] into [route legs].
///
/// The builder resolves the fixes of the records with the navigation data
/// and computes where each leg ends. Legs that end at an altitude climb with
/// the climb gradient from the altitude at their start.
///
/// [procedure leg records]: ProcedureLegRecord
/// [route legs]: RouteLeg
pub struct LegBuilder<'a> {
    nd: &'a dyn NavDataLookup,
    airport: Option<Rc<Airport>>,
    procedure: Option<ProcedureMembership>,
    climb_gradient: f32,
    altitude: Option<Altitude>,
    date: time::Date,
    missed_approach: bool,
}

impl<'a> LegBuilder<'a> {
    pub fn new(nd: &'a dyn NavDataLookup) -> Self {
        Self {
            nd,
            airport: None,
            procedure: None,
            climb_gradient: DEFAULT_CLIMB_GRADIENT,
            altitude: None,
            date: time::OffsetDateTime::now_utc().date(),
            missed_approach: false,
        }
    }

    /// Sets the airport of the procedure.
    ///
    /// Legs without a previous leg start at the airport and its variation is
    /// used if a fix has none.
    pub fn at_airport(mut self, airport: Rc<Airport>) -> Self {
        self.airport = Some(airport);
        self
    }

    /// Tags the built legs with the procedure.
    pub fn for_procedure(mut self, procedure: ProcedureMembership) -> Self {
        self.procedure = Some(procedure);
        self
    }

    /// Sets the climb gradient in feet per nautical mile.
    pub fn climb_gradient(mut self, gradient: f32) -> Self {
        self.climb_gradient = gradient;
        self
    }

    /// Sets the altitude at the start of the first leg.
    pub fn initial_altitude(mut self, altitude: Altitude) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// Sets the date to estimate the magnetic variation from the model.
    pub fn on_date(mut self, date: time::Date) -> Self {
        self.date = date;
        self
    }

    /// Marks the built legs as missed approach legs.
    pub fn missed_approach(mut self, missed_approach: bool) -> Self {
        self.missed_approach = missed_approach;
        self
    }

    /// Builds the leg of the `record` that continues from the `previous` leg.
    ///
    /// The aircraft `heading` at the start decides the turn direction of
    /// direct-to legs. Intercept legs can't know the leg they intercept and
    /// end after a short stub. Use [`build_sequence`] to close them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingNavaid`] if a fix or recommended navaid of the
    /// record can't be found, and [`Error::MissingLegStart`] for legs that
    /// start at the previous leg if neither the previous leg nor an airport
    /// is known.
    ///
    /// [`build_sequence`]: Self::build_sequence
    pub fn build_leg(
        &self,
        record: &ProcedureLegRecord,
        previous: Option<&LegStart>,
        heading: Option<Angle>,
    ) -> Result<RouteLeg> {
        self.build(record, previous, heading, None)
    }

    /// Builds the legs of the `records` in order beginning at the `start`.
    ///
    /// Each leg starts where the previous ended and intercept legs end where
    /// they meet the following leg.
    pub fn build_sequence(
        &self,
        records: &[ProcedureLegRecord],
        start: Option<LegStart>,
    ) -> Result<Vec<RouteLeg>> {
        let mut legs: Vec<RouteLeg> = Vec::with_capacity(records.len());
        let mut start = start;
        let mut heading: Option<Angle> = None;

        for (i, record) in records.iter().enumerate() {
            // only intercept legs depend on the leg that follows
            let next = if record.path.is_intercept() {
                records.get(i + 1)
            } else {
                None
            };
            let leg = self.build(record, start.as_ref(), heading, next)?;

            let altitude = start
                .as_ref()
                .map_or_else(|| self.start_altitude(), |start| start.altitude);
            let altitude = self.altitude_after(record, altitude, leg.dist);

            heading = leg.bearing.or(heading);
            start = Some(LegStart {
                coordinate: leg.to.coordinate(),
                fix: leg.fix().cloned(),
                altitude,
            });

            legs.push(leg);
        }

        Ok(legs)
    }

    fn build(
        &self,
        record: &ProcedureLegRecord,
        previous: Option<&LegStart>,
        heading: Option<Angle>,
        next: Option<&ProcedureLegRecord>,
    ) -> Result<RouteLeg> {
        let start = previous.cloned().or_else(|| self.origin());
        let near = start.as_ref().map(|start| start.coordinate);
        let altitude = start
            .as_ref()
            .map_or_else(|| self.start_altitude(), |start| start.altitude);
        let code = record.path.code();

        // the point where a leg begins that continues from the previous leg
        let begin = |fallback: Option<&NavAid>| -> Result<Point<f64>> {
            near.or_else(|| fallback.map(Fix::coordinate))
                .ok_or_else(|| Error::MissingLegStart(code.to_string()))
        };

        let mut turn = record.turn;

        let geometry = match &record.path {
            LegPath::InitialFix { fix } | LegPath::TrackToFix { fix } => {
                let fix = self.resolve(fix, near)?;
                let from = begin(Some(&fix))?;
                self.to_fix(from, fix, None)
            }

            LegPath::DirectToFix { fix } => {
                let fix = self.resolve(fix, near)?;
                let from = begin(Some(&fix))?;
                if let (TurnDirection::Either, Some(heading)) = (turn, heading) {
                    let delta = heading.delta(&geom::bearing(from, fix.coordinate()));
                    turn = if delta < 0.0 {
                        TurnDirection::Left
                    } else {
                        TurnDirection::Right
                    };
                }
                self.to_fix(from, fix, None)
            }

            LegPath::CourseToFix {
                course,
                fix,
                recommended,
            } => {
                let fix = self.resolve(fix, near)?;
                // the recommended navaid is only informative on CF legs
                if let Some(recommended) = recommended {
                    if let Err(e) = self.resolve(recommended, Some(fix.coordinate())) {
                        debug!("ignoring recommended navaid of CF leg: {e}");
                    }
                }
                let from = begin(Some(&fix))?;
                let course = self.true_course(*course, Some(&fix), fix.coordinate());
                self.to_fix(from, fix, Some(course))
            }

            LegPath::FixToAltitude {
                fix,
                course,
                altitude: target,
            } => {
                let fix = self.resolve(fix, near)?;
                let (tc, var) = self.true_course(*course, Some(&fix), fix.coordinate());
                let target = self.to_altitude(target, altitude);
                let dist = self.climb_dist(altitude, target);
                let from = begin(Some(&fix))?;
                self.from_fix(from, &fix, tc, dist, alt_label(target), (tc, var))
            }

            LegPath::TrackFromFixForDistance { fix, course, dist } => {
                let fix = self.resolve(fix, near)?;
                let course = self.true_course(*course, Some(&fix), fix.coordinate());
                let from = begin(Some(&fix))?;
                let label = dme_label(&fix.ident(), *dist);
                self.from_fix(from, &fix, course.0, *dist, label, course)
            }

            LegPath::TrackFromFixToDme {
                fix,
                course,
                recommended,
                dme,
            } => {
                let fix = self.resolve(fix, near)?;
                let recommended = self.resolve(recommended, Some(fix.coordinate()))?;
                let course = self.true_course(*course, Some(&fix), fix.coordinate());
                let from = begin(Some(&fix))?;

                let dist = if recommended.is_same(&fix) {
                    *dme
                } else {
                    self.dme_dist(fix.coordinate(), course.0, &recommended, *dme)
                };

                let label = dme_label(&recommended.ident(), *dme);
                self.from_fix(from, &fix, course.0, dist, label, course)
            }

            LegPath::FixToManual { fix, course } => {
                let fix = self.resolve(fix, near)?;
                let course = self.true_course(*course, Some(&fix), fix.coordinate());
                let from = begin(Some(&fix))?;
                let mut geometry = self.from_fix(
                    from,
                    &fix,
                    course.0,
                    Length::nm(STUB_NM),
                    "(VECTORS)".to_string(),
                    course,
                );
                geometry.dist = geom::dist(from, fix.coordinate());
                geometry
            }

            LegPath::CourseToAltitude {
                course,
                altitude: target,
            }
            | LegPath::HeadingToAltitude {
                heading: course,
                altitude: target,
            } => {
                let from = begin(None)?;
                let course = self.true_course(*course, None, from);
                let target = self.to_altitude(target, altitude);
                let dist = self.climb_dist(altitude, target);
                self.along(from, course, dist, alt_label(target))
            }

            LegPath::CourseToDme {
                course,
                recommended,
                dme,
            }
            | LegPath::HeadingToDme {
                heading: course,
                recommended,
                dme,
            } => {
                let from = begin(None)?;
                let recommended = self.resolve(recommended, Some(from))?;
                let course = self.true_course(*course, None, from);
                let dist = self.dme_dist(from, course.0, &recommended, *dme);
                self.along(from, course, dist, dme_label(&recommended.ident(), *dme))
            }

            LegPath::CourseToIntercept { course }
            | LegPath::HeadingToIntercept { heading: course } => {
                let from = begin(None)?;
                let course = self.true_course(*course, None, from);
                let dist = next
                    .and_then(|next| self.intercept(from, course.0, next))
                    .unwrap_or_else(|| {
                        debug!("{code} leg without leg to intercept");
                        Length::nm(STUB_NM)
                    });
                self.along(from, course, dist, "(INTC)".to_string())
            }

            LegPath::CourseToRadial {
                course,
                recommended,
                radial,
            }
            | LegPath::HeadingToRadial {
                heading: course,
                recommended,
                radial,
            } => {
                let from = begin(None)?;
                let recommended = self.resolve(recommended, Some(from))?;
                let course = self.true_course(*course, None, from);
                let (true_radial, _) =
                    self.true_course(*radial, Some(&recommended), recommended.coordinate());
                let center = recommended.coordinate();

                let dist = geom::search_along(
                    from,
                    course.0,
                    Length::nm(SEARCH_LIMIT_NM),
                    INTERCEPT_TOLERANCE_DEG,
                    |p| true_radial.delta(&geom::bearing(center, p)) as f64,
                )
                .unwrap_or_else(|| {
                    debug!("{code} leg doesn't cross radial {radial} of {}", recommended.ident());
                    Length::nm(STUB_NM)
                });

                let label = format!("({}/{:03.0})", recommended.ident(), radial.value());
                self.along(from, course, dist, label)
            }

            LegPath::ArcToFix {
                fix,
                recommended: center,
                ..
            }
            | LegPath::RadiusToFix { fix, center } => {
                let fix = self.resolve(fix, near)?;
                let center = self.resolve(center, Some(fix.coordinate()))?;
                let from = begin(Some(&fix))?;

                if center.is_same(&fix) {
                    debug!("{code} leg around its own fix {} flown as course to fix", fix.ident());
                    let course = self.true_course(
                        geom::bearing(from, fix.coordinate()),
                        Some(&fix),
                        from,
                    );
                    self.to_fix(from, fix, Some(course))
                } else {
                    let clockwise = clockwise(turn, center.coordinate(), from, fix.coordinate());
                    turn = if clockwise {
                        TurnDirection::Right
                    } else {
                        TurnDirection::Left
                    };
                    self.arc(from, fix, center.coordinate(), clockwise, record)
                }
            }

            LegPath::HeadingToManual { heading } => {
                let from = begin(None)?;
                let course = self.true_course(*heading, None, from);
                let mut geometry =
                    self.along(from, course, Length::nm(STUB_NM), "(VECTORS)".to_string());
                geometry.dist = Length::nm(0.0);
                geometry
            }

            LegPath::ProcedureTurn { fix, course, dist } => {
                let fix = self.resolve(fix, near)?;
                let (tc, var) = self.true_course(*course, Some(&fix), fix.coordinate());
                let from = begin(Some(&fix))?;
                let side = if turn == TurnDirection::Right { 1.0 } else { -1.0 };

                let outbound = geom::destination(fix.coordinate(), tc, *dist);
                let turn_out = geom::destination(
                    outbound,
                    tc + Angle::t(45.0 * side),
                    Length::nm(PROCEDURE_TURN_OFFSET_NM),
                );

                let mut path = vec![from, fix.coordinate()];
                path.extend([outbound, turn_out, outbound]);

                Geometry {
                    to: LegEnd::Position {
                        label: "(PT)".to_string(),
                        coordinate: outbound,
                    },
                    path,
                    dist: geom::dist(from, fix.coordinate())
                        + *dist
                        + Length::nm(2.0 * PROCEDURE_TURN_OFFSET_NM),
                    bearing: Some(tc),
                    mag_var: var,
                    hold: None,
                }
            }

            LegPath::HoldToAltitude {
                fix,
                course,
                length,
                ..
            }
            | LegPath::HoldToFix { fix, course, length }
            | LegPath::HoldToManual { fix, course, length } => {
                let fix = self.resolve(fix, near)?;
                let (inbound, _) = self.true_course(*course, Some(&fix), fix.coordinate());
                let from = begin(Some(&fix))?;

                // holdings are right turns unless published otherwise
                if turn == TurnDirection::Either {
                    turn = TurnDirection::Right;
                }

                let hold = Hold {
                    inbound,
                    turn,
                    length: *length,
                };

                let mut geometry = self.to_fix(from, fix.clone(), None);
                geometry.path.extend(racetrack(fix.coordinate(), &hold));
                geometry.hold = Some(hold);
                geometry
            }
        };

        let kind = match geometry.to.fix() {
            Some(NavAid::RunwayEnd { .. }) => LegKind::Runway,
            _ => LegKind::Procedure,
        };

        let from = geometry.path.first().copied().unwrap_or(geometry.to.coordinate());
        let mut leg = RouteLeg::new(
            from,
            geometry.to,
            kind,
            geometry.path,
            geometry.dist.convert_to(LengthUnit::NauticalMiles),
        );

        match geometry.bearing {
            Some(bearing) => leg.set_course(bearing, geometry.mag_var),
            None => leg.mag_var = geometry.mag_var,
        }

        leg.leg_path = Some(record.path.clone());
        leg.turn = turn;
        leg.altitude = record.altitude;
        leg.speed = record.speed;
        leg.procedure = self.procedure.clone();
        leg.hold = geometry.hold;
        leg.missed_approach = self.missed_approach;
        leg.fly_over = record.fly_over;

        trace!("{code} leg to {} with {:.1}", leg.ident(), leg.dist);

        Ok(leg)
    }

    /// Where legs start without a previous leg.
    fn origin(&self) -> Option<LegStart> {
        self.airport.as_ref().map(|arpt| {
            LegStart::at_fix(NavAid::Airport(Rc::clone(arpt)), self.start_altitude())
        })
    }

    fn start_altitude(&self) -> Altitude {
        self.altitude.unwrap_or_else(|| self.elevation())
    }

    fn elevation(&self) -> Altitude {
        self.airport
            .as_ref()
            .map_or(Altitude::ft(0.0), |arpt| arpt.elevation())
    }

    fn resolve(&self, fix: &FixRef, near: Option<Point<f64>>) -> Result<NavAid> {
        let found = match (&fix.region, near) {
            (Some(region), _) => self.nd.find_fix(&fix.ident, Some(region.as_str()), None),
            (None, Some(near)) => self.nd.find_fix_near(&fix.ident, near),
            (None, None) => self.nd.find_fix(&fix.ident, None, None),
        };

        found
            .or_else(|| {
                // runway ends may be referenced without their airport
                let arpt = self.airport.as_ref()?;
                let runway = arpt.runway(&fix.ident)?;
                Some(NavAid::RunwayEnd {
                    airport: Rc::clone(arpt),
                    runway: runway.clone(),
                })
            })
            .ok_or_else(|| Error::MissingNavaid {
                ident: fix.ident.clone(),
                region: fix.region.clone(),
            })
    }

    /// Converts the published `course` into a true course with the
    /// variation at the fix or point.
    fn true_course(
        &self,
        course: Angle,
        fix: Option<&NavAid>,
        point: Point<f64>,
    ) -> (Angle, Option<MagneticVariation>) {
        let var = resolve_variation(fix, self.airport.as_deref(), point, self.date);
        (var.unwrap_or_default().to_true(course), var)
    }

    fn to_altitude(&self, target: &VerticalDistance, current: Altitude) -> Altitude {
        target.to_altitude(self.elevation()).unwrap_or(current)
    }

    /// The distance to climb from one altitude `to` another.
    fn climb_dist(&self, from: Altitude, to: Altitude) -> Length {
        let climb = (to - from).to_ft();
        if climb <= 0.0 || self.climb_gradient <= 0.0 {
            Length::nm(0.0)
        } else {
            Length::nm(climb / self.climb_gradient)
        }
    }

    /// The estimated altitude after flying the `record` for `dist`.
    fn altitude_after(
        &self,
        record: &ProcedureLegRecord,
        altitude: Altitude,
        dist: Length,
    ) -> Altitude {
        match &record.path {
            LegPath::FixToAltitude { altitude: target, .. }
            | LegPath::CourseToAltitude { altitude: target, .. }
            | LegPath::HeadingToAltitude { altitude: target, .. }
            | LegPath::HoldToAltitude { altitude: target, .. } => {
                self.to_altitude(target, altitude).max(altitude)
            }
            _ => match record.altitude {
                AltitudeRestriction::At(at) => self.to_altitude(&at, altitude),
                _ => altitude + Altitude::gained(self.climb_gradient, dist),
            },
        }
    }

    /// Distance along the course until the DME distance to the navaid is
    /// reached.
    fn dme_dist(&self, from: Point<f64>, course: Angle, navaid: &NavAid, dme: Length) -> Length {
        let station = navaid.coordinate();
        let dme_nm = dme.to_nm();

        geom::search_along(
            from,
            course,
            Length::nm(SEARCH_LIMIT_NM),
            DME_TOLERANCE_NM,
            |p| (geom::dist(station, p).to_nm() - dme_nm) as f64,
        )
        .unwrap_or_else(|| {
            debug!("{} DME {dme:.1} not reached, using distance", navaid.ident());
            dme
        })
    }

    /// Distance along the course until the leg `next` is intercepted.
    fn intercept(
        &self,
        from: Point<f64>,
        course: Angle,
        next: &ProcedureLegRecord,
    ) -> Option<Length> {
        let (fix, next_course, inbound) = match &next.path {
            LegPath::CourseToFix { course, fix, .. } => (fix, *course, true),
            LegPath::FixToAltitude { fix, course, .. }
            | LegPath::TrackFromFixForDistance { fix, course, .. }
            | LegPath::TrackFromFixToDme { fix, course, .. }
            | LegPath::FixToManual { fix, course } => (fix, *course, false),
            _ => return None,
        };

        let fix = self.resolve(fix, Some(from)).ok()?;
        let target = fix.coordinate();
        let (next_course, _) = self.true_course(next_course, Some(&fix), target);

        geom::search_along(
            from,
            course,
            Length::nm(SEARCH_LIMIT_NM),
            INTERCEPT_TOLERANCE_DEG,
            |p| {
                let bearing = if inbound {
                    geom::bearing(p, target)
                } else {
                    geom::bearing(target, p)
                };
                next_course.delta(&bearing) as f64
            },
        )
    }

    /// A straight leg `from` a point to the `fix`.
    fn to_fix(
        &self,
        from: Point<f64>,
        fix: NavAid,
        course: Option<(Angle, Option<MagneticVariation>)>,
    ) -> Geometry {
        let end = fix.coordinate();
        let dist = geom::dist(from, end);

        let (bearing, mag_var) = match course {
            Some((tc, var)) => (Some(tc), var),
            None => {
                let var = resolve_variation(Some(&fix), self.airport.as_deref(), from, self.date);
                let bearing = (dist.to_nm() > 0.0).then(|| geom::bearing(from, end));
                (bearing, var)
            }
        };

        let path = if dist.to_nm() > 0.0 {
            vec![from, end]
        } else {
            vec![end]
        };

        Geometry {
            to: LegEnd::Fix(fix),
            path,
            dist,
            bearing,
            mag_var,
            hold: None,
        }
    }

    /// A leg `from` a point via the `fix` and then along the course for the
    /// `dist`.
    fn from_fix(
        &self,
        from: Point<f64>,
        fix: &NavAid,
        tc: Angle,
        dist: Length,
        label: String,
        course: (Angle, Option<MagneticVariation>),
    ) -> Geometry {
        let start = fix.coordinate();
        let end = geom::destination(start, tc, dist);

        let mut path = Vec::with_capacity(3);
        if from != start {
            path.push(from);
        }
        path.extend([start, end]);

        Geometry {
            to: LegEnd::Position {
                label,
                coordinate: end,
            },
            path,
            dist: geom::dist(from, start) + dist,
            bearing: Some(course.0),
            mag_var: course.1,
            hold: None,
        }
    }

    /// A leg `from` a point along the course for the `dist`.
    fn along(
        &self,
        from: Point<f64>,
        course: (Angle, Option<MagneticVariation>),
        dist: Length,
        label: String,
    ) -> Geometry {
        let end = geom::destination(from, course.0, dist);
        Geometry {
            to: LegEnd::Position {
                label,
                coordinate: end,
            },
            path: vec![from, end],
            dist,
            bearing: Some(course.0),
            mag_var: course.1,
            hold: None,
        }
    }

    fn arc(
        &self,
        from: Point<f64>,
        fix: NavAid,
        center: Point<f64>,
        clockwise: bool,
        record: &ProcedureLegRecord,
    ) -> Geometry {
        let end = fix.coordinate();
        let radius = match &record.path {
            LegPath::ArcToFix { radius, .. } => *radius,
            _ => geom::dist(center, end),
        };

        let dist = geom::arc_length(
            radius,
            geom::bearing(center, from),
            geom::bearing(center, end),
            clockwise,
        );

        let mut path = vec![from];
        path.extend(geom::arc(center, from, end, clockwise));

        let mag_var = resolve_variation(Some(&fix), self.airport.as_deref(), from, self.date);

        Geometry {
            to: LegEnd::Fix(fix),
            path,
            dist,
            bearing: Some(geom::bearing(from, end)),
            mag_var,
            hold: None,
        }
    }
}

/// Decides the direction of an arc around the `center`.
///
/// Without a published turn direction the shorter way is taken.
fn clockwise(turn: TurnDirection, center: Point<f64>, from: Point<f64>, to: Point<f64>) -> bool {
    match turn {
        TurnDirection::Right => true,
        TurnDirection::Left => false,
        TurnDirection::Either => {
            let sweep =
                geom::arc_sweep(geom::bearing(center, from), geom::bearing(center, to), true);
            sweep.to_si() <= std::f32::consts::PI
        }
    }
}

/// The points of a holding pattern after passing the fix.
fn racetrack(fix: Point<f64>, hold: &Hold) -> Vec<Point<f64>> {
    let side = match hold.turn {
        TurnDirection::Left => -90.0,
        _ => 90.0,
    };
    let outbound = hold.inbound.reciprocal();
    let length = hold.length.dist_at(Speed::kt(HOLD_SPEED_KT));

    let abeam = geom::destination(fix, hold.inbound + Angle::t(side), Length::nm(HOLD_WIDTH_NM));
    let outbound_end = geom::destination(abeam, outbound, length);
    let inbound_start = geom::destination(fix, outbound, length);

    vec![abeam, outbound_end, inbound_start, fix]
}

fn alt_label(altitude: Altitude) -> String {
    format!("({:.0})", altitude.to_ft())
}

fn dme_label(ident: &str, dist: Length) -> String {
    format!("({ident}/{:.0})", dist.to_nm())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nd::fixtures::{initial, leg, nd, tf};

    fn builder(nd: &NavigationData) -> LegBuilder<'_> {
        LegBuilder::new(nd)
            .at_airport(nd.airport("KJFK").unwrap())
            .on_date(time::Date::from_calendar_date(2026, time::Month::January, 1).unwrap())
    }

    fn start_at(nd: &NavigationData, ident: &str) -> LegStart {
        let fix = nd.find_fix(ident, Some("K6"), None).unwrap();
        LegStart::at_fix(fix, Altitude::ft(3000.0))
    }

    #[test]
    fn course_to_fix_never_fails_for_known_fix() {
        let nd = nd();
        let record = leg(LegPath::CourseToFix {
            course: Angle::m(93.0),
            fix: FixRef::new("HTO"),
            recommended: None,
        });

        let leg = builder(&nd)
            .build_leg(&record, Some(&start_at(&nd, "DPK")), None)
            .expect("CF to known fix should build");

        assert_eq!(leg.ident(), "HTO");
        assert!((leg.dist().to_nm() - 45.6).abs() < 0.1);
        // 093° magnetic with 13° west variation
        assert_eq!(leg.bearing().map(|b| b.value().round()), Some(80.0));
        assert_eq!(leg.mc().map(|mc| mc.value().round()), Some(93.0));
    }

    #[test]
    fn course_to_fix_ignores_unknown_recommended_navaid() {
        let nd = nd();
        let record = leg(LegPath::CourseToFix {
            course: Angle::m(93.0),
            fix: FixRef::new("HTO"),
            recommended: Some(FixRef::in_region("XXX", "K6")),
        });

        let leg = builder(&nd)
            .build_leg(&record, Some(&start_at(&nd, "DPK")), None)
            .expect("CF to known fix should build");

        assert_eq!(leg.ident(), "HTO");
        assert!((leg.dist().to_nm() - 45.6).abs() < 0.1);
    }

    #[test]
    fn missing_recommended_navaid() {
        let nd = nd();
        let record = leg(LegPath::ArcToFix {
            fix: FixRef::new("HTO"),
            recommended: FixRef::in_region("XXX", "K6"),
            radius: Length::nm(10.0),
        });

        assert_eq!(
            builder(&nd).build_leg(&record, Some(&start_at(&nd, "CCC")), None),
            Err(Error::MissingNavaid {
                ident: "XXX".to_string(),
                region: Some("K6".to_string())
            })
        );
    }

    #[test]
    fn arc_around_own_fix_is_course_to_fix() {
        let nd = nd();
        let record = leg(LegPath::RadiusToFix {
            fix: FixRef::new("HTO"),
            center: FixRef::new("HTO"),
        });

        let leg = builder(&nd)
            .build_leg(&record, Some(&start_at(&nd, "DPK")), None)
            .expect("RF around its own fix should degrade");

        assert_eq!(leg.path().len(), 2);
        assert!((leg.dist().to_nm() - 45.6).abs() < 0.1);
    }

    #[test]
    fn dme_arc_keeps_radius() {
        let nd = nd();
        let dpk = nd.find_fix("DPK", Some("K6"), None).unwrap();

        // an arc of 10 NM around DPK from its north to its east
        let north = geom::destination(dpk.coordinate(), Angle::t(0.0), Length::nm(10.0));
        let east = geom::destination(dpk.coordinate(), Angle::t(90.0), Length::nm(10.0));

        let mut builder = NavigationDataBuilder::new();
        builder.add_waypoint(Waypoint::new("DPK", FixType::Vor, dpk.coordinate()));
        builder.add_waypoint(Waypoint::new("EAST", FixType::Waypoint, east));
        let arc_nd = builder.build();

        let record = leg(LegPath::ArcToFix {
            fix: FixRef::new("EAST"),
            recommended: FixRef::new("DPK"),
            radius: Length::nm(10.0),
        })
        .with_turn(TurnDirection::Right);

        let leg = LegBuilder::new(&arc_nd)
            .build_leg(&record, Some(&LegStart::at(north, Altitude::ft(3000.0))), None)
            .expect("AF should build");

        // a quarter circle of 10 NM radius
        assert!((leg.dist().to_nm() - 15.7).abs() < 0.1);
        assert_eq!(leg.turn(), TurnDirection::Right);
        for p in leg.path() {
            assert!((geom::dist(dpk.coordinate(), *p).to_nm() - 10.0).abs() < 0.1);
        }
    }

    #[test]
    fn course_to_altitude_climbs_with_gradient() {
        let nd = nd();
        let record = leg(LegPath::CourseToAltitude {
            course: Angle::m(44.0),
            altitude: VerticalDistance::Altitude(1013),
        });

        // from the airport at 13 ft, 1000 ft at 200 ft/NM
        let leg = builder(&nd)
            .build_leg(&record, None, None)
            .expect("CA should start at the airport");

        assert!((leg.dist().to_nm() - 5.0).abs() < 0.01);
        assert_eq!(leg.ident(), "(1013)");
        assert!(leg.fix().is_none());
    }

    #[test]
    fn course_to_altitude_needs_start() {
        let nd = nd();
        let record = leg(LegPath::CourseToAltitude {
            course: Angle::m(44.0),
            altitude: VerticalDistance::Altitude(1000),
        });

        assert_eq!(
            LegBuilder::new(&nd).build_leg(&record, None, None),
            Err(Error::MissingLegStart("CA".to_string()))
        );
    }

    #[test]
    fn dme_termination() {
        let nd = nd();
        let record = leg(LegPath::TrackFromFixToDme {
            fix: FixRef::in_region("DPK", "K6"),
            course: Angle::t(90.0),
            recommended: FixRef::in_region("DPK", "K6"),
            dme: Length::nm(12.0),
        });

        let leg = builder(&nd)
            .build_leg(&record, Some(&start_at(&nd, "DPK")), None)
            .expect("FD should build");
        assert!((leg.dist().to_nm() - 12.0).abs() < 0.05);
        assert_eq!(leg.ident(), "(DPK/12)");

        let record = leg_with_dme_from("JFK");
        let leg = builder(&nd)
            .build_leg(&record, Some(&start_at(&nd, "DPK")), None)
            .expect("CD should build");
        let jfk = nd.find_fix("JFK", Some("K6"), None).unwrap();
        assert!((geom::dist(jfk.coordinate(), leg.to().coordinate()).to_nm() - 30.0).abs() < 0.1);
    }

    fn leg_with_dme_from(ident: &str) -> ProcedureLegRecord {
        leg(LegPath::CourseToDme {
            course: Angle::t(80.0),
            recommended: FixRef::in_region(ident, "K6"),
            dme: Length::nm(30.0),
        })
    }

    #[test]
    fn intercept_closes_against_next_leg() {
        let nd = nd();
        let hto = nd.find_fix("HTO", Some("K6"), None).unwrap();

        // fly north from DPK and intercept the 090° course to HTO
        let records = [
            leg(LegPath::HeadingToIntercept {
                heading: Angle::t(0.0),
            }),
            leg(LegPath::CourseToFix {
                course: Angle::t(90.0),
                fix: FixRef::new("HTO"),
                recommended: None,
            }),
        ];

        let legs = builder(&nd)
            .build_sequence(&records, Some(start_at(&nd, "DPK")))
            .expect("sequence should build");

        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].ident(), "(INTC)");
        let intercept = legs[0].to().coordinate();
        let bearing = geom::bearing(intercept, hto.coordinate());
        assert!(Angle::t(90.0).delta(&bearing).abs() < 1.0);
        // DPK is south of HTO, so the intercept is a few miles north
        assert!(legs[0].dist().to_nm() > 5.0 && legs[0].dist().to_nm() < 10.0);

        let standalone = builder(&nd)
            .build_leg(&records[0], Some(&start_at(&nd, "DPK")), None)
            .expect("VI should build on its own");
        assert!((standalone.dist().to_nm() - STUB_NM).abs() < 0.01);
    }

    #[test]
    fn radial_termination() {
        let nd = nd();
        let ccc = nd.find_fix("CCC", Some("K6"), None).unwrap();

        // heading east from DPK until crossing the 180° true radial of CCC
        let record = leg(LegPath::HeadingToRadial {
            heading: Angle::t(90.0),
            recommended: FixRef::in_region("CCC", "K6"),
            radial: Angle::t(180.0),
        });

        let leg = builder(&nd)
            .build_leg(&record, Some(&start_at(&nd, "DPK")), None)
            .expect("VR should build");
        let radial = geom::bearing(ccc.coordinate(), leg.to().coordinate());
        assert!(Angle::t(180.0).delta(&radial).abs() < 1.0);
    }

    #[test]
    fn holds_and_manual_legs_add_no_distance() {
        let nd = nd();
        let records = [
            initial("HTO"),
            leg(LegPath::HoldToFix {
                fix: FixRef::in_region("HTO", "K6"),
                course: Angle::m(270.0),
                length: HoldLength::Time(crate::measurements::Duration::minutes(1.0)),
            }),
            leg(LegPath::HeadingToManual {
                heading: Angle::m(360.0),
            }),
        ];

        let legs = builder(&nd)
            .build_sequence(&records, Some(start_at(&nd, "HTO")))
            .expect("sequence should build");

        let dist: f32 = legs.iter().map(|leg| leg.dist().to_nm()).sum();
        assert!(dist < 0.01);

        let hold = legs[1].hold().expect("HF should have a holding");
        assert_eq!(hold.turn, TurnDirection::Right);
        assert!(legs[1].path().len() > 2);
        assert_eq!(legs[2].path().len(), 2);
    }

    #[test]
    fn sequence_continues_from_previous_leg() {
        let nd = nd();
        let records = [initial("DPK"), tf("CCC"), tf("HTO")];

        let legs = builder(&nd)
            .for_procedure(ProcedureMembership {
                kind: ProcedureKind::Star,
                name: "TEST1".to_string(),
                transition: None,
            })
            .build_sequence(&records, None)
            .expect("sequence should build");

        let ccc = nd.find_fix("CCC", Some("K6"), None).unwrap();
        assert_eq!(legs[2].from(), ccc.coordinate());
        assert_eq!(legs[2].procedure().map(|p| p.name.as_str()), Some("TEST1"));
        assert_eq!(legs[2].leg_path().map(LegPath::code), Some("TF"));
    }

    #[test]
    fn direct_to_turns_toward_fix() {
        let nd = nd();
        let record = leg(LegPath::DirectToFix {
            fix: FixRef::in_region("LENDY", "K6"),
        });

        // LENDY is north-west of DPK, so heading east means a left turn
        let leg = builder(&nd)
            .build_leg(&record, Some(&start_at(&nd, "DPK")), Some(Angle::t(90.0)))
            .expect("DF should build");
        assert_eq!(leg.turn(), TurnDirection::Left);
    }
}
