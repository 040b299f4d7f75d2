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
use log::{debug, info, trace, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::leg::{resolve_variation, LegKind, ProcedureMembership, RouteLeg};
use super::procedure::{LegBuilder, LegStart, DEFAULT_CLIMB_GRADIENT};
use super::{Route, Warning};
use crate::error::{Error, Errors};
use crate::measurements::{Altitude, Length, Speed};
use crate::nd::*;
use crate::VerticalDistance;

/// A procedure selected by name with an optional transition.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcedureSelection {
    pub name: String,
    pub transition: Option<String>,
}

impl ProcedureSelection {
    pub fn new(name: &str, transition: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            transition: transition.map(str::to_string),
        }
    }
}

/// An element of the enroute part of a route.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EnrouteEntry {
    /// Direct to the waypoint.
    Waypoint(String),
    /// Along the airway from the previous fix to the `exit`.
    Airway { name: String, exit: String },
}

/// Assembles a [`Route`] from its parts.
///
/// The builder only holds idents and names. Everything is resolved with the
/// navigation data when the route is [built](Self::build), so a builder can
/// be edited and rebuilt freely.
///
/// # Examples
///
/// ```
/// # use flightplan::nd::NavigationData;
/// # use flightplan::route::RouteBuilder;
/// # fn build(nd: &NavigationData) {
/// let route = RouteBuilder::new()
///     .departure("KJFK")
///     .sid("LENDY6", Some("CCC"))
///     .airway("V1", "HTO")
///     .star("STAR", None)
///     .destination("KBOS")
///     .build(nd);
/// # }
/// ```
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteBuilder {
    pub(crate) departure: Option<String>,
    pub(crate) sid: Option<ProcedureSelection>,
    pub(crate) enroute: Vec<EnrouteEntry>,
    pub(crate) star: Option<ProcedureSelection>,
    pub(crate) approach: Option<ProcedureSelection>,
    pub(crate) destination: Option<String>,
    pub(crate) alternates: Vec<String>,
    pub(crate) speed: Option<Speed>,
    pub(crate) level: Option<VerticalDistance>,
    pub(crate) climb_gradient: f32,
    pub(crate) date: Option<time::Date>,
}

impl Default for RouteBuilder {
    fn default() -> Self {
        Self {
            departure: None,
            sid: None,
            enroute: Vec::new(),
            star: None,
            approach: None,
            destination: None,
            alternates: Vec::new(),
            speed: None,
            level: None,
            climb_gradient: DEFAULT_CLIMB_GRADIENT,
            date: None,
        }
    }
}

impl RouteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn departure(mut self, ident: &str) -> Self {
        self.departure = Some(ident.to_string());
        self
    }

    pub fn sid(mut self, name: &str, transition: Option<&str>) -> Self {
        self.sid = Some(ProcedureSelection::new(name, transition));
        self
    }

    /// Adds a direct leg to the waypoint.
    pub fn waypoint(mut self, ident: &str) -> Self {
        self.enroute.push(EnrouteEntry::Waypoint(ident.to_string()));
        self
    }

    /// Adds the legs along the airway from the previous fix to the `exit`.
    pub fn airway(mut self, name: &str, exit: &str) -> Self {
        self.enroute.push(EnrouteEntry::Airway {
            name: name.to_string(),
            exit: exit.to_string(),
        });
        self
    }

    pub fn enroute(mut self, entry: EnrouteEntry) -> Self {
        self.enroute.push(entry);
        self
    }

    pub fn star(mut self, name: &str, transition: Option<&str>) -> Self {
        self.star = Some(ProcedureSelection::new(name, transition));
        self
    }

    pub fn approach(mut self, name: &str, transition: Option<&str>) -> Self {
        self.approach = Some(ProcedureSelection::new(name, transition));
        self
    }

    pub fn destination(mut self, ident: &str) -> Self {
        self.destination = Some(ident.to_string());
        self
    }

    pub fn alternate(mut self, ident: &str) -> Self {
        self.alternates.push(ident.to_string());
        self
    }

    /// Sets the cruise speed and level.
    pub fn cruise(mut self, speed: Option<Speed>, level: Option<VerticalDistance>) -> Self {
        self.speed = speed;
        self.level = level;
        self
    }

    /// Sets the climb gradient in feet per nautical mile that is used to
    /// estimate where altitude terminated procedure legs end.
    pub fn climb_gradient(mut self, gradient: f32) -> Self {
        self.climb_gradient = gradient;
        self
    }

    /// Sets the date for the magnetic model. Defaults to today.
    pub fn on_date(mut self, date: time::Date) -> Self {
        self.date = Some(date);
        self
    }

    pub fn departure_ident(&self) -> Option<&str> {
        self.departure.as_deref()
    }

    pub fn destination_ident(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub fn selected_sid(&self) -> Option<&ProcedureSelection> {
        self.sid.as_ref()
    }

    pub fn selected_star(&self) -> Option<&ProcedureSelection> {
        self.star.as_ref()
    }

    pub fn selected_approach(&self) -> Option<&ProcedureSelection> {
        self.approach.as_ref()
    }

    pub fn enroute_entries(&self) -> &[EnrouteEntry] {
        &self.enroute
    }

    pub fn alternates(&self) -> &[String] {
        &self.alternates
    }

    pub fn speed(&self) -> Option<Speed> {
        self.speed
    }

    pub fn level(&self) -> Option<VerticalDistance> {
        self.level
    }

    /// Assembles the route with the navigation data.
    ///
    /// # Errors
    ///
    /// Returns all errors found while resolving the route. If the departure
    /// or destination can't be found, nothing else is resolved.
    pub fn build(&self, nd: &dyn NavDataLookup) -> Result<Route, Errors> {
        let departure = self.mandatory_airport(self.departure.as_deref(), nd);
        let destination = self.mandatory_airport(self.destination.as_deref(), nd);

        let (departure, destination) = match (departure, destination) {
            (Ok(departure), Ok(destination)) => (departure, destination),
            (departure, destination) => {
                let mut errors: Vec<Error> =
                    [departure.err(), destination.err()].into_iter().flatten().collect();
                errors.dedup();
                return Err(Errors::check(errors, ())
                    .err()
                    .unwrap_or_else(|| Error::EmptyRoute.into()));
            }
        };

        let mut assembly = Assembly {
            nd,
            legs: vec![RouteLeg::airport(&departure)],
            errors: Vec::new(),
            warnings: Vec::new(),
            date: self
                .date
                .unwrap_or_else(|| time::OffsetDateTime::now_utc().date()),
            climb_gradient: self.climb_gradient,
        };

        if let Some(sid) = &self.sid {
            assembly.sid(&departure, sid);
        }

        for entry in &self.enroute {
            assembly.enroute(entry);
        }

        let cruise = self
            .level
            .and_then(|level| level.to_altitude(destination.elevation()))
            .unwrap_or_else(|| destination.elevation());

        let star = self
            .star
            .as_ref()
            .and_then(|star| assembly.arrival(&destination, ProcedureKind::Star, star, cruise));

        let approach = self.approach.as_ref().and_then(|approach| {
            assembly.arrival(&destination, ProcedureKind::Approach, approach, cruise)
        });

        if let (Some(star), Some(approach)) = (&star, &approach) {
            if let (Some(star_rwy), Some(approach_rwy)) = (star.runway(), approach.runway()) {
                if star_rwy != approach_rwy {
                    assembly.warn(Warning::RunwayMismatch {
                        star: star_rwy.to_string(),
                        approach: approach_rwy.to_string(),
                    });
                }
            }
        }

        if let Some(approach) = &approach {
            assembly.missed_approach(&destination, approach);
        }

        assembly.destination(&destination);

        let mut alternates = Vec::with_capacity(self.alternates.len());
        for ident in &self.alternates {
            match nd.airport(ident) {
                Some(arpt) => alternates.push(arpt),
                None => assembly.warn(Warning::UnresolvedToken(ident.clone())),
            }
        }

        let Assembly {
            mut legs,
            errors,
            mut warnings,
            ..
        } = assembly;

        let mut estimated: Vec<String> = Vec::new();
        for leg in legs.iter().filter(|leg| leg.is_mag_var_estimated()) {
            let ident = leg.ident();
            if !estimated.contains(&ident) {
                warn!("no magnetic variation known at {ident}");
                warnings.push(Warning::MagneticVariationEstimated {
                    ident: ident.clone(),
                });
                estimated.push(ident);
            }
        }

        accumulate(&mut legs);

        let route = Route {
            legs,
            departure,
            destination,
            alternates,
            input: self.clone(),
            warnings,
        };

        let route = Errors::check(errors, route)?;
        info!(
            "route {} to {} assembled with {} legs over {:.1}",
            route.departure.ident(),
            route.destination.ident(),
            route.legs.len(),
            route.total_distance()
        );

        Ok(route)
    }

    fn mandatory_airport(
        &self,
        ident: Option<&str>,
        nd: &dyn NavDataLookup,
    ) -> Result<Rc<Airport>, Error> {
        let ident = ident.ok_or(Error::EmptyRoute)?;
        nd.airport(ident)
            .ok_or_else(|| Error::MandatoryAirportNotFound(ident.to_string()))
    }
}

/// Sums up the distance of the legs.
///
/// Missed approach legs continue from the end of the approach but don't add
/// to the distance of the route.
fn accumulate(legs: &mut [RouteLeg]) {
    let mut total = Length::nm(0.0);
    let mut missed = Length::nm(0.0);

    for leg in legs.iter_mut() {
        if leg.missed_approach {
            missed = missed + leg.dist;
            leg.cum_dist = total + missed;
        } else {
            total = total + leg.dist;
            leg.cum_dist = total;
        }
    }
}

/// The state while a route is assembled.
struct Assembly<'a> {
    nd: &'a dyn NavDataLookup,
    legs: Vec<RouteLeg>,
    errors: Vec<Error>,
    warnings: Vec<Warning>,
    date: time::Date,
    climb_gradient: f32,
}

impl Assembly<'_> {
    fn warn(&mut self, warning: Warning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }

    /// The last leg that is not part of the missed approach.
    fn last(&self) -> Option<&RouteLeg> {
        self.legs.iter().rev().find(|leg| !leg.missed_approach)
    }

    fn position(&self) -> Option<Point<f64>> {
        self.last().map(|leg| leg.to.coordinate())
    }

    fn start(&self, altitude: Altitude) -> Option<LegStart> {
        self.last().map(|leg| LegStart {
            coordinate: leg.to.coordinate(),
            fix: leg.fix().cloned(),
            altitude,
        })
    }

    /// Appends the leg unless it just repeats the previous leg's end.
    fn push(&mut self, leg: RouteLeg) {
        match self.legs.last() {
            Some(last) if leg.repeats(last) => {
                debug!("dropping repeated fix {}", leg.ident());
            }
            _ => {
                trace!("{:?} leg to {}", leg.kind, leg.ident());
                self.legs.push(leg);
            }
        }
    }

    fn extend(&mut self, legs: Vec<RouteLeg>) {
        for leg in legs {
            self.push(leg);
        }
    }

    fn leg_builder(
        &self,
        arpt: &Rc<Airport>,
        kind: ProcedureKind,
        selection: &ProcedureSelection,
    ) -> LegBuilder<'_> {
        LegBuilder::new(self.nd)
            .at_airport(Rc::clone(arpt))
            .for_procedure(ProcedureMembership {
                kind,
                name: selection.name.clone(),
                transition: selection.transition.clone(),
            })
            .climb_gradient(self.climb_gradient)
            .on_date(self.date)
    }

    fn records(
        &mut self,
        arpt: &Airport,
        kind: ProcedureKind,
        selection: &ProcedureSelection,
    ) -> Option<(Rc<Procedure>, Vec<ProcedureLegRecord>)> {
        let procedure = self
            .nd
            .find_procedure(&arpt.ident(), kind, &selection.name)
            .and_then(|procedure| {
                let records = procedure.legs(selection.transition.as_deref())?;
                Ok((procedure, records))
            });

        match procedure {
            Ok(procedure) => Some(procedure),
            Err(e) => {
                self.errors.push(e);
                None
            }
        }
    }

    /// Appends the departure procedure starting at its runway threshold.
    fn sid(&mut self, departure: &Rc<Airport>, selection: &ProcedureSelection) {
        let Some((procedure, records)) = self.records(departure, ProcedureKind::Sid, selection)
        else {
            return;
        };

        let start = match procedure.runway().and_then(|rwy| departure.runway(rwy)) {
            Some(rwy) => LegStart::at_fix(
                NavAid::RunwayEnd {
                    airport: Rc::clone(departure),
                    runway: rwy.clone(),
                },
                rwy.elevation,
            ),
            None => LegStart::at_fix(
                NavAid::Airport(Rc::clone(departure)),
                departure.elevation(),
            ),
        };

        debug!(
            "departing via {} from {}",
            selection.name,
            start.fix.as_ref().map_or_else(|| departure.ident(), Fix::ident)
        );

        let legs = self
            .leg_builder(departure, ProcedureKind::Sid, selection)
            .initial_altitude(start.altitude)
            .build_sequence(&records, Some(start));

        match legs {
            Ok(legs) => self.extend(legs),
            Err(e) => self.errors.push(e),
        }
    }

    fn enroute(&mut self, entry: &EnrouteEntry) {
        let Some(from) = self.position() else {
            return;
        };

        match entry {
            EnrouteEntry::Waypoint(ident) => match self.nd.find_fix_near(ident, from) {
                Some(fix) => self.direct(from, fix, LegKind::Direct),
                None => self.errors.push(Error::MissingNavaid {
                    ident: ident.clone(),
                    region: None,
                }),
            },

            EnrouteEntry::Airway { name, exit } => {
                let entry = self.last().map(RouteLeg::ident).unwrap_or_default();
                match self.nd.find_airway(name, &entry, exit) {
                    Ok(fixes) => {
                        let mut from = from;
                        // the segment starts with the entry we are at
                        for fix in fixes.into_iter().skip(1) {
                            let to = fix.coordinate();
                            self.direct(from, fix, LegKind::Airway(name.clone()));
                            from = to;
                        }
                    }
                    Err(e) => self.errors.push(e),
                }
            }
        }
    }

    fn direct(&mut self, from: Point<f64>, fix: NavAid, kind: LegKind) {
        let mag_var = resolve_variation(Some(&fix), None, from, self.date);
        self.push(RouteLeg::direct(from, fix, kind, mag_var));
    }

    /// Appends a STAR or approach and returns the procedure if it was found.
    fn arrival(
        &mut self,
        destination: &Rc<Airport>,
        kind: ProcedureKind,
        selection: &ProcedureSelection,
        altitude: Altitude,
    ) -> Option<Rc<Procedure>> {
        let (procedure, records) = self.records(destination, kind, selection)?;

        let legs = self
            .leg_builder(destination, kind, selection)
            .initial_altitude(altitude)
            .build_sequence(&records, self.start(altitude));

        match legs {
            Ok(legs) => self.extend(legs),
            Err(e) => self.errors.push(e),
        }

        Some(procedure)
    }

    fn missed_approach(&mut self, destination: &Rc<Airport>, approach: &Procedure) {
        if approach.missed_approach().is_empty() {
            return;
        }

        let elevation = self
            .last()
            .and_then(|leg| leg.fix().and_then(NavAid::elevation))
            .unwrap_or_else(|| destination.elevation());

        let selection = ProcedureSelection::new(approach.name(), None);
        let legs = self
            .leg_builder(destination, ProcedureKind::Approach, &selection)
            .missed_approach(true)
            .initial_altitude(elevation)
            .build_sequence(approach.missed_approach(), self.start(elevation));

        // the repeated fix check doesn't apply since holdings may repeat
        match legs {
            Ok(legs) => self.legs.extend(legs),
            Err(e) => self.errors.push(e),
        }
    }

    /// Appends the destination airport measured from the last leg that isn't
    /// part of the missed approach.
    fn destination(&mut self, destination: &Rc<Airport>) {
        let from = self
            .position()
            .unwrap_or_else(|| destination.coordinate());
        self.legs.push(RouteLeg::direct(
            from,
            NavAid::Airport(Rc::clone(destination)),
            LegKind::Airport,
            destination.mag_var(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nd::fixtures::{equator_nd, nd};

    fn date() -> time::Date {
        time::Date::from_calendar_date(2026, time::Month::January, 1).unwrap()
    }

    fn idents(route: &Route) -> Vec<String> {
        route.legs().iter().map(RouteLeg::ident).collect()
    }

    #[test]
    fn direct_route_between_airports() {
        let nd = equator_nd();
        let route = RouteBuilder::new()
            .departure("KAAA")
            .destination("KBBB")
            .on_date(date())
            .build(&nd)
            .expect("route should build");

        assert_eq!(idents(&route), ["KAAA", "KBBB"]);
        assert!((route.total_distance().to_nm() - 50.0).abs() < 0.1);
    }

    #[test]
    fn airway_includes_intermediate_fixes() {
        let nd = nd();
        let route = RouteBuilder::new()
            .departure("KJFK")
            .waypoint("JFK")
            .airway("V1", "HTO")
            .destination("KBOS")
            .on_date(date())
            .build(&nd)
            .expect("route should build");

        assert_eq!(idents(&route), ["KJFK", "JFK", "DPK", "CCC", "HTO", "KBOS"]);
        assert_eq!(route.legs()[2].kind(), &LegKind::Airway("V1".to_string()));
    }

    #[test]
    fn collects_all_errors() {
        let nd = nd();
        let result = RouteBuilder::new()
            .departure("KJFK")
            .waypoint("XXXXX")
            .airway("V1", "PVD")
            .destination("KBOS")
            .on_date(date())
            .build(&nd);

        let errors = result.expect_err("route should fail").into_inner();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], Error::MissingNavaid { .. }));
        assert!(matches!(errors[1], Error::AirwaySegmentNotFound { .. }));
    }

    #[test]
    fn missing_airports_abort_assembly() {
        let nd = nd();
        let errors = RouteBuilder::new()
            .departure("KXXX")
            .destination("KYYY")
            .build(&nd)
            .expect_err("route should fail");

        assert_eq!(
            errors.into_inner(),
            vec![
                Error::MandatoryAirportNotFound("KXXX".to_string()),
                Error::MandatoryAirportNotFound("KYYY".to_string()),
            ]
        );
    }

    #[test]
    fn procedures_surround_enroute() {
        let nd = nd();
        let route = RouteBuilder::new()
            .departure("KJFK")
            .sid("LENDY6", Some("CCC"))
            .airway("V1", "HTO")
            .airway("V16", "HOWID")
            .star("STAR", Some("ILS22"))
            .destination("KBOS")
            .on_date(date())
            .build(&nd)
            .expect("route should build");

        // the STAR transition starts at HOWID which isn't repeated
        assert_eq!(
            idents(&route),
            [
                "KJFK", "(1000)", "LENDY", "DPK", "CCC", "HTO", "PVD", "HOWID", "MILTT", "KBOS"
            ]
        );

        let sid = route.legs()[1].procedure().expect("should be SID leg");
        assert_eq!(sid.kind, ProcedureKind::Sid);
        assert_eq!(sid.transition.as_deref(), Some("CCC"));
        assert!(route
            .warnings()
            .iter()
            .all(|w| matches!(w, Warning::MagneticVariationEstimated { .. })));
    }

    #[test]
    fn missed_approach_is_excluded_from_distance() {
        let nd = nd();
        let route = RouteBuilder::new()
            .departure("KJFK")
            .waypoint("HTO")
            .waypoint("MILTT")
            .approach("I04R", Some("MILTT"))
            .destination("KBOS")
            .on_date(date())
            .build(&nd)
            .expect("route should build");

        let missed: Vec<_> = route
            .legs()
            .iter()
            .filter(|leg| leg.is_missed_approach())
            .collect();
        assert_eq!(missed.len(), 3);
        assert!(missed[2].hold().is_some());

        let last = route.legs().last().expect("route has legs");
        assert_eq!(last.ident(), "KBOS");
        assert!(!last.is_missed_approach());

        let normal: f32 = route
            .legs()
            .iter()
            .filter(|leg| !leg.is_missed_approach())
            .map(|leg| leg.dist().to_nm())
            .sum();
        assert!((route.total_distance().to_nm() - normal).abs() < 0.01);
        assert_eq!(last.cum_dist(), &route.total_distance());
    }

    #[test]
    fn warns_about_runway_mismatch() {
        let nd = nd();
        let route = RouteBuilder::new()
            .departure("KJFK")
            .waypoint("HOWID")
            .star("OOSHN5", None)
            .approach("I04R", None)
            .destination("KBOS")
            .on_date(date())
            .build(&nd)
            .expect("mismatch should not fail the route");

        assert!(route.warnings().contains(&Warning::RunwayMismatch {
            star: "22L".to_string(),
            approach: "04R".to_string()
        }));
    }

    #[test]
    fn unknown_alternate_is_a_warning() {
        let nd = nd();
        let route = RouteBuilder::new()
            .departure("KJFK")
            .destination("KBOS")
            .alternate("KPVD")
            .alternate("KXXX")
            .on_date(date())
            .build(&nd)
            .expect("route should build");

        assert_eq!(route.alternates().len(), 1);
        assert_eq!(
            route.warnings(),
            [Warning::UnresolvedToken("KXXX".to_string())]
        );
    }
}
