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
use std::rc::Rc;

use geo::Point;
use log::info;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Errors;
use crate::geom;
use crate::measurements::{Duration, Length, Speed};
use crate::nd::*;
use crate::VerticalDistance;

mod builder;
mod leg;
mod procedure;
mod profile;
mod token;
mod warning;

pub use builder::{EnrouteEntry, ProcedureSelection, RouteBuilder};
pub use leg::{Hold, LegEnd, LegKind, ProcedureMembership, RouteLeg};
pub use procedure::{LegBuilder, LegStart, DEFAULT_CLIMB_GRADIENT};
pub use profile::{FlightPhase, ProfilePoint, VerticalProfile};
pub use warning::Warning;

pub(crate) use token::parse;

/// A route that goes from a departure to a destination airport.
///
/// The route is an ordered list of [legs] that starts with the departure
/// airport and ends with the destination airport. Legs of the missed approach
/// follow the approach but aren't part of the route's distance.
///
/// # Decoding
///
/// The route can be decoded from a space separated route string:
///
/// ```text
/// KJFK N0450F350 LENDY6.CCC JFK V1 HTO V16 HOWID STAR.ILS22 KBOS KPVD
/// ```
///
/// would depart New York via the LENDY6 departure with the CCC transition,
/// go direct to JFK and follow the airways V1 to HTO and V16 to HOWID. The
/// arrival into Boston is the STAR arrival with the ILS22 transition and
/// Providence is the alternate. Speed and level after the departure set the
/// cruise speed of 450 kt and FL350.
///
/// A route is never changed once assembled. Edits go through the
/// [`RouteBuilder`] returned by [`input`] which assembles a new route.
///
/// [legs]: RouteLeg
/// [`input`]: Route::input
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Route {
    pub(crate) legs: Vec<RouteLeg>,
    pub(crate) departure: Rc<Airport>,
    pub(crate) destination: Rc<Airport>,
    pub(crate) alternates: Vec<Rc<Airport>>,
    pub(crate) input: RouteBuilder,
    pub(crate) warnings: Vec<Warning>,
}

impl Route {
    /// Decodes a route string with the navigation data `nd`.
    ///
    /// Elements of the string that can't be resolved are skipped and reported
    /// as [warnings](Route::warnings).
    ///
    /// # Errors
    ///
    /// Fails if the departure or destination airport can't be found or if the
    /// route can't be assembled.
    pub fn decode(s: &str, nd: &dyn NavDataLookup) -> Result<Self, Errors> {
        let (input, mut warnings) = token::parse(s, nd)?;
        let mut route = input.build(nd)?;

        warnings.append(&mut route.warnings);
        route.warnings = warnings;

        info!("decoded route {route}");
        Ok(route)
    }

    /// The legs in order including the missed approach.
    pub fn legs(&self) -> &[RouteLeg] {
        &self.legs
    }

    pub fn departure(&self) -> &Rc<Airport> {
        &self.departure
    }

    pub fn destination(&self) -> &Rc<Airport> {
        &self.destination
    }

    pub fn alternates(&self) -> &[Rc<Airport>] {
        &self.alternates
    }

    pub fn speed(&self) -> Option<Speed> {
        self.input.speed
    }

    pub fn level(&self) -> Option<VerticalDistance> {
        self.input.level
    }

    pub fn sid(&self) -> Option<&ProcedureSelection> {
        self.input.sid.as_ref()
    }

    pub fn star(&self) -> Option<&ProcedureSelection> {
        self.input.star.as_ref()
    }

    pub fn approach(&self) -> Option<&ProcedureSelection> {
        self.input.approach.as_ref()
    }

    /// The input the route was assembled from.
    pub fn input(&self) -> &RouteBuilder {
        &self.input
    }

    /// Conditions found while decoding and assembling the route.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// The distance from departure to destination without the missed
    /// approach.
    pub fn total_distance(&self) -> Length {
        self.legs
            .iter()
            .rev()
            .find(|leg| !leg.missed_approach)
            .map_or(Length::nm(0.0), |leg| leg.cum_dist)
    }

    /// The estimated time enroute at the cruise speed.
    pub fn ete(&self) -> Option<Duration> {
        self.speed()
            .filter(|speed| speed.to_si() > 0.0)
            .map(|speed| self.total_distance() / speed)
    }

    /// Returns the position after flying the distance `dist` along the route.
    ///
    /// Returns `None` if the distance is beyond the destination.
    pub fn position_at(&self, dist: Length) -> Option<Point<f64>> {
        let target = dist.to_nm();
        if target > self.total_distance().to_nm() + 0.001 {
            return None;
        }

        let leg = self
            .legs
            .iter()
            .filter(|leg| !leg.missed_approach)
            .find(|leg| leg.cum_dist.to_nm() >= target)?;

        let mut remaining = target - (leg.cum_dist - leg.dist).to_nm();
        if remaining <= 0.0 {
            return Some(leg.from);
        }

        for segment in leg.path.windows(2) {
            let (a, b) = (segment[0], segment[1]);
            let length = geom::dist(a, b).to_nm();

            if remaining <= length {
                let course = geom::bearing(a, b);
                return Some(geom::destination(a, course, Length::nm(remaining)));
            }
            remaining -= length;
        }

        Some(leg.to.coordinate())
    }

    /// Encodes the enroute part from the legs.
    ///
    /// Legs that belong to procedures or are the airports aren't part of the
    /// enroute part. Consecutive legs along the same airway are written as
    /// the airway followed by the exit fix. Enroute airports follow a `DCT`.
    fn enroute(&self) -> Vec<String> {
        let mut elements: Vec<String> = Vec::new();
        let mut legs = self.legs.iter().peekable();

        while let Some(leg) = legs.next() {
            match &leg.kind {
                LegKind::Direct => {
                    // airports would be read as the destination otherwise
                    if matches!(leg.fix(), Some(NavAid::Airport(_))) {
                        elements.push("DCT".to_string());
                    }
                    elements.push(leg.ident());
                }
                LegKind::Airway(name) => {
                    let mut exit = leg;
                    while let Some(next) = legs.next_if(|next| next.kind == leg.kind) {
                        exit = next;
                    }
                    elements.push(name.clone());
                    elements.push(exit.ident());
                }
                LegKind::Airport | LegKind::Runway | LegKind::Procedure => {}
            }
        }

        elements
    }
}

fn selection(procedure: &ProcedureSelection) -> String {
    match &procedure.transition {
        Some(transition) => format!("{}.{transition}", procedure.name),
        None => procedure.name.clone(),
    }
}

impl fmt::Display for Route {
    /// Encodes the route as route string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut elements = vec![self.departure.ident()];

        let cruise = format!(
            "{}{}",
            self.speed().map(token::encode_speed).unwrap_or_default(),
            self.level()
                .and_then(|level| level.to_icao())
                .unwrap_or_default()
        );
        if !cruise.is_empty() {
            elements.push(cruise);
        }

        elements.extend(self.sid().map(selection));
        elements.extend(self.enroute());
        elements.extend(self.star().map(selection));
        elements.extend(self.approach().map(selection));
        elements.push(self.destination.ident());
        elements.extend(self.alternates.iter().map(|arpt| arpt.ident()));

        write!(f, "{}", elements.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nd::fixtures::{equator_nd, nd};

    fn date() -> time::Date {
        time::Date::from_calendar_date(2026, time::Month::January, 1).unwrap()
    }

    #[test]
    fn encodes_route_string() {
        let nd = nd();
        let route = RouteBuilder::new()
            .departure("KJFK")
            .cruise(Some(Speed::kt(450.0)), Some(VerticalDistance::Fl(350)))
            .sid("LENDY6", Some("CCC"))
            .waypoint("JFK")
            .airway("V1", "HTO")
            .airway("V16", "HOWID")
            .star("STAR", Some("ILS22"))
            .destination("KBOS")
            .alternate("KPVD")
            .on_date(date())
            .build(&nd)
            .expect("route should build");

        assert_eq!(
            route.to_string(),
            "KJFK N0450F350 LENDY6.CCC JFK V1 HTO V16 HOWID STAR.ILS22 KBOS KPVD"
        );
    }

    #[test]
    fn enroute_airport_stays_enroute() {
        let nd = nd();
        let route = RouteBuilder::new()
            .departure("KJFK")
            .waypoint("HTO")
            .waypoint("KPVD")
            .destination("KBOS")
            .on_date(date())
            .build(&nd)
            .expect("route should build");

        let encoded = route.to_string();
        assert_eq!(encoded, "KJFK HTO DCT KPVD KBOS");

        let decoded = Route::decode(&encoded, &nd).expect("route should decode");
        assert_eq!(decoded.destination().ident(), "KBOS");
        assert!(decoded.alternates().is_empty());
        assert_eq!(
            decoded.legs().iter().map(|leg| leg.ident()).collect::<Vec<_>>(),
            route.legs().iter().map(|leg| leg.ident()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn decode_keeps_parse_warnings() {
        let nd = nd();
        let route = Route::decode("KJFK DPK NOWHERE KBOS", &nd).expect("route should decode");

        assert!(route
            .warnings()
            .contains(&Warning::UnresolvedToken("NOWHERE".to_string())));
        assert_eq!(route.to_string(), "KJFK DPK KBOS");
    }

    #[test]
    fn position_along_route() {
        let nd = equator_nd();
        let route = Route::decode("KAAA N0100 KBBB", &nd).expect("route should decode");

        let half = route.position_at(Length::nm(25.0)).expect("should be on route");
        assert!((half.x() - 0.416).abs() < 0.01);
        assert!(half.y().abs() < 0.001);

        assert_eq!(route.position_at(Length::nm(0.0)), Some(route.departure().coordinate()));
        assert!(route.position_at(Length::nm(60.0)).is_none());
    }

    #[test]
    fn ete_at_cruise_speed() {
        let nd = equator_nd();
        let route = Route::decode("KAAA N0100 KBBB", &nd).expect("route should decode");

        // 50 NM at 100 kt
        let ete = route.ete().expect("speed is known");
        assert!((ete.to_si() - 1800.0).abs() < 5.0);
    }
}
