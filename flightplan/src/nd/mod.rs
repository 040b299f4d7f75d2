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

//! Navigation Data.
//!
//! The route engine reads navigation data only through the
//! [`NavDataLookup`] trait. [`NavigationData`] is the in-memory
//! implementation created by the [`NavigationDataBuilder`].

use std::collections::HashMap;
use std::rc::Rc;

use geo::Point;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::geom;

mod airport;
mod airway;
mod builder;
mod fix;
mod navaid;
mod procedure;
mod runway;
mod waypoint;

#[cfg(test)]
pub(crate) mod fixtures;

pub use airport::Airport;
pub use airway::Airway;
pub use builder::NavigationDataBuilder;
pub use fix::{Fix, FixType};
pub use navaid::NavAid;
pub use procedure::*;
pub use runway::Runway;
pub use waypoint::Waypoint;

/// Read-only access to navigation data.
///
/// Implementors provide the raw lookups by ident. The search methods are
/// built on top of them.
pub trait NavDataLookup {
    /// Returns all fixes with the `ident`.
    fn fixes(&self, ident: &str) -> Vec<NavAid>;

    fn airport(&self, ident: &str) -> Option<Rc<Airport>>;

    fn airway(&self, name: &str) -> Option<&Airway>;

    fn procedure(&self, airport: &str, kind: ProcedureKind, name: &str) -> Option<Rc<Procedure>>;

    /// Finds a fix by `ident`, narrowed down by `region` and `kind`.
    ///
    /// Returns the first match if the fix is still ambiguous.
    fn find_fix(&self, ident: &str, region: Option<&str>, kind: Option<FixType>) -> Option<NavAid> {
        self.fixes(ident).into_iter().find(|fix| {
            region.map_or(true, |region| fix.region() == Some(region))
                && kind.map_or(true, |kind| fix.fix_type() == kind)
        })
    }

    /// Finds the fix with the `ident` that is nearest to the `point`.
    fn find_fix_near(&self, ident: &str, point: Point<f64>) -> Option<NavAid> {
        self.fixes(ident).into_iter().min_by(|a, b| {
            let a = geom::dist(point, a.coordinate()).to_si();
            let b = geom::dist(point, b.coordinate()).to_si();
            a.total_cmp(&b)
        })
    }

    /// Returns the fixes of the airway from `entry` to `exit`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AirwaySegmentNotFound`] if the airway is unknown or
    /// either fix is not on the airway.
    fn find_airway(&self, name: &str, entry: &str, exit: &str) -> Result<Vec<NavAid>, Error> {
        self.airway(name)
            .ok_or_else(|| Error::AirwaySegmentNotFound {
                airway: name.to_string(),
                ident: entry.to_string(),
            })?
            .segment(entry, exit)
    }

    /// Returns the procedure of the airport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProcedure`] if there is no such procedure.
    fn find_procedure(
        &self,
        airport: &str,
        kind: ProcedureKind,
        name: &str,
    ) -> Result<Rc<Procedure>, Error> {
        self.procedure(airport, kind, name)
            .ok_or_else(|| Error::UnknownProcedure {
                airport: airport.to_string(),
                name: name.to_string(),
            })
    }
}

/// In-memory navigation data.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavigationData {
    airports: HashMap<String, Rc<Airport>>,
    waypoints: HashMap<String, Vec<Rc<Waypoint>>>,
    airways: HashMap<String, Airway>,
    procedures: HashMap<String, Vec<Rc<Procedure>>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    errors: Vec<Error>,
}

impl NavigationData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> NavigationDataBuilder {
        NavigationDataBuilder::new()
    }

    /// Errors found while building the navigation data, e.g. airway fixes
    /// that don't exist.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Returns the procedures of the `kind` published for the airport.
    pub fn procedures(&self, airport: &str, kind: ProcedureKind) -> Vec<Rc<Procedure>> {
        self.procedures
            .get(airport)
            .into_iter()
            .flatten()
            .filter(|proc| proc.kind == kind)
            .map(Rc::clone)
            .collect()
    }

    fn runway_ends<'a>(&'a self, ident: &'a str) -> impl Iterator<Item = NavAid> + 'a {
        // runway ends are only looked up by their procedure ident
        ident
            .strip_prefix("RW")
            .into_iter()
            .flat_map(move |designator| {
                self.airports.values().filter_map(move |arpt| {
                    arpt.runway(designator).map(|rwy| NavAid::RunwayEnd {
                        airport: Rc::clone(arpt),
                        runway: rwy.clone(),
                    })
                })
            })
    }
}

impl NavDataLookup for NavigationData {
    fn fixes(&self, ident: &str) -> Vec<NavAid> {
        self.waypoints
            .get(ident)
            .into_iter()
            .flatten()
            .map(|wp| NavAid::Waypoint(Rc::clone(wp)))
            .chain(self.airport(ident).map(NavAid::Airport))
            .chain(self.runway_ends(ident))
            .collect()
    }

    fn airport(&self, ident: &str) -> Option<Rc<Airport>> {
        self.airports.get(ident).map(Rc::clone)
    }

    fn airway(&self, name: &str) -> Option<&Airway> {
        self.airways.get(name)
    }

    fn procedure(&self, airport: &str, kind: ProcedureKind, name: &str) -> Option<Rc<Procedure>> {
        self.procedures
            .get(airport)?
            .iter()
            .find(|proc| proc.kind == kind && proc.name == name)
            .map(Rc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::nd;
    use super::*;

    #[test]
    fn finds_fix_by_region_and_kind() {
        let nd = nd();

        let ccc = nd.find_fix("CCC", Some("K6"), Some(FixType::Vor));
        assert_eq!(ccc.map(|fix| fix.ident()), Some("CCC".to_string()));

        assert!(nd.find_fix("CCC", Some("ED"), None).is_none());
        assert!(nd.find_fix("CCC", None, Some(FixType::Ndb)).is_none());
    }

    #[test]
    fn finds_runway_end_in_airport_region() {
        let nd = nd();

        let rwy = nd
            .find_fix("RW04L", Some("KJFK"), Some(FixType::RunwayEnd))
            .expect("runway 04L should exist");
        assert_eq!(rwy.ident(), "RW04L");
        assert_eq!(rwy.elevation().map(|e| e.to_ft().round()), Some(12.0));
    }

    #[test]
    fn nearest_of_ambiguous_fixes() {
        let nd = nd();

        // there is a second DPK in the fixtures far away in Europe
        let dpk = nd
            .find_fix_near("DPK", coord!(40.64, -73.78))
            .expect("DPK should exist");
        assert_eq!(dpk.region(), Some("K6"));

        let dpk = nd
            .find_fix_near("DPK", coord!(50.0, 8.0))
            .expect("DPK should exist");
        assert_eq!(dpk.region(), Some("ED"));
    }

    #[test]
    fn airway_segment_between_fixes() {
        let nd = nd();

        let fixes = nd.find_airway("V1", "JFK", "HTO").expect("V1 should exist");
        let idents: Vec<String> = fixes.iter().map(|fix| fix.ident()).collect();
        assert_eq!(idents, ["JFK", "DPK", "CCC", "HTO"]);
    }

    #[test]
    fn unknown_procedure() {
        let nd = nd();

        assert!(nd.find_procedure("KJFK", ProcedureKind::Sid, "LENDY6").is_ok());
        assert_eq!(
            nd.find_procedure("KJFK", ProcedureKind::Star, "LENDY6"),
            Err(Error::UnknownProcedure {
                airport: "KJFK".to_string(),
                name: "LENDY6".to_string()
            })
        );
    }
}
