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

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};

use super::*;

/// Navigation data factory, which is used to build [navigation data].
///
/// Airways are added with references to their fixes, which are resolved
/// once all fixes are known.
///
/// [navigation data]: super::NavigationData
#[derive(Default)]
pub struct NavigationDataBuilder {
    airports: HashMap<String, Airport>,
    runways: HashMap<String, Vec<Runway>>,
    waypoints: HashMap<String, Vec<Rc<Waypoint>>>,
    airways: Vec<(String, Vec<FixRef>)>,
    procedures: HashMap<String, Vec<Rc<Procedure>>>,
    errors: Vec<Error>,
}

impl NavigationDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(mut self) -> NavigationData {
        // add unassigned runways to airports
        self.runways.iter_mut().for_each(|(ident, rwys)| {
            if let Some(arpt) = self.airports.get_mut(ident) {
                arpt.runways.append(rwys);
            }
        });

        let mut nd = NavigationData {
            airports: self
                .airports
                .into_iter()
                .map(|(ident, arpt)| (ident, Rc::new(arpt)))
                .collect(),
            waypoints: self.waypoints,
            airways: HashMap::new(),
            procedures: self.procedures,
            errors: self.errors,
        };

        for (name, refs) in self.airways {
            let mut fixes: Vec<NavAid> = Vec::with_capacity(refs.len());

            for fix_ref in refs {
                let fix = match (&fix_ref.region, fixes.last()) {
                    (Some(region), _) => nd.find_fix(&fix_ref.ident, Some(region), None),
                    (None, Some(prev)) => nd.find_fix_near(&fix_ref.ident, prev.coordinate()),
                    (None, None) => nd.find_fix(&fix_ref.ident, None, None),
                };

                match fix {
                    Some(fix) => fixes.push(fix),
                    None => {
                        warn!("airway {name} references unknown fix {fix_ref}");
                        nd.errors.push(Error::MissingNavaid {
                            ident: fix_ref.ident,
                            region: fix_ref.region,
                        });
                    }
                }
            }

            debug!("airway {name} with {} fixes", fixes.len());
            nd.airways.insert(name.clone(), Airway { name, fixes });
        }

        nd
    }

    pub fn add_airport(&mut self, arpt: Airport) {
        self.airports.insert(arpt.ident(), arpt);
    }

    pub fn add_runway(&mut self, ident: String, rwy: Runway) {
        match self.airports.get_mut(&ident) {
            Some(arpt) => arpt.runways.push(rwy),
            // in case we have already a runway but no airport
            None => self.runways.entry(ident).or_default().push(rwy),
        }
    }

    pub fn add_waypoint(&mut self, wp: Waypoint) {
        self.waypoints
            .entry(wp.ident())
            .or_default()
            .push(Rc::new(wp));
    }

    /// Adds an airway through the `fixes` in their published order.
    pub fn add_airway(&mut self, name: &str, fixes: Vec<FixRef>) {
        self.airways.push((name.to_string(), fixes));
    }

    pub fn add_procedure(&mut self, procedure: Procedure) {
        self.procedures
            .entry(procedure.airport.clone())
            .or_default()
            .push(Rc::new(procedure));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurements::{Altitude, Angle};

    #[test]
    fn runway_added_before_its_airport() {
        let mut builder = NavigationDataBuilder::new();
        builder.add_runway(
            "KAAA".to_string(),
            Runway {
                designator: "09".to_string(),
                coordinate: coord!(0.0, 0.0),
                bearing: Angle::t(90.0),
                elevation: Altitude::ft(0.0),
            },
        );
        builder.add_airport(Airport::new("KAAA", coord!(0.0, 0.01), Altitude::ft(0.0)));

        let nd = builder.build();
        let arpt = nd.airport("KAAA").expect("KAAA should exist");
        assert!(arpt.runway("RW09").is_some());
    }

    #[test]
    fn reports_unknown_airway_fix() {
        let mut builder = NavigationDataBuilder::new();
        builder.add_waypoint(Waypoint::new("A", FixType::Waypoint, coord!(0.0, 0.0)));
        builder.add_airway("J1", vec![FixRef::new("A"), FixRef::new("B")]);

        let nd = builder.build();
        assert_eq!(
            nd.errors(),
            &[Error::MissingNavaid {
                ident: "B".to_string(),
                region: None
            }]
        );
        assert_eq!(nd.airway("J1").map(|awy| awy.fixes().len()), Some(1));
    }
}
