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

use super::{Fix, NavAid};
use crate::error::Error;

/// A named, ordered sequence of published fixes.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Airway {
    pub(crate) name: String,
    pub(crate) fixes: Vec<NavAid>,
}

impl Airway {
    pub fn new(name: &str, fixes: Vec<NavAid>) -> Self {
        Self {
            name: name.to_string(),
            fixes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fixes(&self) -> &[NavAid] {
        &self.fixes
    }

    /// Returns the fixes from `entry` to `exit` in the order they are flown.
    ///
    /// Both fixes are included. Airways can be flown in both directions, so
    /// the returned fixes are reversed if the exit comes before the entry in
    /// the published order.
    pub fn segment(&self, entry: &str, exit: &str) -> Result<Vec<NavAid>, Error> {
        let position = |ident: &str| {
            self.fixes
                .iter()
                .position(|fix| fix.ident() == ident)
                .ok_or_else(|| Error::AirwaySegmentNotFound {
                    airway: self.name.clone(),
                    ident: ident.to_string(),
                })
        };

        let i = position(entry)?;
        let j = position(exit)?;

        Ok(if i <= j {
            self.fixes[i..=j].to_vec()
        } else {
            self.fixes[j..=i].iter().rev().cloned().collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::nd::{FixType, Waypoint};

    fn wp(ident: &str, lon: f64) -> NavAid {
        NavAid::Waypoint(Rc::new(Waypoint::new(
            ident,
            FixType::Waypoint,
            crate::coord!(0.0, lon),
        )))
    }

    fn idents(fixes: &[NavAid]) -> Vec<String> {
        fixes.iter().map(|fix| fix.ident()).collect()
    }

    #[test]
    fn segment_includes_intermediate_fixes() {
        let airway = Airway::new(
            "V1",
            vec![wp("A", 0.0), wp("B", 1.0), wp("C", 2.0), wp("D", 3.0)],
        );

        assert_eq!(idents(&airway.segment("A", "C").unwrap()), ["A", "B", "C"]);
        assert_eq!(idents(&airway.segment("D", "B").unwrap()), ["D", "C", "B"]);
    }

    #[test]
    fn segment_fails_for_fix_off_airway() {
        let airway = Airway::new("V1", vec![wp("A", 0.0), wp("B", 1.0)]);

        assert_eq!(
            airway.segment("A", "X"),
            Err(Error::AirwaySegmentNotFound {
                airway: "V1".to_string(),
                ident: "X".to_string()
            })
        );
    }
}
