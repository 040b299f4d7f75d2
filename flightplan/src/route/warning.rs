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

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::measurements::Altitude;
use crate::nd::AltitudeRestriction;
use crate::VerticalDistance;

/// A condition that doesn't prevent the route from being used.
///
/// Warnings are attached to the [`Route`](super::Route) or
/// [`VerticalProfile`](super::VerticalProfile) they occurred in.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Warning {
    /// A token of a route string was skipped.
    UnresolvedToken(String),

    /// The STAR and approach are published for different runways.
    RunwayMismatch { star: String, approach: String },

    /// The profile doesn't meet the altitude restriction at the end of a leg.
    AltitudeRestrictionViolation {
        leg: usize,
        ident: String,
        required: AltitudeRestriction,
        computed: Altitude,
    },

    /// The route is too short to reach the cruise altitude.
    CruiseAltitudeUnreachable {
        cruise: VerticalDistance,
        apex: Altitude,
    },

    /// No magnetic variation is known at the fix so true courses are used.
    MagneticVariationEstimated { ident: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedToken(token) => write!(f, "Nothing found for {token}. Ignoring."),
            Self::RunwayMismatch { star, approach } => write!(
                f,
                "STAR runway {star} doesn't match approach runway {approach}"
            ),
            Self::AltitudeRestrictionViolation {
                leg,
                ident,
                required,
                computed,
            } => write!(
                f,
                "leg {leg} to {ident} requires {required} but is at {:.0} ft",
                computed.to_ft()
            ),
            Self::CruiseAltitudeUnreachable { cruise, apex } => write!(
                f,
                "cannot reach cruise altitude {cruise} - apex at {:.0}ft",
                apex.to_ft()
            ),
            Self::MagneticVariationEstimated { ident } => {
                write!(f, "magnetic variation unknown at {ident}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_token_message() {
        assert_eq!(
            Warning::UnresolvedToken("XYZZY".to_string()).to_string(),
            "Nothing found for XYZZY. Ignoring."
        );
    }

    #[test]
    fn apex_message() {
        let warning = Warning::CruiseAltitudeUnreachable {
            cruise: VerticalDistance::Fl(350),
            apex: Altitude::ft(14583.3),
        };
        assert_eq!(
            warning.to_string(),
            "cannot reach cruise altitude FL350 - apex at 14583ft"
        );
    }
}
