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

use std::error;
use std::fmt;
use std::ops::Deref;

use crate::VerticalDistance;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an operation.
///
/// Conditions that still allow a usable result are reported as
/// [`Warning`](crate::route::Warning) instead.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Error {
    /// A fix referenced by a procedure leg or the route can't be found.
    MissingNavaid {
        ident: String,
        region: Option<String>,
    },

    /// The fix is not on the named airway.
    AirwaySegmentNotFound { airway: String, ident: String },

    /// A leg that continues from the previous leg has no start point.
    MissingLegStart(String),

    /// The departure or destination airport can't be found.
    MandatoryAirportNotFound(String),

    /// The aircraft performance can't be used to compute a profile.
    InvalidPerformance(&'static str),

    /// The cruise altitude is below the departure elevation.
    InvalidCruiseAltitude {
        cruise: VerticalDistance,
        elevation: i32,
    },

    /// No procedure with this name at the airport.
    UnknownProcedure { airport: String, name: String },

    /// The procedure has no transition with this name.
    UnknownTransition {
        procedure: String,
        transition: String,
    },

    /// A route has at least the departure and destination.
    EmptyRoute,

    /// An edit of the route can't be applied.
    InvalidEdit(String),

    NothingToUndo,

    NothingToRedo,

    /// A string is not in the expected format.
    UnexpectedString,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNavaid {
                ident,
                region: Some(region),
            } => write!(f, "navaid {ident} in region {region} not found"),
            Self::MissingNavaid {
                ident,
                region: None,
            } => write!(f, "navaid {ident} not found"),
            Self::AirwaySegmentNotFound { airway, ident } => {
                write!(f, "{ident} is not on airway {airway}")
            }
            Self::MissingLegStart(code) => write!(f, "{code} leg has no start point"),
            Self::MandatoryAirportNotFound(ident) => write!(f, "airport {ident} not found"),
            Self::InvalidPerformance(reason) => write!(f, "invalid performance: {reason}"),
            Self::InvalidCruiseAltitude { cruise, elevation } => write!(
                f,
                "cruise altitude {cruise} is below the departure elevation of {elevation} ft"
            ),
            Self::UnknownProcedure { airport, name } => {
                write!(f, "no procedure {name} at {airport}")
            }
            Self::UnknownTransition {
                procedure,
                transition,
            } => write!(f, "procedure {procedure} has no transition {transition}"),
            Self::EmptyRoute => write!(f, "route needs a departure and destination"),
            Self::InvalidEdit(reason) => write!(f, "invalid edit: {reason}"),
            Self::NothingToUndo => write!(f, "nothing to undo"),
            Self::NothingToRedo => write!(f, "nothing to redo"),
            Self::UnexpectedString => write!(f, "unexpected string"),
        }
    }
}

impl error::Error for Error {}

/// An itemized list of errors.
///
/// Operations that resolve many idents collect all errors so they can be
/// presented at once. The list is never empty.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Errors(Vec<Error>);

impl Errors {
    /// Returns `Err` with the collected `errors` or `Ok(value)` if there are
    /// none.
    pub(crate) fn check<T>(errors: Vec<Error>, value: T) -> std::result::Result<T, Self> {
        if errors.is_empty() {
            Ok(value)
        } else {
            Err(Self(errors))
        }
    }

    pub fn into_inner(self) -> Vec<Error> {
        self.0
    }
}

impl Deref for Errors {
    type Target = [Error];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Error> for Errors {
    fn from(e: Error) -> Self {
        Self(vec![e])
    }
}

impl IntoIterator for Errors {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl error::Error for Errors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_each_error_on_its_own_line() {
        let errors = Errors(vec![
            Error::MandatoryAirportNotFound("KXXX".to_string()),
            Error::MandatoryAirportNotFound("KYYY".to_string()),
        ]);

        assert_eq!(
            errors.to_string(),
            "airport KXXX not found\nairport KYYY not found"
        );
    }

    #[test]
    fn names_region_of_missing_navaid() {
        let e = Error::MissingNavaid {
            ident: "CCC".to_string(),
            region: Some("K6".to_string()),
        };
        assert_eq!(e.to_string(), "navaid CCC in region K6 not found");
    }
}
