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

//! Route string parsing.
//!
//! A route string is parsed in two phases: **Input String → Lexer → Words →
//! Resolver → RouteBuilder**.
//!
//! # Lexing (Context-Free)
//!
//! The [`Lexer`] splits the string at whitespace and classifies each element
//! only by its format:
//!
//! - `"DCT"` marks the next element as enroute
//! - `"N0450F350"` → `Word::Cruise` if it follows the departure
//! - `"KJFK1200"` → `Word::Ident` with the time stripped if it's the first
//!   element
//! - `"LENDY6.CCC"` → `Word::Ident` with a transition
//!
//! # Resolving (Context-Aware)
//!
//! The resolver finds the departure, destination and alternates first, since
//! the procedures before and after the enroute part depend on them. The
//! destination is the first airport of the trailing airports that don't
//! follow a `DCT`, unless an unknown ICAO location indicator stands right
//! before them. The enroute words are resolved against the navigation data in
//! order and words that can't be resolved are skipped with a
//! [`Warning::UnresolvedToken`].

use log::{debug, warn};

use super::builder::{EnrouteEntry, RouteBuilder};
use super::Warning;
use crate::error::{Error, Errors};
use crate::measurements::Speed;
use crate::nd::*;
use crate::VerticalDistance;

/// A whitespace separated element of a route string.
#[derive(Clone, PartialEq, Debug)]
enum Word {
    Cruise {
        speed: Option<Speed>,
        level: Option<VerticalDistance>,
    },
    Ident {
        ident: String,
        transition: Option<String>,
        /// Follows a `DCT` and is therefore enroute.
        direct: bool,
    },
}

impl Word {
    fn ident(ident: &str) -> Self {
        match ident.split_once('.') {
            Some((ident, transition)) if !transition.is_empty() => Self::Ident {
                ident: ident.to_string(),
                transition: Some(transition.to_string()),
                direct: false,
            },
            _ => Self::Ident {
                ident: ident.trim_end_matches('.').to_string(),
                transition: None,
                direct: false,
            },
        }
    }

    fn direct(self) -> Self {
        match self {
            Self::Ident {
                ident, transition, ..
            } => Self::Ident {
                ident,
                transition,
                direct: true,
            },
            cruise => cruise,
        }
    }

    /// The word as written in the route string.
    fn text(&self) -> String {
        match self {
            Self::Cruise { speed, level } => format!(
                "{}{}",
                speed.map(encode_speed).unwrap_or_default(),
                level.and_then(|level| level.to_icao()).unwrap_or_default()
            ),
            Self::Ident {
                ident,
                transition: Some(transition),
                ..
            } => format!("{ident}.{transition}"),
            Self::Ident { ident, .. } => ident.clone(),
        }
    }
}

struct Lexer;

impl Lexer {
    fn lex(s: &str) -> Vec<Word> {
        let mut words = Vec::new();
        let mut direct = false;

        for element in s.to_uppercase().split_whitespace() {
            if element == "DCT" {
                direct = true;
                continue;
            }

            let word = match words.len() {
                0 => Word::ident(strip_time(element)),
                1 if !direct => Self::cruise(element).unwrap_or_else(|| Word::ident(element)),
                _ => Word::ident(element),
            };

            words.push(if direct { word.direct() } else { word });
            direct = false;
        }

        words
    }

    /// Classifies speed and level groups like `N0450F350`, `N450` or `F350`.
    fn cruise(s: &str) -> Option<Word> {
        if let Ok(level) = s.parse::<VerticalDistance>() {
            return Some(Word::Cruise {
                speed: None,
                level: Some(level),
            });
        }

        // the level group starts at the first letter after the speed
        let split = s
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_ascii_alphabetic())
            .map_or(s.len(), |(i, _)| i);
        let (speed, level) = s.split_at(split);

        let speed = speed.parse::<Speed>().ok()?;
        let level = match level {
            "" => None,
            level => Some(level.parse::<VerticalDistance>().ok()?),
        };

        Some(Word::Cruise {
            speed: Some(speed),
            level,
        })
    }
}

/// Strips an ETD or ETA like `1230` from an airport ident.
fn strip_time(s: &str) -> &str {
    match s.len().checked_sub(4).and_then(|i| s.split_at_checked(i)) {
        Some((ident, time)) if !ident.is_empty() && time.bytes().all(|b| b.is_ascii_digit()) => {
            ident
        }
        _ => s,
    }
}

/// Encodes the speed as ICAO speed group, e.g. `N0450`.
pub(crate) fn encode_speed(speed: Speed) -> String {
    use crate::measurements::SpeedUnit;

    match speed.unit() {
        SpeedUnit::KilometersPerHour => format!("K{:04.0}", speed.value()),
        _ => format!("N{:04.0}", speed.convert_to(SpeedUnit::Knots).value()),
    }
}

/// Parses the route string `s` into the input of the route assembly.
///
/// # Errors
///
/// Returns [`Error::MandatoryAirportNotFound`] for the departure and the
/// destination if they can't be found and [`Error::EmptyRoute`] if the string
/// has less than two elements.
pub(crate) fn parse(
    s: &str,
    nd: &dyn NavDataLookup,
) -> Result<(RouteBuilder, Vec<Warning>), Errors> {
    debug!("parsing route {s:?}");
    let words = Lexer::lex(s);

    if words.len() < 2 {
        return Err(Error::EmptyRoute.into());
    }

    let departure = ident_of(&words[0]);

    let mut rest = &words[1..];
    let mut cruise = (None, None);
    if let Some(Word::Cruise { speed, level }) = rest.first() {
        cruise = (*speed, *level);
        rest = &rest[1..];
    }

    // the destination is the first of the airports at the end
    let trailing = rest
        .iter()
        .rev()
        .take_while(|word| is_airport(word, nd))
        .count();
    let (middle, destination, alternates) = match trailing {
        0 => match rest.split_last() {
            Some((last, middle)) => (middle, ident_of(last), &[][..]),
            None => return Err(Error::EmptyRoute.into()),
        },
        n => {
            let (middle, airports) = rest.split_at(rest.len() - n);
            let first = ident_of(&airports[0]);
            match middle.split_last() {
                // an unknown airport followed by the alternates
                Some((last, middle)) if is_missing_airport(last, &departure, &first, nd) => {
                    (middle, ident_of(last), airports)
                }
                _ => (middle, first, &airports[1..]),
            }
        }
    };
    let destination = strip_time(&destination).to_string();

    let errors: Vec<Error> = [&departure, &destination]
        .into_iter()
        .filter(|ident| nd.airport(ident).is_none())
        .map(|ident| Error::MandatoryAirportNotFound(ident.to_string()))
        .collect();
    Errors::check(errors, ())?;

    let mut warnings = Vec::new();
    let mut route = RouteBuilder::new()
        .departure(&departure)
        .destination(&destination)
        .cruise(cruise.0, cruise.1);

    for alternate in alternates {
        route = route.alternate(&ident_of(alternate));
    }

    let mut middle = middle;

    // the fix the next airway has to start at
    let mut position = Some(departure.clone());

    if let Some((Word::Ident { ident, transition, .. }, rest)) = middle.split_first() {
        if let Some(sid) = nd.procedure(&departure, ProcedureKind::Sid, ident) {
            debug!("{ident} is a departure of {departure}");
            route = route.sid(ident, transition.as_deref());
            middle = rest;

            position = sid
                .legs(transition.as_deref())
                .ok()
                .and_then(|legs| legs.last().and_then(|leg| leg.path.end_fix().cloned()))
                .map(|fix| fix.ident);
        }
    }

    // the approach may follow the STAR and precedes the destination
    if let Some((Word::Ident { ident, transition, .. }, rest)) = middle.split_last() {
        if nd.procedure(&destination, ProcedureKind::Star, ident).is_some() {
            route = route.star(ident, transition.as_deref());
            middle = rest;
        } else if nd.procedure(&destination, ProcedureKind::Approach, ident).is_some() {
            route = route.approach(ident, transition.as_deref());
            middle = rest;

            if let Some((Word::Ident { ident, transition, .. }, rest)) = middle.split_last() {
                if nd.procedure(&destination, ProcedureKind::Star, ident).is_some() {
                    route = route.star(ident, transition.as_deref());
                    middle = rest;
                }
            }
        }
    }

    let mut i = 0;
    while i < middle.len() {
        let word = &middle[i];
        let ident = ident_of(word);

        match (nd.airway(&ident), middle.get(i + 1)) {
            (Some(_), Some(exit)) => {
                let exit = ident_of(exit);
                let entry = position.as_deref().unwrap_or_default();

                match nd.find_airway(&ident, entry, &exit) {
                    Ok(_) => {
                        route = route.airway(&ident, &exit);
                        position = Some(exit);
                    }
                    // off the airway but the exit is still a known fix
                    Err(e) if !nd.fixes(&exit).is_empty() => {
                        debug!("{e}, going direct to {exit}");
                        record(&mut warnings, Warning::UnresolvedToken(ident));
                        route = route.enroute(EnrouteEntry::Waypoint(exit.clone()));
                        position = Some(exit);
                    }
                    Err(_) => {
                        record(&mut warnings, Warning::UnresolvedToken(format!("{ident} {exit}")));
                    }
                }
                i += 2;
                continue;
            }
            _ if !nd.fixes(&ident).is_empty() => {
                route = route.enroute(EnrouteEntry::Waypoint(ident.clone()));
                position = Some(ident);
            }
            _ => {
                debug!("{} is neither airway nor fix", word.text());
                record(&mut warnings, Warning::UnresolvedToken(word.text()));
            }
        }

        i += 1;
    }

    Ok((route, warnings))
}

fn record(warnings: &mut Vec<Warning>, warning: Warning) {
    warn!("{warning}");
    warnings.push(warning);
}

fn ident_of(word: &Word) -> String {
    match word {
        Word::Ident { ident, .. } => ident.clone(),
        cruise => cruise.text(),
    }
}

fn is_airport(word: &Word, nd: &dyn NavDataLookup) -> bool {
    match word {
        Word::Ident {
            ident,
            transition: None,
            direct: false,
        } => nd.airport(strip_time(ident)).is_some(),
        _ => false,
    }
}

/// Whether the word looks like an ICAO location indicator that names
/// nothing in the navigation data.
///
/// Procedures of the departure and the airport `next` to it take precedence,
/// since their names may have four letters too.
fn is_missing_airport(
    word: &Word,
    departure: &str,
    next: &str,
    nd: &dyn NavDataLookup,
) -> bool {
    let Word::Ident {
        ident,
        transition: None,
        direct: false,
    } = word
    else {
        return false;
    };
    let ident = strip_time(ident);

    ident.len() == 4
        && ident.bytes().all(|b| b.is_ascii_alphabetic())
        && nd.fixes(ident).is_empty()
        && nd.airway(ident).is_none()
        && nd.procedure(departure, ProcedureKind::Sid, ident).is_none()
        && nd.procedure(next, ProcedureKind::Star, ident).is_none()
        && nd.procedure(next, ProcedureKind::Approach, ident).is_none()
}
