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

//! Flight plan route engine.
//!
//! The crate assembles routes from airports, waypoints, airways and
//! published procedures, computes their vertical profile and converts them
//! from and to ICAO-like route strings:
//!
//! ```text
//! KJFK N0450F350 LENDY6.CCC JFK V1 HTO V16 HOWID STAR.ILS22 KBOS
//! ```
//!
//! All navigation data is read through the [`NavDataLookup`] trait, so any
//! data source can be used. The [`FMS`] ties everything together and keeps
//! an undo history of route edits.
//!
//! [`NavDataLookup`]: nd::NavDataLookup
//! [`FMS`]: fms::FMS

#[macro_use]
mod macros;

mod core;
mod error;
pub mod fms;
pub mod fp;
pub mod geom;
pub mod measurements;
pub mod nd;
pub mod route;

pub use crate::core::*;
pub use error::{Error, Errors, Result};

pub mod prelude {
    pub use crate::error::{Error, Errors};
    pub use crate::fms::FMS;
    pub use crate::fp::Performance;
    pub use crate::nd::{Fix, NavDataLookup, NavigationData, NavigationDataBuilder};
    pub use crate::route::{Route, RouteBuilder, VerticalProfile, Warning};
    pub use crate::{MagneticVariation, VerticalDistance};
}
