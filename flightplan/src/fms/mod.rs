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

//! Flight Management System.
//!
//! [`FMS`] is the type used to manage the route and its vertical profile that
//! depend on each other and on the navigation data. Every edit is applied to
//! a copy of the current state and evaluated through the pipeline of route
//! assembly and profile computation. Only if all stages succeed the copy
//! becomes the current state and the previous state is kept to undo the edit.

use std::collections::HashMap;

use log::{debug, warn};

use crate::error::{Error, Errors};
use crate::fp::Performance;
use crate::measurements::Speed;
use crate::nd::NavDataLookup;
use crate::route::{EnrouteEntry, ProcedureSelection, Route, RouteBuilder, VerticalProfile, Warning};
use crate::VerticalDistance;

type Result<T> = std::result::Result<T, Errors>;

/// The inputs the route and profile are evaluated from.
#[derive(Clone, PartialEq, Debug, Default)]
struct Context {
    route: RouteBuilder,
    perf: Option<Performance>,
    /// Warnings of the decoded route string.
    notes: Vec<Warning>,
}

/// The state of the FMS that is replaced on each edit.
#[derive(Clone, PartialEq, Debug, Default)]
struct Snapshot {
    context: Context,
    route: Option<Route>,
    profile: Option<VerticalProfile>,
}

/// `FMS` is the type that manages the route and vertical profile.
///
/// See the [module documentation](self) for details.
///
/// # Examples
///
/// ```
/// # use flightplan::prelude::*;
/// # fn plan(nd: NavigationData) -> Result<(), Errors> {
/// let mut fms = FMS::new(Box::new(nd));
/// fms.decode("KJFK N0450F350 DPK KBOS")?;
/// fms.remove_enroute(0)?;
/// fms.undo()?;
/// # Ok(())
/// # }
/// ```
pub struct FMS {
    nd: Box<dyn NavDataLookup>,
    current: Snapshot,
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
}

impl FMS {
    /// Constructs a new `FMS` on the navigation data.
    pub fn new(nd: Box<dyn NavDataLookup>) -> Self {
        Self {
            nd,
            current: Snapshot::default(),
            undo: Vec::new(),
            redo: Vec::new(),
        }
    }

    pub fn nd(&self) -> &dyn NavDataLookup {
        self.nd.as_ref()
    }

    pub fn route(&self) -> Option<&Route> {
        self.current.route.as_ref()
    }

    pub fn profile(&self) -> Option<&VerticalProfile> {
        self.current.profile.as_ref()
    }

    pub fn performance(&self) -> Option<&Performance> {
        self.current.context.perf.as_ref()
    }

    /// The warnings of the route followed by the warnings of the profile.
    pub fn warnings(&self) -> Vec<Warning> {
        let route = self.route().map(Route::warnings).unwrap_or_default();
        let profile = self
            .profile()
            .map(VerticalProfile::warnings)
            .unwrap_or_default();
        [route, profile].concat()
    }

    /// Decodes the route string and replaces the route.
    pub fn decode(&mut self, route: &str) -> Result<()> {
        let (builder, notes) = crate::route::parse(route, self.nd.as_ref())?;
        let route = route.to_string();

        self.apply(
            EvalPipeline::default().inspect_err(EvalStage::Route, move |errors, _| {
                warn!("route {route:?} rejected: {errors}")
            }),
            |context| {
                context.route = builder;
                context.notes = notes;
                Ok(())
            },
        )
    }

    /// Replaces the route with one assembled from the `builder`.
    pub fn set_route(&mut self, builder: RouteBuilder) -> Result<()> {
        self.edit(|route| {
            *route = builder;
            Ok(())
        })
    }

    /// Inserts the `entry` before the enroute entry at the `index`.
    pub fn insert_enroute(&mut self, index: usize, entry: EnrouteEntry) -> Result<()> {
        self.edit(|route| {
            if index > route.enroute.len() {
                return Err(out_of_range(index, route.enroute.len()));
            }
            route.enroute.insert(index, entry);
            Ok(())
        })
    }

    pub fn remove_enroute(&mut self, index: usize) -> Result<()> {
        self.edit(|route| {
            if index >= route.enroute.len() {
                return Err(out_of_range(index, route.enroute.len()));
            }
            route.enroute.remove(index);
            Ok(())
        })
    }

    /// Moves the enroute entry `from` one index `to` another.
    pub fn move_enroute(&mut self, from: usize, to: usize) -> Result<()> {
        self.edit(|route| {
            let len = route.enroute.len();
            if from >= len {
                return Err(out_of_range(from, len));
            }
            if to >= len {
                return Err(out_of_range(to, len));
            }
            let entry = route.enroute.remove(from);
            route.enroute.insert(to, entry);
            Ok(())
        })
    }

    pub fn replace_enroute(&mut self, index: usize, entry: EnrouteEntry) -> Result<()> {
        self.edit(|route| match route.enroute.get_mut(index) {
            Some(current) => {
                *current = entry;
                Ok(())
            }
            None => Err(out_of_range(index, route.enroute.len())),
        })
    }

    pub fn set_sid(&mut self, sid: Option<ProcedureSelection>) -> Result<()> {
        self.edit(|route| {
            route.sid = sid;
            Ok(())
        })
    }

    pub fn set_star(&mut self, star: Option<ProcedureSelection>) -> Result<()> {
        self.edit(|route| {
            route.star = star;
            Ok(())
        })
    }

    pub fn set_approach(&mut self, approach: Option<ProcedureSelection>) -> Result<()> {
        self.edit(|route| {
            route.approach = approach;
            Ok(())
        })
    }

    pub fn set_alternates(&mut self, alternates: Vec<String>) -> Result<()> {
        self.edit(|route| {
            route.alternates = alternates;
            Ok(())
        })
    }

    pub fn set_cruise(
        &mut self,
        speed: Option<Speed>,
        level: Option<VerticalDistance>,
    ) -> Result<()> {
        self.edit(|route| {
            route.speed = speed;
            route.level = level;
            Ok(())
        })
    }

    /// Sets the performance and computes the vertical profile again.
    pub fn set_performance(&mut self, perf: Performance) -> Result<()> {
        self.apply(
            EvalPipeline::default().skip_until(EvalStage::Profile),
            |context| {
                context.perf = Some(perf);
                Ok(())
            },
        )
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Restores the state before the last edit.
    pub fn undo(&mut self) -> std::result::Result<(), Error> {
        let previous = self.undo.pop().ok_or(Error::NothingToUndo)?;
        let current = std::mem::replace(&mut self.current, previous);
        self.redo.push(current);
        debug!("undo ({} left)", self.undo.len());
        Ok(())
    }

    /// Restores the state of the last undone edit.
    pub fn redo(&mut self) -> std::result::Result<(), Error> {
        let next = self.redo.pop().ok_or(Error::NothingToRedo)?;
        let current = std::mem::replace(&mut self.current, next);
        self.undo.push(current);
        debug!("redo ({} left)", self.redo.len());
        Ok(())
    }

    /// Edits the route input and evaluates all stages.
    fn edit<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut RouteBuilder) -> std::result::Result<(), Error>,
    {
        self.apply(EvalPipeline::default(), |context| {
            // notes describe the decoded string which the edit replaces
            context.notes.clear();
            f(&mut context.route)
        })
    }

    /// Applies the edit `f` to a copy of the current state and commits the
    /// copy if the `pipeline` succeeds.
    fn apply<F>(&mut self, pipeline: EvalPipeline, f: F) -> Result<()>
    where
        F: FnOnce(&mut Context) -> std::result::Result<(), Error>,
    {
        let mut candidate = self.current.clone();
        f(&mut candidate.context)?;
        pipeline.eval(&mut candidate, self.nd.as_ref())?;

        let previous = std::mem::replace(&mut self.current, candidate);
        self.undo.push(previous);
        self.redo.clear();
        Ok(())
    }
}

fn out_of_range(index: usize, len: usize) -> Error {
    Error::InvalidEdit(format!("index {index} out of range for {len} enroute entries"))
}

/////////////////////////////////////////////////////////////////////////////
// Evaluation pipeline
/////////////////////////////////////////////////////////////////////////////

type Inspector = Box<dyn FnOnce(&Errors, &Snapshot)>;

/// Evaluates a snapshot in a defined order.
///
/// The snapshot is evaluated in stages, where each stage can fail. If a stage
/// fails, it can be inspected before the error is propagated. If a certain
/// edit doesn't require an update of the entire pipeline, stages can be
/// skipped to start at a specific stage.
struct EvalPipeline {
    stages: [EvalStage; 2],
    stage_range: std::ops::Range<usize>,
    inspectors: HashMap<EvalStage, Inspector>,
}

impl EvalPipeline {
    fn skip_until(mut self, stage: EvalStage) -> Self {
        if let Some(i) = self.stages[self.stage_range.clone()]
            .iter()
            .position(|s| s == &stage)
        {
            self.stage_range.start += i;
        }
        self
    }

    /// Adds an error inspector for a specific stage.
    fn inspect_err<F>(mut self, stage: EvalStage, f: F) -> Self
    where
        F: FnOnce(&Errors, &Snapshot) + 'static,
    {
        self.inspectors.insert(stage, Box::new(f));
        self
    }

    fn eval(mut self, snapshot: &mut Snapshot, nd: &dyn NavDataLookup) -> Result<()> {
        for stage in &self.stages[self.stage_range.clone()] {
            let result = stage.eval(snapshot, nd);

            if let Err(ref e) = result {
                if let Some(inspector) = self.inspectors.remove(stage) {
                    inspector(e, snapshot);
                }
            }

            result?;
        }

        Ok(())
    }
}

impl Default for EvalPipeline {
    fn default() -> Self {
        Self {
            stages: [EvalStage::Route, EvalStage::Profile],
            stage_range: 0..2,
            inspectors: HashMap::new(),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Hash, Clone, Copy)]
enum EvalStage {
    Route,
    Profile,
}

impl EvalStage {
    fn eval(&self, snapshot: &mut Snapshot, nd: &dyn NavDataLookup) -> Result<()> {
        match self {
            EvalStage::Route => {
                let mut route = snapshot.context.route.build(nd)?;
                let mut warnings = snapshot.context.notes.clone();
                warnings.append(&mut route.warnings);
                route.warnings = warnings;
                snapshot.route = Some(route);
            }
            EvalStage::Profile => {
                snapshot.profile = match (&snapshot.route, &snapshot.context.perf) {
                    (Some(route), Some(perf)) => Some(VerticalProfile::compute(route, perf)?),
                    _ => None,
                };
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nd::fixtures::nd;

    fn fms() -> FMS {
        let mut fms = FMS::new(Box::new(nd()));
        fms.decode("KJFK N0450F350 DPK CCC HTO KBOS")
            .expect("route should decode");
        fms
    }

    fn idents(fms: &FMS) -> Vec<String> {
        fms.route()
            .map(|route| route.legs().iter().map(|leg| leg.ident()).collect())
            .unwrap_or_default()
    }

    fn perf() -> Performance {
        Performance {
            climb_rate: Speed::fpm(2000.0),
            climb_speed: Speed::kt(250.0),
            descent_rate: Speed::fpm(2000.0),
            descent_speed: Speed::kt(250.0),
            cruise_speed: Speed::kt(450.0),
            cruise_level: VerticalDistance::Fl(200),
        }
    }

    #[test]
    fn edits_enroute() {
        let mut fms = fms();
        assert_eq!(idents(&fms), ["KJFK", "DPK", "CCC", "HTO", "KBOS"]);

        fms.remove_enroute(1).expect("index is valid");
        assert_eq!(idents(&fms), ["KJFK", "DPK", "HTO", "KBOS"]);

        fms.move_enroute(1, 0).expect("indices are valid");
        assert_eq!(idents(&fms), ["KJFK", "HTO", "DPK", "KBOS"]);

        fms.replace_enroute(1, EnrouteEntry::Waypoint("PVD".to_string()))
            .expect("index is valid");
        assert_eq!(idents(&fms), ["KJFK", "HTO", "PVD", "KBOS"]);
    }

    #[test]
    fn rejected_edit_keeps_route() {
        let mut fms = fms();

        let errors = fms.remove_enroute(7).expect_err("index is out of range");
        assert!(matches!(errors.into_inner().as_slice(), [Error::InvalidEdit(_)]));

        let result = fms.insert_enroute(0, EnrouteEntry::Waypoint("NOWHERE".to_string()));
        assert!(result.is_err());
        assert_eq!(idents(&fms), ["KJFK", "DPK", "CCC", "HTO", "KBOS"]);
    }

    #[test]
    fn undo_and_redo() {
        let mut fms = fms();
        fms.remove_enroute(0).expect("index is valid");

        fms.undo().expect("edit should be undone");
        assert_eq!(idents(&fms), ["KJFK", "DPK", "CCC", "HTO", "KBOS"]);

        fms.redo().expect("edit should be redone");
        assert_eq!(idents(&fms), ["KJFK", "CCC", "HTO", "KBOS"]);
        assert_eq!(fms.redo(), Err(Error::NothingToRedo));

        fms.undo().expect("edit should be undone");
        fms.undo().expect("decode should be undone");
        assert!(fms.route().is_none());
        assert_eq!(fms.undo(), Err(Error::NothingToUndo));
    }

    #[test]
    fn profile_follows_route() {
        let mut fms = fms();
        fms.set_performance(perf()).expect("performance is valid");
        let toc = *fms.profile().expect("should have profile").toc();

        fms.remove_enroute(2).expect("index is valid");
        let profile = fms.profile().expect("should have profile");
        assert_eq!(profile.toc(), &toc);
        assert!(profile.tod().to_nm() > toc.to_nm());

        let invalid = Performance {
            climb_rate: Speed::fpm(0.0),
            ..perf()
        };
        assert!(fms.set_performance(invalid).is_err());
        assert_eq!(fms.performance(), Some(&perf()));
    }
}
