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

//! Geodesic computations on the WGS84 ellipsoid.
//!
//! Points are [`geo::Point`] with longitude as `x` and latitude as `y`. Use
//! the [`coord!`](crate::coord) macro to create them from latitude and
//! longitude.

use geo::{Bearing, Destination, Distance, Geodesic, Point};

use crate::measurements::{Angle, AngleUnit, Length};

/// Number of points to interpolate per 90 degrees of arc.
const ARC_POINTS_PER_QUADRANT: usize = 6;

/// Step width when searching along a course for a termination condition.
const SEARCH_STEP_NM: f32 = 0.5;

/// Returns the true bearing from `from` to `to`.
pub fn bearing(from: Point<f64>, to: Point<f64>) -> Angle {
    Angle::t(Geodesic.bearing(from, to) as f32)
}

/// Returns the distance between the two points.
pub fn dist(from: Point<f64>, to: Point<f64>) -> Length {
    Length::m(Geodesic.distance(from, to) as f32)
}

/// Returns the point reached from `origin` on the true `course` after `dist`.
pub fn destination(origin: Point<f64>, course: Angle, dist: Length) -> Point<f64> {
    let course = match course.unit() {
        AngleUnit::Radians => course.to_si().to_degrees(),
        _ => *course.value(),
    };
    Geodesic.destination(origin, course as f64, dist.to_si() as f64)
}

/// Interpolates an arc around the `center` from `start` to `end`.
///
/// The returned points exclude `start` but include `end`. The radius is taken
/// from the distance between the center and the `start`.
pub fn arc(
    center: Point<f64>,
    start: Point<f64>,
    end: Point<f64>,
    clockwise: bool,
) -> Vec<Point<f64>> {
    let radius = dist(center, start);
    let start_bearing = bearing(center, start);
    let end_bearing = bearing(center, end);

    let sweep = arc_sweep(start_bearing, end_bearing, clockwise);
    let sweep_rad = sweep.to_si();
    let num_points = ((sweep_rad.abs() / std::f32::consts::FRAC_PI_2)
        * ARC_POINTS_PER_QUADRANT as f32)
        .ceil() as usize;
    let num_points = num_points.max(2);

    let start_rad = start_bearing.to_si();

    let mut points: Vec<Point<f64>> = (1..num_points)
        .map(|i| {
            let fraction = i as f32 / num_points as f32;
            destination(center, Angle::rad(start_rad + sweep_rad * fraction), radius)
        })
        .collect();

    // the arc ends exactly at the fix even if it's off the radius
    points.push(end);
    points
}

/// Length of an arc with the `radius` from `start` to `end` bearing.
pub fn arc_length(radius: Length, start: Angle, end: Angle, clockwise: bool) -> Length {
    radius * arc_sweep(start, end, clockwise).to_si().abs()
}

/// Calculates the angular sweep for an arc.
///
/// Returns the signed sweep angle from `start` to `end`, going in the
/// specified direction (clockwise = positive).
pub fn arc_sweep(start: Angle, end: Angle, clockwise: bool) -> Angle {
    let mut diff = end.value() - start.value();

    if clockwise {
        if diff <= 0.0 {
            diff += 360.0;
        }
    } else if diff >= 0.0 {
        diff -= 360.0;
    }

    Angle::rad(diff.to_radians())
}

/// Searches along the `course` from `origin` for the first point at which
/// `f` changes its sign and returns the distance to that point.
///
/// The function `f` should be continuous around its root. Sign changes at
/// discontinuities are rejected by checking that `|f|` is below the
/// `tolerance` at the found point. The search ends after `max` distance.
pub fn search_along<F>(
    origin: Point<f64>,
    course: Angle,
    max: Length,
    tolerance: f64,
    f: F,
) -> Option<Length>
where
    F: Fn(Point<f64>) -> f64,
{
    let eval = |nm: f32| f(destination(origin, course, Length::nm(nm)));
    let max_nm = max.to_nm();

    let mut lower = 0.0_f32;
    let mut f_lower = eval(lower);

    if f_lower.abs() <= tolerance / 10.0 {
        return Some(Length::nm(0.0));
    }

    while lower < max_nm {
        let upper = (lower + SEARCH_STEP_NM).min(max_nm);
        let f_upper = eval(upper);

        if f_lower.signum() != f_upper.signum() {
            // bisect the bracket down to a few meters
            let (mut a, mut b, mut f_a) = (lower, upper, f_lower);
            for _ in 0..24 {
                let mid = (a + b) / 2.0;
                let f_mid = eval(mid);
                if f_mid.signum() == f_a.signum() {
                    a = mid;
                    f_a = f_mid;
                } else {
                    b = mid;
                }
            }

            let root = (a + b) / 2.0;
            if eval(root).abs() <= tolerance {
                return Some(Length::nm(root));
            }
        }

        lower = upper;
        f_lower = f_upper;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord;

    // Deer Park (DPK) and Hampton (HTO) VOR on Long Island
    fn dpk() -> Point<f64> {
        coord!(40.79190, -73.30349)
    }

    fn hto() -> Point<f64> {
        coord!(40.91924, -72.31675)
    }

    #[test]
    fn bearing_and_dist() {
        assert_eq!(bearing(dpk(), hto()).value().round(), 80.0);
        assert!((dist(dpk(), hto()).to_nm() - 45.6).abs() < 0.1);
    }

    #[test]
    fn destination_inverts_bearing_and_dist() {
        let p = destination(dpk(), bearing(dpk(), hto()), dist(dpk(), hto()));
        assert!(dist(p, hto()).to_nm() < 0.01);
    }

    #[test]
    fn arc_sweep_clockwise() {
        let sweep = arc_sweep(Angle::t(350.0), Angle::t(10.0), true);
        assert!((sweep.to_si().to_degrees() - 20.0).abs() < 0.001);

        let sweep = arc_sweep(Angle::t(90.0), Angle::t(0.0), true);
        assert!((sweep.to_si().to_degrees() - 270.0).abs() < 0.001);
    }

    #[test]
    fn arc_sweep_counterclockwise() {
        let sweep = arc_sweep(Angle::t(90.0), Angle::t(0.0), false);
        assert!((sweep.to_si().to_degrees() + 90.0).abs() < 0.001);
    }

    #[test]
    fn arc_stays_on_radius() {
        let start = destination(dpk(), Angle::t(0.0), Length::nm(10.0));
        let end = destination(dpk(), Angle::t(90.0), Length::nm(10.0));
        let points = arc(dpk(), start, end, true);

        assert_eq!(points.last(), Some(&end));
        for p in &points {
            assert!((dist(dpk(), *p).to_nm() - 10.0).abs() < 0.05);
        }
    }

    #[test]
    fn finds_dme_distance_along_course() {
        // fly east from dpk() until 12 NM from dpk()
        let found = search_along(dpk(), Angle::t(90.0), Length::nm(50.0), 0.01, |p| {
            (dist(dpk(), p).to_nm() - 12.0) as f64
        });

        let found = found.expect("should find the DME distance");
        assert!((found.to_nm() - 12.0).abs() < 0.01);
    }

    #[test]
    fn search_gives_up_after_max() {
        let found = search_along(dpk(), Angle::t(90.0), Length::nm(5.0), 0.01, |p| {
            (dist(dpk(), p).to_nm() - 12.0) as f64
        });
        assert!(found.is_none());
    }
}
