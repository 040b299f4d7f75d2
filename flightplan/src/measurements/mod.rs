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

//! Typed physical measurements.
//!
//! A [`Measurement`] is a value together with its unit. All arithmetic is done
//! in SI units and the result is converted back to the unit of the left hand
//! side, so `Length::nm(1.0) + Length::m(1852.0)` is `2 NM`.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod altitude;
mod angle;
pub(crate) mod constants;
mod duration;
mod length;
mod speed;

pub use altitude::{Altitude, AltitudeUnit};
pub use angle::{Angle, AngleUnit};
pub use duration::{Duration, DurationUnit};
pub use length::{Length, LengthUnit};
pub use speed::{Speed, SpeedUnit};

/// The physical quantity a unit measures.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PhysicalQuantity {
    Length,
    Time,
    Velocity,
}

/// A unit of measure with conversion from and to its SI unit.
pub trait UnitOfMeasure<T>: Copy + PartialEq {
    fn quantity() -> PhysicalQuantity;

    /// The SI unit of the quantity.
    fn si() -> Self;

    fn symbol(&self) -> &'static str;

    /// Converts the SI `value` into the unit `to`.
    fn from_si(value: T, to: &Self) -> T;

    /// Converts the `value` given in this unit into SI.
    fn to_si(&self, value: &T) -> T;
}

/// A value with its unit of measure.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurement<T, U> {
    pub(crate) value: T,
    pub(crate) unit: U,
}

impl<U> Measurement<f32, U>
where
    U: UnitOfMeasure<f32>,
{
    /// Creates the measurement from a `value` in SI and converts it to the
    /// `unit`.
    pub fn from_si(value: f32, unit: U) -> Self {
        Self {
            value: U::from_si(value, &unit),
            unit,
        }
    }

    pub fn value(&self) -> &f32 {
        &self.value
    }

    pub fn unit(&self) -> &U {
        &self.unit
    }

    /// Returns the value in SI.
    pub fn to_si(&self) -> f32 {
        self.unit.to_si(&self.value)
    }

    pub fn convert_to(&self, unit: U) -> Self {
        Self::from_si(self.to_si(), unit)
    }

    pub fn abs(&self) -> Self {
        Self {
            value: self.value.abs(),
            unit: self.unit,
        }
    }

    pub fn min(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }

    pub fn max(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }
}

impl<U> PartialEq for Measurement<f32, U>
where
    U: UnitOfMeasure<f32>,
{
    fn eq(&self, other: &Self) -> bool {
        self.to_si() == other.to_si()
    }
}

impl<U> PartialOrd for Measurement<f32, U>
where
    U: UnitOfMeasure<f32>,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.to_si().partial_cmp(&other.to_si())
    }
}

impl<U> Add for Measurement<f32, U>
where
    U: UnitOfMeasure<f32>,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::from_si(self.to_si() + rhs.to_si(), self.unit)
    }
}

impl<U> Sub for Measurement<f32, U>
where
    U: UnitOfMeasure<f32>,
{
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_si(self.to_si() - rhs.to_si(), self.unit)
    }
}

impl<U> Neg for Measurement<f32, U>
where
    U: UnitOfMeasure<f32>,
{
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            value: -self.value,
            unit: self.unit,
        }
    }
}

impl<U> Mul<f32> for Measurement<f32, U>
where
    U: UnitOfMeasure<f32>,
{
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            value: self.value * rhs,
            unit: self.unit,
        }
    }
}

impl<U> Div<f32> for Measurement<f32, U>
where
    U: UnitOfMeasure<f32>,
{
    type Output = Self;

    fn div(self, rhs: f32) -> Self::Output {
        Self {
            value: self.value / rhs,
            unit: self.unit,
        }
    }
}

/// The ratio of two measurements of the same quantity.
impl<U> Div for Measurement<f32, U>
where
    U: UnitOfMeasure<f32>,
{
    type Output = f32;

    fn div(self, rhs: Self) -> Self::Output {
        self.to_si() / rhs.to_si()
    }
}

impl<U> Sum for Measurement<f32, U>
where
    U: UnitOfMeasure<f32>,
{
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::from_si(0.0, U::si()), |acc, m| {
            // keep the unit of the first summand
            if acc.value == 0.0 {
                Self::from_si(acc.to_si() + m.to_si(), m.unit)
            } else {
                acc + m
            }
        })
    }
}

impl<U> fmt::Display for Measurement<f32, U>
where
    U: UnitOfMeasure<f32>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(precision) => write!(
                f,
                "{:.*} {}",
                precision,
                self.value,
                self.unit.symbol()
            ),
            None => write!(f, "{} {}", self.value, self.unit.symbol()),
        }
    }
}

/// Distance travelled with a speed in a given time.
impl Div<Speed> for Length {
    type Output = Duration;

    fn div(self, rhs: Speed) -> Self::Output {
        Duration::s(self.to_si() / rhs.to_si())
    }
}
