// Copyright 2021 Team Special Weekend
// Copyright 2021 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::{Deserialize, Serialize};
use std::ops;

/// A lattice point. Every placed or candidate figure vertex lives here.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(from = "(i64, i64)", into = "(i64, i64)")]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn cross(a: Point, b: Point) -> i64 {
        a.x * b.y - a.y * b.x
    }

    pub fn dot(a: Point, b: Point) -> i64 {
        a.x * b.x + a.y * b.y
    }

    pub fn norm_sqr(&self) -> i64 {
        self.x * self.x + self.y * self.y
    }

    pub fn to_f64(self) -> PointF {
        PointF::new(self.x as f64, self.y as f64)
    }
}

pub fn squared_distance(p1: &Point, p2: &Point) -> i64 {
    (*p1 - *p2).norm_sqr()
}

impl From<(i64, i64)> for Point {
    fn from(t: (i64, i64)) -> Point {
        Point { x: t.0, y: t.1 }
    }
}

impl From<Point> for (i64, i64) {
    fn from(t: Point) -> (i64, i64) {
        (t.x, t.y)
    }
}

impl ops::Add<Point> for Point {
    type Output = Point;
    fn add(self, other: Point) -> Self::Output {
        Self::Output::new(self.x + other.x, self.y + other.y)
    }
}

impl ops::AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl ops::Sub<Point> for Point {
    type Output = Point;
    fn sub(self, other: Point) -> Self::Output {
        Self::Output::new(self.x - other.x, self.y - other.y)
    }
}

impl ops::SubAssign for Point {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl ops::Mul<i64> for Point {
    type Output = Point;
    fn mul(self, rhs: i64) -> Self::Output {
        Self::Output::new(self.x * rhs, self.y * rhs)
    }
}

impl ops::Neg for Point {
    type Output = Point;

    fn neg(self) -> Self::Output {
        Point::new(-self.x, -self.y)
    }
}

/// Non-lattice point, used for samples interpolated along a segment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn cross(a: PointF, b: PointF) -> f64 {
        a.x * b.y - a.y * b.x
    }

    pub fn dot(a: PointF, b: PointF) -> f64 {
        a.x * b.x + a.y * b.y
    }

    pub fn norm_sqr(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }
}

impl ops::Sub<PointF> for PointF {
    type Output = PointF;
    fn sub(self, other: PointF) -> Self::Output {
        Self::Output::new(self.x - other.x, self.y - other.y)
    }
}

impl ops::Add<PointF> for PointF {
    type Output = PointF;
    fn add(self, other: PointF) -> Self::Output {
        Self::Output::new(self.x + other.x, self.y + other.y)
    }
}

impl ops::Mul<f64> for PointF {
    type Output = PointF;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::Output::new(self.x * rhs, self.y * rhs)
    }
}

/// Point on segment `a`-`b`, `fraction` of the way from `a`.
pub fn point_average(a: &Point, b: &Point, fraction: f64) -> PointF {
    PointF::new(
        (1.0 - fraction) * a.x as f64 + fraction * b.x as f64,
        (1.0 - fraction) * a.y as f64 + fraction * b.y as f64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_distance_is_symmetric() {
        let a = Point::new(1, 2);
        let b = Point::new(4, 6);
        assert_eq!(squared_distance(&a, &b), 25);
        assert_eq!(squared_distance(&b, &a), 25);
        assert_eq!(squared_distance(&a, &a), 0);
    }

    #[test]
    fn point_average_interpolates() {
        let a = Point::new(0, 0);
        let b = Point::new(10, -4);
        assert_eq!(point_average(&a, &b, 0.0), PointF::new(0.0, 0.0));
        assert_eq!(point_average(&a, &b, 1.0), PointF::new(10.0, -4.0));
        assert_eq!(point_average(&a, &b, 0.5), PointF::new(5.0, -2.0));
    }

    #[test]
    fn serializes_as_pair() {
        let p: Point = serde_json::from_str("[3, -7]").unwrap();
        assert_eq!(p, Point::new(3, -7));
        assert_eq!(serde_json::to_string(&p).unwrap(), "[3,-7]");
    }
}
