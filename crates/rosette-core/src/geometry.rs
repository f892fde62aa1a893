//! Wedge layout for a ring of menu segments.
//!
//! All coordinates are percentages of the popup's bounding box, so `(50, 50)` is
//! the popup center and a distance of `50` touches its edge. Angles are degrees
//! with 0° on the +x axis and 90° on +y, which reads clockwise on screen.

use std::f64::consts::PI;

/// Item 0 starts at the top of the ring.
pub const START_ANGLE: f64 = -90.0;
/// Angular sampling step for the curved wedge edges.
pub const ARC_STEP: f64 = 0.5;
pub const OUTER_DISTANCE: f64 = 49.5; // just inside the popup edge
pub const INNER_DISTANCE: f64 = 26.0; // hole for the center control
pub const LABEL_DISTANCE: f64 = 39.0;
pub const INDICATOR_DISTANCE: f64 = 47.5;
pub const CENTER_DISTANCE: f64 = 24.0;
pub const EDGE_DISTANCE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Angular slice `[start, end)` of one wedge, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WedgeSpan {
    pub start: f64,
    pub end: f64,
}

impl WedgeSpan {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn mid(&self) -> f64 {
        self.start + self.width() / 2.0
    }
}

pub fn slice_width(count: usize) -> Option<f64> {
    (count > 0).then(|| 360.0 / count as f64)
}

pub fn wedge_span(index: usize, count: usize) -> Option<WedgeSpan> {
    let width = slice_width(count)?;
    (index < count).then(|| WedgeSpan {
        start: index as f64 * width + START_ANGLE,
        end: (index + 1) as f64 * width + START_ANGLE,
    })
}

pub fn wedge_spans(count: usize) -> Vec<WedgeSpan> {
    (0..count).filter_map(|i| wedge_span(i, count)).collect()
}

pub fn point_on_circle(angle: f64, distance: f64) -> Point {
    let rad = angle * PI / 180.0;
    Point::new(50.0 + distance * rad.cos(), 50.0 + distance * rad.sin())
}

/// Closed outline of an annular wedge: the outer arc from start to end, then the
/// inner arc from end back to start. Each arc is sampled every [`ARC_STEP`]
/// degrees and finished with its exact end angle.
pub fn wedge_outline(span: WedgeSpan, inner: f64, outer: f64) -> Vec<Point> {
    let steps = (span.width() / ARC_STEP).floor().max(0.0) as usize;
    let mut points = Vec::with_capacity(2 * steps + 4);

    points.extend((0..=steps).map(|k| point_on_circle(span.start + k as f64 * ARC_STEP, outer)));
    points.push(point_on_circle(span.end, outer));

    points.extend((0..=steps).map(|k| point_on_circle(span.end - k as f64 * ARC_STEP, inner)));
    points.push(point_on_circle(span.start, inner));

    points
}

#[derive(Debug, Clone, PartialEq)]
pub struct WedgeLayout {
    pub span: WedgeSpan,
    pub outline: Vec<Point>,
    pub label: Point,
    pub indicator: Point,
}

impl WedgeLayout {
    pub fn new(span: WedgeSpan) -> Self {
        Self {
            span,
            outline: wedge_outline(span, INNER_DISTANCE, OUTER_DISTANCE),
            label: point_on_circle(span.mid(), LABEL_DISTANCE),
            indicator: point_on_circle(span.mid(), INDICATOR_DISTANCE),
        }
    }
}

pub fn layout_ring(count: usize) -> Vec<WedgeLayout> {
    wedge_spans(count).into_iter().map(WedgeLayout::new).collect()
}

/// Which part of the popup a point (in percent space) falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Center,
    Wedge(usize),
    /// Inside the popup circle but on neither a wedge nor the center control.
    Shell,
    Outside,
}

pub fn classify(point: Point, count: usize) -> Zone {
    let center = Point::new(50.0, 50.0);
    let distance = point.distance_to(center);

    if distance <= CENTER_DISTANCE {
        return Zone::Center;
    }

    if (INNER_DISTANCE..=OUTER_DISTANCE).contains(&distance)
        && let Some(width) = slice_width(count)
    {
        let angle = (point.y - center.y).atan2(point.x - center.x) * 180.0 / PI;
        let offset = (angle - START_ANGLE).rem_euclid(360.0);
        let index = ((offset / width).floor() as usize).min(count - 1);
        return Zone::Wedge(index);
    }

    if distance <= EDGE_DISTANCE {
        Zone::Shell
    } else {
        Zone::Outside
    }
}

/// Maps between viewport pixels and the popup's percentage box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PopupFrame {
    /// Top-left corner in viewport pixels.
    pub origin: Point,
    pub radius: f64,
}

impl PopupFrame {
    pub fn centered_at(center: Point, radius: f64) -> Self {
        Self {
            origin: Point::new(center.x - radius, center.y - radius),
            radius,
        }
    }

    pub fn size(&self) -> f64 {
        self.radius * 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.origin.x + self.radius, self.origin.y + self.radius)
    }

    pub fn to_percent(&self, px: Point) -> Point {
        let size = self.size();
        if size <= 0.0 {
            return Point::new(f64::INFINITY, f64::INFINITY);
        }
        Point::new(
            (px.x - self.origin.x) / size * 100.0,
            (px.y - self.origin.y) / size * 100.0,
        )
    }

    pub fn to_px(&self, pct: Point) -> Point {
        let size = self.size();
        Point::new(
            self.origin.x + pct.x / 100.0 * size,
            self.origin.y + pct.y / 100.0 * size,
        )
    }
}
