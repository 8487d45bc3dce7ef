//! The drawing side of the maze: anything that can place points and join them with lines.
//!
//! A CAD sketch wants one point entity per location so that lines meeting there form a connected
//! wire. Segment endpoints that are mathematically identical compare equal, so a drawing layer can
//! look them up in a `PointInterner` and reuse the existing point instead of making a new one.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::errors::*;
use crate::geometry::{LineSegment, Vector};
use crate::utils::{fnv_hashmap, FnvHashMap};

pub trait Sketch {
    /// Handle to a point entity owned by the sketch.
    type Point: Copy;

    fn create_point(&mut self, at: Vector) -> Self::Point;
    fn create_line(&mut self, start: Self::Point, end: Self::Point);
}

/// Maps each distinct coordinate to the single point handle created for it.
#[derive(Debug, Clone)]
pub struct PointInterner<P> {
    points: FnvHashMap<Vector, P>,
}

impl<P: Copy> PointInterner<P> {
    pub fn new() -> PointInterner<P> {
        PointInterner::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> PointInterner<P> {
        PointInterner { points: fnv_hashmap(capacity) }
    }

    /// The point already created at `at`, or a new one if this coordinate has not been seen.
    pub fn intern<S: Sketch<Point = P>>(&mut self, sketch: &mut S, at: Vector) -> P {
        *self.points.entry(at).or_insert_with(|| sketch.create_point(at))
    }

    pub fn get(&self, at: Vector) -> Option<P> {
        self.points.get(&at).cloned()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl<P: Copy> Default for PointInterner<P> {
    fn default() -> PointInterner<P> {
        PointInterner::new()
    }
}

/// Draw each segment as a line between shared points. Returns the number of distinct points.
pub fn draw_segments<S: Sketch>(sketch: &mut S, segments: &[LineSegment]) -> usize {
    let mut interner = PointInterner::with_capacity(segments.len());
    for segment in segments {
        let start = interner.intern(sketch, segment.start);
        let end = interner.intern(sketch, segment.end);
        sketch.create_line(start, end);
    }
    debug!(lines = segments.len(), points = interner.len(), "drew segments");
    interner.len()
}

/// A sketch that just records what was drawn. Point handles are indices into `points`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireSketch {
    points: Vec<Vector>,
    lines: Vec<(usize, usize)>,
}

impl WireSketch {
    pub fn new() -> WireSketch {
        WireSketch::default()
    }

    pub fn points(&self) -> &[Vector] {
        &self.points
    }

    pub fn lines(&self) -> &[(usize, usize)] {
        &self.lines
    }

    /// How many lines meet at each point.
    pub fn point_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.points.len()];
        for &(a, b) in &self.lines {
            degrees[a] += 1;
            degrees[b] += 1;
        }
        degrees
    }

    /// Write the wire as text. Line 1: `n m` (points, lines). Next n lines: point coordinates.
    /// Next m lines: pairs of 1-based point indices.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{} {}", self.points.len(), self.lines.len())?;
        for point in &self.points {
            writeln!(out, "{}", point)?;
        }
        for &(a, b) in &self.lines {
            writeln!(out, "{} {}", a + 1, b + 1)?;
        }
        Ok(())
    }

    /// `write_to` a new file at `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .chain_err(|| format!("Failed to create wire file {}", path.display()))?;
        let mut out = BufWriter::new(file);
        self.write_to(&mut out)
            .and_then(|_| out.flush().map_err(Error::from))
            .chain_err(|| format!("Failed to write wire file {}", path.display()))
    }
}

impl Sketch for WireSketch {
    type Point = usize;

    fn create_point(&mut self, at: Vector) -> usize {
        self.points.push(at);
        self.points.len() - 1
    }

    fn create_line(&mut self, start: usize, end: usize) {
        self.lines.push((start, end));
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn identical_endpoints_share_a_point() {
        let segments = [LineSegment::from_coords(0.0, 0.0, 1.0, 0.0),
                        LineSegment::from_coords(1.0, 0.0, 1.0, 1.0),
                        LineSegment::from_coords(1.0, 1.0, 0.0, 0.0)];
        let mut sketch = WireSketch::new();
        let points = draw_segments(&mut sketch, &segments);

        assert_eq!(points, 3);
        assert_eq!(sketch.points(),
                   &[Vector::new(0.0, 0.0), Vector::new(1.0, 0.0), Vector::new(1.0, 1.0)]);
        assert_eq!(sketch.lines(), &[(0, 1), (1, 2), (2, 0)]);
        assert_eq!(sketch.point_degrees(), vec![2, 2, 2]);
    }

    #[test]
    fn reversed_duplicates_are_two_lines_on_shared_points() {
        let a = LineSegment::from_coords(0.0, 0.0, 2.0, 0.0);
        let mut sketch = WireSketch::new();
        draw_segments(&mut sketch, &[a, a.reversed()]);
        assert_eq!(sketch.points().len(), 2);
        assert_eq!(sketch.lines(), &[(0, 1), (1, 0)]);
    }

    #[test]
    fn interner_reuses_handles() {
        let mut sketch = WireSketch::new();
        let mut interner = PointInterner::new();
        let p = interner.intern(&mut sketch, Vector::new(3.0, 4.0));
        let q = interner.intern(&mut sketch, Vector::new(3.0, 4.0));
        let r = interner.intern(&mut sketch, Vector::new(-0.0, 4.0));
        let s = interner.intern(&mut sketch, Vector::new(0.0, 4.0));
        assert_eq!(p, q);
        assert_eq!(r, s);
        assert_ne!(p, r);
        assert_eq!(interner.len(), 2);
        assert_eq!(interner.get(Vector::new(3.0, 4.0)), Some(p));
        assert_eq!(interner.get(Vector::new(9.0, 9.0)), None);
        assert_eq!(sketch.points().len(), 2);
    }

    #[test]
    fn writes_wire_text() {
        let mut sketch = WireSketch::new();
        draw_segments(&mut sketch, &[LineSegment::from_coords(0.0, 0.0, 1.5, 0.0)]);
        let mut out = Vec::new();
        sketch.write_to(&mut out).expect("write failed");
        assert_eq!(String::from_utf8(out).unwrap(), "2 1\n0 0\n1.5 0\n1 2\n");
    }

    #[test]
    fn saves_wire_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("maze.wire");
        let mut sketch = WireSketch::new();
        draw_segments(&mut sketch, &[LineSegment::from_coords(0.0, 0.0, 0.0, 2.0)]);
        sketch.save(&path).expect("save failed");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2 1\n0 0\n0 2\n1 2\n");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn buffered_write_failures_are_reported() {
        // Small writes sit in the buffer, so only the flush can hit the full device.
        let mut sketch = WireSketch::new();
        draw_segments(&mut sketch, &[LineSegment::from_coords(0.0, 0.0, 1.0, 0.0)]);
        assert!(sketch.save("/dev/full").is_err());
    }
}
