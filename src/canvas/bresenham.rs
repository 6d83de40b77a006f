//! Integer line stepping
//!
//! Octant-aware midpoint stepping with a single accumulator. The accumulator
//! starts at `longest / 2`, gains `shortest` each step, and a diagonal step is
//! taken whenever it reaches `longest`; otherwise the walk moves along the
//! dominant axis only. Both endpoints are emitted.

/// Integer lattice point
pub type Point = (i32, i32);

/// Line segment between two lattice points, inclusive
///
/// The segment itself holds no iteration state; each call to [`iter`]
/// starts a fresh walk from `start`.
///
/// [`iter`]: BresenhamLine::iter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BresenhamLine {
    pub start: Point,
    pub end: Point,
}

impl BresenhamLine {
    #[inline]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Number of points the walk emits: `max(|dx|, |dy|) + 1`
    pub fn len(&self) -> usize {
        let dx = (i64::from(self.end.0) - i64::from(self.start.0)).unsigned_abs();
        let dy = (i64::from(self.end.1) - i64::from(self.start.1)).unsigned_abs();
        (dx.max(dy) + 1) as usize
    }

    /// A segment always covers at least its start point
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> BresenhamIter {
        BresenhamIter::new(self.start, self.end)
    }

    /// Walk only the steps whose dominant-axis coordinate lies in
    /// `0..width` (or `0..height` for steep lines)
    ///
    /// The points are exactly those of [`iter`] in that range; the steps
    /// before it are skipped in constant time. The minor axis is not
    /// clipped, so callers still cull each point against the other bound.
    ///
    /// [`iter`]: BresenhamLine::iter
    pub fn clipped(&self, width: u32, height: u32) -> BresenhamIter {
        let mut iter = self.iter();
        iter.clip_major(width, height);
        iter
    }
}

impl IntoIterator for BresenhamLine {
    type Item = Point;
    type IntoIter = BresenhamIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &BresenhamLine {
    type Item = Point;
    type IntoIter = BresenhamIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Walk state for one pass over a [`BresenhamLine`]
///
/// Deltas and counters are widened past `i32` so endpoints anywhere in the
/// `i32` plane walk without overflow. Emitted points always lie between the
/// endpoints and therefore fit back into `i32`.
#[derive(Debug, Clone)]
pub struct BresenhamIter {
    x: i64,
    y: i64,
    /// Diagonal step
    dx1: i64,
    dy1: i64,
    /// Straight step along the dominant axis
    dx2: i64,
    dy2: i64,
    longest: u64,
    shortest: u64,
    numerator: u64,
    remaining: u64,
}

impl BresenhamIter {
    fn new(start: Point, end: Point) -> Self {
        let w = i64::from(end.0) - i64::from(start.0);
        let h = i64::from(end.1) - i64::from(start.1);

        let dx1 = w.signum();
        let dy1 = h.signum();
        let mut dx2 = w.signum();
        let mut dy2 = 0;

        let mut longest = w.unsigned_abs();
        let mut shortest = h.unsigned_abs();

        if shortest >= longest {
            std::mem::swap(&mut longest, &mut shortest);
            dy2 = h.signum();
            dx2 = 0;
        }

        Self {
            x: i64::from(start.0),
            y: i64::from(start.1),
            dx1,
            dy1,
            dx2,
            dy2,
            longest,
            shortest,
            numerator: longest / 2,
            remaining: longest + 1,
        }
    }

    /// Advance `steps` points without emitting them; `steps < remaining`
    ///
    /// Each step adds `shortest` to the accumulator and takes a diagonal
    /// step per wrap past `longest`, so `steps` of them collapse into one
    /// division.
    fn skip_steps(&mut self, steps: u64) {
        if steps == 0 || self.longest == 0 {
            return;
        }
        let total = u128::from(self.numerator) + u128::from(steps) * u128::from(self.shortest);
        let longest = u128::from(self.longest);
        let diagonal = (total / longest) as i64;
        let straight = steps as i64 - diagonal;

        self.numerator = (total % longest) as u64;
        self.x += self.dx1 * diagonal + self.dx2 * straight;
        self.y += self.dy1 * diagonal + self.dy2 * straight;
        self.remaining -= steps;
    }

    fn clip_major(&mut self, width: u32, height: u32) {
        if self.longest == 0 {
            return;
        }
        let (pos, dir, extent) = if self.dx2 != 0 {
            (self.x, self.dx2, i64::from(width))
        } else {
            (self.y, self.dy2, i64::from(height))
        };

        // The dominant coordinate moves by exactly `dir` on every step
        let (first, last) = if dir > 0 {
            (-pos, extent - 1 - pos)
        } else {
            (pos - (extent - 1), pos)
        };
        let first = first.max(0);
        let last = last.min(self.longest as i64);
        if first > last {
            self.remaining = 0;
            return;
        }

        self.skip_steps(first as u64);
        self.remaining = (last - first + 1) as u64;
    }
}

impl Iterator for BresenhamIter {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let point = (self.x as i32, self.y as i32);
        if self.remaining == 0 {
            // End point reached; do not step past it
            return Some(point);
        }

        self.numerator += self.shortest;
        if self.numerator >= self.longest {
            self.numerator -= self.longest;
            self.x += self.dx1;
            self.y += self.dy1;
        } else {
            self.x += self.dx2;
            self.y += self.dy2;
        }

        Some(point)
    }

    fn nth(&mut self, n: usize) -> Option<Point> {
        let n = n as u64;
        if n >= self.remaining {
            self.remaining = 0;
            return None;
        }
        self.skip_steps(n);
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BresenhamIter {}

impl std::iter::FusedIterator for BresenhamIter {}
