//! Glyph outlines in TrueType form.
//!
//! An [`Outline`] is a list of closed contours made of on-curve and off-curve points.
//! Two consecutive on-curve points form a line, an off-curve point between two on-curve points is the control point of a quadratic Bézier curve.
//! Between two consecutive off-curve points an on-curve point is implied at their midpoint.
//!
//! Outlines are produced by a [`ContourBuilder`], which accepts the usual path commands and approximates cubic curves by quadratic curves.

/// A point of a contour in font units.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Point {
    /// The horizontal coordinate.
    pub x: f64,
    /// The vertical coordinate; the y-axis points up.
    pub y: f64,
    /// Whether the point lies on the curve.
    pub on_curve: bool,
}

impl Point {
    /// Creates an on-curve point.
    pub fn on(x: f64, y: f64) -> Self {
        Point {
            x,
            y,
            on_curve: true,
        }
    }

    /// Creates an off-curve point.
    pub fn off(x: f64, y: f64) -> Self {
        Point {
            x,
            y,
            on_curve: false,
        }
    }

    fn same_position(&self, other: &Point) -> bool {
        self.x == other.x && self.y == other.y
    }

    fn midpoint(&self, other: &Point) -> Point {
        Point::on((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// A closed sequence of points.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Contour {
    /// The points; the last point connects back to the first one.
    pub points: Vec<Point>,
}

/// The vector shape of a glyph.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Outline {
    /// The contours of the outline.
    pub contours: Vec<Contour>,
}

/// The minimal rectangle enclosing an outline.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct BoundingBox {
    /// The left edge.
    pub x_min: f64,
    /// The bottom edge.
    pub y_min: f64,
    /// The right edge.
    pub x_max: f64,
    /// The top edge.
    pub y_max: f64,
}

impl BoundingBox {
    fn around(point: (f64, f64)) -> Self {
        BoundingBox {
            x_min: point.0,
            y_min: point.1,
            x_max: point.0,
            y_max: point.1,
        }
    }

    fn include(&mut self, point: (f64, f64)) {
        self.x_min = self.x_min.min(point.0);
        self.y_min = self.y_min.min(point.1);
        self.x_max = self.x_max.max(point.0);
        self.y_max = self.y_max.max(point.1);
    }

    /// Returns the smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

impl Outline {
    /// Creates an outline without contours.
    pub fn new() -> Self {
        Outline::default()
    }

    /// The rectangle drawn for characters whose icon could not be imported.
    pub fn placeholder() -> Self {
        Outline {
            contours: vec![Contour {
                points: vec![
                    Point::on(100.0, 100.0),
                    Point::on(100.0, 500.0),
                    Point::on(500.0, 500.0),
                    Point::on(500.0, 100.0),
                ],
            }],
        }
    }

    /// Whether the outline has no points.
    pub fn is_empty(&self) -> bool {
        self.contours.iter().all(|x| x.points.is_empty())
    }

    /// The total number of points over all contours.
    pub fn point_count(&self) -> usize {
        self.contours.iter().map(|x| x.points.len()).sum()
    }

    /// Returns the exact bounding box of the drawn curve, or `None` for an empty outline.
    ///
    /// Unlike [`Outline::control_bounds`], off-curve points only contribute through the extrema of their curves.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut bbox: Option<BoundingBox> = None;
        let mut include = |point: (f64, f64)| match bbox.as_mut() {
            Some(bbox) => bbox.include(point),
            None => bbox = Some(BoundingBox::around(point)),
        };

        for contour in &self.contours {
            for segment in contour.segments() {
                match segment {
                    Segment::Line(start, end) => {
                        include((start.x, start.y));
                        include((end.x, end.y));
                    }
                    Segment::Quad(start, control, end) => {
                        include((start.x, start.y));
                        include((end.x, end.y));
                        for t in quad_extrema(&start, &control, &end) {
                            include(quad_at(&start, &control, &end, t));
                        }
                    }
                }
            }
        }

        bbox
    }

    /// Returns the bounding box of all points, off-curve points included.
    ///
    /// This is the box stored in the `glyf` table.
    pub fn control_bounds(&self) -> Option<BoundingBox> {
        self.contours
            .iter()
            .flat_map(|x| x.points.iter())
            .fold(None, |bbox: Option<BoundingBox>, point| {
                let mut bbox = bbox.unwrap_or_else(|| BoundingBox::around((point.x, point.y)));
                bbox.include((point.x, point.y));
                Some(bbox)
            })
    }

    /// Removes redundant points.
    ///
    /// Points that coincide with their predecessor are removed, as are points lying within `tolerance` of the straight line between their on-curve neighbours.
    /// Contours that no longer enclose an area are dropped.
    pub fn simplify(&mut self, tolerance: f64) {
        for contour in &mut self.contours {
            remove_duplicates(&mut contour.points);
            remove_collinear(&mut contour.points, tolerance);
        }

        self.contours.retain(|x| x.points.len() >= 3);
    }

    /// Orients the contours so that the nonzero fill of TrueType paints what the even-odd rule paints.
    ///
    /// A contour nested inside an even number of other contours winds clockwise, one nested inside an odd number winds counter-clockwise.
    pub fn orient_even_odd(&mut self) {
        let depths: Vec<usize> = self
            .contours
            .iter()
            .enumerate()
            .map(|(index, contour)| {
                let Some(sample) = contour.points.first() else {
                    return 0;
                };
                self.contours
                    .iter()
                    .enumerate()
                    .filter(|&(other, x)| other != index && x.contains(sample.x, sample.y))
                    .count()
            })
            .collect();

        for (contour, depth) in self.contours.iter_mut().zip(depths) {
            let clockwise = contour.signed_area() < 0.0;
            if clockwise != (depth % 2 == 0) {
                contour.reverse();
            }
        }
    }

    /// Rounds all coordinates to whole font units.
    ///
    /// Points that collapse onto their predecessor are removed.
    pub fn round(&mut self) {
        for contour in &mut self.contours {
            for point in &mut contour.points {
                point.x = point.x.round();
                point.y = point.y.round();
            }
            remove_duplicates(&mut contour.points);
        }

        self.contours.retain(|x| x.points.len() >= 3);
    }
}

/// A drawn piece of a contour.
#[derive(Debug, PartialEq, Clone, Copy)]
enum Segment {
    Line(Point, Point),
    Quad(Point, Point, Point),
}

impl Contour {
    /// Returns the signed area of the polygon through all points.
    ///
    /// The area is positive for counter-clockwise contours in the y-up font space.
    pub fn signed_area(&self) -> f64 {
        let len = self.points.len();
        let twice: f64 = (0..len)
            .map(|i| {
                let (a, b) = (self.points[i], self.points[(i + 1) % len]);
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice / 2.0
    }

    /// Whether a point lies inside the polygon through all points, by ray casting.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let len = self.points.len();
        let mut inside = false;
        for i in 0..len {
            let (a, b) = (self.points[i], self.points[(i + len - 1) % len]);
            if (a.y > y) != (b.y > y) && x < (b.x - a.x) * (y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
        }
        inside
    }

    /// Reverses the direction of the contour.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Returns the lines and curves of the contour, resolving implied on-curve points.
    fn segments(&self) -> Vec<Segment> {
        let points = &self.points;
        if points.is_empty() {
            return Vec::new();
        }

        // rotate so that iteration starts at an on-curve point, implying one if there is none
        let (start, rotated): (Point, Vec<Point>) =
            match points.iter().position(|x| x.on_curve) {
                Some(index) => {
                    let mut rotated = points[index..].to_vec();
                    rotated.extend_from_slice(&points[..index]);
                    (rotated[0], rotated[1..].to_vec())
                }
                None => {
                    let implied = points[points.len() - 1].midpoint(&points[0]);
                    (implied, points.clone())
                }
            };

        let mut segments = Vec::new();
        let mut current = start;
        let mut control: Option<Point> = None;

        for point in rotated.into_iter().chain(std::iter::once(start)) {
            match (control, point.on_curve) {
                (None, true) => {
                    segments.push(Segment::Line(current, point));
                    current = point;
                }
                (None, false) => control = Some(point),
                (Some(c), true) => {
                    segments.push(Segment::Quad(current, c, point));
                    current = point;
                    control = None;
                }
                (Some(c), false) => {
                    let implied = c.midpoint(&point);
                    segments.push(Segment::Quad(current, c, implied));
                    current = implied;
                    control = Some(point);
                }
            }
        }

        segments
    }
}

/// Returns the parameters in `(0, 1)` at which a quadratic curve has a horizontal or vertical tangent.
fn quad_extrema(start: &Point, control: &Point, end: &Point) -> Vec<f64> {
    let mut extrema = Vec::new();
    for (p0, p1, p2) in [
        (start.x, control.x, end.x),
        (start.y, control.y, end.y),
    ] {
        let denominator = p0 - 2.0 * p1 + p2;
        if denominator != 0.0 {
            let t = (p0 - p1) / denominator;
            if t > 0.0 && t < 1.0 {
                extrema.push(t);
            }
        }
    }
    extrema
}

fn quad_at(start: &Point, control: &Point, end: &Point, t: f64) -> (f64, f64) {
    let mt = 1.0 - t;
    (
        mt * mt * start.x + 2.0 * mt * t * control.x + t * t * end.x,
        mt * mt * start.y + 2.0 * mt * t * control.y + t * t * end.y,
    )
}

fn remove_duplicates(points: &mut Vec<Point>) {
    let mut index = 0;
    while points.len() > 1 && index < points.len() {
        let next = (index + 1) % points.len();
        let (a, b) = (points[index], points[next]);

        if a.same_position(&b) {
            match (a.on_curve, b.on_curve) {
                (true, _) => {
                    points.remove(next);
                    continue;
                }
                (false, true) => {
                    points.remove(index);
                    continue;
                }
                // two coinciding control points still shape the curve
                (false, false) => {}
            }
        }

        index += 1;
    }
}

fn remove_collinear(points: &mut Vec<Point>, tolerance: f64) {
    let mut changed = true;
    while changed && points.len() > 3 {
        changed = false;
        let len = points.len();

        for index in 0..len {
            let prev = points[(index + len - 1) % len];
            let current = points[index];
            let next = points[(index + 1) % len];

            if prev.on_curve && next.on_curve && lies_on_line(&prev, &current, &next, tolerance) {
                points.remove(index);
                changed = true;
                break;
            }
        }
    }
}

/// Whether `point` lies within `tolerance` of the line segment from `start` to `end`.
fn lies_on_line(start: &Point, point: &Point, end: &Point, tolerance: f64) -> bool {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_squared = dx * dx + dy * dy;
    if length_squared == 0.0 {
        return false;
    }

    let t = ((point.x - start.x) * dx + (point.y - start.y) * dy) / length_squared;
    if !(0.0..=1.0).contains(&t) {
        return false;
    }

    let distance = ((point.x - start.x) * dy - (point.y - start.y) * dx).abs() / length_squared.sqrt();
    distance <= tolerance
}

/// Collects path commands into an [`Outline`].
///
/// Every contour is closed implicitly; `close` only ends the current contour.
///
/// # Example
///
/// ```
/// # use iconforge::outline::ContourBuilder;
/// let mut builder = ContourBuilder::new(1.0);
/// builder.move_to(0.0, 0.0);
/// builder.line_to(0.0, 100.0);
/// builder.cubic_to(50.0, 150.0, 150.0, 150.0, 200.0, 100.0);
/// builder.line_to(200.0, 0.0);
/// builder.close();
/// let outline = builder.finish();
/// assert_eq!(outline.contours.len(), 1);
/// ```
#[derive(Debug)]
pub struct ContourBuilder {
    tolerance: f64,
    contours: Vec<Contour>,
    current: Vec<Point>,
    last: (f64, f64),
}

impl ContourBuilder {
    /// Creates a builder approximating cubic curves within `tolerance` font units.
    pub fn new(tolerance: f64) -> Self {
        ContourBuilder {
            tolerance: tolerance.max(f64::EPSILON),
            contours: Vec::new(),
            current: Vec::new(),
            last: (0.0, 0.0),
        }
    }

    /// Starts a new contour at the given point.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.close();
        self.current.push(Point::on(x, y));
        self.last = (x, y);
    }

    /// Draws a line to the given point.
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.ensure_started();
        self.current.push(Point::on(x, y));
        self.last = (x, y);
    }

    /// Draws a quadratic curve.
    pub fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.ensure_started();
        self.current.push(Point::off(x1, y1));
        self.current.push(Point::on(x, y));
        self.last = (x, y);
    }

    /// Draws a cubic curve, approximated by one or more quadratic curves.
    pub fn cubic_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.ensure_started();
        let cubic = [self.last, (x1, y1), (x2, y2), (x, y)];
        for (control, end) in cubic_to_quads(cubic, self.tolerance) {
            self.current.push(Point::off(control.0, control.1));
            self.current.push(Point::on(end.0, end.1));
        }
        self.last = (x, y);
    }

    /// Ends the current contour.
    pub fn close(&mut self) {
        if !self.current.is_empty() {
            let points = std::mem::take(&mut self.current);
            self.contours.push(Contour { points });
        }
    }

    /// Returns the collected outline.
    pub fn finish(mut self) -> Outline {
        self.close();
        Outline {
            contours: self.contours,
        }
    }

    fn ensure_started(&mut self) {
        if self.current.is_empty() {
            self.current.push(Point::on(self.last.0, self.last.1));
        }
    }
}

/// The largest number of quadratic curves a single cubic curve is split into.
const MAX_QUADS_PER_CUBIC: usize = 16;

/// Approximates a cubic curve by quadratic curves, returning `(control, end)` pairs.
///
/// The cubic is split into `n` equal parameter ranges; the error of a single-quadratic approximation shrinks with the cube of `n`.
fn cubic_to_quads(cubic: [(f64, f64); 4], tolerance: f64) -> Vec<((f64, f64), (f64, f64))> {
    let [p0, p1, p2, p3] = cubic;
    let ex = p3.0 - 3.0 * p2.0 + 3.0 * p1.0 - p0.0;
    let ey = p3.1 - 3.0 * p2.1 + 3.0 * p1.1 - p0.1;
    let error = 3f64.sqrt() / 36.0 * (ex * ex + ey * ey).sqrt();
    let n = ((error / tolerance).cbrt().ceil() as usize).clamp(1, MAX_QUADS_PER_CUBIC);

    let at = |t: f64| {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        (
            a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
            a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
        )
    };
    let derivative = |t: f64| {
        let mt = 1.0 - t;
        (
            3.0 * (mt * mt * (p1.0 - p0.0) + 2.0 * mt * t * (p2.0 - p1.0) + t * t * (p3.0 - p2.0)),
            3.0 * (mt * mt * (p1.1 - p0.1) + 2.0 * mt * t * (p2.1 - p1.1) + t * t * (p3.1 - p2.1)),
        )
    };

    (0..n)
        .map(|i| {
            let t0 = i as f64 / n as f64;
            let t1 = (i + 1) as f64 / n as f64;
            let h = (t1 - t0) / 3.0;
            let q0 = at(t0);
            let q3 = if i + 1 == n { p3 } else { at(t1) };
            let d0 = derivative(t0);
            let d1 = derivative(t1);
            let q1 = (q0.0 + h * d0.0, q0.1 + h * d0.1);
            let q2 = (q3.0 - h * d1.0, q3.1 - h * d1.1);
            let control = (
                (3.0 * (q1.0 + q2.0) - q0.0 - q3.0) / 4.0,
                (3.0 * (q1.1 + q2.1) - q0.1 - q3.1) / 4.0,
            );
            (control, q3)
        })
        .collect()
}
