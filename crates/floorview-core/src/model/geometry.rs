// ── Plane geometry for regions ──
//
// Only what hit-testing and outline drawing need. Coordinates are in the
// diagram's user space (y grows downward, as in SVG).

use serde::Serialize;

/// Segments used to approximate circles and ellipses as outlines.
const CURVE_SEGMENTS: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Translate into a frame whose origin is `origin`.
    pub fn relative_to(self, origin: Point) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width,
            max_y: y + height,
        }
    }

    /// Bounding box of a point set; `None` when empty.
    pub fn of_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in &points[1..] {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Geometry of a region, as far as it could be extracted from its element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Shape {
    /// Closed outline (`polygon`, `rect`).
    Polygon(Vec<Point>),
    /// Open outline (`polyline`); hit-tested as if closed, like SVG fill.
    Polyline(Vec<Point>),
    Ellipse { center: Point, rx: f64, ry: f64 },
    /// Element kinds whose geometry is not interpreted (e.g. `path`).
    Opaque,
}

impl Shape {
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Self::Polygon(points) | Self::Polyline(points) => Bounds::of_points(points),
            Self::Ellipse { center, rx, ry } => Some(Bounds {
                min_x: center.x - rx,
                min_y: center.y - ry,
                max_x: center.x + rx,
                max_y: center.y + ry,
            }),
            Self::Opaque => None,
        }
    }

    /// Fill-area hit test (even-odd rule for outlines).
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Self::Polygon(points) | Self::Polyline(points) => polygon_contains(points, p),
            Self::Ellipse { center, rx, ry } => {
                if *rx <= 0.0 || *ry <= 0.0 {
                    return false;
                }
                let dx = (p.x - center.x) / rx;
                let dy = (p.y - center.y) / ry;
                dx * dx + dy * dy <= 1.0
            }
            Self::Opaque => false,
        }
    }

    /// Closed outline suitable for drawing as line segments.
    pub fn outline(&self) -> Vec<Point> {
        match self {
            Self::Polygon(points) => {
                let mut out = points.clone();
                if let Some(first) = points.first() {
                    out.push(*first);
                }
                out
            }
            Self::Polyline(points) => points.clone(),
            Self::Ellipse { center, rx, ry } => (0..=CURVE_SEGMENTS)
                .map(|i| {
                    let theta = f64::from(i) / f64::from(CURVE_SEGMENTS) * std::f64::consts::TAU;
                    Point::new(center.x + rx * theta.cos(), center.y + ry * theta.sin())
                })
                .collect(),
            Self::Opaque => Vec::new(),
        }
    }

    /// Label anchor: the bounding-box center.
    pub fn label_anchor(&self) -> Option<Point> {
        self.bounds().map(|b| b.center())
    }
}

/// Parse an SVG `points` list (`"x1,y1 x2,y2"` or `"x1 y1 x2 y2"`).
///
/// A trailing odd coordinate is dropped, as SVG renderers do.
pub fn parse_points(raw: &str) -> Vec<Point> {
    let numbers: Vec<f64> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map_while(|s| s.parse::<f64>().ok())
        .collect();
    numbers
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect()
}

/// Parse an SVG length, accepting a trailing `px`.
pub fn parse_length(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
    number.trim().parse().ok().filter(|v: &f64| v.is_finite())
}

fn polygon_contains(points: &[Point], p: Point) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let cross_x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Shape {
        Shape::Polygon(parse_points("0,0 10,0 10,10 0,10"))
    }

    #[test]
    fn parses_comma_and_space_separated_points() {
        assert_eq!(
            parse_points("1,2 3 4,5,6"),
            vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0), Point::new(5.0, 6.0)]
        );
        assert_eq!(parse_points("1,2 3"), vec![Point::new(1.0, 2.0)]);
    }

    #[test]
    fn polygon_hit_test() {
        let shape = square();
        assert!(shape.contains(Point::new(5.0, 5.0)));
        assert!(!shape.contains(Point::new(15.0, 5.0)));
        assert!(!shape.contains(Point::new(-0.1, 5.0)));
    }

    #[test]
    fn ellipse_hit_test() {
        let shape = Shape::Ellipse {
            center: Point::new(0.0, 0.0),
            rx: 4.0,
            ry: 2.0,
        };
        assert!(shape.contains(Point::new(3.9, 0.0)));
        assert!(!shape.contains(Point::new(0.0, 2.5)));
    }

    #[test]
    fn opaque_shapes_never_hit() {
        assert!(!Shape::Opaque.contains(Point::new(0.0, 0.0)));
        assert!(Shape::Opaque.outline().is_empty());
    }

    #[test]
    fn polygon_outline_is_closed() {
        let outline = square().outline();
        assert_eq!(outline.first(), outline.last());
        assert_eq!(outline.len(), 5);
    }

    #[test]
    fn length_accepts_px_suffix() {
        assert_eq!(parse_length("120px"), Some(120.0));
        assert_eq!(parse_length(" 80 "), Some(80.0));
        assert_eq!(parse_length("50%"), None);
    }
}
