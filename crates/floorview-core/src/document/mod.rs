//! SVG diagram document.
//!
//! The document is parsed once into an owned event list and never mutated.
//! Every reconciliation pass reads it and produces a fresh scene; styled
//! output is produced by streaming the same events back out with region
//! attributes taken from that scene (see [`write`]).

mod write;

use std::collections::HashMap;
use std::fmt;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::geometry::{parse_length, parse_points};
use crate::model::{Bounds, Point, Shape, UnitCode};

pub(crate) use write::write_svg;

/// Attribute carrying the join key, unless configured otherwise.
pub const DEFAULT_CODE_ATTRIBUTE: &str = "data-code";

/// Shape elements that become regions when they carry a code attribute.
pub const REGION_ELEMENTS: &[&str] = &["polygon", "polyline", "rect", "path", "circle", "ellipse"];

/// Position of a region in document order. Stable for the document's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RegionId(usize);

impl RegionId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A shape element carrying the code attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: RegionId,
    /// Local element name (`polygon`, `rect`, ...).
    pub element: String,
    /// Raw attribute value, as authored.
    pub raw_code: String,
    /// Parsed join key; `None` when the attribute is malformed.
    pub code: Option<UnitCode>,
    pub shape: Shape,
    /// Index of the element's start event in the document's event list.
    pub(crate) event_index: usize,
}

#[derive(Debug, Clone)]
pub struct DiagramDocument {
    events: Vec<Event<'static>>,
    regions: Vec<Region>,
    /// First region per code, in document order.
    first_by_code: HashMap<UnitCode, RegionId>,
    view_box: Option<Bounds>,
    code_attribute: String,
}

impl DiagramDocument {
    pub fn parse(svg: &str) -> Result<Self, CoreError> {
        Self::parse_with(svg, DEFAULT_CODE_ATTRIBUTE)
    }

    /// Parse with a custom join-key attribute name.
    pub fn parse_with(svg: &str, code_attribute: &str) -> Result<Self, CoreError> {
        let mut reader = Reader::from_str(svg);
        let mut events = Vec::new();
        let mut regions = Vec::new();
        let mut root_box = None;
        let mut seen_root = false;

        loop {
            let position = u64::try_from(reader.buffer_position()).unwrap_or(u64::MAX);
            let event = match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(event) => event,
                Err(e) => {
                    return Err(CoreError::DocumentParse {
                        position,
                        message: e.to_string(),
                    });
                }
            };

            if let Event::Start(element) | Event::Empty(element) = &event {
                let name = local_name(element);
                let attrs = attributes(element, position)?;
                if !seen_root {
                    if name != "svg" {
                        return Err(CoreError::MissingRoot);
                    }
                    seen_root = true;
                    root_box = root_view_box(&attrs);
                } else if REGION_ELEMENTS.contains(&name.as_str()) {
                    let id = RegionId(regions.len());
                    if let Some(region) =
                        Region::from_attributes(id, events.len(), name, &attrs, code_attribute)
                    {
                        regions.push(region);
                    }
                }
            }
            events.push(event.into_owned());
        }

        if !seen_root {
            return Err(CoreError::MissingRoot);
        }

        let mut first_by_code = HashMap::new();
        for region in &regions {
            let Some(code) = region.code else {
                debug!(region = %region.id, raw = %region.raw_code, "region code is not numeric");
                continue;
            };
            if first_by_code.contains_key(&code) {
                warn!(%code, region = %region.id, "duplicate region code, later region stays inert");
            } else {
                first_by_code.insert(code, region.id);
            }
        }

        let view_box = root_box.or_else(|| {
            regions
                .iter()
                .filter_map(|r| r.shape.bounds())
                .reduce(Bounds::union)
        });

        debug!(
            regions = regions.len(),
            events = events.len(),
            "diagram document parsed"
        );

        Ok(Self {
            events,
            regions,
            first_by_code,
            view_box,
            code_attribute: code_attribute.to_owned(),
        })
    }

    /// Regions in document order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0)
    }

    /// The region that represents `code`. Duplicates resolve to the first.
    pub fn region_for(&self, code: UnitCode) -> Option<&Region> {
        self.first_by_code.get(&code).and_then(|id| self.region(*id))
    }

    /// Whether `region` is the one that represents its code.
    pub fn is_primary(&self, region: &Region) -> bool {
        region
            .code
            .is_some_and(|code| self.first_by_code.get(&code) == Some(&region.id))
    }

    /// User-space extent: `viewBox`, else `width`/`height`, else region bounds.
    pub fn view_box(&self) -> Option<Bounds> {
        self.view_box
    }

    pub fn code_attribute(&self) -> &str {
        &self.code_attribute
    }

    pub(crate) fn events(&self) -> &[Event<'static>] {
        &self.events
    }
}

impl Region {
    fn from_attributes(
        id: RegionId,
        event_index: usize,
        element: String,
        attrs: &[(String, String)],
        code_attribute: &str,
    ) -> Option<Self> {
        let raw_code = attr(attrs, code_attribute)?.to_owned();
        let code = UnitCode::parse_attr(&raw_code);
        let shape = shape_of(&element, attrs);
        Some(Self {
            id,
            element,
            raw_code,
            code,
            shape,
            event_index,
        })
    }
}

fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}

fn attributes(element: &BytesStart<'_>, position: u64) -> Result<Vec<(String, String)>, CoreError> {
    let malformed = |message: String| CoreError::DocumentParse { position, message };
    element
        .attributes()
        .map(|attr| {
            let attr = attr.map_err(|e| malformed(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| malformed(e.to_string()))?
                .into_owned();
            Ok((key, value))
        })
        .collect()
}

fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn number(attrs: &[(String, String)], name: &str) -> Option<f64> {
    attr(attrs, name).and_then(parse_length)
}

fn shape_of(element: &str, attrs: &[(String, String)]) -> Shape {
    match element {
        "polygon" => Shape::Polygon(parse_points(attr(attrs, "points").unwrap_or_default())),
        "polyline" => Shape::Polyline(parse_points(attr(attrs, "points").unwrap_or_default())),
        "rect" => {
            let x = number(attrs, "x").unwrap_or(0.0);
            let y = number(attrs, "y").unwrap_or(0.0);
            match (number(attrs, "width"), number(attrs, "height")) {
                (Some(w), Some(h)) => Shape::Polygon(vec![
                    Point::new(x, y),
                    Point::new(x + w, y),
                    Point::new(x + w, y + h),
                    Point::new(x, y + h),
                ]),
                _ => Shape::Opaque,
            }
        }
        "circle" => match number(attrs, "r") {
            Some(r) => Shape::Ellipse {
                center: Point::new(
                    number(attrs, "cx").unwrap_or(0.0),
                    number(attrs, "cy").unwrap_or(0.0),
                ),
                rx: r,
                ry: r,
            },
            None => Shape::Opaque,
        },
        "ellipse" => match (number(attrs, "rx"), number(attrs, "ry")) {
            (Some(rx), Some(ry)) => Shape::Ellipse {
                center: Point::new(
                    number(attrs, "cx").unwrap_or(0.0),
                    number(attrs, "cy").unwrap_or(0.0),
                ),
                rx,
                ry,
            },
            _ => Shape::Opaque,
        },
        _ => Shape::Opaque,
    }
}

fn root_view_box(attrs: &[(String, String)]) -> Option<Bounds> {
    if let Some(raw) = attr(attrs, "viewBox") {
        let values: Vec<f64> = raw
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
            .collect();
        if let [x, y, w, h] = values[..] {
            if w > 0.0 && h > 0.0 {
                return Some(Bounds::from_origin_size(x, y, w, h));
            }
        }
    }
    match (number(attrs, "width"), number(attrs, "height")) {
        (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some(Bounds::from_origin_size(0.0, 0.0, w, h)),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PLAN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 100">
  <rect x="0" y="0" width="200" height="100" fill="none"/>
  <polygon points="0,0 100,0 100,100 0,100" data-code="101"/>
  <polygon points="100,0 200,0 200,100 100,100" data-code="102"></polygon>
  <circle cx="50" cy="50" r="5" data-code="lobby"/>
  <path d="M0 0 L10 10" data-code="103"/>
</svg>"#;

    #[test]
    fn discovers_coded_shapes_only() {
        let doc = DiagramDocument::parse(PLAN).unwrap();
        let elements: Vec<&str> = doc.regions().iter().map(|r| r.element.as_str()).collect();
        assert_eq!(elements, vec!["polygon", "polygon", "circle", "path"]);
    }

    #[test]
    fn malformed_code_parses_as_none() {
        let doc = DiagramDocument::parse(PLAN).unwrap();
        let lobby = &doc.regions()[2];
        assert_eq!(lobby.raw_code, "lobby");
        assert_eq!(lobby.code, None);
    }

    #[test]
    fn extracts_geometry_and_view_box() {
        let doc = DiagramDocument::parse(PLAN).unwrap();
        assert_eq!(
            doc.view_box(),
            Some(Bounds::from_origin_size(0.0, 0.0, 200.0, 100.0))
        );
        assert!(doc.regions()[0].shape.contains(Point::new(50.0, 50.0)));
        assert_eq!(doc.regions()[3].shape, Shape::Opaque);
    }

    #[test]
    fn view_box_falls_back_to_region_bounds() {
        let doc = DiagramDocument::parse(
            r#"<svg><polygon points="10,10 20,10 20,30" data-code="1"/></svg>"#,
        )
        .unwrap();
        assert_eq!(
            doc.view_box(),
            Some(Bounds::from_origin_size(10.0, 10.0, 10.0, 20.0))
        );
    }

    #[test]
    fn duplicate_codes_resolve_to_first_region() {
        let doc = DiagramDocument::parse(
            r#"<svg>
                <polygon points="0,0 1,0 1,1" data-code="7"/>
                <polygon points="2,2 3,2 3,3" data-code="7"/>
            </svg>"#,
        )
        .unwrap();
        let first = &doc.regions()[0];
        let second = &doc.regions()[1];
        assert_eq!(doc.region_for(UnitCode::new(7)).unwrap().id, first.id);
        assert!(doc.is_primary(first));
        assert!(!doc.is_primary(second));
    }

    #[test]
    fn custom_code_attribute() {
        let doc =
            DiagramDocument::parse_with(r#"<svg><rect width="1" height="1" unit="9"/></svg>"#, "unit")
                .unwrap();
        assert_eq!(doc.regions()[0].code, Some(UnitCode::new(9)));
        assert_eq!(doc.code_attribute(), "unit");
    }

    #[test]
    fn rejects_non_svg_root() {
        let err = DiagramDocument::parse("<html><body/></html>").unwrap_err();
        assert!(matches!(err, CoreError::MissingRoot));
        let err = DiagramDocument::parse("").unwrap_err();
        assert!(matches!(err, CoreError::MissingRoot));
    }

    #[test]
    fn rejects_mismatched_tags() {
        let err = DiagramDocument::parse("<svg><g></svg>").unwrap_err();
        assert!(matches!(err, CoreError::DocumentParse { .. }));
    }
}
