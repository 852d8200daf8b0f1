// ── Styled SVG output ──
//
// Streams the base events back out. Start/empty events of bound or hidden
// regions are rebuilt with scene-derived attributes; every other event,
// inert regions included, is written exactly as parsed.

use std::collections::{BTreeSet, HashMap};

use quick_xml::Writer;
use quick_xml::events::{BytesStart, Event};

use super::{DiagramDocument, RegionId};
use crate::error::CoreError;
use crate::reconcile::{RegionState, RenderedRegion, Scene};
use crate::style::{HOVER_FILTER, SELECTED_CLASS, TRANSITION};

/// Presentation attributes owned by the scene on shown regions.
const SCENE_ATTRIBUTES: &[&[u8]] = &[
    b"fill",
    b"stroke",
    b"stroke-width",
    b"role",
    b"tabindex",
    b"aria-label",
];

/// Style properties owned by the scene; authored values are dropped.
const SCENE_PROPERTIES: &[&str] = &["display", "filter", "cursor", "transition"];

#[derive(Clone, Copy)]
enum AttrKind {
    Style,
    Class,
    Replaced,
    Kept,
}

pub(crate) fn write_svg(
    document: &DiagramDocument,
    scene: &Scene,
    emphasized: &BTreeSet<RegionId>,
) -> Result<String, CoreError> {
    let by_event: HashMap<usize, &RenderedRegion> = document
        .regions()
        .iter()
        .filter_map(|region| {
            scene
                .region(region.id)
                .map(|rendered| (region.event_index, rendered))
        })
        .collect();

    let mut writer = Writer::new(Vec::new());
    for (index, event) in document.events().iter().enumerate() {
        let restyled = match (event, by_event.get(&index)) {
            (Event::Start(element), Some(rendered)) => {
                restyle(element, rendered, emphasized.contains(&rendered.id))?.map(Event::Start)
            }
            (Event::Empty(element), Some(rendered)) => {
                restyle(element, rendered, emphasized.contains(&rendered.id))?.map(Event::Empty)
            }
            _ => None,
        };
        let written = match restyled {
            Some(event) => writer.write_event(event),
            None => writer.write_event(event.borrow()),
        };
        written.map_err(write_error)?;
    }

    String::from_utf8(writer.into_inner()).map_err(write_error)
}

fn restyle(
    original: &BytesStart<'_>,
    rendered: &RenderedRegion,
    emphasized: bool,
) -> Result<Option<BytesStart<'static>>, CoreError> {
    let shown = match &rendered.state {
        RegionState::Inert { .. } => return Ok(None),
        RegionState::Hidden { .. } => None,
        RegionState::Shown {
            style, description, ..
        } => Some((*style, description.as_str())),
    };

    let name = String::from_utf8_lossy(original.name().as_ref()).into_owned();
    let mut element = BytesStart::new(name);
    let mut authored_style = None;
    let mut authored_class = None;

    for attr in original.attributes() {
        let attr = attr.map_err(write_error)?;
        let kind = match attr.key.as_ref() {
            b"style" => AttrKind::Style,
            b"class" => AttrKind::Class,
            key if shown.is_some() && SCENE_ATTRIBUTES.contains(&key) => AttrKind::Replaced,
            _ => AttrKind::Kept,
        };
        match kind {
            AttrKind::Style => {
                authored_style = Some(attr.unescape_value().map_err(write_error)?.into_owned());
            }
            AttrKind::Class => {
                authored_class = Some(attr.unescape_value().map_err(write_error)?.into_owned());
            }
            AttrKind::Replaced => {}
            AttrKind::Kept => element.push_attribute(attr),
        }
    }

    let declarations: Vec<(&str, &str)> = match shown {
        Some((style, description)) => {
            element.push_attribute(("fill", style.fill));
            element.push_attribute(("stroke", style.stroke));
            element.push_attribute(("stroke-width", style.stroke_width));
            element.push_attribute(("role", "button"));
            element.push_attribute(("tabindex", "0"));
            element.push_attribute(("aria-label", description));
            let mut declarations = vec![
                ("display", "block"),
                ("transition", TRANSITION),
                ("cursor", "pointer"),
            ];
            if emphasized && !rendered.selected {
                declarations.push(("filter", HOVER_FILTER));
            }
            declarations
        }
        None => vec![("display", "none")],
    };

    if let Some(class) = merge_class(authored_class.as_deref(), rendered.selected) {
        element.push_attribute(("class", class.as_str()));
    }
    let style = merge_style(authored_style.as_deref(), &declarations);
    element.push_attribute(("style", style.as_str()));

    Ok(Some(element))
}

/// Authored declarations minus scene-owned properties, then the scene's.
fn merge_style(authored: Option<&str>, declarations: &[(&str, &str)]) -> String {
    let kept = authored
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty())
        .filter(|decl| {
            let property = decl.split(':').next().unwrap_or_default().trim();
            !SCENE_PROPERTIES
                .iter()
                .any(|owned| owned.eq_ignore_ascii_case(property))
        })
        .map(str::to_owned);
    let added = declarations
        .iter()
        .map(|(property, value)| format!("{property}: {value}"));
    kept.chain(added).collect::<Vec<_>>().join("; ")
}

fn merge_class(authored: Option<&str>, selected: bool) -> Option<String> {
    let mut classes: Vec<&str> = authored
        .unwrap_or_default()
        .split_whitespace()
        .filter(|class| *class != SELECTED_CLASS)
        .collect();
    if selected {
        classes.push(SELECTED_CLASS);
    }
    (!classes.is_empty()).then(|| classes.join(" "))
}

fn write_error(err: impl std::fmt::Display) -> CoreError {
    CoreError::DocumentWrite {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_style_drops_scene_properties() {
        let merged = merge_style(
            Some("opacity: 0.5; DISPLAY: none;filter:blur(2px)"),
            &[("display", "block")],
        );
        assert_eq!(merged, "opacity: 0.5; display: block");
    }

    #[test]
    fn merge_style_without_authored_style() {
        assert_eq!(merge_style(None, &[("display", "none")]), "display: none");
    }

    #[test]
    fn merge_class_toggles_marker_only() {
        assert_eq!(
            merge_class(Some("unit selected"), false).as_deref(),
            Some("unit")
        );
        assert_eq!(
            merge_class(Some("unit"), true).as_deref(),
            Some("unit selected")
        );
        assert_eq!(merge_class(Some("selected"), false), None);
        assert_eq!(merge_class(None, true).as_deref(), Some("selected"));
    }
}
