use roxmltree::Node;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::parse_svg_document;
use crate::error::ProtocolViolation;

use super::{
    FALLBACK_CATEGORY, FALLBACK_VALUE, HIGHLIGHT_FILL, TOOLTIP_OFFSET_PX, TooltipState,
    ZoomConfig, ZoomState,
};

/// Containers whose shapes are never drawn as data.
const NON_RENDERED_CONTAINERS: [&str; 6] =
    ["defs", "clipPath", "pattern", "mask", "marker", "symbol"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// `<circle>` of a point series.
    Point,
    /// `<rect>` of a bar series.
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerEventKind {
    Over,
    Move,
    Out,
}

/// One pointer listener attached to a data shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeListener {
    pub shape: usize,
    pub event: PointerEventKind,
}

/// A data-bearing shape read out of the chart markup.
#[derive(Debug, Clone, PartialEq)]
pub struct DataShape {
    kind: ShapeKind,
    series_bar: bool,
    category: Option<String>,
    value: Option<String>,
    height: Option<f64>,
    declared_fill: Option<String>,
    bounds: ShapeBounds,
    captured_fill: Option<Option<String>>,
    highlighted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ShapeBounds {
    Circle { cx: f64, cy: f64, r: f64 },
    Rect { x: f64, y: f64, width: f64, height: f64 },
}

impl DataShape {
    fn from_node(node: Node<'_, '_>) -> Option<Self> {
        let (kind, bounds) = match node.tag_name().name() {
            "circle" => (
                ShapeKind::Point,
                ShapeBounds::Circle {
                    cx: number_attr(node, "cx").unwrap_or(0.0),
                    cy: number_attr(node, "cy").unwrap_or(0.0),
                    r: number_attr(node, "r").unwrap_or(0.0),
                },
            ),
            "rect" => (
                ShapeKind::Bar,
                ShapeBounds::Rect {
                    x: number_attr(node, "x").unwrap_or(0.0),
                    y: number_attr(node, "y").unwrap_or(0.0),
                    width: number_attr(node, "width").unwrap_or(0.0),
                    height: number_attr(node, "height").unwrap_or(0.0),
                },
            ),
            _ => return None,
        };

        let (title_category, title_value) = title_pair(node);
        Some(Self {
            kind,
            series_bar: has_class(node, "bar"),
            category: text_attr(node, "data-category").or(title_category),
            value: text_attr(node, "data-value").or(title_value),
            height: number_attr(node, "height"),
            declared_fill: text_attr(node, "fill"),
            bounds,
            captured_fill: None,
            highlighted: false,
        })
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(FALLBACK_CATEGORY)
    }

    /// Embedded value, else the `height` attribute with two decimals, else `N/A`.
    #[must_use]
    pub fn value(&self) -> String {
        match (&self.value, self.height) {
            (Some(value), _) => value.clone(),
            (None, Some(height)) => format!("{height:.2}"),
            (None, None) => FALLBACK_VALUE.to_owned(),
        }
    }

    #[must_use]
    pub fn tooltip_text(&self) -> String {
        format!("{}: {}", self.category(), self.value())
    }

    /// Fill currently shown for this shape.
    #[must_use]
    pub fn fill(&self) -> Option<&str> {
        if self.highlighted {
            return Some(HIGHLIGHT_FILL);
        }
        match &self.captured_fill {
            Some(original) => original.as_deref(),
            None => self.declared_fill.as_deref(),
        }
    }

    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        match self.bounds {
            ShapeBounds::Circle { cx, cy, r } => {
                let (dx, dy) = (x - cx, y - cy);
                dx * dx + dy * dy <= r * r
            }
            ShapeBounds::Rect {
                x: left,
                y: top,
                width,
                height,
            } => x >= left && x <= left + width && y >= top && y <= top + height,
        }
    }
}

/// An artifact as displayed: the untouched markup plus interaction state.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    markup: String,
    view_box: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    shapes: Vec<DataShape>,
    enhanced: bool,
    listeners: Vec<ShapeListener>,
    tooltip: Option<TooltipState>,
    zoom: ZoomState,
}

impl RenderedChart {
    pub(super) fn parse(markup: &str, zoom: ZoomConfig) -> Result<Self, ProtocolViolation> {
        let document = parse_svg_document(markup)?;
        let root = document.root_element();
        let shapes: Vec<DataShape> = root
            .descendants()
            .filter(|node| node.is_element() && !inside_non_rendered(*node))
            .filter_map(DataShape::from_node)
            .collect();
        debug!(shape_count = shapes.len(), "parsed rendered chart");

        Ok(Self {
            markup: markup.to_owned(),
            view_box: text_attr(root, "viewBox"),
            width: number_attr(root, "width"),
            height: number_attr(root, "height"),
            shapes,
            enhanced: false,
            listeners: Vec::new(),
            tooltip: None,
            zoom: ZoomState::new(zoom),
        })
    }

    pub(super) fn enhance(&mut self) -> usize {
        if self.enhanced {
            trace!("chart already enhanced");
            return 0;
        }
        let before = self.listeners.len();
        for shape in 0..self.shapes.len() {
            for event in [
                PointerEventKind::Over,
                PointerEventKind::Move,
                PointerEventKind::Out,
            ] {
                self.listeners.push(ShapeListener { shape, event });
            }
        }
        self.tooltip = Some(TooltipState::default());
        self.enhanced = true;
        let attached = self.listeners.len() - before;
        debug!(attached, "enhanced rendered chart");
        attached
    }

    /// Sets category/value on shapes from an ordered data series.
    ///
    /// Circles and `rect.bar` elements each take the series in document order;
    /// other rectangles (backgrounds, legend swatches) are never targets. A kind
    /// is left alone when the series is shorter than its shapes.
    pub fn annotate(&mut self, data: &[(String, String)]) {
        for kind in [ShapeKind::Point, ShapeKind::Bar] {
            let targets: Vec<usize> = self
                .shapes
                .iter()
                .enumerate()
                .filter(|(_, shape)| shape.kind == kind)
                .filter(|(_, shape)| kind == ShapeKind::Point || shape.series_bar)
                .map(|(index, _)| index)
                .collect();
            if targets.is_empty() || data.len() < targets.len() {
                continue;
            }
            for (index, (category, value)) in targets.into_iter().zip(data) {
                self.shapes[index].category = Some(category.clone());
                self.shapes[index].value = Some(value.clone());
            }
        }
    }

    /// Pointer entered a shape: show its tooltip and highlight it.
    /// Ignored until the chart is enhanced.
    pub fn pointer_over(&mut self, shape: usize, page_x: f64, page_y: f64) -> bool {
        if !self.enhanced {
            return false;
        }
        let Some(target) = self.shapes.get_mut(shape) else {
            return false;
        };
        if target.captured_fill.is_none() {
            target.captured_fill = Some(target.declared_fill.clone());
        }
        target.highlighted = true;
        let text = target.tooltip_text();
        trace!(shape, %text, "pointer over data shape");
        if let Some(tooltip) = self.tooltip.as_mut() {
            tooltip.visible = true;
            tooltip.text = text;
            tooltip.left_px = page_x + TOOLTIP_OFFSET_PX;
            tooltip.top_px = page_y + TOOLTIP_OFFSET_PX;
        }
        true
    }

    /// Keeps the visible tooltip following the pointer.
    pub fn pointer_move(&mut self, page_x: f64, page_y: f64) -> bool {
        match self.tooltip.as_mut() {
            Some(tooltip) if tooltip.visible => {
                tooltip.left_px = page_x + TOOLTIP_OFFSET_PX;
                tooltip.top_px = page_y + TOOLTIP_OFFSET_PX;
                true
            }
            _ => false,
        }
    }

    /// Pointer left a shape: hide the tooltip and restore the original fill.
    pub fn pointer_out(&mut self, shape: usize) -> bool {
        if !self.enhanced {
            return false;
        }
        let Some(target) = self.shapes.get_mut(shape) else {
            return false;
        };
        target.highlighted = false;
        if let Some(tooltip) = self.tooltip.as_mut() {
            tooltip.visible = false;
        }
        trace!(shape, "pointer out of data shape");
        true
    }

    /// Topmost data shape under a point in SVG user units.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.shapes.iter().rposition(|shape| shape.contains(x, y))
    }

    pub fn zoom_in(&mut self) -> f64 {
        let factor = self.zoom.zoom_in();
        trace!(factor, "zoom in");
        factor
    }

    pub fn zoom_out(&mut self) -> f64 {
        let factor = self.zoom.zoom_out();
        trace!(factor, "zoom out");
        factor
    }

    /// Restores factor 1.0, no transform and the original viewBox.
    pub fn reset_zoom(&mut self) {
        self.zoom.reset();
        trace!(view_box = ?self.view_box, "zoom reset");
    }

    #[must_use]
    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    /// Original markup, byte for byte.
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    #[must_use]
    pub fn view_box(&self) -> Option<&str> {
        self.view_box.as_deref()
    }

    /// Intrinsic `(width, height)` from the root attributes, else the viewBox.
    #[must_use]
    pub fn intrinsic_size(&self) -> Option<(f64, f64)> {
        if let (Some(width), Some(height)) = (self.width, self.height) {
            return Some((width, height));
        }
        let parts: Vec<f64> = self
            .view_box
            .as_deref()?
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .filter_map(|part| part.parse().ok())
            .collect();
        match parts.as_slice() {
            [_, _, width, height] => Some((*width, *height)),
            _ => None,
        }
    }

    #[must_use]
    pub fn shapes(&self) -> &[DataShape] {
        &self.shapes
    }

    #[must_use]
    pub fn is_enhanced(&self) -> bool {
        self.enhanced
    }

    #[must_use]
    pub fn listeners(&self) -> &[ShapeListener] {
        &self.listeners
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of tooltip overlay elements (at most one).
    #[must_use]
    pub fn tooltip_count(&self) -> usize {
        usize::from(self.tooltip.is_some())
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&TooltipState> {
        self.tooltip.as_ref()
    }
}

fn inside_non_rendered(node: Node<'_, '_>) -> bool {
    node.ancestors()
        .skip(1)
        .any(|ancestor| NON_RENDERED_CONTAINERS.contains(&ancestor.tag_name().name()))
}

fn has_class(node: Node<'_, '_>, class: &str) -> bool {
    node.attribute("class")
        .is_some_and(|list| list.split_whitespace().any(|entry| entry == class))
}

fn text_attr(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Leading number of a length attribute, ignoring units such as `px`.
fn number_attr(node: Node<'_, '_>, name: &str) -> Option<f64> {
    let raw = node.attribute(name)?.trim();
    let end = raw
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
        .unwrap_or(raw.len());
    raw[..end].parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Splits a child `<title>Label: 1.23</title>` into category and value.
fn title_pair(node: Node<'_, '_>) -> (Option<String>, Option<String>) {
    let Some(text) = node
        .children()
        .find(|child| child.has_tag_name("title"))
        .and_then(|title| title.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
    else {
        return (None, None);
    };
    match text.rsplit_once(": ") {
        Some((category, value)) => (
            Some(category.trim().to_owned()).filter(|c| !c.is_empty()),
            Some(value.trim().to_owned()).filter(|v| !v.is_empty()),
        ),
        None => (Some(text.to_owned()), None),
    }
}
