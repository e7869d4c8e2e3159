//! Canvas elements - the building blocks of a canvas document.
//!
//! Every element shares the same geometry fields; the type-specific payload
//! lives in [`ElementKind`], a closed set of variants tagged by `type` in the
//! persisted form:
//!
//! ```json
//! { "id": "…", "type": "text", "content": "Hello", "fontSize": 16.0, "color": "#000000",
//!   "x": 10.0, "y": 20.0, "width": 200.0, "height": 50.0,
//!   "rotation": 0.0, "zIndex": 3, "createdAt": 1700000000000, "updatedAt": 1700000000000 }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, CanvasResult};
use crate::geometry::{Point, Rect, Size};
use crate::id::ElementId;

const DEFAULT_FONT_SIZE: f64 = 16.0;
const DEFAULT_STROKE_WIDTH: f64 = 2.0;

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_color() -> String {
    "#000000".to_string()
}

/// The type of content an element contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ElementKind {
    /// A text label or sticky note body.
    #[serde(rename_all = "camelCase")]
    Text {
        /// Text content.
        content: String,
        /// Font size in document units.
        #[serde(default = "default_font_size")]
        font_size: f64,
        /// Text color as hex.
        #[serde(default = "default_color")]
        color: String,
    },

    /// A raster or vector image.
    Image {
        /// Image source URI or base64 data.
        src: String,
        /// Image format, if known.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<ImageFormat>,
    },

    /// A freehand drawing made of stroke paths.
    Drawing {
        /// Stroke paths, with points relative to the element origin.
        paths: Vec<StrokePath>,
        /// Stroke style shared by every path.
        #[serde(default)]
        stroke: StrokeStyle,
    },

    /// A card pointing at a note stored elsewhere.
    #[serde(rename_all = "camelCase")]
    NoteReference {
        /// Id of the referenced note.
        note_id: String,
    },

    /// A line or arrow between two points.
    Connector {
        /// Start point in document space.
        from: Point,
        /// End point in document space.
        to: Point,
        /// Line style.
        #[serde(default)]
        style: ConnectorStyle,
    },
}

impl ElementKind {
    /// The variant tag of this payload.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Text { .. } => ElementType::Text,
            Self::Image { .. } => ElementType::Image,
            Self::Drawing { .. } => ElementType::Drawing,
            Self::NoteReference { .. } => ElementType::NoteReference,
            Self::Connector { .. } => ElementType::Connector,
        }
    }

    fn validate(&self) -> CanvasResult<()> {
        match self {
            Self::Text {
                font_size, color, ..
            } => {
                if !font_size.is_finite() || *font_size <= 0.0 {
                    return Err(CanvasError::validation(format!(
                        "text font size must be positive, got {font_size}"
                    )));
                }
                if color.trim().is_empty() {
                    return Err(CanvasError::validation("text color must not be empty"));
                }
            }
            Self::Image { src, .. } => {
                if src.trim().is_empty() {
                    return Err(CanvasError::validation("image src must not be empty"));
                }
            }
            Self::Drawing { paths, stroke } => {
                stroke.validate()?;
                if paths.iter().flat_map(|p| &p.points).any(|p| !p.is_finite()) {
                    return Err(CanvasError::validation(
                        "drawing path points must be finite",
                    ));
                }
            }
            Self::NoteReference { note_id } => {
                if note_id.trim().is_empty() {
                    return Err(CanvasError::validation(
                        "note reference requires a note id",
                    ));
                }
            }
            Self::Connector { from, to, style } => {
                if !from.is_finite() || !to.is_finite() {
                    return Err(CanvasError::validation(
                        "connector endpoints must be finite",
                    ));
                }
                if !style.width.is_finite() || style.width < 0.0 {
                    return Err(CanvasError::validation(
                        "connector width must be non-negative",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Fieldless tag of an [`ElementKind`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementType {
    /// [`ElementKind::Text`].
    Text,
    /// [`ElementKind::Image`].
    Image,
    /// [`ElementKind::Drawing`].
    Drawing,
    /// [`ElementKind::NoteReference`].
    NoteReference,
    /// [`ElementKind::Connector`].
    Connector,
}

impl ElementType {
    /// Whether elements of this type carry a width and height that
    /// `resize_element` may change.
    #[must_use]
    pub const fn is_resizable(self) -> bool {
        !matches!(self, Self::Connector)
    }

    /// Whether elements of this type require an explicit width and height.
    #[must_use]
    pub const fn requires_size(self) -> bool {
        matches!(self, Self::Text | Self::Image | Self::NoteReference)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Drawing => "drawing",
            Self::NoteReference => "note-reference",
            Self::Connector => "connector",
        };
        f.write_str(name)
    }
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// SVG vector image.
    Svg,
    /// `WebP` image.
    WebP,
}

/// One continuous freehand stroke.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokePath {
    /// Sampled points, relative to the owning element's origin.
    pub points: Vec<Point>,
}

impl StrokePath {
    /// Create a path from points.
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }
}

/// Stroke appearance for drawings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Stroke color as hex.
    pub color: String,
    /// Stroke width in document units.
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: default_color(),
            width: DEFAULT_STROKE_WIDTH,
        }
    }
}

impl StrokeStyle {
    fn validate(&self) -> CanvasResult<()> {
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(CanvasError::validation(format!(
                "stroke width must be non-negative, got {}",
                self.width
            )));
        }
        Ok(())
    }
}

/// Arrow heads drawn on a connector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowHead {
    /// Plain line.
    None,
    /// Arrow at the `to` end.
    #[default]
    End,
    /// Arrows at both ends.
    Both,
}

/// Connector appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorStyle {
    /// Line color as hex.
    pub color: String,
    /// Line width in document units.
    pub width: f64,
    /// Arrow heads.
    #[serde(default)]
    pub arrow: ArrowHead,
}

impl Default for ConnectorStyle {
    fn default() -> Self {
        Self {
            color: default_color(),
            width: DEFAULT_STROKE_WIDTH,
            arrow: ArrowHead::default(),
        }
    }
}

/// An element placed on the canvas.
///
/// Records handed out by the store are snapshots; mutating a clone never
/// affects the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasElement {
    /// Unique, creation-ordered identifier.
    pub id: ElementId,
    /// Type tag and payload.
    #[serde(flatten)]
    pub kind: ElementKind,
    /// Left edge in document space (absent for connectors).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Top edge in document space (absent for connectors).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Width (absent for connectors and size-less drawings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Height (absent for connectors and size-less drawings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Rotation in degrees, clockwise about the element centre.
    #[serde(default)]
    pub rotation: f64,
    /// Paint order; higher paints later.
    #[serde(default)]
    pub z_index: i64,
    /// Creation time (Unix ms), set by the store.
    pub created_at: u64,
    /// Last modification time (Unix ms), set by the store.
    pub updated_at: u64,
}

impl CanvasElement {
    /// The variant tag of this element.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Reference point used by `move_element`.
    ///
    /// The top-left position for positioned types, and the minimum corner of
    /// the two endpoints for connectors.
    #[must_use]
    pub fn origin(&self) -> Point {
        match &self.kind {
            ElementKind::Connector { from, to, .. } => Rect::from_corners(*from, *to).origin(),
            _ => Point::new(self.x.unwrap_or(0.0), self.y.unwrap_or(0.0)),
        }
    }

    /// Explicit size, if the element carries one.
    #[must_use]
    pub fn size(&self) -> Option<Size> {
        Some(Size::new(self.width?, self.height?))
    }

    /// Axis-aligned bounding box of the element's painted footprint.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        match &self.kind {
            ElementKind::Connector { from, to, style } => {
                Rect::from_corners(*from, *to).inflate(style.width / 2.0)
            }
            ElementKind::Drawing { paths, stroke } if self.size().is_none() => {
                let origin = self.origin();
                let points = paths
                    .iter()
                    .flat_map(|path| path.points.iter())
                    .map(|p| p.offset(origin.x, origin.y));
                Rect::from_points(points)
                    .unwrap_or(Rect::new(origin.x, origin.y, 0.0, 0.0))
                    .inflate(stroke.width / 2.0)
                    .rotated_bounds(self.rotation)
            }
            _ => {
                let origin = self.origin();
                let size = self.size().unwrap_or_default();
                Rect::new(origin.x, origin.y, size.width, size.height)
                    .rotated_bounds(self.rotation)
            }
        }
    }

    /// Check the element against the schema for its type.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`] describing the first violation.
    pub fn validate(&self) -> CanvasResult<()> {
        validate_geometry(
            &self.kind,
            [self.x, self.y, self.width, self.height],
            self.rotation,
        )
    }

    /// Place the origin at `target`.
    pub(crate) fn move_to(&mut self, target: Point) {
        if let ElementKind::Connector { .. } = self.kind {
            let origin = self.origin();
            self.translate(target.x - origin.x, target.y - origin.y);
        } else {
            self.x = Some(target.x);
            self.y = Some(target.y);
        }
    }

    /// Shift the element by a delta.
    pub(crate) fn translate(&mut self, dx: f64, dy: f64) {
        if let ElementKind::Connector { from, to, .. } = &mut self.kind {
            *from = from.offset(dx, dy);
            *to = to.offset(dx, dy);
        } else {
            self.x = self.x.map(|x| x + dx);
            self.y = self.y.map(|y| y + dy);
        }
    }
}

/// Validate geometry fields (`[x, y, width, height]`) for a payload.
fn validate_geometry(kind: &ElementKind, fields: [Option<f64>; 4], rotation: f64) -> CanvasResult<()> {
    const NAMES: [&str; 4] = ["x", "y", "width", "height"];

    kind.validate()?;
    let element_type = kind.element_type();

    for (name, value) in NAMES.iter().zip(fields) {
        if let Some(v) = value {
            if !v.is_finite() {
                return Err(CanvasError::validation(format!("{name} must be finite, got {v}")));
            }
        }
    }
    if !rotation.is_finite() {
        return Err(CanvasError::validation("rotation must be finite"));
    }

    let [x, y, width, height] = fields;
    if element_type == ElementType::Connector {
        if fields.iter().any(Option::is_some) {
            return Err(CanvasError::validation(
                "connector is positioned by its endpoints and takes no x/y/width/height",
            ));
        }
        return Ok(());
    }

    if x.is_none() || y.is_none() {
        return Err(CanvasError::validation(format!(
            "{element_type} element requires x and y"
        )));
    }

    match (width, height) {
        (Some(w), Some(h)) => {
            if w <= 0.0 || h <= 0.0 {
                return Err(CanvasError::validation(format!(
                    "width and height must be positive, got {w}x{h}"
                )));
            }
        }
        (None, None) if element_type.requires_size() => {
            return Err(CanvasError::validation(format!(
                "{element_type} element requires width and height"
            )));
        }
        (None, None) => {
            if let ElementKind::Drawing { paths, .. } = kind {
                if paths.iter().all(|p| p.points.is_empty()) {
                    return Err(CanvasError::validation(
                        "drawing requires at least one stroke point or an explicit size",
                    ));
                }
            }
        }
        _ => {
            return Err(CanvasError::validation(
                "width and height must be given together",
            ));
        }
    }
    Ok(())
}

/// Client-supplied description of a new element.
///
/// The store assigns the id, timestamps and z-index; those fields cannot be
/// supplied here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSpec {
    /// Type tag and payload.
    #[serde(flatten)]
    pub kind: ElementKind,
    /// Left edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Top edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Rotation in degrees (default 0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl ElementSpec {
    /// Spec with the given payload and no geometry.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            x: None,
            y: None,
            width: None,
            height: None,
            rotation: None,
        }
    }

    /// Text element with default font size and color.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(ElementKind::Text {
            content: content.into(),
            font_size: DEFAULT_FONT_SIZE,
            color: default_color(),
        })
    }

    /// Image element.
    #[must_use]
    pub fn image(src: impl Into<String>) -> Self {
        Self::new(ElementKind::Image {
            src: src.into(),
            format: None,
        })
    }

    /// Drawing with the default stroke.
    #[must_use]
    pub fn drawing(paths: Vec<StrokePath>) -> Self {
        Self::new(ElementKind::Drawing {
            paths,
            stroke: StrokeStyle::default(),
        })
    }

    /// Note reference card.
    #[must_use]
    pub fn note_reference(note_id: impl Into<String>) -> Self {
        Self::new(ElementKind::NoteReference {
            note_id: note_id.into(),
        })
    }

    /// Connector between two points.
    #[must_use]
    pub fn connector(from: Point, to: Point) -> Self {
        Self::new(ElementKind::Connector {
            from,
            to,
            style: ConnectorStyle::default(),
        })
    }

    /// Set the position.
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Set the size.
    #[must_use]
    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the rotation in degrees.
    #[must_use]
    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    /// Parse a spec from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`] for unknown `type` tags, missing
    /// payload fields or malformed JSON.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CanvasError::validation(format!("invalid element spec: {e}")))
    }

    /// Check the spec without creating an element.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`] describing the first violation.
    pub fn validate(&self) -> CanvasResult<()> {
        validate_geometry(
            &self.kind,
            [self.x, self.y, self.width, self.height],
            self.rotation.unwrap_or(0.0),
        )
    }

    /// Materialize into a stored element.
    pub(crate) fn into_element(
        self,
        id: ElementId,
        z_index: i64,
        now: u64,
    ) -> CanvasResult<CanvasElement> {
        self.validate()?;
        Ok(CanvasElement {
            id,
            kind: self.kind,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            rotation: self.rotation.unwrap_or(0.0),
            z_index,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update for an existing element.
///
/// `None` leaves a field unchanged. A replacement payload must keep the
/// element's type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    /// Replacement payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ElementKind>,
    /// New left edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// New top edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// New width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// New height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// New rotation in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl ElementPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.x.is_none()
            && self.y.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.rotation.is_none()
    }

    /// Produce the patched copy of `element`, validated.
    pub(crate) fn apply_to(&self, element: &CanvasElement) -> CanvasResult<CanvasElement> {
        let mut patched = element.clone();
        if let Some(kind) = &self.kind {
            if kind.element_type() != element.element_type() {
                return Err(CanvasError::validation(format!(
                    "cannot change element type from {} to {}",
                    element.element_type(),
                    kind.element_type()
                )));
            }
            patched.kind = kind.clone();
        }
        if self.x.is_some() {
            patched.x = self.x;
        }
        if self.y.is_some() {
            patched.y = self.y;
        }
        if self.width.is_some() {
            patched.width = self.width;
        }
        if self.height.is_some() {
            patched.height = self.height;
        }
        if let Some(rotation) = self.rotation {
            patched.rotation = rotation;
        }
        patched.validate()?;
        Ok(patched)
    }
}
