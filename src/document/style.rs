//! Layout and paint style values carried by every view.
//!
//! Both halves are plain value structs with structural equality. [`StyleOverride`] and
//! [`LayoutOverride`] are their field-level patch counterparts: every `Some` field replaces the
//! matching style field and every `None` field leaves it untouched.

use crate::foundation::core::{Affine, Color, Point, Size, Vec2};

/// A length as understood by the flex layout engine.
#[derive(Clone, Copy, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub enum Dimension {
    /// Let the layout engine decide.
    #[default]
    Auto,
    /// Not specified at all.
    Undefined,
    /// Absolute length in points.
    Points(f32),
    /// Fraction of the parent's size, `1.0 == 100%`.
    Percent(f32),
}

/// Four-sided value (margin, padding, inset).
#[derive(Clone, Copy, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Edges<T> {
    /// Left edge.
    pub left: T,
    /// Right edge.
    pub right: T,
    /// Top edge.
    pub top: T,
    /// Bottom edge.
    pub bottom: T,
}

impl<T: Copy> Edges<T> {
    /// Same value on every side.
    pub fn all(v: T) -> Self {
        Self {
            left: v,
            right: v,
            top: v,
            bottom: v,
        }
    }
}

/// Whether the node participates in layout at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Display {
    /// Laid out as a flex container/item.
    #[default]
    Flex,
    /// Removed from layout.
    None,
}

/// Positioning scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum PositionType {
    /// Flows with siblings.
    #[default]
    Relative,
    /// Placed by inset relative to the parent.
    Absolute,
}

/// Main axis of a flex container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum FlexDirection {
    /// Horizontal, left to right.
    #[default]
    Row,
    /// Vertical, top to bottom.
    Column,
    /// Horizontal, right to left.
    RowReverse,
    /// Vertical, bottom to top.
    ColumnReverse,
}

/// Line wrapping of a flex container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum FlexWrap {
    /// Single line.
    #[default]
    NoWrap,
    /// Wrap onto new lines.
    Wrap,
    /// Wrap onto new lines in reverse.
    WrapReverse,
}

/// Cross-axis alignment of children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum AlignItems {
    /// Start of the cross axis.
    #[default]
    FlexStart,
    /// End of the cross axis.
    FlexEnd,
    /// Centered.
    Center,
    /// Stretched to fill.
    Stretch,
    /// Text baselines aligned.
    Baseline,
}

/// Cross-axis alignment override for one child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum AlignSelf {
    /// Inherit from the parent's `align_items`.
    #[default]
    Auto,
    /// Start of the cross axis.
    FlexStart,
    /// End of the cross axis.
    FlexEnd,
    /// Centered.
    Center,
    /// Stretched to fill.
    Stretch,
    /// Text baselines aligned.
    Baseline,
}

/// Distribution of wrapped lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum AlignContent {
    /// Packed at the start.
    #[default]
    FlexStart,
    /// Packed at the end.
    FlexEnd,
    /// Packed in the center.
    Center,
    /// Stretched to fill.
    Stretch,
    /// Even gaps, no outer gap.
    SpaceBetween,
    /// Even gaps, half-size outer gaps.
    SpaceAround,
}

/// Main-axis distribution of children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum JustifyContent {
    /// Packed at the start.
    #[default]
    FlexStart,
    /// Packed at the end.
    FlexEnd,
    /// Packed in the center.
    Center,
    /// Even gaps, no outer gap.
    SpaceBetween,
    /// Even gaps, half-size outer gaps.
    SpaceAround,
    /// Even gaps including outer gaps.
    SpaceEvenly,
}

/// Flex/position attributes consumed by the external layout engine.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutStyle {
    /// Participation in layout.
    pub display: Display,
    /// Positioning scheme.
    pub position_type: PositionType,
    /// Main axis.
    pub flex_direction: FlexDirection,
    /// Wrapping.
    pub flex_wrap: FlexWrap,
    /// Cross-axis alignment of children.
    pub align_items: AlignItems,
    /// Cross-axis alignment of this node.
    pub align_self: AlignSelf,
    /// Distribution of wrapped lines.
    pub align_content: AlignContent,
    /// Main-axis distribution of children.
    pub justify_content: JustifyContent,
    /// Absolute-position insets.
    pub inset: Edges<Dimension>,
    /// Outer spacing.
    pub margin: Edges<Dimension>,
    /// Inner spacing.
    pub padding: Edges<Dimension>,
    /// Main-axis gap between children.
    pub item_spacing: f32,
    /// Cross-axis gap between wrapped lines.
    pub cross_axis_item_spacing: f32,
    /// Flex grow factor.
    pub flex_grow: f32,
    /// Flex shrink factor.
    pub flex_shrink: f32,
    /// Flex basis.
    pub flex_basis: Dimension,
    /// Preferred width.
    pub width: Dimension,
    /// Preferred height.
    pub height: Dimension,
    /// Minimum width.
    pub min_width: Dimension,
    /// Minimum height.
    pub min_height: Dimension,
    /// Maximum width.
    pub max_width: Dimension,
    /// Maximum height.
    pub max_height: Dimension,
    /// Width / height ratio.
    pub aspect_ratio: Option<f32>,
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            display: Display::Flex,
            position_type: PositionType::Relative,
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::NoWrap,
            align_items: AlignItems::FlexStart,
            align_self: AlignSelf::Auto,
            align_content: AlignContent::FlexStart,
            justify_content: JustifyContent::FlexStart,
            inset: Edges::all(Dimension::Auto),
            margin: Edges::all(Dimension::Points(0.0)),
            padding: Edges::all(Dimension::Points(0.0)),
            item_spacing: 0.0,
            cross_axis_item_spacing: 0.0,
            flex_grow: 0.0,
            flex_shrink: 0.0,
            flex_basis: Dimension::Auto,
            width: Dimension::Auto,
            height: Dimension::Auto,
            min_width: Dimension::Auto,
            min_height: Dimension::Auto,
            max_width: Dimension::Auto,
            max_height: Dimension::Auto,
            aspect_ratio: None,
        }
    }
}

/// How an image fill maps onto its node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum ScaleMode {
    /// Cover the node, cropping overflow.
    #[default]
    Fill,
    /// Fit entirely inside the node.
    Fit,
    /// Repeat at natural size.
    Tile,
    /// Stretch to the node bounds.
    Stretch,
}

/// One gradient color stop.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientStop {
    /// Position along the gradient in `[0, 1]`.
    pub position: f32,
    /// Stop color.
    pub color: Color,
}

/// A background or stroke paint.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Fill {
    /// Solid color.
    Solid(Color),
    /// Linear gradient in node-relative unit coordinates.
    LinearGradient {
        /// Start point.
        start: Point,
        /// End point.
        end: Point,
        /// Color stops, sorted by position.
        stops: Vec<GradientStop>,
    },
    /// Image fill referenced by key.
    Image {
        /// Image key in the design tool's image store.
        key: String,
        /// Scaling behavior.
        scale_mode: ScaleMode,
    },
}

/// Where a stroke sits relative to the node outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum StrokeAlign {
    /// Inside the outline.
    #[default]
    Inside,
    /// Centered on the outline.
    Center,
    /// Outside the outline.
    Outside,
}

/// Outline paint.
#[derive(Clone, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Stroke {
    /// Stroke width in points.
    pub weight: f32,
    /// Stroke placement.
    pub align: StrokeAlign,
    /// Paints, bottom first.
    pub paints: Vec<Fill>,
}

/// Drop or inner shadow.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoxShadow {
    /// Shadow offset.
    pub offset: Vec2,
    /// Blur radius.
    pub blur: f32,
    /// Spread distance.
    pub spread: f32,
    /// Shadow color.
    pub color: Color,
    /// Inner shadow when `true`.
    pub inset: bool,
}

/// Compositing mode against content below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum BlendMode {
    /// Group passes children through unchanged.
    #[default]
    PassThrough,
    /// Source-over.
    Normal,
    /// Multiply.
    Multiply,
    /// Screen.
    Screen,
    /// Overlay.
    Overlay,
    /// Darken.
    Darken,
    /// Lighten.
    Lighten,
    /// Difference.
    Difference,
}

/// Text line height.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum LineHeight {
    /// Absolute line height in points.
    Pixels(f32),
    /// Multiple of the font size.
    Percent(f32),
}

impl Default for LineHeight {
    fn default() -> Self {
        Self::Percent(1.0)
    }
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum TextAlign {
    /// Left aligned.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
    /// Justified.
    Justified,
}

/// How a node sizes itself along one axis in the design tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum LayoutSizing {
    /// Fixed design size.
    #[default]
    Fixed,
    /// Shrinks to content.
    Hug,
    /// Fills the parent.
    Fill,
}

/// Arc meter: a dial whose sweep follows a value.
#[derive(Clone, Copy, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ArcMeter {
    /// Start angle in degrees.
    pub start: f32,
    /// End angle in degrees.
    pub end: f32,
    /// Snap to discrete steps.
    pub discrete: bool,
    /// Step size when discrete.
    pub discrete_value: f32,
    /// Rounded end radius.
    pub corner_radius: f32,
}

/// Rotation meter: a needle rotated by a value.
#[derive(Clone, Copy, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct RotationMeter {
    /// Rotation at 0%, in degrees.
    pub start: f32,
    /// Rotation at 100%, in degrees.
    pub end: f32,
    /// Snap to discrete steps.
    pub discrete: bool,
    /// Step size when discrete.
    pub discrete_value: f32,
}

/// Progress bar meter.
#[derive(Clone, Copy, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ProgressBarMeter {
    /// Snap to discrete steps.
    pub discrete: bool,
    /// Step size when discrete.
    pub discrete_value: f32,
    /// Fill vertically instead of horizontally.
    pub vertical: bool,
    /// Bar end x in design space.
    pub end_x: f32,
    /// Bar end y in design space.
    pub end_y: f32,
}

/// Dials and gauges data attached by the design plugin.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum MeterData {
    /// Arc dial.
    Arc(ArcMeter),
    /// Rotating needle.
    Rotation(RotationMeter),
    /// Progress bar.
    ProgressBar(ProgressBarMeter),
}

/// Value of one shader uniform.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum UniformValue {
    /// Scalar float.
    Float(f32),
    /// Float vector (vec2..vec4, color).
    Floats(Vec<f32>),
    /// Integer.
    Int(i32),
}

/// Named shader uniform.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShaderUniform {
    /// Uniform name as declared in the shader source.
    pub name: String,
    /// Current value.
    pub value: UniformValue,
}

/// Runtime shader paint attached to a node.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShaderData {
    /// Shader source text.
    pub source: String,
    /// Uniform values.
    pub uniforms: Vec<ShaderUniform>,
    /// Time-varying shader that is redrawn every frame.
    pub live: bool,
}

impl ShaderData {
    /// Stable hash of the shader source.
    pub fn source_hash(&self) -> u64 {
        crate::foundation::hash::hash_bytes(self.source.as_bytes())
    }
}

/// Grid span hint for one content item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct GridSpan {
    /// Number of grid cells spanned.
    pub span: u32,
    /// Span the whole row/column regardless of `span`.
    pub max_span: bool,
}

impl Default for GridSpan {
    fn default() -> Self {
        Self {
            span: 1,
            max_span: false,
        }
    }
}

/// Paint attributes: fills, strokes, shadows, text, transform, opacity, meters and shaders.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeStyle {
    /// Background paints, bottom first.
    pub fills: Vec<Fill>,
    /// Outline.
    pub stroke: Stroke,
    /// Shadows.
    pub box_shadows: Vec<BoxShadow>,
    /// Corner radii: top-left, top-right, bottom-right, bottom-left.
    pub corner_radius: [f32; 4],
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Transform relative to the laid-out position.
    pub transform: Option<Affine>,
    /// Compositing mode.
    pub blend_mode: BlendMode,
    /// Text color.
    pub text_color: Color,
    /// Font size in points.
    pub font_size: f32,
    /// Font family.
    pub font_family: Option<String>,
    /// Font weight (100..900).
    pub font_weight: f32,
    /// Italic text.
    pub italic: bool,
    /// Line height.
    pub line_height: LineHeight,
    /// Extra spacing between letters.
    pub letter_spacing: Option<f32>,
    /// Horizontal text alignment.
    pub text_align: TextAlign,
    /// Maximum line count, `None` for unlimited.
    pub line_count: Option<u32>,
    /// Horizontal sizing mode.
    pub horizontal_sizing: LayoutSizing,
    /// Vertical sizing mode.
    pub vertical_sizing: LayoutSizing,
    /// Size of the node in the design tool.
    pub node_size: Size,
    /// Dial/gauge data.
    pub meter: Option<MeterData>,
    /// Shader paint.
    pub shader: Option<ShaderData>,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            fills: Vec::new(),
            stroke: Stroke::default(),
            box_shadows: Vec::new(),
            corner_radius: [0.0; 4],
            opacity: 1.0,
            transform: None,
            blend_mode: BlendMode::PassThrough,
            text_color: Color::BLACK,
            font_size: 18.0,
            font_family: None,
            font_weight: 400.0,
            italic: false,
            line_height: LineHeight::Percent(1.0),
            letter_spacing: None,
            text_align: TextAlign::Left,
            line_count: None,
            horizontal_sizing: LayoutSizing::Fixed,
            vertical_sizing: LayoutSizing::Fixed,
            node_size: Size::ZERO,
            meter: None,
            shader: None,
        }
    }
}

/// Complete style of a view.
#[derive(Clone, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ViewStyle {
    /// Attributes for the layout engine.
    pub layout: LayoutStyle,
    /// Attributes for the painter.
    pub node: NodeStyle,
}

/// Field-level patch over [`NodeStyle`].
#[derive(Clone, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct StyleOverride {
    /// Replaces [`NodeStyle::fills`].
    pub fills: Option<Vec<Fill>>,
    /// Replaces [`NodeStyle::stroke`].
    pub stroke: Option<Stroke>,
    /// Replaces [`NodeStyle::box_shadows`].
    pub box_shadows: Option<Vec<BoxShadow>>,
    /// Replaces [`NodeStyle::corner_radius`].
    pub corner_radius: Option<[f32; 4]>,
    /// Replaces [`NodeStyle::opacity`].
    pub opacity: Option<f32>,
    /// Replaces [`NodeStyle::transform`].
    pub transform: Option<Affine>,
    /// Replaces [`NodeStyle::blend_mode`].
    pub blend_mode: Option<BlendMode>,
    /// Replaces [`NodeStyle::text_color`].
    pub text_color: Option<Color>,
    /// Replaces [`NodeStyle::font_size`].
    pub font_size: Option<f32>,
    /// Replaces [`NodeStyle::font_family`].
    pub font_family: Option<String>,
    /// Replaces [`NodeStyle::font_weight`].
    pub font_weight: Option<f32>,
    /// Replaces [`NodeStyle::italic`].
    pub italic: Option<bool>,
    /// Replaces [`NodeStyle::line_height`].
    pub line_height: Option<LineHeight>,
    /// Replaces [`NodeStyle::letter_spacing`].
    pub letter_spacing: Option<f32>,
    /// Replaces [`NodeStyle::text_align`].
    pub text_align: Option<TextAlign>,
    /// Replaces [`NodeStyle::line_count`].
    pub line_count: Option<u32>,
    /// Replaces [`NodeStyle::meter`].
    pub meter: Option<MeterData>,
}

macro_rules! patch_fields {
    ($src:expr, $dst:expr; $($field:ident),* $(,)?) => {
        $(
            if let Some(v) = &$src.$field {
                $dst.$field = v.clone();
            }
        )*
    };
}

macro_rules! patch_optional_fields {
    ($src:expr, $dst:expr; $($field:ident),* $(,)?) => {
        $(
            if let Some(v) = &$src.$field {
                $dst.$field = Some(v.clone());
            }
        )*
    };
}

macro_rules! layer_fields {
    ($over:expr, $under:expr; $($field:ident),* $(,)?) => {
        Self {
            $($field: $over.$field.clone().or_else(|| $under.$field.clone()),)*
        }
    };
}

impl StyleOverride {
    /// `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write every set field into `style`, leaving the rest untouched.
    pub fn apply_to(&self, style: &mut NodeStyle) {
        patch_fields!(self, style;
            fills, stroke, box_shadows, corner_radius, opacity, blend_mode, text_color,
            font_size, font_weight, italic, line_height, text_align,
        );
        patch_optional_fields!(self, style;
            transform, font_family, letter_spacing, line_count, meter,
        );
    }

    /// Combine two patches; fields set in `self` win over fields set in `under`.
    pub fn layered_over(&self, under: &StyleOverride) -> StyleOverride {
        layer_fields!(self, under;
            fills, stroke, box_shadows, corner_radius, opacity, transform, blend_mode,
            text_color, font_size, font_family, font_weight, italic, line_height,
            letter_spacing, text_align, line_count, meter,
        )
    }
}

/// Field-level patch over [`LayoutStyle`], used by raw modifier customizations.
#[derive(Clone, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct LayoutOverride {
    /// Replaces [`LayoutStyle::display`].
    pub display: Option<Display>,
    /// Replaces [`LayoutStyle::position_type`].
    pub position_type: Option<PositionType>,
    /// Replaces [`LayoutStyle::inset`].
    pub inset: Option<Edges<Dimension>>,
    /// Replaces [`LayoutStyle::margin`].
    pub margin: Option<Edges<Dimension>>,
    /// Replaces [`LayoutStyle::padding`].
    pub padding: Option<Edges<Dimension>>,
    /// Replaces [`LayoutStyle::flex_grow`].
    pub flex_grow: Option<f32>,
    /// Replaces [`LayoutStyle::flex_shrink`].
    pub flex_shrink: Option<f32>,
    /// Replaces [`LayoutStyle::width`].
    pub width: Option<Dimension>,
    /// Replaces [`LayoutStyle::height`].
    pub height: Option<Dimension>,
    /// Replaces [`LayoutStyle::min_width`].
    pub min_width: Option<Dimension>,
    /// Replaces [`LayoutStyle::min_height`].
    pub min_height: Option<Dimension>,
    /// Replaces [`LayoutStyle::max_width`].
    pub max_width: Option<Dimension>,
    /// Replaces [`LayoutStyle::max_height`].
    pub max_height: Option<Dimension>,
}

impl LayoutOverride {
    /// Write every set field into `style`, leaving the rest untouched.
    pub fn apply_to(&self, style: &mut LayoutStyle) {
        patch_fields!(self, style;
            display, position_type, inset, margin, padding, flex_grow, flex_shrink,
            width, height, min_width, min_height, max_width, max_height,
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/style.rs"]
mod tests;
