//! Wire encodings of the style and model value types.
//!
//! Views are not listed here: their decoding also feeds the document indexes, see
//! [`super::decode`].

use crate::codec::wire::{Wire, WireReader, WireWriter, wire_struct, wire_unit_enum};
use crate::document::model::{
    ComponentInfo, ComponentOverrides, ComponentRole, ComponentSetInfo, ContentOverride,
    DocumentHeader, PathData, StrokeCap, StyledTextRun, TextRunStyle, ViewShape, WindingRule,
};
use crate::document::style::{
    AlignContent, AlignItems, AlignSelf, ArcMeter, BlendMode, BoxShadow, Dimension, Display, Edges,
    Fill, FlexDirection, FlexWrap, GradientStop, JustifyContent, LayoutSizing, LayoutStyle,
    LineHeight, MeterData, NodeStyle, PositionType, ProgressBarMeter, RotationMeter, ScaleMode,
    ShaderData, ShaderUniform, Stroke, StrokeAlign, StyleOverride, TextAlign, UniformValue,
    ViewStyle,
};
use crate::foundation::error::FormatError;

wire_unit_enum!(Display, "display" { 0 => Flex, 1 => None });
wire_unit_enum!(PositionType, "position type" { 0 => Relative, 1 => Absolute });
wire_unit_enum!(FlexDirection, "flex direction" {
    0 => Row, 1 => Column, 2 => RowReverse, 3 => ColumnReverse,
});
wire_unit_enum!(FlexWrap, "flex wrap" { 0 => NoWrap, 1 => Wrap, 2 => WrapReverse });
wire_unit_enum!(AlignItems, "align items" {
    0 => FlexStart, 1 => FlexEnd, 2 => Center, 3 => Stretch, 4 => Baseline,
});
wire_unit_enum!(AlignSelf, "align self" {
    0 => Auto, 1 => FlexStart, 2 => FlexEnd, 3 => Center, 4 => Stretch, 5 => Baseline,
});
wire_unit_enum!(AlignContent, "align content" {
    0 => FlexStart, 1 => FlexEnd, 2 => Center, 3 => Stretch, 4 => SpaceBetween, 5 => SpaceAround,
});
wire_unit_enum!(JustifyContent, "justify content" {
    0 => FlexStart, 1 => FlexEnd, 2 => Center, 3 => SpaceBetween, 4 => SpaceAround,
    5 => SpaceEvenly,
});
wire_unit_enum!(ScaleMode, "scale mode" { 0 => Fill, 1 => Fit, 2 => Tile, 3 => Stretch });
wire_unit_enum!(StrokeAlign, "stroke align" { 0 => Inside, 1 => Center, 2 => Outside });
wire_unit_enum!(BlendMode, "blend mode" {
    0 => PassThrough, 1 => Normal, 2 => Multiply, 3 => Screen, 4 => Overlay, 5 => Darken,
    6 => Lighten, 7 => Difference,
});
wire_unit_enum!(TextAlign, "text align" { 0 => Left, 1 => Center, 2 => Right, 3 => Justified });
wire_unit_enum!(LayoutSizing, "layout sizing" { 0 => Fixed, 1 => Hug, 2 => Fill });
wire_unit_enum!(StrokeCap, "stroke cap" { 0 => None, 1 => Round, 2 => Square });
wire_unit_enum!(WindingRule, "winding rule" { 0 => NonZero, 1 => EvenOdd });

impl Wire for Dimension {
    fn write(&self, w: &mut WireWriter) {
        match self {
            Self::Auto => w.write_u8(0),
            Self::Undefined => w.write_u8(1),
            Self::Points(v) => {
                w.write_u8(2);
                w.put(v);
            }
            Self::Percent(v) => {
                w.write_u8(3);
                w.put(v);
            }
        }
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        match r.read_u8("dimension")? {
            0 => Ok(Self::Auto),
            1 => Ok(Self::Undefined),
            2 => Ok(Self::Points(r.get()?)),
            3 => Ok(Self::Percent(r.get()?)),
            tag => Err(FormatError::UnknownTag {
                context: "dimension",
                tag,
            }),
        }
    }
}

impl<T: Wire> Wire for Edges<T> {
    fn write(&self, w: &mut WireWriter) {
        w.put(&self.left);
        w.put(&self.right);
        w.put(&self.top);
        w.put(&self.bottom);
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        Ok(Self {
            left: r.get()?,
            right: r.get()?,
            top: r.get()?,
            bottom: r.get()?,
        })
    }
}

wire_struct!(LayoutStyle {
    display,
    position_type,
    flex_direction,
    flex_wrap,
    align_items,
    align_self,
    align_content,
    justify_content,
    inset,
    margin,
    padding,
    item_spacing,
    cross_axis_item_spacing,
    flex_grow,
    flex_shrink,
    flex_basis,
    width,
    height,
    min_width,
    min_height,
    max_width,
    max_height,
    aspect_ratio,
});

wire_struct!(GradientStop { position, color });

impl Wire for Fill {
    fn write(&self, w: &mut WireWriter) {
        match self {
            Self::Solid(c) => {
                w.write_u8(0);
                w.put(c);
            }
            Self::LinearGradient { start, end, stops } => {
                w.write_u8(1);
                w.put(start);
                w.put(end);
                w.put(stops);
            }
            Self::Image { key, scale_mode } => {
                w.write_u8(2);
                w.put(key);
                w.put(scale_mode);
            }
        }
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        match r.read_u8("fill")? {
            0 => Ok(Self::Solid(r.get()?)),
            1 => Ok(Self::LinearGradient {
                start: r.get()?,
                end: r.get()?,
                stops: r.get()?,
            }),
            2 => Ok(Self::Image {
                key: r.get()?,
                scale_mode: r.get()?,
            }),
            tag => Err(FormatError::UnknownTag { context: "fill", tag }),
        }
    }
}

wire_struct!(Stroke { weight, align, paints });
wire_struct!(BoxShadow { offset, blur, spread, color, inset });

impl Wire for LineHeight {
    fn write(&self, w: &mut WireWriter) {
        let (tag, v) = match self {
            Self::Pixels(v) => (0, v),
            Self::Percent(v) => (1, v),
        };
        w.write_u8(tag);
        w.put(v);
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        match r.read_u8("line height")? {
            0 => Ok(Self::Pixels(r.get()?)),
            1 => Ok(Self::Percent(r.get()?)),
            tag => Err(FormatError::UnknownTag {
                context: "line height",
                tag,
            }),
        }
    }
}

wire_struct!(ArcMeter { start, end, discrete, discrete_value, corner_radius });
wire_struct!(RotationMeter { start, end, discrete, discrete_value });
wire_struct!(ProgressBarMeter { discrete, discrete_value, vertical, end_x, end_y });

impl Wire for MeterData {
    fn write(&self, w: &mut WireWriter) {
        match self {
            Self::Arc(m) => {
                w.write_u8(0);
                w.put(m);
            }
            Self::Rotation(m) => {
                w.write_u8(1);
                w.put(m);
            }
            Self::ProgressBar(m) => {
                w.write_u8(2);
                w.put(m);
            }
        }
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        match r.read_u8("meter")? {
            0 => Ok(Self::Arc(r.get()?)),
            1 => Ok(Self::Rotation(r.get()?)),
            2 => Ok(Self::ProgressBar(r.get()?)),
            tag => Err(FormatError::UnknownTag { context: "meter", tag }),
        }
    }
}

impl Wire for UniformValue {
    fn write(&self, w: &mut WireWriter) {
        match self {
            Self::Float(v) => {
                w.write_u8(0);
                w.put(v);
            }
            Self::Floats(v) => {
                w.write_u8(1);
                w.put(v);
            }
            Self::Int(v) => {
                w.write_u8(2);
                w.put(v);
            }
        }
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        match r.read_u8("uniform value")? {
            0 => Ok(Self::Float(r.get()?)),
            1 => Ok(Self::Floats(r.get()?)),
            2 => Ok(Self::Int(r.get()?)),
            tag => Err(FormatError::UnknownTag {
                context: "uniform value",
                tag,
            }),
        }
    }
}

wire_struct!(ShaderUniform { name, value });
wire_struct!(ShaderData { source, uniforms, live });

wire_struct!(NodeStyle {
    fills,
    stroke,
    box_shadows,
    corner_radius,
    opacity,
    transform,
    blend_mode,
    text_color,
    font_size,
    font_family,
    font_weight,
    italic,
    line_height,
    letter_spacing,
    text_align,
    line_count,
    horizontal_sizing,
    vertical_sizing,
    node_size,
    meter,
    shader,
});

wire_struct!(ViewStyle { layout, node });

wire_struct!(StyleOverride {
    fills,
    stroke,
    box_shadows,
    corner_radius,
    opacity,
    transform,
    blend_mode,
    text_color,
    font_size,
    font_family,
    font_weight,
    italic,
    line_height,
    letter_spacing,
    text_align,
    line_count,
    meter,
});

wire_struct!(PathData { data, winding });

impl Wire for ViewShape {
    fn write(&self, w: &mut WireWriter) {
        match self {
            Self::Rect => w.write_u8(0),
            Self::RoundRect { corner_smoothing } => {
                w.write_u8(1);
                w.put(corner_smoothing);
            }
            Self::Path {
                paths,
                strokes,
                stroke_cap,
            } => {
                w.write_u8(2);
                w.put(paths);
                w.put(strokes);
                w.put(stroke_cap);
            }
            Self::Arc {
                paths,
                strokes,
                stroke_cap,
                start_angle_degrees,
                sweep_angle_degrees,
                inner_radius,
                corner_radius,
            } => {
                w.write_u8(3);
                w.put(paths);
                w.put(strokes);
                w.put(stroke_cap);
                w.put(start_angle_degrees);
                w.put(sweep_angle_degrees);
                w.put(inner_radius);
                w.put(corner_radius);
            }
            Self::VectorRect { paths, strokes } => {
                w.write_u8(4);
                w.put(paths);
                w.put(strokes);
            }
        }
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        match r.read_u8("view shape")? {
            0 => Ok(Self::Rect),
            1 => Ok(Self::RoundRect {
                corner_smoothing: r.get()?,
            }),
            2 => Ok(Self::Path {
                paths: r.get()?,
                strokes: r.get()?,
                stroke_cap: r.get()?,
            }),
            3 => Ok(Self::Arc {
                paths: r.get()?,
                strokes: r.get()?,
                stroke_cap: r.get()?,
                start_angle_degrees: r.get()?,
                sweep_angle_degrees: r.get()?,
                inner_radius: r.get()?,
                corner_radius: r.get()?,
            }),
            4 => Ok(Self::VectorRect {
                paths: r.get()?,
                strokes: r.get()?,
            }),
            tag => Err(FormatError::UnknownTag {
                context: "view shape",
                tag,
            }),
        }
    }
}

wire_struct!(TextRunStyle { color, font_size, font_family, font_weight, italic });
wire_struct!(StyledTextRun { text, style });

impl Wire for ContentOverride {
    fn write(&self, w: &mut WireWriter) {
        match self {
            Self::None => w.write_u8(0),
            Self::Text { content, res_name } => {
                w.write_u8(1);
                w.put(content);
                w.put(res_name);
            }
            Self::StyledText { runs, res_name } => {
                w.write_u8(2);
                w.put(runs);
                w.put(res_name);
            }
        }
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        match r.read_u8("content override")? {
            0 => Ok(Self::None),
            1 => Ok(Self::Text {
                content: r.get()?,
                res_name: r.get()?,
            }),
            2 => Ok(Self::StyledText {
                runs: r.get()?,
                res_name: r.get()?,
            }),
            tag => Err(FormatError::UnknownTag {
                context: "content override",
                tag,
            }),
        }
    }
}

wire_struct!(ComponentOverrides { style, content });
wire_struct!(ComponentInfo {
    component_id,
    component_name,
    component_set_name,
    overrides,
});
wire_struct!(ComponentSetInfo { default_member_id });

impl Wire for ComponentRole {
    fn write(&self, w: &mut WireWriter) {
        match self {
            Self::Set(info) => {
                w.write_u8(0);
                w.put(info);
            }
            Self::Instance(info) => {
                w.write_u8(1);
                w.put(info);
            }
        }
    }
    fn read(r: &mut WireReader<'_>) -> Result<Self, FormatError> {
        match r.read_u8("component role")? {
            0 => Ok(Self::Set(r.get()?)),
            1 => Ok(Self::Instance(r.get()?)),
            tag => Err(FormatError::UnknownTag {
                context: "component role",
                tag,
            }),
        }
    }
}

wire_struct!(DocumentHeader { id, name, last_modified, version });
