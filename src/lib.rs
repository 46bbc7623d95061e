//! Designtree turns serialized design documents into laid-out render trees.
//!
//! The public API is session-oriented:
//!
//! - Decode a [`Document`] from its binary envelope (or build one with [`DocumentBuilder`])
//! - Open a [`DesignSession`] over it
//! - Render a [`NodeQuery`] with a [`CustomizationContext`] into a [`RenderTree`]
//! - Animate between successive trees with [`DesignSession::transition_to`] and
//!   [`DesignSession::tick`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod codec;
pub(crate) mod customize;
/// Authored document model.
pub mod document;
pub(crate) mod layout;
pub(crate) mod resolve;
pub(crate) mod session;
pub(crate) mod tree;

pub use crate::foundation::core::{Affine, BezPath, Color, LayoutId, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{DesignError, DesignResult, FormatError};

pub use crate::codec::decode::{EnvelopeHeader, decode, peek_header};
pub use crate::codec::encode::encode;
pub use crate::codec::{DOC_MAGIC, HEADER_LEN, MAX_NESTING, SUPPORTED_DOC_VERSION};

pub use crate::document::dsl::{DocumentBuilder, ViewBuilder};
pub use crate::document::model::{
    ComponentInfo, ComponentOverrides, ComponentRole, ComponentSetInfo, ContentOverride,
    Document, DocumentHeader, NodeData, PathData, ShapeKind, StrokeCap, StyledTextRun,
    TextRunStyle, View, ViewShape, WindingRule,
};
pub use crate::document::query::{
    NodeQuery, UNIT_SEPARATOR, canonical_key_from_properties, canonical_variant_key,
    parse_variant_properties, variant_from_properties,
};
pub use crate::document::style::{
    LayoutOverride, LayoutStyle, NodeStyle, ShaderData, ShaderUniform, StyleOverride,
    UniformValue, ViewStyle,
};

pub use crate::customize::apply::{apply, apply_view};
pub use crate::customize::context::{
    CustomizationContext, ImageData, ListContent, ListItem, NodeCustomization, ReplacementToken,
    SpanFn,
};
pub use crate::resolve::resolver::Resolver;
pub use crate::tree::arena::{
    Children, NodeHandle, NodeOrigin, RenderContent, RenderNode, RenderTree,
};

pub use crate::layout::bridge::{
    LayoutNode, LayoutNodeList, LayoutPass, ParentChildren, apply_layout, flatten, flatten_from,
    layout_tree,
};
pub use crate::layout::cache::{CacheStats, FrameCaches, GenerationalCache};
pub use crate::layout::paths::shape_path;
pub use crate::layout::taffy_bridge::TaffyLayoutEngine;
pub use crate::layout::{
    ComputedLayout, LayoutChanges, LayoutEngine, MeasureConstraints, MeasureFn, TextMeasure,
};

pub use crate::animation::ease::{AnimationSpec, Easing};
pub use crate::animation::merge::{merge, merge_target};
pub use crate::animation::transition::{
    Transition, TransitionDriver, TransitionSpec, TransitionState,
};
pub use crate::animation::tween::{AnimatedItem, ArcAngles, Decomposed, Lerp, Tween};

pub use crate::session::design_session::{DesignSession, FrameStats};
pub use crate::session::opts::SessionOpts;
