//! Transition animations between two laid-out render trees.
//!
//! [`merge::merge`] pairs the nodes of a "from" and a "to" tree and produces a transition tree
//! with one [`tween::AnimatedItem`] per animated property. A [`transition::TransitionDriver`]
//! advances that tree from an external clock.

pub(crate) mod ease;
pub(crate) mod merge;
pub(crate) mod transition;
pub(crate) mod tween;
