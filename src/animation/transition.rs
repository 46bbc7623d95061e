use crate::animation::ease::{AnimationSpec, Easing};
use crate::animation::merge::merge;
use crate::animation::tween::AnimatedItem;
use crate::foundation::error::{DesignError, DesignResult};
use crate::tree::arena::RenderTree;

/// Default timing for the items of one transition, in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransitionSpec {
    /// Curve shared by all items.
    pub easing: Easing,
    /// Duration of non-spring curves.
    pub duration: f64,
    /// Delay before any item starts.
    pub delay: f64,
    /// Extra delay for nodes that fade in.
    pub enter_delay: f64,
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self {
            easing: Easing::default(),
            duration: 0.3,
            delay: 0.0,
            enter_delay: 0.0,
        }
    }
}

impl TransitionSpec {
    /// Timing for matched and outgoing nodes.
    pub fn item(&self) -> AnimationSpec {
        AnimationSpec {
            easing: self.easing,
            duration: self.duration,
            delay: self.delay,
        }
    }

    /// Timing for nodes that fade in.
    pub fn enter_item(&self) -> AnimationSpec {
        AnimationSpec {
            delay: self.delay + self.enter_delay,
            ..self.item()
        }
    }

    /// Reject negative or non-finite timings and degenerate springs.
    pub fn validate(&self) -> DesignResult<()> {
        for (name, v) in [
            ("duration", self.duration),
            ("delay", self.delay),
            ("enter_delay", self.enter_delay),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(DesignError::config(format!(
                    "transition {name} must be finite and >= 0, got {v}"
                )));
            }
        }
        if let Easing::Spring {
            damping_ratio,
            stiffness,
        } = self.easing
        {
            if !(damping_ratio > 0.0 && stiffness > 0.0) {
                return Err(DesignError::config(
                    "spring damping_ratio and stiffness must be > 0",
                ));
            }
        }
        Ok(())
    }
}

/// Transition tree plus the items that animate it.
#[derive(Clone, Debug)]
pub struct Transition {
    tree: RenderTree,
    items: Vec<AnimatedItem>,
}

impl Transition {
    /// Wrap a merged tree and put it in its start state.
    pub fn new(tree: RenderTree, items: Vec<AnimatedItem>) -> Self {
        let mut t = Self { tree, items };
        t.apply(0.0);
        t
    }

    /// Current state of the transition tree.
    pub fn tree(&self) -> &RenderTree {
        &self.tree
    }

    /// Animated items in push order.
    pub fn items(&self) -> &[AnimatedItem] {
        &self.items
    }

    /// Mutate the tree to its state at `elapsed` seconds.
    pub fn apply(&mut self, elapsed: f64) {
        for item in &self.items {
            item.apply(&mut self.tree, elapsed);
        }
    }

    /// `true` when every item is finished; items finish independently because of delays.
    pub fn is_finished(&self, elapsed: f64) -> bool {
        self.items.iter().all(|i| i.is_finished(elapsed))
    }

    /// Seconds until the last item finishes.
    pub fn duration(&self) -> f64 {
        self.items
            .iter()
            .map(|i| i.spec.total())
            .fold(0.0, f64::max)
    }
}

/// Lifecycle of a [`TransitionDriver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionState {
    /// No transition; the current tree is shown as is.
    Idle,
    /// A merge is running.
    Building,
    /// Ticks advance the transition tree.
    Animating,
    /// Every item finished; [`TransitionDriver::finish`] promotes the target.
    Finished,
}

/// Drives transitions between successive trees from one external clock.
#[derive(Debug)]
pub struct TransitionDriver {
    spec: TransitionSpec,
    state: TransitionState,
    current: Option<RenderTree>,
    target: Option<RenderTree>,
    transition: Option<Transition>,
    elapsed: f64,
}

impl TransitionDriver {
    /// Idle driver with no current tree.
    pub fn new(spec: TransitionSpec) -> Self {
        Self {
            spec,
            state: TransitionState::Idle,
            current: None,
            target: None,
            transition: None,
            elapsed: 0.0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Timing applied to the next request.
    pub fn spec(&self) -> &TransitionSpec {
        &self.spec
    }

    /// Timing used by later requests.
    pub fn set_spec(&mut self, spec: TransitionSpec) {
        self.spec = spec;
    }

    /// Seconds since the running transition started.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// The running transition, if any.
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Tree to paint: the transition tree while one exists, else the current tree.
    pub fn tree(&self) -> Option<&RenderTree> {
        match &self.transition {
            Some(t) => Some(t.tree()),
            None => self.current.as_ref(),
        }
    }

    /// Show `tree` without animating, dropping any running transition.
    pub fn present(&mut self, tree: RenderTree) {
        self.drop_transition();
        self.current = Some(tree);
    }

    /// Start a transition from the current tree to `to`.
    ///
    /// Without a current tree `to` is shown directly. A running transition is discarded and the
    /// new one starts from the current tree.
    pub fn request(&mut self, to: RenderTree) -> TransitionState {
        self.drop_transition();
        if self.current.is_none() {
            self.current = Some(to);
            return self.state;
        }
        self.set_state(TransitionState::Building);
        let Some(from) = self.current.as_ref() else {
            return self.state;
        };
        let transition = merge(from, &to, &self.spec);
        self.target = Some(to);
        self.elapsed = 0.0;
        let next = if transition.is_finished(0.0) {
            TransitionState::Finished
        } else {
            TransitionState::Animating
        };
        self.transition = Some(transition);
        self.set_state(next);
        self.state
    }

    /// Advance the clock by `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> TransitionState {
        if self.state != TransitionState::Animating {
            return self.state;
        }
        let Some(transition) = self.transition.as_mut() else {
            return self.state;
        };
        self.elapsed += dt.max(0.0);
        transition.apply(self.elapsed);
        if transition.is_finished(self.elapsed) {
            self.set_state(TransitionState::Finished);
        }
        self.state
    }

    /// Drop the transition tree and make its target the current tree.
    pub fn finish(&mut self) {
        if let Some(target) = self.target.take() {
            self.current = Some(target);
        }
        self.drop_transition();
    }

    /// Abandon the running transition and keep showing the current tree.
    pub fn cancel(&mut self) {
        self.drop_transition();
    }

    fn drop_transition(&mut self) {
        self.transition = None;
        self.target = None;
        self.elapsed = 0.0;
        self.set_state(TransitionState::Idle);
    }

    fn set_state(&mut self, state: TransitionState) {
        if self.state != state {
            tracing::debug!(from = ?self.state, to = ?state, "transition state");
            self.state = state;
        }
    }
}

impl Default for TransitionDriver {
    fn default() -> Self {
        Self::new(TransitionSpec::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/transition.rs"]
mod tests;
