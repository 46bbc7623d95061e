/// Settling threshold for springs: distance from the target and residual velocity.
const SPRING_EPSILON: f64 = 1e-3;

/// Easing curves used to map animation progress.
///
/// Every curve except [`Easing::Spring`] maps normalized progress to normalized output. A spring
/// runs in seconds and decides its own duration; see [`Easing::settle_time`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
    /// CSS-style cubic bezier through `(0,0)`, `(x1,y1)`, `(x2,y2)`, `(1,1)`.
    CubicBezier {
        /// First control point x, clamped to `[0, 1]`.
        x1: f64,
        /// First control point y.
        y1: f64,
        /// Second control point x, clamped to `[0, 1]`.
        x2: f64,
        /// Second control point y.
        y2: f64,
    },
    /// Unit-mass damped spring released from rest.
    Spring {
        /// `1.0` is critically damped; smaller values overshoot.
        damping_ratio: f64,
        /// Spring constant.
        stiffness: f64,
    },
    /// Jumps in `n` equal steps, holding each value until the next step.
    Steps {
        /// Number of steps; zero behaves like one.
        n: u32,
    },
}

impl Default for Easing {
    fn default() -> Self {
        Self::OutCubic
    }
}

impl Easing {
    /// Apply this curve to normalized progress `t` in `[0, 1]`.
    ///
    /// A spring is sampled over its settle time, so `t = 1` is the settled state.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, t),
            Self::Spring {
                damping_ratio,
                stiffness,
            } => {
                if t >= 1.0 {
                    return 1.0;
                }
                let spring = SpringParams::new(damping_ratio, stiffness);
                spring.position(t * spring.settle_time())
            }
            Self::Steps { n } => {
                if t >= 1.0 {
                    return 1.0;
                }
                let n = f64::from(n.max(1));
                (t * n).floor() / n
            }
        }
    }

    /// Seconds a spring needs to settle, `None` for curves driven by an explicit duration.
    pub fn settle_time(self) -> Option<f64> {
        match self {
            Self::Spring {
                damping_ratio,
                stiffness,
            } => Some(SpringParams::new(damping_ratio, stiffness).settle_time()),
            _ => None,
        }
    }
}

/// Timing of one animated item.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationSpec {
    /// Curve.
    pub easing: Easing,
    /// Seconds; ignored by springs.
    pub duration: f64,
    /// Seconds before the item starts moving.
    pub delay: f64,
}

impl AnimationSpec {
    /// Seconds from start of delay to end of motion.
    pub fn total(&self) -> f64 {
        self.delay.max(0.0) + self.span()
    }

    fn span(&self) -> f64 {
        self.easing
            .settle_time()
            .unwrap_or(self.duration)
            .max(0.0)
    }

    /// Eased progress at `elapsed` seconds since the transition started.
    pub fn progress(&self, elapsed: f64) -> f64 {
        let local = elapsed - self.delay.max(0.0);
        if local <= 0.0 {
            return self.easing.apply(0.0);
        }
        let span = self.span();
        if span <= 0.0 || local >= span {
            return 1.0;
        }
        self.easing.apply(local / span)
    }

    /// `true` once this item reached its end state.
    pub fn is_finished(&self, elapsed: f64) -> bool {
        elapsed >= self.total()
    }
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let x1 = x1.clamp(0.0, 1.0);
    let x2 = x2.clamp(0.0, 1.0);
    let bez = |p1: f64, p2: f64, s: f64| {
        let u = 1.0 - s;
        3.0 * u * u * s * p1 + 3.0 * u * s * s * p2 + s * s * s
    };
    let bez_dx = |s: f64| {
        let u = 1.0 - s;
        3.0 * u * u * x1 + 6.0 * u * s * (x2 - x1) + 3.0 * s * s * (1.0 - x2)
    };

    // Newton first, bisection when the slope is too flat.
    let mut s = t;
    for _ in 0..8 {
        let err = bez(x1, x2, s) - t;
        if err.abs() < 1e-7 {
            return bez(y1, y2, s);
        }
        let d = bez_dx(s);
        if d.abs() < 1e-6 {
            break;
        }
        s = (s - err / d).clamp(0.0, 1.0);
    }
    let (mut lo, mut hi) = (0.0, 1.0);
    s = t;
    for _ in 0..40 {
        let x = bez(x1, x2, s);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    bez(y1, y2, s)
}

#[derive(Clone, Copy, Debug)]
struct SpringParams {
    zeta: f64,
    omega: f64,
}

impl SpringParams {
    fn new(damping_ratio: f64, stiffness: f64) -> Self {
        // Undamped or degenerate springs never settle.
        let zeta = if damping_ratio.is_finite() {
            damping_ratio.max(0.05)
        } else {
            1.0
        };
        let k = if stiffness.is_finite() && stiffness > 0.0 {
            stiffness
        } else {
            100.0
        };
        Self {
            zeta,
            omega: k.sqrt(),
        }
    }

    /// Displacement toward 1.0 after `t` seconds.
    fn position(self, t: f64) -> f64 {
        let Self { zeta, omega } = self;
        if (zeta - 1.0).abs() < 1e-6 {
            1.0 - (-omega * t).exp() * (1.0 + omega * t)
        } else if zeta < 1.0 {
            let wd = omega * (1.0 - zeta * zeta).sqrt();
            let env = (-zeta * omega * t).exp();
            1.0 - env * ((wd * t).cos() + (zeta * omega / wd) * (wd * t).sin())
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            1.0 - (r2 * (r1 * t).exp() - r1 * (r2 * t).exp()) / (r2 - r1)
        }
    }

    fn settle_time(self) -> f64 {
        let Self { zeta, omega } = self;
        let rate = if zeta < 1.0 {
            zeta * omega
        } else {
            omega * (zeta - (zeta * zeta - 1.0).sqrt())
        };
        let mut t = -SPRING_EPSILON.ln() / rate;
        let step = t * 0.05;
        for _ in 0..200 {
            let dx = self.position(t + 1e-4) - self.position(t);
            if (1.0 - self.position(t)).abs() < SPRING_EPSILON && (dx / 1e-4).abs() < SPRING_EPSILON * 10.0 {
                break;
            }
            t += step;
        }
        t
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
