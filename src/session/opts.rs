use crate::animation::transition::TransitionSpec;
use crate::foundation::core::Size;
use crate::foundation::error::{DesignError, DesignResult};

/// Options for a [`DesignSession`](crate::session::design_session::DesignSession).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionOpts {
    /// Space available to the root of every rendered tree.
    pub viewport: Size,
    /// Timing for transitions requested without an explicit spec.
    pub transition: TransitionSpec,
    /// Cache host text measurements across frames.
    pub text_cache_enabled: bool,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            viewport: Size::new(1280.0, 720.0),
            transition: TransitionSpec::default(),
            text_cache_enabled: true,
        }
    }
}

impl SessionOpts {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> DesignResult<Self> {
        let opts: Self = serde_json::from_str(json)
            .map_err(|e| DesignError::config(format!("invalid session options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Check the options, failing with [`DesignError::Config`].
    pub fn validate(&self) -> DesignResult<()> {
        let Size { width, height } = self.viewport;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(DesignError::config(format!(
                "viewport must be positive and finite, got {width}x{height}"
            )));
        }
        self.transition.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/opts.rs"]
mod tests;
