//! Behaviors attached to modified surfaces.
//!
//! A modified surface carries exactly one behavior variant. Attaching is a
//! variant assignment on the ledger entry plus (for climbable walls) a
//! sensor region; there is no runtime component mutation.

use physics::ColliderHandle;

/// Behavior granted to a surface by the modify-surfaces tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceBehavior {
    /// Wall the player can climb while inside its trigger region.
    Climbable {
        /// Sensor volume wrapping the wall; entering it enables the
        /// locomotion climbing transition.
        region: ColliderHandle,
    },
    /// Floor that bounces the player on contact.
    Bouncy {
        /// Multiplier applied to the player's jump force on bounce.
        multiplier: f32,
    },
}

impl SurfaceBehavior {
    pub fn is_climbable(&self) -> bool {
        matches!(self, SurfaceBehavior::Climbable { .. })
    }

    pub fn is_bouncy(&self) -> bool {
        matches!(self, SurfaceBehavior::Bouncy { .. })
    }

    /// The sensor region backing this behavior, if it has one.
    pub fn region(&self) -> Option<ColliderHandle> {
        match self {
            SurfaceBehavior::Climbable { region } => Some(*region),
            SurfaceBehavior::Bouncy { .. } => None,
        }
    }
}
