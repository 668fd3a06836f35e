//! State machine trait for enumerated states.
//!
//! Gives a uniform way to ask whether an edge exists between two states and
//! to perform a checked transition. The application view uses it for its
//! static navigation graph; runtime guards (authentication, required slots)
//! are layered on top by the router.

use super::ValidationError;

/// Trait for enums whose values form a state machine.
///
/// ```ignore
/// let next = View::Dashboard.transition_to(View::Groups)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }
}
