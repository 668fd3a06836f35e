//! The application views and the navigation graph between them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// The screen the application is showing. Exactly one is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    Login,
    Register,
    Dashboard,
    Groups,
    AdminPanel,
    ExamCreator,
    ExamTaker,
    Profile,
    ImageEditor,
}

impl View {
    pub const ALL: [View; 9] = [
        View::Login,
        View::Register,
        View::Dashboard,
        View::Groups,
        View::AdminPanel,
        View::ExamCreator,
        View::ExamTaker,
        View::Profile,
        View::ImageEditor,
    ];

    /// Views reachable without a signed-in user.
    pub fn is_public(&self) -> bool {
        matches!(self, View::Login | View::Register)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            View::Login => "LOGIN",
            View::Register => "REGISTER",
            View::Dashboard => "DASHBOARD",
            View::Groups => "GROUPS",
            View::AdminPanel => "ADMIN_PANEL",
            View::ExamCreator => "EXAM_CREATOR",
            View::ExamTaker => "EXAM_TAKER",
            View::Profile => "PROFILE",
            View::ImageEditor => "IMAGE_EDITOR",
        };
        write!(f, "{}", s)
    }
}

impl StateMachine for View {
    /// Static user-triggered edges. Staying on the same view is always
    /// allowed; runtime preconditions are checked by the router.
    fn can_transition_to(&self, target: &Self) -> bool {
        use View::*;

        if self == target {
            return true;
        }
        match (self, target) {
            (Login, Register) | (Register, Login) => true,
            (Login | Register, Dashboard) => true,
            (Login | Register, _) => false,
            // Logo, back buttons, avatar and sign-out are on every screen.
            (_, Dashboard | Profile | Login) => true,
            (Dashboard, Groups | AdminPanel | ImageEditor) => true,
            (Groups, ExamCreator | ExamTaker) => true,
            _ => false,
        }
    }

    fn valid_transitions(&self) -> Vec<Self> {
        View::ALL
            .into_iter()
            .filter(|target| target != self && self.can_transition_to(target))
            .collect()
    }
}
