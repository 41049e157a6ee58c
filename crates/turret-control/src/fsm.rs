//! Behavior state machine.
//!
//! Pure function of the current state and whether a target is held.
//! Callers run entry/exit side effects only when `changed` is set.

use turret_core::enums::BehaviorState;

/// Output of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: BehaviorState,
    pub changed: bool,
}

/// Evaluate the FSM for one tick.
pub fn evaluate(state: BehaviorState, has_target: bool) -> Transition {
    match state {
        BehaviorState::Idle => evaluate_idle(has_target),
        BehaviorState::Attack => evaluate_attack(has_target),
    }
}

fn evaluate_idle(has_target: bool) -> Transition {
    if has_target {
        return Transition {
            next: BehaviorState::Attack,
            changed: true,
        };
    }
    Transition {
        next: BehaviorState::Idle,
        changed: false,
    }
}

fn evaluate_attack(has_target: bool) -> Transition {
    if !has_target {
        return Transition {
            next: BehaviorState::Idle,
            changed: true,
        };
    }
    Transition {
        next: BehaviorState::Attack,
        changed: false,
    }
}
