use crate::sim::{TurnIntent, WalkIntent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    WalkForward,
    WalkBackward,
    TurnLeft,
    TurnRight,
    Fire,
    Quit,
}

const ACTION_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    /// Held forward/backward keys collapse to one walk flag; both held
    /// cancels out.
    pub(crate) fn walk_intent(&self) -> WalkIntent {
        match (
            self.is_down(InputAction::WalkForward),
            self.is_down(InputAction::WalkBackward),
        ) {
            (true, false) => WalkIntent::Forward,
            (false, true) => WalkIntent::Backward,
            _ => WalkIntent::Stop,
        }
    }

    pub(crate) fn turn_intent(&self) -> TurnIntent {
        match (
            self.is_down(InputAction::TurnLeft),
            self.is_down(InputAction::TurnRight),
        ) {
            (true, false) => TurnIntent::Left,
            (false, true) => TurnIntent::Right,
            _ => TurnIntent::Straight,
        }
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::WalkForward => 0,
            InputAction::WalkBackward => 1,
            InputAction::TurnLeft => 2,
            InputAction::TurnRight => 3,
            InputAction::Fire => 4,
            InputAction::Quit => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_query_round_trip() {
        let mut states = ActionStates::default();
        states.set(InputAction::Fire, true);
        assert!(states.is_down(InputAction::Fire));
        states.set(InputAction::Fire, false);
        assert!(!states.is_down(InputAction::Fire));
    }

    #[test]
    fn single_held_key_maps_to_its_intent() {
        let mut states = ActionStates::default();
        states.set(InputAction::WalkForward, true);
        states.set(InputAction::TurnRight, true);
        assert_eq!(states.walk_intent(), WalkIntent::Forward);
        assert_eq!(states.turn_intent(), TurnIntent::Right);
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut states = ActionStates::default();
        states.set(InputAction::WalkForward, true);
        states.set(InputAction::WalkBackward, true);
        states.set(InputAction::TurnLeft, true);
        states.set(InputAction::TurnRight, true);
        assert_eq!(states.walk_intent(), WalkIntent::Stop);
        assert_eq!(states.turn_intent(), TurnIntent::Straight);
    }
}
