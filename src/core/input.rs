use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Shoot,
    Reset,
}

impl Action {
    fn index(self) -> usize {
        match self {
            Action::MoveUp => 0,
            Action::MoveDown => 1,
            Action::MoveLeft => 2,
            Action::MoveRight => 3,
            Action::Shoot => 4,
            Action::Reset => 5,
        }
    }

    pub fn from_key(code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Action::MoveUp),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::MoveDown),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Action::MoveLeft),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::MoveRight),
            KeyCode::Char(' ') => Some(Action::Shoot),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Reset),
            _ => None,
        }
    }
}

/// A held action stays pressed for `hold_ticks` ticks after its last press,
/// since not every terminal reports key releases.
#[derive(Debug, Clone)]
pub struct InputState {
    hold: [u32; 6],
    hold_ticks: u32,
    triggers: Vec<Action>,
}

impl InputState {
    pub fn new(hold_ticks: u32) -> Self {
        Self {
            hold: [0; 6],
            hold_ticks: hold_ticks.max(1),
            triggers: Vec::new(),
        }
    }

    pub fn press(&mut self, action: Action) {
        self.hold[action.index()] = self.hold_ticks;
        if !self.triggers.contains(&action) {
            self.triggers.push(action);
        }
    }

    /// Auto-repeat keeps the action held without firing a new trigger.
    pub fn repeat(&mut self, action: Action) {
        self.hold[action.index()] = self.hold_ticks;
    }

    pub fn release(&mut self, action: Action) {
        self.hold[action.index()] = 0;
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.hold[action.index()] > 0
    }

    pub fn triggered(&self, action: Action) -> bool {
        self.triggers.contains(&action)
    }

    pub fn end_tick(&mut self) {
        for h in &mut self.hold {
            *h = h.saturating_sub(1);
        }
        self.triggers.clear();
    }

    pub fn clear(&mut self) {
        self.hold = [0; 6];
        self.triggers.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_holds_for_window_then_decays() {
        let mut input = InputState::new(2);
        input.press(Action::MoveLeft);
        assert!(input.is_pressed(Action::MoveLeft));
        assert!(input.triggered(Action::MoveLeft));
        input.end_tick();
        assert!(input.is_pressed(Action::MoveLeft));
        assert!(!input.triggered(Action::MoveLeft));
        input.end_tick();
        assert!(!input.is_pressed(Action::MoveLeft));
    }

    #[test]
    fn test_release_clears_immediately() {
        let mut input = InputState::new(10);
        input.press(Action::Shoot);
        input.release(Action::Shoot);
        assert!(!input.is_pressed(Action::Shoot));
        // the trigger still fires this tick
        assert!(input.triggered(Action::Shoot));
    }

    #[test]
    fn test_repeat_does_not_retrigger() {
        let mut input = InputState::new(3);
        input.repeat(Action::Shoot);
        assert!(input.is_pressed(Action::Shoot));
        assert!(!input.triggered(Action::Shoot));
    }

    #[test]
    fn test_key_map() {
        assert_eq!(Action::from_key(KeyCode::Left), Some(Action::MoveLeft));
        assert_eq!(Action::from_key(KeyCode::Char('d')), Some(Action::MoveRight));
        assert_eq!(Action::from_key(KeyCode::Char(' ')), Some(Action::Shoot));
        assert_eq!(Action::from_key(KeyCode::Char('R')), Some(Action::Reset));
        assert_eq!(Action::from_key(KeyCode::Char('x')), None);
    }
}
