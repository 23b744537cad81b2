/// Keyboard-to-action dispatch
use crossterm::event::KeyCode;
use nalgebra::Vector3;
use plater_core::Mode;

/// Drag step per key press in each mode
pub const TRANSLATE_STEP: f32 = 5.0;
pub const ROTATE_STEP: f32 = 0.1;
pub const SCALE_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    SelectMode(Mode),
    /// One step along an axis; `sign` is +1 or -1
    Drag { axis: Axis, sign: f32 },
    Reset,
    LowerToGround,
    Export,
    Quit,
}

pub fn action_for_key(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('t') => Action::SelectMode(Mode::Translate),
        KeyCode::Char('r') => Action::SelectMode(Mode::Rotate),
        KeyCode::Char('s') => Action::SelectMode(Mode::Scale),
        KeyCode::Char('x') => Action::Reset,
        KeyCode::Char('g') => Action::LowerToGround,
        KeyCode::Char('e') => Action::Export,
        KeyCode::Left => Action::Drag { axis: Axis::X, sign: -1.0 },
        KeyCode::Right => Action::Drag { axis: Axis::X, sign: 1.0 },
        KeyCode::Up => Action::Drag { axis: Axis::Z, sign: 1.0 },
        KeyCode::Down => Action::Drag { axis: Axis::Z, sign: -1.0 },
        KeyCode::PageUp => Action::Drag { axis: Axis::Y, sign: 1.0 },
        KeyCode::PageDown => Action::Drag { axis: Axis::Y, sign: -1.0 },
        _ => return None,
    };
    Some(action)
}

/// Delta vector for one drag step in the given mode
pub fn drag_delta(mode: Mode, axis: Axis, sign: f32) -> Vector3<f32> {
    let step = match mode {
        Mode::Translate => TRANSLATE_STEP,
        Mode::Rotate => ROTATE_STEP,
        Mode::Scale => SCALE_STEP,
    } * sign;

    match axis {
        Axis::X => Vector3::new(step, 0.0, 0.0),
        Axis::Y => Vector3::new(0.0, step, 0.0),
        Axis::Z => Vector3::new(0.0, 0.0, step),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_keys() {
        assert_eq!(action_for_key(KeyCode::Char('t')), Some(Action::SelectMode(Mode::Translate)));
        assert_eq!(action_for_key(KeyCode::Char('r')), Some(Action::SelectMode(Mode::Rotate)));
        assert_eq!(action_for_key(KeyCode::Char('s')), Some(Action::SelectMode(Mode::Scale)));
    }

    #[test]
    fn test_unmapped_key() {
        assert_eq!(action_for_key(KeyCode::Char('z')), None);
        assert_eq!(action_for_key(KeyCode::Tab), None);
    }

    #[test]
    fn test_drag_delta_per_mode() {
        assert_eq!(drag_delta(Mode::Translate, Axis::X, -1.0), Vector3::new(-5.0, 0.0, 0.0));
        assert_eq!(drag_delta(Mode::Rotate, Axis::Y, 1.0), Vector3::new(0.0, 0.1, 0.0));
        assert_eq!(drag_delta(Mode::Scale, Axis::Z, -1.0), Vector3::new(0.0, 0.0, -0.1));
    }
}
