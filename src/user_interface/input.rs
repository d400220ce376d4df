use glam::Vec2;

/// Last value reported by an input action and whether the action is still held.
///
/// Fed by `performed`/`canceled` events as they arrive and read once per fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisInput<T> {
    value: T,
    active: bool,
}

impl<T: Copy> AxisInput<T> {
    pub fn performed(&mut self, value: T) {
        self.value = value;
        self.active = true;
    }

    /// Releases the action. The last value is kept but no longer reported.
    pub fn canceled(&mut self) {
        self.active = false;
    }

    /// The held value, or `None` if the action isn't active
    pub fn read(&self) -> Option<T> {
        self.active.then_some(self.value)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Navigation actions polled by the fractal explorer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    pub movement: AxisInput<Vec2>,
    pub rotation: AxisInput<f32>,
    pub zoom: AxisInput<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_hides_value() {
        let mut zoom = AxisInput::<f32>::default();
        assert_eq!(zoom.read(), None);
        zoom.performed(1.);
        assert_eq!(zoom.read(), Some(1.));
        zoom.performed(-1.);
        assert_eq!(zoom.read(), Some(-1.));
        zoom.canceled();
        assert_eq!(zoom.read(), None);
        assert!(!zoom.is_active());
    }
}
