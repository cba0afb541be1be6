/// Rectified linear unit, `max(0, z)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Relu;

impl Relu {
    pub fn new() -> Self {
        Self
    }

    pub fn f(&self, z: f32) -> f32 {
        z.max(0.)
    }

    /// The derivative evaluated on the *activated* value `a = f(z)`.
    ///
    /// It is one only where the unit fired strictly above zero, a unit sitting exactly at zero
    /// doesn't let any gradient through.
    pub fn df(&self, a: f32) -> f32 {
        if a > 0. { 1. } else { 0. }
    }
}
