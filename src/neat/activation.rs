//! Node activation functions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Sigmoid,
    Tanh,
    Relu,
    Identity,
}

impl Activation {
    /// Sigmoid and tanh scale their input (by 5 and 2.5) and clamp it to
    /// ±60 first.
    pub fn apply(self, z: f64) -> f64 {
        match self {
            Activation::Sigmoid => {
                let z = (5.0 * z).clamp(-60.0, 60.0);
                1.0 / (1.0 + (-z).exp())
            }
            Activation::Tanh => (2.5 * z).clamp(-60.0, 60.0).tanh(),
            Activation::Relu => z.max(0.0),
            Activation::Identity => z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoints() {
        assert_eq!(Activation::Sigmoid.apply(0.0), 0.5);
        assert_eq!(Activation::Tanh.apply(0.0), 0.0);
        assert_eq!(Activation::Relu.apply(-3.0), 0.0);
        assert_eq!(Activation::Identity.apply(-3.0), -3.0);
    }

    #[test]
    fn test_scaled_inputs() {
        assert!((Activation::Tanh.apply(0.2) - 0.5f64.tanh()).abs() < 1e-12);
        assert!((Activation::Sigmoid.apply(0.2) - 1.0 / (1.0 + (-1.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_saturation() {
        assert_eq!(Activation::Tanh.apply(1e6), 1.0);
        assert!(Activation::Sigmoid.apply(-1e6) < 1e-20);
    }
}
