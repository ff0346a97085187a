//! Canned functions that can be overlaid on the precipitation chart.

use crate::models::{Curve, CurveKind};

/// Samples drawn for an overlaid function unless told otherwise.
pub const DEFAULT_SAMPLES: usize = 400;

/// Label shown in front-ends when no function is selected. Not a registry entry.
pub const NO_FUNCTION: &str = "(aucune)";

/// A registered function of one real variable over a fixed domain.
#[derive(Debug, Clone, Copy)]
pub struct FunctionDef {
    pub label: &'static str,
    pub f: fn(f64) -> f64,
    pub domain: (f64, f64),
}

fn square(x: f64) -> f64 {
    x * x
}

fn sine(x: f64) -> f64 {
    x.sin()
}

/// First three odd harmonics of a square wave.
fn square_wave(x: f64) -> f64 {
    x.sin() + (3.0 * x).sin() / 3.0 + (5.0 * x).sin() / 5.0
}

fn x_sin_x(x: f64) -> f64 {
    x * x.sin()
}

pub static REGISTRY: [FunctionDef; 4] = [
    FunctionDef {
        label: "x^2",
        f: square,
        domain: (-10.0, 10.0),
    },
    FunctionDef {
        label: "sin(x)",
        f: sine,
        domain: (-10.0, 10.0),
    },
    FunctionDef {
        label: "sin(x)+sin(3x)/3+sin(5x)/5",
        f: square_wave,
        domain: (-10.0, 10.0),
    },
    FunctionDef {
        label: "x*sin(x)",
        f: x_sin_x,
        domain: (-10.0, 10.0),
    },
];

pub fn labels() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|d| d.label)
}

pub fn from_label(label: &str) -> Option<&'static FunctionDef> {
    REGISTRY.iter().find(|d| d.label == label)
}

/// `max(n, 2)` evenly spaced values over `[a, b]`, both ends included.
pub fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    let n = n.max(2);
    let last = (n - 1) as f64;
    (0..n).map(|i| a + (b - a) * i as f64 / last).collect()
}

impl FunctionDef {
    pub fn sample(&self, n: usize) -> Vec<(f64, f64)> {
        let (a, b) = self.domain;
        linspace(a, b, n)
            .into_iter()
            .map(|x| (x, (self.f)(x)))
            .collect()
    }

    pub fn curve(&self, n: usize) -> Curve {
        Curve {
            name: self.label.to_string(),
            kind: CurveKind::Function,
            points: self.sample(n).into_iter().map(|(x, y)| (x, Some(y))).collect(),
        }
    }
}

/// Sample the function registered under `label`; unknown labels give no curve.
pub fn sample(label: &str, n: usize) -> Option<Curve> {
    from_label(label).map(|def| def.curve(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_endpoints() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(-10.0, 10.0, 0), vec![-10.0, 10.0]);
        assert_eq!(linspace(-10.0, 10.0, 1), vec![-10.0, 10.0]);
    }

    #[test]
    fn placeholder_is_not_registered() {
        assert!(from_label(NO_FUNCTION).is_none());
        assert_eq!(labels().count(), 4);
    }
}
