//! Arithmetic over scalar centimeter lengths.
//!
//! These functions are pure and perform no validation. Callers reject negative
//! operands and out-of-order subtraction before calling in.

/// Sum of two scalar lengths.
pub fn add(cm_a: f64, cm_b: f64) -> f64 {
    cm_a + cm_b
}

/// Difference of two scalar lengths. The caller guarantees `cm_a >= cm_b`.
pub fn subtract(cm_a: f64, cm_b: f64) -> f64 {
    cm_a - cm_b
}
