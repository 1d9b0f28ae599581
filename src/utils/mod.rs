mod stats;
mod validation;

// Descriptive statistics over f64 samples
pub use stats::{coefficient_of_variation, max, mean, min, pstd};

// Validation operations
pub use validation::{sign_changes, valid_audio};
