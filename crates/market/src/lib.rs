pub mod categories;
pub mod levels;
pub mod normalizer;

pub use categories::categorize;
pub use normalizer::{momentum_score, normalize};
