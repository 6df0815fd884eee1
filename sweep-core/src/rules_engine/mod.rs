mod engine;
pub mod rules;

pub use engine::{classify, verdict};
pub use rules::CipherRules;
