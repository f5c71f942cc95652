//! Questionnaire session state

mod questionnaire;
mod review;
mod validation;
mod values;
mod visibility;

pub use questionnaire::*;
pub use review::*;
pub use validation::*;
pub use values::*;
pub use visibility::*;
