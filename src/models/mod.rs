pub mod diagnosis;
pub mod disease;
pub mod symptom;

pub use diagnosis::*;
pub use disease::*;
pub use symptom::*;
