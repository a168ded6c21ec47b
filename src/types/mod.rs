pub mod error;
pub mod sample;
pub mod vector;

pub use error::{Result, SchemaPart, SwfvecError};
pub use sample::{Label, Sample};
pub use vector::{ContentVector, CounterVector, StructuralVector};
