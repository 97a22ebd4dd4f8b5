// Domain layer: snapshot models, status vocabularies and ports (interfaces).
// No I/O here; adapters live under src/adapters.

pub mod model;
pub mod ports;
pub mod status;

pub use status::Lexicon;
