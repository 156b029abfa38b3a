//! Utility helpers: environment inspection and file serializers.
pub mod env;
pub mod serialization;

pub use env::EnvManager;
pub use serialization::{FileUtils, JsonSerializer, Serializer, YamlSerializer};
