use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::Path;

pub trait Serializer {
    fn serialize<T: Serialize>(data: &T) -> Result<Vec<u8>>;
    fn deserialize<T: DeserializeOwned>(data: &[u8]) -> Result<T>;
}

/// Pretty-printed JSON, two-space indent, trailing newline.
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize<T: Serialize>(data: &T) -> Result<Vec<u8>> {
        let mut content = serde_json::to_vec_pretty(data)?;
        content.push(b'\n');
        Ok(content)
    }

    fn deserialize<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
        serde_json::from_slice(data).map_err(Into::into)
    }
}

pub struct YamlSerializer;

impl Serializer for YamlSerializer {
    fn serialize<T: Serialize>(data: &T) -> Result<Vec<u8>> {
        Ok(serde_yaml::to_string(data)?.into_bytes())
    }

    fn deserialize<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
        serde_yaml::from_slice(data).map_err(Into::into)
    }
}

pub struct FileUtils;

impl FileUtils {
    pub fn read(path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    pub fn load<T, S>(path: &Path) -> Result<T>
    where
        T: DeserializeOwned,
        S: Serializer,
    {
        let content =
            Self::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        S::deserialize(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn save<T, S>(path: &Path, data: &T) -> Result<()>
    where
        T: Serialize,
        S: Serializer,
    {
        let content = S::serialize(data)?;
        fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}
