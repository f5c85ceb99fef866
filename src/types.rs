use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Longest name the device-mapper accepts (DM_NAME_LEN minus the NUL).
const MAX_MAP_NAME_LEN: usize = 127;

/// Name of a device-mapper node under `/dev/mapper`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MapName(String);

impl MapName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for MapName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "." || s == ".." {
            return Err("mapping name is empty".to_string());
        }
        if s.len() > MAX_MAP_NAME_LEN {
            return Err(format!(
                "mapping name {} is longer than {} bytes",
                s, MAX_MAP_NAME_LEN
            ));
        }
        if s.contains('/') || s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(format!(
                "mapping name {} must not contain '/' or whitespace",
                s
            ));
        }
        Ok(MapName(s.to_string()))
    }
}

impl From<uuid::Uuid> for MapName {
    fn from(uuid: uuid::Uuid) -> Self {
        MapName(uuid.hyphenated().to_string())
    }
}

impl fmt::Display for MapName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    Zlib,
    Lzo,
    Zstd,
}

impl Compression {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "zlib" => Ok(Compression::Zlib),
            "lzo" => Ok(Compression::Lzo),
            "zstd" => Ok(Compression::Zstd),
            _ => Err(format!(
                "invalid compression {}; expected zlib, lzo, or zstd",
                value
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::Zlib => "zlib",
            Compression::Lzo => "lzo",
            Compression::Zstd => "zstd",
        }
    }

    pub fn mount_option(&self) -> String {
        format!("compress={}", self.as_str())
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Compression {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Compression {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Compression::parse(&value).map_err(serde::de::Error::custom)
    }
}
