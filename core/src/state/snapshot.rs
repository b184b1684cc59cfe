//! 持久化记录的版本化封装
//!
//! 写入时总是带 `version` 字段；读取时同时接受无封装的旧格式记录。

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// 当前写入的记录版本
pub const RECORD_VERSION: u32 = 1;

/// 记录封装
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord<T> {
    pub version: u32,
    pub data: T,
}

impl<T: Serialize> PersistedRecord<T> {
    pub fn new(data: T) -> Self {
        Self {
            version: RECORD_VERSION,
            data,
        }
    }

    /// 序列化为 JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize record")
    }
}

/// 序列化为当前版本的封装
pub fn encode_record<T: Serialize>(data: &T) -> Result<String> {
    PersistedRecord::new(data).to_json()
}

/// 从 JSON 反序列化，兼容旧格式
pub fn decode_record<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("Failed to parse stored record")?;

    let is_envelope = value
        .as_object()
        .map(|o| o.len() == 2 && o.contains_key("version") && o.contains_key("data"))
        .unwrap_or(false);

    if !is_envelope {
        return serde_json::from_value(value).context("Failed to decode legacy record");
    }

    let record: PersistedRecord<serde_json::Value> =
        serde_json::from_value(value).context("Failed to decode record envelope")?;
    if record.version > RECORD_VERSION {
        bail!(
            "record version {} is newer than supported {}",
            record.version,
            RECORD_VERSION
        );
    }
    serde_json::from_value(record.data).context("Failed to decode record data")
}
