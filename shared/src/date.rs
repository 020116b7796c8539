//! 时间类型模块
//!
//! 服务端返回的时间有两种形态：带时区的 RFC 3339 字符串，以及不带时区的
//! ISO 8601 字符串（按 UTC 处理）。`Timestamp` 统一两者，解析失败时保留原文。

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// 服务端时间戳
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    /// 成功解析的时间（UTC）
    At(DateTime<Utc>),
    /// 无法识别的原始字符串
    Raw(String),
}

impl Timestamp {
    /// 解析服务端时间字符串
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Self::At(dt.with_timezone(&Utc));
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
                return Self::At(naive.and_utc());
            }
        }
        Self::Raw(s.to_string())
    }

    #[inline]
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self::At(dt)
    }

    /// 解析后的时间，原文无法识别时为 None
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::At(dt) => Some(*dt),
            Self::Raw(_) => None,
        }
    }

    /// 日期标签，如 `2024-03-01`
    pub fn date_label(&self) -> String {
        match self {
            Self::At(dt) => dt.format("%Y-%m-%d").to_string(),
            Self::Raw(s) => s.clone(),
        }
    }

    /// 日期时间标签，如 `2024-03-01 09:30`
    pub fn datetime_label(&self) -> String {
        match self {
            Self::At(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            Self::Raw(s) => s.clone(),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Raw(s) => f.write_str(s),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
