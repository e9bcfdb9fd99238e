//! 宽松的数值反序列化
//!
//! 客户端会以数字或数字字符串的形式传递 ID（如 `class_id: "3"`），这里统一解析为 i64。

use serde::de::{Error, Unexpected, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

struct I64Visitor;

impl<'de> Visitor<'de> for I64Visitor {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer or a string containing an integer")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(value)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        if value <= i64::MAX as u64 {
            Ok(value as i64)
        } else {
            Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
        }
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: Error,
    {
        value
            .trim()
            .parse()
            .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
    }
}

// 自定义反序列化函数，支持字符串到i64的转换
pub fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(I64Visitor)
}

// 可选字段版本，null 或缺失时为 None
pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize_string_to_i64")] i64);

    let value = Option::<Wrapper>::deserialize(deserializer)?;
    Ok(value.map(|Wrapper(v)| v))
}

/// 从任意 JSON 值中提取 ID：数字或可解析为数字的字符串，其它忽略
pub fn id_from_value(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        class_id: Option<i64>,
    }

    #[test]
    fn test_optional_i64_accepts_numbers_and_strings() {
        let p: Probe = serde_json::from_value(json!({ "class_id": 7 })).unwrap();
        assert_eq!(p.class_id, Some(7));
        let p: Probe = serde_json::from_value(json!({ "class_id": "12" })).unwrap();
        assert_eq!(p.class_id, Some(12));
        let p: Probe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.class_id, None);
        let p: Probe = serde_json::from_value(json!({ "class_id": null })).unwrap();
        assert_eq!(p.class_id, None);
        assert!(serde_json::from_value::<Probe>(json!({ "class_id": "abc" })).is_err());
    }

    #[test]
    fn test_id_from_value() {
        assert_eq!(id_from_value(&json!(3)), Some(3));
        assert_eq!(id_from_value(&json!("42")), Some(42));
        assert_eq!(id_from_value(&json!(4.0)), Some(4));
        assert_eq!(id_from_value(&json!("x")), None);
        assert_eq!(id_from_value(&json!(null)), None);
        assert_eq!(id_from_value(&json!(1.5)), None);
    }
}
