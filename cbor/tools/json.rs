/*!
Conversion between DAG-CBOR values and their JSON representation

Links are written as `{"$link": "<cid>"}` and byte strings as
`{"$bytes": "<base64>"}`, so the conversion is lossless in both directions
for every value whose integers fit in 64 bits.
*/

use anyhow::{anyhow, bail};
use base64::prelude::*;
use grove_cbor::{Map, Value, cid::Cid};
use serde_json::Value as J;

const BYTES_KEY: &str = "$bytes";
const LINK_KEY: &str = "$link";

pub fn to_json(value: &Value) -> anyhow::Result<J> {
    Ok(match value {
        Value::Null => J::Null,
        Value::Bool(b) => J::Bool(*b),
        Value::Integer(i) => {
            if let Ok(i) = i64::try_from(*i) {
                J::from(i)
            } else if let Ok(u) = u64::try_from(*i) {
                J::from(u)
            } else {
                bail!("Integer {i} cannot be represented in JSON")
            }
        }
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(J::Number)
            .ok_or_else(|| anyhow!("Float {f} cannot be represented in JSON"))?,
        Value::Bytes(b) => {
            let mut obj = serde_json::Map::new();
            obj.insert(BYTES_KEY.into(), J::String(BASE64_STANDARD_NO_PAD.encode(b)));
            J::Object(obj)
        }
        Value::Text(s) => J::String(s.clone()),
        Value::Array(items) => J::Array(items.iter().map(to_json).collect::<Result<_, _>>()?),
        Value::Map(map) => J::Object(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), to_json(v)?)))
                .collect::<anyhow::Result<_>>()?,
        ),
        Value::Link(cid) => serde_json::to_value(cid)?,
    })
}

pub fn from_json(value: J) -> anyhow::Result<Value> {
    Ok(match value {
        J::Null => Value::Null,
        J::Bool(b) => Value::Bool(b),
        J::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Integer(u.into())
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                bail!("Invalid JSON number: {n}")
            }
        }
        J::String(s) => Value::Text(s),
        J::Array(items) => Value::Array(items.into_iter().map(from_json).collect::<Result<_, _>>()?),
        J::Object(obj) => {
            if obj.len() == 1 {
                if obj.contains_key(LINK_KEY) {
                    let cid: Cid = serde_json::from_value(J::Object(obj))?;
                    return Ok(Value::Link(cid));
                }
                if let Some(J::String(b)) = obj.get(BYTES_KEY) {
                    let bytes = BASE64_STANDARD_NO_PAD
                        .decode(b.trim_end_matches('='))
                        .map_err(|e| anyhow!("Invalid base64 in {BYTES_KEY}: {e}"))?;
                    return Ok(Value::Bytes(bytes));
                }
            }
            Value::Map(
                obj.into_iter()
                    .map(|(k, v)| Ok((k, from_json(v)?)))
                    .collect::<anyhow::Result<Map>>()?,
            )
        }
    })
}
