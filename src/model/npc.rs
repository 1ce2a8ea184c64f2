use serde_json::{Map, Value};

use crate::error::NpcError;

/// A unit record exactly as it is persisted. Opaque to the encounter.
pub type RawNpc = Value;

/// What an encounter needs to know about a unit it holds.
pub trait UnitHandle {
    fn id(&self) -> &str;

    /// Combat value. Non-finite or negative values are counted as zero
    /// when summed.
    fn power(&self) -> f64;
}

/// Turns raw unit records into unit handles and back.
pub trait NpcFactory {
    type Npc: UnitHandle;

    fn deserialize(&self, raw: &RawNpc) -> Result<Self::Npc, NpcError>;
    fn serialize(&self, npc: &Self::Npc) -> RawNpc;
}

/// A unit that keeps its raw record verbatim and reads `id` and `power`
/// out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonNpc {
    id: String,
    power: f64,
    raw: Map<String, Value>,
}

impl JsonNpc {
    pub fn new(id: impl Into<String>, power: f64) -> Self {
        let id = id.into();
        let mut raw = Map::new();
        raw.insert("id".into(), Value::String(id.clone()));
        raw.insert("power".into(), Value::from(power));
        Self { id, power, raw }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        match key {
            "id" => match &value {
                Value::String(id) => self.id = id.clone(),
                Value::Number(n) => self.id = n.to_string(),
                _ => {}
            },
            "power" => self.power = coerce_power(&value),
            _ => {}
        }
        self.raw.insert(key.to_string(), value);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.raw.get("name").and_then(Value::as_str)
    }

    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }
}

impl UnitHandle for JsonNpc {
    fn id(&self) -> &str {
        &self.id
    }

    fn power(&self) -> f64 {
        self.power
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonNpcFactory;

impl NpcFactory for JsonNpcFactory {
    type Npc = JsonNpc;

    fn deserialize(&self, raw: &RawNpc) -> Result<JsonNpc, NpcError> {
        let Value::Object(map) = raw else {
            return Err(NpcError::NotAnObject);
        };

        let id = match map.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(NpcError::MissingId),
        };
        let power = map.get("power").map(coerce_power).unwrap_or(0.0);

        Ok(JsonNpc {
            id,
            power,
            raw: map.clone(),
        })
    }

    fn serialize(&self, npc: &JsonNpc) -> RawNpc {
        Value::Object(npc.raw.clone())
    }
}

/// Loose numeric coercion: numbers and numeric strings count, anything
/// else is zero.
pub fn coerce_power(value: &Value) -> f64 {
    let power = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if power.is_finite() {
        power
    } else {
        0.0
    }
}
