use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Add;

/// Link or path cost. `Infinite` is a sentinel, never a large finite number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Cost {
    Finite(u64),
    #[default]
    Infinite,
}

impl Cost {
    pub const ZERO: Cost = Cost::Finite(0);
}

impl Add for Cost {
    type Output = Cost;

    // Saturates: overflow of the finite range is treated as unreachable.
    fn add(self, rhs: Cost) -> Cost {
        match (self, rhs) {
            (Cost::Finite(a), Cost::Finite(b)) => a.checked_add(b).map_or(Cost::Infinite, Cost::Finite),
            _ => Cost::Infinite,
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Finite(value) => write!(f, "{}", value),
            Cost::Infinite => f.write_str("INF"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CostRepr {
    Finite(u64),
    Label(String),
}

impl Serialize for Cost {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Cost::Finite(value) => serializer.serialize_u64(*value),
            Cost::Infinite => serializer.serialize_str("INF"),
        }
    }
}

impl<'de> Deserialize<'de> for Cost {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match CostRepr::deserialize(deserializer)? {
            CostRepr::Finite(value) => Ok(Cost::Finite(value)),
            CostRepr::Label(label) if label == "INF" => Ok(Cost::Infinite),
            CostRepr::Label(other) => Err(serde::de::Error::custom(format!(
                "expected a cost or \"INF\", got {:?}",
                other
            ))),
        }
    }
}
