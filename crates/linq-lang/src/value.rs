//! Register kinds and runtime values.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The kind of a register: a scalar or a list of scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Kind {
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "[int]")]
    List,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::List => "[int]",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(Kind::Int),
            "[int]" => Ok(Kind::List),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// A concrete register value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    List(Vec<i64>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Int(_) => Kind::Int,
            Value::List(_) => Kind::List,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[i64]> {
        match self {
            Value::List(xs) => Some(xs),
            Value::Int(_) => None,
        }
    }

    /// Whether every scalar in this value lies in `[-bound, bound]`.
    pub fn within(&self, bound: i64) -> bool {
        match self {
            Value::Int(n) => (-bound..=bound).contains(n),
            Value::List(xs) => xs.iter().all(|x| (-bound..=bound).contains(x)),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<Vec<i64>> for Value {
    fn from(xs: Vec<i64>) -> Self {
        Value::List(xs)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::List(xs) => {
                write!(f, "[")?;
                for (i, x) in xs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", x)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_roundtrips_through_text() {
        assert_eq!("int".parse::<Kind>(), Ok(Kind::Int));
        assert_eq!("[int]".parse::<Kind>(), Ok(Kind::List));
        assert!("bool".parse::<Kind>().is_err());
        assert_eq!(Kind::List.to_string(), "[int]");
    }

    #[test]
    fn display_matches_list_literal_syntax() {
        assert_eq!(Value::List(vec![1, -2, 3]).to_string(), "[1, -2, 3]");
        assert_eq!(Value::List(vec![]).to_string(), "[]");
        assert_eq!(Value::Int(-7).to_string(), "-7");
    }

    #[test]
    fn within_checks_every_element() {
        assert!(Value::List(vec![-512, 512]).within(512));
        assert!(!Value::List(vec![0, 513]).within(512));
        assert!(!Value::Int(-513).within(512));
    }
}
