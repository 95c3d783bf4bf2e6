//! IF predicates and the positional argument view shared with DO actions.
//!
//! A handler receives its arguments already bound: the block's user values
//! first, then the context values it asked for. The `Args` accessors turn a
//! wrong or missing slot into an [`ArgError`], which the evaluator logs and
//! treats as "predicate false" / "action skipped".

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::events::event::{Value, names};
use crate::world::shape::{ShapeId, ShapeKind};

pub type PredicateFn = fn(&Args<'_>) -> Result<bool, ArgError>;

/// Recoverable evaluation failure. Never escapes a tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgError {
    #[error("context variable `{0}` is not bound")]
    MissingContext(String),
    #[error("argument {0} is missing")]
    Missing(usize),
    #[error("argument {index} is not a {expected}")]
    WrongType { index: usize, expected: &'static str },
    #[error("shape handle no longer refers to a live shape")]
    StaleShape,
    #[error("bad value: {0}")]
    BadValue(String),
}

// ── Argument view ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub fn new(values: &'a [Value]) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&'a Value, ArgError> {
        self.values.get(index).ok_or(ArgError::Missing(index))
    }

    pub fn number(&self, index: usize) -> Result<f64, ArgError> {
        match self.get(index)? {
            Value::Number(n) => Ok(*n),
            Value::Text(text) => text.trim().parse().map_err(|_| ArgError::WrongType {
                index,
                expected: "number",
            }),
            Value::Shape(_) => Err(ArgError::WrongType {
                index,
                expected: "number",
            }),
        }
    }

    pub fn text(&self, index: usize) -> Result<&'a str, ArgError> {
        match self.get(index)? {
            Value::Text(text) => Ok(text),
            _ => Err(ArgError::WrongType {
                index,
                expected: "text",
            }),
        }
    }

    pub fn shape(&self, index: usize) -> Result<ShapeId, ArgError> {
        match self.get(index)? {
            Value::Shape(id) => Ok(*id),
            _ => Err(ArgError::WrongType {
                index,
                expected: "shape",
            }),
        }
    }

    pub fn shape_kind(&self, index: usize) -> Result<ShapeKind, ArgError> {
        let text = self.text(index)?;
        ShapeKind::parse(text).ok_or_else(|| ArgError::BadValue(format!("unknown shape type `{text}`")))
    }

    pub fn comparison(&self, index: usize) -> Result<Comparison, ArgError> {
        self.text(index)?.parse()
    }
}

// ── Comparisons ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Equal,
    NotEqual,
}

impl Comparison {
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(Comparison::Greater),
            ">=" => Some(Comparison::GreaterEqual),
            "<" => Some(Comparison::Less),
            "<=" => Some(Comparison::LessEqual),
            "==" => Some(Comparison::Equal),
            "!=" => Some(Comparison::NotEqual),
            _ => None,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Comparison::Greater => ">",
            Comparison::GreaterEqual => ">=",
            Comparison::Less => "<",
            Comparison::LessEqual => "<=",
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
        }
    }

    /// `measured <op> threshold`.
    pub fn apply(self, measured: f64, threshold: f64) -> bool {
        match self {
            Comparison::Greater => measured > threshold,
            Comparison::GreaterEqual => measured >= threshold,
            Comparison::Less => measured < threshold,
            Comparison::LessEqual => measured <= threshold,
            Comparison::Equal => measured == threshold,
            Comparison::NotEqual => measured != threshold,
        }
    }
}

impl FromStr for Comparison {
    type Err = ArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Comparison::parse(s).ok_or_else(|| ArgError::BadValue(format!("unknown comparison `{s}`")))
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ── Predicates ───────────────────────────────────────────────────────────

/// `(shape_type, comparison, threshold, event_shape_type, measured)`
pub fn compare_measure(args: &Args<'_>) -> Result<bool, ArgError> {
    let wanted = args.shape_kind(0)?;
    let op = args.comparison(1)?;
    let threshold = args.number(2)?;
    let actual = args.shape_kind(3)?;
    let measured = args.number(4)?;
    Ok(wanted == actual && op.apply(measured, threshold))
}

/// `(expected, actual)` compared as text.
pub fn equals(args: &Args<'_>) -> Result<bool, ArgError> {
    Ok(args.text(0)? == args.text(1)?)
}

/// `(shape_type, event_shape_type, event)`
fn event_filter(args: &Args<'_>, event: &str) -> Result<bool, ArgError> {
    let wanted = args.shape_kind(0)?;
    let actual = args.shape_kind(1)?;
    Ok(wanted == actual && args.text(2)? == event)
}

pub fn spawns(args: &Args<'_>) -> Result<bool, ArgError> {
    event_filter(args, names::SPAWN)
}

pub fn destroyed(args: &Args<'_>) -> Result<bool, ArgError> {
    event_filter(args, names::DESTROYED)
}

pub fn x_velocity_changes(args: &Args<'_>) -> Result<bool, ArgError> {
    event_filter(args, names::X_VELOCITY_CHANGE)
}

pub fn y_velocity_changes(args: &Args<'_>) -> Result<bool, ArgError> {
    event_filter(args, names::Y_VELOCITY_CHANGE)
}

pub fn color_changes(args: &Args<'_>) -> Result<bool, ArgError> {
    event_filter(args, names::COLOR_CHANGE)
}

pub fn size_changes(args: &Args<'_>) -> Result<bool, ArgError> {
    event_filter(args, names::SIZE_CHANGE)
}

/// `(shape_type, target_type, event_a_type, event_b_type, event)`, either
/// shape of the pair may match either slot.
pub fn collides(args: &Args<'_>) -> Result<bool, ArgError> {
    let first = args.shape_kind(0)?;
    let second = args.shape_kind(1)?;
    let a = args.shape_kind(2)?;
    let b = args.shape_kind(3)?;
    if args.text(4)? != names::COLLISION {
        return Ok(false);
    }
    Ok((first == a && second == b) || (first == b && second == a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn comparison_symbols_round_trip() {
        for symbol in crate::rules::catalog::COMPARISONS {
            let op = Comparison::parse(symbol).unwrap();
            assert_eq!(op.symbol(), *symbol);
        }
        assert!(Comparison::parse("=>").is_none());
    }

    #[test]
    fn compare_measure_requires_matching_type() {
        let values = [
            text("circle"),
            text("<"),
            Value::Number(200.0),
            text("rectangle"),
            Value::Number(50.0),
        ];
        assert!(!compare_measure(&Args::new(&values)).unwrap());

        let values = [
            text("circle"),
            text("<"),
            Value::Number(200.0),
            text("circle"),
            Value::Number(50.0),
        ];
        assert!(compare_measure(&Args::new(&values)).unwrap());
    }

    #[test]
    fn collides_ignores_pair_order() {
        let values = [
            text("circle"),
            text("triangle"),
            text("triangle"),
            text("circle"),
            text("collision"),
        ];
        assert!(collides(&Args::new(&values)).unwrap());
    }

    #[test]
    fn numeric_text_is_accepted_as_number() {
        let values = [text(" 12.5 ")];
        assert_eq!(Args::new(&values).number(0).unwrap(), 12.5);
    }

    #[test]
    fn missing_slot_is_reported() {
        let values = [text("circle")];
        assert_eq!(equals(&Args::new(&values)), Err(ArgError::Missing(1)));
    }
}
