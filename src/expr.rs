//! Precondition expressions.
//!
//! Card preconditions are small arithmetic trees authored in JSON:
//! constants, named game variables, and operators over sub-expressions.
//! Evaluation is strict and closed; an expression naming anything the
//! engine does not know is an error, which playability checks treat as
//! "not playable" rather than a crash.
//!
//! The truth convention is numeric: zero is false, anything else true.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the acting player's hand size variable.
pub const VAR_CARDS_IN_HAND: &str = "CARDS_IN_HAND";

/// The strictly-greater-than operator.
pub const OP_GREATER_THAN: &str = ">";

/// Supplies values for named game variables during evaluation.
pub trait GameVars {
    /// Resolve a variable, or fail with [`ExprError::UnknownVariable`].
    fn game_variable(&self, name: &str) -> Result<i64, ExprError>;
}

/// One node of a precondition expression tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Expr {
    Constant {
        #[serde(default)]
        val: i64,
    },
    Variable {
        variable: String,
    },
    Operator {
        operator: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// A literal value.
    #[must_use]
    pub const fn constant(val: i64) -> Self {
        Expr::Constant { val }
    }

    /// A named game variable.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Expr::Variable {
            variable: name.into(),
        }
    }

    /// `left > right`, yielding 1 or 0.
    #[must_use]
    pub fn greater_than(left: Expr, right: Expr) -> Self {
        Expr::Operator {
            operator: OP_GREATER_THAN.to_string(),
            args: vec![left, right],
        }
    }

    /// Evaluate this expression to a number.
    ///
    /// Operators check their arity before evaluating any argument.
    pub fn evaluate<V: GameVars>(&self, vars: &V) -> Result<i64, ExprError> {
        match self {
            Expr::Constant { val } => Ok(*val),
            Expr::Variable { variable } => vars.game_variable(variable),
            Expr::Operator { operator, args } => match operator.as_str() {
                OP_GREATER_THAN => {
                    if args.len() != 2 {
                        return Err(ExprError::ArityMismatch {
                            operator: operator.clone(),
                            expected: 2,
                            got: args.len(),
                        });
                    }
                    let left = args[0].evaluate(vars)?;
                    let right = args[1].evaluate(vars)?;
                    Ok(i64::from(left > right))
                }
                _ => Err(ExprError::UnknownOperator(operator.clone())),
            },
        }
    }

    /// Evaluate this expression as a truth value.
    pub fn evaluate_bool<V: GameVars>(&self, vars: &V) -> Result<bool, ExprError> {
        Ok(self.evaluate(vars)? != 0)
    }
}

/// Why an expression failed to evaluate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprError {
    UnknownVariable(String),
    UnknownOperator(String),
    ArityMismatch {
        operator: String,
        expected: usize,
        got: usize,
    },
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprError::UnknownVariable(name) => {
                write!(f, "unknown game variable: {name}")
            }
            ExprError::UnknownOperator(op) => {
                write!(f, "unknown expression operator: {op}")
            }
            ExprError::ArityMismatch {
                operator,
                expected,
                got,
            } => {
                write!(
                    f,
                    "expected {expected} arguments to {operator:?}, but received {got}"
                )
            }
        }
    }
}

impl std::error::Error for ExprError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    struct Vars(FxHashMap<&'static str, i64>);

    impl Vars {
        fn with_hand(n: i64) -> Self {
            let mut map = FxHashMap::default();
            map.insert(VAR_CARDS_IN_HAND, n);
            Self(map)
        }
    }

    impl GameVars for Vars {
        fn game_variable(&self, name: &str) -> Result<i64, ExprError> {
            self.0
                .get(name)
                .copied()
                .ok_or_else(|| ExprError::UnknownVariable(name.to_string()))
        }
    }

    #[test]
    fn test_constant_and_variable() {
        let vars = Vars::with_hand(4);
        assert_eq!(Expr::constant(7).evaluate(&vars).unwrap(), 7);
        assert_eq!(
            Expr::variable(VAR_CARDS_IN_HAND).evaluate(&vars).unwrap(),
            4
        );
    }

    #[test]
    fn test_greater_than() {
        let expr = Expr::greater_than(
            Expr::variable(VAR_CARDS_IN_HAND),
            Expr::constant(2),
        );

        assert_eq!(expr.evaluate(&Vars::with_hand(3)).unwrap(), 1);
        assert_eq!(expr.evaluate(&Vars::with_hand(2)).unwrap(), 0);
        assert!(expr.evaluate_bool(&Vars::with_hand(3)).unwrap());
        assert!(!expr.evaluate_bool(&Vars::with_hand(1)).unwrap());
    }

    #[test]
    fn test_parses_authored_json() {
        let json = r#"{
            "kind": "OPERATOR",
            "operator": ">",
            "args": [
                { "kind": "VARIABLE", "variable": "CARDS_IN_HAND" },
                { "kind": "CONSTANT", "val": 2 }
            ]
        }"#;
        let expr: Expr = serde_json::from_str(json).unwrap();

        assert_eq!(
            expr,
            Expr::greater_than(Expr::variable(VAR_CARDS_IN_HAND), Expr::constant(2))
        );
    }

    #[test]
    fn test_constant_val_defaults_to_zero() {
        let expr: Expr = serde_json::from_str(r#"{"kind": "CONSTANT"}"#).unwrap();
        assert_eq!(expr, Expr::constant(0));
    }

    #[test]
    fn test_unknown_variable() {
        let err = Expr::variable("CARDS_IN_VOID")
            .evaluate(&Vars::with_hand(0))
            .unwrap_err();
        assert_eq!(err, ExprError::UnknownVariable("CARDS_IN_VOID".to_string()));
    }

    #[test]
    fn test_unknown_operator() {
        let expr = Expr::Operator {
            operator: "<".to_string(),
            args: vec![Expr::constant(1), Expr::constant(2)],
        };
        let err = expr.evaluate(&Vars::with_hand(0)).unwrap_err();
        assert_eq!(err, ExprError::UnknownOperator("<".to_string()));
    }

    #[test]
    fn test_arity_is_checked_before_arguments() {
        // The lone argument would fail to evaluate, but arity wins.
        let expr = Expr::Operator {
            operator: OP_GREATER_THAN.to_string(),
            args: vec![Expr::variable("NO_SUCH_VARIABLE")],
        };
        let err = expr.evaluate(&Vars::with_hand(0)).unwrap_err();
        assert_eq!(
            err,
            ExprError::ArityMismatch {
                operator: OP_GREATER_THAN.to_string(),
                expected: 2,
                got: 1,
            }
        );
    }
}
