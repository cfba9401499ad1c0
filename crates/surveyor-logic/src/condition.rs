//! Condition evaluation: one rule's predicate against one answer snapshot.
//!
//! Every operator is total. Missing answers, type mismatches and malformed
//! condition values all evaluate to `false` (with `is-empty` as the single
//! exception for missing answers), so a broken condition never reveals a
//! hidden question.

use std::cmp::Ordering;

use serde_json::Value;
use surveyor_model::{AnswerSnapshot, ConditionalRule, Operator, is_empty_answer};

/// Evaluate `rule`'s condition against the answers of one response.
pub fn evaluate(rule: &ConditionalRule, answers: &AnswerSnapshot) -> bool {
    evaluate_condition(
        rule.operator,
        &rule.condition_value,
        answers.get(&rule.condition_question_id),
    )
}

/// Evaluate an operator/expected-value pair against a raw answer.
///
/// `null` answers are treated like absent ones: the question was cleared.
pub fn evaluate_condition(operator: Operator, expected: &Value, answer: Option<&Value>) -> bool {
    let answer = match answer {
        None | Some(Value::Null) => return operator == Operator::IsEmpty,
        Some(answer) => answer,
    };

    match operator {
        Operator::Equals => values_equal(answer, expected),
        Operator::NotEquals => !values_equal(answer, expected),
        Operator::Contains => contains(answer, expected).unwrap_or(false),
        Operator::NotContains => contains(answer, expected).is_some_and(|found| !found),
        Operator::GreaterThan => compare_numeric(answer, expected) == Some(Ordering::Greater),
        Operator::LessThan => compare_numeric(answer, expected) == Some(Ordering::Less),
        Operator::Between => between(answer, expected),
        Operator::IsEmpty => is_empty_answer(Some(answer)),
        Operator::IsNotEmpty => !is_empty_answer(Some(answer)),
    }
}

/// Deep equality: arrays element-wise in order, objects key-wise,
/// numbers by value (`1` equals `1.0`), everything else strictly.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => left == right,
    }
}

/// `Some(found)` when the answer shape supports containment, `None` otherwise.
fn contains(answer: &Value, expected: &Value) -> Option<bool> {
    match answer {
        Value::Array(items) => Some(items.iter().any(|item| values_equal(item, expected))),
        Value::String(text) => match expected {
            Value::String(needle) => Some(text.contains(needle.as_str())),
            _ => None,
        },
        _ => None,
    }
}

/// Numeric view of a raw value. Numeric strings count; booleans do not.
fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn compare_numeric(answer: &Value, expected: &Value) -> Option<Ordering> {
    as_number(answer)?.partial_cmp(&as_number(expected)?)
}

fn between(answer: &Value, bounds: &Value) -> bool {
    let Value::Array(pair) = bounds else {
        return false;
    };
    let [min, max] = pair.as_slice() else {
        return false;
    };
    match (as_number(min), as_number(max), as_number(answer)) {
        (Some(min), Some(max), Some(value)) if min <= max => min <= value && value <= max,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use surveyor_model::RuleAction;

    const ALL_OPERATORS: [Operator; 9] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::Contains,
        Operator::NotContains,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::Between,
        Operator::IsEmpty,
        Operator::IsNotEmpty,
    ];

    fn rule(operator: Operator, value: Value) -> ConditionalRule {
        ConditionalRule::for_question("r1", "q1", operator, value, "q2", RuleAction::Show)
    }

    fn check(operator: Operator, expected: Value, answer: Value) -> bool {
        evaluate_condition(operator, &expected, Some(&answer))
    }

    #[test]
    fn absent_answer_is_false_except_is_empty() {
        let answers = AnswerSnapshot::new().with("other", json!("x"));
        for operator in ALL_OPERATORS {
            let outcome = evaluate(&rule(operator, json!("x")), &answers);
            assert_eq!(outcome, operator == Operator::IsEmpty, "{operator:?}");
        }
    }

    #[test]
    fn null_answer_behaves_like_absent() {
        for operator in ALL_OPERATORS {
            let outcome = evaluate_condition(operator, &json!(null), Some(&Value::Null));
            assert_eq!(outcome, operator == Operator::IsEmpty, "{operator:?}");
        }
    }

    #[test]
    fn equals_is_deep_and_order_sensitive() {
        assert!(check(Operator::Equals, json!("yes"), json!("yes")));
        assert!(check(Operator::Equals, json!(3), json!(3.0)));
        assert!(check(Operator::Equals, json!(["a", "b"]), json!(["a", "b"])));
        assert!(!check(Operator::Equals, json!(["a", "b"]), json!(["b", "a"])));
        assert!(!check(Operator::Equals, json!("5"), json!(5)));
        assert!(check(Operator::NotEquals, json!("yes"), json!("no")));
        assert!(!check(Operator::NotEquals, json!(["a"]), json!(["a"])));
    }

    #[test]
    fn contains_tests_membership_or_substring() {
        assert!(check(Operator::Contains, json!("red"), json!(["blue", "red"])));
        assert!(!check(Operator::Contains, json!("green"), json!(["blue", "red"])));
        assert!(check(Operator::Contains, json!("ice"), json!("nice day")));
        assert!(check(Operator::NotContains, json!("green"), json!(["blue"])));
        assert!(!check(Operator::NotContains, json!("ice"), json!("nice day")));
    }

    #[test]
    fn contains_fails_closed_on_shape_mismatch() {
        assert!(!check(Operator::Contains, json!(12), json!("abc12")));
        assert!(!check(Operator::NotContains, json!(12), json!("abc")));
        assert!(!check(Operator::Contains, json!("a"), json!(42)));
        assert!(!check(Operator::NotContains, json!("a"), json!(true)));
    }

    #[test]
    fn ordering_is_numeric_and_fails_closed() {
        assert!(check(Operator::GreaterThan, json!(18), json!(21)));
        assert!(!check(Operator::GreaterThan, json!(18), json!(18)));
        assert!(check(Operator::LessThan, json!("10"), json!(" 9.5 ")));
        assert!(!check(Operator::GreaterThan, json!(1), json!("many")));
        assert!(!check(Operator::LessThan, json!("lots"), json!(1)));
        assert!(!check(Operator::GreaterThan, json!(0), json!(true)));
        assert!(!check(Operator::LessThan, json!(5), json!([1])));
    }

    #[test]
    fn between_is_inclusive_and_rejects_malformed_bounds() {
        assert!(check(Operator::Between, json!([10, 20]), json!(15)));
        assert!(check(Operator::Between, json!([10, 20]), json!(10)));
        assert!(check(Operator::Between, json!([10, 20]), json!(20)));
        assert!(!check(Operator::Between, json!([10, 20]), json!(25)));
        for answer in [json!(5), json!(10), json!(15), json!(20), json!(25)] {
            assert!(!check(Operator::Between, json!([20, 10]), answer));
        }
        assert!(!check(Operator::Between, json!([10]), json!(10)));
        assert!(!check(Operator::Between, json!([10, 20, 30]), json!(15)));
        assert!(!check(Operator::Between, json!(15), json!(15)));
        assert!(!check(Operator::Between, json!(["low", 20]), json!(15)));
        assert!(!check(Operator::Between, json!([10, 20]), json!("fifteen")));
    }

    #[test]
    fn emptiness_operators_follow_answer_shape() {
        assert!(check(Operator::IsEmpty, json!(null), json!("")));
        assert!(check(Operator::IsEmpty, json!(null), json!([])));
        assert!(!check(Operator::IsEmpty, json!(null), json!(0)));
        assert!(check(Operator::IsNotEmpty, json!(null), json!(["x"])));
        assert!(!check(Operator::IsNotEmpty, json!(null), json!("")));
    }
}
