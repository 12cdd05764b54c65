//! Condition evaluation for `conditional` nodes and `condition_true` /
//! `condition_false` edges.
//!
//! Grounded in `agent_flow.engine.executor.WorkflowExecution._evaluate_condition`
//! and `_execute_conditional_node`. The source reaches for Python `eval()` for
//! its `javascript` condition type; per the design note on that hazard, this
//! implements a minimal safe expression evaluator instead of embedding a JS
//! engine — it supports exactly the operators the source's own expressions
//! use (`in`, `==`, `startsWith`, `endsWith`, `&&`, `||`) against the input
//! text, nothing more general.

use regex::Regex;

/// The condition types a `conditional` node or conditional edge can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionType {
    Always,
    Contains,
    Equals,
    StartsWith,
    EndsWith,
    Regex,
    JavaScript,
}

impl ConditionType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "contains" => Self::Contains,
            "equals" => Self::Equals,
            "starts_with" => Self::StartsWith,
            "ends_with" => Self::EndsWith,
            "regex" => Self::Regex,
            "javascript" => Self::JavaScript,
            _ => Self::Always,
        }
    }
}

/// Evaluates `condition_type` against `content`, comparing against `target`
/// where the condition type needs a literal to compare.
///
/// Unparseable regexes and malformed safe-expressions evaluate to `false`
/// rather than propagating an error, matching the source's broad `except:
/// return False` fallbacks — a condition node always produces a boolean.
pub fn evaluate(condition_type: ConditionType, content: &str, target: &str) -> bool {
    match condition_type {
        ConditionType::Always => true,
        ConditionType::Contains => content.contains(target),
        ConditionType::Equals => content == target,
        ConditionType::StartsWith => content.starts_with(target),
        ConditionType::EndsWith => content.ends_with(target),
        ConditionType::Regex => Regex::new(target)
            .map(|re| re.is_match(content))
            .unwrap_or(false),
        ConditionType::JavaScript => eval_safe_expression(target, content),
    }
}

/// Evaluates a tiny boolean expression language against `$input`:
///
/// ```text
/// expr   := term (("&&" | "||") term)*
/// term   := "$input" "in" STRING
///         | "$input" "==" STRING
///         | "$input" "." "startsWith" "(" STRING ")"
///         | "$input" "." "endsWith" "(" STRING ")"
/// STRING := '...' | "..."
/// ```
///
/// Anything outside this grammar evaluates to `false`. This deliberately
/// does not implement a general interpreter — it is scoped to the handful of
/// shapes `javascript`-typed conditions take in the source material.
fn eval_safe_expression(expr: &str, input: &str) -> bool {
    let expr = expr.trim();
    if let Some((left, right)) = split_top_level(expr, "&&") {
        return eval_safe_expression(left, input) && eval_safe_expression(right, input);
    }
    if let Some((left, right)) = split_top_level(expr, "||") {
        return eval_safe_expression(left, input) || eval_safe_expression(right, input);
    }
    eval_term(expr, input).unwrap_or(false)
}

fn split_top_level<'a>(expr: &'a str, op: &str) -> Option<(&'a str, &'a str)> {
    // These expressions never contain nested parens around the operators we
    // split on, so a plain substring search is sufficient here.
    expr.find(op)
        .map(|idx| (&expr[..idx], &expr[idx + op.len()..]))
}

fn eval_term(term: &str, input: &str) -> Option<bool> {
    let term = term.trim();
    if let Some(rest) = term.strip_prefix("$input") {
        let rest = rest.trim();
        if let Some(rest) = rest.strip_prefix("in") {
            let literal = parse_string_literal(rest.trim())?;
            return Some(input.contains(&literal));
        }
        if let Some(rest) = rest.strip_prefix("==") {
            let literal = parse_string_literal(rest.trim())?;
            return Some(input == literal);
        }
        if let Some(rest) = rest.strip_prefix(".startsWith(") {
            let literal = parse_string_literal(rest.trim().strip_suffix(')')?)?;
            return Some(input.starts_with(&literal));
        }
        if let Some(rest) = rest.strip_prefix(".endsWith(") {
            let literal = parse_string_literal(rest.trim().strip_suffix(')')?)?;
            return Some(input.ends_with(&literal));
        }
    }
    None
}

fn parse_string_literal(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 && (bytes[0] == b'\'' || bytes[0] == b'"') && bytes[0] == bytes[bytes.len() - 1]
    {
        return Some(raw[1..raw.len() - 1].to_string());
    }
    None
}
