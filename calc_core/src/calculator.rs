//! # Keypad Calculator
//!
//! A four-function calculator driven one key at a time. Keys accumulate a
//! free-text expression; `=` evaluates it with ordinary operator precedence
//! (AST evaluation via `meval`, never string `eval`).
//!
//! Behavior worth knowing:
//!
//! - Pressing an operator right after another replaces it, so `5 + + 3 =`
//!   evaluates `5+3`.
//! - `%` rewrites the trailing number as its hundredth in place.
//! - Any evaluation error (incomplete expression, division by zero) shows
//!   `Error` and clears the expression.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculator::Calculator;
//!
//! let mut calc = Calculator::new();
//! calc.press_sequence("5++3=").unwrap();
//! assert_eq!(calc.display(), "8");
//! ```

use std::str::FromStr;

use meval::Expr;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Text shown after a failed evaluation
pub const ERROR_DISPLAY: &str = "Error";

/// Binary operators available on the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Character written into the expression
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// Parse an operator, accepting the `×`, `÷` and `−` display glyphs.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' | '−' => Some(Operator::Subtract),
            '*' | '×' | 'x' => Some(Operator::Multiply),
            '/' | '÷' => Some(Operator::Divide),
            _ => None,
        }
    }

    fn is_operator_char(c: char) -> bool {
        matches!(c, '+' | '-' | '*' | '/' | '%')
    }
}

/// One keypad button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Digit(u8),
    DoubleZero,
    Decimal,
    Operator(Operator),
    Percent,
    Equals,
    Clear,
    Backspace,
}

impl Key {
    /// Map a keyboard event (`KeyboardEvent.code` or `.key`) to a button.
    pub fn from_key_code(code: &str) -> Option<Self> {
        let key = match code {
            "Enter" | "NumpadEnter" | "=" => Key::Equals,
            "Backspace" => Key::Backspace,
            "c" | "C" | "KeyC" | "Escape" => Key::Clear,
            "." | "NumpadDecimal" | "Period" => Key::Decimal,
            "%" => Key::Percent,
            "+" | "NumpadAdd" => Key::Operator(Operator::Add),
            "-" | "NumpadSubtract" | "Minus" => Key::Operator(Operator::Subtract),
            "*" | "NumpadMultiply" => Key::Operator(Operator::Multiply),
            "/" | "NumpadDivide" | "Slash" => Key::Operator(Operator::Divide),
            _ => {
                let digit = code
                    .strip_prefix("Numpad")
                    .or_else(|| code.strip_prefix("Digit"))
                    .unwrap_or(code);
                return match digit.as_bytes() {
                    [d @ b'0'..=b'9'] => Some(Key::Digit(d - b'0')),
                    _ => None,
                };
            }
        };
        Some(key)
    }

    /// Map a typed character to a button (`<` is backspace).
    pub fn from_char(c: char) -> Option<Self> {
        if let Some(d) = c.to_digit(10) {
            return Some(Key::Digit(d as u8));
        }
        if let Some(op) = Operator::from_char(c) {
            return Some(Key::Operator(op));
        }
        match c {
            '.' | ',' => Some(Key::Decimal),
            '%' => Some(Key::Percent),
            '=' => Some(Key::Equals),
            'c' | 'C' => Some(Key::Clear),
            '<' | '\u{8}' => Some(Key::Backspace),
            _ => None,
        }
    }

    fn number_text(self) -> Option<String> {
        match self {
            Key::Digit(d) => Some(d.to_string()),
            Key::DoubleZero => Some("00".to_string()),
            Key::Decimal => Some(".".to_string()),
            _ => None,
        }
    }
}

/// What a key press did, for the front end to surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum KeyOutcome {
    /// Display changed (or stayed) normally
    Updated,
    /// `=` produced a value
    Evaluated(f64),
    /// Key was ignored; message should be shown to the user
    Notice(String),
    /// Evaluation failed; display now shows `Error`
    Error(String),
}

/// Calculator state: what is shown and what will be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculator {
    display: String,
    expression: String,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Calculator {
            display: "0".to_string(),
            expression: String::new(),
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn is_error(&self) -> bool {
        self.display == ERROR_DISPLAY
    }

    /// Apply one key press.
    pub fn press(&mut self, key: Key) -> KeyOutcome {
        if let Some(text) = key.number_text() {
            self.push_number(&text);
            return KeyOutcome::Updated;
        }
        match key {
            Key::Operator(op) => {
                self.push_operator(op);
                KeyOutcome::Updated
            }
            Key::Percent => self.apply_percent(),
            Key::Equals => self.evaluate(),
            Key::Clear => {
                self.clear();
                KeyOutcome::Updated
            }
            Key::Backspace => {
                self.backspace();
                KeyOutcome::Updated
            }
            Key::Digit(_) | Key::DoubleZero | Key::Decimal => KeyOutcome::Updated,
        }
    }

    /// Feed a string of typed characters, e.g. `"12*3="`. Whitespace is ignored.
    pub fn press_sequence(&mut self, keys: &str) -> CalcResult<Vec<KeyOutcome>> {
        let mut outcomes = Vec::new();
        for c in keys.chars().filter(|c| !c.is_whitespace()) {
            let key = Key::from_char(c).ok_or_else(|| {
                CalcError::invalid_input("keys", c.to_string(), "Unrecognized calculator key")
            })?;
            outcomes.push(self.press(key));
        }
        Ok(outcomes)
    }

    pub fn clear(&mut self) {
        self.display = "0".to_string();
        self.expression.clear();
    }

    fn push_number(&mut self, text: &str) {
        if self.is_error() || (self.display == "0" && text != ".") {
            self.display = text.to_string();
            self.expression = text.to_string();
        } else {
            self.display.push_str(text);
            self.expression.push_str(text);
        }
    }

    fn push_operator(&mut self, op: Operator) {
        if self.is_error() {
            self.clear();
        }
        if self.expression.ends_with(Operator::is_operator_char) {
            self.expression.pop();
        }
        self.expression.push(op.symbol());
        self.display = self.expression.clone();
    }

    fn apply_percent(&mut self) -> KeyOutcome {
        if self.is_error() || self.expression.is_empty() || self.expression == "0" {
            return KeyOutcome::Notice("Please enter a number first".to_string());
        }
        if self.expression.ends_with(Operator::is_operator_char) {
            return KeyOutcome::Notice("Please enter a number before percentage".to_string());
        }

        let token_start = self
            .expression
            .rfind(|c: char| !(c.is_ascii_digit() || c == '.'))
            .map(|i| i + 1)
            .unwrap_or(0);
        let token = &self.expression[token_start..];

        match token.parse::<f64>() {
            Ok(number) => {
                let mut rewritten = self.expression[..token_start].to_string();
                rewritten.push_str(&format_value(number / 100.0));
                self.expression = rewritten;
                self.display = self.expression.clone();
                KeyOutcome::Updated
            }
            Err(_) => self.fail("Invalid percentage calculation"),
        }
    }

    fn evaluate(&mut self) -> KeyOutcome {
        if self.is_error() || self.expression.is_empty() || self.expression == "0" {
            return KeyOutcome::Notice("Please enter an expression".to_string());
        }
        if self.expression.ends_with(Operator::is_operator_char) {
            return self.fail("Expression is incomplete");
        }

        match evaluate_expression(&self.expression) {
            Ok(value) => {
                self.expression = format_value(value);
                self.display = self.expression.clone();
                KeyOutcome::Evaluated(value)
            }
            Err(CalcError::CalculationFailed { reason, .. }) => self.fail(&reason),
            Err(other) => self.fail(&other.to_string()),
        }
    }

    fn backspace(&mut self) {
        if self.is_error() || self.display.chars().count() <= 1 {
            self.clear();
            return;
        }
        self.display.pop();
        self.expression.pop();
    }

    fn fail(&mut self, message: &str) -> KeyOutcome {
        tracing::debug!(expression = %self.expression, "calculator error: {}", message);
        self.display = ERROR_DISPLAY.to_string();
        self.expression.clear();
        KeyOutcome::Error(message.to_string())
    }
}

/// Evaluate an arithmetic expression.
///
/// Accepts `×`, `÷` and `−` glyphs and bare decimals such as `.5` or `5.`.
/// Non-finite results are rejected as division by zero.
pub fn evaluate_expression(expression: &str) -> CalcResult<f64> {
    let cleaned = normalize_decimals(
        &expression
            .trim()
            .replace('×', "*")
            .replace('÷', "/")
            .replace('−', "-"),
    );

    let expr = Expr::from_str(&cleaned).map_err(|e| {
        CalcError::calculation_failed("expression", format!("Calculation error: {}", e))
    })?;
    let value = expr.eval().map_err(|e| {
        CalcError::calculation_failed("expression", format!("Calculation error: {}", e))
    })?;

    if !value.is_finite() {
        return Err(CalcError::calculation_failed("expression", "Cannot divide by zero"));
    }
    Ok(value)
}

/// `.5` -> `0.5`, `5.` -> `5`
fn normalize_decimals(expression: &str) -> String {
    let chars: Vec<char> = expression.chars().collect();
    let mut out = String::with_capacity(expression.len() + 2);
    for (i, &c) in chars.iter().enumerate() {
        if c == '.' {
            let prev_digit = i > 0 && chars[i - 1].is_ascii_digit();
            let next_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            if !prev_digit {
                out.push('0');
            }
            if !next_digit {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Render a value the way it is written back into the expression.
fn format_value(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(keys: &str) -> Calculator {
        let mut calc = Calculator::new();
        calc.press_sequence(keys).unwrap();
        calc
    }

    #[test]
    fn test_duplicate_operator_collapses() {
        let calc = run("5++3=");
        assert_eq!(calc.display(), "8");
        assert_eq!(calc.expression(), "8");
    }

    #[test]
    fn test_new_operator_replaces_previous() {
        let mut calc = run("6*");
        calc.press(Key::Operator(Operator::Divide));
        assert_eq!(calc.display(), "6/");
        calc.press_sequence("3=").unwrap();
        assert_eq!(calc.display(), "2");
    }

    #[test]
    fn test_precedence() {
        assert_eq!(run("2+3*4=").display(), "14");
    }

    #[test]
    fn test_leading_zero_replaced() {
        let calc = run("7");
        assert_eq!(calc.display(), "7");
        let calc = run(".5");
        assert_eq!(calc.display(), "0.5");
        assert_eq!(calc.expression(), ".5");
    }

    #[test]
    fn test_bare_decimal_evaluates() {
        assert_eq!(run(".5*4=").display(), "2");
        assert_eq!(evaluate_expression("5.+1").unwrap(), 6.0);
    }

    #[test]
    fn test_percent_rewrites_trailing_number() {
        let calc = run("200+50%");
        assert_eq!(calc.display(), "200+0.5");
        assert_eq!(run("50%").display(), "0.5");
    }

    #[test]
    fn test_percent_requires_number() {
        let mut calc = Calculator::new();
        assert_eq!(
            calc.press(Key::Percent),
            KeyOutcome::Notice("Please enter a number first".to_string())
        );

        let mut calc = run("5+");
        assert_eq!(
            calc.press(Key::Percent),
            KeyOutcome::Notice("Please enter a number before percentage".to_string())
        );
        assert_eq!(calc.display(), "5+");
    }

    #[test]
    fn test_divide_by_zero_is_error() {
        let mut calc = run("8/0");
        let outcome = calc.press(Key::Equals);
        assert_eq!(outcome, KeyOutcome::Error("Cannot divide by zero".to_string()));
        assert_eq!(calc.display(), ERROR_DISPLAY);
        assert_eq!(calc.expression(), "");
    }

    #[test]
    fn test_incomplete_expression_is_error() {
        let mut calc = run("9-");
        let outcome = calc.press(Key::Equals);
        assert_eq!(outcome, KeyOutcome::Error("Expression is incomplete".to_string()));
        assert!(calc.is_error());
    }

    #[test]
    fn test_equals_on_empty_is_notice() {
        let mut calc = Calculator::new();
        assert!(matches!(calc.press(Key::Equals), KeyOutcome::Notice(_)));
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn test_number_after_error_starts_fresh() {
        let mut calc = run("1/0=");
        assert!(calc.is_error());
        calc.press_sequence("4+1=").unwrap();
        assert_eq!(calc.display(), "5");
    }

    #[test]
    fn test_backspace() {
        let mut calc = run("123");
        calc.press(Key::Backspace);
        assert_eq!(calc.display(), "12");
        calc.press(Key::Backspace);
        calc.press(Key::Backspace);
        assert_eq!(calc.display(), "0");
        assert_eq!(calc.expression(), "");
    }

    #[test]
    fn test_clear() {
        let mut calc = run("42*");
        calc.press(Key::Clear);
        assert_eq!(calc, Calculator::new());
    }

    #[test]
    fn test_result_feeds_next_expression() {
        let mut calc = run("5+3=");
        calc.press_sequence("*2=").unwrap();
        assert_eq!(calc.display(), "16");
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_key_code("Numpad7"), Some(Key::Digit(7)));
        assert_eq!(Key::from_key_code("Digit0"), Some(Key::Digit(0)));
        assert_eq!(Key::from_key_code("NumpadEnter"), Some(Key::Equals));
        assert_eq!(Key::from_key_code("NumpadMultiply"), Some(Key::Operator(Operator::Multiply)));
        assert_eq!(Key::from_key_code("C"), Some(Key::Clear));
        assert_eq!(Key::from_key_code("F5"), None);
    }

    #[test]
    fn test_display_glyphs() {
        assert_eq!(run("6×7=").display(), "42");
        assert_eq!(run("9÷3=").display(), "3");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut calc = Calculator::new();
        assert!(calc.press_sequence("2^3").is_err());
    }
}
