//! Exercise template resolution.
//!
//! Exercise lines may embed bracketed arithmetic over named sets/reps
//! variables, e.g. `"3 x [PULLREPS+2] slow reps"`. Each `[...]` token is
//! evaluated with a small recursive-descent parser (`+ - * /`, unary
//! minus, parentheses, numeric literals, case-insensitive variable names)
//! and replaced with the result rounded to the nearest integer. A token
//! that fails to evaluate for any reason is left verbatim; resolution
//! never fails as a whole.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EvalError {
    #[error("unknown token '{0}'")]
    UnknownToken(String),

    #[error("bad numeric literal '{0}'")]
    BadNumber(String),

    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected token in expression")]
    UnexpectedToken,

    #[error("non-finite result")]
    NonFinite,
}

/// Variable table with case-insensitive lookup.
#[derive(Debug, Clone, Default)]
pub struct VarTable(HashMap<String, f64>);

impl VarTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: f64) {
        self.0.insert(name.to_ascii_uppercase(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(&name.to_ascii_uppercase()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Expand every `[...]` token in `text`. Unresolvable tokens (unknown
/// variable, syntax error, non-finite result) stay verbatim; an unmatched
/// `[` leaves the rest of the line untouched.
pub fn resolve_exercise_text(text: &str, vars: &VarTable) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find(']') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let expr = &after[..close];
        match eval(expr, vars) {
            Ok(value) => out.push_str(&(value.round() as i64).to_string()),
            Err(_) => {
                out.push('[');
                out.push_str(expr);
                out.push(']');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Evaluate one bracket-free arithmetic expression.
pub fn eval(expr: &str, vars: &VarTable) -> Result<f64, EvalError> {
    let tokens = tokenize(expr, vars)?;
    let mut parser = Parser { tokens: &tokens, pos: 0 };
    let value = parser.expr()?;
    if parser.pos != tokens.len() {
        return Err(EvalError::UnexpectedToken);
    }
    if !value.is_finite() {
        return Err(EvalError::NonFinite);
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(expr: &str, vars: &VarTable) -> Result<Vec<Token>, EvalError> {
    let mut out = Vec::new();
    let mut chars = expr.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '+' => {
                chars.next();
                out.push(Token::Plus);
            }
            '-' => {
                chars.next();
                out.push(Token::Minus);
            }
            '*' => {
                chars.next();
                out.push(Token::Star);
            }
            '/' => {
                chars.next();
                out.push(Token::Slash);
            }
            '(' => {
                chars.next();
                out.push(Token::LParen);
            }
            ')' => {
                chars.next();
                out.push(Token::RParen);
            }
            '0'..='9' | '.' => {
                let mut lit = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        lit.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value: f64 = lit.parse().map_err(|_| EvalError::BadNumber(lit.clone()))?;
                out.push(Token::Num(value));
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_alphanumeric() {
                        word.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = vars.get(&word).ok_or(EvalError::UnknownToken(word))?;
                out.push(Token::Num(value));
            }
            other => return Err(EvalError::UnexpectedChar(other)),
        }
    }
    Ok(out)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.peek();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    // expr := term (("+" | "-") term)*
    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    // term := factor (("*" | "/") factor)*
    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    value /= self.factor()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    // factor := NUM | ("+" | "-") factor | "(" expr ")"
    fn factor(&mut self) -> Result<f64, EvalError> {
        match self.next() {
            Some(Token::Num(v)) => Ok(v),
            Some(Token::Minus) => Ok(-self.factor()?),
            Some(Token::Plus) => self.factor(),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    Some(_) => Err(EvalError::UnexpectedToken),
                    None => Err(EvalError::UnexpectedEnd),
                }
            }
            Some(_) => Err(EvalError::UnexpectedToken),
            None => Err(EvalError::UnexpectedEnd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vars(pairs: &[(&str, f64)]) -> VarTable {
        let mut table = VarTable::new();
        for (name, value) in pairs {
            table.insert(name, *value);
        }
        table
    }

    #[test]
    fn substitutes_and_evaluates() {
        let table = vars(&[("PULLREPS", 3.0)]);
        assert_eq!(
            resolve_exercise_text("Hold for [PULLREPS*2] seconds", &table),
            "Hold for 6 seconds"
        );
    }

    #[test]
    fn bad_token_stays_verbatim() {
        assert_eq!(
            resolve_exercise_text("[BADTOKEN+]", &VarTable::new()),
            "[BADTOKEN+]"
        );
    }

    #[test]
    fn variables_are_case_insensitive() {
        let table = vars(&[("PULLSETS", 4.0)]);
        assert_eq!(resolve_exercise_text("[pullsets]", &table), "4");
        assert_eq!(resolve_exercise_text("[PullSets+1]", &table), "5");
    }

    #[test]
    fn respects_precedence_and_parens() {
        let table = vars(&[("SETS", 2.0), ("REPS", 3.0)]);
        assert_eq!(resolve_exercise_text("[SETS+REPS*4]", &table), "14");
        assert_eq!(resolve_exercise_text("[(SETS+REPS)*4]", &table), "20");
        assert_eq!(resolve_exercise_text("[-SETS+10]", &table), "8");
    }

    #[test]
    fn division_rounds_to_nearest() {
        let table = vars(&[("REPS", 3.0)]);
        assert_eq!(resolve_exercise_text("[REPS/2]", &table), "2");
        assert_eq!(resolve_exercise_text("[10/4]", &table), "3");
    }

    #[test]
    fn division_by_zero_stays_verbatim() {
        let table = vars(&[("SETS", 2.0)]);
        assert_eq!(resolve_exercise_text("[SETS/0]", &table), "[SETS/0]");
    }

    #[test]
    fn multiple_tokens_resolve_independently() {
        let table = vars(&[("SETS", 2.0)]);
        assert_eq!(
            resolve_exercise_text("[SETS] sets, [NOPE] reps, [SETS*3] total", &table),
            "2 sets, [NOPE] reps, 6 total"
        );
    }

    #[test]
    fn unmatched_bracket_keeps_tail() {
        let table = vars(&[("SETS", 2.0)]);
        assert_eq!(resolve_exercise_text("do [SETS and more", &table), "do [SETS and more");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(
            resolve_exercise_text("no placeholders here", &VarTable::new()),
            "no placeholders here"
        );
        assert_eq!(resolve_exercise_text("", &VarTable::new()), "");
        assert_eq!(resolve_exercise_text("[]", &VarTable::new()), "[]");
    }

    proptest! {
        #[test]
        fn never_panics(text in ".{0,80}") {
            let table = vars(&[("SETS", 2.0), ("REPS", 3.0)]);
            let _ = resolve_exercise_text(&text, &table);
        }

        #[test]
        fn addition_matches_integers(a in -50i64..50, b in -50i64..50) {
            let table = vars(&[("A", a as f64), ("B", b as f64)]);
            prop_assert_eq!(
                resolve_exercise_text("[A+B]", &table),
                (a + b).to_string()
            );
        }
    }
}
