//! Plural-Forms selection.
//!
//! Parses the header value `nplurals=N; plural=<expr>;` and evaluates the
//! formula for a cardinal count. The formula language is the C subset gettext
//! accepts: the variable `n`, unsigned integers, `! * / % + - < <= > >= == !=
//! && || ?:` and parentheses.
//!
//! Evaluation is total: arithmetic wraps, comparisons yield 0 or 1, and a
//! division or modulo by zero yields 0.

use serde::Serialize;

use crate::error::PluralError;

/// Binary operators, in the order of the C grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinOp {
    fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::Ne => 3,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::Rem => 6,
        }
    }

    fn apply(self, a: u64, b: u64) -> u64 {
        match self {
            // Short-circuiting operators are handled by the caller.
            Self::Or => u64::from(a != 0 || b != 0),
            Self::And => u64::from(a != 0 && b != 0),
            Self::Eq => u64::from(a == b),
            Self::Ne => u64::from(a != b),
            Self::Lt => u64::from(a < b),
            Self::Le => u64::from(a <= b),
            Self::Gt => u64::from(a > b),
            Self::Ge => u64::from(a >= b),
            Self::Add => a.wrapping_add(b),
            Self::Sub => a.wrapping_sub(b),
            Self::Mul => a.wrapping_mul(b),
            Self::Div => a.checked_div(b).unwrap_or(0),
            Self::Rem => a.checked_rem(b).unwrap_or(0),
        }
    }
}

/// Parsed plural formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// The count variable `n`.
    Var,
    Const(u64),
    Not(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Parse a formula such as `(n != 1)`.
    pub fn parse(input: &str) -> Result<Self, PluralError> {
        let tokens = tokenize(input)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser.ternary()?;
        if let Some((offset, _)) = parser.tokens.get(parser.pos) {
            return Err(PluralError::TrailingInput { offset: *offset });
        }
        Ok(expr)
    }

    /// Evaluate the formula for count `n`.
    pub fn eval(&self, n: u64) -> u64 {
        match self {
            Self::Var => n,
            Self::Const(value) => *value,
            Self::Not(inner) => u64::from(inner.eval(n) == 0),
            Self::Binary(BinOp::Or, lhs, rhs) => {
                u64::from(lhs.eval(n) != 0 || rhs.eval(n) != 0)
            }
            Self::Binary(BinOp::And, lhs, rhs) => {
                u64::from(lhs.eval(n) != 0 && rhs.eval(n) != 0)
            }
            Self::Binary(op, lhs, rhs) => op.apply(lhs.eval(n), rhs.eval(n)),
            Self::Ternary(cond, then, otherwise) => {
                if cond.eval(n) != 0 {
                    then.eval(n)
                } else {
                    otherwise.eval(n)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Num(u64),
    Var,
    LParen,
    RParen,
    Question,
    Colon,
    Not,
    Op(BinOp),
}

impl Token {
    fn describe(self) -> String {
        match self {
            Self::Num(value) => value.to_string(),
            Self::Var => "n".to_string(),
            Self::LParen => "(".to_string(),
            Self::RParen => ")".to_string(),
            Self::Question => "?".to_string(),
            Self::Colon => ":".to_string(),
            Self::Not => "!".to_string(),
            Self::Op(op) => format!("{op:?}"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, PluralError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let next = bytes.get(i + 1).copied();
        let start = i;

        let (token, width) = match (c, next) {
            (b' ' | b'\t' | b'\r' | b'\n', _) => {
                i += 1;
                continue;
            }
            (b'0'..=b'9', _) => {
                let end = bytes[i..]
                    .iter()
                    .position(|b| !b.is_ascii_digit())
                    .map_or(bytes.len(), |p| i + p);
                let value = input[i..end]
                    .parse::<u64>()
                    .map_err(|_| PluralError::IntegerOverflow { offset: i })?;
                (Token::Num(value), end - i)
            }
            (b'n', _) => (Token::Var, 1),
            (b'|', Some(b'|')) => (Token::Op(BinOp::Or), 2),
            (b'&', Some(b'&')) => (Token::Op(BinOp::And), 2),
            (b'=', Some(b'=')) => (Token::Op(BinOp::Eq), 2),
            (b'!', Some(b'=')) => (Token::Op(BinOp::Ne), 2),
            (b'<', Some(b'=')) => (Token::Op(BinOp::Le), 2),
            (b'>', Some(b'=')) => (Token::Op(BinOp::Ge), 2),
            (b'<', _) => (Token::Op(BinOp::Lt), 1),
            (b'>', _) => (Token::Op(BinOp::Gt), 1),
            (b'+', _) => (Token::Op(BinOp::Add), 1),
            (b'-', _) => (Token::Op(BinOp::Sub), 1),
            (b'*', _) => (Token::Op(BinOp::Mul), 1),
            (b'/', _) => (Token::Op(BinOp::Div), 1),
            (b'%', _) => (Token::Op(BinOp::Rem), 1),
            (b'!', _) => (Token::Not, 1),
            (b'?', _) => (Token::Question, 1),
            (b':', _) => (Token::Colon, 1),
            (b'(', _) => (Token::LParen, 1),
            (b')', _) => (Token::RParen, 1),
            _ => {
                let found = input[i..].chars().next().unwrap_or('?');
                return Err(PluralError::UnexpectedChar { offset: i, found });
            }
        };

        tokens.push((start, token));
        i += width;
    }

    Ok(tokens)
}

/// Nesting allowed for parentheses, `!`, ternary branches and operator
/// chains. Real rules stay in single digits; the cap bounds recursion in the
/// parser and in `Expr::eval`.
const MAX_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|(_, t)| *t)
    }

    fn advance(&mut self) -> Result<(usize, Token), PluralError> {
        let token = self
            .tokens
            .get(self.pos)
            .copied()
            .ok_or(PluralError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn descend(&mut self, offset: usize) -> Result<(), PluralError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(PluralError::TooDeep { offset });
        }
        Ok(())
    }

    fn expect(&mut self, wanted: Token) -> Result<(), PluralError> {
        let (offset, token) = self.advance()?;
        if token == wanted {
            Ok(())
        } else {
            Err(PluralError::UnexpectedToken {
                offset,
                found: token.describe(),
            })
        }
    }

    /// `cond ? a : b`, right-associative.
    fn ternary(&mut self) -> Result<Expr, PluralError> {
        let cond = self.binary(1)?;
        if self.peek() != Some(Token::Question) {
            return Ok(cond);
        }
        let (offset, _) = self.advance()?;
        let depth = self.depth;
        self.descend(offset)?;
        let then = self.ternary()?;
        self.expect(Token::Colon)?;
        let otherwise = self.ternary()?;
        self.depth = depth;
        Ok(Expr::Ternary(
            Box::new(cond),
            Box::new(then),
            Box::new(otherwise),
        ))
    }

    fn binary(&mut self, min_precedence: u8) -> Result<Expr, PluralError> {
        let depth = self.depth;
        let mut lhs = self.unary()?;
        while let Some(Token::Op(op)) = self.peek() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            let (offset, _) = self.advance()?;
            // Each operator in a chain deepens the left spine.
            self.descend(offset)?;
            let rhs = self.binary(precedence + 1)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, PluralError> {
        let (offset, token) = self.advance()?;
        match token {
            Token::Not => {
                let depth = self.depth;
                self.descend(offset)?;
                let inner = self.unary()?;
                self.depth = depth;
                Ok(Expr::Not(Box::new(inner)))
            }
            Token::Num(value) => Ok(Expr::Const(value)),
            Token::Var => Ok(Expr::Var),
            Token::LParen => {
                let depth = self.depth;
                self.descend(offset)?;
                let inner = self.ternary()?;
                self.expect(Token::RParen)?;
                self.depth = depth;
                Ok(inner)
            }
            other => Err(PluralError::UnexpectedToken {
                offset,
                found: other.describe(),
            }),
        }
    }
}

/// The `Plural-Forms` rule of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluralForms {
    nplurals: usize,
    #[serde(rename = "plural_forms")]
    source: String,
    #[serde(skip)]
    expr: Expr,
}

impl PluralForms {
    /// Parse a header value like `nplurals=2; plural=(n != 1);`.
    pub fn parse(value: &str) -> Result<Self, PluralError> {
        let mut nplurals = None;
        let mut expr = None;

        for part in value.split(';') {
            let Some((key, raw)) = part.split_once('=') else {
                continue;
            };
            match key.trim() {
                "nplurals" => {
                    let raw = raw.trim();
                    let parsed = raw
                        .parse::<usize>()
                        .ok()
                        .filter(|count| *count >= 1)
                        .ok_or_else(|| PluralError::InvalidNplurals {
                            raw: raw.to_string(),
                        })?;
                    nplurals = Some(parsed);
                }
                "plural" => expr = Some(Expr::parse(raw)?),
                _ => {}
            }
        }

        Ok(Self {
            nplurals: nplurals.ok_or(PluralError::MissingNplurals)?,
            expr: expr.ok_or(PluralError::MissingPlural)?,
            source: value.trim().to_string(),
        })
    }

    /// Number of plural slots each plural entry must provide.
    pub fn nplurals(&self) -> usize {
        self.nplurals
    }

    /// The formula as written in the header.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Select the `msgstr[n]` slot for `count`.
    pub fn index(&self, count: u64) -> Result<usize, PluralError> {
        let raw = self.expr.eval(count);
        usize::try_from(raw)
            .ok()
            .filter(|index| *index < self.nplurals)
            .ok_or(PluralError::IndexOutOfRange {
                count,
                index: raw,
                nplurals: self.nplurals,
            })
    }
}

impl Default for PluralForms {
    /// The Germanic rule gettext assumes when a catalog declares nothing.
    fn default() -> Self {
        Self {
            nplurals: 2,
            source: "nplurals=2; plural=(n != 1);".to_string(),
            expr: Expr::Binary(BinOp::Ne, Box::new(Expr::Var), Box::new(Expr::Const(1))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const HUNGARIAN: &str = "nplurals=2; plural=(n != 1);";
    const POLISH: &str =
        "nplurals=3; plural=(n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);";

    #[test]
    fn hungarian_rule() {
        let forms = PluralForms::parse(HUNGARIAN).unwrap();
        assert_eq!(forms.nplurals(), 2);
        assert_eq!(forms.index(1).unwrap(), 0);
        assert_eq!(forms.index(0).unwrap(), 1);
        assert_eq!(forms.index(5).unwrap(), 1);
        assert_eq!(forms.index(u64::MAX).unwrap(), 1);
    }

    #[test]
    fn default_matches_hungarian() {
        let parsed = PluralForms::parse(HUNGARIAN).unwrap();
        let default = PluralForms::default();
        for n in 0..50 {
            assert_eq!(parsed.index(n).unwrap(), default.index(n).unwrap());
        }
    }

    #[test]
    fn polish_rule() {
        let forms = PluralForms::parse(POLISH).unwrap();
        assert_eq!(forms.index(1).unwrap(), 0);
        assert_eq!(forms.index(2).unwrap(), 1);
        assert_eq!(forms.index(4).unwrap(), 1);
        assert_eq!(forms.index(5).unwrap(), 2);
        assert_eq!(forms.index(12).unwrap(), 2);
        assert_eq!(forms.index(22).unwrap(), 1);
        assert_eq!(forms.index(0).unwrap(), 2);
    }

    #[test]
    fn single_form_languages() {
        let forms = PluralForms::parse("nplurals=1; plural=0;").unwrap();
        assert_eq!(forms.index(0).unwrap(), 0);
        assert_eq!(forms.index(7).unwrap(), 0);
    }

    #[test]
    fn ternary_is_right_associative() {
        let expr = Expr::parse("n==0 ? 0 : n==1 ? 1 : 2").unwrap();
        assert_eq!(expr.eval(0), 0);
        assert_eq!(expr.eval(1), 1);
        assert_eq!(expr.eval(9), 2);
    }

    #[test]
    fn precedence_follows_c() {
        assert_eq!(Expr::parse("1 + 2 * 3").unwrap().eval(0), 7);
        assert_eq!(Expr::parse("(1 + 2) * 3").unwrap().eval(0), 9);
        assert_eq!(Expr::parse("n % 10 == 1 && n % 100 != 11").unwrap().eval(21), 1);
        assert_eq!(Expr::parse("n % 10 == 1 && n % 100 != 11").unwrap().eval(11), 0);
        assert_eq!(Expr::parse("!n").unwrap().eval(0), 1);
        assert_eq!(Expr::parse("!!n").unwrap().eval(3), 1);
    }

    #[test]
    fn division_by_zero_yields_zero() {
        assert_eq!(Expr::parse("n / 0").unwrap().eval(5), 0);
        assert_eq!(Expr::parse("n % 0").unwrap().eval(5), 0);
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let forms = PluralForms::parse("nplurals=2; plural=n;").unwrap();
        assert_eq!(forms.index(1).unwrap(), 1);
        let err = forms.index(2).unwrap_err();
        assert_eq!(
            err,
            PluralError::IndexOutOfRange {
                count: 2,
                index: 2,
                nplurals: 2
            }
        );
    }

    #[test]
    fn rejects_malformed_headers() {
        assert_eq!(
            PluralForms::parse("plural=(n != 1);").unwrap_err(),
            PluralError::MissingNplurals
        );
        assert_eq!(
            PluralForms::parse("nplurals=2;").unwrap_err(),
            PluralError::MissingPlural
        );
        assert!(matches!(
            PluralForms::parse("nplurals=0; plural=0;").unwrap_err(),
            PluralError::InvalidNplurals { .. }
        ));
        assert!(matches!(
            PluralForms::parse("nplurals=two; plural=0;").unwrap_err(),
            PluralError::InvalidNplurals { .. }
        ));
    }

    #[test]
    fn rejects_malformed_expressions() {
        assert!(matches!(
            Expr::parse("n != ").unwrap_err(),
            PluralError::UnexpectedEnd
        ));
        assert!(matches!(
            Expr::parse("n $ 1").unwrap_err(),
            PluralError::UnexpectedChar { found: '$', .. }
        ));
        assert!(matches!(
            Expr::parse("(n != 1").unwrap_err(),
            PluralError::UnexpectedEnd
        ));
        assert!(matches!(
            Expr::parse("n 1").unwrap_err(),
            PluralError::TrailingInput { .. }
        ));
        assert!(matches!(
            Expr::parse("n ? 1").unwrap_err(),
            PluralError::UnexpectedEnd
        ));
        assert!(matches!(
            Expr::parse("99999999999999999999999").unwrap_err(),
            PluralError::IntegerOverflow { .. }
        ));
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let depth = 10_000;
        let nested = format!("{}n != 1{}", "(".repeat(depth), ")".repeat(depth));
        assert!(matches!(
            Expr::parse(&nested).unwrap_err(),
            PluralError::TooDeep { .. }
        ));

        let negated = format!("{}n", "!".repeat(depth));
        assert!(matches!(
            Expr::parse(&negated).unwrap_err(),
            PluralError::TooDeep { .. }
        ));

        let chained = format!("n{}", " + n".repeat(depth));
        assert!(matches!(
            Expr::parse(&chained).unwrap_err(),
            PluralError::TooDeep { .. }
        ));

        let ternaries = format!("{}0", "n ? 1 : ".repeat(depth));
        assert!(matches!(
            PluralForms::parse(&format!("nplurals=2; plural={ternaries};")).unwrap_err(),
            PluralError::TooDeep { .. }
        ));
    }

    #[test]
    fn moderate_nesting_still_parses() {
        let nested = format!("{}n != 1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(Expr::parse(&nested).unwrap().eval(2), 1);

        let arabic = "n==0 ? 0 : n==1 ? 1 : n==2 ? 2 : n%100>=3 && n%100<=10 ? 3 : n%100>=11 ? 4 : 5";
        let expr = Expr::parse(arabic).unwrap();
        assert_eq!(expr.eval(0), 0);
        assert_eq!(expr.eval(5), 3);
        assert_eq!(expr.eval(111), 4);
        assert_eq!(expr.eval(100), 5);
    }
}
