//! Flex shorthand parsing.
//!
//! A flex attribute value is a compact string describing grow, shrink and
//! basis. The accepted forms are:
//!
//! | Input | Grow | Shrink | Basis | Kind |
//! |-------|------|--------|-------|------|
//! | `""` | 1 | 1 | `0%` | Percent |
//! | `"37%"` | 1 | 1 | `37%` | Percent |
//! | `"37"` | 1 | 1 | `37%` | Percent |
//! | `"37px"`, `"2em"`, `"30vw"` | 1 | 1 | as given | Px |
//! | `"calc(75%-10px)"` | 1 | 1 | `calc(75% - 10px)` | Calc |
//! | `"1 0"` | 1 | 0 | `auto` | Default |
//! | `"1 0 37px"` | 1 | 0 | `37px` | Px |
//! | `"auto"` | 1 | 1 | `auto` | Default |
//! | `"none"` | 0 | 0 | `auto` | Default |
//! | `"nogrow"` | 0 | 1 | `auto` | Default |
//! | `"noshrink"` | 1 | 0 | `auto` | Default |
//! | `"grow"` | 1 | 1 | `100%` | Default |
//! | `"initial"` | 0 | 1 | `auto` | Default |
//!
//! Keyword aliases always classify as [`BasisKind::Default`]: they set the
//! `flex` property only and never clamp the element's size.
//!
//! ```rust
//! use flexout::{parse, BasisKind};
//!
//! let value = parse("1 0 37px").unwrap();
//! assert_eq!(value.grow(), 1.0);
//! assert_eq!(value.shrink(), 0.0);
//! assert_eq!(value.basis(), "37px");
//! assert_eq!(value.kind(), BasisKind::Px);
//!
//! let calc = parse("calc(75%-10px)").unwrap();
//! assert_eq!(calc.basis(), "calc(75% - 10px)");
//! ```

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Keyword aliases accepted in place of a shorthand.
pub const KEYWORDS: &[&str] = &["auto", "none", "nogrow", "noshrink", "grow", "initial"];

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\d+(?:\.\d+)?|\.\d+)$").unwrap());
static PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?|\.\d+)%$").unwrap());
static LENGTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?|\.\d+)(px|em|rem|vw|vh|vmin|vmax|ch|ex|cm|mm|in|pt|pc)$")
        .unwrap()
});
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Classification of a flex basis; decides which size clamps are emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasisKind {
    /// A percentage (`37%`, or a bare number).
    Percent,
    /// An explicit length: `px` or any other absolute or relative unit.
    Px,
    /// A `calc()` expression; never decomposed.
    Calc,
    /// `auto`, `content`, or a keyword alias.
    Default,
}

/// Parsed grow/shrink/basis triple.
///
/// Grow and shrink are always finite and non-negative. Serializes as its
/// shorthand string and deserializes through [`parse`], so a stored value
/// is validated like an attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FlexValue {
    grow: f64,
    shrink: f64,
    basis: String,
    kind: BasisKind,
    /// The keyword alias this value was parsed from, if any.
    #[serde(skip)]
    keyword: Option<&'static str>,
}

impl FlexValue {
    /// Builds a value from explicit parts, validating them like the
    /// positional triple form.
    ///
    /// ```rust
    /// use flexout::{BasisKind, FlexValue};
    ///
    /// let value = FlexValue::new(0.0, 0.0, "375px").unwrap();
    /// assert!(value.is_fixed());
    /// assert_eq!(value.kind(), BasisKind::Px);
    /// ```
    pub fn new(grow: f64, shrink: f64, basis: &str) -> Result<Self, ParseError> {
        let grow = check_factor("grow", grow, &grow.to_string())?;
        let shrink = check_factor("shrink", shrink, &shrink.to_string())?;
        let (basis, kind) = if basis.trim_start().starts_with("calc(") {
            (normalize_calc(basis)?, BasisKind::Calc)
        } else {
            triple_basis(basis.trim())?
        };
        Ok(Self {
            grow,
            shrink,
            basis,
            kind,
            keyword: None,
        })
    }

    /// The flex-grow factor.
    pub fn grow(&self) -> f64 {
        self.grow
    }

    /// The flex-shrink factor.
    pub fn shrink(&self) -> f64 {
        self.shrink
    }

    /// The normalized basis as written into the `flex` property.
    pub fn basis(&self) -> &str {
        &self.basis
    }

    /// How the basis was classified; decides the size clamps.
    pub fn kind(&self) -> BasisKind {
        self.kind
    }

    /// The keyword alias (`auto`, `grow`, ...) this value came from.
    pub fn keyword(&self) -> Option<&'static str> {
        self.keyword
    }

    /// Neither grows nor shrinks: the basis is the exact size.
    pub fn is_fixed(&self) -> bool {
        self.grow == 0.0 && self.shrink == 0.0
    }

    /// A percentage basis of zero (the empty shorthand, `0`, `0%`, `0px`).
    pub fn is_zero_percent(&self) -> bool {
        self.kind == BasisKind::Percent
            && self
                .basis
                .trim_end_matches('%')
                .parse::<f64>()
                .map_or(false, |v| v == 0.0)
    }
}

impl Default for FlexValue {
    fn default() -> Self {
        Self {
            grow: 1.0,
            shrink: 1.0,
            basis: "0%".to_string(),
            kind: BasisKind::Percent,
            keyword: None,
        }
    }
}

/// Renders the keyword for keyword aliases, otherwise the literal triple,
/// e.g. `1 0 37px`. The output always parses back to an equal value.
impl fmt::Display for FlexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.keyword {
            Some(keyword) => f.write_str(keyword),
            None => write!(f, "{} {} {}", self.grow, self.shrink, self.basis),
        }
    }
}

impl FromStr for FlexValue {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl TryFrom<String> for FlexValue {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse(&value)
    }
}

impl From<FlexValue> for String {
    fn from(value: FlexValue) -> Self {
        value.to_string()
    }
}

/// Parses a flex shorthand.
///
/// # Errors
///
/// - [`ParseError::InvalidFactor`] for non-numeric or negative grow/shrink
/// - [`ParseError::InvalidBasis`] for an unrecognized single token
/// - [`ParseError::TooManyTokens`] for more than three parts
/// - [`ParseError::InvalidCalc`] for unbalanced `calc()` parentheses
pub fn parse(input: &str) -> Result<FlexValue, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(FlexValue::default());
    }
    if let Some(value) = keyword(input) {
        return Ok(value);
    }

    if let Some(start) = input.find("calc(") {
        let basis = normalize_calc(&input[start..])?;
        let head: Vec<&str> = input[..start].split_whitespace().collect();
        let (grow, shrink) = match head.as_slice() {
            [] => (1.0, 1.0),
            [grow, shrink] => (parse_factor("grow", grow)?, parse_factor("shrink", shrink)?),
            [_] => return Err(ParseError::InvalidBasis(input.to_string())),
            _ => return Err(ParseError::TooManyTokens(input.to_string())),
        };
        return Ok(FlexValue {
            grow,
            shrink,
            basis,
            kind: BasisKind::Calc,
            keyword: None,
        });
    }

    let tokens: Vec<&str> = input.split_whitespace().collect();
    match tokens.as_slice() {
        [basis] => {
            let (basis, kind) = basis_token(basis)?;
            Ok(FlexValue {
                grow: 1.0,
                shrink: 1.0,
                basis,
                kind,
                keyword: None,
            })
        }
        [grow, shrink] => Ok(FlexValue {
            grow: parse_factor("grow", grow)?,
            shrink: parse_factor("shrink", shrink)?,
            basis: "auto".to_string(),
            kind: BasisKind::Default,
            keyword: None,
        }),
        [grow, shrink, basis] => {
            let grow = parse_factor("grow", grow)?;
            let shrink = parse_factor("shrink", shrink)?;
            let (basis, kind) = triple_basis(basis)?;
            Ok(FlexValue {
                grow,
                shrink,
                basis,
                kind,
                keyword: None,
            })
        }
        _ => Err(ParseError::TooManyTokens(input.to_string())),
    }
}

fn keyword(input: &str) -> Option<FlexValue> {
    let (keyword, grow, shrink, basis) = match input {
        "auto" => ("auto", 1.0, 1.0, "auto"),
        "none" => ("none", 0.0, 0.0, "auto"),
        "nogrow" => ("nogrow", 0.0, 1.0, "auto"),
        "noshrink" => ("noshrink", 1.0, 0.0, "auto"),
        "grow" => ("grow", 1.0, 1.0, "100%"),
        "initial" => ("initial", 0.0, 1.0, "auto"),
        _ => return None,
    };
    Some(FlexValue {
        grow,
        shrink,
        basis: basis.to_string(),
        kind: BasisKind::Default,
        keyword: Some(keyword),
    })
}

fn parse_factor(factor: &'static str, token: &str) -> Result<f64, ParseError> {
    let value = token.parse::<f64>().map_err(|_| ParseError::InvalidFactor {
        factor,
        value: token.to_string(),
    })?;
    check_factor(factor, value, token)
}

fn check_factor(factor: &'static str, value: f64, token: &str) -> Result<f64, ParseError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ParseError::InvalidFactor {
            factor,
            value: token.to_string(),
        });
    }
    // -0 would otherwise render as "-0".
    Ok(value + 0.0)
}

/// Basis in the third position of a triple: also accepts `auto` and `content`.
fn triple_basis(token: &str) -> Result<(String, BasisKind), ParseError> {
    match token {
        "auto" | "content" => Ok((token.to_string(), BasisKind::Default)),
        _ => basis_token(token),
    }
}

fn basis_token(token: &str) -> Result<(String, BasisKind), ParseError> {
    if PERCENT.is_match(token) {
        return Ok((token.to_string(), BasisKind::Percent));
    }
    if let Some(caps) = LENGTH.captures(token) {
        let zero = caps[1].parse::<f64>().map_or(false, |v| v == 0.0);
        if zero && &caps[2] == "px" {
            return Ok(("0%".to_string(), BasisKind::Percent));
        }
        return Ok((token.to_string(), BasisKind::Px));
    }
    if NUMBER.is_match(token) {
        return Ok((format!("{}%", token), BasisKind::Percent));
    }
    Err(ParseError::InvalidBasis(token.to_string()))
}

/// Normalizes a `calc()` expression so each binary operator is wrapped in
/// exactly one space.
///
/// A `+` or `-` is binary when it follows a closing parenthesis, a
/// percentage, or a numeric token (`10px-5px`). Hyphens inside identifiers
/// (`var(--side-gap)`) and unary signs are left attached.
///
/// ```rust
/// use flexout::shorthand::normalize_calc;
///
/// assert_eq!(normalize_calc("calc(75%-10px)").unwrap(), "calc(75% - 10px)");
/// assert_eq!(normalize_calc("calc( 100%  /3 )").unwrap(), "calc(100% / 3)");
/// assert_eq!(
///     normalize_calc("calc(100% - var(--side-gap))").unwrap(),
///     "calc(100% - var(--side-gap))"
/// );
/// ```
pub fn normalize_calc(expr: &str) -> Result<String, ParseError> {
    let compact = WHITESPACE.replace_all(expr.trim(), "");

    let mut depth = 0i32;
    for c in compact.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(ParseError::InvalidCalc(expr.to_string()));
                }
            }
            _ => {}
        }
    }
    if depth != 0 || !compact.starts_with("calc(") || !compact.ends_with(')') {
        return Err(ParseError::InvalidCalc(expr.to_string()));
    }

    let mut out = String::with_capacity(compact.len() + 8);
    let mut prev: Option<char> = None;
    let mut numeric = false;
    for c in compact.chars() {
        let binary = match c {
            '*' | '/' => true,
            '+' | '-' => match prev {
                Some(')') | Some('%') => true,
                Some(p) if p.is_ascii_alphanumeric() || p == '.' => numeric,
                _ => false,
            },
            _ => false,
        };
        if binary {
            out.push(' ');
            out.push(c);
            out.push(' ');
        } else {
            let starts_token = matches!(prev, None | Some('(' | ')' | ',' | '+' | '-' | '*' | '/'));
            if starts_token && !matches!(c, '(' | ')' | ',' | '+' | '-') {
                numeric = c.is_ascii_digit() || c == '.';
            }
            out.push(c);
        }
        prev = Some(c);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(value: &FlexValue) -> (f64, f64, &str) {
        (value.grow(), value.shrink(), value.basis())
    }

    #[test]
    fn test_parse_empty_defaults() {
        for input in ["", "   ", "\t"] {
            let value = parse(input).unwrap();
            assert_eq!(triple(&value), (1.0, 1.0, "0%"));
            assert_eq!(value.kind(), BasisKind::Percent);
            assert!(value.is_zero_percent());
        }
    }

    #[test]
    fn test_parse_pixel() {
        let value = parse("37px").unwrap();
        assert_eq!(triple(&value), (1.0, 1.0, "37px"));
        assert_eq!(value.kind(), BasisKind::Px);
    }

    #[test]
    fn test_parse_other_length_units() {
        for input in ["0.9em", "2rem", "30vw", "10vh"] {
            let value = parse(input).unwrap();
            assert_eq!(value.kind(), BasisKind::Px, "{}", input);
            assert_eq!(value.basis(), input);
        }
    }

    #[test]
    fn test_parse_percent() {
        let value = parse("37%").unwrap();
        assert_eq!(triple(&value), (1.0, 1.0, "37%"));
        assert_eq!(value.kind(), BasisKind::Percent);
        assert!(!value.is_zero_percent());
    }

    #[test]
    fn test_parse_bare_number_is_percent() {
        assert_eq!(parse("50").unwrap().basis(), "50%");
        assert_eq!(parse("24.4").unwrap().basis(), "24.4%");
        assert_eq!(parse("24.4").unwrap().kind(), BasisKind::Percent);
    }

    #[test]
    fn test_parse_zero_px_becomes_zero_percent() {
        let value = parse("0px").unwrap();
        assert_eq!(value.basis(), "0%");
        assert!(value.is_zero_percent());
    }

    #[test]
    fn test_parse_two_tokens_default_basis_auto() {
        let value = parse("1 0").unwrap();
        assert_eq!(triple(&value), (1.0, 0.0, "auto"));
        assert_eq!(value.kind(), BasisKind::Default);
    }

    #[test]
    fn test_parse_full_triple() {
        let value = parse("1 2 0.9em").unwrap();
        assert_eq!(triple(&value), (1.0, 2.0, "0.9em"));

        let value = parse("1 0 auto").unwrap();
        assert_eq!(triple(&value), (1.0, 0.0, "auto"));
        assert_eq!(value.kind(), BasisKind::Default);

        let value = parse("0 0 375px").unwrap();
        assert!(value.is_fixed());
    }

    #[test]
    fn test_parse_triple_with_bare_number_basis() {
        let value = parse("1 1 30").unwrap();
        assert_eq!(value.basis(), "30%");
        assert_eq!(value.kind(), BasisKind::Percent);
    }

    #[test]
    fn test_parse_fractional_factors() {
        let value = parse("0.5 1.50 10px").unwrap();
        assert_eq!(value.to_string(), "0.5 1.5 10px");
    }

    // =========================================================================
    // Keywords
    // =========================================================================

    #[test]
    fn test_keywords_map_to_documented_triples() {
        let expected = [
            ("auto", (1.0, 1.0, "auto")),
            ("none", (0.0, 0.0, "auto")),
            ("nogrow", (0.0, 1.0, "auto")),
            ("noshrink", (1.0, 0.0, "auto")),
            ("grow", (1.0, 1.0, "100%")),
            ("initial", (0.0, 1.0, "auto")),
        ];
        for (input, want) in expected {
            let value = parse(input).unwrap();
            assert_eq!(triple(&value), want, "{}", input);
            assert_eq!(value.kind(), BasisKind::Default, "{}", input);
        }
        assert_eq!(KEYWORDS.len(), expected.len());
    }

    #[test]
    fn test_keyword_tolerates_surrounding_whitespace() {
        assert_eq!(parse("  nogrow ").unwrap().grow(), 0.0);
    }

    // =========================================================================
    // calc()
    // =========================================================================

    #[test]
    fn test_parse_calc_with_spaces() {
        let value = parse("calc(30vw - 10px)").unwrap();
        assert_eq!(value.basis(), "calc(30vw - 10px)");
        assert_eq!(value.kind(), BasisKind::Calc);
        assert_eq!((value.grow(), value.shrink()), (1.0, 1.0));
    }

    #[test]
    fn test_parse_calc_without_internal_whitespace() {
        let value = parse("calc(75%-10px)").unwrap();
        assert_eq!(value.basis(), "calc(75% - 10px)");
    }

    #[test]
    fn test_parse_calc_with_factors() {
        let value = parse("0 1 calc(50% + 2em)").unwrap();
        assert_eq!(triple(&value), (0.0, 1.0, "calc(50% + 2em)"));
    }

    #[test]
    fn test_normalize_calc_operators() {
        assert_eq!(normalize_calc("calc(10px+2em)").unwrap(), "calc(10px + 2em)");
        assert_eq!(normalize_calc("calc(100%*2)").unwrap(), "calc(100% * 2)");
        assert_eq!(normalize_calc("calc(100%   -   1px)").unwrap(), "calc(100% - 1px)");
    }

    #[test]
    fn test_normalize_calc_keeps_unary_minus() {
        assert_eq!(normalize_calc("calc(-10px+100%)").unwrap(), "calc(-10px + 100%)");
        assert_eq!(normalize_calc("calc(2*-3px)").unwrap(), "calc(2 * -3px)");
    }

    #[test]
    fn test_normalize_calc_nested_parens() {
        assert_eq!(
            normalize_calc("calc((100%-20px)/3)").unwrap(),
            "calc((100% - 20px) / 3)"
        );
    }

    #[test]
    fn test_normalize_calc_unbalanced() {
        assert!(matches!(
            normalize_calc("calc(75%-10px"),
            Err(ParseError::InvalidCalc(_))
        ));
        assert!(matches!(
            normalize_calc("calc(75%))"),
            Err(ParseError::InvalidCalc(_))
        ));
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn test_parse_non_numeric_grow() {
        assert_eq!(
            parse("a 1 10px"),
            Err(ParseError::InvalidFactor {
                factor: "grow",
                value: "a".to_string()
            })
        );
    }

    #[test]
    fn test_parse_non_numeric_shrink() {
        assert!(matches!(
            parse("1 b"),
            Err(ParseError::InvalidFactor { factor: "shrink", .. })
        ));
    }

    #[test]
    fn test_parse_negative_factor() {
        assert!(matches!(
            parse("-1 1 10px"),
            Err(ParseError::InvalidFactor { factor: "grow", .. })
        ));
    }

    #[test]
    fn test_parse_non_finite_factor() {
        assert!(parse("inf 1 10px").is_err());
        assert!(parse("1 NaN 10px").is_err());
    }

    #[test]
    fn test_parse_too_many_tokens() {
        assert!(matches!(
            parse("1 1 10px 20px"),
            Err(ParseError::TooManyTokens(_))
        ));
    }

    #[test]
    fn test_parse_unknown_single_token() {
        assert_eq!(parse("wide"), Err(ParseError::InvalidBasis("wide".to_string())));
        assert!(parse("12abc").is_err());
    }

    #[test]
    fn test_parse_calc_with_single_factor() {
        assert!(matches!(
            parse("1 calc(10px)"),
            Err(ParseError::InvalidBasis(_))
        ));
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn test_new_validates_like_triple() {
        let value = FlexValue::new(1.0, 0.0, "37px").unwrap();
        assert_eq!(value, parse("1 0 37px").unwrap());

        assert!(FlexValue::new(-1.0, 0.0, "37px").is_err());
        assert!(FlexValue::new(1.0, 0.0, "wide").is_err());
        assert_eq!(
            FlexValue::new(1.0, 1.0, "calc(1px+1%)").unwrap().basis(),
            "calc(1px + 1%)"
        );
    }

    #[test]
    fn test_from_str() {
        let value: FlexValue = "noshrink".parse().unwrap();
        assert_eq!(value.shrink(), 0.0);
    }

    #[test]
    fn test_display_renders_triple() {
        assert_eq!(parse("1 0 37px").unwrap().to_string(), "1 0 37px");
        assert_eq!(parse("").unwrap().to_string(), "1 1 0%");
    }

    #[test]
    fn test_display_keeps_keyword() {
        for keyword in KEYWORDS {
            let value = parse(keyword).unwrap();
            assert_eq!(value.to_string(), *keyword);
            assert_eq!(value.keyword(), Some(*keyword));
        }
        assert_eq!(parse("1 1 100%").unwrap().keyword(), None);
    }

    #[test]
    fn test_display_reparses_to_same_styles() {
        use crate::direction::LayoutDirection;
        use crate::style::build_styles;

        let inputs = KEYWORDS
            .iter()
            .copied()
            .chain(["", "37", "0px", "1 0", "2em", "0 0 content", "calc(75%-10px)"]);
        for input in inputs {
            let value = parse(input).unwrap();
            let reparsed: FlexValue = value.to_string().parse().unwrap();
            assert_eq!(reparsed, value, "{:?}", input);
            for dir in [LayoutDirection::Row, LayoutDirection::Column] {
                assert_eq!(
                    build_styles(&reparsed, dir),
                    build_styles(&value, dir),
                    "{:?}",
                    input
                );
            }
        }
    }

    // =========================================================================
    // Serde
    // =========================================================================

    #[test]
    fn test_serde_uses_shorthand_string() {
        let value = parse("grow").unwrap();
        let yaml = serde_yaml::to_string(&value).unwrap();
        assert_eq!(yaml.trim(), "grow");
        let back: FlexValue = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, value);

        let back: FlexValue = serde_yaml::from_str("1 0 37px").unwrap();
        assert_eq!(back.kind(), BasisKind::Px);
    }

    #[test]
    fn test_deserialize_rejects_invalid_values() {
        assert!(serde_yaml::from_str::<FlexValue>("-3 1 bogus").is_err());
        assert!(serde_yaml::from_str::<FlexValue>("1 1 bogus").is_err());
        assert!(
            serde_yaml::from_str::<FlexValue>("{grow: -3, shrink: 1, basis: bogus, kind: px}")
                .is_err()
        );
    }
}
