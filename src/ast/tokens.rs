use std::fmt;

/// Lexical category handed to the parser by a classifier.
///
/// The set is closed. Literal categories carry their payload; `Nil`,
/// operators and `Eof` carry nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Identifiers
    /// Attribute name on the left of the operator
    ///
    /// # Examples
    /// ```text
    /// x
    /// width
    /// corner_radius
    /// ```
    Attr(String),

    // Literals
    /// Plain number, optionally with a `px` unit
    ///
    /// # Examples
    /// ```text
    /// 10
    /// -4.5
    /// 4px
    /// ```
    Number(f64),

    /// Percentage of the attribute's own reference dimension
    ///
    /// # Examples
    /// ```text
    /// 25%
    /// ```
    Percentage(f64),

    /// Percentage of the reference width
    ///
    /// # Examples
    /// ```text
    /// 50%w
    /// ```
    PercentageH(f64),

    /// Percentage of the reference height
    ///
    /// # Examples
    /// ```text
    /// 50%h
    /// ```
    PercentageV(f64),

    /// Two-component coordinate, kept as written
    ///
    /// # Examples
    /// ```text
    /// 10,20
    /// -4px,8
    /// ```
    Coord(String),

    /// Coordinate with at least one plain percentage component
    ///
    /// # Examples
    /// ```text
    /// 10%,20
    /// 50%,50%
    /// ```
    CoordPercentage(String),

    /// Coordinate whose percentages are of the reference width
    ///
    /// # Examples
    /// ```text
    /// 10%w,20
    /// ```
    CoordPercentageH(String),

    /// Coordinate whose percentages are of the reference height
    ///
    /// # Examples
    /// ```text
    /// 10,20%h
    /// ```
    CoordPercentageV(String),

    /// Explicit absence of a value
    ///
    /// # Examples
    /// ```text
    /// opacity = nil
    /// ```
    Nil,

    // Operators
    /// Plain assignment (`=`)
    Assign,

    /// Add and assign (`+=`)
    AddAssign,

    /// Subtract and assign (`-=`)
    SubAssign,

    /// Multiply and assign (`*=`)
    MulAssign,

    /// Divide and assign (`/=`)
    DivAssign,

    /// End of input
    Eof,
}

impl Token {
    /// Numeric code of the category in the legacy token table.
    ///
    /// Consumers that still switch on integers get the same values the
    /// generated parser used: `=` is its character code, end of input is 0.
    pub fn code(&self) -> i32 {
        match self {
            Token::Eof => 0,
            Token::Assign => '=' as i32,
            Token::Attr(_) => 258,
            Token::Number(_) => 259,
            Token::Percentage(_) => 260,
            Token::PercentageH(_) => 261,
            Token::PercentageV(_) => 262,
            Token::Coord(_) => 263,
            Token::CoordPercentage(_) => 264,
            Token::CoordPercentageH(_) => 265,
            Token::CoordPercentageV(_) => 266,
            Token::Nil => 267,
            Token::AddAssign => 268,
            Token::SubAssign => 269,
            Token::MulAssign => 270,
            Token::DivAssign => 271,
        }
    }

    /// Short category name used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Token::Attr(_) => "attribute",
            Token::Number(_) => "number",
            Token::Percentage(_) => "percentage",
            Token::PercentageH(_) => "width percentage",
            Token::PercentageV(_) => "height percentage",
            Token::Coord(_) => "coordinate",
            Token::CoordPercentage(_) => "percentage coordinate",
            Token::CoordPercentageH(_) => "width percentage coordinate",
            Token::CoordPercentageV(_) => "height percentage coordinate",
            Token::Nil => "nil",
            Token::Assign => "'='",
            Token::AddAssign => "'+='",
            Token::SubAssign => "'-='",
            Token::MulAssign => "'*='",
            Token::DivAssign => "'/='",
            Token::Eof => "end of input",
        }
    }

    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::Assign | Token::AddAssign | Token::SubAssign | Token::MulAssign | Token::DivAssign
        )
    }

    /// Category plus lexeme for payload tokens (`number '20'`), category
    /// alone otherwise. Used in error messages.
    pub fn label(&self) -> String {
        match self {
            Token::Nil | Token::Eof => self.describe().to_string(),
            _ if self.is_operator() => self.describe().to_string(),
            _ => format!("{} '{}'", self.describe(), self),
        }
    }

    /// True for every category allowed on the right of the operator.
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            Token::Number(_)
                | Token::Percentage(_)
                | Token::PercentageH(_)
                | Token::PercentageV(_)
                | Token::Coord(_)
                | Token::CoordPercentage(_)
                | Token::CoordPercentageH(_)
                | Token::CoordPercentageV(_)
                | Token::Nil
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Attr(name) => write!(f, "{}", name),
            Token::Number(n) => write!(f, "{}", n),
            Token::Percentage(n) => write!(f, "{}%", n),
            Token::PercentageH(n) => write!(f, "{}%w", n),
            Token::PercentageV(n) => write!(f, "{}%h", n),
            Token::Coord(text)
            | Token::CoordPercentage(text)
            | Token::CoordPercentageH(text)
            | Token::CoordPercentageV(text) => write!(f, "{}", text),
            Token::Nil => write!(f, "nil"),
            Token::Assign => write!(f, "="),
            Token::AddAssign => write!(f, "+="),
            Token::SubAssign => write!(f, "-="),
            Token::MulAssign => write!(f, "*="),
            Token::DivAssign => write!(f, "/="),
            Token::Eof => Ok(()),
        }
    }
}
