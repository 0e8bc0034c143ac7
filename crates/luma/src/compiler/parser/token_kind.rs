use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LumaTokenKind {
    // KeyWord
    TkAnd,
    TkBreak,
    TkDo,
    TkElse,
    TkElseIf,
    TkEnd,
    TkFalse,
    TkFor,
    TkFunction,
    TkIf,
    TkIn,
    TkLocal,
    TkNil,
    TkNot,
    TkOr,
    TkRepeat,
    TkReturn,
    TkThen,
    TkTrue,
    TkUntil,
    TkWhile,

    TkPlus,     // +
    TkMinus,    // -
    TkMul,      // *
    TkDiv,      // /
    TkIDiv,     // //
    TkMod,      // %
    TkPow,      // ^
    TkLen,      // #
    TkBitAnd,   // &
    TkBitOr,    // |
    TkBitXor,   // ~
    TkShl,      // <<
    TkShr,      // >>
    TkDot,      // .
    TkConcat,   // ..
    TkDots,     // ...
    TkAssign,   // =
    TkEq,       // ==
    TkNe,       // ~=
    TkLt,       // <
    TkLe,       // <=
    TkGt,       // >
    TkGe,       // >=
    TkColon,    // :
    TkDbColon,  // ::
    TkSemicolon, // ;
    TkComma,    // ,

    TkLeftParen,    // (
    TkRightParen,   // )
    TkLeftBrace,    // {
    TkRightBrace,   // }
    TkLeftBracket,  // [
    TkRightBracket, // ]

    TkInt,    // integer literal
    TkFloat,  // float literal
    TkString, // short or long string literal

    TkName, // identifier
    TkEof,  // end of input
}

impl LumaTokenKind {
    /// Canonical spelling for error messages. Literal kinds get a
    /// placeholder description.
    pub fn text(self) -> &'static str {
        use LumaTokenKind::*;
        match self {
            TkAnd => "and",
            TkBreak => "break",
            TkDo => "do",
            TkElse => "else",
            TkElseIf => "elseif",
            TkEnd => "end",
            TkFalse => "false",
            TkFor => "for",
            TkFunction => "function",
            TkIf => "if",
            TkIn => "in",
            TkLocal => "local",
            TkNil => "nil",
            TkNot => "not",
            TkOr => "or",
            TkRepeat => "repeat",
            TkReturn => "return",
            TkThen => "then",
            TkTrue => "true",
            TkUntil => "until",
            TkWhile => "while",
            TkPlus => "+",
            TkMinus => "-",
            TkMul => "*",
            TkDiv => "/",
            TkIDiv => "//",
            TkMod => "%",
            TkPow => "^",
            TkLen => "#",
            TkBitAnd => "&",
            TkBitOr => "|",
            TkBitXor => "~",
            TkShl => "<<",
            TkShr => ">>",
            TkDot => ".",
            TkConcat => "..",
            TkDots => "...",
            TkAssign => "=",
            TkEq => "==",
            TkNe => "~=",
            TkLt => "<",
            TkLe => "<=",
            TkGt => ">",
            TkGe => ">=",
            TkColon => ":",
            TkDbColon => "::",
            TkSemicolon => ";",
            TkComma => ",",
            TkLeftParen => "(",
            TkRightParen => ")",
            TkLeftBrace => "{",
            TkRightBrace => "}",
            TkLeftBracket => "[",
            TkRightBracket => "]",
            TkInt => "<integer>",
            TkFloat => "<number>",
            TkString => "<string>",
            TkName => "<name>",
            TkEof => "<eof>",
        }
    }

    pub fn is_keyword(self) -> bool {
        (self as u8) <= (LumaTokenKind::TkWhile as u8)
    }

    /// Tokens that terminate a block without being consumed by it.
    pub fn is_block_follow(self) -> bool {
        matches!(
            self,
            LumaTokenKind::TkEnd
                | LumaTokenKind::TkElse
                | LumaTokenKind::TkElseIf
                | LumaTokenKind::TkUntil
                | LumaTokenKind::TkEof
        )
    }
}

impl fmt::Display for LumaTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}
