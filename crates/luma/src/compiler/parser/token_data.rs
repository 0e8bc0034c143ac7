use crate::compiler::parser::{text_range::SourceRange, token_kind::LumaTokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LumaTokenData {
    pub kind: LumaTokenKind,
    pub range: SourceRange,
    /// 1-based line of the token's first character.
    pub line: u32,
    /// 1-based column (byte offset within the line) of the first character.
    pub col: u32,
}

impl LumaTokenData {
    pub fn new(kind: LumaTokenKind, range: SourceRange, line: u32, col: u32) -> Self {
        LumaTokenData {
            kind,
            range,
            line,
            col,
        }
    }
}
