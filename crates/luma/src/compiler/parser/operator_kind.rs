use crate::compiler::parser::LumaTokenKind;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum UnaryOperator {
    OpNot,  // not
    OpLen,  // #
    OpUnm,  // -
    OpBNot, // ~
    OpNop,  // (empty)
}

#[derive(Debug)]
pub struct PriorityTable {
    pub left: i32,
    pub right: i32,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum BinaryOperator {
    OpAdd,    // +
    OpSub,    // -
    OpMul,    // *
    OpDiv,    // /
    OpIDiv,   // //
    OpMod,    // %
    OpPow,    // ^
    OpBAnd,   // &
    OpBOr,    // |
    OpBXor,   // ~
    OpShl,    // <<
    OpShr,    // >>
    OpConcat, // ..
    OpEq,     // ==
    OpNe,     // ~=
    OpLt,     // <
    OpLe,     // <=
    OpGt,     // >
    OpGe,     // >=
    OpAnd,    // and
    OpOr,     // or
    OpNop,    // (empty)
}

/// Binding powers, indexed by `BinaryOperator` discriminant. Right-associative
/// operators (`..`, `^`) carry a right priority below their left one so the
/// recursive descent re-enters at the same level.
pub const PRIORITY: [PriorityTable; 21] = [
    PriorityTable {
        left: 10,
        right: 10,
    }, // OpAdd
    PriorityTable {
        left: 10,
        right: 10,
    }, // OpSub
    PriorityTable {
        left: 11,
        right: 11,
    }, // OpMul
    PriorityTable {
        left: 11,
        right: 11,
    }, // OpDiv
    PriorityTable {
        left: 11,
        right: 11,
    }, // OpIDiv
    PriorityTable {
        left: 11,
        right: 11,
    }, // OpMod
    PriorityTable {
        left: 14,
        right: 13,
    }, // OpPow
    PriorityTable { left: 6, right: 6 }, // OpBAnd
    PriorityTable { left: 4, right: 4 }, // OpBOr
    PriorityTable { left: 5, right: 5 }, // OpBXor
    PriorityTable { left: 7, right: 7 }, // OpShl
    PriorityTable { left: 7, right: 7 }, // OpShr
    PriorityTable { left: 9, right: 8 }, // OpConcat
    PriorityTable { left: 3, right: 3 }, // OpEq
    PriorityTable { left: 3, right: 3 }, // OpNe
    PriorityTable { left: 3, right: 3 }, // OpLt
    PriorityTable { left: 3, right: 3 }, // OpLe
    PriorityTable { left: 3, right: 3 }, // OpGt
    PriorityTable { left: 3, right: 3 }, // OpGe
    PriorityTable { left: 2, right: 2 }, // OpAnd
    PriorityTable { left: 1, right: 1 }, // OpOr
];

/// Unary operators bind tighter than every binary operator except `^`.
pub const UNARY_PRIORITY: i32 = 12;

impl BinaryOperator {
    pub fn get_priority(&self) -> &'static PriorityTable {
        &PRIORITY[*self as usize]
    }
}

pub fn to_unary_operator(kind: LumaTokenKind) -> UnaryOperator {
    match kind {
        LumaTokenKind::TkNot => UnaryOperator::OpNot,
        LumaTokenKind::TkLen => UnaryOperator::OpLen,
        LumaTokenKind::TkMinus => UnaryOperator::OpUnm,
        LumaTokenKind::TkBitXor => UnaryOperator::OpBNot,
        _ => UnaryOperator::OpNop,
    }
}

pub fn to_binary_operator(kind: LumaTokenKind) -> BinaryOperator {
    match kind {
        LumaTokenKind::TkPlus => BinaryOperator::OpAdd,
        LumaTokenKind::TkMinus => BinaryOperator::OpSub,
        LumaTokenKind::TkMul => BinaryOperator::OpMul,
        LumaTokenKind::TkDiv => BinaryOperator::OpDiv,
        LumaTokenKind::TkIDiv => BinaryOperator::OpIDiv,
        LumaTokenKind::TkMod => BinaryOperator::OpMod,
        LumaTokenKind::TkPow => BinaryOperator::OpPow,
        LumaTokenKind::TkBitAnd => BinaryOperator::OpBAnd,
        LumaTokenKind::TkBitOr => BinaryOperator::OpBOr,
        LumaTokenKind::TkBitXor => BinaryOperator::OpBXor,
        LumaTokenKind::TkShl => BinaryOperator::OpShl,
        LumaTokenKind::TkShr => BinaryOperator::OpShr,
        LumaTokenKind::TkConcat => BinaryOperator::OpConcat,
        LumaTokenKind::TkEq => BinaryOperator::OpEq,
        LumaTokenKind::TkNe => BinaryOperator::OpNe,
        LumaTokenKind::TkLt => BinaryOperator::OpLt,
        LumaTokenKind::TkLe => BinaryOperator::OpLe,
        LumaTokenKind::TkGt => BinaryOperator::OpGt,
        LumaTokenKind::TkGe => BinaryOperator::OpGe,
        LumaTokenKind::TkAnd => BinaryOperator::OpAnd,
        LumaTokenKind::TkOr => BinaryOperator::OpOr,
        _ => BinaryOperator::OpNop,
    }
}
