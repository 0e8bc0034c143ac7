// Abstract syntax tree for the luma core.
// Subtrees are exclusively owned by their parent node; dropping a Block
// releases every descendant.
use crate::compiler::parser::{BinaryOperator, UnaryOperator};

#[derive(Debug, Clone, PartialEq)]
pub enum LumaExpr {
    Nil,
    True,
    False,
    Int(i64),
    Float(f64),
    Str(Box<str>),
    Name(Box<str>),
    Unary {
        op: UnaryOperator,
        expr: Box<LumaExpr>,
    },
    Binary {
        op: BinaryOperator,
        lhs: Box<LumaExpr>,
        rhs: Box<LumaExpr>,
    },
    Call {
        callee: Box<LumaExpr>,
        args: Vec<LumaExpr>,
        line: u32,
    },
}

impl LumaExpr {
    /// True for a call whose callee is the bare name `print`. Such calls
    /// compile to the print opcode and leave nothing on the stack.
    pub fn is_print_call(&self) -> bool {
        match self {
            LumaExpr::Call { callee, .. } => {
                matches!(callee.as_ref(), LumaExpr::Name(name) if name.as_ref() == "print")
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfArm {
    pub cond: LumaExpr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LumaStat {
    Local {
        names: Vec<Box<str>>,
        exprs: Vec<LumaExpr>,
        line: u32,
    },
    Assign {
        targets: Vec<LumaExpr>,
        values: Vec<LumaExpr>,
        line: u32,
    },
    If {
        arms: Vec<IfArm>,
        else_body: Option<Block>,
        line: u32,
    },
    While {
        cond: LumaExpr,
        body: Block,
        line: u32,
    },
    NumericFor {
        var: Box<str>,
        start: LumaExpr,
        limit: LumaExpr,
        step: Option<LumaExpr>,
        body: Block,
        line: u32,
    },
    Repeat {
        body: Block,
        cond: LumaExpr,
        line: u32,
    },
    Do {
        body: Block,
        line: u32,
    },
    Return {
        exprs: Vec<LumaExpr>,
        line: u32,
    },
    Break {
        line: u32,
    },
    ExprStat {
        expr: LumaExpr,
        line: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub stats: Vec<LumaStat>,
}
