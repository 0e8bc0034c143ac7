// Expression compilation. Operands go out in postfix order; and/or use
// conditional jumps instead of an opcode so the right operand only runs when
// the left one does not decide the result.
use crate::compiler::ast::LumaExpr;
use crate::compiler::helpers::*;
use crate::compiler::parser::{BinaryOperator, UnaryOperator};
use crate::compiler::Compiler;
use crate::luma_value::LumaValue;
use crate::luma_vm::{LumaResult, OpCode};

pub(crate) fn compile_expr(c: &mut Compiler, expr: &LumaExpr) -> LumaResult<()> {
    match expr {
        LumaExpr::Nil => {
            emit_op(c, OpCode::PushNil);
            Ok(())
        }
        LumaExpr::True => {
            emit_op(c, OpCode::PushTrue);
            Ok(())
        }
        LumaExpr::False => {
            emit_op(c, OpCode::PushFalse);
            Ok(())
        }
        LumaExpr::Int(value) => emit_constant(c, LumaValue::Integer(*value)),
        LumaExpr::Float(value) => emit_constant(c, LumaValue::Float(*value)),
        LumaExpr::Str(content) => {
            let id = c.interner.intern(content)?;
            emit_constant(c, LumaValue::Str(id))
        }
        LumaExpr::Name(name) => compile_name_load(c, name),
        LumaExpr::Unary { op, expr } => {
            compile_expr(c, expr)?;
            emit_op(c, unary_opcode(*op));
            Ok(())
        }
        LumaExpr::Binary { op, lhs, rhs } => match op {
            BinaryOperator::OpAnd => compile_and(c, lhs, rhs),
            BinaryOperator::OpOr => compile_or(c, lhs, rhs),
            _ => {
                compile_expr(c, lhs)?;
                compile_expr(c, rhs)?;
                emit_op(c, binary_opcode(*op));
                Ok(())
            }
        },
        LumaExpr::Call { callee, args, line } => compile_call(c, callee, args, *line),
    }
}

/// Load an identifier: the innermost local wins, otherwise the global with
/// that name (resolved at runtime through the constant pool).
fn compile_name_load(c: &mut Compiler, name: &str) -> LumaResult<()> {
    if let Some(slot) = resolve_local(c, name) {
        emit_op(c, OpCode::GetLocal);
        emit_byte(c, slot);
    } else {
        let index = name_constant(c, name)?;
        emit_op(c, OpCode::GetGlobal);
        emit_u16(c, index);
    }
    Ok(())
}

/// Store the top of stack into an identifier and pop it.
pub(crate) fn compile_name_store(c: &mut Compiler, name: &str) -> LumaResult<()> {
    if let Some(slot) = resolve_local(c, name) {
        emit_op(c, OpCode::SetLocal);
        emit_byte(c, slot);
    } else {
        let index = name_constant(c, name)?;
        emit_op(c, OpCode::SetGlobal);
        emit_u16(c, index);
    }
    Ok(())
}

/// `a and b`: keep the falsy left operand, otherwise replace it with b.
fn compile_and(c: &mut Compiler, lhs: &LumaExpr, rhs: &LumaExpr) -> LumaResult<()> {
    compile_expr(c, lhs)?;
    let end_jump = emit_jump(c, OpCode::JumpIfFalse);
    emit_op(c, OpCode::Pop);
    compile_expr(c, rhs)?;
    patch_jump(c, end_jump)
}

/// `a or b`: keep the truthy left operand, otherwise replace it with b.
fn compile_or(c: &mut Compiler, lhs: &LumaExpr, rhs: &LumaExpr) -> LumaResult<()> {
    compile_expr(c, lhs)?;
    let end_jump = emit_jump(c, OpCode::JumpIfTrue);
    emit_op(c, OpCode::Pop);
    compile_expr(c, rhs)?;
    patch_jump(c, end_jump)
}

fn compile_call(
    c: &mut Compiler,
    callee: &LumaExpr,
    args: &[LumaExpr],
    line: u32,
) -> LumaResult<()> {
    c.line = line;

    // the print builtin is recognized by callee name alone
    if matches!(callee, LumaExpr::Name(name) if name.as_ref() == "print") {
        for arg in args {
            compile_expr(c, arg)?;
        }
        emit_op(c, OpCode::Print);
        emit_byte(c, args.len() as u8);
        return Ok(());
    }

    compile_expr(c, callee)?;
    for arg in args {
        compile_expr(c, arg)?;
    }
    emit_op(c, OpCode::Call);
    emit_byte(c, args.len() as u8);
    Ok(())
}

fn unary_opcode(op: UnaryOperator) -> OpCode {
    match op {
        UnaryOperator::OpUnm => OpCode::Negate,
        UnaryOperator::OpNot => OpCode::Not,
        UnaryOperator::OpBNot => OpCode::BNot,
        UnaryOperator::OpLen => OpCode::Len,
        UnaryOperator::OpNop => unreachable!("no opcode for OpNop"),
    }
}

fn binary_opcode(op: BinaryOperator) -> OpCode {
    match op {
        BinaryOperator::OpAdd => OpCode::Add,
        BinaryOperator::OpSub => OpCode::Sub,
        BinaryOperator::OpMul => OpCode::Mul,
        BinaryOperator::OpDiv => OpCode::Div,
        BinaryOperator::OpIDiv => OpCode::IDiv,
        BinaryOperator::OpMod => OpCode::Mod,
        BinaryOperator::OpPow => OpCode::Pow,
        BinaryOperator::OpBAnd => OpCode::BAnd,
        BinaryOperator::OpBOr => OpCode::BOr,
        BinaryOperator::OpBXor => OpCode::BXor,
        BinaryOperator::OpShl => OpCode::Shl,
        BinaryOperator::OpShr => OpCode::Shr,
        BinaryOperator::OpConcat => OpCode::Concat,
        BinaryOperator::OpEq => OpCode::Eq,
        BinaryOperator::OpNe => OpCode::Ne,
        BinaryOperator::OpLt => OpCode::Lt,
        BinaryOperator::OpLe => OpCode::Le,
        BinaryOperator::OpGt => OpCode::Gt,
        BinaryOperator::OpGe => OpCode::Ge,
        BinaryOperator::OpAnd | BinaryOperator::OpOr | BinaryOperator::OpNop => {
            unreachable!("handled before opcode selection")
        }
    }
}
