// Emission primitives shared by the expression and statement compilers.
use crate::compiler::{Compiler, Local, MAX_LOCALS};
use crate::luma_value::LumaValue;
use crate::luma_vm::{LumaError, LumaResult, OpCode};

pub(crate) fn emit_op(c: &mut Compiler, op: OpCode) {
    c.chunk.write_byte(op as u8, c.line);
}

pub(crate) fn emit_byte(c: &mut Compiler, byte: u8) {
    c.chunk.write_byte(byte, c.line);
}

pub(crate) fn emit_u16(c: &mut Compiler, value: u16) {
    c.chunk.write_byte((value >> 8) as u8, c.line);
    c.chunk.write_byte(value as u8, c.line);
}

/// Push a value through the constant pool.
pub(crate) fn emit_constant(c: &mut Compiler, value: LumaValue) -> LumaResult<()> {
    let index = add_constant(c, value)?;
    emit_op(c, OpCode::PushConstant);
    emit_u16(c, index);
    Ok(())
}

pub(crate) fn add_constant(c: &mut Compiler, value: LumaValue) -> LumaResult<u16> {
    c.chunk
        .add_constant(value)
        .ok_or(LumaError::TooManyConstants { line: c.line })
}

/// Pool an identifier as a string constant, for global access by name.
pub(crate) fn name_constant(c: &mut Compiler, name: &str) -> LumaResult<u16> {
    let id = c.interner.intern(name)?;
    add_constant(c, LumaValue::Str(id))
}

/// Emit a forward jump with a placeholder operand; returns the placeholder
/// offset for `patch_jump`.
pub(crate) fn emit_jump(c: &mut Compiler, op: OpCode) -> usize {
    emit_op(c, op);
    let site = c.chunk.code.len();
    emit_byte(c, 0xff);
    emit_byte(c, 0xff);
    site
}

/// Resolve a placeholder to land on the current end of code.
pub(crate) fn patch_jump(c: &mut Compiler, site: usize) -> LumaResult<()> {
    let offset = c.chunk.code.len() - site - 2;
    if offset > u16::MAX as usize {
        return Err(LumaError::InvalidJumpOffset { line: c.line });
    }
    c.chunk.code[site] = (offset >> 8) as u8;
    c.chunk.code[site + 1] = offset as u8;
    Ok(())
}

/// Emit a backward jump to `loop_start`.
pub(crate) fn emit_loop(c: &mut Compiler, loop_start: usize) -> LumaResult<()> {
    emit_op(c, OpCode::Loop);
    let offset = c.chunk.code.len() + 2 - loop_start;
    if offset > u16::MAX as usize {
        return Err(LumaError::InvalidJumpOffset { line: c.line });
    }
    emit_u16(c, offset as u16);
    Ok(())
}

pub(crate) fn begin_scope(c: &mut Compiler) {
    c.scope_depth += 1;
}

/// Leave a scope, popping its locals from both the compile-time stack and
/// (via emitted pops) the runtime stack.
pub(crate) fn end_scope(c: &mut Compiler) {
    c.scope_depth -= 1;
    while c
        .locals
        .last()
        .is_some_and(|local| local.depth > c.scope_depth)
    {
        c.locals.pop();
        emit_op(c, OpCode::Pop);
    }
}

/// Leave a scope whose runtime pops were already emitted explicitly (the
/// repeat statement, which pops on two separate exit paths).
pub(crate) fn discard_scope(c: &mut Compiler) {
    c.scope_depth -= 1;
    while c
        .locals
        .last()
        .is_some_and(|local| local.depth > c.scope_depth)
    {
        c.locals.pop();
    }
}

/// Register a new local at the current depth. Its slot is the value already
/// sitting on the operand stack.
pub(crate) fn add_local(c: &mut Compiler, name: Box<str>) -> LumaResult<()> {
    if c.locals.len() >= MAX_LOCALS {
        return Err(LumaError::TooManyLocals { line: c.line });
    }
    c.locals.push(Local {
        name,
        depth: c.scope_depth,
    });
    Ok(())
}

/// Innermost local with the given name, if any. The index doubles as the
/// runtime stack slot.
pub(crate) fn resolve_local(c: &Compiler, name: &str) -> Option<u8> {
    c.locals
        .iter()
        .rposition(|local| local.name.as_ref() == name)
        .map(|index| index as u8)
}
