// Statement compilation: scopes, control flow, and the loop family.
// Conditional jumps never pop, so every branch point emits an explicit pop
// on both the taken and fall-through paths.
use crate::compiler::ast::{Block, IfArm, LumaExpr, LumaStat};
use crate::compiler::expr::{compile_expr, compile_name_store};
use crate::compiler::helpers::*;
use crate::compiler::{Compiler, LoopInfo};
use crate::luma_value::LumaValue;
use crate::luma_vm::{LumaError, LumaResult, OpCode};

pub(crate) fn compile_stat(c: &mut Compiler, stat: &LumaStat) -> LumaResult<()> {
    match stat {
        LumaStat::Local { names, exprs, line } => {
            c.line = *line;
            compile_local(c, names, exprs)
        }
        LumaStat::Assign {
            targets,
            values,
            line,
        } => {
            c.line = *line;
            compile_assign(c, targets, values)
        }
        LumaStat::If {
            arms,
            else_body,
            line,
        } => {
            c.line = *line;
            compile_if(c, arms, else_body.as_ref())
        }
        LumaStat::While { cond, body, line } => {
            c.line = *line;
            compile_while(c, cond, body)
        }
        LumaStat::NumericFor {
            var,
            start,
            limit,
            step,
            body,
            line,
        } => {
            c.line = *line;
            compile_numeric_for(c, var, start, limit, step.as_ref(), body)
        }
        LumaStat::Repeat { body, cond, line } => {
            c.line = *line;
            compile_repeat(c, body, cond)
        }
        LumaStat::Do { body, line } => {
            c.line = *line;
            compile_block(c, body)
        }
        LumaStat::Return { exprs, line } => {
            c.line = *line;
            // this core evaluates a single return value
            if let Some(first) = exprs.first() {
                compile_expr(c, first)?;
            }
            emit_op(c, OpCode::Return);
            Ok(())
        }
        LumaStat::Break { line } => {
            c.line = *line;
            compile_break(c)
        }
        LumaStat::ExprStat { expr, line } => {
            c.line = *line;
            compile_expr(c, expr)?;
            // a print call leaves nothing behind; anything else does
            if !expr.is_print_call() {
                emit_op(c, OpCode::Pop);
            }
            Ok(())
        }
    }
}

pub(crate) fn compile_block(c: &mut Compiler, block: &Block) -> LumaResult<()> {
    begin_scope(c);
    for stat in &block.stats {
        compile_stat(c, stat)?;
    }
    end_scope(c);
    Ok(())
}

/// Initializers stay on the operand stack; the compile-time local stack
/// records which slot belongs to which name. No pop is emitted.
fn compile_local(
    c: &mut Compiler,
    names: &[Box<str>],
    exprs: &[LumaExpr],
) -> LumaResult<()> {
    for expr in exprs {
        compile_expr(c, expr)?;
    }
    for _ in exprs.len()..names.len() {
        emit_op(c, OpCode::PushNil);
    }
    for _ in names.len()..exprs.len() {
        emit_op(c, OpCode::Pop);
    }
    for name in names {
        add_local(c, name.clone())?;
    }
    Ok(())
}

/// Values are evaluated left to right, then stored into the targets in
/// reverse so stack order lines up. The value list is adjusted to the
/// target count first.
fn compile_assign(
    c: &mut Compiler,
    targets: &[LumaExpr],
    values: &[LumaExpr],
) -> LumaResult<()> {
    for value in values {
        compile_expr(c, value)?;
    }
    for _ in values.len()..targets.len() {
        emit_op(c, OpCode::PushNil);
    }
    for _ in targets.len()..values.len() {
        emit_op(c, OpCode::Pop);
    }

    for target in targets.iter().rev() {
        match target {
            LumaExpr::Name(name) => compile_name_store(c, name)?,
            _ => unreachable!("parser restricts assignment targets to names"),
        }
    }
    Ok(())
}

fn compile_if(
    c: &mut Compiler,
    arms: &[IfArm],
    else_body: Option<&Block>,
) -> LumaResult<()> {
    let mut end_jumps = Vec::new();

    for arm in arms {
        compile_expr(c, &arm.cond)?;
        let else_jump = emit_jump(c, OpCode::JumpIfFalse);
        emit_op(c, OpCode::Pop);
        compile_block(c, &arm.body)?;
        end_jumps.push(emit_jump(c, OpCode::Jump));
        // the false path lands on the pop that discards the condition
        patch_jump(c, else_jump)?;
        emit_op(c, OpCode::Pop);
    }

    if let Some(body) = else_body {
        compile_block(c, body)?;
    }

    for site in end_jumps {
        patch_jump(c, site)?;
    }
    Ok(())
}

fn compile_while(c: &mut Compiler, cond: &LumaExpr, body: &Block) -> LumaResult<()> {
    let loop_start = c.chunk.code.len();

    compile_expr(c, cond)?;
    let exit_jump = emit_jump(c, OpCode::JumpIfFalse);
    emit_op(c, OpCode::Pop);

    c.loop_stack.push(LoopInfo {
        break_jumps: Vec::new(),
        local_count: c.locals.len(),
    });
    compile_block(c, body)?;
    emit_loop(c, loop_start)?;

    patch_jump(c, exit_jump)?;
    emit_op(c, OpCode::Pop);

    finish_loop(c)
}

/// Numeric for. The control values live in three internal slots; the
/// direction is decided at runtime from the sign of the step, and the user
/// variable is a fresh local holding a copy of the current control value.
fn compile_numeric_for(
    c: &mut Compiler,
    var: &str,
    start: &LumaExpr,
    limit: &LumaExpr,
    step: Option<&LumaExpr>,
    body: &Block,
) -> LumaResult<()> {
    begin_scope(c);

    compile_expr(c, start)?;
    add_local(c, Box::from("(for start)"))?;
    compile_expr(c, limit)?;
    add_local(c, Box::from("(for limit)"))?;
    match step {
        Some(expr) => compile_expr(c, expr)?,
        None => emit_constant(c, LumaValue::Integer(1))?,
    }
    add_local(c, Box::from("(for step)"))?;

    let base = c.locals.len() - 3;
    let start_slot = base as u8;
    let limit_slot = (base + 1) as u8;
    let step_slot = (base + 2) as u8;

    let loop_start = c.chunk.code.len();

    // continue while start <= limit, or start >= limit for a negative step
    emit_op(c, OpCode::GetLocal);
    emit_byte(c, start_slot);
    emit_op(c, OpCode::GetLocal);
    emit_byte(c, limit_slot);
    emit_op(c, OpCode::GetLocal);
    emit_byte(c, step_slot);
    emit_constant(c, LumaValue::Integer(0))?;
    emit_op(c, OpCode::Lt);
    let non_negative = emit_jump(c, OpCode::JumpIfFalse);
    emit_op(c, OpCode::Pop);
    emit_op(c, OpCode::Ge);
    let compare_done = emit_jump(c, OpCode::Jump);
    patch_jump(c, non_negative)?;
    emit_op(c, OpCode::Pop);
    emit_op(c, OpCode::Le);
    patch_jump(c, compare_done)?;

    let exit_jump = emit_jump(c, OpCode::JumpIfFalse);
    emit_op(c, OpCode::Pop);

    c.loop_stack.push(LoopInfo {
        break_jumps: Vec::new(),
        local_count: c.locals.len(),
    });

    // expose the control value under the user's name
    emit_op(c, OpCode::GetLocal);
    emit_byte(c, start_slot);
    add_local(c, Box::from(var))?;

    compile_block(c, body)?;

    // drop the user variable, step the control value
    emit_op(c, OpCode::Pop);
    c.locals.pop();

    emit_op(c, OpCode::GetLocal);
    emit_byte(c, start_slot);
    emit_op(c, OpCode::GetLocal);
    emit_byte(c, step_slot);
    emit_op(c, OpCode::Add);
    emit_op(c, OpCode::SetLocal);
    emit_byte(c, start_slot);

    emit_loop(c, loop_start)?;
    patch_jump(c, exit_jump)?;
    emit_op(c, OpCode::Pop);

    finish_loop(c)?;
    end_scope(c);
    Ok(())
}

/// repeat/until. The condition is compiled inside the body's scope so it
/// sees locals declared there; the scope's pops go out on both exit paths
/// and the scope itself closes just before the back-branch.
fn compile_repeat(c: &mut Compiler, body: &Block, cond: &LumaExpr) -> LumaResult<()> {
    begin_scope(c);
    let loop_start = c.chunk.code.len();
    let locals_at_entry = c.locals.len();

    c.loop_stack.push(LoopInfo {
        break_jumps: Vec::new(),
        local_count: locals_at_entry,
    });

    for stat in &body.stats {
        compile_stat(c, stat)?;
    }
    compile_expr(c, cond)?;

    let scope_locals = c.locals.len() - locals_at_entry;

    let again = emit_jump(c, OpCode::JumpIfFalse);
    emit_op(c, OpCode::Pop);
    for _ in 0..scope_locals {
        emit_op(c, OpCode::Pop);
    }
    let exit = emit_jump(c, OpCode::Jump);

    patch_jump(c, again)?;
    emit_op(c, OpCode::Pop);
    for _ in 0..scope_locals {
        emit_op(c, OpCode::Pop);
    }
    emit_loop(c, loop_start)?;

    patch_jump(c, exit)?;
    finish_loop(c)?;
    discard_scope(c);
    Ok(())
}

fn compile_break(c: &mut Compiler) -> LumaResult<()> {
    let Some(local_count) = c.loop_stack.last().map(|info| info.local_count) else {
        return Err(LumaError::UnexpectedToken {
            found: "break".to_string(),
            line: c.line,
            col: 1,
        });
    };

    // unwind runtime locals introduced since loop entry; the compile-time
    // stack is untouched because compilation continues inside the body
    for _ in local_count..c.locals.len() {
        emit_op(c, OpCode::Pop);
    }

    let site = emit_jump(c, OpCode::Jump);
    if let Some(info) = c.loop_stack.last_mut() {
        info.break_jumps.push(site);
    }
    Ok(())
}

/// Pop the loop record and patch its break jumps to land here.
fn finish_loop(c: &mut Compiler) -> LumaResult<()> {
    if let Some(info) = c.loop_stack.pop() {
        for site in info.break_jumps {
            patch_jump(c, site)?;
        }
    }
    Ok(())
}
