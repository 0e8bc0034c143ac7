// Stack virtual machine.
// A single dispatch loop over compiler-produced bytecode: a bounded operand
// stack, a globals map, and an output buffer for the print builtin.
mod execute;
mod luma_error;
pub mod opcode;
mod run_option;

pub use luma_error::{LumaError, LumaResult};
pub use opcode::OpCode;
pub use run_option::RunOption;

use ahash::RandomState;
use std::collections::HashMap;

use crate::luma_value::{Chunk, LumaValue};
use crate::string_interner::{StrId, StringInterner};

/// Operand stack capacity. Slot operands are one byte, and the compiler
/// keeps the stack balanced, so this bounds expression nesting depth.
pub const STACK_MAX: usize = 256;

/// One execution of one chunk. The VM borrows the chunk and the run's
/// interner; globals and the output buffer live and die with it.
pub struct LumaVM<'a> {
    chunk: &'a Chunk,
    interner: &'a mut StringInterner,

    /// Instruction pointer: byte offset into `chunk.code`.
    ip: usize,
    /// Offset of the opcode currently executing, for error line lookup.
    op_ip: usize,

    stack: Vec<LumaValue>,
    globals: HashMap<StrId, LumaValue, RandomState>,
    output: String,
}

impl<'a> LumaVM<'a> {
    pub fn new(chunk: &'a Chunk, interner: &'a mut StringInterner) -> Self {
        LumaVM {
            chunk,
            interner,
            ip: 0,
            op_ip: 0,
            stack: Vec::with_capacity(STACK_MAX),
            globals: HashMap::with_capacity_and_hasher(16, RandomState::new()),
            output: String::new(),
        }
    }

    /// Everything the print builtin wrote during the run.
    pub fn take_output(self) -> String {
        self.output
    }

    pub(crate) fn current_line(&self) -> u32 {
        self.chunk.line_at(self.op_ip)
    }

    pub(crate) fn push(&mut self, value: LumaValue) -> LumaResult<()> {
        if self.stack.len() == STACK_MAX {
            return Err(LumaError::StackOverflow {
                line: self.current_line(),
            });
        }
        self.stack.push(value);
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> LumaResult<LumaValue> {
        self.stack.pop().ok_or(LumaError::StackUnderflow {
            line: self.current_line(),
        })
    }

    /// The k-th value below the top, without removing it.
    pub(crate) fn peek(&self, k: usize) -> LumaResult<LumaValue> {
        self.stack
            .len()
            .checked_sub(k + 1)
            .and_then(|index| self.stack.get(index))
            .copied()
            .ok_or(LumaError::StackUnderflow {
                line: self.current_line(),
            })
    }

    pub(crate) fn type_error(&self, message: String) -> LumaError {
        LumaError::TypeError {
            message,
            line: self.current_line(),
        }
    }
}
