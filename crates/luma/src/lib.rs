// luma - a compact scripting core in the Lua lineage.
// Source goes through four stages in one pass each: scanner, parser,
// bytecode compiler, stack VM. Each run owns its interner, chunk, and VM.

#[cfg(test)]
mod test;

pub mod compiler;
pub mod luma_value;
pub mod luma_vm;
pub mod string_interner;

pub use compiler::Compiler;
pub use compiler::parser::LumaParser;
pub use luma_value::{Chunk, LumaValue};
pub use luma_vm::{LumaError, LumaResult, LumaVM, OpCode, RunOption};
pub use string_interner::{StrId, StringInterner};

/// Interpret a complete source: scan, parse, compile, execute. Returns
/// everything the program printed, or the first error from any stage.
pub fn interpret(source: &str) -> LumaResult<String> {
    interpret_with_option(source, &RunOption::default())
}

pub fn interpret_with_option(source: &str, option: &RunOption) -> LumaResult<String> {
    if source.len() > option.max_source_bytes {
        return Err(LumaError::OutOfMemory);
    }

    let block = LumaParser::parse(source)?;
    let mut interner = StringInterner::new(option.max_string_bytes);
    let chunk = Compiler::compile(&block, &mut interner)?;

    let mut vm = LumaVM::new(&chunk, &mut interner);
    vm.run()?;
    Ok(vm.take_output())
}
