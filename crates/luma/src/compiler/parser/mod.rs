mod operator_kind;
mod reader;
mod text_range;
mod token_data;
mod token_kind;
mod tokenize;

pub use crate::compiler::parser::{
    operator_kind::{
        BinaryOperator, UNARY_PRIORITY, UnaryOperator, to_binary_operator, to_unary_operator,
    },
    reader::Reader,
    text_range::SourceRange,
    token_data::LumaTokenData,
    token_kind::LumaTokenKind,
    tokenize::LumaTokenize,
};

use crate::compiler::ast::{Block, IfArm, LumaExpr, LumaStat};
use crate::compiler::parse_literal::{
    NumberResult, parse_float_token_value, parse_int_token_value, parse_string_token_value,
};
use crate::luma_vm::{LumaError, LumaResult};

// Hard cap on call arguments; the call opcode carries the count in one byte.
const MAX_CALL_ARGS: usize = 255;

/// Recursive-descent parser over the scanned token stream. Statements are
/// parsed by dedicated methods; expressions use precedence climbing with the
/// priority table in `operator_kind`.
pub struct LumaParser<'a> {
    text: &'a str,
    tokens: Vec<LumaTokenData>,
    token_index: usize,
    loop_depth: u32,
}

impl<'a> LumaParser<'a> {
    /// Scan and parse a whole source, producing the root block.
    pub fn parse(text: &'a str) -> LumaResult<Block> {
        let tokens = LumaTokenize::new(Reader::new(text)).tokenize()?;
        let mut parser = LumaParser {
            text,
            tokens,
            token_index: 0,
            loop_depth: 0,
        };

        let block = parser.block()?;
        if parser.current_token() != LumaTokenKind::TkEof {
            return Err(parser.unexpected_token());
        }
        Ok(block)
    }

    // ============ token cursor ============

    fn current_token(&self) -> LumaTokenKind {
        self.tokens[self.token_index].kind
    }

    fn current_token_text(&self) -> &'a str {
        let range = &self.tokens[self.token_index].range;
        &self.text[range.start_offset..range.end_offset()]
    }

    fn current_line(&self) -> u32 {
        self.tokens[self.token_index].line
    }

    fn current_col(&self) -> u32 {
        self.tokens[self.token_index].col
    }

    fn bump(&mut self) {
        if self.token_index + 1 < self.tokens.len() {
            self.token_index += 1;
        }
    }

    fn accept(&mut self, kind: LumaTokenKind) -> bool {
        if self.current_token() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: LumaTokenKind) -> LumaResult<()> {
        if self.current_token() == kind {
            self.bump();
            Ok(())
        } else {
            Err(LumaError::ExpectedToken {
                expected: kind.text(),
                line: self.current_line(),
                col: self.current_col(),
            })
        }
    }

    fn unexpected_token(&self) -> LumaError {
        LumaError::UnexpectedToken {
            found: self.current_token_text().to_string(),
            line: self.current_line(),
            col: self.current_col(),
        }
    }

    fn name(&mut self) -> LumaResult<Box<str>> {
        if self.current_token() != LumaTokenKind::TkName {
            return Err(LumaError::ExpectedToken {
                expected: LumaTokenKind::TkName.text(),
                line: self.current_line(),
                col: self.current_col(),
            });
        }
        let name = Box::from(self.current_token_text());
        self.bump();
        Ok(name)
    }

    // ============ statements ============

    fn block(&mut self) -> LumaResult<Block> {
        let mut stats = Vec::new();
        loop {
            let kind = self.current_token();
            if kind.is_block_follow() {
                break;
            }
            if kind == LumaTokenKind::TkSemicolon {
                self.bump();
                continue;
            }
            stats.push(self.statement()?);
        }
        Ok(Block { stats })
    }

    fn statement(&mut self) -> LumaResult<LumaStat> {
        match self.current_token() {
            LumaTokenKind::TkIf => self.if_stat(),
            LumaTokenKind::TkWhile => self.while_stat(),
            LumaTokenKind::TkFor => self.for_stat(),
            LumaTokenKind::TkRepeat => self.repeat_stat(),
            LumaTokenKind::TkDo => self.do_stat(),
            LumaTokenKind::TkReturn => self.return_stat(),
            LumaTokenKind::TkBreak => self.break_stat(),
            LumaTokenKind::TkLocal => self.local_stat(),
            _ => self.expr_stat(),
        }
    }

    fn if_stat(&mut self) -> LumaResult<LumaStat> {
        let line = self.current_line();
        self.bump();

        let mut arms = Vec::new();
        loop {
            let cond = self.expr()?;
            self.expect(LumaTokenKind::TkThen)?;
            let body = self.block()?;
            arms.push(IfArm { cond, body });
            if !self.accept(LumaTokenKind::TkElseIf) {
                break;
            }
        }

        let else_body = if self.accept(LumaTokenKind::TkElse) {
            Some(self.block()?)
        } else {
            None
        };
        self.expect(LumaTokenKind::TkEnd)?;

        Ok(LumaStat::If {
            arms,
            else_body,
            line,
        })
    }

    fn while_stat(&mut self) -> LumaResult<LumaStat> {
        let line = self.current_line();
        self.bump();

        let cond = self.expr()?;
        self.expect(LumaTokenKind::TkDo)?;
        self.loop_depth += 1;
        let body = self.block()?;
        self.loop_depth -= 1;
        self.expect(LumaTokenKind::TkEnd)?;

        Ok(LumaStat::While { cond, body, line })
    }

    fn for_stat(&mut self) -> LumaResult<LumaStat> {
        let line = self.current_line();
        self.bump();

        let var = self.name()?;
        // only the numeric form exists in this core; 'for x, y in ...' has
        // nowhere to go
        self.expect(LumaTokenKind::TkAssign)?;

        let start = self.expr()?;
        self.expect(LumaTokenKind::TkComma)?;
        let limit = self.expr()?;
        let step = if self.accept(LumaTokenKind::TkComma) {
            Some(self.expr()?)
        } else {
            None
        };

        self.expect(LumaTokenKind::TkDo)?;
        self.loop_depth += 1;
        let body = self.block()?;
        self.loop_depth -= 1;
        self.expect(LumaTokenKind::TkEnd)?;

        Ok(LumaStat::NumericFor {
            var,
            start,
            limit,
            step,
            body,
            line,
        })
    }

    fn repeat_stat(&mut self) -> LumaResult<LumaStat> {
        let line = self.current_line();
        self.bump();

        self.loop_depth += 1;
        let body = self.block()?;
        self.loop_depth -= 1;
        self.expect(LumaTokenKind::TkUntil)?;
        let cond = self.expr()?;

        Ok(LumaStat::Repeat { body, cond, line })
    }

    fn do_stat(&mut self) -> LumaResult<LumaStat> {
        let line = self.current_line();
        self.bump();

        let body = self.block()?;
        self.expect(LumaTokenKind::TkEnd)?;

        Ok(LumaStat::Do { body, line })
    }

    fn return_stat(&mut self) -> LumaResult<LumaStat> {
        let line = self.current_line();
        self.bump();

        let exprs = if self.current_token().is_block_follow()
            || self.current_token() == LumaTokenKind::TkSemicolon
        {
            Vec::new()
        } else {
            self.expr_list()?
        };
        self.accept(LumaTokenKind::TkSemicolon);

        Ok(LumaStat::Return { exprs, line })
    }

    fn break_stat(&mut self) -> LumaResult<LumaStat> {
        if self.loop_depth == 0 {
            return Err(self.unexpected_token());
        }
        let line = self.current_line();
        self.bump();
        Ok(LumaStat::Break { line })
    }

    fn local_stat(&mut self) -> LumaResult<LumaStat> {
        let line = self.current_line();
        self.bump();

        let mut names = vec![self.name()?];
        while self.accept(LumaTokenKind::TkComma) {
            names.push(self.name()?);
        }

        let exprs = if self.accept(LumaTokenKind::TkAssign) {
            self.expr_list()?
        } else {
            Vec::new()
        };

        Ok(LumaStat::Local { names, exprs, line })
    }

    /// A statement opening with an expression: assignment when `=` or `,`
    /// follows, a bare expression statement otherwise.
    fn expr_stat(&mut self) -> LumaResult<LumaStat> {
        let line = self.current_line();
        let first = self.expr()?;

        if matches!(
            self.current_token(),
            LumaTokenKind::TkAssign | LumaTokenKind::TkComma
        ) {
            let mut targets = vec![first];
            while self.accept(LumaTokenKind::TkComma) {
                targets.push(self.expr()?);
            }
            // assignment targets are plain names in this core
            if targets.iter().any(|t| !matches!(t, LumaExpr::Name(_))) {
                return Err(self.unexpected_token());
            }
            self.expect(LumaTokenKind::TkAssign)?;
            let values = self.expr_list()?;
            return Ok(LumaStat::Assign {
                targets,
                values,
                line,
            });
        }

        Ok(LumaStat::ExprStat { expr: first, line })
    }

    // ============ expressions ============

    fn expr_list(&mut self) -> LumaResult<Vec<LumaExpr>> {
        let mut exprs = vec![self.expr()?];
        while self.accept(LumaTokenKind::TkComma) {
            exprs.push(self.expr()?);
        }
        Ok(exprs)
    }

    pub(crate) fn expr(&mut self) -> LumaResult<LumaExpr> {
        self.subexpr(0)
    }

    /// Precedence climbing: consume binary operators only while their left
    /// priority exceeds `limit`; the recursive call re-enters with the
    /// operator's right priority, which keeps `..` and `^` right-associative.
    fn subexpr(&mut self, limit: i32) -> LumaResult<LumaExpr> {
        let uop = to_unary_operator(self.current_token());
        let mut left = if uop != UnaryOperator::OpNop {
            self.bump();
            let operand = self.subexpr(UNARY_PRIORITY)?;
            LumaExpr::Unary {
                op: uop,
                expr: Box::new(operand),
            }
        } else {
            self.simple_expr()?
        };

        let mut op = to_binary_operator(self.current_token());
        while op != BinaryOperator::OpNop && op.get_priority().left > limit {
            self.bump();
            let rhs = self.subexpr(op.get_priority().right)?;
            left = LumaExpr::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(rhs),
            };
            op = to_binary_operator(self.current_token());
        }

        Ok(left)
    }

    fn simple_expr(&mut self) -> LumaResult<LumaExpr> {
        match self.current_token() {
            LumaTokenKind::TkInt => {
                let expr = match parse_int_token_value(self.current_token_text()) {
                    Ok(NumberResult::Int(v)) => LumaExpr::Int(v),
                    Ok(NumberResult::Float(v)) => LumaExpr::Float(v),
                    Err(_) => return Err(self.invalid_number()),
                };
                self.bump();
                Ok(expr)
            }
            LumaTokenKind::TkFloat => {
                let value = parse_float_token_value(self.current_token_text())
                    .map_err(|_| self.invalid_number())?;
                self.bump();
                Ok(LumaExpr::Float(value))
            }
            LumaTokenKind::TkString => {
                let content = parse_string_token_value(self.current_token_text())
                    .map_err(|_| self.unexpected_token())?;
                self.bump();
                Ok(LumaExpr::Str(content.into_boxed_str()))
            }
            LumaTokenKind::TkNil => {
                self.bump();
                Ok(LumaExpr::Nil)
            }
            LumaTokenKind::TkTrue => {
                self.bump();
                Ok(LumaExpr::True)
            }
            LumaTokenKind::TkFalse => {
                self.bump();
                Ok(LumaExpr::False)
            }
            _ => self.suffixed_expr(),
        }
    }

    /// primary expression followed by any number of call suffixes, so
    /// `f(a)(b)` stays well-formed at the expression level.
    fn suffixed_expr(&mut self) -> LumaResult<LumaExpr> {
        let mut expr = self.primary_expr()?;

        while self.current_token() == LumaTokenKind::TkLeftParen {
            let line = self.current_line();
            let args = self.call_args()?;
            expr = LumaExpr::Call {
                callee: Box::new(expr),
                args,
                line,
            };
        }

        Ok(expr)
    }

    fn primary_expr(&mut self) -> LumaResult<LumaExpr> {
        match self.current_token() {
            LumaTokenKind::TkName => {
                let name = Box::from(self.current_token_text());
                self.bump();
                Ok(LumaExpr::Name(name))
            }
            LumaTokenKind::TkLeftParen => {
                self.bump();
                let expr = self.expr()?;
                self.expect(LumaTokenKind::TkRightParen)?;
                Ok(expr)
            }
            _ => Err(LumaError::ExpectedExpression {
                line: self.current_line(),
                col: self.current_col(),
            }),
        }
    }

    fn call_args(&mut self) -> LumaResult<Vec<LumaExpr>> {
        self.expect(LumaTokenKind::TkLeftParen)?;
        let mut args = Vec::new();
        if self.current_token() != LumaTokenKind::TkRightParen {
            args = self.expr_list()?;
            if args.len() > MAX_CALL_ARGS {
                return Err(self.unexpected_token());
            }
        }
        self.expect(LumaTokenKind::TkRightParen)?;
        Ok(args)
    }

    fn invalid_number(&self) -> LumaError {
        LumaError::InvalidNumber {
            line: self.current_line(),
            col: self.current_col(),
        }
    }
}
