use crate::compiler::parser::{
    reader::Reader, token_data::LumaTokenData, token_kind::LumaTokenKind,
};
use crate::luma_vm::{LumaError, LumaResult};

/// The scanner. One pass over the source; whitespace and comments are
/// consumed in place, everything else becomes a token whose lexeme is a view
/// into the source buffer. The token stream always ends with `TkEof`.
pub struct LumaTokenize<'a> {
    reader: Reader<'a>,
    line: u32,
    line_start: usize,
}

impl<'a> LumaTokenize<'a> {
    pub fn new(reader: Reader<'a>) -> Self {
        LumaTokenize {
            reader,
            line: 1,
            line_start: 0,
        }
    }

    pub fn tokenize(mut self) -> LumaResult<Vec<LumaTokenData>> {
        let mut tokens = vec![];

        loop {
            self.skip_trivia();
            self.reader.reset_buff();
            let line = self.line;
            let col = self.col();

            if self.reader.is_eof() {
                tokens.push(LumaTokenData::new(
                    LumaTokenKind::TkEof,
                    self.reader.current_range(),
                    line,
                    col,
                ));
                break;
            }

            let kind = self.lex(line, col)?;
            tokens.push(LumaTokenData::new(
                kind,
                self.reader.current_range(),
                line,
                col,
            ));
        }

        Ok(tokens)
    }

    fn col(&self) -> u32 {
        (self.reader.offset() - self.line_start + 1) as u32
    }

    fn new_line(&mut self) {
        match self.reader.current_char() {
            // support \n or \n\r
            '\n' => {
                self.reader.bump();
                if self.reader.current_char() == '\r' {
                    self.reader.bump();
                }
            }
            // support \r or \r\n
            '\r' => {
                self.reader.bump();
                if self.reader.current_char() == '\n' {
                    self.reader.bump();
                }
            }
            _ => {}
        }
        self.line += 1;
        self.line_start = self.reader.offset();
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.reader.current_char() {
                ' ' | '\t' | '\r' => self.reader.bump(),
                '\n' => self.new_line(),
                '-' if self.reader.next_char() == '-' => self.skip_comment(),
                _ => return,
            }
        }
    }

    /// Both comment forms. An unterminated long-bracket comment silently
    /// consumes the rest of the input.
    fn skip_comment(&mut self) {
        self.reader.bump();
        self.reader.bump();

        if self.reader.current_char() == '[' {
            let mut k = 1;
            while self.reader.char_at(k) == '=' {
                k += 1;
            }
            if self.reader.char_at(k) == '[' {
                for _ in 0..=k {
                    self.reader.bump();
                }
                self.read_long_bracket_body(k - 1);
                return;
            }
        }

        self.reader
            .eat_while(|ch| ch != '\n');
    }

    fn lex(&mut self, line: u32, col: u32) -> LumaResult<LumaTokenKind> {
        match self.reader.current_char() {
            '=' => {
                self.reader.bump();
                if self.reader.current_char() != '=' {
                    return Ok(LumaTokenKind::TkAssign);
                }
                self.reader.bump();
                Ok(LumaTokenKind::TkEq)
            }
            '~' => {
                self.reader.bump();
                if self.reader.current_char() != '=' {
                    return Ok(LumaTokenKind::TkBitXor);
                }
                self.reader.bump();
                Ok(LumaTokenKind::TkNe)
            }
            '<' => {
                self.reader.bump();
                match self.reader.current_char() {
                    '=' => {
                        self.reader.bump();
                        Ok(LumaTokenKind::TkLe)
                    }
                    '<' => {
                        self.reader.bump();
                        Ok(LumaTokenKind::TkShl)
                    }
                    _ => Ok(LumaTokenKind::TkLt),
                }
            }
            '>' => {
                self.reader.bump();
                match self.reader.current_char() {
                    '=' => {
                        self.reader.bump();
                        Ok(LumaTokenKind::TkGe)
                    }
                    '>' => {
                        self.reader.bump();
                        Ok(LumaTokenKind::TkShr)
                    }
                    _ => Ok(LumaTokenKind::TkGt),
                }
            }
            '/' => {
                self.reader.bump();
                if self.reader.current_char() != '/' {
                    return Ok(LumaTokenKind::TkDiv);
                }
                self.reader.bump();
                Ok(LumaTokenKind::TkIDiv)
            }
            ':' => {
                self.reader.bump();
                if self.reader.current_char() != ':' {
                    return Ok(LumaTokenKind::TkColon);
                }
                self.reader.bump();
                Ok(LumaTokenKind::TkDbColon)
            }
            '.' => {
                if self.reader.next_char().is_ascii_digit() {
                    return self.lex_number(line, col);
                }
                self.reader.bump();
                if self.reader.current_char() != '.' {
                    return Ok(LumaTokenKind::TkDot);
                }
                self.reader.bump();
                if self.reader.current_char() != '.' {
                    return Ok(LumaTokenKind::TkConcat);
                }
                self.reader.bump();
                Ok(LumaTokenKind::TkDots)
            }
            '"' | '\'' => {
                let quote = self.reader.current_char();
                self.reader.bump();
                self.lex_string(quote, line)
            }
            '[' => {
                let mut k = 1;
                while self.reader.char_at(k) == '=' {
                    k += 1;
                }
                if self.reader.char_at(k) == '[' {
                    for _ in 0..=k {
                        self.reader.bump();
                    }
                    if !self.read_long_bracket_body(k - 1) {
                        return Err(LumaError::UnterminatedLongBracket { line });
                    }
                    return Ok(LumaTokenKind::TkString);
                }
                if self.reader.next_char() == '=' {
                    // '[' followed by '='s without a second '[' cannot open
                    // anything valid
                    return Err(LumaError::UnexpectedCharacter {
                        ch: '=',
                        line,
                        col: col + 1,
                    });
                }
                self.reader.bump();
                Ok(LumaTokenKind::TkLeftBracket)
            }
            '0'..='9' => self.lex_number(line, col),
            '+' => {
                self.reader.bump();
                Ok(LumaTokenKind::TkPlus)
            }
            '-' => {
                self.reader.bump();
                Ok(LumaTokenKind::TkMinus)
            }
            '*' => {
                self.reader.bump();
                Ok(LumaTokenKind::TkMul)
            }
            '%' => {
                self.reader.bump();
                Ok(LumaTokenKind::TkMod)
            }
            '^' => {
                self.reader.bump();
                Ok(LumaTokenKind::TkPow)
            }
            '#' => {
                self.reader.bump();
                Ok(LumaTokenKind::TkLen)
            }
            '&' => {
                self.reader.bump();
                Ok(LumaTokenKind::TkBitAnd)
            }
            '|' => {
                self.reader.bump();
                Ok(LumaTokenKind::TkBitOr)
            }
            '(' => {
                self.reader.bump();
                Ok(LumaTokenKind::TkLeftParen)
            }
            ')' => {
                self.reader.bump();
                Ok(LumaTokenKind::TkRightParen)
            }
            '{' => {
                self.reader.bump();
                Ok(LumaTokenKind::TkLeftBrace)
            }
            '}' => {
                self.reader.bump();
                Ok(LumaTokenKind::TkRightBrace)
            }
            ']' => {
                self.reader.bump();
                Ok(LumaTokenKind::TkRightBracket)
            }
            ';' => {
                self.reader.bump();
                Ok(LumaTokenKind::TkSemicolon)
            }
            ',' => {
                self.reader.bump();
                Ok(LumaTokenKind::TkComma)
            }
            ch if is_name_start(ch) => {
                self.reader.bump();
                self.reader.eat_while(is_name_continue);
                Ok(name_to_kind(self.reader.current_text()))
            }
            ch => Err(LumaError::UnexpectedCharacter { ch, line, col }),
        }
    }

    fn lex_string(&mut self, quote: char, line: u32) -> LumaResult<LumaTokenKind> {
        loop {
            if self.reader.is_eof() {
                return Err(LumaError::UnterminatedString { line });
            }
            match self.reader.current_char() {
                ch if ch == quote => {
                    self.reader.bump();
                    return Ok(LumaTokenKind::TkString);
                }
                '\n' => return Err(LumaError::UnterminatedString { line }),
                '\\' => {
                    // escapes pass through untouched; the parser decodes the
                    // logical content when it strips the delimiters
                    self.reader.bump();
                    match self.reader.current_char() {
                        '\r' | '\n' => self.new_line(),
                        _ => {
                            if !self.reader.is_eof() {
                                self.reader.bump();
                            }
                        }
                    }
                }
                _ => self.reader.bump(),
            }
        }
    }

    /// Consume a long-bracket body up to `]` + level `=`s + `]`. Returns
    /// false when the input runs out first.
    fn read_long_bracket_body(&mut self, level: usize) -> bool {
        loop {
            if self.reader.is_eof() {
                return false;
            }
            match self.reader.current_char() {
                ']' => {
                    self.reader.bump();
                    let count = self.reader.eat_when('=');
                    if count == level && self.reader.current_char() == ']' {
                        self.reader.bump();
                        return true;
                    }
                }
                '\n' => self.new_line(),
                _ => self.reader.bump(),
            }
        }
    }

    fn lex_number(&mut self, line: u32, col: u32) -> LumaResult<LumaTokenKind> {
        let mut is_float = false;

        if self.reader.current_char() == '0'
            && matches!(self.reader.next_char(), 'x' | 'X')
        {
            self.reader.bump();
            self.reader.bump();
            let digits = self.reader.eat_while(|ch| ch.is_ascii_hexdigit());
            if digits == 0 || self.reader.current_char() == '.' {
                // hexadecimal literals are integer-only
                return Err(LumaError::InvalidNumber { line, col });
            }
            if is_name_continue(self.reader.current_char()) {
                return Err(LumaError::InvalidNumber { line, col });
            }
            return Ok(LumaTokenKind::TkInt);
        }

        if self.reader.current_char() == '.' {
            // leading '.' before digits
            is_float = true;
            self.reader.bump();
        }
        self.reader.eat_while(|ch| ch.is_ascii_digit());

        // a '.' starts a fractional part only when digits follow; digits
        // followed by '..' leave the dots for the concat operator
        if !is_float
            && self.reader.current_char() == '.'
            && self.reader.next_char().is_ascii_digit()
        {
            is_float = true;
            self.reader.bump();
            self.reader.eat_while(|ch| ch.is_ascii_digit());
        }

        if matches!(self.reader.current_char(), 'e' | 'E') {
            let (skip, digit) = match self.reader.next_char() {
                '+' | '-' => (2, self.reader.char_at(2)),
                ch => (1, ch),
            };
            if !digit.is_ascii_digit() {
                return Err(LumaError::InvalidNumber { line, col });
            }
            for _ in 0..skip {
                self.reader.bump();
            }
            self.reader.eat_while(|ch| ch.is_ascii_digit());
            is_float = true;
        }

        if is_name_continue(self.reader.current_char()) {
            return Err(LumaError::InvalidNumber { line, col });
        }

        Ok(if is_float {
            LumaTokenKind::TkFloat
        } else {
            LumaTokenKind::TkInt
        })
    }
}

fn name_to_kind(name: &str) -> LumaTokenKind {
    match name {
        "and" => LumaTokenKind::TkAnd,
        "break" => LumaTokenKind::TkBreak,
        "do" => LumaTokenKind::TkDo,
        "else" => LumaTokenKind::TkElse,
        "elseif" => LumaTokenKind::TkElseIf,
        "end" => LumaTokenKind::TkEnd,
        "false" => LumaTokenKind::TkFalse,
        "for" => LumaTokenKind::TkFor,
        "function" => LumaTokenKind::TkFunction,
        "if" => LumaTokenKind::TkIf,
        "in" => LumaTokenKind::TkIn,
        "local" => LumaTokenKind::TkLocal,
        "nil" => LumaTokenKind::TkNil,
        "not" => LumaTokenKind::TkNot,
        "or" => LumaTokenKind::TkOr,
        "repeat" => LumaTokenKind::TkRepeat,
        "return" => LumaTokenKind::TkReturn,
        "then" => LumaTokenKind::TkThen,
        "true" => LumaTokenKind::TkTrue,
        "until" => LumaTokenKind::TkUntil,
        "while" => LumaTokenKind::TkWhile,
        _ => LumaTokenKind::TkName,
    }
}

fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_name_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
