// Scanner and parser behavior: token shapes, stream invariants, and
// syntax-level errors.
use crate::compiler::parser::{LumaParser, LumaTokenKind, LumaTokenize, Reader};
use crate::luma_vm::LumaError;

fn kinds(source: &str) -> Vec<LumaTokenKind> {
    LumaTokenize::new(Reader::new(source))
        .tokenize()
        .unwrap()
        .iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn maximal_munch() {
    use LumaTokenKind::*;
    assert_eq!(kinds("< <= <<"), vec![TkLt, TkLe, TkShl, TkEof]);
    assert_eq!(kinds("> >= >>"), vec![TkGt, TkGe, TkShr, TkEof]);
    assert_eq!(kinds("/ //"), vec![TkDiv, TkIDiv, TkEof]);
    assert_eq!(kinds("= =="), vec![TkAssign, TkEq, TkEof]);
    assert_eq!(kinds("~ ~="), vec![TkBitXor, TkNe, TkEof]);
    assert_eq!(kinds(". .. ..."), vec![TkDot, TkConcat, TkDots, TkEof]);
    assert_eq!(kinds(": ::"), vec![TkColon, TkDbColon, TkEof]);
}

#[test]
fn digits_before_concat_stay_integer() {
    use LumaTokenKind::*;
    // the scanner must not eat the first '.' of a trailing '..'
    assert_eq!(kinds("1..2"), vec![TkInt, TkConcat, TkInt, TkEof]);
    assert_eq!(kinds("1.5..2"), vec![TkFloat, TkConcat, TkInt, TkEof]);
}

#[test]
fn number_shapes() {
    use LumaTokenKind::*;
    assert_eq!(kinds("42"), vec![TkInt, TkEof]);
    assert_eq!(kinds("42.5"), vec![TkFloat, TkEof]);
    assert_eq!(kinds(".5"), vec![TkFloat, TkEof]);
    assert_eq!(kinds("1e3 1E+3 2.5e-1"), vec![TkFloat, TkFloat, TkFloat, TkEof]);
    assert_eq!(kinds("0xFF 0x10"), vec![TkInt, TkInt, TkEof]);
}

#[test]
fn keywords_are_case_sensitive() {
    use LumaTokenKind::*;
    assert_eq!(kinds("end End END"), vec![TkEnd, TkName, TkName, TkEof]);
}

#[test]
fn comments_are_skipped() {
    use LumaTokenKind::*;
    assert_eq!(kinds("1 -- comment\n2"), vec![TkInt, TkInt, TkEof]);
    assert_eq!(kinds("1 --[[ long\ncomment ]] 2"), vec![TkInt, TkInt, TkEof]);
    assert_eq!(kinds("--[==[ nested ]] still ]==] 7"), vec![TkInt, TkEof]);
    // an unterminated long comment silently runs to end of input
    assert_eq!(kinds("1 --[[ never closed"), vec![TkInt, TkEof]);
}

#[test]
fn scanner_roundtrip_preserves_lexemes() {
    // token lexemes concatenated equal the source minus whitespace/comments
    let source = "local x=1+2 --note\nwhile x<10 do x=x*2 end print(x)";
    let tokens = LumaTokenize::new(Reader::new(source)).tokenize().unwrap();
    let rebuilt: String = tokens
        .iter()
        .map(|t| &source[t.range.start_offset..t.range.end_offset()])
        .collect();
    let expected: String = source
        .replace("--note", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    assert_eq!(rebuilt, expected);
}

#[test]
fn positions_are_monotone() {
    let source = "local a = 1\nlocal b = 2\n  print(a + b)\n";
    let tokens = LumaTokenize::new(Reader::new(source)).tokenize().unwrap();
    let mut last = (0u32, 0u32);
    for token in &tokens {
        assert!(
            (token.line, token.col) >= last,
            "token positions went backwards"
        );
        last = (token.line, token.col);
    }
    assert_eq!(tokens.last().map(|t| t.kind), Some(LumaTokenKind::TkEof));
}

#[test]
fn parsing_is_deterministic() {
    let source = r#"
        local x = 1
        for i = 1, 10, 2 do
            x = x + i ^ 2 .. ""
        end
        print(x and "done" or "never")
    "#;
    let first = LumaParser::parse(source).unwrap();
    let second = LumaParser::parse(source).unwrap();
    assert_eq!(first, second);
}

#[test]
fn scanner_errors() {
    assert!(matches!(
        LumaParser::parse("print(@)").unwrap_err(),
        LumaError::UnexpectedCharacter { ch: '@', .. }
    ));
    assert!(matches!(
        LumaParser::parse("print(\"abc").unwrap_err(),
        LumaError::UnterminatedString { .. }
    ));
    assert!(matches!(
        LumaParser::parse("print(\"ab\nc\")").unwrap_err(),
        LumaError::UnterminatedString { .. }
    ));
    assert!(matches!(
        LumaParser::parse("print([[abc)").unwrap_err(),
        LumaError::UnterminatedLongBracket { .. }
    ));
    assert!(matches!(
        LumaParser::parse("print(1e)").unwrap_err(),
        LumaError::InvalidNumber { .. }
    ));
    assert!(matches!(
        LumaParser::parse("print(0x)").unwrap_err(),
        LumaError::InvalidNumber { .. }
    ));
    assert!(matches!(
        LumaParser::parse("print(12abc)").unwrap_err(),
        LumaError::InvalidNumber { .. }
    ));
}

#[test]
fn parser_errors() {
    assert!(matches!(
        LumaParser::parse("print(").unwrap_err(),
        LumaError::ExpectedExpression { .. }
    ));
    assert!(matches!(
        LumaParser::parse("if x print(1) end").unwrap_err(),
        LumaError::ExpectedToken { expected: "then", .. }
    ));
    assert!(matches!(
        LumaParser::parse("while true do").unwrap_err(),
        LumaError::ExpectedToken { expected: "end", .. }
    ));
    assert!(matches!(
        LumaParser::parse("local 1 = 2").unwrap_err(),
        LumaError::ExpectedToken { .. }
    ));
    assert!(matches!(
        LumaParser::parse("x + 1 = 2").unwrap_err(),
        LumaError::UnexpectedToken { .. }
    ));
    assert!(matches!(
        LumaParser::parse("end").unwrap_err(),
        LumaError::UnexpectedToken { .. }
    ));
    assert!(matches!(
        LumaParser::parse("print(1,,2)").unwrap_err(),
        LumaError::ExpectedExpression { .. }
    ));
}

#[test]
fn break_outside_a_loop_is_rejected() {
    assert!(matches!(
        LumaParser::parse("break").unwrap_err(),
        LumaError::UnexpectedToken { .. }
    ));
    assert!(matches!(
        LumaParser::parse("if true then break end").unwrap_err(),
        LumaError::UnexpectedToken { .. }
    ));
}

#[test]
fn generic_for_has_no_home_here() {
    assert!(LumaParser::parse("for k, v in pairs do end").is_err());
}

#[test]
fn chained_calls_parse() {
    assert!(LumaParser::parse("f(a)(b)(c)").is_ok());
}

#[test]
fn trailing_semicolons_are_fine() {
    assert!(LumaParser::parse("print(1); print(2);;").is_ok());
}

#[test]
fn statements_spanning_lines() {
    assert!(LumaParser::parse("local x =\n  1 +\n  2\nprint(x)").is_ok());
}
