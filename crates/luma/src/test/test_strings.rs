// String literals, concatenation, length, and ordering.
use crate::interpret;
use crate::luma_vm::LumaError;

#[test]
fn quote_styles_are_equivalent() {
    assert_eq!(interpret(r#"print("abc" == 'abc')"#).unwrap(), "true\n");
}

#[test]
fn escapes_decode() {
    assert_eq!(interpret(r#"print("a\tb")"#).unwrap(), "a\tb\n");
    assert_eq!(interpret(r#"print("line1\nline2")"#).unwrap(), "line1\nline2\n");
    assert_eq!(interpret(r#"print("quote:\"x\"")"#).unwrap(), "quote:\"x\"\n");
    assert_eq!(interpret(r#"print('back\\slash')"#).unwrap(), "back\\slash\n");
}

#[test]
fn unknown_escape_is_rejected() {
    assert!(interpret(r#"print("\q")"#).is_err());
}

#[test]
fn escaped_line_breaks_become_one_newline() {
    // backslash-continued lines work over LF, CRLF, and bare CR sources
    assert_eq!(interpret("print(\"a\\\nb\")").unwrap(), "a\nb\n");
    assert_eq!(interpret("print(\"a\\\r\nb\")").unwrap(), "a\nb\n");
    assert_eq!(interpret("print(\"a\\\rb\")").unwrap(), "a\nb\n");
}

#[test]
fn long_strings_are_verbatim() {
    assert_eq!(
        interpret("print([[no \\n escapes here]])").unwrap(),
        "no \\n escapes here\n"
    );
    assert_eq!(interpret("print([==[mixed ]] inside]==])").unwrap(), "mixed ]] inside\n");
}

#[test]
fn long_string_drops_leading_newline() {
    assert_eq!(interpret("print([[\nfirst]])").unwrap(), "first\n");
    assert_eq!(interpret("print([[\nfirst\n]])").unwrap(), "first\n\n");
}

#[test]
fn concat_is_right_associative() {
    assert_eq!(interpret(r#"print("a" .. "b" .. "c")"#).unwrap(), "abc\n");
}

#[test]
fn concat_requires_strings() {
    assert!(matches!(
        interpret(r#"print("n=" .. 1)"#).unwrap_err(),
        LumaError::TypeError { .. }
    ));
    assert!(matches!(
        interpret(r#"print(1 .. 2)"#).unwrap_err(),
        LumaError::TypeError { .. }
    ));
}

#[test]
fn concat_results_compare_equal_to_literals() {
    assert_eq!(
        interpret(r#"print(("foo" .. "bar") == "foobar")"#).unwrap(),
        "true\n"
    );
}

#[test]
fn length_counts_bytes() {
    assert_eq!(interpret(r#"print(#"hello")"#).unwrap(), "5\n");
    assert_eq!(interpret(r#"print(#"")"#).unwrap(), "0\n");
    assert!(matches!(
        interpret("print(#5)").unwrap_err(),
        LumaError::TypeError { .. }
    ));
}

#[test]
fn ordering_is_bytewise_lexicographic() {
    assert_eq!(interpret(r#"print("abc" < "abd")"#).unwrap(), "true\n");
    assert_eq!(interpret(r#"print("abc" < "ab")"#).unwrap(), "false\n");
    assert_eq!(interpret(r#"print("Z" < "a")"#).unwrap(), "true\n");
    assert_eq!(interpret(r#"print("" <= "")"#).unwrap(), "true\n");
}

#[test]
fn empty_string_is_truthy() {
    assert_eq!(interpret(r#"print("" and "yes")"#).unwrap(), "yes\n");
}

#[test]
fn strings_never_equal_other_tags() {
    assert_eq!(interpret(r#"print("1" == 1, "true" == true)"#).unwrap(), "false\tfalse\n");
}

#[test]
fn concat_in_a_loop_builds_incrementally() {
    let source = r#"
        local s = ""
        local piece = "ab"
        local n = 0
        while n < 3 do
            s = s .. piece
            n = n + 1
        end
        print(s, #s)
    "#;
    assert_eq!(interpret(source).unwrap(), "ababab\t6\n");
}
