// Literal decoding: token lexemes to runtime values.
// The scanner validates shape; these functions produce the values and strip
// string delimiters.

pub enum NumberResult {
    Int(i64),
    Float(f64),
}

pub fn parse_int_token_value(num_text: &str) -> Result<NumberResult, String> {
    if let Some(hex) = num_text
        .strip_prefix("0x")
        .or_else(|| num_text.strip_prefix("0X"))
    {
        // hex literals wrap through the unsigned 64-bit range, so
        // 0xFFFFFFFFFFFFFFFF reads back as -1
        return match u64::from_str_radix(hex, 16) {
            Ok(value) => Ok(NumberResult::Int(value as i64)),
            Err(_) => Err(format!("malformed hexadecimal literal '{}'", num_text)),
        };
    }

    match num_text.parse::<i64>() {
        Ok(value) => Ok(NumberResult::Int(value)),
        Err(e) => {
            if matches!(
                e.kind(),
                std::num::IntErrorKind::NegOverflow | std::num::IntErrorKind::PosOverflow
            ) {
                // decimal overflow falls back to a float
                match num_text.parse::<f64>() {
                    Ok(f) => Ok(NumberResult::Float(f)),
                    Err(_) => Err(format!("malformed number '{}'", num_text)),
                }
            } else {
                Err(format!("malformed number '{}'", num_text))
            }
        }
    }
}

pub fn parse_float_token_value(num_text: &str) -> Result<f64, String> {
    num_text
        .parse::<f64>()
        .map_err(|_| format!("malformed number '{}'", num_text))
}

/// Strip the delimiters from a string lexeme and decode its logical content.
/// Quoted strings lose their outer quotes and have escapes decoded; long
/// strings lose the bracket pairs and keep their content verbatim apart from
/// an immediate leading line break.
pub fn parse_string_token_value(text: &str) -> Result<String, String> {
    if text.starts_with('[') {
        long_string_value(text)
    } else {
        quoted_string_value(text)
    }
}

fn long_string_value(text: &str) -> Result<String, String> {
    let equal_num = text[1..].bytes().take_while(|&b| b == b'=').count();
    let open = equal_num + 2;
    let close = text.len() - open;
    if close < open {
        return Err("malformed long string".to_string());
    }

    let mut content = &text[open..close];

    // a line break right after the opening bracket is not part of the content
    if let Some(rest) = content.strip_prefix("\r\n").or_else(|| {
        content
            .strip_prefix('\n')
            .or_else(|| content.strip_prefix('\r'))
    }) {
        content = rest;
    }

    Ok(content.to_string())
}

fn quoted_string_value(text: &str) -> Result<String, String> {
    let mut result = String::with_capacity(text.len().saturating_sub(2));
    let mut chars = text.chars().peekable();
    let delimiter = chars.next().ok_or("empty string lexeme")?;

    while let Some(c) = chars.next() {
        if c == delimiter {
            break;
        }
        if c != '\\' {
            result.push(c);
            continue;
        }

        let Some(escaped) = chars.next() else {
            return Err("malformed string".to_string());
        };
        match escaped {
            'a' => result.push('\u{0007}'),
            'b' => result.push('\u{0008}'),
            'f' => result.push('\u{000C}'),
            'n' => result.push('\n'),
            'r' => result.push('\r'),
            't' => result.push('\t'),
            'v' => result.push('\u{000B}'),
            '\\' | '\'' | '\"' => result.push(escaped),
            // an escaped line break stands for a newline; a \r\n or \n\r
            // pair is one logical break
            '\n' | '\r' => {
                if let Some(&next) = chars.peek() {
                    if (escaped == '\r' && next == '\n')
                        || (escaped == '\n' && next == '\r')
                    {
                        chars.next();
                    }
                }
                result.push('\n');
            }
            _ => {
                return Err(format!("invalid escape sequence '\\{}'", escaped));
            }
        }
    }

    Ok(result)
}
