//! Shell-like splitting of `exec:` targets.
//!
//! Only whitespace separation and quote grouping are supported. There is
//! no escaping, globbing or variable expansion.

/// Split `input` into arguments.
///
/// Quotes group text and are removed; the other quote character is literal
/// inside a quoted section. `""` yields an empty argument.
pub fn tokenize(input: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {q} quote in '{input}'"));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
