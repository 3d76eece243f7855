// scroll 文本词法分析
use crate::utils::error::BottleError;

/// One statement of scroll text: an operation name and its raw arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub line: usize,
    pub name: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Quoted(String),
    Comma,
    Open,
    Close,
    End,
}

/// Splits scroll text into statements.
///
/// Statements end at a newline or `;`. Arguments follow the name either
/// bare (`echo hi`), comma separated (`file_write "/tmp/x", "y"`) or in
/// parentheses (`installed?("vim")`). `#` starts a comment.
pub fn statements(text: &str) -> Result<Vec<Statement>, BottleError> {
    let mut out = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut start_line = 1;

    for (line, token) in tokenize(text)? {
        if current.is_empty() {
            start_line = line;
        }
        if token == Token::End {
            if !current.is_empty() {
                out.push(statement(start_line, std::mem::take(&mut current))?);
            }
        } else {
            current.push(token);
        }
    }
    if !current.is_empty() {
        out.push(statement(start_line, current)?);
    }

    Ok(out)
}

fn statement(line: usize, tokens: Vec<Token>) -> Result<Statement, BottleError> {
    let syntax = |message: &str| BottleError::ScrollSyntax {
        line,
        message: message.to_string(),
    };

    let mut tokens = tokens.into_iter();
    let name = match tokens.next() {
        Some(Token::Word(name)) => name,
        _ => return Err(syntax("expected an operation name")),
    };

    let rest: Vec<Token> = tokens.collect();
    let inner: &[Token] = match rest.first() {
        Some(Token::Open) => match rest.last() {
            Some(Token::Close) if rest.len() >= 2 => &rest[1..rest.len() - 1],
            _ => return Err(syntax("unclosed '('")),
        },
        _ => &rest,
    };

    let mut args = Vec::new();
    let mut expect_arg = true;
    for token in inner {
        match token {
            Token::Word(s) | Token::Quoted(s) => {
                if !expect_arg && inner.contains(&Token::Comma) {
                    return Err(syntax("missing ',' between arguments"));
                }
                args.push(s.clone());
                expect_arg = false;
            }
            Token::Comma if !expect_arg => expect_arg = true,
            Token::Comma => return Err(syntax("unexpected ','")),
            Token::Open | Token::Close => return Err(syntax("unexpected parenthesis")),
            Token::End => unreachable!("statement tokens never contain End"),
        }
    }
    if expect_arg && !args.is_empty() {
        return Err(syntax("trailing ','"));
    }

    Ok(Statement { line, name, args })
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, BottleError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let mut line = 1;

    while let Some(c) = chars.next() {
        match c {
            '\n' => {
                tokens.push((line, Token::End));
                line += 1;
            }
            ';' => tokens.push((line, Token::End)),
            ',' => tokens.push((line, Token::Comma)),
            '(' => tokens.push((line, Token::Open)),
            ')' => tokens.push((line, Token::Close)),
            '#' => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '"' | '\'' => {
                let quote = c;
                let start = line;
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some(ch) if ch == quote => break,
                        Some('\\') if quote == '"' => match chars.next() {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some(other) => value.push(other),
                            None => break,
                        },
                        Some(ch) => {
                            if ch == '\n' {
                                line += 1;
                            }
                            value.push(ch);
                        }
                        None => {
                            return Err(BottleError::ScrollSyntax {
                                line: start,
                                message: "unterminated string".to_string(),
                            })
                        }
                    }
                }
                tokens.push((start, Token::Quoted(value)));
            }
            c if c.is_whitespace() => {}
            c => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || "\n;,()#\"'".contains(next) {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                tokens.push((line, Token::Word(word)));
            }
        }
    }

    Ok(tokens)
}
