use heck::ToUpperCamelCase;

use super::{File, Maker};
use crate::error::Result;
use crate::field::Method;
use crate::flatten::{make_render_data, NameKind, Neutral, Shape};
use crate::render::render;

const SERVICE_TEMPLATE: &str = include_str!("templates/go_service.jinja");
const VALUES_TEMPLATE: &str = include_str!("templates/go_values.jinja");

/// Go client: `service.make.go` plus the `values.make.go` query encoder it depends on.
pub struct GoMaker;

impl Maker for GoMaker {
    fn lang(&self) -> &str {
        "go"
    }

    fn make(&self, package: &str, methods: Vec<Method>) -> Result<Vec<File>> {
        let package = if package.is_empty() { "sdk" } else { package };
        let data = make_render_data(self.lang(), package, &methods, go_namer, go_typer)?;
        let service = render("service.make.go", SERVICE_TEMPLATE, &data, go_layout)?;
        let values = render("values.make.go", VALUES_TEMPLATE, &data, go_layout)?;
        Ok(vec![
            File::new("service.make.go", service),
            File::new("values.make.go", values),
        ])
    }
}

fn go_namer(name: &str, _: NameKind) -> String {
    name.to_upper_camel_case()
}

fn go_typer(ty: &str, shape: Shape) -> String {
    match shape {
        Shape::Struct | Shape::SelfRef => format!("*{ty}"),
        Shape::Array => format!("[]{ty}"),
        Shape::Basic => ty.to_string(),
        Shape::Scalar => go_scalar(ty),
    }
}

fn go_scalar(ty: &str) -> String {
    match Neutral::parse(ty) {
        Neutral::Array(elem) => format!("[]{}", go_scalar(elem)),
        Neutral::Map(key, value) => format!("map[{}]{}", go_scalar(key), go_scalar(value)),
        Neutral::Name("any") => "interface{}".to_string(),
        Neutral::Name(name) => name.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lex {
    Code,
    Raw,
    BlockComment,
}

/// Re-indents Go source with tabs by bracket depth and checks that brackets balance.
///
/// Strings, runes, raw strings and comments are skipped while counting. Lines inside a
/// multi-line raw string are left untouched.
pub fn go_layout(source: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(source.len());
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut state = Lex::Code;
    let mut blank = false;

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        if state == Lex::Raw {
            out.push_str(raw);
            out.push('\n');
            state = scan(raw, state, &mut stack, line_no)?;
            continue;
        }
        let line = raw.trim();
        if line.is_empty() {
            if !out.is_empty() && !blank {
                out.push('\n');
                blank = true;
            }
            continue;
        }
        let closers = line
            .chars()
            .take_while(|c| matches!(c, '}' | ')' | ']'))
            .count();
        let mut depth = stack.len().saturating_sub(closers);
        if state == Lex::Code && (line.starts_with("case ") || line.starts_with("default:")) {
            depth = depth.saturating_sub(1);
        }
        out.extend(std::iter::repeat('\t').take(depth));
        out.push_str(line);
        out.push('\n');
        blank = false;
        state = scan(line, state, &mut stack, line_no)?;
    }

    if let Some((open, line_no)) = stack.last() {
        return Err(format!("line {line_no}: unclosed '{open}'"));
    }
    if state != Lex::Code {
        return Err("unterminated raw string or comment at end of file".to_string());
    }
    while out.ends_with("\n\n") {
        out.pop();
    }
    Ok(out)
}

fn scan(
    line: &str,
    mut state: Lex,
    stack: &mut Vec<(char, usize)>,
    line_no: usize,
) -> std::result::Result<Lex, String> {
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            Lex::Raw => {
                if c == '`' {
                    state = Lex::Code;
                }
            }
            Lex::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = Lex::Code;
                }
            }
            Lex::Code => match c {
                '`' => state = Lex::Raw,
                '"' | '\'' => {
                    let mut closed = false;
                    while let Some(next) = chars.next() {
                        match next {
                            '\\' => {
                                chars.next();
                            }
                            _ if next == c => {
                                closed = true;
                                break;
                            }
                            _ => {}
                        }
                    }
                    if !closed {
                        return Err(format!("line {line_no}: unterminated literal"));
                    }
                }
                '/' if chars.peek() == Some(&'/') => break,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = Lex::BlockComment;
                }
                '{' | '(' | '[' => stack.push((c, line_no)),
                '}' | ')' | ']' => {
                    let expected = match c {
                        '}' => '{',
                        ')' => '(',
                        _ => '[',
                    };
                    match stack.pop() {
                        Some((open, _)) if open == expected => {}
                        Some((open, at)) => {
                            return Err(format!(
                                "line {line_no}: '{c}' does not close '{open}' opened on line {at}"
                            ))
                        }
                        None => return Err(format!("line {line_no}: unexpected '{c}'")),
                    }
                }
                _ => {}
            },
        }
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::field::Field;

    fn ping(name: &str, path: &str, description: &str) -> Method {
        Method {
            name: name.to_string(),
            method: "GET".to_string(),
            path: path.to_string(),
            description: description.to_string(),
            input: None,
            output: Some(Field::scalar("out", "string")),
        }
    }

    #[test]
    fn typer_composes_pointers_and_slices() {
        assert_eq!(go_typer("Post", Shape::Struct), "*Post");
        assert_eq!(go_typer(&go_typer("Post", Shape::Struct), Shape::Array), "[]*Post");
        assert_eq!(go_typer("map[string]any", Shape::Scalar), "map[string]interface{}");
        assert_eq!(go_namer("add_post", NameKind::Method), "AddPost");
        assert_eq!(go_namer("created_at", NameKind::Field), "CreatedAt");
    }

    #[test]
    fn layout_reindents_by_depth() {
        let src =
            "package sdk\n\n\n\nfunc f(x int) {\n  switch x {\n      case 1:\n  return\n   }\n}\n";
        let out = go_layout(src).unwrap();
        assert_eq!(
            out,
            "package sdk\n\nfunc f(x int) {\n\tswitch x {\n\tcase 1:\n\t\treturn\n\t}\n}\n"
        );
    }

    #[test]
    fn layout_ignores_brackets_in_literals() {
        let src = "var a = \"{[(\" // )\nvar b = '}'\nvar c = `json:\"x\"`\n";
        assert!(go_layout(src).is_ok());
    }

    #[test]
    fn layout_reports_mismatch_line() {
        let err = go_layout("func f() {\n\treturn )\n").unwrap_err();
        assert!(err.starts_with("line 2:"), "{err}");
        let err = go_layout("type T struct {\n").unwrap_err();
        assert_eq!(err, "line 1: unclosed '{'");
    }

    #[test]
    fn multi_line_description_stays_in_one_comment() {
        let method = ping("ping", "/ping", "Liveness probe.\nAnswers pong.");
        let files = GoMaker.make("", vec![method]).unwrap();
        let service = &files[0].content;
        assert!(service.contains("// Liveness probe. Answers pong.\n"), "{service}");
        assert!(!service.lines().any(|line| line.trim() == "Answers pong."), "{service}");
    }

    #[test]
    fn handlers_sharing_a_go_name_are_rejected() {
        let methods = vec![ping("get_post", "/a", ""), ping("getPost", "/b", "")];
        let err = GoMaker.make("", methods).unwrap_err();
        assert!(matches!(err, Error::SchemaResolution(_)), "{err}");
    }
}
