use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;

use crate::error::{Error, Result};

/// Post-processes rendered text. The error is the formatter's own message.
pub type Formatter = fn(&str) -> std::result::Result<String, String>;

pub fn identity_formatter(source: &str) -> std::result::Result<String, String> {
    Ok(source.to_string())
}

/// Strips trailing whitespace and collapses runs of blank lines.
pub fn tidy_formatter(source: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(source.len());
    let mut blank = 0usize;
    for line in source.trim_start_matches('\n').lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank += 1;
            if blank > 1 {
                continue;
            }
        } else {
            blank = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    while out.ends_with("\n\n") {
        out.pop();
    }
    Ok(out)
}

/// `source` with 1-based line numbers, used in format diagnostics.
pub fn numbered_listing(source: &str) -> String {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| format!("{:>4}: {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn environment<'source>() -> Environment<'source> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("trim_prefix", |value: String, prefix: String| {
        value
            .strip_prefix(prefix.as_str())
            .map(str::to_string)
            .unwrap_or(value)
    });
    env
}

/// Expands `template` against `data`, then runs `formatter` over the result.
pub fn render<S: Serialize>(
    name: &str,
    template: &str,
    data: &S,
    formatter: Formatter,
) -> Result<String> {
    let template_error = |source| Error::TemplateRender {
        name: name.to_string(),
        source,
    };
    let mut env = environment();
    env.add_template(name, template).map_err(template_error)?;
    let text = env
        .get_template(name)
        .and_then(|tmpl| tmpl.render(data))
        .map_err(template_error)?;

    formatter(&text).map_err(|message| {
        let listing = numbered_listing(&text);
        tracing::error!("format '{}' failed: {}\n{}", name, message, listing);
        Error::Format {
            name: name.to_string(),
            message,
            listing,
        }
    })
}
