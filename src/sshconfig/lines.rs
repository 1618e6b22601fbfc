//! Line parsing internals
// (c) 2024 Ross Younger

use anyhow::{Context, Result};

#[derive(Debug, PartialEq)]
/// A parsed line we read from an ssh config file
pub(super) enum Line {
    Empty,
    Comment(String),
    Host {
        line_number: usize,
        args: Vec<String>,
    },
    Match {
        line_number: usize,
    },
    Include {
        line_number: usize,
        args: Vec<String>,
    },
    Generic {
        line_number: usize,
        keyword: String, /*lowercase!*/
        args: Vec<String>,
    },
}

///////////////////////////////////////////////////////////////////////////////////////

/// Splits a string into a list of arguments.
/// Arguments are delimited by whitespace, subject to quoting (single or double quotes), and simple escapes (\\, \", \').
pub(super) fn split_args(input: &str) -> Result<Vec<String>> {
    split_tokens(input, true)
}

/// As [`split_args`]; if `comments` is false, `#` is an ordinary character.
fn split_tokens(input: &str, comments: bool) -> Result<Vec<String>> {
    // We need to index over the characters of the input, but also need to be able to peek at the next token in case of escapes.
    let mut i = 0;
    let input: Vec<char> = input.chars().collect();
    let mut output = Vec::<String>::new();
    while i < input.len() {
        // Strip any leading whitespace
        if input[i] == ' ' || input[i] == '\t' {
            i += 1;
            continue;
        }
        if comments && input[i] == '#' {
            break; // it's a comment, we're done
        }

        // We're at the start of a real token
        let mut current_arg = String::new();
        let mut quote_state: char = '\0';

        while i < input.len() {
            let ch = input[i];
            match (ch, quote_state) {
                ('\\', _) => {
                    // It might be an escape
                    let next = input.get(i + 1);
                    match next {
                        Some(nn @ ('\'' | '\"' | '\\')) => {
                            // It is an escape
                            current_arg.push(*nn);
                            i += 1;
                        }
                        Some(_) | None => current_arg.push(ch), // Ignore unrecognised escape
                    }
                }
                (' ' | '\t', '\0') => break, // end of token
                (q @ ('\'' | '\"'), '\0') => quote_state = q, // start of quote
                (q1, q2) if q1 == q2 => quote_state = '\0', // end of quote
                (c, _) => current_arg.push(c), // nothing special
            }
            i += 1;
        }

        // end of token
        anyhow::ensure!(quote_state == '\0', "unterminated quote");
        output.push(current_arg);
        i += 1;
    }
    Ok(output)
}

/// Renders one argument so that [`split_args`] reads it back unchanged.
pub(super) fn quote_arg(arg: &str) -> String {
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '#' | '\\'));
    if !needs_quotes {
        return arg.to_owned();
    }
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Joins arguments into the canonical single-string form of a setting value
pub(super) fn join_args(args: &[String]) -> String {
    args.iter()
        .map(|a| quote_arg(a))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Brings a setting value which did not come from a file into canonical form.
///
/// Balanced quotes in the value are honoured. If the quoting is unbalanced, each whitespace-separated
/// word is taken literally. A `#` never starts a comment here.
pub(crate) fn canonical_value(raw: &str) -> String {
    let args = split_tokens(raw, false)
        .unwrap_or_else(|_| raw.split_whitespace().map(str::to_owned).collect());
    join_args(&args)
}

/// Classifies a single line of input.
pub(super) fn parse_line(line: &str, line_number: usize) -> Result<Line> {
    let line = line.trim();
    if let Some(comment) = line.strip_prefix('#') {
        return Ok(Line::Comment(comment.trim().to_owned()));
    }
    // extract keyword, which may be delimited by whitespace (Key Value) OR equals (Key=Value)
    let (keyword, rest) = {
        let mut splitter = line.splitn(2, &[' ', '\t', '=']);
        let keyword = match splitter.next() {
            None | Some("") => return Ok(Line::Empty),
            Some(kw) => kw.to_lowercase(),
        };
        (keyword, splitter.next().unwrap_or_default())
    };
    // tolerate "Key = Value"
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('=').unwrap_or(rest);
    let args = split_args(rest).with_context(|| format!("at line {line_number}"))?;
    anyhow::ensure!(!args.is_empty(), "missing argument at line {line_number}");

    Ok(match keyword.as_str() {
        "host" => Line::Host { line_number, args },
        "match" => Line::Match { line_number },
        "include" => Line::Include { line_number, args },
        _ => Line::Generic {
            line_number,
            keyword,
            args,
        },
    })
}

///////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use anyhow::{anyhow, Context, Result};
    use assertables::{assert_contains_as_result, assert_eq_as_result};

    use super::{canonical_value, join_args, parse_line, quote_arg, split_args, Line};

    macro_rules! make_vec {
        ($v:expr) => {
            $v.into_iter().map(|s| s.into()).collect()
        };
    }

    fn host_(args: Vec<&str>) -> Line {
        Line::Host {
            line_number: 0,
            args: make_vec!(args),
        }
    }
    fn include_(args: Vec<&str>) -> Line {
        Line::Include {
            line_number: 0,
            args: make_vec!(args),
        }
    }
    fn generic_(kw: &str, args: Vec<&str>) -> Line {
        Line::Generic {
            line_number: 0,
            keyword: kw.into(),
            args: make_vec!(args),
        }
    }

    #[test]
    fn arg_splitting() -> Result<()> {
        for (input, expected) in [
            ("", vec![]),
            ("a", vec!["a"]),
            ("   a    b   ", vec!["a", "b"]),
            (" a b # c d", vec!["a", "b"]),
            (r#"a\ \' \"b"#, vec!["a\\", "'", "\"b"]),
            (r#""a b" 'c d'"#, vec!["a b", "c d"]),
            (r#""a \"b" '\'c d'"#, vec!["a \"b", "'c d"]),
        ] {
            let msg = || format!("input \"{input}\" failed");
            assert_eq_as_result!(split_args(input).with_context(msg)?, expected)
                .map_err(|e| anyhow!(e))
                .with_context(msg)?;
        }
        for (input, expected_msg) in [
            ("aaa\"bbb", "unterminated quote"),
            ("'", "unterminated quote"),
        ] {
            let err = split_args(input).unwrap_err();
            assert_contains_as_result!(err.to_string(), expected_msg)
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("input \"{input}\" failed"))?;
        }
        Ok(())
    }

    #[test]
    fn line_parsing() -> Result<()> {
        for (input, expected) in [
            ("", Line::Empty),
            ("   ", Line::Empty),
            (" # foo", Line::Comment("foo".into())),
            ("Foo Bar", generic_("foo", vec!["Bar"])),
            ("Foo Bar baz", generic_("foo", vec!["Bar", "baz"])),
            ("Foo \"Bar baz\"", generic_("foo", vec!["Bar baz"])),
            ("Foo=bar", generic_("foo", vec!["bar"])),
            ("Foo = bar", generic_("foo", vec!["bar"])),
            ("Host a b", host_(vec!["a", "b"])),
            ("Match a b", Line::Match { line_number: 0 }),
            ("iNcluDe c d", include_(vec!["c", "d"])),
            (
                "QUOTED \"abc def\" ghi",
                generic_("quoted", vec!["abc def", "ghi"]),
            ),
        ] {
            let msg = || format!("input \"{input}\" failed");
            assert_eq_as_result!(parse_line(input, 0).with_context(msg)?, expected)
                .map_err(|e| anyhow!(e))
                .with_context(msg)?;
        }
        for (input, expected_msg) in [
            ("aaa bbb \" ccc", "unterminated quote"),
            ("aaa", "missing argument"),
        ] {
            let err = parse_line(input, 0).unwrap_err();
            assert_contains_as_result!(err.root_cause().to_string(), expected_msg)
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("input \"{input}\" failed"))?;
        }
        Ok(())
    }

    #[test]
    fn quoting_survives_a_reparse() -> Result<()> {
        for arg in ["plain", "two words", "with\"quote", "back\\slash", "#hash", ""] {
            let quoted = quote_arg(arg);
            assert_eq_as_result!(split_args(&quoted)?, vec![arg.to_owned()])
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("arg {arg:?} quoted as {quoted}"))?;
        }
        let args: Vec<String> = make_vec!(vec!["ssh", "-W", "%h:%p", "jump host"]);
        assert_eq!(join_args(&args), "ssh -W %h:%p \"jump host\"");
        Ok(())
    }

    #[test]
    fn supplied_values_are_made_canonical() -> Result<()> {
        for (raw, expected, args) in [
            ("h1", "h1", vec!["h1"]),
            (
                "ssh -W \"%h:%p\"   'jump box'",
                "ssh -W %h:%p \"jump box\"",
                vec!["ssh", "-W", "%h:%p", "jump box"],
            ),
            ("echo \"hi", "echo \"\\\"hi\"", vec!["echo", "\"hi"]),
            ("echo #tag", "echo \"#tag\"", vec!["echo", "#tag"]),
            ("   ", "", vec![]),
        ] {
            let canonical = canonical_value(raw);
            assert_eq_as_result!(canonical.as_str(), expected)
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("value {raw:?}"))?;
            // reading it back from a file gives the same arguments, and it is already canonical
            assert_eq!(split_args(&canonical)?, args);
            assert_eq!(canonical_value(&canonical), canonical);
        }
        Ok(())
    }
}
