//! Best-effort structural extraction of shell commands.
//!
//! [`parse`] turns a raw command line into a [`Pipeline`] of stages, each
//! with a command name, arguments, and redirect targets. The extractor is
//! deliberately forgiving: quoting and simple substitutions are tolerated,
//! dynamic tokens (`$VAR`, `$(...)`, backticks, globs) are carried verbatim
//! as opaque words, and unrecoverable syntax yields `None` rather than an
//! error so pattern-only analysis can still run.
//!
//! This is a tokenizer, not a shell. It never expands anything and has no
//! notion of a working directory.

/// How a redirect writes its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    /// `>` truncates the target.
    Write,
    /// `>>` appends to the target.
    Append,
}

/// One output redirect within a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Target path, verbatim (may be a dynamic token).
    pub target: String,
    pub mode: RedirectMode,
}

/// One command within a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stage {
    /// Command name (first word). Empty for a bare redirect like `> file`.
    pub name: String,
    /// Arguments, in order, with quoting stripped from plain literals.
    pub args: Vec<String>,
    /// Output redirects attached to this stage.
    pub redirects: Vec<Redirect>,
}

impl Stage {
    /// The command this stage actually runs: for `sudo`, the wrapped
    /// command after sudo's own flags; otherwise the stage name itself.
    #[must_use]
    pub fn effective_name(&self) -> &str {
        if self.name == "sudo" {
            sudo_command_index(&self.args)
                .and_then(|i| self.args.get(i))
                .map_or("", String::as_str)
        } else {
            &self.name
        }
    }
}

/// Flags to `sudo` that consume the next token as their value.
const SUDO_VALUE_FLAGS: [&str; 6] = ["-u", "-g", "-p", "-h", "-C", "-D"];

/// Index of the command `sudo` actually runs within its argument list.
///
/// Skips sudo's own flags, including the value token after flags that take
/// one (`sudo -u root apt` runs `apt`, not `root`). Long-form values are
/// inline (`--user=root`) and need no lookahead.
#[must_use]
pub fn sudo_command_index<S: AsRef<str>>(args: &[S]) -> Option<usize> {
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_ref();
        if SUDO_VALUE_FLAGS.contains(&arg) {
            i += 2;
        } else if arg.starts_with('-') {
            i += 1;
        } else {
            return Some(i);
        }
    }
    None
}

/// An ordered list of stages split on `|`, `;`, `&&`, and `||`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

/// Returns true if a token still contains unexpanded shell syntax
/// (variables, substitutions, globs) and therefore cannot be treated as a
/// literal path.
#[must_use]
pub fn is_dynamic_token(token: &str) -> bool {
    token.contains('$')
        || token.contains('`')
        || token.contains('*')
        || token.contains('?')
        || token.contains('[')
}

/// Parse a command line into a pipeline, best effort.
///
/// Returns `None` when the command is empty or structurally unrecoverable
/// (unterminated quote or substitution). Never panics, never errors.
#[must_use]
pub fn parse(command: &str) -> Option<Pipeline> {
    let chars: Vec<char> = command.chars().collect();
    let len = chars.len();

    let mut stages: Vec<Stage> = Vec::new();
    let mut words: Vec<String> = Vec::new();
    let mut redirects: Vec<Redirect> = Vec::new();
    let mut pending_redirect: Option<RedirectMode> = None;

    let mut i = 0;
    while i < len {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        match c {
            '&' if pending_redirect.is_some() => {
                // fd duplication ("2>&1", ">&2"): no file target.
                pending_redirect = None;
                i += 1;
                while i < len && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            '|' | ';' | '&' => {
                // `||` and `&&` are two characters but split identically.
                i += 1;
                if i < len && chars[i] == c && c != ';' {
                    i += 1;
                }
                flush_stage(&mut stages, &mut words, &mut redirects);
                pending_redirect = None;
            }
            '>' => {
                let attached = i > 0 && !chars[i - 1].is_whitespace();
                let mode = if i + 1 < len && chars[i + 1] == '>' {
                    i += 2;
                    RedirectMode::Append
                } else {
                    i += 1;
                    RedirectMode::Write
                };
                // Strip an attached fd prefix ("2>", "1>>") that was read as
                // a word.
                if attached
                    && words
                        .last()
                        .is_some_and(|w| !w.is_empty() && w.chars().all(|ch| ch.is_ascii_digit()))
                {
                    words.pop();
                }
                pending_redirect = Some(mode);
            }
            '<' => {
                // Input redirect: the following word is read, not affected.
                i += 1;
            }
            _ => {
                let (word, next) = read_word(&chars, i)?;
                i = next;
                match pending_redirect.take() {
                    Some(mode) => redirects.push(Redirect { target: word, mode }),
                    None => words.push(word),
                }
            }
        }
    }

    flush_stage(&mut stages, &mut words, &mut redirects);

    if stages.is_empty() {
        tracing::debug!(command, "no structure extracted");
        return None;
    }
    Some(Pipeline { stages })
}

fn flush_stage(stages: &mut Vec<Stage>, words: &mut Vec<String>, redirects: &mut Vec<Redirect>) {
    if words.is_empty() && redirects.is_empty() {
        return;
    }
    let mut iter = std::mem::take(words).into_iter();
    let name = iter.next().unwrap_or_default();
    stages.push(Stage {
        name,
        args: iter.collect(),
        redirects: std::mem::take(redirects),
    });
}

/// Read one word starting at `start`. Returns the word (quotes stripped from
/// literals, dynamic syntax kept verbatim) and the index after it, or `None`
/// on an unterminated quote or substitution.
fn read_word(chars: &[char], start: usize) -> Option<(String, usize)> {
    let len = chars.len();
    let mut out = String::new();
    let mut i = start;

    while i < len {
        let c = chars[i];
        match c {
            '\'' => {
                let close = find_char(chars, i + 1, '\'')?;
                out.extend(&chars[i + 1..close]);
                i = close + 1;
            }
            '"' => {
                i += 1;
                loop {
                    if i >= len {
                        return None;
                    }
                    match chars[i] {
                        '"' => {
                            i += 1;
                            break;
                        }
                        '\\' if i + 1 < len => {
                            out.push(chars[i + 1]);
                            i += 2;
                        }
                        other => {
                            out.push(other);
                            i += 1;
                        }
                    }
                }
            }
            '\\' => {
                if i + 1 < len {
                    out.push(chars[i + 1]);
                    i += 2;
                } else {
                    out.push('\\');
                    i += 1;
                }
            }
            '$' if i + 1 < len && chars[i + 1] == '(' => {
                // Command substitution: keep verbatim, balanced parens.
                let close = find_balanced_paren(chars, i + 2)?;
                out.extend(&chars[i..=close]);
                i = close + 1;
            }
            '`' => {
                let close = find_char(chars, i + 1, '`')?;
                out.extend(&chars[i..=close]);
                i = close + 1;
            }
            _ if c.is_whitespace() || matches!(c, '|' | ';' | '&' | '>' | '<') => break,
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    Some((out, i))
}

fn find_char(chars: &[char], from: usize, needle: char) -> Option<usize> {
    (from..chars.len()).find(|&j| chars[j] == needle)
}

/// Find the `)` closing a substitution whose contents begin at `from`,
/// honoring nested `(`/`)`.
fn find_balanced_paren(chars: &[char], from: usize) -> Option<usize> {
    let mut depth = 1usize;
    for j in from..chars.len() {
        match chars[j] {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(j);
                }
            }
            _ => {}
        }
    }
    None
}
