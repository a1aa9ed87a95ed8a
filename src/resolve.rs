use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex_lite::Regex;

use crate::error::{Result, ScriptgenError};
use crate::logic::{GenerationLogic, LogicRegistry};

/// A template document whose generation logic has been instantiated.
pub struct ResolvedTemplate {
    pub path: PathBuf,
    /// The public type in the document that implements the contract.
    pub type_name: String,
    pub raw_text: String,
    pub logic: Box<dyn GenerationLogic>,
}

/// Type declarations found in a template document, outside comments.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Declarations {
    /// Public types in declaration order.
    pub public_types: Vec<String>,
    /// Public types with an `impl <contract> for <Type>` block.
    pub conforming: Vec<String>,
}

fn public_type_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\bpub(?:lic)?\s+(?:(?:sealed|abstract|partial|static|final)\s+)*(?:struct|enum|union|type|class|record)\s+([A-Za-z_][A-Za-z0-9_]*)",
        )
        .expect("valid public type pattern")
    })
}

/// `class Foo : Base, IOther` / `class Foo extends Base` style inheritance.
fn base_list_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b(?:class|struct|record)\s+([A-Za-z_][A-Za-z0-9_]*)(?:<[^>]*>)?\s*(?::|\bextends\b|\bimplements\b)\s*([^{;]*)",
        )
        .expect("valid base list pattern")
    })
}

/// Start of a C# generic constraint clause, which ends a base list.
fn where_clause_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bwhere\b").expect("valid where clause pattern"))
}

fn impl_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\bimpl(?:\s*<[^>]*>)?\s+(?:[A-Za-z_][A-Za-z0-9_]*::)*([A-Za-z_][A-Za-z0-9_]*)(?:<[^>]*>)?\s+for\s+([A-Za-z_][A-Za-z0-9_]*)",
        )
        .expect("valid impl pattern")
    })
}

/// Last path segment of a contract name, so `scriptgen::ClassTemplate`
/// matches `impl ClassTemplate for ...`.
fn contract_ident(contract: &str) -> &str {
    let contract = contract.trim();
    contract
        .rsplit(|c| c == ':' || c == '.')
        .next()
        .unwrap_or(contract)
}

/// Whether a base list such as `Base<T>, ns.IOther` names `contract`.
fn base_list_names(bases: &str, contract: &str) -> bool {
    let bases = match where_clause_regex().find(bases) {
        Some(m) => &bases[..m.start()],
        None => bases,
    };

    bases
        .split(|c| c == ',' || c == '{')
        .filter_map(|base| base.split_whitespace().last())
        .filter(|base| *base != "implements")
        .map(|base| base.split('<').next().unwrap_or(base))
        .any(|base| contract_ident(base) == contract)
}

/// Scan `text` for public types and which of them implement `contract`.
///
/// Conformance is either a Rust `impl <contract> for <Type>` block or a
/// C-family base list (`class Type : <contract>`, `extends`, `implements`).
pub fn scan_declarations(text: &str, contract: &str) -> Declarations {
    let code = strip_comments(text);
    let contract = contract_ident(contract);

    let mut public_types: Vec<String> = Vec::new();
    for caps in public_type_regex().captures_iter(&code) {
        let name = caps[1].to_string();
        if !public_types.contains(&name) {
            public_types.push(name);
        }
    }

    let mut implementors: Vec<&str> = impl_regex()
        .captures_iter(&code)
        .filter(|caps| &caps[1] == contract)
        .filter_map(|caps| caps.get(2).map(|m| m.as_str()))
        .collect();
    implementors.extend(
        base_list_regex()
            .captures_iter(&code)
            .filter(|caps| base_list_names(&caps[2], contract))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str())),
    );

    let conforming = public_types
        .iter()
        .filter(|name| implementors.contains(&name.as_str()))
        .cloned()
        .collect();

    Declarations {
        public_types,
        conforming,
    }
}

/// Determine the single type in the document at `path` that carries its generation logic.
pub fn declared_logic_type(path: &Path, text: &str, contract: &str) -> Result<String> {
    let declarations = scan_declarations(text, contract);

    match declarations.conforming.as_slice() {
        [single] => Ok(single.clone()),
        [] if declarations.public_types.is_empty() => Err(ScriptgenError::NoDeclaredLogic {
            path: path.to_path_buf(),
            contract: contract.to_string(),
        }),
        [] => Err(ScriptgenError::LogicDoesNotConform {
            path: path.to_path_buf(),
            type_name: primary_type(path, &declarations.public_types).to_string(),
            contract: contract.to_string(),
        }),
        many => Err(ScriptgenError::AmbiguousLogic {
            path: path.to_path_buf(),
            type_names: many.to_vec(),
            contract: contract.to_string(),
        }),
    }
}

/// The type named after the document (`Foo` for `Foo.template.rs`), else the first one.
fn primary_type<'a>(path: &Path, public_types: &'a [String]) -> &'a str {
    let stem = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .unwrap_or_default();

    public_types
        .iter()
        .find(|name| name.as_str() == stem)
        .or_else(|| public_types.first())
        .map(String::as_str)
        .unwrap_or_default()
}

/// Read the document at `path`, find its generation type and instantiate it
/// with the document's raw text.
pub fn resolve_document(
    path: &Path,
    registry: &LogicRegistry,
    contract: &str,
) -> Result<ResolvedTemplate> {
    let raw_text = std::fs::read_to_string(path).map_err(|e| ScriptgenError::Io {
        context: format!("reading template {}", path.display()),
        source: e,
    })?;

    let type_name = declared_logic_type(path, &raw_text, contract)?;
    tracing::debug!(
        template = %path.display(),
        type_name = %type_name,
        "resolved declared generation type"
    );

    let logic = registry.instantiate(path, &type_name, contract, raw_text.clone())?;

    Ok(ResolvedTemplate {
        path: path.to_path_buf(),
        type_name,
        raw_text,
        logic,
    })
}

/// Blank out `//` and (nested) `/* */` comments, leaving string and char
/// literals intact. Newlines are kept so offsets stay on the same line.
pub fn strip_comments(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match (c, next) {
            ('/', Some('/')) => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            ('/', Some('*')) => {
                let mut depth = 0usize;
                while i < chars.len() {
                    match (chars[i], chars.get(i + 1).copied()) {
                        ('/', Some('*')) => {
                            depth += 1;
                            i += 2;
                        }
                        ('*', Some('/')) => {
                            depth -= 1;
                            i += 2;
                            if depth == 0 {
                                break;
                            }
                        }
                        ('\n', _) => {
                            out.push('\n');
                            i += 1;
                        }
                        _ => i += 1,
                    }
                }
                out.push(' ');
            }
            ('"', _) => {
                i = copy_string(&chars, i, 0, &mut out);
            }
            ('@', Some('"')) => {
                out.push('@');
                i = copy_verbatim_string(&chars, i + 1, &mut out);
            }
            ('@', Some('$')) if chars.get(i + 2) == Some(&'"') => {
                out.push_str("@$");
                i = copy_verbatim_string(&chars, i + 2, &mut out);
            }
            ('r', Some('"' | '#')) if !is_ident_char(i.checked_sub(1).map(|p| chars[p])) => {
                let hashes = chars[i + 1..].iter().take_while(|&&ch| ch == '#').count();
                if chars.get(i + 1 + hashes) == Some(&'"') {
                    out.push('r');
                    out.extend(std::iter::repeat('#').take(hashes));
                    i = copy_string(&chars, i + 1 + hashes, hashes, &mut out);
                } else {
                    out.push(c);
                    i += 1;
                }
            }
            ('\'', Some('\\')) => {
                let start = i;
                i += 3;
                while i < chars.len() && chars[i] != '\'' {
                    i += 1;
                }
                i = (i + 1).min(chars.len());
                out.extend(&chars[start..i]);
            }
            ('\'', Some(_)) if chars.get(i + 2) == Some(&'\'') => {
                out.extend(&chars[i..i + 3]);
                i += 3;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

fn is_ident_char(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Copy a string literal whose opening quote is at `open`. Raw strings pass
/// the number of `#`s that terminate them and have no escapes.
fn copy_string(chars: &[char], open: usize, hashes: usize, out: &mut String) -> usize {
    let raw = hashes > 0 || (open > 0 && chars[open - 1] == 'r');
    out.push('"');
    let mut i = open + 1;

    while i < chars.len() {
        let c = chars[i];
        if c == '\\' && !raw {
            out.push(c);
            if let Some(&escaped) = chars.get(i + 1) {
                out.push(escaped);
            }
            i += 2;
            continue;
        }
        out.push(c);
        i += 1;
        if c == '"' && chars[i..].iter().take(hashes).filter(|&&ch| ch == '#').count() == hashes
        {
            out.extend(&chars[i..i + hashes]);
            return i + hashes;
        }
    }

    chars.len()
}

/// Copy a C# verbatim string (`@"..."`) whose opening quote is at `open`.
/// Backslashes are literal and `""` stands for a quote.
fn copy_verbatim_string(chars: &[char], open: usize, out: &mut String) -> usize {
    out.push('"');
    let mut i = open + 1;

    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        i += 1;
        if c == '"' {
            if chars.get(i) != Some(&'"') {
                return i;
            }
            out.push('"');
            i += 1;
        }
    }

    chars.len()
}
