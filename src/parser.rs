//! Parse Schema Markdown text into a type model using PEST.
//!
//! Parsing is line-oriented: each logical line is matched against the rules of
//! `grammar.pest` in a fixed priority order, first match wins, and the match is
//! applied to the type model under construction. Syntax errors are recorded and
//! the scan continues; [`SchemaMarkdownParser::finalize`] runs the static checks
//! and turns every accumulated error into a single [`ParserError`].

use crate::ast::*;
use crate::lint::lint;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser as PestParser;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct SchemaMarkdownGrammar;

/// Default file extension for [`SchemaMarkdownParser::load`].
pub const DEFAULT_EXTENSION: &str = ".scm";

/// One parse or semantic error, attributed to a file position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Diagnostic {
    pub filename: String,
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: error: {}", self.filename, self.line, self.message)
    }
}

/// Sorted, deduplicated `<file>:<line>: error: <message>` strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .errors.join("\n"))]
pub struct ParserError {
    pub errors: Vec<String>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid schema path pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error(transparent)]
    Glob(#[from] glob::GlobError),
}

/// Incremental Schema Markdown compiler. Repeated `parse_*` calls accumulate into
/// `types`; call [`finalize`](Self::finalize) once when all inputs are parsed.
#[derive(Debug, Default)]
pub struct SchemaMarkdownParser {
    pub types: Types,
    errors: BTreeSet<Diagnostic>,
    /// Definition (`Type`) and item (`Type.member`) positions.
    filepos: HashMap<String, (String, usize)>,
}

/// State carried across the lines of one input.
#[derive(Debug, Default)]
struct LineState {
    action: Option<String>,
    urls: Option<Vec<ActionUrl>>,
    user_type: Option<String>,
    doc: Vec<String>,
    doc_group: Option<String>,
    linenum: usize,
}

impl LineState {
    fn take_doc(&mut self) -> Option<Vec<String>> {
        if self.doc.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.doc))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefinitionKind {
    Struct,
    Union,
    Enum,
}

/// Typed result of matching one logical line.
#[derive(Debug)]
enum LineMatch<'a> {
    Comment(Option<&'a str>),
    Group(Option<&'a str>),
    Action(&'a str),
    Definition {
        kind: DefinitionKind,
        name: &'a str,
        bases: Option<Vec<String>>,
    },
    Section {
        section: ActionSection,
        bases: Option<Vec<String>>,
    },
    Urls,
    Value(&'a str),
    Member {
        optional: bool,
        name: &'a str,
        ty: TypeRef,
        attr: Option<Attributes>,
    },
    Url {
        method: &'a str,
        path: Option<&'a str>,
    },
    Typedef {
        name: &'a str,
        ty: TypeRef,
        attr: Option<Attributes>,
    },
}

/// Parse and finalize a single Schema Markdown string.
pub fn parse_schema_markdown(text: &str) -> Result<Types, ParserError> {
    let mut parser = SchemaMarkdownParser::new();
    parser.parse_str(text, "");
    parser.finalize()?;
    Ok(parser.into_types())
}

impl SchemaMarkdownParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing type model; parsed definitions are added to it.
    pub fn with_types(types: Types) -> Self {
        Self {
            types,
            ..Self::default()
        }
    }

    pub fn into_types(self) -> Types {
        self.types
    }

    /// Accumulated errors, formatted and sorted by (filename, line, message).
    pub fn errors(&self) -> Vec<String> {
        self.errors.iter().map(Diagnostic::to_string).collect()
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter()
    }

    /// Run the static type model checks and fail if any error was recorded by
    /// parsing or by the checks.
    pub fn finalize(&mut self) -> Result<(), ParserError> {
        for message in lint(&self.types) {
            let (filename, line) = self.filepos_for(&message.type_name, message.member.as_deref());
            self.errors.insert(Diagnostic {
                filename,
                line,
                message: message.message,
            });
        }
        tracing::debug!(
            types = self.types.len(),
            errors = self.errors.len(),
            "finalized type model"
        );
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ParserError {
                errors: self.errors(),
            })
        }
    }

    /// Parse a file, or every file ending in [`DEFAULT_EXTENSION`] below a directory.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        self.load_with_extension(path, DEFAULT_EXTENSION)
    }

    /// Parse a file, or every file ending in `extension` below a directory (sorted
    /// by path). Does not finalize.
    pub fn load_with_extension(
        &mut self,
        path: impl AsRef<Path>,
        extension: &str,
    ) -> Result<(), LoadError> {
        let path = path.as_ref();
        let files = if path.is_dir() {
            let pattern = format!(
                "{}/**/*{}",
                glob::Pattern::escape(&path.to_string_lossy()),
                extension
            );
            let mut files = glob::glob(&pattern)?.collect::<Result<Vec<_>, _>>()?;
            files.sort();
            files
        } else {
            vec![path.to_path_buf()]
        };
        for file in files {
            let text = std::fs::read_to_string(&file).map_err(|source| LoadError::Io {
                path: file.clone(),
                source,
            })?;
            tracing::debug!(path = %file.display(), "loading schema file");
            self.parse_str(&text, &file.to_string_lossy());
        }
        Ok(())
    }

    /// Parse a Schema Markdown string. Does not finalize.
    pub fn parse_str(&mut self, text: &str, filename: &str) {
        self.parse_lines(text.lines(), filename);
    }

    /// Parse Schema Markdown lines. Does not finalize.
    pub fn parse_lines<I, S>(&mut self, lines: I, filename: &str)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = LineState::default();
        let mut continuation: Vec<String> = Vec::new();
        let lines = lines
            .into_iter()
            .map(|line| line.as_ref().to_string())
            .chain(std::iter::once(String::new()));
        for line_part in lines {
            state.linenum += 1;
            if let Some(part) = strip_continuation(&line_part) {
                continuation.push(part.to_string());
                continue;
            }
            let line = if continuation.is_empty() {
                line_part
            } else {
                continuation.push(line_part);
                let joined = continuation.concat();
                continuation.clear();
                joined
            };
            self.parse_line(&line, filename, &mut state);
        }
        tracing::debug!(
            filename,
            lines = state.linenum - 1,
            errors = self.errors.len(),
            "parsed schema markdown"
        );
    }

    fn error(&mut self, message: impl Into<String>, filename: &str, line: usize) {
        self.errors.insert(Diagnostic {
            filename: filename.to_string(),
            line,
            message: message.into(),
        });
    }

    /// Member-qualified position, else the type's position, else `("", 1)`.
    fn filepos_for(&self, type_name: &str, member: Option<&str>) -> (String, usize) {
        member
            .and_then(|member| self.filepos.get(&format!("{type_name}.{member}")))
            .or_else(|| self.filepos.get(type_name))
            .cloned()
            .unwrap_or_else(|| (String::new(), 1))
    }

    fn record_position(&mut self, key: String, filename: &str, line: usize) {
        self.filepos.insert(key, (filename.to_string(), line));
    }

    fn parse_line(&mut self, line: &str, filename: &str, state: &mut LineState) {
        match self.match_line(line, state) {
            Ok(Some(line_match)) => self.apply(line_match, filename, state),
            Ok(None) => self.error("Syntax error", filename, state.linenum),
            Err(message) => self.error(message, filename, state.linenum),
        }
    }

    /// Try each line rule in priority order; context-dependent rules only apply
    /// inside an action, enum, struct, or `urls` block.
    fn match_line<'a>(
        &self,
        line: &'a str,
        state: &LineState,
    ) -> Result<Option<LineMatch<'a>>, String> {
        if let Some(pair) = match_rule(Rule::comment_line, line) {
            let doc = pair
                .into_inner()
                .find(|p| p.as_rule() == Rule::doc_text)
                .map(|p| p.as_str());
            return Ok(Some(LineMatch::Comment(doc)));
        }
        if let Some(pair) = match_rule(Rule::group_line, line) {
            let group = pair
                .into_inner()
                .find(|p| p.as_rule() == Rule::group_name)
                .map(|p| p.as_str());
            return Ok(Some(LineMatch::Group(group)));
        }
        if let Some(pair) = match_rule(Rule::action_line, line) {
            let name = first_identifier(pair).ok_or("action: missing name")?;
            return Ok(Some(LineMatch::Action(name)));
        }
        if let Some(pair) = match_rule(Rule::definition_line, line) {
            return build_definition(pair).map(Some);
        }
        if state.action.is_some() {
            if let Some(pair) = match_rule(Rule::section_line, line) {
                return build_section(pair).map(Some);
            }
            if match_rule(Rule::urls_line, line).is_some() {
                return Ok(Some(LineMatch::Urls));
            }
        }
        let current = state.user_type.as_deref().and_then(|name| self.types.get(name));
        if let Some(UserType::Enum(_)) = current {
            if let Some(pair) = match_rule(Rule::value_line, line) {
                let value = pair
                    .into_inner()
                    .find(|p| matches!(p.as_rule(), Rule::identifier | Rule::quoted_value))
                    .map(|p| p.as_str())
                    .ok_or("enum value: missing name")?;
                return Ok(Some(LineMatch::Value(value)));
            }
        }
        if let Some(UserType::Struct(_)) = current {
            if let Some(pair) = match_rule(Rule::member_line, line) {
                return build_member(pair).map(Some);
            }
        }
        if state.urls.is_some() {
            if let Some(pair) = match_rule(Rule::url_line, line) {
                return build_url(pair).map(Some);
            }
        }
        if let Some(pair) = match_rule(Rule::typedef_line, line) {
            return build_typedef(pair).map(Some);
        }
        Ok(None)
    }

    fn apply(&mut self, line_match: LineMatch<'_>, filename: &str, state: &mut LineState) {
        let linenum = state.linenum;
        match line_match {
            LineMatch::Comment(Some(doc)) => {
                state.doc.push(doc.strip_prefix(' ').unwrap_or(doc).to_string());
            }
            LineMatch::Comment(None) => {}
            LineMatch::Group(group) => {
                state.doc_group = group.map(|g| g.trim().to_string());
            }
            LineMatch::Action(name) => {
                if self.types.contains_key(name) {
                    self.error(format!("Redefinition of action '{name}'"), filename, linenum);
                }
                state.urls = None;
                state.user_type = None;
                let action = Action {
                    name: name.to_string(),
                    doc: state.take_doc(),
                    doc_group: state.doc_group.clone(),
                    ..Action::default()
                };
                self.types.insert(name.to_string(), UserType::Action(action));
                state.action = Some(name.to_string());
                self.record_position(name.to_string(), filename, linenum);
            }
            LineMatch::Definition { kind, name, bases } => {
                if BuiltinType::from_name(name).is_some() || self.types.contains_key(name) {
                    self.error(format!("Redefinition of type '{name}'"), filename, linenum);
                }
                state.action = None;
                state.urls = None;
                let doc = state.take_doc();
                let doc_group = state.doc_group.clone();
                let user_type = match kind {
                    DefinitionKind::Struct | DefinitionKind::Union => UserType::Struct(Struct {
                        name: name.to_string(),
                        doc,
                        doc_group,
                        union: kind == DefinitionKind::Union,
                        bases,
                        members: None,
                    }),
                    DefinitionKind::Enum => UserType::Enum(Enum {
                        name: name.to_string(),
                        doc,
                        doc_group,
                        bases,
                        values: None,
                    }),
                };
                self.types.insert(name.to_string(), user_type);
                state.user_type = Some(name.to_string());
                self.record_position(name.to_string(), filename, linenum);
            }
            LineMatch::Section { section, bases } => {
                let Some(action_name) = state.action.clone() else {
                    return;
                };
                let Some(UserType::Action(action)) = self.types.get_mut(&action_name) else {
                    return;
                };
                let redefined = action.section(section).is_some();
                let type_name = format!("{}_{}", action.name, section.as_str());
                action.set_section(section, type_name.clone());
                if redefined {
                    self.error(
                        format!("Redefinition of action {}", section.as_str()),
                        filename,
                        linenum,
                    );
                }
                state.urls = None;
                let user_type = if section == ActionSection::Errors {
                    UserType::Enum(Enum {
                        name: type_name.clone(),
                        bases,
                        ..Enum::default()
                    })
                } else {
                    UserType::Struct(Struct {
                        name: type_name.clone(),
                        bases,
                        ..Struct::default()
                    })
                };
                self.types.insert(type_name.clone(), user_type);
                state.user_type = Some(type_name.clone());
                self.record_position(type_name, filename, linenum);
            }
            LineMatch::Urls => {
                let has_urls = state
                    .action
                    .as_deref()
                    .and_then(|name| self.types.get(name))
                    .is_some_and(|t| matches!(t, UserType::Action(a) if a.urls.is_some()));
                if has_urls {
                    self.error("Redefinition of action urls", filename, linenum);
                }
                state.user_type = None;
                state.urls = Some(Vec::new());
            }
            LineMatch::Value(value) => {
                let doc = state.take_doc();
                let Some(enum_name) = state.user_type.clone() else {
                    return;
                };
                if let Some(UserType::Enum(e)) = self.types.get_mut(&enum_name) {
                    e.values.get_or_insert_with(Vec::new).push(EnumValue {
                        name: value.to_string(),
                        doc,
                    });
                    let key = format!("{}.{}", e.name, value);
                    self.record_position(key, filename, linenum);
                }
            }
            LineMatch::Member {
                optional,
                name,
                ty,
                attr,
            } => {
                let doc = state.take_doc();
                let Some(struct_name) = state.user_type.clone() else {
                    return;
                };
                if let Some(UserType::Struct(s)) = self.types.get_mut(&struct_name) {
                    s.members.get_or_insert_with(Vec::new).push(Member {
                        name: name.to_string(),
                        doc,
                        ty,
                        attr,
                        optional,
                    });
                    let key = format!("{}.{}", s.name, name);
                    self.record_position(key, filename, linenum);
                }
            }
            LineMatch::Url { method, path } => {
                let url = ActionUrl {
                    method: (method != "*").then(|| method.to_string()),
                    path: path.map(str::to_string),
                };
                let Some(urls) = state.urls.as_mut() else {
                    return;
                };
                let duplicate = urls.contains(&url);
                urls.push(url.clone());
                if duplicate {
                    let url_text = format!("{} {}", method, path.unwrap_or(""));
                    self.error(
                        format!("Duplicate URL: {}", url_text.trim_end()),
                        filename,
                        linenum,
                    );
                }
                let action = state.action.as_deref().and_then(|name| self.types.get_mut(name));
                if let Some(UserType::Action(action)) = action {
                    action.urls.get_or_insert_with(Vec::new).push(url);
                }
            }
            LineMatch::Typedef { name, ty, attr } => {
                if BuiltinType::from_name(name).is_some() || self.types.contains_key(name) {
                    self.error(format!("Redefinition of type '{name}'"), filename, linenum);
                }
                state.action = None;
                state.urls = None;
                state.user_type = None;
                let typedef = Typedef {
                    name: name.to_string(),
                    doc: state.take_doc(),
                    doc_group: state.doc_group.clone(),
                    ty,
                    attr,
                };
                self.types.insert(name.to_string(), UserType::Typedef(typedef));
                self.record_position(name.to_string(), filename, linenum);
            }
        }
    }
}

/// Text before a trailing backslash (optionally followed by whitespace), if any.
fn strip_continuation(line: &str) -> Option<&str> {
    line.trim_end().strip_suffix('\\')
}

fn match_rule(rule: Rule, line: &str) -> Option<Pair<'_, Rule>> {
    SchemaMarkdownGrammar::parse(rule, line)
        .ok()
        .and_then(|mut pairs| pairs.next())
}

fn first_identifier(pair: Pair<'_, Rule>) -> Option<&str> {
    pair.into_inner()
        .find(|p| p.as_rule() == Rule::identifier)
        .map(|p| p.as_str())
}

fn build_base_ids(pair: Pair<'_, Rule>) -> Vec<String> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::identifier)
        .map(|p| p.as_str().to_string())
        .collect()
}

fn build_definition(pair: Pair<'_, Rule>) -> Result<LineMatch<'_>, String> {
    let mut kind = None;
    let mut name = None;
    let mut bases = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::definition_kind => {
                kind = Some(match inner.as_str() {
                    "struct" => DefinitionKind::Struct,
                    "union" => DefinitionKind::Union,
                    _ => DefinitionKind::Enum,
                })
            }
            Rule::identifier => name = Some(inner.as_str()),
            Rule::base_ids => bases = Some(build_base_ids(inner)),
            _ => {}
        }
    }
    Ok(LineMatch::Definition {
        kind: kind.ok_or("definition: missing kind")?,
        name: name.ok_or("definition: missing name")?,
        bases,
    })
}

fn build_section(pair: Pair<'_, Rule>) -> Result<LineMatch<'_>, String> {
    let mut section = None;
    let mut bases = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::section_kind => section = ActionSection::from_name(inner.as_str()),
            Rule::base_ids => bases = Some(build_base_ids(inner)),
            _ => {}
        }
    }
    Ok(LineMatch::Section {
        section: section.ok_or("section: unknown section")?,
        bases,
    })
}

fn build_member(pair: Pair<'_, Rule>) -> Result<LineMatch<'_>, String> {
    let mut optional = false;
    let mut type_expr = None;
    let mut name = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::optional_kw => optional = true,
            Rule::type_expr => type_expr = Some(build_type_expr(inner)?),
            Rule::identifier => name = Some(inner.as_str()),
            _ => {}
        }
    }
    let (ty, attr) = type_expr.ok_or("member: missing type")?;
    Ok(LineMatch::Member {
        optional,
        name: name.ok_or("member: missing name")?,
        ty,
        attr,
    })
}

fn build_url(pair: Pair<'_, Rule>) -> Result<LineMatch<'_>, String> {
    let mut method = None;
    let mut path = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::url_method => method = Some(inner.as_str()),
            Rule::url_path => path = Some(inner.as_str()),
            _ => {}
        }
    }
    Ok(LineMatch::Url {
        method: method.ok_or("url: missing method")?,
        path,
    })
}

fn build_typedef(pair: Pair<'_, Rule>) -> Result<LineMatch<'_>, String> {
    let mut type_expr = None;
    let mut name = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::type_expr => type_expr = Some(build_type_expr(inner)?),
            Rule::identifier => name = Some(inner.as_str()),
            _ => {}
        }
    }
    let (ty, attr) = type_expr.ok_or("typedef: missing type")?;
    Ok(LineMatch::Typedef {
        name: name.ok_or("typedef: missing name")?,
        ty,
        attr,
    })
}

/// Build a type and the attributes of the outermost type (the array or dict
/// attributes for containers).
fn build_type_expr(pair: Pair<'_, Rule>) -> Result<(TypeRef, Option<Attributes>), String> {
    let mut name = None;
    let mut attrs = None;
    let mut array = None;
    let mut dict_value = None;
    let mut dict = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::identifier => name = Some(inner.as_str()),
            Rule::scalar_attrs => attrs = build_attr_group(inner)?,
            Rule::array_attrs => array = Some(build_attr_group(inner)?),
            Rule::dict_value => dict_value = Some(build_dict_value(inner)?),
            Rule::dict_attrs => dict = Some(build_attr_group(inner)?),
            _ => {}
        }
    }
    let name = name.ok_or("type expression: missing type name")?;

    if let Some(array_attr) = array {
        let array = ArrayType {
            ty: TypeRef::from_name(name),
            attr: attrs,
        };
        return Ok((TypeRef::Array(Box::new(array)), array_attr));
    }

    if let Some(dict_attr) = dict {
        let dict = match dict_value {
            Some((value_name, value_attr)) => DictType {
                ty: TypeRef::from_name(value_name),
                attr: value_attr,
                key_type: Some(TypeRef::from_name(name)),
                key_attr: attrs,
            },
            None => DictType {
                ty: TypeRef::from_name(name),
                attr: attrs,
                key_type: None,
                key_attr: None,
            },
        };
        return Ok((TypeRef::Dict(Box::new(dict)), dict_attr));
    }

    Ok((TypeRef::from_name(name), attrs))
}

fn build_dict_value(pair: Pair<'_, Rule>) -> Result<(&str, Option<Attributes>), String> {
    let mut name = None;
    let mut attrs = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::identifier => name = Some(inner.as_str()),
            Rule::scalar_attrs => attrs = build_attr_group(inner)?,
            _ => {}
        }
    }
    Ok((name.ok_or("dict value: missing type name")?, attrs))
}

/// Attributes inside `( )`, `[ ]` or `{ }`; `None` when the delimiters are empty.
fn build_attr_group(pair: Pair<'_, Rule>) -> Result<Option<Attributes>, String> {
    pair.into_inner()
        .find(|p| p.as_rule() == Rule::attrs)
        .map(build_attributes)
        .transpose()
}

fn build_attributes(pair: Pair<'_, Rule>) -> Result<Attributes, String> {
    let mut attributes = Attributes::default();
    for attr in pair.into_inner() {
        match attr.as_rule() {
            Rule::nullable => attributes.nullable = true,
            Rule::compare => {
                let (key, text) = build_comparison(attr, false)?;
                let value: f64 = text
                    .parse()
                    .map_err(|_| format!("Invalid attribute value '{text}'"))?;
                attributes.set_compare(key, value);
            }
            Rule::length => {
                let (key, text) = build_comparison(attr, true)?;
                let value: u64 = text
                    .parse()
                    .map_err(|_| format!("Invalid attribute value '{text}'"))?;
                attributes.set_length(key, value);
            }
            _ => {}
        }
    }
    Ok(attributes)
}

fn build_comparison(pair: Pair<'_, Rule>, length: bool) -> Result<(AttrKey, &str), String> {
    let mut op = None;
    let mut operand = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::compare_op => op = Some(inner.as_str()),
            Rule::number | Rule::count => operand = Some(inner.as_str()),
            _ => {}
        }
    }
    let op = op.ok_or("attribute: missing operator")?;
    let key = AttrKey::from_op(op, length).ok_or_else(|| format!("Unknown operator '{op}'"))?;
    Ok((key, operand.ok_or("attribute: missing value")?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_type(expr: &str) -> (TypeRef, Option<Attributes>) {
        let line = format!("typedef {expr} T");
        let pair = match_rule(Rule::typedef_line, &line).expect("typedef line");
        match build_typedef(pair).expect("typedef") {
            LineMatch::Typedef { ty, attr, .. } => (ty, attr),
            other => panic!("unexpected match {other:?}"),
        }
    }

    #[test]
    fn attributes_grammar() {
        let (_, attr) = parse_type("int(> 0, <= 100, nullable)");
        let attr = attr.expect("attrs");
        assert!(attr.nullable);
        assert_eq!(attr.gt, Some(0.0));
        assert_eq!(attr.lte, Some(100.0));
        assert_eq!(attr.lt, None);

        let (_, attr) = parse_type("string(len >= 2,len<5)");
        let attr = attr.expect("attrs");
        assert_eq!(attr.len_gte, Some(2));
        assert_eq!(attr.len_lt, Some(5));

        let (_, attr) = parse_type("float(== -1.5)");
        assert_eq!(attr.expect("attrs").eq, Some(-1.5));

        let (_, attr) = parse_type("string(len == 9007199254740993)");
        assert_eq!(attr.expect("attrs").len_eq, Some(9_007_199_254_740_993));
    }

    #[test]
    fn array_and_dict_expressions() {
        let (ty, attr) = parse_type("int(> 0)[len > 0]");
        assert_eq!(attr.and_then(|a| a.len_gt), Some(0));
        match ty {
            TypeRef::Array(array) => {
                assert_eq!(array.ty, TypeRef::Builtin(BuiltinType::Int));
                assert_eq!(array.attr.and_then(|a| a.gt), Some(0.0));
            }
            other => panic!("expected array, got {other:?}"),
        }

        let (ty, attr) = parse_type("MyEnum(len > 0) : MyStruct(nullable) {}");
        assert!(attr.is_none());
        match ty {
            TypeRef::Dict(dict) => {
                assert_eq!(dict.ty, TypeRef::User("MyStruct".into()));
                assert_eq!(dict.key_type, Some(TypeRef::User("MyEnum".into())));
                assert!(dict.attr.is_some_and(|a| a.nullable));
                assert_eq!(dict.key_attr.and_then(|a| a.len_gt), Some(0));
            }
            other => panic!("expected dict, got {other:?}"),
        }

        let (ty, _) = parse_type("string { }");
        assert!(matches!(ty, TypeRef::Dict(dict) if dict.key_type.is_none()));
    }

    #[test]
    fn continuation_marker() {
        assert_eq!(strip_continuation("struct \\"), Some("struct "));
        assert_eq!(strip_continuation("struct \\  "), Some("struct "));
        assert_eq!(strip_continuation("struct"), None);
    }

    #[test]
    fn comment_rules() {
        assert!(match_rule(Rule::comment_line, "").is_some());
        assert!(match_rule(Rule::comment_line, "   ").is_some());
        assert!(match_rule(Rule::comment_line, "#- hidden").is_some());
        assert!(match_rule(Rule::comment_line, "struct Foo").is_none());
    }
}
