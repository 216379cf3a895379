//! WebIDL subset parser producing [`InterfaceDeclaration`]s.
//!
//! Only the parts of the grammar that define an interface surface are
//! interpreted: interfaces (including partial ones), their members and
//! `A implements B;` statements. Dictionaries, enums, typedefs and callbacks
//! are skipped as whole definitions.
//!
//! Privilege context comes from extended attributes:
//!
//! | attribute                               | context      |
//! |-----------------------------------------|--------------|
//! | `AvailableIn=CertifiedApps`             | certified    |
//! | `AvailableIn=PrivilegedApps`            | privileged   |
//! | `CheckPermissions`, `CheckAnyPermissions` | privileged |
//! | (none)                                  | web          |
//!
//! `ChromeOnly` and `NoInterfaceObject` interfaces are never exposed to
//! content, though a `NoInterfaceObject` interface still lends its members
//! to every interface that implements it.

use crate::errors::{io_error, CertError, Result};
use crate::model::{Context, DeclaredMember, InterfaceDeclaration, MemberKind};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

type ParseResult<T> = std::result::Result<T, CertError>;

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Ident(String),
    Str(String),
    Lit(String),
    Punct(char),
    Ellipsis,
}

impl Tok {
    fn text(&self) -> String {
        match self {
            Tok::Ident(s) | Tok::Lit(s) => s.clone(),
            Tok::Str(s) => format!("\"{}\"", s),
            Tok::Punct(c) => c.to_string(),
            Tok::Ellipsis => "...".to_string(),
        }
    }

    fn is_word(&self) -> bool {
        matches!(self, Tok::Ident(_) | Tok::Lit(_))
    }
}

#[derive(Debug, Clone)]
struct Token {
    tok: Tok,
    line: usize,
}

fn syntax_error(source_name: &str, line: usize, message: impl Into<String>) -> CertError {
    CertError::WebIdlSyntax {
        source_name: source_name.to_string(),
        line,
        message: message.into(),
    }
}

fn tokenize(source_name: &str, text: &str) -> ParseResult<Vec<Token>> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut line = 1;

    while i < len {
        let c = chars[i];
        if c == '\n' {
            line += 1;
            i += 1;
            continue;
        }
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < len && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }
        if c == '/' && chars.get(i + 1) == Some(&'*') {
            let start_line = line;
            i += 2;
            loop {
                if i + 1 >= len {
                    return Err(syntax_error(source_name, start_line, "unterminated comment"));
                }
                if chars[i] == '*' && chars[i + 1] == '/' {
                    i += 2;
                    break;
                }
                if chars[i] == '\n' {
                    line += 1;
                }
                i += 1;
            }
            continue;
        }
        if c == '"' {
            let start_line = line;
            let mut value = String::new();
            i += 1;
            loop {
                match chars.get(i) {
                    None => {
                        return Err(syntax_error(source_name, start_line, "unterminated string"))
                    }
                    Some('"') => {
                        i += 1;
                        break;
                    }
                    Some(&ch) => {
                        if ch == '\n' {
                            line += 1;
                        }
                        value.push(ch);
                        i += 1;
                    }
                }
            }
            tokens.push(Token {
                tok: Tok::Str(value),
                line: start_line,
            });
            continue;
        }
        if c == '.' && chars.get(i + 1) == Some(&'.') && chars.get(i + 2) == Some(&'.') {
            tokens.push(Token {
                tok: Tok::Ellipsis,
                line,
            });
            i += 3;
            continue;
        }
        if c.is_ascii_digit() || (c == '-' && chars.get(i + 1).is_some_and(char::is_ascii_digit))
        {
            let start = i;
            i += 1;
            while i < len && (chars[i].is_ascii_alphanumeric() || chars[i] == '.') {
                i += 1;
            }
            tokens.push(Token {
                tok: Tok::Lit(chars[start..i].iter().collect()),
                line,
            });
            continue;
        }
        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < len && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            // A leading underscore escapes identifiers that clash with keywords
            let word = match word.strip_prefix('_') {
                Some(rest) if !rest.is_empty() => rest.to_string(),
                _ => word,
            };
            tokens.push(Token {
                tok: Tok::Ident(word),
                line,
            });
            continue;
        }
        tokens.push(Token {
            tok: Tok::Punct(c),
            line,
        });
        i += 1;
    }
    Ok(tokens)
}

#[derive(Debug, Clone, PartialEq)]
struct ExtAttr {
    name: String,
    value: Option<String>,
}

fn has_attr(attrs: &[ExtAttr], name: &str) -> bool {
    attrs.iter().any(|a| a.name == name)
}

/// Least-privileged context an extended attribute list allows.
fn attr_context(attrs: &[ExtAttr]) -> Context {
    attrs
        .iter()
        .map(|attr| match (attr.name.as_str(), attr.value.as_deref()) {
            ("AvailableIn", Some(v)) if v.contains("CertifiedApps") => Context::Certified,
            ("AvailableIn", Some(v)) if v.contains("PrivilegedApps") => Context::Privileged,
            ("CheckPermissions" | "CheckAnyPermissions" | "CheckAllPermissions", _) => {
                Context::Privileged
            }
            _ => Context::Web,
        })
        .max()
        .unwrap_or(Context::Web)
}

fn is_exposed_to_window(attrs: &[ExtAttr]) -> bool {
    attrs
        .iter()
        .find(|a| a.name == "Exposed")
        .and_then(|a| a.value.as_deref())
        .map_or(true, |v| v.contains("Window"))
}

#[derive(Debug, Clone)]
struct RawMember {
    name: String,
    kind: MemberKind,
    arguments: Vec<String>,
    attrs: Vec<ExtAttr>,
}

#[derive(Debug, Clone)]
struct RawInterface {
    name: String,
    parent: Option<String>,
    partial: bool,
    mixin: bool,
    attrs: Vec<ExtAttr>,
    members: Vec<RawMember>,
}

#[derive(Debug, Default)]
struct ParsedSource {
    interfaces: Vec<RawInterface>,
    implements: Vec<(String, String)>,
}

struct Parser<'a> {
    source_name: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|t| &t.tok)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or(self.tokens.last())
            .map_or(1, |t| t.line)
    }

    fn error(&self, message: impl Into<String>) -> CertError {
        syntax_error(self.source_name, self.line(), message)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn at_punct(&self, c: char) -> bool {
        self.peek() == Some(&Tok::Punct(c))
    }

    fn at_ident(&self, word: &str) -> bool {
        matches!(self.peek(), Some(Tok::Ident(w)) if w == word)
    }

    fn expect_punct(&mut self, c: char) -> ParseResult<()> {
        if self.at_punct(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", c)))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some(Tok::Ident(word)) => {
                let word = word.clone();
                self.pos += 1;
                Ok(word)
            }
            _ => Err(self.error("expected an identifier")),
        }
    }

    fn parse(mut self) -> ParseResult<ParsedSource> {
        let mut parsed = ParsedSource::default();
        while !self.at_eof() {
            let attrs = self.parse_ext_attrs()?;
            let word = match self.peek() {
                Some(Tok::Ident(word)) => word.clone(),
                _ => return Err(self.error("expected a definition")),
            };
            match word.as_str() {
                "partial" => {
                    self.pos += 1;
                    if self.at_ident("interface") {
                        parsed.interfaces.push(self.parse_interface(attrs, true)?);
                    } else {
                        self.skip_definition()?;
                    }
                }
                "interface" => parsed.interfaces.push(self.parse_interface(attrs, false)?),
                "callback" | "dictionary" | "enum" | "typedef" | "exception" | "namespace" => {
                    self.skip_definition()?
                }
                _ => {
                    self.pos += 1;
                    if self.at_ident("implements") || self.at_ident("includes") {
                        self.pos += 1;
                        let mixin = self.expect_ident()?;
                        self.expect_punct(';')?;
                        parsed.implements.push((word, mixin));
                    } else {
                        return Err(self.error(format!("unexpected '{}'", word)));
                    }
                }
            }
        }
        Ok(parsed)
    }

    fn parse_ext_attrs(&mut self) -> ParseResult<Vec<ExtAttr>> {
        if !self.at_punct('[') {
            return Ok(Vec::new());
        }
        let open_line = self.line();
        self.pos += 1;

        let mut attrs = Vec::new();
        let mut current: Vec<Tok> = Vec::new();
        let mut depth = 0usize;
        loop {
            let Some(token) = self.tokens.get(self.pos).cloned() else {
                return Err(syntax_error(
                    self.source_name,
                    open_line,
                    "unterminated extended attribute list",
                ));
            };
            self.pos += 1;
            match token.tok {
                Tok::Punct(']') if depth == 0 => {
                    push_attr(&mut attrs, &current);
                    break;
                }
                Tok::Punct(',') if depth == 0 => {
                    push_attr(&mut attrs, &current);
                    current.clear();
                }
                Tok::Punct('(') | Tok::Punct('[') => {
                    depth += 1;
                    current.push(token.tok);
                }
                Tok::Punct(')') | Tok::Punct(']') => {
                    depth = depth.saturating_sub(1);
                    current.push(token.tok);
                }
                other => current.push(other),
            }
        }
        Ok(attrs)
    }

    fn parse_interface(&mut self, attrs: Vec<ExtAttr>, partial: bool) -> ParseResult<RawInterface> {
        self.pos += 1;
        let mixin = if self.at_ident("mixin") {
            self.pos += 1;
            true
        } else {
            false
        };
        let name = self.expect_ident()?;
        let parent = if self.at_punct(':') {
            self.pos += 1;
            Some(self.expect_ident()?)
        } else {
            None
        };
        self.expect_punct('{')?;

        let mut members = Vec::new();
        loop {
            if self.at_punct('}') {
                break;
            }
            if self.at_eof() {
                return Err(self.error(format!("unterminated interface {}", name)));
            }
            if let Some(member) = self.parse_member()? {
                members.push(member);
            }
        }
        self.expect_punct('}')?;
        self.expect_punct(';')?;

        Ok(RawInterface {
            name,
            parent,
            partial,
            mixin,
            attrs,
            members,
        })
    }

    fn parse_member(&mut self) -> ParseResult<Option<RawMember>> {
        let attrs = self.parse_ext_attrs()?;
        let start = self.pos;
        let line = self.line();
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None => return Err(syntax_error(self.source_name, line, "unterminated member")),
                Some(Tok::Punct(c)) if matches!(*c, '(' | '[' | '{') => depth += 1,
                Some(Tok::Punct(c)) if matches!(*c, ')' | ']' | '}') => {
                    if depth == 0 {
                        return Err(self.error(format!("unexpected '{}' in member", c)));
                    }
                    depth -= 1;
                }
                Some(Tok::Punct(';')) if depth == 0 => break,
                _ => {}
            }
            self.pos += 1;
        }
        let body: Vec<Tok> = self.tokens[start..self.pos]
            .iter()
            .map(|t| t.tok.clone())
            .collect();
        self.pos += 1;

        let member = interpret_member(&body).map_err(|msg| syntax_error(self.source_name, line, msg))?;
        Ok(member.map(|(name, kind, arguments)| RawMember {
            name,
            kind,
            arguments,
            attrs,
        }))
    }

    /// Skip one definition up to its terminating `;` at nesting depth zero.
    fn skip_definition(&mut self) -> ParseResult<()> {
        let line = self.line();
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            match tok {
                Tok::Punct('{') | Tok::Punct('(') => depth += 1,
                Tok::Punct('}') | Tok::Punct(')') => depth = depth.saturating_sub(1),
                Tok::Punct(';') if depth == 0 => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(syntax_error(self.source_name, line, "unterminated definition"))
    }
}

fn push_attr(attrs: &mut Vec<ExtAttr>, tokens: &[Tok]) {
    let Some(Tok::Ident(name)) = tokens.first() else {
        return;
    };
    let value = match tokens.get(1) {
        Some(Tok::Punct('=')) => Some(render(&tokens[2..])),
        _ => None,
    };
    attrs.push(ExtAttr {
        name: name.clone(),
        value,
    });
}

/// Join tokens back into source-like text (`unsigned long`, `sequence<DOMString>?`).
fn render(tokens: &[Tok]) -> String {
    let mut out = String::new();
    let mut previous_word = false;
    for tok in tokens {
        if previous_word && tok.is_word() {
            out.push(' ');
        }
        out.push_str(&tok.text());
        previous_word = tok.is_word();
    }
    out
}

fn matching(tokens: &[Tok], open_at: usize, open: char, close: char) -> std::result::Result<usize, String> {
    let mut depth = 0usize;
    for (offset, tok) in tokens[open_at..].iter().enumerate() {
        match tok {
            Tok::Punct(c) if *c == open => depth += 1,
            Tok::Punct(c) if *c == close => {
                depth -= 1;
                if depth == 0 {
                    return Ok(open_at + offset);
                }
            }
            _ => {}
        }
    }
    Err(format!("unbalanced '{}'", open))
}

/// Index just past the type starting at `i`.
fn skip_type(tokens: &[Tok], mut i: usize) -> std::result::Result<usize, String> {
    match tokens.get(i) {
        Some(Tok::Punct('(')) => i = matching(tokens, i, '(', ')')? + 1,
        Some(Tok::Ident(first)) => {
            let mut word = first.as_str();
            i += 1;
            if word == "unsigned" || word == "unrestricted" {
                match tokens.get(i) {
                    Some(Tok::Ident(next)) => {
                        word = next.as_str();
                        i += 1;
                    }
                    _ => return Err(format!("incomplete type after '{}'", first)),
                }
            }
            if word == "long" && matches!(tokens.get(i), Some(Tok::Ident(n)) if n == "long") {
                i += 1;
            }
            if tokens.get(i) == Some(&Tok::Punct('<')) {
                i = matching(tokens, i, '<', '>')? + 1;
            }
        }
        _ => return Err("expected a type".to_string()),
    }
    loop {
        match tokens.get(i) {
            Some(Tok::Punct('?')) => i += 1,
            Some(Tok::Punct('[')) if tokens.get(i + 1) == Some(&Tok::Punct(']')) => i += 2,
            _ => break,
        }
    }
    Ok(i)
}

fn ident_at(tokens: &[Tok], i: usize) -> std::result::Result<String, String> {
    match tokens.get(i) {
        Some(Tok::Ident(name)) => Ok(name.clone()),
        _ => Err("expected a member name".to_string()),
    }
}

fn parse_arguments(tokens: &[Tok]) -> std::result::Result<Vec<String>, String> {
    let mut pieces: Vec<&[Tok]> = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, tok) in tokens.iter().enumerate() {
        match tok {
            Tok::Punct('(' | '<' | '[') => depth += 1,
            Tok::Punct(')' | '>' | ']') => depth = depth.saturating_sub(1),
            Tok::Punct(',') if depth == 0 => {
                pieces.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&tokens[start..]);

    let mut arguments = Vec::new();
    for piece in pieces.into_iter().filter(|p| !p.is_empty()) {
        let mut j = 0;
        if piece.first() == Some(&Tok::Punct('[')) {
            j = matching(piece, 0, '[', ']')? + 1;
        }
        if matches!(piece.get(j), Some(Tok::Ident(w)) if w == "optional") {
            j += 1;
        }
        let end = skip_type(piece, j)?;
        let mut ty = render(&piece[j..end]);
        if piece.get(end) == Some(&Tok::Ellipsis) {
            ty.push_str("...");
        }
        arguments.push(ty);
    }
    Ok(arguments)
}

const SKIPPED_MEMBERS: [&str; 6] = [
    "iterable",
    "legacyiterable",
    "maplike",
    "setlike",
    "serializer",
    "jsonifier",
];

const QUALIFIERS: [&str; 9] = [
    "static",
    "stringifier",
    "readonly",
    "inherit",
    "getter",
    "setter",
    "deleter",
    "legacycaller",
    "creator",
];

type MemberShape = (String, MemberKind, Vec<String>);

fn interpret_member(body: &[Tok]) -> std::result::Result<Option<MemberShape>, String> {
    let mut i = 0;
    while let Some(Tok::Ident(word)) = body.get(i) {
        if SKIPPED_MEMBERS.contains(&word.as_str()) {
            return Ok(None);
        }
        if !QUALIFIERS.contains(&word.as_str()) {
            break;
        }
        i += 1;
    }
    if i == body.len() {
        // bare `stringifier;`
        return Ok(None);
    }

    match body.get(i) {
        Some(Tok::Ident(word)) if word == "const" => {
            let after = skip_type(body, i + 1)?;
            Ok(Some((ident_at(body, after)?, MemberKind::Constant, Vec::new())))
        }
        Some(Tok::Ident(word)) if word == "attribute" => {
            let after = skip_type(body, i + 1)?;
            Ok(Some((ident_at(body, after)?, MemberKind::Attribute, Vec::new())))
        }
        _ => {
            let after = skip_type(body, i)?;
            match body.get(after) {
                // anonymous special operation
                Some(Tok::Punct('(')) => Ok(None),
                Some(Tok::Ident(name)) => {
                    if body.get(after + 1) != Some(&Tok::Punct('(')) {
                        return Err(format!("expected '(' after operation {}", name));
                    }
                    let close = matching(body, after + 1, '(', ')')?;
                    let arguments = parse_arguments(&body[after + 2..close])?;
                    Ok(Some((name.clone(), MemberKind::Operation, arguments)))
                }
                _ => Err("unrecognised member".to_string()),
            }
        }
    }
}

#[derive(Debug)]
struct MergedInterface {
    parent: Option<String>,
    context: Context,
    exposed: bool,
    members: Vec<DeclaredMember>,
}

fn lift_members(
    members: &[RawMember],
    floor: Context,
    out: &mut Vec<DeclaredMember>,
) {
    for member in members {
        if has_attr(&member.attrs, "ChromeOnly") {
            continue;
        }
        out.push(DeclaredMember {
            name: member.name.clone(),
            kind: member.kind,
            arguments: member.arguments.clone(),
            context: floor.max(attr_context(&member.attrs)),
        });
    }
}

/// Accumulates WebIDL sources and resolves them into declarations.
///
/// Sources are added one at a time; a source that fails to parse leaves the
/// corpus unchanged.
#[derive(Debug, Default)]
pub struct WebIdlCorpus {
    interfaces: Vec<RawInterface>,
    implements: Vec<(String, String)>,
}

impl WebIdlCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, source_name: &str, text: &str) -> Result<()> {
        let tokens = tokenize(source_name, text)?;
        let parsed = Parser {
            source_name,
            tokens,
            pos: 0,
        }
        .parse()?;
        self.interfaces.extend(parsed.interfaces);
        self.implements.extend(parsed.implements);
        Ok(())
    }

    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        self.add_source(&path.display().to_string(), &text)
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// Resolve partial interfaces and `implements` statements into the
    /// interfaces exposed to content, sorted by name.
    pub fn declarations(&self) -> Vec<InterfaceDeclaration> {
        let mut merged: BTreeMap<String, MergedInterface> = BTreeMap::new();

        let primaries = self.interfaces.iter().filter(|i| !i.partial);
        let partials = self.interfaces.iter().filter(|i| i.partial);
        for raw in primaries.chain(partials) {
            let block_context = attr_context(&raw.attrs);
            let entry = merged
                .entry(raw.name.clone())
                .or_insert_with(|| MergedInterface {
                    parent: raw.parent.clone(),
                    context: block_context,
                    exposed: !raw.mixin
                        && !has_attr(&raw.attrs, "ChromeOnly")
                        && !has_attr(&raw.attrs, "NoInterfaceObject")
                        && is_exposed_to_window(&raw.attrs),
                    members: Vec::new(),
                });
            if entry.parent.is_none() {
                entry.parent = raw.parent.clone();
            }
            if !raw.partial || !has_attr(&raw.attrs, "ChromeOnly") {
                let floor = entry.context.max(block_context);
                lift_members(&raw.members, floor, &mut entry.members);
            }
        }

        let mut declarations = Vec::new();
        for (name, iface) in &merged {
            if !iface.exposed {
                continue;
            }
            let mut visiting = BTreeSet::new();
            let members = self.collect_members(name, &merged, &mut visiting);
            declarations.push(InterfaceDeclaration {
                name: name.clone(),
                parent: iface.parent.clone(),
                context: iface.context,
                members: dedup_members(members),
            });
        }
        declarations
    }

    fn collect_members(
        &self,
        name: &str,
        merged: &BTreeMap<String, MergedInterface>,
        visiting: &mut BTreeSet<String>,
    ) -> Vec<DeclaredMember> {
        let Some(iface) = merged.get(name) else {
            return Vec::new();
        };
        if !visiting.insert(name.to_string()) {
            return Vec::new();
        }
        let mut members = iface.members.clone();
        for (target, mixin) in &self.implements {
            if target != name {
                continue;
            }
            for mut member in self.collect_members(mixin, merged, visiting) {
                member.context = member.context.max(iface.context);
                members.push(member);
            }
        }
        visiting.remove(name);
        members
    }
}

/// Keep one member per name; overloads collapse onto the first declaration
/// at the least-privileged context any of them allows.
fn dedup_members(members: Vec<DeclaredMember>) -> Vec<DeclaredMember> {
    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    let mut out: Vec<DeclaredMember> = Vec::new();
    for member in members {
        match index.get(&member.name) {
            Some(&at) => {
                if member.context < out[at].context {
                    out[at].context = member.context;
                }
            }
            None => {
                index.insert(member.name.clone(), out.len());
                out.push(member);
            }
        }
    }
    out
}

/// Parse a single WebIDL source.
pub fn parse_webidl(source_name: &str, text: &str) -> Result<Vec<InterfaceDeclaration>> {
    let mut corpus = WebIdlCorpus::new();
    corpus.add_source(source_name, text)?;
    Ok(corpus.declarations())
}
