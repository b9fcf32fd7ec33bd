//! Recursive descent over the token stream
//!
//!     The parser only cares about names. It walks declarations, bodies and statements far
//!     enough to know where each type, method and variable starts and ends, and records every
//!     other identifier as a name reference. Expressions are skimmed: the parser tracks
//!     parenthesis depth, follows `new` and nested blocks, and otherwise just consumes tokens.
//!
//!     Local variable declarations and expressions look alike at statement start. The parser
//!     tries the declaration first and rewinds to a checkpoint when the shape does not fit,
//!     dropping any nodes and problems recorded during the attempt.
//!
//!     Every loop consumes at least one token per iteration or exits, so parsing terminates on
//!     any input. Problems are recorded and parsing continues.
//!
//!     Bodies, blocks and expressions count nesting. Past [`MAX_NESTING`] levels the parser stops
//!     descending and skips the bracketed region with a flat scan, so stack use is bounded.

use crate::java::ast::{Declaration, Flavor, Identifier, Problem, Span, SyntaxNode};
use crate::java::lexing::{Keyword, Token, TokenKind};

/// A single-type or on-demand import, static or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportDecl {
    /// Dotted name as written, without `static` or the trailing `.*`
    pub path: String,
    /// Last segment of the path
    pub simple_name: String,
    pub span: Span,
    pub on_demand: bool,
}

/// Everything the parser collected in one pass
#[derive(Debug, Default)]
pub(crate) struct Parsed {
    pub nodes: Vec<SyntaxNode>,
    pub problems: Vec<Problem>,
    pub imports: Vec<ImportDecl>,
}

/// Deepest nesting of bodies, blocks and expressions the parser descends into
pub(crate) const MAX_NESTING: usize = 256;

pub(crate) const NESTING_TOO_DEEP: &str = "Nesting is too deep, contents are not analyzed";

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    pos: usize,
    nodes: usize,
    problems: usize,
}

pub(crate) struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    parsed: Parsed,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            depth: 0,
            parsed: Parsed::default(),
        }
    }

    pub fn parse(mut self) -> Parsed {
        self.compilation_unit();
        self.parsed
    }

    // ----- token cursor -----

    fn peek(&self) -> Option<TokenKind> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|token| token.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == Some(kind)
    }

    fn text_at(&self, n: usize) -> &'src str {
        let source = self.source;
        self.tokens
            .get(self.pos + n)
            .and_then(|token| source.get(token.span.clone()))
            .unwrap_or_default()
    }

    /// Identifier token `n` ahead spelled `word`
    fn contextual_at(&self, n: usize, word: &str) -> bool {
        self.peek_at(n) == Some(TokenKind::Ident) && self.text_at(n) == word
    }

    fn at_contextual(&self, word: &str) -> bool {
        self.contextual_at(0, word)
    }

    fn at_operator(&self, n: usize, op: &str) -> bool {
        self.peek_at(n) == Some(TokenKind::Operator) && self.text_at(n) == op
    }

    fn bump(&mut self) -> Option<Span> {
        let span = self.tokens.get(self.pos)?.span.clone();
        self.pos += 1;
        Some(span)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        self.eat(TokenKind::Keyword(keyword))
    }

    fn current_start(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|token| token.span.start)
            .unwrap_or(self.source.len())
    }

    fn last_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|idx| self.tokens.get(idx))
            .map(|token| token.span.end)
            .unwrap_or(0)
    }

    /// Span of the last consumed token, or an empty span at the cursor
    fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1).and_then(|idx| self.tokens.get(idx)) {
            Some(token) => token.span.clone(),
            None => {
                let start = self.current_start();
                start..start
            }
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            nodes: self.parsed.nodes.len(),
            problems: self.parsed.problems.len(),
        }
    }

    fn rewind(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.parsed.nodes.truncate(checkpoint.nodes);
        self.parsed.problems.truncate(checkpoint.problems);
    }

    // ----- recording -----

    fn error(&mut self, message: impl Into<String>, span: Span) {
        self.parsed.problems.push(Problem::error(message, span));
    }

    fn identifier(&mut self) -> Option<Identifier> {
        if !self.at(TokenKind::Ident) {
            return None;
        }
        let span = self.bump()?;
        let text = self.source.get(span.clone()).unwrap_or_default();
        Some(Identifier::new(text, span))
    }

    fn name_ref(&mut self) {
        if let Some(identifier) = self.identifier() {
            self.parsed.nodes.push(SyntaxNode::NameRef(identifier));
        }
    }

    /// Record a declaration whose end is not known yet
    fn open_declaration(&mut self, flavor: Flavor, name: Identifier, start: usize) -> usize {
        let span = start.min(name.span.start)..name.span.end;
        self.parsed
            .nodes
            .push(SyntaxNode::declaration(Declaration::new(flavor, name, span)));
        self.parsed.nodes.len() - 1
    }

    /// Extend an open declaration to the last consumed token
    fn close_declaration(&mut self, index: usize) {
        let end = self.last_end();
        if let Some(node) = self.parsed.nodes.get_mut(index) {
            node.set_end(end);
        }
    }

    fn expect_semicolon(&mut self, context: &str) {
        if !self.eat(TokenKind::Semi) {
            let span = self.previous_span();
            self.error(
                format!("Syntax error, insert \";\" to complete {context}"),
                span,
            );
        }
    }

    fn expect_close_paren(&mut self, context: &str) {
        if !self.eat(TokenKind::RParen) {
            let span = self.previous_span();
            self.error(
                format!("Syntax error, insert \")\" to complete {context}"),
                span,
            );
        }
    }

    /// Consume at least one token that cannot start anything here, plus any run of similar
    /// tokens right after it, and report them together.
    fn junk(&mut self) {
        let Some(first) = self.bump() else {
            return;
        };
        let mut span = first;
        let mut count = 1;
        while self.peek().is_some_and(is_junk_continuation) {
            if let Some(next) = self.bump() {
                span.end = next.end;
                count += 1;
            }
        }
        let message = if count == 1 {
            format!(
                "Syntax error on token \"{}\", delete this token",
                self.source.get(span.clone()).unwrap_or_default()
            )
        } else {
            "Syntax error on tokens, delete these tokens".to_string()
        };
        self.error(message, span);
    }

    // ----- nesting -----

    /// Go one level deeper unless the limit is reached
    fn enter(&mut self) -> bool {
        if self.depth >= MAX_NESTING {
            return false;
        }
        self.depth += 1;
        true
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Report the region that opens at the cursor and skip it
    fn skip_too_deep(&mut self) {
        let start = self.current_start();
        let span = self
            .tokens
            .get(self.pos)
            .map(|token| token.span.clone())
            .unwrap_or(start..start);
        self.error(NESTING_TOO_DEEP, span);
        self.skip_balanced();
    }

    /// Consume the bracketed region that opens at the cursor without recording anything in it
    fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        while let Some(kind) = self.peek() {
            self.bump();
            match kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            }
            if depth == 0 {
                return;
            }
        }
    }

    // ----- compilation unit -----

    fn compilation_unit(&mut self) {
        while let Some(kind) = self.peek() {
            match kind {
                TokenKind::Keyword(Keyword::Package) => self.package_declaration(),
                TokenKind::Keyword(Keyword::Import) => self.import_declaration(),
                TokenKind::Semi => {
                    self.bump();
                }
                TokenKind::RBrace => self.junk(),
                _ => self.member_guarded(),
            }
        }
    }

    fn package_declaration(&mut self) {
        let keyword = self.bump().unwrap_or_default();
        if self.qualified_name().is_empty() {
            self.error(
                "Syntax error on token \"package\", Name expected after this token",
                keyword,
            );
            return;
        }
        self.expect_semicolon("PackageDeclaration");
    }

    /// Dotted name without recording references
    fn qualified_name(&mut self) -> Vec<&'src str> {
        let mut segments = Vec::new();
        while self.at(TokenKind::Ident) {
            segments.push(self.text_at(0));
            self.bump();
            if !(self.at(TokenKind::Dot) && self.peek_at(1) == Some(TokenKind::Ident)) {
                break;
            }
            self.bump();
        }
        segments
    }

    fn import_declaration(&mut self) {
        let keyword = self.bump().unwrap_or_default();
        self.eat_keyword(Keyword::Static);
        let start = self.current_start();
        let segments = self.qualified_name();
        let end = self.last_end();
        let mut on_demand = false;
        if !segments.is_empty() && self.at(TokenKind::Dot) && self.at_operator(1, "*") {
            self.bump();
            self.bump();
            on_demand = true;
        }
        let Some(simple_name) = segments.last() else {
            self.error(
                "Syntax error on token \"import\", Name expected after this token",
                keyword,
            );
            return;
        };
        self.parsed.imports.push(ImportDecl {
            path: segments.join("."),
            simple_name: simple_name.to_string(),
            span: start..end,
            on_demand,
        });
        self.expect_semicolon("ImportDeclaration");
    }

    // ----- type members -----

    /// Parse one member and make sure the cursor moved
    fn member_guarded(&mut self) {
        let before = self.pos;
        self.member();
        if self.pos == before {
            self.junk();
        }
    }

    fn member(&mut self) {
        let start = self.current_start();
        let before = self.pos;
        self.skip_modifiers();

        match self.peek() {
            None => {
                if self.pos > before {
                    let span = self.previous_span();
                    let token = self.source.get(span.clone()).unwrap_or_default();
                    self.error(
                        format!("Syntax error on token \"{token}\", delete this token"),
                        span,
                    );
                }
            }
            Some(TokenKind::LBrace) => self.block(),
            Some(TokenKind::Keyword(Keyword::Class)) => self.type_declaration(start, Flavor::Class),
            Some(TokenKind::Keyword(Keyword::Interface)) => {
                self.type_declaration(start, Flavor::Interface)
            }
            Some(TokenKind::Keyword(Keyword::Enum)) => self.type_declaration(start, Flavor::Enum),
            Some(TokenKind::At) if self.peek_at(1) == Some(TokenKind::Keyword(Keyword::Interface)) => {
                self.bump();
                self.type_declaration(start, Flavor::Annotation);
            }
            Some(TokenKind::Ident) if self.at_record_header() => {
                self.type_declaration(start, Flavor::Record)
            }
            Some(TokenKind::Lt) => {
                self.type_arguments();
                self.field_or_method(start);
            }
            Some(_) => self.field_or_method(start),
        }
    }

    fn at_record_header(&self) -> bool {
        self.at_contextual("record")
            && self.peek_at(1) == Some(TokenKind::Ident)
            && matches!(self.peek_at(2), Some(TokenKind::LParen | TokenKind::Lt))
    }

    fn skip_modifiers(&mut self) {
        loop {
            match self.peek() {
                Some(TokenKind::Keyword(keyword)) if keyword.is_modifier() => {
                    self.bump();
                }
                Some(TokenKind::At)
                    if self.peek_at(1) != Some(TokenKind::Keyword(Keyword::Interface)) =>
                {
                    self.annotation()
                }
                Some(TokenKind::Ident)
                    if self.at_contextual("sealed")
                        && matches!(self.peek_at(1), Some(TokenKind::Keyword(_))) =>
                {
                    self.bump();
                }
                Some(TokenKind::Ident)
                    if self.at_contextual("non")
                        && self.at_operator(1, "-")
                        && self.contextual_at(2, "sealed") =>
                {
                    self.pos += 3;
                }
                _ => break,
            }
        }
    }

    fn skip_variable_modifiers(&mut self) {
        loop {
            match self.peek() {
                Some(TokenKind::Keyword(Keyword::Final)) => {
                    self.bump();
                }
                Some(TokenKind::At)
                    if self.peek_at(1) != Some(TokenKind::Keyword(Keyword::Interface)) =>
                {
                    self.annotation()
                }
                _ => break,
            }
        }
    }

    fn annotation(&mut self) {
        self.bump();
        while self.at(TokenKind::Ident) {
            self.name_ref();
            if !(self.at(TokenKind::Dot) && self.peek_at(1) == Some(TokenKind::Ident)) {
                break;
            }
            self.bump();
        }
        if self.at(TokenKind::LParen) {
            self.parenthesized("Annotation");
        }
    }

    fn type_declaration(&mut self, start: usize, flavor: Flavor) {
        let keyword = self.bump().unwrap_or_default();
        let Some(name) = self.identifier() else {
            let token = self.source.get(keyword.clone()).unwrap_or_default();
            self.error(
                format!("Syntax error on token \"{token}\", Identifier expected after this token"),
                keyword,
            );
            if self.at(TokenKind::LBrace) {
                self.class_body(flavor == Flavor::Enum);
            }
            return;
        };
        let index = self.open_declaration(flavor, name, start);

        loop {
            match self.peek() {
                Some(TokenKind::Lt) => self.type_arguments(),
                Some(TokenKind::LParen) if flavor == Flavor::Record => {
                    self.formal_parameters(Flavor::Field, "RecordHeader")
                }
                Some(TokenKind::Keyword(Keyword::Extends | Keyword::Implements)) => {
                    self.bump();
                    self.type_list();
                }
                Some(TokenKind::Ident) if self.at_contextual("permits") => {
                    self.bump();
                    self.type_list();
                }
                _ => break,
            }
        }

        if self.at(TokenKind::LBrace) {
            self.class_body(flavor == Flavor::Enum);
        } else {
            let span = self.previous_span();
            self.error(
                "Syntax error, insert \"ClassBody\" to complete TypeDeclaration",
                span,
            );
        }
        self.close_declaration(index);
    }

    fn type_list(&mut self) {
        while self.parse_type() {
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
    }

    fn class_body(&mut self, is_enum: bool) {
        if !self.enter() {
            self.skip_too_deep();
            return;
        }
        self.class_body_members(is_enum);
        self.leave();
    }

    fn class_body_members(&mut self, is_enum: bool) {
        self.bump();
        if is_enum {
            self.enum_constants();
        }
        loop {
            match self.peek() {
                None => {
                    let span = self.previous_span();
                    self.error("Syntax error, insert \"}\" to complete ClassBody", span);
                    return;
                }
                Some(TokenKind::RBrace) => {
                    self.bump();
                    return;
                }
                Some(TokenKind::Semi) => {
                    self.bump();
                }
                Some(_) => self.member_guarded(),
            }
        }
    }

    fn enum_constants(&mut self) {
        loop {
            while self.at(TokenKind::At) {
                self.annotation();
            }
            let start = self.current_start();
            let Some(name) = self.identifier() else {
                break;
            };
            let index = self.open_declaration(Flavor::EnumConstant, name, start);
            if self.at(TokenKind::LParen) {
                self.parenthesized("EnumConstant");
            }
            if self.at(TokenKind::LBrace) {
                self.class_body(false);
            }
            self.close_declaration(index);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.eat(TokenKind::Semi);
    }

    fn field_or_method(&mut self, start: usize) {
        // Constructors, including compact record constructors
        if self.at(TokenKind::Ident)
            && matches!(self.peek_at(1), Some(TokenKind::LParen | TokenKind::LBrace))
        {
            if let Some(name) = self.identifier() {
                self.method_rest(start, Flavor::Constructor, name);
            }
            return;
        }
        if !self.parse_type() {
            self.junk();
            return;
        }
        if self.at(TokenKind::Ident) && self.peek_at(1) == Some(TokenKind::LParen) {
            if let Some(name) = self.identifier() {
                self.method_rest(start, Flavor::Method, name);
            }
        } else if self.at(TokenKind::Ident) {
            self.variable_declarators(Flavor::Field);
            self.expect_semicolon("FieldDeclaration");
        } else {
            self.missing_declarator_id();
            self.eat(TokenKind::Semi);
        }
    }

    fn missing_declarator_id(&mut self) {
        let span = self.previous_span();
        let token = self.source.get(span.clone()).unwrap_or_default();
        self.error(
            format!("Syntax error on token \"{token}\", VariableDeclaratorId expected after this token"),
            span,
        );
    }

    fn method_rest(&mut self, start: usize, flavor: Flavor, name: Identifier) {
        let index = self.open_declaration(flavor, name, start);
        if self.at(TokenKind::LParen) {
            self.formal_parameters(Flavor::Parameter, "MethodDeclaration");
        }
        self.skip_dims();
        if self.eat_keyword(Keyword::Throws) {
            self.type_list();
        }
        if self.eat_keyword(Keyword::Default) {
            self.expression(&[]);
        }
        if self.at(TokenKind::LBrace) {
            self.block();
        } else {
            self.expect_semicolon("MethodDeclaration");
        }
        self.close_declaration(index);
    }

    fn variable_declarators(&mut self, flavor: Flavor) {
        while let Some(name) = self.identifier() {
            let start = name.span.start;
            let index = self.open_declaration(flavor, name, start);
            self.skip_dims();
            if self.eat(TokenKind::Assign) {
                self.expression(&[TokenKind::Comma]);
            }
            self.close_declaration(index);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
    }

    /// Parenthesized parameter list. Each parameter spans from its first modifier to its name.
    fn formal_parameters(&mut self, flavor: Flavor, context: &str) {
        self.bump();
        loop {
            match self.peek() {
                Some(TokenKind::RParen) => {
                    self.bump();
                    return;
                }
                None | Some(TokenKind::LBrace | TokenKind::RBrace | TokenKind::Semi) => {
                    self.expect_close_paren(context);
                    return;
                }
                Some(TokenKind::Comma) => {
                    self.bump();
                }
                Some(_) => {
                    let start = self.current_start();
                    self.skip_variable_modifiers();
                    if !self.parse_type() {
                        self.junk();
                        continue;
                    }
                    self.eat(TokenKind::Ellipsis);
                    if self.eat_keyword(Keyword::This) {
                        continue;
                    }
                    match self.identifier() {
                        Some(name) => {
                            let index = self.open_declaration(flavor, name, start);
                            self.skip_dims();
                            self.close_declaration(index);
                        }
                        None => self.missing_declarator_id(),
                    }
                }
            }
        }
    }

    // ----- types -----

    /// Primitive, `void` or (qualified, generic) class type with array dimensions. Names become
    /// references. Returns false without consuming a type if none starts here.
    fn parse_type(&mut self) -> bool {
        while self.at(TokenKind::At) && self.peek_at(1) != Some(TokenKind::Keyword(Keyword::Interface)) {
            self.annotation();
        }
        match self.peek() {
            Some(TokenKind::Keyword(keyword)) if keyword.is_primitive() || keyword == Keyword::Void => {
                self.bump();
            }
            Some(TokenKind::Ident)
                if self.at_contextual("var") && self.peek_at(1) == Some(TokenKind::Ident) =>
            {
                self.bump();
            }
            Some(TokenKind::Ident) => loop {
                self.name_ref();
                if self.at(TokenKind::Lt) {
                    self.type_arguments();
                }
                if self.at(TokenKind::Dot) && self.peek_at(1) == Some(TokenKind::Ident) {
                    self.bump();
                    continue;
                }
                break;
            },
            _ => return false,
        }
        self.skip_dims();
        true
    }

    /// `<...>` in type position: type arguments or type parameters. Stops early at any token
    /// that cannot appear inside one.
    fn type_arguments(&mut self) {
        self.bump();
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek() {
                Some(TokenKind::Lt) => {
                    depth += 1;
                    self.bump();
                }
                Some(TokenKind::Gt) => {
                    depth -= 1;
                    self.bump();
                }
                Some(TokenKind::Ident) => self.name_ref(),
                Some(TokenKind::At) => self.annotation(),
                Some(
                    TokenKind::Question
                    | TokenKind::Comma
                    | TokenKind::Dot
                    | TokenKind::LBracket
                    | TokenKind::RBracket
                    | TokenKind::Keyword(Keyword::Extends | Keyword::Super),
                ) => {
                    self.bump();
                }
                Some(TokenKind::Keyword(keyword)) if keyword.is_primitive() => {
                    self.bump();
                }
                Some(TokenKind::Operator) if self.at_operator(0, "&") => {
                    self.bump();
                }
                _ => return,
            }
        }
    }

    fn skip_dims(&mut self) {
        while self.at(TokenKind::LBracket) && self.peek_at(1) == Some(TokenKind::RBracket) {
            self.pos += 2;
        }
    }

    // ----- statements -----

    fn block(&mut self) {
        if !self.enter() {
            self.skip_too_deep();
            return;
        }
        self.block_statements();
        self.leave();
    }

    fn block_statements(&mut self) {
        self.bump();
        loop {
            match self.peek() {
                None => {
                    let span = self.previous_span();
                    self.error("Syntax error, insert \"}\" to complete Block", span);
                    return;
                }
                Some(TokenKind::RBrace) => {
                    self.bump();
                    return;
                }
                Some(_) => {
                    let before = self.pos;
                    self.statement();
                    if self.pos == before {
                        self.junk();
                    }
                }
            }
        }
    }

    fn statement(&mut self) {
        let Some(kind) = self.peek() else {
            return;
        };
        match kind {
            TokenKind::LBrace => self.block(),
            TokenKind::Semi => {
                self.bump();
            }
            TokenKind::RParen | TokenKind::RBracket => self.junk(),
            TokenKind::Keyword(
                Keyword::If | Keyword::While | Keyword::Switch | Keyword::Synchronized,
            ) => {
                self.bump();
                if self.at(TokenKind::LParen) {
                    self.parenthesized("Statement");
                }
            }
            TokenKind::Keyword(Keyword::Else | Keyword::Do | Keyword::Finally) => {
                self.bump();
            }
            TokenKind::Keyword(Keyword::Try) => {
                self.bump();
                if self.at(TokenKind::LParen) {
                    self.resources();
                }
            }
            TokenKind::Keyword(Keyword::Catch) => {
                self.bump();
                if self.at(TokenKind::LParen) {
                    self.catch_parameter();
                }
            }
            TokenKind::Keyword(Keyword::For) => {
                self.bump();
                if self.at(TokenKind::LParen) {
                    self.for_header();
                }
            }
            TokenKind::Keyword(Keyword::Case) => {
                self.bump();
                self.expression(&[TokenKind::Colon, TokenKind::Arrow]);
                if !self.eat(TokenKind::Colon) {
                    self.eat(TokenKind::Arrow);
                }
            }
            TokenKind::Keyword(Keyword::Default)
                if matches!(self.peek_at(1), Some(TokenKind::Colon | TokenKind::Arrow)) =>
            {
                self.pos += 2;
            }
            TokenKind::Keyword(
                Keyword::Return
                | Keyword::Throw
                | Keyword::Assert
                | Keyword::Break
                | Keyword::Continue,
            ) => {
                self.bump();
                self.expression(&[]);
                self.eat(TokenKind::Semi);
            }
            TokenKind::Ident if self.peek_at(1) == Some(TokenKind::Colon) => {
                self.pos += 2;
            }
            TokenKind::Ident if self.at_yield() => {
                self.bump();
                self.expression(&[]);
                self.eat(TokenKind::Semi);
            }
            _ if self.at_local_type() => self.member(),
            _ => {
                if !self.local_variable_declaration() {
                    self.expression(&[]);
                }
                self.eat(TokenKind::Semi);
            }
        }
    }

    fn at_yield(&self) -> bool {
        self.at_contextual("yield")
            && !matches!(
                self.peek_at(1),
                None | Some(
                    TokenKind::Assign
                        | TokenKind::Dot
                        | TokenKind::LParen
                        | TokenKind::LBracket
                        | TokenKind::Semi
                        | TokenKind::Operator
                )
            )
    }

    /// Whether a local class, interface, enum or record starts here
    fn at_local_type(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        self.skip_modifiers();
        let found = match self.peek() {
            Some(TokenKind::Keyword(Keyword::Class | Keyword::Interface | Keyword::Enum)) => true,
            Some(TokenKind::At) => self.peek_at(1) == Some(TokenKind::Keyword(Keyword::Interface)),
            _ => self.at_record_header(),
        };
        self.rewind(checkpoint);
        found
    }

    /// Try `[modifiers] Type name ...`; rewinds and returns false when the tokens do not have
    /// that shape.
    fn local_variable_declaration(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        self.skip_variable_modifiers();
        if !self.parse_type() {
            self.rewind(checkpoint);
            return false;
        }
        let declares = self.at(TokenKind::Ident)
            && matches!(
                self.peek_at(1),
                None | Some(
                    TokenKind::Assign
                        | TokenKind::Semi
                        | TokenKind::Comma
                        | TokenKind::LBracket
                        | TokenKind::Colon
                        | TokenKind::RParen
                )
            );
        if !declares {
            self.rewind(checkpoint);
            return false;
        }
        self.variable_declarators(Flavor::Local);
        true
    }

    fn for_header(&mut self) {
        self.bump();
        if !self.at(TokenKind::Semi) && !self.local_variable_declaration() {
            self.expression(&[]);
        }
        if self.eat(TokenKind::Colon) {
            self.expression(&[]);
        } else if self.eat(TokenKind::Semi) {
            self.expression(&[]);
            self.eat(TokenKind::Semi);
            self.expression(&[]);
        }
        self.expect_close_paren("ForStatement");
    }

    fn resources(&mut self) {
        self.bump();
        loop {
            match self.peek() {
                Some(TokenKind::RParen) => {
                    self.bump();
                    return;
                }
                None | Some(TokenKind::LBrace | TokenKind::RBrace) => {
                    self.expect_close_paren("ResourceSpecification");
                    return;
                }
                Some(TokenKind::Semi) => {
                    self.bump();
                }
                Some(_) => {
                    let before = self.pos;
                    if !self.local_variable_declaration() {
                        self.expression(&[]);
                    }
                    if self.pos == before {
                        self.junk();
                    }
                }
            }
        }
    }

    fn catch_parameter(&mut self) {
        self.bump();
        let start = self.current_start();
        self.skip_variable_modifiers();
        if self.parse_type() {
            while self.at_operator(0, "|") {
                self.bump();
                self.parse_type();
            }
            match self.identifier() {
                Some(name) => {
                    let index = self.open_declaration(Flavor::Parameter, name, start);
                    self.close_declaration(index);
                }
                None => self.missing_declarator_id(),
            }
        }
        self.expect_close_paren("CatchClause");
    }

    // ----- expressions -----

    fn parenthesized(&mut self, context: &str) {
        self.bump();
        self.expression(&[]);
        self.expect_close_paren(context);
    }

    /// Skim an expression. Stops before `;`, `}`, an unbalanced `)` or `]`, or any of `stops`
    /// outside parentheses.
    fn expression(&mut self, stops: &[TokenKind]) {
        if self.enter() {
            self.skim_expression(stops, true);
            self.leave();
        } else {
            self.skim_expression(stops, false);
        }
    }

    /// Without `descend`, nested blocks are skipped and `new`/`switch` are plain tokens.
    fn skim_expression(&mut self, stops: &[TokenKind], descend: bool) {
        let mut depth = 0usize;
        while let Some(kind) = self.peek() {
            match kind {
                _ if depth == 0 && stops.contains(&kind) => return,
                TokenKind::Semi | TokenKind::RBrace => return,
                TokenKind::RParen | TokenKind::RBracket => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.bump();
                }
                TokenKind::LParen | TokenKind::LBracket => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::LBrace if descend => self.block(),
                TokenKind::LBrace => self.skip_too_deep(),
                TokenKind::Ident => self.name_ref(),
                TokenKind::Keyword(Keyword::New) if descend => self.instance_creation(),
                TokenKind::Keyword(Keyword::Switch) if descend => {
                    self.bump();
                    if self.at(TokenKind::LParen) {
                        self.parenthesized("SwitchExpression");
                    }
                    if self.at(TokenKind::LBrace) {
                        self.block();
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// `new T(...)`, `new T(...) { body }` or `new T[n]...{init}`
    fn instance_creation(&mut self) {
        self.bump();
        if self.at(TokenKind::Lt) {
            self.type_arguments();
        }
        while self.at(TokenKind::At) {
            self.annotation();
        }
        match self.peek() {
            Some(TokenKind::Keyword(keyword)) if keyword.is_primitive() => {
                self.bump();
            }
            Some(TokenKind::Ident) => loop {
                self.name_ref();
                if self.at(TokenKind::Lt) {
                    self.type_arguments();
                }
                if self.at(TokenKind::Dot) && self.peek_at(1) == Some(TokenKind::Ident) {
                    self.bump();
                    continue;
                }
                break;
            },
            _ => return,
        }

        if self.at(TokenKind::LBracket) {
            while self.eat(TokenKind::LBracket) {
                self.expression(&[]);
                self.eat(TokenKind::RBracket);
            }
            if self.at(TokenKind::LBrace) {
                self.block();
            }
            return;
        }
        if self.at(TokenKind::LParen) {
            self.parenthesized("ClassInstanceCreationExpression");
            if self.at(TokenKind::LBrace) {
                self.class_body(false);
            }
        }
    }
}

/// Tokens that extend a run of junk rather than start something the parser can resync on
fn is_junk_continuation(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Literal
            | TokenKind::Operator
            | TokenKind::Assign
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Question
            | TokenKind::Colon
            | TokenKind::ColonColon
            | TokenKind::Arrow
            | TokenKind::Comma
            | TokenKind::Dot
            | TokenKind::Ellipsis
            | TokenKind::LBracket
            | TokenKind::RBracket
    )
}
