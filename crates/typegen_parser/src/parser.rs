//! The declaration parser.
//!
//! A recursive descent parser over the scanner's token stream. Declarations
//! that carry types are parsed in full; everything else is skipped as a
//! balanced token run so that a file with arbitrary code still yields its
//! interfaces, aliases, classes and enums.

use bumpalo::Bump;
use typegen_ast::node::*;
use typegen_ast::syntax_kind::SyntaxKind;
use typegen_ast::types::ModifierFlags;
use typegen_core::text::TextSpan;
use typegen_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use typegen_scanner::{numeric_literal_value, Scanner};

use crate::utilities::*;

/// Maximum recursion depth to prevent stack overflow on deeply nested input.
const MAX_RECURSION_DEPTH: u32 = 200;

/// Move a Vec into the arena as a slice.
fn alloc_vec_in<T>(arena: &Bump, vec: Vec<T>) -> &[T] {
    if vec.is_empty() {
        return &[];
    }
    arena.alloc_slice_fill_iter(vec)
}

/// Parse one file, returning the tree and every scanner and parser
/// diagnostic.
pub fn parse_source_file<'a>(
    arena: &'a Bump,
    file_name: &str,
    source_text: &str,
) -> (SourceFile<'a>, DiagnosticCollection) {
    let mut parser = Parser::new(arena, file_name, source_text);
    let source_file = parser.parse_source_file();
    (source_file, parser.take_diagnostics())
}

pub struct Parser<'a> {
    arena: &'a Bump,
    scanner: Scanner,
    file_name: String,
    diagnostics: DiagnosticCollection,
    /// End of the most recently consumed token.
    prev_end: u32,
    recursion_depth: u32,
    /// Set while parsing the `extends` clause of a conditional type.
    disallow_conditional: bool,
}

impl<'a> Parser<'a> {
    pub fn new(arena: &'a Bump, file_name: &str, source_text: &str) -> Self {
        Self {
            arena,
            scanner: Scanner::new(source_text),
            file_name: file_name.to_string(),
            diagnostics: DiagnosticCollection::new(),
            prev_end: 0,
            recursion_depth: 0,
            disallow_conditional: false,
        }
    }

    pub fn parse_source_file(&mut self) -> SourceFile<'a> {
        self.next_token();
        let statements = self.parse_statements();
        SourceFile {
            span: TextSpan::new(0, self.scanner.text_len() as u32),
            file_name: self.file_name.clone(),
            statements,
        }
    }

    /// Parser diagnostics followed by the scanner's, all tagged with the file.
    pub fn take_diagnostics(mut self) -> DiagnosticCollection {
        for mut diagnostic in self.scanner.take_diagnostics().into_diagnostics() {
            if diagnostic.file.is_none() {
                diagnostic.file = Some(self.file_name.clone());
            }
            self.diagnostics.add(diagnostic);
        }
        self.diagnostics
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    #[inline]
    fn next_token(&mut self) -> SyntaxKind {
        self.prev_end = self.scanner.token_end() as u32;
        self.scanner.scan()
    }

    #[inline]
    fn token_pos(&self) -> u32 {
        self.scanner.token_start() as u32
    }

    #[inline]
    fn token_value(&self) -> &str {
        self.scanner.token_value()
    }

    /// Span from `start` to the end of the last consumed token.
    #[inline]
    fn span_from(&self, start: u32) -> TextSpan {
        TextSpan::from_bounds(start, self.prev_end.max(start))
    }

    fn peek(&mut self) -> SyntaxKind {
        self.scanner.look_ahead(|s| s.scan())
    }

    /// Peek at the next token and whether a line break precedes it.
    fn peek_with_line_break(&mut self) -> (SyntaxKind, bool) {
        self.scanner.look_ahead(|s| {
            let kind = s.scan();
            (kind, s.has_preceding_line_break())
        })
    }

    fn expect_token(&mut self, kind: SyntaxKind) -> bool {
        if self.token() == kind {
            self.next_token();
            true
        } else {
            let text = kind.punctuation_text().unwrap_or("token");
            self.error(&messages::_0_EXPECTED, &[text]);
            false
        }
    }

    fn optional_token(&mut self, kind: SyntaxKind) -> bool {
        if self.token() == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    fn parse_optional_semicolon(&mut self) {
        // ASI covers line breaks, `}` and end of file.
        self.optional_token(SyntaxKind::SemicolonToken);
    }

    fn error(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        let span = self.scanner.token_span();
        self.diagnostics.add(Diagnostic::with_location(
            self.file_name.clone(),
            span,
            message,
            args,
        ));
    }

    fn alloc_token_text(&self) -> &'a str {
        self.arena.alloc_str(self.scanner.token_value())
    }

    /// An identifier or a contextual keyword used as one.
    fn is_identifier(&self) -> bool {
        self.token() == SyntaxKind::Identifier || self.token().is_contextual_keyword()
    }

    fn enter(&mut self) -> bool {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            self.recursion_depth -= 1;
            self.error(&messages::TYPE_NESTING_TOO_DEEP, &[]);
            return false;
        }
        true
    }

    #[inline]
    fn leave(&mut self) {
        self.recursion_depth -= 1;
    }

    // ========================================================================
    // Names
    // ========================================================================

    fn parse_identifier(&mut self) -> Identifier<'a> {
        let start = self.token_pos();
        if self.is_identifier() {
            let text = self.alloc_token_text();
            self.next_token();
            return Identifier { span: self.span_from(start), text };
        }
        self.error(&messages::IDENTIFIER_EXPECTED, &[]);
        Identifier { span: TextSpan::new(start, 0), text: "" }
    }

    /// Any identifier or keyword, as allowed after `.` and in member names.
    fn parse_identifier_name(&mut self) -> Identifier<'a> {
        if self.token().is_keyword() {
            let start = self.token_pos();
            let text = self.alloc_token_text();
            self.next_token();
            return Identifier { span: self.span_from(start), text };
        }
        self.parse_identifier()
    }

    /// `A` or `A.B.C`, kept as one dotted name.
    fn parse_entity_name(&mut self) -> Identifier<'a> {
        let start = self.token_pos();
        let first = self.parse_identifier_name();
        if self.token() != SyntaxKind::DotToken {
            return first;
        }
        let mut text = first.text.to_string();
        while self.optional_token(SyntaxKind::DotToken) {
            text.push('.');
            text.push_str(self.parse_identifier_name().text);
        }
        Identifier { span: self.span_from(start), text: self.arena.alloc_str(&text) }
    }

    fn parse_property_name(&mut self) -> PropertyName<'a> {
        let start = self.token_pos();
        match self.token() {
            SyntaxKind::PrivateIdentifier => {
                let text = self.alloc_token_text();
                self.next_token();
                PropertyName::PrivateIdentifier(Identifier { span: self.span_from(start), text })
            }
            SyntaxKind::StringLiteral => {
                let text = self.alloc_token_text();
                self.next_token();
                PropertyName::StringLiteral(Identifier { span: self.span_from(start), text })
            }
            SyntaxKind::NumericLiteral => {
                let value = numeric_literal_value(self.token_value());
                let text = self.arena.alloc_str(&value.to_string());
                self.next_token();
                PropertyName::NumericLiteral(Identifier { span: self.span_from(start), text })
            }
            SyntaxKind::OpenBracketToken => {
                self.skip_balanced();
                PropertyName::Computed(self.span_from(start))
            }
            _ => PropertyName::Identifier(self.parse_identifier_name()),
        }
    }

    // ========================================================================
    // Skipping
    // ========================================================================

    /// Skip an expression or statement run. Stops before a terminator or an
    /// unmatched closing bracket at depth zero, or before a token that starts
    /// a new declaration on a fresh line after a complete operand.
    fn skip_expression(&mut self, terminators: &[SyntaxKind]) {
        let mut depth = 0u32;
        let mut prev_ends_operand = false;
        loop {
            let tok = self.token();
            if tok == SyntaxKind::EndOfFileToken {
                return;
            }
            if depth == 0 {
                if terminators.contains(&tok) {
                    return;
                }
                if self.scanner.has_preceding_line_break()
                    && prev_ends_operand
                    && can_start_declaration(tok)
                {
                    return;
                }
            }
            match tok {
                SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken => depth += 1,
                SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            prev_ends_operand = ends_operand(tok);
            self.next_token();
        }
    }

    /// Skip from an opening bracket through its matching close.
    fn skip_balanced(&mut self) {
        let mut depth = 0u32;
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken => depth += 1,
                SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.next_token();
                        return;
                    }
                }
                _ => {}
            }
            self.next_token();
        }
    }

    fn skip_statement(&mut self, start: u32) -> Statement<'a> {
        self.skip_expression(&[SyntaxKind::SemicolonToken]);
        self.optional_token(SyntaxKind::SemicolonToken);
        Statement::Skipped(self.span_from(start))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_statements(&mut self) -> &'a [Statement<'a>] {
        let mut statements = Vec::new();
        while self.token() != SyntaxKind::EndOfFileToken {
            let saved_pos = self.scanner.token_start();
            let statement = self.parse_statement();
            statements.push(statement);

            // A stray closing bracket stops every skip; step over it.
            if self.scanner.token_start() == saved_pos && self.token() != SyntaxKind::EndOfFileToken {
                self.error(&messages::UNEXPECTED_TOKEN, &[]);
                self.next_token();
            }
        }
        alloc_vec_in(self.arena, statements)
    }

    fn parse_statement(&mut self) -> Statement<'a> {
        let start = self.token_pos();
        let mut decorators = self.parse_decorators();
        let mut modifiers = ModifierFlags::NONE;

        loop {
            match self.token() {
                SyntaxKind::ExportKeyword => {
                    match self.peek() {
                        SyntaxKind::OpenBraceToken
                        | SyntaxKind::AsteriskToken
                        | SyntaxKind::EqualsToken
                        | SyntaxKind::TypeKeyword
                            if !self.is_export_type_declaration() =>
                        {
                            return self.skip_statement(start);
                        }
                        _ => {}
                    }
                    self.next_token();
                    modifiers |= ModifierFlags::EXPORT;
                }
                SyntaxKind::DefaultKeyword if modifiers.contains(ModifierFlags::EXPORT) => {
                    self.next_token();
                    modifiers |= ModifierFlags::DEFAULT;
                }
                SyntaxKind::DeclareKeyword | SyntaxKind::AbstractKeyword => {
                    let (next, line_break) = self.peek_with_line_break();
                    if line_break || !(next.is_keyword() && next != SyntaxKind::InKeyword) {
                        break;
                    }
                    if let Some(flag) = ModifierFlags::from_keyword(self.token()) {
                        modifiers |= flag;
                    }
                    self.next_token();
                }
                SyntaxKind::ConstKeyword if self.peek() == SyntaxKind::EnumKeyword => {
                    self.next_token();
                    modifiers |= ModifierFlags::CONST;
                }
                // `export @dec class`
                SyntaxKind::AtToken => {
                    let more = self.parse_decorators();
                    let mut all = decorators.to_vec();
                    all.extend_from_slice(more);
                    decorators = alloc_vec_in(self.arena, all);
                }
                _ => break,
            }
        }

        match self.token() {
            SyntaxKind::InterfaceKeyword => self.parse_interface_declaration(start, modifiers),
            SyntaxKind::TypeKeyword if self.look_ahead_is_identifier() => {
                self.parse_type_alias_declaration(start, modifiers)
            }
            SyntaxKind::ClassKeyword => self.parse_class_declaration(start, decorators, modifiers),
            SyntaxKind::EnumKeyword => self.parse_enum_declaration(start, modifiers),
            _ => self.skip_statement(start),
        }
    }

    /// `export type Foo = ...` rather than `export type { Foo }`.
    fn is_export_type_declaration(&mut self) -> bool {
        self.scanner.look_ahead(|s| {
            if s.scan() != SyntaxKind::TypeKeyword {
                return false;
            }
            let next = s.scan();
            next == SyntaxKind::Identifier || next.is_contextual_keyword()
        })
    }

    fn look_ahead_is_identifier(&mut self) -> bool {
        let (next, line_break) = self.peek_with_line_break();
        !line_break && (next == SyntaxKind::Identifier || next.is_contextual_keyword())
    }

    fn parse_interface_declaration(&mut self, start: u32, modifiers: ModifierFlags) -> Statement<'a> {
        self.expect_token(SyntaxKind::InterfaceKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();

        let mut extends = Vec::new();
        if self.optional_token(SyntaxKind::ExtendsKeyword) {
            loop {
                extends.push(self.parse_type_reference());
                if !self.optional_token(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }

        let members = self.parse_type_members();
        Statement::Interface(InterfaceDeclaration {
            span: self.span_from(start),
            modifiers,
            name,
            type_parameters,
            extends: alloc_vec_in(self.arena, extends),
            members,
        })
    }

    fn parse_type_alias_declaration(&mut self, start: u32, modifiers: ModifierFlags) -> Statement<'a> {
        self.expect_token(SyntaxKind::TypeKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        self.expect_token(SyntaxKind::EqualsToken);
        let type_node = self.parse_type_and_alloc();
        self.parse_optional_semicolon();
        Statement::TypeAlias(TypeAliasDeclaration {
            span: self.span_from(start),
            modifiers,
            name,
            type_parameters,
            type_node,
        })
    }

    fn parse_enum_declaration(&mut self, start: u32, modifiers: ModifierFlags) -> Statement<'a> {
        self.expect_token(SyntaxKind::EnumKeyword);
        let name = self.parse_identifier();
        self.expect_token(SyntaxKind::OpenBraceToken);

        let mut members = Vec::new();
        while self.token() != SyntaxKind::CloseBraceToken && self.token() != SyntaxKind::EndOfFileToken {
            let member_start = self.token_pos();
            let member_name = self.parse_property_name();
            let initializer = if self.optional_token(SyntaxKind::EqualsToken) {
                Some(self.parse_enum_initializer())
            } else {
                None
            };
            members.push(EnumMember {
                span: self.span_from(member_start),
                name: member_name,
                initializer,
            });
            if !self.optional_token(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseBraceToken);

        Statement::Enum(EnumDeclaration {
            span: self.span_from(start),
            modifiers,
            name,
            members: alloc_vec_in(self.arena, members),
        })
    }

    fn parse_enum_initializer(&mut self) -> EnumInitializer<'a> {
        let value = match self.token() {
            SyntaxKind::StringLiteral => {
                let text = self.alloc_token_text();
                self.next_token();
                Some(EnumInitializer::String(text))
            }
            SyntaxKind::NumericLiteral => {
                let value = numeric_literal_value(self.token_value());
                self.next_token();
                Some(EnumInitializer::Number(value))
            }
            SyntaxKind::MinusToken if self.peek() == SyntaxKind::NumericLiteral => {
                self.next_token();
                let value = numeric_literal_value(self.token_value());
                self.next_token();
                Some(EnumInitializer::Number(-value))
            }
            _ => None,
        };
        match value {
            Some(value)
                if matches!(self.token(), SyntaxKind::CommaToken | SyntaxKind::CloseBraceToken) =>
            {
                value
            }
            _ => {
                self.skip_expression(&[SyntaxKind::CommaToken]);
                EnumInitializer::Other
            }
        }
    }

    // ========================================================================
    // Decorators
    // ========================================================================

    fn parse_decorators(&mut self) -> &'a [Decorator<'a>] {
        let mut decorators = Vec::new();
        while self.token() == SyntaxKind::AtToken {
            decorators.push(self.parse_decorator());
        }
        alloc_vec_in(self.arena, decorators)
    }

    fn parse_decorator(&mut self) -> Decorator<'a> {
        let start = self.token_pos();
        self.expect_token(SyntaxKind::AtToken);

        let mut name = self.parse_identifier_name();
        while self.optional_token(SyntaxKind::DotToken) {
            name = self.parse_identifier_name();
        }
        if self.token() == SyntaxKind::LessThanToken {
            self.parse_type_arguments();
        }

        let mut arguments = Vec::new();
        if self.optional_token(SyntaxKind::OpenParenToken) {
            while self.token() != SyntaxKind::CloseParenToken
                && self.token() != SyntaxKind::EndOfFileToken
            {
                arguments.push(self.parse_decorator_argument());
                if !self.optional_token(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.expect_token(SyntaxKind::CloseParenToken);
        }

        Decorator {
            span: self.span_from(start),
            name,
            arguments: alloc_vec_in(self.arena, arguments),
        }
    }

    fn parse_decorator_argument(&mut self) -> DecoratorArgument<'a> {
        let start = self.token_pos();
        if !self.enter() {
            self.skip_expression(&[SyntaxKind::CommaToken]);
            return DecoratorArgument::Other(self.span_from(start));
        }

        let value = match self.token() {
            SyntaxKind::StringLiteral => {
                let text = self.alloc_token_text();
                self.next_token();
                Some(DecoratorArgument::String(text))
            }
            // Only substitution-free templates are static.
            SyntaxKind::TemplateLiteral if !self.token_value().contains("${") => {
                let text = self.alloc_token_text();
                self.next_token();
                Some(DecoratorArgument::String(text))
            }
            SyntaxKind::NumericLiteral => {
                let value = numeric_literal_value(self.token_value());
                self.next_token();
                Some(DecoratorArgument::Number(value))
            }
            SyntaxKind::MinusToken if self.peek() == SyntaxKind::NumericLiteral => {
                self.next_token();
                let value = numeric_literal_value(self.token_value());
                self.next_token();
                Some(DecoratorArgument::Number(-value))
            }
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let value = self.token() == SyntaxKind::TrueKeyword;
                self.next_token();
                Some(DecoratorArgument::Boolean(value))
            }
            SyntaxKind::OpenBraceToken => Some(self.parse_decorator_object()),
            SyntaxKind::OpenBracketToken => {
                self.next_token();
                let mut elements = Vec::new();
                while self.token() != SyntaxKind::CloseBracketToken
                    && self.token() != SyntaxKind::EndOfFileToken
                {
                    elements.push(self.parse_decorator_argument());
                    if !self.optional_token(SyntaxKind::CommaToken) {
                        break;
                    }
                }
                self.expect_token(SyntaxKind::CloseBracketToken);
                Some(DecoratorArgument::Array(alloc_vec_in(self.arena, elements)))
            }
            _ => None,
        };
        self.leave();

        match value {
            Some(value)
                if matches!(
                    self.token(),
                    SyntaxKind::CommaToken
                        | SyntaxKind::CloseParenToken
                        | SyntaxKind::CloseBraceToken
                        | SyntaxKind::CloseBracketToken
                ) =>
            {
                value
            }
            // `"a" + b`, calls, identifiers: not statically known.
            _ => {
                self.skip_expression(&[SyntaxKind::CommaToken]);
                DecoratorArgument::Other(self.span_from(start))
            }
        }
    }

    fn parse_decorator_object(&mut self) -> DecoratorArgument<'a> {
        self.expect_token(SyntaxKind::OpenBraceToken);
        let mut properties = Vec::new();
        while self.token() != SyntaxKind::CloseBraceToken && self.token() != SyntaxKind::EndOfFileToken {
            let start = self.token_pos();
            let name = match self.token() {
                SyntaxKind::StringLiteral | SyntaxKind::Identifier => Some(self.alloc_token_text()),
                kind if kind.is_keyword() => Some(self.alloc_token_text()),
                _ => None,
            };
            match name {
                Some(name) if self.peek() == SyntaxKind::ColonToken => {
                    self.next_token();
                    self.next_token();
                    let value = self.parse_decorator_argument();
                    properties.push(DecoratorProperty { name, value });
                }
                Some(name) => {
                    // Shorthand or method; the value is not static.
                    self.skip_expression(&[SyntaxKind::CommaToken]);
                    properties.push(DecoratorProperty {
                        name,
                        value: DecoratorArgument::Other(self.span_from(start)),
                    });
                }
                None => self.skip_expression(&[SyntaxKind::CommaToken]),
            }
            if !self.optional_token(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseBraceToken);
        DecoratorArgument::Object(alloc_vec_in(self.arena, properties))
    }

    // ========================================================================
    // Classes
    // ========================================================================

    fn parse_class_declaration(
        &mut self,
        start: u32,
        decorators: &'a [Decorator<'a>],
        modifiers: ModifierFlags,
    ) -> Statement<'a> {
        self.expect_token(SyntaxKind::ClassKeyword);
        let name = if self.is_identifier() {
            Some(self.parse_identifier())
        } else {
            None
        };
        let type_parameters = self.parse_type_parameters();

        let mut extends = None;
        if self.optional_token(SyntaxKind::ExtendsKeyword) {
            let reference = self.parse_type_reference();
            // `extends mixin(Base)` is an expression, not a reference.
            if self.token() != SyntaxKind::OpenBraceToken
                && self.token() != SyntaxKind::ImplementsKeyword
            {
                self.skip_expression(&[SyntaxKind::OpenBraceToken, SyntaxKind::ImplementsKeyword]);
            } else {
                let reference: &'a TypeReferenceNode<'a> = self.arena.alloc(reference);
                extends = Some(reference);
            }
        }

        let mut implements = Vec::new();
        if self.optional_token(SyntaxKind::ImplementsKeyword) {
            loop {
                implements.push(self.parse_type_reference());
                if !self.optional_token(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }

        self.expect_token(SyntaxKind::OpenBraceToken);
        let mut members = Vec::new();
        while self.token() != SyntaxKind::CloseBraceToken && self.token() != SyntaxKind::EndOfFileToken {
            let saved_pos = self.scanner.token_start();
            members.push(self.parse_class_member());
            if self.scanner.token_start() == saved_pos {
                self.error(&messages::UNEXPECTED_TOKEN, &[]);
                self.next_token();
            }
        }
        self.expect_token(SyntaxKind::CloseBraceToken);

        Statement::Class(ClassDeclaration {
            span: self.span_from(start),
            modifiers,
            decorators,
            name,
            type_parameters,
            extends,
            implements: alloc_vec_in(self.arena, implements),
            members: alloc_vec_in(self.arena, members),
        })
    }

    /// Consume member modifiers, stopping at a keyword used as a name.
    fn parse_member_modifiers(&mut self) -> ModifierFlags {
        let mut modifiers = ModifierFlags::NONE;
        while self.token().is_modifier() {
            let (next, line_break) = self.peek_with_line_break();
            if is_name_position_terminator(next) || next == SyntaxKind::OpenBraceToken {
                break;
            }
            if line_break && self.token() == SyntaxKind::AsyncKeyword {
                break;
            }
            if let Some(flag) = ModifierFlags::from_keyword(self.token()) {
                modifiers |= flag;
            }
            self.next_token();
        }
        modifiers
    }

    fn parse_class_member(&mut self) -> ClassElement<'a> {
        let start = self.token_pos();
        if self.optional_token(SyntaxKind::SemicolonToken) {
            return ClassElement::Skipped(self.span_from(start));
        }
        if self.token() == SyntaxKind::StaticKeyword && self.peek() == SyntaxKind::OpenBraceToken {
            self.next_token();
            self.skip_balanced();
            return ClassElement::Skipped(self.span_from(start));
        }

        let decorators = self.parse_decorators();
        let modifiers = self.parse_member_modifiers();

        if matches!(self.token(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword) {
            let next = self.peek();
            if is_property_name_start(next) {
                let is_get = self.token() == SyntaxKind::GetKeyword;
                self.next_token();
                let name = self.parse_property_name();
                let (_, parameters, return_type) = self.parse_signature();
                self.parse_function_body();
                let accessor = AccessorDeclaration {
                    span: self.span_from(start),
                    decorators,
                    modifiers,
                    name,
                    parameters,
                    return_type,
                };
                return if is_get {
                    ClassElement::GetAccessor(accessor)
                } else {
                    ClassElement::SetAccessor(accessor)
                };
            }
        }

        if self.token() == SyntaxKind::OpenBracketToken && self.is_index_signature() {
            let signature = self.parse_index_signature(start, modifiers);
            self.parse_optional_semicolon();
            return ClassElement::IndexSignature(signature);
        }

        if self.token() == SyntaxKind::ConstructorKeyword && self.peek() == SyntaxKind::OpenParenToken {
            self.next_token();
            let parameters = self.parse_parameter_list();
            let has_body = self.parse_function_body();
            return ClassElement::Constructor(ConstructorDeclaration {
                span: self.span_from(start),
                modifiers,
                parameters,
                has_body,
            });
        }

        // Generator methods.
        self.optional_token(SyntaxKind::AsteriskToken);

        let name = self.parse_property_name();
        let question = self.optional_token(SyntaxKind::QuestionToken);
        self.optional_token(SyntaxKind::ExclamationToken);

        if matches!(self.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken) {
            let (type_parameters, parameters, return_type) = self.parse_signature();
            let has_body = self.parse_function_body();
            return ClassElement::Method(MethodDeclaration {
                span: self.span_from(start),
                decorators,
                modifiers,
                name,
                question,
                type_parameters,
                parameters,
                return_type,
                has_body,
            });
        }

        let type_annotation = if self.optional_token(SyntaxKind::ColonToken) {
            Some(self.parse_type_and_alloc())
        } else {
            None
        };
        let has_initializer = self.optional_token(SyntaxKind::EqualsToken);
        if has_initializer {
            self.skip_expression(&[SyntaxKind::SemicolonToken]);
        }
        self.parse_optional_semicolon();

        ClassElement::Property(PropertyDeclaration {
            span: self.span_from(start),
            decorators,
            modifiers,
            name,
            question,
            type_annotation,
            has_initializer,
        })
    }

    /// Skip a `{ ... }` body if present; otherwise this is an overload or
    /// abstract signature ending in `;`.
    fn parse_function_body(&mut self) -> bool {
        if self.token() == SyntaxKind::OpenBraceToken {
            self.skip_balanced();
            true
        } else {
            self.parse_optional_semicolon();
            false
        }
    }

    // ========================================================================
    // Signatures and parameters
    // ========================================================================

    /// `<T>(params): R` with each part optional except the parameter list.
    #[allow(clippy::type_complexity)]
    fn parse_signature(
        &mut self,
    ) -> (
        &'a [TypeParameterDeclaration<'a>],
        &'a [ParameterDeclaration<'a>],
        Option<&'a TypeNode<'a>>,
    ) {
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        let return_type = if self.optional_token(SyntaxKind::ColonToken) {
            Some(self.parse_return_type())
        } else {
            None
        };
        (type_parameters, parameters, return_type)
    }

    fn parse_parameter_list(&mut self) -> &'a [ParameterDeclaration<'a>] {
        let mut parameters = Vec::new();
        if !self.expect_token(SyntaxKind::OpenParenToken) {
            return &[];
        }
        while self.token() != SyntaxKind::CloseParenToken && self.token() != SyntaxKind::EndOfFileToken {
            parameters.push(self.parse_parameter());
            if !self.optional_token(SyntaxKind::CommaToken) {
                if self.token() != SyntaxKind::CloseParenToken {
                    self.error(&messages::_0_EXPECTED, &[","]);
                    self.skip_expression(&[]);
                }
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseParenToken);
        alloc_vec_in(self.arena, parameters)
    }

    fn parse_parameter(&mut self) -> ParameterDeclaration<'a> {
        let start = self.token_pos();
        let decorators = self.parse_decorators();
        let modifiers = self.parse_member_modifiers();
        let dot_dot_dot = self.optional_token(SyntaxKind::DotDotDotToken);

        let name = match self.token() {
            SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken => {
                let pattern_start = self.token_pos();
                self.skip_balanced();
                BindingName::Pattern(self.span_from(pattern_start))
            }
            SyntaxKind::ThisKeyword => BindingName::Identifier(self.parse_identifier_name()),
            _ => BindingName::Identifier(self.parse_identifier()),
        };

        let question = self.optional_token(SyntaxKind::QuestionToken);
        let type_annotation = if self.optional_token(SyntaxKind::ColonToken) {
            Some(self.parse_type_and_alloc())
        } else {
            None
        };
        let has_initializer = self.optional_token(SyntaxKind::EqualsToken);
        if has_initializer {
            self.skip_expression(&[SyntaxKind::CommaToken]);
        }

        ParameterDeclaration {
            span: self.span_from(start),
            decorators,
            modifiers,
            dot_dot_dot,
            name,
            question,
            type_annotation,
            has_initializer,
        }
    }

    fn parse_type_parameters(&mut self) -> &'a [TypeParameterDeclaration<'a>] {
        if self.token() != SyntaxKind::LessThanToken {
            return &[];
        }
        self.next_token();
        let mut parameters = Vec::new();
        while self.token() != SyntaxKind::GreaterThanToken && self.token() != SyntaxKind::EndOfFileToken {
            let start = self.token_pos();
            // Variance and const modifiers.
            while matches!(self.token(), SyntaxKind::ConstKeyword | SyntaxKind::InKeyword)
                || (self.token() == SyntaxKind::Identifier
                    && self.token_value() == "out"
                    && self.peek() == SyntaxKind::Identifier)
            {
                self.next_token();
            }
            let name = self.parse_identifier();
            let constraint = if self.optional_token(SyntaxKind::ExtendsKeyword) {
                Some(self.parse_type_and_alloc())
            } else {
                None
            };
            let default = if self.optional_token(SyntaxKind::EqualsToken) {
                Some(self.parse_type_and_alloc())
            } else {
                None
            };
            parameters.push(TypeParameterDeclaration {
                span: self.span_from(start),
                name,
                constraint,
                default,
            });
            if !self.optional_token(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect_token(SyntaxKind::GreaterThanToken);
        alloc_vec_in(self.arena, parameters)
    }

    fn parse_type_arguments(&mut self) -> &'a [TypeNode<'a>] {
        if !self.optional_token(SyntaxKind::LessThanToken) {
            return &[];
        }
        let mut arguments = Vec::new();
        while self.token() != SyntaxKind::GreaterThanToken && self.token() != SyntaxKind::EndOfFileToken {
            arguments.push(self.parse_type());
            if !self.optional_token(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect_token(SyntaxKind::GreaterThanToken);
        alloc_vec_in(self.arena, arguments)
    }

    fn parse_type_reference(&mut self) -> TypeReferenceNode<'a> {
        let start = self.token_pos();
        let type_name = self.parse_entity_name();
        let type_arguments = if self.token() == SyntaxKind::LessThanToken
            && !self.scanner.has_preceding_line_break()
        {
            self.parse_type_arguments()
        } else {
            &[]
        };
        TypeReferenceNode {
            span: self.span_from(start),
            type_name,
            type_arguments,
        }
    }

    // ========================================================================
    // Type members
    // ========================================================================

    fn parse_type_members(&mut self) -> &'a [TypeElement<'a>] {
        self.expect_token(SyntaxKind::OpenBraceToken);
        let mut members = Vec::new();
        while self.token() != SyntaxKind::CloseBraceToken && self.token() != SyntaxKind::EndOfFileToken {
            let saved_pos = self.scanner.token_start();
            members.push(self.parse_type_member());
            if !self.optional_token(SyntaxKind::SemicolonToken) {
                self.optional_token(SyntaxKind::CommaToken);
            }
            if self.scanner.token_start() == saved_pos {
                self.error(&messages::UNEXPECTED_TOKEN, &[]);
                self.next_token();
            }
        }
        self.expect_token(SyntaxKind::CloseBraceToken);
        alloc_vec_in(self.arena, members)
    }

    fn is_index_signature(&mut self) -> bool {
        self.scanner.look_ahead(|s| {
            let name = s.scan();
            if name != SyntaxKind::Identifier && !name.is_keyword() {
                return false;
            }
            s.scan() == SyntaxKind::ColonToken
        })
    }

    fn parse_index_signature(&mut self, start: u32, modifiers: ModifierFlags) -> IndexSignatureDeclaration<'a> {
        self.expect_token(SyntaxKind::OpenBracketToken);
        let parameter_name = self.parse_identifier_name();
        let parameter_type = if self.optional_token(SyntaxKind::ColonToken) {
            Some(self.parse_type_and_alloc())
        } else {
            None
        };
        self.expect_token(SyntaxKind::CloseBracketToken);
        let type_annotation = if self.optional_token(SyntaxKind::ColonToken) {
            Some(self.parse_type_and_alloc())
        } else {
            None
        };
        IndexSignatureDeclaration {
            span: self.span_from(start),
            modifiers,
            parameter_name,
            parameter_type,
            type_annotation,
        }
    }

    fn parse_type_member(&mut self) -> TypeElement<'a> {
        let start = self.token_pos();

        // Call and construct signatures.
        if matches!(self.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken)
            || (self.token() == SyntaxKind::NewKeyword
                && matches!(self.peek(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken))
        {
            self.optional_token(SyntaxKind::NewKeyword);
            self.parse_signature();
            return TypeElement::Other(self.span_from(start));
        }

        let mut modifiers = ModifierFlags::NONE;
        if self.token() == SyntaxKind::ReadonlyKeyword && is_property_name_start(self.peek()) {
            self.next_token();
            modifiers |= ModifierFlags::READONLY;
        }

        if self.token() == SyntaxKind::OpenBracketToken && self.is_index_signature() {
            return TypeElement::IndexSignature(self.parse_index_signature(start, modifiers));
        }

        // Accessor signatures: a getter reads as a property.
        if matches!(self.token(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword)
            && is_property_name_start(self.peek())
        {
            let is_get = self.token() == SyntaxKind::GetKeyword;
            self.next_token();
            let name = self.parse_property_name();
            let (_, _, return_type) = self.parse_signature();
            if !is_get {
                return TypeElement::Other(self.span_from(start));
            }
            return TypeElement::Property(PropertySignature {
                span: self.span_from(start),
                modifiers: modifiers | ModifierFlags::READONLY,
                name,
                question: false,
                type_annotation: return_type,
            });
        }

        let name = self.parse_property_name();
        let question = self.optional_token(SyntaxKind::QuestionToken);

        if matches!(self.token(), SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken) {
            let (type_parameters, parameters, return_type) = self.parse_signature();
            return TypeElement::Method(MethodSignature {
                span: self.span_from(start),
                name,
                question,
                type_parameters,
                parameters,
                return_type,
            });
        }

        let type_annotation = if self.optional_token(SyntaxKind::ColonToken) {
            Some(self.parse_type_and_alloc())
        } else {
            None
        };
        TypeElement::Property(PropertySignature {
            span: self.span_from(start),
            modifiers,
            name,
            question,
            type_annotation,
        })
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn parse_type_and_alloc(&mut self) -> &'a TypeNode<'a> {
        let ty = self.parse_type();
        self.arena.alloc(ty)
    }

    fn any_type(&self, start: u32) -> TypeNode<'a> {
        TypeNode::Keyword(KeywordTypeNode {
            span: TextSpan::new(start, 0),
            kind: SyntaxKind::AnyKeyword,
        })
    }

    fn parse_type(&mut self) -> TypeNode<'a> {
        let start = self.token_pos();
        if !self.enter() {
            self.skip_expression(&[
                SyntaxKind::CommaToken,
                SyntaxKind::SemicolonToken,
                SyntaxKind::GreaterThanToken,
            ]);
            return self.any_type(start);
        }
        let result = self.parse_type_worker(start);
        self.leave();
        result
    }

    fn parse_type_worker(&mut self, start: u32) -> TypeNode<'a> {
        if self.is_start_of_function_type() {
            return self.parse_function_type(start);
        }

        let saved = self.disallow_conditional;
        self.disallow_conditional = false;
        let check_type = self.parse_union_type();
        self.disallow_conditional = saved;

        if !self.disallow_conditional
            && self.token() == SyntaxKind::ExtendsKeyword
            && !self.scanner.has_preceding_line_break()
        {
            self.next_token();
            self.disallow_conditional = true;
            let extends_type = self.parse_type_and_alloc();
            self.disallow_conditional = saved;
            self.expect_token(SyntaxKind::QuestionToken);
            let true_type = self.parse_type_and_alloc();
            self.expect_token(SyntaxKind::ColonToken);
            let false_type = self.parse_type_and_alloc();
            return TypeNode::Conditional(ConditionalTypeNode {
                span: self.span_from(start),
                check_type: self.arena.alloc(check_type),
                extends_type,
                true_type,
                false_type,
            });
        }
        check_type
    }

    /// Return types additionally allow `x is T` and `asserts x`.
    fn parse_return_type(&mut self) -> &'a TypeNode<'a> {
        let start = self.token_pos();
        let is_predicate = self.scanner.look_ahead(|s| {
            let first = s.token();
            let second = s.scan();
            let asserts = first == SyntaxKind::AssertsKeyword
                && (second == SyntaxKind::Identifier || second == SyntaxKind::ThisKeyword)
                && !s.has_preceding_line_break();
            let is = (first == SyntaxKind::Identifier
                || first == SyntaxKind::ThisKeyword
                || first.is_contextual_keyword())
                && second == SyntaxKind::IsKeyword
                && !s.has_preceding_line_break();
            asserts || is
        });
        if is_predicate {
            self.next_token();
            if self.token() != SyntaxKind::IsKeyword {
                self.next_token();
            }
            if self.optional_token(SyntaxKind::IsKeyword) {
                self.parse_type();
            }
            return self.arena.alloc(TypeNode::TypePredicate(self.span_from(start)));
        }
        self.parse_type_and_alloc()
    }

    fn is_start_of_function_type(&mut self) -> bool {
        match self.token() {
            SyntaxKind::LessThanToken | SyntaxKind::NewKeyword => true,
            SyntaxKind::AbstractKeyword => self.peek() == SyntaxKind::NewKeyword,
            SyntaxKind::OpenParenToken => self.scanner.look_ahead(|s| {
                let mut depth = 0u32;
                let mut tok = s.token();
                loop {
                    match tok {
                        SyntaxKind::OpenParenToken => depth += 1,
                        SyntaxKind::CloseParenToken => {
                            depth -= 1;
                            if depth == 0 {
                                return s.scan() == SyntaxKind::EqualsGreaterThanToken;
                            }
                        }
                        SyntaxKind::EndOfFileToken => return false,
                        _ => {}
                    }
                    tok = s.scan();
                }
            }),
            _ => false,
        }
    }

    fn parse_function_type(&mut self, start: u32) -> TypeNode<'a> {
        self.optional_token(SyntaxKind::AbstractKeyword);
        let is_constructor = self.optional_token(SyntaxKind::NewKeyword);
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        self.expect_token(SyntaxKind::EqualsGreaterThanToken);
        let return_type = self.parse_return_type();
        TypeNode::Function(FunctionTypeNode {
            span: self.span_from(start),
            is_constructor,
            type_parameters,
            parameters,
            return_type,
        })
    }

    fn parse_union_type(&mut self) -> TypeNode<'a> {
        let start = self.token_pos();
        self.optional_token(SyntaxKind::BarToken);
        let first = self.parse_intersection_type();
        if self.token() != SyntaxKind::BarToken {
            return first;
        }
        let mut types = vec![first];
        while self.optional_token(SyntaxKind::BarToken) {
            types.push(self.parse_intersection_type());
        }
        TypeNode::Union(UnionTypeNode {
            span: self.span_from(start),
            types: alloc_vec_in(self.arena, types),
        })
    }

    fn parse_intersection_type(&mut self) -> TypeNode<'a> {
        let start = self.token_pos();
        self.optional_token(SyntaxKind::AmpersandToken);
        let first = self.parse_type_operator();
        if self.token() != SyntaxKind::AmpersandToken {
            return first;
        }
        let mut types = vec![first];
        while self.optional_token(SyntaxKind::AmpersandToken) {
            types.push(self.parse_type_operator());
        }
        TypeNode::Intersection(IntersectionTypeNode {
            span: self.span_from(start),
            types: alloc_vec_in(self.arena, types),
        })
    }

    fn parse_type_operator(&mut self) -> TypeNode<'a> {
        let start = self.token_pos();
        match self.token() {
            SyntaxKind::KeyOfKeyword | SyntaxKind::UniqueKeyword | SyntaxKind::ReadonlyKeyword => {
                let operator = self.token();
                self.next_token();
                if !self.enter() {
                    return self.any_type(start);
                }
                let operand = self.parse_type_operator();
                self.leave();
                TypeNode::TypeOperator(TypeOperatorNode {
                    span: self.span_from(start),
                    operator,
                    type_node: self.arena.alloc(operand),
                })
            }
            SyntaxKind::InferKeyword => {
                self.next_token();
                let name = self.parse_identifier();
                if self.disallow_conditional && self.token() == SyntaxKind::ExtendsKeyword {
                    self.next_token();
                    self.parse_type();
                }
                TypeNode::Infer(InferTypeNode { span: self.span_from(start), name })
            }
            _ => self.parse_postfix_type(),
        }
    }

    fn parse_postfix_type(&mut self) -> TypeNode<'a> {
        let start = self.token_pos();
        let mut ty = self.parse_non_array_type();
        while self.token() == SyntaxKind::OpenBracketToken && !self.scanner.has_preceding_line_break() {
            self.next_token();
            if self.optional_token(SyntaxKind::CloseBracketToken) {
                ty = TypeNode::Array(ArrayTypeNode {
                    span: self.span_from(start),
                    element_type: self.arena.alloc(ty),
                });
            } else {
                let index_type = self.parse_type_and_alloc();
                self.expect_token(SyntaxKind::CloseBracketToken);
                ty = TypeNode::IndexedAccess(IndexedAccessTypeNode {
                    span: self.span_from(start),
                    object_type: self.arena.alloc(ty),
                    index_type,
                });
            }
        }
        ty
    }

    fn parse_non_array_type(&mut self) -> TypeNode<'a> {
        let start = self.token_pos();
        match self.token() {
            kind if kind.is_type_keyword() && self.peek() != SyntaxKind::DotToken => {
                self.next_token();
                TypeNode::Keyword(KeywordTypeNode { span: self.span_from(start), kind })
            }
            SyntaxKind::ThisKeyword => {
                self.next_token();
                TypeNode::This(self.span_from(start))
            }
            SyntaxKind::StringLiteral => {
                let text = self.alloc_token_text();
                self.next_token();
                self.literal_type(start, LiteralValue::String(text))
            }
            SyntaxKind::NumericLiteral => {
                let value = numeric_literal_value(self.token_value());
                self.next_token();
                self.literal_type(start, LiteralValue::Number(value))
            }
            SyntaxKind::BigIntLiteral => {
                let text = self.alloc_token_text();
                self.next_token();
                self.literal_type(start, LiteralValue::BigInt(text))
            }
            SyntaxKind::MinusToken => {
                self.next_token();
                match self.token() {
                    SyntaxKind::NumericLiteral => {
                        let value = numeric_literal_value(self.token_value());
                        self.next_token();
                        self.literal_type(start, LiteralValue::Number(-value))
                    }
                    SyntaxKind::BigIntLiteral => {
                        let text = self.arena.alloc_str(&format!("-{}", self.token_value()));
                        self.next_token();
                        self.literal_type(start, LiteralValue::BigInt(text))
                    }
                    _ => {
                        self.error(&messages::TYPE_EXPECTED, &[]);
                        self.any_type(start)
                    }
                }
            }
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let value = self.token() == SyntaxKind::TrueKeyword;
                self.next_token();
                self.literal_type(start, LiteralValue::Boolean(value))
            }
            SyntaxKind::TemplateLiteral => {
                self.next_token();
                TypeNode::TemplateLiteral(self.span_from(start))
            }
            SyntaxKind::OpenBraceToken => {
                if self.is_mapped_type_start() {
                    self.parse_mapped_type(start)
                } else {
                    let members = self.parse_type_members();
                    TypeNode::TypeLiteral(TypeLiteralNode { span: self.span_from(start), members })
                }
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(start),
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let inner = self.parse_type();
                self.expect_token(SyntaxKind::CloseParenToken);
                inner
            }
            SyntaxKind::TypeOfKeyword => {
                self.next_token();
                let expr_name = self.parse_entity_name();
                if self.token() == SyntaxKind::LessThanToken && !self.scanner.has_preceding_line_break() {
                    self.parse_type_arguments();
                }
                TypeNode::TypeQuery(TypeQueryNode { span: self.span_from(start), expr_name })
            }
            SyntaxKind::ImportKeyword => {
                // `import("mod").Name<Args>` resolves by its local name.
                self.next_token();
                if self.token() == SyntaxKind::OpenParenToken {
                    self.skip_balanced();
                }
                if self.optional_token(SyntaxKind::DotToken) {
                    TypeNode::TypeReference(self.parse_type_reference())
                } else {
                    self.any_type(start)
                }
            }
            _ if self.is_identifier() || self.token().is_type_keyword() => {
                TypeNode::TypeReference(self.parse_type_reference())
            }
            _ => {
                self.error(&messages::TYPE_EXPECTED, &[]);
                self.any_type(start)
            }
        }
    }

    fn literal_type(&self, start: u32, literal: LiteralValue<'a>) -> TypeNode<'a> {
        TypeNode::Literal(LiteralTypeNode { span: self.span_from(start), literal })
    }

    fn parse_tuple_type(&mut self, start: u32) -> TypeNode<'a> {
        self.expect_token(SyntaxKind::OpenBracketToken);
        let mut elements = Vec::new();
        while self.token() != SyntaxKind::CloseBracketToken && self.token() != SyntaxKind::EndOfFileToken {
            let element_start = self.token_pos();
            let rest = self.optional_token(SyntaxKind::DotDotDotToken);
            let is_named = (self.is_identifier() || self.token().is_keyword())
                && self.scanner.look_ahead(|s| match s.scan() {
                    SyntaxKind::ColonToken => true,
                    SyntaxKind::QuestionToken => s.scan() == SyntaxKind::ColonToken,
                    _ => false,
                });

            let (name, mut optional) = if is_named {
                let name = self.parse_identifier_name();
                let optional = self.optional_token(SyntaxKind::QuestionToken);
                self.expect_token(SyntaxKind::ColonToken);
                (Some(name), optional)
            } else {
                (None, false)
            };
            let type_node = self.parse_type_and_alloc();
            if !is_named && self.optional_token(SyntaxKind::QuestionToken) {
                optional = true;
            }
            elements.push(TupleElement {
                span: self.span_from(element_start),
                name,
                optional,
                rest,
                type_node,
            });
            if !self.optional_token(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseBracketToken);
        TypeNode::Tuple(TupleTypeNode {
            span: self.span_from(start),
            elements: alloc_vec_in(self.arena, elements),
        })
    }

    fn is_mapped_type_start(&mut self) -> bool {
        self.scanner.look_ahead(|s| {
            let mut tok = s.scan();
            if tok == SyntaxKind::PlusToken || tok == SyntaxKind::MinusToken {
                tok = s.scan();
                if tok != SyntaxKind::ReadonlyKeyword {
                    return false;
                }
            }
            if tok == SyntaxKind::ReadonlyKeyword {
                tok = s.scan();
            }
            if tok != SyntaxKind::OpenBracketToken {
                return false;
            }
            let name = s.scan();
            (name == SyntaxKind::Identifier || name.is_keyword()) && s.scan() == SyntaxKind::InKeyword
        })
    }

    fn parse_mapped_type(&mut self, start: u32) -> TypeNode<'a> {
        self.expect_token(SyntaxKind::OpenBraceToken);
        if matches!(self.token(), SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
            self.next_token();
        }
        self.optional_token(SyntaxKind::ReadonlyKeyword);
        self.expect_token(SyntaxKind::OpenBracketToken);
        let type_parameter = self.parse_identifier_name();
        self.expect_token(SyntaxKind::InKeyword);
        let constraint = self.parse_type_and_alloc();
        if self.token() == SyntaxKind::Identifier && self.token_value() == "as" {
            self.next_token();
            self.parse_type();
        }
        self.expect_token(SyntaxKind::CloseBracketToken);
        if matches!(self.token(), SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
            self.next_token();
        }
        self.optional_token(SyntaxKind::QuestionToken);
        let type_node = if self.optional_token(SyntaxKind::ColonToken) {
            Some(self.parse_type_and_alloc())
        } else {
            None
        };
        self.parse_optional_semicolon();
        self.expect_token(SyntaxKind::CloseBraceToken);
        TypeNode::Mapped(MappedTypeNode {
            span: self.span_from(start),
            type_parameter,
            constraint,
            type_node,
        })
    }
}
