//! The TypeScript scanner.
//!
//! Converts source text into the token stream consumed by the declaration
//! parser. Positions are character offsets.

use crate::char_codes::*;
use crate::token::TokenInfo;
use typegen_ast::syntax_kind::SyntaxKind;
use typegen_ast::types::TokenFlags;
use typegen_core::text::TextSpan;
use typegen_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};

/// Saved scanner state for lookahead.
pub struct ScannerState {
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    prev_token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
    diagnostic_count: usize,
}

/// The scanner converts TypeScript source text into tokens.
pub struct Scanner {
    text: Vec<char>,
    pos: usize,
    /// Start of the current token (after leading trivia).
    token_start: usize,
    token: SyntaxKind,
    /// Decides whether a `/` starts a regular expression.
    prev_token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
    /// Diagnostics carry spans but no file; the parser fills that in.
    diagnostics: DiagnosticCollection,
}

impl Scanner {
    pub fn new(text: &str) -> Self {
        let mut scanner = Self {
            text: text.chars().collect(),
            pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            prev_token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: TokenFlags::NONE,
            diagnostics: DiagnosticCollection::new(),
        };
        scanner.skip_shebang();
        scanner
    }

    fn skip_shebang(&mut self) {
        if self.text.len() >= 2 && self.text[0] == '#' && self.text[1] == '!' {
            self.pos = 2;
            while !self.is_eof() && !is_line_break(self.text[self.pos]) {
                self.pos += 1;
            }
        }
    }

    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    /// Look ahead: save state, call f, restore state and return the result.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Identifier text, or the decoded value of a literal.
    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    #[inline]
    pub fn token_end(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn token_span(&self) -> TextSpan {
        TextSpan::from_bounds(self.token_start as u32, self.pos as u32)
    }

    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn token_info(&self) -> TokenInfo {
        TokenInfo {
            kind: self.token,
            span: self.token_span(),
            text: self.token_value.clone(),
            flags: self.token_flags,
        }
    }

    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
            prev_token: self.prev_token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            diagnostic_count: self.diagnostics.len(),
        }
    }

    /// Restore a saved state, dropping diagnostics reported since.
    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.token_start = state.token_start;
        self.token = state.token;
        self.prev_token = state.prev_token;
        self.token_value = state.token_value;
        self.token_flags = state.token_flags;
        if self.diagnostics.len() > state.diagnostic_count {
            let mut kept = DiagnosticCollection::new();
            for d in std::mem::take(&mut self.diagnostics)
                .into_diagnostics()
                .into_iter()
                .take(state.diagnostic_count)
            {
                kept.add(d);
            }
            self.diagnostics = kept;
        }
    }

    /// Source text between two character offsets.
    pub fn get_text_slice(&self, start: usize, end: usize) -> String {
        let s = start.min(self.text.len());
        let e = end.min(self.text.len());
        self.text[s..e].iter().collect()
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text.get(self.pos).copied()
    }

    #[inline]
    fn char_at(&self, offset: usize) -> Option<char> {
        self.text.get(self.pos + offset).copied()
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn error(&mut self, message: &DiagnosticMessage, start: usize) {
        let mut diagnostic = Diagnostic::new(message, &[]);
        diagnostic.span = Some(TextSpan::from_bounds(start as u32, self.pos.max(start) as u32));
        self.diagnostics.add(diagnostic);
    }

    /// Skip whitespace and comments, setting the line-break flag.
    fn skip_trivia(&mut self) {
        loop {
            if self.is_eof() {
                return;
            }
            let ch = self.text[self.pos];
            match ch {
                c if is_line_break(c) => {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.pos += 1;
                }
                c if is_white_space_single_line(c) => {
                    self.pos += 1;
                }
                '/' if self.char_at(1) == Some('/') => {
                    self.pos += 2;
                    while !self.is_eof() && !is_line_break(self.text[self.pos]) {
                        self.pos += 1;
                    }
                }
                '/' if self.char_at(1) == Some('*') => {
                    let start = self.pos;
                    self.pos += 2;
                    let mut closed = false;
                    while !self.is_eof() {
                        if self.text[self.pos] == '*' && self.char_at(1) == Some('/') {
                            self.pos += 2;
                            closed = true;
                            break;
                        }
                        if is_line_break(self.text[self.pos]) {
                            self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                        }
                        self.pos += 1;
                    }
                    if !closed {
                        self.error(&messages::ASTERISK_SLASH_EXPECTED, start);
                    }
                }
                _ => return,
            }
        }
    }

    /// Scan the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::Unknown {
            self.prev_token = self.token;
        }
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();

        self.skip_trivia();
        self.token_start = self.pos;

        if self.is_eof() {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        }

        let ch = self.text[self.pos];
        self.token = match ch {
            '(' => self.single(SyntaxKind::OpenParenToken),
            ')' => self.single(SyntaxKind::CloseParenToken),
            '{' => self.single(SyntaxKind::OpenBraceToken),
            '}' => self.single(SyntaxKind::CloseBraceToken),
            '[' => self.single(SyntaxKind::OpenBracketToken),
            ']' => self.single(SyntaxKind::CloseBracketToken),
            ';' => self.single(SyntaxKind::SemicolonToken),
            ',' => self.single(SyntaxKind::CommaToken),
            ':' => self.single(SyntaxKind::ColonToken),
            '@' => self.single(SyntaxKind::AtToken),
            // Nested `>>` is never merged; type argument lists rely on it.
            '>' => self.single(SyntaxKind::GreaterThanToken),
            '~' => self.single(SyntaxKind::OtherPunctuation),

            '.' => self.scan_dot(),
            '?' => self.scan_question(),
            '<' => self.scan_operator(SyntaxKind::LessThanToken, &["<<=", "<<", "<="]),
            '=' => self.scan_operator(SyntaxKind::EqualsToken, &["===", "==", "=>"]),
            '!' => self.scan_operator(SyntaxKind::ExclamationToken, &["!==", "!="]),
            '+' => self.scan_operator(SyntaxKind::PlusToken, &["++", "+="]),
            '-' => self.scan_operator(SyntaxKind::MinusToken, &["--", "-="]),
            '*' => self.scan_operator(SyntaxKind::AsteriskToken, &["**=", "**", "*="]),
            '&' => self.scan_operator(SyntaxKind::AmpersandToken, &["&&=", "&&", "&="]),
            '|' => self.scan_operator(SyntaxKind::BarToken, &["||=", "||", "|="]),
            '%' | '^' => self.scan_operator(SyntaxKind::OtherPunctuation, &["%=", "^="]),
            '/' => self.scan_slash(),
            '#' => self.scan_private_identifier(),

            '\'' | '"' => self.scan_string_literal(ch),
            '`' => self.scan_template_literal(),

            '0'..='9' => self.scan_number(),

            _ if is_identifier_start(ch) => self.scan_identifier(),

            _ => {
                let start = self.pos;
                self.pos += 1;
                self.error(&messages::INVALID_CHARACTER, start);
                SyntaxKind::Unknown
            }
        };

        self.token
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    #[inline]
    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    fn matches_at_pos(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| self.char_at(i) == Some(c))
    }

    /// Consume the longest listed operator, or fall back to a single char.
    fn scan_operator(&mut self, single: SyntaxKind, longer: &[&str]) -> SyntaxKind {
        for op in longer {
            if self.matches_at_pos(op) {
                self.pos += op.chars().count();
                return if *op == "=>" {
                    SyntaxKind::EqualsGreaterThanToken
                } else {
                    SyntaxKind::OtherPunctuation
                };
            }
        }
        self.pos += 1;
        single
    }

    fn scan_dot(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('.') && self.char_at(2) == Some('.') {
            self.pos += 3;
            SyntaxKind::DotDotDotToken
        } else if self.char_at(1).is_some_and(is_digit) {
            self.scan_number()
        } else {
            self.pos += 1;
            SyntaxKind::DotToken
        }
    }

    fn scan_question(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('?') {
            self.pos += if self.char_at(2) == Some('=') { 3 } else { 2 };
            SyntaxKind::OtherPunctuation
        } else if self.char_at(1) == Some('.') && !self.char_at(2).is_some_and(is_digit) {
            self.pos += 2;
            SyntaxKind::OtherPunctuation
        } else {
            self.pos += 1;
            SyntaxKind::QuestionToken
        }
    }

    /// A `/` after something that ends an expression is division.
    fn scan_slash(&mut self) -> SyntaxKind {
        let after_operand = matches!(
            self.prev_token,
            SyntaxKind::Identifier
                | SyntaxKind::PrivateIdentifier
                | SyntaxKind::NumericLiteral
                | SyntaxKind::BigIntLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::TemplateLiteral
                | SyntaxKind::RegularExpressionLiteral
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::ThisKeyword
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
                | SyntaxKind::NullKeyword
        ) || self.prev_token.is_contextual_keyword();

        if after_operand {
            return self.scan_operator(SyntaxKind::SlashToken, &["/="]);
        }
        self.scan_regular_expression()
    }

    fn scan_regular_expression(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        let mut in_character_class = false;
        loop {
            let Some(ch) = self.current_char() else {
                break;
            };
            if is_line_break(ch) {
                break;
            }
            self.pos += 1;
            match ch {
                '\\' => {
                    if self.current_char().is_some_and(|c| !is_line_break(c)) {
                        self.pos += 1;
                    }
                }
                '[' => in_character_class = true,
                ']' => in_character_class = false,
                '/' if !in_character_class => {
                    while self.current_char().is_some_and(is_identifier_part) {
                        self.pos += 1;
                    }
                    break;
                }
                _ => {}
            }
        }
        self.token_value = self.get_text_slice(start, self.pos);
        SyntaxKind::RegularExpressionLiteral
    }

    fn scan_private_identifier(&mut self) -> SyntaxKind {
        if self.char_at(1).is_some_and(is_identifier_start) {
            let start = self.pos;
            self.pos += 2;
            while self.current_char().is_some_and(is_identifier_part) {
                self.pos += 1;
            }
            self.token_value = self.get_text_slice(start, self.pos);
            return SyntaxKind::PrivateIdentifier;
        }
        let start = self.pos;
        self.pos += 1;
        self.error(&messages::INVALID_CHARACTER, start);
        SyntaxKind::Unknown
    }

    fn scan_string_literal(&mut self, quote: char) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        let mut result = String::new();
        loop {
            let Some(ch) = self.current_char() else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_STRING_LITERAL, start);
                break;
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if is_line_break(ch) {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(&messages::UNTERMINATED_STRING_LITERAL, start);
                break;
            }
            if ch == '\\' {
                self.pos += 1;
                self.scan_escape(&mut result);
                continue;
            }
            result.push(ch);
            self.pos += 1;
        }
        self.token_value = result;
        SyntaxKind::StringLiteral
    }

    /// Decode one escape sequence; `pos` is just past the backslash.
    fn scan_escape(&mut self, out: &mut String) {
        let Some(ch) = self.current_char() else {
            return;
        };
        self.pos += 1;
        match ch {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            '0' if !self.current_char().is_some_and(is_digit) => out.push('\0'),
            'x' => {
                if let Some(c) = self.scan_hex_escape(2) {
                    out.push(c);
                }
            }
            'u' => {
                if self.current_char() == Some('{') {
                    self.pos += 1;
                    let start = self.pos;
                    while self.current_char().is_some_and(|c| c.is_ascii_hexdigit()) {
                        self.pos += 1;
                    }
                    let digits = self.get_text_slice(start, self.pos);
                    if self.current_char() == Some('}') {
                        self.pos += 1;
                    }
                    if let Some(c) = u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                        out.push(c);
                    }
                } else if let Some(c) = self.scan_hex_escape(4) {
                    out.push(c);
                }
            }
            // Line continuation.
            '\r' => {
                if self.current_char() == Some('\n') {
                    self.pos += 1;
                }
            }
            c if is_line_break(c) => {}
            c => out.push(c),
        }
    }

    fn scan_hex_escape(&mut self, count: usize) -> Option<char> {
        let start = self.pos;
        for _ in 0..count {
            if !self.current_char().is_some_and(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            self.pos += 1;
        }
        let digits = self.get_text_slice(start, self.pos);
        u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
    }

    /// Scan a whole template literal, substitutions included, as one token.
    /// The token value is the raw text between the backticks.
    fn scan_template_literal(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        if !self.skip_template_body() {
            self.token_flags |= TokenFlags::UNTERMINATED;
            self.error(&messages::UNTERMINATED_TEMPLATE_LITERAL, start);
            self.token_value = self.get_text_slice(start + 1, self.pos);
        } else {
            self.token_value = self.get_text_slice(start + 1, self.pos - 1);
        }
        SyntaxKind::TemplateLiteral
    }

    /// Advance past the closing backtick. Returns false at end of input.
    fn skip_template_body(&mut self) -> bool {
        while let Some(ch) = self.current_char() {
            self.pos += 1;
            match ch {
                '`' => return true,
                '\\' => {
                    if !self.is_eof() {
                        self.pos += 1;
                    }
                }
                '$' if self.current_char() == Some('{') => {
                    self.pos += 1;
                    if !self.skip_template_substitution() {
                        return false;
                    }
                }
                _ => {}
            }
        }
        false
    }

    /// Advance past the `}` closing a `${` substitution.
    fn skip_template_substitution(&mut self) -> bool {
        let mut depth = 0usize;
        while let Some(ch) = self.current_char() {
            self.pos += 1;
            match ch {
                '{' => depth += 1,
                '}' if depth == 0 => return true,
                '}' => depth -= 1,
                '`' => {
                    if !self.skip_template_body() {
                        return false;
                    }
                }
                '\'' | '"' => {
                    while let Some(c) = self.current_char() {
                        if is_line_break(c) {
                            break;
                        }
                        self.pos += 1;
                        if c == '\\' {
                            self.pos += 1;
                        } else if c == ch {
                            break;
                        }
                    }
                }
                _ => {}
            }
        }
        false
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;

        if self.text[self.pos] == '0' {
            let radix_flag = match self.char_at(1) {
                Some('x') | Some('X') => Some(TokenFlags::HEX_SPECIFIER),
                Some('b') | Some('B') => Some(TokenFlags::BINARY_SPECIFIER),
                Some('o') | Some('O') => Some(TokenFlags::OCTAL_SPECIFIER),
                _ => None,
            };
            if let Some(flag) = radix_flag {
                self.pos += 2;
                self.token_flags |= flag;
                while self.current_char().is_some_and(|c| c.is_ascii_hexdigit() || c == '_') {
                    self.pos += 1;
                }
                return self.finish_number(start);
            }
        }

        self.scan_digits();
        if self.current_char() == Some('.') {
            self.pos += 1;
            self.scan_digits();
        }
        if let Some('e') | Some('E') = self.current_char() {
            self.pos += 1;
            self.token_flags |= TokenFlags::SCIENTIFIC;
            if let Some('+') | Some('-') = self.current_char() {
                self.pos += 1;
            }
            self.scan_digits();
        }
        self.finish_number(start)
    }

    fn finish_number(&mut self, start: usize) -> SyntaxKind {
        if self.current_char() == Some('n') {
            self.token_value = self.get_text_slice(start, self.pos);
            self.pos += 1;
            return SyntaxKind::BigIntLiteral;
        }
        self.token_value = self.get_text_slice(start, self.pos);
        SyntaxKind::NumericLiteral
    }

    fn scan_digits(&mut self) {
        while self.current_char().is_some_and(|c| is_digit(c) || c == '_') {
            self.pos += 1;
        }
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        while self.current_char().is_some_and(is_identifier_part) {
            self.pos += 1;
        }
        self.token_value = self.get_text_slice(start, self.pos);
        SyntaxKind::from_keyword(&self.token_value).unwrap_or(SyntaxKind::Identifier)
    }
}

/// The value of a numeric literal's source text (`0x1F`, `1_000`, `1e3`).
pub fn numeric_literal_value(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    let radix = if lower.starts_with("0x") {
        Some(16)
    } else if lower.starts_with("0b") {
        Some(2)
    } else if lower.starts_with("0o") {
        Some(8)
    } else {
        None
    };
    match radix {
        Some(radix) => u64::from_str_radix(&lower[2..], radix)
            .map(|v| v as f64)
            .unwrap_or(f64::NAN),
        None => lower.parse::<f64>().unwrap_or(f64::NAN),
    }
}
