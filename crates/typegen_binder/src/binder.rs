//! The binder implementation.
//!
//! Walks parsed source files and lowers every type-carrying declaration into
//! the [`TypeTable`] and the global declaration table. Handles:
//! - Type parameter scoping (declaration, method and function-type level)
//! - Constructor parameter properties
//! - `#private` members
//! - Overload signatures (the first declaration is kept)
//! - Interface declaration merging
//! - Enum member values

use crate::host::BoundProgram;
use crate::symbol::*;
use crate::types::*;
use typegen_ast::node::{self as ast, ClassElement, Statement, TypeElement, TypeNode};
use typegen_ast::{ModifierFlags, SyntaxKind};
use typegen_core::intern::StringInterner;
use typegen_core::text::TextSpan;
use typegen_diagnostics::{messages, Diagnostic, DiagnosticCollection};

/// The binder lowers declarations and links names.
pub struct Binder {
    interner: StringInterner,
    types: TypeTable,
    declarations: Vec<Declaration>,
    globals: SymbolTable,
    diagnostics: DiagnosticCollection,
    /// Type parameter names in scope, innermost last.
    type_parameter_scopes: Vec<Vec<String>>,
    /// The file currently being bound.
    file_name: String,
}

impl Binder {
    pub fn new() -> Self {
        Self::with_interner(StringInterner::new())
    }

    pub fn with_interner(interner: StringInterner) -> Self {
        Self {
            interner,
            types: TypeTable::new(),
            declarations: Vec::new(),
            globals: SymbolTable::new(),
            diagnostics: DiagnosticCollection::new(),
            type_parameter_scopes: Vec::new(),
            file_name: String::new(),
        }
    }

    /// Take diagnostics from the binder.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    /// Finish binding and hand the tables over to schema extraction.
    pub fn finish(self) -> BoundProgram {
        tracing::debug!(
            declarations = self.declarations.len(),
            types = self.types.len(),
            "binding finished"
        );
        BoundProgram {
            interner: self.interner,
            types: self.types,
            declarations: self.declarations,
            globals: self.globals,
        }
    }

    // ========================================================================
    // Source file binding
    // ========================================================================

    /// Bind a source file, declaring every named type it contains.
    pub fn bind_source_file(&mut self, source_file: &ast::SourceFile<'_>) {
        self.file_name = source_file.file_name.clone();
        let before = self.declarations.len();

        for statement in source_file.statements.iter() {
            self.bind_statement(statement);
        }

        tracing::debug!(
            file = %self.file_name,
            declared = self.declarations.len() - before,
            "bound source file"
        );
    }

    fn bind_statement(&mut self, statement: &Statement<'_>) {
        match statement {
            Statement::Interface(decl) => self.bind_interface(decl),
            Statement::TypeAlias(decl) => self.bind_type_alias(decl),
            Statement::Class(decl) => self.bind_class(decl),
            Statement::Enum(decl) => self.bind_enum(decl),
            Statement::Skipped(_) => {}
        }
    }

    fn bind_interface(&mut self, decl: &ast::InterfaceDeclaration<'_>) {
        let type_parameters = self.enter_type_parameters(decl.type_parameters);
        let shape = self.lower_type_elements(decl.members);
        let heritage = decl
            .extends
            .iter()
            .map(|reference| self.lower_type_reference(reference))
            .collect();
        self.leave_type_parameters();

        let mut declaration = self.new_declaration(decl.name.text, DeclarationKind::Interface, decl.span);
        declaration.modifiers = decl.modifiers;
        declaration.type_parameters = type_parameters;
        declaration.members = shape.members;
        declaration.index = shape.index;
        declaration.heritage = heritage;
        self.declare(declaration);
    }

    fn bind_type_alias(&mut self, decl: &ast::TypeAliasDeclaration<'_>) {
        let type_parameters = self.enter_type_parameters(decl.type_parameters);
        let aliased = self.lower_type(decl.type_node);
        self.leave_type_parameters();

        let mut declaration = self.new_declaration(decl.name.text, DeclarationKind::TypeAlias, decl.span);
        declaration.modifiers = decl.modifiers;
        declaration.type_parameters = type_parameters;
        declaration.aliased = Some(aliased);
        self.declare(declaration);
    }

    fn bind_class(&mut self, decl: &ast::ClassDeclaration<'_>) {
        let Some(name) = decl.name else {
            tracing::debug!(file = %self.file_name, "skipping anonymous class");
            return;
        };

        let type_parameters = self.enter_type_parameters(decl.type_parameters);
        let heritage = decl
            .extends
            .map(|reference| self.lower_type_reference(reference))
            .into_iter()
            .collect();
        let (members, index, constructor) = self.bind_class_members(decl.members);
        self.leave_type_parameters();

        let mut declaration = self.new_declaration(name.text, DeclarationKind::Class, decl.span);
        declaration.modifiers = decl.modifiers;
        declaration.type_parameters = type_parameters;
        declaration.members = members;
        declaration.index = index;
        declaration.heritage = heritage;
        declaration.constructor = constructor;
        declaration.decorators = lower_decorators(decl.decorators);
        self.declare(declaration);
    }

    fn bind_enum(&mut self, decl: &ast::EnumDeclaration<'_>) {
        let mut enum_members = Vec::with_capacity(decl.members.len());
        let mut next = Some(0.0);

        for member in decl.members.iter() {
            let Some(name) = member.name.text() else { continue };
            let value = match member.initializer {
                None => next.map(LiteralValue::Number),
                Some(ast::EnumInitializer::Number(n)) => Some(LiteralValue::Number(n)),
                Some(ast::EnumInitializer::String(s)) => Some(LiteralValue::String(s.to_string())),
                Some(ast::EnumInitializer::Other) => None,
            };
            next = match value {
                Some(LiteralValue::Number(n)) => Some(n + 1.0),
                _ => None,
            };
            enum_members.push(EnumMember { name: name.to_string(), value });
        }

        let mut declaration = self.new_declaration(decl.name.text, DeclarationKind::Enum, decl.span);
        declaration.modifiers = decl.modifiers;
        declaration.enum_members = enum_members;
        self.declare(declaration);
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn new_declaration(&self, name: &str, kind: DeclarationKind, span: TextSpan) -> Declaration {
        Declaration {
            id: DeclId(u32::MAX),
            name: self.interner.intern(name),
            name_text: name.to_string(),
            kind,
            modifiers: ModifierFlags::NONE,
            type_parameters: Vec::new(),
            members: Vec::new(),
            index: None,
            heritage: Vec::new(),
            aliased: None,
            constructor: None,
            enum_members: Vec::new(),
            decorators: Vec::new(),
            file: self.file_name.clone(),
            span,
        }
    }

    /// Add a declaration to the global table, merging repeated interfaces.
    fn declare(&mut self, mut declaration: Declaration) {
        if let Some(existing) = self.globals.get(&declaration.name) {
            let previous = &mut self.declarations[existing.index()];
            if previous.kind == DeclarationKind::Interface
                && declaration.kind == DeclarationKind::Interface
            {
                for member in declaration.members {
                    if previous.member(&member.name).is_none() {
                        previous.members.push(member);
                    }
                }
                previous.heritage.extend(declaration.heritage);
                if previous.index.is_none() {
                    previous.index = declaration.index;
                }
                self.diagnostics.add(Diagnostic::with_location(
                    declaration.file,
                    declaration.span,
                    &messages::INTERFACE_0_MERGED,
                    &[&declaration.name_text],
                ));
                return;
            }

            tracing::warn!(name = %declaration.name_text, "duplicate declaration ignored");
            self.diagnostics.add(Diagnostic::with_location(
                declaration.file,
                declaration.span,
                &messages::DUPLICATE_IDENTIFIER_0,
                &[&declaration.name_text],
            ));
            return;
        }

        let id = DeclId(self.declarations.len() as u32);
        declaration.id = id;
        tracing::trace!(name = %declaration.name_text, kind = declaration.kind.describe(), "declared");
        self.globals.set(declaration.name, id);
        self.declarations.push(declaration);
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn bind_class_members(
        &mut self,
        elements: &[ClassElement<'_>],
    ) -> (Vec<Member>, Option<IndexInfo>, Option<Signature>) {
        let mut members: Vec<Member> = Vec::new();
        let mut index = None;
        let mut constructor = None;

        let seen = |members: &[Member], name: &str, modifiers: ModifierFlags| {
            let is_static = modifiers.contains(ModifierFlags::STATIC);
            members.iter().any(|m| m.name == name && m.is_static() == is_static)
        };

        for element in elements {
            match element {
                ClassElement::Property(prop) => {
                    let Some(name) = prop.name.text() else { continue };
                    let modifiers = member_modifiers(&prop.name, prop.modifiers);
                    if seen(&members, name, modifiers) {
                        continue;
                    }
                    let type_id = self.lower_annotation(prop.type_annotation);
                    members.push(Member {
                        name: name.to_string(),
                        kind: MemberKind::Property { type_id, optional: prop.question },
                        modifiers,
                        decorators: lower_decorators(prop.decorators),
                        span: prop.span,
                    });
                }
                ClassElement::Method(method) => {
                    let Some(name) = method.name.text() else { continue };
                    let modifiers = member_modifiers(&method.name, method.modifiers);
                    // Overloads: keep the first signature.
                    if seen(&members, name, modifiers) {
                        continue;
                    }
                    let signature = self.lower_signature(
                        method.type_parameters,
                        method.parameters,
                        method.return_type,
                        method.span,
                    );
                    members.push(Member {
                        name: name.to_string(),
                        kind: MemberKind::Method(signature),
                        modifiers,
                        decorators: lower_decorators(method.decorators),
                        span: method.span,
                    });
                }
                ClassElement::Constructor(ctor) => {
                    if constructor.is_some() {
                        continue;
                    }
                    let signature = self.lower_signature(&[], ctor.parameters, None, ctor.span);
                    for param in &signature.parameters {
                        if !param.modifiers.intersects(ModifierFlags::PARAMETER_PROPERTY_MODIFIER) {
                            continue;
                        }
                        let Some(name) = &param.name else { continue };
                        members.push(Member {
                            name: name.clone(),
                            kind: MemberKind::Property {
                                type_id: param.type_id.unwrap_or(self.types.any_type),
                                optional: param.question,
                            },
                            modifiers: param.modifiers,
                            decorators: Vec::new(),
                            span: param.span,
                        });
                    }
                    constructor = Some(signature);
                }
                ClassElement::GetAccessor(accessor) => {
                    let Some(name) = accessor.name.text() else { continue };
                    let modifiers = member_modifiers(&accessor.name, accessor.modifiers);
                    if seen(&members, name, modifiers) {
                        continue;
                    }
                    let type_id = self.lower_annotation(accessor.return_type);
                    members.push(Member {
                        name: name.to_string(),
                        kind: MemberKind::Property { type_id, optional: false },
                        modifiers: modifiers | ModifierFlags::READONLY,
                        decorators: lower_decorators(accessor.decorators),
                        span: accessor.span,
                    });
                }
                ClassElement::SetAccessor(accessor) => {
                    let Some(name) = accessor.name.text() else { continue };
                    let modifiers = member_modifiers(&accessor.name, accessor.modifiers);
                    let is_static = modifiers.contains(ModifierFlags::STATIC);
                    if let Some(getter) = members
                        .iter_mut()
                        .find(|m| m.name == name && m.is_static() == is_static)
                    {
                        getter.modifiers.remove(ModifierFlags::READONLY);
                        continue;
                    }
                    let type_id = self.lower_annotation(
                        accessor.parameters.first().and_then(|p| p.type_annotation),
                    );
                    members.push(Member {
                        name: name.to_string(),
                        kind: MemberKind::Property { type_id, optional: false },
                        modifiers,
                        decorators: lower_decorators(accessor.decorators),
                        span: accessor.span,
                    });
                }
                ClassElement::IndexSignature(sig) => {
                    if !sig.modifiers.contains(ModifierFlags::STATIC) {
                        index = Some(self.lower_index_signature(sig));
                    }
                }
                ClassElement::Skipped(_) => {}
            }
        }

        (members, index, constructor)
    }

    fn lower_type_elements(&mut self, elements: &[TypeElement<'_>]) -> ObjectShape {
        let mut shape = ObjectShape::default();

        for element in elements {
            match element {
                TypeElement::Property(prop) => {
                    let Some(name) = prop.name.text() else { continue };
                    if shape.members.iter().any(|m| m.name == name) {
                        continue;
                    }
                    let type_id = self.lower_annotation(prop.type_annotation);
                    shape.members.push(Member {
                        name: name.to_string(),
                        kind: MemberKind::Property { type_id, optional: prop.question },
                        modifiers: prop.modifiers,
                        decorators: Vec::new(),
                        span: prop.span,
                    });
                }
                TypeElement::Method(method) => {
                    let Some(name) = method.name.text() else { continue };
                    if shape.members.iter().any(|m| m.name == name) {
                        continue;
                    }
                    let signature = self.lower_signature(
                        method.type_parameters,
                        method.parameters,
                        method.return_type,
                        method.span,
                    );
                    shape.members.push(Member {
                        name: name.to_string(),
                        kind: MemberKind::Method(signature),
                        modifiers: ModifierFlags::NONE,
                        decorators: Vec::new(),
                        span: method.span,
                    });
                }
                TypeElement::IndexSignature(sig) => {
                    shape.index = Some(self.lower_index_signature(sig));
                }
                TypeElement::Other(_) => {}
            }
        }

        shape
    }

    fn lower_index_signature(&mut self, sig: &ast::IndexSignatureDeclaration<'_>) -> IndexInfo {
        let key_type = match sig.parameter_type {
            Some(node) => self.lower_type(node),
            None => self.types.string_type,
        };
        IndexInfo {
            key_type,
            value_type: self.lower_annotation(sig.type_annotation),
            readonly: sig.modifiers.contains(ModifierFlags::READONLY),
        }
    }

    fn lower_signature(
        &mut self,
        type_parameters: &[ast::TypeParameterDeclaration<'_>],
        parameters: &[ast::ParameterDeclaration<'_>],
        return_type: Option<&TypeNode<'_>>,
        span: TextSpan,
    ) -> Signature {
        let type_parameters = self.enter_type_parameters(type_parameters);
        let parameters = parameters
            .iter()
            .filter(|p| !p.is_this_parameter())
            .map(|p| Parameter {
                name: p.name_text().map(str::to_string),
                type_id: p.type_annotation.map(|node| self.lower_type(node)),
                question: p.question,
                has_initializer: p.has_initializer,
                rest: p.dot_dot_dot,
                modifiers: p.modifiers,
                span: p.span,
            })
            .collect();
        let return_type = return_type.map(|node| self.lower_type(node));
        self.leave_type_parameters();

        Signature {
            type_parameters,
            parameters,
            return_type,
            span,
        }
    }

    // ========================================================================
    // Type parameters
    // ========================================================================

    /// Open a type parameter scope. Names are in scope for their own
    /// constraints and defaults.
    fn enter_type_parameters(
        &mut self,
        declarations: &[ast::TypeParameterDeclaration<'_>],
    ) -> Vec<TypeParameter> {
        self.type_parameter_scopes
            .push(declarations.iter().map(|d| d.name.text.to_string()).collect());

        declarations
            .iter()
            .map(|d| TypeParameter {
                name: d.name.text.to_string(),
                constraint: d.constraint.map(|node| self.lower_type(node)),
                default: d.default.map(|node| self.lower_type(node)),
            })
            .collect()
    }

    fn leave_type_parameters(&mut self) {
        self.type_parameter_scopes.pop();
    }

    fn is_type_parameter(&self, name: &str) -> bool {
        self.type_parameter_scopes
            .iter()
            .rev()
            .any(|scope| scope.iter().any(|n| n == name))
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn lower_annotation(&mut self, annotation: Option<&TypeNode<'_>>) -> TypeId {
        match annotation {
            Some(node) => self.lower_type(node),
            None => self.types.any_type,
        }
    }

    pub(crate) fn lower_type(&mut self, node: &TypeNode<'_>) -> TypeId {
        match node {
            TypeNode::Keyword(keyword) => self.keyword_type(keyword.kind),
            TypeNode::Literal(literal) => {
                let value = match literal.literal {
                    ast::LiteralValue::String(s) => LiteralValue::String(s.to_string()),
                    ast::LiteralValue::Number(n) => LiteralValue::Number(n),
                    ast::LiteralValue::BigInt(digits) => LiteralValue::BigInt(digits.to_string()),
                    ast::LiteralValue::Boolean(b) => LiteralValue::Boolean(b),
                };
                self.types.add(TypeKind::Literal(value))
            }
            TypeNode::Array(array) => {
                let element = self.lower_type(array.element_type);
                self.types.add(TypeKind::Array { element, readonly: false })
            }
            TypeNode::Tuple(tuple) => {
                let elements = tuple
                    .elements
                    .iter()
                    .map(|e| TupleElement {
                        type_id: self.lower_type(e.type_node),
                        optional: e.optional,
                        rest: e.rest,
                    })
                    .collect();
                self.types.add(TypeKind::Tuple { elements })
            }
            TypeNode::Union(union) => {
                let types = union.types.iter().map(|t| self.lower_type(t)).collect();
                self.types.add(TypeKind::Union { types })
            }
            TypeNode::Intersection(intersection) => {
                let types = intersection.types.iter().map(|t| self.lower_type(t)).collect();
                self.types.add(TypeKind::Intersection { types })
            }
            TypeNode::TypeLiteral(literal) => {
                let shape = self.lower_type_elements(literal.members);
                self.types.add(TypeKind::TypeLiteral(shape))
            }
            TypeNode::TypeReference(reference) => self.lower_type_reference(reference),
            TypeNode::Function(function) => {
                if function.is_constructor {
                    return self.types.add(TypeKind::Unsupported("constructor type"));
                }
                let signature = self.lower_signature(
                    function.type_parameters,
                    function.parameters,
                    Some(function.return_type),
                    function.span,
                );
                self.types.add(TypeKind::Function(signature))
            }
            TypeNode::TypeOperator(op) => {
                let inner = self.lower_type(op.type_node);
                match op.operator {
                    SyntaxKind::ReadonlyKeyword => {
                        let element = match self.types.get(inner) {
                            TypeKind::Array { element, .. } => Some(*element),
                            _ => None,
                        };
                        match element {
                            Some(element) => self.types.add(TypeKind::Array { element, readonly: true }),
                            None => inner,
                        }
                    }
                    SyntaxKind::KeyOfKeyword => self.types.add(TypeKind::KeyOf(inner)),
                    SyntaxKind::UniqueKeyword => self.types.symbol_type,
                    _ => self.types.add(TypeKind::Unsupported("type operator")),
                }
            }
            TypeNode::IndexedAccess(_) => self.types.add(TypeKind::Unsupported("indexed access type")),
            TypeNode::Conditional(_) => self.types.add(TypeKind::Unsupported("conditional type")),
            TypeNode::Mapped(_) => self.types.add(TypeKind::Unsupported("mapped type")),
            TypeNode::TypeQuery(_) => self.types.add(TypeKind::Unsupported("type query")),
            TypeNode::This(_) => self.types.add(TypeKind::Unsupported("this type")),
            TypeNode::Infer(_) => self.types.add(TypeKind::Unsupported("infer type")),
            // Every template literal type is a string.
            TypeNode::TemplateLiteral(_) => self.types.string_type,
            TypeNode::TypePredicate(_) => self.types.boolean_type,
        }
    }

    fn lower_type_reference(&mut self, reference: &ast::TypeReferenceNode<'_>) -> TypeId {
        let name = reference.type_name.text;
        if reference.type_arguments.is_empty() && self.is_type_parameter(name) {
            return self.types.add(TypeKind::TypeParameter { name: name.to_string() });
        }
        let type_arguments = reference
            .type_arguments
            .iter()
            .map(|t| self.lower_type(t))
            .collect();
        self.types.add(TypeKind::Reference {
            name: name.to_string(),
            type_arguments,
        })
    }

    fn keyword_type(&self, kind: SyntaxKind) -> TypeId {
        let intrinsic = match kind {
            SyntaxKind::AnyKeyword => IntrinsicKind::Any,
            SyntaxKind::StringKeyword => IntrinsicKind::String,
            SyntaxKind::NumberKeyword => IntrinsicKind::Number,
            SyntaxKind::BooleanKeyword => IntrinsicKind::Boolean,
            SyntaxKind::VoidKeyword => IntrinsicKind::Void,
            SyntaxKind::UndefinedKeyword => IntrinsicKind::Undefined,
            SyntaxKind::NullKeyword => IntrinsicKind::Null,
            SyntaxKind::NeverKeyword => IntrinsicKind::Never,
            SyntaxKind::BigIntKeyword => IntrinsicKind::BigInt,
            SyntaxKind::SymbolKeyword => IntrinsicKind::Symbol,
            SyntaxKind::ObjectKeyword => IntrinsicKind::Object,
            _ => IntrinsicKind::Unknown,
        };
        self.types.intrinsic(intrinsic)
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

/// `#name` members are private regardless of modifiers.
fn member_modifiers(name: &ast::PropertyName<'_>, modifiers: ModifierFlags) -> ModifierFlags {
    if name.is_private_identifier() {
        modifiers | ModifierFlags::PRIVATE
    } else {
        modifiers
    }
}

fn lower_decorators(decorators: &[ast::Decorator<'_>]) -> Vec<DecoratorInfo> {
    decorators
        .iter()
        .map(|d| DecoratorInfo {
            name: d.name.text.to_string(),
            arguments: d.arguments.iter().map(lower_decorator_argument).collect(),
        })
        .collect()
}

fn lower_decorator_argument(argument: &ast::DecoratorArgument<'_>) -> DecoratorValue {
    match argument {
        ast::DecoratorArgument::String(s) => DecoratorValue::String(s.to_string()),
        ast::DecoratorArgument::Number(n) => DecoratorValue::Number(*n),
        ast::DecoratorArgument::Boolean(b) => DecoratorValue::Boolean(*b),
        ast::DecoratorArgument::Object(props) => DecoratorValue::Object(
            props
                .iter()
                .map(|p| (p.name.to_string(), lower_decorator_argument(&p.value)))
                .collect(),
        ),
        ast::DecoratorArgument::Array(items) => {
            DecoratorValue::Array(items.iter().map(lower_decorator_argument).collect())
        }
        ast::DecoratorArgument::Other(_) => DecoratorValue::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::TypeHost;
    use bumpalo::Bump;

    fn bind(sources: &[(&str, &str)]) -> (BoundProgram, DiagnosticCollection) {
        let mut binder = Binder::new();
        for (file_name, text) in sources {
            let arena = Bump::new();
            let (source_file, _) = typegen_parser::parse_source_file(&arena, file_name, text);
            binder.bind_source_file(&source_file);
        }
        let diagnostics = binder.take_diagnostics();
        (binder.finish(), diagnostics)
    }

    #[test]
    fn test_bind_interface_members() {
        let (program, diags) = bind(&[(
            "a.ts",
            "export interface Forecast { city: string; days?: number; readonly tags: string[]; describe(): string }",
        )]);
        assert!(diags.is_empty());
        let decl = program.declaration_named("Forecast").unwrap();
        assert_eq!(decl.kind, DeclarationKind::Interface);
        let names: Vec<_> = decl.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["city", "days", "tags", "describe"]);
        assert!(matches!(decl.members[1].kind, MemberKind::Property { optional: true, .. }));
        assert!(decl.members[3].is_method());
    }

    #[test]
    fn test_type_parameters_are_scoped() {
        let (program, _) = bind(&[("a.ts", "interface Box<T> { value: T; other: U }")]);
        let decl = program.declaration_named("Box").unwrap();
        let type_of = |i: usize| match decl.members[i].kind {
            MemberKind::Property { type_id, .. } => program.type_kind(type_id),
            _ => unreachable!(),
        };
        assert!(matches!(type_of(0), TypeKind::TypeParameter { name } if name == "T"));
        assert!(matches!(type_of(1), TypeKind::Reference { name, .. } if name == "U"));
    }

    #[test]
    fn test_class_visibility_and_parameter_properties() {
        let (program, _) = bind(&[(
            "a.ts",
            r#"
            class Agent {
                #cache: string;
                private secretKey: string;
                static count: number;
                constructor(public readonly name: string, private token: string, plain: number) {}
                run(this: Agent, input: string): void {}
            }
            "#,
        )]);
        let decl = program.declaration_named("Agent").unwrap();
        let visible: Vec<_> = decl
            .members
            .iter()
            .filter(|m| m.is_public() && !m.is_static())
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(visible, vec!["name", "run"]);

        let ctor = decl.constructor.as_ref().unwrap();
        assert_eq!(ctor.parameters.len(), 3);
        assert!(ctor.parameters[1].is_private());
        assert!(!ctor.parameters[2].is_private());

        let MemberKind::Method(run) = &decl.member("run").unwrap().kind else { panic!() };
        assert_eq!(run.parameters.len(), 1);
        assert_eq!(run.parameters[0].name.as_deref(), Some("input"));
    }

    #[test]
    fn test_overloads_keep_first_signature() {
        let (program, _) = bind(&[(
            "a.ts",
            "class A { f(x: string): string; f(x: number): number; f(x: any): any { return x; } }",
        )]);
        let decl = program.declaration_named("A").unwrap();
        assert_eq!(decl.members.len(), 1);
        let MemberKind::Method(sig) = &decl.members[0].kind else { panic!() };
        let param_type = sig.parameters[0].type_id.unwrap();
        assert!(matches!(program.type_kind(param_type), TypeKind::Intrinsic(IntrinsicKind::String)));
    }

    #[test]
    fn test_interface_merging_across_files() {
        let (program, diags) = bind(&[
            ("a.ts", "interface Settings { a: string }"),
            ("b.ts", "interface Settings { b: number; a: string }"),
        ]);
        let decl = program.declaration_named("Settings").unwrap();
        assert_eq!(decl.members.len(), 2);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.diagnostics()[0].code, messages::INTERFACE_0_MERGED.code);
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_duplicate_declaration_reports_error() {
        let (program, diags) = bind(&[("a.ts", "type Id = string; class Id {}")]);
        assert_eq!(program.declaration_named("Id").unwrap().kind, DeclarationKind::TypeAlias);
        assert!(diags.has_errors());
        assert_eq!(diags.diagnostics()[0].file.as_deref(), Some("a.ts"));
    }

    #[test]
    fn test_enum_values() {
        let (program, _) = bind(&[(
            "a.ts",
            r#"enum Level { Low, Mid = 5, High, Named = "n", Computed = 1 << 2 }"#,
        )]);
        let decl = program.declaration_named("Level").unwrap();
        let values: Vec<_> = decl.enum_members.iter().map(|m| m.value.clone()).collect();
        assert_eq!(
            values,
            vec![
                Some(LiteralValue::Number(0.0)),
                Some(LiteralValue::Number(5.0)),
                Some(LiteralValue::Number(6.0)),
                Some(LiteralValue::String("n".to_string())),
                None,
            ]
        );
    }

    #[test]
    fn test_class_decorators_are_detached() {
        let (program, _) = bind(&[(
            "a.ts",
            r#"
            @agent({ mode: "ephemeral" })
            @description("Reports the weather")
            class WeatherAgent {
                @prompt("Ask for a city")
                forecast(city: string): Promise<string> { return fetch(city); }
            }
            "#,
        )]);
        let decl = program.declaration_named("WeatherAgent").unwrap();
        let agent = decl.decorator("agent").unwrap();
        assert_eq!(agent.option("mode").and_then(DecoratorValue::as_str), Some("ephemeral"));
        assert_eq!(
            decl.decorator("description").and_then(DecoratorInfo::string_argument),
            Some("Reports the weather")
        );
        let method = decl.member("forecast").unwrap();
        assert_eq!(
            method.decorator("prompt").and_then(DecoratorInfo::string_argument),
            Some("Ask for a city")
        );
    }

    #[test]
    fn test_readonly_array_and_accessors() {
        let (program, _) = bind(&[(
            "a.ts",
            "class C { get size(): number { return 1; } get label(): string { return ''; } set label(v: string) {} list: readonly string[]; }",
        )]);
        let decl = program.declaration_named("C").unwrap();
        assert!(decl.member("size").unwrap().modifiers.contains(ModifierFlags::READONLY));
        assert!(!decl.member("label").unwrap().modifiers.contains(ModifierFlags::READONLY));
        let MemberKind::Property { type_id, .. } = decl.member("list").unwrap().kind else { panic!() };
        assert!(matches!(program.type_kind(type_id), TypeKind::Array { readonly: true, .. }));
    }

    #[test]
    fn test_resolve_qualified_name() {
        let (program, _) = bind(&[("a.ts", "interface Inner { x: number }")]);
        assert!(program.resolve_name("ns.Inner").is_some());
        assert!(program.resolve_name("Missing").is_none());
    }
}
