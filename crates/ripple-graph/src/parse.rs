//! Parse adapter over the oxc parser.
//!
//! ripple consumes the parser, it does not own one: `parse_source` runs
//! oxc_parser and lowers the typed AST into the per-file [`AstArena`]. Each
//! consumed node kind has an explicit lowering arm declaring which child
//! slots it exposes; kinds outside the subset become [`NodeKind::Other`]
//! nodes whose children are still walked. TypeScript type positions
//! (annotations, type arguments, `as`/`satisfies` wrappers) are either
//! skipped or lowered transparently, so they never produce references.
//!
//! `.vue` files are handled by slicing out the `<script>` block and padding
//! it with blank lines, which keeps every span aligned with the original
//! file's line numbers.

use std::borrow::Cow;
use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arena::{AstArena, Field, NodeId, NodeKind};
use crate::span::LineTable;

/// Source flavor derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
    Vue,
    Unknown,
}

impl SourceKind {
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "js" | "mjs" | "cjs" => Self::JavaScript,
            "ts" | "mts" | "cts" => Self::TypeScript,
            "jsx" => Self::Jsx,
            "tsx" => Self::Tsx,
            "vue" => Self::Vue,
            _ => Self::Unknown,
        }
    }

    pub fn from_path(path: &str) -> Self {
        Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(Self::Unknown, Self::from_extension)
    }

    /// Returns true if the file participates in scope-graph analysis.
    pub fn is_analyzable(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// True for `.d.ts` / `.d.mts` / `.d.cts` declaration files, which carry no
/// runtime exports and are excluded from cross-file resolution.
pub fn is_declaration_file(path: &str) -> bool {
    path.ends_with(".d.ts") || path.ends_with(".d.mts") || path.ends_with(".d.cts")
}

/// Malformed source. The file is excluded from the run's graph and surfaced
/// as a per-file diagnostic, never a fatal error.
#[derive(Debug, Clone, Error)]
#[error("parse failed: {message}")]
pub struct ParseError {
    pub message: String,
}

/// Parse `source` and lower it into a fresh arena.
pub fn parse_source(source: &str, file_path: &str) -> Result<AstArena, ParseError> {
    let kind = SourceKind::from_path(file_path);
    let (text, source_type): (Cow<'_, str>, SourceType) = match kind {
        SourceKind::Vue => {
            let script = extract_vue_script(source).ok_or_else(|| ParseError {
                message: "no <script> block".to_string(),
            })?;
            let source_type = if script.typescript {
                SourceType::ts()
            } else {
                SourceType::mjs()
            };
            (Cow::Owned(script.text), source_type)
        }
        SourceKind::JavaScript => (Cow::Borrowed(source), SourceType::mjs()),
        SourceKind::TypeScript => (Cow::Borrowed(source), SourceType::ts()),
        SourceKind::Jsx => (Cow::Borrowed(source), SourceType::jsx()),
        SourceKind::Tsx => (Cow::Borrowed(source), SourceType::tsx()),
        SourceKind::Unknown => {
            return Err(ParseError {
                message: format!("unsupported file type: {file_path}"),
            });
        }
    };

    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, &text, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "parser panicked".to_string());
        return Err(ParseError { message });
    }

    let mut lowerer = Lowerer {
        arena: AstArena::new(),
        lines: LineTable::new(&text),
        source: &text,
    };
    lowerer.program(&ret.program);
    Ok(lowerer.arena)
}

/// Extracted `<script>` block of a Vue single-file component.
#[derive(Debug)]
struct VueScript {
    /// Script content padded with leading blank lines so spans keep the
    /// original file's line numbers.
    text: String,
    typescript: bool,
}

fn extract_vue_script(source: &str) -> Option<VueScript> {
    let mut search_from = 0;
    let open = loop {
        let idx = source[search_from..].find("<script")? + search_from;
        let after = source.as_bytes().get(idx + 7).copied();
        match after {
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') => break idx,
            _ => search_from = idx + 7,
        }
    };
    let tag_end = source[open..].find('>')? + open;
    let attrs = &source[open + 7..tag_end];
    let typescript = attrs.contains("lang") && attrs.contains("ts");
    let close = source[tag_end..].find("</script>")? + tag_end;
    let content = &source[tag_end + 1..close];
    let leading_lines = source[..=tag_end].matches('\n').count();
    let mut text = "\n".repeat(leading_lines);
    text.push_str(content);
    Some(VueScript { text, typescript })
}

struct Lowerer<'s> {
    arena: AstArena,
    lines: LineTable,
    source: &'s str,
}

impl<'s> Lowerer<'s> {
    fn begin(
        &mut self,
        kind: NodeKind,
        name: Option<&str>,
        span: Span,
        parent: Option<NodeId>,
        field: Field,
        index: Option<u32>,
    ) -> NodeId {
        let span = self.lines.span(span.start, span.end);
        self.arena
            .push(kind, name.map(str::to_string), span, parent, field, index)
    }

    fn leaf(
        &mut self,
        kind: NodeKind,
        name: Option<&str>,
        span: Span,
        parent: NodeId,
        field: Field,
        index: Option<u32>,
    ) -> NodeId {
        let id = self.begin(kind, name, span, Some(parent), field, index);
        self.arena.seal(id);
        id
    }

    fn raw(&self, span: Span) -> &'s str {
        &self.source[span.start as usize..span.end as usize]
    }

    fn program(&mut self, program: &ast::Program<'_>) -> NodeId {
        let id = self.begin(NodeKind::Program, None, program.span, None, Field::Root, None);
        for (i, stmt) in program.body.iter().enumerate() {
            self.stmt(stmt, id, Field::Body, Some(i as u32));
        }
        self.arena.seal(id);
        id
    }

    fn stmt(&mut self, stmt: &ast::Statement<'_>, parent: NodeId, field: Field, index: Option<u32>) {
        use ast::Statement as S;
        match stmt {
            S::BlockStatement(b) => {
                self.block(&b.body, b.span, parent, field, index);
            }
            S::ExpressionStatement(s) => {
                let id = self.begin(
                    NodeKind::ExpressionStatement,
                    None,
                    s.span,
                    Some(parent),
                    field,
                    index,
                );
                self.expr(&s.expression, id, Field::Expression, None);
                self.arena.seal(id);
            }
            S::IfStatement(s) => {
                let id = self.begin(NodeKind::IfStatement, None, s.span, Some(parent), field, index);
                self.expr(&s.test, id, Field::Test, None);
                self.stmt(&s.consequent, id, Field::Consequent, None);
                if let Some(alt) = &s.alternate {
                    self.stmt(alt, id, Field::Alternate, None);
                }
                self.arena.seal(id);
            }
            S::ForStatement(s) => {
                let id = self.begin(NodeKind::ForStatement, None, s.span, Some(parent), field, index);
                if let Some(init) = &s.init {
                    match init {
                        ast::ForStatementInit::VariableDeclaration(v) => {
                            self.var_decl(v, id, Field::Init, None);
                        }
                        _ => {
                            if let Some(e) = init.as_expression() {
                                self.expr(e, id, Field::Init, None);
                            }
                        }
                    }
                }
                if let Some(test) = &s.test {
                    self.expr(test, id, Field::Test, None);
                }
                if let Some(update) = &s.update {
                    self.expr(update, id, Field::Update, None);
                }
                self.stmt(&s.body, id, Field::Body, None);
                self.arena.seal(id);
            }
            S::ForInStatement(s) => {
                let id =
                    self.begin(NodeKind::ForInStatement, None, s.span, Some(parent), field, index);
                self.for_left(&s.left, id);
                self.expr(&s.right, id, Field::Right, None);
                self.stmt(&s.body, id, Field::Body, None);
                self.arena.seal(id);
            }
            S::ForOfStatement(s) => {
                let id =
                    self.begin(NodeKind::ForOfStatement, None, s.span, Some(parent), field, index);
                self.for_left(&s.left, id);
                self.expr(&s.right, id, Field::Right, None);
                self.stmt(&s.body, id, Field::Body, None);
                self.arena.seal(id);
            }
            S::WhileStatement(s) => {
                let id =
                    self.begin(NodeKind::WhileStatement, None, s.span, Some(parent), field, index);
                self.expr(&s.test, id, Field::Test, None);
                self.stmt(&s.body, id, Field::Body, None);
                self.arena.seal(id);
            }
            S::DoWhileStatement(s) => {
                let id =
                    self.begin(NodeKind::DoWhileStatement, None, s.span, Some(parent), field, index);
                self.stmt(&s.body, id, Field::Body, None);
                self.expr(&s.test, id, Field::Test, None);
                self.arena.seal(id);
            }
            S::SwitchStatement(s) => {
                let id =
                    self.begin(NodeKind::SwitchStatement, None, s.span, Some(parent), field, index);
                self.expr(&s.discriminant, id, Field::Discriminant, None);
                for (i, case) in s.cases.iter().enumerate() {
                    let case_id = self.begin(
                        NodeKind::SwitchCase,
                        None,
                        case.span,
                        Some(id),
                        Field::Cases,
                        Some(i as u32),
                    );
                    if let Some(test) = &case.test {
                        self.expr(test, case_id, Field::Test, None);
                    }
                    for (j, cons) in case.consequent.iter().enumerate() {
                        self.stmt(cons, case_id, Field::Consequent, Some(j as u32));
                    }
                    self.arena.seal(case_id);
                }
                self.arena.seal(id);
            }
            S::ReturnStatement(s) => {
                let id =
                    self.begin(NodeKind::ReturnStatement, None, s.span, Some(parent), field, index);
                if let Some(arg) = &s.argument {
                    self.expr(arg, id, Field::Argument, None);
                }
                self.arena.seal(id);
            }
            S::ThrowStatement(s) => {
                let id =
                    self.begin(NodeKind::ThrowStatement, None, s.span, Some(parent), field, index);
                self.expr(&s.argument, id, Field::Argument, None);
                self.arena.seal(id);
            }
            S::TryStatement(s) => {
                let id = self.begin(NodeKind::TryStatement, None, s.span, Some(parent), field, index);
                self.block(&s.block.body, s.block.span, id, Field::Block, None);
                if let Some(handler) = &s.handler {
                    let catch_id = self.begin(
                        NodeKind::CatchClause,
                        None,
                        handler.span,
                        Some(id),
                        Field::Handler,
                        None,
                    );
                    if let Some(param) = &handler.param {
                        self.binding_pattern(&param.pattern, catch_id, Field::Param, None);
                    }
                    self.block(&handler.body.body, handler.body.span, catch_id, Field::Body, None);
                    self.arena.seal(catch_id);
                }
                if let Some(fin) = &s.finalizer {
                    self.block(&fin.body, fin.span, id, Field::Finalizer, None);
                }
                self.arena.seal(id);
            }
            S::LabeledStatement(s) => {
                let id =
                    self.begin(NodeKind::LabeledStatement, None, s.span, Some(parent), field, index);
                self.stmt(&s.body, id, Field::Body, None);
                self.arena.seal(id);
            }
            S::VariableDeclaration(d) => {
                self.var_decl(d, parent, field, index);
            }
            S::FunctionDeclaration(f) => {
                self.function(NodeKind::FunctionDeclaration, f, parent, field, index);
            }
            S::ClassDeclaration(c) => {
                self.class(NodeKind::ClassDeclaration, c, parent, field, index);
            }
            S::TSEnumDeclaration(e) => {
                let id =
                    self.begin(NodeKind::TsEnumDeclaration, Some(e.id.name.as_str()), e.span, Some(parent), field, index);
                self.leaf(NodeKind::Identifier, Some(e.id.name.as_str()), e.id.span, id, Field::Id, None);
                self.arena.seal(id);
            }
            S::TSInterfaceDeclaration(i) => {
                let id = self.begin(
                    NodeKind::TsInterfaceDeclaration,
                    Some(i.id.name.as_str()),
                    i.span,
                    Some(parent),
                    field,
                    index,
                );
                self.leaf(NodeKind::Identifier, Some(i.id.name.as_str()), i.id.span, id, Field::Id, None);
                self.arena.seal(id);
            }
            S::TSTypeAliasDeclaration(t) => {
                let id = self.begin(
                    NodeKind::TsTypeAliasDeclaration,
                    Some(t.id.name.as_str()),
                    t.span,
                    Some(parent),
                    field,
                    index,
                );
                self.leaf(NodeKind::Identifier, Some(t.id.name.as_str()), t.id.span, id, Field::Id, None);
                self.arena.seal(id);
            }
            S::ImportDeclaration(d) => {
                self.import_decl(d, parent, field, index);
            }
            S::ExportNamedDeclaration(d) => {
                self.export_named(d, parent, field, index);
            }
            S::ExportDefaultDeclaration(d) => {
                self.export_default(d, parent, field, index);
            }
            S::ExportAllDeclaration(d) => {
                self.export_all(d, parent, field, index);
            }
            other => {
                self.leaf(
                    NodeKind::Other(statement_kind_name(other)),
                    None,
                    other.span(),
                    parent,
                    field,
                    index,
                );
            }
        }
    }

    fn for_left(&mut self, left: &ast::ForStatementLeft<'_>, parent: NodeId) {
        match left {
            ast::ForStatementLeft::VariableDeclaration(v) => {
                self.var_decl(v, parent, Field::Left, None);
            }
            _ => {
                if let Some(target) = left.as_assignment_target() {
                    self.assignment_target(target, parent, Field::Left, None);
                }
            }
        }
    }

    fn block(
        &mut self,
        body: &[ast::Statement<'_>],
        span: Span,
        parent: NodeId,
        field: Field,
        index: Option<u32>,
    ) -> NodeId {
        let id = self.begin(NodeKind::BlockStatement, None, span, Some(parent), field, index);
        for (i, stmt) in body.iter().enumerate() {
            self.stmt(stmt, id, Field::Body, Some(i as u32));
        }
        self.arena.seal(id);
        id
    }

    fn var_decl(
        &mut self,
        d: &ast::VariableDeclaration<'_>,
        parent: NodeId,
        field: Field,
        index: Option<u32>,
    ) -> NodeId {
        let id = self.begin(NodeKind::VariableDeclaration, None, d.span, Some(parent), field, index);
        for (i, dec) in d.declarations.iter().enumerate() {
            let dec_id = self.begin(
                NodeKind::VariableDeclarator,
                None,
                dec.span,
                Some(id),
                Field::Declarations,
                Some(i as u32),
            );
            self.binding_pattern(&dec.id, dec_id, Field::Id, None);
            if let Some(init) = &dec.init {
                self.expr(init, dec_id, Field::Init, None);
            }
            self.arena.seal(dec_id);
        }
        self.arena.seal(id);
        id
    }

    fn binding_pattern(
        &mut self,
        pattern: &ast::BindingPattern<'_>,
        parent: NodeId,
        field: Field,
        index: Option<u32>,
    ) {
        use ast::BindingPatternKind as K;
        match &pattern.kind {
            K::BindingIdentifier(b) => {
                self.leaf(NodeKind::Identifier, Some(b.name.as_str()), b.span, parent, field, index);
            }
            K::ObjectPattern(op) => {
                let id = self.begin(NodeKind::ObjectPattern, None, op.span, Some(parent), field, index);
                for (i, prop) in op.properties.iter().enumerate() {
                    let prop_id = self.begin(
                        NodeKind::Property {
                            computed: prop.computed,
                        },
                        None,
                        prop.span,
                        Some(id),
                        Field::Properties,
                        Some(i as u32),
                    );
                    self.property_key(&prop.key, prop_id, Field::Key);
                    self.binding_pattern(&prop.value, prop_id, Field::Value, None);
                    self.arena.seal(prop_id);
                }
                if let Some(rest) = &op.rest {
                    let rest_id =
                        self.begin(NodeKind::RestElement, None, rest.span, Some(id), Field::Rest, None);
                    self.binding_pattern(&rest.argument, rest_id, Field::Argument, None);
                    self.arena.seal(rest_id);
                }
                self.arena.seal(id);
            }
            K::ArrayPattern(ap) => {
                let id = self.begin(NodeKind::ArrayPattern, None, ap.span, Some(parent), field, index);
                for (i, element) in ap.elements.iter().enumerate() {
                    if let Some(element) = element {
                        self.binding_pattern(element, id, Field::Elements, Some(i as u32));
                    }
                }
                if let Some(rest) = &ap.rest {
                    let rest_id =
                        self.begin(NodeKind::RestElement, None, rest.span, Some(id), Field::Rest, None);
                    self.binding_pattern(&rest.argument, rest_id, Field::Argument, None);
                    self.arena.seal(rest_id);
                }
                self.arena.seal(id);
            }
            K::AssignmentPattern(asp) => {
                let id =
                    self.begin(NodeKind::AssignmentPattern, None, asp.span, Some(parent), field, index);
                self.binding_pattern(&asp.left, id, Field::Left, None);
                self.expr(&asp.right, id, Field::Right, None);
                self.arena.seal(id);
            }
        }
    }

    fn property_key(&mut self, key: &ast::PropertyKey<'_>, parent: NodeId, field: Field) {
        use ast::PropertyKey as K;
        match key {
            K::StaticIdentifier(n) => {
                self.leaf(NodeKind::Identifier, Some(n.name.as_str()), n.span, parent, field, None);
            }
            K::PrivateIdentifier(p) => {
                self.leaf(NodeKind::PrivateIdentifier, Some(p.name.as_str()), p.span, parent, field, None);
            }
            _ => {
                if let Some(e) = key.as_expression() {
                    self.expr(e, parent, field, None);
                }
            }
        }
    }

    fn function(
        &mut self,
        kind: NodeKind,
        f: &ast::Function<'_>,
        parent: NodeId,
        field: Field,
        index: Option<u32>,
    ) -> NodeId {
        let name = f.id.as_ref().map(|id| id.name.as_str());
        let id = self.begin(kind, name, f.span, Some(parent), field, index);
        if let Some(fn_id) = &f.id {
            self.leaf(NodeKind::Identifier, Some(fn_id.name.as_str()), fn_id.span, id, Field::Id, None);
        }
        self.params(&f.params, id);
        if let Some(body) = &f.body {
            self.block(&body.statements, body.span, id, Field::Body, None);
        }
        self.arena.seal(id);
        id
    }

    fn arrow(
        &mut self,
        f: &ast::ArrowFunctionExpression<'_>,
        parent: NodeId,
        field: Field,
        index: Option<u32>,
    ) -> NodeId {
        let id = self.begin(
            NodeKind::ArrowFunctionExpression,
            None,
            f.span,
            Some(parent),
            field,
            index,
        );
        self.params(&f.params, id);
        self.block(&f.body.statements, f.body.span, id, Field::Body, None);
        self.arena.seal(id);
        id
    }

    fn params(&mut self, params: &ast::FormalParameters<'_>, parent: NodeId) {
        for (i, param) in params.items.iter().enumerate() {
            self.binding_pattern(&param.pattern, parent, Field::Params, Some(i as u32));
        }
        if let Some(rest) = &params.rest {
            let rest_id =
                self.begin(NodeKind::RestElement, None, rest.span, Some(parent), Field::Params, None);
            self.binding_pattern(&rest.argument, rest_id, Field::Argument, None);
            self.arena.seal(rest_id);
        }
    }

    fn class(
        &mut self,
        kind: NodeKind,
        c: &ast::Class<'_>,
        parent: NodeId,
        field: Field,
        index: Option<u32>,
    ) -> NodeId {
        let name = c.id.as_ref().map(|id| id.name.as_str());
        let id = self.begin(kind, name, c.span, Some(parent), field, index);
        if let Some(class_id) = &c.id {
            self.leaf(
                NodeKind::Identifier,
                Some(class_id.name.as_str()),
                class_id.span,
                id,
                Field::Id,
                None,
            );
        }
        if let Some(super_class) = &c.super_class {
            self.expr(super_class, id, Field::SuperClass, None);
        }
        for (i, element) in c.body.body.iter().enumerate() {
            self.class_element(element, id, Some(i as u32));
        }
        self.arena.seal(id);
        id
    }

    fn class_element(&mut self, element: &ast::ClassElement<'_>, parent: NodeId, index: Option<u32>) {
        use ast::ClassElement as E;
        match element {
            E::MethodDefinition(m) => {
                let name = static_key_name(&m.key);
                let id = self.begin(
                    NodeKind::MethodDefinition { computed: m.computed },
                    name,
                    m.span,
                    Some(parent),
                    Field::Body,
                    index,
                );
                self.property_key(&m.key, id, Field::Key);
                self.function(NodeKind::FunctionExpression, &m.value, id, Field::Value, None);
                self.arena.seal(id);
            }
            E::PropertyDefinition(p) => {
                let name = static_key_name(&p.key);
                let id = self.begin(
                    NodeKind::PropertyDefinition { computed: p.computed },
                    name,
                    p.span,
                    Some(parent),
                    Field::Body,
                    index,
                );
                self.property_key(&p.key, id, Field::Key);
                if let Some(value) = &p.value {
                    self.expr(value, id, Field::Value, None);
                }
                self.arena.seal(id);
            }
            E::StaticBlock(s) => {
                let id =
                    self.begin(NodeKind::StaticBlock, None, s.span, Some(parent), Field::Body, index);
                self.block(&s.body, s.span, id, Field::Body, None);
                self.arena.seal(id);
            }
            other => {
                self.leaf(
                    NodeKind::Other("ClassElement"),
                    None,
                    other.span(),
                    parent,
                    Field::Body,
                    index,
                );
            }
        }
    }

    fn expr(&mut self, e: &ast::Expression<'_>, parent: NodeId, field: Field, index: Option<u32>) {
        use ast::Expression as E;
        match e {
            E::Identifier(r) => {
                self.leaf(NodeKind::Identifier, Some(r.name.as_str()), r.span, parent, field, index);
            }
            E::ThisExpression(t) => {
                self.leaf(NodeKind::ThisExpression, None, t.span, parent, field, index);
            }
            E::BooleanLiteral(_)
            | E::NullLiteral(_)
            | E::NumericLiteral(_)
            | E::BigIntLiteral(_)
            | E::RegExpLiteral(_) => {
                let span = e.span();
                let raw = self.raw(span).to_string();
                self.leaf(NodeKind::Literal, Some(&raw), span, parent, field, index);
            }
            E::StringLiteral(s) => {
                self.leaf(NodeKind::Literal, Some(s.value.as_str()), s.span, parent, field, index);
            }
            E::TemplateLiteral(t) => {
                let id =
                    self.begin(NodeKind::TemplateLiteral, None, t.span, Some(parent), field, index);
                for (i, exp) in t.expressions.iter().enumerate() {
                    self.expr(exp, id, Field::Expressions, Some(i as u32));
                }
                self.arena.seal(id);
            }
            E::TaggedTemplateExpression(t) => {
                let id = self.begin(
                    NodeKind::TaggedTemplateExpression,
                    None,
                    t.span,
                    Some(parent),
                    field,
                    index,
                );
                self.expr(&t.tag, id, Field::Tag, None);
                let quasi_id =
                    self.begin(NodeKind::TemplateLiteral, None, t.quasi.span, Some(id), Field::Quasi, None);
                for (i, exp) in t.quasi.expressions.iter().enumerate() {
                    self.expr(exp, quasi_id, Field::Expressions, Some(i as u32));
                }
                self.arena.seal(quasi_id);
                self.arena.seal(id);
            }
            E::ArrayExpression(a) => {
                let id =
                    self.begin(NodeKind::ArrayExpression, None, a.span, Some(parent), field, index);
                for (i, element) in a.elements.iter().enumerate() {
                    match element {
                        ast::ArrayExpressionElement::SpreadElement(s) => {
                            self.spread(s, id, Field::Elements, Some(i as u32));
                        }
                        ast::ArrayExpressionElement::Elision(_) => {}
                        _ => {
                            if let Some(e) = element.as_expression() {
                                self.expr(e, id, Field::Elements, Some(i as u32));
                            }
                        }
                    }
                }
                self.arena.seal(id);
            }
            E::ObjectExpression(o) => {
                let id =
                    self.begin(NodeKind::ObjectExpression, None, o.span, Some(parent), field, index);
                for (i, prop) in o.properties.iter().enumerate() {
                    match prop {
                        ast::ObjectPropertyKind::ObjectProperty(p) => {
                            let prop_id = self.begin(
                                NodeKind::Property { computed: p.computed },
                                None,
                                p.span,
                                Some(id),
                                Field::Properties,
                                Some(i as u32),
                            );
                            self.property_key(&p.key, prop_id, Field::Key);
                            self.expr(&p.value, prop_id, Field::Value, None);
                            self.arena.seal(prop_id);
                        }
                        ast::ObjectPropertyKind::SpreadProperty(s) => {
                            self.spread(s, id, Field::Properties, Some(i as u32));
                        }
                    }
                }
                self.arena.seal(id);
            }
            E::FunctionExpression(f) => {
                self.function(NodeKind::FunctionExpression, f, parent, field, index);
            }
            E::ArrowFunctionExpression(f) => {
                self.arrow(f, parent, field, index);
            }
            E::ClassExpression(c) => {
                self.class(NodeKind::ClassExpression, c, parent, field, index);
            }
            E::CallExpression(c) => {
                self.call(c, parent, field, index);
            }
            E::NewExpression(n) => {
                let id = self.begin(NodeKind::NewExpression, None, n.span, Some(parent), field, index);
                self.expr(&n.callee, id, Field::Callee, None);
                for (i, arg) in n.arguments.iter().enumerate() {
                    self.argument(arg, id, Some(i as u32));
                }
                self.arena.seal(id);
            }
            E::AssignmentExpression(a) => {
                let id = self.begin(
                    NodeKind::AssignmentExpression,
                    None,
                    a.span,
                    Some(parent),
                    field,
                    index,
                );
                self.assignment_target(&a.left, id, Field::Left, None);
                self.expr(&a.right, id, Field::Right, None);
                self.arena.seal(id);
            }
            E::BinaryExpression(b) => {
                let id =
                    self.begin(NodeKind::BinaryExpression, None, b.span, Some(parent), field, index);
                self.expr(&b.left, id, Field::Left, None);
                self.expr(&b.right, id, Field::Right, None);
                self.arena.seal(id);
            }
            E::LogicalExpression(l) => {
                let id =
                    self.begin(NodeKind::LogicalExpression, None, l.span, Some(parent), field, index);
                self.expr(&l.left, id, Field::Left, None);
                self.expr(&l.right, id, Field::Right, None);
                self.arena.seal(id);
            }
            E::UnaryExpression(u) => {
                let id = self.begin(
                    NodeKind::UnaryExpression {
                        delete: u.operator == ast::UnaryOperator::Delete,
                    },
                    None,
                    u.span,
                    Some(parent),
                    field,
                    index,
                );
                self.expr(&u.argument, id, Field::Argument, None);
                self.arena.seal(id);
            }
            E::UpdateExpression(u) => {
                let id =
                    self.begin(NodeKind::UpdateExpression, None, u.span, Some(parent), field, index);
                self.simple_assignment_target(&u.argument, id, Field::Argument, None);
                self.arena.seal(id);
            }
            E::SequenceExpression(s) => {
                let id =
                    self.begin(NodeKind::SequenceExpression, None, s.span, Some(parent), field, index);
                for (i, exp) in s.expressions.iter().enumerate() {
                    self.expr(exp, id, Field::Expressions, Some(i as u32));
                }
                self.arena.seal(id);
            }
            E::ConditionalExpression(c) => {
                let id = self.begin(
                    NodeKind::ConditionalExpression,
                    None,
                    c.span,
                    Some(parent),
                    field,
                    index,
                );
                self.expr(&c.test, id, Field::Test, None);
                self.expr(&c.consequent, id, Field::Consequent, None);
                self.expr(&c.alternate, id, Field::Alternate, None);
                self.arena.seal(id);
            }
            E::AwaitExpression(a) => {
                let id =
                    self.begin(NodeKind::AwaitExpression, None, a.span, Some(parent), field, index);
                self.expr(&a.argument, id, Field::Argument, None);
                self.arena.seal(id);
            }
            E::YieldExpression(y) => {
                let id =
                    self.begin(NodeKind::YieldExpression, None, y.span, Some(parent), field, index);
                if let Some(arg) = &y.argument {
                    self.expr(arg, id, Field::Argument, None);
                }
                self.arena.seal(id);
            }
            E::ComputedMemberExpression(m) => {
                let id = self.begin(
                    NodeKind::MemberExpression { computed: true },
                    None,
                    m.span,
                    Some(parent),
                    field,
                    index,
                );
                self.expr(&m.object, id, Field::Object, None);
                self.expr(&m.expression, id, Field::Property, None);
                self.arena.seal(id);
            }
            E::StaticMemberExpression(m) => {
                let id = self.begin(
                    NodeKind::MemberExpression { computed: false },
                    None,
                    m.span,
                    Some(parent),
                    field,
                    index,
                );
                self.expr(&m.object, id, Field::Object, None);
                self.leaf(
                    NodeKind::Identifier,
                    Some(m.property.name.as_str()),
                    m.property.span,
                    id,
                    Field::Property,
                    None,
                );
                self.arena.seal(id);
            }
            E::PrivateFieldExpression(m) => {
                let id = self.begin(
                    NodeKind::MemberExpression { computed: false },
                    None,
                    m.span,
                    Some(parent),
                    field,
                    index,
                );
                self.expr(&m.object, id, Field::Object, None);
                self.leaf(
                    NodeKind::PrivateIdentifier,
                    Some(m.field.name.as_str()),
                    m.field.span,
                    id,
                    Field::Property,
                    None,
                );
                self.arena.seal(id);
            }
            E::ChainExpression(c) => {
                use ast::ChainElement as CE;
                match &c.expression {
                    CE::CallExpression(call) => {
                        self.call(call, parent, field, index);
                    }
                    CE::ComputedMemberExpression(m) => {
                        let id = self.begin(
                            NodeKind::MemberExpression { computed: true },
                            None,
                            m.span,
                            Some(parent),
                            field,
                            index,
                        );
                        self.expr(&m.object, id, Field::Object, None);
                        self.expr(&m.expression, id, Field::Property, None);
                        self.arena.seal(id);
                    }
                    CE::StaticMemberExpression(m) => {
                        let id = self.begin(
                            NodeKind::MemberExpression { computed: false },
                            None,
                            m.span,
                            Some(parent),
                            field,
                            index,
                        );
                        self.expr(&m.object, id, Field::Object, None);
                        self.leaf(
                            NodeKind::Identifier,
                            Some(m.property.name.as_str()),
                            m.property.span,
                            id,
                            Field::Property,
                            None,
                        );
                        self.arena.seal(id);
                    }
                    other => {
                        self.leaf(
                            NodeKind::Other("ChainExpression"),
                            None,
                            other.span(),
                            parent,
                            field,
                            index,
                        );
                    }
                }
            }
            E::ParenthesizedExpression(p) => {
                self.expr(&p.expression, parent, field, index);
            }
            E::TSAsExpression(t) => {
                self.expr(&t.expression, parent, field, index);
            }
            E::TSSatisfiesExpression(t) => {
                self.expr(&t.expression, parent, field, index);
            }
            E::TSNonNullExpression(t) => {
                self.expr(&t.expression, parent, field, index);
            }
            E::TSTypeAssertion(t) => {
                self.expr(&t.expression, parent, field, index);
            }
            E::TSInstantiationExpression(t) => {
                self.expr(&t.expression, parent, field, index);
            }
            E::JSXElement(el) => {
                self.jsx_element(el, parent, field, index);
            }
            E::JSXFragment(f) => {
                let id = self.begin(NodeKind::JsxFragment, None, f.span, Some(parent), field, index);
                for (i, child) in f.children.iter().enumerate() {
                    self.jsx_child(child, id, Some(i as u32));
                }
                self.arena.seal(id);
            }
            E::ImportExpression(imp) => {
                let id = self.begin(
                    NodeKind::Other("ImportExpression"),
                    None,
                    imp.span,
                    Some(parent),
                    field,
                    index,
                );
                self.expr(&imp.source, id, Field::Source, None);
                self.arena.seal(id);
            }
            other => {
                self.leaf(
                    NodeKind::Other(expression_kind_name(other)),
                    None,
                    other.span(),
                    parent,
                    field,
                    index,
                );
            }
        }
    }

    fn call(
        &mut self,
        c: &ast::CallExpression<'_>,
        parent: NodeId,
        field: Field,
        index: Option<u32>,
    ) -> NodeId {
        let id = self.begin(NodeKind::CallExpression, None, c.span, Some(parent), field, index);
        self.expr(&c.callee, id, Field::Callee, None);
        for (i, arg) in c.arguments.iter().enumerate() {
            self.argument(arg, id, Some(i as u32));
        }
        self.arena.seal(id);
        id
    }

    fn argument(&mut self, arg: &ast::Argument<'_>, parent: NodeId, index: Option<u32>) {
        match arg {
            ast::Argument::SpreadElement(s) => {
                self.spread(s, parent, Field::Arguments, index);
            }
            _ => {
                if let Some(e) = arg.as_expression() {
                    self.expr(e, parent, Field::Arguments, index);
                }
            }
        }
    }

    fn spread(
        &mut self,
        s: &ast::SpreadElement<'_>,
        parent: NodeId,
        field: Field,
        index: Option<u32>,
    ) {
        let id = self.begin(NodeKind::SpreadElement, None, s.span, Some(parent), field, index);
        self.expr(&s.argument, id, Field::Argument, None);
        self.arena.seal(id);
    }

    fn assignment_target(
        &mut self,
        target: &ast::AssignmentTarget<'_>,
        parent: NodeId,
        field: Field,
        index: Option<u32>,
    ) {
        use ast::AssignmentTarget as T;
        match target {
            T::AssignmentTargetIdentifier(id_ref) => {
                self.leaf(
                    NodeKind::Identifier,
                    Some(id_ref.name.as_str()),
                    id_ref.span,
                    parent,
                    field,
                    index,
                );
            }
            T::ComputedMemberExpression(m) => {
                let id = self.begin(
                    NodeKind::MemberExpression { computed: true },
                    None,
                    m.span,
                    Some(parent),
                    field,
                    index,
                );
                self.expr(&m.object, id, Field::Object, None);
                self.expr(&m.expression, id, Field::Property, None);
                self.arena.seal(id);
            }
            T::StaticMemberExpression(m) => {
                let id = self.begin(
                    NodeKind::MemberExpression { computed: false },
                    None,
                    m.span,
                    Some(parent),
                    field,
                    index,
                );
                self.expr(&m.object, id, Field::Object, None);
                self.leaf(
                    NodeKind::Identifier,
                    Some(m.property.name.as_str()),
                    m.property.span,
                    id,
                    Field::Property,
                    None,
                );
                self.arena.seal(id);
            }
            T::PrivateFieldExpression(m) => {
                let id = self.begin(
                    NodeKind::MemberExpression { computed: false },
                    None,
                    m.span,
                    Some(parent),
                    field,
                    index,
                );
                self.expr(&m.object, id, Field::Object, None);
                self.leaf(
                    NodeKind::PrivateIdentifier,
                    Some(m.field.name.as_str()),
                    m.field.span,
                    id,
                    Field::Property,
                    None,
                );
                self.arena.seal(id);
            }
            T::ArrayAssignmentTarget(a) => {
                let id = self.begin(NodeKind::ArrayPattern, None, a.span, Some(parent), field, index);
                for (i, element) in a.elements.iter().enumerate() {
                    let Some(element) = element else { continue };
                    match element {
                        ast::AssignmentTargetMaybeDefault::AssignmentTargetWithDefault(d) => {
                            let def_id = self.begin(
                                NodeKind::AssignmentPattern,
                                None,
                                d.span,
                                Some(id),
                                Field::Elements,
                                Some(i as u32),
                            );
                            self.assignment_target(&d.binding, def_id, Field::Left, None);
                            self.expr(&d.init, def_id, Field::Right, None);
                            self.arena.seal(def_id);
                        }
                        _ => {
                            if let Some(t) = element.as_assignment_target() {
                                self.assignment_target(t, id, Field::Elements, Some(i as u32));
                            }
                        }
                    }
                }
                if let Some(rest) = &a.rest {
                    let rest_id =
                        self.begin(NodeKind::RestElement, None, rest.span, Some(id), Field::Rest, None);
                    self.assignment_target(&rest.target, rest_id, Field::Argument, None);
                    self.arena.seal(rest_id);
                }
                self.arena.seal(id);
            }
            T::ObjectAssignmentTarget(o) => {
                let id = self.begin(NodeKind::ObjectPattern, None, o.span, Some(parent), field, index);
                for (i, prop) in o.properties.iter().enumerate() {
                    use ast::AssignmentTargetProperty as P;
                    match prop {
                        P::AssignmentTargetPropertyIdentifier(p) => {
                            self.leaf(
                                NodeKind::Identifier,
                                Some(p.binding.name.as_str()),
                                p.binding.span,
                                id,
                                Field::Properties,
                                Some(i as u32),
                            );
                        }
                        P::AssignmentTargetPropertyProperty(p) => {
                            let prop_id = self.begin(
                                NodeKind::Property { computed: false },
                                None,
                                p.span,
                                Some(id),
                                Field::Properties,
                                Some(i as u32),
                            );
                            self.property_key(&p.name, prop_id, Field::Key);
                            match &p.binding {
                                ast::AssignmentTargetMaybeDefault::AssignmentTargetWithDefault(d) => {
                                    self.assignment_target(&d.binding, prop_id, Field::Value, None);
                                    self.expr(&d.init, prop_id, Field::Right, None);
                                }
                                other => {
                                    if let Some(t) = other.as_assignment_target() {
                                        self.assignment_target(t, prop_id, Field::Value, None);
                                    }
                                }
                            }
                            self.arena.seal(prop_id);
                        }
                    }
                }
                if let Some(rest) = &o.rest {
                    let rest_id =
                        self.begin(NodeKind::RestElement, None, rest.span, Some(id), Field::Rest, None);
                    self.assignment_target(&rest.target, rest_id, Field::Argument, None);
                    self.arena.seal(rest_id);
                }
                self.arena.seal(id);
            }
            other => {
                self.leaf(
                    NodeKind::Other("AssignmentTarget"),
                    None,
                    other.span(),
                    parent,
                    field,
                    index,
                );
            }
        }
    }

    fn simple_assignment_target(
        &mut self,
        target: &ast::SimpleAssignmentTarget<'_>,
        parent: NodeId,
        field: Field,
        index: Option<u32>,
    ) {
        use ast::SimpleAssignmentTarget as T;
        match target {
            T::AssignmentTargetIdentifier(id_ref) => {
                self.leaf(
                    NodeKind::Identifier,
                    Some(id_ref.name.as_str()),
                    id_ref.span,
                    parent,
                    field,
                    index,
                );
            }
            T::ComputedMemberExpression(m) => {
                let id = self.begin(
                    NodeKind::MemberExpression { computed: true },
                    None,
                    m.span,
                    Some(parent),
                    field,
                    index,
                );
                self.expr(&m.object, id, Field::Object, None);
                self.expr(&m.expression, id, Field::Property, None);
                self.arena.seal(id);
            }
            T::StaticMemberExpression(m) => {
                let id = self.begin(
                    NodeKind::MemberExpression { computed: false },
                    None,
                    m.span,
                    Some(parent),
                    field,
                    index,
                );
                self.expr(&m.object, id, Field::Object, None);
                self.leaf(
                    NodeKind::Identifier,
                    Some(m.property.name.as_str()),
                    m.property.span,
                    id,
                    Field::Property,
                    None,
                );
                self.arena.seal(id);
            }
            other => {
                self.leaf(
                    NodeKind::Other("AssignmentTarget"),
                    None,
                    other.span(),
                    parent,
                    field,
                    index,
                );
            }
        }
    }

    fn import_decl(
        &mut self,
        d: &ast::ImportDeclaration<'_>,
        parent: NodeId,
        field: Field,
        index: Option<u32>,
    ) {
        let id = self.begin(NodeKind::ImportDeclaration, None, d.span, Some(parent), field, index);
        if let Some(specifiers) = &d.specifiers {
            for (i, spec) in specifiers.iter().enumerate() {
                use ast::ImportDeclarationSpecifier as S;
                match spec {
                    S::ImportSpecifier(s) => {
                        let spec_id = self.begin(
                            NodeKind::ImportSpecifier,
                            Some(s.local.name.as_str()),
                            s.span,
                            Some(id),
                            Field::Specifiers,
                            Some(i as u32),
                        );
                        self.leaf(
                            NodeKind::Identifier,
                            Some(module_export_name(&s.imported)),
                            s.imported.span(),
                            spec_id,
                            Field::Imported,
                            None,
                        );
                        self.leaf(
                            NodeKind::Identifier,
                            Some(s.local.name.as_str()),
                            s.local.span,
                            spec_id,
                            Field::Local,
                            None,
                        );
                        self.arena.seal(spec_id);
                    }
                    S::ImportDefaultSpecifier(s) => {
                        let spec_id = self.begin(
                            NodeKind::ImportDefaultSpecifier,
                            Some(s.local.name.as_str()),
                            s.span,
                            Some(id),
                            Field::Specifiers,
                            Some(i as u32),
                        );
                        self.leaf(
                            NodeKind::Identifier,
                            Some(s.local.name.as_str()),
                            s.local.span,
                            spec_id,
                            Field::Local,
                            None,
                        );
                        self.arena.seal(spec_id);
                    }
                    S::ImportNamespaceSpecifier(s) => {
                        let spec_id = self.begin(
                            NodeKind::ImportNamespaceSpecifier,
                            Some(s.local.name.as_str()),
                            s.span,
                            Some(id),
                            Field::Specifiers,
                            Some(i as u32),
                        );
                        self.leaf(
                            NodeKind::Identifier,
                            Some(s.local.name.as_str()),
                            s.local.span,
                            spec_id,
                            Field::Local,
                            None,
                        );
                        self.arena.seal(spec_id);
                    }
                }
            }
        }
        self.leaf(
            NodeKind::Literal,
            Some(d.source.value.as_str()),
            d.source.span,
            id,
            Field::Source,
            None,
        );
        self.arena.seal(id);
    }

    fn export_named(
        &mut self,
        d: &ast::ExportNamedDeclaration<'_>,
        parent: NodeId,
        field: Field,
        index: Option<u32>,
    ) {
        let id = self.begin(
            NodeKind::ExportNamedDeclaration,
            None,
            d.span,
            Some(parent),
            field,
            index,
        );
        if let Some(declaration) = &d.declaration {
            self.declaration(declaration, id, Field::Declaration);
        }
        for (i, spec) in d.specifiers.iter().enumerate() {
            let spec_id = self.begin(
                NodeKind::ExportSpecifier,
                Some(module_export_name(&spec.exported)),
                spec.span,
                Some(id),
                Field::Specifiers,
                Some(i as u32),
            );
            self.leaf(
                NodeKind::Identifier,
                Some(module_export_name(&spec.local)),
                spec.local.span(),
                spec_id,
                Field::Local,
                None,
            );
            self.leaf(
                NodeKind::Identifier,
                Some(module_export_name(&spec.exported)),
                spec.exported.span(),
                spec_id,
                Field::Exported,
                None,
            );
            self.arena.seal(spec_id);
        }
        if let Some(source) = &d.source {
            self.leaf(
                NodeKind::Literal,
                Some(source.value.as_str()),
                source.span,
                id,
                Field::Source,
                None,
            );
        }
        self.arena.seal(id);
    }

    fn export_default(
        &mut self,
        d: &ast::ExportDefaultDeclaration<'_>,
        parent: NodeId,
        field: Field,
        index: Option<u32>,
    ) {
        let id = self.begin(
            NodeKind::ExportDefaultDeclaration,
            None,
            d.span,
            Some(parent),
            field,
            index,
        );
        use ast::ExportDefaultDeclarationKind as K;
        match &d.declaration {
            K::FunctionDeclaration(f) => {
                self.function(NodeKind::FunctionDeclaration, f, id, Field::Declaration, None);
            }
            K::ClassDeclaration(c) => {
                self.class(NodeKind::ClassDeclaration, c, id, Field::Declaration, None);
            }
            K::TSInterfaceDeclaration(i) => {
                let ts_id = self.begin(
                    NodeKind::TsInterfaceDeclaration,
                    Some(i.id.name.as_str()),
                    i.span,
                    Some(id),
                    Field::Declaration,
                    None,
                );
                self.leaf(NodeKind::Identifier, Some(i.id.name.as_str()), i.id.span, ts_id, Field::Id, None);
                self.arena.seal(ts_id);
            }
            other => {
                if let Some(e) = other.as_expression() {
                    self.expr(e, id, Field::Declaration, None);
                }
            }
        }
        self.arena.seal(id);
    }

    fn export_all(
        &mut self,
        d: &ast::ExportAllDeclaration<'_>,
        parent: NodeId,
        field: Field,
        index: Option<u32>,
    ) {
        let id = self.begin(
            NodeKind::ExportAllDeclaration,
            None,
            d.span,
            Some(parent),
            field,
            index,
        );
        if let Some(exported) = &d.exported {
            self.leaf(
                NodeKind::Identifier,
                Some(module_export_name(exported)),
                exported.span(),
                id,
                Field::Exported,
                None,
            );
        }
        self.leaf(
            NodeKind::Literal,
            Some(d.source.value.as_str()),
            d.source.span,
            id,
            Field::Source,
            None,
        );
        self.arena.seal(id);
    }

    fn declaration(&mut self, declaration: &ast::Declaration<'_>, parent: NodeId, field: Field) {
        use ast::Declaration as D;
        match declaration {
            D::VariableDeclaration(v) => {
                self.var_decl(v, parent, field, None);
            }
            D::FunctionDeclaration(f) => {
                self.function(NodeKind::FunctionDeclaration, f, parent, field, None);
            }
            D::ClassDeclaration(c) => {
                self.class(NodeKind::ClassDeclaration, c, parent, field, None);
            }
            D::TSEnumDeclaration(e) => {
                let id = self.begin(
                    NodeKind::TsEnumDeclaration,
                    Some(e.id.name.as_str()),
                    e.span,
                    Some(parent),
                    field,
                    None,
                );
                self.leaf(NodeKind::Identifier, Some(e.id.name.as_str()), e.id.span, id, Field::Id, None);
                self.arena.seal(id);
            }
            D::TSInterfaceDeclaration(i) => {
                let id = self.begin(
                    NodeKind::TsInterfaceDeclaration,
                    Some(i.id.name.as_str()),
                    i.span,
                    Some(parent),
                    field,
                    None,
                );
                self.leaf(NodeKind::Identifier, Some(i.id.name.as_str()), i.id.span, id, Field::Id, None);
                self.arena.seal(id);
            }
            D::TSTypeAliasDeclaration(t) => {
                let id = self.begin(
                    NodeKind::TsTypeAliasDeclaration,
                    Some(t.id.name.as_str()),
                    t.span,
                    Some(parent),
                    field,
                    None,
                );
                self.leaf(NodeKind::Identifier, Some(t.id.name.as_str()), t.id.span, id, Field::Id, None);
                self.arena.seal(id);
            }
            other => {
                self.leaf(NodeKind::Other("Declaration"), None, other.span(), parent, field, None);
            }
        }
    }

    fn jsx_element(
        &mut self,
        el: &ast::JSXElement<'_>,
        parent: NodeId,
        field: Field,
        index: Option<u32>,
    ) {
        let id = self.begin(NodeKind::JsxElement, None, el.span, Some(parent), field, index);
        let opening = &el.opening_element;
        let open_id = self.begin(
            NodeKind::JsxOpeningElement,
            None,
            opening.span,
            Some(id),
            Field::OpeningElement,
            None,
        );
        self.jsx_name(&opening.name, open_id, Field::Name);
        for (i, attr) in opening.attributes.iter().enumerate() {
            use ast::JSXAttributeItem as A;
            match attr {
                A::Attribute(a) => {
                    let attr_id = self.begin(
                        NodeKind::JsxAttribute,
                        jsx_attribute_name(&a.name),
                        a.span,
                        Some(open_id),
                        Field::Attributes,
                        Some(i as u32),
                    );
                    if let ast::JSXAttributeName::Identifier(name) = &a.name {
                        self.leaf(
                            NodeKind::JsxIdentifier,
                            Some(name.name.as_str()),
                            name.span,
                            attr_id,
                            Field::Name,
                            None,
                        );
                    }
                    if let Some(value) = &a.value {
                        use ast::JSXAttributeValue as V;
                        match value {
                            V::StringLiteral(s) => {
                                self.leaf(
                                    NodeKind::Literal,
                                    Some(s.value.as_str()),
                                    s.span,
                                    attr_id,
                                    Field::Value,
                                    None,
                                );
                            }
                            V::ExpressionContainer(c) => {
                                self.jsx_expression_container(c, attr_id, Field::Value);
                            }
                            V::Element(e) => {
                                self.jsx_element(e, attr_id, Field::Value, None);
                            }
                            V::Fragment(f) => {
                                let frag_id = self.begin(
                                    NodeKind::JsxFragment,
                                    None,
                                    f.span,
                                    Some(attr_id),
                                    Field::Value,
                                    None,
                                );
                                for (j, child) in f.children.iter().enumerate() {
                                    self.jsx_child(child, frag_id, Some(j as u32));
                                }
                                self.arena.seal(frag_id);
                            }
                        }
                    }
                    self.arena.seal(attr_id);
                }
                A::SpreadAttribute(s) => {
                    let spread_id = self.begin(
                        NodeKind::JsxSpreadAttribute,
                        None,
                        s.span,
                        Some(open_id),
                        Field::Attributes,
                        Some(i as u32),
                    );
                    self.expr(&s.argument, spread_id, Field::Argument, None);
                    self.arena.seal(spread_id);
                }
            }
        }
        self.arena.seal(open_id);
        if let Some(closing) = &el.closing_element {
            let close_id = self.begin(
                NodeKind::JsxClosingElement,
                None,
                closing.span,
                Some(id),
                Field::ClosingElement,
                None,
            );
            self.jsx_name(&closing.name, close_id, Field::Name);
            self.arena.seal(close_id);
        }
        for (i, child) in el.children.iter().enumerate() {
            self.jsx_child(child, id, Some(i as u32));
        }
        self.arena.seal(id);
    }

    fn jsx_name(&mut self, name: &ast::JSXElementName<'_>, parent: NodeId, field: Field) {
        use ast::JSXElementName as N;
        match name {
            N::Identifier(id) => {
                self.leaf(NodeKind::JsxIdentifier, Some(id.name.as_str()), id.span, parent, field, None);
            }
            N::IdentifierReference(r) => {
                self.leaf(NodeKind::Identifier, Some(r.name.as_str()), r.span, parent, field, None);
            }
            N::MemberExpression(m) => {
                self.jsx_member(m, parent, field);
            }
            N::ThisExpression(t) => {
                self.leaf(NodeKind::ThisExpression, None, t.span, parent, field, None);
            }
            N::NamespacedName(n) => {
                self.leaf(NodeKind::Other("JSXNamespacedName"), None, n.span, parent, field, None);
            }
        }
    }

    fn jsx_member(&mut self, m: &ast::JSXMemberExpression<'_>, parent: NodeId, field: Field) {
        let id = self.begin(NodeKind::JsxMemberExpression, None, m.span, Some(parent), field, None);
        use ast::JSXMemberExpressionObject as O;
        match &m.object {
            O::IdentifierReference(r) => {
                self.leaf(NodeKind::Identifier, Some(r.name.as_str()), r.span, id, Field::Object, None);
            }
            O::MemberExpression(inner) => {
                self.jsx_member(inner, id, Field::Object);
            }
            O::ThisExpression(t) => {
                self.leaf(NodeKind::ThisExpression, None, t.span, id, Field::Object, None);
            }
        }
        self.leaf(
            NodeKind::JsxIdentifier,
            Some(m.property.name.as_str()),
            m.property.span,
            id,
            Field::Property,
            None,
        );
        self.arena.seal(id);
    }

    fn jsx_expression_container(
        &mut self,
        c: &ast::JSXExpressionContainer<'_>,
        parent: NodeId,
        field: Field,
    ) {
        let id = self.begin(
            NodeKind::JsxExpressionContainer,
            None,
            c.span,
            Some(parent),
            field,
            None,
        );
        if !matches!(c.expression, ast::JSXExpression::EmptyExpression(_)) {
            if let Some(e) = c.expression.as_expression() {
                self.expr(e, id, Field::Expression, None);
            }
        }
        self.arena.seal(id);
    }

    fn jsx_child(&mut self, child: &ast::JSXChild<'_>, parent: NodeId, index: Option<u32>) {
        use ast::JSXChild as C;
        match child {
            C::Element(e) => {
                self.jsx_element(e, parent, Field::Children, index);
            }
            C::Fragment(f) => {
                let id = self.begin(
                    NodeKind::JsxFragment,
                    None,
                    f.span,
                    Some(parent),
                    Field::Children,
                    index,
                );
                for (i, inner) in f.children.iter().enumerate() {
                    self.jsx_child(inner, id, Some(i as u32));
                }
                self.arena.seal(id);
            }
            C::ExpressionContainer(c) => {
                self.jsx_expression_container(c, parent, Field::Children);
            }
            C::Spread(s) => {
                let id = self.begin(
                    NodeKind::Other("JSXSpreadChild"),
                    None,
                    s.span,
                    Some(parent),
                    Field::Children,
                    index,
                );
                self.expr(&s.expression, id, Field::Expression, None);
                self.arena.seal(id);
            }
            C::Text(_) => {}
        }
    }
}

fn module_export_name<'a>(name: &'a ast::ModuleExportName<'a>) -> &'a str {
    use ast::ModuleExportName as N;
    match name {
        N::IdentifierName(n) => n.name.as_str(),
        N::IdentifierReference(r) => r.name.as_str(),
        N::StringLiteral(s) => s.value.as_str(),
    }
}

fn jsx_attribute_name<'a>(name: &'a ast::JSXAttributeName<'a>) -> Option<&'a str> {
    match name {
        ast::JSXAttributeName::Identifier(id) => Some(id.name.as_str()),
        ast::JSXAttributeName::NamespacedName(_) => None,
    }
}

fn static_key_name<'a>(key: &'a ast::PropertyKey<'a>) -> Option<&'a str> {
    match key {
        ast::PropertyKey::StaticIdentifier(n) => Some(n.name.as_str()),
        ast::PropertyKey::PrivateIdentifier(p) => Some(p.name.as_str()),
        _ => None,
    }
}

fn statement_kind_name(stmt: &ast::Statement<'_>) -> &'static str {
    use ast::Statement as S;
    match stmt {
        S::BreakStatement(_) => "BreakStatement",
        S::ContinueStatement(_) => "ContinueStatement",
        S::DebuggerStatement(_) => "DebuggerStatement",
        S::EmptyStatement(_) => "EmptyStatement",
        S::WithStatement(_) => "WithStatement",
        _ => "Statement",
    }
}

fn expression_kind_name(e: &ast::Expression<'_>) -> &'static str {
    use ast::Expression as E;
    match e {
        E::MetaProperty(_) => "MetaProperty",
        E::Super(_) => "Super",
        E::PrivateInExpression(_) => "PrivateInExpression",
        _ => "Expression",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::NodeKind;

    #[test]
    fn parse_produces_program_root() {
        let arena = parse_source("const a = 1;\n", "test.ts").expect("parse");
        let root = arena.root().expect("root");
        assert_eq!(arena.node(root).kind, NodeKind::Program);
        assert!(arena.len() > 2);
    }

    #[test]
    fn parse_error_is_reported_not_fatal() {
        let err = parse_source("const x = {{{{{", "broken.js").unwrap_err();
        assert!(!err.message.is_empty());
    }

    #[test]
    fn spans_are_one_based_lines() {
        let arena = parse_source("const a = 1;\nconst b = a;\n", "test.ts").expect("parse");
        let root = arena.root().expect("root");
        let stmts = &arena.node(root).children;
        assert_eq!(arena.node(stmts[0]).span.start_line, 1);
        assert_eq!(arena.node(stmts[1]).span.start_line, 2);
    }

    #[test]
    fn vue_script_extraction_preserves_lines() {
        let source = "<template>\n  <div/>\n</template>\n<script lang=\"ts\">\nexport default {}\n</script>\n";
        let script = extract_vue_script(source).expect("script");
        assert!(script.typescript);
        // Script body starts on line 5 of the original file.
        assert!(script.text.starts_with("\n\n\n\n"));
        let arena = parse_source(source, "component.vue").expect("parse");
        let root = arena.root().expect("root");
        let first = arena.node(root).children[0];
        assert_eq!(arena.node(first).span.start_line, 5);
    }

    #[test]
    fn declaration_file_detection() {
        assert!(is_declaration_file("src/types.d.ts"));
        assert!(!is_declaration_file("src/types.ts"));
    }
}
