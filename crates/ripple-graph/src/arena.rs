//! Per-file AST arena.
//!
//! Every parsed file is lowered into one dense `Vec<Node>` in depth-first
//! pre-order. Nodes address each other by `NodeId` index instead of pointers,
//! which sidesteps the ownership cycles a parent/child/annotation web would
//! otherwise create and keeps the whole graph cheap to move around.
//!
//! The pre-order layout gives every node a contiguous descendant range
//! `(id, end)`: containment checks and "flattened subtree" queries are plain
//! integer comparisons.

use crate::span::SourceSpan;

/// Index of a node inside its file's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Edge label connecting a node to its parent.
///
/// The label is the parent's field that holds the node; classification and
/// reference filtering key off it (`init` vs `id`, `property` vs `object`,
/// and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Root,
    Body,
    Declarations,
    Id,
    Init,
    Params,
    Left,
    Right,
    Argument,
    Arguments,
    Callee,
    Object,
    Property,
    Key,
    Value,
    Elements,
    Properties,
    Specifiers,
    Local,
    Imported,
    Exported,
    Source,
    Declaration,
    Expression,
    Expressions,
    Test,
    Update,
    Consequent,
    Alternate,
    Discriminant,
    Cases,
    Block,
    Handler,
    Finalizer,
    Param,
    Label,
    Tag,
    Quasi,
    Name,
    Attributes,
    Children,
    OpeningElement,
    ClosingElement,
    SuperClass,
    Rest,
}

/// Node kind tags for the consumed AST subset.
///
/// Kinds outside the subset are lowered to [`NodeKind::Other`] carrying the
/// parser's kind name; their children are still traversed so references
/// inside them are not lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Program,
    ImportDeclaration,
    ImportSpecifier,
    ImportDefaultSpecifier,
    ImportNamespaceSpecifier,
    ExportNamedDeclaration,
    ExportDefaultDeclaration,
    ExportAllDeclaration,
    ExportSpecifier,
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,
    FunctionExpression,
    ArrowFunctionExpression,
    ClassDeclaration,
    ClassExpression,
    MethodDefinition { computed: bool },
    PropertyDefinition { computed: bool },
    StaticBlock,
    BlockStatement,
    ExpressionStatement,
    ReturnStatement,
    IfStatement,
    ForStatement,
    ForInStatement,
    ForOfStatement,
    WhileStatement,
    DoWhileStatement,
    SwitchStatement,
    SwitchCase,
    TryStatement,
    CatchClause,
    ThrowStatement,
    LabeledStatement,
    CallExpression,
    NewExpression,
    AssignmentExpression,
    BinaryExpression,
    LogicalExpression,
    UnaryExpression { delete: bool },
    UpdateExpression,
    SequenceExpression,
    ConditionalExpression,
    MemberExpression { computed: bool },
    ObjectExpression,
    Property { computed: bool },
    SpreadElement,
    ArrayExpression,
    TemplateLiteral,
    TaggedTemplateExpression,
    AwaitExpression,
    YieldExpression,
    ThisExpression,
    ObjectPattern,
    ArrayPattern,
    RestElement,
    AssignmentPattern,
    Identifier,
    PrivateIdentifier,
    Literal,
    JsxElement,
    JsxFragment,
    JsxOpeningElement,
    JsxClosingElement,
    JsxAttribute,
    JsxSpreadAttribute,
    JsxExpressionContainer,
    JsxIdentifier,
    JsxMemberExpression,
    TsEnumDeclaration,
    TsInterfaceDeclaration,
    TsTypeAliasDeclaration,
    Other(&'static str),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Program => "Program",
            Self::ImportDeclaration => "ImportDeclaration",
            Self::ImportSpecifier => "ImportSpecifier",
            Self::ImportDefaultSpecifier => "ImportDefaultSpecifier",
            Self::ImportNamespaceSpecifier => "ImportNamespaceSpecifier",
            Self::ExportNamedDeclaration => "ExportNamedDeclaration",
            Self::ExportDefaultDeclaration => "ExportDefaultDeclaration",
            Self::ExportAllDeclaration => "ExportAllDeclaration",
            Self::ExportSpecifier => "ExportSpecifier",
            Self::VariableDeclaration => "VariableDeclaration",
            Self::VariableDeclarator => "VariableDeclarator",
            Self::FunctionDeclaration => "FunctionDeclaration",
            Self::FunctionExpression => "FunctionExpression",
            Self::ArrowFunctionExpression => "ArrowFunctionExpression",
            Self::ClassDeclaration => "ClassDeclaration",
            Self::ClassExpression => "ClassExpression",
            Self::MethodDefinition { .. } => "MethodDefinition",
            Self::PropertyDefinition { .. } => "PropertyDefinition",
            Self::StaticBlock => "StaticBlock",
            Self::BlockStatement => "BlockStatement",
            Self::ExpressionStatement => "ExpressionStatement",
            Self::ReturnStatement => "ReturnStatement",
            Self::IfStatement => "IfStatement",
            Self::ForStatement => "ForStatement",
            Self::ForInStatement => "ForInStatement",
            Self::ForOfStatement => "ForOfStatement",
            Self::WhileStatement => "WhileStatement",
            Self::DoWhileStatement => "DoWhileStatement",
            Self::SwitchStatement => "SwitchStatement",
            Self::SwitchCase => "SwitchCase",
            Self::TryStatement => "TryStatement",
            Self::CatchClause => "CatchClause",
            Self::ThrowStatement => "ThrowStatement",
            Self::LabeledStatement => "LabeledStatement",
            Self::CallExpression => "CallExpression",
            Self::NewExpression => "NewExpression",
            Self::AssignmentExpression => "AssignmentExpression",
            Self::BinaryExpression => "BinaryExpression",
            Self::LogicalExpression => "LogicalExpression",
            Self::UnaryExpression { .. } => "UnaryExpression",
            Self::UpdateExpression => "UpdateExpression",
            Self::SequenceExpression => "SequenceExpression",
            Self::ConditionalExpression => "ConditionalExpression",
            Self::MemberExpression { .. } => "MemberExpression",
            Self::ObjectExpression => "ObjectExpression",
            Self::Property { .. } => "Property",
            Self::SpreadElement => "SpreadElement",
            Self::ArrayExpression => "ArrayExpression",
            Self::TemplateLiteral => "TemplateLiteral",
            Self::TaggedTemplateExpression => "TaggedTemplateExpression",
            Self::AwaitExpression => "AwaitExpression",
            Self::YieldExpression => "YieldExpression",
            Self::ThisExpression => "ThisExpression",
            Self::ObjectPattern => "ObjectPattern",
            Self::ArrayPattern => "ArrayPattern",
            Self::RestElement => "RestElement",
            Self::AssignmentPattern => "AssignmentPattern",
            Self::Identifier => "Identifier",
            Self::PrivateIdentifier => "PrivateIdentifier",
            Self::Literal => "Literal",
            Self::JsxElement => "JSXElement",
            Self::JsxFragment => "JSXFragment",
            Self::JsxOpeningElement => "JSXOpeningElement",
            Self::JsxClosingElement => "JSXClosingElement",
            Self::JsxAttribute => "JSXAttribute",
            Self::JsxSpreadAttribute => "JSXSpreadAttribute",
            Self::JsxExpressionContainer => "JSXExpressionContainer",
            Self::JsxIdentifier => "JSXIdentifier",
            Self::JsxMemberExpression => "JSXMemberExpression",
            Self::TsEnumDeclaration => "TSEnumDeclaration",
            Self::TsInterfaceDeclaration => "TSInterfaceDeclaration",
            Self::TsTypeAliasDeclaration => "TSTypeAliasDeclaration",
            Self::Other(name) => name,
        }
    }

    /// Function-like kinds that own a parameter list.
    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            Self::FunctionDeclaration | Self::FunctionExpression | Self::ArrowFunctionExpression
        )
    }

    /// Kinds that may appear between a declarator's `id` and its leaf
    /// identifiers (destructuring shapes).
    pub fn is_binding_pattern(&self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::ObjectPattern
                | Self::ArrayPattern
                | Self::RestElement
                | Self::AssignmentPattern
                | Self::Property { .. }
        )
    }
}

/// One AST element, exclusively owned by its file's arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Identifier text for name-bearing kinds, `None` otherwise.
    pub name: Option<String>,
    pub span: SourceSpan,
    pub parent: Option<NodeId>,
    /// Which of the parent's fields holds this node.
    pub field: Field,
    /// Position within the parent's field when the field is an array.
    pub index: Option<u32>,
    pub children: Vec<NodeId>,
    /// Exclusive end of this node's descendant range: descendants occupy
    /// `(self_id, end)` in the arena.
    pub end: NodeId,
}

/// Dense pre-order node storage for one file.
#[derive(Debug, Default)]
pub struct AstArena {
    nodes: Vec<Node>,
}

impl AstArena {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root node (the Program), if the arena holds anything.
    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeId(0))
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Append a node; the caller links children afterwards and seals the
    /// descendant range with [`AstArena::seal`].
    pub fn push(
        &mut self,
        kind: NodeKind,
        name: Option<String>,
        span: SourceSpan,
        parent: Option<NodeId>,
        field: Field,
        index: Option<u32>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            name,
            span,
            parent,
            field,
            index,
            children: Vec::new(),
            end: NodeId(id.0 + 1),
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.index()].children.push(id);
        }
        id
    }

    /// Seal a node's descendant range once all of its children are lowered.
    pub fn seal(&mut self, id: NodeId) {
        let end = NodeId(self.nodes.len() as u32);
        self.nodes[id.index()].end = end;
    }

    /// Flattened descendant set of `id`, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let node = self.node(id);
        (id.0 + 1..node.end.0).map(NodeId)
    }

    /// True when `inner` lies strictly inside `outer`'s subtree.
    pub fn is_descendant(&self, inner: NodeId, outer: NodeId) -> bool {
        inner.0 > outer.0 && inner.0 < self.node(outer).end.0
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.node(id).parent;
        std::iter::from_fn(move || {
            let next = current?;
            current = self.node(next).parent;
            Some(next)
        })
    }

    pub fn child_by_field(&self, id: NodeId, field: Field) -> Option<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).field == field)
    }

    pub fn children_by_field(&self, id: NodeId, field: Field) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(move |&child| self.node(child).field == field)
    }

    /// Nearest ancestor satisfying `predicate`.
    pub fn find_ancestor(
        &self,
        id: NodeId,
        mut predicate: impl FnMut(&Node) -> bool,
    ) -> Option<NodeId> {
        self.ancestors(id).find(|&a| predicate(self.node(a)))
    }

    /// The node's top-level statement: its outermost ancestor whose parent is
    /// the Program, or the node itself when it is directly at top level.
    pub fn top_level_statement(&self, id: NodeId) -> Option<NodeId> {
        let mut candidate = id;
        loop {
            let parent = self.node(candidate).parent?;
            if self.node(parent).kind == NodeKind::Program {
                return Some(candidate);
            }
            candidate = parent;
        }
    }

    /// Structural path of a node: ancestor kind names root-to-self joined
    /// with `:`, suffixed with the node's own name. Stable across versions of
    /// a file as long as the surrounding structure is unchanged, which is what
    /// the diff reconciliation keys on.
    pub fn node_path(&self, id: NodeId) -> String {
        let mut kinds: Vec<&'static str> = self
            .ancestors(id)
            .map(|a| self.node(a).kind.name())
            .collect();
        kinds.reverse();
        kinds.push(self.node(id).kind.name());
        let name = self.node(id).name.as_deref().unwrap_or("");
        format!("{}:{}", kinds.join(":"), name)
    }

    /// True when the node sits inside the `id` pattern of a variable
    /// declarator (a destructuring sub-node).
    pub fn is_in_declarator_pattern(&self, id: NodeId) -> bool {
        let Some(declarator) =
            self.find_ancestor(id, |n| n.kind == NodeKind::VariableDeclarator)
        else {
            return false;
        };
        let Some(pattern) = self.child_by_field(declarator, Field::Id) else {
            return false;
        };
        pattern == id || self.is_descendant(id, pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(arena: &mut AstArena, parent: NodeId, field: Field, kind: NodeKind) -> NodeId {
        let id = arena.push(kind, None, SourceSpan::zero(), Some(parent), field, None);
        arena.seal(id);
        id
    }

    #[test]
    fn descendant_ranges_follow_preorder() {
        let mut arena = AstArena::new();
        let root = arena.push(
            NodeKind::Program,
            None,
            SourceSpan::zero(),
            None,
            Field::Root,
            None,
        );
        let stmt = arena.push(
            NodeKind::ExpressionStatement,
            None,
            SourceSpan::zero(),
            Some(root),
            Field::Body,
            Some(0),
        );
        let inner = leaf(&mut arena, stmt, Field::Expression, NodeKind::Identifier);
        arena.seal(stmt);
        let sibling = leaf(&mut arena, root, Field::Body, NodeKind::ReturnStatement);
        arena.seal(root);

        assert!(arena.is_descendant(inner, root));
        assert!(arena.is_descendant(inner, stmt));
        assert!(!arena.is_descendant(sibling, stmt));
        let subtree: Vec<_> = arena.descendants(stmt).collect();
        assert_eq!(subtree, vec![inner]);
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let mut arena = AstArena::new();
        let root = arena.push(
            NodeKind::Program,
            None,
            SourceSpan::zero(),
            None,
            Field::Root,
            None,
        );
        let stmt = arena.push(
            NodeKind::ExpressionStatement,
            None,
            SourceSpan::zero(),
            Some(root),
            Field::Body,
            Some(0),
        );
        let inner = leaf(&mut arena, stmt, Field::Expression, NodeKind::Identifier);
        arena.seal(stmt);
        arena.seal(root);

        let chain: Vec<_> = arena.ancestors(inner).collect();
        assert_eq!(chain, vec![stmt, root]);
        assert_eq!(arena.top_level_statement(inner), Some(stmt));
    }
}
