//! Uniform handle over the addressable node kinds of a tree.

use smallvec::SmallVec;

use crate::ast::*;
use crate::walk::{Visitor, Walk};

/// A node of one tree: the file root or an arena id.
///
/// Member names and other inline pieces (`IdentName`, `Block`, `FieldList`)
/// belong to the node that holds them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    File,
    Decl(DeclId),
    Func(FuncDeclId),
    Stmt(StmtId),
    Simple(SimpleStmtId),
    Expr(ExprId),
    Type(TypeId),
    Field(FieldId),
    Signature(SignatureId),
    SwitchClause(SwitchClauseId),
    CommClause(CommClauseId),
    TypeParams(TypeParamsId),
    TypeParamDecl(TypeParamDeclId),
}

impl Node {
    pub fn span(self, arena: &AstArena, file: &SourceFile) -> Span {
        match self {
            Node::File => file.span,
            Node::Decl(id) => arena.decls.span(id),
            Node::Func(id) => arena.funcs.span(id),
            Node::Stmt(id) => arena.stmts.span(id),
            Node::Simple(id) => arena.simple_stmts.span(id),
            Node::Expr(id) => arena.exprs.span(id),
            Node::Type(id) => arena.types.span(id),
            Node::Field(id) => arena.fields.span(id),
            Node::Signature(id) => arena.signatures.span(id),
            Node::SwitchClause(id) => arena.switch_clauses.span(id),
            Node::CommClause(id) => arena.comm_clauses.span(id),
            Node::TypeParams(id) => arena.type_params.span(id),
            Node::TypeParamDecl(id) => arena.type_param_decls.span(id),
        }
    }

    /// Immediate children in source order. Comments are not included.
    pub fn children(self, arena: &AstArena, file: &SourceFile) -> SmallVec<[Node; 8]> {
        let mut c = ChildCollector::default();
        match self {
            Node::File => file.walk(arena, &mut c),
            Node::Decl(id) => arena.decls[id].walk(arena, &mut c),
            Node::Func(id) => arena.funcs[id].walk(arena, &mut c),
            Node::Stmt(id) => arena.stmts[id].walk(arena, &mut c),
            Node::Simple(id) => arena.simple_stmts[id].walk(arena, &mut c),
            Node::Expr(id) => arena.exprs[id].walk(arena, &mut c),
            Node::Type(id) => arena.types[id].walk(arena, &mut c),
            Node::Field(id) => arena.fields[id].walk(arena, &mut c),
            Node::Signature(id) => arena.signatures[id].walk(arena, &mut c),
            Node::SwitchClause(id) => arena.switch_clauses[id].walk(arena, &mut c),
            Node::CommClause(id) => arena.comm_clauses[id].walk(arena, &mut c),
            Node::TypeParams(id) => arena.type_params[id].walk(arena, &mut c),
            Node::TypeParamDecl(id) => arena.type_param_decls[id].walk(arena, &mut c),
        }
        c.out
    }
}

/// Records the first layer of ids reached from a node without descending.
#[derive(Default)]
struct ChildCollector {
    out: SmallVec<[Node; 8]>,
}

impl<'ast> Visitor<'ast> for ChildCollector {
    fn visit_decl(&mut self, _: &'ast AstArena, id: DeclId) {
        self.out.push(Node::Decl(id));
    }

    fn visit_func_decl(&mut self, _: &'ast AstArena, id: FuncDeclId) {
        self.out.push(Node::Func(id));
    }

    fn visit_stmt(&mut self, _: &'ast AstArena, id: StmtId) {
        self.out.push(Node::Stmt(id));
    }

    fn visit_simple_stmt(&mut self, _: &'ast AstArena, id: SimpleStmtId) {
        self.out.push(Node::Simple(id));
    }

    fn visit_expr(&mut self, _: &'ast AstArena, id: ExprId) {
        self.out.push(Node::Expr(id));
    }

    fn visit_type(&mut self, _: &'ast AstArena, id: TypeId) {
        self.out.push(Node::Type(id));
    }

    fn visit_field(&mut self, _: &'ast AstArena, id: FieldId) {
        self.out.push(Node::Field(id));
    }

    fn visit_signature(&mut self, _: &'ast AstArena, id: SignatureId) {
        self.out.push(Node::Signature(id));
    }

    fn visit_switch_clause(&mut self, _: &'ast AstArena, id: SwitchClauseId) {
        self.out.push(Node::SwitchClause(id));
    }

    fn visit_comm_clause(&mut self, _: &'ast AstArena, id: CommClauseId) {
        self.out.push(Node::CommClause(id));
    }

    fn visit_type_params(&mut self, _: &'ast AstArena, id: TypeParamsId) {
        self.out.push(Node::TypeParams(id));
    }

    fn visit_type_param_decl(&mut self, _: &'ast AstArena, id: TypeParamDeclId) {
        self.out.push(Node::TypeParamDecl(id));
    }

    fn visit_comment_group(&mut self, _: &'ast AstArena, _: CommentGroupId) {}
}
