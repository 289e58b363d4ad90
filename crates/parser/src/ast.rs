//! # Go syntax tree
//!
//! Arena-allocated AST for Go source, shaped after `go/ast` closely enough that
//! error-recovery code can reason about the same node kinds (`BadStmt`,
//! `BadExpr`, selectors with synthesized names, and so on).
//!
//! ## Architecture
//!
//! - **Nodes**: allocated in typed arenas (`SpannedArena<T>`), addressed by `Id<T>`
//! - **Lists**: stored in the shared `ExtraData` buffers, addressed by `ListRef<T>`
//! - **Spans**: byte ranges kept both in a side table per arena and in the
//!   position fields of each node
//! - **Symbols**: identifiers are interned once per tree
//!
//! Every node type derives `WalkAst` (read-only traversal, see `crate::walk`)
//! and `ShiftSpans` (position rewriting, see `crate::shift`). `ArenaMark`
//! records arena lengths so that everything allocated after the mark can be
//! shifted as a unit.

use ast_derive::{ShiftSpans, WalkAst};
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::hash::{BuildHasher, BuildHasherDefault, Hasher, RandomState};

use crate::shift::ShiftSpans;

// =============================================================================
// Core Foundation Types
// =============================================================================

/// Byte range into the source buffer a tree was parsed from.
///
/// Positions are stored as `u32` to save memory, limiting file size to 4GB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Creates a new span from usize positions.
    ///
    /// # Panics
    /// In debug builds, panics if positions exceed `u32::MAX`.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= u32::MAX as usize);
        debug_assert!(end <= u32::MAX as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Zero-width span at `pos`.
    #[inline]
    pub fn empty_at(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub const fn start_usize(&self) -> usize {
        self.start as usize
    }

    #[inline]
    pub const fn end_usize(&self) -> usize {
        self.end as usize
    }

    /// Smallest span covering both.
    #[inline]
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// `start <= offset <= end`; the end is inclusive so that a cursor sitting
    /// right after a node still counts as inside it.
    #[inline]
    pub const fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// Type-safe identifier for arena-allocated nodes.
///
/// Equality is identity: two ids are equal when they name the same slot.
#[repr(transparent)]
pub struct Id<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for Id<T> {}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Id<T> {}

impl<T> core::hash::Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> core::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Id({})", self.raw)
    }
}

impl<T> Id<T> {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn to_usize(&self) -> usize {
        self.raw as usize
    }

    #[inline]
    pub const fn raw(&self) -> u32 {
        self.raw
    }
}

/// Typed reference into a centralized list buffer.
///
/// Lists are stored in `AstArena::extras` to avoid per-node allocations.
#[derive(Debug, PartialEq, Eq)]
pub struct ListRef<T> {
    start: u32,
    len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for ListRef<T> {}

impl<T> Clone for ListRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Default for ListRef<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> ListRef<T> {
    pub const EMPTY: Self = Self {
        start: 0,
        len: 0,
        _marker: PhantomData,
    };

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        Self {
            start,
            len,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.len
    }

    /// End index (exclusive).
    #[inline]
    pub const fn end(&self) -> u32 {
        self.start + self.len
    }
}

// =============================================================================
// Symbol Interning System
// =============================================================================

/// Interned string symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

pub type Ident = Symbol;

impl Symbol {
    #[inline]
    pub const fn from_raw(v: u32) -> Self {
        Self(v)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Identifier occurrence (interned symbol + source position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct IdentName {
    pub sym: Ident,
    pub pos: Span,
}

/// Identity hasher for u64 values (used for symbol hash buckets).
#[derive(Default)]
struct U64IdentityHasher(u64);

impl Hasher for U64IdentityHasher {
    fn write(&mut self, _b: &[u8]) {
        unreachable!("U64IdentityHasher only supports write_u64")
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

type U64IdentityBuild = BuildHasherDefault<U64IdentityHasher>;

/// String interner for efficient symbol storage.
///
/// Uses a seeded random hasher for security against hash collision attacks.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    buckets: HashMap<u64, SmallVec<[Symbol; 1]>, U64IdentityBuild>,
    state: RandomState,
}

impl Interner {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.strings.reserve(additional);
        self.buckets.reserve(additional);
    }

    #[inline(always)]
    fn hash_str(&self, s: &str) -> u64 {
        self.state.hash_one(s)
    }

    /// Interns a string and returns its symbol.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Symbol {
        let h = self.hash_str(s);
        let entry = self.buckets.entry(h).or_default();

        for &sym in entry.iter() {
            if self.strings[sym.0 as usize].as_ref() == s {
                return sym;
            }
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.into());
        entry.push(sym);
        sym
    }

    /// Looks a string up without interning it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        let h = self.hash_str(s);
        self.buckets
            .get(&h)?
            .iter()
            .copied()
            .find(|sym| self.strings[sym.0 as usize].as_ref() == s)
    }

    /// Resolves a symbol back to its string.
    ///
    /// Symbols from another interner resolve to `""`.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        debug_assert!((sym.0 as usize) < self.strings.len());
        self.strings.get(sym.0 as usize).map_or("", |s| s.as_ref())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

// =============================================================================
// Arena Allocation
// =============================================================================

/// Arena for nodes with associated spans.
///
/// Stores nodes and their spans in parallel vectors for cache efficiency.
#[derive(Debug)]
pub struct SpannedArena<T> {
    data: Vec<T>,
    spans: Vec<Span>,
}

impl<T> Default for SpannedArena<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            spans: Vec::new(),
        }
    }
}

impl<T> SpannedArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self, node: T, span: Span) -> Id<T> {
        let id = Id::from_raw(self.data.len() as u32);
        self.data.push(node);
        self.spans.push(span);
        id
    }

    #[inline]
    pub fn get(&self, id: Id<T>) -> &T {
        &self.data[id.to_usize()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: Id<T>) -> &mut T {
        &mut self.data[id.to_usize()]
    }

    #[inline]
    pub fn span(&self, id: Id<T>) -> Span {
        self.spans[id.to_usize()]
    }

    #[inline]
    pub fn set_span(&mut self, id: Id<T>, span: Span) {
        self.spans[id.to_usize()] = span;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterates `(id, node, span)` in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T, Span)> + '_ {
        self.data
            .iter()
            .zip(self.spans.iter())
            .enumerate()
            .map(|(i, (node, span))| (Id::from_raw(i as u32), node, *span))
    }
}

impl<T: ShiftSpans> SpannedArena<T> {
    /// Rewrites node fields and side-table spans of every node from index `from`.
    fn shift_from(&mut self, from: usize, f: &mut dyn FnMut(Span) -> Span) {
        for node in self.data.iter_mut().skip(from) {
            node.shift_spans(f);
        }
        for span in self.spans.iter_mut().skip(from) {
            *span = f(*span);
        }
    }
}

impl<T> Index<Id<T>> for SpannedArena<T> {
    type Output = T;
    fn index(&self, id: Id<T>) -> &T {
        self.get(id)
    }
}

impl<T> IndexMut<Id<T>> for SpannedArena<T> {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        self.get_mut(id)
    }
}

// =============================================================================
// Type Aliases for Node IDs
// =============================================================================

pub type DeclId = Id<Decl>;
pub type StmtId = Id<Stmt>;
pub type SimpleStmtId = Id<SimpleStmt>;
pub type ExprId = Id<Expr>;
pub type TypeId = Id<Type>;
pub type FieldId = Id<Field>;
pub type SignatureId = Id<Signature>;
pub type FuncDeclId = Id<FuncDecl>;
pub type SwitchClauseId = Id<SwitchClause>;
pub type CommClauseId = Id<CommClause>;
pub type TypeParamsId = Id<TypeParams>;
pub type TypeParamDeclId = Id<TypeParamDecl>;
pub type CommentId = Id<Comment>;
pub type CommentGroupId = Id<CommentGroup>;

// =============================================================================
// Centralized List Storage
// =============================================================================

/// Buffers that `ListRef<T>` points into.
#[derive(Debug, Default)]
pub struct ExtraData {
    pub ident_names: Vec<IdentName>,
    pub exprs: Vec<ExprId>,
    pub stmts: Vec<StmtId>,
    pub types: Vec<TypeId>,
    pub fields: Vec<FieldId>,
    pub specs: Vec<Spec>,
    pub top_decls: Vec<TopLevelDecl>,
    pub switch_clause_ids: Vec<SwitchClauseId>,
    pub comm_clause_ids: Vec<CommClauseId>,
    pub type_terms: Vec<TypeTerm>,
    pub interface_elems: Vec<InterfaceElem>,
    pub type_param_decl_ids: Vec<TypeParamDeclId>,
    pub comment_ids: Vec<CommentId>,
    pub comment_group_ids: Vec<CommentGroupId>,
}

// =============================================================================
// Main AST Arena
// =============================================================================

/// Central arena holding all AST nodes and list buffers.
#[derive(Debug, Default)]
pub struct AstArena {
    pub decls: SpannedArena<Decl>,
    pub stmts: SpannedArena<Stmt>,
    pub simple_stmts: SpannedArena<SimpleStmt>,
    pub exprs: SpannedArena<Expr>,
    pub types: SpannedArena<Type>,
    pub signatures: SpannedArena<Signature>,
    pub funcs: SpannedArena<FuncDecl>,
    pub fields: SpannedArena<Field>,
    pub switch_clauses: SpannedArena<SwitchClause>,
    pub comm_clauses: SpannedArena<CommClause>,
    pub type_params: SpannedArena<TypeParams>,
    pub type_param_decls: SpannedArena<TypeParamDecl>,
    pub comments: SpannedArena<Comment>,
    pub comment_groups: SpannedArena<CommentGroup>,
    pub extras: ExtraData,
}

/// Snapshot of arena lengths, taken before a nested parse.
///
/// Only the list buffers whose elements carry spans inline are recorded; id
/// lists need no rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArenaMark {
    decls: usize,
    stmts: usize,
    simple_stmts: usize,
    exprs: usize,
    types: usize,
    signatures: usize,
    funcs: usize,
    fields: usize,
    switch_clauses: usize,
    comm_clauses: usize,
    type_params: usize,
    type_param_decls: usize,
    comments: usize,
    comment_groups: usize,
    ident_names: usize,
    specs: usize,
    type_terms: usize,
    interface_elems: usize,
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current allocation frontier.
    pub fn mark(&self) -> ArenaMark {
        ArenaMark {
            decls: self.decls.len(),
            stmts: self.stmts.len(),
            simple_stmts: self.simple_stmts.len(),
            exprs: self.exprs.len(),
            types: self.types.len(),
            signatures: self.signatures.len(),
            funcs: self.funcs.len(),
            fields: self.fields.len(),
            switch_clauses: self.switch_clauses.len(),
            comm_clauses: self.comm_clauses.len(),
            type_params: self.type_params.len(),
            type_param_decls: self.type_param_decls.len(),
            comments: self.comments.len(),
            comment_groups: self.comment_groups.len(),
            ident_names: self.extras.ident_names.len(),
            specs: self.extras.specs.len(),
            type_terms: self.extras.type_terms.len(),
            interface_elems: self.extras.interface_elems.len(),
        }
    }

    /// Applies `f` to every span of every node allocated after `mark`.
    pub fn shift_spans_since(&mut self, mark: ArenaMark, f: &mut dyn FnMut(Span) -> Span) {
        self.decls.shift_from(mark.decls, f);
        self.stmts.shift_from(mark.stmts, f);
        self.simple_stmts.shift_from(mark.simple_stmts, f);
        self.exprs.shift_from(mark.exprs, f);
        self.types.shift_from(mark.types, f);
        self.signatures.shift_from(mark.signatures, f);
        self.funcs.shift_from(mark.funcs, f);
        self.fields.shift_from(mark.fields, f);
        self.switch_clauses.shift_from(mark.switch_clauses, f);
        self.comm_clauses.shift_from(mark.comm_clauses, f);
        self.type_params.shift_from(mark.type_params, f);
        self.type_param_decls.shift_from(mark.type_param_decls, f);
        self.comments.shift_from(mark.comments, f);
        self.comment_groups.shift_from(mark.comment_groups, f);

        let extras = &mut self.extras;
        for n in extras.ident_names.iter_mut().skip(mark.ident_names) {
            n.shift_spans(f);
        }
        for s in extras.specs.iter_mut().skip(mark.specs) {
            s.shift_spans(f);
        }
        for t in extras.type_terms.iter_mut().skip(mark.type_terms) {
            t.shift_spans(f);
        }
        for e in extras.interface_elems.iter_mut().skip(mark.interface_elems) {
            e.shift_spans(f);
        }
    }

    #[inline]
    fn push_list<T>(buf: &mut Vec<T>, items: impl IntoIterator<Item = T>) -> ListRef<T> {
        let start = buf.len();
        buf.extend(items);
        let len = buf.len() - start;
        debug_assert!(start <= u32::MAX as usize);
        debug_assert!(len <= u32::MAX as usize);
        ListRef::new(start as u32, len as u32)
    }

    #[inline]
    fn slice<T>(buf: &[T], r: ListRef<T>) -> &[T] {
        &buf[r.start() as usize..r.end() as usize]
    }

    #[inline]
    fn slice_mut<T>(buf: &mut [T], r: ListRef<T>) -> &mut [T] {
        &mut buf[r.start() as usize..r.end() as usize]
    }

    // List Builders

    pub fn list_ident_names(
        &mut self,
        i: impl IntoIterator<Item = IdentName>,
    ) -> ListRef<IdentName> {
        Self::push_list(&mut self.extras.ident_names, i)
    }

    pub fn list_exprs(&mut self, i: impl IntoIterator<Item = ExprId>) -> ListRef<ExprId> {
        Self::push_list(&mut self.extras.exprs, i)
    }

    pub fn list_stmts(&mut self, i: impl IntoIterator<Item = StmtId>) -> ListRef<StmtId> {
        Self::push_list(&mut self.extras.stmts, i)
    }

    pub fn list_types(&mut self, i: impl IntoIterator<Item = TypeId>) -> ListRef<TypeId> {
        Self::push_list(&mut self.extras.types, i)
    }

    pub fn list_fields(&mut self, i: impl IntoIterator<Item = FieldId>) -> ListRef<FieldId> {
        Self::push_list(&mut self.extras.fields, i)
    }

    pub fn list_specs(&mut self, i: impl IntoIterator<Item = Spec>) -> ListRef<Spec> {
        Self::push_list(&mut self.extras.specs, i)
    }

    pub fn list_top_decls(
        &mut self,
        i: impl IntoIterator<Item = TopLevelDecl>,
    ) -> ListRef<TopLevelDecl> {
        Self::push_list(&mut self.extras.top_decls, i)
    }

    pub fn list_switch_clause_ids(
        &mut self,
        i: impl IntoIterator<Item = SwitchClauseId>,
    ) -> ListRef<SwitchClauseId> {
        Self::push_list(&mut self.extras.switch_clause_ids, i)
    }

    pub fn list_comm_clause_ids(
        &mut self,
        i: impl IntoIterator<Item = CommClauseId>,
    ) -> ListRef<CommClauseId> {
        Self::push_list(&mut self.extras.comm_clause_ids, i)
    }

    pub fn list_type_terms(&mut self, i: impl IntoIterator<Item = TypeTerm>) -> ListRef<TypeTerm> {
        Self::push_list(&mut self.extras.type_terms, i)
    }

    pub fn list_interface_elems(
        &mut self,
        i: impl IntoIterator<Item = InterfaceElem>,
    ) -> ListRef<InterfaceElem> {
        Self::push_list(&mut self.extras.interface_elems, i)
    }

    pub fn list_type_param_decl_ids(
        &mut self,
        i: impl IntoIterator<Item = TypeParamDeclId>,
    ) -> ListRef<TypeParamDeclId> {
        Self::push_list(&mut self.extras.type_param_decl_ids, i)
    }

    pub fn list_comment_ids(
        &mut self,
        i: impl IntoIterator<Item = CommentId>,
    ) -> ListRef<CommentId> {
        Self::push_list(&mut self.extras.comment_ids, i)
    }

    pub fn list_comment_group_ids(
        &mut self,
        i: impl IntoIterator<Item = CommentGroupId>,
    ) -> ListRef<CommentGroupId> {
        Self::push_list(&mut self.extras.comment_group_ids, i)
    }

    // List Accessors

    pub fn ident_names(&self, r: ListRef<IdentName>) -> &[IdentName] {
        Self::slice(&self.extras.ident_names, r)
    }

    pub fn exprs_list(&self, r: ListRef<ExprId>) -> &[ExprId] {
        Self::slice(&self.extras.exprs, r)
    }

    pub fn stmts_list(&self, r: ListRef<StmtId>) -> &[StmtId] {
        Self::slice(&self.extras.stmts, r)
    }

    pub fn types_list(&self, r: ListRef<TypeId>) -> &[TypeId] {
        Self::slice(&self.extras.types, r)
    }

    pub fn fields_list(&self, r: ListRef<FieldId>) -> &[FieldId] {
        Self::slice(&self.extras.fields, r)
    }

    pub fn specs_list(&self, r: ListRef<Spec>) -> &[Spec] {
        Self::slice(&self.extras.specs, r)
    }

    pub fn top_decls(&self, r: ListRef<TopLevelDecl>) -> &[TopLevelDecl] {
        Self::slice(&self.extras.top_decls, r)
    }

    pub fn switch_clause_ids(&self, r: ListRef<SwitchClauseId>) -> &[SwitchClauseId] {
        Self::slice(&self.extras.switch_clause_ids, r)
    }

    pub fn comm_clause_ids(&self, r: ListRef<CommClauseId>) -> &[CommClauseId] {
        Self::slice(&self.extras.comm_clause_ids, r)
    }

    pub fn type_terms(&self, r: ListRef<TypeTerm>) -> &[TypeTerm] {
        Self::slice(&self.extras.type_terms, r)
    }

    pub fn interface_elems(&self, r: ListRef<InterfaceElem>) -> &[InterfaceElem] {
        Self::slice(&self.extras.interface_elems, r)
    }

    pub fn type_param_decl_ids(&self, r: ListRef<TypeParamDeclId>) -> &[TypeParamDeclId] {
        Self::slice(&self.extras.type_param_decl_ids, r)
    }

    pub fn comment_ids(&self, r: ListRef<CommentId>) -> &[CommentId] {
        Self::slice(&self.extras.comment_ids, r)
    }

    pub fn comment_group_ids(&self, r: ListRef<CommentGroupId>) -> &[CommentGroupId] {
        Self::slice(&self.extras.comment_group_ids, r)
    }

    // Mutable list access (slot replacement keeps list lengths unchanged)

    pub fn exprs_list_mut(&mut self, r: ListRef<ExprId>) -> &mut [ExprId] {
        Self::slice_mut(&mut self.extras.exprs, r)
    }

    pub fn stmts_list_mut(&mut self, r: ListRef<StmtId>) -> &mut [StmtId] {
        Self::slice_mut(&mut self.extras.stmts, r)
    }

    pub fn types_list_mut(&mut self, r: ListRef<TypeId>) -> &mut [TypeId] {
        Self::slice_mut(&mut self.extras.types, r)
    }

    pub fn ident_names_mut(&mut self, r: ListRef<IdentName>) -> &mut [IdentName] {
        Self::slice_mut(&mut self.extras.ident_names, r)
    }

    pub fn specs_list_mut(&mut self, r: ListRef<Spec>) -> &mut [Spec] {
        Self::slice_mut(&mut self.extras.specs, r)
    }

    pub fn type_terms_mut(&mut self, r: ListRef<TypeTerm>) -> &mut [TypeTerm] {
        Self::slice_mut(&mut self.extras.type_terms, r)
    }

    pub fn interface_elems_mut(&mut self, r: ListRef<InterfaceElem>) -> &mut [InterfaceElem] {
        Self::slice_mut(&mut self.extras.interface_elems, r)
    }
}

// =============================================================================
// Comments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
}

/// Comment token (text is recovered from source via span).
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct Comment {
    pub kind: CommentKind,
}

/// Run of comments with no blank line between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct CommentGroup {
    pub comments: ListRef<CommentId>,
}

// =============================================================================
// Source File / Declarations
// =============================================================================

/// Root of a parsed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct SourceFile {
    /// Whole buffer, `0..len`.
    pub span: Span,
    pub package_pos: Span,
    pub name: IdentName,
    pub decls: ListRef<TopLevelDecl>,
    pub comments: ListRef<CommentGroupId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub enum TopLevelDecl {
    Decl(DeclId),
    Func(FuncDeclId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub enum Decl {
    /// `import`, `const`, `type` or `var` declaration.
    Gen(GenDecl),
    /// Unparseable top-level span.
    Bad(Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct GenDecl {
    pub kw_pos: Span,
    pub kind: GenDeclKind,
    pub l_paren: Option<Span>,
    pub specs: ListRef<Spec>,
    pub r_paren: Option<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GenDeclKind {
    Import,
    Const,
    Type,
    Var,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

/// `[name] "path"`; `name` may be `.` or `_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct ImportSpec {
    pub name: Option<IdentName>,
    pub path: StringLit,
}

/// `names [type] [= values]` in a const or var declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct ValueSpec {
    pub names: ListRef<IdentName>,
    pub typ: Option<TypeId>,
    pub assign_pos: Option<Span>,
    pub values: ListRef<ExprId>,
}

/// `name [params] [=] type`; `assign_pos` marks an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct TypeSpec {
    pub name: IdentName,
    pub type_params: Option<TypeParamsId>,
    pub assign_pos: Option<Span>,
    pub typ: TypeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct FuncDecl {
    pub func_pos: Span,
    pub recv: Option<FieldList>,
    pub name: IdentName,
    pub type_params: Option<TypeParamsId>,
    pub sig: SignatureId,
    pub body: Option<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct TypeParams {
    pub l_brack: Span,
    pub decls: ListRef<TypeParamDeclId>,
    pub r_brack: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct TypeParamDecl {
    pub names: ListRef<IdentName>,
    pub constraint: TypeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct Signature {
    pub params: FieldList,
    pub results: Option<Results>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub enum Results {
    /// Single unparenthesized result type.
    Type(TypeId),
    List(FieldList),
}

/// Parenthesized parameter list or braced struct field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct FieldList {
    pub open: Span,
    pub fields: ListRef<FieldId>,
    pub close: Span,
}

/// Parameter, result or struct field. Embedded fields have no names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct Field {
    pub names: ListRef<IdentName>,
    pub ellipsis_pos: Option<Span>,
    pub typ: TypeId,
    pub tag: Option<StringLit>,
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub enum SimpleStmt {
    Empty,
    Expr(ExprId),
    Send {
        chan: ExprId,
        arrow_pos: Span,
        value: ExprId,
    },
    IncDec {
        expr: ExprId,
        op: IncDecOp,
        op_pos: Span,
    },
    /// Plain, compound (`+=`) and defining (`:=`) assignment.
    Assign {
        lhs: ListRef<ExprId>,
        op: AssignOp,
        op_pos: Span,
        rhs: ListRef<ExprId>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub enum Stmt {
    Simple(SimpleStmtId),
    Decl(DeclId),
    Labeled {
        label: IdentName,
        colon_pos: Span,
        stmt: StmtId,
    },
    Go {
        go_pos: Span,
        call: ExprId,
    },
    Defer {
        defer_pos: Span,
        call: ExprId,
    },
    Return {
        return_pos: Span,
        results: ListRef<ExprId>,
    },
    Branch {
        kind: BranchKind,
        kw_pos: Span,
        label: Option<IdentName>,
    },
    Block(Block),
    If {
        if_pos: Span,
        init: Option<SimpleStmtId>,
        cond: ExprId,
        then_block: Block,
        else_stmt: Option<StmtId>,
    },
    For {
        for_pos: Span,
        kind: ForKind,
        body: Block,
    },
    Switch {
        switch_pos: Span,
        init: Option<SimpleStmtId>,
        tag: Option<ExprId>,
        body: Block,
        clauses: ListRef<SwitchClauseId>,
    },
    /// `assign` is `x.(type)` or `v := x.(type)`.
    TypeSwitch {
        switch_pos: Span,
        init: Option<SimpleStmtId>,
        assign: SimpleStmtId,
        body: Block,
        clauses: ListRef<SwitchClauseId>,
    },
    Select {
        select_pos: Span,
        body: Block,
        clauses: ListRef<CommClauseId>,
    },
    /// Unparseable statement; only its span is known.
    Bad(Span),
}

/// Header of a `for` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub enum ForKind {
    Infinite,
    Cond(ExprId),
    Clause {
        init: Option<SimpleStmtId>,
        cond: Option<ExprId>,
        post: Option<SimpleStmtId>,
    },
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        op: Option<AssignOp>,
        op_pos: Option<Span>,
        range_pos: Span,
        expr: ExprId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct SwitchClause {
    pub case_pos: Span,
    /// Empty for `default`.
    pub items: ListRef<ExprId>,
    pub is_default: bool,
    pub colon_pos: Span,
    pub stmts: ListRef<StmtId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct CommClause {
    pub case_pos: Span,
    /// `None` for `default`.
    pub comm: Option<SimpleStmtId>,
    pub colon_pos: Span,
    pub stmts: ListRef<StmtId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

/// `{ stmts }`. For switch/select bodies `stmts` is empty and the clauses
/// live on the statement. Brace spans are wherever the parser expected the
/// brace, which is not necessarily a brace in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct Block {
    pub l_brace: Span,
    pub stmts: ListRef<StmtId>,
    pub r_brace: Span,
}

// =============================================================================
// Expressions
// =============================================================================

/// `{ elts }` of a composite literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct LiteralValue {
    pub l_brace: Span,
    pub elts: ListRef<ExprId>,
    pub r_brace: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub enum Expr {
    Ident(Ident, Span),
    BasicLit(BasicLit),
    FuncLit {
        func_pos: Span,
        sig: SignatureId,
        body: Block,
    },
    /// `T{...}`; `typ` is `None` for elided types in nested literals.
    CompositeLit {
        typ: Option<TypeId>,
        lit: LiteralValue,
    },
    /// `key: value` inside a composite literal.
    KeyValue {
        key: ExprId,
        colon_pos: Span,
        value: ExprId,
    },
    /// Indexing or generic instantiation: `a[i]`, `F[int, string]`.
    Index {
        base: ExprId,
        l_brack: Span,
        indices: ListRef<ExprId>,
        r_brack: Span,
    },
    Paren {
        l_paren: Span,
        expr: ExprId,
        r_paren: Span,
    },
    /// `x.sel`. When the member name is missing the parser synthesizes `_`
    /// at the next token's offset (see `crate::parser`).
    Selector {
        expr: ExprId,
        dot_pos: Span,
        sel: IdentName,
    },
    Slice {
        expr: ExprId,
        l_brack: Span,
        lo: Option<ExprId>,
        hi: Option<ExprId>,
        max: Option<ExprId>,
        r_brack: Span,
    },
    /// `x.(T)`; `typ` is `None` for `x.(type)`.
    TypeAssert {
        expr: ExprId,
        dot_pos: Span,
        l_paren: Span,
        typ: Option<TypeId>,
        r_paren: Span,
    },
    Call {
        callee: ExprId,
        l_paren: Span,
        args: ListRef<ExprId>,
        ellipsis: Option<Span>,
        r_paren: Span,
    },
    Unary {
        op: UnaryOp,
        op_pos: Span,
        expr: ExprId,
    },
    Binary {
        left: ExprId,
        op: BinaryOp,
        op_pos: Span,
        right: ExprId,
    },
    /// Type in expression position: `make([]int, n)`, `new(T)`.
    Type(TypeId),
    /// Unparseable expression; only its span is known.
    Bad(Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct BasicLit {
    pub kind: BasicLitKind,
    pub raw: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BasicLitKind {
    Int,
    Float,
    Imag,
    Rune,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct StringLit {
    pub raw: Span,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub enum Type {
    /// `Name`, `pkg.Name`, `Name[Args]`.
    Named {
        pkg: Option<IdentName>,
        name: IdentName,
        args: ListRef<TypeId>,
    },
    Pointer {
        star_pos: Span,
        elem: TypeId,
    },
    /// `[N]T` or `[...]T`.
    Array {
        l_brack: Span,
        len: ArrayLen,
        r_brack: Span,
        elem: TypeId,
    },
    Slice {
        l_brack: Span,
        r_brack: Span,
        elem: TypeId,
    },
    Map {
        map_pos: Span,
        key: TypeId,
        val: TypeId,
    },
    Chan {
        dir: ChanDir,
        chan_pos: Span,
        arrow_pos: Option<Span>,
        elem: TypeId,
    },
    Struct {
        struct_pos: Span,
        fields: FieldList,
    },
    Interface {
        interface_pos: Span,
        l_brace: Span,
        elems: ListRef<InterfaceElem>,
        r_brace: Span,
    },
    Func {
        func_pos: Span,
        sig: SignatureId,
    },
    Paren {
        l_paren: Span,
        typ: TypeId,
        r_paren: Span,
    },
    /// `A | ~B` in constraints and interface elements.
    Union {
        terms: ListRef<TypeTerm>,
    },
    Bad(Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub enum ArrayLen {
    Expr(ExprId),
    Ellipsis(Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub struct TypeTerm {
    pub tilde_pos: Option<Span>,
    pub typ: TypeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst, ShiftSpans)]
pub enum InterfaceElem {
    Method { name: IdentName, sig: SignatureId },
    Embed(TypeId),
}

// =============================================================================
// Operators
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Add,   // +
    Sub,   // -
    Not,   // !
    Xor,   // ^
    Deref, // *
    Addr,  // &
    Recv,  // <-
    Tilde, // ~
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,    // +
    Sub,    // -
    Mul,    // *
    Div,    // /
    Mod,    // %
    And,    // &
    Or,     // |
    Xor,    // ^
    Shl,    // <<
    Shr,    // >>
    AndNot, // &^
    LAnd,   // &&
    LOr,    // ||
    Eq,     // ==
    Ne,     // !=
    Lt,     // <
    Le,     // <=
    Gt,     // >
    Ge,     // >=
}

impl BinaryOp {
    /// Go operator precedence, 1 (lowest) to 5.
    pub const fn precedence(self) -> u8 {
        match self {
            Self::LOr => 1,
            Self::LAnd => 2,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => 3,
            Self::Add | Self::Sub | Self::Or | Self::Xor => 4,
            Self::Mul
            | Self::Div
            | Self::Mod
            | Self::Shl
            | Self::Shr
            | Self::And
            | Self::AndNot => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,       // =
    Define,       // :=
    AddAssign,    // +=
    SubAssign,    // -=
    MulAssign,    // *=
    DivAssign,    // /=
    ModAssign,    // %=
    AndAssign,    // &=
    OrAssign,     // |=
    XorAssign,    // ^=
    ShlAssign,    // <<=
    ShrAssign,    // >>=
    AndNotAssign, // &^=
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOp {
    Inc, // ++
    Dec, // --
}
