//! Position rewriting for nodes produced by a nested parse.
//!
//! `#[derive(ShiftSpans)]` visits every field of a node; ids and list refs are
//! opaque here because the nodes and lists they point at are rewritten through
//! `AstArena::shift_spans_since`.

use crate::ast::*;

pub trait ShiftSpans {
    fn shift_spans(&mut self, f: &mut dyn FnMut(Span) -> Span);
}

impl ShiftSpans for Span {
    #[inline]
    fn shift_spans(&mut self, f: &mut dyn FnMut(Span) -> Span) {
        *self = f(*self);
    }
}

impl<T: ShiftSpans> ShiftSpans for Option<T> {
    #[inline]
    fn shift_spans(&mut self, f: &mut dyn FnMut(Span) -> Span) {
        if let Some(x) = self {
            x.shift_spans(f);
        }
    }
}

impl<T> ShiftSpans for Id<T> {
    #[inline(always)]
    fn shift_spans(&mut self, _: &mut dyn FnMut(Span) -> Span) {}
}

impl<T> ShiftSpans for ListRef<T> {
    #[inline(always)]
    fn shift_spans(&mut self, _: &mut dyn FnMut(Span) -> Span) {}
}

macro_rules! impl_shift_noop {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ShiftSpans for $ty {
                #[inline(always)]
                fn shift_spans(&mut self, _: &mut dyn FnMut(Span) -> Span) {}
            }
        )*
    };
}

impl_shift_noop! {
    Symbol,
    bool,
    GenDeclKind,
    BasicLitKind,
    BranchKind,
    ChanDir,
    UnaryOp,
    BinaryOp,
    AssignOp,
    IncDecOp,
    CommentKind,
}
