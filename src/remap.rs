//! Moving freshly parsed nodes into the coordinates of the file being
//! repaired.

use std::ops::Range;

use go125_parser::ast::{ArenaMark, AstArena, Span};

/// Adds `delta` to every span of every node allocated after `mark`, clamping
/// each position to `[0, file_len]`.
///
/// Returns how many positions that originally fell inside `counted` had to
/// be clamped; positions outside it (wrapper scaffolding) are clamped
/// without being counted.
pub(crate) fn shift_since(
    arena: &mut AstArena,
    mark: ArenaMark,
    delta: i64,
    file_len: usize,
    counted: Range<usize>,
) -> usize {
    let mut clamped = 0;
    let max = file_len as i64;
    let mut move_pos = |pos: u32| -> u32 {
        let moved = i64::from(pos) + delta;
        let inside = counted.contains(&(pos as usize)) || pos as usize == counted.end;
        if !(0..=max).contains(&moved) && inside {
            clamped += 1;
        }
        moved.clamp(0, max) as u32
    };
    arena.shift_spans_since(mark, &mut |span: Span| Span {
        start: move_pos(span.start),
        end: move_pos(span.end),
    });
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use go125_parser::ast::Expr;

    #[test]
    fn shifts_only_new_nodes_and_clamps() {
        let mut arena = AstArena::new();
        let old = arena.exprs.alloc(Expr::Bad(Span::new(1, 2)), Span::new(1, 2));
        let mark = arena.mark();
        let new = arena.exprs.alloc(Expr::Bad(Span::new(20, 30)), Span::new(20, 30));

        let clamped = shift_since(&mut arena, mark, 5, 32, 20..30);

        assert_eq!(arena.exprs.span(old), Span::new(1, 2));
        assert_eq!(arena.exprs.span(new), Span::new(25, 32));
        assert_eq!(arena.exprs[new], Expr::Bad(Span::new(25, 32)));
        // end 30 -> 35, clamped in both the field and the side table
        assert_eq!(clamped, 2);
    }
}
