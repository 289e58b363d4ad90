//! File-scope object table.

use std::collections::HashMap;

use crate::ast::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjKind {
    Const,
    Type,
    Var,
    Func,
}

/// A package-level name declared in this file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Object {
    pub kind: ObjKind,
    pub name: IdentName,
}

/// Package-level declarations of one file, first declaration wins.
#[derive(Debug, Clone, Default)]
pub struct FileScope {
    objects: HashMap<Symbol, Object>,
}

impl FileScope {
    pub fn lookup(&self, sym: Symbol) -> Option<&Object> {
        self.objects.get(&sym)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Object> + '_ {
        self.objects.values()
    }

    fn declare(&mut self, blank: Option<Symbol>, kind: ObjKind, name: IdentName) {
        if Some(name.sym) == blank {
            return;
        }
        self.objects.entry(name.sym).or_insert(Object { kind, name });
    }
}

/// Collects the consts, types, vars and (non-method) funcs declared at the
/// top level of `file`.
pub fn resolve_file(arena: &AstArena, interner: &Interner, file: &SourceFile) -> FileScope {
    let blank = interner.get("_");
    let mut scope = FileScope::default();

    for decl in arena.top_decls(file.decls) {
        match *decl {
            TopLevelDecl::Func(id) => {
                let func = &arena.funcs[id];
                if func.recv.is_none() && interner.resolve(func.name.sym) != "init" {
                    scope.declare(blank, ObjKind::Func, func.name);
                }
            }
            TopLevelDecl::Decl(id) => {
                let Decl::Gen(gen_decl) = arena.decls[id] else {
                    continue;
                };
                for spec in arena.specs_list(gen_decl.specs) {
                    match spec {
                        Spec::Import(_) => {}
                        Spec::Type(ts) => scope.declare(blank, ObjKind::Type, ts.name),
                        Spec::Value(vs) => {
                            let kind = if gen_decl.kind == GenDeclKind::Const {
                                ObjKind::Const
                            } else {
                                ObjKind::Var
                            };
                            for &name in arena.ident_names(vs.names) {
                                scope.declare(blank, kind, name);
                            }
                        }
                    }
                }
            }
        }
    }
    scope
}
