use proc_macro::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::{Data, DeriveInput, Fields, Index, parse_macro_input, spanned::Spanned};

/// Generates `crate::walk::Walk`, visiting every field in declaration order.
#[proc_macro_derive(WalkAst)]
pub fn derive_walk_ast(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let span = input.span();

    let walk_body = match generate_body(&input.data, "WalkAst", &WALK) {
        Ok(body) => body,
        Err(err) => return err.into_compile_error().into(),
    };

    let expanded = quote_spanned! {span =>
        impl<'ast> crate::walk::Walk<'ast> for #name {
            #[inline(always)]
            fn walk<V: crate::walk::Visitor<'ast> + ?Sized>(
                &self,
                a: &'ast crate::ast::AstArena,
                v: &mut V
            ) {
                #walk_body
            }
        }
    };

    expanded.into()
}

/// Generates `crate::shift::ShiftSpans`, rewriting every `Span` reachable
/// through the node's fields (ids and list refs are left alone).
#[proc_macro_derive(ShiftSpans)]
pub fn derive_shift_spans(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let span = input.span();

    let shift_body = match generate_body(&input.data, "ShiftSpans", &SHIFT) {
        Ok(body) => body,
        Err(err) => return err.into_compile_error().into(),
    };

    let expanded = quote_spanned! {span =>
        impl crate::shift::ShiftSpans for #name {
            #[inline]
            fn shift_spans(&mut self, f: &mut dyn FnMut(crate::ast::Span) -> crate::ast::Span) {
                #shift_body
            }
        }
    };

    expanded.into()
}

/// How a derive turns one field binding into a statement.
struct FieldCall {
    /// Struct fields are borrowed mutably.
    by_mut: bool,
    call: fn(proc_macro2::TokenStream) -> proc_macro2::TokenStream,
}

fn walk_call(binding: proc_macro2::TokenStream) -> proc_macro2::TokenStream {
    quote! { crate::walk::Walk::walk(#binding, a, v); }
}

fn shift_call(binding: proc_macro2::TokenStream) -> proc_macro2::TokenStream {
    quote! { crate::shift::ShiftSpans::shift_spans(#binding, f); }
}

const WALK: FieldCall = FieldCall {
    by_mut: false,
    call: walk_call,
};

const SHIFT: FieldCall = FieldCall {
    by_mut: true,
    call: shift_call,
};

fn generate_body(
    data: &Data,
    derive: &str,
    fc: &FieldCall,
) -> syn::Result<proc_macro2::TokenStream> {
    match data {
        Data::Struct(data_struct) => Ok(generate_fields(&data_struct.fields, fc)),
        Data::Enum(data_enum) => {
            let arms = data_enum
                .variants
                .iter()
                .map(|variant| generate_variant_arm(&variant.ident, &variant.fields, fc))
                .collect::<Vec<_>>();

            Ok(quote! {
                match self {
                    #(#arms)*
                }
            })
        }
        Data::Union(u) => Err(syn::Error::new_spanned(
            u.union_token,
            format!("{derive} cannot be derived for unions"),
        )),
    }
}

fn generate_fields(fields: &Fields, fc: &FieldCall) -> proc_macro2::TokenStream {
    let calls = fields.iter().enumerate().map(|(i, field)| {
        let member = match &field.ident {
            Some(ident) => quote! { #ident },
            None => {
                let index = Index::from(i);
                quote! { #index }
            }
        };
        let access = if fc.by_mut {
            quote! { &mut self.#member }
        } else {
            quote! { &self.#member }
        };
        (fc.call)(access)
    });

    quote! { #(#calls)* }
}

fn generate_variant_arm(
    variant_name: &syn::Ident,
    fields: &Fields,
    fc: &FieldCall,
) -> proc_macro2::TokenStream {
    match fields {
        Fields::Unit => {
            quote! { Self::#variant_name => {} }
        }
        Fields::Named(fields_named) => {
            let bindings: Vec<_> = fields_named
                .named
                .iter()
                .filter_map(|f| f.ident.as_ref())
                .collect();

            let calls = bindings.iter().map(|name| (fc.call)(quote! { #name }));

            quote! {
                Self::#variant_name { #(#bindings),* } => {
                    #(#calls)*
                }
            }
        }
        Fields::Unnamed(fields_unnamed) => {
            let bindings: Vec<_> = (0..fields_unnamed.unnamed.len())
                .map(|i| format_ident!("f{}", i))
                .collect();

            let calls = bindings.iter().map(|var| (fc.call)(quote! { #var }));

            quote! {
                Self::#variant_name(#(#bindings),*) => {
                    #(#calls)*
                }
            }
        }
    }
}
