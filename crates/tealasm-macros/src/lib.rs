use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Expr};

mod parser;
use parser::{count_placeholders, parse_asm_input, render_source, AsmToken};

fn compile_error(message: String) -> TokenStream {
    TokenStream::from(quote! {
        compile_error!(#message)
    })
}

/// Assembles a TEAL listing at compile time into a `Vec<u8>`.
///
/// Accepts a string literal or an array of line literals. Assembly errors
/// are reported as compile errors.
#[proc_macro]
pub fn teal_asm(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as Expr);

    let tokens = match parse_asm_input(&input) {
        Ok(tokens) => tokens,
        Err(e) => return compile_error(format!("Parse error: {}", e)),
    };
    if tokens.iter().any(|t| matches!(t, AsmToken::Placeholder(_))) {
        return compile_error(
            "Placeholders are only allowed in teal_asm_interpolator!".to_string(),
        );
    }

    let source = render_source(&tokens, |_| String::new());
    match tealasm_common::assemble_str(&source) {
        Ok(bytes) => TokenStream::from(quote! {
            {
                let program: ::std::vec::Vec<u8> = vec![#(#bytes),*];
                program
            }
        }),
        Err(e) => compile_error(format!("Assembly error: {}", e)),
    }
}

/// Builds a closure that assembles a listing with `&[index]` placeholders
/// filled in from boxed [`TealEncodable`] values.
///
/// The literal lines are checked at compile time; placeholder values are
/// only assembled when the closure runs.
#[proc_macro]
pub fn teal_asm_interpolator(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as Expr);

    let tokens = match parse_asm_input(&input) {
        Ok(tokens) => tokens,
        Err(e) => return compile_error(format!("Parse error: {}", e)),
    };

    // Placeholders become blank lines so declared blocks and line numbers
    // in the literal lines are checked as written.
    let probe = render_source(&tokens, |_| String::new());
    if let Err(e) = tealasm_common::assemble_str(&probe) {
        return compile_error(format!("Assembly error: {}", e));
    }

    let placeholder_count = count_placeholders(&tokens);
    let param_names: Vec<_> = (0..placeholder_count)
        .map(|i| syn::Ident::new(&format!("arg{}", i), proc_macro2::Span::call_site()))
        .collect();

    let pushes: Vec<TokenStream2> = tokens
        .iter()
        .map(|token| match token {
            AsmToken::Line(line) => quote! { source.push_str(#line); },
            AsmToken::Placeholder(idx) => quote! { source.push_str(&values[#idx].to_teal_line()); },
        })
        .collect();

    let expanded = quote! {
        {
            use tealasm_common::TealEncodable;

            move |#(#param_names: Box<dyn TealEncodable>),*| -> Vec<u8> {
                let values: Vec<Box<dyn TealEncodable>> = vec![#(#param_names),*];
                let mut source = String::new();
                #(
                    #pushes
                    source.push('\n');
                )*
                tealasm_common::assemble_str(&source).expect("Assembly failed")
            }
        }
    };

    TokenStream::from(expanded)
}
