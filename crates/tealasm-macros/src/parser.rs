use syn::{Expr, ExprLit, ExprReference, Lit};

#[derive(Debug, Clone)]
pub enum AsmToken {
    Line(String),
    Placeholder(usize),
}

/// Accepts either a single string literal holding the whole listing or an
/// array whose elements are string literals and `&[index]` placeholders.
pub fn parse_asm_input(expr: &Expr) -> Result<Vec<AsmToken>, String> {
    match expr {
        Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => Ok(split_lines(&s.value())),
        Expr::Array(arr) => {
            let mut result = Vec::new();
            for elem in &arr.elems {
                result.extend(parse_single_element(elem)?);
            }
            Ok(result)
        }
        _ => Err("Expected a string literal or an array of lines".to_string()),
    }
}

fn parse_single_element(expr: &Expr) -> Result<Vec<AsmToken>, String> {
    match expr {
        Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => Ok(split_lines(&s.value())),

        Expr::Reference(ExprReference { expr: inner, .. }) => {
            if let Expr::Array(arr) = &**inner {
                if arr.elems.len() == 1 {
                    if let Expr::Lit(ExprLit { lit: Lit::Int(i), .. }) = &arr.elems[0] {
                        let idx = i
                            .base10_parse::<usize>()
                            .map_err(|e| format!("Failed to parse placeholder index: {}", e))?;
                        return Ok(vec![AsmToken::Placeholder(idx)]);
                    }
                }
            }
            Err("Invalid placeholder syntax, expected &[index]".to_string())
        }

        _ => Err("Unsupported expression type in assembly, expected a string line".to_string()),
    }
}

fn split_lines(text: &str) -> Vec<AsmToken> {
    text.lines().map(|line| AsmToken::Line(line.to_string())).collect()
}

/// Joins the tokens into a listing, rendering each placeholder with `fill`.
pub fn render_source(tokens: &[AsmToken], fill: impl Fn(usize) -> String) -> String {
    let mut source = String::new();
    for token in tokens {
        match token {
            AsmToken::Line(line) => source.push_str(line),
            AsmToken::Placeholder(idx) => source.push_str(&fill(*idx)),
        }
        source.push('\n');
    }
    source
}

/// Number of closure parameters needed to cover every placeholder index.
pub fn count_placeholders(tokens: &[AsmToken]) -> usize {
    tokens
        .iter()
        .filter_map(|token| match token {
            AsmToken::Placeholder(idx) => Some(idx + 1),
            AsmToken::Line(_) => None,
        })
        .max()
        .unwrap_or(0)
}
