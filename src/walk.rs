//! Literal walker — converts a defaults initializer expression into a
//! document tree.
//!
//! The walker only accepts directly written, statically inspectable
//! literals: struct literals, sequence literals (`[…]` / `vec![…]`), map
//! macros (`btreemap! { k => v }` and friends), scalars, and bare
//! identifiers. Anything computed is a hard error — a wrong defaults
//! document is worse than no document.

use crate::comments::{Claimed, Pos};
use crate::model::{join_docs, DocNode};
use crate::resolve::{self, TypeRef};
use crate::unit::{FieldDef, Registry, TypeDef, TypeKind, Unit};
use anyhow::{bail, Context, Result};
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Expr, ExprStruct, Lit, Token};

/// The closed set of literal shapes the walker understands.
enum Literal {
    Struct(ExprStruct),
    Sequence(Vec<Expr>),
    Map(Vec<(Expr, Expr)>),
    Scalar(String),
    Ident(String),
    /// A key/value pair in value position — always a malformed literal.
    Entry,
}

/// Macro names accepted as map literals, bare or path-qualified.
const MAP_MACROS: &[&str] = &["btreemap", "hashmap", "indexmap"];

pub struct Walker<'a> {
    registry: &'a Registry,
    /// Unit whose source contains the literal being walked; comment lookups
    /// always target this unit.
    unit: &'a Unit,
    claimed: Claimed,
}

impl<'a> Walker<'a> {
    pub fn new(registry: &'a Registry, unit: &'a Unit) -> Walker<'a> {
        Walker {
            registry,
            unit,
            claimed: Claimed::default(),
        }
    }

    pub fn walk(&mut self, expr: &Expr) -> Result<DocNode> {
        match classify_expr(expr)? {
            Literal::Struct(lit) => self.walk_struct(&lit),
            Literal::Sequence(elems) => self.walk_sequence(&elems),
            Literal::Map(entries) => self.walk_map(&entries),
            Literal::Scalar(value) => Ok(DocNode::scalar(value)),
            Literal::Ident(name) => Ok(DocNode::scalar(name)),
            Literal::Entry => {
                bail!("refusing to walk a key/value pair where a single value is expected")
            }
        }
    }

    fn walk_struct(&mut self, lit: &ExprStruct) -> Result<DocNode> {
        if lit.rest.is_some() {
            bail!("unsupported struct update syntax (`..`) in defaults literal");
        }
        let tydef = self.resolve_struct_type(&lit.path)?;
        if !matches!(tydef.kind, TypeKind::Struct(_)) {
            bail!("`{}` is not a struct type", tydef.name);
        }

        let mut children = Vec::new();
        for fv in &lit.fields {
            let syn::Member::Named(ident) = &fv.member else {
                bail!("unsupported tuple struct literal `{}`", tydef.name);
            };
            // A literal key missing from the declared fields is skipped: the
            // literal is assumed well-typed by the compiler.
            let Some(field) = tydef.field(&ident.to_string()) else {
                continue;
            };

            let mut docs: Vec<String> = Vec::new();
            if let Some(doc) = self.field_type_doc(tydef, field)? {
                docs.push(doc);
            }
            if let Some(doc) = &field.doc {
                docs.push(doc.clone());
            }
            if let Some(comment) = self.locate(fv.expr.span().start().into()) {
                docs.push(comment);
            }

            children.push(DocNode::scalar(field.key.clone()).with_head_comment(join_docs(&docs)));
            children.push(self.walk(&fv.expr)?);
        }
        Ok(DocNode::mapping(children))
    }

    fn walk_sequence(&mut self, elems: &[Expr]) -> Result<DocNode> {
        let mut children = Vec::new();
        for elem in elems {
            let mut node = self.walk(elem)?;
            // The element is walked first; its own preceding comment is
            // appended afterwards, never displacing comments claimed by a
            // nested walk.
            if let Some(comment) = self.locate(elem.span().start().into()) {
                node.append_head_comment(&comment);
            }
            children.push(node);
        }
        Ok(DocNode::sequence(children))
    }

    fn walk_map(&mut self, entries: &[(Expr, Expr)]) -> Result<DocNode> {
        let mut children = Vec::new();
        for (key, value) in entries {
            let mut key_node = self.walk(key)?;
            // Map entries have no field declaration to consult; only a
            // directly preceding comment can document them.
            if let Some(comment) = self.locate(key.span().start().into()) {
                key_node.append_head_comment(&comment);
            }
            children.push(key_node);
            children.push(self.walk(value)?);
        }
        Ok(DocNode::mapping(children))
    }

    fn locate(&mut self, pos: Pos) -> Option<String> {
        self.unit
            .comments
            .locate(pos, &mut self.claimed)
            .map(str::to_string)
    }

    fn resolve_struct_type(&self, path: &syn::Path) -> Result<&'a TypeDef> {
        let tyref = match path.segments.len() {
            1 => TypeRef::Local(path.segments[0].ident.to_string()),
            2 => TypeRef::Foreign {
                alias: path.segments[0].ident.to_string(),
                name: path.segments[1].ident.to_string(),
            },
            _ => bail!("unsupported struct literal type path `{}`", path_text(path)),
        };
        match resolve::resolve(&tyref, self.unit, self.registry)? {
            Some(def) => Ok(def),
            None => bail!(
                "struct literal type `{}` does not name a declared type",
                path_text(path)
            ),
        }
    }

    /// Doc comment of a field's declared type, if that type is named and
    /// documented. Resolution runs against the unit declaring the struct,
    /// with its own import aliases.
    fn field_type_doc(&self, owner: &TypeDef, field: &FieldDef) -> Result<Option<String>> {
        let Some(declaring) = self.registry.get(&owner.unit) else {
            bail!("module `{}` is not loaded", owner.unit);
        };
        let tyref = resolve::classify(&field.ty);
        Ok(resolve::resolve(&tyref, declaring, self.registry)?.and_then(|def| def.doc.clone()))
    }
}

// -- Literal classification ---------------------------------------------------

fn classify_expr(expr: &Expr) -> Result<Literal> {
    match expr {
        Expr::Struct(lit) => Ok(Literal::Struct(lit.clone())),
        Expr::Array(arr) => Ok(Literal::Sequence(arr.elems.iter().cloned().collect())),
        Expr::Reference(r) => classify_expr(&r.expr),
        Expr::Paren(p) => classify_expr(&p.expr),
        Expr::Group(g) => classify_expr(&g.expr),
        Expr::Lit(lit) => Ok(Literal::Scalar(scalar_text(&lit.lit)?)),
        Expr::Path(p) if p.qself.is_none() => Ok(Literal::Ident(path_text(&p.path))),
        Expr::Macro(m) => classify_macro(&m.mac),
        Expr::Assign(_) => Ok(Literal::Entry),
        other => bail!("unsupported {} in defaults literal", describe_expr(other)),
    }
}

fn classify_macro(mac: &syn::Macro) -> Result<Literal> {
    let name = mac
        .path
        .segments
        .last()
        .map(|s| s.ident.to_string())
        .unwrap_or_default();
    if name == "vec" {
        let elems = mac
            .parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated)
            .context("malformed vec! sequence literal")?;
        return Ok(Literal::Sequence(elems.into_iter().collect()));
    }
    if MAP_MACROS.contains(&name.as_str()) {
        let entries: MapEntries = mac
            .parse_body()
            .with_context(|| format!("malformed {}! map literal", name))?;
        return Ok(Literal::Map(entries.0));
    }
    bail!("unsupported macro invocation `{}!` in defaults literal", name)
}

/// `key => value` entries of a map macro body, in written order.
struct MapEntries(Vec<(Expr, Expr)>);

impl Parse for MapEntries {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut entries = Vec::new();
        while !input.is_empty() {
            let key: Expr = input.parse()?;
            input.parse::<Token![=>]>()?;
            let value: Expr = input.parse()?;
            entries.push((key, value));
            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }
        Ok(MapEntries(entries))
    }
}

fn scalar_text(lit: &Lit) -> Result<String> {
    match lit {
        Lit::Str(s) => Ok(s.value()),
        Lit::Bool(b) => Ok(b.value.to_string()),
        Lit::Int(i) => Ok(i.base10_digits().to_string()),
        Lit::Float(f) => Ok(f.base10_digits().to_string()),
        Lit::Char(c) => Ok(c.value().to_string()),
        _ => bail!("unsupported literal kind (expected string, number, boolean or char)"),
    }
}

fn path_text(path: &syn::Path) -> String {
    path.segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

fn describe_expr(expr: &Expr) -> &'static str {
    match expr {
        Expr::Call(_) => "function call",
        Expr::MethodCall(_) => "method call",
        Expr::Binary(_) => "binary expression",
        Expr::Unary(_) => "unary expression",
        Expr::Closure(_) => "closure",
        Expr::Field(_) => "field access",
        Expr::Index(_) => "index expression",
        Expr::Range(_) => "range expression",
        Expr::Tuple(_) => "tuple expression",
        Expr::Cast(_) => "cast expression",
        Expr::Block(_) => "block expression",
        Expr::If(_) => "if expression",
        Expr::Match(_) => "match expression",
        Expr::Repeat(_) => "array repeat expression",
        _ => "expression",
    }
}
