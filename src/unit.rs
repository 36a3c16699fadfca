//! Compilation unit index — one per `.rs` module file.
//!
//! Each unit records its type declarations, top-level variable declarations,
//! import aliases, and comment blocks. Units are built once at startup and
//! never mutated; the full set forms a read-only [`Registry`] shared by the
//! walk.

use crate::comments::CommentList;
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use syn::{Expr, ExprLit, Item, Lit, LitStr, Meta, UseTree};

/// One compilation unit: a single Rust module file.
#[derive(Debug)]
pub struct Unit {
    /// Module name, derived from the file stem.
    pub name: String,
    pub types: HashMap<String, TypeDef>,
    pub variables: HashMap<String, VarDef>,
    /// Local alias → unit name, from `use` and `mod` declarations.
    pub imports: HashMap<String, String>,
    pub comments: CommentList,
}

#[derive(Debug)]
pub struct TypeDef {
    pub name: String,
    /// Name of the unit declaring this type; field types resolve against it.
    pub unit: String,
    pub doc: Option<String>,
    pub kind: TypeKind,
}

#[derive(Debug)]
pub enum TypeKind {
    /// Named-field struct, fields in declaration order.
    Struct(Vec<FieldDef>),
    /// Alias or enum: documentable, but not walkable as a struct literal.
    Opaque,
}

#[derive(Debug)]
pub struct FieldDef {
    pub name: String,
    pub ty: syn::Type,
    /// Serialization key from `#[serde(rename = "…")]`; empty if unspecified.
    pub key: String,
    pub doc: Option<String>,
}

/// Top-level `static` or `const` declaration.
#[derive(Debug)]
pub struct VarDef {
    pub doc: Option<String>,
    pub init: Expr,
}

impl TypeDef {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        match &self.kind {
            TypeKind::Struct(fields) => fields.iter().find(|f| f.name == name),
            TypeKind::Opaque => None,
        }
    }
}

impl Unit {
    /// Index one module file. Fails only if the source does not parse; no
    /// partial unit is retained.
    pub fn parse(name: &str, source: &str) -> Result<Unit> {
        let file = syn::parse_file(source)
            .with_context(|| format!("failed to parse module `{}`", name))?;

        let mut unit = Unit {
            name: name.to_string(),
            types: HashMap::new(),
            variables: HashMap::new(),
            imports: HashMap::new(),
            comments: CommentList::scan(source),
        };

        for item in &file.items {
            match item {
                Item::Struct(s) => {
                    let fields = match &s.fields {
                        syn::Fields::Named(named) => named
                            .named
                            .iter()
                            .map(|f| FieldDef {
                                name: f.ident.as_ref().map(|i| i.to_string()).unwrap_or_default(),
                                ty: f.ty.clone(),
                                key: serde_rename(&f.attrs).unwrap_or_default(),
                                doc: doc_text(&f.attrs),
                            })
                            .collect(),
                        // Tuple and unit structs carry no documentable fields.
                        _ => Vec::new(),
                    };
                    unit.types.insert(
                        s.ident.to_string(),
                        TypeDef {
                            name: s.ident.to_string(),
                            unit: name.to_string(),
                            doc: doc_text(&s.attrs),
                            kind: TypeKind::Struct(fields),
                        },
                    );
                }
                Item::Type(t) => {
                    unit.types.insert(
                        t.ident.to_string(),
                        TypeDef {
                            name: t.ident.to_string(),
                            unit: name.to_string(),
                            doc: doc_text(&t.attrs),
                            kind: TypeKind::Opaque,
                        },
                    );
                }
                Item::Enum(e) => {
                    unit.types.insert(
                        e.ident.to_string(),
                        TypeDef {
                            name: e.ident.to_string(),
                            unit: name.to_string(),
                            doc: doc_text(&e.attrs),
                            kind: TypeKind::Opaque,
                        },
                    );
                }
                Item::Static(s) => {
                    unit.variables.insert(
                        s.ident.to_string(),
                        VarDef {
                            doc: doc_text(&s.attrs),
                            init: (*s.expr).clone(),
                        },
                    );
                }
                Item::Const(c) => {
                    unit.variables.insert(
                        c.ident.to_string(),
                        VarDef {
                            doc: doc_text(&c.attrs),
                            init: (*c.expr).clone(),
                        },
                    );
                }
                Item::Use(u) => collect_aliases(&u.tree, &mut unit.imports),
                Item::Mod(m) => {
                    unit.imports
                        .insert(m.ident.to_string(), m.ident.to_string());
                }
                _ => {}
            }
        }

        Ok(unit)
    }
}

/// Record `alias → unit` for every terminal name in a use tree. The alias is
/// the explicit `as` rename when given, otherwise the final path segment.
fn collect_aliases(tree: &UseTree, imports: &mut HashMap<String, String>) {
    match tree {
        UseTree::Path(p) => collect_aliases(&p.tree, imports),
        UseTree::Name(n) => {
            imports.insert(n.ident.to_string(), n.ident.to_string());
        }
        UseTree::Rename(r) => {
            imports.insert(r.rename.to_string(), r.ident.to_string());
        }
        UseTree::Group(g) => {
            for item in &g.items {
                collect_aliases(item, imports);
            }
        }
        UseTree::Glob(_) => {}
    }
}

/// Join the `#[doc]` attribute lines of an item into one comment text.
fn doc_text(attrs: &[syn::Attribute]) -> Option<String> {
    let mut lines = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        if let Meta::NameValue(nv) = &attr.meta {
            if let Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) = &nv.value
            {
                let line = s.value();
                lines.push(line.strip_prefix(' ').unwrap_or(&line).to_string());
            }
        }
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Extract the `rename` value from a field's `#[serde(…)]` attributes.
fn serde_rename(attrs: &[syn::Attribute]) -> Option<String> {
    let mut rename = None;
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        // Unknown serde keys are tolerated; exotic shapes simply yield no key.
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                rename = Some(value.value());
            } else if meta.input.peek(syn::Token![=]) {
                let _: Expr = meta.value()?.parse()?;
            }
            Ok(())
        });
    }
    rename
}

/// Read-only set of all loaded units, keyed by unit name. Passed explicitly
/// into every resolution call.
#[derive(Debug, Default)]
pub struct Registry {
    units: HashMap<String, Unit>,
}

impl Registry {
    pub fn insert(&mut self, unit: Unit) -> Result<()> {
        if self.units.contains_key(&unit.name) {
            bail!("duplicate module name `{}`", unit.name);
        }
        self.units.insert(unit.name.clone(), unit);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Unit> {
        self.units.get(name)
    }

    /// Locate the defaults declaration. Exactly one unit must declare it.
    pub fn find_variable(&self, var: &str) -> Result<(&Unit, &VarDef)> {
        let mut found: Vec<(&Unit, &VarDef)> = Vec::new();
        for unit in self.units.values() {
            if let Some(def) = unit.variables.get(var) {
                found.push((unit, def));
            }
        }
        match found.len() {
            0 => bail!("no declaration of `{}` found in any loaded module", var),
            1 => Ok(found.remove(0)),
            _ => {
                let mut names: Vec<&str> =
                    found.iter().map(|(u, _)| u.name.as_str()).collect();
                names.sort();
                bail!("`{}` is declared in multiple modules: {}", var, names.join(", "))
            }
        }
    }
}
