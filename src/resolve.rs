//! Type-reference resolution across compilation units.

use crate::unit::{Registry, TypeDef, Unit};
use anyhow::{bail, Result};
use syn::Type;

/// Classification of a declared type reference. Closed: every shape a field
/// declaration can take maps onto exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// Built-in scalar type; nothing to document.
    Primitive,
    /// Generic container (`Vec<_>`, `BTreeMap<_, _>`, …), slice, array or
    /// tuple; the container itself carries no documentation.
    Container,
    /// Single-segment named type, declared in the current unit.
    Local(String),
    /// `alias::Name` reference into another unit.
    Foreign { alias: String, name: String },
    /// Anything else (fully qualified std paths and the like); treated as
    /// undocumentable rather than an error.
    Opaque,
}

const PRIMITIVES: &[&str] = &[
    "bool", "char", "str", "String", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16",
    "u32", "u64", "u128", "usize", "f32", "f64",
];

pub fn classify(ty: &Type) -> TypeRef {
    match ty {
        Type::Reference(r) => classify(&r.elem),
        Type::Paren(p) => classify(&p.elem),
        Type::Slice(_) | Type::Array(_) | Type::Tuple(_) => TypeRef::Container,
        Type::Path(p) if p.qself.is_none() => {
            let segments = &p.path.segments;
            let last = match segments.last() {
                Some(seg) => seg,
                None => return TypeRef::Opaque,
            };
            if !last.arguments.is_none() {
                return TypeRef::Container;
            }
            match segments.len() {
                1 => {
                    let name = last.ident.to_string();
                    if PRIMITIVES.contains(&name.as_str()) {
                        TypeRef::Primitive
                    } else {
                        TypeRef::Local(name)
                    }
                }
                2 => TypeRef::Foreign {
                    alias: segments[0].ident.to_string(),
                    name: last.ident.to_string(),
                },
                _ => TypeRef::Opaque,
            }
        }
        _ => TypeRef::Opaque,
    }
}

/// Resolve a classified reference to its type definition.
///
/// Primitives, containers and opaque references resolve to `None` (no
/// documentable type). A named reference that is absent from the local or
/// aliased unit's type table is fatal: all literal content is assumed to be
/// statically inspectable.
pub fn resolve<'a>(
    tyref: &TypeRef,
    unit: &'a Unit,
    registry: &'a Registry,
) -> Result<Option<&'a TypeDef>> {
    match tyref {
        TypeRef::Primitive | TypeRef::Container | TypeRef::Opaque => Ok(None),
        TypeRef::Local(name) => match unit.types.get(name) {
            Some(def) => Ok(Some(def)),
            None => bail!("cannot resolve type `{}` in module `{}`", name, unit.name),
        },
        TypeRef::Foreign { alias, name } => {
            let Some(target) = unit.imports.get(alias) else {
                bail!(
                    "module `{}` has no import named `{}` (while resolving `{}::{}`)",
                    unit.name,
                    alias,
                    alias,
                    name
                );
            };
            let Some(target_unit) = registry.get(target) else {
                bail!(
                    "module `{}` (imported as `{}` in `{}`) is not loaded",
                    target,
                    alias,
                    unit.name
                );
            };
            match target_unit.types.get(name) {
                Some(def) => Ok(Some(def)),
                None => bail!("cannot resolve type `{}` in module `{}`", name, target),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::Unit;

    fn ty(source: &str) -> Type {
        syn::parse_str(source).unwrap()
    }

    #[test]
    fn classify_primitives() {
        assert_eq!(classify(&ty("bool")), TypeRef::Primitive);
        assert_eq!(classify(&ty("String")), TypeRef::Primitive);
        assert_eq!(classify(&ty("i64")), TypeRef::Primitive);
        assert_eq!(classify(&ty("&'static str")), TypeRef::Primitive);
    }

    #[test]
    fn classify_containers() {
        assert_eq!(classify(&ty("Vec<String>")), TypeRef::Container);
        assert_eq!(classify(&ty("BTreeMap<String, String>")), TypeRef::Container);
        assert_eq!(classify(&ty("std::collections::BTreeMap<String, u32>")), TypeRef::Container);
        assert_eq!(classify(&ty("[u8; 4]")), TypeRef::Container);
        assert_eq!(classify(&ty("&[String]")), TypeRef::Container);
        assert_eq!(classify(&ty("(u8, u8)")), TypeRef::Container);
    }

    #[test]
    fn classify_named_references() {
        assert_eq!(classify(&ty("Config")), TypeRef::Local("Config".into()));
        assert_eq!(
            classify(&ty("othervalues::Other")),
            TypeRef::Foreign {
                alias: "othervalues".into(),
                name: "Other".into()
            }
        );
    }

    #[test]
    fn classify_long_paths_opaque() {
        assert_eq!(classify(&ty("std::time::Duration")), TypeRef::Opaque);
    }

    fn two_unit_registry() -> Registry {
        let root = Unit::parse(
            "values",
            "use othervalues;\n\n/// Config doc.\npub struct Config { pub x: bool }\n",
        )
        .unwrap();
        let other = Unit::parse(
            "othervalues",
            "/// Other doc.\npub struct Other { pub truth: bool }\n",
        )
        .unwrap();
        let mut registry = Registry::default();
        registry.insert(root).unwrap();
        registry.insert(other).unwrap();
        registry
    }

    #[test]
    fn resolve_local_type() {
        let registry = two_unit_registry();
        let unit = registry.get("values").unwrap();
        let def = resolve(&classify(&ty("Config")), unit, &registry)
            .unwrap()
            .unwrap();
        assert_eq!(def.doc.as_deref(), Some("Config doc."));
    }

    #[test]
    fn resolve_through_import_alias() {
        let registry = two_unit_registry();
        let unit = registry.get("values").unwrap();
        let def = resolve(&classify(&ty("othervalues::Other")), unit, &registry)
            .unwrap()
            .unwrap();
        assert_eq!(def.doc.as_deref(), Some("Other doc."));
        assert_eq!(def.unit, "othervalues");
    }

    #[test]
    fn primitives_resolve_to_nothing() {
        let registry = two_unit_registry();
        let unit = registry.get("values").unwrap();
        assert!(resolve(&TypeRef::Primitive, unit, &registry).unwrap().is_none());
        assert!(resolve(&TypeRef::Container, unit, &registry).unwrap().is_none());
    }

    #[test]
    fn unresolved_named_reference_is_fatal() {
        let registry = two_unit_registry();
        let unit = registry.get("values").unwrap();
        assert!(resolve(&classify(&ty("Missing")), unit, &registry).is_err());
        assert!(resolve(&classify(&ty("nosuch::Thing")), unit, &registry).is_err());
        assert!(resolve(&classify(&ty("othervalues::Missing")), unit, &registry).is_err());
    }
}
