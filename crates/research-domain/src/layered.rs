//! Igualdad, hash y representación en capas.
//!
//! Cada tipo concreto implementa `Layered`: primero delega en la capa padre
//! (el struct base que contiene) y luego agrega sus propios campos. Así cada
//! nivel participa exactamente una vez en `eq`, `hash` y `Display` sin
//! conocer los campos de sus hermanos.
//!
//! `DynValue` cubre el caso polimórfico (`dyn Step`, `dyn ResultRecord`):
//! la igualdad exige el mismo tipo concreto antes de comparar campos.
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Contribución de una capa a igualdad, hash y representación.
pub trait Layered {
    /// Hashea los campos de esta capa (y de sus padres), en el mismo orden
    /// que usa `eq_fields`.
    fn hash_fields<H: Hasher>(&self, state: &mut H);

    fn eq_fields(&self, other: &Self) -> bool;

    fn describe_fields(&self, fields: &mut FieldList);
}

/// Acumulador de pares nombre/valor para `Display`. Sólo para depuración; el
/// formato no es estable.
#[derive(Debug, Default)]
pub struct FieldList {
    entries: Vec<(&'static str, String)>,
}

impl FieldList {
    pub fn add(&mut self, name: &'static str, value: impl fmt::Debug) -> &mut Self {
        self.entries.push((name, format!("{value:?}")));
        self
    }

    /// Agrega un valor que ya tiene su propio `Display` (p.ej. un resultado anidado).
    pub fn add_display(&mut self, name: &'static str, value: impl fmt::Display) -> &mut Self {
        self.entries.push((name, value.to_string()));
        self
    }

    /// Lista de valores con `Display`, como `[a, b]`.
    pub fn add_display_all<I>(&mut self, name: &'static str, values: I) -> &mut Self
        where I: IntoIterator,
              I::Item: fmt::Display
    {
        let rendered: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        self.entries.push((name, format!("[{}]", rendered.join(", "))));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self, type_name: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{type_name}{{")?;
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        write!(f, "}}")
    }
}

/// Operaciones de valor accesibles desde un trait object.
///
/// Implementado de forma blanket para todo tipo `Eq + Hash`; los traits de
/// dominio lo usan como supertrait.
pub trait DynValue: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    /// Igualdad estructural; `false` si `other` es de otro tipo concreto.
    fn eq_dyn(&self, other: &dyn Any) -> bool;

    /// Hash que incluye el tipo concreto.
    fn hash_dyn(&self, state: &mut dyn Hasher);
}

impl<T> DynValue for T where T: Any + Eq + Hash + Send + Sync
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_dyn(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|o| self == o)
    }

    fn hash_dyn(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }
}

/// Implementa `PartialEq`, `Eq`, `Hash` y `Display` a partir de `Layered`.
///
/// ```ignore
/// layered_value!(FormUiStep, "FormUiStep");
/// ```
#[macro_export]
macro_rules! layered_value {
    ($ty:ty, $name:expr) => {
        impl ::std::cmp::PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $crate::layered::Layered::eq_fields(self, other)
            }
        }

        impl ::std::cmp::Eq for $ty {}

        impl ::std::hash::Hash for $ty {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                $crate::layered::Layered::hash_fields(self, state)
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let mut fields = $crate::layered::FieldList::default();
                $crate::layered::Layered::describe_fields(self, &mut fields);
                fields.render($name, f)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Base {
        id: String,
    }

    impl Layered for Base {
        fn hash_fields<H: Hasher>(&self, state: &mut H) {
            self.id.hash(state);
        }
        fn eq_fields(&self, other: &Self) -> bool {
            self.id == other.id
        }
        fn describe_fields(&self, fields: &mut FieldList) {
            fields.add("id", &self.id);
        }
    }
    layered_value!(Base, "Base");

    #[derive(Debug, Clone)]
    struct Child {
        base: Base,
        extra: u32,
    }

    impl Layered for Child {
        fn hash_fields<H: Hasher>(&self, state: &mut H) {
            self.base.hash_fields(state);
            self.extra.hash(state);
        }
        fn eq_fields(&self, other: &Self) -> bool {
            self.base.eq_fields(&other.base) && self.extra == other.extra
        }
        fn describe_fields(&self, fields: &mut FieldList) {
            self.base.describe_fields(fields);
            fields.add("extra", self.extra);
        }
    }
    layered_value!(Child, "Child");

    #[test]
    fn child_extends_parent_fields() {
        let a = Child { base: Base { id: "x".into() }, extra: 1 };
        let b = Child { base: Base { id: "x".into() }, extra: 2 };
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "Child{id=\"x\", extra=1}");
    }

    #[test]
    fn dyn_eq_rejects_other_concrete_types() {
        let base = Base { id: "x".into() };
        let child = Child { base: base.clone(), extra: 0 };
        assert!(base.eq_dyn(base.clone().as_any()));
        assert!(!base.eq_dyn(child.as_any()));
    }

    #[test]
    fn nested_values_render_with_their_display() {
        let children = vec![Child { base: Base { id: "a".into() }, extra: 1 },
                            Child { base: Base { id: "b".into() }, extra: 2 }];
        let mut fields = FieldList::default();
        fields.add_display_all("children", &children).add_display_all("none", Vec::<u8>::new());
        let rendered = format!("{}", Rendered("Parent", &fields));
        assert_eq!(rendered, "Parent{children=[Child{id=\"a\", extra=1}, Child{id=\"b\", extra=2}], none=[]}");
    }

    struct Rendered<'a>(&'static str, &'a FieldList);

    impl fmt::Display for Rendered<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.1.render(self.0, f)
        }
    }
}
