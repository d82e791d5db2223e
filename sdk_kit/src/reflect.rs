//! Turns [`TypeDesc`] descriptors into [`Field`] trees.

use crate::basic::BasicTypeRegistry;
use crate::field::{Field, FieldKind, Validator, NESTED};
use crate::schema::{Kind, TypeDesc, TypeIdentity};

/// Recursive walker. Holds the identities of the structs currently being expanded so that any
/// cycle, direct or indirect, is cut with a sentinel.
pub struct Reflector<'a> {
    basics: &'a BasicTypeRegistry,
    stack: Vec<TypeIdentity>,
}

impl<'a> Reflector<'a> {
    pub fn new(basics: &'a BasicTypeRegistry) -> Self {
        Self {
            basics,
            stack: Vec::new(),
        }
    }

    /// Reflects a type. An empty `param` falls back to `name`.
    pub fn reflect(
        &mut self,
        name: &str,
        param: &str,
        label: &str,
        validator: Option<Validator>,
        desc: TypeDesc,
    ) -> Field {
        let desc = desc.deref();
        let mut field = Field::scalar(name, desc.display_name());
        if !param.is_empty() {
            field.param = param.to_string();
        }
        field.label = label.to_string();
        field.validator = validator;
        field.description = desc.description.to_string();

        if let Some(basic) = self.basics.lookup(&desc.identity) {
            field.basic_type = Some(basic);
            return field;
        }

        match desc.kind {
            Kind::Struct(members) => {
                if self.stack.contains(&desc.identity) {
                    field.origin = field.type_name;
                    field.type_name = NESTED.to_string();
                    return field;
                }
                self.stack.push(desc.identity.clone());
                let mut fields = Vec::with_capacity(members.len());
                for member in members.into_iter().filter(|m| !m.skip) {
                    let mut child = self.reflect(
                        member.name,
                        member.param.unwrap_or_default(),
                        member.label,
                        member.validator,
                        (member.ty)(),
                    );
                    if !member.description.is_empty() {
                        child.description = member.description.to_string();
                    }
                    field.nested |= child.is_struct() || child.nested || child.is_self_ref();
                    fields.push(child);
                }
                self.stack.pop();
                field.kind = FieldKind::Struct { fields };
            }
            Kind::Array(elem) => {
                let elem = self.reflect(name, param, "", None, elem());
                field.nested = elem.is_struct() || elem.nested || elem.is_self_ref();
                field.kind = FieldKind::Array {
                    elem: Box::new(elem),
                };
            }
            Kind::Scalar | Kind::Map(..) | Kind::Context | Kind::Error | Kind::Pointer(_) => {}
        }
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::{BasicType, Library};
    use crate::schema::{MemberDesc, Reflect};

    struct Node;
    struct Left;
    struct Right;
    struct Money;
    struct Grid;

    impl Reflect for Node {
        fn describe() -> TypeDesc {
            TypeDesc::structure(
                TypeIdentity::new("tests", "Node"),
                vec![
                    MemberDesc::new("value", <i64 as Reflect>::describe),
                    MemberDesc::new("children", <Vec<Node> as Reflect>::describe),
                    MemberDesc::new("parent", <Option<Box<Node>> as Reflect>::describe),
                    MemberDesc::new("cache", <String as Reflect>::describe).skip(),
                ],
            )
        }
    }

    impl Reflect for Left {
        fn describe() -> TypeDesc {
            TypeDesc::structure(
                TypeIdentity::new("tests", "Left"),
                vec![MemberDesc::new("right", <Option<Right> as Reflect>::describe)],
            )
        }
    }

    impl Reflect for Right {
        fn describe() -> TypeDesc {
            TypeDesc::structure(
                TypeIdentity::new("tests", "Right"),
                vec![MemberDesc::new("left", <Box<Left> as Reflect>::describe)],
            )
        }
    }

    impl Reflect for Money {
        fn describe() -> TypeDesc {
            TypeDesc::structure(
                TypeIdentity::new("tests", "Money"),
                vec![MemberDesc::new("cents", <i64 as Reflect>::describe)],
            )
        }
    }

    impl Reflect for Grid {
        fn describe() -> TypeDesc {
            TypeDesc::structure(
                TypeIdentity::new("tests", "Grid"),
                vec![
                    MemberDesc::new("cells", <Vec<Vec<Money>> as Reflect>::describe),
                    MemberDesc::new("price", <Money as Reflect>::describe),
                ],
            )
        }
    }

    #[test]
    fn direct_self_reference_yields_one_sentinel() {
        let registry = BasicTypeRegistry::new();
        let field = Reflector::new(&registry).reflect("node", "", "", None, Node::describe());
        let children = field.children();
        assert_eq!(children.len(), 3);
        let elem = children[1].elem().unwrap();
        assert!(elem.is_self_ref());
        assert_eq!(elem.origin, "Node");
        assert!(children[2].is_self_ref());
        assert!(!children[2].is_struct());
        assert!(field.nested);
    }

    #[test]
    fn indirect_cycle_is_cut() {
        let registry = BasicTypeRegistry::new();
        let field = Reflector::new(&registry).reflect("left", "", "", None, Left::describe());
        let right = &field.children()[0];
        assert!(right.is_struct());
        let back = &right.children()[0];
        assert!(back.is_self_ref());
        assert_eq!(back.origin, "Left");
    }

    #[test]
    fn basic_type_beats_struct_expansion() {
        let mut registry = BasicTypeRegistry::new();
        registry.register(BasicType::of::<Money>().map("ts", Library::new("string")));
        let field = Reflector::new(&registry).reflect("grid", "", "", None, Grid::describe());
        let price = &field.children()[1];
        assert!(!price.is_struct());
        assert!(!price.is_array());
        assert!(price.basic_type.is_some());
    }

    #[test]
    fn two_dimensional_arrays_nest() {
        let registry = BasicTypeRegistry::new();
        let field = Reflector::new(&registry).reflect("grid", "", "", None, Grid::describe());
        let cells = &field.children()[0];
        assert_eq!(cells.type_name, "[][]Money");
        assert!(cells.nested);
        let inner = cells.elem().unwrap().elem().unwrap();
        assert!(inner.is_struct());
        assert_eq!(inner.type_name, "Money");
    }
}
