//! Canonical member identifiers used to correlate doc comments.
//!
//! `T:Acme.Box`1`, `M:Acme.Box`1.#ctor(`0)`, `M:Acme.Util.Map``1(System.Int32[])`.

use crate::model::{
    qualify, strip_arity, MemberDescriptor, MemberKind, TypeDescriptor, TypeReference,
};

/// Identifier of a type's own doc comment.
pub fn type_id(ty: &TypeDescriptor) -> String {
    format!("T:{}", ty.full_name())
}

/// Identifier of a member; overloads differ by their parameter list.
pub fn member_id(ty: &TypeDescriptor, member: &MemberDescriptor) -> String {
    let prefix = match member.kind {
        MemberKind::Constructor | MemberKind::Method | MemberKind::Operator => 'M',
        MemberKind::Property => 'P',
        MemberKind::Field => 'F',
        MemberKind::Event => 'E',
    };

    let name = match member.kind {
        MemberKind::Constructor if member.is_static => "#cctor".to_string(),
        MemberKind::Constructor => "#ctor".to_string(),
        _ => member.name.replace('.', "#"),
    };

    let mut id = format!("{}:{}.{}", prefix, ty.full_name(), name);

    if member.kind == MemberKind::Method && !member.generic_parameters.is_empty() {
        id.push_str(&format!("``{}", member.generic_parameters.len()));
    }

    if !member.parameters.is_empty() {
        let params: Vec<String> = member.parameters.iter().map(|p| encode(&p.ty)).collect();
        id.push('(');
        id.push_str(&params.join(","));
        id.push(')');
    }

    if is_conversion(member) {
        if let Some(ref ret) = member.return_type {
            id.push('~');
            id.push_str(&encode(ret));
        }
    }

    id
}

fn is_conversion(member: &MemberDescriptor) -> bool {
    member.kind == MemberKind::Operator
        && matches!(member.name.as_str(), "op_Implicit" | "op_Explicit")
}

/// Encode a type reference inside a parameter list.
pub fn encode(reference: &TypeReference) -> String {
    match reference {
        TypeReference::Named {
            namespace,
            name,
            generic_arguments,
        } => {
            if generic_arguments.is_empty() {
                qualify(namespace, name)
            } else {
                let args: Vec<String> = generic_arguments.iter().map(encode).collect();
                format!("{}{{{}}}", qualify(namespace, strip_arity(name)), args.join(","))
            }
        }
        TypeReference::Array { element, rank } => {
            if *rank <= 1 {
                format!("{}[]", encode(element))
            } else {
                format!("{}[{}]", encode(element), vec!["0:"; *rank as usize].join(","))
            }
        }
        TypeReference::ByRef { element } => format!("{}@", encode(element)),
        TypeReference::GenericParameter {
            position, method, ..
        } => {
            if *method {
                format!("``{}", position)
            } else {
                format!("`{}", position)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Accessibility, Parameter, TypeKind};

    fn widget() -> TypeDescriptor {
        TypeDescriptor {
            namespace: "Acme.Core".into(),
            name: "Widget".into(),
            generic_parameters: Vec::new(),
            accessibility: Accessibility::Public,
            kind: TypeKind::Class,
            base_type: None,
            interfaces: Vec::new(),
            members: Vec::new(),
        }
    }

    fn member(kind: MemberKind, name: &str, params: Vec<TypeReference>) -> MemberDescriptor {
        MemberDescriptor {
            kind,
            name: name.into(),
            accessibility: Accessibility::Public,
            is_static: false,
            parameters: params
                .into_iter()
                .enumerate()
                .map(|(i, ty)| Parameter {
                    name: format!("p{}", i),
                    ty,
                    default_value: None,
                })
                .collect(),
            return_type: None,
            generic_parameters: Vec::new(),
            getter: false,
            setter: false,
            value: None,
        }
    }

    #[test]
    fn type_ids() {
        assert_eq!(type_id(&widget()), "T:Acme.Core.Widget");
        let mut generic = widget();
        generic.name = "Box`1".into();
        assert_eq!(type_id(&generic), "T:Acme.Core.Box`1");
    }

    #[test]
    fn overloads_are_distinct() {
        let int = TypeReference::named("System", "Int32");
        let string = TypeReference::named("System", "String");
        let one = member(MemberKind::Method, "Resize", vec![int.clone()]);
        let two = member(MemberKind::Method, "Resize", vec![int, string]);
        let a = member_id(&widget(), &one);
        let b = member_id(&widget(), &two);
        assert_eq!(a, "M:Acme.Core.Widget.Resize(System.Int32)");
        assert_eq!(b, "M:Acme.Core.Widget.Resize(System.Int32,System.String)");
    }

    #[test]
    fn parameterless_members_have_no_parens() {
        assert_eq!(
            member_id(&widget(), &member(MemberKind::Method, "Reset", vec![])),
            "M:Acme.Core.Widget.Reset"
        );
        assert_eq!(
            member_id(&widget(), &member(MemberKind::Property, "Name", vec![])),
            "P:Acme.Core.Widget.Name"
        );
        assert_eq!(
            member_id(&widget(), &member(MemberKind::Field, "count", vec![])),
            "F:Acme.Core.Widget.count"
        );
        assert_eq!(
            member_id(&widget(), &member(MemberKind::Event, "Changed", vec![])),
            "E:Acme.Core.Widget.Changed"
        );
    }

    #[test]
    fn constructors() {
        let string = TypeReference::named("System", "String");
        let ctor = member(MemberKind::Constructor, ".ctor", vec![string]);
        assert_eq!(
            member_id(&widget(), &ctor),
            "M:Acme.Core.Widget.#ctor(System.String)"
        );
        let mut cctor = member(MemberKind::Constructor, ".cctor", vec![]);
        cctor.is_static = true;
        assert_eq!(member_id(&widget(), &cctor), "M:Acme.Core.Widget.#cctor");
    }

    #[test]
    fn generic_encodings() {
        let list_of_t = TypeReference::Named {
            namespace: "System.Collections.Generic".into(),
            name: "List`1".into(),
            generic_arguments: vec![TypeReference::GenericParameter {
                name: "T".into(),
                position: 0,
                method: false,
            }],
        };
        let array_of_u = TypeReference::Array {
            element: Box::new(TypeReference::GenericParameter {
                name: "U".into(),
                position: 0,
                method: true,
            }),
            rank: 1,
        };
        let mut map = member(MemberKind::Method, "Map", vec![list_of_t, array_of_u]);
        map.generic_parameters = vec!["U".into()];
        let mut ty = widget();
        ty.name = "Box`1".into();
        assert_eq!(
            member_id(&ty, &map),
            "M:Acme.Core.Box`1.Map``1(System.Collections.Generic.List{`0},``0[])"
        );
    }

    #[test]
    fn by_ref_and_multidimensional() {
        let grid = TypeReference::Array {
            element: Box::new(TypeReference::named("System", "Double")),
            rank: 2,
        };
        let out = TypeReference::ByRef {
            element: Box::new(TypeReference::named("System", "Int32")),
        };
        assert_eq!(
            member_id(&widget(), &member(MemberKind::Method, "Fill", vec![grid, out])),
            "M:Acme.Core.Widget.Fill(System.Double[0:,0:],System.Int32@)"
        );
    }

    #[test]
    fn conversion_operators_encode_return_type() {
        let source = TypeReference::named("Acme.Core", "Widget");
        let mut op = member(MemberKind::Operator, "op_Implicit", vec![source]);
        op.is_static = true;
        op.return_type = Some(TypeReference::named("System", "String"));
        assert_eq!(
            member_id(&widget(), &op),
            "M:Acme.Core.Widget.op_Implicit(Acme.Core.Widget)~System.String"
        );
    }
}
