//! Member headings, short signatures and C# declarations.

use crate::links::LinkResolver;
use crate::model::{
    qualify, strip_arity, MemberDescriptor, MemberKind, Parameter, TypeDescriptor, TypeKind,
    TypeReference,
};

/// `operator` symbol of an operator method's metadata name.
fn operator_symbol(name: &str) -> Option<&'static str> {
    let symbol = match name {
        "op_Addition" | "op_UnaryPlus" => "+",
        "op_Subtraction" | "op_UnaryNegation" => "-",
        "op_Multiply" => "*",
        "op_Division" => "/",
        "op_Modulus" => "%",
        "op_Equality" => "==",
        "op_Inequality" => "!=",
        "op_LessThan" => "<",
        "op_GreaterThan" => ">",
        "op_LessThanOrEqual" => "<=",
        "op_GreaterThanOrEqual" => ">=",
        "op_LogicalNot" => "!",
        "op_OnesComplement" => "~",
        "op_Increment" => "++",
        "op_Decrement" => "--",
        "op_BitwiseAnd" => "&",
        "op_BitwiseOr" => "|",
        "op_ExclusiveOr" => "^",
        "op_LeftShift" => "<<",
        "op_RightShift" => ">>",
        "op_True" => "true",
        "op_False" => "false",
        _ => return None,
    };
    Some(symbol)
}

/// C# keyword for well-known runtime types.
fn keyword_alias(full_name: &str) -> Option<&'static str> {
    let alias = match full_name {
        "System.Boolean" => "bool",
        "System.Byte" => "byte",
        "System.SByte" => "sbyte",
        "System.Char" => "char",
        "System.Decimal" => "decimal",
        "System.Double" => "double",
        "System.Single" => "float",
        "System.Int16" => "short",
        "System.Int32" => "int",
        "System.Int64" => "long",
        "System.UInt16" => "ushort",
        "System.UInt32" => "uint",
        "System.UInt64" => "ulong",
        "System.Object" => "object",
        "System.String" => "string",
        "System.Void" => "void",
        _ => return None,
    };
    Some(alias)
}

/// Unlinked display form of a type reference (`List<Int32>`).
pub fn display_type(reference: &TypeReference) -> String {
    render_type(reference, false)
}

/// Type as written in a C# declaration (`List<int>`).
fn code_type(reference: &TypeReference) -> String {
    render_type(reference, true)
}

fn render_type(reference: &TypeReference, aliases: bool) -> String {
    match reference {
        TypeReference::Named {
            namespace,
            name,
            generic_arguments,
        } => {
            let alias = if aliases {
                keyword_alias(&qualify(namespace, name))
            } else {
                None
            };
            let head = match alias {
                Some(keyword) => keyword.to_string(),
                None => strip_arity(name).to_string(),
            };
            if generic_arguments.is_empty() {
                head
            } else {
                let args: Vec<String> = generic_arguments
                    .iter()
                    .map(|arg| render_type(arg, aliases))
                    .collect();
                format!("{}<{}>", head, args.join(", "))
            }
        }
        TypeReference::Array { element, rank } => format!(
            "{}[{}]",
            render_type(element, aliases),
            ",".repeat(rank.saturating_sub(1) as usize)
        ),
        TypeReference::ByRef { element } if aliases => {
            format!("ref {}", render_type(element, aliases))
        }
        TypeReference::ByRef { element } => format!("{}&", render_type(element, aliases)),
        TypeReference::GenericParameter { name, .. } => name.clone(),
    }
}

fn is_indexer(member: &MemberDescriptor) -> bool {
    member.kind == MemberKind::Property && !member.parameters.is_empty()
}

fn is_conversion(member: &MemberDescriptor) -> bool {
    matches!(member.name.as_str(), "op_Implicit" | "op_Explicit")
}

/// Member name as read in headings, without parameters.
fn member_name(ty: &TypeDescriptor, member: &MemberDescriptor) -> String {
    match member.kind {
        MemberKind::Constructor => strip_arity(&ty.name).to_string(),
        MemberKind::Operator => match operator_symbol(&member.name) {
            Some(symbol) => format!("operator {}", symbol),
            None if is_conversion(member) => {
                let target = member
                    .return_type
                    .as_ref()
                    .map(display_type)
                    .unwrap_or_default();
                format!("operator {}", target)
            }
            None => member.name.clone(),
        },
        MemberKind::Method if !member.generic_parameters.is_empty() => {
            format!("{}<{}>", member.name, member.generic_parameters.join(", "))
        }
        _ => member.name.clone(),
    }
}

/// Heading of a member's detail section: `Resize(Int32, String)`.
///
/// Overloads differ in their parameter types, so headings stay distinct.
pub fn heading(ty: &TypeDescriptor, member: &MemberDescriptor) -> String {
    let name = member_name(ty, member);
    let types: Vec<String> = member.parameters.iter().map(|p| display_type(&p.ty)).collect();
    match member.kind {
        MemberKind::Constructor | MemberKind::Method | MemberKind::Operator => {
            format!("{}({})", name, types.join(", "))
        }
        MemberKind::Property if is_indexer(member) => format!("{}[{}]", name, types.join(", ")),
        _ => name,
    }
}

/// Short signature for summary tables, with every type reference linked.
pub fn short_signature(
    resolver: &LinkResolver,
    from_file: &str,
    ty: &TypeDescriptor,
    member: &MemberDescriptor,
) -> String {
    let name = crate::markdown::escape(&member_name(ty, member));
    let params: Vec<String> = member
        .parameters
        .iter()
        .map(|p| format!("{} {}", resolver.reference(from_file, &p.ty), p.name))
        .collect();
    let returns = member
        .return_type
        .as_ref()
        .map(|r| format!("{} ", resolver.reference(from_file, r)))
        .unwrap_or_default();

    match member.kind {
        MemberKind::Constructor => format!("{}({})", name, params.join(", ")),
        MemberKind::Method | MemberKind::Operator => {
            let returns = if returns.is_empty() {
                "void ".to_string()
            } else {
                returns
            };
            format!("{}{}({})", returns, name, params.join(", "))
        }
        MemberKind::Property if is_indexer(member) => {
            format!("{}{}\\[{}\\]", returns, name, params.join(", "))
        }
        MemberKind::Property | MemberKind::Field | MemberKind::Event => {
            format!("{}{}", returns, name)
        }
    }
}

fn parameter_list(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|p| match p.default_value {
            Some(ref default) => format!("{} {} = {}", code_type(&p.ty), p.name, default),
            None => format!("{} {}", code_type(&p.ty), p.name),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Full declaration of a member in C# syntax.
pub fn declaration(ty: &TypeDescriptor, member: &MemberDescriptor) -> String {
    let access = member.accessibility.keyword();
    let modifier = if member.is_static { "static " } else { "" };
    let returns = member
        .return_type
        .as_ref()
        .map(code_type)
        .unwrap_or_else(|| "void".to_string());
    let params = parameter_list(&member.parameters);

    match member.kind {
        MemberKind::Constructor if member.is_static => {
            format!("static {}()", strip_arity(&ty.name))
        }
        MemberKind::Constructor => format!("{} {}({})", access, strip_arity(&ty.name), params),
        MemberKind::Method => format!(
            "{} {}{} {}({})",
            access,
            modifier,
            returns,
            member_name(ty, member),
            params
        ),
        MemberKind::Operator if is_conversion(member) => {
            let direction = if member.name == "op_Implicit" {
                "implicit"
            } else {
                "explicit"
            };
            format!(
                "{} static {} operator {}({})",
                access, direction, returns, params
            )
        }
        MemberKind::Operator => format!(
            "{} static {} {}({})",
            access,
            returns,
            member_name(ty, member),
            params
        ),
        MemberKind::Property => {
            let mut accessors = Vec::new();
            if member.getter {
                accessors.push("get;");
            }
            if member.setter {
                accessors.push("set;");
            }
            let name = if is_indexer(member) {
                format!("this[{}]", params)
            } else {
                member.name.clone()
            };
            format!(
                "{} {}{} {} {{ {} }}",
                access,
                modifier,
                returns,
                name,
                accessors.join(" ")
            )
        }
        MemberKind::Field if ty.kind == TypeKind::Enum => match member.value {
            Some(ref value) => format!("{} = {}", member.name, value),
            None => member.name.clone(),
        },
        MemberKind::Field => match member.value {
            Some(ref value) => format!(
                "{} const {} {} = {}",
                access, returns, member.name, value
            ),
            None => format!("{} {}{} {}", access, modifier, returns, member.name),
        },
        MemberKind::Event => format!("{} {}event {} {}", access, modifier, returns, member.name),
    }
}

/// Declaration line of the type itself, including its base list.
pub fn type_declaration(ty: &TypeDescriptor) -> String {
    let mut bases: Vec<String> = Vec::new();
    if let Some(ref base) = ty.base_type {
        let implicit = matches!(
            base.full_name().as_deref(),
            Some("System.Object" | "System.ValueType" | "System.Enum")
        );
        if !implicit {
            bases.push(code_type(base));
        }
    }
    bases.extend(ty.interfaces.iter().map(code_type));

    let mut declaration = format!(
        "{} {} {}",
        ty.accessibility.keyword(),
        ty.kind.keyword(),
        ty.display_name()
    );
    if !bases.is_empty() {
        declaration.push_str(" : ");
        declaration.push_str(&bases.join(", "));
    }
    declaration
}
