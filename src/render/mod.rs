//! Type documentation renderer: one markdown page per type.
//!
//! Page layout:
//!
//! 1. optional back link, `# Name<T>`, namespace, summary, declaration
//! 2. inheritance chain, implemented interfaces, type parameters, remarks, example
//! 3. per member kind (constructors, properties, methods, operators, events,
//!    fields): a summary table followed by one detail section per member
//! 4. optional back link after a rule

pub mod signature;
pub mod text;

use crate::docs::{Documentation, Example, ItemDocs};
use crate::error::RenderError;
use crate::links::LinkResolver;
use crate::markdown::{escape, inline_code, MarkdownDocument};
use crate::metadata::MetadataProvider;
use crate::model::{
    DocText, MemberDescriptor, MemberKind, TypeDescriptor, TypeKind, TypeReference,
};
use crate::options::RenderOptions;
use std::collections::HashMap;

/// Renders pages for the types of one library.
pub struct TypeDocumentation<'a> {
    library: &'a dyn MetadataProvider,
    resolver: &'a LinkResolver,
    docs: &'a Documentation<'a>,
    options: &'a RenderOptions,
    by_name: HashMap<String, &'a TypeDescriptor>,
}

/// Rendering state for one page.
struct Page<'r> {
    file: &'r str,
    resolver: &'r LinkResolver,
    doc: MarkdownDocument,
}

impl Page<'_> {
    fn text(&self, text: &DocText) -> String {
        text::render(self.resolver, self.file, text)
    }

    fn cell(&self, text: &DocText) -> String {
        text::render_cell(self.resolver, self.file, text)
    }

    fn reference(&self, reference: &TypeReference) -> String {
        self.resolver.reference(self.file, reference)
    }

    fn prose(&mut self, text: &DocText) {
        if !text.is_empty() {
            let rendered = self.text(text);
            self.doc.paragraph(rendered);
        }
    }

    fn example(&mut self, item: &ItemDocs<'_>, level: u8) {
        if item.comment.example.is_empty() && item.example.is_none() {
            return;
        }
        self.doc.header("Example", level);
        self.prose(&item.comment.example);
        match item.example {
            Some(Example::Markdown(ref markdown)) => {
                self.doc.paragraph(markdown.trim());
            }
            Some(Example::Code {
                ref language,
                ref code,
            }) => {
                self.doc.code(code.as_str(), language.as_deref());
            }
            None => {}
        }
    }
}

impl<'a> TypeDocumentation<'a> {
    pub fn new(
        library: &'a dyn MetadataProvider,
        resolver: &'a LinkResolver,
        docs: &'a Documentation<'a>,
        options: &'a RenderOptions,
    ) -> Self {
        let by_name = library
            .types()
            .iter()
            .map(|ty| (ty.full_name(), ty))
            .collect();
        Self {
            library,
            resolver,
            docs,
            options,
            by_name,
        }
    }

    /// Render the page of `ty`.
    pub fn render(&self, ty: &TypeDescriptor) -> Result<String, RenderError> {
        let file = self
            .resolver
            .file_name(&ty.full_name())
            .ok_or_else(|| RenderError::MissingPage(ty.full_name()))?;
        let mut page = Page {
            file,
            resolver: self.resolver,
            doc: MarkdownDocument::new(),
        };

        let back = self.options.back_button.then(|| self.back_link(file));
        if let Some(ref back) = back {
            page.doc.paragraph(back.as_str());
        }

        self.render_header(&mut page, ty)?;

        let members: Vec<&MemberDescriptor> = self
            .library
            .members_of(ty)
            .iter()
            .filter(|m| m.accessibility >= self.options.member_accessibility)
            .collect();
        for kind in MemberKind::DISPLAY_ORDER {
            let group: Vec<&MemberDescriptor> =
                members.iter().copied().filter(|m| m.kind == kind).collect();
            if !group.is_empty() {
                self.render_group(&mut page, ty, kind, &group)?;
            }
        }

        if let Some(back) = back {
            page.doc.rule().paragraph(back);
        }

        Ok(page.doc.to_string())
    }

    fn back_link(&self, file: &str) -> String {
        format!(
            "[{}]({})",
            inline_code("< Back"),
            self.resolver.url(file, &self.options.index_page_name)
        )
    }

    fn render_header(&self, page: &mut Page<'_>, ty: &TypeDescriptor) -> Result<(), RenderError> {
        let item = self.docs.for_type(ty)?;
        let comment = item.comment;

        page.doc.header(escape(&ty.display_name()), 1);
        if !ty.namespace.is_empty() {
            page.doc.paragraph(format!("Namespace: {}", ty.namespace));
        }
        page.prose(&comment.summary);
        page.doc
            .code(signature::type_declaration(ty), Some("csharp"));

        let chain = self.inheritance(page, ty);
        if !chain.is_empty() {
            page.doc.paragraph(format!(
                "Inheritance {} → {}",
                chain.join(" → "),
                escape(&ty.display_name())
            ));
        }

        if !ty.interfaces.is_empty() {
            let interfaces: Vec<String> =
                ty.interfaces.iter().map(|i| page.reference(i)).collect();
            page.doc
                .paragraph(format!("Implements {}", interfaces.join(", ")));
        }

        if !ty.generic_parameters.is_empty() {
            let rows = ty
                .generic_parameters
                .iter()
                .map(|name| {
                    let description = comment
                        .type_param(name)
                        .map(|t| page.cell(t))
                        .unwrap_or_default();
                    vec![inline_code(name), description]
                })
                .collect();
            page.doc.header("Type Parameters", 2).table(
                vec!["Name".to_string(), "Description".to_string()],
                rows,
            );
        }

        if !comment.remarks.is_empty() {
            page.doc.header("Remarks", 2);
            page.prose(&comment.remarks);
        }

        page.example(&item, 2);
        Ok(())
    }

    /// Base types from the root down, following bases declared in this library.
    fn inheritance(&self, page: &Page<'_>, ty: &TypeDescriptor) -> Vec<String> {
        let mut chain = Vec::new();
        let mut next = ty.base_type.as_ref();
        while let Some(base) = next {
            if chain.len() > self.by_name.len() {
                break;
            }
            chain.push(page.reference(base));
            next = base
                .full_name()
                .and_then(|name| self.by_name.get(&name))
                .and_then(|local| local.base_type.as_ref());
        }
        chain.reverse();
        chain
    }

    fn render_group(
        &self,
        page: &mut Page<'_>,
        ty: &TypeDescriptor,
        kind: MemberKind,
        members: &[&MemberDescriptor],
    ) -> Result<(), RenderError> {
        let items = members
            .iter()
            .map(|m| self.docs.for_member(ty, m))
            .collect::<Result<Vec<_>, _>>()?;

        let enum_values = ty.kind == TypeKind::Enum && kind == MemberKind::Field;
        let header = if enum_values {
            vec!["Name", "Value", "Summary"]
        } else {
            vec!["Name", "Signature", "Summary"]
        };
        let rows = members
            .iter()
            .zip(&items)
            .map(|(member, item)| {
                let middle = if enum_values {
                    member.value.clone().unwrap_or_default()
                } else {
                    signature::short_signature(page.resolver, page.file, ty, member)
                };
                vec![
                    escape(&signature::heading(ty, member)),
                    middle,
                    page.cell(&item.comment.summary),
                ]
            })
            .collect();

        page.doc.header(kind.group_title(), 2).table(
            header.into_iter().map(str::to_string).collect(),
            rows,
        );

        for (member, item) in members.iter().zip(&items) {
            self.render_member(page, ty, member, item);
        }
        Ok(())
    }

    fn render_member(
        &self,
        page: &mut Page<'_>,
        ty: &TypeDescriptor,
        member: &MemberDescriptor,
        item: &ItemDocs<'_>,
    ) {
        let comment = item.comment;

        page.doc.header(escape(&signature::heading(ty, member)), 3);
        page.prose(&comment.summary);
        page.doc
            .code(signature::declaration(ty, member), Some("csharp"));

        if !member.generic_parameters.is_empty() {
            let rows = member
                .generic_parameters
                .iter()
                .map(|name| {
                    let description = comment
                        .type_param(name)
                        .map(|t| page.cell(t))
                        .unwrap_or_default();
                    vec![inline_code(name), description]
                })
                .collect();
            page.doc.header("Type Parameters", 4).table(
                vec!["Name".to_string(), "Description".to_string()],
                rows,
            );
        }

        if !member.parameters.is_empty() {
            let rows = member
                .parameters
                .iter()
                .map(|p| {
                    let description = comment
                        .param(&p.name)
                        .map(|t| page.cell(t))
                        .unwrap_or_default();
                    vec![inline_code(&p.name), page.reference(&p.ty), description]
                })
                .collect();
            page.doc.header("Parameters", 4).table(
                vec![
                    "Name".to_string(),
                    "Type".to_string(),
                    "Description".to_string(),
                ],
                rows,
            );
        }

        match (member.kind, member.return_type.as_ref()) {
            (MemberKind::Property, Some(ty_ref)) => {
                page.doc.header("Property Value", 4);
                value_section(page, ty_ref, &comment.value);
            }
            (MemberKind::Method | MemberKind::Operator, Some(ty_ref)) => {
                page.doc.header("Returns", 4);
                value_section(page, ty_ref, &comment.returns);
            }
            _ => {}
        }

        if !comment.exceptions.is_empty() {
            let rows = comment
                .exceptions
                .iter()
                .map(|(cref, description)| {
                    vec![
                        self.resolver.cref(page.file, cref),
                        page.cell(description),
                    ]
                })
                .collect();
            page.doc.header("Exceptions", 4).table(
                vec!["Exception".to_string(), "Description".to_string()],
                rows,
            );
        }

        if !comment.remarks.is_empty() {
            page.doc.header("Remarks", 4);
            page.prose(&comment.remarks);
        }

        page.example(item, 4);
    }
}

/// Linked type followed by its description.
fn value_section(page: &mut Page<'_>, ty_ref: &TypeReference, description: &DocText) {
    let link = page.reference(ty_ref);
    if description.is_empty() {
        page.doc.paragraph(link);
    } else {
        let text = page.text(description);
        page.doc.paragraph(format!("{}<br>\n{}", link, text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::DocCommentSource;
    use crate::metadata::ManifestLibrary;
    use crate::model::{Accessibility, DocComment};
    use crate::options::{LinkStyle, Structure};
    use pretty_assertions::assert_eq;

    struct MapSource(HashMap<String, DocComment>);

    impl DocCommentSource for MapSource {
        fn lookup(&self, id: &str) -> Option<&DocComment> {
            self.0.get(id)
        }
    }

    const LIBRARY: &str = r#"{
        "name": "Acme.Core",
        "types": [
            {
                "namespace": "Acme.Core", "name": "Widget", "accessibility": "public",
                "kind": "class",
                "baseType": {"kind": "named", "namespace": "Acme.Core", "name": "Component"},
                "interfaces": [{"kind": "named", "namespace": "System", "name": "IDisposable"}],
                "members": [
                    {"kind": "field", "name": "secret", "accessibility": "private",
                     "returnType": {"kind": "named", "namespace": "System", "name": "Int32"}},
                    {"kind": "property", "name": "Name", "accessibility": "public", "getter": true,
                     "returnType": {"kind": "named", "namespace": "System", "name": "String"}},
                    {"kind": "property", "name": "Owner", "accessibility": "public", "getter": true,
                     "returnType": {"kind": "named", "namespace": "Other.Lib", "name": "Owner"}},
                    {"kind": "method", "name": "Resize", "accessibility": "public",
                     "parameters": [
                        {"name": "size", "type": {"kind": "named", "namespace": "System", "name": "Int32"}}
                     ],
                     "returnType": {"kind": "named", "namespace": "Acme.Core", "name": "Widget"}},
                    {"kind": "method", "name": "Resize", "accessibility": "public",
                     "parameters": [
                        {"name": "width", "type": {"kind": "named", "namespace": "System", "name": "Int32"}},
                        {"name": "height", "type": {"kind": "named", "namespace": "System", "name": "Int32"}}
                     ],
                     "returnType": {"kind": "named", "namespace": "Acme.Core", "name": "Widget"}},
                    {"kind": "constructor", "name": ".ctor", "accessibility": "public"}
                ]
            },
            {
                "namespace": "Acme.Core", "name": "Component", "accessibility": "public",
                "kind": "class",
                "baseType": {"kind": "named", "namespace": "System", "name": "Object"}
            },
            {
                "namespace": "Acme.Core", "name": "Color", "accessibility": "public", "kind": "enum",
                "members": [
                    {"kind": "field", "name": "Red", "accessibility": "public", "isStatic": true, "value": "0"},
                    {"kind": "field", "name": "Green", "accessibility": "public", "isStatic": true, "value": "1"}
                ]
            }
        ]
    }"#;

    fn comments() -> MapSource {
        let mut map = HashMap::new();
        map.insert(
            "T:Acme.Core.Widget".to_string(),
            DocComment {
                summary: DocText::plain("A widget."),
                ..Default::default()
            },
        );
        map.insert(
            "M:Acme.Core.Widget.Resize(System.Int32)".to_string(),
            DocComment {
                summary: DocText::plain("Square resize."),
                params: vec![("size".to_string(), DocText::plain("Edge length."))],
                returns: DocText::plain("This widget."),
                ..Default::default()
            },
        );
        map.insert(
            "M:Acme.Core.Widget.Resize(System.Int32,System.Int32)".to_string(),
            DocComment {
                summary: DocText::plain("Rectangular resize."),
                exceptions: vec![(
                    "T:System.ArgumentException".to_string(),
                    DocText::plain("Negative size."),
                )],
                ..Default::default()
            },
        );
        MapSource(map)
    }

    fn render_with(options: RenderOptions, full_name: &str) -> String {
        let library = ManifestLibrary::from_json(LIBRARY, "Acme.Core").unwrap();
        let source = comments();
        let docs = Documentation::new(&source, None);
        let resolver = LinkResolver::with_index_page(
            library.types(),
            options.structure,
            options.link_style,
            &options.index_page_name,
        );
        let renderer = TypeDocumentation::new(&library, &resolver, &docs, &options);
        let ty = library
            .types()
            .iter()
            .find(|t| t.full_name() == full_name)
            .unwrap();
        renderer.render(ty).unwrap()
    }

    fn render(full_name: &str) -> String {
        render_with(RenderOptions::default(), full_name)
    }

    #[test]
    fn header_section() {
        let page = render("Acme.Core.Widget");
        assert!(page.starts_with(
            "# Widget\n\nNamespace: Acme.Core\n\nA widget.\n\n\
             ```csharp\npublic class Widget : Component, IDisposable\n```\n\n\
             Inheritance Object → [Component](./Component.md) → Widget\n\n\
             Implements IDisposable\n\n"
        ));
    }

    #[test]
    fn groups_in_fixed_order() {
        let page = render("Acme.Core.Widget");
        let ctors = page.find("## Constructors").unwrap();
        let props = page.find("## Properties").unwrap();
        let methods = page.find("## Methods").unwrap();
        assert!(ctors < props && props < methods);
    }

    #[test]
    fn private_members_hidden_at_default_threshold() {
        let page = render("Acme.Core.Widget");
        assert!(!page.contains("secret"));
        assert!(!page.contains("## Fields"));
    }

    #[test]
    fn private_members_shown_at_private_threshold() {
        let options = RenderOptions {
            member_accessibility: Accessibility::Private,
            ..Default::default()
        };
        let page = render_with(options, "Acme.Core.Widget");
        assert!(page.contains("## Fields"));
        assert!(page.contains("### secret"));
        assert!(page.contains("private int secret"));
        assert!(page.contains("### Name"));
    }

    #[test]
    fn overloads_get_their_own_sections() {
        let page = render("Acme.Core.Widget");
        assert!(page.contains("### Resize(Int32)\n\nSquare resize."));
        assert!(page.contains("### Resize(Int32, Int32)\n\nRectangular resize."));
        assert!(page.contains("| `size` | Int32 | Edge length. |"));
        assert!(page.contains("| ArgumentException | Negative size. |"));
    }

    #[test]
    fn summary_table_links_signatures() {
        let page = render("Acme.Core.Widget");
        assert!(page.contains(
            "| Resize(Int32) | [Widget](./Widget.md) Resize(Int32 size) | Square resize. |"
        ));
    }

    #[test]
    fn self_link_in_returns() {
        let page = render("Acme.Core.Widget");
        assert!(page.contains("#### Returns\n\n[Widget](./Widget.md)<br>\nThis widget."));
    }

    #[test]
    fn external_types_are_plain_text() {
        let page = render("Acme.Core.Widget");
        assert!(page.contains("#### Property Value\n\nOwner\n"));
        assert!(page.contains("| Owner | Owner Owner |  |"));
    }

    #[test]
    fn enum_fields_show_values() {
        let page = render("Acme.Core.Color");
        assert!(page.contains("| Name | Value | Summary |"));
        assert!(page.contains("| Red | 0 |  |"));
        assert!(page.contains("```csharp\nGreen = 1\n```"));
    }

    #[test]
    fn back_button_top_and_bottom() {
        let options = RenderOptions {
            back_button: true,
            structure: Structure::Tree,
            link_style: LinkStyle::Extensionless,
            ..Default::default()
        };
        let page = render_with(options, "Acme.Core.Component");
        let back = "[`< Back`](../../index)";
        assert!(page.starts_with(&format!("{}\n\n# Component", back)));
        assert!(page.ends_with(&format!("---\n\n{}\n", back)));
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(render("Acme.Core.Widget"), render("Acme.Core.Widget"));
    }
}
