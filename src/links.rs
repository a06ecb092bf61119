//! Page file names and cross-page markdown links.
//!
//! File names are `/`-separated paths relative to the output root, without
//! the `.md` extension. Links are always relative to the linking page.

use crate::markdown::escape;
use crate::model::{qualify, strip_arity, TypeDescriptor, TypeReference};
use crate::options::{LinkStyle, Structure};
use std::collections::HashMap;

/// Resolves type identities to pages and renders links between pages.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    pages: HashMap<String, String>,
    style: LinkStyle,
}

impl LinkResolver {
    /// Build the page table for every documentable type of a library, with
    /// the default index page name reserved.
    pub fn new(types: &[TypeDescriptor], structure: Structure, style: LinkStyle) -> Self {
        Self::with_index_page(types, structure, style, "index")
    }

    /// Build the page table, keeping `index_page` free for the index.
    ///
    /// Names are compared case-insensitively. A flat name shared by several
    /// types, or by the index, is qualified with the namespace; a clash that
    /// remains gets a `-type` suffix.
    pub fn with_index_page(
        types: &[TypeDescriptor],
        structure: Structure,
        style: LinkStyle,
        index_page: &str,
    ) -> Self {
        let documentable: Vec<&TypeDescriptor> =
            types.iter().filter(|t| t.is_documentable()).collect();
        let reserved = index_page.to_lowercase();

        let mut simple_counts: HashMap<String, usize> = HashMap::new();
        simple_counts.insert(reserved.clone(), 1);
        for ty in &documentable {
            *simple_counts
                .entry(simple_file_name(&ty.name).to_lowercase())
                .or_default() += 1;
        }

        let pages = documentable
            .iter()
            .map(|ty| {
                let simple = simple_file_name(&ty.name);
                let file = match structure {
                    Structure::Tree => tree_file_name(ty),
                    Structure::Flat if simple_counts[&simple.to_lowercase()] > 1 => {
                        qualify(&ty.namespace, &simple)
                    }
                    Structure::Flat => simple,
                };
                let file = if file.to_lowercase() == reserved {
                    format!("{}-type", file)
                } else {
                    file
                };
                (ty.full_name(), file)
            })
            .collect();

        Self { pages, style }
    }

    /// Page of a documented type, `None` when the type gets no page.
    pub fn file_name(&self, full_name: &str) -> Option<&str> {
        self.pages.get(full_name).map(String::as_str)
    }

    /// Link target from one page to another, styled for the hosting platform.
    pub fn url(&self, from_file: &str, to_file: &str) -> String {
        let relative = relative_path(from_file, to_file);
        match self.style {
            LinkStyle::Plain => format!("{}.md", relative),
            LinkStyle::Extensionless => relative,
            LinkStyle::ExtensionlessNoPrefix => relative
                .strip_prefix("./")
                .map(str::to_string)
                .unwrap_or(relative),
        }
    }

    /// `[label](url)` to the type's page, or the escaped label when it has none.
    pub fn type_link(&self, from_file: &str, full_name: &str, label: &str) -> String {
        match self.file_name(full_name) {
            Some(target) => format!("[{}]({})", escape(label), self.url(from_file, target)),
            None => {
                tracing::debug!(target_type = full_name, "no page for referenced type");
                escape(label)
            }
        }
    }

    /// Markdown for a type reference, linking every locally documented part.
    pub fn reference(&self, from_file: &str, reference: &TypeReference) -> String {
        match reference {
            TypeReference::Named {
                namespace,
                name,
                generic_arguments,
            } => {
                let head =
                    self.type_link(from_file, &qualify(namespace, name), strip_arity(name));
                if generic_arguments.is_empty() {
                    head
                } else {
                    let args: Vec<String> = generic_arguments
                        .iter()
                        .map(|arg| self.reference(from_file, arg))
                        .collect();
                    format!("{}\\<{}\\>", head, args.join(", "))
                }
            }
            TypeReference::Array { element, rank } => format!(
                "{}\\[{}\\]",
                self.reference(from_file, element),
                ",".repeat(rank.saturating_sub(1) as usize)
            ),
            TypeReference::ByRef { element } => {
                format!("{}&", self.reference(from_file, element))
            }
            TypeReference::GenericParameter { name, .. } => escape(name),
        }
    }

    /// Markdown for a `cref` identifier from a doc comment.
    pub fn cref(&self, from_file: &str, cref: &str) -> String {
        match parse_cref(cref) {
            Some(target) => self.type_link(from_file, &target.type_name, &target.label),
            None => escape(cref),
        }
    }
}

struct CrefTarget {
    type_name: String,
    label: String,
}

/// Split `M:Ns.Type.Member(Args)` into the declaring type and a label.
fn parse_cref(cref: &str) -> Option<CrefTarget> {
    let (prefix, rest) = cref.split_once(':')?;
    match prefix {
        "T" => Some(CrefTarget {
            label: last_segment(rest).to_string(),
            type_name: rest.to_string(),
        }),
        "M" | "P" | "F" | "E" => {
            let path = rest.split(['(', '~']).next().unwrap_or(rest);
            let (type_name, member) = path.rsplit_once('.')?;
            let type_label = last_segment(type_name);
            let member = member.split("``").next().unwrap_or(member);
            let label = match member {
                "#ctor" | "#cctor" => type_label.to_string(),
                _ => format!("{}.{}", type_label, member),
            };
            Some(CrefTarget {
                type_name: type_name.to_string(),
                label,
            })
        }
        _ => None,
    }
}

fn last_segment(full_name: &str) -> &str {
    let stripped = strip_arity(full_name);
    stripped.rsplit('.').next().unwrap_or(stripped)
}

/// Simple name with the arity marker turned into a suffix (`Box`1` → `Box-1`).
fn simple_file_name(name: &str) -> String {
    name.replace('`', "-")
}

fn tree_file_name(ty: &TypeDescriptor) -> String {
    let mut parts: Vec<String> = ty
        .namespace
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();
    parts.push(simple_file_name(&ty.name));
    parts.join("/")
}

/// Relative path from the directory of `from_file` to `to_file`.
///
/// Same-directory and descending paths start with `./`, others with `../`.
pub fn relative_path(from_file: &str, to_file: &str) -> String {
    let from_dir: Vec<&str> = split_path(from_file);
    let from_dir = &from_dir[..from_dir.len().saturating_sub(1)];
    let to_parts: Vec<&str> = split_path(to_file);
    let to_dir = &to_parts[..to_parts.len().saturating_sub(1)];

    let common = from_dir
        .iter()
        .zip(to_dir)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = from_dir.len() - common;
    let rest = to_parts[common..].join("/");
    if ups == 0 {
        format!("./{}", rest)
    } else {
        format!("{}{}", "../".repeat(ups), rest)
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Accessibility, TypeKind};

    fn ty(namespace: &str, name: &str) -> TypeDescriptor {
        TypeDescriptor {
            namespace: namespace.to_string(),
            name: name.to_string(),
            generic_parameters: Vec::new(),
            accessibility: Accessibility::Public,
            kind: TypeKind::Class,
            base_type: None,
            interfaces: Vec::new(),
            members: Vec::new(),
        }
    }

    fn library() -> Vec<TypeDescriptor> {
        let mut hidden = ty("Acme.Core", "Hidden");
        hidden.accessibility = Accessibility::Internal;
        let mut callback = ty("Acme.Core", "Callback");
        callback.kind = TypeKind::Delegate;
        vec![
            ty("Acme.Core", "Widget"),
            ty("Acme.Core", "Box"),
            ty("Acme.Core", "Box`1"),
            ty("Acme.Util", "Helper"),
            ty("Acme.Util", "Widget"),
            hidden,
            callback,
        ]
    }

    /// Resolve a relative link against the linking page, returning the target path.
    fn follow(from_file: &str, url: &str) -> String {
        let mut parts: Vec<&str> = split_path(from_file);
        parts.pop();
        for segment in url.split('/') {
            match segment {
                "." | "" => {}
                ".." => {
                    parts.pop();
                }
                other => parts.push(other),
            }
        }
        parts.join("/")
    }

    #[test]
    fn flat_names_strip_arity() {
        let resolver = LinkResolver::new(&library(), Structure::Flat, LinkStyle::Plain);
        assert_eq!(resolver.file_name("Acme.Core.Box"), Some("Box"));
        assert_eq!(resolver.file_name("Acme.Core.Box`1"), Some("Box-1"));
        assert_eq!(resolver.file_name("Acme.Util.Helper"), Some("Helper"));
    }

    #[test]
    fn flat_names_qualified_on_collision() {
        let resolver = LinkResolver::new(&library(), Structure::Flat, LinkStyle::Plain);
        assert_eq!(resolver.file_name("Acme.Core.Widget"), Some("Acme.Core.Widget"));
        assert_eq!(resolver.file_name("Acme.Util.Widget"), Some("Acme.Util.Widget"));
    }

    #[test]
    fn flat_collisions_ignore_case() {
        let types = vec![ty("Acme.A", "Widget"), ty("Acme.B", "widget")];
        let resolver = LinkResolver::new(&types, Structure::Flat, LinkStyle::Plain);
        assert_eq!(resolver.file_name("Acme.A.Widget"), Some("Acme.A.Widget"));
        assert_eq!(resolver.file_name("Acme.B.widget"), Some("Acme.B.widget"));
    }

    #[test]
    fn index_page_name_is_reserved() {
        let types = vec![ty("Acme", "Home"), ty("", "Index"), ty("Acme", "Widget")];
        let flat =
            LinkResolver::with_index_page(&types, Structure::Flat, LinkStyle::Plain, "Home");
        assert_eq!(flat.file_name("Acme.Home"), Some("Acme.Home"));
        assert_eq!(flat.file_name("Acme.Widget"), Some("Widget"));
        assert_eq!(flat.file_name("Index"), Some("Index"));

        let default = LinkResolver::new(&types, Structure::Flat, LinkStyle::Plain);
        assert_eq!(default.file_name("Index"), Some("Index-type"));
        assert_eq!(default.file_name("Acme.Home"), Some("Home"));

        let tree = LinkResolver::new(&types, Structure::Tree, LinkStyle::Plain);
        assert_eq!(tree.file_name("Index"), Some("Index-type"));
        assert_eq!(tree.file_name("Acme.Home"), Some("Acme/Home"));
    }

    #[test]
    fn tree_names_mirror_namespaces() {
        let resolver = LinkResolver::new(&library(), Structure::Tree, LinkStyle::Plain);
        assert_eq!(resolver.file_name("Acme.Core.Widget"), Some("Acme/Core/Widget"));
        assert_eq!(resolver.file_name("Acme.Core.Box`1"), Some("Acme/Core/Box-1"));
        let global = LinkResolver::new(&[ty("", "Root")], Structure::Tree, LinkStyle::Plain);
        assert_eq!(global.file_name("Root"), Some("Root"));
    }

    #[test]
    fn non_documentable_types_have_no_page() {
        let resolver = LinkResolver::new(&library(), Structure::Flat, LinkStyle::Plain);
        assert_eq!(resolver.file_name("Acme.Core.Hidden"), None);
        assert_eq!(resolver.file_name("Acme.Core.Callback"), None);
        assert_eq!(
            resolver.type_link("Helper", "Acme.Core.Hidden", "Hidden"),
            "Hidden"
        );
    }

    #[test]
    fn relative_paths() {
        assert_eq!(relative_path("Widget", "Helper"), "./Helper");
        assert_eq!(relative_path("Acme/Core/Widget", "Acme/Core/Box"), "./Box");
        assert_eq!(relative_path("Acme/Core/Widget", "Acme/Util/Helper"), "../Util/Helper");
        assert_eq!(relative_path("index", "Acme/Core/Widget"), "./Acme/Core/Widget");
        assert_eq!(relative_path("Acme/Core/Widget", "index"), "../../index");
        assert_eq!(relative_path("/Acme/Core/Widget/", "./Acme/Core/Box"), "./Box");
    }

    #[test]
    fn links_round_trip_in_both_layouts() {
        for structure in [Structure::Flat, Structure::Tree] {
            let types = library();
            let resolver = LinkResolver::new(&types, structure, LinkStyle::Extensionless);
            let documented: Vec<&str> = types
                .iter()
                .filter_map(|t| resolver.file_name(&t.full_name()))
                .collect();
            for from in &documented {
                for to in &documented {
                    assert_eq!(&follow(from, &resolver.url(from, to)), to);
                }
            }
        }
    }

    #[test]
    fn link_styles() {
        let types = library();
        let plain = LinkResolver::new(&types, Structure::Tree, LinkStyle::Plain);
        let github = LinkResolver::new(&types, Structure::Tree, LinkStyle::Extensionless);
        let gitlab = LinkResolver::new(&types, Structure::Tree, LinkStyle::ExtensionlessNoPrefix);

        let from = "Acme/Core/Widget";
        assert_eq!(plain.url(from, "Acme/Core/Box"), "./Box.md");
        assert_eq!(github.url(from, "Acme/Core/Box"), "./Box");
        assert_eq!(gitlab.url(from, "Acme/Core/Box"), "Box");
        assert_eq!(gitlab.url(from, "Acme/Util/Helper"), "../Util/Helper");
    }

    #[test]
    fn self_links_resolve() {
        let resolver = LinkResolver::new(&library(), Structure::Flat, LinkStyle::Plain);
        assert_eq!(
            resolver.type_link("Helper", "Acme.Util.Helper", "Helper"),
            "[Helper](./Helper.md)"
        );
    }

    #[test]
    fn generic_and_array_references() {
        let resolver = LinkResolver::new(&library(), Structure::Flat, LinkStyle::Plain);
        let list = TypeReference::Named {
            namespace: "System.Collections.Generic".into(),
            name: "List`1".into(),
            generic_arguments: vec![TypeReference::named("Acme.Util", "Helper")],
        };
        assert_eq!(
            resolver.reference("Box", &list),
            "List\\<[Helper](./Helper.md)\\>"
        );

        let matrix = TypeReference::Array {
            element: Box::new(TypeReference::named("System", "Int32")),
            rank: 2,
        };
        assert_eq!(resolver.reference("Box", &matrix), "Int32\\[,\\]");
    }

    #[test]
    fn crefs() {
        let resolver = LinkResolver::new(&library(), Structure::Flat, LinkStyle::Plain);
        assert_eq!(resolver.cref("Box", "T:Acme.Util.Helper"), "[Helper](./Helper.md)");
        assert_eq!(
            resolver.cref("Box", "M:Acme.Util.Helper.Run(System.Int32)"),
            "[Helper.Run](./Helper.md)"
        );
        assert_eq!(resolver.cref("Box", "M:Acme.Util.Helper.#ctor"), "[Helper](./Helper.md)");
        assert_eq!(resolver.cref("Box", "T:System.String"), "String");
        assert_eq!(resolver.cref("Box", "!:Broken"), "!:Broken");
        assert_eq!(
            resolver.cref("Widget", "P:Acme.Core.Box`1.Value"),
            "[Box.Value](./Box-1.md)"
        );
    }
}
