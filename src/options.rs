//! Render configuration resolved once from the raw command-line flags.

use crate::model::Accessibility;
use std::path::PathBuf;

/// Output directory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Structure {
    /// Every page directly in the output root.
    #[default]
    Flat,
    /// One directory level per namespace segment.
    Tree,
}

/// Post-processing applied to every generated link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStyle {
    /// `./Widget.md`
    #[default]
    Plain,
    /// `./Widget`
    Extensionless,
    /// `Widget`
    ExtensionlessNoPrefix,
}

/// Hosting-related switches exactly as given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostingFlags {
    pub github_pages: bool,
    pub mkdocs: bool,
    pub gitlab_wiki: bool,
}

impl HostingFlags {
    /// GitLab wiki wins over GitHub Pages; mkdocs keeps plain links.
    pub fn link_style(self) -> LinkStyle {
        if self.gitlab_wiki {
            LinkStyle::ExtensionlessNoPrefix
        } else if self.github_pages {
            LinkStyle::Extensionless
        } else {
            LinkStyle::Plain
        }
    }

    /// mkdocs always forces the tree layout.
    pub fn structure(self, requested: Structure) -> Structure {
        if self.mkdocs {
            Structure::Tree
        } else {
            requested
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub output_dir: PathBuf,
    pub index_page_name: String,
    pub examples_dir: Option<PathBuf>,
    pub member_accessibility: Accessibility,
    pub structure: Structure,
    pub back_button: bool,
    pub link_style: LinkStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            index_page_name: "index".to_string(),
            examples_dir: None,
            member_accessibility: Accessibility::Protected,
            structure: Structure::Flat,
            back_button: false,
            link_style: LinkStyle::Plain,
        }
    }
}

impl RenderOptions {
    /// Apply the hosting flags on top of an explicitly requested structure.
    pub fn with_hosting(mut self, requested: Structure, flags: HostingFlags) -> Self {
        self.structure = flags.structure(requested);
        self.link_style = flags.link_style();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mkdocs_forces_tree() {
        let flags = HostingFlags {
            mkdocs: true,
            ..Default::default()
        };
        let options = RenderOptions::default().with_hosting(Structure::Flat, flags);
        assert_eq!(options.structure, Structure::Tree);
        assert_eq!(options.link_style, LinkStyle::Plain);
    }

    #[test]
    fn explicit_structure_without_mkdocs() {
        let options =
            RenderOptions::default().with_hosting(Structure::Tree, HostingFlags::default());
        assert_eq!(options.structure, Structure::Tree);
        let options =
            RenderOptions::default().with_hosting(Structure::Flat, HostingFlags::default());
        assert_eq!(options.structure, Structure::Flat);
    }

    #[test]
    fn gitlab_wiki_takes_precedence() {
        let flags = HostingFlags {
            github_pages: true,
            gitlab_wiki: true,
            mkdocs: false,
        };
        assert_eq!(flags.link_style(), LinkStyle::ExtensionlessNoPrefix);
    }

    #[test]
    fn github_pages_strips_extension() {
        let flags = HostingFlags {
            github_pages: true,
            ..Default::default()
        };
        assert_eq!(flags.link_style(), LinkStyle::Extensionless);
    }
}
