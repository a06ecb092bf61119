//! Documentation correlator: match members with their doc comments.
//!
//! Every member is looked up by its canonical identifier. A miss is not an
//! error: the member is documented with empty prose.

pub mod id;
pub mod xml;

use crate::error::RenderError;
use crate::model::{DocComment, DocText, MemberDescriptor, TypeDescriptor};
use std::fs;
use std::path::{Path, PathBuf};

/// Lookup of parsed doc comments by canonical identifier.
pub trait DocCommentSource {
    fn lookup(&self, id: &str) -> Option<&DocComment>;
}

static EMPTY_COMMENT: DocComment = DocComment {
    summary: DocText(Vec::new()),
    remarks: DocText(Vec::new()),
    params: Vec::new(),
    type_params: Vec::new(),
    returns: DocText(Vec::new()),
    value: DocText(Vec::new()),
    exceptions: Vec::new(),
    example: DocText(Vec::new()),
};

/// Example snippet read from the examples directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Example {
    /// A `.md` file, inserted as is.
    Markdown(String),
    /// Any other file, fenced with a language derived from its extension.
    Code {
        language: Option<String>,
        code: String,
    },
}

/// Everything known about one documented item.
#[derive(Debug, Clone)]
pub struct ItemDocs<'a> {
    pub id: String,
    pub comment: &'a DocComment,
    pub example: Option<Example>,
}

pub struct Documentation<'a> {
    source: &'a dyn DocCommentSource,
    examples_dir: Option<PathBuf>,
}

impl<'a> Documentation<'a> {
    pub fn new(source: &'a dyn DocCommentSource, examples_dir: Option<PathBuf>) -> Self {
        Self {
            source,
            examples_dir,
        }
    }

    /// The type's own comment, looked up under its `T:` identifier.
    pub fn for_type(&self, ty: &TypeDescriptor) -> Result<ItemDocs<'a>, RenderError> {
        self.correlate(id::type_id(ty))
    }

    pub fn for_member(
        &self,
        ty: &TypeDescriptor,
        member: &MemberDescriptor,
    ) -> Result<ItemDocs<'a>, RenderError> {
        self.correlate(id::member_id(ty, member))
    }

    fn correlate(&self, id: String) -> Result<ItemDocs<'a>, RenderError> {
        let source = self.source;
        let comment = source.lookup(&id).unwrap_or_else(|| {
            tracing::debug!(id = %id, "no doc comment");
            &EMPTY_COMMENT
        });
        let example = match self.examples_dir {
            Some(ref dir) => find_example(dir, &id)?,
            None => None,
        };
        Ok(ItemDocs {
            id,
            comment,
            example,
        })
    }
}

/// First file (by name) in `dir` called `<id>.<ext>`.
fn find_example(dir: &Path, id: &str) -> Result<Option<Example>, RenderError> {
    let pattern = format!(
        "{}/{}.*",
        glob::Pattern::escape(&dir.to_string_lossy()),
        glob::Pattern::escape(id)
    );
    let mut matches: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && p.file_stem().and_then(|s| s.to_str()) == Some(id))
        .collect();
    matches.sort();

    let Some(path) = matches.into_iter().next() else {
        return Ok(None);
    };
    let content = fs::read_to_string(&path).map_err(|source| RenderError::Example {
        path: path.clone(),
        source,
    })?;

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    Ok(Some(match extension {
        "md" => Example::Markdown(content),
        _ => Example::Code {
            language: language_for(extension).map(str::to_string),
            code: content,
        },
    }))
}

/// Code fence language for an example file extension.
fn language_for(extension: &str) -> Option<&str> {
    match extension {
        "" | "txt" => None,
        "cs" => Some("csharp"),
        "fs" => Some("fsharp"),
        "vb" => Some("vbnet"),
        "ps1" => Some("powershell"),
        other => Some(other),
    }
}
