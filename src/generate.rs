//! Run orchestration: one page per documentable type plus the index page.

use crate::docs::{DocCommentSource, Documentation};
use crate::error::RenderError;
use crate::links::LinkResolver;
use crate::markdown::{escape, MarkdownDocument};
use crate::metadata::MetadataProvider;
use crate::model::TypeDescriptor;
use crate::options::RenderOptions;
use crate::render::TypeDocumentation;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::Dispatch;

/// Destination of generated pages.
pub trait Writer {
    /// Create `path` and its parents if absent.
    fn ensure_directory(&mut self, path: &Path) -> io::Result<()>;

    fn write(&mut self, path: &Path, text: &str) -> io::Result<()>;
}

/// Writes pages to the local filesystem.
#[derive(Debug, Default)]
pub struct FsWriter;

impl Writer for FsWriter {
    fn ensure_directory(&mut self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write(&mut self, path: &Path, text: &str) -> io::Result<()> {
        fs::write(path, text)
    }
}

/// Outcome counters of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

pub struct Generator {
    options: RenderOptions,
    dispatch: Dispatch,
}

impl Generator {
    /// `dispatch` receives every log event of the run.
    pub fn new(options: RenderOptions, dispatch: Dispatch) -> Self {
        Self { options, dispatch }
    }

    /// Document every public, non-delegate type of `library`.
    ///
    /// A type that fails to render or write is logged and counted; the run
    /// goes on. Only a failure to write the index page is returned.
    pub fn generate(
        &self,
        library: &dyn MetadataProvider,
        comments: &dyn DocCommentSource,
        writer: &mut dyn Writer,
    ) -> Result<RunSummary, RenderError> {
        tracing::dispatcher::with_default(&self.dispatch, || {
            self.run(library, comments, writer)
        })
    }

    fn run(
        &self,
        library: &dyn MetadataProvider,
        comments: &dyn DocCommentSource,
        writer: &mut dyn Writer,
    ) -> Result<RunSummary, RenderError> {
        let options = &self.options;
        tracing::info!(library = library.library_name(), "generation started");

        let resolver = LinkResolver::with_index_page(
            library.types(),
            options.structure,
            options.link_style,
            &options.index_page_name,
        );
        let docs = Documentation::new(comments, options.examples_dir.clone());
        let renderer = TypeDocumentation::new(library, &resolver, &docs, options);

        let mut types = library.public_types();
        types.sort_by(|a, b| a.index_order(b));

        let mut index = MarkdownDocument::new();
        index.header(escape(library.library_name()), 1);

        let mut summary = RunSummary::default();
        let mut namespace: Option<&str> = None;
        for ty in types {
            if namespace != Some(ty.namespace.as_str()) {
                index.header(namespace_title(&ty.namespace), 2);
                namespace = Some(ty.namespace.as_str());
            }
            index.paragraph(resolver.type_link(
                &options.index_page_name,
                &ty.full_name(),
                &ty.display_name(),
            ));

            let _span = tracing::info_span!("type", name = %ty.full_name()).entered();
            match self.document(ty, &renderer, &resolver, writer) {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "page written");
                    summary.succeeded += 1;
                }
                Err(err) => {
                    tracing::error!(error = %error_chain(&err), "failed to document type");
                    summary.failed += 1;
                }
            }
        }

        let index_path = self.page_path(&options.index_page_name);
        if let Some(parent) = index_path.parent() {
            writer
                .ensure_directory(parent)
                .map_err(|source| RenderError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        writer
            .write(&index_path, &index.to_string())
            .map_err(|source| RenderError::Write {
                path: index_path.clone(),
                source,
            })?;

        tracing::info!(
            "Generation: {} succeeded, {} failed",
            summary.succeeded,
            summary.failed
        );
        Ok(summary)
    }

    fn document(
        &self,
        ty: &TypeDescriptor,
        renderer: &TypeDocumentation<'_>,
        resolver: &LinkResolver,
        writer: &mut dyn Writer,
    ) -> Result<PathBuf, RenderError> {
        let file = resolver
            .file_name(&ty.full_name())
            .ok_or_else(|| RenderError::MissingPage(ty.full_name()))?;
        let path = self.page_path(file);

        if let Some(parent) = path.parent() {
            writer
                .ensure_directory(parent)
                .map_err(|source| RenderError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let page = renderer.render(ty)?;
        writer
            .write(&path, &page)
            .map_err(|source| RenderError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    /// `<output>/<file>.md`
    fn page_path(&self, file: &str) -> PathBuf {
        self.options.output_dir.join(format!("{}.md", file))
    }
}

fn namespace_title(namespace: &str) -> &str {
    if namespace.is_empty() {
        "No namespace"
    } else {
        namespace
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
