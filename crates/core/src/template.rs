//! Header and footer fragments wrapped around the rendered graphs.
//!
//! Fragments are opaque bytes copied to the output unchanged. The
//! [`TemplateSource`] trait keeps the emitter independent of where they
//! live; [`DirectoryTemplates`] reads them from disk and
//! [`InMemoryTemplates`] serves them from a map for tests and embedding.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Fragment names for the two front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Dot,
    Llvm,
}

impl Layout {
    pub fn header_name(self) -> &'static str {
        "header.snippet"
    }

    pub fn footer_name(self) -> &'static str {
        match self {
            Layout::Dot => "footer.snippet",
            Layout::Llvm => "llvmcfg.footer.snippet",
        }
    }
}

pub trait TemplateSource {
    /// Read the whole fragment called `name`.
    fn read_fragment(&self, name: &str) -> Result<Vec<u8>, std::io::Error>;
}

/// Fragments stored as files in one directory.
pub struct DirectoryTemplates {
    dir: PathBuf,
}

impl DirectoryTemplates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectoryTemplates { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TemplateSource for DirectoryTemplates {
    fn read_fragment(&self, name: &str) -> Result<Vec<u8>, std::io::Error> {
        std::fs::read(self.dir.join(name))
    }
}

#[derive(Default)]
pub struct InMemoryTemplates {
    fragments: HashMap<String, Vec<u8>>,
}

impl InMemoryTemplates {
    pub fn new(fragments: HashMap<String, Vec<u8>>) -> Self {
        Self { fragments }
    }

    pub fn with(mut self, name: &str, content: impl Into<Vec<u8>>) -> Self {
        self.fragments.insert(name.to_owned(), content.into());
        self
    }
}

impl TemplateSource for InMemoryTemplates {
    fn read_fragment(&self, name: &str) -> Result<Vec<u8>, std::io::Error> {
        self.fragments.get(name).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("fragment not found in memory: {}", name),
            )
        })
    }
}

/// A loaded header/footer pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Templates {
    pub header: Vec<u8>,
    pub footer: Vec<u8>,
}

impl Templates {
    pub fn load(source: &dyn TemplateSource, layout: Layout) -> Result<Templates, Error> {
        Ok(Templates {
            header: read(source, layout.header_name())?,
            footer: read(source, layout.footer_name())?,
        })
    }
}

fn read(source: &dyn TemplateSource, name: &str) -> Result<Vec<u8>, Error> {
    source.read_fragment(name).map_err(|e| Error::Template {
        name: name.to_owned(),
        source: e,
    })
}
