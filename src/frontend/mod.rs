//! Front-ends that turn source files into [`SyntaxTree`]s.
//!
//! The detection engine never sees tree-sitter; it only reads the neutral
//! model in [`crate::syntax`]. Each supported language implements
//! [`Grammar`], and every grammar is a [`FrontEnd`] through the shared
//! lowering pass in [`lower`].
//!
//! # Adding a New Language
//!
//! 1. Create a module here (e.g., `kotlin.rs`) with a struct holding its
//!    `tree_sitter::Language`.
//! 2. Implement `Grammar`: map node kinds to roles and take handler clauses
//!    apart.
//! 3. Register it in `for_extension` and `for_language` below.

mod cpp;
mod ecma;
mod java;
pub mod lower;
mod python;

pub use cpp::CppGrammar;
pub use ecma::EcmaGrammar;
pub use java::JavaGrammar;
pub use lower::{Grammar, HandlerParts, Role};
pub use python::PythonGrammar;

use std::path::Path;

use once_cell::sync::OnceCell;
use thiserror::Error;
use tree_sitter::Parser;

use crate::syntax::SyntaxTree;

/// Failures a front-end surfaces instead of guessing.
#[derive(Debug, Error)]
pub enum FrontEndError {
    #[error("failed to load the {language} grammar: {source}")]
    Language {
        language: &'static str,
        #[source]
        source: tree_sitter::LanguageError,
    },
    #[error("{path}: parser produced no tree")]
    NoTree { path: String },
    #[error("{path}:{line}: inconsistent {kind} node: {detail}")]
    Inconsistent {
        path: String,
        line: usize,
        kind: String,
        detail: &'static str,
    },
    #[error("{path}:{line}: statements nested deeper than {limit} levels")]
    TooDeep {
        path: String,
        line: usize,
        limit: usize,
    },
}

/// Turns source text of one language into a syntax tree.
pub trait FrontEnd: Send + Sync {
    /// Returns the language identifier (e.g., "java", "python").
    fn language_id(&self) -> &'static str;

    /// Returns file extensions this front-end handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parse and lower one source file.
    ///
    /// Syntax errors do not fail the parse; the tree is lowered with
    /// tree-sitter's error recovery and flagged via `has_parse_errors`.
    fn parse(&self, path: &Path, source: &[u8]) -> Result<SyntaxTree, FrontEndError>;

    /// Check if this front-end handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }
}

impl<G: Grammar> FrontEnd for G {
    fn language_id(&self) -> &'static str {
        Grammar::language_id(self)
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        Grammar::file_extensions(self)
    }

    fn parse(&self, path: &Path, source: &[u8]) -> Result<SyntaxTree, FrontEndError> {
        let mut parser = Parser::new();
        parser
            .set_language(self.language())
            .map_err(|err| FrontEndError::Language {
                language: Grammar::language_id(self),
                source: err,
            })?;

        let path_str = path.to_string_lossy();
        let tree = parser.parse(source, None).ok_or_else(|| FrontEndError::NoTree {
            path: path_str.to_string(),
        })?;

        lower::Lowerer::new(self, source, &path_str).lower_tree(&tree)
    }
}

static CPP: OnceCell<CppGrammar> = OnceCell::new();
static JAVA: OnceCell<JavaGrammar> = OnceCell::new();
static JAVASCRIPT: OnceCell<EcmaGrammar> = OnceCell::new();
static PYTHON: OnceCell<PythonGrammar> = OnceCell::new();
static TSX: OnceCell<EcmaGrammar> = OnceCell::new();
static TYPESCRIPT: OnceCell<EcmaGrammar> = OnceCell::new();

/// Language identifiers with a registered front-end.
pub const LANGUAGES: &[&str] = &["cpp", "java", "javascript", "python", "tsx", "typescript"];

/// Get a front-end by language identifier.
pub fn for_language(lang_id: &str) -> Option<&'static dyn FrontEnd> {
    let front_end: &'static dyn FrontEnd = match lang_id {
        "cpp" => CPP.get_or_init(CppGrammar::new),
        "java" => JAVA.get_or_init(JavaGrammar::new),
        "javascript" => JAVASCRIPT.get_or_init(EcmaGrammar::javascript),
        "python" => PYTHON.get_or_init(PythonGrammar::new),
        "tsx" => TSX.get_or_init(EcmaGrammar::tsx),
        "typescript" => TYPESCRIPT.get_or_init(EcmaGrammar::typescript),
        _ => return None,
    };
    Some(front_end)
}

/// Get a front-end for a file extension (with or without the leading dot).
pub fn for_extension(ext: &str) -> Option<&'static dyn FrontEnd> {
    let ext = ext.trim_start_matches('.');
    LANGUAGES
        .iter()
        .filter_map(|id| for_language(id))
        .find(|fe| fe.handles_extension(ext))
}

/// Get a front-end for a path, by its extension.
pub fn for_path(path: &Path) -> Option<&'static dyn FrontEnd> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    for_extension(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_by_extension() {
        assert_eq!(for_extension("java").map(|f| f.language_id()), Some("java"));
        assert_eq!(for_extension(".py").map(|f| f.language_id()), Some("python"));
        assert_eq!(for_extension("mjs").map(|f| f.language_id()), Some("javascript"));
        assert_eq!(for_extension("ts").map(|f| f.language_id()), Some("typescript"));
        assert_eq!(for_extension("tsx").map(|f| f.language_id()), Some("tsx"));
        assert_eq!(for_extension("hpp").map(|f| f.language_id()), Some("cpp"));
        assert!(for_extension("go").is_none());
    }

    #[test]
    fn test_registry_by_language() {
        for id in LANGUAGES {
            let fe = for_language(id).expect("registered language");
            assert_eq!(fe.language_id(), *id);
        }
        assert!(for_language("cobol").is_none());
    }

    #[test]
    fn test_for_path() {
        assert!(for_path(Path::new("src/Main.java")).is_some());
        assert!(for_path(Path::new("Makefile")).is_none());
        assert_eq!(
            for_path(Path::new("src/cache.cc")).map(|f| f.language_id()),
            Some("cpp")
        );
    }
}
