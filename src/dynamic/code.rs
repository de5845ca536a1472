//! Symbol extraction from Python sources.
//!
//! Two strategies share the [`CodeExtractor`] contract: a tree-sitter parse
//! and a regex scan. [`FallbackExtractor`] tries the parse first and uses the
//! regex scan when the parser is unavailable or the tree contains syntax
//! errors.

use std::sync::LazyLock;

use regex::Regex;
use tree_sitter::{Node, Parser};

use crate::error::{PitfallError, Result};

static FROM_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"from\s+([a-zA-Z_][a-zA-Z0-9_.]*)\s+import").expect("import regex must compile")
});

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"import\s+([a-zA-Z_][a-zA-Z0-9_.]*)").expect("import regex must compile")
});

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bclass\s+([a-zA-Z_][a-zA-Z0-9_]*)").expect("class regex must compile")
});

static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bdef\s+([a-zA-Z_][a-zA-Z0-9_]*)").expect("function regex must compile")
});

/// Imports, classes and functions found in one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeSymbols {
    pub imports: Vec<String>,
    pub classes: Vec<String>,
    pub functions: Vec<String>,
}

/// A strategy for pulling symbols out of source text.
pub trait CodeExtractor {
    /// Short strategy name for logging.
    fn name(&self) -> &'static str;

    fn extract(&mut self, source: &str) -> Result<CodeSymbols>;
}

/// Structural extraction with tree-sitter.
pub struct TreeSitterExtractor {
    parser: Parser,
}

impl TreeSitterExtractor {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| PitfallError::SourceParse {
                message: format!("Failed to set language: {}", e),
            })?;
        Ok(Self { parser })
    }

    /// Pre-order walk driven by a cursor, so nesting depth never grows the
    /// call stack.
    fn collect(root: Node, source: &str, symbols: &mut CodeSymbols) {
        let mut cursor = root.walk();
        loop {
            Self::visit(cursor.node(), source, symbols);
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return;
                }
            }
        }
    }

    fn visit(node: Node, source: &str, symbols: &mut CodeSymbols) {
        match node.kind() {
            "import_statement" => {
                let mut cursor = node.walk();
                for name in node.children_by_field_name("name", &mut cursor) {
                    // `import a.b as c` nests the dotted name under an alias node
                    let target = if name.kind() == "aliased_import" {
                        name.child_by_field_name("name")
                    } else {
                        Some(name)
                    };
                    if let Some(text) = target.and_then(|n| node_text(n, source)) {
                        symbols.imports.push(text.to_string());
                    }
                }
            }
            "import_from_statement" => {
                if let Some(module) = node
                    .child_by_field_name("module_name")
                    .and_then(|n| node_text(n, source))
                {
                    let module = module.trim_start_matches('.');
                    if !module.is_empty() {
                        symbols.imports.push(module.to_string());
                    }
                }
            }
            "class_definition" => {
                if let Some(name) = node
                    .child_by_field_name("name")
                    .and_then(|n| node_text(n, source))
                {
                    symbols.classes.push(name.to_string());
                }
            }
            "function_definition" => {
                if let Some(name) = node
                    .child_by_field_name("name")
                    .and_then(|n| node_text(n, source))
                {
                    symbols.functions.push(name.to_string());
                }
            }
            _ => {}
        }
    }
}

fn node_text<'s>(node: Node, source: &'s str) -> Option<&'s str> {
    source.get(node.byte_range())
}

impl CodeExtractor for TreeSitterExtractor {
    fn name(&self) -> &'static str {
        "tree-sitter"
    }

    fn extract(&mut self, source: &str) -> Result<CodeSymbols> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| PitfallError::SourceParse {
                message: "parser returned no tree".to_string(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(PitfallError::SourceParse {
                message: "syntax errors in source".to_string(),
            });
        }

        let mut symbols = CodeSymbols::default();
        Self::collect(root, source, &mut symbols);
        Ok(symbols)
    }
}

/// Line-oriented regex extraction. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexExtractor;

impl CodeExtractor for RegexExtractor {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn extract(&mut self, source: &str) -> Result<CodeSymbols> {
        let captures = |re: &Regex| -> Vec<String> {
            re.captures_iter(source)
                .map(|caps| caps[1].to_string())
                .collect()
        };

        let mut imports = captures(&FROM_IMPORT_RE);
        imports.extend(captures(&IMPORT_RE));

        Ok(CodeSymbols {
            imports,
            classes: captures(&CLASS_RE),
            functions: captures(&FUNCTION_RE),
        })
    }
}

/// Structural parse with regex fallback.
pub struct FallbackExtractor {
    structural: Option<TreeSitterExtractor>,
    regex: RegexExtractor,
}

impl FallbackExtractor {
    pub fn new() -> Self {
        let structural = match TreeSitterExtractor::new() {
            Ok(extractor) => Some(extractor),
            Err(e) => {
                tracing::warn!("Structural parsing unavailable, using regex: {}", e);
                None
            }
        };
        Self {
            structural,
            regex: RegexExtractor,
        }
    }

    /// A fallback extractor that only scans with regexes.
    pub fn regex_only() -> Self {
        Self {
            structural: None,
            regex: RegexExtractor,
        }
    }
}

impl Default for FallbackExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeExtractor for FallbackExtractor {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn extract(&mut self, source: &str) -> Result<CodeSymbols> {
        if let Some(structural) = self.structural.as_mut() {
            match structural.extract(source) {
                Ok(symbols) => return Ok(symbols),
                Err(e) => tracing::debug!("{} extraction failed: {}", structural.name(), e),
            }
        }
        self.regex.extract(source)
    }
}
