use std::sync::Arc;

use anyhow::{Result, anyhow};
use swc_common::{FileName, Globals, SourceMap};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// A parsed TypeScript module together with the source map that positions
/// in its AST refer to.
///
/// Each file gets its own `Arc<SourceMap>` so parsing can run on rayon
/// worker threads without shared mutable state. The source map is kept
/// because the lowering step extracts verbatim snippets (literal values,
/// unsupported type constructs) by span.
pub struct ParsedModule {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
}

/// Parse TypeScript source code into an AST.
///
/// TSX syntax is enabled based on the file extension so `.tsx` modules with
/// JSX in them still parse (only their top-level declarations are read).
pub fn parse_ts_source(
    code: String,
    file_path: &str,
    source_map: Arc<SourceMap>,
) -> Result<ParsedModule> {
    use swc_common::GLOBALS;

    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: file_path.ends_with(".tsx") || file_path.ends_with(".jsx"),
            ..Default::default()
        });

        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path, e))?;

        Ok(ParsedModule { module, source_map })
    })
}
