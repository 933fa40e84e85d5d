//! swc-based import specifier extraction

use std::path::Path;
use swc_common::sync::Lrc;
use swc_common::{FileName, FilePathMapping, SourceFile, SourceMap};
use swc_ecma_ast::{EsVersion, ExportAll, ImportDecl, NamedExport, Str};
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};
use tracing::debug;
use tsmove_foundation::{ImportParser, ImportReference, MoveError, MoveResult, Span};

/// Reports `import … from '…'`, `import '…'`, `export … from '…'` and
/// `export * from '…'` specifiers. Dynamic `import()` and `require()` calls
/// are not observed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeScriptImportParser;

impl TypeScriptImportParser {
    pub fn new() -> Self {
        Self
    }
}

impl ImportParser for TypeScriptImportParser {
    fn extract_imports(&self, path: &Path, text: &str) -> MoveResult<Vec<ImportReference>> {
        // swc drops a leading BOM, spans must still index the raw text
        let (body, offset) = match text.strip_prefix(BOM) {
            Some(rest) => (rest, BOM.len_utf8()),
            None => (text, 0),
        };

        let cm = Lrc::new(SourceMap::new(FilePathMapping::empty()));
        let fm = cm.new_source_file(Lrc::new(FileName::Real(path.to_path_buf())), body.to_string());

        let lexer = Lexer::new(
            syntax_for(path),
            EsVersion::latest(),
            StringInput::from(&*fm),
            None,
        );
        let mut parser = Parser::new_from(lexer);

        let module = parser
            .parse_module()
            .map_err(|e| MoveError::parse(path, format!("{:?}", e.kind())))?;

        let mut collector = SpecifierCollector {
            source_file: &fm,
            offset,
            references: Vec::new(),
        };
        module.visit_with(&mut collector);

        debug!(
            file = %path.display(),
            imports = collector.references.len(),
            "Extracted import specifiers"
        );

        Ok(collector.references)
    }
}

/// Pick the dialect from the file name. Unknown extensions parse as TypeScript.
fn syntax_for(path: &Path) -> Syntax {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "js" | "mjs" | "cjs" | "jsx" => Syntax::Es(Default::default()),
        _ => Syntax::Typescript(TsSyntax {
            tsx: extension == "tsx",
            decorators: true,
            dts: name.ends_with(".d.ts"),
            ..Default::default()
        }),
    }
}

const BOM: char = '\u{feff}';

struct SpecifierCollector<'a> {
    source_file: &'a SourceFile,
    /// Bytes preceding the parsed text in the original input
    offset: usize,
    references: Vec<ImportReference>,
}

impl SpecifierCollector<'_> {
    /// Record the text between the quotes of a string literal.
    fn record(&mut self, literal: &Str) {
        let start = (literal.span.lo.0 - self.source_file.start_pos.0) as usize;
        let end = (literal.span.hi.0 - self.source_file.start_pos.0) as usize;
        if end < start + 2 {
            return;
        }

        let inner = Span::new(start + 1, end - 1);
        if let Some(specifier) = self.source_file.src.get(inner.start..inner.end) {
            let span = Span::new(inner.start + self.offset, inner.end + self.offset);
            self.references
                .push(ImportReference::new(specifier.to_string(), span));
        }
    }
}

impl Visit for SpecifierCollector<'_> {
    fn visit_import_decl(&mut self, import: &ImportDecl) {
        self.record(&import.src);
    }

    fn visit_export_all(&mut self, export: &ExportAll) {
        self.record(&export.src);
    }

    fn visit_named_export(&mut self, export: &NamedExport) {
        if let Some(src) = &export.src {
            self.record(src);
        }
    }
}
