//! Closure walking over type references.
//!
//! Starting from the extraction root, the walker visits every reference
//! occurrence in each admitted declaration body, resolves it, and admits any
//! newly seen type declaration. Registration happens at discovery time, so a
//! type's output name is fixed the first time any reference reaches it, and
//! cycles terminate because an already-registered symbol is never re-queued.

use crate::core::registry::TypeRegistry;
use crate::core::symbols::{SymbolId, SymbolTable};

/// Walk the reference closure of `root`, admitting every reachable type
/// declaration into the registry. Unresolvable references (built-ins,
/// generic parameters, value-only imports) stay unregistered and will be
/// emitted as written.
pub fn discover(table: &SymbolTable, root: SymbolId, registry: &mut TypeRegistry) {
    let root_body = table
        .declaration_body(root)
        .expect("closure root must be a type declaration")
        .clone();
    registry.register(table, root, root_body);

    let mut worklist = vec![root];
    while let Some(current) = worklist.pop() {
        // The body was cloned into the registry at admission time; read it
        // back from the table so the borrow stays short.
        let body = table
            .declaration_body(current)
            .expect("registered symbols are type declarations");
        let mut discovered = Vec::new();
        body.for_each_ref(&mut |occ| {
            let Some(target) = table.resolve_use(occ) else {
                return;
            };
            if !table.is_type(target) || registry.contains(target) {
                return;
            }
            let target_body = table
                .declaration_body(target)
                .expect("is_type implies a declaration body")
                .clone();
            registry.register(table, target, target_body);
            discovered.push(target);
        });
        worklist.extend(discovered);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use swc_common::SourceMap;

    use super::*;
    use crate::core::parsers::parse_ts_source;

    fn build_table(files: &[(&str, &str)]) -> SymbolTable {
        let mut modules = BTreeMap::new();
        for (path, code) in files {
            let source_map = Arc::new(SourceMap::default());
            let parsed = parse_ts_source(code.to_string(), path, source_map).unwrap();
            modules.insert(path.to_string(), parsed);
        }
        SymbolTable::build(&modules)
    }

    fn discovered_names(table: &SymbolTable, scope: &str, root: &str) -> Vec<String> {
        let root_id = table.resolve_root(scope, root).unwrap();
        let mut registry = TypeRegistry::new();
        discover(table, root_id, &mut registry);
        registry
            .records_sorted()
            .iter()
            .map(|r| r.new_name.clone())
            .collect()
    }

    #[test]
    fn test_walks_transitive_references() {
        let table = build_table(&[(
            "src/palette.ts",
            "type Color = number;\n\
             interface Swatch { color: Color }\n\
             interface Palette { swatches: Swatch[] }",
        )]);

        let names = discovered_names(&table, "src/palette.ts", "Palette");
        assert_eq!(names, vec!["Color", "Palette", "Swatch"]);
    }

    #[test]
    fn test_walks_across_modules() {
        let table = build_table(&[
            ("src/color.ts", "export type Color = number;"),
            (
                "src/palette.ts",
                "import { Color } from \"./color\";\n\
                 export interface Palette { primary: Color }",
            ),
        ]);

        let names = discovered_names(&table, "src/palette.ts", "Palette");
        assert_eq!(names, vec!["Color", "Palette"]);
    }

    #[test]
    fn test_cycles_terminate() {
        let table = build_table(&[(
            "src/tree.ts",
            "interface Node { children: Node[]; parent?: Node }",
        )]);

        let names = discovered_names(&table, "src/tree.ts", "Node");
        assert_eq!(names, vec!["Node"]);
    }

    #[test]
    fn test_unreferenced_types_excluded() {
        let table = build_table(&[(
            "src/models.ts",
            "type Used = number;\n\
             type Unused = string;\n\
             interface Root { value: Used }",
        )]);

        let names = discovered_names(&table, "src/models.ts", "Root");
        assert_eq!(names, vec!["Root", "Used"]);
    }

    #[test]
    fn test_builtins_not_registered() {
        let table = build_table(&[(
            "src/models.ts",
            "interface Root { at: Date; tags: Map<string, number> }",
        )]);

        let names = discovered_names(&table, "src/models.ts", "Root");
        assert_eq!(names, vec!["Root"]);
    }

    #[test]
    fn test_conditional_type_references_discovered() {
        let table = build_table(&[(
            "src/m.ts",
            "type A = number;\n\
             type B = string;\n\
             type Cond = A extends B ? A : B;\n\
             interface Root { x: Cond }",
        )]);

        let names = discovered_names(&table, "src/m.ts", "Root");
        assert_eq!(names, vec!["A", "B", "Cond", "Root"]);
    }

    #[test]
    fn test_call_signature_references_discovered() {
        let table = build_table(&[(
            "src/m.ts",
            "interface Payload { data: string }\n\
             interface Handler { (input: Payload): boolean }",
        )]);

        let names = discovered_names(&table, "src/m.ts", "Handler");
        assert_eq!(names, vec!["Handler", "Payload"]);
    }

    #[test]
    fn test_extends_clause_is_walked() {
        let table = build_table(&[(
            "src/models.ts",
            "interface Base { id: string }\n\
             interface Derived extends Base { extra: number }",
        )]);

        let names = discovered_names(&table, "src/models.ts", "Derived");
        assert_eq!(names, vec!["Base", "Derived"]);
    }
}
