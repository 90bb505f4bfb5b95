//! Constant harvesting.
//!
//! After the type closure is complete, each extracted type's defining module
//! is scanned for module-level constants annotated with exactly that type.
//! Matching is by declaration identity, not by name: a constant in some other
//! module annotated with a same-named but distinct type is never picked up,
//! and a constant whose annotation is an alias of the extracted type is
//! skipped because the alias is a different declaration.

use crate::core::registry::{ConstRegistry, TypeRegistry};
use crate::core::symbols::SymbolTable;

/// Collect constants for every registered type, in emission order so the
/// assigned constant names are deterministic.
pub fn harvest(table: &SymbolTable, types: &TypeRegistry) -> ConstRegistry {
    let mut consts = ConstRegistry::new();
    for record in types.records_sorted() {
        for constant in table.scan_constants(&record.scope) {
            if constant.declared_type == Some(record.symbol) {
                consts.register(table, types, constant.symbol, record.symbol, &constant.value);
            }
        }
    }
    consts
}
