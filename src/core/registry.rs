//! Output-side registries for extracted declarations.
//!
//! A registry entry binds a source symbol to the name it will carry in the
//! generated namespace. Names are assigned at registration time by probing
//! `base`, `base_1`, `base_2`, ... against the union of names already taken
//! across both registries, so two source declarations can never collide in
//! the output no matter which modules they came from. Records are
//! addressable both by source symbol and by assigned output name.

use std::collections::{BTreeMap, HashMap};

use crate::core::decl::DeclBody;
use crate::core::symbols::{SymbolId, SymbolTable};

/// A type admitted to the output, under its assigned name.
pub struct TypeRecord {
    pub symbol: SymbolId,
    pub scope: String,
    pub original_name: String,
    pub body: DeclBody,
    pub new_name: String,
}

pub struct TypeRegistry {
    by_symbol: HashMap<SymbolId, usize>,
    /// Output name -> record index.
    by_name: BTreeMap<String, usize>,
    records: Vec<TypeRecord>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            by_symbol: HashMap::new(),
            by_name: BTreeMap::new(),
            records: Vec::new(),
        }
    }

    pub fn contains(&self, symbol: SymbolId) -> bool {
        self.by_symbol.contains_key(&symbol)
    }

    /// Admit a type, assigning its output name. Registering the same symbol
    /// twice is a no-op and returns the name assigned the first time.
    pub fn register(&mut self, table: &SymbolTable, symbol: SymbolId, body: DeclBody) -> String {
        if let Some(&idx) = self.by_symbol.get(&symbol) {
            return self.records[idx].new_name.clone();
        }
        let original_name = table.symbol_name(symbol).to_string();
        let new_name =
            assign_name(&original_name, |candidate| self.by_name.contains_key(candidate));
        self.by_name.insert(new_name.clone(), self.records.len());
        self.by_symbol.insert(symbol, self.records.len());
        self.records.push(TypeRecord {
            symbol,
            scope: table.defining_scope(symbol).to_string(),
            original_name,
            body,
            new_name: new_name.clone(),
        });
        new_name
    }

    pub fn lookup_by_symbol(&self, symbol: SymbolId) -> Option<&TypeRecord> {
        self.by_symbol.get(&symbol).map(|&idx| &self.records[idx])
    }

    pub fn lookup_by_output_name(&self, name: &str) -> Option<&TypeRecord> {
        self.by_name.get(name).map(|&idx| &self.records[idx])
    }

    pub fn new_name_of(&self, symbol: SymbolId) -> Option<&str> {
        self.lookup_by_symbol(symbol).map(|r| r.new_name.as_str())
    }

    pub fn name_taken(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All records sorted by output name, the order declarations are emitted.
    pub fn records_sorted(&self) -> Vec<&TypeRecord> {
        let mut records: Vec<&TypeRecord> = self.records.iter().collect();
        records.sort_by(|a, b| a.new_name.cmp(&b.new_name));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A constant admitted to the output, attached to its owning type.
pub struct ConstRecord {
    pub symbol: SymbolId,
    /// The extracted type this constant is declared for.
    pub owner: SymbolId,
    pub original_name: String,
    pub value: String,
    pub new_name: String,
}

pub struct ConstRegistry {
    by_symbol: HashMap<SymbolId, usize>,
    /// Output name -> record index.
    by_name: BTreeMap<String, usize>,
    records: Vec<ConstRecord>,
}

impl ConstRegistry {
    pub fn new() -> Self {
        Self {
            by_symbol: HashMap::new(),
            by_name: BTreeMap::new(),
            records: Vec::new(),
        }
    }

    pub fn contains(&self, symbol: SymbolId) -> bool {
        self.by_symbol.contains_key(&symbol)
    }

    /// Admit a constant. Candidate names are probed against both the type
    /// registry's names and the constants already admitted.
    pub fn register(
        &mut self,
        table: &SymbolTable,
        types: &TypeRegistry,
        symbol: SymbolId,
        owner: SymbolId,
        value: &str,
    ) -> String {
        if let Some(&idx) = self.by_symbol.get(&symbol) {
            return self.records[idx].new_name.clone();
        }
        let original_name = table.symbol_name(symbol).to_string();
        let new_name = assign_name(&original_name, |candidate| {
            types.name_taken(candidate) || self.by_name.contains_key(candidate)
        });
        self.by_name.insert(new_name.clone(), self.records.len());
        self.by_symbol.insert(symbol, self.records.len());
        self.records.push(ConstRecord {
            symbol,
            owner,
            original_name: original_name.clone(),
            value: value.to_string(),
            new_name: new_name.clone(),
        });
        new_name
    }

    pub fn lookup_by_symbol(&self, symbol: SymbolId) -> Option<&ConstRecord> {
        self.by_symbol.get(&symbol).map(|&idx| &self.records[idx])
    }

    pub fn lookup_by_output_name(&self, name: &str) -> Option<&ConstRecord> {
        self.by_name.get(name).map(|&idx| &self.records[idx])
    }

    /// Constants grouped by owning type, each group sorted by output name.
    pub fn grouped_by_owner(&self) -> HashMap<SymbolId, Vec<&ConstRecord>> {
        let mut groups: HashMap<SymbolId, Vec<&ConstRecord>> = HashMap::new();
        for record in &self.records {
            groups.entry(record.owner).or_default().push(record);
        }
        for group in groups.values_mut() {
            group.sort_by(|a, b| a.new_name.cmp(&b.new_name));
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// First unused candidate from `base`, `base_1`, `base_2`, ...
fn assign_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    let mut suffix = 1u32;
    loop {
        let candidate = format!("{base}_{suffix}");
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
