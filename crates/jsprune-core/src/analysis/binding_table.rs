use crate::ast::NodeId;
use crate::span::Position;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u32);

/// Kind of scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Program,
    Function,
    /// Block statement, loop head or switch body; holds `let`/`const` only
    Block,
    /// Catch clause parameter and body
    Catch,
}

impl ScopeKind {
    /// `var` and top-level function declarations land in these scopes
    pub fn is_hoisting_target(&self) -> bool {
        matches!(self, ScopeKind::Program | ScopeKind::Function)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Function,
    Variable,
    Parameter,
}

/// How a name was introduced at one particular place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    /// `function name() {}`; the site node is the statement
    FunctionDeclaration,
    /// `kind name = init`; the site node is the declarator
    Declarator { function_init: bool },
    /// A name inside a destructuring pattern
    Destructured,
    /// `for (let i = 0; ...)`, `for (const k in o)`
    LoopHead,
    Parameter,
    CatchParameter,
    /// Name of a function expression, visible only inside it
    FunctionName,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationSite {
    pub node: NodeId,
    pub kind: SiteKind,
    pub loc: Option<Position>,
    /// Whether the site can be deleted from its enclosing statement list
    pub removable: bool,
    /// Position of the site in tree walk order
    pub order: usize,
}

impl DeclarationSite {
    pub fn is_function_valued(&self) -> bool {
        matches!(
            self.kind,
            SiteKind::FunctionDeclaration
                | SiteKind::Declarator {
                    function_init: true
                }
        )
    }
}

/// Every declaration of one name in one scope. Redeclarations (`var x; var x;`,
/// `var f; function f() {}`) share a single binding.
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub scope: ScopeId,
    pub sites: Vec<DeclarationSite>,
    pub referenced: bool,
}

impl Binding {
    pub fn kind(&self) -> BindingKind {
        if self.sites.iter().any(|site| {
            matches!(site.kind, SiteKind::Parameter | SiteKind::CatchParameter)
        }) {
            BindingKind::Parameter
        } else if self.is_function_valued() {
            BindingKind::Function
        } else {
            BindingKind::Variable
        }
    }

    /// A function declaration or a variable initialised with a function
    pub fn is_function_valued(&self) -> bool {
        self.sites.iter().any(DeclarationSite::is_function_valued)
    }

    /// Only bindings whose every declaration can be deleted are candidates
    /// for elimination
    pub fn is_eliminable(&self) -> bool {
        !self.sites.is_empty() && self.sites.iter().all(|site| site.removable)
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    bindings: IndexMap<String, BindingId>,
}

impl Scope {
    pub fn get(&self, name: &str) -> Option<BindingId> {
        self.bindings.get(name).copied()
    }

    /// Bindings in declaration order
    pub fn bindings(&self) -> impl Iterator<Item = BindingId> + '_ {
        self.bindings.values().copied()
    }
}

/// A simple-identifier parameter of one function
#[derive(Debug, Clone)]
pub struct ParamInfo {
    pub name: String,
    pub binding: BindingId,
    pub loc: Option<Position>,
    pub order: usize,
}

/// Every function in the tree, with its parameter bindings
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub name: Option<String>,
    pub scope: ScopeId,
    pub params: Vec<ParamInfo>,
}

/// All scopes and bindings of one program. Built fresh by
/// [`super::build_bindings`] for every analysis; never reused across trees.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    scopes: Vec<Scope>,
    bindings: Vec<Binding>,
    functions: Vec<FunctionInfo>,
    unresolved: FxHashSet<String>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            parent,
            bindings: IndexMap::new(),
        });
        id
    }

    /// Record a declaration site, merging it into an existing binding of the
    /// same name in `scope`
    pub fn declare(&mut self, scope: ScopeId, name: &str, site: DeclarationSite) -> BindingId {
        if let Some(existing) = self.scopes[scope.0 as usize].get(name) {
            self.bindings[existing.0 as usize].sites.push(site);
            return existing;
        }
        let id = BindingId(self.bindings.len() as u32);
        self.bindings.push(Binding {
            name: name.to_string(),
            scope,
            sites: vec![site],
            referenced: false,
        });
        self.scopes[scope.0 as usize]
            .bindings
            .insert(name.to_string(), id);
        id
    }

    pub fn add_function(&mut self, info: FunctionInfo) {
        self.functions.push(info);
    }

    pub fn mark_referenced(&mut self, binding: BindingId) {
        self.bindings[binding.0 as usize].referenced = true;
    }

    pub fn mark_unresolved(&mut self, name: &str) {
        if !self.unresolved.contains(name) {
            self.unresolved.insert(name.to_string());
        }
    }

    /// Resolve `name` as seen from `scope`, walking outwards
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<BindingId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(binding) = scope.get(name) {
                return Some(binding);
            }
            current = scope.parent;
        }
        None
    }

    /// Scopes from `scope` out to the program scope
    pub fn scope_chain(&self, scope: ScopeId) -> Vec<ScopeId> {
        let mut chain = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            chain.push(id);
            current = self.scope(id).parent;
        }
        chain
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.0 as usize]
    }

    pub fn bindings(&self) -> impl Iterator<Item = (BindingId, &Binding)> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(i, binding)| (BindingId(i as u32), binding))
    }

    /// Look up a binding by name in a specific scope only
    pub fn binding_in(&self, scope: ScopeId, name: &str) -> Option<&Binding> {
        self.scope(scope).get(name).map(|id| self.binding(id))
    }

    pub fn functions(&self) -> &[FunctionInfo] {
        &self.functions
    }

    /// Whether `name` was referenced somewhere without resolving to a binding
    pub fn is_unresolved(&self, name: &str) -> bool {
        self.unresolved.contains(name)
    }

    /// The binding is declared in the program scope
    pub fn is_top_level(&self, binding: BindingId) -> bool {
        self.binding(binding).scope == self.root()
    }
}
