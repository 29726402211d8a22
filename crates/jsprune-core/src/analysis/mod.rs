//! Scope and binding analysis over a program tree

mod binding_table;
mod scope_builder;

pub use binding_table::{
    Binding, BindingId, BindingKind, BindingTable, DeclarationSite, FunctionInfo, ParamInfo,
    Scope, ScopeId, ScopeKind, SiteKind,
};
pub use scope_builder::build_bindings;
