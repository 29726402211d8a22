use crate::analysis::{build_bindings, Binding, DeclarationSite};
use crate::ast::visit::{walk_statements_mut, VisitMut};
use crate::ast::{NodeId, Program, Statement, StatementKind};
use crate::cleaner::{CleanPass, PassContext};
use crate::config::CleanerConfig;
use crate::diagnostics::Diagnostic;
use crate::errors::Result;
use rustc_hash::FxHashSet;
use tracing::debug;

/// Removes unreferenced function declarations and variables initialised
/// with a function or arrow expression
pub struct FunctionEliminationPass;

impl CleanPass for FunctionEliminationPass {
    fn name(&self) -> &'static str {
        "unused-functions"
    }

    fn is_enabled(&self, config: &CleanerConfig) -> bool {
        config.remove_unused_functions
    }

    fn run(&mut self, program: &mut Program, ctx: &mut PassContext) -> Result<bool> {
        let removed = eliminate(
            program,
            ctx.config,
            Binding::is_function_valued,
            &mut ctx.diagnostics,
        );
        Ok(removed > 0)
    }
}

/// Removes unreferenced variables whose value is not a function
pub struct VariableEliminationPass;

impl CleanPass for VariableEliminationPass {
    fn name(&self) -> &'static str {
        "unused-variables"
    }

    fn is_enabled(&self, config: &CleanerConfig) -> bool {
        config.remove_unused_variables
    }

    fn run(&mut self, program: &mut Program, ctx: &mut PassContext) -> Result<bool> {
        let removed = eliminate(
            program,
            ctx.config,
            |binding| !binding.is_function_valued(),
            &mut ctx.diagnostics,
        );
        Ok(removed > 0)
    }
}

/// Delete every declaration site of the unreferenced, eliminable bindings
/// accepted by `select`, reporting one diagnostic per site in source order.
/// Returns the number of sites removed.
fn eliminate(
    program: &mut Program,
    config: &CleanerConfig,
    select: impl Fn(&Binding) -> bool,
    diagnostics: &mut Vec<Diagnostic>,
) -> usize {
    let table = build_bindings(program);

    let mut doomed: Vec<(&Binding, &DeclarationSite)> = Vec::new();
    for (id, binding) in table.bindings() {
        if binding.referenced || !binding.is_eliminable() || !select(binding) {
            continue;
        }
        if config.preserve_top_level && table.is_top_level(id) {
            continue;
        }
        doomed.extend(binding.sites.iter().map(|site| (binding, site)));
    }
    if doomed.is_empty() {
        return 0;
    }
    doomed.sort_by_key(|(_, site)| site.order);

    let mut removals = FxHashSet::default();
    for (binding, site) in &doomed {
        debug!(name = %binding.name, node = %site.node, "removing unused declaration");
        removals.insert(site.node);
        diagnostics.push(if site.is_function_valued() {
            Diagnostic::unused_function(&binding.name, site.loc)
        } else {
            Diagnostic::unused_variable(&binding.name, site.loc)
        });
    }

    let mut remover = DeclarationRemover {
        removals: &removals,
    };
    remover.visit_program_mut(program);
    doomed.len()
}

/// Drops function declaration statements and declarators by id. A
/// declaration statement whose declarators all went goes too.
struct DeclarationRemover<'a> {
    removals: &'a FxHashSet<NodeId>,
}

impl DeclarationRemover<'_> {
    fn keep(&self, stmt: &mut Statement) -> bool {
        match &mut stmt.kind {
            StatementKind::Function(_) => !self.removals.contains(&stmt.id),
            StatementKind::Variable(decl) => {
                if decl.declarations.is_empty() {
                    return true;
                }
                decl.declarations
                    .retain(|declarator| !self.removals.contains(&declarator.id));
                !decl.declarations.is_empty()
            }
            _ => true,
        }
    }
}

impl VisitMut for DeclarationRemover<'_> {
    fn visit_statements_mut(&mut self, stmts: &mut Vec<Statement>) {
        stmts.retain_mut(|stmt| self.keep(stmt));
        walk_statements_mut(self, stmts);
    }
}

/// Report every simple-identifier parameter that nothing references, for
/// each function present in `program`. Parameters are never removed.
pub fn unused_parameters(program: &Program) -> Vec<Diagnostic> {
    let table = build_bindings(program);
    let mut unused: Vec<_> = table
        .functions()
        .iter()
        .flat_map(|function| {
            function
                .params
                .iter()
                .filter(|param| !table.binding(param.binding).referenced)
                .map(move |param| (param.order, function.name.as_deref(), param))
        })
        .collect();
    unused.sort_by_key(|(order, _, _)| *order);
    unused
        .into_iter()
        .map(|(_, function, param)| Diagnostic::unused_parameter(&param.name, function, param.loc))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, NodeIdGen, VariableKind};
    use crate::diagnostics::DiagnosticKind;
    use crate::printer::print_compact;

    fn run_pass(pass: &mut dyn CleanPass, program: &mut Program, config: &CleanerConfig) -> Vec<Diagnostic> {
        let mut ctx = PassContext::new(config, NodeIdGen::new());
        pass.run(program, &mut ctx).unwrap();
        ctx.diagnostics
    }

    #[test]
    fn test_function_pass_removes_unreferenced_functions_only() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![
            b.function_decl("used", &[], vec![]),
            b.function_decl("unused", &[], vec![]),
            b.var(VariableKind::Const, "cb", Some(b.arrow(&[], vec![]))),
            b.var(VariableKind::Const, "n", Some(b.num(1.0))),
            b.expr_stmt(b.call_name("used", vec![])),
        ]);
        let diagnostics = run_pass(&mut FunctionEliminationPass, &mut program, &CleanerConfig::default());
        assert_eq!(
            print_compact(&program),
            "function used() {} const n = 1; used();"
        );
        let names: Vec<_> = diagnostics.iter().map(|d| d.name.as_deref().unwrap()).collect();
        assert_eq!(names, ["unused", "cb"]);
        assert!(diagnostics.iter().all(|d| d.kind == DiagnosticKind::UnusedFunction));
    }

    #[test]
    fn test_variable_pass_keeps_function_values() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![
            b.var(VariableKind::Const, "cb", Some(b.arrow(&[], vec![]))),
            b.var(VariableKind::Let, "n", Some(b.num(1.0))),
        ]);
        let diagnostics = run_pass(&mut VariableEliminationPass, &mut program, &CleanerConfig::default());
        assert_eq!(print_compact(&program), "const cb = () => {};");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnusedVariable);
        assert_eq!(diagnostics[0].name.as_deref(), Some("n"));
    }

    #[test]
    fn test_multi_declarator_keeps_the_statement() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![
            b.vars(VariableKind::Let, vec![("a", Some(b.num(1.0))), ("b", Some(b.num(2.0)))]),
            b.expr_stmt(b.call_name("use", vec![b.ident("b")])),
        ]);
        run_pass(&mut VariableEliminationPass, &mut program, &CleanerConfig::default());
        assert_eq!(print_compact(&program), "let b = 2; use(b);");
    }

    #[test]
    fn test_all_declarators_unused_removes_the_statement() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![
            b.vars(VariableKind::Var, vec![("a", None), ("b", None)]),
            b.expr_stmt(b.call_name("go", vec![])),
        ]);
        let diagnostics = run_pass(&mut VariableEliminationPass, &mut program, &CleanerConfig::default());
        assert_eq!(print_compact(&program), "go();");
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_redeclared_var_removes_every_site() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![
            b.var(VariableKind::Var, "x", Some(b.num(1.0))),
            b.var(VariableKind::Var, "x", Some(b.num(2.0))),
        ]);
        let diagnostics = run_pass(&mut VariableEliminationPass, &mut program, &CleanerConfig::default());
        assert!(program.body.is_empty());
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_preserve_top_level() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![
            b.var(VariableKind::Var, "global", Some(b.num(1.0))),
            b.function_decl("f", &[], vec![b.var(VariableKind::Let, "local", None)]),
        ]);
        let config = CleanerConfig {
            preserve_top_level: true,
            ..CleanerConfig::default()
        };
        let diagnostics = run_pass(&mut VariableEliminationPass, &mut program, &config);
        assert_eq!(print_compact(&program), "var global = 1; function f() {}");
        assert_eq!(diagnostics[0].name.as_deref(), Some("local"));
    }

    #[test]
    fn test_destructured_and_loop_bindings_survive() {
        let b = AstBuilder::new();
        let mut program = Program::new(vec![
            b.var_pattern(VariableKind::Const, b.object_pat(&["a"]), Some(b.ident("obj"))),
            b.for_of(VariableKind::Const, "item", b.ident("items"), b.block(vec![])),
        ]);
        let before = program.clone();
        let diagnostics = run_pass(&mut VariableEliminationPass, &mut program, &CleanerConfig::default());
        assert!(diagnostics.is_empty());
        assert_eq!(program, before);
    }

    #[test]
    fn test_unused_parameters_reported_in_order() {
        let b = AstBuilder::new();
        let program = Program::new(vec![
            b.function_decl("f", &["a", "b"], vec![b.ret(Some(b.ident("b")))]),
            b.expr_stmt(b.call_name(
                "run",
                vec![b.arrow(&["event"], vec![]), b.ident("f")],
            )),
        ]);
        let diagnostics = unused_parameters(&program);
        let reasons: Vec<_> = diagnostics.iter().map(|d| d.reason.as_str()).collect();
        assert_eq!(
            reasons,
            [
                "Parameter 'a' of function 'f' is never referenced",
                "Parameter 'event' of anonymous function is never referenced",
            ]
        );
    }

    #[test]
    fn test_shadowed_parameter_is_unused() {
        let b = AstBuilder::new();
        let program = Program::new(vec![b.function_decl(
            "f",
            &["x"],
            vec![b.block(vec![
                b.var(VariableKind::Let, "x", Some(b.num(1.0))),
                b.ret(Some(b.ident("x"))),
            ])],
        )]);
        let diagnostics = unused_parameters(&program);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].name.as_deref(), Some("x"));
    }
}
