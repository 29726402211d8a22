//! Dead-code cleaner for a program tree
//!
//! The cleaner runs a fixed pipeline of passes over an owned [`Program`]:
//! constant folding, reachability pruning, then rounds of unused function
//! and unused variable elimination. Unused parameters are reported last,
//! against whatever functions survived. Every pass shares one
//! [`PassContext`] so diagnostics come out in the order they were produced.

pub mod passes;

use crate::ast::{NodeIdGen, Program};
use crate::config::{CleanerConfig, EliminationMode};
use crate::diagnostics::{Diagnostic, DiagnosticSummary};
use crate::errors::Result;
use crate::validate::validate;
use passes::{
    unused_parameters, ConstantFoldingPass, FunctionEliminationPass, ReachabilityPass,
    VariableEliminationPass,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A single rewrite over the whole program
pub trait CleanPass {
    fn name(&self) -> &'static str;

    fn is_enabled(&self, config: &CleanerConfig) -> bool;

    /// Returns whether the tree changed
    fn run(&mut self, program: &mut Program, ctx: &mut PassContext) -> Result<bool>;
}

/// State shared by the passes of one invocation
pub struct PassContext<'a> {
    pub config: &'a CleanerConfig,
    /// Source of ids for nodes synthesised while rewriting
    pub ids: NodeIdGen,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> PassContext<'a> {
    pub fn new(config: &'a CleanerConfig, ids: NodeIdGen) -> Self {
        Self {
            config,
            ids,
            diagnostics: Vec::new(),
        }
    }
}

/// Outcome of one clean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanResult {
    pub diagnostics: Vec<Diagnostic>,
    #[serde(rename = "transformedTree")]
    pub program: Program,
    /// Elimination rounds executed, including the final one that removed nothing
    pub rounds: usize,
}

impl CleanResult {
    pub fn summary(&self) -> DiagnosticSummary {
        DiagnosticSummary::from_diagnostics(&self.diagnostics)
    }

    /// Whether any node was removed or rewritten away
    pub fn removed_anything(&self) -> bool {
        self.diagnostics.iter().any(|d| d.kind.is_removal())
    }
}

pub struct Cleaner {
    config: CleanerConfig,
}

impl Cleaner {
    pub fn new(config: CleanerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Clean `program`. Fails without a partial result when the tree is
    /// malformed.
    pub fn clean(&self, mut program: Program) -> Result<CleanResult> {
        let ids = validate(&program)?;
        let mut ctx = PassContext::new(&self.config, ids);

        run_pass(&mut ConstantFoldingPass, &mut program, &mut ctx)?;
        run_pass(&mut ReachabilityPass, &mut program, &mut ctx)?;
        let rounds = self.eliminate(&mut program, &mut ctx)?;

        if self.config.report_unused_parameters {
            let params = unused_parameters(&program);
            debug!(count = params.len(), "unused parameters");
            ctx.diagnostics.extend(params);
        }

        let result = CleanResult {
            diagnostics: ctx.diagnostics,
            program,
            rounds,
        };
        let summary = result.summary();
        info!(
            unreachable = summary.unreachable_statements,
            functions = summary.unused_functions,
            variables = summary.unused_variables,
            parameters = summary.unused_parameters,
            rounds,
            "clean finished"
        );
        Ok(result)
    }

    fn eliminate(&self, program: &mut Program, ctx: &mut PassContext) -> Result<usize> {
        let mut functions = FunctionEliminationPass;
        let mut variables = VariableEliminationPass;
        if !functions.is_enabled(&self.config) && !variables.is_enabled(&self.config) {
            return Ok(0);
        }

        let mut rounds = 0;
        loop {
            rounds += 1;
            let mut changed = run_pass(&mut functions, program, ctx)?;
            changed |= run_pass(&mut variables, program, ctx)?;
            debug!(round = rounds, changed, "elimination round");
            if !changed || self.config.elimination_mode == EliminationMode::SingleRound {
                break;
            }
        }
        Ok(rounds)
    }
}

fn run_pass(pass: &mut dyn CleanPass, program: &mut Program, ctx: &mut PassContext) -> Result<bool> {
    if !pass.is_enabled(ctx.config) {
        return Ok(false);
    }
    let changed = pass.run(program, ctx)?;
    debug!(pass = pass.name(), changed, "pass finished");
    Ok(changed)
}

/// Clean `program` with `config`
pub fn clean(program: Program, config: &CleanerConfig) -> Result<CleanResult> {
    Cleaner::new(config.clone()).clean(program)
}
