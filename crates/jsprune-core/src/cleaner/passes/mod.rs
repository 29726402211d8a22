mod constant_folding;
mod pruning;
mod reachability;
mod unused_declarations;

pub use constant_folding::ConstantFoldingPass;
pub use pruning::prune_statements;
pub use reachability::{
    find_unreachable, if_terminates, is_terminator, ReachabilityPass, ReachabilityReport,
    UnreachableStatement,
};
pub use unused_declarations::{unused_parameters, FunctionEliminationPass, VariableEliminationPass};
