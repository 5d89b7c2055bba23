//! Pipeline orchestration (spec §6 "Pipeline & orchestration").
//!
//! Wires the phases together: `lex` → `parse` → `desugar` → `typecheck`.
//! Each stage is also exposed standalone so a caller (the CLI, a test,
//! or the excluded module resolver/code generator) can run only the
//! prefix it needs. Mirrors the teacher's `run.rs`/`prepare.rs` split
//! between "load and lex" and "run the pipeline stage by stage",
//! generalized from a single-file REPL driver to a staged, typed
//! compiler front end.

use crate::core_ast::CoreModule;
use crate::diagnostics::{Diagnostic, WarningCollector};
use crate::intern::Interner;
use crate::lexer::{self, Token};
use crate::parser;
use crate::syntax::Module;
use crate::typed_ast::TypedModule;
use crate::typeck::{self, GlobalEnv};

/// Maximum expression-recursion depth for one parse (spec §5's
/// concurrency/resource model, SPEC_FULL.md §5's `ResourceLimits`-style
/// guard). Mirrors the teacher's `MAX_NESTING_DEPTH` in `parse.rs`: a
/// lower bound in debug builds, where unoptimized stack frames are much
/// larger, to still catch the error before the OS stack actually
/// overflows.
#[cfg(not(debug_assertions))]
const DEFAULT_MAX_NESTING_DEPTH: usize = 200;
#[cfg(debug_assertions)]
const DEFAULT_MAX_NESTING_DEPTH: usize = 35;

/// Tuning knobs for one compilation run (spec §9's open question on the
/// parser's recoverable-error threshold: configurable, default 16,
/// rather than a hardcoded constant — see `DESIGN.md`).
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub max_parse_errors: usize,
    /// Maximum expression-recursion depth before the parser gives up with
    /// a fatal `VF2500` rather than overflowing the stack.
    pub max_nesting_depth: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { max_parse_errors: 16, max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH }
    }
}

/// Tokenizes `source` (C3).
pub fn lex(source: &str, filename: &str, interner: &mut Interner) -> Result<Vec<Token>, Diagnostic> {
    lexer::tokenize(source, filename, interner)
}

/// Parses a token stream into a Surface AST (C5). Recoverable syntax
/// errors accumulate in `errors` rather than aborting; a fatal failure
/// (including hitting `config.max_parse_errors`) returns `Err`.
pub fn parse(tokens: &[Token], interner: &Interner, errors: &mut Vec<Diagnostic>, config: PipelineConfig) -> Result<Module, Diagnostic> {
    parser::parse(tokens, interner, errors, config.max_parse_errors, config.max_nesting_depth)
}

/// Lowers a Surface AST into the minimal Core AST (C7).
pub fn desugar(module: Module, interner: &mut Interner) -> Result<CoreModule, Diagnostic> {
    crate::desugar::desugar(module, interner)
}

/// Runs Hindley-Milner inference (C9) over a Core AST, extending `env`
/// in place with every top-level binding/constructor/external the
/// module declares.
pub fn typecheck(module: CoreModule, env: &mut GlobalEnv, interner: &mut Interner, warnings: &mut WarningCollector) -> Result<TypedModule, Diagnostic> {
    typeck::typecheck(module, env, interner, warnings)
}

/// Runs the full `lex` → `parse` → `desugar` → `typecheck` pipeline over
/// one source file, starting from a fresh [`GlobalEnv`] seeded with the
/// builtins every module needs (spec §4.5's `&` string-concat lowering).
///
/// Recoverable parse errors are folded into the returned `Err` as the
/// first one encountered; a caller that wants every recoverable parse
/// diagnostic should call [`lex`]/[`parse`]/[`desugar`]/[`typecheck`]
/// directly instead.
pub fn compile(source: &str, filename: &str, config: PipelineConfig) -> Result<(TypedModule, Vec<Diagnostic>), Diagnostic> {
    let mut interner = Interner::new();
    let mut warnings = WarningCollector::new();
    let mut env = GlobalEnv::new().with_string_concat_builtin(&mut interner);

    let tokens = lex(source, filename, &mut interner)?;
    let mut parse_errors = Vec::new();
    let module = parse(&tokens, &interner, &mut parse_errors, config)?;
    if let Some(first) = parse_errors.into_iter().find(Diagnostic::is_error) {
        return Err(first);
    }
    let core_module = desugar(module, &mut interner)?;
    let typed_module = typecheck(core_module, &mut env, &mut interner, &mut warnings)?;
    Ok((typed_module, warnings.drain()))
}

/// Contract for the excluded module resolver (spec §6 Non-goals): given
/// an import path, returns the already-typechecked [`GlobalEnv`] worth
/// of exports it provides. A real resolver reads and compiles the
/// imported file; this crate only defines the seam.
pub trait ModuleResolver {
    fn resolve(&mut self, import_path: &str) -> Result<GlobalEnv, Diagnostic>;
}

/// Contract for the excluded JS code generator (spec §6 Non-goals): given
/// a fully-typechecked module, emits its target representation.
pub trait CodeGenerator {
    type Output;
    fn generate(&mut self, module: &TypedModule) -> Self::Output;
}
