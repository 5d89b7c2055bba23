//! `vesper_front`: the front end of a compiler for a small ML-flavored,
//! statically-typed functional language that targets JavaScript.
//!
//! Pipeline: [`lexer`] (C3) → [`parser`] (C5, building [`syntax`]'s
//! Surface AST) → [`desugar`] (C7, lowering to [`core_ast`]'s Core AST)
//! → [`typeck`] (C9, Hindley-Milner inference producing [`typed_ast`]'s
//! Typed Core AST). [`diagnostics`] is the unified code/message registry
//! every phase reports through; [`source`] is the shared span/location
//! model; [`pipeline`] wires the stages together.
//!
//! Excluded by design (spec Non-goals): JS code generation, the module
//! resolver, a CLI/bundler, a runtime evaluator, incremental
//! recompilation/LSP support, macros/effects, and type-class resolution.
//! [`pipeline::ModuleResolver`]/[`pipeline::CodeGenerator`] define the
//! seams a consumer would implement those behind.

pub mod core_ast;
pub mod desugar;
pub mod diagnostics;
pub mod intern;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod source;
pub mod syntax;
pub mod typeck;
pub mod typed_ast;
pub mod types;

pub use diagnostics::{Category, Diagnostic, DiagnosticCode, Phase, Severity, WarningCollector};
pub use intern::{Interner, StringId};
pub use lexer::{Token, TokenKind};
pub use pipeline::{CodeGenerator, ModuleResolver, PipelineConfig, compile, desugar as desugar_module, lex, parse as parse_tokens, typecheck};
pub use source::{Cursor, Location, Span};
pub use typeck::GlobalEnv;
pub use typed_ast::{TypedDecl, TypedExpr, TypedExprKind, TypedModule};
pub use types::{Scheme, Type, TypeArena, TypeVarId};
