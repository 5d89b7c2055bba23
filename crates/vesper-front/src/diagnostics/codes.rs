//! The diagnostic code registry: the catalog of every `VFxxxx` code the
//! front end may raise or warn with (spec §6), plus its message template,
//! optional hint/explanation/example.
//!
//! Registration is data, not code (spec §9 "Diagnostic registry as data,
//! not code"): this module defines one `LazyLock` table, built once per
//! process, following the same static-table convention the teacher uses
//! for `ASCII_STRS` in `intern.rs`.

use std::{collections::HashMap, sync::LazyLock};

use strum::{Display, EnumString, IntoStaticStr};

use super::{Category, Phase, Severity};

/// One entry in the registry: everything needed to render a [`Diagnostic`](super::Diagnostic)
/// for a given code, short of the template variables supplied at the call site.
pub struct DiagnosticDef {
    pub severity: Severity,
    pub phase: Phase,
    pub category: Category,
    /// `{name}`-style template. No control flow, no expressions — see spec §9.
    pub template: &'static str,
    pub hint: Option<&'static str>,
    pub explanation: Option<&'static str>,
    pub example: Option<&'static str>,
    pub related: &'static [DiagnosticCode],
}

/// Every diagnostic code the front end is able to raise or warn with.
///
/// The `strum(serialize = "...")` attribute on each variant is the code's
/// canonical textual form (e.g. `VF1500`), following the same
/// `Display`/`EnumString`/`IntoStaticStr` derive stack the teacher uses on
/// `ExcType` in `exception_private.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[allow(non_camel_case_types, reason = "diagnostic codes read better as their literal VFxxxx spelling")]
pub enum DiagnosticCode {
    // ---- Lexer: string/escape errors (VF1001-VF1012) ----
    #[strum(serialize = "VF1001")]
    VF1001,
    #[strum(serialize = "VF1002")]
    VF1002,
    #[strum(serialize = "VF1010")]
    VF1010,
    #[strum(serialize = "VF1011")]
    VF1011,
    #[strum(serialize = "VF1012")]
    VF1012,
    // ---- Lexer: number-literal errors (VF1100-VF1104) ----
    #[strum(serialize = "VF1100")]
    VF1100,
    #[strum(serialize = "VF1101")]
    VF1101,
    #[strum(serialize = "VF1102")]
    VF1102,
    #[strum(serialize = "VF1104")]
    VF1104,
    // ---- Lexer: misc ----
    #[strum(serialize = "VF1300")]
    VF1300,
    #[strum(serialize = "VF1400")]
    VF1400,
    #[strum(serialize = "VF1500")]
    VF1500,

    // ---- Parser: declarations (VF2000-VF2007) ----
    #[strum(serialize = "VF2000")]
    VF2000,
    #[strum(serialize = "VF2001")]
    VF2001,
    #[strum(serialize = "VF2002")]
    VF2002,
    #[strum(serialize = "VF2003")]
    VF2003,
    #[strum(serialize = "VF2004")]
    VF2004,
    #[strum(serialize = "VF2005")]
    VF2005,
    #[strum(serialize = "VF2006")]
    VF2006,
    #[strum(serialize = "VF2007")]
    VF2007,
    // ---- Parser: expressions (VF2100-VF2113) ----
    #[strum(serialize = "VF2100")]
    VF2100,
    #[strum(serialize = "VF2101")]
    VF2101,
    #[strum(serialize = "VF2102")]
    VF2102,
    #[strum(serialize = "VF2105")]
    VF2105,
    #[strum(serialize = "VF2106")]
    VF2106,
    #[strum(serialize = "VF2107")]
    VF2107,
    #[strum(serialize = "VF2108")]
    VF2108,
    #[strum(serialize = "VF2109")]
    VF2109,
    #[strum(serialize = "VF2110")]
    VF2110,
    #[strum(serialize = "VF2111")]
    VF2111,
    #[strum(serialize = "VF2112")]
    VF2112,
    #[strum(serialize = "VF2113")]
    VF2113,
    // ---- Parser: patterns (VF2200-VF2202) ----
    #[strum(serialize = "VF2200")]
    VF2200,
    #[strum(serialize = "VF2201")]
    VF2201,
    #[strum(serialize = "VF2202")]
    VF2202,
    // ---- Parser: type expressions (VF2300-VF2304) ----
    #[strum(serialize = "VF2300")]
    VF2300,
    #[strum(serialize = "VF2301")]
    VF2301,
    #[strum(serialize = "VF2302")]
    VF2302,
    #[strum(serialize = "VF2303")]
    VF2303,
    #[strum(serialize = "VF2304")]
    VF2304,
    // ---- Parser: imports/exports (VF2400-VF2404) ----
    #[strum(serialize = "VF2400")]
    VF2400,
    #[strum(serialize = "VF2401")]
    VF2401,
    #[strum(serialize = "VF2402")]
    VF2402,
    #[strum(serialize = "VF2403")]
    VF2403,
    #[strum(serialize = "VF2404")]
    VF2404,
    // ---- Parser: general syntax (VF2500-VF2501) ----
    #[strum(serialize = "VF2500")]
    VF2500,
    #[strum(serialize = "VF2501")]
    VF2501,

    // ---- Desugarer ----
    #[strum(serialize = "VF3101")]
    VF3101,

    // ---- Typechecker: mismatch (VF4001-VF4017) ----
    #[strum(serialize = "VF4001")]
    VF4001,
    #[strum(serialize = "VF4002")]
    VF4002,
    #[strum(serialize = "VF4003")]
    VF4003,
    #[strum(serialize = "VF4004")]
    VF4004,
    #[strum(serialize = "VF4009")]
    VF4009,
    #[strum(serialize = "VF4011")]
    VF4011,
    #[strum(serialize = "VF4013")]
    VF4013,
    #[strum(serialize = "VF4015")]
    VF4015,
    #[strum(serialize = "VF4016")]
    VF4016,
    #[strum(serialize = "VF4017")]
    VF4017,
    // ---- Typechecker: unification (VF4020-VF4026) ----
    #[strum(serialize = "VF4020")]
    VF4020,
    #[strum(serialize = "VF4021")]
    VF4021,
    #[strum(serialize = "VF4022")]
    VF4022,
    #[strum(serialize = "VF4026")]
    VF4026,
    // ---- Typechecker: undefined refs (VF4100-VF4103) ----
    #[strum(serialize = "VF4100")]
    VF4100,
    #[strum(serialize = "VF4102")]
    VF4102,
    #[strum(serialize = "VF4103")]
    VF4103,
    // ---- Typechecker: arity (VF4200-VF4205) ----
    #[strum(serialize = "VF4200")]
    VF4200,
    #[strum(serialize = "VF4201")]
    VF4201,
    #[strum(serialize = "VF4202")]
    VF4202,
    #[strum(serialize = "VF4204")]
    VF4204,
    #[strum(serialize = "VF4205")]
    VF4205,
    // ---- Typechecker: infinite/recursive alias (VF4300-VF4301) ----
    #[strum(serialize = "VF4300")]
    VF4300,
    #[strum(serialize = "VF4301")]
    VF4301,
    // ---- Typechecker: pattern matching (VF4400-VF4404) ----
    #[strum(serialize = "VF4400")]
    VF4400,
    #[strum(serialize = "VF4402")]
    VF4402,
    #[strum(serialize = "VF4403")]
    VF4403,
    #[strum(serialize = "VF4404")]
    VF4404,
    // ---- Typechecker: records (VF4500-VF4502) ----
    #[strum(serialize = "VF4500")]
    VF4500,
    #[strum(serialize = "VF4501")]
    VF4501,
    #[strum(serialize = "VF4502")]
    VF4502,
    // ---- Typechecker: variants (VF4600-VF4602) ----
    #[strum(serialize = "VF4600")]
    VF4600,
    #[strum(serialize = "VF4601")]
    VF4601,
    #[strum(serialize = "VF4602")]
    VF4602,
    // ---- Typechecker: polymorphism (VF4700-VF4701) ----
    #[strum(serialize = "VF4700")]
    VF4700,
    #[strum(serialize = "VF4701")]
    VF4701,
    // ---- Typechecker: FFI (VF4800-VF4804) ----
    #[strum(serialize = "VF4800")]
    VF4800,
    #[strum(serialize = "VF4801")]
    VF4801,
    #[strum(serialize = "VF4802")]
    VF4802,
    #[strum(serialize = "VF4803")]
    VF4803,
    #[strum(serialize = "VF4804")]
    VF4804,
    // ---- Typechecker: warnings ----
    #[strum(serialize = "VF4900")]
    VF4900,

    // ---- Modules: import/export, duplicate decl (VF5000-VF5102) ----
    #[strum(serialize = "VF5000")]
    VF5000,
    #[strum(serialize = "VF5001")]
    VF5001,
    #[strum(serialize = "VF5002")]
    VF5002,
    #[strum(serialize = "VF5003")]
    VF5003,
    #[strum(serialize = "VF5004")]
    VF5004,
    #[strum(serialize = "VF5005")]
    VF5005,
    #[strum(serialize = "VF5102")]
    VF5102,
    // ---- Modules: cycle, case mismatch (warn) ----
    #[strum(serialize = "VF5900")]
    VF5900,
    #[strum(serialize = "VF5901")]
    VF5901,
}

use DiagnosticCode::*;

macro_rules! def {
    ($severity:expr, $phase:expr, $category:expr, $template:expr) => {
        DiagnosticDef {
            severity: $severity,
            phase: $phase,
            category: $category,
            template: $template,
            hint: None,
            explanation: None,
            example: None,
            related: &[],
        }
    };
    ($severity:expr, $phase:expr, $category:expr, $template:expr, hint: $hint:expr) => {
        DiagnosticDef {
            severity: $severity,
            phase: $phase,
            category: $category,
            template: $template,
            hint: Some($hint),
            explanation: None,
            example: None,
            related: &[],
        }
    };
}

/// Builds the static registry. Called once, from [`super::registry`].
pub(super) fn build_registry() -> HashMap<DiagnosticCode, DiagnosticDef> {
    use Category::{Declarations, Escapes, Expressions, Imports, Numbers, Patterns, TypeExpressions};
    use Phase::{Desugarer, Lexer, Modules, Parser, Typechecker};
    use Severity::{Error, Warning};

    HashMap::from([
        (VF1001, def!(Error, Lexer, Escapes, "single-line string literal cannot contain a raw newline", hint: "close the string before the end of the line, or use a triple-quoted string \"\"\"…\"\"\" to span multiple lines")),
        (VF1002, def!(Error, Lexer, Escapes, "unterminated string literal")),
        (VF1010, def!(Error, Lexer, Escapes, "invalid escape sequence '\\{escape}' in string literal")),
        (VF1011, def!(Error, Lexer, Escapes, "invalid \\x escape: expected exactly two hex digits")),
        (VF1012, def!(Error, Lexer, Escapes, "invalid unicode escape '\\u{body}'")),
        (VF1100, def!(Error, Lexer, Numbers, "underscore digit separators must sit strictly between two digits")),
        (VF1101, def!(Error, Lexer, Numbers, "binary literal requires at least one binary digit after '0b'")),
        (VF1102, def!(Error, Lexer, Numbers, "hexadecimal literal requires at least one hex digit after '0x'")),
        (VF1104, def!(Error, Lexer, Numbers, "exponent requires at least one digit")),
        (VF1300, def!(Error, Lexer, Numbers, "unterminated block comment")),
        (VF1400, def!(Error, Lexer, Numbers, "unexpected character '{char}'")),
        (VF1500, def!(Error, Lexer, Numbers, "'{name}' is reserved for future use and cannot be used as an identifier")),

        (VF2000, def!(Error, Parser, Declarations, "expected a declaration ('let', 'type', 'external', 'import', or 'export')")),
        (VF2001, def!(Error, Parser, Declarations, "malformed 'let' declaration: expected '=' after the binding pattern")),
        (VF2002, def!(Error, Parser, Declarations, "malformed 'type' declaration")),
        (VF2003, def!(Error, Parser, Declarations, "mutable bindings must be initialized with 'ref(...)'", hint: "write 'let mut {name} = ref(expr)'")),
        (VF2004, def!(Error, Parser, Declarations, "mutable bindings must bind a simple variable, not a destructuring pattern")),
        (VF2005, def!(Error, Parser, Declarations, "'and' can only continue a preceding 'let rec'")),
        (VF2006, def!(Error, Parser, Declarations, "variant constructor '{name}' must be PascalCase")),
        (VF2007, def!(Error, Parser, Declarations, "malformed 'external' declaration: expected ': <type> = \"<js_name>\"'")),

        (VF2100, def!(Error, Parser, Expressions, "expected an expression")),
        (VF2101, def!(Error, Parser, Expressions, "unclosed '(': expected ')'")),
        (VF2102, def!(Error, Parser, Expressions, "unclosed '[': expected ']'")),
        (VF2105, def!(Error, Parser, Expressions, "expected 'then' after 'if' condition")),
        (VF2106, def!(Error, Parser, Expressions, "expected '=>' to introduce the lambda body")),
        (VF2107, def!(Error, Parser, Expressions, "expected '{{' after match scrutinee")),
        (VF2108, def!(Error, Parser, Expressions, "'...' must be followed by an expression")),
        (VF2109, def!(Error, Parser, Expressions, "expected '=>' after match pattern (or its guard)")),
        (VF2110, def!(Error, Parser, Expressions, "unclosed match: expected '}}'")),
        (VF2111, def!(Error, Parser, Expressions, "record fields must be separated by ','")),
        (VF2112, def!(Error, Parser, Expressions, "ambiguous unary/binary '-': wrap the unary use in parentheses")),
        (VF2113, def!(Error, Parser, Expressions, "unclosed '{{': expected '}}'")),

        (VF2200, def!(Error, Parser, Patterns, "expected a pattern")),
        (VF2201, def!(Error, Parser, Patterns, "expected a pattern after '|' in an or-pattern")),
        (VF2202, def!(Error, Parser, Patterns, "unclosed pattern grouping")),

        (VF2300, def!(Error, Parser, TypeExpressions, "expected a type expression")),
        (VF2301, def!(Error, Parser, TypeExpressions, "unclosed type argument list: expected '>'")),
        (VF2302, def!(Error, Parser, TypeExpressions, "expected '->' in function type")),
        (VF2303, def!(Error, Parser, TypeExpressions, "unclosed record type: expected '}}'")),
        (VF2304, def!(Error, Parser, TypeExpressions, "unclosed tuple type: expected ')'")),

        (VF2400, def!(Error, Parser, Imports, "malformed 'import' declaration")),
        (VF2401, def!(Error, Parser, Imports, "malformed 'export' declaration")),
        (VF2402, def!(Error, Parser, Imports, "expected a name list inside '{{' '}}'")),
        (VF2403, def!(Error, Parser, Imports, "expected '*' or '{{' after 'import'")),
        (VF2404, def!(Error, Parser, Imports, "expected a string path after 'from'")),

        (VF2500, def!(Error, Parser, Declarations, "{reason}; stopping")),
        (VF2501, def!(Error, Parser, Declarations, "'{name}' is not yet supported by this parser")),

        (VF3101, def!(Error, Desugarer, Declarations, "list pattern lowering produced a structurally invalid index")),

        (VF4001, def!(Error, Typechecker, Declarations, "expected type '{expected}', found '{found}'")),
        (VF4002, def!(Error, Typechecker, Declarations, "argument has type '{found}', expected '{expected}'")),
        (VF4003, def!(Error, Typechecker, Declarations, "function body has type '{found}', but the return annotation says '{expected}'")),
        (VF4004, def!(Error, Typechecker, Declarations, "match arm has type '{found}', but a previous arm had type '{expected}'")),
        (VF4009, def!(Error, Typechecker, Declarations, "cannot mix 'Int' and 'Float' without an explicit conversion")),
        (VF4011, def!(Error, Typechecker, Declarations, "match guard must have type 'Bool', found '{found}'")),
        (VF4013, def!(Error, Typechecker, Declarations, "value of type '{found}' is not a function and cannot be applied")),
        (VF4015, def!(Error, Typechecker, Declarations, "'!' can only be applied to a 'Ref<_>', found '{found}'")),
        (VF4016, def!(Error, Typechecker, Declarations, "cannot assign a value of type '{found}' into a 'Ref<{expected}>'")),
        (VF4017, def!(Error, Typechecker, Declarations, "'Ref' inner types do not match: '{expected}' vs '{found}'")),
        (VF4020, def!(Error, Typechecker, Declarations, "type '{expected}' is not the same as '{found}'")),
        (VF4021, def!(Error, Typechecker, Declarations, "function types disagree on arity: {expected} parameter(s) vs {found}")),
        (VF4022, def!(Error, Typechecker, Declarations, "'{name}' applied to {expected} type argument(s), found {found}")),
        (VF4026, def!(Error, Typechecker, Declarations, "tuples of different arity cannot unify: {expected} vs {found}")),
        (VF4100, def!(Error, Typechecker, Declarations, "undefined name '{name}'")),
        (VF4102, def!(Error, Typechecker, Declarations, "undefined constructor '{name}'")),
        (VF4103, def!(Error, Typechecker, Declarations, "value has no field named '{name}'")),
        (VF4200, def!(Error, Typechecker, Declarations, "constructor '{name}' expects {expected} argument(s), found {found}")),
        (VF4201, def!(Error, Typechecker, Declarations, "no overload of external '{name}' accepts these argument types")),
        (VF4202, def!(Error, Typechecker, Declarations, "function expects {expected} argument(s), found {found}")),
        (VF4204, def!(Error, Typechecker, Declarations, "'{name}' expects {expected} type argument(s), found {found}")),
        (VF4205, def!(Error, Typechecker, Declarations, "call to overloaded external '{name}' is ambiguous between {found} overloads")),
        (VF4300, def!(Error, Typechecker, Declarations, "infinite type: '{name}' occurs in the type being unified with it")),
        (VF4301, def!(Error, Typechecker, Declarations, "recursive type alias '{name}' is not allowed; use a variant type instead")),
        (VF4400, def!(Error, Typechecker, Patterns, "match is not exhaustive; missing: {missing}")),
        (VF4402, def!(Error, Typechecker, Patterns, "'{name}' is bound more than once in this pattern")),
        (VF4403, def!(Error, Typechecker, Patterns, "alternatives of an or-pattern must bind the same names")),
        (VF4404, def!(Error, Typechecker, Patterns, "pattern cannot match a value of type '{expected}'")),
        (VF4500, def!(Error, Typechecker, Declarations, "field '{name}' has type '{expected}' in one record and '{found}' in the other")),
        (VF4501, def!(Error, Typechecker, Declarations, "record has no field named '{name}'")),
        (VF4502, def!(Error, Typechecker, Declarations, "field '{name}' is given more than once in this record literal")),
        (VF4600, def!(Error, Typechecker, Declarations, "undefined constructor '{name}' in pattern")),
        (VF4601, def!(Error, Typechecker, Declarations, "constructor '{name}' argument has type '{found}', expected '{expected}'")),
        (VF4602, def!(Error, Typechecker, Declarations, "constructor '{name}' expects {expected} argument(s) in this pattern, found {found}")),
        (VF4700, def!(Error, Typechecker, Declarations, "'{name}' cannot be generalized: only syntactic values (variables, lambdas, literals, constructor applications) are polymorphic")),
        (VF4701, def!(Error, Typechecker, Declarations, "'{name}' was monomorphized by the value restriction and cannot also be used at type '{found}' here")),
        (VF4800, def!(Error, Typechecker, Declarations, "'{name}' is already declared and is not an 'external'")),
        (VF4801, def!(Error, Typechecker, Declarations, "overloads of external '{name}' must share the same JS name")),
        (VF4802, def!(Error, Typechecker, Declarations, "overloads of external '{name}' must share the same import path")),
        (VF4803, def!(Error, Typechecker, Declarations, "overloaded external '{name}' must have a function type")),
        (VF4804, def!(Error, Typechecker, Declarations, "overloaded external '{name}' cannot be used as a value; it must be applied directly")),
        (VF4900, def!(Warning, Typechecker, Patterns, "this pattern is unreachable; a previous pattern already covers it")),

        (VF5000, def!(Error, Modules, Imports, "cannot resolve import '{name}'")),
        (VF5001, def!(Error, Modules, Imports, "module '{name}' does not export '{field}'")),
        (VF5002, def!(Error, Modules, Imports, "'{name}' is imported more than once")),
        (VF5003, def!(Error, Modules, Imports, "import of '{name}' is shadowed by a local declaration")),
        (VF5004, def!(Error, Modules, Imports, "a module cannot import itself")),
        (VF5005, def!(Error, Modules, Imports, "entry point '{name}' was not found")),
        (VF5102, def!(Error, Modules, Declarations, "'{name}' is already declared in this scope")),
        (VF5900, def!(Warning, Modules, Imports, "import cycle detected: {name}")),
        (VF5901, def!(Warning, Modules, Imports, "import path '{name}' differs from the file's case on disk")),
    ])
}

pub(super) static REGISTRY: LazyLock<HashMap<DiagnosticCode, DiagnosticDef>> = LazyLock::new(build_registry);
