// crates/atlas-core/src/model.rs
// ============================================================================
// Module: Atlas Class Model
// Description: Fully resolved semantic description of one strong type.
// Purpose: Hold every decision the template units need to emit a wrapper.
// Dependencies: none
// ============================================================================

//! ## Overview
//! [`ClassInfo`] is the flat record produced by the classifier and consumed
//! by the template orchestrator. It is built once and treated as immutable.
//! Operator families are closed enums whose declaration order is the
//! canonical emission order, so sorted sets iterate deterministically.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// SECTION: Language Level
// ============================================================================

/// C++ standard level targeted by a generated header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CppStandard {
    /// C++11 (the floor; no static assertion is emitted).
    #[default]
    Cpp11,
    /// C++14.
    Cpp14,
    /// C++17.
    Cpp17,
    /// C++20.
    Cpp20,
    /// C++23.
    Cpp23,
}

impl CppStandard {
    /// Maps a two-digit year to a standard level.
    #[must_use]
    pub const fn from_year(year: u16) -> Option<Self> {
        match year {
            11 => Some(Self::Cpp11),
            14 => Some(Self::Cpp14),
            17 => Some(Self::Cpp17),
            20 => Some(Self::Cpp20),
            23 => Some(Self::Cpp23),
            _ => None,
        }
    }

    /// Parses `17`, `c++17` or `C++17`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let digits = match text.get(..3) {
            Some(prefix) if prefix.eq_ignore_ascii_case("c++") => &text[3..],
            _ => text,
        };
        digits.parse::<u16>().ok().and_then(Self::from_year)
    }

    /// Returns the two-digit year.
    #[must_use]
    pub const fn year(self) -> u16 {
        match self {
            Self::Cpp11 => 11,
            Self::Cpp14 => 14,
            Self::Cpp17 => 17,
            Self::Cpp20 => 20,
            Self::Cpp23 => 23,
        }
    }

    /// Returns the `__cplusplus` value a header must assert, if any.
    #[must_use]
    pub const fn required_cplusplus(self) -> Option<u32> {
        match self {
            Self::Cpp11 => None,
            Self::Cpp14 => Some(201_402),
            Self::Cpp17 => Some(201_703),
            Self::Cpp20 => Some(202_002),
            Self::Cpp23 => Some(202_302),
        }
    }
}

impl fmt::Display for CppStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C++{}", self.year())
    }
}

// ============================================================================
// SECTION: Identity
// ============================================================================

/// Class-key used for the wrapper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `struct`: the value member is public.
    #[default]
    Struct,
    /// `class`: the value member is private.
    Class,
}

impl TypeKind {
    /// Parses `struct` or `class`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "struct" => Some(Self::Struct),
            "class" => Some(Self::Class),
            _ => None,
        }
    }

    /// Returns the C++ class-key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Class => "class",
        }
    }
}

// ============================================================================
// SECTION: Operators
// ============================================================================

/// Arithmetic mode applied to arithmetic binary operators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArithmeticMode {
    /// Plain built-in arithmetic on the underlying value.
    #[default]
    Default,
    /// Overflow, underflow, and division by zero throw.
    Checked,
    /// Results clamp to the representable range.
    Saturating,
    /// Results wrap modulo 2^N.
    Wrapping,
}

impl ArithmeticMode {
    /// Returns the token spelling (`default` for the plain mode).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Checked => "checked",
            Self::Saturating => "saturating",
            Self::Wrapping => "wrapping",
        }
    }
}

/// Arithmetic and bitwise binary operators, in canonical emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
}

impl BinaryOperator {
    /// All operators in canonical order.
    pub const ALL: [Self; 10] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Rem,
        Self::BitAnd,
        Self::BitOr,
        Self::BitXor,
        Self::Shl,
        Self::Shr,
    ];

    /// Maps a symbol to its operator.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Returns the operator symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
        }
    }

    /// Returns the compound-assignment symbol (`+=` for `+`).
    #[must_use]
    pub const fn compound_symbol(self) -> &'static str {
        match self {
            Self::Add => "+=",
            Self::Sub => "-=",
            Self::Mul => "*=",
            Self::Div => "/=",
            Self::Rem => "%=",
            Self::BitAnd => "&=",
            Self::BitOr => "|=",
            Self::BitXor => "^=",
            Self::Shl => "<<=",
            Self::Shr => ">>=",
        }
    }

    /// Returns a stable identifier fragment (`addition` for `+`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "addition",
            Self::Sub => "subtraction",
            Self::Mul => "multiplication",
            Self::Div => "division",
            Self::Rem => "modulo",
            Self::BitAnd => "bitwise_and",
            Self::BitOr => "bitwise_or",
            Self::BitXor => "bitwise_xor",
            Self::Shl => "shift_left",
            Self::Shr => "shift_right",
        }
    }

    /// Returns the suffix of the `atlas_detail` arithmetic helpers (`add`).
    #[must_use]
    pub const fn helper_suffix(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Rem => "rem",
            Self::BitAnd => "bit_and",
            Self::BitOr => "bit_or",
            Self::BitXor => "bit_xor",
            Self::Shl => "shl",
            Self::Shr => "shr",
        }
    }

    /// True for `&`, `|`, `^`, `<<` and `>>`, which ignore arithmetic modes.
    #[must_use]
    pub const fn is_bitwise(self) -> bool {
        matches!(self, Self::BitAnd | Self::BitOr | Self::BitXor | Self::Shl | Self::Shr)
    }

    /// Returns the mode actually emitted for this operator under `mode`.
    ///
    /// Bitwise operators always use the default mode, and wrapping division
    /// and modulo fall back to the default mode because they cannot overflow
    /// in a way wrapping would repair.
    #[must_use]
    pub const fn effective_mode(self, mode: ArithmeticMode) -> ArithmeticMode {
        if self.is_bitwise() {
            return ArithmeticMode::Default;
        }
        match (self, mode) {
            (Self::Div | Self::Rem, ArithmeticMode::Wrapping) => ArithmeticMode::Default,
            _ => mode,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Relational operators, in canonical emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationalOperator {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl RelationalOperator {
    /// All operators in canonical order.
    pub const ALL: [Self; 6] = [Self::Eq, Self::Ne, Self::Lt, Self::Le, Self::Gt, Self::Ge];

    /// Maps a symbol to its operator.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Returns the operator symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// True for `==` and `!=`.
    #[must_use]
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }
}

/// Unary operators, in canonical emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnaryOperator {
    /// Unary `+`.
    Plus,
    /// Unary `-`.
    Minus,
    /// Bitwise complement `~`.
    Complement,
}

impl UnaryOperator {
    /// Returns the operator symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Complement => "~",
        }
    }
}

/// Increment and decrement operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IncrementOperator {
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

impl IncrementOperator {
    /// Returns the operator symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Increment => "++",
            Self::Decrement => "--",
        }
    }
}

/// Overloaded logical binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogicalOperator {
    /// `&&`
    And,
    /// `||`
    Or,
}

impl LogicalOperator {
    /// Returns the operator symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

// ============================================================================
// SECTION: Constraints
// ============================================================================

/// Value constraint enforced by the wrapper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// No constraint.
    #[default]
    None,
    /// `value > 0`.
    Positive,
    /// `value >= 0`.
    NonNegative,
    /// `value != 0`.
    NonZero,
    /// `!value.empty()`.
    NonEmpty,
    /// `value != nullptr`.
    NonNull,
    /// `MIN <= value && value <= MAX`.
    Bounded,
    /// `MIN <= value && value < MAX`.
    BoundedRange,
}

impl ConstraintKind {
    /// Returns the token spelling and the `atlas::constraints` type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Positive => "positive",
            Self::NonNegative => "non_negative",
            Self::NonZero => "non_zero",
            Self::NonEmpty => "non_empty",
            Self::NonNull => "non_null",
            Self::Bounded => "bounded",
            Self::BoundedRange => "bounded_range",
        }
    }

    /// True when a default-constructed value can never satisfy the constraint.
    #[must_use]
    pub const fn forbids_default(self) -> bool {
        matches!(self, Self::NonEmpty | Self::NonNull)
    }

    /// True for the two interval constraints.
    #[must_use]
    pub const fn is_bounded(self) -> bool {
        matches!(self, Self::Bounded | Self::BoundedRange)
    }
}

/// Inclusive lower and upper (or exclusive upper) bound literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounds {
    /// Lower bound literal text.
    pub min: String,
    /// Upper bound literal text.
    pub max: String,
}

/// Resolved constraint of a wrapper.
///
/// # Invariants
/// - `bounds` is `Some` exactly when `kind.is_bounded()`.
/// - `message` is empty exactly when `kind` is [`ConstraintKind::None`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraint {
    /// Constraint kind.
    pub kind: ConstraintKind,
    /// Interval bounds for bounded kinds.
    pub bounds: Option<Bounds>,
    /// Diagnostic thrown when the constraint is violated.
    pub message: String,
}

impl Constraint {
    /// True when any constraint is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.kind != ConstraintKind::None
    }
}

// ============================================================================
// SECTION: Forwarded Member Functions
// ============================================================================

/// Which overloads a forwarded member function is generated with.
///
/// # Invariants
/// - When `deducing_this` is set no other flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(
    clippy::struct_excessive_bools,
    reason = "Each flag selects one independent overload."
)]
pub struct RefQualifiers {
    /// `... const` without a ref-qualifier.
    pub const_no_ref: bool,
    /// `... const &`.
    pub const_lvalue: bool,
    /// `... const &&`.
    pub const_rvalue: bool,
    /// `... &`.
    pub nonconst_lvalue: bool,
    /// `... &&`.
    pub nonconst_rvalue: bool,
    /// A single C++23 explicit-object (`this auto && self`) overload.
    pub deducing_this: bool,
}

/// Member function of the underlying type re-exposed on the wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedMemfn {
    /// Member function name on the underlying type.
    pub name: String,
    /// Name exposed on the wrapper when different.
    pub alias: Option<String>,
    /// Type the forwarded result is wrapped into.
    pub return_type: Option<String>,
    /// True when only const overloads are generated.
    pub const_only: bool,
    /// Overloads to generate.
    pub qualifiers: RefQualifiers,
}

impl ForwardedMemfn {
    /// Returns the name exposed on the wrapper.
    #[must_use]
    pub fn exposed_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

// ============================================================================
// SECTION: Class Info
// ============================================================================

/// Semantic model of one wrapper type.
///
/// # Invariants
/// - Exactly one arithmetic mode.
/// - `NonEmpty` and `NonNull` constraints imply `delete_default_constructor`.
/// - `spaceship` never coexists with ordering operators in `relational`;
///   equality requested together with `<=>` becomes `defaulted_equality`.
/// - Sets iterate in canonical operator order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(
    clippy::struct_excessive_bools,
    reason = "The model is a flat record of independent feature switches."
)]
pub struct ClassInfo {
    /// Class-key.
    pub kind: TypeKind,
    /// Enclosing namespace (`""` for the global namespace).
    pub namespace: String,
    /// Unqualified class name.
    pub class_name: String,
    /// `namespace::class_name`, or `class_name` in the global namespace.
    pub full_qualified_name: String,
    /// Wrapped type text.
    pub underlying_type: String,
    /// Name of the data member holding the wrapped value.
    pub value_member: String,
    /// Normalized description text the model was built from.
    pub description: String,

    /// Arithmetic and bitwise binary operators.
    pub arithmetic_binary: BTreeSet<BinaryOperator>,
    /// Unary operators.
    pub unary: BTreeSet<UnaryOperator>,
    /// Explicitly rendered relational operators.
    pub relational: BTreeSet<RelationalOperator>,
    /// Increment and decrement operators.
    pub increment: BTreeSet<IncrementOperator>,
    /// Overloaded logical operators.
    pub logical: BTreeSet<LogicalOperator>,
    /// Explicit conversion targets, sorted.
    pub explicit_casts: BTreeSet<String>,
    /// Implicit conversion targets, sorted.
    pub implicit_casts: BTreeSet<String>,

    /// Defaulted `operator<=>`.
    pub spaceship: bool,
    /// Defaulted `operator==`.
    pub defaulted_equality: bool,
    /// `operator->`.
    pub arrow: bool,
    /// Unary `operator*` (indirection).
    pub indirection: bool,
    /// Unary `operator&` returning the address of the value.
    pub address_of: bool,
    /// Explicit `operator bool`.
    pub bool_conversion: bool,
    /// `operator()()` returning the value.
    pub nullary_call: bool,
    /// `operator()(F&&)` invoking a callable on the value.
    pub callable: bool,
    /// `operator[]`.
    pub subscript: bool,
    /// `operator<<(std::ostream&, ...)`.
    pub ostream: bool,
    /// `operator>>(std::istream&, ...)`.
    pub istream: bool,
    /// `operator!`.
    pub logical_not: bool,
    /// `std::hash` specialization.
    pub hash_specialization: bool,
    /// `std::formatter` specialization.
    pub formatter_specialization: bool,
    /// `begin`/`end` forwarding.
    pub iterator_support: bool,
    /// Constrained template `operator=`.
    pub template_assignment: bool,

    /// Arithmetic mode for arithmetic binary operators.
    pub arithmetic_mode: ArithmeticMode,
    /// Named constants of the wrapper type, keyed by name.
    pub constants: BTreeMap<String, String>,
    /// Forwarded member functions in declaration order.
    pub forwards: Vec<ForwardedMemfn>,
    /// Custom and auto-derived includes (`<h>` or `"h"`).
    pub includes: BTreeSet<String>,
    /// Feature-test conditions guarding specific includes.
    pub include_guards: BTreeMap<String, String>,
    /// Literal used by the default constructor.
    pub default_value: Option<String>,
    /// True when the default constructor is deleted.
    pub delete_default_constructor: bool,
    /// Value constraint.
    pub constraint: Constraint,
    /// Effective C++ standard.
    pub cpp_standard: CppStandard,
    /// `constexpr ` (with trailing space) or empty for ordinary members.
    pub constexpr_qualifier: &'static str,
    /// `constexpr ` (with trailing space) or empty for the hash specialization.
    pub hash_constexpr_qualifier: &'static str,
}

impl ClassInfo {
    /// Creates an empty model for `class_name` wrapping `underlying_type`.
    ///
    /// Used by the classifier as the starting point before tokens apply.
    #[must_use]
    pub fn new(
        kind: TypeKind,
        namespace: &str,
        class_name: &str,
        underlying_type: &str,
        cpp_standard: CppStandard,
    ) -> Self {
        let full_qualified_name = if namespace.is_empty() {
            class_name.to_string()
        } else {
            format!("{namespace}::{class_name}")
        };
        let constexpr_qualifier = constexpr_for(cpp_standard);
        Self {
            kind,
            namespace: namespace.to_string(),
            class_name: class_name.to_string(),
            full_qualified_name,
            underlying_type: underlying_type.to_string(),
            value_member: "value".to_string(),
            description: String::new(),
            arithmetic_binary: BTreeSet::new(),
            unary: BTreeSet::new(),
            relational: BTreeSet::new(),
            increment: BTreeSet::new(),
            logical: BTreeSet::new(),
            explicit_casts: BTreeSet::new(),
            implicit_casts: BTreeSet::new(),
            spaceship: false,
            defaulted_equality: false,
            arrow: false,
            indirection: false,
            address_of: false,
            bool_conversion: false,
            nullary_call: false,
            callable: false,
            subscript: false,
            ostream: false,
            istream: false,
            logical_not: false,
            hash_specialization: false,
            formatter_specialization: false,
            iterator_support: false,
            template_assignment: false,
            arithmetic_mode: ArithmeticMode::Default,
            constants: BTreeMap::new(),
            forwards: Vec::new(),
            includes: BTreeSet::new(),
            include_guards: BTreeMap::new(),
            default_value: None,
            delete_default_constructor: false,
            constraint: Constraint::default(),
            cpp_standard,
            constexpr_qualifier,
            hash_constexpr_qualifier: constexpr_qualifier,
        }
    }

    /// True for `class` wrappers, whose value member is private.
    #[must_use]
    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    /// True when at least this standard is targeted.
    #[must_use]
    pub fn at_least(&self, standard: CppStandard) -> bool {
        self.cpp_standard >= standard
    }
}

/// Returns the constexpr qualifier usable for mutating members at `standard`.
///
/// C++11 constexpr functions cannot contain statements, so mutating bodies
/// are emitted without the qualifier there.
#[must_use]
pub const fn constexpr_for(standard: CppStandard) -> &'static str {
    match standard {
        CppStandard::Cpp11 => "",
        _ => "constexpr ",
    }
}

#[cfg(test)]
mod tests;
