// crates/atlas-core/src/preamble.rs
// ============================================================================
// Module: Preamble Library
// Description: Fixed C++ boilerplate fragments emitted ahead of class bodies.
// Purpose: Select and concatenate only the helpers a header actually needs.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Every generated header starts with a small library of helpers in the
//! `atlas` C++ namespace. Each helper family is a [`PreambleFragment`] with
//! fixed text wrapped in its own `#ifndef ATLAS_PREAMBLE_*` guard, so two
//! generated headers included into one translation unit never redefine a
//! helper.
//!
//! [`preamble`] concatenates fragments in enum order, which is also the
//! dependency order (the value-access machinery precedes the drills that
//! use it, the constraint guard precedes the nilable check).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

// ============================================================================
// SECTION: Fragments
// ============================================================================

/// One independently guarded helper family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PreambleFragment {
    /// `atlas::strong_type_tag`, `atlas::value_tag` and the C++14 constexpr macro.
    StrongTypeTag,
    /// `atlas::value()` with priority-tag dispatch.
    ValueAccess,
    /// Helpers behind `operator->` and unary `operator*`.
    ArrowStar,
    /// Throwing overflow-checked arithmetic.
    Checked,
    /// Clamping arithmetic.
    Saturating,
    /// Modulo-2^N arithmetic through the unsigned counterpart.
    Wrapping,
    /// `atlas::constraints` and `atlas::constraint_violation`.
    ConstraintGuard,
    /// Null detection for `non_null`.
    Nilable,
    /// Hashing through wrapper layers.
    HashDrill,
    /// Streaming output through wrapper layers.
    OstreamDrill,
    /// Streaming input into the wrapped value.
    IstreamDrill,
    /// Formatting through wrapper layers.
    FormatDrill,
}

impl PreambleFragment {
    /// Fragments every header carries.
    pub const BASELINE: [Self; 2] = [Self::StrongTypeTag, Self::ValueAccess];

    /// Returns the idempotence guard macro of the fragment.
    #[must_use]
    pub const fn guard(self) -> &'static str {
        match self {
            Self::StrongTypeTag => "ATLAS_PREAMBLE_STRONG_TYPE_TAG_V1",
            Self::ValueAccess => "ATLAS_PREAMBLE_VALUE_ACCESS_V1",
            Self::ArrowStar => "ATLAS_PREAMBLE_ARROW_STAR_V1",
            Self::Checked => "ATLAS_PREAMBLE_CHECKED_ARITHMETIC_V1",
            Self::Saturating => "ATLAS_PREAMBLE_SATURATING_ARITHMETIC_V1",
            Self::Wrapping => "ATLAS_PREAMBLE_WRAPPING_ARITHMETIC_V1",
            Self::ConstraintGuard => "ATLAS_PREAMBLE_CONSTRAINT_GUARD_V1",
            Self::Nilable => "ATLAS_PREAMBLE_NILABLE_V1",
            Self::HashDrill => "ATLAS_PREAMBLE_HASH_DRILL_V1",
            Self::OstreamDrill => "ATLAS_PREAMBLE_OSTREAM_DRILL_V1",
            Self::IstreamDrill => "ATLAS_PREAMBLE_ISTREAM_DRILL_V1",
            Self::FormatDrill => "ATLAS_PREAMBLE_FORMAT_DRILL_V1",
        }
    }

    /// Returns the standard headers the fragment depends on.
    #[must_use]
    pub const fn includes(self) -> &'static [&'static str] {
        match self {
            Self::StrongTypeTag => &["<type_traits>", "<utility>"],
            Self::ValueAccess | Self::Wrapping => &["<type_traits>"],
            Self::ArrowStar => &["<memory>", "<type_traits>"],
            Self::Checked => &["<limits>", "<stdexcept>", "<type_traits>"],
            Self::Saturating => &["<limits>", "<type_traits>"],
            Self::ConstraintGuard => &["<stdexcept>"],
            Self::Nilable => &["<cstddef>", "<type_traits>"],
            Self::HashDrill => &["<cstddef>", "<functional>"],
            Self::OstreamDrill => &["<ostream>"],
            Self::IstreamDrill => &["<istream>"],
            Self::FormatDrill => &[],
        }
    }

    /// Returns the fragment body without its guard.
    const fn body(self) -> &'static str {
        match self {
            Self::StrongTypeTag => STRONG_TYPE_TAG,
            Self::ValueAccess => VALUE_ACCESS,
            Self::ArrowStar => ARROW_STAR,
            Self::Checked => CHECKED_ARITHMETIC,
            Self::Saturating => SATURATING_ARITHMETIC,
            Self::Wrapping => WRAPPING_ARITHMETIC,
            Self::ConstraintGuard => CONSTRAINT_GUARD,
            Self::Nilable => NILABLE,
            Self::HashDrill => HASH_DRILL,
            Self::OstreamDrill => OSTREAM_DRILL,
            Self::IstreamDrill => ISTREAM_DRILL,
            Self::FormatDrill => FORMAT_DRILL,
        }
    }
}

// ============================================================================
// SECTION: Composition
// ============================================================================

/// Concatenates the requested fragments plus the baseline.
///
/// Each fragment is wrapped in its own guard and appears at most once.
#[must_use]
pub fn preamble(fragments: &BTreeSet<PreambleFragment>) -> String {
    let mut out = String::new();
    for fragment in with_baseline(fragments) {
        let guard = fragment.guard();
        out.push_str("#ifndef ");
        out.push_str(guard);
        out.push_str("\n#define ");
        out.push_str(guard);
        out.push('\n');
        out.push_str(fragment.body());
        out.push_str("#endif // ");
        out.push_str(guard);
        out.push_str("\n\n");
    }
    out
}

/// Returns the standard headers required by the requested fragments.
#[must_use]
pub fn preamble_includes(fragments: &BTreeSet<PreambleFragment>) -> BTreeSet<String> {
    with_baseline(fragments)
        .into_iter()
        .flat_map(|fragment| fragment.includes().iter().map(|header| (*header).to_string()))
        .collect()
}

/// Adds the baseline fragments to `fragments`.
fn with_baseline(fragments: &BTreeSet<PreambleFragment>) -> BTreeSet<PreambleFragment> {
    let mut all = fragments.clone();
    all.extend(PreambleFragment::BASELINE);
    all
}

// ============================================================================
// SECTION: Fragment Text
// ============================================================================

/// Empty base of every wrapper and the `ATLAS_CONSTEXPR14` macro.
const STRONG_TYPE_TAG: &str = r"#if __cplusplus >= 201402L
#define ATLAS_CONSTEXPR14 constexpr
#else
#define ATLAS_CONSTEXPR14
#endif
namespace atlas {
struct strong_type_tag
{
#if __cplusplus >= 202002L
    friend constexpr auto operator<=>(
        strong_type_tag const &,
        strong_type_tag const &) = default;
#endif
};
struct value_tag
{
};
template <typename T>
struct is_atlas_type
: std::is_base_of<strong_type_tag, T>
{
};
} // namespace atlas
";

/// `atlas::value`, unwrapping nested wrappers through `atlas_value`.
const VALUE_ACCESS: &str = r"namespace atlas {
namespace atlas_detail {
template <int N>
struct PriorityTag
: PriorityTag<N - 1>
{
};
template <>
struct PriorityTag<0>
{
};

template <typename T>
constexpr auto
value_impl(T const & t, PriorityTag<2>)
-> decltype(atlas_value(t, value_tag{}))
{
    return atlas_value(t, value_tag{});
}

template <typename T>
constexpr auto
value_impl(T const & t, PriorityTag<1>)
-> decltype(atlas_value(t))
{
    return atlas_value(t);
}

template <typename T>
constexpr T const &
value_impl(T const & t, PriorityTag<0>)
{
    return t;
}
} // namespace atlas_detail

template <typename T>
constexpr auto
value(T const & t)
-> decltype(atlas_detail::value_impl(t, atlas_detail::PriorityTag<2>{}))
{
    return atlas_detail::value_impl(t, atlas_detail::PriorityTag<2>{});
}
} // namespace atlas
";

/// Pointer drilling for `operator->` and unary `operator*`.
const ARROW_STAR: &str = r"namespace atlas {
namespace atlas_detail {
template <typename T>
constexpr auto
arrow_impl(T & t, PriorityTag<1>)
-> decltype(t.operator->())
{
    return t.operator->();
}

template <typename T>
constexpr T *
arrow_impl(T * t, PriorityTag<1>)
{
    return t;
}

template <typename T>
ATLAS_CONSTEXPR14 T *
arrow_impl(T & t, PriorityTag<0>)
{
    return std::addressof(t);
}

template <typename T>
constexpr auto
arrow(T & t)
-> decltype(arrow_impl(t, PriorityTag<1>{}))
{
    return arrow_impl(t, PriorityTag<1>{});
}

template <typename T>
constexpr auto
star_impl(T & t, PriorityTag<1>)
-> decltype(*t)
{
    return *t;
}

template <typename T>
constexpr T &
star_impl(T & t, PriorityTag<0>)
{
    return t;
}

template <typename T>
constexpr auto
star(T & t)
-> decltype(star_impl(t, PriorityTag<1>{}))
{
    return star_impl(t, PriorityTag<1>{});
}
} // namespace atlas_detail
} // namespace atlas
";

/// Overflow-checked helpers throwing `checked_arithmetic_error`.
const CHECKED_ARITHMETIC: &str = r#"namespace atlas {
class checked_arithmetic_error
: public std::runtime_error
{
public:
    using std::runtime_error::runtime_error;
};

namespace atlas_detail {
template <typename T>
using checked_limits = std::numeric_limits<T>;

template <typename T>
constexpr bool
add_overflows(T lhs, T rhs)
{
    return std::is_integral<T>::value &&
        ((rhs > T(0) && lhs > checked_limits<T>::max() - rhs) ||
         (rhs < T(0) && lhs < checked_limits<T>::lowest() - rhs));
}

template <typename T>
constexpr bool
sub_overflows(T lhs, T rhs)
{
    return std::is_integral<T>::value &&
        ((rhs < T(0) && lhs > checked_limits<T>::max() + rhs) ||
         (rhs > T(0) && lhs < checked_limits<T>::lowest() + rhs));
}

template <typename T>
constexpr bool
mul_overflows(T lhs, T rhs)
{
    return std::is_integral<T>::value && lhs != T(0) && rhs != T(0) &&
        (lhs > T(0)
             ? (rhs > T(0) ? lhs > checked_limits<T>::max() / rhs
                           : rhs < checked_limits<T>::lowest() / lhs)
             : (rhs > T(0) ? lhs < checked_limits<T>::lowest() / rhs
                           : rhs < checked_limits<T>::max() / lhs));
}

template <typename T>
constexpr bool
div_overflows(T lhs, T rhs)
{
    return std::is_integral<T>::value && std::is_signed<T>::value &&
        lhs == checked_limits<T>::lowest() && rhs == static_cast<T>(-1);
}

template <typename T>
constexpr T
checked_add(T lhs, T rhs)
{
    return add_overflows(lhs, rhs)
        ? throw checked_arithmetic_error("atlas: checked addition overflow")
        : static_cast<T>(lhs + rhs);
}

template <typename T>
constexpr T
checked_sub(T lhs, T rhs)
{
    return sub_overflows(lhs, rhs)
        ? throw checked_arithmetic_error("atlas: checked subtraction overflow")
        : static_cast<T>(lhs - rhs);
}

template <typename T>
constexpr T
checked_mul(T lhs, T rhs)
{
    return mul_overflows(lhs, rhs)
        ? throw checked_arithmetic_error("atlas: checked multiplication overflow")
        : static_cast<T>(lhs * rhs);
}

template <typename T>
constexpr T
checked_div(T lhs, T rhs)
{
    return (std::is_integral<T>::value && rhs == T(0))
        ? throw checked_arithmetic_error("atlas: checked division by zero")
        : div_overflows(lhs, rhs)
        ? throw checked_arithmetic_error("atlas: checked division overflow")
        : static_cast<T>(lhs / rhs);
}

template <typename T>
constexpr T
checked_rem(T lhs, T rhs)
{
    return rhs == T(0)
        ? throw checked_arithmetic_error("atlas: checked modulo by zero")
        : div_overflows(lhs, rhs) ? T(0) : static_cast<T>(lhs % rhs);
}
} // namespace atlas_detail
} // namespace atlas
"#;

/// Helpers clamping to the limits of the value type.
const SATURATING_ARITHMETIC: &str = r"namespace atlas {
namespace atlas_detail {
template <typename T>
using saturating_limits = std::numeric_limits<T>;

template <typename T>
constexpr T
saturating_add(T lhs, T rhs)
{
    return (std::is_integral<T>::value && rhs > T(0) &&
            lhs > saturating_limits<T>::max() - rhs)
        ? saturating_limits<T>::max()
        : (std::is_integral<T>::value && rhs < T(0) &&
           lhs < saturating_limits<T>::lowest() - rhs)
        ? saturating_limits<T>::lowest()
        : static_cast<T>(lhs + rhs);
}

template <typename T>
constexpr T
saturating_sub(T lhs, T rhs)
{
    return (std::is_integral<T>::value && rhs < T(0) &&
            lhs > saturating_limits<T>::max() + rhs)
        ? saturating_limits<T>::max()
        : (std::is_integral<T>::value && rhs > T(0) &&
           lhs < saturating_limits<T>::lowest() + rhs)
        ? saturating_limits<T>::lowest()
        : static_cast<T>(lhs - rhs);
}

template <typename T>
constexpr bool
saturating_mul_overflows(T lhs, T rhs)
{
    return std::is_integral<T>::value && lhs != T(0) && rhs != T(0) &&
        (lhs > T(0)
             ? (rhs > T(0) ? lhs > saturating_limits<T>::max() / rhs
                           : rhs < saturating_limits<T>::lowest() / lhs)
             : (rhs > T(0) ? lhs < saturating_limits<T>::lowest() / rhs
                           : rhs < saturating_limits<T>::max() / lhs));
}

template <typename T>
constexpr T
saturating_mul(T lhs, T rhs)
{
    return saturating_mul_overflows(lhs, rhs)
        ? ((lhs < T(0)) != (rhs < T(0)) ? saturating_limits<T>::lowest()
                                        : saturating_limits<T>::max())
        : static_cast<T>(lhs * rhs);
}

template <typename T>
constexpr T
saturating_div(T lhs, T rhs)
{
    return (std::is_integral<T>::value && rhs == T(0))
        ? (lhs < T(0) ? saturating_limits<T>::lowest()
                      : lhs > T(0) ? saturating_limits<T>::max() : T(0))
        : (std::is_signed<T>::value && lhs == saturating_limits<T>::lowest() &&
           rhs == static_cast<T>(-1))
        ? saturating_limits<T>::max()
        : static_cast<T>(lhs / rhs);
}

template <typename T>
constexpr T
saturating_rem(T lhs, T rhs)
{
    return (rhs == T(0) ||
            (std::is_signed<T>::value && lhs == saturating_limits<T>::lowest() &&
             rhs == static_cast<T>(-1)))
        ? T(0)
        : static_cast<T>(lhs % rhs);
}
} // namespace atlas_detail
} // namespace atlas
";

/// Modular helpers computed in the unsigned counterpart. Non-integral types
/// keep their own arithmetic.
const WRAPPING_ARITHMETIC: &str = r"namespace atlas {
namespace atlas_detail {
template <typename T,
          bool = std::is_integral<T>::value && !std::is_same<T, bool>::value>
struct wrapping_unsigned_impl
{
    using type = T;
};

template <typename T>
struct wrapping_unsigned_impl<T, true>
{
    using type = typename std::make_unsigned<T>::type;
};

template <typename T>
using wrapping_unsigned = typename wrapping_unsigned_impl<T>::type;

template <typename T>
constexpr T
wrapping_add(T lhs, T rhs)
{
    return static_cast<T>(static_cast<wrapping_unsigned<T>>(
        static_cast<wrapping_unsigned<T>>(lhs) + static_cast<wrapping_unsigned<T>>(rhs)));
}

template <typename T>
constexpr T
wrapping_sub(T lhs, T rhs)
{
    return static_cast<T>(static_cast<wrapping_unsigned<T>>(
        static_cast<wrapping_unsigned<T>>(lhs) - static_cast<wrapping_unsigned<T>>(rhs)));
}

template <typename T>
constexpr T
wrapping_mul(T lhs, T rhs)
{
    return static_cast<T>(static_cast<wrapping_unsigned<T>>(
        static_cast<wrapping_unsigned<T>>(lhs) * static_cast<wrapping_unsigned<T>>(rhs)));
}
} // namespace atlas_detail
} // namespace atlas
";

/// Constraint policies and `checked_value`.
const CONSTRAINT_GUARD: &str = r"namespace atlas {
class constraint_violation
: public std::logic_error
{
public:
    using std::logic_error::logic_error;
};

namespace constraints {
struct positive
{
    template <typename T>
    static constexpr bool check(T const & v) { return v > T{}; }
};
struct non_negative
{
    template <typename T>
    static constexpr bool check(T const & v) { return !(v < T{}); }
};
struct non_zero
{
    template <typename T>
    static constexpr bool check(T const & v) { return v != T{}; }
};
struct non_empty
{
    template <typename T>
    static constexpr bool check(T const & v) { return !v.empty(); }
};
template <typename Bounds>
struct bounded
{
    template <typename T>
    static constexpr bool check(T const & v)
    {
        return !(v < Bounds::atlas_bound_min()) && !(Bounds::atlas_bound_max() < v);
    }
};
template <typename Bounds>
struct bounded_range
{
    template <typename T>
    static constexpr bool check(T const & v)
    {
        return !(v < Bounds::atlas_bound_min()) && v < Bounds::atlas_bound_max();
    }
};
} // namespace constraints

namespace atlas_detail {
template <typename Constraint, typename T>
constexpr T
checked_value(T value, char const * message)
{
    return Constraint::check(value) ? value : throw constraint_violation(message);
}
} // namespace atlas_detail
} // namespace atlas
";

/// Null detection for `non_null`.
const NILABLE: &str = r"namespace atlas {
namespace atlas_detail {
template <typename T>
constexpr auto
is_nil(T const & v, PriorityTag<1>)
-> decltype(v == nullptr)
{
    return v == nullptr;
}

template <typename T>
constexpr bool
is_nil(T const & v, PriorityTag<0>)
{
    return !static_cast<bool>(v);
}
} // namespace atlas_detail

namespace constraints {
struct non_null
{
    template <typename T>
    static constexpr bool check(T const & v)
    {
        return !atlas_detail::is_nil(v, atlas_detail::PriorityTag<1>{});
    }
};
} // namespace constraints
} // namespace atlas
";

/// Hashes the innermost value.
const HASH_DRILL: &str = r"namespace atlas {
namespace atlas_detail {
template <typename T>
constexpr std::size_t
hash_drill(T const & v)
{
    return std::hash<typename std::decay<decltype(atlas::value(v))>::type>{}(
        atlas::value(v));
}
} // namespace atlas_detail
} // namespace atlas
";

/// Streams the innermost value.
const OSTREAM_DRILL: &str = r"namespace atlas {
namespace atlas_detail {
template <typename T>
std::ostream &
ostream_drill(std::ostream & os, T const & v)
{
    return os << atlas::value(v);
}
} // namespace atlas_detail
} // namespace atlas
";

/// Extracts into the innermost value.
const ISTREAM_DRILL: &str = r"namespace atlas {
namespace atlas_detail {
template <typename T>
std::istream &
istream_drill(std::istream & is, T & v)
{
    return is >> v;
}
} // namespace atlas_detail
} // namespace atlas
";

/// Unwrapping for `std::formatter`, behind the `<format>` feature test.
const FORMAT_DRILL: &str = r"#if defined(__cpp_lib_format) && __cpp_lib_format >= 201907L
namespace atlas {
namespace atlas_detail {
template <typename T>
constexpr auto
format_drill(T const & v)
-> decltype(atlas::value(v))
{
    return atlas::value(v);
}
} // namespace atlas_detail
} // namespace atlas
#endif
";

#[cfg(test)]
mod tests;
