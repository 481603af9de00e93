//! Argument counts of known macros.
//!
//! The parser needs to know how many arguments a macro takes before it
//! can build the tree.
//! Macros not listed here take no arguments.

/// The arguments a macro takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MacroArity {
    /// Whether the macro accepts an optional `[...]` argument.
    pub optional: bool,
    /// Number of required `{...}` arguments.
    pub required: usize,
    /// Whether the required arguments are parsed in text mode.
    pub text: bool,
}

impl MacroArity {
    const NONE: MacroArity = MacroArity {
        optional: false,
        required: 0,
        text: false,
    };
    const ONE: MacroArity = MacroArity {
        optional: false,
        required: 1,
        text: false,
    };
    const TWO: MacroArity = MacroArity {
        optional: false,
        required: 2,
        text: false,
    };
    const TEXT: MacroArity = MacroArity {
        optional: false,
        required: 1,
        text: true,
    };
}

/// Macros that take their argument in text mode.
pub const TEXT_MACROS: &[&str] = &[
    r"\text", r"\textbf", r"\textit", r"\textrm", r"\textsf", r"\texttt", r"\emph", r"\mbox",
];

/// Returns the arguments the macro with the given name takes.
///
/// The name includes the escape marker.
pub fn arity(name: &str) -> MacroArity {
    if TEXT_MACROS.contains(&name) {
        return MacroArity::TEXT;
    }
    match name {
        r"\frac" | r"\dfrac" | r"\tfrac" | r"\binom" => MacroArity::TWO,
        r"\sqrt" => MacroArity {
            optional: true,
            ..MacroArity::ONE
        },
        r"\overline" | r"\hat" | r"\check" | r"\tilde" | r"\bar" | r"\vec" | r"\dot"
        | r"\ddot" | r"\acute" | r"\grave" | r"\breve" | r"\mathring" | r"\widehat"
        | r"\widetilde" | r"\widebar" => MacroArity::ONE,
        r"\mathrm" | r"\mathit" | r"\mathbf" | r"\mathcal" | r"\mathsf" | r"\mathtt"
        | r"\mathbb" | r"\mathfrak" | r"\mathdefault" => MacroArity::ONE,
        r"\hspace" | r"\operatorname" => MacroArity::ONE,
        _ => MacroArity::NONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_macros() {
        assert_eq!(arity(r"\frac").required, 2);
        assert!(arity(r"\sqrt").optional);
        assert_eq!(arity(r"\sqrt").required, 1);
        assert!(arity(r"\textbf").text);
        assert!(!arity(r"\mathbf").text);
        assert_eq!(arity(r"\alpha"), MacroArity::default());
        assert_eq!(arity(r"\nosuchmacro"), MacroArity::default());
    }
}
