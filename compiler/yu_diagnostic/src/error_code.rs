//! Error codes attached to diagnostics.

use std::fmt;

/// Classification of a diagnostic, mapped to a stable error code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    UnexpectedToken,
    InvalidSyntax,
    TypeMismatch,
    UnresolvedSymbol,
    UnimplementedFeature,
    Other,
}

impl DiagnosticCode {
    /// Stable code string used in the `note: error[...]` trailer.
    pub const fn code(self) -> &'static str {
        match self {
            DiagnosticCode::UnexpectedToken => "E0001",
            DiagnosticCode::InvalidSyntax => "E0002",
            DiagnosticCode::TypeMismatch => "E0308",
            DiagnosticCode::UnresolvedSymbol => "E0433",
            DiagnosticCode::UnimplementedFeature | DiagnosticCode::Other => "E0000",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_mapping() {
        assert_eq!(DiagnosticCode::UnexpectedToken.code(), "E0001");
        assert_eq!(DiagnosticCode::InvalidSyntax.code(), "E0002");
        assert_eq!(DiagnosticCode::TypeMismatch.code(), "E0308");
        assert_eq!(DiagnosticCode::UnresolvedSymbol.code(), "E0433");
        assert_eq!(DiagnosticCode::UnimplementedFeature.code(), "E0000");
        assert_eq!(DiagnosticCode::Other.code(), "E0000");
    }
}
