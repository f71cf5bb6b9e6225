//! Declared routine signatures and the argument caster.

use std::fmt;

use rbot_core::{ArgValue, ParamKind, RoutineError};

use crate::invocation::Invocation;

/// Ordered parameter kinds of a routine, fixed when the routine is built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    params: Vec<ParamKind>,
}

impl Signature {
    pub fn new(params: Vec<ParamKind>) -> Self {
        Self { params }
    }

    /// Builds a signature from kind names such as `["string", "int"]`.
    ///
    /// Fails with [`RoutineError::UnsupportedParamKind`] on the first unknown name.
    pub fn parse<I, S>(names: I) -> Result<Self, RoutineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let params = names
            .into_iter()
            .map(|name| name.as_ref().parse::<ParamKind>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &[ParamKind] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Whether trailing tokens are folded into the last argument.
    fn joins_trailing_tokens(&self) -> bool {
        matches!(self.params.last(), Some(ParamKind::String))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, kind) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", kind)?;
        }
        f.write_str(")")
    }
}

/// Converts string tokens into typed arguments for `signature`.
///
/// When the last parameter is a string and there are more tokens than parameters, the
/// surplus tokens are joined with single spaces into that last argument. Pure: nothing is
/// returned on failure.
pub fn cast<S: AsRef<str>>(signature: &Signature, tokens: &[S]) -> Result<Vec<ArgValue>, RoutineError> {
    let inputs: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
    cast_with(signature, &inputs, |from| inputs[from..].join(" "))
}

/// Like [`cast`], but a trailing string argument is taken verbatim from the message text, so
/// newlines and runs of spaces survive.
pub fn cast_invocation(
    signature: &Signature,
    invocation: &Invocation,
) -> Result<Vec<ArgValue>, RoutineError> {
    let inputs: Vec<&str> = invocation.args.iter().map(String::as_str).collect();
    cast_with(signature, &inputs, |from| {
        invocation.rest_from(from).unwrap_or_default().to_string()
    })
}

fn cast_with(
    signature: &Signature,
    tokens: &[&str],
    rest_from: impl Fn(usize) -> String,
) -> Result<Vec<ArgValue>, RoutineError> {
    let takes = signature.len();
    let given = tokens.len();

    let rest;
    let mut inputs = tokens.to_vec();
    if takes > 0 && given >= takes && signature.joins_trailing_tokens() {
        rest = rest_from(takes - 1);
        inputs.truncate(takes - 1);
        inputs.push(rest.as_str());
    }

    if inputs.len() != takes {
        return Err(RoutineError::ArityMismatch { given, takes });
    }

    signature
        .params()
        .iter()
        .zip(inputs)
        .enumerate()
        .map(|(position, (kind, token))| cast_token(position, *kind, token))
        .collect()
}

fn cast_token(position: usize, kind: ParamKind, token: &str) -> Result<ArgValue, RoutineError> {
    let mismatch = || RoutineError::TypeMismatch {
        position,
        expected: kind,
        token: token.to_string(),
    };
    match kind {
        ParamKind::String => Ok(ArgValue::Str(token.to_string())),
        ParamKind::Int => token.parse().map(ArgValue::Int).map_err(|_| mismatch()),
        ParamKind::Float32 => token.parse().map(ArgValue::Float32).map_err(|_| mismatch()),
        ParamKind::Float64 => token.parse().map(ArgValue::Float64).map_err(|_| mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_int() -> Signature {
        Signature::new(vec![ParamKind::String, ParamKind::Int])
    }

    #[test]
    fn test_cast_string_int() {
        let args = cast(&string_int(), &["abc", "7"]).unwrap();
        assert_eq!(args, vec![ArgValue::Str("abc".into()), ArgValue::Int(7)]);
    }

    #[test]
    fn test_cast_type_mismatch() {
        let err = cast(&string_int(), &["abc", "x"]).unwrap_err();
        assert_eq!(
            err,
            RoutineError::TypeMismatch {
                position: 1,
                expected: ParamKind::Int,
                token: "x".into(),
            }
        );
    }

    #[test]
    fn test_cast_arity_mismatch() {
        let err = cast(&string_int(), &["abc"]).unwrap_err();
        assert_eq!(err, RoutineError::ArityMismatch { given: 1, takes: 2 });
    }

    #[test]
    fn test_cast_too_many_tokens_for_non_string_tail() {
        let err = cast(&string_int(), &["abc", "7", "8"]).unwrap_err();
        assert_eq!(err, RoutineError::ArityMismatch { given: 3, takes: 2 });
    }

    #[test]
    fn test_cast_joins_trailing_tokens_into_last_string() {
        let sig = Signature::new(vec![ParamKind::String]);
        let args = cast(&sig, &["hello", "world"]).unwrap();
        assert_eq!(args, vec![ArgValue::Str("hello world".into())]);

        let sig = Signature::new(vec![ParamKind::Int, ParamKind::String]);
        let args = cast(&sig, &["3", "a", "b", "c"]).unwrap();
        assert_eq!(args, vec![ArgValue::Int(3), ArgValue::Str("a b c".into())]);
    }

    #[test]
    fn test_cast_invocation_keeps_message_spacing() {
        let sig = Signature::new(vec![ParamKind::Int, ParamKind::String]);
        let invocation = Invocation::parse("repeat 2 line one\nline two\n  indented");
        let args = cast_invocation(&sig, &invocation).unwrap();
        assert_eq!(
            args,
            vec![
                ArgValue::Int(2),
                ArgValue::Str("line one\nline two\n  indented".into())
            ]
        );

        let err = cast_invocation(&sig, &Invocation::parse("repeat x  y")).unwrap_err();
        assert!(matches!(err, RoutineError::TypeMismatch { position: 0, .. }));
        assert_eq!(
            cast_invocation(&sig, &Invocation::parse("repeat 2")).unwrap_err(),
            RoutineError::ArityMismatch { given: 1, takes: 2 }
        );
    }

    #[test]
    fn test_cast_floats() {
        let sig = Signature::new(vec![ParamKind::Float32, ParamKind::Float64]);
        let args = cast(&sig, &["1.5", "-2e3"]).unwrap();
        assert_eq!(args, vec![ArgValue::Float32(1.5), ArgValue::Float64(-2000.0)]);

        let err = cast(&sig, &["1.5", "two"]).unwrap_err();
        assert!(matches!(err, RoutineError::TypeMismatch { position: 1, .. }));
    }

    #[test]
    fn test_cast_empty_signature() {
        let sig = Signature::default();
        assert!(cast::<&str>(&sig, &[]).unwrap().is_empty());
        assert_eq!(
            cast(&sig, &["extra"]).unwrap_err(),
            RoutineError::ArityMismatch { given: 1, takes: 0 }
        );
    }

    #[test]
    fn test_signature_parse() {
        let sig = Signature::parse(["string", "int"]).unwrap();
        assert_eq!(sig, string_int());
        assert_eq!(sig.to_string(), "(string, int)");

        let err = Signature::parse(["string", "bool"]).unwrap_err();
        assert_eq!(err, RoutineError::UnsupportedParamKind("bool".into()));
    }
}
