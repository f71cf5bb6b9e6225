//! Routines: a declared [`Signature`] plus a uniform async invocation adapter.
//!
//! Plain Rust functions become routines through [`IntoRoutine`]; their parameter kinds are
//! derived from the [`Param`] impls of their argument types, so an unsupported parameter
//! type is a compile error rather than a runtime one.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use rbot_core::{ArgValue, ParamKind, RoutineError};

use crate::invocation::Invocation;
use crate::signature::{cast, cast_invocation, Signature};

/// Uniform call shape for every routine: typed arguments in, reply text out.
#[async_trait]
pub trait Action: Send + Sync {
    async fn invoke(&self, args: Vec<ArgValue>) -> anyhow::Result<String>;
}

/// A registered unit of bot logic.
#[derive(Clone)]
pub struct Routine {
    signature: Signature,
    action: Arc<dyn Action>,
}

impl Routine {
    pub fn new(signature: Signature, action: impl Action + 'static) -> Self {
        Self {
            signature,
            action: Arc::new(action),
        }
    }

    /// Builds a routine whose signature is given by kind names (e.g. `["string", "int"]`).
    pub fn declared<I, S>(kinds: I, action: impl Action + 'static) -> Result<Self, RoutineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::new(Signature::parse(kinds)?, action))
    }

    /// Builds a routine from a plain function; see [`IntoRoutine`].
    pub fn from_fn<Args, F: IntoRoutine<Args>>(f: F) -> Self {
        f.into_routine()
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Casts `tokens` against the signature, then invokes the action.
    ///
    /// Cast errors are returned as-is; an action failure becomes [`RoutineError::Handler`]
    /// carrying the action's error message.
    pub async fn execute<S: AsRef<str>>(&self, tokens: &[S]) -> Result<String, RoutineError> {
        let args = cast(&self.signature, tokens)?;
        self.run(args).await
    }

    /// Like [`Routine::execute`], but a trailing string argument keeps the message's own
    /// spacing.
    pub async fn execute_invocation(&self, invocation: &Invocation) -> Result<String, RoutineError> {
        let args = cast_invocation(&self.signature, invocation)?;
        self.run(args).await
    }

    async fn run(&self, args: Vec<ArgValue>) -> Result<String, RoutineError> {
        self.action
            .invoke(args)
            .await
            .map_err(|e| RoutineError::Handler(e.to_string()))
    }
}

impl fmt::Debug for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Routine")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Runs a synchronous closure on the blocking pool so a slow routine never stalls the runtime.
struct BlockingAction<F> {
    func: Arc<F>,
}

#[async_trait]
impl<F> Action for BlockingAction<F>
where
    F: Fn(Vec<ArgValue>) -> anyhow::Result<String> + Send + Sync + 'static,
{
    async fn invoke(&self, args: Vec<ArgValue>) -> anyhow::Result<String> {
        let func = Arc::clone(&self.func);
        tokio::task::spawn_blocking(move || func(args))
            .await
            .map_err(|e| anyhow::anyhow!("routine aborted: {}", e))?
    }
}

/// A Rust type usable as a routine parameter.
pub trait Param: Sized + Send + 'static {
    const KIND: ParamKind;

    fn from_arg(arg: ArgValue) -> Option<Self>;
}

impl Param for String {
    const KIND: ParamKind = ParamKind::String;

    fn from_arg(arg: ArgValue) -> Option<Self> {
        match arg {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl Param for i64 {
    const KIND: ParamKind = ParamKind::Int;

    fn from_arg(arg: ArgValue) -> Option<Self> {
        arg.as_int()
    }
}

impl Param for f32 {
    const KIND: ParamKind = ParamKind::Float32;

    fn from_arg(arg: ArgValue) -> Option<Self> {
        arg.as_f32()
    }
}

impl Param for f64 {
    const KIND: ParamKind = ParamKind::Float64;

    fn from_arg(arg: ArgValue) -> Option<Self> {
        arg.as_f64()
    }
}

/// Return types a routine function may produce.
pub trait IntoReply {
    fn into_reply(self) -> anyhow::Result<String>;
}

impl IntoReply for String {
    fn into_reply(self) -> anyhow::Result<String> {
        Ok(self)
    }
}

impl IntoReply for &'static str {
    fn into_reply(self) -> anyhow::Result<String> {
        Ok(self.to_string())
    }
}

impl<E> IntoReply for Result<String, E>
where
    E: Into<anyhow::Error>,
{
    fn into_reply(self) -> anyhow::Result<String> {
        self.map_err(Into::into)
    }
}

/// Conversion of a typed function into a [`Routine`]. Implemented for `Fn` of arity 0 to 4
/// whose parameters implement [`Param`] and whose return implements [`IntoReply`].
pub trait IntoRoutine<Args>: Send + Sync + 'static {
    fn into_routine(self) -> Routine;
}

macro_rules! impl_into_routine {
    ($($ty:ident),*) => {
        impl<F, R, $($ty,)*> IntoRoutine<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> R + Send + Sync + 'static,
            R: IntoReply + 'static,
            $($ty: Param,)*
        {
            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_routine(self) -> Routine {
                let signature = Signature::new(vec![$($ty::KIND),*]);
                let action = BlockingAction {
                    func: Arc::new(move |args: Vec<ArgValue>| -> anyhow::Result<String> {
                        let mut args = args.into_iter();
                        $(
                            let $ty = args
                                .next()
                                .and_then($ty::from_arg)
                                .ok_or_else(|| anyhow::anyhow!("argument does not match {}", $ty::KIND))?;
                        )*
                        (self)($($ty),*).into_reply()
                    }),
                };
                Routine::new(signature, action)
            }
        }
    };
}

impl_into_routine!();
impl_into_routine!(A);
impl_into_routine!(A, B);
impl_into_routine!(A, B, C);
impl_into_routine!(A, B, C, D);
