/// Async counterpart to the standard library's `TryFrom<T>` trait.
///
/// Useful when building a value involves I/O, such as reading and parsing a
/// file on the async runtime.
#[allow(async_fn_in_trait)]
pub trait AsyncTryFrom<T>: Sized {
    /// The error type that can occur during conversion.
    type Error;

    /// Performs the fallible asynchronous conversion from `T` to `Self`.
    async fn async_try_from(value: T) -> Result<Self, Self::Error>;
}
