/// A terminal node that consumes items synchronously, one call per item.
pub trait Sink {
    type Input;
    type Error;

    /// Consumes one item. A failure is reported once, without retry.
    fn accept(&mut self, input: &Self::Input) -> Result<(), Self::Error>;

    /// Finalizes and releases any output resource. Repeated calls are
    /// no-ops.
    fn wrap_up(&mut self) -> Result<(), Self::Error>;
}
