/// Outcome of one availability check on a [`PullTransformer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// An item is buffered and `collect` will return it.
    Ready,
    /// Work was done but produced nothing collectable yet; the current
    /// input is not finished, so poll again on a later time slice.
    NotReady,
    /// Nothing is buffered and the current input has nothing more to give.
    Exhausted,
}

/// A node that receives one input per `submit` and produces zero or more
/// outputs, each one only in response to a scheduler poll.
///
/// Per-item failures are returned to the caller as `Err`; they never
/// leave the node in a state that prevents the next `submit`.
pub trait PullTransformer {
    type Input;
    type Output;
    type Error;

    fn submit(&mut self, input: Self::Input) -> Result<(), Self::Error>;

    /// Performs at most one bounded unit of work and reports availability.
    fn poll(&mut self) -> Result<Availability, Self::Error>;

    /// `true` iff an item is buffered after this check.
    fn has_output(&mut self) -> Result<bool, Self::Error> {
        Ok(self.poll()? == Availability::Ready)
    }

    /// Removes and returns the buffered item.
    fn collect(&mut self) -> Result<Self::Output, Self::Error>;

    /// Releases every resource the node holds. Never fails, safe to repeat.
    fn close(&mut self);
}

/// One scheduler "pull": polls until an item is collected or the current
/// input is exhausted.
pub fn pull<T>(node: &mut T) -> Result<Option<T::Output>, T::Error>
where
    T: PullTransformer + ?Sized,
{
    loop {
        match node.poll()? {
            Availability::Ready => return node.collect().map(Some),
            Availability::NotReady => continue,
            Availability::Exhausted => return Ok(None),
        }
    }
}
