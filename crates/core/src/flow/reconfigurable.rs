/// A node whose live resources can be handed out and back in while its
/// options change.
///
/// `capture_state` moves the resources into the snapshot; the node holds
/// none of them until `restore_state` moves them back. Nothing is cloned,
/// so at every moment exactly one value owns each resource.
pub trait Reconfigurable {
    type Snapshot;

    fn capture_state(&mut self) -> Self::Snapshot;

    fn restore_state(&mut self, snapshot: Self::Snapshot);
}

/// Applies an option change without disturbing in-flight resources.
///
/// Captures the node's state, runs `apply`, then restores the state as the
/// final step. The state is restored even when `apply` fails, and the
/// failure is returned afterwards.
pub fn reconfigure<N, E, F>(node: &mut N, apply: F) -> Result<(), E>
where
    N: Reconfigurable + ?Sized,
    F: FnOnce(&mut N) -> Result<(), E>,
{
    let snapshot = node.capture_state();
    let result = apply(node);
    node.restore_state(snapshot);
    result
}
