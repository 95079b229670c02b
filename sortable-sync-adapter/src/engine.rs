use crate::{EngineOptions, OptionChange};

/// The boundary to the external drag engine.
///
/// An engine attaches to a container, moves DOM nodes itself while the user drags, and then
/// reports lifecycle events. The host forwards those reports to [`crate::Binding::handle`] and
/// [`crate::Binding::handle_move`]; the engine never sees application callbacks directly.
pub trait SortableEngine<N> {
    /// A live engine attached to one container.
    type Instance;

    fn create(&mut self, container: &N, options: &EngineOptions) -> Self::Instance;

    /// Applies one changed option to a live instance without re-creating it.
    fn set_option(&mut self, instance: &mut Self::Instance, change: &OptionChange);

    /// Detaches the instance. No callbacks may fire for it afterwards.
    fn destroy(&mut self, instance: Self::Instance);
}
