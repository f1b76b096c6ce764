//! Asset-lifetime state machine of the canvas.
//!
//! Transitions are pure: [`CanvasState::next`] returns the new state plus the side effects the
//! owning session must perform, so the lifecycle is testable without a surface or a store.

use crate::foundation::core::AssetId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Identity of one partition load. A completion carrying an older ticket is stale.
pub struct LoadTicket(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where the canvas is in an asset's lifetime.
pub enum CanvasState {
    /// No asset selected yet.
    Uninitialized,
    /// Waiting for the partition of `asset`.
    Loading {
        /// Requested asset.
        asset: AssetId,
        /// Ticket the completion must carry.
        ticket: LoadTicket,
    },
    /// Surface attached, handlers live, annotations applied.
    Ready {
        /// Active asset.
        asset: AssetId,
    },
    /// The partition for `asset` is missing or undecodable.
    NotAvailable {
        /// Active asset.
        asset: AssetId,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Inputs of the state machine.
pub enum CanvasEvent {
    /// A new asset was selected and its load started.
    Select {
        /// Asset to load.
        asset: AssetId,
        /// Ticket of the new load.
        ticket: LoadTicket,
    },
    /// A load finished with a usable partition.
    Loaded(LoadTicket),
    /// A load finished without a usable partition.
    Failed(LoadTicket),
    /// The project tag list changed.
    TagsChanged,
    /// The canvas is going away.
    Unmount,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Side effect requested by a transition, in execution order.
pub enum Effect {
    /// Rescan the surface and hand the segments of `AssetId` to the metadata store.
    Persist(AssetId),
    /// Remove every shape from the surface.
    TearDown,
    /// Attach the loaded shapes and apply annotations.
    Attach,
    /// Show the "not available" placeholder.
    ShowNotAvailable,
    /// Repaint shapes from the current tag colors.
    Repaint,
    /// Drop a completion that no longer matches the pending load.
    IgnoreStale,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Result of one transition.
pub struct Transition {
    /// State after the event.
    pub state: CanvasState,
    /// Effects to run, in order.
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: CanvasState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }
}

impl CanvasState {
    /// Asset the state refers to, if any.
    pub fn asset(&self) -> Option<&AssetId> {
        match self {
            Self::Uninitialized => None,
            Self::Loading { asset, .. } | Self::Ready { asset } | Self::NotAvailable { asset } => {
                Some(asset)
            }
        }
    }

    /// True once shapes are attached and interactive.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Pending load ticket while loading.
    pub fn pending_ticket(&self) -> Option<LoadTicket> {
        match self {
            Self::Loading { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }

    /// Compute the transition for `event`.
    pub fn next(&self, event: CanvasEvent) -> Transition {
        match (self, event) {
            (Self::Ready { asset: prev }, CanvasEvent::Select { asset, ticket }) => Transition::to(
                Self::Loading { asset, ticket },
                vec![Effect::Persist(prev.clone()), Effect::TearDown],
            ),
            (Self::NotAvailable { .. }, CanvasEvent::Select { asset, ticket }) => {
                Transition::to(Self::Loading { asset, ticket }, vec![Effect::TearDown])
            }
            (_, CanvasEvent::Select { asset, ticket }) => {
                Transition::to(Self::Loading { asset, ticket }, Vec::new())
            }

            (Self::Loading { asset, ticket }, CanvasEvent::Loaded(done)) if *ticket == done => {
                Transition::to(Self::Ready { asset: asset.clone() }, vec![Effect::Attach])
            }
            (Self::Loading { asset, ticket }, CanvasEvent::Failed(done)) if *ticket == done => {
                Transition::to(
                    Self::NotAvailable {
                        asset: asset.clone(),
                    },
                    vec![Effect::ShowNotAvailable],
                )
            }
            (_, CanvasEvent::Loaded(_) | CanvasEvent::Failed(_)) => {
                Transition::to(self.clone(), vec![Effect::IgnoreStale])
            }

            (Self::Ready { .. }, CanvasEvent::TagsChanged) => {
                Transition::to(self.clone(), vec![Effect::Repaint])
            }
            (_, CanvasEvent::TagsChanged) => Transition::to(self.clone(), Vec::new()),

            (Self::Ready { asset }, CanvasEvent::Unmount) => Transition::to(
                Self::Uninitialized,
                vec![Effect::Persist(asset.clone()), Effect::TearDown],
            ),
            (_, CanvasEvent::Unmount) => Transition::to(Self::Uninitialized, vec![Effect::TearDown]),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/state.rs"]
mod tests;
