use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{BasketKind, ItemId};

/// Input to a basket-mode session.
///
/// The presentation layer hit-tests the pointer and turns clicks into these events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum BasketEvent {
    /// Click on a fruit on the field (or anywhere while holding one).
    Pick(ItemId),
    /// Release over the basket of the given kind.
    Drop(BasketKind),
    /// Passage of time.
    Tick(Duration),
}

/// Input to a timed pop-up session.
///
/// [`PopUp`](Self::PopUp) and [`PopDown`](Self::PopDown) are normally produced by the
/// session's own timers while it processes a [`Tick`](Self::Tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum PopupEvent {
    /// Click on the slot with the given index.
    Grab(usize),
    PopUp,
    PopDown,
    /// Passage of time; drives the pop-up and pop-down timers.
    Tick(Duration),
}
