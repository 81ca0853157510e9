//! Notifications the zone layer sends to the application.

use crate::zone::Zone;

/// Application-facing zone event.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneEvent<E> {
    /// The user selected a zone. A newly drawn shape arrives with `id == None`.
    ZoneSelected {
        /// Selected zone
        zone: Zone,
        /// Rendered element of the selection
        element: Option<E>,
    },
    /// A selection was committed.
    ZoneSaved {
        /// Zone as stored in the engine
        zone: Zone,
    },
}

impl<E> ZoneEvent<E> {
    /// Zone carried by the event.
    pub fn zone(&self) -> &Zone {
        match self {
            Self::ZoneSelected { zone, .. } | Self::ZoneSaved { zone } => zone,
        }
    }

    /// Event name as the viewer application knows it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ZoneSelected { .. } => "zoneSelected",
            Self::ZoneSaved { .. } => "zoneSaved",
        }
    }
}

/// Boxed listener registered with [`ZoneLayer::subscribe`](crate::ZoneLayer::subscribe).
pub type ZoneListener<E> = Box<dyn FnMut(&ZoneEvent<E>)>;
