//! Opaque handles identifying host objects.
//!
//! Handles compare by identity only: two materials with identical contents but different
//! handles are different materials. A handle is the position of the entity in the list that
//! owns it inside [`HostScene`](crate::HostScene).

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Position of the referenced entity in its owning list.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

handle!(
    /// Handle to a [`HostObject`](crate::HostObject).
    ObjectId,
    "object"
);
handle!(
    /// Handle to a [`HostMaterial`](crate::HostMaterial).
    MaterialId,
    "material"
);
handle!(
    /// Handle to a [`HostImage`](crate::HostImage).
    ImageId,
    "image"
);
