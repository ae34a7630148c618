//! Macros for ergonomic state declaration.

/// Declare a unit-only enum usable as a state identity.
///
/// Derives `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Debug`,
/// `Serialize` and `Deserialize`, and adds an `ALL` constant listing the
/// variants in declaration order.
///
/// # Example
///
/// ```
/// use nested_fsm::state_enum;
///
/// state_enum! {
///     pub enum DoorState {
///         Initial,
///         Open,
///         OpenHalf,
///         Close,
///     }
/// }
///
/// assert_eq!(DoorState::ALL.len(), 4);
/// assert_eq!(DoorState::ALL[1], DoorState::Open);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];
        }
    };
}
