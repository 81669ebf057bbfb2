//! Macros for declaring state and event identifiers.

/// Generate a `State` implementation for a simple enum.
///
/// The enum gets the derives the transition table needs (`Clone`, `Eq`,
/// `Hash`, `Debug`, serde) and `name()` returns the variant name.
///
/// # Example
///
/// ```
/// use hsm::state_enum;
/// use hsm::core::State;
///
/// state_enum! {
///     pub enum SessionState {
///         AdminDown,
///         Down,
///         Init,
///         Up,
///     }
/// }
///
/// assert_eq!(SessionState::AdminDown.name(), "AdminDown");
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
        #[derive(Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Generate an `Event` implementation for a simple enum.
///
/// # Example
///
/// ```
/// use hsm::event_enum;
/// use hsm::core::Event;
///
/// event_enum! {
///     pub enum SessionEvent {
///         Up,
///         Down,
///         TimedOut,
///     }
/// }
///
/// assert_eq!(SessionEvent::TimedOut.name(), "TimedOut");
/// ```
#[macro_export]
macro_rules! event_enum {
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
        #[derive(Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Event for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
