//! Defines helper macros for generating domain port error enums.
//!
//! Each generated enum derives `thiserror::Error`, gains one snake_case
//! constructor per variant (string fields accept `impl Into<String>`), and a
//! `kind()` accessor returning the variant name for structured logging.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// Variant name, for log fields and metrics labels.
            #[must_use]
            pub const fn kind(&self) -> &'static str {
                match self {
                    $( Self::$variant { .. } => stringify!($variant), )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for the generated constructors.
    define_port_error! {
        pub enum ExamplePortError {
            Offline => "offline",
            Rejected { status: u16 } => "rejected: {status}",
            Garbled { message: String, offset: usize } => "garbled: {message} at {offset}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        let err = ExamplePortError::offline();
        assert_eq!(err.to_string(), "offline");
        assert_eq!(err.kind(), "Offline");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = ExamplePortError::rejected(503_u16);
        assert_eq!(err.to_string(), "rejected: 503");
        assert_eq!(err.kind(), "Rejected");
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ExamplePortError::garbled("eof", 12_usize);
        assert_eq!(err.to_string(), "garbled: eof at 12");
        assert_eq!(err.kind(), "Garbled");
    }
}
