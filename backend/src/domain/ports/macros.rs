//! `define_port_error!`: declares a port error enum together with snake_case
//! constructors for each variant.
//!
//! ```ignore
//! define_port_error! {
//!     /// Errors raised by price adapters.
//!     pub enum PriceError {
//!         NotConfigured => "no api key",
//!         Timeout { message: String } => "timed out: {message}",
//!     }
//! }
//!
//! let err = PriceError::timeout("after 5s");
//! ```
//!
//! Constructor parameters accept `impl Into<FieldType>`, so `&str` works for
//! `String` fields.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),+ $(,)? } )? => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),+ } )?,
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    pub fn [<$variant:snake>]($( $($field: impl Into<$ty>),+ )?) -> Self {
                        Self::$variant $( { $($field: $field.into()),+ } )?
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum QuoteFeedError {
            Offline => "quote feed offline",
            Throttled { retry_after_secs: u32 } => "throttled for {retry_after_secs}s",
            Rejected { status: u16, message: String } => "rejected ({status}): {message}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(QuoteFeedError::offline(), QuoteFeedError::Offline);
        assert_eq!(QuoteFeedError::offline().to_string(), "quote feed offline");
    }

    #[test]
    fn constructors_convert_field_types() {
        let err = QuoteFeedError::rejected(403_u16, "bad token");
        assert_eq!(err.to_string(), "rejected (403): bad token");
    }

    #[test]
    fn non_string_fields_keep_their_type() {
        let err = QuoteFeedError::throttled(30_u32);
        assert_eq!(err, QuoteFeedError::Throttled { retry_after_secs: 30 });
    }
}
