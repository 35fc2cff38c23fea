//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. The
//! `diesel print-schema` command can regenerate them from a live database.

diesel::table! {
    /// Investors, keyed by a UUID and unique by lower-cased email.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name (max 100 characters).
        name -> Varchar,
        /// Lower-cased email address (max 150 characters, unique).
        email -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recorded digital gold purchases.
    transactions (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning investor.
        user_id -> Uuid,
        /// Grams bought, four decimal places.
        grams_purchased -> Float8,
        /// INR per gram used for the purchase.
        price_per_gram -> Float8,
        /// `grams_purchased * price_per_gram`.
        amount_inr -> Float8,
        /// `live`, `backup` or `quoted`.
        price_source -> Varchar,
        /// Purchase timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(transactions -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(transactions, users);
