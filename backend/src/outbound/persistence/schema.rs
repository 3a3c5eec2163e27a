//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.
//! Regenerate with `diesel print-schema` after changing migrations.

diesel::table! {
    /// Registered users.
    ///
    /// `session_id` is the opaque credential issued at registration and is
    /// matched verbatim on every authenticated request.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Name supplied at registration (max 120 characters).
        name -> Varchar,
        /// Unique registration email (max 254 characters).
        email -> Varchar,
        /// Opaque session credential.
        session_id -> Uuid,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Logged meals, each owned by exactly one user.
    meals (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user (foreign key to `users.id`).
        user_id -> Uuid,
        /// Meal name (max 200 characters).
        name -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Whether the meal complied with the user's diet.
        is_on_diet -> Bool,
        /// When the meal was eaten.
        date -> Timestamptz,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(meals -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(meals, users);
