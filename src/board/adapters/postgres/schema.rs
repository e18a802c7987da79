//! Diesel schema for board persistence.

diesel::table! {
    /// Board tasks with their column and position.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        title -> Text,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Display color tag.
        color -> Text,
        /// Column the task belongs to.
        #[max_length = 50]
        column_name -> Varchar,
        /// Zero-based rank within the column.
        position -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
