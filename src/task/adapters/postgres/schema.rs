//! Diesel schema for task assignment persistence.

diesel::table! {
    /// Tickets owned by the ticket service.
    tickets (id) {
        /// Ticket identifier.
        id -> Int8,
        /// Ticket lifecycle status.
        #[max_length = 50]
        status -> Varchar,
    }
}

diesel::table! {
    /// Users owned by the user service.
    users (id) {
        /// User identifier.
        id -> Int8,
        /// Display name.
        #[max_length = 255]
        username -> Varchar,
    }
}

diesel::table! {
    /// Task records, one per ticket at most.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Linked ticket.
        ticket_id -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last membership change timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task membership join table.
    task_users (task_id, user_id) {
        /// Task holding the membership.
        task_id -> Uuid,
        /// Assigned user.
        user_id -> Int8,
    }
}

diesel::joinable!(tasks -> tickets (ticket_id));
diesel::joinable!(task_users -> tasks (task_id));
diesel::joinable!(task_users -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(tickets, users, tasks, task_users);
