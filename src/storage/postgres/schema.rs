//! Diesel schema for the taskguard store.

diesel::table! {
    /// Departments tasks can be routed to.
    departments (id) {
        /// Department identifier.
        id -> Uuid,
        /// Unique display name.
        #[max_length = 100]
        name -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registered accounts.
    accounts (id) {
        /// Account identifier.
        id -> Uuid,
        /// Unique, lowercased login email.
        #[max_length = 255]
        email -> Varchar,
        /// Salted password digest.
        #[max_length = 255]
        password_hash -> Varchar,
        /// Display name.
        #[max_length = 100]
        full_name -> Varchar,
        /// `admin`, `manager` or `employee`.
        #[max_length = 20]
        role -> Varchar,
        /// Optional home department.
        department_id -> Nullable<Uuid>,
        /// Whether the account may sign in.
        is_active -> Bool,
        /// Creation timestamp; the earliest account is the founder.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tracked tasks.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Title.
        #[max_length = 200]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Creating account.
        owner_id -> Uuid,
        /// Assigned executor.
        executor_id -> Nullable<Uuid>,
        /// Department the task is routed to.
        target_dept_id -> Nullable<Uuid>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Priority.
        #[max_length = 20]
        priority -> Varchar,
        /// Optional deadline.
        deadline -> Nullable<Timestamptz>,
        /// Budget in minor currency units.
        budget_minor -> Int8,
        /// ISO currency code.
        #[max_length = 3]
        currency -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only task discussion.
    comments (id) {
        /// Comment identifier.
        id -> Uuid,
        /// Parent task.
        task_id -> Uuid,
        /// Author account.
        author_id -> Uuid,
        /// Comment body.
        text -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(accounts -> departments (department_id));
diesel::joinable!(comments -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(departments, accounts, tasks, comments);
